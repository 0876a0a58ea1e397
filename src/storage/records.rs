// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Record shapes shared by both persistence backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student account as persisted in either backend.
///
/// Created once by the admin; mutated only by certificate issuance
/// (appending to the owned certificate list); never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentRecord {
    /// Unique roll number, chosen by the caller at account creation.
    pub roll_number: String,
    /// Contact mail address.
    pub mail_id: String,
    /// Salted one-way credential hash (never returned by read APIs).
    pub credential_hash: String,
    /// Display name.
    pub student_name: String,
    pub student_class: Option<String>,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    pub percentage: Option<f64>,
}

/// An issued certificate. Immutable once created; owned by exactly one
/// student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateRecord {
    /// Roll number of the owning student.
    pub roll_number: String,
    /// On-chain identifier: `0x` + lowercase hex SHA-256 of the document.
    pub certificate_hash: String,
    /// Public path of the stored document.
    pub pdf_file_path: String,
    /// Public path of the stored photo.
    pub photo_file_path: String,
    /// Public path of the rendered QR image.
    pub qr_code_path: String,
    /// Transaction hash of the registry contract call.
    pub chain_tx_hash: String,
    /// Issuance timestamp.
    pub issued_at: DateTime<Utc>,
}

/// A student profile with nested certificates and the credential hash
/// redacted, as returned by the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentWithCertificates {
    pub roll_number: String,
    pub mail_id: String,
    pub student_name: String,
    pub student_class: Option<String>,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    pub percentage: Option<f64>,
    pub certificates: Vec<CertificateRecord>,
}

impl StudentWithCertificates {
    /// Join a profile with its certificates, dropping the credential hash.
    pub fn redacted(student: &StudentRecord, certificates: Vec<CertificateRecord>) -> Self {
        Self {
            roll_number: student.roll_number.clone(),
            mail_id: student.mail_id.clone(),
            student_name: student.student_name.clone(),
            student_class: student.student_class.clone(),
            department: student.department.clone(),
            year_of_pass: student.year_of_pass,
            percentage: student.percentage,
            certificates,
        }
    }
}

/// A certificate joined with the profile fields of its owner, as returned
/// by the hash lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateWithOwner {
    pub certificate: CertificateRecord,
    pub student_name: Option<String>,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
}
