// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation, and use camelCase on the wire.
//!
//! Successful responses carry `success: true` alongside their payload;
//! failures are rendered by [`ApiError`](crate::error::ApiError) as
//! `{"success": false, "message": ...}`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::CertificateDetails;
use crate::reconcile::{CertificateMetadata, VerifyOutcome};
use crate::storage::{CertificateRecord, StudentRecord, StudentWithCertificates};

// =============================================================================
// Roll Number Type
// =============================================================================

/// Student roll number wrapper.
///
/// Provides type safety for the caller-supplied identifier that keys both
/// persistence backends.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RollNumber(pub String);

impl std::fmt::Display for RollNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RollNumber {
    fn from(value: String) -> Self {
        RollNumber(value)
    }
}

impl From<&str> for RollNumber {
    fn from(value: &str) -> Self {
        RollNumber(value.to_string())
    }
}

impl From<RollNumber> for String {
    fn from(value: RollNumber) -> Self {
        value.0
    }
}

impl RollNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Admin Models
// =============================================================================

/// Request to create a student account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    /// Unique roll number for the new account.
    pub roll_number: RollNumber,
    /// Contact mail address.
    pub mail_id: String,
    /// Plaintext credential; stored only as a salted one-way hash.
    pub password: String,
    /// Display name.
    pub student_name: String,
    pub student_class: Option<String>,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    pub percentage: Option<f64>,
}

/// Generic success envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Response to a completed certificate issuance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificateResponse {
    pub success: bool,
    pub message: String,
    /// On-chain identifier of the issued document.
    pub hash: String,
    /// Hash of the confirmed registration transaction.
    pub tx_hash: String,
    /// Public path of the rendered QR image.
    pub qr_code_path: String,
}

/// A certificate nested in the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSummary {
    pub certificate_hash: String,
    pub pdf_file_path: String,
    pub photo_file_path: String,
    pub qr_code_path: String,
    pub blockchain_tx_hash: String,
    pub issue_timestamp: String,
}

impl From<&CertificateRecord> for CertificateSummary {
    fn from(cert: &CertificateRecord) -> Self {
        Self {
            certificate_hash: cert.certificate_hash.clone(),
            pdf_file_path: cert.pdf_file_path.clone(),
            photo_file_path: cert.photo_file_path.clone(),
            qr_code_path: cert.qr_code_path.clone(),
            blockchain_tx_hash: cert.chain_tx_hash.clone(),
            issue_timestamp: cert.issued_at.to_rfc3339(),
        }
    }
}

/// One student in the admin listing, credential hash omitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecordView {
    pub roll_number: String,
    pub mail_id: String,
    pub student_name: String,
    pub student_class: Option<String>,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    pub percentage: Option<f64>,
    pub certificates: Vec<CertificateSummary>,
}

impl From<&StudentWithCertificates> for StudentRecordView {
    fn from(s: &StudentWithCertificates) -> Self {
        Self {
            roll_number: s.roll_number.clone(),
            mail_id: s.mail_id.clone(),
            student_name: s.student_name.clone(),
            student_class: s.student_class.clone(),
            department: s.department.clone(),
            year_of_pass: s.year_of_pass,
            percentage: s.percentage,
            certificates: s.certificates.iter().map(CertificateSummary::from).collect(),
        }
    }
}

/// Response for the admin all-records listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AllRecordsResponse {
    pub success: bool,
    pub records: Vec<StudentRecordView>,
}

// =============================================================================
// Student Models
// =============================================================================

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub roll_number: RollNumber,
    pub password: String,
}

/// Minimal profile payload returned on a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub roll_number: String,
    pub student_name: String,
}

/// Student profile as returned alongside the certificate listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub roll_number: String,
    pub name: String,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    pub class: Option<String>,
    pub percentage: Option<f64>,
    pub mail_id: String,
}

impl From<&StudentRecord> for StudentProfile {
    fn from(s: &StudentRecord) -> Self {
        Self {
            roll_number: s.roll_number.clone(),
            name: s.student_name.clone(),
            department: s.department.clone(),
            year_of_pass: s.year_of_pass,
            class: s.student_class.clone(),
            percentage: s.percentage,
            mail_id: s.mail_id.clone(),
        }
    }
}

/// A certificate joined with its owner's profile fields, newest first in
/// the listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    /// The certificate's content hash.
    pub id: String,
    /// Owning student's display name.
    pub name: String,
    pub pdf_download_url: String,
    pub photo_file_path: String,
    pub qr_code_path: String,
    pub blockchain_tx_hash: String,
    pub issue_timestamp: String,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    pub student_class: Option<String>,
    pub percentage: Option<f64>,
}

impl CertificateView {
    pub fn joined(cert: &CertificateRecord, owner: &StudentRecord) -> Self {
        Self {
            id: cert.certificate_hash.clone(),
            name: owner.student_name.clone(),
            pdf_download_url: cert.pdf_file_path.clone(),
            photo_file_path: cert.photo_file_path.clone(),
            qr_code_path: cert.qr_code_path.clone(),
            blockchain_tx_hash: cert.chain_tx_hash.clone(),
            issue_timestamp: cert.issued_at.to_rfc3339(),
            department: owner.department.clone(),
            year_of_pass: owner.year_of_pass,
            student_class: owner.student_class.clone(),
            percentage: owner.percentage,
        }
    }
}

/// Response for the student certificate listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CertificateListResponse {
    pub success: bool,
    pub profile: StudentProfile,
    pub certificates: Vec<CertificateView>,
}

// =============================================================================
// Verifier Models
// =============================================================================

/// Request body for hash verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyHashRequest {
    /// Candidate token: `0x` + 64 hex chars.
    pub certificate_hash: String,
}

/// Raw on-chain fields echoed back to the verifier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainDetailsView {
    pub issuer: String,
    pub timestamp: String,
    pub is_valid: bool,
    pub student_id: String,
}

impl From<&CertificateDetails> for ChainDetailsView {
    fn from(d: &CertificateDetails) -> Self {
        Self {
            issuer: d.issuer.clone(),
            timestamp: d.timestamp.to_string(),
            is_valid: d.is_valid,
            student_id: d.student_id.clone(),
        }
    }
}

/// Off-chain enrichment for a valid hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyMetadataView {
    pub student_id: String,
    pub student_name: Option<String>,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    pub issue_date: String,
    pub pdf_download_url: String,
    pub photo_file_path: String,
}

impl From<CertificateMetadata> for VerifyMetadataView {
    fn from(m: CertificateMetadata) -> Self {
        Self {
            student_id: m.student_id,
            student_name: m.student_name,
            department: m.department,
            year_of_pass: m.year_of_pass,
            issue_date: m.issue_date,
            pdf_download_url: m.pdf_download_url,
            photo_file_path: m.photo_file_path,
        }
    }
}

/// Verification response: classification, chain fields, optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyHashResponse {
    pub success: bool,
    /// `VALID` or `INVALID`; no partial states.
    pub status: String,
    pub blockchain_details: ChainDetailsView,
    pub metadata: Option<VerifyMetadataView>,
}

impl From<VerifyOutcome> for VerifyHashResponse {
    fn from(outcome: VerifyOutcome) -> Self {
        Self {
            success: true,
            status: outcome.status.as_str().to_string(),
            blockchain_details: ChainDetailsView::from(&outcome.chain),
            metadata: outcome.metadata.map(VerifyMetadataView::from),
        }
    }
}

/// Liveness probe response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
