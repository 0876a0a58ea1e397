// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Primary store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `students`: roll_number → serialized StudentRecord
//! - `certificates`: certificate_hash → serialized CertificateRecord
//! - `student_cert_index`: composite key (roll|!timestamp|hash) → hash

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::records::{
    CertificateRecord, CertificateWithOwner, StudentRecord, StudentWithCertificates,
};
use super::{StoreError, StoreResult};

/// Primary table: roll_number → serialized StudentRecord (JSON bytes).
const STUDENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("students");

/// Primary table: certificate_hash → serialized CertificateRecord (JSON bytes).
const CERTIFICATES: TableDefinition<&str, &[u8]> = TableDefinition::new("certificates");

/// Index: composite key → certificate_hash.
/// Key format: `roll|!timestamp_be|hash` for descending-time range scans.
const STUDENT_CERT_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("student_cert_index");

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the student_cert_index table.
///
/// The inverted timestamp ensures newest-first ordering when scanning forward.
fn make_index_key(roll_number: &str, timestamp: i64, cert_hash: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(roll_number.len() + 1 + 8 + 1 + cert_hash.len());
    key.extend_from_slice(roll_number.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&(!timestamp as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(cert_hash.as_bytes());
    key
}

/// Build a prefix key for range scanning all certificates of a student.
fn make_prefix(roll_number: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(roll_number.len() + 1);
    prefix.extend_from_slice(roll_number.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a range scan (prefix with 0xFF bytes appended).
fn make_prefix_end(roll_number: &str) -> Vec<u8> {
    let mut end = Vec::with_capacity(roll_number.len() + 1 + 20);
    end.extend_from_slice(roll_number.as_bytes());
    end.push(b'|');
    end.extend_from_slice(&[0xFF; 20]);
    end
}

// =============================================================================
// PrimaryStore
// =============================================================================

/// Embedded ACID store for students and certificates.
pub struct PrimaryStore {
    db: Database,
}

impl PrimaryStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STUDENTS)?;
            let _ = write_txn.open_table(CERTIFICATES)?;
            let _ = write_txn.open_table(STUDENT_CERT_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Students
    // =========================================================================

    /// Check whether a roll number is registered.
    pub fn student_exists(&self, roll_number: &str) -> StoreResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STUDENTS)?;
        Ok(table.get(roll_number)?.is_some())
    }

    /// Insert a new student account.
    pub fn create_student(&self, student: &StudentRecord) -> StoreResult<()> {
        let json = serde_json::to_vec(student)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STUDENTS)?;
            if table.get(student.roll_number.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "Student {}",
                    student.roll_number
                )));
            }
            table.insert(student.roll_number.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a student by roll number.
    pub fn get_student(&self, roll_number: &str) -> StoreResult<StudentRecord> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STUDENTS)?;
        match table.get(roll_number)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StoreError::NotFound(format!("Student {roll_number}"))),
        }
    }

    // =========================================================================
    // Certificates
    // =========================================================================

    /// Append a certificate to its owning student.
    ///
    /// The certificate row and its index entry are written in one
    /// transaction; fails with `NotFound` if the student is not registered
    /// in this store.
    pub fn append_certificate(&self, cert: &CertificateRecord) -> StoreResult<()> {
        let json = serde_json::to_vec(cert)?;
        let timestamp = cert.issued_at.timestamp();

        let write_txn = self.db.begin_write()?;
        {
            let students = write_txn.open_table(STUDENTS)?;
            if students.get(cert.roll_number.as_str())?.is_none() {
                return Err(StoreError::NotFound(format!(
                    "Student {}",
                    cert.roll_number
                )));
            }

            let mut certs = write_txn.open_table(CERTIFICATES)?;
            certs.insert(cert.certificate_hash.as_str(), json.as_slice())?;

            let mut index = write_txn.open_table(STUDENT_CERT_INDEX)?;
            let key = make_index_key(&cert.roll_number, timestamp, &cert.certificate_hash);
            index.insert(key.as_slice(), cert.certificate_hash.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// List a student's certificates, newest first, with the owning profile.
    pub fn list_certificates(
        &self,
        roll_number: &str,
    ) -> StoreResult<(StudentRecord, Vec<CertificateRecord>)> {
        let student = self.get_student(roll_number)?;

        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(STUDENT_CERT_INDEX)?;
        let certs = read_txn.open_table(CERTIFICATES)?;

        let prefix = make_prefix(roll_number);
        let prefix_end = make_prefix_end(roll_number);

        let mut results = Vec::new();
        for entry in index.range(prefix.as_slice()..prefix_end.as_slice())? {
            let entry = entry?;
            let hash = entry.1.value();
            if let Some(value) = certs.get(hash)? {
                results.push(serde_json::from_slice(value.value())?);
            }
        }

        Ok((student, results))
    }

    /// Look up a certificate by its content hash, joined with owner fields.
    pub fn find_certificate_by_hash(&self, cert_hash: &str) -> StoreResult<CertificateWithOwner> {
        let read_txn = self.db.begin_read()?;
        let certs = read_txn.open_table(CERTIFICATES)?;

        let certificate: CertificateRecord = match certs.get(cert_hash)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(StoreError::NotFound(format!("Certificate {cert_hash}"))),
        };

        let students = read_txn.open_table(STUDENTS)?;
        let owner: Option<StudentRecord> = match students.get(certificate.roll_number.as_str())? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };

        Ok(CertificateWithOwner {
            certificate,
            student_name: owner.as_ref().map(|s| s.student_name.clone()),
            department: owner.as_ref().and_then(|s| s.department.clone()),
            year_of_pass: owner.as_ref().and_then(|s| s.year_of_pass),
        })
    }

    /// Every student with nested certificates, credential hash redacted.
    pub fn list_all_students(&self) -> StoreResult<Vec<StudentWithCertificates>> {
        let read_txn = self.db.begin_read()?;
        let students = read_txn.open_table(STUDENTS)?;
        let index = read_txn.open_table(STUDENT_CERT_INDEX)?;
        let certs = read_txn.open_table(CERTIFICATES)?;

        let mut records = Vec::new();
        for entry in students.iter()? {
            let entry = entry?;
            let student: StudentRecord = serde_json::from_slice(entry.1.value())?;

            let prefix = make_prefix(&student.roll_number);
            let prefix_end = make_prefix_end(&student.roll_number);
            let mut owned = Vec::new();
            for idx_entry in index.range(prefix.as_slice()..prefix_end.as_slice())? {
                let idx_entry = idx_entry?;
                if let Some(value) = certs.get(idx_entry.1.value())? {
                    owned.push(serde_json::from_slice(value.value())?);
                }
            }

            records.push(StudentWithCertificates::redacted(&student, owned));
        }

        Ok(records)
    }
}
