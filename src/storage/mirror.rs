// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Secondary store: a JSON mirror file keyed by roll number.
//!
//! The whole document is held in memory and rewritten in full on every
//! change (atomic write via temp file + rename). There is no file locking;
//! concurrent writers from separate processes can overwrite each other.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::records::{
    CertificateRecord, CertificateWithOwner, StudentRecord, StudentWithCertificates,
};
use super::{StoreError, StoreResult};

/// One mirrored student: profile plus owned certificates in issuance order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorEntry {
    #[serde(flatten)]
    pub student: StudentRecord,
    pub certificates: Vec<CertificateRecord>,
}

/// In-memory view of the mirror file.
pub struct MirrorStore {
    path: PathBuf,
    students: BTreeMap<String, MirrorEntry>,
}

impl MirrorStore {
    /// Load the mirror from disk, creating an empty file if absent.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let students = if path.exists() {
            let file = File::open(&path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, "{}")?;
            BTreeMap::new()
        };

        tracing::debug!(records = students.len(), path = %path.display(), "mirror loaded");
        Ok(Self { path, students })
    }

    /// Rewrite the whole mirror file (temp file + rename for atomicity).
    fn save(&self) -> StoreResult<()> {
        let temp_path = self.path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &self.students)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Check whether a roll number is mirrored.
    pub fn contains(&self, roll_number: &str) -> bool {
        self.students.contains_key(roll_number)
    }

    /// Insert a new student account.
    pub fn create_student(&mut self, student: &StudentRecord) -> StoreResult<()> {
        if self.contains(&student.roll_number) {
            return Err(StoreError::AlreadyExists(format!(
                "Student {}",
                student.roll_number
            )));
        }
        self.students.insert(
            student.roll_number.clone(),
            MirrorEntry {
                student: student.clone(),
                certificates: Vec::new(),
            },
        );
        self.save()
    }

    /// Look up a student by roll number.
    pub fn get_student(&self, roll_number: &str) -> StoreResult<StudentRecord> {
        self.students
            .get(roll_number)
            .map(|e| e.student.clone())
            .ok_or_else(|| StoreError::NotFound(format!("Student {roll_number}")))
    }

    /// Append a certificate to its owning student.
    ///
    /// If the student is not mirrored yet, the entry is created from the
    /// supplied profile so the mirror stays usable as a standalone fallback.
    pub fn append_certificate(
        &mut self,
        student: &StudentRecord,
        cert: &CertificateRecord,
    ) -> StoreResult<()> {
        let entry = self
            .students
            .entry(student.roll_number.clone())
            .or_insert_with(|| MirrorEntry {
                student: student.clone(),
                certificates: Vec::new(),
            });
        entry.certificates.push(cert.clone());
        self.save()
    }

    /// List a student's certificates, newest first, with the owning profile.
    pub fn list_certificates(
        &self,
        roll_number: &str,
    ) -> StoreResult<(StudentRecord, Vec<CertificateRecord>)> {
        let entry = self
            .students
            .get(roll_number)
            .ok_or_else(|| StoreError::NotFound(format!("Student {roll_number}")))?;

        // Certificates are appended chronologically; reverse for newest-first.
        let mut certs = entry.certificates.clone();
        certs.reverse();
        Ok((entry.student.clone(), certs))
    }

    /// Look up a certificate by its content hash, joined with owner fields.
    pub fn find_certificate_by_hash(&self, cert_hash: &str) -> StoreResult<CertificateWithOwner> {
        for entry in self.students.values() {
            if let Some(cert) = entry
                .certificates
                .iter()
                .find(|c| c.certificate_hash == cert_hash)
            {
                return Ok(CertificateWithOwner {
                    certificate: cert.clone(),
                    student_name: Some(entry.student.student_name.clone()),
                    department: entry.student.department.clone(),
                    year_of_pass: entry.student.year_of_pass,
                });
            }
        }
        Err(StoreError::NotFound(format!("Certificate {cert_hash}")))
    }

    /// Every student with nested certificates, credential hash redacted.
    pub fn list_all_students(&self) -> Vec<StudentWithCertificates> {
        self.students
            .values()
            .map(|e| StudentWithCertificates::redacted(&e.student, e.certificates.clone()))
            .collect()
    }
}
