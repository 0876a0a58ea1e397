// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Dual-store facade over the primary (redb) and secondary (JSON mirror)
//! backends.
//!
//! Policy:
//! - Writes go to the primary first; the mirror is then written regardless
//!   of the primary outcome. A write fails only when both backends fail.
//! - Reads query the primary first and fall back to the mirror when the
//!   primary errors or returns nothing.
//! - The backends are never reconciled against each other; after a primary
//!   outage the mirror can serve stale data.

use std::sync::RwLock;

use super::records::{
    CertificateRecord, CertificateWithOwner, StudentRecord, StudentWithCertificates,
};
use super::{MirrorStore, PrimaryStore, StoragePaths, StoreError, StoreResult};

/// The persistence adapter used by handlers and reconcilers.
pub struct DualStore {
    primary: PrimaryStore,
    mirror: RwLock<MirrorStore>,
}

impl DualStore {
    pub fn new(primary: PrimaryStore, mirror: MirrorStore) -> Self {
        Self {
            primary,
            mirror: RwLock::new(mirror),
        }
    }

    /// Open both backends under the configured paths.
    pub fn open(paths: &StoragePaths) -> StoreResult<Self> {
        let primary = PrimaryStore::open(&paths.database_file())?;
        let mirror = MirrorStore::load(paths.mirror_file())?;
        Ok(Self::new(primary, mirror))
    }

    /// Insert a student, failing with `AlreadyExists` if the roll number is
    /// registered in either backend. Neither store is mutated on conflict.
    pub fn create_student(&self, student: &StudentRecord) -> StoreResult<()> {
        let in_primary = match self.primary.student_exists(&student.roll_number) {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(error = %e, "primary existence check failed, relying on mirror");
                false
            }
        };
        let in_mirror = self
            .mirror
            .read()
            .expect("mirror lock poisoned")
            .contains(&student.roll_number);

        if in_primary || in_mirror {
            return Err(StoreError::AlreadyExists(format!(
                "Student {}",
                student.roll_number
            )));
        }

        let primary_result = self.primary.create_student(student);
        if let Err(ref e) = primary_result {
            tracing::warn!(error = %e, roll = %student.roll_number, "primary student insert failed, continuing to mirror");
        }

        let mirror_result = self
            .mirror
            .write()
            .expect("mirror lock poisoned")
            .create_student(student);

        match (primary_result, mirror_result) {
            (Err(p), Err(m)) => Err(StoreError::AllBackendsFailed(format!(
                "student insert (primary: {p}, mirror: {m})"
            ))),
            (_, Err(m)) => {
                tracing::warn!(error = %m, roll = %student.roll_number, "mirror student insert failed");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Look up a student; primary first, mirror fallback.
    pub fn get_student(&self, roll_number: &str) -> StoreResult<StudentRecord> {
        match self.primary.get_student(roll_number) {
            Ok(student) => Ok(student),
            Err(StoreError::NotFound(_)) => self
                .mirror
                .read()
                .expect("mirror lock poisoned")
                .get_student(roll_number),
            Err(e) => {
                tracing::warn!(error = %e, "primary student read failed, falling back to mirror");
                self.mirror
                    .read()
                    .expect("mirror lock poisoned")
                    .get_student(roll_number)
            }
        }
    }

    /// Append a certificate to both backends.
    ///
    /// The full owner profile is required so the mirror can materialize an
    /// entry if the student is only registered in the primary.
    pub fn append_certificate(
        &self,
        student: &StudentRecord,
        cert: &CertificateRecord,
    ) -> StoreResult<()> {
        let primary_result = self.primary.append_certificate(cert);
        if let Err(ref e) = primary_result {
            tracing::warn!(error = %e, hash = %cert.certificate_hash, "primary certificate insert failed, continuing to mirror");
        }

        let mirror_result = self
            .mirror
            .write()
            .expect("mirror lock poisoned")
            .append_certificate(student, cert);

        match (primary_result, mirror_result) {
            (Err(p), Err(m)) => Err(StoreError::AllBackendsFailed(format!(
                "certificate insert (primary: {p}, mirror: {m})"
            ))),
            (_, Err(m)) => {
                tracing::warn!(error = %m, hash = %cert.certificate_hash, "mirror certificate insert failed");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// List certificates newest first; primary wins when it has rows, the
    /// mirror answers when the primary errors or has none.
    pub fn list_certificates(
        &self,
        roll_number: &str,
    ) -> StoreResult<(StudentRecord, Vec<CertificateRecord>)> {
        let primary_result = self.primary.list_certificates(roll_number);
        match primary_result {
            Ok((student, certs)) if !certs.is_empty() => return Ok((student, certs)),
            Ok((student, _)) => {
                // Registered but nothing issued yet in the primary; the
                // mirror may still have rows from a degraded write.
                let mirror = self.mirror.read().expect("mirror lock poisoned");
                return match mirror.list_certificates(roll_number) {
                    Ok(found) => Ok(found),
                    Err(_) => Ok((student, Vec::new())),
                };
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "primary certificate listing failed, falling back to mirror");
            }
        }

        self.mirror
            .read()
            .expect("mirror lock poisoned")
            .list_certificates(roll_number)
    }

    /// Find a certificate by hash; primary first, mirror fallback.
    pub fn find_certificate_by_hash(&self, cert_hash: &str) -> StoreResult<CertificateWithOwner> {
        match self.primary.find_certificate_by_hash(cert_hash) {
            Ok(found) => Ok(found),
            Err(StoreError::NotFound(_)) => self
                .mirror
                .read()
                .expect("mirror lock poisoned")
                .find_certificate_by_hash(cert_hash),
            Err(e) => {
                tracing::warn!(error = %e, "primary certificate lookup failed, falling back to mirror");
                self.mirror
                    .read()
                    .expect("mirror lock poisoned")
                    .find_certificate_by_hash(cert_hash)
            }
        }
    }

    /// Every student with nested certificates; primary first, mirror on error.
    pub fn list_all_students(&self) -> StoreResult<Vec<StudentWithCertificates>> {
        match self.primary.list_all_students() {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(error = %e, "primary listing failed, falling back to mirror");
                Ok(self
                    .mirror
                    .read()
                    .expect("mirror lock poisoned")
                    .list_all_students())
            }
        }
    }
}
