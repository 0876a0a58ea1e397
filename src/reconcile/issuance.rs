// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Issuance reconciler.
//!
//! One issuance runs `Uploaded → Hashed → ChainSubmitted → ChainConfirmed →
//! Persisted`; any failure after upload sweeps the artifacts created so far
//! (document, photo, QR image). The chain write is never rolled back: a
//! registration that confirmed but failed to persist locally stays on chain.

use chrono::Utc;

use crate::blockchain::{CertificateRegistry, RegistryError};
use crate::files::{CleanupGuard, FileError, FileStore, StoredFile};
use crate::hash;
use crate::storage::{CertificateRecord, DualStore, StoreError};

/// Result of a completed issuance.
#[derive(Debug, Clone)]
pub struct IssuanceOutcome {
    /// On-chain identifier of the document (`0x` + hex SHA-256).
    pub certificate_hash: String,
    /// Hash of the confirmed registration transaction.
    pub tx_hash: String,
    /// Public path of the rendered QR image.
    pub qr_code_path: String,
}

/// Failure modes of the issuance flow, in pipeline order.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("student {0} is not registered")]
    UnknownStudent(String),

    #[error("failed to hash document: {0}")]
    Hash(#[from] std::io::Error),

    #[error("failed to prepare issuance artifacts: {0}")]
    File(#[from] FileError),

    #[error("chain registration failed: {0}")]
    Chain(#[from] RegistryError),

    #[error("failed to persist certificate record: {0}")]
    Store(#[from] StoreError),
}

/// Run one issuance for already-spooled uploads.
///
/// The caller has validated that both files arrived; everything after that
/// point, including removal of the spooled files on failure, happens here.
pub async fn issue_certificate(
    store: &DualStore,
    registry: &dyn CertificateRegistry,
    files: &FileStore,
    roll_number: &str,
    document: StoredFile,
    photo: StoredFile,
) -> Result<IssuanceOutcome, IssueError> {
    let mut guard = CleanupGuard::new();
    guard.track(&document.disk_path);
    guard.track(&photo.disk_path);

    // The student must exist in at least one backend before anything else.
    let student = store
        .get_student(roll_number)
        .map_err(|_| IssueError::UnknownStudent(roll_number.to_string()))?;

    // Hashed: the digest doubles as the on-chain identifier.
    let digest = hash::sha256_file(&document.disk_path)?;
    let identifier = hash::to_identifier(&digest);

    let qr = files.render_qr(&identifier, roll_number)?;
    guard.track(&qr.disk_path);

    // ChainSubmitted → ChainConfirmed. Register before persisting so a
    // stored certificate always has a confirmed registration behind it.
    let receipt = registry.submit_certificate(&identifier, roll_number).await?;
    tracing::info!(
        tx = %receipt.tx_hash,
        block = receipt.block_number,
        hash = %identifier,
        "certificate registered on chain"
    );

    // Persisted.
    let record = CertificateRecord {
        roll_number: student.roll_number.clone(),
        certificate_hash: identifier.clone(),
        pdf_file_path: document.public_path,
        photo_file_path: photo.public_path,
        qr_code_path: qr.public_path.clone(),
        chain_tx_hash: receipt.tx_hash.clone(),
        issued_at: Utc::now(),
    };
    store.append_certificate(&student, &record)?;

    guard.disarm();
    Ok(IssuanceOutcome {
        certificate_hash: identifier,
        tx_hash: receipt.tx_hash,
        qr_code_path: qr.public_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::testing::MockRegistry;
    use crate::storage::{StoragePaths, StudentRecord};
    use std::fs;

    struct Fixture {
        store: DualStore,
        files: FileStore,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path().join("data"), dir.path().join("public"));
        let store = DualStore::open(&paths).unwrap();
        let files = FileStore::new(paths);
        files.initialize().unwrap();
        Fixture {
            store,
            files,
            _dir: dir,
        }
    }

    fn register_student(store: &DualStore, roll: &str, name: &str) {
        store
            .create_student(&StudentRecord {
                roll_number: roll.to_string(),
                mail_id: format!("{roll}@example.edu"),
                credential_hash: "pbkdf2-sha256$100000$c2FsdA==$aGFzaA==".into(),
                student_name: name.to_string(),
                student_class: None,
                department: Some("CSE".into()),
                year_of_pass: Some(2026),
                percentage: None,
            })
            .unwrap();
    }

    fn spool(files: &FileStore, doc_bytes: &[u8]) -> (StoredFile, StoredFile) {
        let document = files.document_target("grade sheet.pdf");
        fs::write(&document.disk_path, doc_bytes).unwrap();
        let photo = files.photo_target("photo.png");
        fs::write(&photo.disk_path, b"not really a png").unwrap();
        (document, photo)
    }

    #[tokio::test]
    async fn successful_issuance_registers_and_persists() {
        let fx = fixture();
        register_student(&fx.store, "R100", "Asha");
        let registry = MockRegistry::new();
        let (document, photo) = spool(&fx.files, b"document bytes");
        let doc_path = document.disk_path.clone();

        let outcome =
            issue_certificate(&fx.store, &registry, &fx.files, "R100", document, photo)
                .await
                .unwrap();

        // Identifier is the prefixed digest of the document bytes.
        assert!(outcome.certificate_hash.starts_with("0x"));
        assert_eq!(outcome.certificate_hash.len(), 66);
        assert_eq!(registry.submission_count(), 1);

        // Uploaded files and the QR image survive.
        assert!(doc_path.exists());
        assert!(fx
            .files
            .public_root()
            .join("imgs/qrcodes")
            .read_dir()
            .unwrap()
            .next()
            .is_some());

        // The record landed in the store with the chain reference.
        let found = fx
            .store
            .find_certificate_by_hash(&outcome.certificate_hash)
            .unwrap();
        assert_eq!(found.certificate.chain_tx_hash, outcome.tx_hash);
        assert_eq!(found.student_name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn unknown_student_fails_and_sweeps_uploads() {
        let fx = fixture();
        let registry = MockRegistry::new();
        let (document, photo) = spool(&fx.files, b"document bytes");
        let doc_path = document.disk_path.clone();
        let photo_path = photo.disk_path.clone();

        let result =
            issue_certificate(&fx.store, &registry, &fx.files, "R404", document, photo).await;

        assert!(matches!(result, Err(IssueError::UnknownStudent(_))));
        assert_eq!(registry.submission_count(), 0);
        assert!(!doc_path.exists());
        assert!(!photo_path.exists());
    }

    #[tokio::test]
    async fn chain_failure_sweeps_all_artifacts_and_persists_nothing() {
        let fx = fixture();
        register_student(&fx.store, "R100", "Asha");
        let registry = MockRegistry::failing();
        let (document, photo) = spool(&fx.files, b"document bytes");
        let doc_path = document.disk_path.clone();
        let photo_path = photo.disk_path.clone();

        let result =
            issue_certificate(&fx.store, &registry, &fx.files, "R100", document, photo).await;

        assert!(matches!(result, Err(IssueError::Chain(_))));
        assert!(!doc_path.exists());
        assert!(!photo_path.exists());
        // The QR image rendered before the chain call is swept too.
        assert!(fx
            .files
            .public_root()
            .join("imgs/qrcodes")
            .read_dir()
            .unwrap()
            .next()
            .is_none());

        let (_, certs) = fx.store.list_certificates("R100").unwrap();
        assert!(certs.is_empty());
    }

    #[tokio::test]
    async fn issued_certificate_verifies_end_to_end() {
        use crate::reconcile::verification::{verify_hash, VerifyStatus};
        use sha2::{Digest, Sha256};

        let fx = fixture();
        register_student(&fx.store, "R100", "Asha");
        let registry = MockRegistry::new();

        let document_bytes = b"semester grade sheet for R100";
        let (document, photo) = spool(&fx.files, document_bytes);

        let outcome =
            issue_certificate(&fx.store, &registry, &fx.files, "R100", document, photo)
                .await
                .unwrap();

        // The identifier equals an independently computed digest.
        let expected = format!("0x{}", hex::encode(Sha256::digest(document_bytes)));
        assert_eq!(outcome.certificate_hash, expected);

        let verdict = verify_hash(&fx.store, &registry, &expected).await.unwrap();
        assert_eq!(verdict.status, VerifyStatus::Valid);
        assert_eq!(verdict.chain.student_id, "R100");
        let metadata = verdict.metadata.expect("metadata block present");
        assert_eq!(metadata.student_name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn same_document_reissues_with_same_identifier() {
        let fx = fixture();
        register_student(&fx.store, "R100", "Asha");
        let registry = MockRegistry::new();

        let (doc_a, photo_a) = spool(&fx.files, b"identical bytes");
        let a = issue_certificate(&fx.store, &registry, &fx.files, "R100", doc_a, photo_a)
            .await
            .unwrap();

        let (doc_b, photo_b) = spool(&fx.files, b"identical bytes");
        let b = issue_certificate(&fx.store, &registry, &fx.files, "R100", doc_b, photo_b)
            .await
            .unwrap();

        assert_eq!(a.certificate_hash, b.certificate_hash);
    }
}
