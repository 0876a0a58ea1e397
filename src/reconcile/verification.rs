// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Verification reconciler.
//!
//! A hash token is validated locally, checked against the registry
//! contract, and classified `VALID` or `INVALID` with no partial states.
//! Valid hashes are enriched with off-chain metadata when either backend
//! still holds it; missing metadata never downgrades the classification.

use crate::blockchain::{CertificateDetails, CertificateRegistry, RegistryError};
use crate::hash::{HASH_PREFIX, IDENTIFIER_LEN};
use crate::storage::{DualStore, StoreError};

/// Classification of a verified hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    Valid,
    Invalid,
}

impl VerifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyStatus::Valid => "VALID",
            VerifyStatus::Invalid => "INVALID",
        }
    }
}

/// Off-chain enrichment for a valid hash.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateMetadata {
    pub student_id: String,
    pub student_name: Option<String>,
    pub department: Option<String>,
    pub year_of_pass: Option<i32>,
    /// Human-readable issuance date.
    pub issue_date: String,
    pub pdf_download_url: String,
    pub photo_file_path: String,
}

/// Combined verification result: raw chain fields plus optional enrichment.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub status: VerifyStatus,
    pub chain: CertificateDetails,
    pub metadata: Option<CertificateMetadata>,
}

/// Failure modes of the verification flow.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed certificate hash token: {0}")]
    MalformedToken(String),

    #[error(transparent)]
    Chain(#[from] RegistryError),
}

/// Check the token shape before any external call: `0x` + 64 hex chars.
pub fn validate_token(token: &str) -> Result<(), VerifyError> {
    let well_formed = token.len() == IDENTIFIER_LEN
        && token.starts_with(HASH_PREFIX)
        && token[HASH_PREFIX.len()..].chars().all(|c| c.is_ascii_hexdigit());

    if well_formed {
        Ok(())
    } else {
        Err(VerifyError::MalformedToken(token.to_string()))
    }
}

/// Verify a hash token against the registry and enrich from the store.
pub async fn verify_hash(
    store: &DualStore,
    registry: &dyn CertificateRegistry,
    token: &str,
) -> Result<VerifyOutcome, VerifyError> {
    validate_token(token)?;

    let chain = registry.certificate_details(token).await?;
    if !chain.is_registered() {
        return Ok(VerifyOutcome {
            status: VerifyStatus::Invalid,
            chain,
            metadata: None,
        });
    }

    let metadata = match store.find_certificate_by_hash(token) {
        Ok(found) => Some(CertificateMetadata {
            student_id: found.certificate.roll_number.clone(),
            student_name: found.student_name,
            department: found.department,
            year_of_pass: found.year_of_pass,
            issue_date: found
                .certificate
                .issued_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            pdf_download_url: found.certificate.pdf_file_path,
            photo_file_path: found.certificate.photo_file_path,
        }),
        Err(StoreError::NotFound(_)) => None,
        Err(e) => {
            tracing::warn!(error = %e, "metadata lookup failed, returning chain-only result");
            None
        }
    };

    Ok(VerifyOutcome {
        status: VerifyStatus::Valid,
        chain,
        metadata,
    })
}
