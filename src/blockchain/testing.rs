// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! In-memory registry double for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::registry::CertificateRegistry;
use super::types::{CertificateDetails, ChainReceipt, RegistryError, ZERO_ADDRESS};

/// Issuer address reported for every mock registration.
pub const MOCK_ISSUER: &str = "0x9c9ad0f8cbcadbdf2f8e548730b5cc6f826633a2";

/// Registry double holding registrations in memory.
///
/// Unknown hashes come back as the contract would report them: zero issuer,
/// unset validity flag. Query and submission counters let tests assert which
/// external calls were (not) made.
pub struct MockRegistry {
    records: Mutex<HashMap<String, CertificateDetails>>,
    fail_submissions: bool,
    submissions: AtomicUsize,
    queries: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_submissions: false,
            submissions: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// A registry that rejects every submission, as a node outage would.
    pub fn failing() -> Self {
        Self {
            fail_submissions: true,
            ..Self::new()
        }
    }

    /// Seed a registration directly, bypassing `submit_certificate`.
    pub fn seed(&self, cert_hash: &str, student_id: &str) {
        self.records.lock().unwrap().insert(
            cert_hash.to_string(),
            CertificateDetails {
                issuer: MOCK_ISSUER.to_string(),
                timestamp: 1_760_000_000,
                is_valid: true,
                student_id: student_id.to_string(),
            },
        );
    }

    /// Mark a seeded registration as revoked (validity flag cleared).
    pub fn revoke(&self, cert_hash: &str) {
        if let Some(details) = self.records.lock().unwrap().get_mut(cert_hash) {
            details.is_valid = false;
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CertificateRegistry for MockRegistry {
    async fn submit_certificate(
        &self,
        cert_hash: &str,
        student_id: &str,
    ) -> Result<ChainReceipt, RegistryError> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail_submissions {
            return Err(RegistryError::TransactionFailed(
                "mock node unavailable".to_string(),
            ));
        }

        self.seed(cert_hash, student_id);
        Ok(ChainReceipt {
            tx_hash: format!("0x{n:064x}"),
            block_number: n as u64,
            gas_used: 21_000,
        })
    }

    async fn certificate_details(
        &self,
        cert_hash: &str,
    ) -> Result<CertificateDetails, RegistryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let records = self.records.lock().unwrap();
        Ok(records.get(cert_hash).cloned().unwrap_or(CertificateDetails {
            issuer: ZERO_ADDRESS.to_string(),
            timestamp: 0,
            is_valid: false,
            student_id: String::new(),
        }))
    }
}
