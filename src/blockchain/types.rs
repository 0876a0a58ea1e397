// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Registry types and errors.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The unset issuer address returned by the contract for unknown hashes.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// The on-chain record bound to a certificate hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CertificateDetails {
    /// Address that registered the hash; zero when never registered.
    pub issuer: String,
    /// Registration timestamp (seconds since epoch, as reported on chain).
    pub timestamp: u64,
    /// Validity flag maintained by the contract.
    pub is_valid: bool,
    /// Roll number the hash was registered for.
    pub student_id: String,
}

impl CertificateDetails {
    /// A hash counts as registered only when the issuer is non-zero and
    /// the validity flag is set. No partial states.
    pub fn is_registered(&self) -> bool {
        self.issuer != ZERO_ADDRESS && self.is_valid
    }
}

/// Receipt of a confirmed registration transaction.
#[derive(Debug, Clone)]
pub struct ChainReceipt {
    /// Transaction hash
    pub tx_hash: String,
    /// Block number where the transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),
}
