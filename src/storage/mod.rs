// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! # Dual-Store Persistence
//!
//! Student and certificate records live in two backends exposing the same
//! record shapes:
//!
//! - **Primary**: an embedded ACID database (redb), one file under the data
//!   directory.
//! - **Secondary**: a JSON mirror file keyed by roll number, rewritten in
//!   full on every change.
//!
//! [`DualStore`] applies the write/read policy over both: writes go to the
//! primary first and are then mirrored regardless of the primary outcome;
//! reads try the primary and fall back to the mirror on error or miss. The
//! backends are never reconciled against each other.

pub mod dual;
pub mod mirror;
pub mod paths;
pub mod primary;
pub mod records;

pub use dual::DualStore;
pub use mirror::MirrorStore;
pub use paths::StoragePaths;
pub use primary::PrimaryStore;
pub use records::{
    CertificateRecord, CertificateWithOwner, StudentRecord, StudentWithCertificates,
};

/// Errors raised by either persistence backend or by the dual-store facade.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("both stores failed: {0}")]
    AllBackendsFailed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
