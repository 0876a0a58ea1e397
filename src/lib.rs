// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Certledger - Certificate Issuance & Verification Service
//!
//! This crate provides an HTTP service for issuing PDF certificates bound to
//! student accounts. Each document is hashed (SHA-256), the hash is registered
//! on an external EVM registry contract, a QR image of the hash is rendered,
//! and certificate metadata is written to an embedded primary store that is
//! mirrored into a JSON backup file.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Registry contract integration (alloy)
//! - `reconcile` - Issuance and verification orchestration
//! - `storage` - Dual-store persistence (redb primary + JSON mirror)
//! - `files` - Uploaded document/photo/QR file handling

pub mod api;
pub mod blockchain;
pub mod config;
pub mod credentials;
pub mod error;
pub mod files;
pub mod hash;
pub mod models;
pub mod reconcile;
pub mod state;
pub mod storage;
