// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Registry contract integration.
//!
//! The reconcilers only see the [`CertificateRegistry`] capability trait;
//! transport details (RPC, gas, signing) live in the alloy-backed
//! [`RegistryClient`].

pub mod registry;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use registry::{CertificateRegistry, RegistryClient};
pub use types::*;
