// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Salted one-way credential hashing (PBKDF2-HMAC-SHA256 via `ring`).
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt_b64>$<hash_b64>`.
//! Verification re-derives with the stored salt and iteration count, so old
//! hashes keep working if the default cost is raised later.

use std::num::NonZeroU32;

use base64ct::{Base64, Encoding};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

const SCHEME: &str = "pbkdf2-sha256";
const DEFAULT_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();
const SALT_LEN: usize = 16;
const HASH_LEN: usize = digest::SHA256_OUTPUT_LEN;

/// Errors raised while hashing or verifying credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to generate salt")]
    Rng,

    #[error("stored credential hash is malformed")]
    MalformedHash,
}

/// Hash a plaintext credential with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| CredentialError::Rng)?;

    let mut derived = [0u8; HASH_LEN];
    pbkdf2::derive(
        ALGORITHM,
        DEFAULT_ITERATIONS,
        &salt,
        password.as_bytes(),
        &mut derived,
    );

    Ok(format!(
        "{SCHEME}${}${}${}",
        DEFAULT_ITERATIONS,
        Base64::encode_string(&salt),
        Base64::encode_string(&derived)
    ))
}

/// Compare a plaintext credential against a stored hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, and an error only
/// when the stored value itself cannot be parsed.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, CredentialError> {
    let mut parts = stored.split('$');

    let scheme = parts.next().ok_or(CredentialError::MalformedHash)?;
    if scheme != SCHEME {
        return Err(CredentialError::MalformedHash);
    }

    let iterations: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or(CredentialError::MalformedHash)?;
    let iterations = NonZeroU32::new(iterations).ok_or(CredentialError::MalformedHash)?;

    let salt = parts
        .next()
        .and_then(|s| Base64::decode_vec(s).ok())
        .ok_or(CredentialError::MalformedHash)?;
    let expected = parts
        .next()
        .and_then(|s| Base64::decode_vec(s).ok())
        .ok_or(CredentialError::MalformedHash)?;
    if parts.next().is_some() || expected.len() != HASH_LEN {
        return Err(CredentialError::MalformedHash);
    }

    Ok(pbkdf2::verify(ALGORITHM, iterations, &salt, password.as_bytes(), &expected).is_ok())
}
