// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Streaming SHA-256 content hashing for uploaded documents.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Prefix applied to a content digest to form the on-chain identifier.
pub const HASH_PREFIX: &str = "0x";

/// Total textual length of an on-chain identifier: `0x` + 64 hex chars.
pub const IDENTIFIER_LEN: usize = 66;

/// Compute the lowercase hex SHA-256 digest of a file, reading it in chunks.
///
/// The whole file is never held in memory. Fails if the file cannot be
/// opened or a read error occurs mid-stream.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Form the on-chain identifier for a document digest.
pub fn to_identifier(digest_hex: &str) -> String {
    format!("{HASH_PREFIX}{digest_hex}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file_with(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn same_bytes_same_digest() {
        let a = temp_file_with(b"certificate payload");
        let b = temp_file_with(b"certificate payload");

        let da = sha256_file(a.path()).unwrap();
        let db = sha256_file(b.path()).unwrap();
        assert_eq!(da, db);
        assert_eq!(da.len(), 64);
        assert!(da.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_bytes_different_digest() {
        let a = temp_file_with(b"payload one");
        let b = temp_file_with(b"payload two");

        assert_ne!(sha256_file(a.path()).unwrap(), sha256_file(b.path()).unwrap());
    }

    #[test]
    fn known_vector() {
        // sha256("abc")
        let f = temp_file_with(b"abc");
        assert_eq!(
            sha256_file(f.path()).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = sha256_file(Path::new("/definitely/not/here.pdf"));
        assert!(result.is_err());
    }

    #[test]
    fn identifier_has_prefix_and_length() {
        let f = temp_file_with(b"abc");
        let id = to_identifier(&sha256_file(f.path()).unwrap());
        assert!(id.starts_with(HASH_PREFIX));
        assert_eq!(id.len(), IDENTIFIER_LEN);
    }
}
