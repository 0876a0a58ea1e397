// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Uploaded file handling: spool targets for documents and photos, QR image
//! rendering, and cleanup of partial artifacts on failed issuance.
//!
//! Filenames are collision-resistant: uploads get a millisecond timestamp
//! prefix, QR images combine the roll number with the same timestamp.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::Luma;
use qrcode::QrCode;

use crate::storage::StoragePaths;

/// URL prefix under which the public directory is served.
pub const PUBLIC_URL_PREFIX: &str = "/files";

/// Errors raised while storing uploads or rendering QR images.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("QR image write failed: {0}")]
    Image(#[from] image::ImageError),
}

/// A file placed under the public tree: its path on disk and the URL path
/// clients use to fetch it.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub disk_path: PathBuf,
    pub public_path: String,
}

/// Manager for the public file tree.
pub struct FileStore {
    paths: StoragePaths,
}

impl FileStore {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Create the public directory layout. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<(), FileError> {
        for dir in [
            self.paths.documents_dir(),
            self.paths.photos_dir(),
            self.paths.qrcodes_dir(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Spool target for an uploaded certificate document.
    pub fn document_target(&self, original_name: &str) -> StoredFile {
        let filename = unique_filename(original_name);
        StoredFile {
            disk_path: self.paths.document(&filename),
            public_path: format!("{PUBLIC_URL_PREFIX}/certificates/{filename}"),
        }
    }

    /// Spool target for an uploaded student photo.
    pub fn photo_target(&self, original_name: &str) -> StoredFile {
        let filename = unique_filename(original_name);
        StoredFile {
            disk_path: self.paths.photo(&filename),
            public_path: format!("{PUBLIC_URL_PREFIX}/imgs/{filename}"),
        }
    }

    /// Render a QR image of `content` next to the other issuance artifacts.
    pub fn render_qr(&self, content: &str, roll_number: &str) -> Result<StoredFile, FileError> {
        let filename = format!("{roll_number}-{}.png", Utc::now().timestamp_millis());
        let disk_path = self.paths.qrcode(&filename);

        let code = QrCode::new(content.as_bytes())?;
        let rendered = code
            .render::<Luma<u8>>()
            .min_dimensions(256, 256)
            .build();
        rendered.save(&disk_path)?;

        Ok(StoredFile {
            disk_path,
            public_path: format!("{PUBLIC_URL_PREFIX}/imgs/qrcodes/{filename}"),
        })
    }

    /// Root directory served under [`PUBLIC_URL_PREFIX`].
    pub fn public_root(&self) -> &Path {
        self.paths.public_root()
    }
}

/// Timestamp-prefixed filename with directories stripped and spaces replaced.
fn unique_filename(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    format!("{}-{}", Utc::now().timestamp_millis(), base.replace(' ', "_"))
}

/// Removes registered files on drop unless disarmed.
///
/// Issuance arms one of these with every artifact it creates; reaching the
/// end of the flow disarms it, and any early return (or future cancellation)
/// sweeps the partial files. Removal failures are logged only.
pub struct CleanupGuard {
    files: Vec<PathBuf>,
    armed: bool,
}

impl CleanupGuard {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            armed: true,
        }
    }

    /// Register a file for removal on failure.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    /// Keep the tracked files: the flow completed.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Default for CleanupGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        for path in &self.files {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove partial artifact");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_files() -> (FileStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path().join("data"), dir.path().join("public"));
        let files = FileStore::new(paths);
        files.initialize().unwrap();
        (files, dir)
    }

    #[test]
    fn initialize_creates_directories() {
        let (files, _dir) = test_files();
        assert!(files.public_root().join("certificates").is_dir());
        assert!(files.public_root().join("imgs/qrcodes").is_dir());
    }

    #[test]
    fn upload_targets_are_public_and_sanitized() {
        let (files, _dir) = test_files();

        let doc = files.document_target("final grade sheet.pdf");
        assert!(doc.public_path.starts_with("/files/certificates/"));
        assert!(doc.public_path.ends_with("-final_grade_sheet.pdf"));
        assert!(!doc.public_path.contains(' '));

        let photo = files.photo_target("../escape.png");
        assert!(photo.public_path.starts_with("/files/imgs/"));
        assert!(!photo.public_path.contains(".."));
    }

    #[test]
    fn qr_rendering_writes_a_png() {
        let (files, _dir) = test_files();

        let qr = files
            .render_qr(
                "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
                "R100",
            )
            .unwrap();

        assert!(qr.disk_path.exists());
        assert!(qr.public_path.starts_with("/files/imgs/qrcodes/R100-"));

        let header = fs::read(&qr.disk_path).unwrap();
        assert_eq!(&header[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn cleanup_guard_removes_tracked_files() {
        let (files, _dir) = test_files();
        let doc = files.document_target("doc.pdf");
        fs::write(&doc.disk_path, b"payload").unwrap();

        {
            let mut guard = CleanupGuard::new();
            guard.track(&doc.disk_path);
        }
        assert!(!doc.disk_path.exists());
    }

    #[test]
    fn disarmed_guard_keeps_files() {
        let (files, _dir) = test_files();
        let doc = files.document_target("doc.pdf");
        fs::write(&doc.disk_path, b"payload").unwrap();

        let mut guard = CleanupGuard::new();
        guard.track(&doc.disk_path);
        guard.disarm();

        assert!(doc.disk_path.exists());
    }
}
