// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Path layout for the data directory and the public file tree.
//!
//! ```text
//! {data}/
//!   certledger.redb     # embedded primary store
//!   student_db.json     # JSON mirror (secondary store)
//! {public}/
//!   certificates/       # uploaded PDF documents
//!   imgs/               # uploaded photos
//!   imgs/qrcodes/       # rendered QR images
//! ```

use std::path::{Path, PathBuf};

/// Path utilities for the store and public file layout.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    data_root: PathBuf,
    public_root: PathBuf,
}

impl StoragePaths {
    pub fn new(data_root: impl AsRef<Path>, public_root: impl AsRef<Path>) -> Self {
        Self {
            data_root: data_root.as_ref().to_path_buf(),
            public_root: public_root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for persistent store files.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Root directory served statically under `/files`.
    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Path of the embedded database file.
    pub fn database_file(&self) -> PathBuf {
        self.data_root.join("certledger.redb")
    }

    /// Path of the JSON mirror file.
    pub fn mirror_file(&self) -> PathBuf {
        self.data_root.join("student_db.json")
    }

    // ========== Public File Paths ==========

    /// Directory holding uploaded certificate documents.
    pub fn documents_dir(&self) -> PathBuf {
        self.public_root.join("certificates")
    }

    /// Directory holding uploaded student photos.
    pub fn photos_dir(&self) -> PathBuf {
        self.public_root.join("imgs")
    }

    /// Directory holding rendered QR images.
    pub fn qrcodes_dir(&self) -> PathBuf {
        self.photos_dir().join("qrcodes")
    }

    pub fn document(&self, filename: &str) -> PathBuf {
        self.documents_dir().join(filename)
    }

    pub fn photo(&self, filename: &str) -> PathBuf {
        self.photos_dir().join(filename)
    }

    pub fn qrcode(&self, filename: &str) -> PathBuf {
        self.qrcodes_dir().join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_correctly() {
        let paths = StoragePaths::new("/var/lib/certledger", "/srv/public");

        assert_eq!(
            paths.database_file(),
            PathBuf::from("/var/lib/certledger/certledger.redb")
        );
        assert_eq!(
            paths.mirror_file(),
            PathBuf::from("/var/lib/certledger/student_db.json")
        );
        assert_eq!(
            paths.document("doc.pdf"),
            PathBuf::from("/srv/public/certificates/doc.pdf")
        );
        assert_eq!(paths.photo("p.png"), PathBuf::from("/srv/public/imgs/p.png"));
        assert_eq!(
            paths.qrcode("q.png"),
            PathBuf::from("/srv/public/imgs/qrcodes/q.png")
        );
    }
}
