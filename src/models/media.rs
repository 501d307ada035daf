//! Media reference types for the external media store

use serde::{Deserialize, Serialize};

/// Storage kind in the external store. Images may be transformed by the
/// store; documents are stored byte-exact under the raw path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Document,
}

impl MediaKind {
    /// Resource path segment used by the store API
    pub fn storage_path(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Document => "raw",
        }
    }
}

/// Pointer to a binary asset held by the external media store.
/// The public id is opaque; the kind selects the storage path it was
/// uploaded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub public_id: String,
}

impl MediaRef {
    pub fn image(public_id: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            public_id: public_id.into(),
        }
    }

    pub fn document(public_id: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Document,
            public_id: public_id.into(),
        }
    }
}

/// A binary attachment extracted from a multipart submission
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field name the file arrived under
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}
