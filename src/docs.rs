use serde::{Deserialize, Serialize};

/// A downloadable document discovered on the archive results listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRef {
    /// Direct download URL
    pub url: String,

    /// Display text of the link (the document description)
    pub text: String,

    /// Server-side filename from the hidden fileid input, when present
    pub filename_hint: Option<String>,
}

impl DocRef {
    /// Create a new document reference
    pub fn new(url: String, text: String, filename_hint: Option<String>) -> Self {
        Self {
            url,
            text,
            filename_hint,
        }
    }
}
