// Vision models and media type sniffing
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Image formats accepted by the Claude vision models.
///
/// Serializes as its MIME type, which is what the Messages API expects
/// in `source.media_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/webp")]
    WebP,
}

impl MediaType {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::WebP => "image/webp",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG";
const JFIF_MARKER: &[u8] = b"JFIF";
const JFIF_WINDOW: usize = 64;

/// Guess the media type of an image from its leading bytes.
///
/// Checked in order: PNG signature, a `JFIF` marker anywhere in the first
/// 64 bytes, then a `RIFF....WEBP` header. Anything else, including inputs
/// too short for a check, is reported as JPEG. The JFIF test is a loose
/// heuristic and does not validate JPEG structure.
pub fn detect_media_type(data: &[u8]) -> MediaType {
    if data.starts_with(PNG_MAGIC) {
        MediaType::Png
    } else if data[..data.len().min(JFIF_WINDOW)]
        .windows(JFIF_MARKER.len())
        .any(|w| w == JFIF_MARKER)
    {
        MediaType::Jpeg
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(&b"WEBP"[..]) {
        MediaType::WebP
    } else {
        // Unknown: assume JPEG
        MediaType::Jpeg
    }
}
