//! # Photo Attachments
//!
//! Zero or more photos can be attached to a session record. The attachment
//! row carries both the system-generated stored filename (collision-free,
//! used on disk and in serving URLs) and the user-supplied original filename
//! (display only, never trusted as a path).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Upper bound on a stored photo, in bytes (5 MiB).
///
/// Enforced after the bytes are written; a violation deletes the
/// just-written file so no oversized blob survives.
pub const MAX_PHOTO_BYTES: i64 = 5 * 1024 * 1024;

/// File extensions accepted for photo uploads.
pub const ALLOWED_PHOTO_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Extract the extension of `filename` if it is one of the allowed image
/// types. Matching is case-insensitive; the returned extension is lowercase.
pub fn allowed_photo_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_PHOTO_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// One photo attached to a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PhotoAttachment {
    pub id: Uuid,
    /// Owning session. Deleting the session deletes all its attachments and
    /// their backing files.
    pub session_id: Uuid,
    /// System-generated stored filename, unique across all attachments.
    pub filename: String,
    /// User-supplied name, kept for display only.
    pub original_filename: String,
    /// Size of the stored bytes.
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_extensions() {
        assert_eq!(allowed_photo_extension("team.png").as_deref(), Some("png"));
        assert_eq!(allowed_photo_extension("team.JPG").as_deref(), Some("jpg"));
        assert_eq!(
            allowed_photo_extension("a.b.jpeg").as_deref(),
            Some("jpeg")
        );
        assert_eq!(allowed_photo_extension("x.GIF").as_deref(), Some("gif"));
    }

    #[test]
    fn rejects_other_extensions() {
        assert_eq!(allowed_photo_extension("report.pdf"), None);
        assert_eq!(allowed_photo_extension("script.sh"), None);
        assert_eq!(allowed_photo_extension("noextension"), None);
        assert_eq!(allowed_photo_extension(""), None);
    }

    #[test]
    fn extension_is_taken_after_the_last_dot() {
        assert_eq!(allowed_photo_extension("archive.png.exe"), None);
        assert_eq!(
            allowed_photo_extension("photo.final.png").as_deref(),
            Some("png")
        );
    }
}
