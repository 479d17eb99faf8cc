//! Photo upload validation: size limit, MIME allow-list, and a magic-byte
//! check that the payload really is the image type it claims to be.

use image::ImageFormat;

use crate::error::CoreError;
use crate::types::DbId;

/// Largest accepted photo payload (5 MiB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Extra request-body allowance for multipart framing around the file.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";

/// MIME types accepted for client and architect photos.
pub const ALLOWED_MIME_TYPES: &[&str] = &[MIME_JPEG, MIME_PNG, MIME_WEBP];

/// A photo that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPhoto {
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Validate an uploaded photo.
///
/// `content_type` is the MIME type declared by the multipart field. The
/// declared type must be allowed and must agree with the sniffed format.
pub fn validate_photo(
    content_type: Option<&str>,
    data: &[u8],
) -> Result<ValidatedPhoto, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if data.len() > MAX_PHOTO_BYTES {
        return Err(CoreError::Validation(format!(
            "Photo is {} bytes; the maximum is {MAX_PHOTO_BYTES} bytes",
            data.len()
        )));
    }

    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .unwrap_or_default();

    let photo = match declared.as_str() {
        MIME_JPEG => ValidatedPhoto {
            content_type: MIME_JPEG,
            extension: "jpg",
        },
        MIME_PNG => ValidatedPhoto {
            content_type: MIME_PNG,
            extension: "png",
        },
        MIME_WEBP => ValidatedPhoto {
            content_type: MIME_WEBP,
            extension: "webp",
        },
        other => {
            return Err(CoreError::Validation(format!(
                "Unsupported photo type '{other}'. Allowed: {ALLOWED_MIME_TYPES:?}"
            )))
        }
    };

    let sniffed = image::guess_format(data).ok();
    let matches = matches!(
        (photo.content_type, sniffed),
        (MIME_JPEG, Some(ImageFormat::Jpeg))
            | (MIME_PNG, Some(ImageFormat::Png))
            | (MIME_WEBP, Some(ImageFormat::WebP))
    );
    if !matches {
        return Err(CoreError::Validation(format!(
            "File content does not look like {}",
            photo.content_type
        )));
    }

    Ok(photo)
}

/// Build the blob-store key for an entity photo: `{entity}/{id}/{unique}.{ext}`.
pub fn photo_key(entity: &str, id: DbId, unique: &str, extension: &str) -> String {
    format!("{entity}/{id}/{unique}.{extension}")
}
