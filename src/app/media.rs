use crate::app::registry::media_allowance;
use crate::domain::draft::{DraftField, FieldError, PostDraft};
use crate::domain::media::MediaKind;
use crate::domain::post::PostType;

pub const MAX_IMAGE_SIZE_MB: u64 = 2;
pub const MAX_VIDEO_SIZE_MB: u64 = 20;

const BYTES_PER_MB: u64 = 1024 * 1024;

pub fn max_size_mb(kind: MediaKind) -> u64 {
    match kind {
        MediaKind::Image => MAX_IMAGE_SIZE_MB,
        MediaKind::Video => MAX_VIDEO_SIZE_MB,
    }
}

pub fn max_size_bytes(kind: MediaKind) -> u64 {
    max_size_mb(kind) * BYTES_PER_MB
}

/// Checks attachment sizes and whether `post_type` accepts each attached kind.
pub fn check_media(draft: &PostDraft, post_type: PostType) -> Result<(), Vec<FieldError>> {
    let allowance = media_allowance(post_type);
    let mut errors = Vec::new();

    for kind in [MediaKind::Image, MediaKind::Video] {
        let Some(attachment) = draft.attachment(kind) else {
            continue;
        };
        let field = DraftField::for_media(kind);

        if attachment.size() > max_size_bytes(kind) {
            errors.push(FieldError::new(
                field,
                format!(
                    "{} size should not exceed {}MB",
                    kind.label(),
                    max_size_mb(kind)
                ),
            ));
        }

        if !allowance.allows(kind) {
            errors.push(FieldError::new(
                field,
                format!(
                    "{} uploads are not allowed for {} posts",
                    kind.label(),
                    post_type.label().to_lowercase()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
