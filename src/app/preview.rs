use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::domain::media::{Attachment, MediaKind};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Identifies one attach/clear of a media slot. Only the newest ticket per
/// kind may install a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    pub kind: MediaKind,
    generation: u64,
}

#[derive(Debug, Default, Clone)]
struct Slot {
    generation: u64,
    data_url: Option<String>,
}

/// Preview data URLs for the image and video slots of a form.
#[derive(Debug, Default, Clone)]
pub struct Previews {
    image: Slot,
    video: Slot,
}

impl Previews {
    fn slot(&self, kind: MediaKind) -> &Slot {
        match kind {
            MediaKind::Image => &self.image,
            MediaKind::Video => &self.video,
        }
    }

    fn slot_mut(&mut self, kind: MediaKind) -> &mut Slot {
        match kind {
            MediaKind::Image => &mut self.image,
            MediaKind::Video => &mut self.video,
        }
    }

    /// Starts a new selection for `kind`, superseding any pending one.
    pub fn begin(&mut self, kind: MediaKind) -> PreviewTicket {
        let slot = self.slot_mut(kind);
        slot.generation += 1;
        slot.data_url = None;
        PreviewTicket {
            kind,
            generation: slot.generation,
        }
    }

    /// Installs a finished conversion. Returns false when the ticket is stale.
    pub fn apply(&mut self, ticket: PreviewTicket, data_url: String) -> bool {
        let slot = self.slot_mut(ticket.kind);
        if slot.generation != ticket.generation {
            tracing::debug!(kind = %ticket.kind, "discarding stale preview");
            return false;
        }
        slot.data_url = Some(data_url);
        true
    }

    pub fn get(&self, kind: MediaKind) -> Option<&str> {
        self.slot(kind).data_url.as_deref()
    }

    pub fn reset(&mut self) {
        self.begin(MediaKind::Image);
        self.begin(MediaKind::Video);
    }
}

/// Encodes an attachment as a `data:` URL for previewing.
pub async fn to_data_url(attachment: &Attachment) -> Result<String> {
    let content_type = attachment.content_type.clone();
    let bytes = attachment.bytes.clone();
    let encoded = tokio::task::spawn_blocking(move || STANDARD.encode(&bytes))
        .await
        .map_err(|err| anyhow!("preview encoding task failed: {}", err))?;
    Ok(format!("data:{};base64,{}", content_type, encoded))
}

/// Reads a file from disk into an attachment, working out its MIME type.
pub async fn load_attachment(path: impl AsRef<Path>) -> Result<Attachment> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = detect_content_type(&file_name, &bytes);
    Ok(Attachment::new(file_name, content_type, bytes))
}

pub fn detect_content_type(file_name: &str, bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    let content_type = match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => FALLBACK_CONTENT_TYPE,
    };
    content_type.to_string()
}

/// Best guess at which slot a file belongs in.
pub fn kind_of(content_type: &str) -> Option<MediaKind> {
    if content_type.starts_with("image/") {
        Some(MediaKind::Image)
    } else if content_type.starts_with("video/") {
        Some(MediaKind::Video)
    } else {
        None
    }
}
