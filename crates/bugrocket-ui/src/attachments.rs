//! Staging of dropped files as inline attachments.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bugrocket_types::message::Attachment;

/// Build an attachment carrying `bytes` as a base64 data URI.
///
/// A missing mime type is guessed from the file extension. Only images are
/// accepted; the error is the text shown to the user.
pub fn encode_attachment(name: &str, mime: &str, bytes: &[u8]) -> Result<Attachment, String> {
    let mime = if mime.is_empty() { guess_mime(name) } else { mime };
    let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
    let attachment = Attachment::new(name, mime, data_uri);
    if !attachment.is_image() {
        return Err(format!("{} is not an image", name));
    }
    Ok(attachment)
}

fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
