//! Media composition — interleaving images and a video embed into
//! generated body text at computed offsets.
//!
//! The offsets are computed against the progressively-growing string:
//! each inline insertion sees the body as mutated by prior insertions,
//! so visual spacing is approximate rather than exact fractional
//! placement of the original text. That behavior is an algorithmic
//! contract; downstream output depends on it.

use crate::domain::UploadedImage;

/// Merge uploaded images and an optional video embed into body text.
///
/// `images[0]` becomes the featured image, marked at the very start of
/// the output. Each remaining image i (1-indexed among the remainder,
/// count = len - 1) is inserted at `len(body) / count * i`, where
/// `len(body)` is the current length of the (already mutated) body.
/// The video embed, when present, lands at the midpoint of the
/// image-modified body. Pure over its inputs: the same (body, images,
/// video) tuple always yields the same output string.
pub fn compose(body: &str, images: &[UploadedImage], video_url: Option<&str>) -> String {
    let mut body = body.to_string();

    let featured = images
        .first()
        .map(|image| format!("[featured-image id=\"{}\"]\n", image.media_id));

    let inline = images.get(1..).unwrap_or_default();
    let count = inline.len();

    for (index, image) in inline.iter().enumerate() {
        let marker = format!("\n[gallery ids=\"{}\"]\n", image.media_id);
        let offset = insertion_offset(&body, body.len() / count * (index + 1));
        body.insert_str(offset, &marker);
    }

    if let Some(url) = video_url {
        let marker = format!("\n[embed]{url}[/embed]\n");
        let offset = insertion_offset(&body, body.len() / 2);
        body.insert_str(offset, &marker);
    }

    match featured {
        Some(prefix) => prefix + &body,
        None => body,
    }
}

/// Clamp an offset into `[0, len]` and snap back to a char boundary
fn insertion_offset(body: &str, offset: usize) -> usize {
    let mut offset = offset.min(body.len());
    while !body.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
