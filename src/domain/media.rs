//! Media references used during composition and publishing.

use serde::{Deserialize, Serialize};

/// A candidate image returned by the media source.
///
/// Byte content is not held on the ref; it is fetched lazily through
/// the media source when the image is actually uploaded. Within a
/// search result list, index 0 is the featured image and the rest are
/// inline images in fetch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Source URL of the full-size image
    pub url: String,

    /// Pixel width
    pub width: u32,

    /// Pixel height
    pub height: u32,

    /// Short description (search keyword when the source has none)
    pub description: String,

    /// Photographer/source attribution
    pub attribution: String,
}

/// An image that has been uploaded to the publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Publisher-assigned media identifier
    pub media_id: u64,

    /// URL the bytes came from
    pub source_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ref_roundtrip() {
        let image = ImageRef {
            url: "https://images.example.com/a.jpg".to_string(),
            width: 1600,
            height: 900,
            description: "organic garden".to_string(),
            attribution: "Jane Doe".to_string(),
        };

        let json = serde_json::to_string(&image).unwrap();
        let back: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}
