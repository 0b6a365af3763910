//! Image input for vision requests

use std::fs;
use std::path::Path;

use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Image bytes plus the MIME type sent alongside them
#[derive(Debug, Clone)]
pub struct ImageInput {
    data: Vec<u8>,
    mime_type: &'static str,
}

impl ImageInput {
    /// Read an image from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("Image {}", path.display())));
        }
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Wrap raw image bytes, sniffing the MIME type from the header
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidData("Image is empty".into()));
        }
        let mime_type = detect_mime_type(&data);
        Ok(Self { data, mime_type })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Standard base64 of the image bytes, as inline request payloads expect
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// `data:` URL for APIs that take images as URLs
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// SHA-256 of the image bytes (hex)
    pub fn content_hash(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }
}

/// Detect the MIME type from magic bytes, defaulting to JPEG
fn detect_mime_type(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if data.starts_with(b"GIF8") {
        "image/gif"
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(
            detect_mime_type(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A]),
            "image/png"
        );
        assert_eq!(detect_mime_type(b"GIF89a..."), "image/gif");
        assert_eq!(detect_mime_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(detect_mime_type(b"unknown"), "image/jpeg");
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(matches!(
            ImageInput::from_bytes(Vec::new()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = ImageInput::from_path(Path::new("/definitely/not/here.jpg"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_from_path_and_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = ImageInput::from_path(&path).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.to_base64(), "iVBORw==");
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_content_hash() {
        let image = ImageInput::from_bytes(b"abc".to_vec()).unwrap();
        assert_eq!(
            image.content_hash(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
