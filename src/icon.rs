//! Tray icon resource loading
//!
//! The icon is read fully into memory once at startup. PNG files are decoded
//! to RGBA here; `.ico` containers are only checked and left to the tray,
//! which loads them natively. A missing or broken icon is not fatal; the tray
//! just shows no image.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("Failed to read icon {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode icon: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("Unsupported icon color type {0:?} (expected RGB, RGBA or grayscale)")]
    UnsupportedColorType(png::ColorType),

    #[error("Unrecognized icon format (expected PNG or ICO)")]
    UnknownFormat,
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Image handed to the tray
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayImage {
    /// Decoded pixels, 8-bit RGBA rows top to bottom
    Rgba {
        rgba: Vec<u8>,
        width: u32,
        height: u32,
    },
    /// Windows icon container, loaded by the tray from this path
    #[cfg_attr(not(windows), allow(dead_code))]
    Ico(PathBuf),
}

pub fn load(path: &Path) -> Result<TrayImage, IconError> {
    let bytes = std::fs::read(path).map_err(|source| IconError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.starts_with(&PNG_SIGNATURE) {
        let image = decode_png(&bytes)?;
        if let TrayImage::Rgba { width, height, .. } = &image {
            info!(path = %path.display(), width, height, "Loaded PNG tray icon");
        }
        return Ok(image);
    }
    if let Some(count) = ico_image_count(&bytes) {
        info!(path = %path.display(), images = count, "Loaded ICO tray icon");
        return Ok(TrayImage::Ico(path.to_path_buf()));
    }
    Err(IconError::UnknownFormat)
}

/// Number of images in an ICONDIR header, `None` unless it is a usable icon file
fn ico_image_count(bytes: &[u8]) -> Option<u16> {
    let header = bytes.get(..6)?;
    let reserved = u16::from_le_bytes([header[0], header[1]]);
    let kind = u16::from_le_bytes([header[2], header[3]]);
    let count = u16::from_le_bytes([header[4], header[5]]);
    // Each directory entry is 16 bytes
    let entries_fit = bytes.len() >= 6 + usize::from(count) * 16;
    (reserved == 0 && kind == 1 && count > 0 && entries_fit).then_some(count)
}

pub fn decode_png(bytes: &[u8]) -> Result<TrayImage, IconError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palettes and 16-bit channels become plain 8-bit samples
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let pixels = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
            for chunk in pixels.chunks_exact(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(0xFF);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => pixels
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        png::ColorType::Grayscale => pixels.iter().flat_map(|&g| [g, g, g, 0xFF]).collect(),
        other => return Err(IconError::UnsupportedColorType(other)),
    };

    Ok(TrayImage::Rgba {
        rgba,
        width: info.width,
        height: info.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    fn rgba_of(image: TrayImage) -> Vec<u8> {
        match image {
            TrayImage::Rgba { rgba, .. } => rgba,
            TrayImage::Ico(path) => panic!("expected decoded pixels, got ICO {path:?}"),
        }
    }

    /// Single-image ICONDIR header plus one directory entry
    fn ico_header() -> Vec<u8> {
        let mut bytes = vec![0, 0, 1, 0, 1, 0];
        bytes.extend_from_slice(&[16, 16, 0, 0, 1, 0, 32, 0]);
        bytes.extend_from_slice(&40u32.to_le_bytes());
        bytes.extend_from_slice(&22u32.to_le_bytes());
        bytes
    }

    #[test]
    fn test_decode_rgb_adds_opaque_alpha() {
        let bytes = encode(2, 1, png::ColorType::Rgb, &[10, 20, 30, 40, 50, 60]);
        let image = decode_png(&bytes).unwrap();
        assert_eq!(
            image,
            TrayImage::Rgba {
                rgba: vec![10, 20, 30, 255, 40, 50, 60, 255],
                width: 2,
                height: 1,
            }
        );
    }

    #[test]
    fn test_decode_rgba_is_unchanged() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let bytes = encode(1, 2, png::ColorType::Rgba, &data);
        assert_eq!(rgba_of(decode_png(&bytes).unwrap()), data.to_vec());
    }

    #[test]
    fn test_decode_grayscale_expands() {
        let bytes = encode(2, 1, png::ColorType::Grayscale, &[0, 200]);
        let rgba = rgba_of(decode_png(&bytes).unwrap());
        assert_eq!(rgba, vec![0, 0, 0, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(decode_png(b"not a png"), Err(IconError::Decode(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("icon.ico")).unwrap_err();
        assert!(matches!(err, IconError::Read { .. }));
    }

    #[test]
    fn test_load_png_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, encode(1, 1, png::ColorType::Rgba, &[9, 8, 7, 6])).unwrap();
        assert_eq!(rgba_of(load(&path).unwrap()), vec![9, 8, 7, 6]);
    }

    #[test]
    fn test_load_ico_is_left_to_the_tray() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.ico");
        std::fs::write(&path, ico_header()).unwrap();
        assert_eq!(load(&path).unwrap(), TrayImage::Ico(path));
    }

    #[test]
    fn test_format_follows_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.ico");
        std::fs::write(&path, encode(1, 1, png::ColorType::Rgba, &[1, 2, 3, 4])).unwrap();
        assert_eq!(rgba_of(load(&path).unwrap()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_load_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.ico");
        std::fs::write(&path, b"GIF89a").unwrap();
        assert!(matches!(load(&path), Err(IconError::UnknownFormat)));
    }

    #[test]
    fn test_ico_header_checks() {
        assert_eq!(ico_image_count(&ico_header()), Some(1));
        // Cursor files share the layout with type 2
        let mut cursor = ico_header();
        cursor[2] = 2;
        assert_eq!(ico_image_count(&cursor), None);
        // Directory promises more entries than the file holds
        let mut truncated = ico_header();
        truncated[4] = 3;
        assert_eq!(ico_image_count(&truncated), None);
        assert_eq!(ico_image_count(&[0, 0, 1]), None);
    }
}
