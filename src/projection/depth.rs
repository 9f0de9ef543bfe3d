use crate::error::{Error, Result};
use crate::models::Grid;
use image::DynamicImage;
use std::path::Path;

/// Raw depth samples in sensor ticks, row-major
pub type DepthImage = Grid<u16>;

impl DepthImage {
    /// Wrap raw samples, checking `data.len() == width * height`
    pub fn from_raw(width: usize, height: usize, data: Vec<u16>) -> Result<Self> {
        Grid::from_vec(width, height, data)
    }
}

/// Read a depth image from disk
///
/// The format is detected from the file contents, not the extension.
///
/// Accepts 16-bit grayscale (the usual depth PNG layout) and 8-bit grayscale,
/// which is widened. Color images are rejected rather than converted.
pub fn load_depth_image<P: AsRef<Path>>(path: P) -> Result<DepthImage> {
    let path = path.as_ref();
    log::debug!("loading depth image {}", path.display());
    let bytes = std::fs::read(path)?;
    decode_depth_image(&bytes)
}

/// Decode a depth image from an in-memory encoded buffer
pub fn decode_depth_image(bytes: &[u8]) -> Result<DepthImage> {
    let img = image::load_from_memory(bytes)?;
    from_dynamic(img)
}

fn from_dynamic(img: DynamicImage) -> Result<DepthImage> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage);
    }

    let data = match img {
        DynamicImage::ImageLuma16(buf) => buf.into_raw(),
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(u16::from).collect(),
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "expected single-channel depth, got {:?}",
                other.color()
            )));
        }
    };

    log::trace!("decoded {}x{} depth image", width, height);
    DepthImage::from_raw(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};
    use std::io::Cursor;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_16bit_png() {
        let samples: Vec<u16> = (0..12).map(|i| i * 1000).collect();
        let buf: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(4, 3, samples.clone()).unwrap();
        let bytes = encode_png(DynamicImage::ImageLuma16(buf));

        let depth = decode_depth_image(&bytes).unwrap();
        assert_eq!(depth.width(), 4);
        assert_eq!(depth.height(), 3);
        assert_eq!(depth.as_slice(), samples.as_slice());
    }

    #[test]
    fn test_decode_rejects_rgb() {
        let buf: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(2, 2);
        let bytes = encode_png(DynamicImage::ImageRgb8(buf));
        assert!(matches!(
            decode_depth_image(&bytes),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_depth_image(b"not an image"),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_filled() {
        let depth = DepthImage::filled(5, 4, 7000);
        assert_eq!(depth.width(), 5);
        assert_eq!(depth.height(), 4);
        assert!(depth.as_slice().iter().all(|&d| d == 7000));
    }
}
