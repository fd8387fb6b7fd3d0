use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use gl_kit::texture::{flip_vertically, TextureFormat};

/// A decoded texture image, rows ordered bottom-up the way GL expects.
#[derive(Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
}

/// Loads an 8-bit RGB or RGBA PNG, ready for upload with
/// [`gl_kit::texture::Texture2D`].
pub fn load_png(path: impl AsRef<Path>) -> Result<Image, AssetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.to_owned(),
        source,
    })?;

    decode(file)
}

fn decode(reader: impl Read) -> Result<Image, AssetError> {
    let decoder = png::Decoder::new(reader);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    let format = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => TextureFormat::Rgba8,
        (png::ColorType::Rgb, png::BitDepth::Eight) => TextureFormat::Rgb8,
        (color_type, bit_depth) => {
            return Err(AssetError::UnsupportedFormat {
                color_type,
                bit_depth,
            })
        }
    };

    buf.truncate(info.buffer_size());

    // PNG stores rows top-down, GL samples them bottom-up
    flip_vertically(&mut buf, info.width as usize * format.channels());

    Ok(Image {
        width: info.width,
        height: info.height,
        format,
        data: buf,
    })
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot open texture {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("broken PNG data: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("unsupported PNG format {color_type:?}/{bit_depth:?}, only 8-bit RGB and RGBA load")]
    UnsupportedFormat {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();

        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();

        out
    }

    #[test]
    fn decodes_rgba_and_flips_rows() {
        // top row red, bottom row blue
        #[rustfmt::skip]
        let pixels = [
            255, 0, 0, 255,   255, 0, 0, 255,
            0, 0, 255, 255,   0, 0, 255, 255,
        ];

        let png_data = encode(2, 2, png::ColorType::Rgba, &pixels);
        let image = decode(&png_data[..]).unwrap();

        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.format, TextureFormat::Rgba8);
        // blue row first now
        assert_eq!(&image.data[..4], &[0, 0, 255, 255]);
        assert_eq!(&image.data[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn decodes_rgb() {
        let png_data = encode(1, 2, png::ColorType::Rgb, &[10, 20, 30, 40, 50, 60]);
        let image = decode(&png_data[..]).unwrap();

        assert_eq!(image.format, TextureFormat::Rgb8);
        assert_eq!(image.data, [40, 50, 60, 10, 20, 30]);
    }

    #[test]
    fn rejects_grayscale() {
        let png_data = encode(2, 1, png::ColorType::Grayscale, &[0, 255]);

        assert!(matches!(
            decode(&png_data[..]),
            Err(AssetError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_png("textures/no_such_file.png").unwrap_err();

        assert!(err.to_string().contains("no_such_file.png"));
    }
}
