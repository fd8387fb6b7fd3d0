use std::ffi::c_void;

use gl::types::{GLenum, GLint};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
    Rgb8,
}

impl TextureFormat {
    pub fn channels(&self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rgb8 => 3,
        }
    }

    fn gl_format(&self) -> GLenum {
        match self {
            TextureFormat::Rgba8 => gl::RGBA,
            TextureFormat::Rgb8 => gl::RGB,
        }
    }

    fn gl_internal_format(&self) -> GLint {
        match self {
            TextureFormat::Rgba8 => gl::RGBA8 as GLint,
            TextureFormat::Rgb8 => gl::RGB8 as GLint,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

impl TextureWrap {
    fn gl_enum(self) -> GLint {
        match self {
            TextureWrap::Repeat => gl::REPEAT as GLint,
            TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE as GLint,
        }
    }
}

pub struct Texture2D {
    id: u32,
}

impl Texture2D {
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        format: TextureFormat,
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> Result<Self, TextureError> {
        if expected_len(width, height, format) != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let (min_filter, mag_filter) = match filter {
            TextureFilter::Nearest => (gl::NEAREST, gl::NEAREST),
            TextureFilter::Linear => (gl::LINEAR_MIPMAP_LINEAR, gl::LINEAR),
        };

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap.gl_enum());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap.gl_enum());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min_filter as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag_filter as GLint);

            // rows of 3-channel data are not 4-byte aligned for every width
            if format.channels() == 3 {
                gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            }

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.gl_internal_format(),
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                gl::UNSIGNED_BYTE,
                data.as_ptr() as *const c_void,
            );

            if format.channels() == 3 {
                gl::PixelStorei(gl::UNPACK_ALIGNMENT, 4);
            }

            gl::GenerateMipmap(gl::TEXTURE_2D);
        }

        Ok(Self { id })
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture data length does not match dimensions and format")]
    InvalidSrcLength,
}

fn expected_len(width: u32, height: u32, format: TextureFormat) -> usize {
    width as usize * height as usize * format.channels()
}

/// Swaps pixel rows top-to-bottom. Image files put row 0 at the top while
/// GL puts it at the bottom; decoded textures and `ReadPixels` captures
/// both pass through here.
pub fn flip_vertically(data: &mut [u8], row_len: usize) {
    if row_len == 0 {
        return;
    }

    let rows = data.len() / row_len;

    for y in 0..rows / 2 {
        let (head, tail) = data.split_at_mut((rows - 1 - y) * row_len);
        head[y * row_len..(y + 1) * row_len].swap_with_slice(&mut tail[..row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_length_validation() {
        assert_eq!(expected_len(4, 2, TextureFormat::Rgba8), 32);
        assert_eq!(expected_len(5, 3, TextureFormat::Rgb8), 45);
    }

    #[test]
    fn flip_swaps_rows_in_place() {
        let mut two_rows = vec![1, 1, 1, 2, 2, 2];
        flip_vertically(&mut two_rows, 3);
        assert_eq!(two_rows, [2, 2, 2, 1, 1, 1]);

        let mut three_rows = vec![1, 2, 3];
        flip_vertically(&mut three_rows, 1);
        assert_eq!(three_rows, [3, 2, 1]);

        let mut empty: Vec<u8> = Vec::new();
        flip_vertically(&mut empty, 4);
        assert!(empty.is_empty());
    }
}
