use std::ffi::c_void;

use thiserror::Error;

pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

/// Uploads interleaved vertex data, and optionally an index buffer, into
/// a fresh vertex array. Attributes take locations in the order they are
/// added, starting at 0.
pub struct GeometryBuilder<'a> {
    data: &'a [f32],
    attributes: Vec<VertexAttribute>,
    indices: Option<&'a [u32]>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: None,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn build(self) -> Result<Geometry, GeometryError> {
        let vertices = validate(self.data.len(), &self.attributes, self.indices)?;

        let stride: usize = self.attributes.iter().map(|a| a.size()).sum();

        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.data.len() * std::mem::size_of::<f32>()) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (stride * std::mem::size_of::<f32>()) as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                offset += attr.size();
                gl::EnableVertexAttribArray(i as u32);
            }
        }

        let ebo = self.indices.map(|indices| {
            let mut ebo = 0;

            // the element binding is part of the vertex array state, so
            // this has to happen while the array is still bound
            unsafe {
                gl::GenBuffers(1, (&mut ebo) as *mut u32);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    (indices.len() * std::mem::size_of::<u32>()) as isize,
                    indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );
            }

            ebo
        });

        unsafe {
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        let count = match self.indices {
            Some(indices) => indices.len(),
            None => vertices,
        };

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            count,
        })
    }
}

fn validate(
    data_len: usize,
    attributes: &[VertexAttribute],
    indices: Option<&[u32]>,
) -> Result<usize, GeometryError> {
    let stride: usize = attributes.iter().map(|a| a.size()).sum();

    if stride == 0 || data_len % stride != 0 {
        return Err(GeometryError::InvalidDataLength);
    }

    let vertices = data_len / stride;

    if let Some(indices) = indices {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(GeometryError::IndexOutOfRange { index, vertices });
        }
    }

    Ok(vertices)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("vertex data length is not a multiple of the attribute stride")]
    InvalidDataLength,
    #[error("index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    count: usize,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    /// Vertices for array draws, indices for indexed draws.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn indexed(&self) -> bool {
        self.ebo.is_some()
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = self.ebo {
                gl::DeleteBuffers(1, (&ebo) as *const u32);
            }
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_must_divide_data() {
        let attrs = [VertexAttribute::Vec3, VertexAttribute::Vec3];

        assert_eq!(validate(18, &attrs, None), Ok(3));
        assert_eq!(
            validate(17, &attrs, None),
            Err(GeometryError::InvalidDataLength)
        );
        assert_eq!(validate(0, &[], None), Err(GeometryError::InvalidDataLength));
    }

    #[test]
    fn indices_must_address_existing_vertices() {
        let attrs = [VertexAttribute::Vec3, VertexAttribute::Vec2];

        assert_eq!(validate(20, &attrs, Some(&[0, 1, 2, 2, 3, 0])), Ok(4));
        assert_eq!(
            validate(20, &attrs, Some(&[0, 1, 4])),
            Err(GeometryError::IndexOutOfRange {
                index: 4,
                vertices: 4
            })
        );
    }
}
