use std::ffi::c_void;

use crate::geometry::Geometry;
use crate::program::Program;
use crate::texture::flip_vertically;

/// Fixed global state applied once after context creation. Defaults match
/// a typical 3D setup: depth testing, CCW back-face culling and alpha
/// blending all on, filled polygons.
pub struct RenderOptions {
    pub depth_test: bool,
    pub backface_culling: bool,
    pub alpha_blending: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            depth_test: true,
            backface_culling: true,
            alpha_blending: true,
        }
    }
}

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn apply_options(&self, options: &RenderOptions) {
        unsafe {
            if options.depth_test {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }

            if options.backface_culling {
                gl::Enable(gl::CULL_FACE);
                gl::CullFace(gl::BACK);
                gl::FrontFace(gl::CCW);
            } else {
                gl::Disable(gl::CULL_FACE);
            }

            if options.alpha_blending {
                gl::Enable(gl::BLEND);
                gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            } else {
                gl::Disable(gl::BLEND);
            }

            gl::PolygonMode(gl::FRONT_AND_BACK, gl::FILL);
        }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        let p_id = program.id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }

        unsafe {
            gl::BindVertexArray(geometry.vao());

            if geometry.indexed() {
                gl::DrawElements(
                    gl::TRIANGLES,
                    geometry.count() as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                );
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, geometry.count() as i32);
            }
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    /// Clears color, depth and stencil.
    pub fn clear(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT);
        }
    }

    /// Reads the drawn frame back as tightly packed RGBA rows, top-down.
    /// Call after drawing and before the buffer swap.
    pub fn read_pixels(&self, width: u32, height: u32) -> Vec<u8> {
        let row_len = width as usize * 4;
        let mut buf = vec![0_u8; row_len * height as usize];

        unsafe {
            gl::ReadPixels(
                0,
                0,
                width as i32,
                height as i32,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                buf.as_mut_ptr() as *mut c_void,
            );
        }

        flip_vertically(&mut buf, row_len);

        buf
    }
}
