use std::ffi::{c_char, CString, NulError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use cgmath::Matrix4;
use gl::types::{GLenum, GLint, GLuint};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// One compiled shader stage. The driver object is deleted on drop, so a
/// stage that outlived a failed build does not leak.
pub struct Shader {
    id: GLuint,
}

impl Shader {
    pub fn compile(stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let source = CString::new(source)?;

        let id = unsafe { gl::CreateShader(stage.gl_enum()) };
        let shader = Self { id };

        let mut success: GLint = 0;

        unsafe {
            gl::ShaderSource(
                shader.id,
                1,
                (&source.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );
            gl::CompileShader(shader.id);
            gl::GetShaderiv(shader.id, gl::COMPILE_STATUS, (&mut success) as *mut GLint);
        }

        if success != 1 {
            return Err(ShaderError::Compile {
                stage,
                log: shader_info_log(shader.id),
            });
        }

        Ok(shader)
    }

    /// Reads the whole file as one compilation unit and compiles it.
    pub fn from_file(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let source = read_source(path.as_ref())?;

        Self::compile(stage, &source)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) }
    }
}

/// Text of one stage, or the file it will be read from at build time.
enum ShaderSource {
    Text(String),
    File(PathBuf),
}

impl ShaderSource {
    fn compile(self, stage: ShaderStage) -> Result<Shader, ShaderError> {
        match self {
            ShaderSource::Text(text) => Shader::compile(stage, &text),
            ShaderSource::File(path) => Shader::from_file(stage, path),
        }
    }
}

/// Builds a linked [`Program`] from a vertex and a fragment source.
pub struct ProgramBuilder {
    vert: ShaderSource,
    frag: ShaderSource,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vert: ShaderSource::Text(vert_src.to_owned()),
            frag: ShaderSource::Text(frag_src.to_owned()),
        }
    }

    /// Takes the stage file paths; reading waits until [`build`].
    ///
    /// [`build`]: ProgramBuilder::build
    pub fn from_files(vert: impl Into<PathBuf>, frag: impl Into<PathBuf>) -> Self {
        Self {
            vert: ShaderSource::File(vert.into()),
            frag: ShaderSource::File(frag.into()),
        }
    }

    /// Compiles vertex then fragment stage and links them. Stops at the
    /// first failure, unreadable files included; a link failure is an
    /// error as well, never a usable handle. Both stage objects are
    /// released once linking has been attempted, whatever the outcome.
    pub fn build(self) -> Result<Program, ShaderError> {
        let vert = self.vert.compile(ShaderStage::Vertex)?;
        let frag = self.frag.compile(ShaderStage::Fragment)?;

        Program::link(&vert, &frag)
    }
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn link(vert: &Shader, frag: &Shader) -> Result<Self, ShaderError> {
        let id = unsafe { gl::CreateProgram() };
        let program = Self { id };

        let mut success: GLint = 0;

        unsafe {
            gl::AttachShader(program.id, vert.id);
            gl::AttachShader(program.id, frag.id);
            gl::LinkProgram(program.id);
            gl::GetProgramiv(program.id, gl::LINK_STATUS, (&mut success) as *mut GLint);
        }

        if success != 1 {
            return Err(ShaderError::Link {
                log: program_info_log(program.id),
            });
        }

        Ok(program)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Resolves a uniform by name. Uniforms the linker optimized out are
    /// reported as unknown rather than silently dropped.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation, ShaderError> {
        let c_name = CString::new(name)?;

        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };
        if location < 0 {
            return Err(ShaderError::UnknownUniform {
                name: name.to_owned(),
            });
        }

        Ok(UniformLocation(location))
    }

    pub fn set_mat4(&self, location: UniformLocation, value: Matrix4<f32>) {
        let value: [[f32; 4]; 4] = value.into();

        unsafe {
            gl::ProgramUniformMatrix4fv(
                self.id,
                location.0,
                1,
                gl::FALSE,
                value.as_ptr() as *const f32,
            )
        }
    }

    pub fn set_int(&self, location: UniformLocation, value: i32) {
        unsafe { gl::ProgramUniform1i(self.id, location.0, value) }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct UniformLocation(GLint);

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compile error: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program link error: {log}")]
    Link { log: String },
    #[error("no active uniform named `{name}`")]
    UnknownUniform { name: String },
    #[error("shader source contains a NUL byte")]
    SourceEncoding(#[from] NulError),
    #[error("cannot read shader source {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_owned(),
        source,
    })
}

fn shader_info_log(id: GLuint) -> String {
    let mut len: GLint = 0;
    unsafe { gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint) };

    // len includes the terminator; keep one byte even for an empty log so
    // the buffer pointer stays valid.
    let mut buf = vec![0_u8; len.max(1) as usize];
    let mut written: GLint = 0;
    unsafe {
        gl::GetShaderInfoLog(
            id,
            buf.len() as i32,
            (&mut written) as *mut GLint,
            buf.as_mut_ptr() as *mut c_char,
        )
    };

    trim_log(buf, written)
}

fn program_info_log(id: GLuint) -> String {
    let mut len: GLint = 0;
    unsafe { gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint) };

    let mut buf = vec![0_u8; len.max(1) as usize];
    let mut written: GLint = 0;
    unsafe {
        gl::GetProgramInfoLog(
            id,
            buf.len() as i32,
            (&mut written) as *mut GLint,
            buf.as_mut_ptr() as *mut c_char,
        )
    };

    trim_log(buf, written)
}

/// The log length reported by drivers includes the terminator, and some
/// pad the tail with NULs. Cut at the first NUL and drop trailing blanks.
fn trim_log(mut buf: Vec<u8>, written: GLint) -> String {
    buf.truncate(written.max(0) as usize);

    if let Some(nul) = buf.iter().position(|b| *b == 0) {
        buf.truncate(nul);
    }

    String::from_utf8_lossy(&buf).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_cut_at_terminator() {
        let buf = b"0:1: error: syntax error\n\0\0\0".to_vec();

        assert_eq!(trim_log(buf, 26), "0:1: error: syntax error");
    }

    #[test]
    fn log_respects_written_length() {
        assert_eq!(trim_log(b"full buffer".to_vec(), 4), "full");
        assert_eq!(trim_log(Vec::new(), 0), "");
        assert_eq!(trim_log(b"x".to_vec(), -1), "");
    }

    #[test]
    fn stage_maps_to_driver_enum() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn compile_error_message_carries_log() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "0:3: 'foo' : undeclared identifier".into(),
        };

        let message = err.to_string();
        assert!(message.starts_with("vertex shader compile error"));
        assert!(message.contains("undeclared identifier"));
    }

    #[test]
    fn missing_vertex_file_stops_the_build() {
        let result = ProgramBuilder::from_files(
            "shaders/missing_vertex.glsl",
            "shaders/missing_fragment.glsl",
        )
        .build();

        match result {
            Err(ShaderError::Io { path, .. }) => assert!(path.ends_with("missing_vertex.glsl")),
            _ => panic!("expected an Io error for the vertex stage"),
        }
    }
}
