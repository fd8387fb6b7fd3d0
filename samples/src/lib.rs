pub mod args;
pub mod assets;

use thiserror::Error;

use gl_kit::geometry::GeometryError;
use gl_kit::program::ShaderError;
use gl_kit::texture::TextureError;
use glsamples_bootstrap::AppError;

/// Anything that can stop a sample during setup.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Asset(#[from] assets::AssetError),
}
