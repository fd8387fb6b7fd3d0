use std::path::PathBuf;

use clap::Args;

/// Window flags every sample shares.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Width of the window in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,
    /// Height of the window in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,
    /// Close after this many frames (0 runs until closed)
    #[arg(long, default_value_t = 0)]
    pub frames: u64,
    /// Write the last frame to this PNG before closing (needs --frames)
    #[arg(long)]
    pub screenshot: Option<PathBuf>,
}

impl CommonArgs {
    pub fn frame_limit(&self) -> Option<u64> {
        match self.frames {
            0 => None,
            n => Some(n),
        }
    }
}

/// Shader pair for the plain vertex-colored samples.
#[derive(Debug, Args)]
pub struct ShaderArgs {
    /// Path to the vertex shader source
    #[arg(long, default_value_os_t = PathBuf::from("shaders/vertexcore.glsl"))]
    pub vert: PathBuf,
    /// Path to the fragment shader source
    #[arg(long, default_value_os_t = PathBuf::from("shaders/fragmentcore.glsl"))]
    pub frag: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Host {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        shaders: ShaderArgs,
    }

    #[test]
    fn default_shader_paths() {
        let args = Host::try_parse_from(["sample"]).unwrap();

        assert_eq!(args.shaders.vert, PathBuf::from("shaders/vertexcore.glsl"));
        assert_eq!(args.shaders.frag, PathBuf::from("shaders/fragmentcore.glsl"));
    }

    #[test]
    fn default_window_geometry() {
        let args = Host::try_parse_from(["sample"]).unwrap();

        assert_eq!((args.common.width, args.common.height), (640, 480));
        assert_eq!(args.common.frame_limit(), None);
        assert!(args.common.screenshot.is_none());
    }

    #[test]
    fn frame_limit_zero_means_unbounded() {
        let args = Host::try_parse_from(["sample", "--frames", "3"]).unwrap();

        assert_eq!(args.common.frame_limit(), Some(3));
    }
}
