use clap::Parser;

use gl_kit::geometry::{Geometry, GeometryBuilder, VertexAttribute};
use gl_kit::program::{Program, ProgramBuilder};

use glsamples::args::{CommonArgs, ShaderArgs};
use glsamples::SampleError;
use glsamples_bootstrap::{logging, App, Config};

/// Second sample: compiles the core shader pair and draws one
/// vertex-colored triangle from a vertex buffer.
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    shaders: ShaderArgs,
}

#[rustfmt::skip]
const TRIANGLE: [f32; 18] = [
    // position          color
    -0.5, -0.5, 0.0,     1.0, 0.0, 0.0,
     0.5, -0.5, 0.0,     0.0, 1.0, 0.0,
     0.0,  0.5, 0.0,     0.0, 0.0, 1.0,
];

fn main() {
    logging::init();

    let args = <Args as Parser>::parse();

    let (app, program, triangle) = match setup(&args) {
        Ok(v) => v,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    app.run(move |frame| {
        frame.renderer.clear(0.0, 0.0, 0.0);
        frame.renderer.draw(&triangle, &program);
    });
}

fn setup(args: &Args) -> Result<(App, Program, Geometry), SampleError> {
    let app = App::new(Config {
        title: "OpenGL Samples: triangle".to_owned(),
        size: (args.common.width, args.common.height),
        frame_limit: args.common.frame_limit(),
        screenshot: args.common.screenshot.clone(),
        ..Default::default()
    })?;

    // GL resources only after App::new made the context current
    let program = ProgramBuilder::from_files(&args.shaders.vert, &args.shaders.frag).build()?;

    let triangle = GeometryBuilder::new(&TRIANGLE)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .build()?;

    Ok((app, program, triangle))
}
