use clap::Parser;

use gl_kit::geometry::{Geometry, GeometryBuilder, VertexAttribute};
use gl_kit::program::{Program, ProgramBuilder};

use glsamples::args::{CommonArgs, ShaderArgs};
use glsamples::SampleError;
use glsamples_bootstrap::{logging, App, Config};

/// Third sample: the same shader pair as `triangle`, but drawing an
/// indexed quad, so four vertices cover two triangles.
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    shaders: ShaderArgs,
}

#[rustfmt::skip]
const QUAD: [f32; 24] = [
    // position          color
    -0.5, -0.5, 0.0,     1.0, 0.0, 0.0,
     0.5, -0.5, 0.0,     0.0, 1.0, 0.0,
     0.5,  0.5, 0.0,     0.0, 0.0, 1.0,
    -0.5,  0.5, 0.0,     1.0, 1.0, 0.0,
];

#[rustfmt::skip]
const INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

fn main() {
    logging::init();

    let args = <Args as Parser>::parse();

    let (app, program, quad) = match setup(&args) {
        Ok(v) => v,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    app.run(move |frame| {
        frame.renderer.clear(0.0, 0.0, 0.0);
        frame.renderer.draw(&quad, &program);
    });
}

fn setup(args: &Args) -> Result<(App, Program, Geometry), SampleError> {
    let app = App::new(Config {
        title: "OpenGL Samples: quad".to_owned(),
        size: (args.common.width, args.common.height),
        frame_limit: args.common.frame_limit(),
        screenshot: args.common.screenshot.clone(),
        ..Default::default()
    })?;

    let program = ProgramBuilder::from_files(&args.shaders.vert, &args.shaders.frag).build()?;

    let quad = GeometryBuilder::new(&QUAD)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_indices(&INDICES)
        .build()?;

    Ok((app, program, quad))
}
