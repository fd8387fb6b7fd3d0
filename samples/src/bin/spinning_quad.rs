use std::path::PathBuf;

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Vector3};

use clap::Parser;

use gl_kit::geometry::{Geometry, GeometryBuilder, VertexAttribute};
use gl_kit::program::{Program, ProgramBuilder, UniformLocation};
use gl_kit::renderer::RenderOptions;
use gl_kit::texture::{Texture2D, TextureFilter, TextureWrap};

use glsamples::args::CommonArgs;
use glsamples::{assets, SampleError};
use glsamples_bootstrap::{logging, App, Config};

/// Last sample: a textured quad turning around a tilted axis, placed in
/// the world through model/view/projection uniforms.
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
    /// Path to the vertex shader source
    #[arg(long, default_value_os_t = PathBuf::from("shaders/vertexmodel.glsl"))]
    vert: PathBuf,
    /// Path to the fragment shader source
    #[arg(long, default_value_os_t = PathBuf::from("shaders/fragmentmodel.glsl"))]
    frag: PathBuf,
    /// Path to the quad texture
    #[arg(long, default_value_os_t = PathBuf::from("textures/crate.png"))]
    texture: PathBuf,
}

#[rustfmt::skip]
const QUAD: [f32; 32] = [
    // position          color             texture
    -0.5, -0.5, 0.0,     1.0, 0.0, 0.0,    0.0, 0.0,
     0.5, -0.5, 0.0,     0.0, 1.0, 0.0,    1.0, 0.0,
     0.5,  0.5, 0.0,     0.0, 0.0, 1.0,    1.0, 1.0,
    -0.5,  0.5, 0.0,     1.0, 1.0, 0.0,    0.0, 1.0,
];

#[rustfmt::skip]
const INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

/// Degrees per second of spin.
const SPIN_SPEED: f32 = 50.0;

struct Scene {
    program: Program,
    quad: Geometry,
    texture: Texture2D,
    model_loc: UniformLocation,
    projection_loc: UniformLocation,
}

fn main() {
    logging::init();

    let args = <Args as Parser>::parse();

    let (app, scene) = match setup(&args) {
        Ok(v) => v,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let spin_axis = Vector3::new(0.5, 1.0, 0.0).normalize();

    app.run(move |frame| {
        let aspect = frame.size.0 as f32 / frame.size.1 as f32;

        frame.renderer.clear(0.0, 0.0, 0.0);

        scene.program.set_mat4(
            scene.projection_loc,
            perspective(Deg(45.0), aspect, 0.1, 100.0),
        );
        scene.program.set_mat4(
            scene.model_loc,
            Matrix4::from_axis_angle(spin_axis, Deg(SPIN_SPEED * frame.elapsed)),
        );

        scene.texture.bind(0);
        frame.renderer.draw(&scene.quad, &scene.program);
    });
}

fn setup(args: &Args) -> Result<(App, Scene), SampleError> {
    let app = App::new(Config {
        title: "OpenGL Samples: spinning quad".to_owned(),
        size: (args.common.width, args.common.height),
        options: RenderOptions {
            // the back face comes around every half turn
            backface_culling: false,
            ..Default::default()
        },
        frame_limit: args.common.frame_limit(),
        screenshot: args.common.screenshot.clone(),
        ..Default::default()
    })?;

    let program = ProgramBuilder::from_files(&args.vert, &args.frag).build()?;

    let model_loc = program.uniform_location("model")?;
    let view_loc = program.uniform_location("view")?;
    let projection_loc = program.uniform_location("projection")?;
    let sampler_loc = program.uniform_location("baseTexture")?;

    // the camera never moves, so the view matrix uploads once
    program.set_mat4(view_loc, Matrix4::from_translation(Vector3::new(0.0, 0.0, -2.5)));
    program.set_int(sampler_loc, 0);

    let quad = GeometryBuilder::new(&QUAD)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec2)
        .with_indices(&INDICES)
        .build()?;

    let image = assets::load_png(&args.texture)?;
    let texture = Texture2D::new(
        image.width,
        image.height,
        &image.data,
        image.format,
        TextureFilter::Linear,
        TextureWrap::Repeat,
    )?;

    Ok((
        app,
        Scene {
            program,
            quad,
            texture,
            model_loc,
            projection_loc,
        },
    ))
}
