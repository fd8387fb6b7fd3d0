use clap::Parser;

use glsamples::args::CommonArgs;
use glsamples::SampleError;
use glsamples_bootstrap::{logging, App, Config};

/// First sample: a fixed-size window with a GL context, cleared to black
/// every frame. No shaders, no geometry.
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    logging::init();

    let args = <Args as Parser>::parse();

    let app = match setup(&args) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    app.run(|frame| {
        frame.renderer.clear(0.0, 0.0, 0.0);
    });
}

fn setup(args: &Args) -> Result<App, SampleError> {
    let app = App::new(Config {
        size: (args.common.width, args.common.height),
        resizable: false,
        frame_limit: args.common.frame_limit(),
        screenshot: args.common.screenshot.clone(),
        ..Default::default()
    })?;

    Ok(app)
}
