use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to file with specified tests
    pub config_path: PathBuf,
    /// Directory with the built sample binaries, relative to the config file
    #[arg(long, default_value_os_t = PathBuf::from("target/debug"))]
    pub bin_dir: PathBuf,
}
