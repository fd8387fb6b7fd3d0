use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;

mod args;
mod config;

use crate::config::Test;

fn main() {
    let args = <args::Args as Parser>::parse();
    let config = std::fs::read_to_string(&args.config_path).expect("Cannot read config file");

    let tests: config::Config = toml::from_str(&config).expect("Invalid config structure");
    let tests = tests.test;

    let test_path = get_test_path(&args.config_path);

    let mut failed = 0;

    for test in &tests {
        println!("Testing {}", test.name);

        match execute_test(&test_path, &args.bin_dir, test) {
            Ok(()) => println!("  ok"),
            Err(e) => {
                println!("  FAILED: {e}");
                failed += 1;
            }
        }
    }

    if failed != 0 {
        println!("{failed} of {} tests failed", tests.len());
        std::process::exit(1);
    }

    println!("All {} tests passed", tests.len());
}

/// Every relative path in the config resolves against the config's own
/// directory, so the suite runs the same from anywhere.
fn get_test_path(config_path: impl AsRef<Path>) -> PathBuf {
    config_path
        .as_ref()
        .canonicalize()
        .unwrap()
        .parent()
        .unwrap()
        .to_owned()
}

fn execute_test(wd: &Path, bin_dir: &Path, test: &Test) -> Result<(), String> {
    let bin = wd.join(bin_dir).join(&test.bin);

    let status = Command::new(&bin)
        .current_dir(wd)
        .args(&test.args)
        .status()
        .map_err(|e| format!("cannot run {bin:?}: {e}"))?;

    if status.success() == test.should_fail {
        return Err(if test.should_fail {
            "expected a failure, sample exited cleanly".to_owned()
        } else {
            format!("sample exited with {status}")
        });
    }

    if let Some(screenshot) = &test.screenshot {
        let (data, width, height) = read_image(wd, screenshot)?;

        if let (Some(w), Some(h)) = (test.width, test.height) {
            if (width, height) != (w, h) {
                return Err(format!("screenshot is {width}x{height}, expected {w}x{h}"));
            }
        }

        if let Some(original) = &test.original {
            let (original, ..) = read_image(wd, original)?;
            let comp = compare(&data, &original)?;

            println!(
                "  total error: {}, percentage error: {}%",
                comp.total_err, comp.percentage_err
            );

            let max = test.max_error_percent.unwrap_or(0.0);
            if comp.percentage_err > max {
                return Err(format!(
                    "images differ by {}%, allowed {max}%",
                    comp.percentage_err
                ));
            }
        }
    }

    Ok(())
}

fn read_image(test_path: &Path, path: &Path) -> Result<(Vec<u8>, u32, u32), String> {
    let img_path = test_path.join(path);
    let file = File::open(&img_path).map_err(|e| format!("cannot open {img_path:?}: {e}"))?;

    let decoder = png::Decoder::new(file);
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("broken PNG {img_path:?}: {e}"))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("broken PNG {img_path:?}: {e}"))?;
    buf.truncate(info.buffer_size());

    Ok((buf, info.width, info.height))
}

fn compare(new_img: &[u8], old_img: &[u8]) -> Result<Comparison, String> {
    if new_img.len() != old_img.len() {
        return Err("image sizes do not match".to_owned());
    }

    let mut total_err = 0.0;

    for (n, o) in new_img.iter().zip(old_img.iter()) {
        total_err += n.abs_diff(*o) as f32 / 255.0;
    }

    let percentage_err = (total_err / new_img.len() as f32) * 100.0;

    Ok(Comparison {
        total_err,
        percentage_err,
    })
}

struct Comparison {
    pub total_err: f32,
    pub percentage_err: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_images_compare_clean() {
        let comp = compare(&[0, 128, 255], &[0, 128, 255]).unwrap();

        assert_eq!(comp.total_err, 0.0);
        assert_eq!(comp.percentage_err, 0.0);
    }

    #[test]
    fn error_is_averaged_over_all_bytes() {
        // one of two bytes a full step off
        let comp = compare(&[0, 0], &[255, 0]).unwrap();

        assert_eq!(comp.total_err, 1.0);
        assert_eq!(comp.percentage_err, 50.0);
    }

    #[test]
    fn size_mismatch_is_an_error() {
        assert!(compare(&[0], &[0, 0]).is_err());
    }
}
