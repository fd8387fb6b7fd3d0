use std::path::PathBuf;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    pub test: Vec<Test>,
}

#[derive(Deserialize, Debug)]
pub struct Test {
    pub name: String,
    /// Sample binary to run, looked up in the binary directory.
    pub bin: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// The sample is expected to exit with a non-zero status.
    #[serde(default)]
    pub should_fail: bool,
    /// PNG the sample writes, decoded and size-checked after the run.
    pub screenshot: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Reference image the screenshot is compared against.
    pub original: Option<PathBuf>,
    pub max_error_percent: Option<f32>,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn parses_minimal_test() {
        let config: Config = toml::from_str(
            r#"
            [[test]]
            name = "window-smoke"
            bin = "window"
            args = ["--frames", "3"]
            "#,
        )
        .unwrap();

        let test = &config.test[0];
        assert_eq!(test.name, "window-smoke");
        assert_eq!(test.bin, "window");
        assert_eq!(test.args, ["--frames", "3"]);
        assert!(!test.should_fail);
        assert!(test.screenshot.is_none());
    }

    #[test]
    fn parses_expected_failure_and_screenshot() {
        let config: Config = toml::from_str(
            r#"
            [[test]]
            name = "triangle-bad-syntax"
            bin = "triangle"
            args = ["--frag", "tester/fixtures/badfragment.glsl"]
            should_fail = true

            [[test]]
            name = "triangle-frame"
            bin = "triangle"
            screenshot = "target/triangle.png"
            width = 640
            height = 480
            original = "tester/frames/triangle.png"
            max_error_percent = 1.5
            "#,
        )
        .unwrap();

        assert!(config.test[0].should_fail);

        let frame = &config.test[1];
        assert_eq!(frame.screenshot.as_deref(), Some(Path::new("target/triangle.png")));
        assert_eq!((frame.width, frame.height), (Some(640), Some(480)));
        assert_eq!(frame.max_error_percent, Some(1.5));
    }
}
