use std::time::Duration;

use clap::Parser;

use crate::monitor::PreviewOptions;
use crate::overlay::OperatingMode;

/// Startup configuration. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "glass-overlay", version, about = "Desktop overlay with a monitor picker")]
pub struct Config {
    /// Run as an ordinary interactive window instead of a click-through overlay
    #[arg(long, env = "WINDOW_MODE")]
    pub window_mode: bool,

    /// Monitor the main window is placed on at startup
    #[arg(long = "monitor", env = "OVERLAY_MONITOR", default_value_t = 0)]
    pub monitor: usize,

    /// JPEG quality of monitor previews
    #[arg(long, env = "PREVIEW_QUALITY", default_value_t = 80,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    pub preview_quality: u8,

    /// Maximum preview width in pixels (0 keeps full resolution)
    #[arg(long, env = "PREVIEW_MAX_WIDTH", default_value_t = 480)]
    pub preview_max_width: u32,

    /// How long to wait for a preview encode, in milliseconds (0 waits forever)
    #[arg(long, env = "PREVIEW_TIMEOUT_MS", default_value_t = 5000)]
    pub preview_timeout_ms: u64,

    /// Print the monitor list as JSON and exit
    #[arg(long)]
    pub list_monitors: bool,

    /// Enable debug logging (honors RUST_LOG)
    #[arg(long, env = "OVERLAY_DEBUG")]
    pub debug: bool,
}

impl Config {
    pub fn operating_mode(&self) -> OperatingMode {
        if self.window_mode {
            OperatingMode::Window
        } else {
            OperatingMode::Overlay
        }
    }

    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            quality: self.preview_quality,
            max_width: (self.preview_max_width > 0).then_some(self.preview_max_width),
            timeout: (self.preview_timeout_ms > 0)
                .then(|| Duration::from_millis(self.preview_timeout_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["glass-overlay"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_select_overlay_mode() {
        let config = parse(&[]);
        // Environment may set WINDOW_MODE on a dev machine; only check when unset.
        if std::env::var_os("WINDOW_MODE").is_none() {
            assert_eq!(config.operating_mode(), OperatingMode::Overlay);
        }
        if std::env::var_os("PREVIEW_QUALITY").is_none() {
            assert_eq!(config.preview_options().quality, 80);
        }
    }

    #[test]
    fn test_window_mode_flag() {
        let config = parse(&["--window-mode"]);
        assert_eq!(config.operating_mode(), OperatingMode::Window);
    }

    #[test]
    fn test_zero_values_disable_limits() {
        let config = parse(&["--preview-max-width", "0", "--preview-timeout-ms", "0"]);
        let options = config.preview_options();
        assert_eq!(options.max_width, None);
        assert_eq!(options.timeout, None);
    }

    #[test]
    fn test_preview_options_from_flags() {
        let config = parse(&[
            "--preview-quality",
            "60",
            "--preview-max-width",
            "320",
            "--preview-timeout-ms",
            "250",
        ]);
        let options = config.preview_options();
        assert_eq!(options.quality, 60);
        assert_eq!(options.max_width, Some(320));
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_quality_out_of_range_is_rejected() {
        let result = Config::try_parse_from(["glass-overlay", "--preview-quality", "0"]);
        assert!(result.is_err());
        let result = Config::try_parse_from(["glass-overlay", "--preview-quality", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_monitor_index_flag() {
        assert_eq!(parse(&["--monitor", "2"]).monitor, 2);
    }
}
