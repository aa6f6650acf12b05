//! Configuration and CLI argument handling

use clap::Parser;
use serde_json::Value;

use crate::state::Theme;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown")]
#[command(about = "A countdown timer controlled over a local HTTP surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20560")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration in seconds to configure at startup.
    /// Values that are not a positive whole number are ignored.
    #[arg(short, long, allow_hyphen_values = true)]
    pub duration: Option<String>,

    /// Start with the dark theme
    #[arg(long)]
    pub dark: bool,

    /// Shell command to run whenever a countdown finishes
    #[arg(long, value_name = "COMMAND")]
    pub on_finish: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn theme(&self) -> Theme {
        Theme::from_dark(self.dark)
    }

    /// Startup duration as raw input for the controller
    pub fn duration_input(&self) -> Option<Value> {
        self.duration.clone().map(Value::String)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::{AppState, TimerPhase, Transition};

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["countdown"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20560");
        assert_eq!(config.duration, None);
        assert_eq!(config.theme(), Theme::Light);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn parses_flags() {
        let config = Config::try_parse_from([
            "countdown",
            "-p",
            "8080",
            "-d",
            "90",
            "--dark",
            "--on-finish",
            "notify-send done",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.duration.as_deref(), Some("90"));
        assert_eq!(config.duration_input(), Some(Value::String("90".to_string())));
        assert_eq!(config.theme(), Theme::Dark);
        assert_eq!(config.on_finish.as_deref(), Some("notify-send done"));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn invalid_startup_duration_is_accepted_and_ignored() {
        for preset in ["abc", "-5", "2.5", "0"] {
            let config = Config::try_parse_from(["countdown", "-d", preset]).unwrap();
            assert_eq!(config.duration.as_deref(), Some(preset));

            let state = Arc::new(AppState::new(0, config.host.clone(), config.theme(), None));
            let input = config.duration_input().unwrap();
            let result = state.set_duration(&input).unwrap();
            assert_eq!(result.transition, Transition::Ignored);
            assert_eq!(result.timer.phase, TimerPhase::Idle);
            assert_eq!(result.timer.remaining_seconds, 0);
        }
    }

    #[test]
    fn valid_startup_duration_configures_timer() {
        let config = Config::try_parse_from(["countdown", "--duration", "45"]).unwrap();
        let state = Arc::new(AppState::new(0, config.host.clone(), config.theme(), None));

        let result = state.set_duration(&config.duration_input().unwrap()).unwrap();
        assert!(result.transition.is_applied());
        assert_eq!(result.timer.phase, TimerPhase::Configured);
        assert_eq!(result.timer.display, "00:45");
    }
}
