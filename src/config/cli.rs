use crate::config::toml_config::{RobotKind, TomlConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "backstage")]
#[command(about = "Drive a robot from a PS4 controller")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Robot backend
    #[arg(long, value_enum)]
    pub robot: Option<RobotKind>,

    /// Serial port of the robot, e.g. /dev/ttyACM0 or COM3
    #[arg(long)]
    pub port: Option<String>,

    #[arg(long)]
    pub baud: Option<u32>,

    /// Play back a recorded input script instead of reading a gamepad
    #[arg(long)]
    pub replay: Option<PathBuf>,

    #[arg(long)]
    pub poll_rate_ms: Option<u64>,

    #[arg(long)]
    pub dead_zone: Option<f32>,

    /// Log process and poll-loop statistics
    #[arg(long)]
    pub monitor: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Write the session report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the config file (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(kind) = self.robot {
            config.robot.kind = kind;
        }
        if let Some(port) = &self.port {
            config.robot.port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            config.robot.baud_rate = baud;
        }
        if let Some(poll_rate_ms) = self.poll_rate_ms {
            config.controller.poll_rate_ms = poll_rate_ms;
        }
        if let Some(dead_zone) = self.dead_zone {
            config.drive.dead_zone = dead_zone;
        }
        if self.verbose {
            config.logging.debug = true;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let cli = CliConfig::parse_from(["backstage"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.robot.kind, RobotKind::Simulated);
        assert_eq!(config.controller.poll_rate_ms, 16);
        assert!(!cli.monitor);
        assert!(cli.replay.is_none());
    }

    #[test]
    fn test_command_line_overrides_config() {
        let cli = CliConfig::parse_from([
            "backstage",
            "--robot",
            "serial",
            "--port",
            "COM3",
            "--baud",
            "57600",
            "--poll-rate-ms",
            "8",
            "--dead-zone",
            "0.2",
            "--verbose",
        ]);

        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.robot.kind, RobotKind::Serial);
        assert_eq!(config.robot.port.as_deref(), Some("COM3"));
        assert_eq!(config.robot.baud_rate, 57600);
        assert_eq!(config.controller.poll_rate_ms, 8);
        assert_eq!(config.drive.dead_zone, 0.2);
        assert!(config.logging.debug);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let cli = CliConfig::parse_from(["backstage", "--config", "/nonexistent/backstage.toml"]);
        assert!(cli.resolve().is_err());
    }
}
