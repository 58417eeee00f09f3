use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TeleopError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub controller: ControllerSettings,
    pub drive: DriveSettings,
    pub robot: RobotSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// 16 ms is roughly 60 Hz.
    pub poll_rate_ms: u64,
    /// Raw axis readings below this magnitude are reported as 0.
    pub axis_noise_floor: f32,
    /// Lowercase keywords matched against device names when picking a pad.
    pub preferred_names: Vec<String>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_rate_ms: 16,
            axis_noise_floor: 0.1,
            preferred_names: ["ps", "sony", "playstation", "wireless"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveSettings {
    pub dead_zone: f32,
    pub sensitivity: f32,
    pub trigger_sensitivity: f32,
    pub max_forward_speed: f32,
    pub max_rotation_speed: f32,
    pub max_strafe_speed: f32,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            dead_zone: 0.15,
            sensitivity: 1.0,
            trigger_sensitivity: 0.5,
            max_forward_speed: 1.0,
            max_rotation_speed: 1.0,
            max_strafe_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RobotKind {
    /// Logs commands and tracks velocities in memory.
    #[default]
    #[serde(rename = "sim")]
    #[cfg_attr(feature = "cli", value(name = "sim"))]
    Simulated,
    /// Sends line commands over a serial port.
    #[serde(rename = "serial")]
    #[cfg_attr(feature = "cli", value(name = "serial"))]
    Serial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSettings {
    pub kind: RobotKind,
    pub port: Option<String>,
    pub baud_rate: u32,
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            kind: RobotKind::Simulated,
            port: None,
            baud_rate: 9600,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub debug: bool,
    pub json: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TeleopError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TeleopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TeleopError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("controller.poll_rate_ms", self.controller.poll_rate_ms, 1, 1000)?;
        validation::validate_fraction("controller.axis_noise_floor", self.controller.axis_noise_floor)?;

        let drive = &self.drive;
        validation::validate_fraction("drive.dead_zone", drive.dead_zone)?;
        if !(drive.sensitivity > 0.0 && drive.sensitivity <= 10.0) {
            return Err(TeleopError::InvalidConfigValueError {
                field: "drive.sensitivity".to_string(),
                value: drive.sensitivity.to_string(),
                reason: "Value must be above 0 and at most 10".to_string(),
            });
        }
        validation::validate_range("drive.trigger_sensitivity", drive.trigger_sensitivity, 0.0, 1.0)?;
        validation::validate_range("drive.max_forward_speed", drive.max_forward_speed, 0.0, 1.0)?;
        validation::validate_range("drive.max_rotation_speed", drive.max_rotation_speed, 0.0, 1.0)?;
        validation::validate_range("drive.max_strafe_speed", drive.max_strafe_speed, 0.0, 1.0)?;

        if self.robot.kind == RobotKind::Serial {
            let port = validation::validate_required_field("robot.port", &self.robot.port)?;
            validation::validate_non_empty_string("robot.port", port)?;
            validation::validate_positive_number("robot.baud_rate", self.robot.baud_rate as u64, 1)?;
        }

        Ok(())
    }

    pub fn poll_rate(&self) -> Duration {
        Duration::from_millis(self.controller.poll_rate_ms)
    }

    pub fn debug_logging(&self) -> bool {
        self.logging.debug
    }
}

impl ConfigProvider for TomlConfig {
    fn controller(&self) -> &ControllerSettings {
        &self.controller
    }

    fn drive(&self) -> &DriveSettings {
        &self.drive
    }

    fn robot(&self) -> &RobotSettings {
        &self.robot
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[controller]
poll_rate_ms = 20
axis_noise_floor = 0.05
preferred_names = ["dualshock"]

[drive]
dead_zone = 0.2
sensitivity = 0.8
max_forward_speed = 0.5

[robot]
kind = "serial"
port = "/dev/ttyUSB0"
baud_rate = 115200

[logging]
debug = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.poll_rate(), Duration::from_millis(20));
        assert_eq!(config.controller.preferred_names, vec!["dualshock".to_string()]);
        assert_eq!(config.drive.dead_zone, 0.2);
        assert_eq!(config.drive.trigger_sensitivity, 0.5);
        assert_eq!(config.robot.kind, RobotKind::Serial);
        assert_eq!(config.robot.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.robot.baud_rate, 115200);
        assert!(config.debug_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.controller.poll_rate_ms, 16);
        assert_eq!(config.controller.axis_noise_floor, 0.1);
        assert_eq!(config.controller.preferred_names.len(), 4);
        assert_eq!(config.drive.dead_zone, 0.15);
        assert_eq!(config.drive.sensitivity, 1.0);
        assert_eq!(config.robot.kind, RobotKind::Simulated);
        assert_eq!(config.robot.baud_rate, 9600);
        assert!(!config.debug_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BACKSTAGE_TEST_SERIAL_PORT", "/dev/ttyACM7");

        let toml_content = r#"
[robot]
kind = "serial"
port = "${BACKSTAGE_TEST_SERIAL_PORT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.robot.port.as_deref(), Some("/dev/ttyACM7"));

        std::env::remove_var("BACKSTAGE_TEST_SERIAL_PORT");
    }

    #[test]
    fn test_unset_env_var_is_left_verbatim() {
        let config =
            TomlConfig::from_toml_str("[robot]\nport = \"${BACKSTAGE_TEST_UNSET_VAR}\"\n").unwrap();
        assert_eq!(config.robot.port.as_deref(), Some("${BACKSTAGE_TEST_UNSET_VAR}"));
    }

    #[test]
    fn test_serial_robot_requires_port() {
        let config = TomlConfig::from_toml_str("[robot]\nkind = \"serial\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(TeleopError::MissingConfigError { field }) if field == "robot.port"
        ));
    }

    #[test]
    fn test_config_validation_rejects_out_of_range() {
        let config = TomlConfig::from_toml_str("[drive]\ndead_zone = 1.0\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[drive]\nsensitivity = 0.0\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[controller]\npoll_rate_ms = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_drive_settings_are_rejected() {
        let config = TomlConfig::from_toml_str("[drive]\nsensitivity = nan\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(TeleopError::InvalidConfigValueError { field, .. }) if field == "drive.sensitivity"
        ));

        for field in [
            "trigger_sensitivity",
            "max_forward_speed",
            "max_rotation_speed",
            "max_strafe_speed",
        ] {
            let config = TomlConfig::from_toml_str(&format!("[drive]\n{} = nan\n", field)).unwrap();
            let expected = format!("drive.{}", field);
            assert!(matches!(
                config.validate(),
                Err(TeleopError::InvalidConfigValueError { field, .. }) if field == expected
            ));
        }

        let config = TomlConfig::from_toml_str("[drive]\ndead_zone = nan\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = TomlConfig::from_toml_str("[drive\ndead_zone = ");
        assert!(matches!(
            result,
            Err(TeleopError::ConfigValidationError { field, .. }) if field == "toml_parsing"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[controller]\npoll_rate_ms = 10\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.controller.poll_rate_ms, 10);
    }
}
