use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeleopError {
    #[error("No controllers found. Connect a PS4 controller.")]
    NoControllersError,

    #[error("Gamepad backend error: {message}")]
    GamepadBackendError { message: String },

    #[error("Robot command failed: {message}")]
    RobotError { message: String },

    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    SerialError(#[from] serialport::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Replay script error: {message}")]
    ReplayError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Controller,
    Robot,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TeleopError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TeleopError::NoControllersError
            | TeleopError::GamepadBackendError { .. }
            | TeleopError::ReplayError { .. } => ErrorCategory::Controller,
            TeleopError::RobotError { .. } => ErrorCategory::Robot,
            #[cfg(feature = "serial")]
            TeleopError::SerialError(_) => ErrorCategory::Robot,
            TeleopError::IoError(_) | TeleopError::SerializationError(_) => ErrorCategory::Io,
            TeleopError::ConfigError { .. }
            | TeleopError::ConfigValidationError { .. }
            | TeleopError::InvalidConfigValueError { .. }
            | TeleopError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TeleopError::SerializationError(_) => ErrorSeverity::Low,
            TeleopError::RobotError { .. } => ErrorSeverity::Medium,
            #[cfg(feature = "serial")]
            TeleopError::SerialError(_) => ErrorSeverity::High,
            TeleopError::NoControllersError
            | TeleopError::ReplayError { .. }
            | TeleopError::ConfigError { .. }
            | TeleopError::ConfigValidationError { .. }
            | TeleopError::InvalidConfigValueError { .. }
            | TeleopError::MissingConfigError { .. } => ErrorSeverity::High,
            TeleopError::GamepadBackendError { .. } | TeleopError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TeleopError::NoControllersError => {
                "Make sure your PS4 controller is connected via USB or wireless adapter".to_string()
            }
            TeleopError::GamepadBackendError { .. } => {
                "Check that the input subsystem is available and this user may read input devices"
                    .to_string()
            }
            TeleopError::RobotError { .. } => {
                "Check the robot connection and restart the session".to_string()
            }
            #[cfg(feature = "serial")]
            TeleopError::SerialError(_) => {
                "Check the serial port name, baud rate and cable, then try again".to_string()
            }
            TeleopError::IoError(_) => "Check file paths and permissions".to_string(),
            TeleopError::SerializationError(_) => {
                "The session ran; only the report could not be written".to_string()
            }
            TeleopError::ReplayError { .. } => {
                "Fix the replay script; frames are [[frames]] tables with an events array"
                    .to_string()
            }
            TeleopError::ConfigError { .. } | TeleopError::ConfigValidationError { .. } => {
                "Make sure the configuration file exists and is valid TOML".to_string()
            }
            TeleopError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the config file or on the command line", field)
            }
            TeleopError::MissingConfigError { field } => {
                format!("Provide '{}' in the config file or on the command line", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Controller => format!("Controller problem: {}", self),
            ErrorCategory::Robot => format!("Robot problem: {}", self),
            ErrorCategory::Io => format!("I/O problem: {}", self),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, TeleopError>;
