pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{ReplayInput, SerialRobot, SimulatedRobot};
pub use crate::core::{gamepad::Gamepad, robot_controller::RobotController, teleop::TeleopEngine};
pub use crate::utils::error::{Result, TeleopError};
