pub mod gamepad;
pub mod mapping;
pub mod robot_controller;
pub mod teleop;

pub use crate::domain::model::{Axis, Button, ControllerEvent, InputEvent, SessionReport};
pub use crate::domain::ports::{ConfigProvider, ControllerListener, InputSource, Robot};
pub use crate::utils::error::Result;
