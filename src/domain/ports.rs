use crate::config::toml_config::{ControllerSettings, DriveSettings, RobotSettings};
use crate::domain::model::{Axis, Button, InputEvent};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A source of raw controller input, polled once per engine tick.
pub trait InputSource {
    fn name(&self) -> &str;

    /// Drains pending input. `Ok(None)` means the device is gone.
    fn poll(&mut self) -> Result<Option<Vec<InputEvent>>>;
}

/// Motion and action commands for a differential-drive robot.
/// Velocities are in `[-1.0, 1.0]`.
#[async_trait]
pub trait Robot: Send + Sync {
    async fn drive(&self, left_velocity: f64, right_velocity: f64) -> Result<()>;

    /// Turns in place.
    async fn rotate(&self, angular_velocity: f64) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    async fn perform_action(&self, action: &str) -> Result<()>;

    fn is_connected(&self) -> bool;
}

#[async_trait]
pub trait ControllerListener: Send + Sync {
    async fn on_button_pressed(&self, button: Button);

    async fn on_button_released(&self, button: Button);

    /// `value` is in `[-1.0, 1.0]`.
    async fn on_axis_motion(&self, axis: Axis, value: f32);

    async fn on_controller_disconnected(&self);

    /// Called once when a session ends, whatever the reason.
    async fn on_shutdown(&self) {}
}

pub trait ConfigProvider: Send + Sync {
    fn controller(&self) -> &ControllerSettings;
    fn drive(&self) -> &DriveSettings;
    fn robot(&self) -> &RobotSettings;
}
