use crate::config::toml_config::DriveSettings;
use crate::core::mapping::{self, Side};
use crate::domain::model::{Axis, Button};
use crate::domain::ports::{ControllerListener, Robot};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Bridges controller input to robot commands.
pub struct RobotController<R: Robot> {
    robot: R,
    settings: DriveSettings,
}

impl<R: Robot> RobotController<R> {
    pub fn new(robot: R, settings: DriveSettings) -> Self {
        Self { robot, settings }
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    fn report(result: Result<()>, what: &str) {
        if let Err(e) = result {
            tracing::error!("Robot {} failed: {}", what, e);
        }
    }

    async fn handle_movement(&self, forward: f32) {
        let forward = forward * self.settings.max_forward_speed;
        tracing::debug!("Movement: {:.2}", forward);
        let left = mapping::differential_drive(forward, 0.0, Side::Left);
        let right = mapping::differential_drive(forward, 0.0, Side::Right);
        Self::report(self.robot.drive(left as f64, right as f64).await, "move");
    }

    async fn handle_rotation(&self, rotation: f32) {
        let rotation = rotation * self.settings.max_rotation_speed;
        tracing::debug!("Rotation: {:.2}", rotation);
        Self::report(self.robot.rotate(rotation as f64).await, "rotate");
    }

    async fn handle_strafe(&self, strafe: f32) {
        let strafe = strafe * self.settings.max_strafe_speed;
        tracing::debug!("Strafe: {:.2}", strafe);
        // left track backwards, right track forwards for positive input
        let left = mapping::differential_drive(0.0, -strafe, Side::Left);
        let right = mapping::differential_drive(0.0, -strafe, Side::Right);
        Self::report(self.robot.drive(left as f64, right as f64).await, "strafe");
    }

    async fn action(&self, action: &str) {
        Self::report(self.robot.perform_action(action).await, "action");
    }
}

#[async_trait]
impl<R: Robot> ControllerListener for RobotController<R> {
    async fn on_button_pressed(&self, button: Button) {
        tracing::debug!("Button pressed: {}", button.id());

        match button {
            Button::Cross => {
                tracing::info!("Cross (X) pressed - Performing action");
                self.action("jump").await;
            }
            Button::Circle => {
                tracing::info!("Circle (O) pressed - Special action 1");
                self.action("action1").await;
            }
            Button::Square => {
                tracing::info!("Square pressed - Special action 2");
                self.action("action2").await;
            }
            Button::Triangle => {
                tracing::info!("Triangle pressed - Special action 3");
                self.action("action3").await;
            }
            Button::L1 => {
                tracing::info!("L1 pressed");
                self.action("boost").await;
            }
            Button::R1 => {
                tracing::info!("R1 pressed");
                self.action("strafe").await;
            }
            Button::Options => {
                tracing::info!("Options pressed - Stopping robot");
                Self::report(self.robot.stop().await, "stop");
            }
            other => tracing::debug!("{} has no binding", other),
        }
    }

    async fn on_button_released(&self, button: Button) {
        tracing::debug!("Button released: {}", button.id());
    }

    async fn on_axis_motion(&self, axis: Axis, value: f32) {
        let speed = mapping::motor_speed(value, &self.settings);

        match axis {
            Axis::LeftStickX => self.handle_rotation(speed).await,
            // stick Y is down-positive
            Axis::LeftStickY => self.handle_movement(-speed).await,
            Axis::RightStickX => self.handle_strafe(speed).await,
            Axis::RightStickY => tracing::debug!("Right stick Y: {:.2}", speed),
            Axis::L2Trigger => tracing::debug!(
                "Left trigger: {:.2} (speed {:.2})",
                value,
                mapping::trigger_speed(value, &self.settings)
            ),
            Axis::R2Trigger => tracing::debug!(
                "Right trigger: {:.2} (speed {:.2})",
                value,
                mapping::trigger_speed(value, &self.settings)
            ),
        }
    }

    async fn on_controller_disconnected(&self) {
        tracing::warn!("Controller disconnected!");
        Self::report(self.robot.stop().await, "stop");
    }

    async fn on_shutdown(&self) {
        Self::report(self.robot.stop().await, "stop");
        tracing::info!("Robot controller stopped");
    }
}
