use crate::core::mapping;
use crate::core::Robot;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// A robot that only logs what it is told and remembers its track velocities.
#[derive(Debug, Default)]
pub struct SimulatedRobot {
    velocities: Mutex<(f64, f64)>,
}

impl SimulatedRobot {
    pub fn new() -> Self {
        tracing::info!("Robot initialized");
        Self::default()
    }

    /// Current `(left, right)` velocities.
    pub async fn velocities(&self) -> (f64, f64) {
        *self.velocities.lock().await
    }
}

#[async_trait]
impl Robot for SimulatedRobot {
    async fn drive(&self, left_velocity: f64, right_velocity: f64) -> Result<()> {
        let left = mapping::clamp_velocity(left_velocity);
        let right = mapping::clamp_velocity(right_velocity);
        *self.velocities.lock().await = (left, right);

        tracing::debug!("Move: left={:.2}, right={:.2}", left, right);
        Ok(())
    }

    async fn rotate(&self, angular_velocity: f64) -> Result<()> {
        let angular = mapping::clamp_velocity(angular_velocity);
        tracing::debug!("Rotate: {:.2}", angular);

        // spin in place: tracks run opposite ways
        self.drive(-angular, angular).await
    }

    async fn stop(&self) -> Result<()> {
        *self.velocities.lock().await = (0.0, 0.0);
        tracing::info!("Robot stopped");
        Ok(())
    }

    async fn perform_action(&self, action: &str) -> Result<()> {
        tracing::info!("Performing action: {}", action);

        match action.to_lowercase().as_str() {
            "forward" => self.drive(1.0, 1.0).await,
            "backward" => self.drive(-1.0, -1.0).await,
            "left" => self.drive(-1.0, 1.0).await,
            "right" => self.drive(1.0, -1.0).await,
            "stop" => self.stop().await,
            _ => {
                tracing::warn!("Unknown action: {}", action);
                Ok(())
            }
        }
    }

    fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_drive_clamps_velocities() {
        let robot = SimulatedRobot::new();
        assert_ok!(robot.drive(1.5, -2.0).await);
        assert_eq!(robot.velocities().await, (1.0, -1.0));
    }

    #[tokio::test]
    async fn test_rotate_spins_in_place() {
        let robot = SimulatedRobot::new();
        assert_ok!(robot.rotate(0.5).await);
        assert_eq!(robot.velocities().await, (-0.5, 0.5));

        assert_ok!(robot.rotate(3.0).await);
        assert_eq!(robot.velocities().await, (-1.0, 1.0));
    }

    #[tokio::test]
    async fn test_rotate_keeps_exact_velocities() {
        let robot = SimulatedRobot::new();
        assert_ok!(robot.rotate(0.3).await);
        assert_eq!(robot.velocities().await, (-0.3, 0.3));

        assert_ok!(robot.rotate(-0.7).await);
        assert_eq!(robot.velocities().await, (0.7, -0.7));
    }

    #[tokio::test]
    async fn test_named_actions() {
        let robot = SimulatedRobot::new();

        assert_ok!(robot.perform_action("Forward").await);
        assert_eq!(robot.velocities().await, (1.0, 1.0));

        assert_ok!(robot.perform_action("left").await);
        assert_eq!(robot.velocities().await, (-1.0, 1.0));

        assert_ok!(robot.perform_action("right").await);
        assert_eq!(robot.velocities().await, (1.0, -1.0));

        assert_ok!(robot.perform_action("backward").await);
        assert_eq!(robot.velocities().await, (-1.0, -1.0));

        assert_ok!(robot.perform_action("STOP").await);
        assert_eq!(robot.velocities().await, (0.0, 0.0));
    }

    #[tokio::test]
    async fn test_unknown_action_leaves_state() {
        let robot = SimulatedRobot::new();
        assert_ok!(robot.drive(0.3, 0.3).await);
        assert_ok!(robot.perform_action("jump").await);
        assert_eq!(robot.velocities().await, (0.3, 0.3));
        assert!(robot.is_connected());
    }
}
