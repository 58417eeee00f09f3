//! Line protocol robot over a serial link.
//!
//! Commands are ASCII lines terminated by `\n`:
//!
//! ```text
//! M:<left>,<right>   track speeds, velocity x 100 truncated toward zero
//! STOP
//! ACTION:<name>
//! ```

use crate::core::mapping;
use crate::core::Robot;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

pub fn move_command(left_velocity: f64, right_velocity: f64) -> String {
    let left = (mapping::clamp_velocity(left_velocity) * 100.0) as i32;
    let right = (mapping::clamp_velocity(right_velocity) * 100.0) as i32;
    format!("M:{},{}\n", left, right)
}

pub fn stop_command() -> String {
    "STOP\n".to_string()
}

pub fn action_command(action: &str) -> String {
    format!("ACTION:{}\n", action)
}

pub struct SerialRobot<W: Write + Send> {
    port_name: String,
    transport: Mutex<W>,
    connected: AtomicBool,
}

#[cfg(feature = "serial")]
impl SerialRobot<Box<dyn serialport::SerialPort>> {
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(std::time::Duration::from_millis(100))
            .open()
            .map_err(|e| {
                tracing::error!("Failed to connect to robot on port {}: {}", port_name, e);
                e
            })?;

        tracing::info!("Serial robot connected on {} at {} baud", port_name, baud_rate);
        Ok(Self::new(port_name, port))
    }
}

impl<W: Write + Send> SerialRobot<W> {
    pub fn new(port_name: &str, transport: W) -> Self {
        Self {
            port_name: port_name.to_string(),
            transport: Mutex::new(transport),
            connected: AtomicBool::new(true),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Returns `false` and warns when the link is closed.
    fn check_connected(&self) -> bool {
        let connected = self.connected.load(Ordering::SeqCst);
        if !connected {
            tracing::warn!("Robot not connected");
        }
        connected
    }

    async fn send_command(&self, command: &str) -> Result<()> {
        let mut transport = self.transport.lock().await;
        transport.write_all(command.as_bytes())?;
        transport.flush()?;
        tracing::debug!("Command sent: {}", command.trim_end());
        Ok(())
    }

    pub async fn close(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.transport.lock().await.flush() {
                tracing::error!("Error closing serial connection: {}", e);
            }
            tracing::info!("Serial robot disconnected");
        }
    }
}

#[async_trait]
impl<W: Write + Send> Robot for SerialRobot<W> {
    async fn drive(&self, left_velocity: f64, right_velocity: f64) -> Result<()> {
        if !self.check_connected() {
            return Ok(());
        }
        self.send_command(&move_command(left_velocity, right_velocity))
            .await
    }

    async fn rotate(&self, angular_velocity: f64) -> Result<()> {
        self.drive(-angular_velocity, angular_velocity).await
    }

    async fn stop(&self) -> Result<()> {
        if !self.check_connected() {
            return Ok(());
        }
        self.send_command(&stop_command()).await?;
        tracing::info!("Stop command sent");
        Ok(())
    }

    async fn perform_action(&self, action: &str) -> Result<()> {
        if !self.check_connected() {
            return Ok(());
        }
        self.send_command(&action_command(action)).await?;
        tracing::info!("Action performed: {}", action);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
