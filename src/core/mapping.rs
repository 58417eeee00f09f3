//! Shaping of raw stick and trigger values into motor commands.

use crate::config::toml_config::DriveSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

pub fn apply_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if value.abs() < dead_zone {
        0.0
    } else {
        value
    }
}

/// Dead zone, sensitivity, then clamp to `[-1, 1]`.
pub fn motor_speed(joystick_value: f32, settings: &DriveSettings) -> f32 {
    let value = apply_dead_zone(joystick_value, settings.dead_zone);
    (value * settings.sensitivity).clamp(-1.0, 1.0)
}

pub fn trigger_speed(trigger_value: f32, settings: &DriveSettings) -> f32 {
    trigger_value * settings.trigger_sensitivity
}

/// Arcade mix for one side of a differential drive. Not clamped.
pub fn differential_drive(forward: f32, turn: f32, side: Side) -> f32 {
    match side {
        Side::Left => forward + turn,
        Side::Right => forward - turn,
    }
}

pub fn clamp_velocity(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}
