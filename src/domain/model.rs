use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// PS4 button layout. Ids are stable and used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Cross,
    Circle,
    Square,
    Triangle,
    L1,
    R1,
    L2,
    R2,
    Share,
    Options,
    L3,
    R3,
    Ps,
    Touchpad,
}

impl Button {
    pub fn id(self) -> u8 {
        match self {
            Button::Cross => 0,
            Button::Circle => 1,
            Button::Square => 2,
            Button::Triangle => 3,
            Button::L1 => 4,
            Button::R1 => 5,
            Button::L2 => 6,
            Button::R2 => 7,
            Button::Share => 8,
            Button::Options => 9,
            Button::L3 => 10,
            Button::R3 => 11,
            Button::Ps => 12,
            Button::Touchpad => 13,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Button::Cross => "Cross (X)",
            Button::Circle => "Circle (O)",
            Button::Square => "Square",
            Button::Triangle => "Triangle",
            Button::L1 => "L1",
            Button::R1 => "R1",
            Button::L2 => "L2",
            Button::R2 => "R2",
            Button::Share => "Share",
            Button::Options => "Options",
            Button::L3 => "L3",
            Button::R3 => "R3",
            Button::Ps => "PS",
            Button::Touchpad => "Touchpad",
        };
        f.write_str(label)
    }
}

/// Analog axes. Y axes are down-positive: pushing a stick forward reads negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    L2Trigger,
    R2Trigger,
}

impl Axis {
    pub fn id(self) -> u8 {
        match self {
            Axis::LeftStickX => 0,
            Axis::LeftStickY => 1,
            Axis::RightStickX => 2,
            Axis::RightStickY => 3,
            Axis::L2Trigger => 4,
            Axis::R2Trigger => 5,
        }
    }
}

/// A device component change identified only by its name, as reported by
/// name-based backends and replay scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEvent {
    pub component: String,
    #[serde(default)]
    pub analog: bool,
    pub value: f32,
}

impl ComponentEvent {
    pub fn digital(component: &str, value: f32) -> Self {
        Self {
            component: component.to_string(),
            analog: false,
            value,
        }
    }

    pub fn analog(component: &str, value: f32) -> Self {
        Self {
            component: component.to_string(),
            analog: true,
            value,
        }
    }
}

/// Raw input as delivered by an [`InputSource`](crate::domain::ports::InputSource).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Component(ComponentEvent),
    Button { button: Button, pressed: bool },
    Axis { axis: Axis, value: f32 },
}

/// Decoded controller input, ready for a listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    ButtonPressed(Button),
    ButtonReleased(Button),
    AxisMotion(Axis, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Shutdown,
    Disconnected,
    Stopped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub controller: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub polls: u64,
    pub events: u64,
    pub stop_reason: StopReason,
}
