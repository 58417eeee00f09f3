use crate::core::gamepad::{select_controller, Candidate};
use crate::core::{Axis, Button, InputEvent, InputSource};
use crate::utils::error::{Result, TeleopError};
use gilrs::{Event, EventType, GamepadId, Gilrs};
use serde::Serialize;

/// A gamepad detected by gilrs.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedGamepad {
    pub id: usize,
    pub name: String,
    pub selected: bool,
}

fn open_gilrs() -> Result<Gilrs> {
    Gilrs::new().map_err(|e| TeleopError::GamepadBackendError {
        message: e.to_string(),
    })
}

fn candidates(gilrs: &Gilrs) -> Vec<Candidate<GamepadId>> {
    gilrs
        .gamepads()
        .map(|(id, pad)| Candidate {
            id,
            name: pad.name().to_string(),
        })
        .collect()
}

/// Lists connected gamepads and marks the one [`GilrsInput::open`] would pick.
pub fn list_gamepads(preferred: &[String]) -> Result<Vec<DetectedGamepad>> {
    let gilrs = open_gilrs()?;
    let found = candidates(&gilrs);
    let selected = match select_controller(&found, preferred) {
        Ok(candidate) => Some(candidate.id),
        Err(TeleopError::NoControllersError) => None,
        Err(e) => return Err(e),
    };

    Ok(found
        .iter()
        .map(|c| DetectedGamepad {
            id: usize::from(c.id),
            name: c.name.clone(),
            selected: Some(c.id) == selected,
        })
        .collect())
}

pub fn map_button(button: gilrs::Button) -> Option<Button> {
    use gilrs::Button as G;
    match button {
        G::South => Some(Button::Cross),
        G::East => Some(Button::Circle),
        G::West => Some(Button::Square),
        G::North => Some(Button::Triangle),
        G::LeftTrigger => Some(Button::L1),
        G::RightTrigger => Some(Button::R1),
        G::LeftTrigger2 => Some(Button::L2),
        G::RightTrigger2 => Some(Button::R2),
        G::Select => Some(Button::Share),
        G::Start => Some(Button::Options),
        G::LeftThumb => Some(Button::L3),
        G::RightThumb => Some(Button::R3),
        G::Mode => Some(Button::Ps),
        _ => None,
    }
}

/// gilrs reports Y axes up-positive; they are flipped to down-positive here.
pub fn map_axis(axis: gilrs::Axis, value: f32) -> Option<(Axis, f32)> {
    use gilrs::Axis as G;
    match axis {
        G::LeftStickX => Some((Axis::LeftStickX, value)),
        G::LeftStickY => Some((Axis::LeftStickY, -value)),
        G::RightStickX => Some((Axis::RightStickX, value)),
        G::RightStickY => Some((Axis::RightStickY, -value)),
        G::LeftZ => Some((Axis::L2Trigger, value)),
        G::RightZ => Some((Axis::R2Trigger, value)),
        _ => None,
    }
}

/// Analog travel of L2/R2, `0.0..=1.0`.
pub fn map_trigger(button: gilrs::Button, value: f32) -> Option<InputEvent> {
    let axis = match button {
        gilrs::Button::LeftTrigger2 => Axis::L2Trigger,
        gilrs::Button::RightTrigger2 => Axis::R2Trigger,
        _ => return None,
    };
    Some(InputEvent::Axis { axis, value })
}

pub fn map_event(event: EventType) -> Option<InputEvent> {
    match event {
        EventType::ButtonPressed(button, _) => map_button(button).map(|button| InputEvent::Button {
            button,
            pressed: true,
        }),
        EventType::ButtonReleased(button, _) => {
            map_button(button).map(|button| InputEvent::Button {
                button,
                pressed: false,
            })
        }
        EventType::ButtonChanged(button, value, _) => map_trigger(button, value),
        EventType::AxisChanged(axis, value, _) => {
            map_axis(axis, value).map(|(axis, value)| InputEvent::Axis { axis, value })
        }
        _ => None,
    }
}

/// Reads one physical gamepad through gilrs.
pub struct GilrsInput {
    gilrs: Gilrs,
    id: GamepadId,
    name: String,
}

impl GilrsInput {
    pub fn open(preferred: &[String]) -> Result<Self> {
        let gilrs = open_gilrs()?;
        let found = candidates(&gilrs);
        let selected = select_controller(&found, preferred)?;
        let (id, name) = (selected.id, selected.name.clone());

        Ok(Self { gilrs, id, name })
    }
}

impl InputSource for GilrsInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> Result<Option<Vec<InputEvent>>> {
        let mut events = Vec::new();

        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            if id != self.id {
                continue;
            }
            if event == EventType::Disconnected {
                return Ok(None);
            }
            if let Some(input) = map_event(event) {
                events.push(input);
            }
        }

        if self.gilrs.connected_gamepad(self.id).is_none() {
            return Ok(None);
        }
        Ok(Some(events))
    }
}
