//! Controller polling and event decoding.
//!
//! A [`Gamepad`] wraps an [`InputSource`] and turns its raw events into
//! [`ControllerEvent`]s using the PS4 layout. Name-identified components are
//! matched with the same keyword rules JInput-style backends need; typed
//! events pass straight through.

use crate::config::toml_config::ControllerSettings;
use crate::domain::model::{Axis, Button, ComponentEvent, ControllerEvent, InputEvent};
use crate::domain::ports::InputSource;
use crate::utils::error::{Result, TeleopError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A detected device, as listed by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<Id> {
    pub id: Id,
    pub name: String,
}

/// Picks the first device whose name contains a preferred keyword, or the
/// first device at all.
pub fn select_controller<'a, Id>(
    candidates: &'a [Candidate<Id>],
    preferred: &[String],
) -> Result<&'a Candidate<Id>> {
    let first = candidates.first().ok_or(TeleopError::NoControllersError)?;

    let matched = candidates.iter().find(|c| {
        let name = c.name.to_lowercase();
        preferred
            .iter()
            .any(|keyword| name.contains(&keyword.to_lowercase()))
    });

    match matched {
        Some(candidate) => {
            tracing::info!("Found PS4 Controller: {}", candidate.name);
            Ok(candidate)
        }
        None => {
            tracing::warn!("PS4 Controller not found. Using: {}", first.name);
            Ok(first)
        }
    }
}

/// Maps a digital component name to a button. First match wins.
pub fn button_for_component(name: &str) -> Option<Button> {
    let name = name.to_lowercase();
    let has = |s: &str| name.contains(s);

    if has("cross") || has("0") {
        Some(Button::Cross)
    } else if has("circle") || has("1") {
        Some(Button::Circle)
    } else if has("square") || has("2") {
        Some(Button::Square)
    } else if has("triangle") || has("3") {
        Some(Button::Triangle)
    } else if has("l1") || has("lb") {
        Some(Button::L1)
    } else if has("r1") || has("rb") {
        Some(Button::R1)
    } else if has("l2") || has("lt") {
        Some(Button::L2)
    } else if has("r2") || has("rt") {
        Some(Button::R2)
    } else if has("share") {
        Some(Button::Share)
    } else if has("options") {
        Some(Button::Options)
    } else {
        None
    }
}

/// Maps an analog component name to an axis. `rz` is checked before `z`.
pub fn axis_for_component(name: &str) -> Option<Axis> {
    let name = name.to_lowercase();
    let has = |s: &str| name.contains(s);

    if has("x") && has("left") {
        Some(Axis::LeftStickX)
    } else if has("y") && has("left") {
        Some(Axis::LeftStickY)
    } else if has("x") && has("right") {
        Some(Axis::RightStickX)
    } else if has("y") && has("right") {
        Some(Axis::RightStickY)
    } else if has("rz") || (has("trigger") && has("right")) {
        Some(Axis::R2Trigger)
    } else if has("z") || (has("trigger") && has("left")) {
        Some(Axis::L2Trigger)
    } else {
        None
    }
}

#[derive(Debug, PartialEq)]
pub enum PollOutcome {
    Events(Vec<ControllerEvent>),
    Disconnected,
}

/// Stops a running [`Gamepad`] from another task.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            tracing::info!("Stopping PS4 Controller polling...");
        }
    }
}

pub struct Gamepad<I: InputSource> {
    source: I,
    axis_noise_floor: f32,
    running: Arc<AtomicBool>,
    connected: bool,
}

impl<I: InputSource> Gamepad<I> {
    pub fn new(source: I, settings: &ControllerSettings) -> Self {
        Self {
            source,
            axis_noise_floor: settings.axis_noise_floor,
            running: Arc::new(AtomicBool::new(false)),
            connected: true,
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Controller already running");
            return;
        }
        tracing::info!("Starting PS4 Controller polling...");
    }

    pub fn stop(&mut self) {
        self.stop_handle().stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Polls the source once and decodes everything it had queued.
    pub fn poll(&mut self) -> Result<PollOutcome> {
        match self.source.poll()? {
            Some(raw) => Ok(PollOutcome::Events(
                raw.into_iter().filter_map(|e| self.decode(e)).collect(),
            )),
            None => {
                tracing::warn!("Controller disconnected!");
                self.connected = false;
                self.running.store(false, Ordering::SeqCst);
                Ok(PollOutcome::Disconnected)
            }
        }
    }

    pub fn decode(&self, event: InputEvent) -> Option<ControllerEvent> {
        match event {
            InputEvent::Component(component) => self.decode_component(&component),
            InputEvent::Button { button, pressed: true } => Some(ControllerEvent::ButtonPressed(button)),
            InputEvent::Button { button, pressed: false } => {
                Some(ControllerEvent::ButtonReleased(button))
            }
            InputEvent::Axis { axis, value } => {
                Some(ControllerEvent::AxisMotion(axis, self.filter_noise(value)))
            }
        }
    }

    fn decode_component(&self, event: &ComponentEvent) -> Option<ControllerEvent> {
        if event.analog {
            let axis = axis_for_component(&event.component)?;
            return Some(ControllerEvent::AxisMotion(axis, self.filter_noise(event.value)));
        }

        if event.value == 1.0 {
            button_for_component(&event.component).map(ControllerEvent::ButtonPressed)
        } else if event.value == 0.0 {
            button_for_component(&event.component).map(ControllerEvent::ButtonReleased)
        } else {
            None
        }
    }

    fn filter_noise(&self, value: f32) -> f32 {
        if value.abs() < self.axis_noise_floor {
            0.0
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedSource {
        frames: VecDeque<Vec<InputEvent>>,
    }

    impl InputSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn poll(&mut self) -> Result<Option<Vec<InputEvent>>> {
            Ok(self.frames.pop_front())
        }
    }

    fn gamepad(frames: Vec<Vec<InputEvent>>) -> Gamepad<ScriptedSource> {
        Gamepad::new(
            ScriptedSource {
                frames: frames.into(),
            },
            &ControllerSettings::default(),
        )
    }

    fn candidates(names: &[&str]) -> Vec<Candidate<usize>> {
        names
            .iter()
            .enumerate()
            .map(|(id, name)| Candidate {
                id,
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_select_prefers_playstation_names() {
        let preferred = ControllerSettings::default().preferred_names;
        let list = candidates(&["Logitech Extreme 3D", "Sony Interactive Entertainment Wireless Controller"]);
        assert_eq!(select_controller(&list, &preferred).unwrap().id, 1);
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let preferred = ControllerSettings::default().preferred_names;
        let list = candidates(&["Xbox 360 Pad", "Generic Joystick"]);
        assert_eq!(select_controller(&list, &preferred).unwrap().id, 0);
    }

    #[test]
    fn test_select_without_devices_fails() {
        let preferred = ControllerSettings::default().preferred_names;
        let list: Vec<Candidate<usize>> = vec![];
        assert!(matches!(
            select_controller(&list, &preferred),
            Err(TeleopError::NoControllersError)
        ));
    }

    #[test]
    fn test_button_names() {
        assert_eq!(button_for_component("Cross"), Some(Button::Cross));
        assert_eq!(button_for_component("Button 0"), Some(Button::Cross));
        assert_eq!(button_for_component("circle"), Some(Button::Circle));
        assert_eq!(button_for_component("Square"), Some(Button::Square));
        assert_eq!(button_for_component("TRIANGLE"), Some(Button::Triangle));
        assert_eq!(button_for_component("LB"), Some(Button::L1));
        assert_eq!(button_for_component("RB"), Some(Button::R1));
        assert_eq!(button_for_component("LT"), Some(Button::L2));
        assert_eq!(button_for_component("RT"), Some(Button::R2));
        assert_eq!(button_for_component("Share"), Some(Button::Share));
        assert_eq!(button_for_component("Options"), Some(Button::Options));
        assert_eq!(button_for_component("Mode"), None);
    }

    #[test]
    fn test_digit_rules_take_precedence() {
        // "button 10" hits the "0" rule before anything else
        assert_eq!(button_for_component("Button 10"), Some(Button::Cross));
        assert_eq!(button_for_component("r1"), Some(Button::Circle));
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(axis_for_component("Left Stick X"), Some(Axis::LeftStickX));
        assert_eq!(axis_for_component("left y"), Some(Axis::LeftStickY));
        assert_eq!(axis_for_component("Right X"), Some(Axis::RightStickX));
        assert_eq!(axis_for_component("Right Y"), Some(Axis::RightStickY));
        assert_eq!(axis_for_component("Z Axis"), Some(Axis::L2Trigger));
        assert_eq!(axis_for_component("Z Rotation"), Some(Axis::L2Trigger));
        assert_eq!(axis_for_component("rz"), Some(Axis::R2Trigger));
        assert_eq!(axis_for_component("Left Trigger"), Some(Axis::L2Trigger));
        assert_eq!(axis_for_component("Right Trigger"), Some(Axis::R2Trigger));
        assert_eq!(axis_for_component("Hat Switch"), None);
    }

    #[test]
    fn test_decode_digital_values() {
        let pad = gamepad(vec![]);
        assert_eq!(
            pad.decode(InputEvent::Component(ComponentEvent::digital("cross", 1.0))),
            Some(ControllerEvent::ButtonPressed(Button::Cross))
        );
        assert_eq!(
            pad.decode(InputEvent::Component(ComponentEvent::digital("cross", 0.0))),
            Some(ControllerEvent::ButtonReleased(Button::Cross))
        );
        assert_eq!(
            pad.decode(InputEvent::Component(ComponentEvent::digital("cross", 0.5))),
            None
        );
    }

    #[test]
    fn test_decode_applies_noise_floor() {
        let pad = gamepad(vec![]);
        assert_eq!(
            pad.decode(InputEvent::Component(ComponentEvent::analog("left x", 0.05))),
            Some(ControllerEvent::AxisMotion(Axis::LeftStickX, 0.0))
        );
        assert_eq!(
            pad.decode(InputEvent::Axis {
                axis: Axis::RightStickX,
                value: -0.09
            }),
            Some(ControllerEvent::AxisMotion(Axis::RightStickX, 0.0))
        );
        assert_eq!(
            pad.decode(InputEvent::Axis {
                axis: Axis::RightStickX,
                value: -0.4
            }),
            Some(ControllerEvent::AxisMotion(Axis::RightStickX, -0.4))
        );
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut pad = gamepad(vec![]);
        pad.start();
        pad.start();
        assert!(pad.is_running());
        pad.stop();
        assert!(!pad.is_running());
    }

    #[test]
    fn test_stop_handle_stops_poller() {
        let mut pad = gamepad(vec![]);
        let handle = pad.stop_handle();
        pad.start();
        handle.stop();
        assert!(!pad.is_running());
    }

    #[test]
    fn test_poll_decodes_and_detects_disconnect() {
        let mut pad = gamepad(vec![vec![
            InputEvent::Component(ComponentEvent::digital("options", 1.0)),
            InputEvent::Component(ComponentEvent::digital("unknown", 1.0)),
            InputEvent::Button {
                button: Button::Ps,
                pressed: true,
            },
        ]]);
        pad.start();

        assert_eq!(
            pad.poll().unwrap(),
            PollOutcome::Events(vec![
                ControllerEvent::ButtonPressed(Button::Options),
                ControllerEvent::ButtonPressed(Button::Ps),
            ])
        );
        assert!(pad.is_connected());

        assert_eq!(pad.poll().unwrap(), PollOutcome::Disconnected);
        assert!(!pad.is_connected());
        assert!(!pad.is_running());
    }
}
