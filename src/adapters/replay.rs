//! Recorded input scripts, so sessions can run without a physical pad.
//!
//! ```toml
//! name = "Wireless Controller (replay)"
//!
//! [[frames]]
//! events = [{ component = "left y", analog = true, value = -0.8 }]
//!
//! [[frames]]
//! events = [{ component = "cross", value = 1.0 }]
//! ```
//!
//! One frame is delivered per poll. After the last frame the source reports
//! itself disconnected.

use crate::core::{InputEvent, InputSource};
use crate::domain::model::ComponentEvent;
use crate::utils::error::{Result, TeleopError};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ReplayScript {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize)]
struct ReplayFrame {
    #[serde(default)]
    events: Vec<ComponentEvent>,
}

fn default_name() -> String {
    "replay".to_string()
}

pub struct ReplayInput {
    name: String,
    frames: VecDeque<Vec<InputEvent>>,
}

impl ReplayInput {
    pub fn from_frames(name: &str, frames: Vec<Vec<InputEvent>>) -> Self {
        Self {
            name: name.to_string(),
            frames: frames.into(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let script: ReplayScript = toml::from_str(content).map_err(|e| TeleopError::ReplayError {
            message: e.to_string(),
        })?;

        let frames = script
            .frames
            .into_iter()
            .map(|frame| frame.events.into_iter().map(InputEvent::Component).collect())
            .collect::<Vec<_>>();

        tracing::info!("Loaded replay '{}' with {} frames", script.name, frames.len());
        Ok(Self::from_frames(&script.name, frames))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ReplayInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> Result<Option<Vec<InputEvent>>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let mut input = ReplayInput::from_toml_str(
            r#"
name = "DualShock 4 capture"

[[frames]]
events = [
    { component = "left y", analog = true, value = -0.8 },
    { component = "cross", value = 1.0 },
]

[[frames]]

[[frames]]
events = [{ component = "cross", value = 0.0 }]
"#,
        )
        .unwrap();

        assert_eq!(input.name(), "DualShock 4 capture");
        assert_eq!(input.remaining(), 3);

        let first = input.poll().unwrap().unwrap();
        assert_eq!(
            first,
            vec![
                InputEvent::Component(ComponentEvent::analog("left y", -0.8)),
                InputEvent::Component(ComponentEvent::digital("cross", 1.0)),
            ]
        );
        assert_eq!(input.poll().unwrap(), Some(vec![]));
        assert_eq!(input.poll().unwrap().unwrap().len(), 1);
        assert_eq!(input.poll().unwrap(), None);
    }

    #[test]
    fn test_empty_script_disconnects_immediately() {
        let mut input = ReplayInput::from_toml_str("").unwrap();
        assert_eq!(input.name(), "replay");
        assert_eq!(input.poll().unwrap(), None);
    }

    #[test]
    fn test_malformed_script_is_rejected() {
        let result = ReplayInput::from_toml_str("[[frames]]\nevents = [{ component = 3 }]\n");
        assert!(matches!(result, Err(TeleopError::ReplayError { .. })));
    }
}
