// Adapters layer: concrete robots and input sources behind the domain ports.

#[cfg(feature = "gamepad")]
pub mod gilrs_input;
pub mod replay;
pub mod serial;
pub mod simulated;

#[cfg(feature = "gamepad")]
pub use gilrs_input::GilrsInput;
pub use replay::ReplayInput;
pub use serial::SerialRobot;
pub use simulated::SimulatedRobot;
