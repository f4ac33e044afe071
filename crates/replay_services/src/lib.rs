//! Replay Services Layer
//!
//! Settings file and input bindings shared by the display and the runtime.

pub mod input;
pub mod settings;

pub use input::{CommandQueue, KeyBindings};
pub use settings::{DisplayMode, SampleOrderSetting, Settings, SettingsError};
