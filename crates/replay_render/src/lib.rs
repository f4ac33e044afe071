//! Replay Render System
//!
//! Window, input and GPU presentation for the playback loop

pub mod backend;
pub mod colormap;
pub mod display;
pub mod error;
pub mod window;

pub use colormap::{colorize, Colormap};
pub use display::{DisplayConfig, WindowDisplay};
pub use error::DisplayError;

pub use wgpu;
pub use winit;
