//! Window management
//!
//! Window attributes and key naming via winit

use replay_core::SensorGeometry;
use winit::keyboard::Key;
use winit::window::{Window, WindowAttributes};

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowConfig {
    /// Window sized to show every sensor pixel as a `scale` x `scale` block.
    pub fn for_sensor(title: impl Into<String>, geometry: SensorGeometry, scale: u32) -> Self {
        let scale = scale.max(1);
        Self {
            title: title.into(),
            width: geometry.width.saturating_mul(scale),
            height: geometry.height.saturating_mul(scale),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::for_sensor("DAVIS Replay", SensorGeometry::DAVIS240, 3)
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}

/// Name used by key bindings: the named key (`ArrowRight`, `Space`) or the
/// typed character.
pub fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Named(named) => Some(format!("{named:?}")),
        Key::Character(text) => Some(text.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{NamedKey, SmolStr};

    #[test]
    fn window_scales_sensor() {
        let config = WindowConfig::for_sensor("t", SensorGeometry::new(240, 180), 3);
        assert_eq!((config.width, config.height), (720, 540));
        let config = WindowConfig::for_sensor("t", SensorGeometry::new(240, 180), 0);
        assert_eq!((config.width, config.height), (240, 180));
    }

    #[test]
    fn named_keys_match_default_bindings() {
        assert_eq!(
            key_name(&Key::Named(NamedKey::ArrowRight)).as_deref(),
            Some("ArrowRight")
        );
        assert_eq!(key_name(&Key::Named(NamedKey::Space)).as_deref(), Some("Space"));
        assert_eq!(
            key_name(&Key::Character(SmolStr::new("+"))).as_deref(),
            Some("+")
        );
    }
}
