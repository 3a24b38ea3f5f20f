use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single finger (or emulated mouse button) within a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

/// A normalized touch. Positions are logical viewport coordinates (origin top-left, +y down).
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct TouchRecord {
    pub id: u64,
    pub position: Vec2,
    /// movement since the previous frame after the deadzone filter
    pub delta: Vec2,
    pub delta_time: f32,
    pub phase: TouchPhase,
    pub tap_count: u32,
}

impl TouchRecord {
    pub fn is_moved(&self) -> bool {
        self.phase == TouchPhase::Moved
    }
}

/// Where [`TouchFrame`] gets its records from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum InputMode {
    /// platform multi-touch
    Touch,
    /// mouse buttons 0-2 emulate up to three fingers
    Mouse,
}

impl Default for InputMode {
    fn default() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            InputMode::Touch
        } else {
            InputMode::Mouse
        }
    }
}

/// Input tunables. Widths and deadzones are logical pixels, the unit touch positions are reported in.
#[derive(Resource, Clone, Debug, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct TouchInputConfig {
    pub mode: InputMode,
    /// windows wider than this use the wide deadzone
    pub wide_screen_width: f32,
    pub touch_dead_zone: f32,
    pub wide_touch_dead_zone: f32,
    /// below this on both axes a moved touch is reported as stationary
    pub stationary_threshold: f32,
    pub mouse_dead_zone: f32,
}

impl Default for TouchInputConfig {
    fn default() -> Self {
        Self {
            mode: InputMode::default(),
            wide_screen_width: 900.0,
            touch_dead_zone: 1.0,
            wide_touch_dead_zone: 2.0,
            stationary_threshold: 0.5,
            mouse_dead_zone: 0.01,
        }
    }
}

/// The touches seen this frame, rebuilt every `PreUpdate`.
#[derive(Resource, Default, Debug, Clone)]
pub struct TouchFrame {
    touches: Vec<TouchRecord>,
    /// cursor position when running on a mouse, `None` on touch screens or outside the window
    pub cursor: Option<Vec2>,
    /// logical size of the primary window, zero when there is none
    pub viewport_size: Vec2,
}

impl TouchFrame {
    pub fn new(touches: Vec<TouchRecord>) -> Self {
        Self {
            touches,
            ..default()
        }
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    pub fn touch(&self, index: usize) -> Option<TouchRecord> {
        self.touches.get(index).copied()
    }

    pub fn touches(&self) -> &[TouchRecord] {
        &self.touches
    }

    pub(crate) fn replace(&mut self, touches: Vec<TouchRecord>) {
        self.touches = touches;
    }
}
