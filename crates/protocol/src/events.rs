//! Camera intent events, client → host model.
//!
//! One event is produced per throttle window and carries the accumulated
//! effect of every input inside that window.

use serde::{Deserialize, Serialize};

/// Accumulated pointer delta in normalized surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerDelta {
    pub x: f64,
    pub y: f64,
}

impl PointerDelta {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Wire shape is `{"event": "rotate", "data": {"x": .., "y": ..}}`; the zoom
/// payload is the sign-accumulated wheel delta as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum CameraEvent {
    Rotate(PointerDelta),
    Pan(PointerDelta),
    Zoom(f64),
}
