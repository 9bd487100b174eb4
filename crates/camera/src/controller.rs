//! Turntable camera controller with outbound event throttling.
//!
//! Converts normalized pointer/wheel input into camera state updates and
//! rate-limited `CameraEvent`s. Input that arrives inside a throttle window
//! feeds per-gesture accumulators; the next eligible call applies the
//! accumulated effect and emits exactly one command for it.

use foundation::math::{Vec2, Vec3};
use foundation::time::Timestamp;
use protocol::config::ViewerConfig;
use protocol::events::{CameraEvent, PointerDelta};

use crate::state::CameraState;

/// Pointer buttons with a camera role: primary rotates, middle pans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
}

impl PointerButton {
    /// Decode a platform button index. Buttons without a camera role
    /// (secondary, extras) return `None`.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::Primary => 0,
            Self::Middle => 1,
        }
    }
}

/// Pointer position normalized to [0,1]² with the vertical axis up (top = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormPos {
    pub x: f64,
    pub y: f64,
}

impl NormPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One throttle window's accumulated camera intent, ready to send, together
/// with the updated mirror values for the host-model property writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub event: CameraEvent,
    pub camera_position: Vec3,
    pub focus: Vec3,
}

#[derive(Debug, Default)]
struct ThrottleState {
    last_emit: Option<Timestamp>,
}

impl ThrottleState {
    fn ready(&self, now: Timestamp, window_ms: f64) -> bool {
        self.last_emit
            .is_none_or(|t| now.millis_since(t) > window_ms)
    }

    fn mark(&mut self, now: Timestamp) {
        self.last_emit = Some(now);
    }
}

/// Active drag gesture. Lives from pointer-down to the matching pointer-up or
/// surface leave; accumulated but un-emitted deltas die with it.
#[derive(Debug)]
struct PointerSession {
    button: PointerButton,
    last: NormPos,
    accum: Vec2,
}

pub struct CameraController {
    state: CameraState,
    config: ViewerConfig,
    throttle: ThrottleState,
    pointer: Option<PointerSession>,
    wheel_accum: f64,
}

impl CameraController {
    pub fn new(state: CameraState, config: ViewerConfig) -> Self {
        Self {
            state,
            config,
            throttle: ThrottleState::default(),
            pointer: None,
            wheel_accum: 0.0,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The host model can retune the event rate mid-session.
    pub fn set_max_event_rate(&mut self, rate: f64) {
        self.config.max_event_rate = rate;
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.is_some()
    }

    /// Button of the active drag gesture, if any.
    pub fn active_button(&self) -> Option<PointerButton> {
        self.pointer.as_ref().map(|session| session.button)
    }

    pub fn on_drag_start(&mut self, pos: NormPos, button: PointerButton) {
        self.pointer = Some(PointerSession {
            button,
            last: pos,
            accum: Vec2::ZERO,
        });
    }

    /// Primary-button drag: rotate around the focus.
    pub fn on_drag(&mut self, pos: NormPos, now: Timestamp) -> Option<CameraCommand> {
        self.drag_update(pos, PointerButton::Primary, now)
    }

    /// Middle-button drag: pan the focus in the view plane.
    pub fn on_mid_drag(&mut self, pos: NormPos, now: Timestamp) -> Option<CameraCommand> {
        self.drag_update(pos, PointerButton::Middle, now)
    }

    /// Quantized wheel input. Ticks inside a throttle window accumulate
    /// additively (sign included) and are emitted as a single zoom event.
    pub fn on_scroll(&mut self, wheel_delta: f64, now: Timestamp) -> Option<CameraCommand> {
        self.wheel_accum += wheel_delta;
        if !self.throttle.ready(now, self.config.throttle_window_ms()) {
            return None;
        }
        let delta = std::mem::take(&mut self.wheel_accum);
        if delta == 0.0 {
            return None;
        }
        self.apply_zoom(delta);
        self.throttle.mark(now);
        Some(self.command(CameraEvent::Zoom(delta)))
    }

    /// Releasing a button ends its gesture immediately.
    pub fn on_drag_end(&mut self, button: PointerButton) {
        if self
            .pointer
            .as_ref()
            .is_some_and(|session| session.button == button)
        {
            self.pointer = None;
        }
    }

    /// The pointer left the surface: treated as release of all buttons.
    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
    }

    fn drag_update(
        &mut self,
        pos: NormPos,
        wanted: PointerButton,
        now: Timestamp,
    ) -> Option<CameraCommand> {
        let session = self.pointer.as_mut()?;
        if session.button != wanted {
            return None;
        }
        session.accum += Vec2::new(pos.x - session.last.x, pos.y - session.last.y);
        session.last = pos;

        if !self.throttle.ready(now, self.config.throttle_window_ms()) {
            return None;
        }
        let accum = std::mem::take(&mut session.accum);

        let event = match wanted {
            PointerButton::Primary => {
                self.apply_rotate(accum);
                CameraEvent::Rotate(PointerDelta::new(accum.x, accum.y))
            }
            PointerButton::Middle => {
                self.apply_pan(accum);
                CameraEvent::Pan(PointerDelta::new(accum.x, accum.y))
            }
        };
        self.throttle.mark(now);
        Some(self.command(event))
    }

    fn apply_rotate(&mut self, d: Vec2) {
        let scale = self.config.rotate_scale;
        let limit = self.config.pole_limit;
        self.state.offset.azimuth -= scale * d.x;
        self.state.offset.polar = (self.state.offset.polar - scale * d.y).clamp(-limit, limit);
    }

    fn apply_pan(&mut self, d: Vec2) {
        let offset = self.state.offset.to_cartesian();
        let h = offset.cross(self.state.up).normalize();
        let v = offset.cross(h).normalize();
        // Pan speed tracks distance so apparent screen motion is zoom-invariant.
        let speed = self.state.offset.radius
            * 2.0
            * (self.config.view_angle_deg.to_radians() * 0.5).tan();
        self.state.focus = self.state.focus + (h * d.x + v * d.y) * speed;
    }

    fn apply_zoom(&mut self, wheel: f64) {
        let factor = (1.0 + self.config.zoom_scale).powf(-wheel);
        let scaled = self.state.offset.radius * factor;
        self.state.offset.radius = scaled.max(self.config.radius_floor);
    }

    fn command(&self, event: CameraEvent) -> CameraCommand {
        CameraCommand {
            event,
            camera_position: self.state.position(),
            focus: self.state.focus,
        }
    }
}
