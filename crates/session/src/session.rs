//! Per-connection viewer session: owns the camera controller, forwards raw
//! input on the control channel, and mirrors camera writes into the host
//! model.
//!
//! Commands are fire-and-forget; a transport failure flips the session to
//! `Disconnected`, which disables all outbound emission and freezes the local
//! camera at its last known state. Reconnecting is the embedder's business.

use camera::{CameraCommand, CameraController, CameraState, PointerButton};
use foundation::time::Timestamp;
use protocol::commands::{ControlCommand, KeyPayload, PointerPayload, ResizePayload, WheelPayload};
use protocol::config::ViewerConfig;
use protocol::events::CameraEvent;
use streaming::FrameChannel;

use crate::input::{KeyInput, SurfaceRect, quantize_wheel};
use crate::model::ViewerModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Closed,
    Io(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Closed => write!(f, "transport closed"),
            TransportError::Io(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Outbound command transport, implemented by the embedder.
pub trait CommandSink {
    fn send(&mut self, payload: &str) -> Result<(), TransportError>;
}

/// Host-model notification channel for camera intent events.
pub trait HostNotifier {
    /// Named event + payload, at most one per throttle window.
    fn send_event(&mut self, event: &CameraEvent);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

pub struct ViewerSession<S: CommandSink, H: HostNotifier> {
    sink: S,
    host: H,
    controller: CameraController,
    model: ViewerModel,
    surface: SurfaceRect,
    state: ConnectionState,
    last_pointer: (i32, i32),
    dropped_frames: u64,
}

impl<S: CommandSink, H: HostNotifier> ViewerSession<S, H> {
    pub fn new(sink: S, host: H, model: ViewerModel, mut config: ViewerConfig) -> Self {
        config.max_event_rate = model.max_event_rate;
        let state = CameraState::from_look_at(model.camp, model.camf, model.camu);
        let surface = SurfaceRect::new(f64::from(model.resolution.0), f64::from(model.resolution.1));
        Self {
            sink,
            host,
            controller: CameraController::new(state, config),
            model,
            surface,
            state: ConnectionState::Disconnected,
            last_pointer: (0, 0),
            dropped_frames: 0,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    pub fn model(&self) -> &ViewerModel {
        &self.model
    }

    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    /// The transport is up: enable outbound emission and announce the current
    /// surface size.
    pub fn on_connected(&mut self) {
        self.state = ConnectionState::Connected;
        let (width, height) = (self.surface.width as u32, self.surface.height as u32);
        self.forward(&ControlCommand::VideoResize {
            video_resize: ResizePayload {
                video_width: width,
                video_height: height,
            },
        });
    }

    /// User-initiated disconnect: tell the server, then stop emitting. No
    /// acknowledgment is expected.
    pub fn disconnect(&mut self) {
        self.forward(&ControlCommand::Disconnect);
        self.state = ConnectionState::Disconnected;
    }

    /// The transport failed or closed underneath us.
    pub fn on_transport_closed(&mut self) {
        self.state = ConnectionState::Disconnected;
    }

    /// The host model retuned the outbound event rate.
    pub fn on_event_rate_changed(&mut self, rate: f64) {
        self.model.max_event_rate = rate;
        self.controller.set_max_event_rate(rate);
    }

    pub fn on_pointer_down(&mut self, x_px: i32, y_px: i32, button_index: i32) {
        self.last_pointer = (x_px, y_px);
        if let Some(button) = PointerButton::from_index(button_index) {
            let pos = self.surface.normalize(f64::from(x_px), f64::from(y_px));
            self.controller.on_drag_start(pos, button);
        }
        self.forward(&ControlCommand::MouseDown {
            mouse_down: PointerPayload {
                button: button_index,
                x: x_px,
                y: y_px,
            },
        });
    }

    pub fn on_pointer_move(&mut self, x_px: i32, y_px: i32, now: Timestamp) {
        self.last_pointer = (x_px, y_px);
        if self.state != ConnectionState::Connected {
            return;
        }

        let button = self.active_button_index();
        self.forward(&ControlCommand::MouseMove {
            mouse_move: PointerPayload {
                button,
                x: x_px,
                y: y_px,
            },
        });
        // The forward may have taken the transport down with it.
        if self.state != ConnectionState::Connected {
            return;
        }

        let pos = self.surface.normalize(f64::from(x_px), f64::from(y_px));
        let command = self
            .controller
            .on_drag(pos, now)
            .or_else(|| self.controller.on_mid_drag(pos, now));
        if let Some(command) = command {
            self.emit(command);
        }
    }

    pub fn on_pointer_up(&mut self, x_px: i32, y_px: i32, button_index: i32) {
        self.last_pointer = (x_px, y_px);
        if let Some(button) = PointerButton::from_index(button_index) {
            self.controller.on_drag_end(button);
        }
        self.forward(&ControlCommand::MouseUp {
            mouse_up: PointerPayload {
                button: button_index,
                x: x_px,
                y: y_px,
            },
        });
    }

    /// Pointer left the surface: release every button locally. Nothing is
    /// forwarded; the server sees the absence of further moves.
    pub fn on_pointer_leave(&mut self) {
        self.controller.on_pointer_leave();
    }

    pub fn on_wheel(&mut self, raw_delta: f64, x_px: i32, y_px: i32, now: Timestamp) {
        let tick = quantize_wheel(raw_delta);
        if tick == 0 {
            return;
        }
        self.forward(&ControlCommand::MouseWheel {
            mouse_wheel: WheelPayload {
                mouse_x: x_px,
                mouse_y: y_px,
                delta: tick,
            },
        });
        if self.state != ConnectionState::Connected {
            return;
        }
        if let Some(command) = self.controller.on_scroll(f64::from(tick), now) {
            self.emit(command);
        }
    }

    pub fn on_key_down(&mut self, key: KeyInput) {
        let key_down = self.key_payload(key);
        self.forward(&ControlCommand::KeyDown { key_down });
    }

    pub fn on_key_up(&mut self, key: KeyInput) {
        let key_up = self.key_payload(key);
        self.forward(&ControlCommand::KeyUp { key_up });
    }

    pub fn on_key_press(&mut self, key: KeyInput) {
        let key_press = self.key_payload(key);
        self.forward(&ControlCommand::KeyPress { key_press });
    }

    /// Host-model `frame` property changed: push the raw payload through the
    /// channel at the model's declared resolution. A malformed frame is
    /// dropped and counted; the previous frame stays on screen.
    pub fn on_frame_changed(&mut self, channel: &mut FrameChannel, bytes: Vec<u8>) {
        self.model.frame = bytes;
        let (width, height) = self.model.resolution;
        if channel
            .on_raw_frame(&self.model.frame, width, height)
            .is_err()
        {
            self.dropped_frames += 1;
        }
    }

    /// Host-model `compressedFrame` property changed.
    pub fn on_compressed_frame_changed(
        &mut self,
        channel: &mut FrameChannel,
        bytes: Vec<u8>,
        mime_type: &str,
    ) {
        self.model.compressed_frame = bytes;
        if channel
            .on_compressed_frame(&self.model.compressed_frame, mime_type)
            .is_err()
        {
            self.dropped_frames += 1;
        }
    }

    /// Frames dropped due to decode errors since the session started.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn on_resized(&mut self, width_px: u32, height_px: u32) {
        self.surface = SurfaceRect::new(f64::from(width_px), f64::from(height_px));
        self.forward(&ControlCommand::VideoResize {
            video_resize: ResizePayload {
                video_width: self.surface.width as u32,
                video_height: self.surface.height as u32,
            },
        });
    }

    fn active_button_index(&self) -> i32 {
        // The forwarded move carries the gesture button when one is held.
        self.controller
            .active_button()
            .map_or(0, PointerButton::index)
    }

    fn key_payload(&self, key: KeyInput) -> KeyPayload {
        KeyPayload {
            key_code: key.key_code,
            which: key.which,
            char_code: key.char_code,
            ch: key.ch,
            shift_key: key.shift_key,
            ctrl_key: key.ctrl_key,
            alt_key: key.alt_key,
            meta_key: key.meta_key,
            x: self.last_pointer.0,
            y: self.last_pointer.1,
        }
    }

    fn emit(&mut self, command: CameraCommand) {
        self.model
            .write_camera(command.camera_position, command.focus);
        self.host.send_event(&command.event);
    }

    fn forward(&mut self, command: &ControlCommand) {
        if self.state != ConnectionState::Connected {
            return;
        }
        if let Ok(text) = serde_json::to_string(command) {
            if self.sink.send(&text).is_err() {
                self.state = ConnectionState::Disconnected;
            }
        }
    }
}
