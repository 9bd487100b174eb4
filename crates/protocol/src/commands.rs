//! Control-channel commands, client → render server.
//!
//! The wire format is JSON with the command name repeated as the payload key:
//! `{"command": "mouse_move", "mouse_move": {...}}`. Commands are one-shot,
//! unordered, fire-and-forget; no acknowledgment is tracked.

use serde::{Deserialize, Serialize};

/// Pointer position and button for the forwarded mouse commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPayload {
    pub button: i32,
    pub x: i32,
    pub y: i32,
}

/// Quantized wheel tick at a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelPayload {
    pub mouse_x: i32,
    pub mouse_y: i32,
    /// ±1 per wheel detent, sign toward the screen positive.
    pub delta: i32,
}

/// Key event metadata plus the pointer position it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPayload {
    pub key_code: u32,
    pub which: u32,
    pub char_code: u32,
    #[serde(rename = "char")]
    pub ch: String,
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub meta_key: bool,
    pub x: i32,
    pub y: i32,
}

/// New render-surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizePayload {
    pub video_width: u32,
    pub video_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ControlCommand {
    MouseMove { mouse_move: PointerPayload },
    MouseDown { mouse_down: PointerPayload },
    MouseUp { mouse_up: PointerPayload },
    MouseWheel { mouse_wheel: WheelPayload },
    KeyDown { key_down: KeyPayload },
    KeyUp { key_up: KeyPayload },
    KeyPress { key_press: KeyPayload },
    VideoResize { video_resize: ResizePayload },
    Disconnect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn mouse_commands_repeat_name_as_payload_key() {
        let cmd = ControlCommand::MouseMove {
            mouse_move: PointerPayload {
                button: 0,
                x: 120,
                y: 64,
            },
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"command": "mouse_move", "mouse_move": {"button": 0, "x": 120, "y": 64}})
        );

        let cmd = ControlCommand::MouseWheel {
            mouse_wheel: WheelPayload {
                mouse_x: 10,
                mouse_y: 20,
                delta: -1,
            },
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"command": "mouse_wheel", "mouse_wheel": {"mouse_x": 10, "mouse_y": 20, "delta": -1}})
        );
    }

    #[test]
    fn key_payload_uses_camel_case_fields() {
        let cmd = ControlCommand::KeyDown {
            key_down: KeyPayload {
                key_code: 65,
                which: 65,
                char_code: 0,
                ch: "A".to_string(),
                shift_key: true,
                ctrl_key: false,
                alt_key: false,
                meta_key: false,
                x: 5,
                y: 6,
            },
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "command": "key_down",
                "key_down": {
                    "keyCode": 65,
                    "which": 65,
                    "charCode": 0,
                    "char": "A",
                    "shiftKey": true,
                    "ctrlKey": false,
                    "altKey": false,
                    "metaKey": false,
                    "x": 5,
                    "y": 6
                }
            })
        );
    }

    #[test]
    fn disconnect_is_bare() {
        assert_eq!(
            serde_json::to_value(&ControlCommand::Disconnect).unwrap(),
            json!({"command": "disconnect"})
        );
    }

    #[test]
    fn resize_round_trips() {
        let cmd = ControlCommand::VideoResize {
            video_resize: ResizePayload {
                video_width: 512,
                video_height: 512,
            },
        };
        let text = serde_json::to_string(&cmd).unwrap();
        assert_eq!(serde_json::from_str::<ControlCommand>(&text).unwrap(), cmd);
    }
}
