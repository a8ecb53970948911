//! Wire messages between controllers and the display.
//!
//! Delivery is fire-and-forget over an assumed reliable, per-sender-ordered
//! channel; messages are never acknowledged or retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::form::FormShape;

/// Identity of the controller that owns an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(pub u32);

/// Error decoding a wire message.
#[derive(Debug, Error)]
#[error("malformed message: {0}")]
pub struct MessageError(#[from] serde_json::Error);

/// Authoritative state updates broadcast by controllers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    AddLight {
        id: ControllerId,
        color: Color,
        x: f64,
        y: f64,
    },
    MoveLight {
        id: ControllerId,
        x: f64,
        y: f64,
    },
    StopLight {
        id: ControllerId,
    },
    RemoveLight {
        id: ControllerId,
    },
    AddForm {
        id: ControllerId,
        shape: FormShape,
        x: f64,
        y: f64,
        size: f64,
        shutter_incl: f64,
        left_shutter: f64,
        right_shutter: f64,
    },
    MoveForm {
        id: ControllerId,
        x: f64,
        y: f64,
    },
    AdjustForm {
        id: ControllerId,
        size: f64,
        rotation: f64,
    },
    ShutterIncl {
        id: ControllerId,
        incl: f64,
    },
    LeftShutter {
        id: ControllerId,
        dist: f64,
    },
    RightShutter {
        id: ControllerId,
        dist: f64,
    },
    RemoveForm {
        id: ControllerId,
    },
}

impl Message {
    /// The controller the message concerns.
    pub fn id(&self) -> ControllerId {
        match *self {
            Self::AddLight { id, .. }
            | Self::MoveLight { id, .. }
            | Self::StopLight { id }
            | Self::RemoveLight { id }
            | Self::AddForm { id, .. }
            | Self::MoveForm { id, .. }
            | Self::AdjustForm { id, .. }
            | Self::ShutterIncl { id, .. }
            | Self::LeftShutter { id, .. }
            | Self::RightShutter { id, .. }
            | Self::RemoveForm { id } => id,
        }
    }

    pub fn to_json(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_round_trip_through_json() {
        let message = Message::AddForm {
            id: ControllerId(3),
            shape: FormShape::Triangle,
            x: 0.25,
            y: -0.1,
            size: 1.0,
            shutter_incl: 0.5,
            left_shutter: 0.0,
            right_shutter: 1.2,
        };

        let json = message.to_json().unwrap();
        assert!(json.contains("\"type\":\"add-form\""));
        assert!(json.contains("\"shape\":\"triangle\""));

        let back = Message::from_json(&json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn light_messages_carry_hex_colors() {
        let message = Message::AddLight {
            id: ControllerId(1),
            color: "#ff8800".parse().unwrap(),
            x: 0.0,
            y: 0.0,
        };

        let json = message.to_json().unwrap();
        assert!(json.contains("\"color\":\"#ff8800\""));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Message::from_json("{\"type\":\"warp-light\"}").is_err());
        assert!(Message::from_json("not json").is_err());
    }

    #[test]
    fn every_message_names_its_controller() {
        let id = ControllerId(9);
        let messages = [
            Message::StopLight { id },
            Message::MoveForm { id, x: 0.0, y: 0.0 },
            Message::RemoveForm { id },
        ];

        for message in messages {
            assert_eq!(message.id(), id);
        }
    }
}
