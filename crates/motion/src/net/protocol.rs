use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::action::{Action, AnimationType, Color};
use crate::hex::HecsCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ActionType {
    Init = 0,
    Instant = 1,
    Rotate = 2,
    Translate = 3,
    Outline = 4,
    Death = 5,
    Fade = 6,
}

impl TryFrom<u8> for ActionType {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Init),
            1 => Ok(Self::Instant),
            2 => Ok(Self::Rotate),
            3 => Ok(Self::Translate),
            4 => Ok(Self::Outline),
            5 => Ok(Self::Death),
            6 => Ok(Self::Fade),
            other => Err(PacketError::UnknownActionType(other)),
        }
    }
}

impl From<ActionType> for u8 {
    fn from(value: ActionType) -> Self {
        value as u8
    }
}

/// One action as it travels between peers. Fields that don't apply to the
/// action type are zeroed and may be left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPacket {
    pub id: i32,
    pub action_type: ActionType,
    #[serde(default)]
    pub animation_type: AnimationType,
    #[serde(default)]
    pub displacement: HecsCoord,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub border_radius: f32,
    #[serde(default)]
    pub border_color: Color,
    #[serde(default)]
    pub opacity: f32,
    pub duration_s: f32,
    pub expiration: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error("encoding failed: {0}")]
    Encode(serde_json::Error),
    #[error("decoding failed: {0}")]
    Decode(serde_json::Error),
    #[error("unknown action type {0}")]
    UnknownActionType(u8),
    #[error("bad expiration timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        source: humantime::TimestampError,
    },
}

impl ActionPacket {
    pub fn new(
        id: i32,
        action_type: ActionType,
        animation_type: AnimationType,
        duration_s: f32,
        expiration: String,
    ) -> Self {
        Self {
            id,
            action_type,
            animation_type,
            displacement: HecsCoord::ORIGIN,
            rotation: 0.0,
            border_radius: 0.0,
            border_color: Color::default(),
            opacity: 0.0,
            duration_s,
            expiration,
        }
    }

    pub fn to_json(&self) -> Result<String, PacketError> {
        serde_json::to_string(self).map_err(PacketError::Encode)
    }

    pub fn from_json(data: &str) -> Result<Self, PacketError> {
        serde_json::from_str(data).map_err(PacketError::Decode)
    }

    pub fn expiration_time(&self) -> Result<SystemTime, PacketError> {
        parse_timestamp(&self.expiration)
    }
}

/// 9999-12-31T23:59:59Z, the last second RFC 3339 can spell.
const MAX_TIMESTAMP_SECS: u64 = 253_402_300_799;

/// Times outside what RFC 3339 can represent are clamped to its range.
pub fn format_timestamp(time: SystemTime) -> String {
    let latest = UNIX_EPOCH + Duration::from_secs(MAX_TIMESTAMP_SECS);
    humantime::format_rfc3339_micros(time.clamp(UNIX_EPOCH, latest)).to_string()
}

/// Accepts RFC 3339 UTC with a `Z`, a `+00:00` offset, or no zone at all
/// (taken as UTC).
pub fn parse_timestamp(value: &str) -> Result<SystemTime, PacketError> {
    let trimmed = value.trim();
    let base = trimmed
        .strip_suffix("+00:00")
        .or_else(|| trimmed.strip_suffix(['Z', 'z']))
        .unwrap_or(trimmed);
    humantime::parse_rfc3339_weak(&format!("{base}Z")).map_err(|source| PacketError::Timestamp {
        value: value.to_string(),
        source,
    })
}

/// Decodes a JSON packet straight into an action. Anything malformed is
/// logged and dropped.
pub fn decode_action(data: &str) -> Option<Action> {
    let decoded = ActionPacket::from_json(data).and_then(|packet| Action::from_packet(&packet));
    match decoded {
        Ok(action) => Some(action),
        Err(err) => {
            log::debug!("dropping action packet: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;

    #[test]
    fn test_action_type_codes() {
        assert_eq!(u8::from(ActionType::Init), 0);
        assert_eq!(u8::from(ActionType::Translate), 3);
        assert_eq!(u8::from(ActionType::Fade), 6);
        assert!(matches!(
            ActionType::try_from(7),
            Err(PacketError::UnknownActionType(7))
        ));
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = UNIX_EPOCH + Duration::from_millis(1_700_000_000_250);
        for text in [
            "2023-11-14T22:13:20.250Z",
            "2023-11-14T22:13:20.250000+00:00",
            "2023-11-14T22:13:20.25",
            " 2023-11-14T22:13:20.250Z ",
        ] {
            assert_eq!(parse_timestamp(text).unwrap(), expected, "{text}");
        }
        assert_eq!(parse_timestamp(&format_timestamp(expected)).unwrap(), expected);
        assert!(parse_timestamp("tomorrow").is_err());
    }

    #[test]
    fn test_timestamp_out_of_range_is_clamped() {
        let far_future = UNIX_EPOCH + Duration::from_secs(1_000_000_000_000);
        assert_eq!(format_timestamp(far_future), "9999-12-31T23:59:59.000000Z");
        assert_eq!(
            parse_timestamp(&format_timestamp(far_future)).unwrap(),
            UNIX_EPOCH + Duration::from_secs(MAX_TIMESTAMP_SECS)
        );
        assert_eq!(
            format_timestamp(UNIX_EPOCH - Duration::from_secs(5)),
            "1970-01-01T00:00:00.000000Z"
        );
    }

    #[test]
    fn test_packet_json() {
        let json = r#"{
            "id": 3,
            "action_type": 3,
            "animation_type": 2,
            "displacement": {"a": 1, "r": 0, "c": 0},
            "duration_s": 0.5,
            "expiration": "2023-11-14T22:13:20Z"
        }"#;
        let packet = ActionPacket::from_json(json).unwrap();
        assert_eq!(packet.id, 3);
        assert_eq!(packet.action_type, ActionType::Translate);
        assert_eq!(packet.animation_type, AnimationType::Walking);
        assert_eq!(packet.displacement, HecsCoord::new(1, 0, 0));
        assert_eq!(packet.rotation, 0.0);
        assert_eq!(packet.border_color, Color::TRANSPARENT);

        let reencoded = ActionPacket::from_json(&packet.to_json().unwrap()).unwrap();
        assert_eq!(reencoded, packet);
    }

    #[test]
    fn test_decode_action() {
        let json = r#"{"id":1,"action_type":2,"animation_type":7,"rotation":-60.0,
            "duration_s":0.25,"expiration":"2023-11-14T22:13:20Z"}"#;
        let action = decode_action(json).unwrap();
        assert_eq!(
            *action.kind(),
            ActionKind::Rotate {
                rotation_degrees: -60.0
            }
        );
        assert_eq!(action.animation(), AnimationType::Rotate);
    }

    #[test]
    fn test_malformed_packets_are_dropped() {
        assert!(decode_action("").is_none());
        assert!(decode_action("{not json").is_none());
        // Unknown action type.
        assert!(
            decode_action(r#"{"id":1,"action_type":9,"duration_s":1,"expiration":"2023-11-14T22:13:20Z"}"#)
                .is_none()
        );
        // Invalid a component.
        assert!(decode_action(
            r#"{"id":1,"action_type":3,"displacement":{"a":2,"r":0,"c":0},"duration_s":1,"expiration":"2023-11-14T22:13:20Z"}"#
        )
        .is_none());
        assert!(
            decode_action(r#"{"id":1,"action_type":5,"duration_s":1,"expiration":"soon"}"#)
                .is_none()
        );
    }

    #[test]
    fn test_unknown_animation_decodes_as_none() {
        let json = r#"{"id":1,"action_type":5,"animation_type":42,"duration_s":0,"expiration":"2023-11-14T22:13:20Z"}"#;
        let action = decode_action(json).unwrap();
        assert_eq!(action.animation(), AnimationType::None);
        assert_eq!(*action.kind(), ActionKind::Death);
        assert_eq!(action.duration_s(), crate::action::MIN_DURATION_S);
    }
}
