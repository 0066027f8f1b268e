use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub walk_duration_s: f32,
    pub turn_duration_s: f32,
    pub turn_degrees: f32,

    /// How long a locally issued action may wait in a queue before it is
    /// fast-forwarded.
    pub action_expiration_s: f32,

    /// World units per grid unit when applying positions to a render sink.
    pub scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            walk_duration_s: 0.5,
            turn_duration_s: 0.25,
            turn_degrees: 60.0,

            action_expiration_s: 10.0,

            scale: 1.0,
        }
    }
}

impl MotionConfig {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn expiration_from(&self, now: SystemTime) -> SystemTime {
        let window = Duration::try_from_secs_f32(self.action_expiration_s.max(0.0))
            .unwrap_or_default();
        now.checked_add(window).unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use std::time::UNIX_EPOCH;

    use super::*;
    use crate::action::Action;
    use crate::net::parse_timestamp;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MotionConfig::from_json(r#"{"walk_duration_s": 1.5, "scale": 2.0}"#).unwrap();
        assert_eq!(config.walk_duration_s, 1.5);
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.turn_degrees, 60.0);
        assert_eq!(config.action_expiration_s, 10.0);
    }

    #[test]
    fn expiration_window() {
        let config = MotionConfig::default();
        assert_eq!(
            config.expiration_from(UNIX_EPOCH),
            UNIX_EPOCH + Duration::from_secs(10)
        );
    }

    #[test]
    fn far_future_expiration_still_encodes() {
        let config = MotionConfig {
            action_expiration_s: 1.0e12,
            ..Default::default()
        };
        let expiration = config.expiration_from(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        let packet = Action::turn(60.0, 0.25, expiration).packet(1);
        assert!(packet.expiration.starts_with("9999-12-31T23:59:59"));
        assert!(parse_timestamp(&packet.expiration).is_ok());
    }
}
