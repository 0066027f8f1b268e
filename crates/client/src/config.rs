use std::path::PathBuf;

use hexmotion::{MotionConfig, PlayerInput};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub frame_rate: u32,
    pub map_rows: usize,
    pub map_cols: usize,
    pub run_secs: f32,
    pub player_id: i32,
    pub packets: Option<PathBuf>,
    pub script: Vec<PlayerInput>,
    pub motion: MotionConfig,
}

pub fn parse_input(name: &str) -> Result<PlayerInput, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "f" | "forward" | "up" => Ok(PlayerInput::Forward),
        "b" | "back" | "backward" | "down" => Ok(PlayerInput::Backward),
        "l" | "left" => Ok(PlayerInput::TurnLeft),
        "r" | "right" => Ok(PlayerInput::TurnRight),
        other => Err(format!("unknown input {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("Forward"), Ok(PlayerInput::Forward));
        assert_eq!(parse_input(" l "), Ok(PlayerInput::TurnLeft));
        assert!(parse_input("jump").is_err());
    }
}
