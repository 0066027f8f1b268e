mod protocol;

pub use protocol::{
    ActionPacket, ActionType, PacketError, decode_action, format_timestamp, parse_timestamp,
};
