pub mod action;
pub mod actor;
pub mod config;
pub mod hex;
pub mod net;
pub mod queue;
pub mod state;

pub use action::{Action, ActionKind, AnimationType, Color, MIN_DURATION_S};
pub use actor::{
    ActionTransmitter, Actor, AnimationClip, IDLE_CLIP, LocalPlayer, PlayerInput, RenderSink,
    WALKING_CLIP,
};
pub use config::MotionConfig;
pub use hex::{Cell, CoordError, Edges, HecsCoord, HexBoundary, HexDirection, HexMap};
pub use net::{ActionPacket, ActionType, PacketError, decode_action};
pub use queue::{ActionQueue, Clock, ManualClock, SystemClock};
pub use state::{Continuous, Discrete, FlatGround, HeightMap};
