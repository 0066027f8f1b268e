mod types;

use std::time::SystemTime;

use crate::hex::HecsCoord;
use crate::net::{ActionPacket, ActionType, PacketError, format_timestamp};
use crate::state::{Continuous, Discrete, HeightMap};

pub use types::{AnimationType, Color};

/// Shortest duration an action may have. Zero-length actions would divide
/// by zero when computing progress.
pub const MIN_DURATION_S: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind {
    /// Absolute placement. Used to spawn or resync an entity.
    Init {
        coord: HecsCoord,
        heading_degrees: f32,
    },
    /// Relative jump with no in-between frames.
    Instant {
        displacement: HecsCoord,
        rotation_degrees: f32,
    },
    Translate {
        displacement: HecsCoord,
    },
    /// Translation that eases in and out instead of moving at constant speed.
    Skip {
        displacement: HecsCoord,
    },
    Rotate {
        rotation_degrees: f32,
    },
    Fade {
        opacity_delta: f32,
    },
    Outline {
        border_radius: f32,
        border_color: Color,
    },
    Death,
}

/// A timed transition between two discrete states.
///
/// `expiration` is a wall-clock deadline on the whole trip through the
/// queue, not just on the run time: once it passes, the queue commits the
/// action without animating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    kind: ActionKind,
    animation: AnimationType,
    duration_s: f32,
    expiration: SystemTime,
}

impl Action {
    pub fn new(
        kind: ActionKind,
        animation: AnimationType,
        duration_s: f32,
        expiration: SystemTime,
    ) -> Self {
        let duration_s = if duration_s.is_finite() {
            duration_s.max(MIN_DURATION_S)
        } else {
            MIN_DURATION_S
        };
        Self {
            kind,
            animation,
            duration_s,
            expiration,
        }
    }

    pub fn walk(displacement: HecsCoord, duration_s: f32, expiration: SystemTime) -> Self {
        Self::new(
            ActionKind::Translate { displacement },
            AnimationType::Walking,
            duration_s,
            expiration,
        )
    }

    pub fn skip(displacement: HecsCoord, duration_s: f32, expiration: SystemTime) -> Self {
        Self::new(
            ActionKind::Skip { displacement },
            AnimationType::Skipping,
            duration_s,
            expiration,
        )
    }

    pub fn turn(rotation_degrees: f32, duration_s: f32, expiration: SystemTime) -> Self {
        Self::new(
            ActionKind::Rotate { rotation_degrees },
            AnimationType::Rotate,
            duration_s,
            expiration,
        )
    }

    pub fn init_at(coord: HecsCoord, heading_degrees: f32, expiration: SystemTime) -> Self {
        Self::new(
            ActionKind::Init {
                coord,
                heading_degrees,
            },
            AnimationType::Instant,
            MIN_DURATION_S,
            expiration,
        )
    }

    pub fn instant(
        displacement: HecsCoord,
        rotation_degrees: f32,
        expiration: SystemTime,
    ) -> Self {
        Self::new(
            ActionKind::Instant {
                displacement,
                rotation_degrees,
            },
            AnimationType::Instant,
            MIN_DURATION_S,
            expiration,
        )
    }

    /// Holds the current state for `duration_s`. Useful for sequencing
    /// against another queue.
    pub fn pause(duration_s: f32, expiration: SystemTime) -> Self {
        Self::new(
            ActionKind::Instant {
                displacement: HecsCoord::ORIGIN,
                rotation_degrees: 0.0,
            },
            AnimationType::Idle,
            duration_s,
            expiration,
        )
    }

    pub fn fade_in(duration_s: f32, expiration: SystemTime) -> Self {
        Self::fade(1.0, duration_s, expiration)
    }

    pub fn fade_out(duration_s: f32, expiration: SystemTime) -> Self {
        Self::fade(-1.0, duration_s, expiration)
    }

    pub fn fade(opacity_delta: f32, duration_s: f32, expiration: SystemTime) -> Self {
        Self::new(
            ActionKind::Fade { opacity_delta },
            AnimationType::Fade,
            duration_s,
            expiration,
        )
    }

    pub fn outline(
        border_radius: f32,
        border_color: Color,
        duration_s: f32,
        expiration: SystemTime,
    ) -> Self {
        Self::new(
            ActionKind::Outline {
                border_radius,
                border_color,
            },
            AnimationType::None,
            duration_s,
            expiration,
        )
    }

    pub fn death(expiration: SystemTime) -> Self {
        Self::new(
            ActionKind::Death,
            AnimationType::None,
            MIN_DURATION_S,
            expiration,
        )
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn animation(&self) -> AnimationType {
        self.animation
    }

    pub fn duration_s(&self) -> f32 {
        self.duration_s
    }

    pub fn expiration(&self) -> SystemTime {
        self.expiration
    }

    pub fn is_expired(&self, now: SystemTime) -> bool {
        now > self.expiration
    }

    pub fn action_type(&self) -> ActionType {
        match self.kind {
            ActionKind::Init { .. } => ActionType::Init,
            ActionKind::Instant { .. } => ActionType::Instant,
            ActionKind::Translate { .. } | ActionKind::Skip { .. } => ActionType::Translate,
            ActionKind::Rotate { .. } => ActionType::Rotate,
            ActionKind::Fade { .. } => ActionType::Fade,
            ActionKind::Outline { .. } => ActionType::Outline,
            ActionKind::Death => ActionType::Death,
        }
    }

    /// The state once this action has fully played out.
    pub fn transfer(&self, mut state: Discrete) -> Discrete {
        match self.kind {
            ActionKind::Init {
                coord,
                heading_degrees,
            } => {
                state.coord = coord;
                state.heading_degrees = heading_degrees;
            }
            ActionKind::Instant {
                displacement,
                rotation_degrees,
            } => {
                state.coord = state.coord + displacement;
                state.heading_degrees += rotation_degrees;
            }
            ActionKind::Translate { displacement } | ActionKind::Skip { displacement } => {
                state.coord = state.coord + displacement;
            }
            ActionKind::Rotate { rotation_degrees } => {
                state.heading_degrees += rotation_degrees;
            }
            ActionKind::Fade { opacity_delta } => {
                state.opacity = (state.opacity + opacity_delta).clamp(0.0, 1.0);
            }
            ActionKind::Outline {
                border_radius,
                border_color,
            } => {
                state.border_radius = border_radius;
                state.border_color = border_color;
            }
            ActionKind::Death => {
                state.end_of_life = true;
            }
        }
        state
    }

    /// Render state `progress` of the way through this action, starting from
    /// `initial`. Progress is clamped to `[0, 1]`.
    pub fn interpolate(
        &self,
        initial: &Discrete,
        progress: f32,
        heights: &dyn HeightMap,
    ) -> Continuous {
        let progress = clamp_progress(progress);
        let end = self.transfer(*initial);

        let mut interp = initial.continuous(heights);
        interp.animation = self.animation;

        match self.kind {
            ActionKind::Translate { .. } => {
                interp.position = interp.position.lerp(end.position(heights), progress);
            }
            ActionKind::Skip { .. } => {
                interp.position = interp
                    .position
                    .lerp(end.position(heights), smoothstep(progress));
            }
            ActionKind::Rotate { rotation_degrees } => {
                // Not wrapped, so multi-turn rotations animate smoothly.
                interp.heading_degrees = initial.heading_degrees + rotation_degrees * progress;
            }
            ActionKind::Fade { .. } => {
                interp.opacity = lerp(initial.opacity, end.opacity, progress);
            }
            ActionKind::Outline { .. } => {
                interp.border_radius = lerp(initial.border_radius, end.border_radius, progress);
                interp.border_color = end.border_color;
            }
            ActionKind::Init { .. } | ActionKind::Instant { .. } | ActionKind::Death => {
                interp = end.continuous(heights);
                interp.animation = self.animation;
            }
        }
        interp
    }

    /// Wire form of this action. `id` identifies the entity it applies to.
    pub fn packet(&self, id: i32) -> ActionPacket {
        let mut packet = ActionPacket::new(
            id,
            self.action_type(),
            self.animation,
            self.duration_s,
            format_timestamp(self.expiration),
        );
        match self.kind {
            ActionKind::Init {
                coord,
                heading_degrees,
            } => {
                packet.displacement = coord;
                packet.rotation = heading_degrees;
            }
            ActionKind::Instant {
                displacement,
                rotation_degrees,
            } => {
                packet.displacement = displacement;
                packet.rotation = rotation_degrees;
            }
            ActionKind::Translate { displacement } | ActionKind::Skip { displacement } => {
                packet.displacement = displacement;
            }
            ActionKind::Rotate { rotation_degrees } => {
                packet.rotation = rotation_degrees;
            }
            ActionKind::Fade { opacity_delta } => {
                packet.opacity = opacity_delta;
            }
            ActionKind::Outline {
                border_radius,
                border_color,
            } => {
                packet.border_radius = border_radius;
                packet.border_color = border_color;
            }
            ActionKind::Death => {}
        }
        packet
    }

    pub fn from_packet(packet: &ActionPacket) -> Result<Self, PacketError> {
        let expiration = packet.expiration_time()?;
        let kind = match packet.action_type {
            ActionType::Init => ActionKind::Init {
                coord: packet.displacement,
                heading_degrees: packet.rotation,
            },
            ActionType::Instant => ActionKind::Instant {
                displacement: packet.displacement,
                rotation_degrees: packet.rotation,
            },
            ActionType::Translate => match packet.animation_type {
                AnimationType::AccelDecel | AnimationType::Skipping => ActionKind::Skip {
                    displacement: packet.displacement,
                },
                _ => ActionKind::Translate {
                    displacement: packet.displacement,
                },
            },
            ActionType::Rotate => ActionKind::Rotate {
                rotation_degrees: packet.rotation,
            },
            ActionType::Fade => ActionKind::Fade {
                opacity_delta: packet.opacity,
            },
            ActionType::Outline => ActionKind::Outline {
                border_radius: packet.border_radius,
                border_color: packet.border_color,
            },
            ActionType::Death => ActionKind::Death,
        };
        Ok(Self::new(
            kind,
            packet.animation_type,
            packet.duration_s,
            expiration,
        ))
    }
}

impl TryFrom<&ActionPacket> for Action {
    type Error = PacketError;

    fn try_from(packet: &ActionPacket) -> Result<Self, Self::Error> {
        Self::from_packet(packet)
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}
