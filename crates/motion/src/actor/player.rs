use std::sync::Arc;

use crate::action::Action;
use crate::config::MotionConfig;
use crate::hex::{HecsCoord, HexMap};
use crate::net::ActionPacket;
use crate::queue::Clock;

use super::{Actor, RenderSink};

/// Sends a locally issued action to the server. Returns false if it could
/// not be sent, in which case the action is not applied locally either.
pub trait ActionTransmitter {
    fn transmit(&self, packet: ActionPacket) -> bool;
}

impl<F> ActionTransmitter for F
where
    F: Fn(ActionPacket) -> bool,
{
    fn transmit(&self, packet: ActionPacket) -> bool {
        self(packet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerInput {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

/// The locally controlled actor. Moves are applied immediately and sent to
/// the server in the same step, so the player never waits on a round trip.
pub struct LocalPlayer<S: RenderSink, T: ActionTransmitter> {
    actor: Actor<S>,
    transmitter: T,
    map: Arc<HexMap>,
    clock: Arc<dyn Clock>,
    config: MotionConfig,
}

impl<S: RenderSink, T: ActionTransmitter> LocalPlayer<S, T> {
    pub fn new(
        actor: Actor<S>,
        transmitter: T,
        map: Arc<HexMap>,
        clock: Arc<dyn Clock>,
        config: MotionConfig,
    ) -> Self {
        Self {
            actor,
            transmitter,
            map,
            clock,
            config,
        }
    }

    pub fn actor(&self) -> &Actor<S> {
        &self.actor
    }

    /// Swaps in a fresh map, e.g. after the server reports new walls.
    pub fn set_map(&mut self, map: Arc<HexMap>) {
        self.map = map;
    }

    pub fn update(&mut self) {
        self.actor.update();
    }

    /// Anything still queued counts as busy, so two key presses in the same
    /// frame can't both be accepted.
    pub fn is_busy(&self) -> bool {
        self.actor.is_busy() || self.actor.queue().pending_actions() > 0
    }

    /// Returns whether an action was issued.
    pub fn handle_input(&mut self, input: PlayerInput) -> bool {
        if self.is_busy() || self.actor.is_destroyed() {
            return false;
        }

        let location = self.actor.location();
        let heading = self.actor.heading_degrees();
        let expiration = self.config.expiration_from(self.clock.now());

        let action = match input {
            PlayerInput::Forward | PlayerInput::Backward => {
                let heading = if input == PlayerInput::Backward {
                    heading + 180.0
                } else {
                    heading
                };
                let destination = location.neighbor_at_heading(heading);
                if !self.map.can_traverse(location, destination) {
                    log::debug!("move {location} -> {destination} blocked");
                    return false;
                }
                Action::walk(
                    HecsCoord::ORIGIN.neighbor_at_heading(heading),
                    self.config.walk_duration_s,
                    expiration,
                )
            }
            PlayerInput::TurnLeft => Action::turn(
                -self.config.turn_degrees,
                self.config.turn_duration_s,
                expiration,
            ),
            PlayerInput::TurnRight => Action::turn(
                self.config.turn_degrees,
                self.config.turn_duration_s,
                expiration,
            ),
        };

        if !self.transmitter.transmit(action.packet(self.actor.id())) {
            log::warn!("failed to transmit {input:?}, not applying locally");
            return false;
        }
        self.actor.add_action(action);
        true
    }
}
