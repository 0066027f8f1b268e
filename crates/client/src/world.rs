use std::collections::HashMap;
use std::sync::Arc;

use hexmotion::{Action, ActionPacket, ActionQueue, Actor, Clock, HexMap, MotionConfig};

use crate::sink::LogSink;

/// Remote entities, keyed by the id the server sends with every action.
pub struct World {
    clock: Arc<dyn Clock>,
    map: Arc<HexMap>,
    motion: MotionConfig,
    actors: HashMap<i32, Actor<LogSink>>,
}

impl World {
    pub fn new(clock: Arc<dyn Clock>, map: Arc<HexMap>, motion: MotionConfig) -> Self {
        Self {
            clock,
            map,
            motion,
            actors: HashMap::new(),
        }
    }

    pub fn apply(&mut self, packet: ActionPacket) {
        let action = match Action::from_packet(&packet) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("dropping packet for actor {}: {e}", packet.id);
                return;
            }
        };

        let id = packet.id;
        let actor = self.actors.entry(id).or_insert_with(|| {
            log::info!("actor {id} appeared");
            let queue = ActionQueue::new(format!("actor {id}"), self.clock.clone(), self.map.clone());
            Actor::new(id, Arc::new(queue), LogSink::new(format!("actor {id}")), &self.motion)
        });
        actor.add_action(action);
    }

    pub fn tick(&mut self) {
        for actor in self.actors.values_mut() {
            actor.update();
        }
        self.actors.retain(|_, actor| !actor.is_destroyed());
    }

    pub fn is_idle(&self) -> bool {
        self.actors
            .values()
            .all(|actor| !actor.is_busy() && actor.queue().pending_actions() == 0)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[cfg(test)]
    pub fn actor(&self, id: i32) -> Option<&Actor<LogSink>> {
        self.actors.get(&id)
    }
}
