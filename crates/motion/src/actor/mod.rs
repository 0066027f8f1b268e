mod player;

use std::sync::Arc;
use std::time::SystemTime;

use glam::Vec3;

use crate::action::{Action, AnimationType, Color};
use crate::config::MotionConfig;
use crate::hex::HecsCoord;
use crate::queue::ActionQueue;

pub use player::{ActionTransmitter, LocalPlayer, PlayerInput};

pub const WALKING_CLIP: &str = "Armature|Walking";
pub const IDLE_CLIP: &str = "Armature|Idle";
pub const IDLE_CROSSFADE_S: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationClip {
    Play(&'static str),
    CrossFade { name: &'static str, seconds: f32 },
}

impl AnimationClip {
    /// Walking plays the walk cycle; everything else blends back to idle so
    /// an interrupted clip doesn't pop.
    pub fn for_animation(animation: AnimationType) -> Self {
        match animation {
            AnimationType::Walking => Self::Play(WALKING_CLIP),
            _ => Self::CrossFade {
                name: IDLE_CLIP,
                seconds: IDLE_CROSSFADE_S,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Play(name) | Self::CrossFade { name, .. } => *name,
        }
    }
}

/// Whatever draws an entity. Implemented by the host renderer.
pub trait RenderSink {
    fn set_transform(&mut self, position: Vec3, heading_degrees: f32);
    fn set_outline(&mut self, border_radius: f32, border_color: Color);
    fn set_opacity(&mut self, opacity: f32);
    fn play_animation(&mut self, clip: AnimationClip);
    fn destroy(&mut self);
}

/// Binds an action queue to one rendered entity.
pub struct Actor<S: RenderSink> {
    id: i32,
    queue: Arc<ActionQueue>,
    sink: Option<S>,
    scale: f32,
    animated: bool,
    last_clip: Option<AnimationClip>,
    position: Vec3,
}

impl<S: RenderSink> Actor<S> {
    pub fn new(id: i32, queue: Arc<ActionQueue>, sink: S, config: &MotionConfig) -> Self {
        Self {
            id,
            queue,
            sink: Some(sink),
            scale: config.scale,
            animated: true,
            last_clip: None,
            position: Vec3::ZERO,
        }
    }

    /// Entities with a fixed idle clip (hovering bots and the like) never
    /// get clip changes.
    pub fn without_animations(mut self) -> Self {
        self.animated = false;
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn queue(&self) -> &Arc<ActionQueue> {
        &self.queue
    }

    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// Where the actor is headed once its queue drains.
    pub fn location(&self) -> HecsCoord {
        self.queue.target_state().coord
    }

    pub fn heading_degrees(&self) -> f32 {
        self.queue.target_state().heading_degrees
    }

    /// Last world position pushed to the sink.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_busy(&self) -> bool {
        self.queue.is_busy()
    }

    pub fn is_destroyed(&self) -> bool {
        self.sink.is_none()
    }

    pub fn add_action(&self, action: impl Into<Option<Action>>) {
        self.queue.add_action(action);
    }

    pub fn flush(&self) {
        self.queue.flush();
    }

    pub fn spawn_at(&self, coord: HecsCoord, heading_degrees: f32, expiration: SystemTime) {
        self.queue
            .add_action(Action::init_at(coord, heading_degrees, expiration));
    }

    pub fn destroy(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            log::debug!("actor {} destroyed", self.id);
            sink.destroy();
        }
    }

    pub fn update(&mut self) {
        self.queue.update();

        if self.queue.state().end_of_life {
            self.destroy();
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let state = self.queue.continuous_state();
        self.position = state.position * self.scale;
        sink.set_transform(self.position, state.heading_degrees);
        sink.set_outline(state.border_radius, state.border_color);
        sink.set_opacity(state.opacity);

        if !self.animated {
            return;
        }
        let clip = AnimationClip::for_animation(state.animation);
        if self.last_clip != Some(clip) {
            sink.play_animation(clip);
            self.last_clip = Some(clip);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub transforms: Vec<(Vec3, f32)>,
        pub outlines: Vec<(f32, Color)>,
        pub opacity: Vec<f32>,
        pub clips: Vec<AnimationClip>,
        pub destroyed: usize,
    }

    impl RenderSink for RecordingSink {
        fn set_transform(&mut self, position: Vec3, heading_degrees: f32) {
            self.transforms.push((position, heading_degrees));
        }

        fn set_outline(&mut self, border_radius: f32, border_color: Color) {
            self.outlines.push((border_radius, border_color));
        }

        fn set_opacity(&mut self, opacity: f32) {
            self.opacity.push(opacity);
        }

        fn play_animation(&mut self, clip: AnimationClip) {
            self.clips.push(clip);
        }

        fn destroy(&mut self) {
            self.destroyed += 1;
        }
    }
}
