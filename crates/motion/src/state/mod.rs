use glam::Vec3;

use crate::action::{AnimationType, Color};
use crate::hex::HecsCoord;

/// Terrain elevation lookup. This is the only collaborator needed to turn
/// a grid position into a world position.
pub trait HeightMap: Send + Sync {
    fn height(&self, coord: HecsCoord) -> f32;
}

impl<F> HeightMap for F
where
    F: Fn(HecsCoord) -> f32 + Send + Sync,
{
    fn height(&self, coord: HecsCoord) -> f32 {
        self(coord)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround;

impl HeightMap for FlatGround {
    fn height(&self, _coord: HecsCoord) -> f32 {
        0.0
    }
}

/// Grid-snapped resting state. While an action is in flight this is where
/// the actor was when it started, never an in-between value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discrete {
    pub coord: HecsCoord,
    pub heading_degrees: f32,
    pub border_radius: f32,
    pub border_color: Color,
    pub opacity: f32,
    pub end_of_life: bool,
}

impl Default for Discrete {
    fn default() -> Self {
        Self {
            coord: HecsCoord::ORIGIN,
            heading_degrees: 0.0,
            border_radius: 0.0,
            border_color: Color::default(),
            opacity: 1.0,
            end_of_life: false,
        }
    }
}

impl Discrete {
    pub fn at(coord: HecsCoord, heading_degrees: f32) -> Self {
        Self {
            coord,
            heading_degrees,
            ..Default::default()
        }
    }

    /// World position: the planar projection on x/z, terrain height on y.
    pub fn position(&self, heights: &dyn HeightMap) -> Vec3 {
        let (x, z) = self.coord.cartesian();
        Vec3::new(x, heights.height(self.coord), z)
    }

    pub fn continuous(&self, heights: &dyn HeightMap) -> Continuous {
        Continuous {
            position: self.position(heights),
            heading_degrees: self.heading_degrees,
            border_radius: self.border_radius,
            border_color: self.border_color,
            opacity: self.opacity,
            animation: AnimationType::Idle,
        }
    }
}

/// Momentary render state, recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Continuous {
    pub position: Vec3,
    pub heading_degrees: f32,
    pub border_radius: f32,
    pub border_color: Color,
    pub opacity: f32,
    pub animation: AnimationType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_uses_height_lookup() {
        let heights = |coord: HecsCoord| coord.c() as f32 * 0.5;
        let state = Discrete::at(HecsCoord::new(0, 0, 4), 0.0);
        let position = state.position(&heights);
        assert!((position.x - 4.0).abs() < 1e-5);
        assert!((position.y - 2.0).abs() < 1e-5);
        assert!(position.z.abs() < 1e-5);
    }

    #[test]
    fn resting_state_is_idle() {
        let state = Discrete::at(HecsCoord::new(1, 1, 1), 120.0);
        let continuous = state.continuous(&FlatGround);
        assert_eq!(continuous.animation, AnimationType::Idle);
        assert_eq!(continuous.heading_degrees, 120.0);
        assert_eq!(continuous.opacity, 1.0);
    }
}
