use glam::Vec3;

use hexmotion::{AnimationClip, Color, RenderSink};

/// Stands in for a renderer: remembers the last pose and logs what a real
/// renderer would have drawn.
#[derive(Debug)]
pub struct LogSink {
    label: String,
    position: Vec3,
    heading_degrees: f32,
    outlined: bool,
}

impl LogSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            position: Vec3::ZERO,
            heading_degrees: 0.0,
            outlined: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn heading_degrees(&self) -> f32 {
        self.heading_degrees
    }
}

impl RenderSink for LogSink {
    fn set_transform(&mut self, position: Vec3, heading_degrees: f32) {
        if position != self.position || heading_degrees != self.heading_degrees {
            log::trace!(
                "{} at ({:.2}, {:.2}, {:.2}) facing {:.1}",
                self.label,
                position.x,
                position.y,
                position.z,
                heading_degrees
            );
        }
        self.position = position;
        self.heading_degrees = heading_degrees;
    }

    fn set_outline(&mut self, border_radius: f32, border_color: Color) {
        let outlined = border_radius > 0.0;
        if outlined != self.outlined {
            log::info!(
                "{} outline {} (radius {border_radius}, rgba {:?})",
                self.label,
                if outlined { "on" } else { "off" },
                border_color.to_array()
            );
            self.outlined = outlined;
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        if opacity < 1.0 {
            log::trace!("{} opacity {opacity:.2}", self.label);
        }
    }

    fn play_animation(&mut self, clip: AnimationClip) {
        log::info!("{} plays {}", self.label, clip.name());
    }

    fn destroy(&mut self) {
        log::info!("{} removed", self.label);
    }
}
