//! Free-floating draft arrow shown while drawing a link.

use super::{LinkPath, RenderGeometry};
use kurbo::Point;

/// A straight arrow between two free points. Only ever exists while the
/// user is dragging out a new link; it is never committed or serialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporaryLink {
    pub from: Point,
    pub to: Point,
}

impl TemporaryLink {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn geometry(&self) -> RenderGeometry {
        RenderGeometry {
            path: LinkPath::Segment { start: self.from, end: self.to },
            arrow_tip: self.to,
            arrow_angle: (self.to.y - self.from.y).atan2(self.to.x - self.from.x),
            label_pos: Point::new(
                (self.from.x + self.to.x) / 2.0,
                (self.from.y + self.to.y) / 2.0,
            ),
            label_angle: None,
        }
    }
}
