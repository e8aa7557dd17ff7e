//! State node shape.

use crate::geom;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A state node: a labelled circle, optionally marked as an accept state.
///
/// The node stores its own position and label; the circle radius is shared
/// document-wide and lives on the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_accept_state: bool,
    /// Draw only the label, without the circle outline.
    #[serde(default)]
    pub text_only: bool,
    /// Offset between the node center and the pointer at drag start.
    #[serde(skip)]
    drag_offset: Vec2,
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            text: String::new(),
            is_accept_state: false,
            text_only: false,
            drag_offset: Vec2::ZERO,
        }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Remember where inside the node the drag grabbed it, so the node does
    /// not jump to center under the pointer.
    pub fn set_drag_start(&mut self, pointer: Point) {
        self.drag_offset = self.pos() - pointer;
    }

    /// Move the node so the grabbed point follows the pointer.
    pub fn set_anchor_point(&mut self, pointer: Point) {
        self.x = pointer.x + self.drag_offset.x;
        self.y = pointer.y + self.drag_offset.y;
    }

    /// Strict interior test against the node circle.
    pub fn contains_point(&self, point: Point, radius: f64) -> bool {
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        dx * dx + dy * dy < radius * radius
    }

    /// Point on the node circle closest to `towards`.
    pub fn closest_point_on_circle(&self, radius: f64, towards: Point) -> Point {
        geom::closest_point_on_circle(self.pos(), radius, towards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_is_strict() {
        let node = Node::new(100.0, 100.0);
        assert!(node.contains_point(Point::new(100.0, 100.0), 30.0));
        assert!(node.contains_point(Point::new(129.0, 100.0), 30.0));
        // Exactly on the boundary is outside.
        assert!(!node.contains_point(Point::new(130.0, 100.0), 30.0));
        assert!(!node.contains_point(Point::new(131.0, 100.0), 30.0));
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut node = Node::new(100.0, 100.0);
        node.set_drag_start(Point::new(110.0, 95.0));
        node.set_anchor_point(Point::new(210.0, 195.0));
        assert_eq!(node.x, 200.0);
        assert_eq!(node.y, 200.0);
    }

    #[test]
    fn test_drag_offset_not_serialized() {
        let mut node = Node::new(10.0, 20.0);
        node.set_drag_start(Point::new(0.0, 0.0));
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("drag"));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back.x, 10.0);
        assert_eq!(back.y, 20.0);
    }
}
