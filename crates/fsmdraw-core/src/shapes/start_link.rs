//! Entry arrow marking the start state.

use super::{HIT_TARGET_PADDING, LinkPath, NodeId, RenderGeometry, SNAP_TO_PADDING};
use crate::geom;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An arrow from a free point in space to a node, marking it as the start
/// state. The free end is stored relative to the node so it follows the
/// node when dragged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLink {
    pub node: NodeId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default)]
    pub delta_y: f64,
}

impl StartLink {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            text: String::new(),
            delta_x: 0.0,
            delta_y: 0.0,
        }
    }

    /// An entry arrow with its free end at the pointer, for link drafting.
    pub fn from_pointer(node: NodeId, node_pos: Point, pointer: Point) -> Self {
        let mut link = Self::new(node);
        link.set_anchor_point(pointer, node_pos);
        link
    }

    /// Place the free end at the pointer, snapping each axis to the node
    /// center independently.
    pub fn set_anchor_point(&mut self, pointer: Point, node_pos: Point) {
        self.delta_x = pointer.x - node_pos.x;
        self.delta_y = pointer.y - node_pos.y;
        if self.delta_x.abs() < SNAP_TO_PADDING {
            self.delta_x = 0.0;
        }
        if self.delta_y.abs() < SNAP_TO_PADDING {
            self.delta_y = 0.0;
        }
    }

    pub fn geometry(&self, node_pos: Point, node_radius: f64) -> RenderGeometry {
        let start = Point::new(node_pos.x + self.delta_x, node_pos.y + self.delta_y);
        let end = geom::closest_point_on_circle(node_pos, node_radius, start);
        RenderGeometry {
            path: LinkPath::Segment { start, end },
            arrow_tip: end,
            arrow_angle: (-self.delta_y).atan2(-self.delta_x),
            label_pos: start,
            label_angle: Some((start.y - end.y).atan2(start.x - end.x)),
        }
    }

    pub fn contains_point(&self, point: Point, node_pos: Point, node_radius: f64) -> bool {
        match self.geometry(node_pos, node_radius).path {
            LinkPath::Segment { start, end } => {
                geom::point_near_segment(point, start, end, HIT_TARGET_PADDING)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_snap_per_axis() {
        let mut link = StartLink::new(NodeId(0));
        let node_pos = Point::new(100.0, 100.0);
        link.set_anchor_point(Point::new(20.0, 103.0), node_pos);
        assert_eq!(link.delta_x, -80.0);
        assert_eq!(link.delta_y, 0.0);
    }

    #[test]
    fn test_geometry_points_at_node() {
        let mut link = StartLink::new(NodeId(0));
        let node_pos = Point::new(100.0, 100.0);
        link.set_anchor_point(Point::new(20.0, 100.0), node_pos);
        let geom = link.geometry(node_pos, 30.0);
        match geom.path {
            LinkPath::Segment { start, end } => {
                assert_eq!(start, Point::new(20.0, 100.0));
                assert!((end.x - 70.0).abs() < 1e-9);
                assert!((end.y - 100.0).abs() < 1e-9);
            }
            _ => panic!("expected a segment"),
        }
        // Arrow points from free space into the node.
        assert!(geom.arrow_angle.abs() < 1e-9);
    }

    #[test]
    fn test_contains_point() {
        let mut link = StartLink::new(NodeId(0));
        let node_pos = Point::new(100.0, 100.0);
        link.set_anchor_point(Point::new(20.0, 100.0), node_pos);
        assert!(link.contains_point(Point::new(45.0, 102.0), node_pos, 30.0));
        assert!(!link.contains_point(Point::new(45.0, 120.0), node_pos, 30.0));
    }
}
