//! Self-transition loop on a single node.

use super::{HIT_TARGET_PADDING, LinkPath, NodeId, RenderGeometry};
use crate::geom;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fraction of a full circle swept by the loop on each side of the anchor.
const LOOP_SWEEP: f64 = 0.8 * PI;

/// A transition from a node back to itself, drawn as a loop outside the
/// node circle. Only the angle of the loop around the node is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfLink {
    pub node: NodeId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub anchor_angle: f64,
    /// Angular grab offset while dragging.
    #[serde(skip)]
    mouse_offset_angle: f64,
}

impl SelfLink {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            text: String::new(),
            anchor_angle: 0.0,
            mouse_offset_angle: 0.0,
        }
    }

    /// A loop anchored directly at the pointer, for link drafting.
    pub fn from_pointer(node: NodeId, node_pos: Point, pointer: Point) -> Self {
        let mut link = Self::new(node);
        link.set_anchor_point(pointer, node_pos);
        link
    }

    /// Remember the angular offset between the pointer and the anchor.
    pub fn set_drag_start(&mut self, pointer: Point, node_pos: Point) {
        let pointer_angle = (pointer.y - node_pos.y).atan2(pointer.x - node_pos.x);
        self.mouse_offset_angle = self.anchor_angle - pointer_angle;
    }

    /// Place the loop at the pointer's angle, snapped to right angles and
    /// normalized so the stored form stays canonical.
    pub fn set_anchor_point(&mut self, pointer: Point, node_pos: Point) {
        let angle = (pointer.y - node_pos.y).atan2(pointer.x - node_pos.x)
            + self.mouse_offset_angle;
        let snapped = geom::snap_angle_to_right_angles(angle, 0.1);
        self.anchor_angle = geom::normalize_angle(snapped);
    }

    fn loop_circle(&self, node_pos: Point, node_radius: f64) -> geom::Circle {
        geom::Circle {
            center: Point::new(
                node_pos.x + 1.5 * node_radius * self.anchor_angle.cos(),
                node_pos.y + 1.5 * node_radius * self.anchor_angle.sin(),
            ),
            radius: 0.75 * node_radius,
        }
    }

    pub fn geometry(&self, node_pos: Point, node_radius: f64) -> RenderGeometry {
        let circle = self.loop_circle(node_pos, node_radius);
        let start_angle = self.anchor_angle - LOOP_SWEEP;
        let end_angle = self.anchor_angle + LOOP_SWEEP;
        RenderGeometry {
            path: LinkPath::Arc {
                center: circle.center,
                radius: circle.radius,
                start_angle,
                end_angle,
                reversed: false,
            },
            arrow_tip: circle.point_at(end_angle),
            arrow_angle: end_angle + 0.4 * PI,
            label_pos: circle.point_at(self.anchor_angle),
            label_angle: Some(self.anchor_angle),
        }
    }

    /// Hit test against the loop stroke (the whole circle, matching how the
    /// nearly-closed loop reads on screen).
    pub fn contains_point(&self, point: Point, node_pos: Point, node_radius: f64) -> bool {
        let circle = self.loop_circle(node_pos, node_radius);
        let dx = point.x - circle.center.x;
        let dy = point.y - circle.center.y;
        let distance = (dx * dx + dy * dy).sqrt() - circle.radius;
        distance.abs() < HIT_TARGET_PADDING
    }
}
