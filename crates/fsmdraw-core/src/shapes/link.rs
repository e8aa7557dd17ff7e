//! Transition link between two distinct nodes.

use super::{HIT_TARGET_PADDING, LinkPath, NodeId, RenderGeometry, SNAP_TO_PADDING};
use crate::geom;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

fn default_parallel_part() -> f64 {
    0.5
}

/// A directed transition from `node_a` to `node_b`.
///
/// The anchor is stored relative to the segment between the two node
/// centers: `parallel_part` is the fraction along it, `perpendicular_part`
/// the signed offset from it. A zero perpendicular part means a straight
/// line; anything else bends the link into a circular arc through both
/// nodes and the anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub node_a: NodeId,
    pub node_b: NodeId,
    #[serde(default)]
    pub text: String,
    /// Label side for the straight-line case, either 0 or pi.
    #[serde(default)]
    pub line_angle_adjust: f64,
    #[serde(default = "default_parallel_part")]
    pub parallel_part: f64,
    #[serde(default)]
    pub perpendicular_part: f64,
}

impl Link {
    pub fn new(node_a: NodeId, node_b: NodeId) -> Self {
        Self {
            node_a,
            node_b,
            text: String::new(),
            line_angle_adjust: 0.0,
            parallel_part: default_parallel_part(),
            perpendicular_part: 0.0,
        }
    }

    /// The anchor point in canvas coordinates, given the node centers.
    pub fn anchor_point(&self, a: Point, b: Point) -> Point {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let scale = (dx * dx + dy * dy).sqrt();
        if scale == 0.0 {
            return a;
        }
        Point::new(
            a.x + dx * self.parallel_part - dy * self.perpendicular_part / scale,
            a.y + dy * self.parallel_part + dx * self.perpendicular_part / scale,
        )
    }

    /// Re-derive the anchor parametrization from a dragged point. Snaps to a
    /// straight line when the point is between the nodes and close to the
    /// segment, remembering which side it approached from so the label stays
    /// put.
    pub fn set_anchor_point(&mut self, point: Point, a: Point, b: Point) {
        let proj = geom::project_onto_segment(point, a, b);
        self.parallel_part = proj.percent;
        self.perpendicular_part = proj.distance;
        if self.parallel_part > 0.0
            && self.parallel_part < 1.0
            && self.perpendicular_part.abs() < SNAP_TO_PADDING
        {
            self.line_angle_adjust = if self.perpendicular_part < 0.0 { PI } else { 0.0 };
            self.perpendicular_part = 0.0;
        }
    }

    /// Full render geometry given the node centers and the shared radius.
    pub fn geometry(&self, a: Point, b: Point, node_radius: f64) -> RenderGeometry {
        if self.perpendicular_part == 0.0 {
            return self.segment_geometry(a, b, node_radius);
        }
        let anchor = self.anchor_point(a, b);
        let Some(circle) = geom::circle_from_three_points(a, b, anchor) else {
            return self.segment_geometry(a, b, node_radius);
        };
        let is_reversed = self.perpendicular_part > 0.0;
        let reverse_scale = if is_reversed { 1.0 } else { -1.0 };
        // Endpoint angles are pulled in by nodeRadius/circleRadius, a
        // small-angle approximation of the true chord offset.
        let start_angle = (a.y - circle.center.y).atan2(a.x - circle.center.x)
            - reverse_scale * node_radius / circle.radius;
        let end_angle = (b.y - circle.center.y).atan2(b.x - circle.center.x)
            + reverse_scale * node_radius / circle.radius;

        let mut unwrapped_end = end_angle;
        if unwrapped_end < start_angle {
            unwrapped_end += TAU;
        }
        let text_angle =
            (start_angle + unwrapped_end) / 2.0 + if is_reversed { PI } else { 0.0 };

        RenderGeometry {
            path: LinkPath::Arc {
                center: circle.center,
                radius: circle.radius,
                start_angle,
                end_angle,
                reversed: is_reversed,
            },
            arrow_tip: circle.point_at(end_angle),
            arrow_angle: end_angle - reverse_scale * FRAC_PI_2,
            label_pos: circle.point_at(text_angle),
            label_angle: Some(text_angle),
        }
    }

    fn segment_geometry(&self, a: Point, b: Point, node_radius: f64) -> RenderGeometry {
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let start = geom::closest_point_on_circle(a, node_radius, mid);
        let end = geom::closest_point_on_circle(b, node_radius, mid);
        let label_pos = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        RenderGeometry {
            path: LinkPath::Segment { start, end },
            arrow_tip: end,
            arrow_angle: (end.y - start.y).atan2(end.x - start.x),
            label_pos,
            label_angle: Some(
                (end.x - start.x).atan2(start.y - end.y) + self.line_angle_adjust,
            ),
        }
    }

    /// Hit test against the rendered stroke.
    pub fn contains_point(&self, point: Point, a: Point, b: Point, node_radius: f64) -> bool {
        match self.geometry(a, b, node_radius).path {
            LinkPath::Segment { start, end } => {
                geom::point_near_segment(point, start, end, HIT_TARGET_PADDING)
            }
            LinkPath::Arc { center, radius, start_angle, end_angle, reversed } => {
                let dx = point.x - center.x;
                let dy = point.y - center.y;
                let distance = (dx * dx + dy * dy).sqrt() - radius;
                if distance.abs() >= HIT_TARGET_PADDING {
                    return false;
                }
                let (start_angle, mut end_angle) = if reversed {
                    (end_angle, start_angle)
                } else {
                    (start_angle, end_angle)
                };
                if end_angle < start_angle {
                    end_angle += TAU;
                }
                let mut angle = dy.atan2(dx);
                if angle < start_angle {
                    angle += TAU;
                } else if angle > end_angle {
                    angle -= TAU;
                }
                angle > start_angle && angle < end_angle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Point = Point::new(0.0, 0.0);
    const B: Point = Point::new(100.0, 0.0);

    #[test]
    fn test_anchor_round_trip() {
        let mut link = Link::new(NodeId(0), NodeId(1));
        link.set_anchor_point(Point::new(50.0, 20.0), A, B);
        assert!((link.parallel_part - 0.5).abs() < 1e-9);
        assert!((link.perpendicular_part - 20.0).abs() < 1e-9);
        let anchor = link.anchor_point(A, B);
        assert!((anchor.x - 50.0).abs() < 1e-9);
        assert!((anchor.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_snaps_to_straight_line() {
        let mut link = Link::new(NodeId(0), NodeId(1));
        link.set_anchor_point(Point::new(50.0, 4.0), A, B);
        assert_eq!(link.perpendicular_part, 0.0);
        assert_eq!(link.line_angle_adjust, 0.0);

        link.set_anchor_point(Point::new(50.0, -4.0), A, B);
        assert_eq!(link.perpendicular_part, 0.0);
        assert_eq!(link.line_angle_adjust, PI);

        // Outside the endpoints there is no snapping.
        link.set_anchor_point(Point::new(150.0, 2.0), A, B);
        assert!(link.perpendicular_part != 0.0);
    }

    #[test]
    fn test_straight_geometry_endpoints() {
        let link = Link::new(NodeId(0), NodeId(1));
        let geom = link.geometry(Point::new(100.0, 100.0), Point::new(300.0, 100.0), 30.0);
        match geom.path {
            LinkPath::Segment { start, end } => {
                assert!((start.x - 130.0).abs() < 1e-9);
                assert!((start.y - 100.0).abs() < 1e-9);
                assert!((end.x - 270.0).abs() < 1e-9);
                assert!((end.y - 100.0).abs() < 1e-9);
            }
            _ => panic!("expected a segment"),
        }
        assert_eq!(geom.arrow_angle, 0.0);
    }

    #[test]
    fn test_curved_geometry() {
        let mut link = Link::new(NodeId(0), NodeId(1));
        link.set_anchor_point(Point::new(50.0, 50.0), A, B);
        let geom = link.geometry(A, B, 30.0);
        match geom.path {
            LinkPath::Arc { center, radius, start_angle, end_angle, reversed } => {
                assert!((center.x - 50.0).abs() < 1e-9);
                assert!(center.y.abs() < 1e-9);
                assert!((radius - 50.0).abs() < 1e-9);
                assert!(reversed);
                // Endpoints pulled in by the angular inset.
                assert!((start_angle - (PI - 0.6)).abs() < 1e-9);
                assert!((end_angle - 0.6).abs() < 1e-9);
            }
            _ => panic!("expected an arc"),
        }
    }

    #[test]
    fn test_contains_point_on_arc() {
        let mut link = Link::new(NodeId(0), NodeId(1));
        link.set_anchor_point(Point::new(50.0, 50.0), A, B);
        // On the bulge, mid-span.
        assert!(link.contains_point(Point::new(50.0, 50.0), A, B, 30.0));
        // Right radius, excluded span.
        assert!(!link.contains_point(Point::new(50.0, -50.0), A, B, 30.0));
        // Wrong radius.
        assert!(!link.contains_point(Point::new(50.0, 30.0), A, B, 30.0));
    }

    #[test]
    fn test_contains_point_on_segment() {
        let link = Link::new(NodeId(0), NodeId(1));
        assert!(link.contains_point(Point::new(50.0, 3.0), A, B, 10.0));
        assert!(!link.contains_point(Point::new(50.0, 9.0), A, B, 10.0));
    }
}
