//! Geometry helpers shared by the shape model and hit testing.

use kurbo::Point;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// A circle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Point on the circle at the given angle (measured from the positive x axis).
    pub fn point_at(&self, angle: f64) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

fn det3(
    a: f64, b: f64, c: f64,
    d: f64, e: f64, f: f64,
    g: f64, h: f64, i: f64,
) -> f64 {
    a * e * i + b * f * g + c * d * h - a * f * h - b * d * i - c * e * g
}

/// Circumcircle through three points, `None` when they are (numerically)
/// collinear.
pub fn circle_from_three_points(p1: Point, p2: Point, p3: Point) -> Option<Circle> {
    let a = det3(
        p1.x, p1.y, 1.0,
        p2.x, p2.y, 1.0,
        p3.x, p3.y, 1.0,
    );
    if a.abs() < 1e-9 {
        return None;
    }
    let s1 = p1.x * p1.x + p1.y * p1.y;
    let s2 = p2.x * p2.x + p2.y * p2.y;
    let s3 = p3.x * p3.x + p3.y * p3.y;
    let bx = -det3(
        s1, p1.y, 1.0,
        s2, p2.y, 1.0,
        s3, p3.y, 1.0,
    );
    let by = det3(
        s1, p1.x, 1.0,
        s2, p2.x, 1.0,
        s3, p3.x, 1.0,
    );
    let c = -det3(
        s1, p1.x, p1.y,
        s2, p2.x, p2.y,
        s3, p3.x, p3.y,
    );
    let center = Point::new(-bx / (2.0 * a), -by / (2.0 * a));
    let radius = (bx * bx + by * by - 4.0 * a * c).sqrt() / (2.0 * a.abs());
    Some(Circle { center, radius })
}

/// Point on the circle of `radius` around `center` closest to `towards`.
///
/// Degenerates to the point at angle zero when `towards` coincides with the
/// center, so the result is always finite.
pub fn closest_point_on_circle(center: Point, radius: f64, towards: Point) -> Point {
    let dx = towards.x - center.x;
    let dy = towards.y - center.y;
    let scale = (dx * dx + dy * dy).sqrt();
    if scale == 0.0 {
        return Point::new(center.x + radius, center.y);
    }
    Point::new(center.x + dx * radius / scale, center.y + dy * radius / scale)
}

/// Snap an angle to the nearest multiple of 90 degrees when within
/// `tolerance` radians of it.
pub fn snap_angle_to_right_angles(angle: f64, tolerance: f64) -> f64 {
    let nearest = (angle / FRAC_PI_2).round() * FRAC_PI_2;
    if (angle - nearest).abs() < tolerance {
        nearest
    } else {
        angle
    }
}

/// Normalize an angle into [-pi, pi].
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle;
    while a < -PI {
        a += TAU;
    }
    while a > PI {
        a -= TAU;
    }
    a
}

/// Projection of a point onto the infinite line through a segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentProjection {
    /// Position along the segment: 0 at `start`, 1 at `end`.
    pub percent: f64,
    /// Signed perpendicular distance from the line.
    pub distance: f64,
}

/// Project `point` onto the line through `start` and `end`.
pub fn project_onto_segment(point: Point, start: Point, end: Point) -> SegmentProjection {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return SegmentProjection { percent: 0.0, distance: start.distance(point) };
    }
    let percent = (dx * (point.x - start.x) + dy * (point.y - start.y)) / (length * length);
    let distance = (dx * (point.y - start.y) - dy * (point.x - start.x)) / length;
    SegmentProjection { percent, distance }
}

/// True when `point` lies within `padding` of the segment interior.
pub fn point_near_segment(point: Point, start: Point, end: Point, padding: f64) -> bool {
    let proj = project_onto_segment(point, start, end);
    proj.percent > 0.0 && proj.percent < 1.0 && proj.distance.abs() < padding
}
