//! Raster backend on top of `tiny-skia`.

use std::f64::consts::TAU;

use kurbo::{Arc, BezPath, PathEl, Point, Shape, Vec2};
use peniko::Color;
use tiny_skia::{FillRule, Paint, Pixmap, Stroke, Transform};

use crate::metrics;
use crate::target::DrawTarget;

/// In-memory pixel surface. Starts fully transparent, like an unpainted
/// canvas, so exported images keep a transparent background.
pub struct CanvasSurface {
    pixmap: Pixmap,
    path: BezPath,
    color: Color,
    offset: Vec2,
    saved_offsets: Vec<Vec2>,
}

impl CanvasSurface {
    /// `None` when either dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            path: BezPath::new(),
            color: Color::BLACK,
            offset: Vec2::ZERO,
            saved_offsets: Vec::new(),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Wipe all pixels back to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    // The solid-color paint borrows nothing from the surface.
    fn paint(&self) -> Paint<'static> {
        let rgba = self.color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
        paint.anti_alias = true;
        paint
    }

    fn fill_bez(&mut self, path: &BezPath, offset: Vec2) {
        if let Some(path) = bez_to_skia(path, offset) {
            let paint = self.paint();
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

/// Arc sweep with HTML canvas semantics: spans of a full turn or more
/// collapse to one full circle, anything else is reduced modulo one turn
/// in the drawing direction.
fn arc_sweep(start_angle: f64, end_angle: f64, reversed: bool) -> f64 {
    let delta = end_angle - start_angle;
    if delta == 0.0 {
        return 0.0;
    }
    if !reversed {
        if delta >= TAU {
            return TAU;
        }
        let sweep = delta.rem_euclid(TAU);
        if sweep == 0.0 { TAU } else { sweep }
    } else {
        if delta <= -TAU {
            return -TAU;
        }
        let sweep = delta.rem_euclid(TAU);
        if sweep == 0.0 { -TAU } else { sweep - TAU }
    }
}

fn bez_to_skia(path: &BezPath, offset: Vec2) -> Option<tiny_skia::Path> {
    let mut builder = tiny_skia::PathBuilder::new();
    let at = |p: Point| (p + offset);
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => {
                let p = at(p);
                builder.move_to(p.x as f32, p.y as f32);
            }
            PathEl::LineTo(p) => {
                let p = at(p);
                builder.line_to(p.x as f32, p.y as f32);
            }
            PathEl::QuadTo(p1, p) => {
                let (p1, p) = (at(p1), at(p));
                builder.quad_to(p1.x as f32, p1.y as f32, p.x as f32, p.y as f32);
            }
            PathEl::CurveTo(p1, p2, p) => {
                let (p1, p2, p) = (at(p1), at(p2), at(p));
                builder.cubic_to(
                    p1.x as f32,
                    p1.y as f32,
                    p2.x as f32,
                    p2.y as f32,
                    p.x as f32,
                    p.y as f32,
                );
            }
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

impl DrawTarget for CanvasSurface {
    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        self.path.line_to(point);
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64, reversed: bool) {
        let arc = Arc {
            center,
            radii: Vec2::new(radius, radius),
            start_angle,
            sweep_angle: arc_sweep(start_angle, end_angle, reversed),
            x_rotation: 0.0,
        };
        let empty = self.path.elements().is_empty();
        for element in arc.path_elements(0.1) {
            match element {
                // Connect to an existing subpath the way canvas arcs do.
                PathEl::MoveTo(p) if !empty => self.path.line_to(p),
                other => self.path.push(other),
            }
        }
    }

    fn stroke(&mut self) {
        if let Some(path) = bez_to_skia(&self.path, self.offset) {
            let paint = self.paint();
            let stroke = Stroke { width: 1.0, ..Stroke::default() };
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn fill(&mut self) {
        if let Some(path) = bez_to_skia(&self.path, self.offset) {
            let paint = self.paint();
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn measure_text(&self, text: &str) -> f64 {
        metrics::measure_text(text)
    }

    fn draw_label(&mut self, formatted: &str, _raw: &str, x: f64, y: f64, _angle: Option<f64>) {
        let left = (x - metrics::measure_text(formatted) / 2.0).round();
        let baseline = y.round() + 6.0;
        if let Some(glyphs) = metrics::layout_glyphs(formatted, left, baseline) {
            self.fill_bez(&glyphs, self.offset);
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset += Vec2::new(dx, dy);
    }

    fn save(&mut self) {
        self.saved_offsets.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.saved_offsets.pop() {
            self.offset = offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted_pixels(surface: &CanvasSurface) -> usize {
        surface.pixmap().pixels().iter().filter(|p| p.alpha() != 0).count()
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = CanvasSurface::new(10, 10).unwrap();
        assert_eq!(painted_pixels(&surface), 0);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(CanvasSurface::new(0, 10).is_none());
    }

    #[test]
    fn test_stroked_line_paints_pixels() {
        let mut surface = CanvasSurface::new(100, 100).unwrap();
        surface.begin_path();
        surface.move_to(Point::new(10.0, 50.0));
        surface.line_to(Point::new(90.0, 50.0));
        surface.stroke();
        assert!(painted_pixels(&surface) > 0);
    }

    #[test]
    fn test_begin_path_drops_previous_geometry() {
        let mut surface = CanvasSurface::new(100, 100).unwrap();
        surface.move_to(Point::new(10.0, 50.0));
        surface.line_to(Point::new(90.0, 50.0));
        surface.begin_path();
        surface.stroke();
        assert_eq!(painted_pixels(&surface), 0);
    }

    #[test]
    fn test_full_circle_arc_is_closed() {
        let mut surface = CanvasSurface::new(100, 100).unwrap();
        surface.begin_path();
        surface.arc(Point::new(50.0, 50.0), 20.0, 0.0, TAU, false);
        surface.stroke();
        // Pixels on all four sides of the circle.
        let pixmap = surface.pixmap();
        let at = |x: u32, y: u32| pixmap.pixel(x, y).map(|p| p.alpha() != 0) == Some(true);
        assert!(at(70, 50) || at(69, 50));
        assert!(at(30, 50) || at(31, 50));
        assert!(at(50, 70) || at(50, 69));
        assert!(at(50, 30) || at(50, 31));
    }

    #[test]
    fn test_arc_sweep_reduction() {
        assert_eq!(arc_sweep(0.0, TAU, false), TAU);
        assert_eq!(arc_sweep(0.0, TAU, true), -TAU);
        assert!((arc_sweep(1.0, 0.5, false) - (TAU - 0.5)).abs() < 1e-12);
        assert!((arc_sweep(0.5, 1.0, true) - (0.5 - TAU)).abs() < 1e-12);
        assert_eq!(arc_sweep(1.0, 1.0, false), 0.0);
    }

    #[test]
    fn test_translate_shifts_strokes() {
        let mut surface = CanvasSurface::new(100, 100).unwrap();
        surface.save();
        surface.translate(0.0, 20.0);
        surface.begin_path();
        surface.move_to(Point::new(10.0, 10.0));
        surface.line_to(Point::new(90.0, 10.0));
        surface.stroke();
        surface.restore();

        let pixmap = surface.pixmap();
        let row = |y: u32| (0..100).any(|x| pixmap.pixel(x, y).map(|p| p.alpha() != 0) == Some(true));
        assert!(row(30));
        assert!(!row(10));
    }
}
