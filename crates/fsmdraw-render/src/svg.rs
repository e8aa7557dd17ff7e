//! SVG markup backend.
//!
//! Produces a standalone SVG 1.1 document. Coordinates are shifted by the
//! crop bounds so the drawing starts at the document origin; strokes become
//! `<polygon>` elements, arcs become `<ellipse>` or `<path>` elements.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use kurbo::{Point, Rect, Vec2};
use peniko::Color;

use crate::metrics;
use crate::target::DrawTarget;

/// Decimal formatting with trailing zeros stripped, so "4.000" prints as
/// "4" and "0.250" as "0.25".
pub(crate) fn fixed(value: f64, digits: usize) -> String {
    let mut out = format!("{value:.digits$}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" { "0".into() } else { out }
}

/// Entity-escape markup characters and encode anything outside printable
/// ASCII as a numeric character reference.
fn text_to_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{20}'..='\u{7e}' => out.push(ch),
            other => {
                let _ = write!(out, "&#{};", other as u32);
            }
        }
    }
    out
}

/// Accumulates SVG elements; call [`SvgSurface::finish`] for the document.
pub struct SvgSurface {
    bounds: Rect,
    trans: Vec2,
    points: Vec<Point>,
    body: String,
}

impl SvgSurface {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds, trans: Vec2::ZERO, points: Vec::new(), body: String::new() }
    }

    fn map(&self, point: Point) -> Point {
        Point::new(
            point.x - self.bounds.x0 + self.trans.x,
            point.y - self.bounds.y0 + self.trans.y,
        )
    }

    fn polygon(&mut self, attr: &str) {
        if self.points.is_empty() {
            return;
        }
        let points = self
            .points
            .iter()
            .map(|p| format!("{},{}", fixed(p.x, 3), fixed(p.y, 3)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(self.body, "\t<polygon {attr} stroke-width=\"1\" points=\"{points}\"/>");
    }

    pub fn finish(&self) -> String {
        let mut data = String::from("<?xml version=\"1.0\" standalone=\"no\"?>\n");
        data.push_str(
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
             \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n\n",
        );
        let _ = writeln!(
            data,
            "<svg width=\"{}\" height=\"{}\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">",
            fixed(self.bounds.width(), 3),
            fixed(self.bounds.height(), 3),
        );
        data.push_str(&self.body);
        data.push_str("</svg>\n");
        data
    }
}

impl DrawTarget for SvgSurface {
    fn begin_path(&mut self) {
        self.points.clear();
    }

    fn move_to(&mut self, point: Point) {
        self.points.push(self.map(point));
    }

    fn line_to(&mut self, point: Point) {
        self.points.push(self.map(point));
    }

    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        mut start_angle: f64,
        mut end_angle: f64,
        reversed: bool,
    ) {
        let center = self.map(center);
        let style = "stroke=\"black\" stroke-width=\"1\" fill=\"none\"";
        if end_angle - start_angle == TAU {
            let _ = writeln!(
                self.body,
                "\t<ellipse {style} cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"/>",
                fixed(center.x, 3),
                fixed(center.y, 3),
                fixed(radius, 3),
                fixed(radius, 3),
            );
            return;
        }
        if reversed {
            std::mem::swap(&mut start_angle, &mut end_angle);
        }
        if end_angle < start_angle {
            end_angle += TAU;
        }
        let start = Point::new(
            center.x + radius * start_angle.cos(),
            center.y + radius * start_angle.sin(),
        );
        let end =
            Point::new(center.x + radius * end_angle.cos(), center.y + radius * end_angle.sin());
        let large_arc = u32::from((end_angle - start_angle).abs() > PI);
        let _ = writeln!(
            self.body,
            "\t<path {style} d=\"M {},{} A {},{} 0 {large_arc} 1 {},{}\"/>",
            fixed(start.x, 3),
            fixed(start.y, 3),
            fixed(radius, 3),
            fixed(radius, 3),
            fixed(end.x, 3),
            fixed(end.y, 3),
        );
    }

    fn stroke(&mut self) {
        self.polygon("stroke=\"black\"");
    }

    fn fill(&mut self) {
        self.polygon("fill=\"black\"");
    }

    fn set_color(&mut self, _color: Color) {}

    fn measure_text(&self, text: &str) -> f64 {
        metrics::measure_text(text)
    }

    fn draw_label(&mut self, formatted: &str, _raw: &str, x: f64, y: f64, _angle: Option<f64>) {
        if formatted.replacen(' ', "", 1).is_empty() {
            return;
        }
        let left = (x - metrics::measure_text(formatted) / 2.0).round();
        let anchor = self.map(Point::new(left, y.round() + 6.0));
        let _ = writeln!(
            self.body,
            "\t<text x=\"{}\" y=\"{}\" font-family=\"Times New Roman\" font-size=\"20\">{}</text>",
            fixed(anchor.x, 3),
            fixed(anchor.y, 3),
            text_to_xml(formatted),
        );
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.trans = Vec2::new(dx, dy);
    }
}
