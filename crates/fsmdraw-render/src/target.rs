//! Draw-target abstraction shared by every backend.

use kurbo::Point;
use peniko::Color;

/// The drawing surface contract.
///
/// The scene replay in [`crate::draw`] issues only these operations, so a
/// backend that implements them renders every diagram: the interactive
/// raster surface rasterizes immediately, while the SVG and TikZ surfaces
/// accumulate markup.
pub trait DrawTarget {
    /// Start a fresh path; drops any unstroked geometry.
    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Append a circular arc from `start_angle` to `end_angle` (radians,
    /// y-down). `reversed` runs it counter-clockwise. A span of exactly one
    /// full turn is a circle.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64, reversed: bool);

    /// Stroke the current path with a one pixel line.
    fn stroke(&mut self);

    /// Fill the current path.
    fn fill(&mut self);

    /// Color for subsequent strokes, fills, and labels.
    fn set_color(&mut self, color: Color);

    /// Width of `text` in the label font; identical across backends so
    /// label layout never depends on the output format.
    fn measure_text(&self, text: &str) -> f64;

    /// Draw a label. `x` is the horizontal center of the formatted text and
    /// `y` the vertical center of the line. `raw` is the unconverted form
    /// for backends that typeset the escapes themselves; `angle` is the
    /// placement angle for backends that position text on their own.
    fn draw_label(&mut self, formatted: &str, raw: &str, x: f64, y: f64, angle: Option<f64>);

    /// Translate subsequent coordinates.
    fn translate(&mut self, dx: f64, dy: f64);

    fn save(&mut self) {}

    fn restore(&mut self) {}
}
