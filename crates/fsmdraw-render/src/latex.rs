//! TikZ markup backend.
//!
//! Produces a `tikzpicture` snippet for pasting into a LaTeX document.
//! Pixel coordinates are scaled down by 10 because TikZ misbehaves on
//! large coordinates, and the y axis is flipped to match TeX.

use std::f64::consts::TAU;
use std::fmt::Write;

use kurbo::{Point, Rect};
use once_cell::sync::Lazy;
use peniko::Color;
use regex::Regex;

use crate::metrics;
use crate::svg::fixed;
use crate::target::DrawTarget;

const SCALE: f64 = 0.1;

/// Collapses split subscripts so "q_1_0" typesets as "q_{10}".
static SPLIT_SUBSCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(\d+)_(\d+)").unwrap());

/// Escape label text for math mode. Labels keep their raw `\alpha` style
/// escapes, which are already valid TeX.
fn tex_escape(raw: &str) -> String {
    let braced = raw.replace('{', "\\{").replace('}', "\\}");
    let joined = SPLIT_SUBSCRIPT_RE.replace_all(&braced, "_{$1$2}");
    // A literal \\ is a line break; it has to leave and re-enter math mode.
    joined.replace('$', "\\$").replace("\\\\", "$\\\\$")
}

/// Accumulates TikZ draw commands; call [`LatexSurface::finish`] for the
/// full snippet.
pub struct LatexSurface {
    bounds: Rect,
    points: Vec<Point>,
    body: String,
}

impl LatexSurface {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds, points: Vec::new(), body: String::new() }
    }

    fn map(&self, point: Point) -> Point {
        Point::new((point.x - self.bounds.x0) * SCALE, (point.y - self.bounds.y0) * SCALE)
    }

    fn path_command(&mut self, command: &str) {
        if self.points.is_empty() {
            return;
        }
        let _ = write!(self.body, "\\{command} [black]");
        for (i, p) in self.points.iter().enumerate() {
            let sep = if i > 0 { " --" } else { "" };
            let _ = write!(self.body, "{sep} ({},{})", fixed(p.x, 2), fixed(-p.y, 2));
        }
        self.body.push_str(";\n");
    }

    pub fn finish(&self) -> String {
        let mut data =
            String::from("% Please add \\usepackage{tikz} to your document preamble.\n\n");
        data.push_str("\\begin{center}\n");
        data.push_str("\\begin{tikzpicture}[scale=0.2]\n");
        data.push_str("\\tikzstyle{every node}+=[inner sep=0pt]\n");
        data.push_str(&self.body);
        data.push_str("\\end{tikzpicture}\n");
        data.push_str("\\end{center}\n");
        data
    }
}

impl DrawTarget for LatexSurface {
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
        let radius = radius * SCALE;
        if end_angle - start_angle == TAU {
            let _ = writeln!(
                self.body,
                "\\draw [black] ({},{}) circle ({});",
                fixed(center.x, 3),
                fixed(-center.y, 3),
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
        // TikZ breaks on angles outside -2pi..2pi.
        if start_angle.min(end_angle) < -TAU {
            start_angle += TAU;
            end_angle += TAU;
        } else if start_angle.max(end_angle) > TAU {
            start_angle -= TAU;
            end_angle -= TAU;
        }
        // Flip direction to the y-up TikZ plane.
        let start_angle = -start_angle;
        let end_angle = -end_angle;
        let _ = writeln!(
            self.body,
            "\\draw [black] ({},{}) arc ({}:{}:{});",
            fixed(center.x + radius * start_angle.cos(), 3),
            fixed(-center.y + radius * start_angle.sin(), 3),
            fixed(start_angle.to_degrees(), 5),
            fixed(end_angle.to_degrees(), 5),
            fixed(radius, 3),
        );
    }

    fn stroke(&mut self) {
        self.path_command("draw");
    }

    fn fill(&mut self) {
        self.path_command("fill");
    }

    fn set_color(&mut self, _color: Color) {}

    fn measure_text(&self, text: &str) -> f64 {
        metrics::measure_text(text)
    }

    fn draw_label(&mut self, formatted: &str, raw: &str, x: f64, y: f64, angle: Option<f64>) {
        if formatted.replacen(' ', "", 1).is_empty() {
            return;
        }
        let mut x = x - self.bounds.x0;
        let mut y = y - self.bounds.y0;
        // Anchor the node on the side of the box facing away from the
        // diagram, so TikZ's own text metrics keep it clear of the path.
        let node_params = match angle {
            Some(angle) => {
                let width = metrics::measure_text(formatted);
                let dx = angle.cos();
                let dy = angle.sin();
                if dx.abs() > dy.abs() {
                    if dx > 0.0 {
                        x -= width / 2.0;
                        "[right,align=center] "
                    } else {
                        x += width / 2.0;
                        "[left,align=center] "
                    }
                } else if dy > 0.0 {
                    y -= 10.0;
                    "[below,align=center] "
                } else {
                    y += 10.0;
                    "[above,align=center] "
                }
            }
            None => "",
        };
        let _ = writeln!(
            self.body,
            "\\draw ({},{}) node {node_params}{{${}$}};",
            fixed(x * SCALE, 2),
            fixed(-y * SCALE, 2),
            tex_escape(raw),
        );
    }

    fn translate(&mut self, _dx: f64, _dy: f64) {}
}
