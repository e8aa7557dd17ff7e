//! Shared text metrics and glyph outlines for the label font.
//!
//! All backends measure through here, so a label is centered the same way
//! in the editor, the SVG, and the TikZ output.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use kurbo::{BezPath, Point};
use once_cell::sync::Lazy;
use ttf_parser::{Face, OutlineBuilder};

/// Label font size in pixels.
pub const FONT_SIZE: f64 = 20.0;

/// Per-character width estimate when no serif font is installed.
const FALLBACK_WIDTH_FACTOR: f64 = 0.56;

struct LabelFont {
    data: Vec<u8>,
    index: u32,
}

static LABEL_FONT: Lazy<Option<LabelFont>> = Lazy::new(load_label_font);

fn load_label_font() -> Option<LabelFont> {
    let mut db = Database::new();
    db.load_system_fonts();
    let families = [Family::Name("Times New Roman"), Family::Serif];
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db.query(&query)?;
    let font = db.with_face_data(id, |data, index| LabelFont { data: data.to_vec(), index })?;
    if Face::parse(&font.data, font.index).is_err() {
        log::warn!("label font failed to parse, falling back to width estimates");
        return None;
    }
    Some(font)
}

fn with_face<T>(f: impl FnOnce(&Face) -> T) -> Option<T> {
    let font = LABEL_FONT.as_ref()?;
    let face = Face::parse(&font.data, font.index).ok()?;
    Some(f(&face))
}

/// Width of `text` at the label font size.
pub fn measure_text(text: &str) -> f64 {
    let fallback = FONT_SIZE * FALLBACK_WIDTH_FACTOR;
    with_face(|face| {
        let scale = FONT_SIZE / f64::from(face.units_per_em());
        text.chars()
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map_or(fallback, |advance| f64::from(advance) * scale)
            })
            .sum()
    })
    .unwrap_or_else(|| text.chars().count() as f64 * fallback)
}

/// Filled outlines for `text` with its left edge at `left` and baseline at
/// `baseline`. `None` when no usable font is installed.
pub fn layout_glyphs(text: &str, left: f64, baseline: f64) -> Option<BezPath> {
    with_face(|face| {
        let scale = FONT_SIZE / f64::from(face.units_per_em());
        let fallback = FONT_SIZE * FALLBACK_WIDTH_FACTOR;
        let mut pen = GlyphPen { path: BezPath::new(), scale, dx: left, dy: baseline };
        for ch in text.chars() {
            match face.glyph_index(ch) {
                Some(glyph) => {
                    face.outline_glyph(glyph, &mut pen);
                    let advance = face
                        .glyph_hor_advance(glyph)
                        .map_or(fallback, |advance| f64::from(advance) * scale);
                    pen.dx += advance;
                }
                None => pen.dx += fallback,
            }
        }
        pen.path
    })
}

/// Collects glyph outlines, mapping font units (y-up) into canvas
/// coordinates (y-down).
struct GlyphPen {
    path: BezPath,
    scale: f64,
    dx: f64,
    dy: f64,
}

impl GlyphPen {
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(
            self.dx + f64::from(x) * self.scale,
            self.dy - f64::from(y) * self.scale,
        )
    }
}

impl OutlineBuilder for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(self.point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(self.point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path.quad_to(self.point(x1, y1), self.point(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path
            .curve_to(self.point(x1, y1), self.point(x2, y2), self.point(x, y));
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
