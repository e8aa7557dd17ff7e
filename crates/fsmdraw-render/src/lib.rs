//! Rendering and export backends for the fsmdraw diagram editor.
//!
//! The core crate is display-agnostic; this crate turns its documents into
//! pixels and markup. Everything renders through the [`target::DrawTarget`]
//! trait, with three backends behind it: a `tiny-skia` raster surface for
//! the interactive view and PNG export, an SVG writer, and a TikZ writer
//! for LaTeX documents. The [`export`] module ties them together, cropping
//! each export to the drawn content.

pub mod canvas;
pub mod draw;
pub mod export;
pub mod latex;
pub mod metrics;
pub mod svg;
pub mod target;

pub use canvas::CanvasSurface;
pub use draw::{draw, draw_scene};
pub use export::{ExportError, content_bounds, export_latex, export_png, export_svg};
pub use latex::LatexSurface;
pub use svg::SvgSurface;
pub use target::DrawTarget;
