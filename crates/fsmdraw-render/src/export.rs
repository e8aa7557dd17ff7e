//! Headless export pipeline: render, crop to content, and encode.

use fsmdraw_core::scene::Scene;
use kurbo::Rect;
use thiserror::Error;

use crate::canvas::CanvasSurface;
use crate::draw;
use crate::latex::LatexSurface;
use crate::svg::SvgSurface;

/// Pixels of breathing room around the drawn content.
const CROP_PADDING: u32 = 2;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not allocate a {width}x{height} surface")]
    InvalidSize { width: u32, height: u32 },
    #[error("crop region is empty")]
    EmptyCrop,
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

fn render_scene(scene: &Scene) -> Result<CanvasSurface, ExportError> {
    let width = scene.canvas_width.max(1);
    let height = scene.canvas_height.max(1);
    let mut surface =
        CanvasSurface::new(width, height).ok_or(ExportError::InvalidSize { width, height })?;
    draw::draw_scene(scene, &mut surface);
    Ok(surface)
}

fn pixel_bounds(surface: &CanvasSurface) -> Rect {
    let pixmap = surface.pixmap();
    let width = pixmap.width();
    let height = pixmap.height();
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        if pixel.alpha() != 0 {
            let x = i as u32 % width;
            let y = i as u32 / width;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x > max_x {
        // Nothing drawn, keep the whole canvas.
        return Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    }
    Rect::new(
        f64::from(min_x.saturating_sub(CROP_PADDING)),
        f64::from(min_y.saturating_sub(CROP_PADDING)),
        f64::from((max_x + CROP_PADDING + 1).min(width)),
        f64::from((max_y + CROP_PADDING + 1).min(height)),
    )
}

/// Bounding rectangle of the drawn content, padded and clamped to the
/// canvas. An empty diagram yields the whole canvas.
pub fn content_bounds(scene: &Scene) -> Result<Rect, ExportError> {
    Ok(pixel_bounds(&render_scene(scene)?))
}

/// Rasterize the diagram, cropped to its content, as an RGBA PNG.
pub fn export_png(scene: &Scene) -> Result<Vec<u8>, ExportError> {
    let surface = render_scene(scene)?;
    let bounds = pixel_bounds(&surface);
    let rect = tiny_skia::IntRect::from_ltrb(
        bounds.x0 as i32,
        bounds.y0 as i32,
        bounds.x1 as i32,
        bounds.y1 as i32,
    )
    .ok_or(ExportError::EmptyCrop)?;
    let cropped = surface.pixmap().clone_rect(rect).ok_or(ExportError::EmptyCrop)?;
    encode_png(&cropped)
}

fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let demultiplied = pixel.demultiply();
        rgba.extend_from_slice(&[
            demultiplied.red(),
            demultiplied.green(),
            demultiplied.blue(),
            demultiplied.alpha(),
        ]);
    }
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgba)?;
    writer.finish()?;
    Ok(out)
}

/// Export the diagram as a standalone SVG document cropped to its content.
pub fn export_svg(scene: &Scene) -> Result<String, ExportError> {
    let bounds = content_bounds(scene)?;
    let mut surface = SvgSurface::new(bounds);
    draw::draw_scene(scene, &mut surface);
    Ok(surface.finish())
}

/// Export the diagram as a TikZ snippet cropped to its content.
pub fn export_latex(scene: &Scene) -> Result<String, ExportError> {
    let bounds = content_bounds(scene)?;
    let mut surface = LatexSurface::new(bounds);
    draw::draw_scene(scene, &mut surface);
    Ok(surface.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmdraw_core::shapes::{Link, Node, NodeId};

    fn sample_scene() -> Scene {
        let mut scene = Scene::default();
        scene.add_node(Node::new(200.0, 200.0));
        let b = scene.add_node(Node::new(400.0, 200.0));
        if let Some(node) = scene.node_mut(b) {
            node.is_accept_state = true;
        }
        scene.add_link(Link::new(NodeId(0), b).into());
        scene
    }

    #[test]
    fn test_empty_scene_exports_whole_canvas() {
        let bounds = content_bounds(&Scene::default()).unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_content_bounds_hug_the_drawing() {
        let bounds = content_bounds(&sample_scene()).unwrap();
        // Nodes span x 170..430 and y 170..230, plus stroke and padding.
        assert!(bounds.x0 > 150.0 && bounds.x0 < 170.0);
        assert!(bounds.x1 > 430.0 && bounds.x1 < 450.0);
        assert!(bounds.y0 > 150.0 && bounds.y0 < 170.0);
        assert!(bounds.y1 > 230.0 && bounds.y1 < 250.0);
    }

    #[test]
    fn test_png_export_is_a_png() {
        let data = export_png(&sample_scene()).unwrap();
        assert_eq!(&data[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_svg_export_contains_shapes() {
        let svg = export_svg(&sample_scene()).unwrap();
        assert!(svg.contains("<svg "));
        // Three circles: two node outlines and the accept ring.
        assert_eq!(svg.matches("<ellipse").count(), 3);
        // The connecting line and the arrow head.
        assert!(svg.contains("<polygon stroke=\"black\""));
        assert!(svg.contains("<polygon fill=\"black\""));
    }

    #[test]
    fn test_latex_export_contains_shapes() {
        let tex = export_latex(&sample_scene()).unwrap();
        assert!(tex.contains("\\begin{tikzpicture}"));
        // Node outlines at radius 3, the accept ring at 2.4.
        assert_eq!(tex.matches("circle (3);").count(), 2);
        assert_eq!(tex.matches("circle (2.4);").count(), 1);
        assert!(tex.contains("\\fill [black]"));
    }

    #[test]
    fn test_exports_ignore_selection_state() {
        use fsmdraw_core::controller::Controller;
        let mut controller = Controller::with_scene(sample_scene());
        controller.pointer_down(kurbo::Point::new(200.0, 200.0), false);
        controller.pointer_up();
        let svg = export_svg(controller.scene()).unwrap();
        assert!(!svg.contains("blue"));
    }
}
