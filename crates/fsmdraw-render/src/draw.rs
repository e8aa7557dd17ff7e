//! Scene replay: turns the document into draw-target operations.
//!
//! Every backend renders through [`draw_scene`] or [`draw`], so the raster
//! view, the SVG output, and the TikZ output always agree on geometry.

use std::f64::consts::TAU;

use fsmdraw_core::controller::Controller;
use fsmdraw_core::scene::{Scene, SceneObject};
use fsmdraw_core::shapes::{ACCEPT_RING_INSET, LinkPath, Node, NodeId, RenderGeometry};
use fsmdraw_core::text;
use kurbo::Point;
use peniko::Color;

use crate::target::DrawTarget;

const NORMAL_COLOR: Color = Color::BLACK;
const SELECTED_COLOR: Color = Color::from_rgb8(0, 0, 255);

/// Render the controller's view: the scene plus the selection highlight,
/// the caret, and any link still being dragged out.
pub fn draw(controller: &Controller, target: &mut impl DrawTarget) {
    render(
        controller.scene(),
        controller.selection(),
        controller.caret(),
        controller.pending_link().and_then(|p| p.geometry(controller.scene())),
        target,
    );
}

/// Render the bare document with nothing highlighted. Exports go through
/// this path.
pub fn draw_scene(scene: &Scene, target: &mut impl DrawTarget) {
    render(scene, None, None, None, target);
}

fn render(
    scene: &Scene,
    selection: Option<SceneObject>,
    caret: Option<usize>,
    pending: Option<RenderGeometry>,
    target: &mut impl DrawTarget,
) {
    target.save();
    // Half-pixel shift so one pixel strokes land on the pixel grid.
    target.translate(0.5, 0.5);

    for (index, node) in scene.nodes.iter().enumerate() {
        let selected = selection == Some(SceneObject::Node(NodeId(index)));
        target.set_color(if selected { SELECTED_COLOR } else { NORMAL_COLOR });
        draw_node(node, scene.node_radius, if selected { caret } else { None }, target);
    }
    for (index, link) in scene.links.iter().enumerate() {
        let selected = selection == Some(SceneObject::Link(index));
        target.set_color(if selected { SELECTED_COLOR } else { NORMAL_COLOR });
        if let Some(geometry) = scene.link_geometry(link) {
            draw_link(&geometry, link.text(), if selected { caret } else { None }, target);
        }
    }
    if let Some(geometry) = pending {
        target.set_color(NORMAL_COLOR);
        draw_link(&geometry, "", None, target);
    }

    target.restore();
}

fn draw_node(node: &Node, radius: f64, caret: Option<usize>, target: &mut impl DrawTarget) {
    let center = node.pos();
    if !node.text_only {
        target.begin_path();
        target.arc(center, radius, 0.0, TAU, false);
        target.stroke();
    }
    draw_label(&node.text, center, None, caret, target);
    if node.is_accept_state {
        target.begin_path();
        target.arc(center, radius - ACCEPT_RING_INSET, 0.0, TAU, false);
        target.stroke();
    }
}

fn draw_link(
    geometry: &RenderGeometry,
    raw_text: &str,
    caret: Option<usize>,
    target: &mut impl DrawTarget,
) {
    target.begin_path();
    match geometry.path {
        LinkPath::Segment { start, end } => {
            target.move_to(start);
            target.line_to(end);
        }
        LinkPath::Arc { center, radius, start_angle, end_angle, reversed } => {
            target.arc(center, radius, start_angle, end_angle, reversed);
        }
    }
    target.stroke();
    draw_arrow(geometry.arrow_tip, geometry.arrow_angle, target);
    draw_label(raw_text, geometry.label_pos, geometry.label_angle, caret, target);
}

/// Filled arrow head with its tip at `tip`, pointing along `angle`.
fn draw_arrow(tip: Point, angle: f64, target: &mut impl DrawTarget) {
    let dx = angle.cos();
    let dy = angle.sin();
    target.begin_path();
    target.move_to(tip);
    target.line_to(Point::new(tip.x - 8.0 * dx + 5.0 * dy, tip.y - 8.0 * dy - 5.0 * dx));
    target.line_to(Point::new(tip.x - 8.0 * dx - 5.0 * dy, tip.y - 8.0 * dy + 5.0 * dx));
    target.fill();
}

/// Format the label, nudge it off the path when an angle is given, hand it
/// to the backend, then draw the caret over it when editing.
fn draw_label(
    raw: &str,
    pos: Point,
    angle: Option<f64>,
    caret: Option<usize>,
    target: &mut impl DrawTarget,
) {
    let formatted = text::convert_latex_shortcuts(raw);
    let width = target.measure_text(&formatted);
    let offset = text::label_offset(width, angle);
    let x = pos.x + offset.x;
    let y = pos.y + offset.y;
    target.draw_label(&formatted, raw, x, y, angle);

    if let Some(caret) = caret {
        // Round like the raster backend does so the caret sits on a pixel.
        let left = (x - width / 2.0).round();
        let y = y.round();
        let prefix: String = raw.chars().take(caret).collect();
        let caret_x = left + target.measure_text(&text::convert_latex_shortcuts(&prefix));
        target.begin_path();
        target.move_to(Point::new(caret_x, y - 10.0));
        target.line_to(Point::new(caret_x, y + 10.0));
        target.stroke();
    }
}
