//! Shape model: state nodes and the link family.

mod link;
mod node;
mod self_link;
mod start_link;
mod temporary_link;

pub use link::Link;
pub use node::Node;
pub use self_link::SelfLink;
pub use start_link::StartLink;
pub use temporary_link::TemporaryLink;

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default node circle radius in pixels.
pub const DEFAULT_NODE_RADIUS: f64 = 30.0;

/// Distance within which dragged geometry snaps into alignment.
pub const SNAP_TO_PADDING: f64 = 6.0;

/// Stroke tolerance for link hit tests.
pub const HIT_TARGET_PADDING: f64 = 6.0;

/// Inset of the inner ring drawn for accept states.
pub const ACCEPT_RING_INSET: f64 = 6.0;

/// Index of a node in the scene's node list.
///
/// Links reference nodes by index; the scene rewrites indices on node
/// removal so stored ids stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Path of a rendered link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkPath {
    Segment {
        start: Point,
        end: Point,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        /// Arc runs counter-clockwise from start to end.
        reversed: bool,
    },
}

/// Everything a backend needs to draw one link: the path, the arrowhead
/// placement, and where the label sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderGeometry {
    pub path: LinkPath,
    pub arrow_tip: Point,
    pub arrow_angle: f64,
    pub label_pos: Point,
    /// Angle used to push the label away from the path; `None` centers it.
    pub label_angle: Option<f64>,
}

/// A committed link of any kind. The serialized form is tagged with the
/// variant name, which is also the on-disk record shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyLink {
    Link(Link),
    SelfLink(SelfLink),
    StartLink(StartLink),
}

impl AnyLink {
    pub fn text(&self) -> &str {
        match self {
            AnyLink::Link(l) => &l.text,
            AnyLink::SelfLink(l) => &l.text,
            AnyLink::StartLink(l) => &l.text,
        }
    }

    pub fn text_mut(&mut self) -> &mut String {
        match self {
            AnyLink::Link(l) => &mut l.text,
            AnyLink::SelfLink(l) => &mut l.text,
            AnyLink::StartLink(l) => &mut l.text,
        }
    }

    /// Does this link reference the given node?
    pub fn references(&self, id: NodeId) -> bool {
        match self {
            AnyLink::Link(l) => l.node_a == id || l.node_b == id,
            AnyLink::SelfLink(l) => l.node == id,
            AnyLink::StartLink(l) => l.node == id,
        }
    }

    /// Largest node index this link references.
    pub fn max_node_index(&self) -> usize {
        match self {
            AnyLink::Link(l) => l.node_a.0.max(l.node_b.0),
            AnyLink::SelfLink(l) => l.node.0,
            AnyLink::StartLink(l) => l.node.0,
        }
    }

    /// Rewrite node indices after the node at `removed` was deleted.
    /// Callers must have dropped links that referenced it first.
    pub(crate) fn shift_indices_after_removal(&mut self, removed: usize) {
        let shift = |id: &mut NodeId| {
            if id.0 > removed {
                id.0 -= 1;
            }
        };
        match self {
            AnyLink::Link(l) => {
                shift(&mut l.node_a);
                shift(&mut l.node_b);
            }
            AnyLink::SelfLink(l) => shift(&mut l.node),
            AnyLink::StartLink(l) => shift(&mut l.node),
        }
    }
}

impl From<Link> for AnyLink {
    fn from(link: Link) -> Self {
        AnyLink::Link(link)
    }
}

impl From<SelfLink> for AnyLink {
    fn from(link: SelfLink) -> Self {
        AnyLink::SelfLink(link)
    }
}

impl From<StartLink> for AnyLink {
    fn from(link: StartLink) -> Self {
        AnyLink::StartLink(link)
    }
}
