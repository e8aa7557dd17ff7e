//! The document: nodes, links, and canvas-level properties.

use crate::shapes::{
    AnyLink, DEFAULT_NODE_RADIUS, Node, NodeId, RenderGeometry, SNAP_TO_PADDING,
};
use kurbo::{Point, Vec2};

pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// A selectable object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneObject {
    Node(NodeId),
    /// Index into the scene's link list.
    Link(usize),
}

/// The full diagram document. Nodes are addressed by index; every link
/// references nodes that exist, an invariant upheld by `remove_node` and
/// by import validation.
#[derive(Debug, Clone)]
pub struct Scene {
    pub nodes: Vec<Node>,
    pub links: Vec<AnyLink>,
    /// Circle radius shared by every node.
    pub node_radius: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            node_radius: DEFAULT_NODE_RADIUS,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Remove a node, cascade-delete every link touching it, and rewrite
    /// the indices of links referencing later nodes. Out-of-range ids are
    /// ignored.
    pub fn remove_node(&mut self, id: NodeId) {
        if id.0 >= self.nodes.len() {
            return;
        }
        self.nodes.remove(id.0);
        self.links.retain(|link| !link.references(id));
        for link in &mut self.links {
            link.shift_indices_after_removal(id.0);
        }
    }

    pub fn add_link(&mut self, link: AnyLink) -> usize {
        self.links.push(link);
        self.links.len() - 1
    }

    pub fn remove_link(&mut self, index: usize) {
        if index < self.links.len() {
            self.links.remove(index);
        }
    }

    /// Drop every node and link; canvas size and radius are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    /// First node whose circle contains the point.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.contains_point(point, self.node_radius))
            .map(NodeId)
    }

    /// First object under the point: nodes take priority over links.
    pub fn object_at(&self, point: Point) -> Option<SceneObject> {
        if let Some(id) = self.node_at(point) {
            return Some(SceneObject::Node(id));
        }
        self.links
            .iter()
            .position(|link| self.link_contains_point(link, point))
            .map(SceneObject::Link)
    }

    /// Render geometry for a link; `None` if it references a missing node.
    pub fn link_geometry(&self, link: &AnyLink) -> Option<RenderGeometry> {
        match link {
            AnyLink::Link(l) => {
                let a = self.node(l.node_a)?.pos();
                let b = self.node(l.node_b)?.pos();
                Some(l.geometry(a, b, self.node_radius))
            }
            AnyLink::SelfLink(l) => {
                Some(l.geometry(self.node(l.node)?.pos(), self.node_radius))
            }
            AnyLink::StartLink(l) => {
                Some(l.geometry(self.node(l.node)?.pos(), self.node_radius))
            }
        }
    }

    pub fn link_contains_point(&self, link: &AnyLink, point: Point) -> bool {
        match link {
            AnyLink::Link(l) => {
                let (Some(a), Some(b)) = (self.node(l.node_a), self.node(l.node_b)) else {
                    return false;
                };
                l.contains_point(point, a.pos(), b.pos(), self.node_radius)
            }
            AnyLink::SelfLink(l) => self
                .node(l.node)
                .is_some_and(|n| l.contains_point(point, n.pos(), self.node_radius)),
            AnyLink::StartLink(l) => self
                .node(l.node)
                .is_some_and(|n| l.contains_point(point, n.pos(), self.node_radius)),
        }
    }

    /// Record where a drag grabbed the object so it moves without jumping.
    pub fn begin_drag(&mut self, object: SceneObject, pointer: Point) {
        match object {
            SceneObject::Node(id) => {
                if let Some(node) = self.node_mut(id) {
                    node.set_drag_start(pointer);
                }
            }
            SceneObject::Link(index) => {
                let node_pos = match self.links.get(index) {
                    Some(AnyLink::SelfLink(l)) => self.node(l.node).map(Node::pos),
                    _ => None,
                };
                if let (Some(pos), Some(AnyLink::SelfLink(l))) =
                    (node_pos, self.links.get_mut(index))
                {
                    l.set_drag_start(pointer, pos);
                }
            }
        }
    }

    /// Move a dragged object to follow the pointer.
    pub fn drag_to(&mut self, object: SceneObject, pointer: Point) {
        match object {
            SceneObject::Node(id) => {
                if let Some(node) = self.node_mut(id) {
                    node.set_anchor_point(pointer);
                }
                self.snap_node_to_others(id);
            }
            SceneObject::Link(index) => {
                let Some(link) = self.links.get(index) else { return };
                match link {
                    AnyLink::Link(l) => {
                        let (Some(a), Some(b)) =
                            (self.node(l.node_a), self.node(l.node_b))
                        else {
                            return;
                        };
                        let (a, b) = (a.pos(), b.pos());
                        if let Some(AnyLink::Link(l)) = self.links.get_mut(index) {
                            l.set_anchor_point(pointer, a, b);
                        }
                    }
                    AnyLink::SelfLink(l) => {
                        let Some(pos) = self.node(l.node).map(Node::pos) else { return };
                        if let Some(AnyLink::SelfLink(l)) = self.links.get_mut(index) {
                            l.set_anchor_point(pointer, pos);
                        }
                    }
                    AnyLink::StartLink(l) => {
                        let Some(pos) = self.node(l.node).map(Node::pos) else { return };
                        if let Some(AnyLink::StartLink(l)) = self.links.get_mut(index) {
                            l.set_anchor_point(pointer, pos);
                        }
                    }
                }
            }
        }
    }

    /// Per-axis alignment of a node with every other node.
    pub fn snap_node_to_others(&mut self, id: NodeId) {
        let Some(pos) = self.node(id).map(Node::pos) else { return };
        let mut x = pos.x;
        let mut y = pos.y;
        for (i, other) in self.nodes.iter().enumerate() {
            if i == id.0 {
                continue;
            }
            if (x - other.x).abs() < SNAP_TO_PADDING {
                x = other.x;
            }
            if (y - other.y).abs() < SNAP_TO_PADDING {
                y = other.y;
            }
        }
        if let Some(node) = self.node_mut(id) {
            node.x = x;
            node.y = y;
        }
    }

    /// Pan the whole diagram.
    pub fn translate_all(&mut self, delta: Vec2) {
        for node in &mut self.nodes {
            node.x += delta.x;
            node.y += delta.y;
        }
    }

    /// Resize the canvas, keeping the diagram horizontally centered.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        if width != self.canvas_width {
            let shift = (width as f64 - self.canvas_width as f64) / 2.0;
            for node in &mut self.nodes {
                node.x += shift;
            }
        }
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Change the shared node radius. Non-positive values are ignored.
    pub fn set_node_radius(&mut self, radius: f64) {
        if radius > 0.0 {
            self.node_radius = radius;
        }
    }
}
