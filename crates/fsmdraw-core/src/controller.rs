//! The interaction state machine: pointer and keyboard gestures over a
//! scene, selection and caret state, and the commit path to history and
//! durable storage.

use crate::history::History;
use crate::input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::persistence::ImportError;
use crate::scene::{Scene, SceneObject};
use crate::shapes::{
    AnyLink, Link, Node, NodeId, RenderGeometry, SelfLink, StartLink, TemporaryLink,
};
use crate::storage::{Storage, StorageError};
use crate::text;
use kurbo::Point;

/// What the active pointer gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    /// Dragging the selected object.
    MovingObject,
    /// Panning the whole diagram.
    MovingCanvas { last: Point },
    /// Shift-dragging a new link; `origin` is where the gesture started.
    DrawingLink { origin: Point },
}

/// The link being dragged out. Its concrete kind is re-derived from what is
/// under the pointer on every move and only fixed on release.
#[derive(Debug, Clone)]
pub enum PendingLink {
    /// Draft arrow not attached to enough nodes to commit.
    Temporary(TemporaryLink),
    SelfLoop(SelfLink),
    Direct(Link),
    Start(StartLink),
}

impl PendingLink {
    /// Render geometry for the draft arrow.
    pub fn geometry(&self, scene: &Scene) -> Option<RenderGeometry> {
        match self {
            PendingLink::Temporary(l) => Some(l.geometry()),
            PendingLink::SelfLoop(l) => {
                Some(l.geometry(scene.node(l.node)?.pos(), scene.node_radius))
            }
            PendingLink::Direct(l) => {
                let a = scene.node(l.node_a)?.pos();
                let b = scene.node(l.node_b)?.pos();
                Some(l.geometry(a, b, scene.node_radius))
            }
            PendingLink::Start(l) => {
                Some(l.geometry(scene.node(l.node)?.pos(), scene.node_radius))
            }
        }
    }

    fn into_committed(self) -> Option<AnyLink> {
        match self {
            PendingLink::Temporary(_) => None,
            PendingLink::SelfLoop(l) => Some(l.into()),
            PendingLink::Direct(l) => Some(l.into()),
            PendingLink::Start(l) => Some(l.into()),
        }
    }
}

/// Owns the scene and applies every user gesture to it.
///
/// Hosts feed it pointer and key events (directly or through
/// [`InputState`]), drive the caret blink timer, and redraw from the scene
/// plus the transient state exposed here. Every completed mutation is
/// committed: saved to the attached storage and recorded in history.
pub struct Controller {
    scene: Scene,
    selection: Option<SceneObject>,
    caret_index: usize,
    caret_visible: bool,
    has_focus: bool,
    drag: DragState,
    pending_link: Option<PendingLink>,
    history: History,
    storage: Option<Box<dyn Storage>>,
    document_id: String,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    pub fn with_scene(scene: Scene) -> Self {
        let initial = scene.to_backup_json().unwrap_or_default();
        Self {
            scene,
            selection: None,
            caret_index: 0,
            caret_visible: true,
            has_focus: true,
            drag: DragState::Idle,
            pending_link: None,
            history: History::new(initial),
            storage: None,
            document_id: String::new(),
        }
    }

    /// Open a document from storage, starting empty when it does not exist
    /// yet. Subsequent commits save back under the same id.
    pub fn open(storage: Box<dyn Storage>, document_id: impl Into<String>) -> Self {
        let document_id = document_id.into();
        let mut scene = Scene::new();
        match storage.load(&document_id) {
            Ok(record) => {
                if let Err(e) = scene.restore_from_json(&record) {
                    log::warn!("ignoring unreadable document {document_id}: {e}");
                }
            }
            Err(StorageError::NotFound(_)) => {}
            Err(e) => log::warn!("could not load document {document_id}: {e}"),
        }
        let mut controller = Self::with_scene(scene);
        controller.storage = Some(storage);
        controller.document_id = document_id;
        controller
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> Option<SceneObject> {
        self.selection
    }

    pub fn pending_link(&self) -> Option<&PendingLink> {
        self.pending_link.as_ref()
    }

    /// Raw caret position when it should be drawn (focused, blink phase
    /// on, something selected).
    pub fn caret(&self) -> Option<usize> {
        if self.has_focus && self.caret_visible && self.selection.is_some() {
            Some(self.caret_index)
        } else {
            None
        }
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.has_focus = focused;
        if focused {
            self.reset_caret();
        }
    }

    /// Toggle the caret blink phase; driven by a host timer. Ignored while
    /// unfocused.
    pub fn blink_tick(&mut self) {
        if self.has_focus {
            self.caret_visible = !self.caret_visible;
        }
    }

    /// Raw text of the selected object.
    pub fn selected_text(&self) -> Option<&str> {
        match self.selection? {
            SceneObject::Node(id) => self.scene.node(id).map(|n| n.text.as_str()),
            SceneObject::Link(index) => self.scene.links.get(index).map(AnyLink::text),
        }
    }

    // ---- pointer gestures ----

    pub fn pointer_down(&mut self, position: Point, shift: bool) {
        self.selection = self.scene.object_at(position);
        self.drag = DragState::Idle;
        self.pending_link = None;

        match self.selection {
            Some(object) => {
                if shift && matches!(object, SceneObject::Node(_)) {
                    if let SceneObject::Node(id) = object {
                        if let Some(node) = self.scene.node(id) {
                            self.pending_link = Some(PendingLink::SelfLoop(
                                SelfLink::from_pointer(id, node.pos(), position),
                            ));
                        }
                        self.drag = DragState::DrawingLink { origin: position };
                    }
                } else {
                    self.drag = DragState::MovingObject;
                    self.scene.begin_drag(object, position);
                }
                self.caret_index = self.selected_text().map_or(0, |t| t.chars().count());
            }
            None if shift => {
                self.pending_link = Some(PendingLink::Temporary(TemporaryLink::new(
                    position, position,
                )));
                self.drag = DragState::DrawingLink { origin: position };
            }
            None => {
                self.drag = DragState::MovingCanvas { last: position };
            }
        }
        self.reset_caret();
    }

    pub fn pointer_move(&mut self, position: Point) {
        if let DragState::DrawingLink { origin } = self.drag {
            self.derive_pending_link(origin, position);
            return;
        }
        match self.drag {
            DragState::MovingObject => {
                if let Some(object) = self.selection {
                    self.scene.drag_to(object, position);
                    self.autosave();
                }
            }
            DragState::MovingCanvas { last } => {
                self.scene.translate_all(position - last);
                self.drag = DragState::MovingCanvas { last: position };
                self.autosave();
            }
            _ => {}
        }
    }

    /// Pick the pending link's kind from what is under the pointer.
    fn derive_pending_link(&mut self, origin: Point, position: Point) {
        let target = self.scene.node_at(position);
        let origin_node = match self.selection {
            Some(SceneObject::Node(id)) => Some(id),
            _ => None,
        };
        let pending = match origin_node {
            Some(from) => {
                if target == Some(from) {
                    let Some(pos) = self.scene.node(from).map(Node::pos) else { return };
                    PendingLink::SelfLoop(SelfLink::from_pointer(from, pos, position))
                } else if let Some(to) = target {
                    PendingLink::Direct(Link::new(from, to))
                } else {
                    let Some(node) = self.scene.node(from) else { return };
                    let start =
                        node.closest_point_on_circle(self.scene.node_radius, position);
                    PendingLink::Temporary(TemporaryLink::new(start, position))
                }
            }
            None => match target {
                // A drag from empty space onto a node marks its start state;
                // the free end stays where the gesture began.
                Some(to) => {
                    let Some(pos) = self.scene.node(to).map(Node::pos) else { return };
                    PendingLink::Start(StartLink::from_pointer(to, pos, origin))
                }
                None => PendingLink::Temporary(TemporaryLink::new(origin, position)),
            },
        };
        self.pending_link = Some(pending);
    }

    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
        if let Some(pending) = self.pending_link.take() {
            if let Some(link) = pending.into_committed() {
                let index = self.scene.add_link(link);
                self.selection = Some(SceneObject::Link(index));
                self.caret_index = 0;
                self.reset_caret();
            }
        }
        self.commit();
    }

    pub fn double_click(&mut self, position: Point) {
        self.selection = self.scene.object_at(position);
        match self.selection {
            None => {
                let id = self.scene.add_node(Node::new(position.x, position.y));
                self.selection = Some(SceneObject::Node(id));
                log::debug!("created node {}", id.0);
            }
            Some(SceneObject::Node(id)) => {
                if let Some(node) = self.scene.node_mut(id) {
                    node.is_accept_state = !node.is_accept_state;
                }
            }
            Some(SceneObject::Link(_)) => {}
        }
        self.caret_index = self.selected_text().map_or(0, |t| t.chars().count());
        self.reset_caret();
        self.commit();
    }

    // ---- keyboard ----

    /// Handle a named key press. No-op while unfocused.
    pub fn key_pressed(&mut self, key: &str, modifiers: Modifiers) {
        if !self.has_focus {
            return;
        }
        if modifiers.ctrl || modifiers.meta {
            match key {
                "z" | "Z" => self.undo(),
                "y" | "Y" => self.redo(),
                _ => {}
            }
            return;
        }
        match key {
            "Backspace" => self.backspace(),
            "Delete" => self.delete_selected(),
            "ArrowLeft" => self.caret_left(),
            "ArrowRight" => self.caret_right(),
            _ => {
                let mut chars = key.chars();
                if let (Some(ch), None) = (chars.next(), chars.next()) {
                    if (' '..='~').contains(&ch) {
                        self.insert_char(ch);
                    }
                }
            }
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let Some(raw) = self.selected_text().map(str::to_string) else { return };
        let (new_text, caret) = text::insert_char(&raw, self.caret_index, ch);
        self.set_selected_text(new_text, caret);
        self.commit();
    }

    pub fn backspace(&mut self) {
        let Some(raw) = self.selected_text().map(str::to_string) else { return };
        let (new_text, caret) = text::backspace(&raw, self.caret_index);
        self.set_selected_text(new_text, caret);
        self.commit();
    }

    /// Write edited text back through the selection and move the caret.
    fn set_selected_text(&mut self, new_text: String, caret: usize) {
        match self.selection {
            Some(SceneObject::Node(id)) => {
                if let Some(node) = self.scene.node_mut(id) {
                    node.text = new_text;
                }
            }
            Some(SceneObject::Link(index)) => {
                if let Some(link) = self.scene.links.get_mut(index) {
                    *link.text_mut() = new_text;
                }
            }
            None => return,
        }
        self.caret_index = caret;
        self.reset_caret();
    }

    pub fn caret_left(&mut self) {
        if let Some(raw) = self.selected_text() {
            self.caret_index = text::caret_left(raw, self.caret_index);
            self.reset_caret();
        }
    }

    pub fn caret_right(&mut self) {
        if let Some(raw) = self.selected_text() {
            self.caret_index = text::caret_right(raw, self.caret_index);
            self.reset_caret();
        }
    }

    /// Delete the selected object; deleting a node takes its links with it.
    pub fn delete_selected(&mut self) {
        match self.selection.take() {
            Some(SceneObject::Node(id)) => self.scene.remove_node(id),
            Some(SceneObject::Link(index)) => self.scene.remove_link(index),
            None => return,
        }
        self.commit();
    }

    /// Toggle label-only rendering of the selected node.
    pub fn toggle_text_only(&mut self) {
        if let Some(SceneObject::Node(id)) = self.selection {
            if let Some(node) = self.scene.node_mut(id) {
                node.text_only = !node.text_only;
                self.commit();
            }
        }
    }

    // ---- history ----

    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.undo().map(str::to_string) else { return };
        self.apply_snapshot(&snapshot);
    }

    pub fn redo(&mut self) {
        let Some(snapshot) = self.history.redo().map(str::to_string) else { return };
        self.apply_snapshot(&snapshot);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn apply_snapshot(&mut self, snapshot: &str) {
        if let Err(e) = self.scene.restore_from_json(snapshot) {
            log::error!("history snapshot failed to restore: {e}");
            return;
        }
        // Object indices may not exist in the restored state.
        self.selection = None;
        self.pending_link = None;
        self.drag = DragState::Idle;
        self.autosave();
    }

    // ---- document-level operations ----

    /// Replace the document with an imported backup record. The current
    /// scene is untouched on error.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        self.scene.restore_from_json(json)?;
        self.selection = None;
        self.pending_link = None;
        self.drag = DragState::Idle;
        self.commit();
        Ok(())
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.scene.set_canvas_size(width, height);
        self.commit();
    }

    pub fn set_node_radius(&mut self, radius: f64) {
        self.scene.set_node_radius(radius);
        self.commit();
    }

    pub fn clear(&mut self) {
        self.scene.clear();
        self.selection = None;
        self.pending_link = None;
        self.commit();
    }

    // ---- event dispatch ----

    /// Route a pointer event through the input tracker, turning a quick
    /// repeated click into the double-click action.
    pub fn dispatch_pointer(&mut self, input: &mut InputState, event: PointerEvent) {
        input.handle_pointer_event(&event);
        match event {
            PointerEvent::Down { position, button: MouseButton::Left } => {
                self.pointer_down(position, input.modifiers.shift);
                if input.take_double_click() {
                    self.double_click(position);
                }
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { button: MouseButton::Left, .. } => self.pointer_up(),
            _ => {}
        }
    }

    /// Route a key event through the input tracker.
    pub fn dispatch_key(&mut self, input: &mut InputState, event: KeyEvent) {
        input.handle_key_event(&event);
        if let KeyEvent::Pressed(key) = event {
            self.key_pressed(&key, input.modifiers);
        }
    }

    // ---- commit path ----

    fn reset_caret(&mut self) {
        self.caret_visible = true;
    }

    /// Serialize the scene, autosave it, and record it in history when it
    /// differs from the current state.
    fn commit(&mut self) {
        let snapshot = match self.scene.to_backup_json() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("scene failed to serialize: {e}");
                return;
            }
        };
        self.save_record(&snapshot);
        if self.history.record(snapshot) {
            log::debug!("recorded history snapshot");
        }
    }

    /// Save without touching history; used mid-gesture so a crash loses at
    /// most the in-flight drag.
    fn autosave(&mut self) {
        if self.storage.is_none() {
            return;
        }
        if let Ok(snapshot) = self.scene.to_backup_json() {
            self.save_record(&snapshot);
        }
    }

    fn save_record(&self, snapshot: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(&self.document_id, snapshot) {
                log::warn!("autosave failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn controller_with_two_nodes() -> Controller {
        let mut controller = Controller::new();
        controller.double_click(Point::new(100.0, 100.0));
        controller.double_click(Point::new(300.0, 100.0));
        controller
    }

    #[test]
    fn test_double_click_empty_creates_selected_node() {
        let mut controller = Controller::new();
        controller.double_click(Point::new(50.0, 60.0));
        assert_eq!(controller.scene().nodes.len(), 1);
        assert_eq!(controller.selection(), Some(SceneObject::Node(NodeId(0))));
        assert!(controller.can_undo());
    }

    #[test]
    fn test_double_click_node_toggles_accept_state() {
        let mut controller = controller_with_two_nodes();
        controller.double_click(Point::new(100.0, 100.0));
        assert!(controller.scene().nodes[0].is_accept_state);
        controller.double_click(Point::new(100.0, 100.0));
        assert!(!controller.scene().nodes[0].is_accept_state);
        // Toggling never duplicates the node.
        assert_eq!(controller.scene().nodes.len(), 2);
    }

    #[test]
    fn test_shift_drag_between_nodes_creates_link() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(100.0, 100.0), true);
        assert!(matches!(controller.pending_link(), Some(PendingLink::SelfLoop(_))));

        controller.pointer_move(Point::new(200.0, 100.0));
        assert!(matches!(controller.pending_link(), Some(PendingLink::Temporary(_))));

        controller.pointer_move(Point::new(300.0, 100.0));
        assert!(matches!(controller.pending_link(), Some(PendingLink::Direct(_))));

        controller.pointer_up();
        assert_eq!(controller.scene().links.len(), 1);
        assert_eq!(controller.selection(), Some(SceneObject::Link(0)));
        assert!(controller.pending_link().is_none());
        match &controller.scene().links[0] {
            AnyLink::Link(l) => {
                assert_eq!(l.node_a, NodeId(0));
                assert_eq!(l.node_b, NodeId(1));
            }
            other => panic!("unexpected link {other:?}"),
        }
    }

    #[test]
    fn test_shift_drag_released_on_empty_commits_nothing() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(100.0, 100.0), true);
        controller.pointer_move(Point::new(200.0, 300.0));
        controller.pointer_up();
        assert!(controller.scene().links.is_empty());
    }

    #[test]
    fn test_shift_drag_within_node_creates_self_link() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(100.0, 100.0), true);
        controller.pointer_move(Point::new(110.0, 100.0));
        controller.pointer_up();
        assert!(matches!(controller.scene().links[0], AnyLink::SelfLink(_)));
    }

    #[test]
    fn test_shift_drag_from_empty_onto_node_creates_start_link() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(20.0, 100.0), true);
        controller.pointer_move(Point::new(100.0, 100.0));
        controller.pointer_up();
        match &controller.scene().links[0] {
            AnyLink::StartLink(l) => {
                assert_eq!(l.node, NodeId(0));
                // Free end pinned where the gesture began.
                assert_eq!(l.delta_x, -80.0);
                assert_eq!(l.delta_y, 0.0);
            }
            other => panic!("unexpected link {other:?}"),
        }
    }

    #[test]
    fn test_drag_moves_node() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(100.0, 100.0), false);
        controller.pointer_move(Point::new(150.0, 220.0));
        controller.pointer_up();
        let node = &controller.scene().nodes[0];
        assert_eq!(node.x, 150.0);
        assert_eq!(node.y, 220.0);
    }

    #[test]
    fn test_drag_empty_space_pans_everything() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(500.0, 500.0), false);
        controller.pointer_move(Point::new(510.0, 480.0));
        controller.pointer_up();
        assert_eq!(controller.scene().nodes[0].pos(), Point::new(110.0, 80.0));
        assert_eq!(controller.scene().nodes[1].pos(), Point::new(310.0, 80.0));
        // Clicking empty space also deselects.
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn test_typing_edits_selected_node() {
        let mut controller = Controller::new();
        controller.double_click(Point::new(100.0, 100.0));
        for ch in "q_0".chars() {
            controller.insert_char(ch);
        }
        assert_eq!(controller.scene().nodes[0].text, "q_0");
        // The _0 escape displays as one character, so one backspace
        // removes both raw characters.
        controller.backspace();
        assert_eq!(controller.scene().nodes[0].text, "q");
        controller.key_pressed("0", Modifiers::default());
        assert_eq!(controller.scene().nodes[0].text, "q0");
    }

    #[test]
    fn test_typing_edits_selected_link() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(100.0, 100.0), true);
        controller.pointer_move(Point::new(300.0, 100.0));
        controller.pointer_up();
        assert_eq!(controller.selection(), Some(SceneObject::Link(0)));

        for ch in "ab".chars() {
            controller.insert_char(ch);
        }
        assert_eq!(controller.scene().links[0].text(), "ab");
        controller.backspace();
        assert_eq!(controller.scene().links[0].text(), "a");
        assert_eq!(controller.caret(), Some(1));
    }

    #[test]
    fn test_caret_moves_over_whole_escape() {
        let mut controller = Controller::new();
        controller.double_click(Point::new(100.0, 100.0));
        for ch in "\\alpha ".chars() {
            controller.insert_char(ch);
        }
        // Stored raw, displayed as one character.
        assert_eq!(controller.scene().nodes[0].text, "\\alpha ");
        assert_eq!(text::convert_latex_shortcuts("\\alpha "), "α");
        assert_eq!(controller.caret(), Some(7));
        controller.caret_left();
        assert_eq!(controller.caret(), Some(0));
        controller.caret_right();
        assert_eq!(controller.caret(), Some(7));
        controller.backspace();
        assert_eq!(controller.scene().nodes[0].text, "");
    }

    #[test]
    fn test_keyboard_ignored_without_focus() {
        let mut controller = Controller::new();
        controller.double_click(Point::new(100.0, 100.0));
        controller.set_focus(false);
        controller.key_pressed("a", Modifiers::default());
        assert_eq!(controller.scene().nodes[0].text, "");
        assert_eq!(controller.caret(), None);
        controller.set_focus(true);
        controller.key_pressed("a", Modifiers::default());
        assert_eq!(controller.scene().nodes[0].text, "a");
    }

    #[test]
    fn test_delete_node_cascades() {
        let mut controller = controller_with_two_nodes();
        controller.pointer_down(Point::new(100.0, 100.0), true);
        controller.pointer_move(Point::new(300.0, 100.0));
        controller.pointer_up();
        assert_eq!(controller.scene().links.len(), 1);

        controller.pointer_down(Point::new(100.0, 100.0), false);
        controller.pointer_up();
        controller.key_pressed("Delete", Modifiers::default());
        assert_eq!(controller.scene().nodes.len(), 1);
        assert!(controller.scene().links.is_empty());
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn test_undo_returns_to_initial_state() {
        let mut controller = controller_with_two_nodes();
        controller.undo();
        assert_eq!(controller.scene().nodes.len(), 1);
        controller.undo();
        assert!(controller.scene().nodes.is_empty());
        // Already at the initial state.
        controller.undo();
        assert!(controller.scene().nodes.is_empty());

        controller.redo();
        controller.redo();
        assert_eq!(controller.scene().nodes.len(), 2);
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut controller = controller_with_two_nodes();
        assert!(controller.selection().is_some());
        controller.undo();
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn test_unchanged_gesture_records_no_history() {
        let mut controller = controller_with_two_nodes();
        // Click-selecting without moving changes nothing.
        controller.pointer_down(Point::new(100.0, 100.0), false);
        controller.pointer_up();
        controller.undo();
        // One undo removes the second node, not a no-op entry.
        assert_eq!(controller.scene().nodes.len(), 1);
    }

    #[test]
    fn test_commit_saves_to_storage() {
        let mut controller = Controller::open(Box::new(MemoryStorage::new()), "doc");
        controller.double_click(Point::new(100.0, 100.0));
        let saved = controller.storage.as_ref().unwrap().load("doc").unwrap();
        assert!(saved.contains("\"nodes\""));

        // Reopening restores the document.
        let mut scene = Scene::new();
        scene.restore_from_json(&saved).unwrap();
        assert_eq!(scene.nodes.len(), 1);
    }

    #[test]
    fn test_dispatch_detects_double_click() {
        let mut controller = Controller::new();
        let mut input = InputState::new();
        let pos = Point::new(100.0, 100.0);
        controller.dispatch_pointer(
            &mut input,
            PointerEvent::Down { position: pos, button: MouseButton::Left },
        );
        controller.dispatch_pointer(
            &mut input,
            PointerEvent::Up { position: pos, button: MouseButton::Left },
        );
        assert!(controller.scene().nodes.is_empty());
        controller.dispatch_pointer(
            &mut input,
            PointerEvent::Down { position: pos, button: MouseButton::Left },
        );
        assert_eq!(controller.scene().nodes.len(), 1);
    }

    #[test]
    fn test_dispatch_key_routes_shortcuts() {
        let mut controller = Controller::new();
        let mut input = InputState::new();
        controller.double_click(Point::new(100.0, 100.0));
        controller.dispatch_key(&mut input, KeyEvent::Pressed("x".into()));
        assert_eq!(controller.scene().nodes[0].text, "x");

        input.handle_key_event(&KeyEvent::Pressed("Control".into()));
        controller.dispatch_key(&mut input, KeyEvent::Pressed("z".into()));
        assert_eq!(controller.scene().nodes[0].text, "");
    }

    #[test]
    fn test_toggle_text_only() {
        let mut controller = Controller::new();
        controller.double_click(Point::new(100.0, 100.0));
        controller.toggle_text_only();
        assert!(controller.scene().nodes[0].text_only);
        controller.undo();
        controller.redo();
        assert!(controller.scene().nodes[0].text_only);
    }

    #[test]
    fn test_import_json_replaces_document() {
        let mut controller = controller_with_two_nodes();
        controller
            .import_json(r#"{"nodes":[{"x":1.0,"y":2.0}],"links":[]}"#)
            .unwrap();
        assert_eq!(controller.scene().nodes.len(), 1);
        assert_eq!(controller.selection(), None);

        // A bad record leaves everything alone.
        assert!(controller.import_json("garbage").is_err());
        assert_eq!(controller.scene().nodes.len(), 1);
    }
}
