//! The live design graph: the mutable widget tree behind the canvas.
//!
//! Node 0 is the root surface. Children are stored back-to-front: the last child is
//! painted last and is hit first. Coordinates passed in from the canvas are in root
//! space; every node's `bounds` are relative to its parent.

mod events;
mod gesture;

pub use events::{Alignment, CommandQueue, DesignEvent, GraphCommand, Listener, ListenerId};
pub use gesture::{CursorHint, GestureState, RESIZE_HANDLE};

use crate::error::DesignError;
use crate::layout::{LayoutStrategy, Region};
use crate::model::{NodeAttributes, PositionMode};
use crate::property::{NodeProperties, PropertyBag};
use crate::resources::MenuId;
use crate::settings::DesignerSettings;
use crate::widget::style::Rgba;
use crate::widget::{Bounds, Point, Size, WidgetId, WidgetKind, snap_point_with_grid, snap_with_grid};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

pub const MIN_WIDGET_SIZE: i32 = 20;

/// How a pop-up menu reference is held by a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAttachment {
    /// Restored from a document but not wired into the live pop-up behavior yet.
    Stashed(MenuId),
    Live(MenuId),
}

impl MenuAttachment {
    pub const fn menu(&self) -> MenuId {
        match self {
            MenuAttachment::Stashed(id) | MenuAttachment::Live(id) => *id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub(crate) kind: WidgetKind,
    pub(crate) attrs: NodeAttributes,
    pub(crate) context_menu: Option<MenuAttachment>,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    // Slot the host currently renders this child in under a border-region parent.
    pub(crate) placed_region: Option<Region>,
    // Gesture handling installed.
    pub(crate) armed: bool,
}

impl GraphNode {
    fn new(kind: WidgetKind, attrs: NodeAttributes, parent: Option<WidgetId>) -> Self {
        Self {
            kind,
            attrs,
            context_menu: None,
            parent,
            children: Vec::new(),
            placed_region: None,
            armed: false,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn attrs(&self) -> &NodeAttributes {
        &self.attrs
    }

    pub fn name(&self) -> Option<&str> {
        self.attrs.name.as_deref()
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn context_menu(&self) -> Option<MenuAttachment> {
        self.context_menu
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// What a palette drag delivers to the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropPayload {
    pub kind: String,
    pub region: Option<Region>,
}

impl DropPayload {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }
}

const NAME_SEQ_LIMIT: u64 = u32::MAX as u64;

pub struct DesignGraph {
    nodes: BTreeMap<WidgetId, GraphNode>,
    root: WidgetId,
    next_id: u64,
    name_seq: u64,
    selected: Option<WidgetId>,
    settings: DesignerSettings,
    gesture: GestureState,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    outbox: VecDeque<DesignEvent>,
    dispatching: bool,
}

impl fmt::Debug for DesignGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesignGraph")
            .field("nodes", &self.nodes.len())
            .field("selected", &self.selected)
            .field("gesture", &self.gesture)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for DesignGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignGraph {
    pub fn new() -> Self {
        Self::with_settings(DesignerSettings::default())
    }

    /// An empty free-form surface sized to the configured canvas.
    pub fn with_settings(settings: DesignerSettings) -> Self {
        let mut attrs = NodeAttributes::named("panel");
        attrs.bounds = Bounds::from_origin_size(Point::default(), settings.canvas_size);
        Self::with_root(WidgetKind::Panel, attrs, settings)
    }

    pub(crate) fn with_root(
        kind: WidgetKind,
        attrs: NodeAttributes,
        settings: DesignerSettings,
    ) -> Self {
        let root = WidgetId::new(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, GraphNode::new(kind, attrs, None));
        Self {
            nodes,
            root,
            next_id: 1,
            name_seq: 0,
            selected: None,
            settings,
            gesture: GestureState::Idle,
            listeners: Vec::new(),
            next_listener: 0,
            outbox: VecDeque::new(),
            dispatching: false,
        }
    }

    // ----- queries ---------------------------------------------------------------

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[&self.root].children.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: WidgetId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    /// Direct attribute access for property editors. Call
    /// [`external_property_changed`](Self::external_property_changed) after writing.
    pub fn attrs_mut(&mut self, id: WidgetId) -> Option<&mut NodeAttributes> {
        self.nodes.get_mut(&id).map(|n| &mut n.attrs)
    }

    /// Named property access for `id`. Call
    /// [`external_property_changed`](Self::external_property_changed) after writing.
    pub fn properties(&mut self, id: WidgetId) -> Option<impl PropertyBag + '_> {
        self.nodes
            .get_mut(&id)
            .map(|n| NodeProperties::new(n.kind, &mut n.attrs))
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn selected(&self) -> Option<WidgetId> {
        self.selected
    }

    pub fn settings(&self) -> &DesignerSettings {
        &self.settings
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Pre-order ids of `id` and everything below it.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(n) = self.nodes.get(&cur) {
                out.push(cur);
                stack.extend(n.children.iter().rev());
            }
        }
        out
    }

    /// True when `id` is `ancestor` or lies below it.
    pub fn is_within(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// First node in pre-order carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<WidgetId> {
        self.subtree(self.root)
            .into_iter()
            .find(|id| self.nodes[id].name() == Some(name))
    }

    pub fn layout_of(&self, id: WidgetId) -> LayoutStrategy {
        self.nodes
            .get(&id)
            .map(|n| n.attrs.layout)
            .unwrap_or_default()
    }

    fn parent_is_free_form(&self, id: WidgetId) -> bool {
        self.parent(id)
            .is_some_and(|p| self.layout_of(p).is_free_form())
    }

    /// Top-left of `id` in root coordinates.
    pub fn canvas_origin(&self, id: WidgetId) -> Point {
        let mut p = Point::default();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(n) = self.nodes.get(&c) else { break };
            p = p + n.attrs.bounds.origin();
            cur = n.parent;
        }
        p
    }

    pub fn canvas_bounds(&self, id: WidgetId) -> Option<Bounds> {
        let n = self.nodes.get(&id)?;
        Some(Bounds::from_origin_size(
            self.canvas_origin(id),
            n.attrs.bounds.size(),
        ))
    }

    /// Where the host renders `id` when its parent uses border regions.
    pub fn effective_region(&self, id: WidgetId) -> Option<Region> {
        let n = self.nodes.get(&id)?;
        let parent = n.parent?;
        self.layout_of(parent)
            .is_border_regions()
            .then(|| n.placed_region.unwrap_or(Region::Center))
    }

    /// Deepest visible node under `p`; the root when nothing else is hit.
    pub fn deepest_at(&self, p: Point) -> WidgetId {
        self.deepest_at_excluding(p, None)
    }

    fn deepest_at_excluding(&self, p: Point, exclude: Option<WidgetId>) -> WidgetId {
        let mut cur = self.root;
        'descend: loop {
            for &child in self.children(cur).iter().rev() {
                if Some(child) == exclude {
                    continue;
                }
                let n = &self.nodes[&child];
                if n.attrs.visible && self.canvas_bounds(child).is_some_and(|b| b.contains(p)) {
                    cur = child;
                    continue 'descend;
                }
            }
            return cur;
        }
    }

    /// Nearest container at or above the deepest node under `p`, skipping `exclude`
    /// and everything below it.
    pub fn container_at(&self, p: Point, exclude: Option<WidgetId>) -> WidgetId {
        let mut hit = Some(self.deepest_at_excluding(p, exclude));
        while let Some(h) = hit {
            if self.nodes[&h].kind.is_container() {
                return h;
            }
            hit = self.parent(h);
        }
        self.root
    }

    // ----- naming ----------------------------------------------------------------

    fn next_generated_name(&mut self, kind: WidgetKind) -> String {
        self.name_seq = self.name_seq.saturating_add(1);
        format!("{}{}", kind.name_prefix(), self.name_seq)
    }

    /// Continues generated names past the largest numeric suffix in use. Suffixes
    /// above `NAME_SEQ_LIMIT` are treated as ordinary names.
    pub(crate) fn sync_name_counter(&mut self) {
        let max = self
            .nodes
            .values()
            .filter_map(|n| n.name())
            .filter_map(|name| {
                let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
                name[name.len() - digits..].parse::<u64>().ok()
            })
            .filter(|n| *n <= NAME_SEQ_LIMIT)
            .max()
            .unwrap_or(0);
        self.name_seq = self.name_seq.max(max);
    }

    /// Renames later duplicates among `parent`'s children by appending the smallest
    /// suffix (from 2) that clashes with no sibling. Returns whether anything changed.
    fn uniquify_children(&mut self, parent: WidgetId) -> bool {
        let kids = self.children(parent).to_vec();
        let mut names: Vec<Option<String>> =
            kids.iter().map(|k| self.nodes[k].attrs.name.clone()).collect();
        let mut changed = false;
        for i in 0..names.len() {
            let Some(base) = names[i].clone() else { continue };
            if !names[..i].iter().any(|n| n.as_deref() == Some(base.as_str())) {
                continue;
            }
            let mut n = 2;
            let unique = loop {
                let candidate = format!("{base}{n}");
                if !names.iter().any(|m| m.as_deref() == Some(candidate.as_str())) {
                    break candidate;
                }
                n += 1;
            };
            tracing::debug!(from = %base, to = %unique, "renamed duplicate sibling");
            if let Some(n) = self.nodes.get_mut(&kids[i]) {
                n.attrs.name = Some(unique.clone());
            }
            names[i] = Some(unique);
            changed = true;
        }
        changed
    }

    pub(crate) fn uniquify_all(&mut self) -> bool {
        let mut changed = false;
        for id in self.subtree(self.root) {
            changed |= self.uniquify_children(id);
        }
        changed
    }

    // ----- structure -------------------------------------------------------------

    /// Appends a new unarmed node without notifying anyone.
    pub(crate) fn attach(
        &mut self,
        parent: WidgetId,
        kind: WidgetKind,
        attrs: NodeAttributes,
    ) -> WidgetId {
        self.attach_under_layout(parent, self.layout_of(parent), kind, attrs)
    }

    /// Like [`attach`](Self::attach), but places the node as `parent_layout` would,
    /// whatever layout the parent currently has.
    pub(crate) fn attach_under_layout(
        &mut self,
        parent: WidgetId,
        parent_layout: LayoutStrategy,
        kind: WidgetKind,
        attrs: NodeAttributes,
    ) -> WidgetId {
        let id = WidgetId::new(self.next_id);
        self.next_id += 1;
        let placed = parent_layout
            .is_border_regions()
            .then(|| attrs.constraint.unwrap_or(Region::Center));
        let mut node = GraphNode::new(kind, attrs, Some(parent));
        node.placed_region = placed;
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    pub(crate) fn set_layout_silently(&mut self, id: WidgetId, layout: LayoutStrategy) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.attrs.layout = layout;
        }
    }

    pub(crate) fn set_menu_attachment(&mut self, id: WidgetId, menu: Option<MenuAttachment>) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.context_menu = menu;
        }
    }

    pub(crate) fn arm(&mut self, id: WidgetId) {
        if id == self.root {
            return;
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.armed = true;
        }
    }

    pub(crate) fn arm_all(&mut self) {
        for id in self.subtree(self.root) {
            self.arm(id);
        }
    }

    /// Instantiates the dropped kind inside the deepest container under `at`.
    ///
    /// The new node gets a generated name, absolute positioning, the kind's default
    /// size and, under a border-region container, the payload's region or `Center`.
    /// An unconstructible kind leaves the tree untouched.
    pub fn drop_widget(&mut self, payload: &DropPayload, at: Point) -> Result<WidgetId, DesignError> {
        let Some(kind) = WidgetKind::from_name(&payload.kind) else {
            tracing::warn!(kind = %payload.kind, "rejected drop of unknown widget kind");
            return Err(DesignError::UnknownKind(payload.kind.clone()));
        };
        let parent = self.container_at(at, None);
        let parent_layout = self.layout_of(parent);

        let mut origin = at - self.canvas_origin(parent);
        if self.settings.snap_to_grid && parent_layout.is_free_form() {
            origin = snap_point_with_grid(origin, self.settings.grid_size);
        }
        let mut attrs = NodeAttributes::named(self.next_generated_name(kind));
        attrs.content = kind.default_content();
        attrs.bounds = Bounds::from_origin_size(origin, kind.default_size());
        attrs.position_mode = PositionMode::Absolute;
        attrs.constraint = if parent_layout.is_border_regions() {
            Some(payload.region.unwrap_or(Region::Center))
        } else {
            payload.region
        };

        let id = self.attach(parent, kind, attrs);
        self.arm(id);
        self.uniquify_children(parent);
        tracing::debug!(%id, %kind, %parent, "dropped widget");

        self.selected = Some(id);
        self.notify_selection();
        self.notify_change();
        Ok(id)
    }

    /// Adds a node under `parent` programmatically, as a drop would but at explicit
    /// bounds and with caller-supplied attributes.
    pub fn add_child(
        &mut self,
        parent: WidgetId,
        kind: WidgetKind,
        attrs: NodeAttributes,
    ) -> Result<WidgetId, DesignError> {
        let Some(p) = self.nodes.get(&parent) else {
            return Err(DesignError::NoSuchWidget(parent));
        };
        if !p.kind.is_container() {
            return Err(DesignError::NotAContainer(parent));
        }
        let id = self.attach(parent, kind, attrs);
        self.arm(id);
        self.uniquify_children(parent);
        self.notify_change();
        Ok(id)
    }

    /// Removes `id` and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let doomed = self.subtree(id);
        for d in &doomed {
            self.nodes.remove(d);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
        if self.selected.is_some_and(|s| doomed.contains(&s)) {
            self.selected = None;
            self.notify_selection();
        }
        if self.gesture.target().is_some_and(|t| doomed.contains(&t)) {
            self.gesture = GestureState::Idle;
        }
        tracing::debug!(%id, removed = doomed.len(), "removed subtree");
        self.notify_change();
        true
    }

    pub fn remove_selected(&mut self) -> Option<WidgetId> {
        let id = self.selected?;
        self.remove(id).then_some(id)
    }

    /// Moves `id` under `new_parent`, keeping its position on the canvas.
    ///
    /// Refused, without any change, when the target is not a container, is the
    /// current parent, or is `id` itself or one of its descendants.
    pub fn reparent(&mut self, id: WidgetId, new_parent: WidgetId) -> bool {
        let Some(old_parent) = self.parent(id) else {
            return false;
        };
        let Some(target) = self.nodes.get(&new_parent) else {
            return false;
        };
        if !target.kind.is_container() || new_parent == old_parent || self.is_within(new_parent, id) {
            return false;
        }

        let origin = self.canvas_origin(id) - self.canvas_origin(new_parent);
        let border = self.layout_of(new_parent).is_border_regions();
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.parent = Some(new_parent);
        node.attrs.bounds = Bounds::from_origin_size(origin, node.attrs.bounds.size());
        node.placed_region = border.then(|| node.attrs.constraint.unwrap_or(Region::Center));
        if let Some(p) = self.nodes.get_mut(&old_parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            p.children.push(id);
        }
        self.uniquify_children(new_parent);
        tracing::debug!(%id, from = %old_parent, to = %new_parent, "reparented");
        true
    }

    /// Applies a child order produced outside the graph (for example by a hierarchy
    /// view). Like a host toolkit rebuilding its child list, this drops region
    /// placement and gesture handlers on the reordered children until the next
    /// [`external_property_changed`](Self::external_property_changed).
    pub fn reorder_children(&mut self, parent: WidgetId, order: &[WidgetId]) -> bool {
        let Some(p) = self.nodes.get(&parent) else {
            return false;
        };
        let mut current = p.children.clone();
        let mut proposed = order.to_vec();
        current.sort();
        proposed.sort();
        if current != proposed {
            return false;
        }
        for id in order {
            if let Some(n) = self.nodes.get_mut(id) {
                n.placed_region = None;
                n.armed = false;
            }
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children = order.to_vec();
        }
        self.notify_change();
        true
    }

    // ----- selection -------------------------------------------------------------

    /// Sets the single selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<WidgetId>) {
        self.selected = id.filter(|i| self.nodes.contains_key(i));
        self.notify_selection();
    }

    pub fn set_selected_component(&mut self, id: WidgetId) {
        self.select(Some(id));
    }

    pub fn clear_selection(&mut self) {
        self.select(None);
    }

    /// The selection when it can be dragged or resized by the user right now.
    fn movable_selection(&self) -> Option<WidgetId> {
        let id = self.selected?;
        let n = self.nodes.get(&id)?;
        let movable = id != self.root
            && !self.settings.lock_components
            && n.attrs.position_mode == PositionMode::Absolute;
        movable.then_some(id)
    }

    pub fn move_selection(&mut self, dx: i32, dy: i32) -> bool {
        let Some(id) = self.movable_selection() else {
            return false;
        };
        let snap = self.settings.snap_to_grid && self.parent_is_free_form(id);
        let grid = self.settings.grid_size;
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let b = &mut node.attrs.bounds;
        let mut origin = b.origin() + Point::new(dx, dy);
        if snap {
            origin = snap_point_with_grid(origin, grid);
        }
        *b = Bounds::from_origin_size(origin, b.size());
        self.notify_change();
        true
    }

    pub fn nudge_selection(&mut self, dx: i32, dy: i32) -> bool {
        self.move_selection(dx, dy)
    }

    /// Grows or shrinks the selection. Only free-form parents allow resizing.
    pub fn resize_selection(&mut self, dw: i32, dh: i32) -> bool {
        let Some(id) = self.movable_selection() else {
            return false;
        };
        if !self.parent_is_free_form(id) {
            return false;
        }
        let size = self.nodes[&id].attrs.bounds.size();
        self.set_size(id, Size::new(size.width + dw, size.height + dh));
        self.notify_change();
        true
    }

    /// Clamps to the minimum widget size and snaps when snapping is on.
    fn set_size(&mut self, id: WidgetId, size: Size) {
        let mut w = size.width.max(MIN_WIDGET_SIZE);
        let mut h = size.height.max(MIN_WIDGET_SIZE);
        if self.settings.snap_to_grid && self.parent_is_free_form(id) {
            w = snap_with_grid(w, self.settings.grid_size);
            h = snap_with_grid(h, self.settings.grid_size);
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.attrs.bounds.width = w;
            n.attrs.bounds.height = h;
        }
    }

    fn restack_selection(&mut self, to_front: bool) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(p) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let kids = &mut p.children;
        kids.retain(|c| *c != id);
        if to_front {
            kids.push(id);
        } else {
            kids.insert(0, id);
        }
        self.notify_change();
        true
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.restack_selection(true)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.restack_selection(false)
    }

    /// Aligns the selection against its parent's edges or centre lines.
    pub fn align_selection(&mut self, alignment: Alignment) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if self.nodes[&id].attrs.position_mode != PositionMode::Absolute {
            return false;
        }
        let pw = self.nodes[&parent].attrs.bounds.width;
        let ph = self.nodes[&parent].attrs.bounds.height;
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let b = &mut node.attrs.bounds;
        match alignment {
            Alignment::Left => b.x = 0,
            Alignment::Right => b.x = pw - b.width,
            Alignment::Top => b.y = 0,
            Alignment::Bottom => b.y = ph - b.height,
            Alignment::CenterHorizontal => b.x = (pw - b.width) / 2,
            Alignment::CenterVertical => b.y = (ph - b.height) / 2,
        }
        self.notify_change();
        true
    }

    pub fn align_left(&mut self) -> bool {
        self.align_selection(Alignment::Left)
    }

    pub fn align_right(&mut self) -> bool {
        self.align_selection(Alignment::Right)
    }

    pub fn align_top(&mut self) -> bool {
        self.align_selection(Alignment::Top)
    }

    pub fn align_bottom(&mut self) -> bool {
        self.align_selection(Alignment::Bottom)
    }

    pub fn align_center_h(&mut self) -> bool {
        self.align_selection(Alignment::CenterHorizontal)
    }

    pub fn align_center_v(&mut self) -> bool {
        self.align_selection(Alignment::CenterVertical)
    }

    // ----- menus -----------------------------------------------------------------

    pub fn set_context_menu(&mut self, id: WidgetId, menu: Option<MenuId>) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        self.set_menu_attachment(id, menu.map(MenuAttachment::Live));
        self.notify_change();
        true
    }

    /// Wires every stashed menu reference into live pop-up behavior.
    pub fn activate_context_menus(&mut self) {
        for n in self.nodes.values_mut() {
            if let Some(MenuAttachment::Stashed(m)) = n.context_menu {
                n.context_menu = Some(MenuAttachment::Live(m));
            }
        }
    }

    // ----- repair ----------------------------------------------------------------

    /// Re-establishes the graph's invariants after an outside attribute write:
    /// sibling names are made unique, every border-region container re-places its
    /// children from their stored region tokens, and gesture handling is re-armed on
    /// every node. Fires one change event.
    pub fn external_property_changed(&mut self) {
        self.uniquify_all();
        self.reapply_regions();
        self.arm_all();
        self.notify_change();
    }

    fn reapply_regions(&mut self) {
        for id in self.subtree(self.root) {
            if !self.layout_of(id).is_border_regions() {
                continue;
            }
            for k in self.children(id).to_vec() {
                if let Some(n) = self.nodes.get_mut(&k) {
                    n.placed_region = Some(n.attrs.constraint.unwrap_or(Region::Center));
                }
            }
        }
    }

    // ----- settings --------------------------------------------------------------

    pub fn set_snap_to_grid(&mut self, on: bool) {
        self.settings.snap_to_grid = on;
    }

    pub fn set_grid_size(&mut self, px: i32) {
        self.settings.set_grid_size(px);
    }

    pub fn set_grid_color(&mut self, color: Rgba) {
        self.settings.grid_color = color;
    }

    pub fn set_lock_components(&mut self, on: bool) {
        self.settings.lock_components = on;
    }
}
