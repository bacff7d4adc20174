//! Pointer handling for armed nodes: press to select, drag to move, drag the corner
//! handle to resize, release to drop into whatever container lies underneath.

use super::DesignGraph;
use crate::model::PositionMode;
use crate::widget::{Bounds, Point, Size, WidgetId, snap_point_with_grid};

/// Side of the square resize handle in a node's bottom-right corner.
pub const RESIZE_HANDLE: i32 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pressed on a node that does not react to dragging.
    Pressed { target: WidgetId },
    /// `grab` is the press point relative to the target's top-left.
    Dragging { target: WidgetId, grab: Point },
    Resizing { target: WidgetId },
}

impl GestureState {
    pub fn target(&self) -> Option<WidgetId> {
        match self {
            GestureState::Idle => None,
            GestureState::Pressed { target }
            | GestureState::Dragging { target, .. }
            | GestureState::Resizing { target } => Some(*target),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Move,
    ResizeSe,
}

impl DesignGraph {
    fn in_resize_handle(&self, id: WidgetId, at: Point) -> bool {
        let Some(b) = self.canvas_bounds(id) else {
            return false;
        };
        let handle = Bounds::new(
            b.x + b.width - RESIZE_HANDLE,
            b.y + b.height - RESIZE_HANDLE,
            RESIZE_HANDLE,
            RESIZE_HANDLE,
        );
        handle.contains(at)
    }

    fn gesture_allowed(&self, id: WidgetId) -> bool {
        !self.settings.lock_components
            && self
                .node(id)
                .is_some_and(|n| n.attrs.position_mode == PositionMode::Absolute)
    }

    /// Press at canvas point `at`. Pressing the bare surface clears the selection.
    pub fn pointer_pressed(&mut self, at: Point) {
        let hit = self.deepest_at(at);
        if hit == self.root {
            self.gesture = GestureState::Idle;
            self.clear_selection();
            return;
        }
        self.gesture = match self.node(hit) {
            Some(n) if n.armed => {
                if self.parent_is_free_form(hit) && self.in_resize_handle(hit, at) {
                    GestureState::Resizing { target: hit }
                } else {
                    GestureState::Dragging {
                        target: hit,
                        grab: at - self.canvas_origin(hit),
                    }
                }
            }
            _ => GestureState::Pressed { target: hit },
        };
        self.select(Some(hit));
    }

    /// Pointer moved to `at` with the button held. Returns whether anything changed.
    pub fn pointer_dragged(&mut self, at: Point) -> bool {
        match self.gesture {
            GestureState::Dragging { target, grab } => {
                if !self.gesture_allowed(target) {
                    return false;
                }
                let Some(parent) = self.parent(target) else {
                    return false;
                };
                let mut origin = at - self.canvas_origin(parent) - grab;
                if self.settings.snap_to_grid && self.layout_of(parent).is_free_form() {
                    origin = snap_point_with_grid(origin, self.settings.grid_size);
                }
                let Some(n) = self.nodes.get_mut(&target) else {
                    return false;
                };
                if n.attrs.bounds.origin() == origin {
                    return false;
                }
                n.attrs.bounds = Bounds::from_origin_size(origin, n.attrs.bounds.size());
                self.notify_change();
                true
            }
            GestureState::Resizing { target } => {
                if !self.gesture_allowed(target) {
                    return false;
                }
                let local = at - self.canvas_origin(target);
                let before = self.node(target).map(|n| n.attrs.bounds.size());
                self.set_size(target, Size::new(local.x, local.y));
                if self.node(target).map(|n| n.attrs.bounds.size()) == before {
                    return false;
                }
                self.notify_change();
                true
            }
            GestureState::Idle | GestureState::Pressed { .. } => false,
        }
    }

    /// Ends the gesture. A finished drag re-parents the target into the container under
    /// its centre; returns whether that happened.
    pub fn pointer_released(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        let GestureState::Dragging { target, .. } = gesture else {
            return false;
        };
        if !self.gesture_allowed(target) {
            return false;
        }
        let Some(center) = self.canvas_bounds(target).map(|b| b.center()) else {
            return false;
        };
        let container = self.container_at(center, Some(target));
        let moved = self.reparent(target, container);
        self.notify_change();
        moved
    }

    pub fn hover_cursor(&self, at: Point) -> CursorHint {
        let hit = self.deepest_at(at);
        match self.node(hit) {
            Some(n) if hit != self.root && n.armed && self.gesture_allowed(hit) => {
                if self.parent_is_free_form(hit) && self.in_resize_handle(hit, at) {
                    CursorHint::ResizeSe
                } else {
                    CursorHint::Move
                }
            }
            _ => CursorHint::Default,
        }
    }
}
