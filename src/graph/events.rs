//! Change and selection notifications.
//!
//! Listeners only get shared access to the graph. A listener that wants to mutate the
//! design pushes a [`GraphCommand`]; queued commands run after every listener has seen
//! the current event, in the order they were queued. Events raised while a broadcast is
//! in progress are delivered after it, never nested inside it.

use super::DesignGraph;
use crate::widget::WidgetId;
use crate::widget::style::Rgba;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesignEvent {
    SelectionChanged(Option<WidgetId>),
    DesignChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontal,
    CenterVertical,
}

/// A mutation requested from outside the graph, typically by a listener.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphCommand {
    Select(Option<WidgetId>),
    RemoveSelected,
    Nudge { dx: i32, dy: i32 },
    BringToFront,
    SendToBack,
    Align(Alignment),
    ExternalPropertyChanged,
    SetSnapToGrid(bool),
    SetGridSize(i32),
    SetGridColor(Rgba),
    SetLockComponents(bool),
}

#[derive(Debug, Default)]
pub struct CommandQueue(Vec<GraphCommand>);

impl CommandQueue {
    pub fn push(&mut self, cmd: GraphCommand) {
        self.0.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub type Listener = Box<dyn FnMut(&DesignEvent, &DesignGraph, &mut CommandQueue)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl DesignGraph {
    /// Registers an observer. Observers are called in registration order.
    pub fn add_listener(
        &mut self,
        f: impl FnMut(&DesignEvent, &DesignGraph, &mut CommandQueue) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(f)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn apply(&mut self, cmd: GraphCommand) {
        tracing::debug!(?cmd, "applying graph command");
        match cmd {
            GraphCommand::Select(id) => self.select(id),
            GraphCommand::RemoveSelected => {
                self.remove_selected();
            }
            GraphCommand::Nudge { dx, dy } => {
                self.nudge_selection(dx, dy);
            }
            GraphCommand::BringToFront => {
                self.bring_to_front();
            }
            GraphCommand::SendToBack => {
                self.send_to_back();
            }
            GraphCommand::Align(a) => {
                self.align_selection(a);
            }
            GraphCommand::ExternalPropertyChanged => self.external_property_changed(),
            GraphCommand::SetSnapToGrid(on) => self.set_snap_to_grid(on),
            GraphCommand::SetGridSize(px) => self.set_grid_size(px),
            GraphCommand::SetGridColor(c) => self.set_grid_color(c),
            GraphCommand::SetLockComponents(on) => self.set_lock_components(on),
        }
    }

    pub(crate) fn notify_change(&mut self) {
        self.broadcast(DesignEvent::DesignChanged);
    }

    pub(crate) fn notify_selection(&mut self) {
        self.broadcast(DesignEvent::SelectionChanged(self.selected));
    }

    fn broadcast(&mut self, event: DesignEvent) {
        self.outbox.push_back(event);
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        while let Some(event) = self.outbox.pop_front() {
            let mut listeners = std::mem::take(&mut self.listeners);
            let mut queue = CommandQueue::default();
            for (_, listener) in listeners.iter_mut() {
                listener(&event, self, &mut queue);
            }
            self.listeners = listeners;
            for cmd in queue.0 {
                self.apply(cmd);
            }
        }
        self.dispatching = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DropPayload;
    use crate::widget::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(graph: &mut DesignGraph) -> Rc<RefCell<Vec<DesignEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        graph.add_listener(move |ev, _, _| sink.borrow_mut().push(*ev));
        log
    }

    #[test]
    fn test_drop_fires_selection_then_change() {
        let mut g = DesignGraph::new();
        let log = recorder(&mut g);
        let id = g
            .drop_widget(&DropPayload::new("Button"), Point::new(10, 10))
            .unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                DesignEvent::SelectionChanged(Some(id)),
                DesignEvent::DesignChanged
            ]
        );
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut g = DesignGraph::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = Rc::clone(&order);
            g.add_listener(move |_, _, _| order.borrow_mut().push(n));
        }
        g.external_property_changed();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_mutation_from_listener_runs_after_broadcast() {
        let mut g = DesignGraph::new();
        let id = g
            .drop_widget(&DropPayload::new("Button"), Point::new(10, 10))
            .unwrap();
        g.clear_selection();

        // First listener asks for a selection when the design changes.
        let mut asked = false;
        g.add_listener(move |ev, _, q| {
            if *ev == DesignEvent::DesignChanged && !asked {
                asked = true;
                q.push(GraphCommand::Select(Some(id)));
            }
        });
        // Second listener must still see the original event before the selection event.
        let log = recorder(&mut g);

        g.external_property_changed();
        assert_eq!(
            *log.borrow(),
            vec![
                DesignEvent::DesignChanged,
                DesignEvent::SelectionChanged(Some(id))
            ]
        );
        assert_eq!(g.selected(), Some(id));
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let mut g = DesignGraph::new();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let id = g.add_listener(move |_, _, _| *h.borrow_mut() += 1);
        g.external_property_changed();
        assert!(g.remove_listener(id));
        assert!(!g.remove_listener(id));
        g.external_property_changed();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_listener_can_read_graph_state() {
        let mut g = DesignGraph::new();
        let seen = Rc::new(RefCell::new(0));
        let s = Rc::clone(&seen);
        g.add_listener(move |ev, graph, _| {
            if *ev == DesignEvent::DesignChanged {
                *s.borrow_mut() = graph.children(graph.root()).len();
            }
        });
        g.drop_widget(&DropPayload::new("Label"), Point::new(5, 5))
            .unwrap();
        assert_eq!(*seen.borrow(), 1);
    }
}
