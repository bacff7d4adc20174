//! End-to-end designer flows through the public API.

use pretty_assertions::assert_eq;
use rad_form_designer::codegen::{self, CodeGenFormat, EmitOptions};
use rad_form_designer::graph::{CommandQueue, GraphCommand, MenuAttachment};
use rad_form_designer::project::MenuItemSpec;
use rad_form_designer::resources::PopupMenu;
use rad_form_designer::sync;
use rad_form_designer::{
    Bounds, DesignEvent, DesignGraph, DropPayload, LayoutStrategy, Point, PositionMode,
    PropertyBag, Region, ResourceTable, Session, WidgetId, WidgetKind,
};
use std::cell::RefCell;
use std::rc::Rc;

fn drop_at(g: &mut DesignGraph, kind: &str, x: i32, y: i32) -> WidgetId {
    g.drop_widget(&DropPayload::new(kind), Point::new(x, y))
        .unwrap()
}

fn name_of(g: &DesignGraph, id: WidgetId) -> &str {
    g.node(id).and_then(|n| n.name()).unwrap()
}

#[test]
fn drop_button_on_empty_canvas() {
    let mut session = Session::default();
    let id = drop_at(session.graph_mut(), "button", 50, 50);

    let g = session.graph();
    assert_eq!(g.children(g.root()), &[id]);
    let node = g.node(id).unwrap();
    assert_eq!(node.kind(), WidgetKind::Button);
    assert_eq!(node.name(), Some("button1"));
    assert_eq!(node.attrs().bounds, Bounds::new(50, 50, 120, 30));
    assert_eq!(node.attrs().position_mode, PositionMode::Absolute);

    let code = session.generated_code();
    assert!(code.contains("let button1 = Button::new();\n"));
    assert!(code.contains("button1.set_bounds(50, 50, 120, 30);\n"));
    assert!(code.contains("panel.add(&button1);\n"));
}

#[test]
fn removed_names_are_not_reused() {
    let mut g = DesignGraph::new();
    let first = drop_at(&mut g, "Button", 10, 10);
    let second = drop_at(&mut g, "Button", 10, 60);
    assert_eq!(name_of(&g, first), "button1");
    assert_eq!(name_of(&g, second), "button2");

    g.set_selected_component(first);
    g.remove_selected();
    let third = drop_at(&mut g, "Button", 10, 110);
    assert_eq!(name_of(&g, third), "button3");
    assert!(g.find_by_name("button1").is_none());
}

#[test]
fn regions_survive_reorder_after_repair() {
    let mut g = DesignGraph::new();
    let a = drop_at(&mut g, "Panel", 100, 100);
    g.properties(a)
        .unwrap()
        .set_text("layout", "BorderRegions")
        .unwrap();
    g.external_property_changed();

    let x = g
        .drop_widget(
            &DropPayload::new("Label").with_region(Region::North),
            Point::new(110, 110),
        )
        .unwrap();
    let y = drop_at(&mut g, "Button", 150, 150);
    assert_eq!(g.effective_region(x), Some(Region::North));

    assert!(g.reorder_children(a, &[y, x]));
    g.external_property_changed();
    assert_eq!(g.effective_region(x), Some(Region::North));
    assert_eq!(g.effective_region(y), Some(Region::Center));

    let mut menus = ResourceTable::new();
    let code = codegen::emit_statements(&g, &mut menus);
    assert!(code.contains("panel1.add_at(&label2, Region::North);"));
    assert!(code.contains("panel1.add_at(&button3, Region::Center);"));
}

#[test]
fn drag_snaps_to_grid() {
    let mut g = DesignGraph::new();
    let z = drop_at(&mut g, "Button", 13, 13);
    g.set_snap_to_grid(true);
    g.set_grid_size(10);

    g.pointer_pressed(Point::new(15, 15));
    g.pointer_dragged(Point::new(30, 20));
    g.pointer_dragged(Point::new(49, 24));
    g.pointer_released();

    assert_eq!(g.parent(z), Some(g.root()));
    assert_eq!(g.node(z).unwrap().attrs().bounds.origin(), Point::new(50, 20));
}

#[test]
fn shared_menu_round_trips_as_one_entry() {
    let mut session = Session::default();
    let ctx = session.menus_mut().put_menu(
        "ctxA",
        PopupMenu::new(vec![
            MenuItemSpec::new("Cut", "cut"),
            MenuItemSpec::new("Paste", "paste"),
        ]),
    );
    let g = session.graph_mut();
    let a = drop_at(g, "TextField", 10, 10);
    let b = drop_at(g, "TextArea", 10, 60);
    g.set_context_menu(a, Some(ctx));
    g.set_context_menu(b, Some(ctx));

    let json = session.to_json().unwrap();
    let mut reopened = Session::default();
    reopened.load_json(&json).unwrap();

    let g = reopened.graph();
    let ma = g.node(g.find_by_name("textfield1").unwrap()).unwrap().context_menu();
    let mb = g.node(g.find_by_name("textarea2").unwrap()).unwrap().context_menu();
    let (Some(ma), Some(mb)) = (ma, mb) else {
        panic!("menu references were lost");
    };
    assert!(matches!(ma, MenuAttachment::Live(_)));
    assert_eq!(ma.menu(), mb.menu());
    assert_eq!(reopened.menus().len(), 1);
    assert_eq!(reopened.menus().get("ctxA"), Some(ma.menu()));
    assert_eq!(reopened.menus().menu(ma.menu()).unwrap().items.len(), 2);
}

#[test]
fn reparent_into_descendant_is_refused() {
    let mut g = DesignGraph::new();
    let outer = drop_at(&mut g, "Panel", 100, 100);
    let inner = drop_at(&mut g, "Panel", 120, 120);
    assert_eq!(g.parent(inner), Some(outer));

    assert!(!g.reparent(outer, inner));
    assert!(!g.reparent(outer, outer));
    assert_eq!(g.parent(outer), Some(g.root()));
    assert_eq!(g.parent(inner), Some(outer));
}

#[test]
fn listener_commands_run_after_the_broadcast() {
    let mut g = DesignGraph::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    g.add_listener(move |ev, graph, _: &mut CommandQueue| {
        log.borrow_mut().push((*ev, graph.len()));
    });
    g.add_listener(|ev, graph, queue: &mut CommandQueue| {
        // Keep every new widget out of the way of the next drop.
        if *ev == DesignEvent::SelectionChanged(graph.selected()) && graph.selected().is_some() {
            queue.push(GraphCommand::Nudge { dx: 0, dy: 100 });
        }
    });

    let id = drop_at(&mut g, "Button", 10, 10);
    assert_eq!(g.node(id).unwrap().attrs().bounds.origin(), Point::new(10, 110));

    let events: Vec<DesignEvent> = seen.borrow().iter().map(|(e, _)| *e).collect();
    assert_eq!(
        events,
        vec![
            DesignEvent::SelectionChanged(Some(id)),
            DesignEvent::DesignChanged,
            DesignEvent::DesignChanged,
        ]
    );
    assert!(seen.borrow().iter().all(|(_, len)| *len == 2));
}

#[test]
fn failed_open_keeps_current_design() {
    let mut session = Session::default();
    drop_at(session.graph_mut(), "Slider", 10, 10);
    let before = session.to_json().unwrap();

    let newer = before.replacen("\"version\": 1", "\"version\": 99", 1);
    assert!(session.load_json(&newer).is_err());
    let unknown = before.replacen("\"Slider\"", "\"Hologram\"", 1);
    assert!(session.load_json(&unknown).is_err());

    assert_eq!(session.to_json().unwrap(), before);
}

#[test]
fn builder_format_wraps_the_same_statements() {
    let mut g = DesignGraph::new();
    drop_at(&mut g, "CheckBox", 20, 20);
    let mut menus = ResourceTable::new();
    let plain = codegen::emit_statements(&g, &mut menus);
    let wrapped = codegen::emit(
        &g,
        &mut menus,
        &EmitOptions {
            format: CodeGenFormat::BuilderFn,
        },
    );
    for line in plain.lines().filter(|l| !l.is_empty()) {
        assert!(wrapped.contains(&format!("    {line}\n")), "missing {line}");
    }
    assert!(wrapped.trim_end().ends_with('}'));
}

#[test]
fn document_import_then_emit_matches_live_emit() {
    let mut g = DesignGraph::new();
    let p = drop_at(&mut g, "Panel", 200, 50);
    g.attrs_mut(p).unwrap().layout = LayoutStrategy::flow();
    drop_at(&mut g, "Label", 210, 60);
    drop_at(&mut g, "ComboBox", 20, 300);
    let mut menus = ResourceTable::new();

    let doc = sync::export(&g, &mut menus, "");
    let (imported, mut menus2) = sync::import(&doc).unwrap();
    assert_eq!(
        codegen::emit_statements(&imported, &mut menus2),
        codegen::emit_statements(&g, &mut menus)
    );
}

#[test]
fn non_finite_value_never_reaches_the_saved_project() {
    let mut session = Session::default();
    let id = drop_at(session.graph_mut(), "Spinner", 10, 10);
    let g = session.graph_mut();
    {
        let mut bag = g.properties(id).unwrap();
        assert!(bag.set_text("value", "NaN").is_err());
        assert!(bag.set_text("value", "inf").is_err());
        bag.set_text("value", "7.5").unwrap();
    }
    g.external_property_changed();

    let json = session.to_json().unwrap();
    let mut reopened = Session::default();
    reopened.load_json(&json).unwrap();
    assert_eq!(reopened.to_json().unwrap(), json);
}

#[test]
fn drop_after_opening_a_huge_generated_name() {
    let mut g = DesignGraph::new();
    let id = drop_at(&mut g, "Button", 10, 10);
    g.attrs_mut(id).unwrap().name = Some(format!("button{}", u64::MAX));
    let doc = sync::export(&g, &mut ResourceTable::new(), "");

    let (mut imported, _) = sync::import(&doc).unwrap();
    let label = drop_at(&mut imported, "Label", 200, 200);
    assert_eq!(name_of(&imported, label), "label1");
}
