//! Conversion between the live design graph and its saved document form.

use crate::error::DesignError;
use crate::graph::{DesignGraph, MenuAttachment};
use crate::layout::LayoutStrategy;
use crate::model::VisualNode;
use crate::project::{DOCUMENT_VERSION, ProjectDocument};
use crate::resources::ResourceTable;
use crate::settings::DesignerSettings;
use crate::widget::{WidgetId, WidgetKind};

/// Snapshots the graph as a document.
///
/// Menu references are written by name. A referenced menu that has no name yet is
/// registered under a generated one so the reference survives the round trip.
pub fn export(graph: &DesignGraph, menus: &mut ResourceTable, user_code: &str) -> ProjectDocument {
    let root = export_node(graph, menus, graph.root());
    ProjectDocument {
        version: DOCUMENT_VERSION,
        root,
        popup_menus: menus.to_specs(),
        user_code: user_code.to_string(),
    }
}

fn export_node(graph: &DesignGraph, menus: &mut ResourceTable, id: WidgetId) -> VisualNode {
    let Some(node) = graph.node(id) else {
        return VisualNode::new(WidgetKind::Panel.name(), Default::default());
    };
    let mut out = VisualNode::new(node.kind().name(), node.attrs().clone());
    out.context_menu = node
        .context_menu()
        .map(|m| menus.ensure_named(m.menu()));
    out.children = node
        .children()
        .iter()
        .map(|&c| export_node(graph, menus, c))
        .collect();
    out
}

pub fn import(doc: &ProjectDocument) -> Result<(DesignGraph, ResourceTable), DesignError> {
    import_with_settings(doc, DesignerSettings::default())
}

/// Builds a fresh graph and menu table from `doc`.
///
/// Nothing outside the returned values is touched, so a failed import leaves the
/// caller's current design as it was. Menu references come back stashed; call
/// [`DesignGraph::activate_context_menus`] once the host is ready for pop-ups.
pub fn import_with_settings(
    doc: &ProjectDocument,
    settings: DesignerSettings,
) -> Result<(DesignGraph, ResourceTable), DesignError> {
    if doc.version > DOCUMENT_VERSION {
        return Err(DesignError::UnsupportedVersion {
            found: doc.version,
            supported: DOCUMENT_VERSION,
        });
    }
    let root_kind = resolve_kind(&doc.root.kind)?;
    if !root_kind.is_container() {
        return Err(DesignError::RootNotContainer(doc.root.kind.clone()));
    }

    let menus = ResourceTable::from_specs(&doc.popup_menus);
    let mut root_attrs = doc.root.attrs.clone();
    let root_layout = std::mem::take(&mut root_attrs.layout);
    let mut graph = DesignGraph::with_root(root_kind, root_attrs, settings);
    let root = graph.root();
    stash_menu(&mut graph, &menus, root, &doc.root);

    for child in &doc.root.children {
        import_node(&mut graph, &menus, root, root_layout, child)?;
    }
    graph.set_layout_silently(root, root_layout);

    graph.arm_all();
    graph.uniquify_all();
    graph.sync_name_counter();
    tracing::info!(nodes = graph.len(), menus = menus.len(), "imported project");
    Ok((graph, menus))
}

fn resolve_kind(name: &str) -> Result<WidgetKind, DesignError> {
    WidgetKind::from_name(name).ok_or_else(|| {
        tracing::warn!(kind = %name, "document references an unknown widget kind");
        DesignError::UnknownKind(name.to_string())
    })
}

fn import_node(
    graph: &mut DesignGraph,
    menus: &ResourceTable,
    parent: WidgetId,
    parent_layout: LayoutStrategy,
    node: &VisualNode,
) -> Result<(), DesignError> {
    let kind = resolve_kind(&node.kind)?;
    let mut attrs = node.attrs.clone();
    // A container gets its own layout back only once its children are in place.
    let layout = std::mem::take(&mut attrs.layout);
    let id = graph.attach_under_layout(parent, parent_layout, kind, attrs);
    stash_menu(graph, menus, id, node);

    for child in &node.children {
        import_node(graph, menus, id, layout, child)?;
    }
    graph.set_layout_silently(id, layout);
    Ok(())
}

fn stash_menu(graph: &mut DesignGraph, menus: &ResourceTable, id: WidgetId, node: &VisualNode) {
    let Some(name) = &node.context_menu else {
        return;
    };
    match menus.get(name) {
        Some(menu) => graph.set_menu_attachment(id, Some(MenuAttachment::Stashed(menu))),
        None => tracing::warn!(menu = %name, "dropping reference to undefined pop-up menu"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DropPayload;
    use crate::layout::Region;
    use crate::model::{Content, NodeAttributes};
    use crate::project::MenuItemSpec;
    use crate::resources::PopupMenu;
    use crate::widget::style::{BorderSpec, Rgba};
    use crate::widget::{Bounds, Point};
    use pretty_assertions::assert_eq;

    fn sample() -> (DesignGraph, ResourceTable) {
        let mut g = DesignGraph::new();
        let mut menus = ResourceTable::new();
        let ctx = menus.put_menu(
            "ctxA",
            PopupMenu::new(vec![MenuItemSpec::new("Copy", "copy")]),
        );

        let panel = g.drop_widget(&DropPayload::new("Panel"), Point::new(100, 100)).unwrap();
        g.attrs_mut(panel).unwrap().layout = LayoutStrategy::border_regions();
        g.attrs_mut(panel).unwrap().border = Some(BorderSpec::titled("Options"));
        let north = g
            .drop_widget(&DropPayload::new("Label").with_region(Region::North), Point::new(110, 110))
            .unwrap();
        let button = g.drop_widget(&DropPayload::new("Button"), Point::new(10, 10)).unwrap();
        g.attrs_mut(button).unwrap().background = Some(Rgba::rgb(255, 0, 0));
        g.set_context_menu(north, Some(ctx));
        g.set_context_menu(button, Some(ctx));
        g.external_property_changed();
        (g, menus)
    }

    #[test]
    fn test_export_shape() {
        let (g, mut menus) = sample();
        let doc = export(&g, &mut menus, "// mine");
        assert_eq!(doc.root.kind, "Panel");
        assert_eq!(doc.root.children.len(), 2);
        let panel = &doc.root.children[0];
        assert_eq!(panel.attrs.layout, LayoutStrategy::border_regions());
        assert_eq!(panel.children[0].attrs.constraint, Some(Region::North));
        assert_eq!(panel.children[0].context_menu.as_deref(), Some("ctxA"));
        assert_eq!(doc.root.children[1].context_menu.as_deref(), Some("ctxA"));
        assert_eq!(doc.popup_menus.len(), 1);
        assert_eq!(doc.user_code, "// mine");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let (g, mut menus) = sample();
        let first = export(&g, &mut menus, "");
        let (g2, mut menus2) = import(&first).unwrap();
        let second = export(&g2, &mut menus2, "");
        assert_eq!(first, second);
    }

    #[test]
    fn test_shared_menu_stays_shared() {
        let (g, mut menus) = sample();
        let doc = export(&g, &mut menus, "");
        let (g2, menus2) = import(&doc).unwrap();
        let a = g2.find_by_name("label2").unwrap();
        let b = g2.find_by_name("button3").unwrap();
        let ma = g2.node(a).unwrap().context_menu().unwrap();
        let mb = g2.node(b).unwrap().context_menu().unwrap();
        assert!(matches!(ma, MenuAttachment::Stashed(_)));
        assert_eq!(ma.menu(), mb.menu());
        assert_eq!(menus2.get("ctxA"), Some(ma.menu()));
        assert_eq!(menus2.len(), 1);
    }

    #[test]
    fn test_anonymous_menu_is_named_on_export() {
        let mut g = DesignGraph::new();
        let mut menus = ResourceTable::new();
        let anon = menus.create(PopupMenu::default());
        let id = g.drop_widget(&DropPayload::new("Label"), Point::new(5, 5)).unwrap();
        g.set_context_menu(id, Some(anon));
        let doc = export(&g, &mut menus, "");
        assert_eq!(doc.root.children[0].context_menu.as_deref(), Some("popupMenu0"));
        assert_eq!(doc.popup_menus[0].name, "popupMenu0");
    }

    #[test]
    fn test_import_restores_regions_and_arms() {
        let (g, mut menus) = sample();
        let doc = export(&g, &mut menus, "");
        let (g2, _) = import(&doc).unwrap();
        let label = g2.find_by_name("label2").unwrap();
        assert_eq!(g2.effective_region(label), Some(Region::North));
        assert!(g2.node(label).unwrap().is_armed());
        assert!(!g2.node(g2.root()).unwrap().is_armed());
    }

    #[test]
    fn test_import_continues_name_counter() {
        let (g, mut menus) = sample();
        let doc = export(&g, &mut menus, "");
        let (mut g2, _) = import(&doc).unwrap();
        let id = g2.drop_widget(&DropPayload::new("Button"), Point::new(600, 500)).unwrap();
        assert_eq!(g2.node(id).unwrap().name(), Some("button4"));
    }

    #[test]
    fn test_unknown_kind_aborts_import() {
        let mut doc = ProjectDocument::default();
        doc.root.children.push(VisualNode::new("Button", NodeAttributes::named("ok")));
        doc.root.children.push(VisualNode::new("Flux", NodeAttributes::named("bad")));
        assert!(matches!(import(&doc), Err(DesignError::UnknownKind(k)) if k == "Flux"));
    }

    #[test]
    fn test_root_must_be_container() {
        let doc = ProjectDocument {
            root: VisualNode::new("Label", NodeAttributes::named("lonely")),
            ..Default::default()
        };
        assert!(matches!(import(&doc), Err(DesignError::RootNotContainer(_))));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let doc = ProjectDocument {
            version: DOCUMENT_VERSION + 1,
            ..Default::default()
        };
        assert!(matches!(import(&doc), Err(DesignError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_undefined_menu_reference_is_dropped() {
        let mut doc = ProjectDocument::default();
        let mut node = VisualNode::new("Button", NodeAttributes::named("b"));
        node.context_menu = Some("ghost".into());
        doc.root.children.push(node);
        let (g, _) = import(&doc).unwrap();
        let b = g.find_by_name("b").unwrap();
        assert_eq!(g.node(b).unwrap().context_menu(), None);
    }

    #[test]
    fn test_duplicate_names_in_document_are_repaired() {
        let mut doc = ProjectDocument::default();
        let mut a = NodeAttributes::named("ok");
        a.content = Some(Content::Text("OK".into()));
        a.bounds = Bounds::new(0, 0, 80, 24);
        doc.root.children.push(VisualNode::new("Button", a.clone()));
        doc.root.children.push(VisualNode::new("button", a));
        let (g, _) = import(&doc).unwrap();
        let names: Vec<_> = g
            .children(g.root())
            .iter()
            .map(|c| g.node(*c).unwrap().name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["ok", "ok2"]);
    }
}
