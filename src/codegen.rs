//! Source emission: turns the design into widget-construction statements.
//!
//! The output is a single pre-order pass over the tree. Only attributes that are set
//! produce statements, so an untouched widget costs three or four lines.

use crate::graph::DesignGraph;
use crate::layout::{GridCell, LayoutStrategy, Region};
use crate::model::{Content, NodeAttributes, PositionMode};
use crate::resources::ResourceTable;
use crate::widget::style::{BorderSpec, FontSpec, Insets, Rgba};
use crate::widget::{Size, WidgetId, escape};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const GENERATED_HEADER: &str = "// ---- generated layout ----";

/// Code generation output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodeGenFormat {
    /// Bare statements, ready to paste into an existing function
    #[default]
    Statements,
    /// Statements wrapped in `pub fn build_ui() -> Panel`
    BuilderFn,
}

impl CodeGenFormat {
    pub const ALL: [CodeGenFormat; 2] = [CodeGenFormat::Statements, CodeGenFormat::BuilderFn];

    pub const fn display_name(&self) -> &'static str {
        match self {
            CodeGenFormat::Statements => "Statements",
            CodeGenFormat::BuilderFn => "Builder Function",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub format: CodeGenFormat,
}

/// Emits the whole design in the requested format.
///
/// Menus referenced by nodes but not yet named are registered in `menus` first, so
/// the emitted declarations and attachments agree.
pub fn emit(graph: &DesignGraph, menus: &mut ResourceTable, options: &EmitOptions) -> String {
    let (body, root_var) = emit_body(graph, menus);
    match options.format {
        CodeGenFormat::Statements => format!("{GENERATED_HEADER}\n{body}"),
        CodeGenFormat::BuilderFn => {
            let mut out = format!("{GENERATED_HEADER}\npub fn build_ui() -> Panel {{\n");
            for line in body.lines() {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    out.push_str(&format!("    {line}\n"));
                }
            }
            out.push_str(&format!("    {root_var}\n}}\n"));
            out
        }
    }
}

const ROOT_VAR: &str = "panel";

pub fn emit_statements(graph: &DesignGraph, menus: &mut ResourceTable) -> String {
    emit_body(graph, menus).0
}

/// Statements plus the variable holding the root panel.
fn emit_body(graph: &DesignGraph, menus: &mut ResourceTable) -> (String, String) {
    for id in graph.subtree(graph.root()) {
        if let Some(m) = graph.node(id).and_then(|n| n.context_menu()) {
            menus.ensure_named(m.menu());
        }
    }
    let mut e = Emitter {
        graph,
        menus,
        out: String::new(),
        anon: 0,
        vars: HashSet::new(),
        menu_vars: BTreeMap::new(),
    };
    e.menu_declarations();
    let root_var = e.root();
    (e.out, root_var)
}

struct Emitter<'a> {
    graph: &'a DesignGraph,
    menus: &'a ResourceTable,
    out: String,
    /// Counter for nodes without a name; starts at zero on every emission.
    anon: usize,
    vars: HashSet<String>,
    menu_vars: BTreeMap<String, String>,
}

impl Emitter<'_> {
    /// Claims a variable name derived from `name`, suffixing `_2`, `_3`... on clashes.
    fn claim_var(&mut self, name: &str) -> String {
        let base = ident(name);
        let mut var = base.clone();
        let mut n = 2;
        while !self.vars.insert(var.clone()) {
            var = format!("{base}_{n}");
            n += 1;
        }
        var
    }

    fn menu_declarations(&mut self) {
        let menus = self.menus;
        for name in menus.names() {
            let var = self.claim_var(name);
            self.out.push_str(&format!("let {var} = PopupMenu::new();\n"));
            if let Some(menu) = menus.get(name).and_then(|id| menus.menu(id)) {
                for item in &menu.items {
                    self.out.push_str(&format!(
                        "{var}.add_item(\"{}\", \"{}\");\n",
                        escape(&item.label),
                        escape(&item.action)
                    ));
                }
            }
            self.out.push('\n');
            self.menu_vars.insert(name.to_string(), var);
        }
    }

    fn root(&mut self) -> String {
        let root = self.graph.root();
        let var = self.claim_var(ROOT_VAR);
        let layout = self.graph.layout_of(root);
        self.out.push_str(&format!("let {var} = Panel::new();\n"));
        self.out
            .push_str(&format!("{var}.set_layout({});\n\n", layout_expr(&layout)));
        self.children(root, &var);
        var
    }

    fn children(&mut self, parent: WidgetId, parent_var: &str) {
        let graph = self.graph;
        let parent_layout = graph.layout_of(parent);
        for &child in graph.children(parent) {
            self.node(child, parent_var, &parent_layout);
        }
    }

    fn node(&mut self, id: WidgetId, parent_var: &str, parent_layout: &LayoutStrategy) {
        let graph = self.graph;
        let menus = self.menus;
        let Some(node) = graph.node(id) else {
            return;
        };
        let kind = node.kind();
        let a = node.attrs();
        let name = match &a.name {
            Some(n) => n.clone(),
            None => {
                let n = format!("{}{}", kind.name_prefix(), self.anon);
                self.anon += 1;
                n
            }
        };
        let var = self.claim_var(&name);
        let cell_var = matches!(parent_layout, LayoutStrategy::ConstraintGrid)
            .then(|| self.claim_var(&format!("{var}_cell")));
        let out = &mut self.out;

        out.push_str(&format!("let {var} = {}::new();\n", kind.name()));
        out.push_str(&format!("{var}.set_name(\"{}\");\n", escape(&name)));
        if let Some(content) = &a.content {
            out.push_str(&content_stmt(&var, content));
        }
        if kind.is_container() {
            out.push_str(&format!("{var}.set_layout({});\n", layout_expr(&a.layout)));
        }
        style_stmts(out, &var, a);
        if !a.visible {
            out.push_str(&format!("{var}.set_visible(false);\n"));
        }
        if !a.enabled {
            out.push_str(&format!("{var}.set_enabled(false);\n"));
        }
        if let Some(m) = node.context_menu() {
            let menu_var = menus
                .name_of(m.menu())
                .and_then(|n| self.menu_vars.get(n));
            if let Some(menu_var) = menu_var {
                out.push_str(&format!("{var}.set_context_menu(&{menu_var});\n"));
            }
        }
        for (setter, size) in [
            ("set_preferred_size", a.preferred_size),
            ("set_minimum_size", a.minimum_size),
            ("set_maximum_size", a.maximum_size),
        ] {
            if let Some(Size { width, height }) = size {
                out.push_str(&format!("{var}.{setter}({width}, {height});\n"));
            }
        }
        if a.position_mode == PositionMode::Absolute {
            let b = a.bounds;
            out.push_str(&format!(
                "{var}.set_bounds({}, {}, {}, {});\n",
                b.x, b.y, b.width, b.height
            ));
        }
        match (parent_layout, cell_var) {
            (LayoutStrategy::ConstraintGrid, Some(cell_var)) => {
                let cell = a.grid_cell.unwrap_or_default();
                out.push_str(&grid_cell_stmt(&cell_var, &cell));
                out.push_str(&format!(
                    "{parent_var}.add_with_constraints(&{var}, {cell_var});\n"
                ));
            }
            (LayoutStrategy::BorderRegions { .. }, _) => {
                let region = a.constraint.unwrap_or(Region::Center);
                out.push_str(&format!(
                    "{parent_var}.add_at(&{var}, Region::{});\n",
                    region.token()
                ));
            }
            _ => out.push_str(&format!("{parent_var}.add(&{var});\n")),
        }
        out.push('\n');

        self.children(id, &var);
    }
}

/// Turns an identity into something usable as a variable name.
pub fn ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_sub = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            last_sub = false;
        } else if !last_sub {
            out.push('_');
            last_sub = true;
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn content_stmt(var: &str, content: &Content) -> String {
    match content {
        Content::Text(s) => format!("{var}.set_text(\"{}\");\n", escape(s)),
        Content::SelectedItem(s) => format!("{var}.set_selected_item(\"{}\");\n", escape(s)),
        Content::Value(v) => format!("{var}.set_value({v:?});\n"),
    }
}

fn style_stmts(out: &mut String, var: &str, a: &NodeAttributes) {
    if let Some(font) = &a.font {
        out.push_str(&format!("{var}.set_font({});\n", font_expr(font)));
    }
    // Borders that cannot be expressed are left out rather than failing the emission.
    if let Some(border) = a.border.as_ref().and_then(border_expr) {
        out.push_str(&format!("{var}.set_border({border});\n"));
    }
    if let Some(c) = a.background {
        out.push_str(&format!("{var}.set_background({});\n", color_expr(c)));
    }
    if let Some(c) = a.foreground {
        out.push_str(&format!("{var}.set_foreground({});\n", color_expr(c)));
    }
}

pub fn layout_expr(layout: &LayoutStrategy) -> String {
    match layout {
        LayoutStrategy::None => "Layout::Absolute".to_string(),
        LayoutStrategy::Flow {
            alignment,
            hgap,
            vgap,
        } => format!(
            "Layout::Flow {{ alignment: FlowAlignment::{alignment:?}, hgap: {hgap}, vgap: {vgap} }}"
        ),
        LayoutStrategy::BorderRegions { hgap, vgap } => {
            format!("Layout::BorderRegions {{ hgap: {hgap}, vgap: {vgap} }}")
        }
        LayoutStrategy::UniformGrid {
            rows,
            cols,
            hgap,
            vgap,
        } => format!(
            "Layout::UniformGrid {{ rows: {rows}, cols: {cols}, hgap: {hgap}, vgap: {vgap} }}"
        ),
        LayoutStrategy::ConstraintGrid => "Layout::ConstraintGrid".to_string(),
    }
}

fn color_expr(c: Rgba) -> String {
    if c.a() == 255 {
        format!("Color::rgb({}, {}, {})", c.r(), c.g(), c.b())
    } else {
        format!("Color::rgba({}, {}, {}, {})", c.r(), c.g(), c.b(), c.a())
    }
}

fn font_expr(font: &FontSpec) -> String {
    let style = match (font.style.bold, font.style.italic) {
        (false, false) => "PLAIN",
        (true, false) => "BOLD",
        (false, true) => "ITALIC",
        (true, true) => "BOLD_ITALIC",
    };
    format!(
        "Font::new(\"{}\", FontStyle::{style}, {})",
        escape(&font.family),
        font.size
    )
}

fn insets_expr(i: &Insets) -> String {
    format!("Insets::new({}, {}, {}, {})", i.top, i.left, i.bottom, i.right)
}

/// `None` when the border has no source form (a compound with a missing half, or a
/// matte border without a color).
pub fn border_expr(border: &BorderSpec) -> Option<String> {
    let expr = match border {
        BorderSpec::Empty { insets } => format!("Border::empty({})", insets_expr(insets)),
        BorderSpec::Line { thickness, color } => {
            format!("Border::line({}, {thickness})", color_expr(*color))
        }
        BorderSpec::Matte { insets, color } => format!(
            "Border::matte({}, {})",
            insets_expr(insets),
            color_expr((*color)?)
        ),
        BorderSpec::Titled {
            title,
            position,
            justification,
            color,
            font,
        } => {
            let mut e = format!("Border::titled(\"{}\")", escape(title));
            if *position != Default::default() {
                e.push_str(&format!(".with_position(TitlePosition::{position:?})"));
            }
            if *justification != Default::default() {
                e.push_str(&format!(
                    ".with_justification(TitleJustification::{justification:?})"
                ));
            }
            if let Some(c) = color {
                e.push_str(&format!(".with_color({})", color_expr(*c)));
            }
            if let Some(f) = font {
                e.push_str(&format!(".with_font({})", font_expr(f)));
            }
            e
        }
        BorderSpec::Etched {
            style,
            highlight,
            shadow,
        } => {
            let mut e = format!("Border::etched(EtchStyle::{style:?})");
            if let Some(c) = highlight {
                e.push_str(&format!(".with_highlight({})", color_expr(*c)));
            }
            if let Some(c) = shadow {
                e.push_str(&format!(".with_shadow({})", color_expr(*c)));
            }
            e
        }
        BorderSpec::Compound { outer, inner } => format!(
            "Border::compound({}, {})",
            border_expr(outer.as_deref()?)?,
            border_expr(inner.as_deref()?)?
        ),
    };
    Some(expr)
}

fn grid_cell_stmt(var: &str, c: &GridCell) -> String {
    format!(
        "let {var} = GridCell {{\n    x: {},\n    y: {},\n    width: {},\n    height: {},\n    \
         weight_x: {:?},\n    weight_y: {:?},\n    fill: Fill::{},\n    anchor: Anchor::{},\n    \
         pad_x: {},\n    pad_y: {},\n    insets: {},\n}};\n",
        c.x,
        c.y,
        c.width,
        c.height,
        c.weight_x,
        c.weight_y,
        c.fill.name(),
        c.anchor.name(),
        c.pad_x,
        c.pad_y,
        insets_expr(&c.insets)
    )
}
