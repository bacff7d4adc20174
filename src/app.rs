use crate::highlight::{self, Highlighter};
use egui::{Color32, CornerRadius, Pos2, Rect, Sense, Stroke, pos2, vec2};
use egui_extras::{Column, TableBuilder};
use rad_form_designer::codegen::{self, CodeGenFormat};
use rad_form_designer::graph::{CursorHint, RESIZE_HANDLE};
use rad_form_designer::project::MenuItemSpec;
use rad_form_designer::property::{PropertyDescriptor, PropertyType};
use rad_form_designer::resources::{MenuId, PopupMenu};
use rad_form_designer::settings::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use rad_form_designer::widget::style::Rgba;
use rad_form_designer::{
    DesignerSettings, DropPayload, LayoutStrategy, Point, PropertyBag, Region, Session, WidgetId,
    WidgetKind,
};
use std::path::{Path, PathBuf};

const PROJECT_FILTER: (&str, &[&str]) = ("Form Design", &["json", "rad"]);
const CONSOLE_LIMIT: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum RightTab {
    #[default]
    Inspector,
    Menus,
    Code,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Severity {
    Info,
    Error,
}

struct ConsoleLine {
    time: String,
    severity: Severity,
    text: String,
}

/// Pending text in the inspector: property name and what has been typed so far.
type PendingEdit = Option<(&'static str, String)>;

pub struct DesignerApp {
    session: Session,
    settings_path: PathBuf,
    palette_open: bool,
    show_grid: bool,
    /// Kind being dragged out of the palette
    spawning: Option<WidgetKind>,
    right_panel_tab: RightTab,
    inspector_target: Option<WidgetId>,
    pending_edit: PendingEdit,
    highlighter: Highlighter,
    /// Whether to show syntax highlighting (editing needs it off)
    syntax_highlighting: bool,
    code_buffer: String,
    new_menu_name: String,
    new_item_label: String,
    new_item_action: String,
    console: Vec<ConsoleLine>,
}

impl DesignerApp {
    pub fn new(settings: DesignerSettings, settings_path: PathBuf) -> Self {
        Self {
            session: Session::new(settings),
            settings_path,
            palette_open: true,
            show_grid: true,
            spawning: None,
            right_panel_tab: RightTab::default(),
            inspector_target: None,
            pending_edit: None,
            highlighter: Highlighter::new(),
            syntax_highlighting: true,
            code_buffer: String::new(),
            new_menu_name: String::new(),
            new_item_label: String::new(),
            new_item_action: String::new(),
            console: Vec::new(),
        }
    }

    fn log(&mut self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        match severity {
            Severity::Info => tracing::info!("{text}"),
            Severity::Error => tracing::error!("{text}"),
        }
        self.console.push(ConsoleLine {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            severity,
            text,
        });
        if self.console.len() > CONSOLE_LIMIT {
            let excess = self.console.len() - CONSOLE_LIMIT;
            self.console.drain(..excess);
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.log(Severity::Info, text);
    }

    fn error(&mut self, text: impl Into<String>) {
        self.log(Severity::Error, text);
    }

    fn save_settings(&mut self) {
        let result = self.session.graph().settings().save(&self.settings_path);
        if let Err(e) = result {
            self.error(format!("Could not save settings: {e}"));
        }
    }

    // ----- files -----------------------------------------------------------------

    fn new_project(&mut self) {
        self.session.new_project();
        self.pending_edit = None;
        self.info("New project created");
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(PROJECT_FILTER.0, PROJECT_FILTER.1)
            .pick_file()
        {
            self.open_project(&path);
        }
    }

    fn open_project(&mut self, path: &Path) {
        match self.session.open(path) {
            Ok(()) => {
                self.pending_edit = None;
                self.info(format!("Opened {}", path.display()));
            }
            Err(e) => self.error(format!("Open failed: {e}")),
        }
    }

    fn save(&mut self) {
        match self.session.save() {
            Ok(true) => self.info("Saved"),
            Ok(false) => self.save_as_dialog(),
            Err(e) => self.error(format!("Save failed: {e}")),
        }
    }

    fn save_as_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(PROJECT_FILTER.0, PROJECT_FILTER.1)
            .set_file_name("form.json")
            .save_file()
        {
            match self.session.save_as(&path) {
                Ok(()) => self.info(format!("Saved to {}", path.display())),
                Err(e) => self.error(format!("Save failed: {e}")),
            }
        }
    }

    // ----- menu bar ----------------------------------------------------------------

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New Project").on_hover_text("Ctrl+N").clicked() {
                    self.new_project();
                    ui.close_kind(egui::UiKind::Menu);
                }
                ui.separator();
                if ui.button("Open...").on_hover_text("Ctrl+O").clicked() {
                    self.open_dialog();
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui.button("Save").on_hover_text("Ctrl+S").clicked() {
                    self.save();
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui.button("Save As...").clicked() {
                    self.save_as_dialog();
                    ui.close_kind(egui::UiKind::Menu);
                }
            });

            ui.menu_button("Edit", |ui| {
                let has_selection = self
                    .session
                    .graph()
                    .selected()
                    .is_some_and(|id| id != self.session.graph().root());
                ui.add_enabled_ui(has_selection, |ui| {
                    if ui.button("Delete").on_hover_text("Del").clicked() {
                        self.session.graph_mut().remove_selected();
                        ui.close_kind(egui::UiKind::Menu);
                    }
                    ui.separator();
                    if ui.button("Bring to Front").on_hover_text("]").clicked() {
                        self.session.graph_mut().bring_to_front();
                        ui.close_kind(egui::UiKind::Menu);
                    }
                    if ui.button("Send to Back").on_hover_text("[").clicked() {
                        self.session.graph_mut().send_to_back();
                        ui.close_kind(egui::UiKind::Menu);
                    }
                    ui.menu_button("Align", |ui| {
                        let graph = self.session.graph_mut();
                        let done = if ui.button("Left").clicked() {
                            Some(graph.align_left())
                        } else if ui.button("Right").clicked() {
                            Some(graph.align_right())
                        } else if ui.button("Top").clicked() {
                            Some(graph.align_top())
                        } else if ui.button("Bottom").clicked() {
                            Some(graph.align_bottom())
                        } else if ui.button("Center Horizontally").clicked() {
                            Some(graph.align_center_h())
                        } else if ui.button("Center Vertically").clicked() {
                            Some(graph.align_center_v())
                        } else {
                            None
                        };
                        if done.is_some() {
                            ui.close_kind(egui::UiKind::Menu);
                        }
                    });
                });
            });

            ui.menu_button("View", |ui| {
                ui.checkbox(&mut self.palette_open, "Palette");
                ui.checkbox(&mut self.show_grid, "Show grid");
                ui.separator();
                let mut settings = self.session.graph().settings().clone();
                ui.checkbox(&mut settings.snap_to_grid, "Snap to grid");
                ui.checkbox(&mut settings.lock_components, "Lock components");
                ui.horizontal(|ui| {
                    ui.label("Grid size:");
                    ui.add(
                        egui::DragValue::new(&mut settings.grid_size)
                            .range(MIN_GRID_SIZE..=MAX_GRID_SIZE),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Grid color:");
                    let mut color = to_color32(settings.grid_color);
                    if egui::color_picker::color_edit_button_srgba(
                        ui,
                        &mut color,
                        egui::color_picker::Alpha::OnlyBlend,
                    )
                    .changed()
                    {
                        let [r, g, b, a] = color.to_srgba_unmultiplied();
                        settings.grid_color = Rgba::rgba(r, g, b, a);
                    }
                });
                if &settings != self.session.graph().settings() {
                    let graph = self.session.graph_mut();
                    graph.set_snap_to_grid(settings.snap_to_grid);
                    graph.set_lock_components(settings.lock_components);
                    graph.set_grid_size(settings.grid_size);
                    graph.set_grid_color(settings.grid_color);
                    self.save_settings();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let file = self
                    .session
                    .current_file()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "untitled".to_string());
                let marker = if self.session.is_modified() { "*" } else { "" };
                ui.label(format!("{file}{marker}"));
            });
        });
    }

    // ----- palette ---------------------------------------------------------------

    fn palette_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Palette");
        ui.separator();
        ui.label("Drag a component onto the form");
        ui.add_space(4.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::CollapsingHeader::new("Components")
                    .default_open(true)
                    .show(ui, |ui| {
                        for kind in WidgetKind::ALL.into_iter().filter(|k| !k.is_container()) {
                            self.palette_item(ui, kind);
                        }
                    });
                egui::CollapsingHeader::new("Containers")
                    .default_open(true)
                    .show(ui, |ui| {
                        for kind in WidgetKind::ALL.into_iter().filter(|k| k.is_container()) {
                            self.palette_item(ui, kind);
                        }
                    });

                ui.add_space(8.0);
                ui.separator();
                egui::CollapsingHeader::new("Shortcuts")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.small("Arrows: nudge (Shift: x10)");
                        ui.small("Delete: remove");
                        ui.small("] / [: z-order");
                        ui.small("Ctrl+N/O/S: new, open, save");
                    });
            });
    }

    fn palette_item(&mut self, ui: &mut egui::Ui, kind: WidgetKind) {
        let r = ui.add(egui::Button::new(kind.name()).sense(Sense::drag()));
        if r.drag_started() {
            self.spawning = Some(kind);
        }
    }

    // ----- canvas ------------------------------------------------------------------

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let canvas = self.session.graph().settings().canvas_size;
        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let desired = vec2(canvas.width as f32, canvas.height as f32);
                let (rect, resp) = ui.allocate_exact_size(desired, Sense::click_and_drag());
                let to_design = |p: Pos2| {
                    Point::new(
                        (p.x - rect.left()).round() as i32,
                        (p.y - rect.top()).round() as i32,
                    )
                };

                if self.spawning.is_none() {
                    let graph = self.session.graph_mut();
                    if resp.drag_started_by(egui::PointerButton::Primary)
                        && let Some(p) = ui.input(|i| i.pointer.press_origin())
                    {
                        graph.pointer_pressed(to_design(p));
                    }
                    if resp.dragged_by(egui::PointerButton::Primary)
                        && let Some(p) = resp.interact_pointer_pos()
                    {
                        graph.pointer_dragged(to_design(p));
                    }
                    if resp.drag_stopped_by(egui::PointerButton::Primary) {
                        graph.pointer_released();
                    }
                    if resp.clicked()
                        && let Some(p) = resp.interact_pointer_pos()
                    {
                        graph.pointer_pressed(to_design(p));
                        graph.pointer_released();
                    }
                    if let Some(p) = resp.hover_pos() {
                        match graph.hover_cursor(to_design(p)) {
                            CursorHint::Default => {}
                            CursorHint::Move => ui.ctx().set_cursor_icon(egui::CursorIcon::Move),
                            CursorHint::ResizeSe => {
                                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNwSe)
                            }
                        }
                    }
                }

                self.paint_canvas(ui, rect);
                self.spawn_ui(ui, rect, to_design);
            });
    }

    fn paint_canvas(&self, ui: &egui::Ui, rect: Rect) {
        let graph = self.session.graph();
        let painter = ui.painter_at(rect);
        let root_fill = graph
            .node(graph.root())
            .and_then(|n| n.attrs().background)
            .map(to_color32)
            .unwrap_or(Color32::from_gray(28));
        painter.rect_filled(rect, 0.0, root_fill);
        if self.show_grid {
            draw_grid(&painter, rect, graph.settings());
        }

        for id in graph.subtree(graph.root()).into_iter().skip(1) {
            let (Some(node), Some(b)) = (graph.node(id), graph.canvas_bounds(id)) else {
                continue;
            };
            let r = Rect::from_min_size(
                rect.min + vec2(b.x as f32, b.y as f32),
                vec2(b.width as f32, b.height as f32),
            );
            let attrs = node.attrs();
            let fill = attrs
                .background
                .map(to_color32)
                .unwrap_or_else(|| default_fill(node.kind()));
            let fill = if attrs.visible { fill } else { fill.gamma_multiply(0.4) };
            painter.rect_filled(r, CornerRadius::same(3), fill);
            painter.rect_stroke(
                r,
                CornerRadius::same(3),
                Stroke::new(1.0, Color32::from_gray(90)),
                egui::StrokeKind::Inside,
            );

            let text_color = attrs
                .foreground
                .map(to_color32)
                .unwrap_or(Color32::from_gray(220));
            let text_color = if attrs.enabled {
                text_color
            } else {
                text_color.gamma_multiply(0.5)
            };
            if node.kind().is_container() {
                painter.text(
                    r.min + vec2(4.0, 2.0),
                    egui::Align2::LEFT_TOP,
                    node.name().unwrap_or(node.kind().name()),
                    egui::FontId::proportional(11.0),
                    text_color,
                );
            } else {
                painter.text(
                    r.center(),
                    egui::Align2::CENTER_CENTER,
                    caption(node.kind(), attrs),
                    egui::FontId::proportional(13.0),
                    text_color,
                );
            }
        }

        if let Some(id) = graph.selected().filter(|id| *id != graph.root())
            && let Some(b) = graph.canvas_bounds(id)
        {
            let r = Rect::from_min_size(
                rect.min + vec2(b.x as f32, b.y as f32),
                vec2(b.width as f32, b.height as f32),
            );
            painter.rect_stroke(
                r,
                CornerRadius::same(3),
                Stroke::new(2.0, Color32::LIGHT_BLUE),
                egui::StrokeKind::Outside,
            );
            let hs = RESIZE_HANDLE as f32;
            let handle = Rect::from_min_size(r.max - vec2(hs, hs), vec2(hs, hs));
            painter.rect_filled(handle, 2.0, Color32::from_rgb(100, 160, 255));
        }
    }

    /// Ghost under the pointer while a palette item is dragged, and the drop itself.
    fn spawn_ui(&mut self, ui: &egui::Ui, rect: Rect, to_design: impl Fn(Pos2) -> Point) {
        let Some(kind) = self.spawning else {
            return;
        };
        if let Some(mouse) = ui.ctx().pointer_interact_pos() {
            let size = kind.default_size();
            let ghost = Rect::from_min_size(mouse, vec2(size.width as f32, size.height as f32));
            let layer = egui::LayerId::new(egui::Order::Tooltip, egui::Id::new("ghost"));
            let painter = ui.ctx().layer_painter(layer);
            painter.rect_filled(ghost, 4.0, Color32::from_gray(40));
            painter.rect_stroke(
                ghost,
                CornerRadius::same(4),
                Stroke::new(1.0, Color32::LIGHT_BLUE),
                egui::StrokeKind::Outside,
            );
        }

        if ui.input(|i| i.pointer.any_released()) {
            if let Some(pos) = ui.ctx().pointer_interact_pos()
                && rect.contains(pos)
            {
                let at = to_design(pos);
                let payload = self.drop_payload(kind, at);
                if let Err(e) = self.session.graph_mut().drop_widget(&payload, at) {
                    self.error(format!("Drop failed: {e}"));
                }
            }
            self.spawning = None;
        }
    }

    /// Picks a region from where the pointer sits inside a border-region container.
    fn drop_payload(&self, kind: WidgetKind, at: Point) -> DropPayload {
        let payload = DropPayload::new(kind.name());
        let graph = self.session.graph();
        let target = graph.container_at(at, None);
        if !graph.layout_of(target).is_border_regions() {
            return payload;
        }
        let Some(b) = graph.canvas_bounds(target) else {
            return payload;
        };
        let (fx, fy) = (
            (at.x - b.x) as f32 / b.width.max(1) as f32,
            (at.y - b.y) as f32 / b.height.max(1) as f32,
        );
        let region = if fy < 0.25 {
            Region::North
        } else if fy > 0.75 {
            Region::South
        } else if fx < 0.25 {
            Region::West
        } else if fx > 0.75 {
            Region::East
        } else {
            Region::Center
        };
        payload.with_region(region)
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete, dx, dy, front, back, new, open, save) = ctx.input(|i| {
            let step = if i.modifiers.shift { 10 } else { 1 };
            let mut dx = 0;
            let mut dy = 0;
            if i.key_pressed(egui::Key::ArrowLeft) {
                dx -= step;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                dx += step;
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                dy -= step;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                dy += step;
            }
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                dx,
                dy,
                i.key_pressed(egui::Key::CloseBracket),
                i.key_pressed(egui::Key::OpenBracket),
                i.modifiers.command && i.key_pressed(egui::Key::N),
                i.modifiers.command && i.key_pressed(egui::Key::O),
                i.modifiers.command && i.key_pressed(egui::Key::S),
            )
        });

        let graph = self.session.graph_mut();
        if delete {
            graph.remove_selected();
        }
        if dx != 0 || dy != 0 {
            graph.nudge_selection(dx, dy);
        }
        if front {
            graph.bring_to_front();
        }
        if back {
            graph.send_to_back();
        }
        if new {
            self.new_project();
        }
        if open {
            self.open_dialog();
        }
        if save {
            self.save();
        }
    }

    // ----- inspector ---------------------------------------------------------------

    fn inspector_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Inspector");
        ui.separator();
        let Some(id) = self.session.graph().selected() else {
            ui.label("Select a component to edit its properties.");
            return;
        };
        if self.inspector_target != Some(id) {
            self.inspector_target = Some(id);
            self.pending_edit = None;
        }

        let rows: Vec<(PropertyDescriptor, String)> = match self.session.graph_mut().properties(id) {
            Some(bag) => bag
                .list()
                .into_iter()
                .filter(|d| d.readable)
                .map(|d| {
                    let value = bag.get(d.name).map(|v| v.to_string()).unwrap_or_default();
                    (d, value)
                })
                .collect(),
            None => return,
        };

        let mut commits: Vec<(&'static str, String)> = Vec::new();
        let pending = &mut self.pending_edit;
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(100.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Property");
                });
                header.col(|ui| {
                    ui.strong("Value");
                });
            })
            .body(|mut body| {
                for (d, value) in &rows {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.label(d.name);
                        });
                        row.col(|ui| {
                            property_editor(ui, d, value, pending, &mut commits);
                        });
                    });
                }
            });

        for (name, text) in commits {
            let result = match self.session.graph_mut().properties(id) {
                Some(mut bag) => bag.set_text(name, &text),
                None => continue,
            };
            match result {
                Ok(()) => self.session.graph_mut().external_property_changed(),
                Err(e) => self.error(format!("{name}: {e}")),
            }
        }

        ui.add_space(8.0);
        self.context_menu_picker(ui, id);
    }

    fn context_menu_picker(&mut self, ui: &mut egui::Ui, id: WidgetId) {
        let current = self
            .session
            .graph()
            .node(id)
            .and_then(|n| n.context_menu())
            .map(|m| m.menu());
        let menus = self.session.menus();
        let current_text = match current {
            Some(m) => menus.name_of(m).unwrap_or("(unnamed)").to_string(),
            None => "(none)".to_string(),
        };
        let names: Vec<String> = menus.names().map(str::to_string).collect();

        let mut choice: Option<Option<MenuId>> = None;
        ui.horizontal(|ui| {
            ui.label("Context menu:");
            egui::ComboBox::from_id_salt(("context_menu", id))
                .selected_text(current_text)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(current.is_none(), "(none)").clicked() {
                        choice = Some(None);
                    }
                    for name in &names {
                        let menu = self.session.menus().get(name);
                        if ui.selectable_label(menu == current, name).clicked() {
                            choice = Some(menu);
                        }
                    }
                });
        });
        if let Some(menu) = choice {
            self.session.graph_mut().set_context_menu(id, menu);
        }
    }

    // ----- menus -----------------------------------------------------------------

    fn menus_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Pop-up Menus");
        ui.separator();
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.new_menu_name);
            let name = self.new_menu_name.trim().to_string();
            let taken = self.session.menus().get(&name).is_some();
            if ui
                .add_enabled(!name.is_empty() && !taken, egui::Button::new("Add menu"))
                .clicked()
            {
                self.session.menus_mut().put_menu(name.clone(), PopupMenu::default());
                self.new_menu_name.clear();
                self.info(format!("Added menu {name}"));
            }
        });
        ui.add_space(4.0);

        let names: Vec<String> = self.session.menus().names().map(str::to_string).collect();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for name in names {
                    let Some(menu_id) = self.session.menus().get(&name) else {
                        continue;
                    };
                    egui::CollapsingHeader::new(name.as_str())
                        .id_salt(("menu", menu_id))
                        .show(ui, |ui| self.menu_items_ui(ui, &name, menu_id));
                }
            });
    }

    fn menu_items_ui(&mut self, ui: &mut egui::Ui, name: &str, menu_id: MenuId) {
        let items = self
            .session
            .menus()
            .menu(menu_id)
            .map(|m| m.items.clone())
            .unwrap_or_default();
        let mut remove_item = None;
        for (i, item) in items.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(format!("{} -> {}", item.label, item.action));
                if ui.small_button("x").clicked() {
                    remove_item = Some(i);
                }
            });
        }
        if let Some(i) = remove_item
            && let Some(menu) = self.session.menus_mut().menu_mut(menu_id)
        {
            menu.items.remove(i);
        }

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_item_label)
                    .hint_text("label")
                    .desired_width(80.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.new_item_action)
                    .hint_text("action")
                    .desired_width(80.0),
            );
            let can_add = !self.new_item_label.trim().is_empty();
            if ui.add_enabled(can_add, egui::Button::new("Add item")).clicked()
                && let Some(menu) = self.session.menus_mut().menu_mut(menu_id)
            {
                menu.items.push(MenuItemSpec::new(
                    self.new_item_label.trim(),
                    self.new_item_action.trim(),
                ));
                self.new_item_label.clear();
                self.new_item_action.clear();
            }
        });
        if ui.button("Remove menu").clicked() {
            self.session.menus_mut().remove(name);
            self.info(format!("Removed menu {name}"));
        }
    }

    // ----- code --------------------------------------------------------------------

    fn code_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Generated Code");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.checkbox(&mut self.syntax_highlighting, "Syntax Highlighting")
                    .on_hover_text("Turn off to edit the user section");
            });
        });

        let mut options = self.session.options().clone();
        ui.horizontal(|ui| {
            ui.label("Output format:");
            egui::ComboBox::from_id_salt("codegen_format")
                .selected_text(options.format.display_name())
                .show_ui(ui, |ui| {
                    for format in CodeGenFormat::ALL {
                        ui.selectable_value(&mut options.format, format, format.display_name());
                    }
                });
            if ui
                .button("Stub menu actions")
                .on_hover_text("Add an empty handler for every menu action to the user code")
                .clicked()
            {
                let stubs = self.action_stubs();
                self.session.append_user_lines(&stubs);
            }
        });
        self.session.set_options(options);
        ui.separator();

        if self.syntax_highlighting {
            let code = self.session.generated_code();
            highlight::code_viewer(ui, &mut self.highlighter, code);
        } else {
            let code = self.session.generated_code();
            if self.code_buffer != code {
                self.code_buffer = code.to_string();
            }
            if highlight::code_editor(ui, &mut self.code_buffer) {
                self.session.update_from_code(&self.code_buffer);
            }
        }
    }

    fn action_stubs(&self) -> String {
        let menus = self.session.menus();
        let mut out = String::new();
        for name in menus.names() {
            let Some(menu) = menus.get(name).and_then(|id| menus.menu(id)) else {
                continue;
            };
            for item in menu.items.iter().filter(|it| !it.action.trim().is_empty()) {
                out.push_str(&format!("fn on_{}() {{}}\n", codegen::ident(item.action.trim())));
            }
        }
        out
    }

    fn console_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong("Console");
            if ui.small_button("Clear").clicked() {
                self.console.clear();
            }
        });
        egui::ScrollArea::vertical()
            .id_salt("console_scroll")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.console {
                    let color = match line.severity {
                        Severity::Info => ui.visuals().text_color(),
                        Severity::Error => Color32::from_rgb(230, 90, 90),
                    };
                    ui.colored_label(color, format!("[{}] {}", line.time, line.text));
                }
            });
    }
}

fn property_editor(
    ui: &mut egui::Ui,
    d: &PropertyDescriptor,
    value: &str,
    pending: &mut PendingEdit,
    commits: &mut Vec<(&'static str, String)>,
) {
    if !d.writable {
        ui.label(value);
        return;
    }
    match d.ty {
        PropertyType::Bool => {
            let mut on = value == "true";
            if ui.checkbox(&mut on, "").changed() {
                commits.push((d.name, on.to_string()));
            }
        }
        PropertyType::Layout => choice_box(ui, d.name, value, &LayoutStrategy::NAMES, commits),
        PropertyType::Region => {
            let mut options = vec![""];
            options.extend(Region::ALL.iter().map(|r| r.token()));
            choice_box(ui, d.name, value, &options, commits);
        }
        PropertyType::PositionMode => {
            choice_box(ui, d.name, value, &["Absolute", "Managed"], commits)
        }
        _ => {
            let mut buf = match pending {
                Some((name, text)) if *name == d.name => text.clone(),
                _ => value.to_string(),
            };
            let resp = ui.add(egui::TextEdit::singleline(&mut buf).desired_width(f32::INFINITY));
            if resp.changed() {
                *pending = Some((d.name, buf));
            }
            if resp.lost_focus()
                && let Some((name, text)) = pending.take_if(|(name, _)| *name == d.name)
                && text != value
            {
                commits.push((name, text));
            }
        }
    }
}

fn choice_box(
    ui: &mut egui::Ui,
    name: &'static str,
    value: &str,
    options: &[&str],
    commits: &mut Vec<(&'static str, String)>,
) {
    egui::ComboBox::from_id_salt(("property", name))
        .selected_text(value)
        .show_ui(ui, |ui| {
            for option in options {
                let label = if option.is_empty() { "(none)" } else { *option };
                if ui.selectable_label(value == *option, label).clicked() && value != *option {
                    commits.push((name, option.to_string()));
                }
            }
        });
}

fn draw_grid(painter: &egui::Painter, rect: Rect, settings: &DesignerSettings) {
    let g = settings.grid_size.max(4) as f32;
    let stroke = Stroke::new(1.0, to_color32(settings.grid_color));
    let cols = (rect.width() / g) as i32;
    let rows = (rect.height() / g) as i32;
    for c in 0..=cols {
        let x = rect.left() + c as f32 * g;
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
    }
    for r in 0..=rows {
        let y = rect.top() + r as f32 * g;
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
    }
}

fn to_color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), c.a())
}

fn default_fill(kind: WidgetKind) -> Color32 {
    if kind.is_container() {
        Color32::from_gray(45)
    } else {
        Color32::from_gray(62)
    }
}

fn caption(kind: WidgetKind, attrs: &rad_form_designer::NodeAttributes) -> String {
    use rad_form_designer::model::Content;
    match &attrs.content {
        Some(Content::Text(s) | Content::SelectedItem(s)) if !s.is_empty() => s.clone(),
        Some(Content::Value(v)) => format!("{} {v}", kind.name()),
        _ => kind.name().to_string(),
    }
}

impl eframe::App for DesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("menubar").show(ctx, |ui| self.top_bar(ui));
        egui::TopBottomPanel::bottom("console")
            .resizable(true)
            .default_height(100.0)
            .show(ctx, |ui| self.console_ui(ui));
        if self.palette_open {
            egui::SidePanel::left("palette")
                .resizable(true)
                .default_width(200.0)
                .show(ctx, |ui| self.palette_ui(ui));
        }
        egui::SidePanel::right("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.right_panel_tab, RightTab::Inspector, "Inspector");
                    ui.selectable_value(&mut self.right_panel_tab, RightTab::Menus, "Menus");
                    ui.selectable_value(&mut self.right_panel_tab, RightTab::Code, "Code");
                });
                ui.separator();

                match self.right_panel_tab {
                    RightTab::Inspector => self.inspector_ui(ui),
                    RightTab::Menus => self.menus_ui(ui),
                    RightTab::Code => self.code_ui(ui),
                }
            });
        egui::CentralPanel::default().show(ctx, |ui| self.canvas_ui(ui));

        if self.spawning.is_some() {
            ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
        }
    }
}
