//! One open design: the graph, its menus, the user's own code and where it is saved.

use crate::codegen::{self, EmitOptions};
use crate::error::DesignError;
use crate::graph::{DesignEvent, DesignGraph};
use crate::merge::{USER_CODE_MARKER, append_missing_lines, extract_user_code, merge_user_code};
use crate::project::ProjectDocument;
use crate::resources::ResourceTable;
use crate::settings::DesignerSettings;
use crate::sync;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub struct Session {
    graph: DesignGraph,
    menus: ResourceTable,
    /// Text that follows the user-code marker, kept verbatim.
    user_code: String,
    current_file: Option<PathBuf>,
    options: EmitOptions,
    generated: String,
    stale: Rc<Cell<bool>>,
    modified: Rc<Cell<bool>>,
}

impl Session {
    pub fn new(settings: DesignerSettings) -> Self {
        let mut session = Self {
            graph: DesignGraph::with_settings(settings),
            menus: ResourceTable::new(),
            user_code: String::new(),
            current_file: None,
            options: EmitOptions::default(),
            generated: String::new(),
            stale: Rc::new(Cell::new(true)),
            modified: Rc::new(Cell::new(false)),
        };
        session.watch_graph();
        session
    }

    fn watch_graph(&mut self) {
        let stale = Rc::clone(&self.stale);
        let modified = Rc::clone(&self.modified);
        self.graph.add_listener(move |ev, _, _| {
            if *ev == DesignEvent::DesignChanged {
                stale.set(true);
                modified.set(true);
            }
        });
    }

    fn install(&mut self, mut graph: DesignGraph, menus: ResourceTable, user_code: String) {
        graph.activate_context_menus();
        self.graph = graph;
        self.menus = menus;
        self.user_code = user_code;
        self.watch_graph();
        self.stale.set(true);
        self.modified.set(false);
    }

    pub fn graph(&self) -> &DesignGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut DesignGraph {
        &mut self.graph
    }

    pub fn menus(&self) -> &ResourceTable {
        &self.menus
    }

    /// Menu edits count as design changes.
    pub fn menus_mut(&mut self) -> &mut ResourceTable {
        self.stale.set(true);
        self.modified.set(true);
        &mut self.menus
    }

    pub fn user_code(&self) -> &str {
        &self.user_code
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified.get()
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EmitOptions) {
        if options != self.options {
            self.options = options;
            self.stale.set(true);
        }
    }

    /// Discards the current design, keeping the designer settings.
    pub fn new_project(&mut self) {
        let settings = self.graph.settings().clone();
        self.install(DesignGraph::with_settings(settings), ResourceTable::new(), String::new());
        self.current_file = None;
        tracing::info!("started new project");
    }

    pub fn to_document(&mut self) -> ProjectDocument {
        sync::export(&self.graph, &mut self.menus, &self.user_code)
    }

    pub fn to_json(&mut self) -> Result<String, DesignError> {
        self.to_document().to_json()
    }

    /// Replaces the current design with the one in `json`. On error nothing changes.
    pub fn load_json(&mut self, json: &str) -> Result<(), DesignError> {
        let doc = ProjectDocument::from_json(json)?;
        self.load_document(&doc)
    }

    pub fn load_document(&mut self, doc: &ProjectDocument) -> Result<(), DesignError> {
        let (graph, menus) = sync::import_with_settings(doc, self.graph.settings().clone())?;
        self.install(graph, menus, doc.user_code.clone());
        Ok(())
    }

    pub fn open(&mut self, path: &Path) -> Result<(), DesignError> {
        let doc = ProjectDocument::read(path)?;
        self.load_document(&doc)?;
        self.current_file = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), nodes = doc.root.count(), "opened project");
        Ok(())
    }

    /// Saves to the current file. Returns `false` when there is none yet.
    pub fn save(&mut self) -> Result<bool, DesignError> {
        let Some(path) = self.current_file.clone() else {
            return Ok(false);
        };
        self.save_as(&path)?;
        Ok(true)
    }

    pub fn save_as(&mut self, path: &Path) -> Result<(), DesignError> {
        self.to_document().write(path)?;
        self.current_file = Some(path.to_path_buf());
        self.modified.set(false);
        tracing::info!(path = %path.display(), "saved project");
        Ok(())
    }

    /// Generated code followed by the marker and the user's code. Regenerated only
    /// when the design, the menus or the options changed since the last call.
    pub fn generated_code(&mut self) -> &str {
        if self.stale.replace(false) {
            let code = codegen::emit(&self.graph, &mut self.menus, &self.options);
            let cached = format!("{USER_CODE_MARKER}{}", self.user_code);
            self.generated = merge_user_code(&code, &cached);
        }
        &self.generated
    }

    /// Takes the user's section back from an edited copy of the generated code.
    pub fn update_from_code(&mut self, edited: &str) {
        let user = extract_user_code(edited).unwrap_or_default();
        if user != self.user_code {
            self.user_code = user.to_string();
            self.stale.set(true);
            self.modified.set(true);
        }
    }

    /// Adds the lines of `snippet` that the user code does not have yet.
    pub fn append_user_lines(&mut self, snippet: &str) {
        let merged = append_missing_lines(&self.user_code, snippet);
        if merged != self.user_code {
            self.user_code = merged;
            self.stale.set(true);
            self.modified.set(true);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DesignerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DropPayload;
    use crate::resources::PopupMenu;
    use crate::widget::Point;
    use pretty_assertions::assert_eq;

    fn with_button() -> Session {
        let mut s = Session::default();
        s.graph_mut()
            .drop_widget(&DropPayload::new("Button"), Point::new(10, 10))
            .unwrap();
        s
    }

    #[test]
    fn test_code_is_regenerated_on_change() {
        let mut s = with_button();
        let first = s.generated_code().to_string();
        assert!(first.contains("let button1 = Button::new();"));
        assert!(first.ends_with(&format!("{USER_CODE_MARKER}\n")));

        s.graph_mut()
            .drop_widget(&DropPayload::new("Label"), Point::new(10, 100))
            .unwrap();
        assert!(s.generated_code().contains("let label2 = Label::new();"));
    }

    #[test]
    fn test_user_code_survives_regeneration() {
        let mut s = with_button();
        let edited = format!("{}\nfn on_click() {{}}\n", s.generated_code());
        s.update_from_code(&edited);
        assert_eq!(s.user_code(), "\n\nfn on_click() {}\n");
        s.graph_mut().external_property_changed();
        assert!(s.generated_code().ends_with("fn on_click() {}\n"));
    }

    #[test]
    fn test_json_round_trip_and_failed_load() {
        let mut s = with_button();
        s.append_user_lines("fn helper() {}");
        let json = s.to_json().unwrap();

        let mut other = Session::default();
        other.load_json(&json).unwrap();
        assert_eq!(other.graph().len(), 2);
        assert_eq!(other.user_code(), "fn helper() {}");
        assert!(!other.is_modified());

        assert!(other.load_json("{ not json").is_err());
        assert_eq!(other.graph().len(), 2);
    }

    #[test]
    fn test_new_project_resets() {
        let mut s = with_button();
        assert!(s.is_modified());
        s.new_project();
        assert_eq!(s.graph().len(), 1);
        assert!(!s.is_modified());
        assert_eq!(s.current_file(), None);
    }

    #[test]
    fn test_listener_survives_load() {
        let mut s = Session::default();
        let json = with_button().to_json().unwrap();
        s.load_json(&json).unwrap();
        s.generated_code();
        s.graph_mut()
            .drop_widget(&DropPayload::new("Slider"), Point::new(300, 300))
            .unwrap();
        assert!(s.is_modified());
        assert!(s.generated_code().contains("Slider::new()"));
    }

    #[test]
    fn test_menu_edits_mark_the_project_modified() {
        let mut s = Session::default();
        let json = with_button().to_json().unwrap();
        s.load_json(&json).unwrap();
        assert!(!s.is_modified());
        s.menus_mut().put_menu("ctx", PopupMenu::default());
        assert!(s.is_modified());
        assert!(s.generated_code().contains("let ctx = PopupMenu::new();"));
    }

    #[test]
    fn test_save_without_file_asks_for_one() {
        let mut s = with_button();
        assert!(!s.save().unwrap());
    }

    #[test]
    fn test_save_and_open() {
        let path = std::env::temp_dir().join(format!("rad-session-{}.json", std::process::id()));
        let mut s = with_button();
        s.save_as(&path).unwrap();
        assert!(!s.is_modified());

        let mut other = Session::default();
        other.open(&path).unwrap();
        assert_eq!(other.current_file(), Some(path.as_path()));
        assert!(other.graph().find_by_name("button1").is_some());
        let _ = std::fs::remove_file(&path);
    }
}
