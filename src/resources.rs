//! Shared, named pop-up menus.
//!
//! A menu is attached to nodes by reference, so many nodes can share one menu. The
//! table owns every menu instance; only some of them carry a name. Unnamed menus are
//! given one the first time generated code needs to refer to them.

use crate::project::{MenuItemSpec, MenuSpec};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuId(usize);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopupMenu {
    pub items: Vec<MenuItemSpec>,
}

impl PopupMenu {
    pub fn new(items: Vec<MenuItemSpec>) -> Self {
        Self { items }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResourceTable {
    menus: Vec<PopupMenu>,
    /// Named entries in creation order.
    names: Vec<(String, MenuId)>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a menu without naming it.
    pub fn create(&mut self, menu: PopupMenu) -> MenuId {
        self.menus.push(menu);
        MenuId(self.menus.len() - 1)
    }

    /// Stores a menu under `name`, replacing whatever that name referred to before.
    pub fn put_menu(&mut self, name: impl Into<String>, menu: PopupMenu) -> MenuId {
        let id = self.create(menu);
        self.register(name, id);
        id
    }

    /// Binds `name` to an existing menu. The name keeps its original position when it
    /// already existed.
    pub fn register(&mut self, name: impl Into<String>, id: MenuId) {
        let name = name.into();
        match self.names.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = id,
            None => self.names.push((name, id)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<MenuId> {
        let pos = self.names.iter().position(|(n, _)| n == name)?;
        Some(self.names.remove(pos).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<MenuId> {
        self.names.iter().find(|(n, _)| n == name).map(|(_, id)| *id)
    }

    /// Reverse lookup by identity, not by value.
    pub fn name_of(&self, id: MenuId) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, m)| *m == id)
            .map(|(n, _)| n.as_str())
    }

    pub fn menu(&self, id: MenuId) -> Option<&PopupMenu> {
        self.menus.get(id.0)
    }

    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut PopupMenu> {
        self.menus.get_mut(id.0)
    }

    /// Names the menu `popupMenu<n>` unless it already has a name, and returns the name.
    pub fn ensure_named(&mut self, id: MenuId) -> String {
        if let Some(name) = self.name_of(id) {
            return name.to_string();
        }
        let mut n = self.names.len();
        let mut name = format!("popupMenu{n}");
        while self.get(&name).is_some() {
            n += 1;
            name = format!("popupMenu{n}");
        }
        self.register(name.clone(), id);
        name
    }

    /// Named menus in creation order, as persisted in a project document.
    pub fn to_specs(&self) -> Vec<MenuSpec> {
        self.names
            .iter()
            .filter_map(|(name, id)| {
                self.menu(*id).map(|m| MenuSpec {
                    name: name.clone(),
                    items: m.items.clone(),
                })
            })
            .collect()
    }

    pub fn from_specs(specs: &[MenuSpec]) -> Self {
        let mut table = Self::new();
        for spec in specs {
            table.put_menu(spec.name.clone(), PopupMenu::new(spec.items.clone()));
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(label: &str) -> PopupMenu {
        PopupMenu::new(vec![MenuItemSpec::new(label, label.to_lowercase())])
    }

    #[test]
    fn test_names_keep_creation_order() {
        let mut t = ResourceTable::new();
        t.put_menu("b", menu("B"));
        t.put_menu("a", menu("A"));
        assert_eq!(t.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut t = ResourceTable::new();
        let first = t.put_menu("ctx", menu("One"));
        t.put_menu("other", menu("X"));
        let second = t.put_menu("ctx", menu("Two"));
        assert_ne!(first, second);
        assert_eq!(t.get("ctx"), Some(second));
        assert_eq!(t.names().collect::<Vec<_>>(), vec!["ctx", "other"]);
    }

    #[test]
    fn test_reverse_lookup_is_by_identity() {
        let mut t = ResourceTable::new();
        let named = t.put_menu("ctx", menu("Same"));
        let anon = t.create(menu("Same"));
        assert_eq!(t.name_of(named), Some("ctx"));
        assert_eq!(t.name_of(anon), None);
    }

    #[test]
    fn test_ensure_named_is_stable() {
        let mut t = ResourceTable::new();
        t.put_menu("ctx", menu("A"));
        let anon = t.create(menu("B"));
        assert_eq!(t.ensure_named(anon), "popupMenu1");
        assert_eq!(t.ensure_named(anon), "popupMenu1");
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut t = ResourceTable::new();
        let id = t.put_menu("ctx", menu("A"));
        assert_eq!(t.remove("ctx"), Some(id));
        assert_eq!(t.remove("ctx"), None);
        assert!(t.is_empty());
        // The instance itself stays reachable for nodes still pointing at it.
        assert!(t.menu(id).is_some());
    }

    #[test]
    fn test_specs_round_trip() {
        let mut t = ResourceTable::new();
        t.put_menu("ctx", menu("Copy"));
        t.create(menu("unnamed"));
        let specs = t.to_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(ResourceTable::from_specs(&specs).to_specs(), specs);
    }
}
