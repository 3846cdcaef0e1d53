//! Context menu tree and keyboard navigation through it.
//!
//! The window system offers no popup menus, so the menu is a small state
//! machine: it is opened by a right click, the current level is shown as a
//! numbered prompt, and digits pick entries. Choosing a leaf yields its
//! [`MenuId`], which the [`ActionTable`](crate::ActionTable) turns into an
//! action.

use crate::action::{
    MENU_AXES_OFF, MENU_AXES_ON, MENU_DEBUG_OFF, MENU_DEBUG_ON, MENU_DEPTH_CUE_OFF,
    MENU_DEPTH_CUE_ON, MENU_ORTHO, MENU_PERSP, MENU_QUIT, MENU_RESET, MenuId, color_menu_id,
};
use crate::toggles::AxisColor;

#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Leaf { label: &'static str, id: MenuId },
    Submenu { label: &'static str, items: Vec<MenuItem> },
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Leaf { label, .. } | MenuItem::Submenu { label, .. } => label,
        }
    }
}

fn leaf(label: &'static str, id: MenuId) -> MenuItem {
    MenuItem::Leaf { label, id }
}

fn submenu(label: &'static str, items: Vec<MenuItem>) -> MenuItem {
    MenuItem::Submenu { label, items }
}

/// The full menu tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    root: Vec<MenuItem>,
}

impl Default for ContextMenu {
    fn default() -> Self {
        let colors = AxisColor::ALL
            .iter()
            .map(|&c| leaf(c.name(), color_menu_id(c)))
            .collect();

        Self {
            root: vec![
                submenu("Axes", vec![leaf("Off", MENU_AXES_OFF), leaf("On", MENU_AXES_ON)]),
                submenu("Axis Colors", colors),
                submenu(
                    "Depth Cue",
                    vec![leaf("Off", MENU_DEPTH_CUE_OFF), leaf("On", MENU_DEPTH_CUE_ON)],
                ),
                submenu(
                    "Projection",
                    vec![leaf("Orthographic", MENU_ORTHO), leaf("Perspective", MENU_PERSP)],
                ),
                leaf("Reset", MENU_RESET),
                submenu("Debug", vec![leaf("Off", MENU_DEBUG_OFF), leaf("On", MENU_DEBUG_ON)]),
                leaf("Quit", MENU_QUIT),
            ],
        }
    }
}

impl ContextMenu {
    pub fn root(&self) -> &[MenuItem] {
        &self.root
    }

    /// Every leaf id in the tree, depth first.
    pub fn leaf_ids(&self) -> Vec<MenuId> {
        fn walk(items: &[MenuItem], out: &mut Vec<MenuId>) {
            for item in items {
                match item {
                    MenuItem::Leaf { id, .. } => out.push(*id),
                    MenuItem::Submenu { items, .. } => walk(items, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }
}

/// Result of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Moved into a submenu or back up a level.
    Moved,
    /// A leaf was picked; the menu is now closed.
    Chosen(MenuId),
    Closed,
    /// No entry with that number at this level.
    Invalid,
}

/// Where the user currently is in the menu, if it is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuNavigator {
    /// Indices of the submenus entered from the root. `None` when closed.
    path: Option<Vec<usize>>,
}

impl MenuNavigator {
    pub fn open(&mut self) {
        self.path = Some(Vec::new());
    }

    pub fn close(&mut self) {
        self.path = None;
    }

    pub fn is_open(&self) -> bool {
        self.path.is_some()
    }

    /// Pick the 1-based entry `number` at the current level.
    pub fn select(&mut self, menu: &ContextMenu, number: usize) -> MenuOutcome {
        let Some(items) = self.current_items(menu) else {
            return MenuOutcome::Invalid;
        };
        let Some(index) = number.checked_sub(1) else {
            return MenuOutcome::Invalid;
        };
        match items.get(index) {
            Some(MenuItem::Leaf { id, .. }) => {
                let id = *id;
                self.close();
                MenuOutcome::Chosen(id)
            }
            Some(MenuItem::Submenu { .. }) => {
                if let Some(path) = &mut self.path {
                    path.push(index);
                }
                MenuOutcome::Moved
            }
            None => MenuOutcome::Invalid,
        }
    }

    /// Go up one level; leaving the root closes the menu.
    pub fn back(&mut self) -> MenuOutcome {
        match &mut self.path {
            Some(path) if !path.is_empty() => {
                path.pop();
                MenuOutcome::Moved
            }
            _ => {
                self.close();
                MenuOutcome::Closed
            }
        }
    }

    /// Entries at the current level, or `None` while closed.
    pub fn current_items<'m>(&self, menu: &'m ContextMenu) -> Option<&'m [MenuItem]> {
        let path = self.path.as_ref()?;
        let mut items = menu.root();
        for &index in path {
            match items.get(index) {
                Some(MenuItem::Submenu { items: inner, .. }) => items = inner,
                _ => return None,
            }
        }
        Some(items)
    }

    /// One-line prompt for the current level, e.g. `Axes: 1 Off  2 On`.
    pub fn prompt(&self, menu: &ContextMenu) -> Option<String> {
        let items = self.current_items(menu)?;
        let mut heading = String::from("Menu");
        let mut level = menu.root();
        for &index in self.path.as_deref().unwrap_or_default() {
            if let Some(MenuItem::Submenu { label, items }) = level.get(index) {
                heading = (*label).to_string();
                level = items;
            }
        }
        let entries: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{} {}", i + 1, item.label()))
            .collect();
        Some(format!("{heading}: {}", entries.join("  ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionTable, Action};
    use crate::toggles::Projection;

    #[test]
    fn test_every_leaf_has_an_action() {
        let menu = ContextMenu::default();
        let table = ActionTable::default();
        let ids = menu.leaf_ids();
        assert_eq!(ids.len(), 2 + 6 + 2 + 2 + 1 + 2 + 1);
        for id in ids {
            assert!(table.menu(id).is_some(), "menu id {id} unbound");
        }
    }

    #[test]
    fn test_choose_projection() {
        let menu = ContextMenu::default();
        let mut nav = MenuNavigator::default();
        assert!(!nav.is_open());
        nav.open();
        assert_eq!(nav.select(&menu, 4), MenuOutcome::Moved);
        let outcome = nav.select(&menu, 1);
        let MenuOutcome::Chosen(id) = outcome else {
            panic!("expected a leaf, got {outcome:?}");
        };
        assert!(!nav.is_open());
        assert_eq!(
            ActionTable::default().menu(id),
            Some(Action::SetProjection(Projection::Orthographic))
        );
    }

    #[test]
    fn test_top_level_leaf() {
        let menu = ContextMenu::default();
        let mut nav = MenuNavigator::default();
        nav.open();
        let MenuOutcome::Chosen(id) = nav.select(&menu, 7) else {
            panic!("Quit should be a leaf");
        };
        assert_eq!(ActionTable::default().menu(id), Some(Action::Quit));
    }

    #[test]
    fn test_invalid_selection_keeps_level() {
        let menu = ContextMenu::default();
        let mut nav = MenuNavigator::default();
        assert_eq!(nav.select(&menu, 1), MenuOutcome::Invalid);
        nav.open();
        nav.select(&menu, 2);
        assert_eq!(nav.select(&menu, 0), MenuOutcome::Invalid);
        assert_eq!(nav.select(&menu, 9), MenuOutcome::Invalid);
        assert_eq!(nav.current_items(&menu).map(<[MenuItem]>::len), Some(6));
    }

    #[test]
    fn test_back_then_close() {
        let menu = ContextMenu::default();
        let mut nav = MenuNavigator::default();
        nav.open();
        nav.select(&menu, 1);
        assert_eq!(nav.back(), MenuOutcome::Moved);
        assert_eq!(nav.current_items(&menu).map(<[MenuItem]>::len), Some(7));
        assert_eq!(nav.back(), MenuOutcome::Closed);
        assert!(!nav.is_open());
    }

    #[test]
    fn test_prompt_lists_entries() {
        let menu = ContextMenu::default();
        let mut nav = MenuNavigator::default();
        assert_eq!(nav.prompt(&menu), None);
        nav.open();
        let root = nav.prompt(&menu).unwrap();
        assert!(root.starts_with("Menu: 1 Axes  2 Axis Colors"));
        assert!(root.ends_with("7 Quit"));
        nav.select(&menu, 2);
        assert_eq!(
            nav.prompt(&menu).unwrap(),
            "Axis Colors: 1 Red  2 Yellow  3 Green  4 Cyan  5 Blue  6 Magenta"
        );
    }
}
