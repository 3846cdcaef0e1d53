//! Input routing for the viewer, independent of the window.
//!
//! [`Controls`] owns the viewer state and decides what a key press, a drag
//! or a wheel click means: keys go through the context menu while it is
//! open and through the key table otherwise.

use orrery_config::Config;
use orrery_input::{BACKSPACE, Drag};
use orrery_scene::{
    Action, ActionTable, CameraState, CameraTuning, ContextMenu, ESCAPE, Flow, MenuNavigator,
    MenuOutcome, ScrollDirection, ViewerState,
};

/// Wheel clicks applied per event; the scale clamps long before this.
const MAX_SCROLL_CLICKS: u32 = 100;

/// An action that was applied, and what the event loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    pub action: Action,
    pub flow: Flow,
}

pub struct Controls {
    pub viewer: ViewerState,
    actions: ActionTable,
    menu: ContextMenu,
    navigator: MenuNavigator,
}

impl Controls {
    pub fn new(viewer: ViewerState, actions: ActionTable) -> Self {
        Self {
            viewer,
            actions,
            menu: ContextMenu::default(),
            navigator: MenuNavigator::default(),
        }
    }

    /// Camera tuning, key overrides and the initial debug flag from `config`.
    pub fn from_config(config: &Config) -> Self {
        let tuning = CameraTuning {
            angle_factor: config.camera.angle_factor,
            scale_factor: config.camera.scale_factor,
            min_scale: config.camera.min_scale,
            scroll_click_factor: config.camera.scroll_click_factor,
        };
        let mut viewer = ViewerState::new(CameraState::new(tuning));
        viewer.toggles.debug = config.debug.start_in_debug;

        let mut actions = ActionTable::default();
        actions.apply_overrides(
            config
                .input
                .key_bindings
                .iter()
                .map(|(action, key)| (action.as_str(), key.as_str())),
        );
        Self::new(viewer, actions)
    }

    pub fn menu_open(&self) -> bool {
        self.navigator.is_open()
    }

    pub fn open_menu(&mut self) {
        self.navigator.open();
        tracing::debug!("Context menu opened");
    }

    /// Window title: `base`, followed by the menu prompt while the menu is open.
    pub fn title(&self, base: &str) -> String {
        match self.navigator.prompt(&self.menu) {
            Some(prompt) => format!("{base} | {prompt}"),
            None => base.to_string(),
        }
    }

    /// Handle a key character. Returns the applied action, if any.
    pub fn on_key(&mut self, key: char) -> Option<Dispatched> {
        if self.navigator.is_open() {
            return self.on_menu_key(key);
        }
        let action = self.actions.key(key)?;
        Some(self.dispatch(action))
    }

    fn on_menu_key(&mut self, key: char) -> Option<Dispatched> {
        let outcome = match key {
            ESCAPE => {
                self.navigator.close();
                MenuOutcome::Closed
            }
            BACKSPACE => self.navigator.back(),
            _ => match key.to_digit(10) {
                Some(number) => self.navigator.select(&self.menu, number as usize),
                None => MenuOutcome::Invalid,
            },
        };
        tracing::debug!("Menu key '{}' -> {outcome:?}", key.escape_default());

        match outcome {
            MenuOutcome::Chosen(id) => {
                let action = self.actions.menu(id)?;
                Some(self.dispatch(action))
            }
            MenuOutcome::Invalid => {
                tracing::warn!("Don't know what to do with menu key '{}'", key.escape_default());
                None
            }
            MenuOutcome::Moved | MenuOutcome::Closed => None,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Dispatched {
        let flow = self.viewer.apply(action);
        Dispatched { action, flow }
    }

    pub fn on_drag(&mut self, drag: Drag) {
        self.viewer
            .camera
            .apply_drag(drag.buttons, drag.dx, drag.dy);
    }

    /// Apply `clicks` wheel clicks, at most [`MAX_SCROLL_CLICKS`]; positive
    /// values scroll up.
    pub fn on_scroll(&mut self, clicks: i32) {
        let direction = if clicks > 0 {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        };
        for _ in 0..clicks.unsigned_abs().min(MAX_SCROLL_CLICKS) {
            self.viewer.camera.apply_scroll(direction);
        }
    }
}
