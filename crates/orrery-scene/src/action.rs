//! Tagged actions and the data-driven tables that map keys and menu ids to them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::camera::CameraState;
use crate::toggles::{AxisColor, ColorSelect, LightType, Projection, ToggleState};

/// Key code delivered for the Escape key.
pub const ESCAPE: char = '\u{1b}';

/// A state change requested by the user.
///
/// Serializable so key overrides can name actions in RON notation,
/// e.g. `SetAxisColor(Cyan)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    SetAxes(bool),
    SetAxisColor(AxisColor),
    SetDepthCue(bool),
    SetProjection(Projection),
    SetDebug(bool),
    ToggleTexturing,
    ToggleLighting,
    SelectColor(ColorSelect),
    SelectTextureTarget(Body),
    SelectLightType(LightType),
    Reset,
    Quit,
}

/// What the event loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Identifier of a context-menu leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuId(pub u16);

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// All mutable viewer state, owned by the application and passed by reference.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewerState {
    pub camera: CameraState,
    pub toggles: ToggleState,
}

impl ViewerState {
    pub fn new(camera: CameraState) -> Self {
        Self {
            camera,
            toggles: ToggleState::default(),
        }
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        let t = &mut self.toggles;
        match action {
            Action::SetAxes(on) => t.axes_visible = on,
            Action::SetAxisColor(color) => t.axis_color = color,
            Action::SetDepthCue(on) => t.depth_cue = on,
            Action::SetProjection(projection) => t.projection = projection,
            Action::SetDebug(on) => t.debug = on,
            Action::ToggleTexturing => t.texturing = !t.texturing,
            Action::ToggleLighting => t.toggle_lighting(),
            Action::SelectColor(color) => t.color_select = Some(color),
            Action::SelectTextureTarget(body) => t.texture_target = Some(body),
            Action::SelectLightType(light) => t.light_type = Some(light),
            Action::Reset => {
                t.reset_display();
                self.camera.reset();
            }
            Action::Quit => return Flow::Quit,
        }
        log::debug!("{action:?} -> {:?}", self.toggles);
        Flow::Continue
    }
}

/// A key override from configuration that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("unknown action '{action}': {source}")]
    InvalidAction {
        action: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("key binding for '{action}' must be a single character, got '{key}'")]
    InvalidKey { action: String, key: String },
}

const KEY_BINDINGS: &[(char, Action)] = &[
    ('w', Action::SelectColor(ColorSelect::White)),
    ('r', Action::SelectColor(ColorSelect::Red)),
    ('g', Action::SelectColor(ColorSelect::Green)),
    ('b', Action::SelectColor(ColorSelect::Blue)),
    ('y', Action::SelectColor(ColorSelect::Yellow)),
    ('p', Action::SelectLightType(LightType::Point)),
    ('o', Action::SetProjection(Projection::Orthographic)),
    ('v', Action::SelectTextureTarget(Body::Venus)),
    ('e', Action::SelectTextureTarget(Body::Earth)),
    ('m', Action::SelectTextureTarget(Body::Mars)),
    ('j', Action::SelectTextureTarget(Body::Jupiter)),
    ('s', Action::SelectTextureTarget(Body::Saturn)),
    ('u', Action::SelectTextureTarget(Body::Uranus)),
    ('n', Action::SelectTextureTarget(Body::Neptune)),
    ('t', Action::ToggleTexturing),
    ('l', Action::ToggleLighting),
    ('q', Action::Quit),
    (ESCAPE, Action::Quit),
];

pub(crate) const MENU_AXES_OFF: MenuId = MenuId(10);
pub(crate) const MENU_AXES_ON: MenuId = MenuId(11);
pub(crate) const MENU_COLOR_BASE: u16 = 20;
pub(crate) const MENU_DEPTH_CUE_OFF: MenuId = MenuId(30);
pub(crate) const MENU_DEPTH_CUE_ON: MenuId = MenuId(31);
pub(crate) const MENU_ORTHO: MenuId = MenuId(40);
pub(crate) const MENU_PERSP: MenuId = MenuId(41);
pub(crate) const MENU_RESET: MenuId = MenuId(50);
pub(crate) const MENU_DEBUG_OFF: MenuId = MenuId(60);
pub(crate) const MENU_DEBUG_ON: MenuId = MenuId(61);
pub(crate) const MENU_QUIT: MenuId = MenuId(70);

pub(crate) fn color_menu_id(color: AxisColor) -> MenuId {
    MenuId(MENU_COLOR_BASE + color as u16)
}

/// Key and menu dispatch tables.
#[derive(Debug, Clone)]
pub struct ActionTable {
    keys: HashMap<char, Action>,
    menu: HashMap<MenuId, Action>,
}

impl Default for ActionTable {
    fn default() -> Self {
        let keys = KEY_BINDINGS.iter().copied().collect();

        let mut menu = HashMap::from([
            (MENU_AXES_OFF, Action::SetAxes(false)),
            (MENU_AXES_ON, Action::SetAxes(true)),
            (MENU_DEPTH_CUE_OFF, Action::SetDepthCue(false)),
            (MENU_DEPTH_CUE_ON, Action::SetDepthCue(true)),
            (MENU_ORTHO, Action::SetProjection(Projection::Orthographic)),
            (MENU_PERSP, Action::SetProjection(Projection::Perspective)),
            (MENU_RESET, Action::Reset),
            (MENU_DEBUG_OFF, Action::SetDebug(false)),
            (MENU_DEBUG_ON, Action::SetDebug(true)),
            (MENU_QUIT, Action::Quit),
        ]);
        for color in AxisColor::ALL {
            menu.insert(color_menu_id(color), Action::SetAxisColor(color));
        }

        Self { keys, menu }
    }
}

impl ActionTable {
    /// Action bound to `key`. Upper-case letters fall back to their
    /// lower-case binding. Unbound keys are logged and yield `None`.
    pub fn key(&self, key: char) -> Option<Action> {
        let action = self
            .keys
            .get(&key)
            .or_else(|| self.keys.get(&key.to_ascii_lowercase()))
            .copied();
        if action.is_none() {
            log::warn!(
                "Don't know what to do with keyboard hit: '{}' (0x{:x})",
                key.escape_default(),
                key as u32
            );
        }
        action
    }

    /// Action of a context-menu leaf. Unknown ids are logged and yield `None`.
    pub fn menu(&self, id: MenuId) -> Option<Action> {
        let action = self.menu.get(&id).copied();
        if action.is_none() {
            log::warn!("Don't know what to do with menu id {id}");
        }
        action
    }

    pub fn bind_key(&mut self, key: char, action: Action) {
        self.keys.insert(key, action);
    }

    /// Bind `key` to an action written in RON notation.
    pub fn bind_from_config(&mut self, action: &str, key: &str) -> Result<(), BindingError> {
        let parsed: Action = ron::from_str(action).map_err(|source| BindingError::InvalidAction {
            action: action.to_string(),
            source,
        })?;
        let mut chars = key.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Err(BindingError::InvalidKey {
                action: action.to_string(),
                key: key.to_string(),
            });
        };
        self.bind_key(ch, parsed);
        Ok(())
    }

    /// Apply every override, logging and skipping the ones that are invalid.
    pub fn apply_overrides<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (action, key) in overrides {
            if let Err(err) = self.bind_from_config(action, key) {
                log::warn!("Ignoring key binding: {err}");
            }
        }
    }
}
