//! Holding a plane-select key remaps the encoders. Releasing any plane-select
//! key drops back to [`KnobPlane::Base`], even while another one is still held.

use shared::domain::{EventValue, ReceiverId, SubReceiverId, SurfaceEvent};

use crate::{layout::Layout, resolvers::Action};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KnobPlane {
    #[default]
    Base,
    Filter,
    Mod,
    Band,
    Drive,
    Volume,
    Monitor,
}

impl KnobPlane {
    pub const ALL: [KnobPlane; 7] = [
        Self::Base,
        Self::Filter,
        Self::Mod,
        Self::Band,
        Self::Drive,
        Self::Volume,
        Self::Monitor,
    ];

    pub fn next(self, input: PlaneInput) -> KnobPlane {
        match (self, input) {
            (_, PlaneInput::Press(target)) => target,
            (_, PlaneInput::Release) => KnobPlane::Base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneInput {
    Press(KnobPlane),
    Release,
}

impl PlaneInput {
    pub fn from_event(target: KnobPlane, value: EventValue) -> Self {
        if value == EventValue::KeyDown {
            Self::Press(target)
        } else {
            Self::Release
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKey {
    Receiver,
    SubReceiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub receiver: ReceiverId,
    pub sub_receiver: SubReceiverId,
}

impl Selection {
    // Held keys: 1 while down.
    pub fn apply(self, key: SelectKey, value: EventValue) -> Selection {
        let index = u8::from(value == EventValue::KeyDown);
        match key {
            SelectKey::Receiver => Selection {
                receiver: ReceiverId(index),
                ..self
            },
            SelectKey::SubReceiver => Selection {
                sub_receiver: SubReceiverId(index),
                ..self
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Plane(KnobPlane),
    Selection(Selection),
    Action(Action),
    Unmapped,
}

#[derive(Debug, Clone)]
pub struct Router {
    layout: Layout,
    plane: KnobPlane,
    selection: Selection,
}

impl Router {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            plane: KnobPlane::default(),
            selection: Selection::default(),
        }
    }

    pub fn plane(&self) -> KnobPlane {
        self.plane
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn route(&mut self, event: SurfaceEvent) -> Route {
        let SurfaceEvent { control, value } = event;

        if let Some(&target) = self.layout.plane_keys.get(&control) {
            self.plane = self.plane.next(PlaneInput::from_event(target, value));
            return Route::Plane(self.plane);
        }
        if let Some(action) = self.layout.key_actions.get(&control) {
            return Route::Action(action.clone());
        }
        if value == EventValue::Click {
            if let Some(action) = self.layout.click_actions.get(&(control, self.plane)) {
                return Route::Action(action.clone());
            }
        }
        if value.is_scroll() {
            if let Some(action) = self.layout.scroll_actions.get(&(control, self.plane)) {
                return Route::Action(action.clone());
            }
        }
        if let Some(&key) = self.layout.select_keys.get(&control) {
            self.selection = self.selection.apply(key, value);
            return Route::Selection(self.selection);
        }
        Route::Unmapped
    }
}
