use std::collections::HashMap;

use shared::protocol::{ParamName, Value};

use crate::{
    resolvers::{Action, FilterSide},
    router::{KnobPlane, SelectKey},
};

pub mod controls {
    pub const ENC_LARGE: u8 = 20;
    pub const ENC_SMALL_LEFT: u8 = 21;
    pub const ENC_SMALL_RIGHT: u8 = 22;

    pub const KEY_R1_C1: u8 = 102;
    pub const KEY_R1_C2: u8 = 103;
    pub const KEY_R1_C3: u8 = 104;
    pub const KEY_R1_C4: u8 = 105;
    pub const KEY_R2_C1: u8 = 106;
    pub const KEY_R2_C2: u8 = 107;
    pub const KEY_R2_C3: u8 = 108;
    pub const KEY_R2_C4: u8 = 109;
    pub const KEY_R3_C1: u8 = 110;
    pub const KEY_R3_C2: u8 = 111;
    pub const KEY_R3_C3: u8 = 112;
    pub const KEY_R3_C4: u8 = 113;
    pub const KEY_R4_C1: u8 = 114;
    pub const KEY_R4_C2: u8 = 115;
    pub const KEY_R4_C3: u8 = 116;
    pub const KEY_R4_C4: u8 = 117;
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub plane_keys: HashMap<u8, KnobPlane>,
    pub select_keys: HashMap<u8, SelectKey>,
    // Plane-independent; the action sees every value, including release.
    pub key_actions: HashMap<u8, Action>,
    pub click_actions: HashMap<(u8, KnobPlane), Action>,
    pub scroll_actions: HashMap<(u8, KnobPlane), Action>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::standard()
    }
}

impl Layout {
    pub fn empty() -> Self {
        Self {
            plane_keys: HashMap::new(),
            select_keys: HashMap::new(),
            key_actions: HashMap::new(),
            click_actions: HashMap::new(),
            scroll_actions: HashMap::new(),
        }
    }

    pub fn plane_key(mut self, control: u8, plane: KnobPlane) -> Self {
        self.plane_keys.insert(control, plane);
        self
    }

    pub fn select_key(mut self, control: u8, key: SelectKey) -> Self {
        self.select_keys.insert(control, key);
        self
    }

    pub fn key(mut self, control: u8, action: Action) -> Self {
        self.key_actions.insert(control, action);
        self
    }

    pub fn click(mut self, control: u8, plane: KnobPlane, action: Action) -> Self {
        self.click_actions.insert((control, plane), action);
        self
    }

    pub fn scroll(mut self, control: u8, plane: KnobPlane, action: Action) -> Self {
        self.scroll_actions.insert((control, plane), action);
        self
    }

    pub fn encoder(self, control: u8, plane: KnobPlane, action: Action) -> Self {
        self.click(control, plane, action.clone())
            .scroll(control, plane, action)
    }

    pub fn standard() -> Self {
        use controls::*;
        use KnobPlane::*;

        let toggle = Action::Toggle;
        let scroll = |name, step| Action::GenericScroll { name, step };
        let set = |name, value| Action::GenericSet {
            name,
            value: Value::Int(value),
        };

        Self::empty()
            .plane_key(KEY_R1_C1, Filter)
            .plane_key(KEY_R1_C2, Mod)
            .plane_key(KEY_R1_C3, Band)
            .plane_key(KEY_R1_C4, Drive)
            .plane_key(KEY_R4_C1, Volume)
            .plane_key(KEY_R4_C2, Monitor)
            .select_key(KEY_R2_C2, SelectKey::SubReceiver)
            .select_key(KEY_R2_C3, SelectKey::Receiver)
            .key(KEY_R2_C1, toggle(ParamName::SplitEnable))
            .key(KEY_R2_C4, toggle(ParamName::RxApfEnable))
            .key(KEY_R3_C1, toggle(ParamName::RxNbEnable))
            .key(KEY_R3_C2, toggle(ParamName::RxBinEnable))
            .key(KEY_R3_C3, toggle(ParamName::RxNrEnable))
            .key(KEY_R3_C4, toggle(ParamName::RxAncEnable))
            .key(KEY_R4_C3, Action::Momentary(ParamName::Trx))
            .key(KEY_R4_C4, Action::Momentary(ParamName::Tune))
            // Base: tuning and squelch.
            .encoder(ENC_LARGE, Base, Action::FreqScroll { step: 250 })
            .click(ENC_SMALL_LEFT, Base, Action::EnableToggle)
            .scroll(ENC_SMALL_LEFT, Base, Action::FreqScroll { step: 2_500 })
            .click(ENC_SMALL_RIGHT, Base, toggle(ParamName::SqlEnable))
            .scroll(ENC_SMALL_RIGHT, Base, scroll(ParamName::SqlLevel, 1))
            // Filter edges.
            .encoder(ENC_LARGE, Filter, Action::FilterScroll(FilterSide::Main))
            .encoder(ENC_SMALL_LEFT, Filter, Action::FilterScroll(FilterSide::Left))
            .encoder(ENC_SMALL_RIGHT, Filter, Action::FilterScroll(FilterSide::Right))
            // Modulation, RIT and XIT.
            .scroll(ENC_LARGE, Mod, Action::ModScroll)
            .click(ENC_SMALL_LEFT, Mod, toggle(ParamName::RitEnable))
            .scroll(ENC_SMALL_LEFT, Mod, scroll(ParamName::RitOffset, 25))
            .click(ENC_SMALL_RIGHT, Mod, toggle(ParamName::XitEnable))
            .scroll(ENC_SMALL_RIGHT, Mod, scroll(ParamName::XitOffset, 25))
            .scroll(ENC_LARGE, Band, Action::BandScroll)
            // Transmit drive.
            .click(ENC_LARGE, Drive, set(ParamName::Drive, 50))
            .scroll(ENC_LARGE, Drive, scroll(ParamName::Drive, 2))
            .click(ENC_SMALL_RIGHT, Drive, set(ParamName::TuneDrive, 10))
            .scroll(ENC_SMALL_RIGHT, Drive, scroll(ParamName::TuneDrive, 2))
            // Audio.
            .click(ENC_LARGE, Volume, toggle(ParamName::Mute))
            .scroll(ENC_LARGE, Volume, scroll(ParamName::Volume, 2))
            .click(ENC_SMALL_LEFT, Volume, Action::VolumeReset)
            .scroll(ENC_SMALL_LEFT, Volume, scroll(ParamName::RxBalance, 2))
            .click(ENC_SMALL_RIGHT, Volume, toggle(ParamName::RxMute))
            .scroll(ENC_SMALL_RIGHT, Volume, scroll(ParamName::RxVolume, 2))
            .click(ENC_LARGE, Monitor, toggle(ParamName::MonEnable))
            .scroll(ENC_LARGE, Monitor, scroll(ParamName::MonVolume, 2))
    }
}
