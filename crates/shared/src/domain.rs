use serde::{Deserialize, Serialize};

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u8);
    };
}

index_newtype!(ReceiverId);
index_newtype!(SubReceiverId);

impl ReceiverId {
    pub const PRIMARY: Self = Self(0);
}

impl SubReceiverId {
    pub const PRIMARY: Self = Self(0);

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventValue {
    KeyUp,
    ScrollDown,
    Click,
    ScrollUp,
    KeyDown,
    Other(u8),
}

impl EventValue {
    pub fn is_press(self) -> bool {
        matches!(self, Self::KeyDown | Self::Click)
    }

    pub fn is_scroll(self) -> bool {
        matches!(self, Self::ScrollDown | Self::ScrollUp)
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::KeyUp => 0,
            Self::ScrollDown => 21,
            Self::Click => 63,
            Self::ScrollUp => 105,
            Self::KeyDown => 127,
            Self::Other(raw) => raw,
        }
    }
}

impl From<u8> for EventValue {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::KeyUp,
            21 => Self::ScrollDown,
            63 => Self::Click,
            105 => Self::ScrollUp,
            127 => Self::KeyDown,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceEvent {
    pub control: u8,
    pub value: EventValue,
}

impl SurfaceEvent {
    pub fn new(control: u8, value: u8) -> Self {
        Self {
            control,
            value: EventValue::from(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_event_values_map_to_variants() {
        assert_eq!(EventValue::from(0u8), EventValue::KeyUp);
        assert_eq!(EventValue::from(21u8), EventValue::ScrollDown);
        assert_eq!(EventValue::from(63u8), EventValue::Click);
        assert_eq!(EventValue::from(105u8), EventValue::ScrollUp);
        assert_eq!(EventValue::from(127u8), EventValue::KeyDown);
        assert_eq!(EventValue::from(64u8), EventValue::Other(64));
        assert_eq!(EventValue::Other(64).raw(), 64);
    }

    #[test]
    fn clicks_and_key_down_are_presses() {
        assert!(EventValue::Click.is_press());
        assert!(EventValue::KeyDown.is_press());
        assert!(!EventValue::KeyUp.is_press());
        assert!(!EventValue::ScrollUp.is_press());
    }
}
