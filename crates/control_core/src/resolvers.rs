use shared::{
    domain::{EventValue, ReceiverId, SubReceiverId},
    protocol::{ParamName, Value, WriteCommand},
};
use tracing::debug;

use crate::{bands::BandTable, cache::ParameterCache, error::ControlError, router::Selection};

pub const FILTER_EDGE_STEP: i64 = 25;

// Shorter than the list the server advertises.
pub const MODULATIONS: [&str; 8] = ["AM", "LSB", "USB", "CW", "NFM", "DIGL", "DIGU", "WFM"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterProfile {
    pub mode: &'static str,
    pub default_low: i64,
    pub default_high: i64,
    pub wheel_low: i64,
    pub wheel_high: i64,
}

const fn profile(
    mode: &'static str,
    default_low: i64,
    default_high: i64,
    wheel_low: i64,
    wheel_high: i64,
) -> FilterProfile {
    FilterProfile {
        mode,
        default_low,
        default_high,
        wheel_low,
        wheel_high,
    }
}

// Sideband modes only widen away from the carrier.
pub const FILTER_PROFILES: [FilterProfile; 8] = [
    profile("AM", -3_000, 3_000, -25, 25),
    profile("LSB", -3_000, -25, -25, 0),
    profile("USB", 25, 3_000, 0, 25),
    profile("CW", -250, 250, -25, 25),
    profile("NFM", -6_000, 6_000, -25, 25),
    profile("DIGL", -3_000, -25, -25, 0),
    profile("DIGU", 25, 3_000, 0, 25),
    profile("WFM", -24_000, 24_000, -250, 250),
];

pub fn filter_profile(mode: &str) -> Option<&'static FilterProfile> {
    FILTER_PROFILES
        .iter()
        .find(|p| p.mode.eq_ignore_ascii_case(mode))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSide {
    Left,
    Main,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FreqScroll { step: i64 },
    FilterScroll(FilterSide),
    ModScroll,
    BandScroll,
    Toggle(ParamName),
    Momentary(ParamName),
    GenericSet { name: ParamName, value: Value },
    GenericScroll { name: ParamName, step: i64 },
    EnableToggle,
    VolumeReset,
}

fn direction(value: EventValue) -> Option<i64> {
    match value {
        EventValue::ScrollDown => Some(-1),
        EventValue::ScrollUp => Some(1),
        _ => None,
    }
}

pub struct Resolver<'a> {
    cache: &'a ParameterCache,
    bands: &'a BandTable,
    receiver: ReceiverId,
    sub_receiver: SubReceiverId,
}

impl<'a> Resolver<'a> {
    pub fn new(cache: &'a ParameterCache, bands: &'a BandTable, selection: Selection) -> Self {
        Self {
            cache,
            bands,
            receiver: selection.receiver,
            sub_receiver: selection.sub_receiver,
        }
    }

    pub fn resolve(
        &self,
        action: &Action,
        value: EventValue,
    ) -> Result<Vec<WriteCommand>, ControlError> {
        match action {
            Action::FreqScroll { step } => self.freq_scroll(*step, value),
            Action::FilterScroll(side) => self.filter_scroll(*side, value),
            Action::ModScroll => self.mod_scroll(value),
            Action::BandScroll => self.band_scroll(value),
            Action::Toggle(name) => self.toggle(*name, value),
            Action::Momentary(name) => Ok(self.momentary(*name, value)),
            Action::GenericSet { name, value: target } => {
                Ok(self.generic_set(*name, target, value))
            }
            Action::GenericScroll { name, step } => self.generic_scroll(*name, *step, value),
            Action::EnableToggle => self.enable_toggle(value),
            Action::VolumeReset => Ok(self.volume_reset(value)),
        }
    }

    fn write(&self, name: ParamName, value: Value) -> WriteCommand {
        WriteCommand::new(name, self.receiver, self.sub_receiver, value)
    }

    fn tuning_writes(&self, dds: i64, if_hz: i64) -> Vec<WriteCommand> {
        vec![
            self.write(ParamName::Dds, Value::Int(dds)),
            self.write(ParamName::If, Value::Int(if_hz)),
        ]
    }

    pub fn band_scroll(&self, value: EventValue) -> Result<Vec<WriteCommand>, ControlError> {
        let Some(dir) = direction(value) else {
            return Ok(Vec::new());
        };
        let dds = self
            .cache
            .read_int(ParamName::Dds, self.receiver, self.sub_receiver)?;
        let if_hz = self
            .cache
            .read_int(ParamName::If, self.receiver, self.sub_receiver)?;
        let current = dds.saturating_add(if_hz);

        let target = if dir < 0 {
            self.bands.next_down(current)
        } else {
            self.bands.next_up(current)
        };
        let Some(target) = target else {
            return Ok(Vec::new());
        };

        debug!(
            from = current,
            to = target,
            band = self.bands.band_for(target).map(|b| b.name),
            "band: jump"
        );
        Ok(self.tuning_writes(target, 0))
    }

    pub fn freq_scroll(
        &self,
        step: i64,
        value: EventValue,
    ) -> Result<Vec<WriteCommand>, ControlError> {
        if value != EventValue::Click && direction(value).is_none() {
            return Ok(Vec::new());
        }
        let mut dds = self
            .cache
            .read_int(ParamName::Dds, self.receiver, self.sub_receiver)?;
        let mut if_hz = self
            .cache
            .read_int(ParamName::If, self.receiver, self.sub_receiver)?;
        let primary_if = self
            .cache
            .read_int(ParamName::If, self.receiver, SubReceiverId::PRIMARY)?;
        let (if_min, if_max) =
            self.cache
                .read_pair(ParamName::IfLimits, self.receiver, self.sub_receiver)?;

        match (value, direction(value)) {
            (EventValue::Click, _) if self.sub_receiver.is_primary() => {
                dds = dds.saturating_add(if_hz);
                if_hz = 0;
            }
            (EventValue::Click, _) => if_hz = primary_if,
            (_, Some(dir)) => if_hz = if_hz.saturating_add(dir.saturating_mul(step)),
            (_, None) => return Ok(Vec::new()),
        }

        if if_hz < if_min {
            if_hz = if_min;
        }
        if if_hz > if_max {
            if_hz = if_max;
        }

        Ok(self.tuning_writes(dds, if_hz))
    }

    pub fn filter_scroll(
        &self,
        side: FilterSide,
        value: EventValue,
    ) -> Result<Vec<WriteCommand>, ControlError> {
        if value != EventValue::Click && direction(value).is_none() {
            return Ok(Vec::new());
        }
        let (mut low, mut high) =
            self.cache
                .read_pair(ParamName::RxFilterBand, self.receiver, self.sub_receiver)?;
        let mode = self
            .cache
            .read_text(ParamName::Modulation, self.receiver, self.sub_receiver)?;
        let profile = filter_profile(&mode).ok_or(ControlError::UnknownModulation(mode))?;

        match direction(value) {
            None => {
                if matches!(side, FilterSide::Left | FilterSide::Main) {
                    low = profile.default_low;
                }
                if matches!(side, FilterSide::Right | FilterSide::Main) {
                    high = profile.default_high;
                }
            }
            Some(dir) => match side {
                FilterSide::Left => low = low.saturating_add(dir * FILTER_EDGE_STEP),
                FilterSide::Right => high = high.saturating_add(dir * FILTER_EDGE_STEP),
                FilterSide::Main => {
                    low = low.saturating_add(dir * profile.wheel_low);
                    high = high.saturating_add(dir * profile.wheel_high);
                }
            },
        }

        Ok(vec![
            self.write(ParamName::RxFilterBand, Value::Pair(low, high))
        ])
    }

    pub fn mod_scroll(&self, value: EventValue) -> Result<Vec<WriteCommand>, ControlError> {
        let Some(dir) = direction(value) else {
            return Ok(Vec::new());
        };
        let mode = self
            .cache
            .read_text(ParamName::Modulation, self.receiver, self.sub_receiver)?;
        let count = MODULATIONS.len();
        let current = MODULATIONS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(&mode));

        // A mode outside the list enters it from whichever end the knob turns toward.
        let next = match (current, dir) {
            (Some(idx), 1) => (idx + 1) % count,
            (Some(idx), _) => (idx + count - 1) % count,
            (None, 1) => 0,
            (None, _) => count - 1,
        };

        Ok(vec![self.write(
            ParamName::Modulation,
            Value::Text(MODULATIONS[next].to_string()),
        )])
    }

    pub fn toggle(
        &self,
        name: ParamName,
        value: EventValue,
    ) -> Result<Vec<WriteCommand>, ControlError> {
        if !value.is_press() {
            return Ok(Vec::new());
        }
        let current = self.cache.read_bool(name, self.receiver, self.sub_receiver)?;
        Ok(vec![self.write(name, Value::Bool(!current))])
    }

    pub fn momentary(&self, name: ParamName, value: EventValue) -> Vec<WriteCommand> {
        vec![self.write(name, Value::Bool(value == EventValue::KeyDown))]
    }

    pub fn generic_set(
        &self,
        name: ParamName,
        target: &Value,
        value: EventValue,
    ) -> Vec<WriteCommand> {
        if !value.is_press() {
            return Vec::new();
        }
        vec![self.write(name, target.clone())]
    }

    pub fn generic_scroll(
        &self,
        name: ParamName,
        step: i64,
        value: EventValue,
    ) -> Result<Vec<WriteCommand>, ControlError> {
        let Some(dir) = direction(value) else {
            return Ok(Vec::new());
        };
        let current = self.cache.read_int(name, self.receiver, self.sub_receiver)?;
        let next = current.saturating_add(dir.saturating_mul(step));
        Ok(vec![self.write(name, Value::Int(next))])
    }

    pub fn enable_toggle(&self, value: EventValue) -> Result<Vec<WriteCommand>, ControlError> {
        if value != EventValue::Click {
            return Ok(Vec::new());
        }
        if !self.sub_receiver.is_primary() {
            self.toggle(ParamName::RxChannelEnable, EventValue::KeyDown)
        } else if self.receiver != ReceiverId::PRIMARY {
            self.toggle(ParamName::RxEnable, EventValue::KeyDown)
        } else {
            // Receiver 0 / sub-receiver 0 is always on.
            Ok(Vec::new())
        }
    }

    pub fn volume_reset(&self, value: EventValue) -> Vec<WriteCommand> {
        if !value.is_press() {
            return Vec::new();
        }
        vec![
            self.write(ParamName::RxBalance, Value::Int(0)),
            self.write(ParamName::RxVolume, Value::Int(0)),
        ]
    }
}

#[cfg(test)]
#[path = "tests/resolvers_tests.rs"]
mod tests;
