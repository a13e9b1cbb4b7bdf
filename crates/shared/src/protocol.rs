//! TCI parameter registry, cached values, and the text wire format.
//!
//! Every TCI command is `name:arg,arg,...;`. The leading arguments are the
//! receiver and sub-receiver indexes for parameters scoped that way, followed
//! by the value itself. The registry below records that scoping per parameter,
//! and [`ParameterKey::new`] applies it so cache reads and writes agree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{ReceiverId, SubReceiverId},
    error::ProtocolError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Bool,
    Int,
    Text,
    Pair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub wire: &'static str,
    pub has_receiver: bool,
    pub has_sub_receiver: bool,
    pub shape: ValueShape,
}

const fn spec(
    wire: &'static str,
    has_receiver: bool,
    has_sub_receiver: bool,
    shape: ValueShape,
) -> ParamSpec {
    ParamSpec {
        wire,
        has_receiver,
        has_sub_receiver,
        shape,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamName {
    Dds,
    If,
    IfLimits,
    Modulation,
    RxFilterBand,
    RxEnable,
    RxChannelEnable,
    SplitEnable,
    RxApfEnable,
    RxNbEnable,
    RxBinEnable,
    RxNrEnable,
    RxAncEnable,
    Trx,
    Tune,
    Drive,
    TuneDrive,
    Mute,
    Volume,
    MonEnable,
    MonVolume,
    RxMute,
    RxVolume,
    RxBalance,
    SqlEnable,
    SqlLevel,
    RitEnable,
    RitOffset,
    XitEnable,
    XitOffset,
}

impl ParamName {
    pub const ALL: [ParamName; 30] = [
        Self::Dds,
        Self::If,
        Self::IfLimits,
        Self::Modulation,
        Self::RxFilterBand,
        Self::RxEnable,
        Self::RxChannelEnable,
        Self::SplitEnable,
        Self::RxApfEnable,
        Self::RxNbEnable,
        Self::RxBinEnable,
        Self::RxNrEnable,
        Self::RxAncEnable,
        Self::Trx,
        Self::Tune,
        Self::Drive,
        Self::TuneDrive,
        Self::Mute,
        Self::Volume,
        Self::MonEnable,
        Self::MonVolume,
        Self::RxMute,
        Self::RxVolume,
        Self::RxBalance,
        Self::SqlEnable,
        Self::SqlLevel,
        Self::RitEnable,
        Self::RitOffset,
        Self::XitEnable,
        Self::XitOffset,
    ];

    pub fn spec(self) -> ParamSpec {
        use ValueShape::*;
        match self {
            Self::Dds => spec("dds", true, false, Int),
            Self::If => spec("if", true, true, Int),
            Self::IfLimits => spec("if_limits", false, false, Pair),
            Self::Modulation => spec("modulation", true, false, Text),
            Self::RxFilterBand => spec("rx_filter_band", true, false, Pair),
            Self::RxEnable => spec("rx_enable", true, false, Bool),
            Self::RxChannelEnable => spec("rx_channel_enable", true, true, Bool),
            Self::SplitEnable => spec("split_enable", true, false, Bool),
            Self::RxApfEnable => spec("rx_apf_enable", true, false, Bool),
            Self::RxNbEnable => spec("rx_nb_enable", true, false, Bool),
            Self::RxBinEnable => spec("rx_bin_enable", true, false, Bool),
            Self::RxNrEnable => spec("rx_nr_enable", true, false, Bool),
            Self::RxAncEnable => spec("rx_anc_enable", true, false, Bool),
            Self::Trx => spec("trx", true, false, Bool),
            Self::Tune => spec("tune", true, false, Bool),
            Self::Drive => spec("drive", false, false, Int),
            Self::TuneDrive => spec("tune_drive", false, false, Int),
            Self::Mute => spec("mute", false, false, Bool),
            Self::Volume => spec("volume", false, false, Int),
            Self::MonEnable => spec("mon_enable", false, false, Bool),
            Self::MonVolume => spec("mon_volume", false, false, Int),
            Self::RxMute => spec("rx_mute", true, false, Bool),
            Self::RxVolume => spec("rx_volume", true, true, Int),
            Self::RxBalance => spec("rx_balance", true, true, Int),
            Self::SqlEnable => spec("sql_enable", true, false, Bool),
            Self::SqlLevel => spec("sql_level", true, false, Int),
            Self::RitEnable => spec("rit_enable", true, false, Bool),
            Self::RitOffset => spec("rit_offset", true, false, Int),
            Self::XitEnable => spec("xit_enable", true, false, Bool),
            Self::XitOffset => spec("xit_offset", true, false, Int),
        }
    }

    pub fn wire(self) -> &'static str {
        self.spec().wire
    }

    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.wire().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterKey {
    pub name: ParamName,
    pub receiver: Option<ReceiverId>,
    pub sub_receiver: Option<SubReceiverId>,
}

impl ParameterKey {
    pub fn new(
        name: ParamName,
        receiver: Option<ReceiverId>,
        sub_receiver: Option<SubReceiverId>,
    ) -> Self {
        let spec = name.spec();
        Self {
            name,
            receiver: receiver.filter(|_| spec.has_receiver),
            sub_receiver: sub_receiver.filter(|_| spec.has_sub_receiver),
        }
    }

    pub fn global(name: ParamName) -> Self {
        Self::new(name, None, None)
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(receiver) = self.receiver {
            write!(f, "[rx={}]", receiver.0)?;
        }
        if let Some(sub_receiver) = self.sub_receiver {
            write!(f, "[sub={}]", sub_receiver.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
    Pair(i64, i64),
}

impl Value {
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::Bool(_) => ValueShape::Bool,
            Self::Int(_) => ValueShape::Int,
            Self::Text(_) => ValueShape::Text,
            Self::Pair(..) => ValueShape::Pair,
        }
    }

    fn write_wire(&self, out: &mut String) {
        match self {
            Self::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Self::Int(v) => out.push_str(&v.to_string()),
            Self::Text(v) => out.push_str(v),
            Self::Pair(low, high) => out.push_str(&format!("{low},{high}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteCommand {
    pub key: ParameterKey,
    pub value: Value,
}

impl WriteCommand {
    pub fn new(
        name: ParamName,
        receiver: ReceiverId,
        sub_receiver: SubReceiverId,
        value: Value,
    ) -> Self {
        Self {
            key: ParameterKey::new(name, Some(receiver), Some(sub_receiver)),
            value,
        }
    }

    pub fn name(&self) -> ParamName {
        self.key.name
    }

    pub fn to_wire(&self) -> String {
        let mut out = format!("{}:", self.key.name.wire());
        if let Some(receiver) = self.key.receiver {
            out.push_str(&format!("{},", receiver.0));
        }
        if let Some(sub_receiver) = self.key.sub_receiver {
            out.push_str(&format!("{},", sub_receiver.0));
        }
        self.value.write_wire(&mut out);
        out.push(';');
        out
    }
}

impl fmt::Display for WriteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub key: ParameterKey,
    pub value: Value,
}

pub fn split_frame(frame: &str) -> impl Iterator<Item = &str> {
    frame
        .split(';')
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Names outside the registry yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Notification>, ProtocolError> {
    let line = line.trim().trim_end_matches(';');
    let (head, args) = match line.split_once(':') {
        Some((head, args)) => (head, Some(args)),
        None => (line, None),
    };
    let Some(name) = ParamName::from_wire(head) else {
        return Ok(None);
    };
    let Some(args) = args else {
        return Err(ProtocolError::MissingSeparator(line.to_string()));
    };

    let spec = name.spec();
    let args: Vec<&str> = args.split(',').map(str::trim).collect();
    let mut position = 0;
    let mut next = || {
        let raw = args
            .get(position)
            .copied()
            .ok_or(ProtocolError::MissingArgument { name, position })?;
        position += 1;
        Ok::<_, ProtocolError>(raw)
    };

    let receiver = if spec.has_receiver {
        Some(ReceiverId(parse_index(name, next()?)?))
    } else {
        None
    };
    let sub_receiver = if spec.has_sub_receiver {
        Some(SubReceiverId(parse_index(name, next()?)?))
    } else {
        None
    };

    let value = match spec.shape {
        ValueShape::Bool => Value::Bool(parse_bool(name, next()?)?),
        ValueShape::Int => Value::Int(parse_int(name, next()?)?),
        ValueShape::Text => Value::Text(next()?.to_string()),
        ValueShape::Pair => {
            let low = parse_int(name, next()?)?;
            let high = parse_int(name, next()?)?;
            Value::Pair(low, high)
        }
    };

    Ok(Some(Notification {
        key: ParameterKey::new(name, receiver, sub_receiver),
        value,
    }))
}

fn invalid(name: ParamName, raw: &str) -> ProtocolError {
    ProtocolError::InvalidArgument {
        name,
        raw: raw.to_string(),
    }
}

fn parse_index(name: ParamName, raw: &str) -> Result<u8, ProtocolError> {
    raw.parse().map_err(|_| invalid(name, raw))
}

fn parse_bool(name: ParamName, raw: &str) -> Result<bool, ProtocolError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(invalid(name, raw))
    }
}

/// Some servers report integral values with a fractional part (`-6.0`).
fn parse_int(name: ParamName, raw: &str) -> Result<i64, ProtocolError> {
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i64)
        .ok_or_else(|| invalid(name, raw))
}
