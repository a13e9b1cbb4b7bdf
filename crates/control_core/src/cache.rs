//! Last known value of every remote parameter.
//!
//! Writes come from the transport reader task, reads from the event loop.
//! Each key is updated atomically; a resolver reading several keys may see
//! them from different moments if a notification lands in between.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use shared::{
    domain::{ReceiverId, SubReceiverId},
    protocol::{Notification, ParamName, ParameterKey, Value, ValueShape},
};
use tracing::trace;

use crate::error::ControlError;

#[derive(Debug, Default)]
pub struct ParameterCache {
    values: RwLock<HashMap<ParameterKey, Value>>,
}

impl ParameterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &self,
        name: ParamName,
        receiver: Option<ReceiverId>,
        sub_receiver: Option<SubReceiverId>,
        value: Value,
    ) {
        self.store(ParameterKey::new(name, receiver, sub_receiver), value);
    }

    pub fn apply(&self, notification: Notification) {
        // Re-normalize in case the key was built by hand.
        let key = ParameterKey::new(
            notification.key.name,
            notification.key.receiver,
            notification.key.sub_receiver,
        );
        self.store(key, notification.value);
    }

    fn store(&self, key: ParameterKey, value: Value) {
        trace!(%key, ?value, "cache: update");
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    pub fn read(
        &self,
        name: ParamName,
        receiver: Option<ReceiverId>,
        sub_receiver: Option<SubReceiverId>,
    ) -> Result<Value, ControlError> {
        let key = ParameterKey::new(name, receiver, sub_receiver);
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .ok_or(ControlError::MissingParameter { key })
    }

    pub fn read_bool(
        &self,
        name: ParamName,
        receiver: ReceiverId,
        sub_receiver: SubReceiverId,
    ) -> Result<bool, ControlError> {
        match self.read(name, Some(receiver), Some(sub_receiver))? {
            Value::Bool(v) => Ok(v),
            _ => Err(mismatch(name, receiver, sub_receiver, ValueShape::Bool)),
        }
    }

    pub fn read_int(
        &self,
        name: ParamName,
        receiver: ReceiverId,
        sub_receiver: SubReceiverId,
    ) -> Result<i64, ControlError> {
        match self.read(name, Some(receiver), Some(sub_receiver))? {
            Value::Int(v) => Ok(v),
            _ => Err(mismatch(name, receiver, sub_receiver, ValueShape::Int)),
        }
    }

    pub fn read_text(
        &self,
        name: ParamName,
        receiver: ReceiverId,
        sub_receiver: SubReceiverId,
    ) -> Result<String, ControlError> {
        match self.read(name, Some(receiver), Some(sub_receiver))? {
            Value::Text(v) => Ok(v),
            _ => Err(mismatch(name, receiver, sub_receiver, ValueShape::Text)),
        }
    }

    pub fn read_pair(
        &self,
        name: ParamName,
        receiver: ReceiverId,
        sub_receiver: SubReceiverId,
    ) -> Result<(i64, i64), ControlError> {
        match self.read(name, Some(receiver), Some(sub_receiver))? {
            Value::Pair(low, high) => Ok((low, high)),
            _ => Err(mismatch(name, receiver, sub_receiver, ValueShape::Pair)),
        }
    }

    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn mismatch(
    name: ParamName,
    receiver: ReceiverId,
    sub_receiver: SubReceiverId,
    expected: ValueShape,
) -> ControlError {
    ControlError::UnexpectedValue {
        key: ParameterKey::new(name, Some(receiver), Some(sub_receiver)),
        expected,
    }
}
