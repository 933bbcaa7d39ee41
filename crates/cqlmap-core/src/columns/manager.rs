//! Per-instance value state and the column accessor interface.

use tracing::trace;

use super::value::Value;
use crate::error::Error;

/// Holds one column's current and initial value for a model instance.
///
/// Exactly one manager exists per (instance, column) pair; it is created
/// at instance construction and owned exclusively by the instance.
#[derive(Debug, Clone)]
pub struct ValueManager {
    initial: Value,
    current: Value,
}

impl ValueManager {
    /// Create a manager seeded with the instance's loaded value.
    pub fn new(value: Value) -> Self {
        Self {
            initial: value.clone(),
            current: value,
        }
    }

    /// The current value.
    pub fn value(&self) -> &Value {
        &self.current
    }

    /// The value the instance was constructed with.
    pub fn initial_value(&self) -> &Value {
        &self.initial
    }

    /// Replace the current value.
    pub fn set_value(&mut self, value: Value) {
        self.current = value;
    }

    /// Clear the current value.
    pub fn delete_value(&mut self) {
        self.current = Value::Null;
    }

    /// A column is deleted when its value was cleared after having been
    /// loaded with one.
    pub fn deleted(&self) -> bool {
        self.current.is_null() && !self.initial.is_null()
    }
}

/// Explicit get/set/optional-delete interface for one column, wired into
/// the owning type's field table at schema-assembly time.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAccessor {
    can_delete: bool,
}

impl ColumnAccessor {
    pub(crate) fn new(can_delete: bool) -> Self {
        Self { can_delete }
    }

    /// Check if delete is permitted (false for primary key columns).
    pub fn can_delete(&self) -> bool {
        self.can_delete
    }

    /// Read the current value.
    pub fn get<'a>(&self, manager: &'a ValueManager) -> &'a Value {
        manager.value()
    }

    /// Write a new value.
    pub fn set(&self, manager: &mut ValueManager, value: Value) {
        manager.set_value(value);
    }

    /// Clear the value. Fails on primary key columns.
    pub fn delete(&self, manager: &mut ValueManager) -> Result<(), Error> {
        if !self.can_delete {
            return Err(Error::Validation(
                "primary key columns cannot be deleted".to_string(),
            ));
        }
        trace!("column value deleted");
        manager.delete_value();
        Ok(())
    }
}
