//! Column descriptors and the shared validation pipeline.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::container;
use super::kind::ColumnKind;
use super::manager::ColumnAccessor;
use super::value::{DbValue, Value};
use crate::error::Error;

/// Process-wide declaration counter. Columns are normally declared at
/// schema-definition time, but the increment is atomic so concurrent
/// declaration stays well defined.
static DECLARATION_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_position() -> u64 {
    DECLARATION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Default configuration for a column.
///
/// The three states are explicit: no default at all, a static value, or a
/// zero-argument producer invoked each time the default resolves. A static
/// default of `Value::Null` is representable and distinct from "no default".
#[derive(Clone)]
pub enum ColumnDefault {
    /// No default configured.
    None,
    /// A fixed default value.
    Static(Value),
    /// A producer invoked whenever the default resolves.
    Generated(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl ColumnDefault {
    /// Check if any default is configured.
    pub fn is_configured(&self) -> bool {
        !matches!(self, ColumnDefault::None)
    }
}

impl fmt::Debug for ColumnDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnDefault::None => write!(f, "None"),
            ColumnDefault::Static(v) => f.debug_tuple("Static").field(v).finish(),
            ColumnDefault::Generated(_) => write!(f, "Generated(..)"),
        }
    }
}

/// Descriptor of one schema field: its type variant, constraints, and
/// conversions between application and storage representations.
#[derive(Debug, Clone)]
pub struct Column {
    kind: ColumnKind,
    primary_key: bool,
    partition_key: bool,
    index: bool,
    db_field: Option<String>,
    column_name: Option<String>,
    default: ColumnDefault,
    required: bool,
    position: u64,
}

impl Column {
    /// Declare a column of the given scalar kind. Container kinds go
    /// through [`Column::set`], [`Column::list`], and [`Column::map`],
    /// which run the element checks.
    fn with_kind(kind: ColumnKind) -> Self {
        Self {
            kind,
            primary_key: false,
            partition_key: false,
            index: false,
            db_field: None,
            column_name: None,
            default: ColumnDefault::None,
            required: true,
            position: next_position(),
        }
    }

    /// Binary data column (`blob`).
    pub fn bytes() -> Self {
        Self::with_kind(ColumnKind::Bytes)
    }

    /// ASCII text column (`ascii`).
    pub fn ascii() -> Self {
        Self::with_kind(ColumnKind::Ascii)
    }

    /// UTF-8 text column (`text`).
    pub fn text() -> Self {
        Self::with_kind(ColumnKind::Text {
            min_length: None,
            max_length: None,
        })
    }

    /// JSON document column, stored as compact text.
    pub fn json() -> Self {
        Self::with_kind(ColumnKind::Json)
    }

    /// Integer column (`int`).
    pub fn integer() -> Self {
        Self::with_kind(ColumnKind::Integer)
    }

    /// Timestamp column (`timestamp`).
    pub fn datetime() -> Self {
        Self::with_kind(ColumnKind::DateTime)
    }

    /// UUID column with a generated random (v4) default.
    pub fn uuid() -> Self {
        Self::with_kind(ColumnKind::Uuid)
            .with_generated_default(|| Value::Uuid(Uuid::new_v4()))
    }

    /// Time-ordered UUID column with a generated (v7) default.
    pub fn time_uuid() -> Self {
        Self::with_kind(ColumnKind::TimeUuid)
            .with_generated_default(|| Value::Uuid(Uuid::now_v7()))
    }

    /// Boolean column (`boolean`).
    pub fn boolean() -> Self {
        Self::with_kind(ColumnKind::Boolean)
    }

    /// Floating point column, double precision (`double`).
    pub fn float() -> Self {
        Self::with_kind(ColumnKind::Float {
            double_precision: true,
        })
    }

    /// Decimal column (`decimal`); values pass through unconverted.
    pub fn decimal() -> Self {
        Self::with_kind(ColumnKind::Decimal)
    }

    /// Counter column. Not implemented; construction fails immediately.
    pub fn counter() -> Result<Self, Error> {
        Err(Error::NotSupported(
            "counter columns are not supported".to_string(),
        ))
    }

    /// Set column over an element descriptor.
    ///
    /// When `strict`, ordered input is rejected at validation instead of
    /// coerced. Fails if the element is itself a container.
    pub fn set(element: Column, strict: bool) -> Result<Self, Error> {
        container::check_element(&element)?;
        Ok(Self::with_kind(ColumnKind::Set {
            element: Box::new(element),
            strict,
        }))
    }

    /// List column over an element descriptor.
    pub fn list(element: Column) -> Result<Self, Error> {
        container::check_element(&element)?;
        Ok(Self::with_kind(ColumnKind::List {
            element: Box::new(element),
        }))
    }

    /// Map column over a key descriptor and a value descriptor.
    pub fn map(key: Column, value: Column) -> Result<Self, Error> {
        container::check_element(&key)?;
        container::check_element(&value)?;
        Ok(Self::with_kind(ColumnKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        }))
    }

    /// Mark as a primary key column. The owning schema decides which
    /// primary key is the partition key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as indexed.
    pub fn with_index(mut self) -> Self {
        self.index = true;
        self
    }

    /// Override the storage field name.
    pub fn with_db_field(mut self, name: impl Into<String>) -> Self {
        self.db_field = Some(name.into());
        self
    }

    /// Make the column optional (required = false).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set a static default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = ColumnDefault::Static(value);
        self
    }

    /// Set a generated default, produced each time it resolves.
    pub fn with_generated_default(
        mut self,
        producer: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.default = ColumnDefault::Generated(Arc::new(producer));
        self
    }

    /// Minimum text length in characters. Only meaningful on text columns.
    pub fn with_min_length(mut self, min: usize) -> Self {
        if let ColumnKind::Text { min_length, .. } = &mut self.kind {
            *min_length = Some(min);
        }
        self
    }

    /// Maximum text length in characters. Only meaningful on text columns.
    pub fn with_max_length(mut self, max: usize) -> Self {
        if let ColumnKind::Text { max_length, .. } = &mut self.kind {
            *max_length = Some(max);
        }
        self
    }

    /// Store as single precision (`float`). Only meaningful on float
    /// columns.
    pub fn with_single_precision(mut self) -> Self {
        if let ColumnKind::Float { double_precision } = &mut self.kind {
            *double_precision = false;
        }
        self
    }

    /// Assign the declared attribute name. Called by the owning schema
    /// during model construction; ignored for naming when `db_field` is
    /// set.
    pub fn set_column_name(&mut self, name: impl Into<String>) {
        self.column_name = Some(name.into());
    }

    /// Mark this column as the partition key. Only the owning schema
    /// assigns this.
    pub fn set_partition_key(&mut self) {
        self.partition_key = true;
    }

    /// The type variant of this column.
    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    /// Declaration order, assigned once at construction from a
    /// process-wide counter.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_partition_key(&self) -> bool {
        self.partition_key
    }

    pub fn is_indexed(&self) -> bool {
        self.index
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check if any default is configured.
    pub fn has_default(&self) -> bool {
        self.default.is_configured()
    }

    /// Primary key columns cannot be deleted from an instance.
    pub fn can_delete(&self) -> bool {
        !self.primary_key
    }

    /// The storage field name: explicit override if set, else the
    /// declared attribute name. The owning schema must have assigned one
    /// of the two before the name is used.
    pub fn db_field_name(&self) -> &str {
        debug_assert!(
            self.db_field.is_some() || self.column_name.is_some(),
            "column name was not assigned by the schema layer"
        );
        self.db_field
            .as_deref()
            .or(self.column_name.as_deref())
            .unwrap_or_default()
    }

    /// Derived name for this column's index.
    pub fn db_index_name(&self) -> String {
        format!("index_{}", self.db_field_name())
    }

    /// Column fragment for a table definition statement.
    pub fn get_schema_fragment(&self) -> String {
        format!("{} {}", self.db_field_name(), self.kind.db_type())
    }

    /// The explicit get/set/optional-delete interface for this column,
    /// wired into the owning type's field table at schema-assembly time.
    pub fn accessor(&self) -> ColumnAccessor {
        ColumnAccessor::new(self.can_delete())
    }

    fn label(&self) -> &str {
        let name = self.column_name.as_deref().or(self.db_field.as_deref());
        name.unwrap_or("column")
    }

    /// Resolve the configured default, invoking the producer if dynamic.
    pub fn get_default(&self) -> Option<Value> {
        match &self.default {
            ColumnDefault::None => None,
            ColumnDefault::Static(v) => Some(v.clone()),
            ColumnDefault::Generated(producer) => {
                let v = producer();
                debug!(column = %self.label(), "resolved generated default");
                Some(v)
            }
        }
    }

    /// Validate a value, returning its cleaned form.
    ///
    /// The shared pipeline runs first: a missing value becomes the
    /// resolved default when one is configured, fails when the column is
    /// required, and passes through otherwise. Type-specific checks follow
    /// for present values.
    pub fn validate(&self, value: Value) -> Result<Value, Error> {
        let value = if value.is_null() {
            match self.get_default() {
                Some(resolved) => resolved,
                None if self.required => {
                    return Err(Error::Validation(format!(
                        "{} - null values are not allowed",
                        self.label()
                    )));
                }
                None => return Ok(Value::Null),
            }
        } else {
            value
        };
        if value.is_null() {
            // An explicit Null default resolves to a present Null.
            return Ok(Value::Null);
        }
        self.kind.check(value, self.label(), self.required)
    }

    /// Convert a stored value into its application representation.
    pub fn to_python(&self, value: Value) -> Result<Value, Error> {
        self.kind.decode(value)
    }

    /// Convert an application value into its storage representation,
    /// substituting the resolved default for a missing value.
    pub fn to_database(&self, value: Value) -> Result<DbValue, Error> {
        let value = if value.is_null() {
            self.get_default().unwrap_or(Value::Null)
        } else {
            value
        };
        self.kind.encode(value, self.label())
    }
}
