// This file is part of the terraform-provider-fortios project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine-side view of a resource state, and the typed records Terraform
//! (de)serializes.
//!
//! Every registered kind is a typed record generated by [`resource_state!`];
//! the codecs never see those records, they work on an [`InternalState`]
//! built from them.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};

use crate::schema::{FieldDescriptor, FieldKind, Presence, ResourceSchema};

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(i64),
    Bool(bool),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One row of a table field, keyed by column name.
pub type Row = BTreeMap<String, Value<Scalar>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(Scalar),
    Table(Vec<Row>),
}

pub type FieldValue = Value<Field>;

/// Address of one cell of a table, as used for explicit-set lookups.
pub fn cell_path(table: &str, index: usize, column: &str) -> String {
    format!("{table}.{index}.{column}")
}

/// Contract between the codecs and whatever holds the resource state.
pub trait StateStore {
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
    fn clear_id(&mut self);

    /// Known value of a field, if any.
    fn get(&self, name: &str) -> Option<&Field>;
    fn set(&mut self, name: &str, value: FieldValue);

    /// Whether the user configured this field or table cell.
    fn is_set(&self, path: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalState {
    id: Option<String>,
    fields: BTreeMap<String, FieldValue>,
    explicit: BTreeSet<String>,
}

impl InternalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a typed record. When a configuration is given, every
    /// non-null value of it is recorded as explicitly set.
    pub fn from_record<K: StateRecord>(record: &K, config: Option<&K>) -> Self {
        let mut state = Self::new();
        if let Value::Value(id) = record.id() {
            if !id.is_empty() {
                state.id = Some(id.to_string());
            }
        }
        for field in K::schema().fields() {
            state.fields.insert(field.name.clone(), record.get(&field.name));
        }
        if let Some(config) = config {
            for field in K::schema().fields() {
                match config.get(&field.name) {
                    Value::Value(Field::Scalar(_)) => {
                        state.explicit.insert(field.name.clone());
                    }
                    Value::Value(Field::Table(rows)) => {
                        if !rows.is_empty() {
                            state.explicit.insert(field.name.clone());
                        }
                        for (index, row) in rows.iter().enumerate() {
                            for (column, cell) in row {
                                if let Value::Value(_) = cell {
                                    state.explicit.insert(cell_path(&field.name, index, column));
                                }
                            }
                        }
                    }
                    _ => (),
                }
            }
        }
        state
    }

    /// Write every field and the identity back into a typed record.
    pub fn apply_to<K: StateRecord>(&self, record: &mut K) {
        for (name, value) in &self.fields {
            record.set(name, value.clone());
        }
        *record.id_mut() = match &self.id {
            Some(id) => Value::Value(Cow::Owned(id.clone())),
            None => Value::Null,
        };
    }

    pub fn with(mut self, name: &str, value: Field) -> Self {
        self.fields.insert(name.to_owned(), Value::Value(value));
        self
    }

    pub fn mark_explicit(&mut self, path: impl Into<String>) {
        self.explicit.insert(path.into());
    }
}

impl StateStore for InternalState {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn clear_id(&mut self) {
        self.id = None;
    }

    fn get(&self, name: &str) -> Option<&Field> {
        match self.fields.get(name) {
            Some(Value::Value(field)) => Some(field),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_owned(), value);
    }

    fn is_set(&self, path: &str) -> bool {
        self.explicit.contains(path)
    }
}

/// A scalar attribute of a typed record.
pub trait ScalarCell: Sized {
    fn to_scalar(&self) -> Value<Scalar>;
    fn from_scalar(value: Value<Scalar>) -> Self;
}

impl ScalarCell for ValueString<'static> {
    fn to_scalar(&self) -> Value<Scalar> {
        match self {
            Value::Value(s) => Value::Value(Scalar::String(s.to_string())),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }

    fn from_scalar(value: Value<Scalar>) -> Self {
        match value {
            Value::Value(Scalar::String(s)) => Value::Value(Cow::Owned(s)),
            Value::Value(other) => Value::Value(Cow::Owned(other.to_string())),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }
}

impl ScalarCell for ValueNumber {
    fn to_scalar(&self) -> Value<Scalar> {
        match self {
            Value::Value(n) => Value::Value(Scalar::Number(*n)),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }

    fn from_scalar(value: Value<Scalar>) -> Self {
        match value {
            Value::Value(Scalar::Number(n)) => Value::Value(n),
            Value::Value(Scalar::String(s)) => s.trim().parse().map_or(Value::Null, Value::Value),
            Value::Value(Scalar::Bool(b)) => Value::Value(b as i64),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }
}

impl ScalarCell for Value<bool> {
    fn to_scalar(&self) -> Value<Scalar> {
        match self {
            Value::Value(b) => Value::Value(Scalar::Bool(*b)),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }

    fn from_scalar(value: Value<Scalar>) -> Self {
        match value {
            Value::Value(Scalar::Bool(b)) => Value::Value(b),
            Value::Value(Scalar::Number(n)) => Value::Value(n != 0),
            Value::Value(Scalar::String(s)) => match s.as_str() {
                "true" | "enable" => Value::Value(true),
                "false" | "disable" => Value::Value(false),
                _ => Value::Null,
            },
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }
}

/// A top-level attribute of a typed record.
pub trait StateCell: Sized {
    fn to_field(&self) -> FieldValue;
    fn from_field(value: FieldValue) -> Self;
}

macro_rules! scalar_state_cell {
    ($($ty:ty),*) => {
        $(
            impl StateCell for $ty {
                fn to_field(&self) -> FieldValue {
                    match self.to_scalar() {
                        Value::Value(scalar) => Value::Value(Field::Scalar(scalar)),
                        Value::Null => Value::Null,
                        Value::Unknown => Value::Unknown,
                    }
                }

                fn from_field(value: FieldValue) -> Self {
                    Self::from_scalar(match value {
                        Value::Value(Field::Scalar(scalar)) => Value::Value(scalar),
                        Value::Value(Field::Table(_)) | Value::Null => Value::Null,
                        Value::Unknown => Value::Unknown,
                    })
                }
            }
        )*
    };
}

scalar_state_cell!(ValueString<'static>, ValueNumber, Value<bool>);

/// A row type of a table attribute, generated by [`table_row!`].
pub trait RowRecord: Sized {
    fn columns() -> Vec<FieldDescriptor>;
    fn to_row(&self) -> Row;
    fn from_row(row: Row) -> Self;
}

impl<R: RowRecord> StateCell for ValueList<Value<R>> {
    fn to_field(&self) -> FieldValue {
        match self {
            Value::Value(rows) => Value::Value(Field::Table(
                rows.iter()
                    .filter_map(Value::as_ref_option)
                    .map(R::to_row)
                    .collect(),
            )),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }

    // Nested blocks are never null on the Terraform side: an absent table is
    // materialized as an empty list.
    fn from_field(value: FieldValue) -> Self {
        match value {
            Value::Value(Field::Table(rows)) => Value::Value(
                rows.into_iter()
                    .map(|row| Value::Value(R::from_row(row)))
                    .collect(),
            ),
            Value::Value(Field::Scalar(_)) | Value::Null => Value::Value(Vec::new()),
            Value::Unknown => Value::Unknown,
        }
    }
}

/// Typed state of one resource kind, generated by [`resource_state!`].
pub trait StateRecord:
    Debug + Default + Clone + PartialEq + Send + Sync + Serialize + for<'de> Deserialize<'de> + 'static
{
    fn schema() -> &'static ResourceSchema;
    fn id(&self) -> &ValueString<'static>;
    fn id_mut(&mut self) -> &mut ValueString<'static>;
    fn get(&self, name: &str) -> FieldValue;
    fn set(&mut self, name: &str, value: FieldValue);

    /// Mark every unset computed attribute as unknown, to be filled by the
    /// appliance.
    fn mark_computed_unknown(&mut self) {
        for field in Self::schema().fields() {
            let computed = is_computed(field);
            match (&field.kind, self.get(&field.name)) {
                (FieldKind::Table { columns, .. }, Value::Value(Field::Table(mut rows))) => {
                    for row in rows.iter_mut() {
                        for column in columns.iter().filter(|c| is_computed(c)) {
                            let cell = row.entry(column.name.clone()).or_default();
                            if cell.is_null() {
                                *cell = Value::Unknown;
                            }
                        }
                    }
                    self.set(&field.name, Value::Value(Field::Table(rows)));
                }
                (FieldKind::Table { .. }, _) => (),
                (_, Value::Null) if computed => self.set(&field.name, Value::Unknown),
                _ => (),
            }
        }
    }

    /// Replace every value still unknown after an apply by null.
    fn settle(&mut self) {
        for field in Self::schema().fields() {
            match self.get(&field.name) {
                Value::Unknown => self.set(&field.name, Value::Null),
                Value::Value(Field::Table(mut rows)) => {
                    let mut changed = false;
                    for cell in rows.iter_mut().flat_map(|row| row.values_mut()) {
                        if cell.is_unknown() {
                            *cell = Value::Null;
                            changed = true;
                        }
                    }
                    if changed {
                        self.set(&field.name, Value::Value(Field::Table(rows)));
                    }
                }
                _ => (),
            }
        }
    }
}

fn is_computed(field: &FieldDescriptor) -> bool {
    matches!(
        field.presence,
        Presence::Computed | Presence::OptionalComputed
    ) && !field.local
        && !field.write_only
}

/// Declare the row type of a table attribute.
///
/// Each column is `name: Type = constructor(args).modifier(args)...`, the
/// constructor and modifiers being those of [`FieldDescriptor`].
macro_rules! table_row {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $field:ident : $ty:ty = $ctor:ident ( $($carg:expr),* ) $( . $method:ident ( $($arg:expr),* ) )*
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl $crate::state::RowRecord for $name {
            fn columns() -> Vec<$crate::schema::FieldDescriptor> {
                vec![
                    $(
                        $crate::schema::FieldDescriptor::$ctor(stringify!($field) $(, $carg)*)
                            $( .$method($($arg),*) )*
                    ),*
                ]
            }

            fn to_row(&self) -> $crate::state::Row {
                let mut row = $crate::state::Row::new();
                $(
                    row.insert(
                        stringify!($field).to_owned(),
                        $crate::state::ScalarCell::to_scalar(&self.$field),
                    );
                )*
                row
            }

            fn from_row(mut row: $crate::state::Row) -> Self {
                Self {
                    $(
                        $field: $crate::state::ScalarCell::from_scalar(
                            row.remove(stringify!($field)).unwrap_or_default(),
                        ),
                    )*
                }
            }
        }
    };
}

/// Declare the typed state of a resource kind together with its schema.
macro_rules! resource_state {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            schema: $schema:expr,
            fields: {
                $(
                    $field:ident : $ty:ty = $ctor:ident ( $($carg:expr),* ) $( . $method:ident ( $($arg:expr),* ) )*
                ),* $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            pub id: ::tf_provider::value::ValueString<'static>,
            $(pub $field: $ty,)*
        }

        impl $crate::state::StateRecord for $name {
            fn schema() -> &'static $crate::schema::ResourceSchema {
                static SCHEMA: ::std::sync::OnceLock<$crate::schema::ResourceSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $schema.with_fields(vec![
                        $(
                            $crate::schema::FieldDescriptor::$ctor(stringify!($field) $(, $carg)*)
                                $( .$method($($arg),*) )*
                        ),*
                    ])
                })
            }

            fn id(&self) -> &::tf_provider::value::ValueString<'static> {
                &self.id
            }

            fn id_mut(&mut self) -> &mut ::tf_provider::value::ValueString<'static> {
                &mut self.id
            }

            fn get(&self, name: &str) -> $crate::state::FieldValue {
                match name {
                    $(stringify!($field) => $crate::state::StateCell::to_field(&self.$field),)*
                    _ => ::tf_provider::value::Value::Null,
                }
            }

            fn set(&mut self, name: &str, value: $crate::state::FieldValue) {
                match name {
                    $(stringify!($field) => self.$field = $crate::state::StateCell::from_field(value),)*
                    _ => (),
                }
            }
        }
    };
}

pub(crate) use resource_state;
pub(crate) use table_row;
