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

//! Declarative description of a configuration object kind.

use std::collections::HashMap;

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::Value;
use tf_provider::AttributePath;

use crate::codec::FieldCodec;
use crate::error::Error;
use crate::state::{Field, Scalar, StateStore};
use crate::utils::DisplayJoinable;

/// Local attribute enabling the natural-key sort of tables.
pub const DYNAMIC_SORT_FIELD: &str = "dynamic_sort_subtable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    FortiOs,
    FortiManager,
}

impl std::fmt::Display for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Api::FortiOs => f.write_str("FortiOS"),
            Api::FortiManager => f.write_str("FortiManager"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Objects addressed by their own identity.
    Collection,
    /// One settings object per appliance, only ever updated.
    Singleton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    Delete,
    /// No delete verb: tables are reset to empty instead.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Number,
    Bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarType),
    /// Name of another configuration object.
    Reference { target: &'static str },
    Table {
        columns: Vec<FieldDescriptor>,
        natural_key: Option<String>,
    },
}

impl FieldKind {
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            FieldKind::Scalar(ty) => Some(*ty),
            FieldKind::Reference { .. } => Some(ScalarType::String),
            FieldKind::Table { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Length { min: usize, max: usize },
    Range { min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub wire_name: String,
    pub kind: FieldKind,
    pub presence: Presence,
    pub constraints: Vec<Constraint>,
    pub codec: FieldCodec,
    pub force_new: bool,
    pub sensitive: bool,
    /// Terraform-only attribute, never exchanged with the appliance.
    pub local: bool,
    /// Sent to the appliance but never read back.
    pub write_only: bool,
    /// Whether a value the appliance omits is left untouched instead of
    /// failing the read.
    pub tolerate_missing: bool,
    pub description: String,
}

impl FieldDescriptor {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_owned(),
            wire_name: name.replace('_', "-"),
            kind,
            presence: Presence::OptionalComputed,
            constraints: Vec::new(),
            codec: FieldCodec::Identity,
            force_new: false,
            sensitive: false,
            local: false,
            write_only: false,
            tolerate_missing: true,
            description: String::new(),
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarType::String))
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarType::Number))
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarType::Bool))
    }

    pub fn reference(name: &str, target: &'static str) -> Self {
        Self::new(name, FieldKind::Reference { target })
            .describe(&format!("Name of a `{target}` object."))
    }

    pub fn table(name: &str, columns: Vec<FieldDescriptor>) -> Self {
        Self::new(
            name,
            FieldKind::Table {
                columns,
                natural_key: None,
            },
        )
        .optional()
    }

    pub fn required(self) -> Self {
        Self {
            presence: Presence::Required,
            ..self
        }
    }

    pub fn optional(self) -> Self {
        Self {
            presence: Presence::Optional,
            ..self
        }
    }

    pub fn computed(self) -> Self {
        Self {
            presence: Presence::Computed,
            ..self
        }
    }

    pub fn force_new(self) -> Self {
        Self {
            force_new: true,
            ..self
        }
    }

    pub fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }

    pub fn local(self) -> Self {
        Self {
            local: true,
            ..self
        }
    }

    pub fn write_only(self) -> Self {
        Self {
            write_only: true,
            ..self
        }
    }

    pub fn strict(self) -> Self {
        Self {
            tolerate_missing: false,
            ..self
        }
    }

    pub fn wire(self, wire_name: &str) -> Self {
        Self {
            wire_name: wire_name.to_owned(),
            ..self
        }
    }

    pub fn codec(self, codec: FieldCodec) -> Self {
        Self { codec, ..self }
    }

    pub fn describe(self, description: &str) -> Self {
        Self {
            description: description.to_owned(),
            ..self
        }
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.constraints.push(Constraint::Length { min, max });
        self
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.constraints.push(Constraint::Range { min, max });
        self
    }

    /// Sort the rows of this table by `column` when dynamic sort is enabled.
    pub fn dynamic_sort(mut self, column: &str) -> Self {
        if let FieldKind::Table { natural_key, .. } = &mut self.kind {
            *natural_key = Some(column.to_owned());
        }
        self
    }

    /// Reason why `value` violates this field's constraints, if it does.
    pub fn check(&self, value: &Scalar) -> Option<String> {
        for constraint in &self.constraints {
            match (constraint, value) {
                (Constraint::Length { min, max }, Scalar::String(s)) => {
                    let len = s.chars().count();
                    if len < *min || len > *max {
                        return Some(format!(
                            "expected length between {min} and {max}, got {len}"
                        ));
                    }
                }
                (Constraint::Range { min, max }, Scalar::Number(n)) => {
                    if n < min || n > max {
                        return Some(format!("expected a value between {min} and {max}, got {n}"));
                    }
                }
                _ => (),
            }
        }
        if let (FieldCodec::Enumerated(entries), Scalar::String(s)) = (&self.codec, value) {
            if !entries.iter().any(|(_, name)| name == s) {
                return Some(format!(
                    "expected one of {}, got {s:?}",
                    entries.iter().map(|(_, name)| name).join_with(", ")
                ));
            }
        }
        None
    }

    fn attribute(&self) -> Attribute {
        let attr_type = match self.kind.scalar_type() {
            Some(ScalarType::Number) => AttributeType::Number,
            Some(ScalarType::Bool) => AttributeType::Bool,
            _ => AttributeType::String,
        };
        Attribute {
            attr_type,
            description: Description::plain(&self.description),
            constraint: match self.presence {
                Presence::Required => AttributeConstraint::Required,
                Presence::Optional => AttributeConstraint::Optional,
                Presence::Computed => AttributeConstraint::Computed,
                Presence::OptionalComputed => AttributeConstraint::OptionalComputed,
            },
            sensitive: self.sensitive,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchema {
    pub name: &'static str,
    /// Identity used when the appliance does not echo one.
    pub fallback_id: &'static str,
    pub path: &'static str,
    pub api: Api,
    pub lifecycle: Lifecycle,
    pub delete_mode: DeleteMode,
    /// Field whose value identifies the object when the appliance does not.
    pub key_field: Option<&'static str>,
    pub description: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl ResourceSchema {
    pub fn collection(name: &'static str, fallback_id: &'static str, path: &'static str) -> Self {
        Self {
            name,
            fallback_id,
            path,
            api: Api::FortiOs,
            lifecycle: Lifecycle::Collection,
            delete_mode: DeleteMode::Delete,
            key_field: None,
            description: "",
            fields: Vec::new(),
        }
    }

    pub fn singleton(name: &'static str, fallback_id: &'static str, path: &'static str) -> Self {
        Self {
            lifecycle: Lifecycle::Singleton,
            delete_mode: DeleteMode::Clear,
            ..Self::collection(name, fallback_id, path)
        }
    }

    pub fn api(self, api: Api) -> Self {
        Self { api, ..self }
    }

    pub fn key_field(self, key_field: &'static str) -> Self {
        Self {
            key_field: Some(key_field),
            ..self
        }
    }

    pub fn describe(self, description: &'static str) -> Self {
        Self {
            description,
            ..self
        }
    }

    pub fn with_fields(self, fields: Vec<FieldDescriptor>) -> Self {
        Self { fields, ..self }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn dynamic_sort(&self, state: &impl StateStore) -> bool {
        self.field(DYNAMIC_SORT_FIELD).is_some()
            && matches!(
                state.get(DYNAMIC_SORT_FIELD),
                Some(Field::Scalar(Scalar::String(flag))) if flag == "true"
            )
    }

    /// Check every known value against the declared constraints.
    pub fn validate(&self, state: &impl StateStore) -> Vec<(AttributePath, Error)> {
        let mut violations = Vec::new();

        for field in &self.fields {
            match (&field.kind, state.get(&field.name)) {
                (FieldKind::Table { columns, .. }, Some(Field::Table(rows))) => {
                    if rows.is_empty() && field.presence == Presence::Required {
                        violations.push((
                            AttributePath::new(field.name.clone()),
                            Error::constraint(&field.name, "at least one entry is required"),
                        ));
                    }
                    for (index, row) in rows.iter().enumerate() {
                        for column in columns {
                            let Some(Value::Value(value)) = row.get(&column.name) else {
                                continue;
                            };
                            if let Some(reason) = column.check(value) {
                                violations.push((
                                    AttributePath::new(field.name.clone())
                                        .index(index as i64)
                                        .attribute(column.name.clone()),
                                    Error::constraint(
                                        format!("{}[{index}].{}", field.name, column.name),
                                        reason,
                                    ),
                                ));
                            }
                        }
                    }
                }
                (_, Some(Field::Scalar(value))) => {
                    if let Some(reason) = field.check(value) {
                        violations.push((
                            AttributePath::new(field.name.clone()),
                            Error::constraint(&field.name, reason),
                        ));
                    }
                }
                _ => (),
            }
        }

        violations
    }

    pub fn to_tf_schema(&self) -> Schema {
        let mut block = block_of(&self.fields, self.description);
        block.attributes.insert(
            "id".to_owned(),
            Attribute {
                attr_type: AttributeType::String,
                description: Description::plain("Identity of the object on the appliance"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        );
        Schema { version: 1, block }
    }
}

fn block_of(fields: &[FieldDescriptor], description: &str) -> Block {
    let mut attributes = HashMap::new();
    let mut blocks = HashMap::new();

    for field in fields {
        if let FieldKind::Table { columns, .. } = &field.kind {
            blocks.insert(
                field.name.clone(),
                NestedBlock::List(block_of(columns, &field.description)),
            );
        } else {
            attributes.insert(field.name.clone(), field.attribute());
        }
    }

    Block {
        attributes,
        blocks,
        description: Description::plain(description),
        ..Default::default()
    }
}
