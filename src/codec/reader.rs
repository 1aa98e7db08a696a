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

use std::collections::BTreeMap;

use serde_json::Value as Json;
use tf_provider::value::Value;
use tracing::warn;

use super::table::json_kind;
use super::{TableCodec, WireObject};
use crate::error::{Error, Result};
use crate::schema::{Presence, ResourceSchema, ScalarType};
use crate::state::{Field, FieldValue, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Materialize every table the appliance returns.
    Import,
    /// Refresh only the tables the state already holds rows for.
    Managed,
}

/// Populates state fields from a response object.
#[derive(Debug, Clone, Copy)]
pub struct ObjectReader<'a> {
    schema: &'a ResourceSchema,
    mode: ReadMode,
    dynamic_sort: bool,
}

impl<'a> ObjectReader<'a> {
    pub fn new(schema: &'a ResourceSchema, mode: ReadMode) -> Self {
        Self {
            schema,
            mode,
            dynamic_sort: false,
        }
    }

    pub fn dynamic_sort(self, dynamic_sort: bool) -> Self {
        Self {
            dynamic_sort,
            ..self
        }
    }

    /// Fields to update in the state. Scalars the appliance omits or
    /// returns as null are blanked; undecodable ones keep their prior value.
    pub fn read(
        &self,
        object: &WireObject,
        prior: &impl StateStore,
    ) -> Result<BTreeMap<String, FieldValue>> {
        let mut fields = BTreeMap::new();

        for field in self.schema.fields() {
            if field.local || field.write_only {
                continue;
            }
            let wire = object.get(&field.wire_name);

            if let Some(table) = TableCodec::for_field(field) {
                let managed = matches!(
                    prior.get(&field.name),
                    Some(Field::Table(rows)) if !rows.is_empty()
                );
                if self.mode == ReadMode::Managed && !managed {
                    continue;
                }
                let value = match table.from_wire(wire, self.dynamic_sort)? {
                    Some(rows) => Value::Value(Field::Table(rows)),
                    None => Value::Null,
                };
                fields.insert(field.name.clone(), value);
                continue;
            }

            let value = match wire {
                None | Some(Json::Null) => {
                    if field.presence == Presence::Required && !field.tolerate_missing {
                        return Err(Error::decode(&field.name, "missing from the response"));
                    }
                    fields.insert(field.name.clone(), Value::Null);
                    continue;
                }
                Some(value) => value,
            };
            let ty = field.kind.scalar_type().unwrap_or(ScalarType::String);
            match field.codec.from_wire(value, ty) {
                Some(scalar) => {
                    fields.insert(field.name.clone(), Value::Value(Field::Scalar(scalar)));
                }
                None if field.tolerate_missing => {
                    warn!(
                        resource = self.schema.name,
                        field = field.name.as_str(),
                        got = json_kind(value),
                        "ignoring undecodable field"
                    );
                }
                None => {
                    return Err(Error::decode(
                        &field.name,
                        format!("unexpected {}", json_kind(value)),
                    ))
                }
            }
        }

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value as Json};
    use tf_provider::value::Value;

    use super::{ObjectReader, ReadMode};
    use crate::codec::WireObject;
    use crate::error::Error;
    use crate::schema::{FieldDescriptor, ResourceSchema, DYNAMIC_SORT_FIELD};
    use crate::state::{Field, FieldValue, InternalState, Row, Scalar};

    fn schema() -> ResourceSchema {
        ResourceSchema::collection("certificate_ca", "CertificateCa", "certificate/ca").with_fields(
            vec![
                FieldDescriptor::string("name").required().strict(),
                FieldDescriptor::string("ca"),
                FieldDescriptor::string("scep_url"),
                FieldDescriptor::number("auto_update_days"),
                FieldDescriptor::string("password").sensitive().write_only(),
                FieldDescriptor::table("server", vec![FieldDescriptor::string("address")])
                    .dynamic_sort("address"),
                FieldDescriptor::string(DYNAMIC_SORT_FIELD).optional().local(),
            ],
        )
    }

    fn object(value: Json) -> WireObject {
        match value {
            Json::Object(object) => object,
            other => panic!("not an object: {other}"),
        }
    }

    fn text(s: &str) -> FieldValue {
        Value::Value(Field::Scalar(Scalar::String(s.to_owned())))
    }

    fn server(addresses: &[&str]) -> Field {
        Field::Table(
            addresses
                .iter()
                .map(|address| {
                    let mut row = Row::new();
                    row.insert(
                        "address".to_owned(),
                        Value::Value(Scalar::String((*address).to_owned())),
                    );
                    row
                })
                .collect(),
        )
    }

    fn read(mode: ReadMode, wire: Json, prior: &InternalState) -> BTreeMap<String, FieldValue> {
        ObjectReader::new(&schema(), mode)
            .read(&object(wire), prior)
            .expect("response should decode")
    }

    #[test]
    fn wire_names_map_back_to_state_names() {
        let fields = read(
            ReadMode::Managed,
            json!({"name": "X", "ca": "-----BEGIN", "scep-url": "http://scep", "auto-update-days": 7}),
            &InternalState::new(),
        );

        assert_eq!(fields.get("scep_url"), Some(&text("http://scep")));
        assert_eq!(
            fields.get("auto_update_days"),
            Some(&Value::Value(Field::Scalar(Scalar::Number(7))))
        );
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn local_and_write_only_fields_are_never_read() {
        let fields = read(
            ReadMode::Import,
            json!({"name": "X", "password": "ENC xyz", "dynamic-sort-subtable": "true"}),
            &InternalState::new(),
        );
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            ["auto_update_days", "ca", "name", "scep_url", "server"]
        );
    }

    #[test]
    fn managed_mode_skips_tables_the_state_does_not_hold() {
        let wire = json!({"name": "X", "server": [{"address": "8.8.8.8"}]});

        let fields = read(ReadMode::Managed, wire.clone(), &InternalState::new());
        assert_eq!(fields.get("server"), None);

        let prior = InternalState::new().with("server", server(&["1.1.1.1"]));
        let fields = read(ReadMode::Managed, wire, &prior);
        assert_eq!(fields.get("server"), Some(&Value::Value(server(&["8.8.8.8"]))));
    }

    #[test]
    fn import_mode_materializes_every_table() {
        let fields = read(
            ReadMode::Import,
            json!({"name": "X", "server": [{"address": "8.8.8.8"}]}),
            &InternalState::new(),
        );
        assert_eq!(fields.get("server"), Some(&Value::Value(server(&["8.8.8.8"]))));

        let fields = read(ReadMode::Import, json!({"name": "X"}), &InternalState::new());
        assert_eq!(fields.get("server"), Some(&Value::Null));
    }

    #[test]
    fn dynamic_sort_reorders_tables() {
        let fields = ObjectReader::new(&schema(), ReadMode::Import)
            .dynamic_sort(true)
            .read(
                &object(json!({
                    "name": "X",
                    "server": [{"address": "9.9.9.9"}, {"address": "1.1.1.1"}],
                })),
                &InternalState::new(),
            )
            .expect("response should decode");
        assert_eq!(
            fields.get("server"),
            Some(&Value::Value(server(&["1.1.1.1", "9.9.9.9"])))
        );
    }

    #[test]
    fn omitted_scalars_are_blanked() {
        let prior = InternalState::new()
            .with("ca", Field::Scalar(Scalar::String("-----OLD".to_owned())))
            .with("scep_url", Field::Scalar(Scalar::String("http://old".to_owned())));

        let fields = read(ReadMode::Managed, json!({"name": "X", "ca": null}), &prior);

        assert_eq!(fields.get("name"), Some(&text("X")));
        assert_eq!(fields.get("ca"), Some(&Value::Null));
        assert_eq!(fields.get("scep_url"), Some(&Value::Null));
        assert_eq!(fields.get("password"), None);
    }

    #[test]
    fn undecodable_values_follow_the_field_policy() {
        let fields = read(
            ReadMode::Managed,
            json!({"name": "X", "auto-update-days": "soon"}),
            &InternalState::new(),
        );
        assert_eq!(fields.get("auto_update_days"), None);

        let err = ObjectReader::new(&schema(), ReadMode::Managed)
            .read(&object(json!({"name": ["X"]})), &InternalState::new());
        assert!(matches!(err, Err(Error::Decode { field, .. }) if field == "name"));
    }

    #[test]
    fn strict_required_field_must_be_present() {
        let err = ObjectReader::new(&schema(), ReadMode::Managed)
            .read(&object(json!({"ca": "-----BEGIN"})), &InternalState::new());
        assert!(matches!(err, Err(Error::Decode { field, .. }) if field == "name"));
    }
}
