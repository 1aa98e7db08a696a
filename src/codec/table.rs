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

use std::cmp::Ordering;

use serde_json::Value as Json;
use tf_provider::value::Value;
use tracing::warn;

use super::WireObject;
use crate::error::{Error, Result};
use crate::schema::{FieldDescriptor, FieldKind, ScalarType};
use crate::state::{cell_path, Row, Scalar, StateStore};

/// Conversion of an ordered table between state rows and wire objects.
///
/// Rows have no key of their own: cell `c` of row `i` of table `t` is
/// addressed as `t.i.c` when asking the state whether it was set by the user.
#[derive(Debug, Clone, Copy)]
pub struct TableCodec<'a> {
    name: &'a str,
    columns: &'a [FieldDescriptor],
    natural_key: Option<&'a str>,
}

impl<'a> TableCodec<'a> {
    pub fn new(name: &'a str, columns: &'a [FieldDescriptor], natural_key: Option<&'a str>) -> Self {
        Self {
            name,
            columns,
            natural_key,
        }
    }

    /// Codec of a table field, `None` for any other kind.
    pub fn for_field(field: &'a FieldDescriptor) -> Option<Self> {
        match &field.kind {
            FieldKind::Table {
                columns,
                natural_key,
            } => Some(Self::new(&field.name, columns, natural_key.as_deref())),
            _ => None,
        }
    }

    /// Wire rows holding the explicitly set cells only. An empty or absent
    /// table has no wire value.
    pub fn to_wire(&self, rows: Option<&[Row]>, state: &impl StateStore) -> Option<Vec<WireObject>> {
        let rows = rows.filter(|rows| !rows.is_empty())?;

        let wire = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut object = WireObject::new();
                for column in self.columns.iter().filter(|column| !column.local) {
                    if !state.is_set(&cell_path(self.name, index, &column.name)) {
                        continue;
                    }
                    if let Some(Value::Value(cell)) = row.get(&column.name) {
                        object.insert(column.wire_name.clone(), column.codec.to_wire(cell));
                    }
                }
                object
            })
            .collect();
        Some(wire)
    }

    /// State rows decoded from a wire array. Absent, null and empty arrays all
    /// decode to `None`.
    pub fn from_wire(&self, value: Option<&Json>, dynamic_sort: bool) -> Result<Option<Vec<Row>>> {
        let items = match value {
            None | Some(Json::Null) => return Ok(None),
            Some(Json::Array(items)) => items,
            Some(other) => {
                return Err(Error::decode(
                    self.name,
                    format!("expected an array, got {}", json_kind(other)),
                ))
            }
        };
        if matches!(items.first(), None | Some(Json::Null)) {
            return Ok(None);
        }

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Json::Object(object) = item else {
                return Err(Error::decode(
                    format!("{}[{index}]", self.name),
                    format!("expected an object, got {}", json_kind(item)),
                ));
            };
            rows.push(self.decode_row(index, object)?);
        }

        if let Some(key) = self.natural_key.filter(|_| dynamic_sort) {
            rows.sort_by(|a, b| compare_cells(a.get(key), b.get(key)));
        }
        Ok(Some(rows))
    }

    fn decode_row(&self, index: usize, object: &WireObject) -> Result<Row> {
        let mut row = Row::new();
        for column in self.columns.iter().filter(|column| !column.local) {
            let cell = match object.get(&column.wire_name) {
                None | Some(Json::Null) => Value::Null,
                Some(value) => {
                    let ty = column.kind.scalar_type().unwrap_or(ScalarType::String);
                    match column.codec.from_wire(value, ty) {
                        Some(scalar) => Value::Value(scalar),
                        None if column.tolerate_missing => {
                            warn!(
                                table = self.name,
                                index,
                                column = column.name.as_str(),
                                "ignoring undecodable cell"
                            );
                            Value::Null
                        }
                        None => {
                            return Err(Error::decode(
                                format!("{}[{index}].{}", self.name, column.name),
                                format!("unexpected {}", json_kind(value)),
                            ))
                        }
                    }
                }
            };
            row.insert(column.name.clone(), cell);
        }
        Ok(row)
    }
}

fn compare_cells(a: Option<&Value<Scalar>>, b: Option<&Value<Scalar>>) -> Ordering {
    let a = a.and_then(Value::as_ref_option);
    let b = b.and_then(Value::as_ref_option);
    match (a, b) {
        (Some(Scalar::Number(a)), Some(Scalar::Number(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

pub(crate) fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value as Json};
    use tf_provider::value::Value;

    use super::TableCodec;
    use crate::error::Error;
    use crate::schema::FieldDescriptor;
    use crate::state::{cell_path, InternalState, Row, Scalar};

    fn columns() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::string("ip"),
            FieldDescriptor::string("interface"),
            FieldDescriptor::number("priority").optional(),
        ]
    }

    fn row(ip: &str, interface: &str) -> Row {
        let mut row = Row::new();
        row.insert("ip".to_owned(), Value::Value(Scalar::String(ip.to_owned())));
        row.insert(
            "interface".to_owned(),
            Value::Value(Scalar::String(interface.to_owned())),
        );
        row.insert("priority".to_owned(), Value::Null);
        row
    }

    fn all_set(rows: &[Row]) -> InternalState {
        let mut state = InternalState::new();
        for (index, row) in rows.iter().enumerate() {
            for column in row.keys() {
                state.mark_explicit(cell_path("neighbor", index, column));
            }
        }
        state
    }

    fn to_json(rows: Vec<crate::codec::WireObject>) -> Json {
        Json::Array(rows.into_iter().map(Json::Object).collect())
    }

    #[test]
    fn rows_round_trip_in_order() {
        let columns = columns();
        let codec = TableCodec::new("neighbor", &columns, Some("ip"));
        let rows = vec![row("10.0.0.2", "port2"), row("10.0.0.1", "port1")];

        let wire = codec.to_wire(Some(rows.as_slice()), &all_set(&rows)).map(to_json);
        assert_eq!(
            wire,
            Some(json!([
                {"ip": "10.0.0.2", "interface": "port2"},
                {"ip": "10.0.0.1", "interface": "port1"},
            ]))
        );

        let decoded = codec.from_wire(wire.as_ref(), false).expect("table should decode");
        assert_eq!(decoded, Some(rows));
    }

    #[test]
    fn dynamic_sort_orders_by_natural_key_stably() {
        let columns = columns();
        let codec = TableCodec::new("neighbor", &columns, Some("ip"));
        let wire = json!([
            {"ip": "10.0.0.2", "interface": "port2"},
            {"ip": "10.0.0.1", "interface": "port9"},
            {"ip": "10.0.0.1", "interface": "port1"},
        ]);

        let decoded = codec.from_wire(Some(&wire), true).expect("table should decode");
        assert_eq!(
            decoded,
            Some(vec![
                row("10.0.0.1", "port9"),
                row("10.0.0.1", "port1"),
                row("10.0.0.2", "port2"),
            ])
        );
    }

    #[test]
    fn numeric_natural_keys_compare_as_numbers() {
        let columns = vec![FieldDescriptor::number("id")];
        let codec = TableCodec::new("entries", &columns, Some("id"));
        let decoded = codec
            .from_wire(Some(&json!([{"id": 10}, {"id": 9}])), true)
            .expect("table should decode")
            .expect("table should have rows");

        let ids: Vec<_> = decoded.iter().map(|row| row["id"].clone()).collect();
        assert_eq!(
            ids,
            [Value::Value(Scalar::Number(9)), Value::Value(Scalar::Number(10))]
        );
    }

    #[test]
    fn empty_and_absent_tables_have_no_value() {
        let columns = columns();
        let codec = TableCodec::new("neighbor", &columns, None);
        let state = InternalState::new();

        assert_eq!(codec.to_wire(Some(&[][..]), &state), None);
        assert_eq!(codec.to_wire(None, &state), None);
        assert_eq!(codec.from_wire(None, false).ok(), Some(None));
        assert_eq!(codec.from_wire(Some(&json!(null)), false).ok(), Some(None));
        // A confirmed empty table is indistinguishable from an absent one.
        assert_eq!(codec.from_wire(Some(&json!([])), false).ok(), Some(None));
        assert_eq!(codec.from_wire(Some(&json!([null])), false).ok(), Some(None));
    }

    #[test]
    fn only_explicit_cells_are_sent() {
        let columns = columns();
        let codec = TableCodec::new("neighbor", &columns, None);
        let rows = vec![row("10.0.0.1", "port1"), row("10.0.0.2", "port2")];
        let mut state = InternalState::new();
        state.mark_explicit(cell_path("neighbor", 0, "ip"));
        state.mark_explicit(cell_path("neighbor", 1, "interface"));

        assert_eq!(
            codec.to_wire(Some(rows.as_slice()), &state).map(to_json),
            Some(json!([{"ip": "10.0.0.1"}, {"interface": "port2"}]))
        );
    }

    #[test]
    fn malformed_tables_are_decode_errors() {
        let columns = columns();
        let codec = TableCodec::new("neighbor", &columns, None);

        assert!(matches!(
            codec.from_wire(Some(&json!("10.0.0.1")), false),
            Err(Error::Decode { field, .. }) if field == "neighbor"
        ));
        assert!(matches!(
            codec.from_wire(Some(&json!([{"ip": "10.0.0.1"}, 3])), false),
            Err(Error::Decode { field, .. }) if field == "neighbor[1]"
        ));
    }

    #[test]
    fn undecodable_cells_follow_the_column_policy() {
        let lenient = vec![FieldDescriptor::number("priority")];
        let strict = vec![FieldDescriptor::number("priority").strict()];
        let wire = json!([{"priority": "high"}]);

        let decoded = TableCodec::new("neighbor", &lenient, None)
            .from_wire(Some(&wire), false)
            .expect("lenient columns should decode");
        assert_eq!(
            decoded.map(|rows| rows[0]["priority"].clone()),
            Some(Value::Null)
        );
        assert!(TableCodec::new("neighbor", &strict, None)
            .from_wire(Some(&wire), false)
            .is_err());
    }
}
