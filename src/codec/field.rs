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

use serde_json::Value as Json;

use crate::schema::ScalarType;
use crate::state::Scalar;

/// Conversion of one scalar between its state and wire representations.
///
/// Codecs never fail: a wire value they cannot make sense of decodes to
/// `None` and the reader applies the field's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCodec {
    Identity,
    /// Machine code on the wire, name in the state.
    Enumerated(&'static [(i64, &'static str)]),
    /// Array of parts on the wire, one string joined by the separator in the
    /// state.
    JoinedPair(char),
}

impl FieldCodec {
    pub fn to_wire(&self, value: &Scalar) -> Json {
        match (self, value) {
            (FieldCodec::Enumerated(entries), Scalar::String(name)) => entries
                .iter()
                .find(|(_, entry)| entry == name)
                .map_or_else(|| Json::from(name.as_str()), |(code, _)| Json::from(*code)),
            (FieldCodec::JoinedPair(separator), Scalar::String(joined)) => Json::Array(
                joined
                    .split(*separator)
                    .filter(|part| !part.is_empty())
                    .map(Json::from)
                    .collect(),
            ),
            (_, Scalar::String(s)) => Json::from(s.as_str()),
            (_, Scalar::Number(n)) => Json::from(*n),
            (_, Scalar::Bool(b)) => Json::from(*b),
        }
    }

    pub fn from_wire(&self, value: &Json, ty: ScalarType) -> Option<Scalar> {
        match (self, value) {
            (_, Json::Null) => None,
            (FieldCodec::Enumerated(entries), Json::Number(code)) => {
                let code = code.as_i64()?;
                Some(Scalar::String(
                    entries
                        .iter()
                        .find(|(entry, _)| *entry == code)
                        .map_or_else(|| code.to_string(), |(_, name)| (*name).to_owned()),
                ))
            }
            (FieldCodec::JoinedPair(separator), Json::Array(parts)) => {
                let mut joined = String::new();
                for part in parts {
                    if !joined.is_empty() {
                        joined.push(*separator);
                    }
                    joined.push_str(&plain_string(part)?);
                }
                Some(Scalar::String(joined))
            }
            (_, value) => decode(value, ty),
        }
    }
}

fn plain_string(value: &Json) -> Option<String> {
    match value {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decode(value: &Json, ty: ScalarType) -> Option<Scalar> {
    match ty {
        ScalarType::String => plain_string(value).map(Scalar::String),
        ScalarType::Number => match value {
            Json::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Scalar::Number),
            Json::String(s) => s.trim().parse().ok().map(Scalar::Number),
            _ => None,
        },
        ScalarType::Bool => match value {
            Json::Bool(b) => Some(Scalar::Bool(*b)),
            Json::Number(n) => n.as_i64().map(|n| Scalar::Bool(n != 0)),
            Json::String(s) => match s.as_str() {
                "true" | "enable" => Some(Scalar::Bool(true)),
                "false" | "disable" => Some(Scalar::Bool(false)),
                _ => None,
            },
            _ => None,
        },
    }
}
