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
use tracing::debug;

use super::{TableCodec, WireObject};
use crate::error::{Error, Result};
use crate::schema::ResourceSchema;
use crate::state::{Field, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Create,
    Update,
    /// Reset every table to empty and leave scalars untouched.
    Clear,
}

/// Assembles the request object of a resource from its state.
///
/// Only fields the user explicitly set are emitted, so every request is a
/// partial merge on the appliance side.
#[derive(Debug, Clone, Copy)]
pub struct ObjectBuilder<'a> {
    schema: &'a ResourceSchema,
}

impl<'a> ObjectBuilder<'a> {
    pub fn new(schema: &'a ResourceSchema) -> Self {
        Self { schema }
    }

    pub fn build(&self, state: &impl StateStore, mode: BuildMode) -> Result<WireObject> {
        let mut object = WireObject::new();

        for field in self.schema.fields().iter().filter(|field| !field.local) {
            if let Some(table) = TableCodec::for_field(field) {
                if mode == BuildMode::Clear {
                    object.insert(field.wire_name.clone(), Json::Array(Vec::new()));
                    continue;
                }
                if !state.is_set(&field.name) {
                    continue;
                }
                let rows = match state.get(&field.name) {
                    Some(Field::Table(rows)) => Some(rows.as_slice()),
                    Some(Field::Scalar(_)) => {
                        return Err(Error::decode(&field.name, "expected a table, got a scalar"))
                    }
                    None => None,
                };
                if let Some(rows) = table.to_wire(rows, state) {
                    object.insert(
                        field.wire_name.clone(),
                        Json::Array(rows.into_iter().map(Json::Object).collect()),
                    );
                }
                continue;
            }

            if mode == BuildMode::Clear
                || (field.force_new && mode != BuildMode::Create)
                || !state.is_set(&field.name)
            {
                continue;
            }
            match state.get(&field.name) {
                Some(Field::Scalar(value)) => {
                    object.insert(field.wire_name.clone(), field.codec.to_wire(value));
                }
                Some(Field::Table(_)) => {
                    return Err(Error::decode(&field.name, "expected a scalar, got a table"))
                }
                None => (),
            }
        }

        debug!(
            resource = self.schema.name,
            ?mode,
            fields = object.len(),
            "built request object"
        );
        Ok(object)
    }
}
