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

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::client::{ApiResponse, CallOptions, Method, ResourcePath, Transport};
use crate::codec::{BuildMode, ObjectBuilder, ObjectReader, ReadMode, WireObject};
use crate::schema::{DeleteMode, Lifecycle, ResourceSchema};
use crate::state::{Field, Scalar, StateStore};

/// Drives the lifecycle of one object kind against a transport.
///
/// Every mutation is followed by a read so the state reflects what the
/// appliance stored.
pub struct ResourceController<'a> {
    schema: &'a ResourceSchema,
    transport: &'a dyn Transport,
    options: CallOptions,
    mode: ReadMode,
}

impl<'a> ResourceController<'a> {
    pub fn new(schema: &'a ResourceSchema, transport: &'a dyn Transport, options: CallOptions) -> Self {
        Self {
            schema,
            transport,
            options,
            mode: ReadMode::Managed,
        }
    }

    pub fn read_mode(self, mode: ReadMode) -> Self {
        Self { mode, ..self }
    }

    pub async fn create<S>(&self, state: &mut S) -> Result<()>
    where
        S: StateStore + Send + Sync,
    {
        let name = self.schema.name;
        let object = ObjectBuilder::new(self.schema)
            .build(&*state, BuildMode::Create)
            .with_context(|| format!("Error creating {name} resource while getting object"))?;

        let method = match self.schema.lifecycle {
            Lifecycle::Collection => Method::Post,
            Lifecycle::Singleton => Method::Put,
        };
        debug!(resource = name, %method, "creating resource");
        let response = self
            .mutate(method, &ResourcePath::collection(self.schema.path), &object)
            .await
            .with_context(|| format!("Error creating {name} resource"))?;

        let id = self.identity(&response, &*state);
        state.set_id(id);
        self.read(state).await
    }

    pub async fn update<S>(&self, state: &mut S) -> Result<()>
    where
        S: StateStore + Send + Sync,
    {
        let name = self.schema.name;
        let object = ObjectBuilder::new(self.schema)
            .build(&*state, BuildMode::Update)
            .with_context(|| format!("Error updating {name} resource while getting object"))?;
        let path = self
            .path(&*state)
            .with_context(|| format!("Error updating {name} resource"))?;

        debug!(resource = name, %path, "updating resource");
        let response = self
            .mutate(Method::Put, &path, &object)
            .await
            .with_context(|| format!("Error updating {name} resource"))?;

        let id = self.identity(&response, &*state);
        state.set_id(id);
        self.read(state).await
    }

    /// Refresh the state from the appliance. A missing object clears the
    /// identity without failing.
    pub async fn read<S>(&self, state: &mut S) -> Result<()>
    where
        S: StateStore + Send + Sync,
    {
        let name = self.schema.name;
        let path = self
            .path(&*state)
            .with_context(|| format!("Error reading {name} resource"))?;

        debug!(resource = name, %path, mode = ?self.mode, "reading resource");
        let response = self
            .transport
            .request(Method::Get, &path, None, self.options)
            .await
            .with_context(|| format!("Error reading {name} resource"))?;

        if response.is_not_found() {
            warn!(resource = name, %path, "resource not found, removing from state");
            state.clear_id();
            return Ok(());
        }
        if let Some(err) = response.api_error() {
            return Err(anyhow::Error::from(err).context(format!("Error reading {name} resource")));
        }
        let Some(object) = response.results() else {
            warn!(resource = name, %path, "empty answer, removing from state");
            state.clear_id();
            return Ok(());
        };

        let fields = ObjectReader::new(self.schema, self.mode)
            .dynamic_sort(self.schema.dynamic_sort(&*state))
            .read(object, &*state)
            .with_context(|| format!("Error reading {name} resource from API"))?;
        for (field, value) in fields {
            state.set(&field, value);
        }
        Ok(())
    }

    pub async fn delete<S>(&self, state: &mut S) -> Result<()>
    where
        S: StateStore + Send + Sync,
    {
        let name = self.schema.name;
        let path = self
            .path(&*state)
            .with_context(|| format!("Error deleting {name} resource"))?;

        match self.schema.delete_mode {
            DeleteMode::Delete => {
                debug!(resource = name, %path, "deleting resource");
                let response = self
                    .transport
                    .request(Method::Delete, &path, None, self.options)
                    .await
                    .with_context(|| format!("Error deleting {name} resource"))?;
                if response.is_not_found() {
                    warn!(resource = name, %path, "resource already deleted");
                } else if let Some(err) = response.api_error() {
                    return Err(
                        anyhow::Error::from(err).context(format!("Error deleting {name} resource"))
                    );
                }
            }
            DeleteMode::Clear => {
                let object = ObjectBuilder::new(self.schema)
                    .build(&*state, BuildMode::Clear)
                    .with_context(|| format!("Error clearing {name} resource while getting object"))?;
                if object.is_empty() {
                    debug!(resource = name, %path, "nothing to clear, forgetting resource");
                } else {
                    debug!(resource = name, %path, "clearing resource");
                    self.mutate(Method::Put, &path, &object)
                        .await
                        .with_context(|| format!("Error clearing {name} resource"))?;
                }
            }
        }

        state.clear_id();
        Ok(())
    }

    async fn mutate(
        &self,
        method: Method,
        path: &ResourcePath,
        object: &WireObject,
    ) -> Result<ApiResponse> {
        let response = self
            .transport
            .request(method, path, Some(object), self.options)
            .await?;
        match response.api_error() {
            Some(err) => Err(err.into()),
            None => Ok(response),
        }
    }

    fn path(&self, state: &impl StateStore) -> Result<ResourcePath> {
        match self.schema.lifecycle {
            Lifecycle::Singleton => Ok(ResourcePath::collection(self.schema.path)),
            Lifecycle::Collection => state
                .id()
                .filter(|id| !id.is_empty())
                .map(|id| ResourcePath::object(self.schema.path, id))
                .ok_or_else(|| anyhow!("the resource has no identity")),
        }
    }

    /// Identity after a mutation: the echoed mkey, else the key field, else
    /// the current identity, else the kind's fixed literal.
    fn identity(&self, response: &ApiResponse, state: &impl StateStore) -> String {
        if let Some(mkey) = response.mkey() {
            return mkey;
        }
        let key = self.schema.key_field.and_then(|key| match state.get(key) {
            Some(Field::Scalar(Scalar::String(value))) if !value.is_empty() => Some(value.clone()),
            Some(Field::Scalar(value @ Scalar::Number(_))) => Some(value.to_string()),
            _ => None,
        });
        key.or_else(|| state.id().map(str::to_owned))
            .unwrap_or_else(|| self.schema.fallback_id.to_owned())
    }
}
