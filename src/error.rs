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

use thiserror::Error;

/// Failures raised while talking to the appliance or translating its objects.
///
/// A missing object is not an error: reads report it as an absent resource.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a usable HTTP response.
    #[error("cannot send request: {0}")]
    Transport(String),

    /// The appliance answered but rejected the request.
    #[error("API error (http status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response did not have the expected shape.
    #[error("cannot decode `{field}`: {reason}")]
    Decode { field: String, reason: String },

    /// A value falls outside the constraints declared by the schema.
    #[error("invalid value for `{field}`: {reason}")]
    Constraint { field: String, reason: String },
}

impl Error {
    pub fn decode(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn constraint(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Constraint {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
