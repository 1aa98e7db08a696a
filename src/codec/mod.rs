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

//! Translation between internal state and the kebab-case JSON objects of
//! the configuration API.

mod builder;
mod field;
mod reader;
mod table;

pub use builder::{BuildMode, ObjectBuilder};
pub use field::FieldCodec;
pub use reader::{ObjectReader, ReadMode};
pub use table::TableCodec;

/// Request or response object, keyed by wire name.
pub type WireObject = serde_json::Map<String, serde_json::Value>;
