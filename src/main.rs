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


use tf_provider::serve;
use tracing_subscriber::EnvFilter;

mod client;
mod codec;
mod context;
mod controller;
mod error;
mod provider;
mod resource;
mod resources;
mod schema;
mod state;
mod utils;

use crate::provider::FortiosProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The plugin server installs its own subscriber when logging to a file.
    if std::env::var_os("PLUGIN_LOG_FILE").is_none() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_env_filter(filter)
            .try_init();
    }

    serve("fortios", FortiosProvider::default()).await
}
