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


use tf_provider::value::ValueString;

use crate::schema::ResourceSchema;
use crate::state::resource_state;

resource_state! {
    /// Global settings of the GUI log display.
    pub struct LogGuiDisplay {
        schema: ResourceSchema::singleton("log_guidisplay", "LogGuiDisplay", "log/gui-display")
            .describe("Configure how log messages are displayed on the GUI."),
        fields: {
            resolve_hosts: ValueString<'static> = string()
                .describe("Enable/disable resolving IP addresses to hostname in log messages on the GUI using reverse DNS lookup."),
            resolve_apps: ValueString<'static> = string()
                .describe("Resolve unknown applications on the GUI using Fortinet's remote application database."),
            fortiview_unscanned_apps: ValueString<'static> = string()
                .describe("Enable/disable showing unscanned traffic in FortiView application charts."),
        }
    }
}
