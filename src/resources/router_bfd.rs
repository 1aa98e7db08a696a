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


use tf_provider::value::{Value, ValueList, ValueString};

use crate::schema::ResourceSchema;
use crate::state::{resource_state, table_row, RowRecord};

table_row! {
    pub struct BfdNeighbor {
        ip: ValueString<'static> = string().describe("IPv4 address of the BFD neighbor."),
        interface: ValueString<'static> = string().length(0, 15)
            .describe("Interface name."),
    }
}

resource_state! {
    /// Global BFD settings.
    pub struct RouterBfd {
        schema: ResourceSchema::singleton("router_bfd", "RouterBfd", "router/bfd")
            .describe("Configure BFD."),
        fields: {
            neighbor: ValueList<Value<BfdNeighbor>> = table(BfdNeighbor::columns()).dynamic_sort("ip")
                .describe("BFD neighbors."),
            dynamic_sort_subtable: ValueString<'static> = string().optional().local()
                .describe("Sort sub-tables by their natural key, `true` or `false`."),
        }
    }
}
