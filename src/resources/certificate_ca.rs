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


use tf_provider::value::{ValueNumber, ValueString};

use crate::schema::ResourceSchema;
use crate::state::resource_state;

resource_state! {
    /// CA certificate.
    pub struct CertificateCa {
        schema: ResourceSchema::collection("certificate_ca", "CertificateCa", "certificate/ca")
            .describe("CA certificate."),
        fields: {
            name: ValueString<'static> = string().required().force_new().strict().length(0, 79)
                .describe("Name."),
            ca: ValueString<'static> = string().required()
                .describe("CA certificate as a PEM file."),
            range: ValueString<'static> = string()
                .describe("Either global or VDOM IP address range for the CA certificate."),
            source: ValueString<'static> = string()
                .describe("CA certificate source type."),
            trusted: ValueString<'static> = string()
                .describe("Enable/disable as a trusted CA."),
            scep_url: ValueString<'static> = string()
                .describe("URL of the SCEP server."),
            auto_update_days: ValueNumber = number()
                .describe("Number of days to wait before requesting an updated CA certificate."),
            auto_update_days_warning: ValueNumber = number()
                .describe("Number of days before an expiry-warning message is generated."),
            source_ip: ValueString<'static> = string().length(0, 255)
                .describe("Source IP address for communications to the SCEP server."),
            last_updated: ValueNumber = number().computed()
                .describe("Time at which CA was last updated."),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value as Json};
    use tf_provider::schema::AttributeConstraint;
    use tf_provider::value::Value;

    use super::CertificateCa;
    use crate::codec::{BuildMode, ObjectBuilder};
    use crate::state::{InternalState, StateRecord};

    #[test]
    fn underscores_become_dashes_on_the_wire() {
        let config = CertificateCa {
            name: Value::Value(Cow::Borrowed("CA_1")),
            ca: Value::Value(Cow::Borrowed("-----BEGIN CERTIFICATE-----")),
            scep_url: Value::Value(Cow::Borrowed("http://scep.example")),
            auto_update_days: Value::Value(7),
            ..Default::default()
        };
        let state = InternalState::from_record(&config, Some(&config));

        let object = ObjectBuilder::new(CertificateCa::schema())
            .build(&state, BuildMode::Create)
            .map(Json::Object)
            .expect("state should build");

        assert_eq!(
            object,
            json!({
                "name": "CA_1",
                "ca": "-----BEGIN CERTIFICATE-----",
                "scep-url": "http://scep.example",
                "auto-update-days": 7,
            })
        );
    }

    #[test]
    fn update_time_belongs_to_the_appliance() {
        let tf = CertificateCa::schema().to_tf_schema();
        assert_eq!(
            tf.block.attributes.get("last_updated").map(|attr| attr.constraint.clone()),
            Some(AttributeConstraint::Computed)
        );

        let mut planned = CertificateCa {
            name: Value::Value(Cow::Borrowed("CA_1")),
            ..Default::default()
        };
        planned.mark_computed_unknown();
        assert!(planned.last_updated.is_unknown());

        let object = ObjectBuilder::new(CertificateCa::schema())
            .build(&InternalState::from_record(&planned, Some(&planned)), BuildMode::Create)
            .expect("state should build");
        assert!(!object.contains_key("last-updated"));
    }

    #[test]
    fn long_names_are_rejected() {
        let config = CertificateCa {
            name: Value::Value(Cow::Owned("x".repeat(80))),
            ..Default::default()
        };
        let violations = CertificateCa::schema().validate(&InternalState::from_record(&config, None));
        assert_eq!(violations.len(), 1);
    }
}
