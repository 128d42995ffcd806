//! Application CRD.
//!
//! The code here is used to generate the actual CRD used in K8s. See src/bin/crdgen.rs.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::component::Component;

pub type Application = ApplicationCRD; // Mostly to resolve a Rust Analyzer issue.

/// CRD spec for the Application resource.
///
/// An Application describes a multi-component workload. Each component is
/// materialized by the application controller into concrete Kubernetes
/// objects (workloads, services, config maps, routing and policy objects),
/// whose names are recorded back into the status object.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, CustomResource, JsonSchema)]
#[kube(
    struct = "ApplicationCRD",
    status = "ApplicationStatus",
    group = "project.cattle.io",
    version = "v3",
    kind = "Application",
    namespaced,
    derive = "PartialEq",
    apiextensions = "v1",
    shortname = "app"
)]
pub struct ApplicationSpec {
    /// The components which make up this application.
    ///
    /// Order is preserved for display purposes only and carries no semantic
    /// meaning. Component names must be unique within an application, which
    /// is upheld by the controller's admission checks rather than here.
    pub components: Vec<Component>,
}

/// CRD status object.
///
/// Written exclusively by the application controller, never by this crate.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatus {
    /// Kubernetes objects derived from each component, keyed by component
    /// identifier (see [`Component::id`]).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub component_resource: BTreeMap<String, ComponentResources>,
}

/// The names of the Kubernetes objects materialized from a single component,
/// recorded for later lookup and garbage collection.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentResources {
    /// The identifier of the component these objects were derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// The workload object backing the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    /// The service exposing the component's ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Config maps generated from the component's config files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_maps: Vec<String>,
    /// The secret holding the component's image registry credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_secret: Option<String>,
    /// The gateway object routing ingress traffic to the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// The mesh policy object applied to the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// The cluster RBAC config object applied to the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_rbac_config: Option<String>,
    /// The virtual service carrying the component's routing rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_service: Option<String>,
    /// The service role granted to the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_role: Option<String>,
    /// The binding of the component's service role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_role_binding: Option<String>,
    /// The destination rule carrying the component's traffic policy.
    ///
    /// The capitalized key is the wire name persisted by existing consumers.
    #[serde(default, rename = "DestinationRule", skip_serializing_if = "Option::is_none")]
    pub destination_rule: Option<String>,
}

impl ApplicationCRD {
    /// Look up a component of this application by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.spec.components.iter().find(|component| component.name == name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crd::component::{Parameter, ParameterType, ValueSource, WorkloadType};
    use crate::crd::container::{AppPort, CEnvVar, ComponentContainer};

    fn worker_component() -> Component {
        Component {
            name: "ingest".into(),
            version: "v1".into(),
            parameters: vec![Parameter {
                name: "replicaCount".into(),
                description: None,
                r#type: ParameterType::Int,
                required: true,
                default: Some("1".into()),
            }],
            workload_type: WorkloadType::Worker,
            os_type: None,
            arch: None,
            containers: vec![ComponentContainer {
                name: "main".into(),
                image: "nginx:1.21".into(),
                command: vec![],
                args: vec![],
                ports: vec![AppPort {
                    name: None,
                    container_port: 80,
                    protocol: None,
                }],
                env: vec![CEnvVar {
                    name: "REPLICAS".into(),
                    value: ValueSource::FromParam("replicaCount".into()),
                }],
                resources: None,
                liveness_probe: None,
                readiness_probe: None,
                image_pull_policy: None,
                lifecycle: None,
                config: vec![],
                image_pull_secret: None,
                security_context: None,
            }],
            workload_settings: vec![],
            dev_traits: None,
            opt_traits: None,
        }
    }

    #[test]
    fn application_round_trips_through_json() {
        let app = Application::new(
            "demo",
            ApplicationSpec {
                components: vec![worker_component()],
            },
        );
        let json = serde_json::to_string(&app).unwrap();
        let decoded: Application = serde_json::from_str(&json).unwrap();
        assert_eq!(app, decoded);
    }

    #[test]
    fn application_spec_round_trips_through_yaml() {
        let spec = ApplicationSpec {
            components: vec![worker_component()],
        };
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let decoded: ApplicationSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(spec, decoded);
    }

    #[test]
    fn component_lookup_by_name() {
        let app = Application::new(
            "demo",
            ApplicationSpec {
                components: vec![worker_component()],
            },
        );
        assert_eq!(app.component("ingest").map(|c| c.version.as_str()), Some("v1"));
        assert!(app.component("unknown").is_none());
    }

    #[test]
    fn status_entries_are_independent_per_component() {
        let mut status = ApplicationStatus::default();
        status.component_resource.insert(
            "ingest-v1".into(),
            ComponentResources {
                workload: Some("ingest-v1-deployment".into()),
                ..Default::default()
            },
        );
        status.component_resource.insert(
            "frontend-v2".into(),
            ComponentResources {
                workload: Some("frontend-v2-deployment".into()),
                service: Some("frontend-v2".into()),
                ..Default::default()
            },
        );

        let entry = status.component_resource.get_mut("frontend-v2").unwrap();
        entry.virtual_service = Some("frontend-v2-vs".into());

        let untouched = &status.component_resource["ingest-v1"];
        assert_eq!(untouched.workload.as_deref(), Some("ingest-v1-deployment"));
        assert!(untouched.virtual_service.is_none());
    }

    #[test]
    fn destination_rule_uses_capitalized_wire_key() {
        let resources = ComponentResources {
            destination_rule: Some("ingest-v1-dr".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&resources).unwrap();
        assert_eq!(value["DestinationRule"], "ingest-v1-dr");
        assert!(value.get("destinationRule").is_none());
    }

    #[test]
    fn empty_status_omits_resource_map() {
        let value = serde_json::to_value(&ApplicationStatus::default()).unwrap();
        assert!(value.get("componentResource").is_none());
    }
}
