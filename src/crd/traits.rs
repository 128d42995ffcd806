//! Trait bundles: named, optional policy/configuration blocks attached to
//! a component. `ComponentTraitsForDev` carries developer-facing concerns,
//! `ComponentTraitsForOpt` operations-facing ones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::traffic::CircuitBreaking;

/// Developer-facing trait bundle.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTraitsForDev {
    /// Image registry credentials for the component's containers.
    pub image_pull_config: ImagePullConfig,
    /// Assign a static IP to the component's service.
    #[serde(default, rename = "staticIP", skip_serializing_if = "is_false")]
    pub static_ip: bool,
    /// Load balancing policy for the component's ingress.
    #[serde(default, rename = "ingressLB", skip_serializing_if = "Option::is_none")]
    pub ingress_lb: Option<IngressLB>,
}

/// Operations-facing trait bundle.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTraitsForOpt {
    /// Fixed replica count for the component's workload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_scaler: Option<ManualScaler>,
    /// Persistent volume bound to the component's workload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mounter: Option<VolumeMounter>,
    /// Ingress routing for the component.
    pub ingress: AppIngress,
    /// Users granted access to the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_list: Option<WhiteList>,
    /// Hosts ejected from the component's load balancing pool.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub eject: Vec<String>,
    /// Fusing action applied to the component's pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fusing: Option<Fusing>,
    /// Request rate limiting for the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    /// Circuit breaking for the component's upstream connections.
    #[serde(default, rename = "circuitbreaking", skip_serializing_if = "Option::is_none")]
    pub circuit_breaking: Option<CircuitBreaking>,
    /// Retry policy for requests to the component.
    #[serde(default, rename = "httpretry", skip_serializing_if = "Option::is_none")]
    pub http_retry: Option<HttpRetry>,
    /// Metric-driven autoscaling for the component's workload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<Autoscaling>,
    /// Custom metric endpoint scraped from the component.
    #[serde(default, rename = "custommetric", skip_serializing_if = "Option::is_none")]
    pub custom_metric: Option<CustomMetric>,
    /// Seconds granted to the component's pods for graceful shutdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_grace_period_seconds: Option<i64>,
}

/// Image registry credentials.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct ImagePullConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Load balancing policy for a component's ingress.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngressLB {
    /// Load balancer type: `rr`, `leastConn` or `random`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_type: Option<String>,
    /// Consistent hashing key, e.g. `sourceIP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistent_type: Option<String>,
}

/// Fixed replica count for a component's workload.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct ManualScaler {
    pub replicas: i32,
}

/// Persistent volume bound to a component's workload.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMounter {
    /// Name of the volume to bind.
    pub volume_name: String,
    /// Storage class the volume is provisioned from.
    pub storage_class: String,
}

/// Ingress routing for a component.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppIngress {
    /// Host the component is served under.
    pub host: String,
    /// Path prefix routed to the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Service port traffic is routed to.
    pub server_port: i32,
}

/// Users granted access to a component.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct WhiteList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
}

/// Fusing action applied to a component's pods.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Fusing {
    /// Pods the action applies to.
    #[serde(default, rename = "podlist", skip_serializing_if = "Vec::is_empty")]
    pub pod_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Request rate limiting for a component.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    /// Window the request budget applies to, e.g. `1m`.
    pub time_duration: String,
    /// Requests allowed per window.
    pub request_amount: i32,
    /// Per-user overrides of the request budget.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<Override>,
}

/// Per-user override of a rate limit.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    /// Requests allowed per window for this user.
    pub request_amount: i32,
    /// The user the override applies to.
    pub user: String,
}

/// Retry policy for requests to a component.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct HttpRetry {
    /// Number of retries for a given request.
    pub attempts: i32,
    /// Timeout per retry attempt, e.g. `2s`.
    #[serde(rename = "pertrytimeout")]
    pub per_try_timeout: String,
}

/// Metric-driven autoscaling for a component's workload.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Autoscaling {
    /// The metric scaling decisions are based on.
    pub metric: String,
    /// Metric threshold at which the workload is scaled.
    pub threshold: i64,
    #[serde(rename = "maxreplicas")]
    pub max_replicas: i32,
    #[serde(rename = "minreplicas")]
    pub min_replicas: i32,
}

/// Custom metric endpoint scraped from a component.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct CustomMetric {
    #[serde(default)]
    pub enable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod test {
    use super::*;

    fn minimal_opt_traits() -> ComponentTraitsForOpt {
        ComponentTraitsForOpt {
            manual_scaler: None,
            volume_mounter: None,
            ingress: AppIngress {
                host: "app.example.com".into(),
                path: None,
                server_port: 80,
            },
            white_list: None,
            eject: vec![],
            fusing: None,
            rate_limit: None,
            circuit_breaking: None,
            http_retry: None,
            autoscaling: None,
            custom_metric: None,
            termination_grace_period_seconds: None,
        }
    }

    #[test]
    fn unset_opt_traits_serialize_to_ingress_only() {
        let value = serde_json::to_value(&minimal_opt_traits()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["ingress"]);
        assert!(obj.get("whiteList").is_none());
    }

    #[test]
    fn opt_traits_use_legacy_wire_keys() {
        let mut traits = minimal_opt_traits();
        traits.http_retry = Some(HttpRetry {
            attempts: 3,
            per_try_timeout: "2s".into(),
        });
        traits.custom_metric = Some(CustomMetric {
            enable: true,
            uri: Some("/metrics".into()),
        });
        traits.autoscaling = Some(Autoscaling {
            metric: "cpu".into(),
            threshold: 80,
            max_replicas: 10,
            min_replicas: 2,
        });
        let value = serde_json::to_value(&traits).unwrap();
        assert_eq!(value["httpretry"]["pertrytimeout"], "2s");
        assert_eq!(value["custommetric"]["enable"], true);
        assert_eq!(value["autoscaling"]["maxreplicas"], 10);
        assert_eq!(value["autoscaling"]["minreplicas"], 2);

        let decoded: ComponentTraitsForOpt = serde_json::from_value(value).unwrap();
        assert_eq!(traits, decoded);
    }

    #[test]
    fn rate_limit_with_overrides_round_trips() {
        let limit = RateLimit {
            time_duration: "1m".into(),
            request_amount: 100,
            overrides: vec![Override {
                request_amount: 1000,
                user: "batch-loader".into(),
            }],
        };
        let yaml = serde_yaml::to_string(&limit).unwrap();
        let decoded: RateLimit = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(limit, decoded);
    }

    #[test]
    fn dev_traits_static_ip_uses_exact_key_and_is_omitted_when_false() {
        let mut traits = ComponentTraitsForDev {
            image_pull_config: ImagePullConfig::default(),
            static_ip: false,
            ingress_lb: None,
        };
        let value = serde_json::to_value(&traits).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["imagePullConfig"]);

        traits.static_ip = true;
        traits.ingress_lb = Some(IngressLB {
            lb_type: Some("leastConn".into()),
            consistent_type: None,
        });
        let value = serde_json::to_value(&traits).unwrap();
        assert_eq!(value["staticIP"], true);
        assert_eq!(value["ingressLB"]["lbType"], "leastConn");
    }
}
