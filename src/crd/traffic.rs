//! Service-mesh traffic policy primitives.
//!
//! Opaque configuration blocks passed through to the policy-enforcement
//! layer; no cross-field invariants are enforced here.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Circuit breaking for a component's upstream connections.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreaking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_pool: Option<ConnectionPoolSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier_detection: Option<OutlierDetection>,
    /// Traffic policies that apply to specific ports of the service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_level_settings: Vec<PortTrafficPolicy>,
}

/// Connection pool settings for an upstream host.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct ConnectionPoolSettings {
    /// Settings common to both HTTP and TCP upstream connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<TCPSettings>,
    /// HTTP connection pool settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HTTPSettings>,
}

/// Settings common to both HTTP and TCP upstream connections.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TCPSettings {
    /// Maximum number of HTTP1/TCP connections to a destination host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<i32>,
    /// TCP connection timeout. Format: 1h/1m/1s/1ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<String>,
}

/// Settings applicable to HTTP1.1/HTTP2/GRPC connections.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPSettings {
    /// Maximum number of pending HTTP requests to a destination. Default 1024.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http1_max_pending_requests: Option<i32>,
    /// Maximum number of requests to a backend. Default 1024.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http2_max_requests: Option<i32>,
    /// Maximum number of requests per connection to a backend. Setting this
    /// to 1 disables keep alive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_requests_per_connection: Option<i32>,
    /// Maximum number of retries that can be outstanding to all hosts in a
    /// cluster at a given time. Defaults to 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i32>,
}

/// Outlier ejection thresholds for hosts in the load balancing pool.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutlierDetection {
    /// Number of errors before a host is ejected from the connection pool.
    /// Defaults to 5. Over HTTP a 5xx return code qualifies as an error;
    /// over an opaque TCP connection, connect timeouts and connection
    /// error/failure events qualify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consecutive_errors: Option<i32>,
    /// Time interval between ejection sweep analysis. Format: 1h/1m/1s/1ms.
    /// Must be >= 1ms. Default is 10s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    /// Minimum ejection duration. A host remains ejected for a period equal
    /// to the product of this duration and the number of times it has been
    /// ejected, growing the period for persistently unhealthy hosts.
    /// Format: 1h/1m/1s/1ms. Must be >= 1ms. Default is 30s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_ejection_time: Option<String>,
    /// Maximum % of hosts in the load balancing pool that can be ejected.
    /// Defaults to 10%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ejection_percent: Option<i32>,
}

/// Traffic policy applied to a specific port of the service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortTrafficPolicy {
    pub port: PortSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_pool: Option<ConnectionPoolSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier_detection: Option<OutlierDetection>,
}

/// Selects a service port by number or name. Set one of the two fields.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct PortSelector {
    /// Valid port number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Valid port name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Load balancing algorithm selection: standard algorithm or consistent
/// hashing.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple: Option<SimpleLB>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistent_hash: Option<ConsistentHashLB>,
}

/// Standard load balancing algorithms.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimpleLB {
    /// Round robin policy. Default.
    RoundRobin,
    /// Selects two random healthy hosts and picks the one with fewer active
    /// requests.
    LeastConn,
    /// Selects a random healthy host. Generally performs better than round
    /// robin when no health checking policy is configured.
    Random,
    /// Forwards the connection to the original IP requested by the caller
    /// without any form of load balancing. Meant for advanced use cases.
    Passthrough,
}

impl fmt::Display for SimpleLB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::RoundRobin => "ROUND_ROBIN",
                Self::LeastConn => "LEAST_CONN",
                Self::Random => "RANDOM",
                Self::Passthrough => "PASSTHROUGH",
            }
        )
    }
}

impl FromStr for SimpleLB {
    type Err = AppError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "ROUND_ROBIN" => Ok(Self::RoundRobin),
            "LEAST_CONN" => Ok(Self::LeastConn),
            "RANDOM" => Ok(Self::Random),
            "PASSTHROUGH" => Ok(Self::Passthrough),
            other => Err(AppError::UnknownLoadBalancer(other.to_string())),
        }
    }
}

/// Consistent-hashing load balancing configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsistentHashLB {
    /// Hash on the value of this HTTP header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_header_name: Option<String>,
    /// Hash on the caller's source IP.
    #[serde(default, skip_serializing_if = "is_false")]
    pub use_source_ip: bool,
    /// Minimum number of virtual nodes in the hash ring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_ring_size: Option<u64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}
