//! Container schema for a component.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::component::ValueSource;
use crate::error::AppError;

/// One container within a component.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentContainer {
    /// The name of this container, unique within a component.
    pub name: String,
    /// The image reference to run.
    pub image: String,
    /// Entrypoint override.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Arguments to the entrypoint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Ports exposed by this container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<AppPort>,
    /// Environment variables, inline or parameter-sourced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<CEnvVar>,
    /// Compute resources requested by this container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<CResource>,
    /// Probe deciding whether the container must be restarted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<HealthProbe>,
    /// Probe deciding whether the container may receive traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<HealthProbe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<PullPolicy>,
    /// Hooks run around the container lifecycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<CLifecycle>,
    /// Config files mounted into the container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config: Vec<ConfigFile>,
    /// Name of the secret holding image registry credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,
}

/// A port declared by a container.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppPort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Port number exposed on the container. Must be in the range 1 to 65535.
    pub container_port: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// An environment variable, inline or parameter-sourced.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct CEnvVar {
    /// The name of the variable.
    pub name: String,
    /// The variable's value, inline or parameter-sourced.
    #[serde(flatten)]
    pub value: ValueSource,
}

/// Compute resources requested by a container.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct CResource {
    /// CPU request, in Kubernetes quantity notation (e.g. `500m`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Memory request, in Kubernetes quantity notation (e.g. `512Mi`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// Number of GPUs required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<i32>,
    /// Volumes required by the container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<CVolume>,
}

/// A volume required by a container.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CVolume {
    pub name: String,
    /// Path at which the volume is mounted into the container.
    pub mount_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_policy: Option<String>,
    pub disk: Disk,
}

/// Disk backing a volume.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Disk {
    /// Required capacity, in Kubernetes quantity notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    /// Whether the disk is discarded with the instance.
    #[serde(default)]
    pub ephemeral: bool,
}

/// A config file rendered into the container, inline or parameter-sourced.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Directory into which the file is rendered.
    pub path: String,
    pub file_name: String,
    /// The file contents, inline or parameter-sourced.
    #[serde(flatten)]
    pub value: ValueSource,
}

/// Hooks run around the container lifecycle.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CLifecycle {
    /// Handler run immediately after the container starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_start: Option<Handler>,
    /// Handler run immediately before the container stops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_stop: Option<Handler>,
}

/// An action taken by a lifecycle hook or probe: one of exec, HTTP GET or
/// TCP socket.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ExecAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_get: Option<HTTPGetAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_socket: Option<TCPSocketAction>,
}

/// A liveness or readiness probe: a handler plus timing thresholds.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthProbe {
    #[serde(flatten)]
    pub handler: Handler,
    /// Seconds after container start before the first probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay_seconds: Option<i32>,
    /// Seconds after which a probe attempt times out. Default 1s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,
    /// Seconds between probe attempts. Default 10s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_seconds: Option<i32>,
    /// Consecutive successes before the probe is considered passing. Default 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_threshold: Option<i32>,
    /// Consecutive failures before the probe is considered failing. Default 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<i32>,
}

/// Command executed inside the container.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct ExecAction {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
}

/// HTTP GET request against the container.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HTTPGetAction {
    /// Path to access on the HTTP server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Port to access on the container. Must be in the range 1 to 65535.
    pub port: i32,
    /// Custom headers to set in the request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http_headers: Vec<HTTPHeader>,
}

/// A header set on a probe or hook HTTP request.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct HTTPHeader {
    /// The header field name.
    pub name: String,
    /// The header field value.
    pub value: String,
}

/// TCP connection attempt against the container.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct TCPSocketAction {
    /// Port to connect to on the container. Must be in the range 1 to 65535.
    pub port: i32,
}

/// Image pull policy for a container.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, JsonSchema)]
pub enum PullPolicy {
    /// Always attempt to pull the latest image. The container fails if the
    /// pull fails.
    Always,
    /// Never pull an image, only use a local image. The container fails if
    /// the image is not present.
    Never,
    /// Pull if the image is not present on disk. The container fails if the
    /// image is not present and the pull fails.
    IfNotPresent,
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Always => "Always",
                Self::Never => "Never",
                Self::IfNotPresent => "IfNotPresent",
            }
        )
    }
}

impl FromStr for PullPolicy {
    type Err = AppError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "Always" => Ok(Self::Always),
            "Never" => Ok(Self::Never),
            "IfNotPresent" => Ok(Self::IfNotPresent),
            other => Err(AppError::UnknownPullPolicy(other.to_string())),
        }
    }
}

/// Security options for a container.
///
/// An explicit extension point in the original schema; intentionally empty
/// until the controller defines its contents.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct SecurityContext {}
