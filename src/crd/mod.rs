//! Application model CRDs.
//!
//! References:
//! - https://kubernetes.io/docs/tasks/extend-kubernetes/custom-resources/custom-resource-definitions/
//! - https://kubernetes.io/docs/concepts/extend-kubernetes/operator/

mod application;
mod component;
mod container;
mod traits;
mod traffic;

use kube::Resource;

pub use application::{Application, ApplicationSpec, ApplicationStatus, ComponentResources};
pub use component::{Component, Parameter, ParameterType, ValueSource, WorkloadSetting, WorkloadType};
pub use container::{
    AppPort, CEnvVar, CLifecycle, CResource, CVolume, ComponentContainer, ConfigFile, Disk, ExecAction, HTTPGetAction, HTTPHeader, Handler,
    HealthProbe, PullPolicy, SecurityContext, TCPSocketAction,
};
pub use traffic::{
    CircuitBreaking, ConnectionPoolSettings, ConsistentHashLB, HTTPSettings, LoadBalancerSettings, OutlierDetection, PortSelector,
    PortTrafficPolicy, SimpleLB, TCPSettings,
};
pub use traits::{
    AppIngress, Autoscaling, ComponentTraitsForDev, ComponentTraitsForOpt, CustomMetric, Fusing, HttpRetry, ImagePullConfig, IngressLB,
    ManualScaler, Override, RateLimit, VolumeMounter, WhiteList,
};

/// A convenience trait built around the fact that all implementors
/// must have the following attributes.
pub trait RequiredMetadata {
    /// The namespace of this object.
    fn namespace(&self) -> &str;

    /// The name of this object.
    fn name(&self) -> &str;
}

impl RequiredMetadata for Application {
    fn namespace(&self) -> &str {
        self.meta().namespace.as_deref().unwrap_or_default()
    }

    fn name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }
}
