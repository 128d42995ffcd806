//! Application model error abstractions.

use thiserror::Error;

/// Application model error variants.
#[derive(Debug, Error)]
pub enum AppError {
    /// The given literal is not a known workload type.
    #[error("unknown workload type: {0}")]
    UnknownWorkloadType(String),
    /// The given literal is not a known image pull policy.
    #[error("unknown image pull policy: {0}")]
    UnknownPullPolicy(String),
    /// The given literal is not a known load balancer algorithm.
    #[error("unknown load balancer algorithm: {0}")]
    UnknownLoadBalancer(String),
    /// The given literal is not a known parameter type.
    #[error("unknown parameter type: {0}")]
    UnknownParameterType(String),
}
