pub mod crd;
pub mod error;

pub use error::AppError;

/// Comma-separated list of canonical label selectors which match the
/// application controller's labelling scheme.
pub const APPLICATION_CONTROLLER_LABEL_SELECTORS: &str = "app=application,project.cattle.io/controlled-by=application-controller";
