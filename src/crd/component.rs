//! Component schema: one deployable unit of an Application.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::container::ComponentContainer;
use crate::crd::traits::{ComponentTraitsForDev, ComponentTraitsForOpt};
use crate::error::AppError;

/// One deployable unit within an Application, identified by name + version.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// The name of this component, unique within an application.
    pub name: String,
    /// The version of this component.
    pub version: String,
    /// Typed inputs which other fields may reference by name instead of
    /// embedding a literal value. See [`ValueSource`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// The lifecycle/cardinality classification of this component.
    pub workload_type: WorkloadType,
    /// Operating system required by the component's containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
    /// CPU architecture required by the component's containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// The containers which make up this component.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ComponentContainer>,
    /// Additional name/type/value settings passed through to the workload.
    ///
    /// The wire key `workloadSetings` is the name persisted by existing
    /// consumers and must not be corrected.
    #[serde(default, rename = "workloadSetings", skip_serializing_if = "Vec::is_empty")]
    pub workload_settings: Vec<WorkloadSetting>,
    /// Developer-facing trait bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_traits: Option<ComponentTraitsForDev>,
    /// Operations-facing trait bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_traits: Option<ComponentTraitsForOpt>,
}

impl Component {
    /// The identifier of this component, used to key the status resource map.
    pub fn id(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Look up a parameter of this component by name.
    ///
    /// This is the target of a `fromParam` reference. Reference resolution
    /// itself is performed by the controller, not here.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|param| param.name == name)
    }
}

/// The lifecycle/cardinality classification of a component.
///
/// Singleton variants cap the number of running instances at one.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, JsonSchema)]
pub enum WorkloadType {
    /// A long-running, horizontally scalable workload serving requests.
    Server,
    /// A server capped at a single running instance.
    SingletonServer,
    /// A long-running workload which consumes work without serving requests.
    Worker,
    /// A worker capped at a single running instance.
    SingletonWorker,
    /// A workload which runs to completion.
    Task,
    /// A task capped at a single running instance.
    ///
    /// The duplicated suffix in the wire literal is the value persisted by
    /// existing consumers and must not be corrected.
    #[serde(rename = "SingletonTaskTask")]
    SingletonTask,
}

impl WorkloadType {
    /// Whether this workload type caps the instance count at one.
    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::SingletonServer | Self::SingletonWorker | Self::SingletonTask)
    }
}

impl fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Server => "Server",
                Self::SingletonServer => "SingletonServer",
                Self::Worker => "Worker",
                Self::SingletonWorker => "SingletonWorker",
                Self::Task => "Task",
                Self::SingletonTask => "SingletonTaskTask",
            }
        )
    }
}

impl FromStr for WorkloadType {
    type Err = AppError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "Server" => Ok(Self::Server),
            "SingletonServer" => Ok(Self::SingletonServer),
            "Worker" => Ok(Self::Worker),
            "SingletonWorker" => Ok(Self::SingletonWorker),
            "Task" => Ok(Self::Task),
            "SingletonTaskTask" => Ok(Self::SingletonTask),
            other => Err(AppError::UnknownWorkloadType(other.to_string())),
        }
    }
}

/// A named, typed input which other fields may reference via `fromParam`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Parameter {
    /// The name of this parameter, unique within a component.
    pub name: String,
    /// Human-readable description of this parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The type of this parameter's value.
    pub r#type: ParameterType,
    /// Whether a value must be supplied for this parameter.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// The value used when none is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// The type of a parameter or workload setting value.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Int,
    Float,
    String,
    Bool,
    Json,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Int => "int",
                Self::Float => "float",
                Self::String => "string",
                Self::Bool => "bool",
                Self::Json => "json",
            }
        )
    }
}

impl FromStr for ParameterType {
    type Err = AppError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "json" => Ok(Self::Json),
            other => Err(AppError::UnknownParameterType(other.to_string())),
        }
    }
}

/// A name/type/value setting passed through to the workload object.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct WorkloadSetting {
    /// The name of the setting.
    pub name: String,
    /// The type of the setting's value.
    pub r#type: ParameterType,
    /// The setting's value, inline or parameter-sourced.
    #[serde(flatten)]
    pub value: ValueSource,
}

/// Source for a settable value: either an inline literal (`value`) or a
/// reference to a named parameter of the enclosing component (`fromParam`).
///
/// Exactly one of the two wire keys is present; a document carrying both
/// or neither is rejected at deserialization.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ValueSource {
    /// An inline literal value.
    Value(String),
    /// The name of the component parameter providing the value.
    FromParam(String),
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! wire_literal_test {
        ($name:ident, $variant:expr, $literal:literal) => {
            #[test]
            fn $name() {
                let json = serde_json::to_string(&$variant).unwrap();
                assert_eq!(
                    format!("\"{}\"", $literal),
                    json,
                    "expected wire literal `{}` did not match actual `{}`",
                    $literal,
                    json,
                );
                let decoded = serde_json::from_str(&json).unwrap();
                assert_eq!($variant, decoded);
            }
        };
    }

    wire_literal_test!(workload_type_server, WorkloadType::Server, "Server");
    wire_literal_test!(workload_type_singleton_server, WorkloadType::SingletonServer, "SingletonServer");
    wire_literal_test!(workload_type_worker, WorkloadType::Worker, "Worker");
    wire_literal_test!(workload_type_singleton_worker, WorkloadType::SingletonWorker, "SingletonWorker");
    wire_literal_test!(workload_type_task, WorkloadType::Task, "Task");
    wire_literal_test!(workload_type_singleton_task, WorkloadType::SingletonTask, "SingletonTaskTask");

    wire_literal_test!(parameter_type_int, ParameterType::Int, "int");
    wire_literal_test!(parameter_type_float, ParameterType::Float, "float");
    wire_literal_test!(parameter_type_string, ParameterType::String, "string");
    wire_literal_test!(parameter_type_bool, ParameterType::Bool, "bool");
    wire_literal_test!(parameter_type_json, ParameterType::Json, "json");

    #[test]
    fn out_of_set_workload_type_is_rejected() {
        let res: Result<WorkloadType, _> = serde_json::from_str("\"Sidecar\"");
        assert!(res.is_err());
        assert!("Sidecar".parse::<WorkloadType>().is_err());
    }

    #[test]
    fn workload_type_display_matches_wire_literal() {
        assert_eq!(WorkloadType::SingletonTask.to_string(), "SingletonTaskTask");
        assert_eq!("SingletonTaskTask".parse::<WorkloadType>().unwrap(), WorkloadType::SingletonTask);
    }

    #[test]
    fn singleton_variants_cap_instances() {
        assert!(WorkloadType::SingletonServer.is_singleton());
        assert!(WorkloadType::SingletonWorker.is_singleton());
        assert!(WorkloadType::SingletonTask.is_singleton());
        assert!(!WorkloadType::Server.is_singleton());
        assert!(!WorkloadType::Worker.is_singleton());
        assert!(!WorkloadType::Task.is_singleton());
    }

    #[test]
    fn workload_settings_use_legacy_wire_key() {
        let component = Component {
            name: "ingest".into(),
            version: "v1".into(),
            parameters: vec![],
            workload_type: WorkloadType::Server,
            os_type: None,
            arch: None,
            containers: vec![],
            workload_settings: vec![WorkloadSetting {
                name: "queueDepth".into(),
                r#type: ParameterType::Int,
                value: ValueSource::Value("16".into()),
            }],
            dev_traits: None,
            opt_traits: None,
        };
        let value = serde_json::to_value(&component).unwrap();
        assert!(value.get("workloadSetings").is_some());
        assert!(value.get("workloadSettings").is_none());
        assert_eq!(value["workloadSetings"][0]["value"], "16");
    }

    #[test]
    fn component_id_is_name_dash_version() {
        let component = Component {
            name: "ingest".into(),
            version: "v1".into(),
            parameters: vec![],
            workload_type: WorkloadType::Worker,
            os_type: None,
            arch: None,
            containers: vec![],
            workload_settings: vec![],
            dev_traits: None,
            opt_traits: None,
        };
        assert_eq!(component.id(), "ingest-v1");
    }

    #[test]
    fn parameter_lookup_by_name() {
        let component = Component {
            name: "ingest".into(),
            version: "v1".into(),
            parameters: vec![Parameter {
                name: "replicaCount".into(),
                description: Some("number of worker replicas".into()),
                r#type: ParameterType::Int,
                required: false,
                default: Some("1".into()),
            }],
            workload_type: WorkloadType::Worker,
            os_type: None,
            arch: None,
            containers: vec![],
            workload_settings: vec![],
            dev_traits: None,
            opt_traits: None,
        };
        assert!(component.parameter("replicaCount").is_some());
        assert!(component.parameter("missing").is_none());
    }

    #[test]
    fn optional_parameter_fields_are_omitted() {
        let param = Parameter {
            name: "mode".into(),
            description: None,
            r#type: ParameterType::String,
            required: false,
            default: None,
        };
        let value = serde_json::to_value(&param).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["name", "type"]);
    }
}
