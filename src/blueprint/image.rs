// ABOUTME: Concrete service definitions as submitted to the adapter.
// ABOUTME: Image, Template and their link/port/environment sub-records.

use serde::{Deserialize, Serialize};

/// One service's desired configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Unique within a template.
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub environment: Vec<EnvVar>,
    #[serde(default, rename = "deployment")]
    pub deployment_settings: DeploymentSettings,
}

/// Network link to another service, exposed under `alias`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub service: String,
    pub alias: String,
}

/// Port mapping (host:container).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub host_port: u16,
    pub container_port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub variable: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    /// Number of instances; zero when the template does not say.
    #[serde(default)]
    pub count: u32,
}

/// A named, ordered set of images: a reusable deployment shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Template {
    pub fn new(name: impl Into<String>, images: Vec<Image>) -> Self {
        Self {
            name: name.into(),
            images,
        }
    }
}
