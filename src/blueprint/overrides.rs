// ABOUTME: Deploy-time customizations applied on top of a template.
// ABOUTME: Every field is optional so "not provided" differs from "provided as zero".

use serde::{Deserialize, Serialize};

use super::image::{EnvVar, Link, Port};

/// Partial image record matched to a template image by `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialImage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<Port>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Vec<EnvVar>>,
    #[serde(
        default,
        rename = "deployment",
        skip_serializing_if = "Option::is_none"
    )]
    pub deployment_settings: Option<PartialDeploymentSettings>,
}

impl PartialImage {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The explicitly supplied count, if any (zero included).
    pub fn count(&self) -> Option<u32> {
        self.deployment_settings.and_then(|settings| settings.count)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDeploymentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Caller-supplied customization, ordered as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    #[serde(default)]
    pub images: Vec<PartialImage>,
}

impl Override {
    /// An override that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The first entry for `name`, if any.
    pub fn entry(&self, name: &str) -> Option<&PartialImage> {
        self.images.iter().find(|partial| partial.name == name)
    }
}
