// ABOUTME: Deployment blueprints: a template plus a deploy-time override.
// ABOUTME: Validates input and merges the two into concrete images.

mod error;
mod image;
mod merge;
mod overrides;

pub use error::ValidationError;
pub use image::{DeploymentSettings, EnvVar, Image, Link, Port, Template};
pub use merge::merge;
pub use overrides::{Override, PartialDeploymentSettings, PartialImage};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Transient create/redeploy input. Never persisted as such.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub template: Template,
    #[serde(default, rename = "override")]
    pub overrides: Override,
}

impl Blueprint {
    pub fn new(template: Template, overrides: Override) -> Self {
        Self {
            template,
            overrides,
        }
    }

    /// A blueprint that deploys `template` as-is.
    pub fn from_template(template: Template) -> Self {
        Self::new(template, Override::empty())
    }

    /// Reject structurally malformed input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.template.name.is_empty() {
            return Err(ValidationError::EmptyTemplateName);
        }
        if self.template.images.is_empty() {
            return Err(ValidationError::NoImages(self.template.name.clone()));
        }

        let mut seen = HashSet::new();
        for (index, image) in self.template.images.iter().enumerate() {
            if image.name.is_empty() {
                return Err(ValidationError::EmptyImageName(index));
            }
            if !seen.insert(image.name.as_str()) {
                return Err(ValidationError::DuplicateImage(image.name.clone()));
            }
        }

        let mut seen = HashSet::new();
        for (index, partial) in self.overrides.images.iter().enumerate() {
            if partial.name.is_empty() {
                return Err(ValidationError::EmptyOverrideName(index));
            }
            if !seen.insert(partial.name.as_str()) {
                return Err(ValidationError::DuplicateOverride(partial.name.clone()));
            }
        }

        Ok(())
    }

    /// Template images with the override applied, in template order.
    pub fn merged_images(&self) -> Vec<Image> {
        merge(&self.template, &self.overrides)
    }
}
