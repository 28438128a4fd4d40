// ABOUTME: Field-level merge of override entries into template images.
// ABOUTME: Output keeps the template's image order; overrides never add or remove images.

use super::image::{Image, Template};
use super::overrides::{Override, PartialImage};

/// Merge `overrides` into `template`, one output image per template image.
///
/// Override entries naming images absent from the template are dropped.
pub fn merge(template: &Template, overrides: &Override) -> Vec<Image> {
    // First entry wins; validation rejects duplicate names before we get here.
    template
        .images
        .iter()
        .map(|image| match overrides.entry(&image.name) {
            Some(partial) => image.merged_with(partial),
            None => image.clone(),
        })
        .collect()
}

impl Image {
    /// Apply one override entry. Present fields replace, absent ones fall through.
    pub fn merged_with(&self, partial: &PartialImage) -> Image {
        let mut merged = self.clone();

        // Replace scalar fields only when supplied and non-empty
        if let Some(source) = non_empty_str(&partial.source) {
            merged.source = source.to_string();
        }
        if let Some(command) = non_empty_str(&partial.command) {
            merged.command = command.to_string();
        }

        // Collections are replaced wholesale, never combined
        if let Some(links) = non_empty_vec(&partial.links) {
            merged.links = links.to_vec();
        }
        if let Some(ports) = non_empty_vec(&partial.ports) {
            merged.ports = ports.to_vec();
        }
        if let Some(environment) = non_empty_vec(&partial.environment) {
            merged.environment = environment.to_vec();
        }

        // An explicit zero still counts as provided
        if let Some(count) = partial.count() {
            merged.deployment_settings.count = count;
        }

        merged
    }
}

fn non_empty_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn non_empty_vec<T>(value: &Option<Vec<T>>) -> Option<&[T]> {
    value.as_deref().filter(|items| !items.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{EnvVar, PartialDeploymentSettings, Port};

    fn wordpress() -> Image {
        Image {
            name: "wp".to_string(),
            source: "centurylink/wordpress:3.9.1".to_string(),
            command: "./run.sh".to_string(),
            ports: vec![Port {
                host_port: 8000,
                container_port: 80,
            }],
            environment: vec![EnvVar {
                variable: "DB_PASSWORD".to_string(),
                value: "pass1".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn empty_strings_fall_through() {
        let partial = PartialImage {
            source: Some(String::new()),
            command: Some(String::new()),
            ..PartialImage::named("wp")
        };
        assert_eq!(wordpress().merged_with(&partial), wordpress());
    }

    #[test]
    fn empty_collections_fall_through() {
        let partial = PartialImage {
            ports: Some(vec![]),
            environment: Some(vec![]),
            links: Some(vec![]),
            ..PartialImage::named("wp")
        };
        assert_eq!(wordpress().merged_with(&partial), wordpress());
    }

    #[test]
    fn explicit_zero_count_replaces() {
        let mut image = wordpress();
        image.deployment_settings.count = 3;

        let partial = PartialImage {
            deployment_settings: Some(PartialDeploymentSettings { count: Some(0) }),
            ..PartialImage::named("wp")
        };
        assert_eq!(image.merged_with(&partial).deployment_settings.count, 0);
    }

    #[test]
    fn settings_block_without_count_keeps_template_count() {
        let mut image = wordpress();
        image.deployment_settings.count = 2;

        let partial = PartialImage {
            deployment_settings: Some(PartialDeploymentSettings { count: None }),
            ..PartialImage::named("wp")
        };
        assert_eq!(image.merged_with(&partial).deployment_settings.count, 2);
    }

    #[test]
    fn first_duplicate_override_wins() {
        let template = Template::new("t", vec![wordpress()]);
        let overrides = Override {
            images: vec![
                PartialImage {
                    source: Some("first".to_string()),
                    ..PartialImage::named("wp")
                },
                PartialImage {
                    source: Some("second".to_string()),
                    ..PartialImage::named("wp")
                },
            ],
        };
        assert_eq!(merge(&template, &overrides)[0].source, "first");
    }
}
