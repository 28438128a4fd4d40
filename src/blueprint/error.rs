// ABOUTME: Validation errors for malformed blueprints.
// ABOUTME: Raised before any adapter or store call is made.

/// A blueprint that cannot be deployed as submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("template name cannot be empty")]
    EmptyTemplateName,

    #[error("template '{0}' has no images")]
    NoImages(String),

    #[error("image name cannot be empty (template image #{0})")]
    EmptyImageName(usize),

    #[error("override entry name cannot be empty (override entry #{0})")]
    EmptyOverrideName(usize),

    #[error("duplicate image name in template: '{0}'")]
    DuplicateImage(String),

    #[error("duplicate override entry for image: '{0}'")]
    DuplicateOverride(String),
}
