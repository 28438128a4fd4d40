// ABOUTME: Config scaffolding for new agents.
// ABOUTME: Creates a gangway.yml starter file.

use std::path::Path;

use crate::error::{Error, Result};

use super::{AgentConfig, CONFIG_FILENAME, DEFAULT_ENDPOINT};

pub fn init_config(dir: &Path, endpoint: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let endpoint = endpoint.unwrap_or(DEFAULT_ENDPOINT);
    validate_endpoint(endpoint)?;

    let yaml = generate_template_yaml(endpoint);
    // Make sure the starter file parses before writing it
    AgentConfig::from_yaml(&yaml)?;
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let uri: hyper::Uri = endpoint
        .parse()
        .map_err(|e| Error::InvalidConfig(format!("adapter endpoint {endpoint}: {e}")))?;
    if uri.scheme_str() != Some("http") || uri.host().is_none() {
        return Err(Error::InvalidConfig(format!(
            "adapter endpoint must be an http:// URL, got {endpoint}"
        )));
    }
    Ok(())
}

fn generate_template_yaml(endpoint: &str) -> String {
    format!(
        r#"listen: 0.0.0.0:3000
# Deadline applied to each API request (optional)
# request_timeout: 60s

adapter:
  endpoint: {endpoint}
  # Or read it from the environment:
  # endpoint:
  #   env: ADAPTER_ENDPOINT
  #   default: {endpoint}
  timeout: 30s

store:
  kind: file
  path: gangway-deployments.json
"#
    )
}
