// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted in-process adapter and blueprint builders.

use async_trait::async_trait;
use gangway::adapter::{AdapterClient, AdapterError, Service};
use gangway::blueprint::{Blueprint, DeploymentSettings, Image, Override, PartialImage, Template};
use gangway::context::OpContext;
use gangway::types::ServiceId;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Once;
use tokio::time::Instant;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("gangway=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One call received by [`FakeAdapter`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(Vec<String>),
    Get(String),
    Delete(String),
    Metadata,
}

#[derive(Default)]
struct FakeState {
    next_service: u32,
    services: BTreeMap<String, String>,
    calls: Vec<Call>,
    deadlines: Vec<Option<Instant>>,
    fail_create: bool,
    fail_get: HashSet<String>,
    fail_delete: HashSet<String>,
    metadata: Option<serde_json::Value>,
}

/// In-process adapter that records every call and fails where told to.
///
/// Created services get ids `svc-1`, `svc-2`, ... and state `running`.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeAdapter {
    state: Mutex<FakeState>,
}

#[allow(dead_code)]
impl FakeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(self, metadata: serde_json::Value) -> Self {
        self.state.lock().metadata = Some(metadata);
        self
    }

    pub fn fail_create(&self) {
        self.state.lock().fail_create = true;
    }

    pub fn fail_get(&self, id: &str) {
        self.state.lock().fail_get.insert(id.to_string());
    }

    pub fn fail_delete(&self, id: &str) {
        self.state.lock().fail_delete.insert(id.to_string());
    }

    /// Make the adapter forget a service without a delete call.
    pub fn forget(&self, id: &str) {
        self.state.lock().services.remove(id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn deadlines(&self) -> Vec<Option<Instant>> {
        self.state.lock().deadlines.clone()
    }

    pub fn live_services(&self) -> Vec<String> {
        self.state.lock().services.keys().cloned().collect()
    }

    pub fn clear_calls(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.deadlines.clear();
    }

    fn record(&self, ctx: &OpContext, call: Call) {
        let mut state = self.state.lock();
        state.calls.push(call);
        state.deadlines.push(ctx.deadline());
    }
}

fn refused() -> AdapterError {
    AdapterError::Transport("connection refused".to_string())
}

#[async_trait]
impl AdapterClient for FakeAdapter {
    async fn create_services(
        &self,
        ctx: &OpContext,
        images: &[Image],
    ) -> Result<Vec<Service>, AdapterError> {
        let names = images.iter().map(|image| image.name.clone()).collect();
        self.record(ctx, Call::Create(names));

        let mut state = self.state.lock();
        if state.fail_create {
            return Err(AdapterError::Status {
                status: 500,
                body: "create failed".to_string(),
            });
        }

        let mut created = Vec::with_capacity(images.len());
        for _ in images {
            state.next_service += 1;
            let id = format!("svc-{}", state.next_service);
            state.services.insert(id.clone(), "running".to_string());
            created.push(Service::new(ServiceId::new(id), None));
        }
        Ok(created)
    }

    async fn get_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<Service, AdapterError> {
        self.record(ctx, Call::Get(id.to_string()));

        let state = self.state.lock();
        if state.fail_get.contains(id.as_str()) {
            return Err(refused());
        }
        Ok(Service::new(
            id.clone(),
            state.services.get(id.as_str()).cloned(),
        ))
    }

    async fn delete_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<(), AdapterError> {
        self.record(ctx, Call::Delete(id.to_string()));

        let mut state = self.state.lock();
        if state.fail_delete.contains(id.as_str()) {
            return Err(refused());
        }
        state.services.remove(id.as_str());
        Ok(())
    }

    async fn fetch_metadata(&self, ctx: &OpContext) -> Result<serde_json::Value, AdapterError> {
        self.record(ctx, Call::Metadata);

        self.state.lock().metadata.clone().ok_or(AdapterError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

/// An image with just a name and source.
#[allow(dead_code)]
pub fn image(name: &str, source: &str) -> Image {
    Image {
        name: name.to_string(),
        source: source.to_string(),
        ..Default::default()
    }
}

/// An image with a replica count.
#[allow(dead_code)]
pub fn counted_image(name: &str, source: &str, count: u32) -> Image {
    Image {
        deployment_settings: DeploymentSettings { count },
        ..image(name, source)
    }
}

/// The WordPress + MySQL template used across tests.
#[allow(dead_code)]
pub fn wordpress_template() -> Template {
    Template::new(
        "wp",
        vec![
            counted_image("wordpress", "wordpress:4", 1),
            image("mysql", "mysql:5"),
        ],
    )
}

/// A blueprint with overrides applied by name.
#[allow(dead_code)]
pub fn blueprint(template: Template, overrides: Vec<PartialImage>) -> Blueprint {
    Blueprint::new(template, Override { images: overrides })
}

/// A template of `n` single images named `app-1` ... `app-n`.
#[allow(dead_code)]
pub fn numbered_template(name: &str, n: usize) -> Template {
    Template::new(
        name,
        (1..=n)
            .map(|i| image(&format!("app-{i}"), &format!("app:{i}")))
            .collect(),
    )
}
