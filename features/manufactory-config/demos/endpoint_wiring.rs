//! Wires a small device application
//!
//! Run with `cargo run --example endpoint_wiring -p manufactory-config`,
//! set `RUST_LOG=manufactory=debug` to watch the composition.

use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};

use manufactory::{Component, GetError, Manufactory};
use manufactory_config::{Config, ConfigProvider};
use tracing_subscriber::EnvFilter;

struct DeviceConfig {
    serial: &'static str,
    friendly_name: &'static str,
}

struct AlertsConfig {
    max_alerts: usize,
}

/// Shared log sink, registered first so everything else can report to it
struct EventLog;
impl EventLog {
    fn record(&self, event: &str) {
        tracing::info!(target: "device", "{event}");
    }
}

/// Key value store backing the capability agents
struct Storage {
    log: Arc<EventLog>,
    entries: Mutex<Vec<(String, String)>>,
}
impl Storage {
    fn put(&self, key: &str, value: &str) {
        self.log.record(&format!("storing {key}"));
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((key.to_string(), value.to_string()));
        }
    }
}

struct AlertsAgent {
    storage: Arc<Storage>,
    max_alerts: usize,
}
impl AlertsAgent {
    fn schedule(&self, name: &str) {
        self.storage.put("alert", name);
    }
}

/// Collaborator that only ever sees the types it needs
struct EndpointBuilder {
    manufactory: Manufactory<(EventLog, AlertsAgent, ConfigProvider)>,
    capabilities: Vec<&'static str>,
}

fn event_log() -> Result<EventLog, Infallible> {
    Ok(EventLog)
}

fn storage(log: Arc<EventLog>) -> Result<Storage, Infallible> {
    log.record("storage opened");
    Ok(Storage {
        log,
        entries: Mutex::new(Vec::new()),
    })
}

fn alerts_agent(
    storage: Arc<Storage>,
    config: Config<AlertsConfig>,
) -> Result<AlertsAgent, Infallible> {
    Ok(AlertsAgent {
        storage,
        max_alerts: config.max_alerts,
    })
}

fn config_component() -> Result<Component, Box<dyn std::error::Error>> {
    let mut provider = ConfigProvider::new();
    provider
        .add_config(DeviceConfig {
            serial: "A1B2C3",
            friendly_name: "Kitchen speaker",
        })?
        .add_config(AlertsConfig { max_alerts: 16 })?;

    Ok(provider.into_component()?)
}

impl EndpointBuilder {
    fn new(manufactory: Manufactory<(EventLog, AlertsAgent, ConfigProvider)>) -> Self {
        EndpointBuilder {
            manufactory,
            capabilities: Vec::new(),
        }
    }

    fn with_alerts(mut self) -> Result<Self, GetError> {
        let agent: Arc<AlertsAgent> = self.manufactory.get()?;
        agent.schedule("wake up");
        self.capabilities.push("Alerts");
        tracing::info!("Alerts capability added, up to {} alerts", agent.max_alerts);
        Ok(self)
    }

    fn build(self) -> Result<(), Box<dyn std::error::Error>> {
        let log: Arc<EventLog> = self.manufactory.get()?;
        let configs: Arc<ConfigProvider> = self.manufactory.get()?;

        let Some(device) = configs.get_config::<DeviceConfig>()? else {
            return Err("device config missing".into());
        };

        log.record(&format!(
            "endpoint '{}' ({}) ready with {:?}",
            device.friendly_name, device.serial, self.capabilities
        ));
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let device = Manufactory::<(EventLog, Storage, AlertsAgent, ConfigProvider)>::compose(
        Component::accumulator("device")
            .add_component(&config_component()?)
            .add_primary_factory(event_log)
            .add_required_factory(storage)
            .add_retained_factory(alerts_agent),
    )?;

    tracing::debug!("{:?}", device.runtime());

    EndpointBuilder::new(device.create_subset_manufactory())
        .with_alerts()?
        .build()
}
