//! SensiFire node
//!
//! Wires the monitoring loop to the MQTT connector and simulated sensors and
//! runs it forever. Set `RUST_LOG` to change verbosity (default `info`).

mod config;
mod sim;

use anyhow::Result;
use log::{info, warn};
use sensifire_connectors::MqttConnector;
use sensifire_core::Monitor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{NodeConfig, Overrides};
use crate::sim::{LoggingGpio, SimulatedAdc, StdDelay};

fn main() -> Result<()> {
    // Library crates log through `log`; the subscriber bridges it
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("SensiFire node v{}", sensifire_core::VERSION);

    let config = NodeConfig::with_overrides(Overrides::from_build_env())?;
    info!(
        "Broker {}:{} topic {:?} as {}",
        config.mqtt.host, config.mqtt.port, config.monitor.publish.topic, config.mqtt.client_id
    );

    let monitor_config = config.monitor;
    let mut monitor = Monitor::new(
        monitor_config,
        SimulatedAdc::new(monitor_config.gas_channel, monitor_config.thermistor_channel),
        LoggingGpio::new(monitor_config.pins),
        MqttConnector::new(config.mqtt),
        StdDelay,
    );

    if let Err(e) = monitor.connect() {
        warn!("Initial connect failed: {}; retrying every cycle", e);
    }

    monitor.run()
}
