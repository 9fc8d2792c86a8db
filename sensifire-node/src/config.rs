//! Build-time configuration of the node
//!
//! Everything comes from `sensifire_core::constants`. A deployment can
//! override the broker target when it builds the binary:
//!
//! | Variable                | Overrides                     |
//! |-------------------------|-------------------------------|
//! | `SENSIFIRE_BROKER_HOST` | broker host                   |
//! | `SENSIFIRE_BROKER_PORT` | broker port                   |
//! | `SENSIFIRE_TOPIC`       | telemetry topic               |
//! | `SENSIFIRE_CLIENT_ID`   | MQTT client identifier        |
//!
//! Nothing is read from the environment at runtime.

use anyhow::{bail, Context, Result};
use sensifire_connectors::MqttConfig;
use sensifire_core::MonitorConfig;

/// Overrides captured at build time
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub host: Option<&'static str>,
    pub port: Option<&'static str>,
    pub topic: Option<&'static str>,
    pub client_id: Option<&'static str>,
}

impl Overrides {
    /// Values baked in by the compiler
    pub fn from_build_env() -> Self {
        Self {
            host: option_env!("SENSIFIRE_BROKER_HOST"),
            port: option_env!("SENSIFIRE_BROKER_PORT"),
            topic: option_env!("SENSIFIRE_TOPIC"),
            client_id: option_env!("SENSIFIRE_CLIENT_ID"),
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub monitor: MonitorConfig,
    pub mqtt: MqttConfig,
}

impl NodeConfig {
    /// Defaults with `overrides` applied, validated
    pub fn with_overrides(overrides: Overrides) -> Result<Self> {
        let mut monitor = MonitorConfig::default();
        let mut mqtt = MqttConfig::default();

        if let Some(host) = overrides.host {
            mqtt.host = host.to_string();
        }
        if let Some(port) = overrides.port {
            mqtt.port = port
                .trim()
                .parse()
                .with_context(|| format!("SENSIFIRE_BROKER_PORT={port:?} is not a port number"))?;
        }
        if let Some(id) = overrides.client_id {
            mqtt = mqtt.client_id(id);
        }
        if let Some(topic) = overrides.topic {
            if topic.is_empty() || topic.contains(['+', '#']) {
                bail!("SENSIFIRE_TOPIC={topic:?} is not a publishable topic");
            }
            monitor.publish.topic = topic;
        }

        mqtt.validate().context("invalid broker configuration")?;

        Ok(Self { monitor, mqtt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = NodeConfig::with_overrides(Overrides::default()).unwrap();

        assert_eq!(config.mqtt.host, "broker.hivemq.com");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.monitor.publish.topic, "environment/sensordata");
        assert_eq!(config.monitor.cycle_interval_ms, 1000);
    }

    #[test]
    fn overrides_apply() {
        let config = NodeConfig::with_overrides(Overrides {
            host: Some("192.168.1.20"),
            port: Some(" 1884 "),
            topic: Some("site/kitchen/env"),
            client_id: Some("kitchen-node"),
        })
        .unwrap();

        assert_eq!(config.mqtt.host, "192.168.1.20");
        assert_eq!(config.mqtt.port, 1884);
        assert_eq!(config.mqtt.client_id, "kitchen-node");
        assert_eq!(config.monitor.publish.topic, "site/kitchen/env");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = NodeConfig::with_overrides(Overrides {
            port: Some("mqtt"),
            ..Overrides::default()
        })
        .unwrap_err();

        assert!(err.to_string().contains("SENSIFIRE_BROKER_PORT"));
    }

    #[test]
    fn wildcard_topic_is_rejected() {
        for topic in ["", "environment/+", "environment/#"] {
            assert!(NodeConfig::with_overrides(Overrides {
                topic: Some(topic),
                ..Overrides::default()
            })
            .is_err());
        }
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(NodeConfig::with_overrides(Overrides {
            host: Some(""),
            ..Overrides::default()
        })
        .is_err());
    }
}
