//! Poll loop: pairs each target's polling points with its credentials
//! and GETs every configured OID once per cycle.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;

use crate::config::{AgentConfig, IpTargetPollingPoints, SnmpVariable};
use crate::snmp::SnmpClient;

/// Drives poll cycles at the configured interval until shutdown.
pub struct Poller {
    config: AgentConfig,
    client: SnmpClient,
}

impl Poller {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            client: SnmpClient::new(),
        }
    }

    /// Run poll cycles until the shutdown signal flips.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        // A configured interval of 0 would make the ticker panic.
        let period = Duration::from_secs(self.config.polling_interval().max(1));
        tracing::info!(
            "polling every {}s as {:?} agent",
            period.as_secs(),
            self.config.kind()
        );

        let mut poll_ticker = interval(period);
        loop {
            tokio::select! {
                _ = poll_ticker.tick() => {
                    self.poll_cycle().await;
                }

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("shutdown requested, stopping poller");
                        break;
                    }
                }
            }
        }
    }

    /// One pass over every configured target. Failures are logged and
    /// never abort the cycle.
    pub async fn poll_cycle(&self) {
        let variables = self.config.snmpvariables();
        let points = self.config.target_polling_points();

        if points.is_empty() {
            tracing::debug!("no polling points configured, nothing to do");
            return;
        }

        for target in &points {
            let Some(variable) = auth_for_target(&variables, &target.ip_target) else {
                tracing::warn!("no auth group covers target {}, skipping", target.ip_target);
                continue;
            };
            self.poll_target(variable, target).await;
        }
    }

    async fn poll_target(&self, variable: &SnmpVariable, target: &IpTargetPollingPoints) {
        tracing::info!(
            "polling {} OIDs on {} (SNMPv{})",
            target.oids.len(),
            target.ip_target,
            variable.auth.version
        );

        for oid in &target.oids {
            match self.client.get(&target.ip_target, &variable.auth, oid).await {
                Ok(value) => {
                    tracing::info!(ip = %target.ip_target, oid = %oid, value = %value, "polled");
                }
                Err(e) => {
                    tracing::warn!(ip = %target.ip_target, oid = %oid, "poll failed: {}", e);
                }
            }
        }
    }
}

/// Credentials to poll a target with. When several auth groups list the
/// same address, the first group wins for polling.
fn auth_for_target<'a>(variables: &'a [SnmpVariable], ip_target: &str) -> Option<&'a SnmpVariable> {
    variables.iter().find(|v| v.ip_target == ip_target)
}
