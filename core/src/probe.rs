//! TCP reachability checks for the configured hosts.

use std::{
    fmt,
    net::SocketAddr,
    time::{Duration, Instant},
};

use anyhow::Result;
use log::{debug, warn};
use tokio::{net::TcpStream, task::JoinSet, time::timeout};
use whisper_endpoints_common::utils::net::{is_valid_host, resolve};

use crate::{
    derived::{MasterServer, Scheme, staging_relay_hostname, test_server_addr},
    endpoint::{EndpointKey, EndpointTable},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub key: EndpointKey,
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.key, self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable { addr: SocketAddr, elapsed: Duration },
    Unresolved(String),
    Unreachable(String),
    TimedOut,
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub target: ProbeTarget,
    pub outcome: ProbeOutcome,
}

/// Hosts worth probing: master, test server, default relay, staging server and staging relay.
pub fn probe_targets(table: &EndpointTable) -> Result<Vec<ProbeTarget>> {
    let tls_port = Scheme::Https.default_port();
    let master = MasterServer::from_table(table)?;
    let (test_host, test_port) = test_server_addr(table)?;
    Ok(vec![
        ProbeTarget { key: EndpointKey::MasterServerHost, host: master.host, port: master.port },
        ProbeTarget { key: EndpointKey::TestServerHost, host: test_host, port: test_port },
        ProbeTarget {
            key: EndpointKey::InfrastructureTestHostName,
            host: table.get(EndpointKey::InfrastructureTestHostName).to_string(),
            port: tls_port,
        },
        ProbeTarget {
            key: EndpointKey::RestphoneStagingServer,
            host: table.get(EndpointKey::RestphoneStagingServer).to_string(),
            port: tls_port,
        },
        ProbeTarget { key: EndpointKey::RestphoneStagingReplayName, host: staging_relay_hostname(table), port: tls_port },
    ])
}

/// Resolve the target and try each address until one accepts a TCP connection.
/// `limit` bounds the whole probe, resolution included.
pub async fn probe(target: ProbeTarget, limit: Duration) -> ProbeReport {
    let start = Instant::now();
    let outcome = match timeout(limit, connect(&target)).await {
        Ok(Ok(addr)) => ProbeOutcome::Reachable { addr, elapsed: start.elapsed() },
        Ok(Err(outcome)) => outcome,
        Err(_) => ProbeOutcome::TimedOut,
    };
    match &outcome {
        ProbeOutcome::Reachable { addr, elapsed } => debug!("{target} reachable at {addr} in {elapsed:?}"),
        other => warn!("{target} not reachable: {other:?}"),
    }
    ProbeReport { target, outcome }
}

async fn connect(target: &ProbeTarget) -> std::result::Result<SocketAddr, ProbeOutcome> {
    if !is_valid_host(&target.host) {
        return Err(ProbeOutcome::Unresolved(format!("[{}] is not a valid hostname or IP address", target.host)));
    }
    let addrs = resolve(&target.host, target.port).await.map_err(|e| ProbeOutcome::Unresolved(format!("{e:#}")))?;
    let mut last_err = String::new();
    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(_) => return Ok(addr),
            Err(e) => {
                debug!("connect {addr} failed: {e}");
                last_err = format!("{addr}: {e}");
            }
        }
    }
    Err(ProbeOutcome::Unreachable(last_err))
}

/// Probe all targets concurrently. Reports come back in input order.
pub async fn probe_all(targets: Vec<ProbeTarget>, limit: Duration) -> Vec<ProbeReport> {
    let mut set = JoinSet::new();
    for (i, target) in targets.iter().cloned().enumerate() {
        set.spawn(async move { (i, probe(target, limit).await) });
    }
    let mut slots: Vec<Option<ProbeReport>> = vec![None; targets.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((i, report)) => slots[i] = Some(report),
            Err(e) => warn!("probe task failed: {e}"),
        }
    }
    fill_missing(targets, slots)
}

/// One report per target; a slot left empty by a failed task becomes `Unreachable`.
fn fill_missing(targets: Vec<ProbeTarget>, slots: Vec<Option<ProbeReport>>) -> Vec<ProbeReport> {
    targets
        .into_iter()
        .zip(slots)
        .map(|(target, slot)| {
            slot.unwrap_or_else(|| ProbeReport { target, outcome: ProbeOutcome::Unreachable("probe task failed".to_string()) })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn default_targets() {
        let targets = probe_targets(&EndpointTable::defaults()).unwrap();
        let hosts: Vec<(&str, u16)> = targets.iter().map(|t| (t.host.as_str(), t.port)).collect();
        assert_eq!(
            hosts,
            vec![
                ("192.168.1.81", 8080),
                ("192.168.1.81", 8080),
                ("relay.whispersystems.org", 443),
                ("redphone-staging.whispersystems.org", 443),
                ("redphone-staging-relay.whispersystems.org", 443),
            ]
        );
    }

    #[tokio::test]
    async fn local_listener_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let target = ProbeTarget { key: EndpointKey::MasterServerHost, host: "127.0.0.1".to_string(), port };
        let report = probe(target, Duration::from_secs(2)).await;
        assert!(report.outcome.is_reachable(), "{:?}", report.outcome);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = ProbeTarget { key: EndpointKey::TestServerHost, host: "127.0.0.1".to_string(), port };
        let report = probe(target, Duration::from_secs(2)).await;
        assert!(matches!(report.outcome, ProbeOutcome::Unreachable(_)), "{:?}", report.outcome);
    }

    #[tokio::test]
    async fn invalid_host_is_unresolved() {
        let target = ProbeTarget { key: EndpointKey::RestphoneStagingServer, host: "no such host.invalid".to_string(), port: 443 };
        let report = probe(target, Duration::from_secs(5)).await;
        assert!(matches!(report.outcome, ProbeOutcome::Unresolved(_)), "{:?}", report.outcome);
    }

    #[test]
    fn failed_task_keeps_its_slot() {
        let targets = vec![
            ProbeTarget { key: EndpointKey::MasterServerHost, host: "192.168.1.81".to_string(), port: 8080 },
            ProbeTarget { key: EndpointKey::InfrastructureTestHostName, host: "relay.whispersystems.org".to_string(), port: 443 },
        ];
        let slots = vec![None, Some(ProbeReport { target: targets[1].clone(), outcome: ProbeOutcome::TimedOut })];

        let reports = fill_missing(targets, slots);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].target.key, EndpointKey::MasterServerHost);
        assert_eq!(reports[0].outcome, ProbeOutcome::Unreachable("probe task failed".to_string()));
        assert_eq!(reports[1].outcome, ProbeOutcome::TimedOut);
    }

    #[tokio::test]
    async fn probe_all_keeps_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            loop {
                if listener.accept().await.is_err() {
                    break;
                }
            }
        });

        let targets = vec![
            ProbeTarget { key: EndpointKey::MasterServerHost, host: "127.0.0.1".to_string(), port },
            ProbeTarget { key: EndpointKey::TestServerHost, host: "localhost".to_string(), port },
        ];
        let reports = probe_all(targets, Duration::from_secs(2)).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].target.key, EndpointKey::MasterServerHost);
        assert_eq!(reports[1].target.key, EndpointKey::TestServerHost);
        assert!(reports[0].outcome.is_reachable());
    }
}
