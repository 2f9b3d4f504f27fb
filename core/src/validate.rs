use std::fmt;

use whisper_endpoints_common::utils::net::{extract_domain_or_ip, is_valid_host, parse_port, split_host_port};

use crate::{
    derived::{MasterServer, Scheme, default_relay_hostname, relay_hostname},
    endpoint::{EndpointKey, EndpointTable},
};

const URL_KEYS: [EndpointKey; 3] = [EndpointKey::SupportDomain, EndpointKey::InstallUrl, EndpointKey::HomepageUrl];

const HOST_KEYS: [EndpointKey; 4] = [
    EndpointKey::InfrastructureTestHostName,
    EndpointKey::MasterServerHost,
    EndpointKey::DefaultReplayServerHostnameSuffix,
    EndpointKey::RestphoneStagingServer,
];

const RELAY_NAME_KEYS: [EndpointKey; 2] = [EndpointKey::DefaultReplayName, EndpointKey::RestphoneStagingReplayName];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: EndpointKey,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    fn error(key: EndpointKey, message: impl Into<String>) -> Self {
        Self { key, severity: Severity::Error, message: message.into() }
    }

    fn warning(key: EndpointKey, message: impl Into<String>) -> Self {
        Self { key, severity: Severity::Warning, message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}: {}", self.key, self.message)
    }
}

/// Check every value of the table, returning issues in key order.
pub fn validate(table: &EndpointTable) -> Vec<Issue> {
    let mut issues = Vec::new();

    for key in URL_KEYS {
        check_url(table, key, &mut issues);
    }

    for key in HOST_KEYS {
        let value = table.get(key);
        if !is_valid_host(value) {
            issues.push(Issue::error(key, format!("[{value}] is not a valid hostname or IP address")));
        }
    }

    for key in RELAY_NAME_KEYS {
        let hostname = relay_hostname(table, table.get(key));
        if !is_valid_host(&hostname) {
            issues.push(Issue::error(key, format!("relay hostname [{hostname}] is not a valid hostname")));
        }
    }

    if let Err(err) = parse_port(table.get(EndpointKey::MasterServerPort)) {
        issues.push(Issue::error(EndpointKey::MasterServerPort, format!("{err:#}")));
    }

    match table.get(EndpointKey::MasterServerProtocol).parse::<Scheme>() {
        Ok(Scheme::Http) => issues.push(Issue::warning(EndpointKey::MasterServerProtocol, "master server uses plain http")),
        Ok(Scheme::Https) => {}
        Err(err) => issues.push(Issue::error(EndpointKey::MasterServerProtocol, err.to_string())),
    }

    let test_server = table.get(EndpointKey::TestServerHost);
    match split_host_port(test_server) {
        Ok((host, _)) if !is_valid_host(host) => {
            issues.push(Issue::error(EndpointKey::TestServerHost, format!("[{host}] is not a valid hostname or IP address")))
        }
        Ok(_) => {
            if let Ok(master) = MasterServer::from_table(table) {
                if master.authority() != test_server {
                    issues.push(Issue::warning(
                        EndpointKey::TestServerHost,
                        format!("[{test_server}] differs from master server [{}]", master.authority()),
                    ));
                }
            }
        }
        Err(err) => issues.push(Issue::error(EndpointKey::TestServerHost, format!("{err:#}"))),
    }

    let infrastructure = table.get(EndpointKey::InfrastructureTestHostName);
    let default_relay = default_relay_hostname(table);
    if infrastructure != default_relay {
        issues.push(Issue::warning(
            EndpointKey::InfrastructureTestHostName,
            format!("[{infrastructure}] differs from default relay [{default_relay}]"),
        ));
    }

    issues.sort_by_key(|issue| issue.key);
    issues
}

fn check_url(table: &EndpointTable, key: EndpointKey, issues: &mut Vec<Issue>) {
    let value = table.get(key);
    let plain = if value.starts_with("http://") {
        true
    } else if value.starts_with("https://") {
        false
    } else {
        issues.push(Issue::error(key, format!("[{value}] is not an http(s) URL")));
        return;
    };
    match extract_domain_or_ip(value) {
        Some(host) if is_valid_host(&host) => {
            if plain {
                issues.push(Issue::warning(key, "uses plain http"));
            }
        }
        _ => issues.push(Issue::error(key, format!("[{value}] has no valid host"))),
    }
}
