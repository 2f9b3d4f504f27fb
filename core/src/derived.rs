//! Composite addresses assembled from the endpoint table.

use std::{fmt, str::FromStr};

use anyhow::{Context, Result, bail};
use whisper_endpoints_common::utils::net::{parse_port, split_host_port};

use crate::endpoint::{EndpointKey, EndpointTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl FromStr for Scheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => bail!("unsupported protocol [{other}], expected http or https"),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The master server's protocol/host/port triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterServer {
    pub protocol: Scheme,
    pub host: String,
    pub port: u16,
}

impl MasterServer {
    pub fn from_table(table: &EndpointTable) -> Result<Self> {
        let protocol = table
            .get(EndpointKey::MasterServerProtocol)
            .parse()
            .with_context(|| format!("invalid {}", EndpointKey::MasterServerProtocol))?;
        let port = parse_port(table.get(EndpointKey::MasterServerPort))
            .with_context(|| format!("invalid {}", EndpointKey::MasterServerPort))?;
        Ok(Self {
            protocol,
            host: table.get(EndpointKey::MasterServerHost).to_string(),
            port,
        })
    }

    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.authority())
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url(), path)
    }
}

/// Join `path` onto `base` with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// `{relay_name}.{suffix}`. An empty name selects the default relay.
pub fn relay_hostname(table: &EndpointTable, relay_name: &str) -> String {
    let relay_name = relay_name.trim();
    let relay_name = if relay_name.is_empty() { table.get(EndpointKey::DefaultReplayName) } else { relay_name };
    format!("{}.{}", relay_name, table.get(EndpointKey::DefaultReplayServerHostnameSuffix))
}

pub fn default_relay_hostname(table: &EndpointTable) -> String {
    relay_hostname(table, table.get(EndpointKey::DefaultReplayName))
}

pub fn staging_relay_hostname(table: &EndpointTable) -> String {
    relay_hostname(table, table.get(EndpointKey::RestphoneStagingReplayName))
}

pub fn test_server_addr(table: &EndpointTable) -> Result<(String, u16)> {
    let (host, port) = split_host_port(table.get(EndpointKey::TestServerHost))
        .with_context(|| format!("invalid {}", EndpointKey::TestServerHost))?;
    Ok((host.to_string(), port))
}

pub fn support_url(table: &EndpointTable, path: &str) -> String {
    join_url(table.get(EndpointKey::SupportDomain), path)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_master_server() {
        let master = MasterServer::from_table(&EndpointTable::defaults()).unwrap();
        assert_eq!(master.protocol, Scheme::Http);
        assert_eq!(master.authority(), "192.168.1.81:8080");
        assert_eq!(master.base_url(), "http://192.168.1.81:8080");
        assert_eq!(master.url("/v1/accounts"), "http://192.168.1.81:8080/v1/accounts");
        assert_eq!(master.url("v1/accounts"), "http://192.168.1.81:8080/v1/accounts");
        assert_eq!(master.url(""), "http://192.168.1.81:8080");
    }

    #[test]
    fn master_server_rejects_bad_values() {
        let mut table = EndpointTable::defaults();
        table.set(EndpointKey::MasterServerPort, "80a").unwrap();
        assert!(MasterServer::from_table(&table).is_err());

        let mut table = EndpointTable::defaults();
        table.set(EndpointKey::MasterServerProtocol, "ftp").unwrap();
        let err = MasterServer::from_table(&table).unwrap_err();
        assert!(format!("{err:#}").contains("MASTER_SERVER_PROTOCOL"));

        let mut table = EndpointTable::defaults();
        table.set(EndpointKey::MasterServerProtocol, "HTTPS").unwrap();
        table.set(EndpointKey::MasterServerHost, "::1").unwrap();
        let master = MasterServer::from_table(&table).unwrap();
        assert_eq!(master.base_url(), "https://[::1]:8080");
    }

    #[test]
    fn relay_hostnames() {
        let table = EndpointTable::defaults();
        assert_eq!(relay_hostname(&table, ""), table.get(EndpointKey::InfrastructureTestHostName));
        assert_eq!(default_relay_hostname(&table), "relay.whispersystems.org");
        assert_eq!(relay_hostname(&table, "relay2"), "relay2.whispersystems.org");
        assert_eq!(staging_relay_hostname(&table), "redphone-staging-relay.whispersystems.org");
    }

    #[test]
    fn test_server_and_support() {
        let table = EndpointTable::defaults();
        assert_eq!(test_server_addr(&table).unwrap(), ("192.168.1.81".to_string(), 8080));
        assert_eq!(support_url(&table, "hc/en-us"), "http://support.whispersystems.org/hc/en-us");
    }
}
