use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::{Result, bail};
use whisper_endpoints_common::consts;

/// Named endpoint values, in the order they are declared in `consts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EndpointKey {
    SupportDomain,
    InfrastructureTestHostName,
    TestServerHost,
    MasterServerHost,
    MasterServerPort,
    MasterServerProtocol,
    DefaultReplayName,
    DefaultReplayServerHostnameSuffix,
    RestphoneStagingServer,
    RestphoneStagingReplayName,
    InstallUrl,
    HomepageUrl,
}

impl EndpointKey {
    pub const COUNT: usize = 12;

    pub const ALL: [EndpointKey; Self::COUNT] = [
        EndpointKey::SupportDomain,
        EndpointKey::InfrastructureTestHostName,
        EndpointKey::TestServerHost,
        EndpointKey::MasterServerHost,
        EndpointKey::MasterServerPort,
        EndpointKey::MasterServerProtocol,
        EndpointKey::DefaultReplayName,
        EndpointKey::DefaultReplayServerHostnameSuffix,
        EndpointKey::RestphoneStagingServer,
        EndpointKey::RestphoneStagingReplayName,
        EndpointKey::InstallUrl,
        EndpointKey::HomepageUrl,
    ];

    /// Name the value is known by to clients and config files.
    pub fn name(&self) -> &'static str {
        match self {
            EndpointKey::SupportDomain => "SUPPORT_DOMAIN",
            EndpointKey::InfrastructureTestHostName => "infrastructureTestHostName",
            EndpointKey::TestServerHost => "TEST_SERVER_HOST",
            EndpointKey::MasterServerHost => "MASTER_SERVER_HOST",
            EndpointKey::MasterServerPort => "MASTER_SERVER_PORT",
            EndpointKey::MasterServerProtocol => "MASTER_SERVER_PROTOCOL",
            EndpointKey::DefaultReplayName => "DEFAULT_REPLAY_NAME",
            EndpointKey::DefaultReplayServerHostnameSuffix => "DEFAULT_REPLAY_SERVER_HOSTNAME_SUFFIX",
            EndpointKey::RestphoneStagingServer => "RESTPHONE_STAGING_SERVER",
            EndpointKey::RestphoneStagingReplayName => "RESTPHONE_STAGING_REPLAY_NAME",
            EndpointKey::InstallUrl => "installUrl",
            EndpointKey::HomepageUrl => "homepageUrl",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            EndpointKey::SupportDomain => consts::SUPPORT_DOMAIN,
            EndpointKey::InfrastructureTestHostName => consts::INFRASTRUCTURE_TEST_HOST_NAME,
            EndpointKey::TestServerHost => consts::TEST_SERVER_HOST,
            EndpointKey::MasterServerHost => consts::MASTER_SERVER_HOST,
            EndpointKey::MasterServerPort => consts::MASTER_SERVER_PORT,
            EndpointKey::MasterServerProtocol => consts::MASTER_SERVER_PROTOCOL,
            EndpointKey::DefaultReplayName => consts::DEFAULT_REPLAY_NAME,
            EndpointKey::DefaultReplayServerHostnameSuffix => consts::DEFAULT_REPLAY_SERVER_HOSTNAME_SUFFIX,
            EndpointKey::RestphoneStagingServer => consts::RESTPHONE_STAGING_SERVER,
            EndpointKey::RestphoneStagingReplayName => consts::RESTPHONE_STAGING_REPLAY_NAME,
            EndpointKey::InstallUrl => consts::INSTALL_URL,
            EndpointKey::HomepageUrl => consts::HOMEPAGE_URL,
        }
    }

    /// Environment variable overriding this value, e.g. `WHISPER_ENDPOINTS_INFRASTRUCTURE_TEST_HOST_NAME`.
    pub fn env_var(&self) -> String {
        let mut var = String::from(consts::ENV_PREFIX);
        let mut prev_lower = false;
        for c in self.name().chars() {
            if c.is_ascii_uppercase() && prev_lower {
                var.push('_');
            }
            prev_lower = c.is_ascii_lowercase();
            var.push(c.to_ascii_uppercase());
        }
        var
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

fn normalize(name: &str) -> String {
    name.chars().filter(|c| *c != '_' && *c != '-').flat_map(char::to_lowercase).collect()
}

impl FromStr for EndpointKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(key) = EndpointKey::ALL.iter().find(|k| k.name() == s) {
            return Ok(*key);
        }
        let wanted = normalize(s);
        match EndpointKey::ALL.iter().find(|k| normalize(k.name()) == wanted) {
            Some(key) => Ok(*key),
            None => bail!("unknown endpoint name [{s}]"),
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Endpoint name to value table. Every key is always present with a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    values: [String; EndpointKey::COUNT],
}

impl EndpointTable {
    pub fn defaults() -> Self {
        Self {
            values: EndpointKey::ALL.map(|key| key.default_value().to_string()),
        }
    }

    pub fn get(&self, key: EndpointKey) -> &str {
        &self.values[key.index()]
    }

    pub fn get_by_name(&self, name: &str) -> Result<&str> {
        let key: EndpointKey = name.parse()?;
        Ok(self.get(key))
    }

    /// Replace a value. Empty or whitespace-only values are rejected and leave the table untouched.
    pub fn set<S: Into<String>>(&mut self, key: EndpointKey, value: S) -> Result<()> {
        let value = value.into();
        if value.trim().is_empty() {
            bail!("value of [{key}] must not be empty");
        }
        self.values[key.index()] = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (EndpointKey, &str)> {
        EndpointKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    pub fn is_overridden(&self, key: EndpointKey) -> bool {
        self.get(key) != key.default_value()
    }

    pub fn overridden(&self) -> Vec<EndpointKey> {
        EndpointKey::ALL.into_iter().filter(|key| self.is_overridden(*key)).collect()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter().map(|(key, value)| (key.name().to_string(), value.to_string())).collect()
    }
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_parse_back_to_their_key() {
        for key in EndpointKey::ALL {
            assert_eq!(key.name().parse::<EndpointKey>().unwrap(), key);
            assert_eq!(key.to_string(), key.name());
        }
    }

    #[test]
    fn loose_name_matching() {
        assert_eq!("master-server-host".parse::<EndpointKey>().unwrap(), EndpointKey::MasterServerHost);
        assert_eq!("INFRASTRUCTURE_TEST_HOST_NAME".parse::<EndpointKey>().unwrap(), EndpointKey::InfrastructureTestHostName);
        assert_eq!(" install_url ".parse::<EndpointKey>().unwrap(), EndpointKey::InstallUrl);
        let err = "MASTER_SERVER".parse::<EndpointKey>().unwrap_err();
        assert!(err.to_string().contains("MASTER_SERVER"));
    }

    #[test]
    fn env_var_names() {
        assert_eq!(EndpointKey::MasterServerHost.env_var(), "WHISPER_ENDPOINTS_MASTER_SERVER_HOST");
        assert_eq!(EndpointKey::InfrastructureTestHostName.env_var(), "WHISPER_ENDPOINTS_INFRASTRUCTURE_TEST_HOST_NAME");
        assert_eq!(EndpointKey::HomepageUrl.env_var(), "WHISPER_ENDPOINTS_HOMEPAGE_URL");
    }

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, key) in EndpointKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn set_and_track_overrides() {
        let mut table = EndpointTable::defaults();
        assert!(table.overridden().is_empty());

        table.set(EndpointKey::MasterServerHost, "10.0.0.2").unwrap();
        assert_eq!(table.get(EndpointKey::MasterServerHost), "10.0.0.2");
        assert_eq!(table.overridden(), vec![EndpointKey::MasterServerHost]);

        assert!(table.set(EndpointKey::MasterServerPort, "  ").is_err());
        assert_eq!(table.get(EndpointKey::MasterServerPort), "8080");

        table.set(EndpointKey::MasterServerHost, "192.168.1.81").unwrap();
        assert!(table.overridden().is_empty());
    }

    #[test]
    fn map_has_every_name() {
        let map = EndpointTable::defaults().to_map();
        assert_eq!(map.len(), EndpointKey::COUNT);
        assert_eq!(map["DEFAULT_REPLAY_NAME"], "relay");
        assert_eq!(EndpointTable::default().get_by_name("homepageUrl").unwrap(), "https://whispersystems.org");
    }
}
