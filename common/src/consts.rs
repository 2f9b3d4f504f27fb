use std::time::Duration;

/// Support site of the messaging service.
pub const SUPPORT_DOMAIN: &'static str = "http://support.whispersystems.org";

/// Relay hostname used for infrastructure reachability tests.
pub const INFRASTRUCTURE_TEST_HOST_NAME: &'static str = "relay.whispersystems.org";

/// Local test server address (host:port).
pub const TEST_SERVER_HOST: &'static str = "192.168.1.81:8080";

/// Host of the master server.
pub const MASTER_SERVER_HOST: &'static str = "192.168.1.81";

/// Port of the master server.
pub const MASTER_SERVER_PORT: &'static str = "8080";

/// Scheme of the master server.
pub const MASTER_SERVER_PROTOCOL: &'static str = "http";

/// Default relay identifier.
pub const DEFAULT_REPLAY_NAME: &'static str = "relay";

/// Suffix appended to relay identifiers to form relay hostnames.
pub const DEFAULT_REPLAY_SERVER_HOSTNAME_SUFFIX: &'static str = "whispersystems.org";

/// Staging deployment of the redphone signaling server.
pub const RESTPHONE_STAGING_SERVER: &'static str = "redphone-staging.whispersystems.org";

/// Relay identifier of the staging deployment.
pub const RESTPHONE_STAGING_REPLAY_NAME: &'static str = "redphone-staging-relay";

/// Client install page.
pub const INSTALL_URL: &'static str = "https://signal.org/install/";

/// Project homepage.
pub const HOMEPAGE_URL: &'static str = "https://whispersystems.org";

/// Application name used for the settings directory.
pub const APP_NAME: &'static str = "whisper-endpoints";

/// Settings file name (without extension).
pub const CONFIG_NAME: &'static str = "endpoints";

/// Prefix of environment variables overriding endpoint values.
pub const ENV_PREFIX: &'static str = "WHISPER_ENDPOINTS_";

/// Connect timeout used when probing endpoints.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
