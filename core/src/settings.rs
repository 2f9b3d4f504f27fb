use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use whisper_endpoints_common::consts::{APP_NAME, CONFIG_NAME, DEFAULT_PROBE_TIMEOUT, ENV_PREFIX};

use crate::endpoint::{EndpointKey, EndpointTable};

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub probe_timeout_secs: u64,
    /// Endpoint name to replacement value.
    pub overrides: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load the per-user settings file, writing the defaults first if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_or_init_path(Self::default_path()?)
    }

    /// Load `path`, creating it with the defaults if missing. An existing file that fails to
    /// parse is an error and is left untouched.
    pub fn load_or_init_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("settings file [{}] missing, writing defaults", path.display());
            let settings = Settings::default();
            settings.store_path(path)?;
            return Ok(settings);
        }
        Self::load_path(path)
    }

    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        confy::load_path(path).with_context(|| format!("load settings from [{}] failed", path.display()))
    }

    pub fn store(&self) -> Result<()> {
        confy::store(APP_NAME, CONFIG_NAME, self).context("store settings failed")
    }

    pub fn store_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        confy::store_path(path, self).with_context(|| format!("store settings to [{}] failed", path.display()))
    }

    /// Path of the per-user settings file.
    pub fn default_path() -> Result<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).context("locate settings file failed")
    }

    pub fn probe_timeout(&self) -> Duration {
        if self.probe_timeout_secs == 0 {
            DEFAULT_PROBE_TIMEOUT
        } else {
            Duration::from_secs(self.probe_timeout_secs)
        }
    }

    /// Defaults, then file overrides, then `WHISPER_ENDPOINTS_*` environment overrides.
    pub fn build_table(&self) -> Result<EndpointTable> {
        self.build_table_with_env(std::env::vars_os())
    }

    pub fn build_table_with_env<I>(&self, env: I) -> Result<EndpointTable>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut table = EndpointTable::defaults();
        for (name, value) in &self.overrides {
            let key: EndpointKey = name.parse().context("invalid override in settings")?;
            table.set(key, value.as_str())?;
            info!("{key} overridden by settings: {value}");
        }
        apply_env(&mut table, env)?;
        Ok(table)
    }
}

/// Apply `WHISPER_ENDPOINTS_<NAME>` variables. Variables without the prefix, with a non UTF-8
/// name, or naming no endpoint are skipped. A matching variable with a non UTF-8 value is an error.
pub fn apply_env<I>(table: &mut EndpointTable, env: I) -> Result<()>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    for (var, value) in env {
        let Some(var) = var.to_str() else {
            continue;
        };
        if !var.starts_with(ENV_PREFIX) {
            continue;
        }
        match EndpointKey::ALL.into_iter().find(|key| key.env_var() == var) {
            Some(key) => {
                let Ok(value) = value.into_string() else {
                    bail!("{var} is not valid UTF-8");
                };
                table.set(key, value.as_str()).with_context(|| format!("invalid value in {var}"))?;
                info!("{key} overridden by {var}: {value}");
            }
            None => debug!("ignoring {var}, not an endpoint"),
        }
    }
    Ok(())
}
