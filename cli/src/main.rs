use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use log::debug;
use whisper_endpoints_cli::{built_info, check, init_config, list, load_settings, probe};
use whisper_endpoints_common::{VersionInfo, init_logger};
use whisper_endpoints_core::{
    EndpointKey, EndpointTable, MasterServer,
    derived::{relay_hostname, staging_relay_hostname},
    global,
};

#[derive(Parser, Debug)]
#[clap(name = "whisper-endpoints")]
struct Cmd {
    #[clap(subcommand)]
    sub_cmd: Option<SubCmd>,

    /// Settings file (default: per-user settings file)
    #[clap(long, global = true, env = "WHISPER_ENDPOINTS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[clap(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Also append logs to this file
    #[clap(long, global = true, env = "WHISPER_ENDPOINTS_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Display the version
    #[clap(short, long)]
    version: bool,
}

#[derive(Subcommand, Debug)]
enum SubCmd {
    /// List every endpoint value
    List(ListCmd),
    /// Print a single endpoint value
    Get(GetCmd),
    /// Print a relay hostname
    Relay(RelayCmd),
    /// Print the master server URL
    Master(MasterCmd),
    /// Validate the endpoint table
    Check,
    /// Check TCP reachability of the configured hosts
    Probe(ProbeCmd),
    /// Write a default settings file
    InitConfig(InitConfigCmd),
}

#[derive(Parser, Debug)]
struct ListCmd {
    /// Show the built-in values, ignoring overrides
    #[clap(long)]
    defaults: bool,

    /// Print as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct GetCmd {
    /// Endpoint name, e.g. MASTER_SERVER_HOST
    #[clap(required = true, num_args = 1)]
    name: String,
}

#[derive(Parser, Debug)]
struct RelayCmd {
    /// Relay name (default: DEFAULT_REPLAY_NAME)
    name: Option<String>,

    /// Use the staging relay name
    #[clap(long, conflicts_with = "name")]
    staging: bool,
}

#[derive(Parser, Debug)]
struct MasterCmd {
    /// Path to append to the base URL
    path: Option<String>,
}

#[derive(Parser, Debug)]
struct ProbeCmd {
    /// Per-target timeout in seconds (default: from settings)
    #[clap(long)]
    timeout: Option<u64>,
}

#[derive(Parser, Debug)]
struct InitConfigCmd {
    /// Overwrite an existing settings file
    #[clap(long)]
    force: bool,
}

const VERSION_INFO: &'static VersionInfo = &VersionInfo {
    name: "Whisper-Endpoints",
    version: built_info::PKG_VERSION,
    commit_hash: built_info::GIT_COMMIT_HASH,
    build_time: built_info::BUILT_TIME_UTC,
    target: built_info::TARGET,
    endpoints: EndpointKey::COUNT,
};

#[tokio::main]
async fn probe_endpoints(table: &EndpointTable, limit: Duration) -> Result<()> {
    let reports = probe::run(table, limit).await?;
    println!("{}", probe::render(&reports));
    let unreachable = reports.iter().filter(|report| !report.outcome.is_reachable()).count();
    if unreachable > 0 {
        bail!("{unreachable} of {} endpoints not reachable", reports.len());
    }
    Ok(())
}

fn print_list(table: &EndpointTable, json: bool) -> Result<()> {
    if json {
        println!("{}", list::render_json(table)?);
    } else {
        print!("{}", list::render(table));
    }
    Ok(())
}

fn run(cmd: Cmd) -> Result<()> {
    let Some(sub_cmd) = cmd.sub_cmd else {
        return Ok(());
    };

    let sub_cmd = match sub_cmd {
        SubCmd::InitConfig(init_cmd) => {
            init_logger(cmd.log_level.as_deref().unwrap_or("info"), cmd.log_file.as_ref())?;
            let path = init_config(cmd.config.as_deref(), init_cmd.force)?;
            println!("settings written to {}", path.display());
            return Ok(());
        }
        SubCmd::List(list_cmd) if list_cmd.defaults => {
            init_logger(cmd.log_level.as_deref().unwrap_or("info"), cmd.log_file.as_ref())?;
            print_list(&EndpointTable::defaults(), list_cmd.json)?;
            return Ok(());
        }
        other => other,
    };

    let settings = load_settings(cmd.config.as_deref())?;
    init_logger(cmd.log_level.as_deref().unwrap_or(&settings.log_level), cmd.log_file.as_ref())?;
    debug!("settings: {settings:?}");
    let table = global::init(settings.build_table()?)?;

    match sub_cmd {
        SubCmd::List(list_cmd) => print_list(table, list_cmd.json)?,
        SubCmd::Get(get_cmd) => {
            println!("{}", table.get_by_name(&get_cmd.name)?);
        }
        SubCmd::Relay(relay_cmd) => {
            let hostname = if relay_cmd.staging {
                staging_relay_hostname(table)
            } else {
                relay_hostname(table, relay_cmd.name.as_deref().unwrap_or(""))
            };
            println!("{hostname}");
        }
        SubCmd::Master(master_cmd) => {
            let master = MasterServer::from_table(table)?;
            match master_cmd.path {
                Some(path) => println!("{}", master.url(&path)),
                None => println!("{}", master.base_url()),
            }
        }
        SubCmd::Check => {
            let (report, failed) = check::run(table);
            println!("{report}");
            if failed {
                bail!("endpoint table has errors");
            }
        }
        SubCmd::Probe(probe_cmd) => {
            let limit = probe_cmd.timeout.filter(|secs| *secs > 0).map(Duration::from_secs).unwrap_or_else(|| settings.probe_timeout());
            probe_endpoints(table, limit)?;
        }
        SubCmd::InitConfig(_) => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let cmd = Cmd::parse();

    if cmd.version {
        println!("{}", VERSION_INFO);
        return ExitCode::SUCCESS;
    }
    match run(cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Single test: `run` installs the global logger.
    #[test]
    fn list_defaults_ignores_broken_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("endpoints.toml");
        std::fs::write(&path, "[overrides]\nMASTER_HOST = \"10.9.9.9\"\n").unwrap();
        let config = path.to_str().unwrap();

        let cmd = Cmd::parse_from(["whisper-endpoints", "--config", config, "--log-level", "off", "list", "--defaults"]);
        run(cmd).unwrap();
    }
}
