use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use whisper_endpoints_core::{
    EndpointTable,
    probe::{ProbeOutcome, ProbeReport, probe_all, probe_targets},
};

pub async fn run(table: &EndpointTable, limit: Duration) -> Result<Vec<ProbeReport>> {
    let targets = probe_targets(table)?;
    let spinner = ProgressBar::new_spinner()
        .with_style(ProgressStyle::with_template("{spinner:.green} {msg}")?)
        .with_message(format!("probing {} endpoints...", targets.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let reports = probe_all(targets, limit).await;
    spinner.finish_and_clear();
    Ok(reports)
}

pub fn render(reports: &[ProbeReport]) -> String {
    reports
        .iter()
        .map(|report| {
            let outcome = match &report.outcome {
                ProbeOutcome::Reachable { addr, elapsed } => format!("ok {addr} ({} ms)", elapsed.as_millis()),
                ProbeOutcome::Unresolved(e) => format!("unresolved: {e}"),
                ProbeOutcome::Unreachable(e) => format!("unreachable: {e}"),
                ProbeOutcome::TimedOut => "timed out".to_string(),
            };
            format!("{}: {}", report.target, outcome)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
