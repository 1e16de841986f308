use anyhow::{Context, Result, bail};
use isokit_assets::{SpecEnsureOptions, ensure_data_files};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let spec_ensure_options =
        SpecEnsureOptions::from_env().context("Invalid data file configuration")?;
    let report_run = ensure_data_files(&spec_ensure_options);
    tracing::info!("{report_run}");

    if !report_run.is_success() {
        bail!("{} data file task(s) failed", report_run.cnt_failed());
    }
    Ok(())
}
