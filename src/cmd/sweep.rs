use crate::reports;
use clap::Args;
use probmap::config::Config;
use probmap::error::PmResult;
use probmap::sweep;
use probmap::toolchain::ProcessRunner;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(args: SweepArgs) -> PmResult<()> {
    let settings = args.config.resolve()?;
    info!("📂 Writing thresholds under {:?}", settings.output_dir);

    let report = sweep::run(&settings, &ProcessRunner)?;
    reports::print_sweep_report(&report);

    info!(
        "✅ Sweep finished: {} labeled, {} skipped, {} failed",
        report.labeled(),
        report.skipped(),
        report.failed()
    );
    Ok(())
}
