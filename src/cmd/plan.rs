use crate::reports;
use clap::Args;
use probmap::colorfile::{synth, ColorFile};
use probmap::config::Config;
use probmap::error::PmResult;
use probmap::sweep::ColorSource;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(args: PlanArgs) -> PmResult<()> {
    let config = args.config;
    config.thresholds.validate()?;
    let thresholds = config.thresholds.sequence()?;

    let code_dir = config.paths.code_dir()?;
    let probability_dir = config.paths.probability_dir(&code_dir)?;
    let colorfile = config.paths.colorfile(&code_dir);

    reports::print_threshold_plan(&thresholds, &config.thresholds, config.tools.skip_map_maker);

    match ColorSource::resolve(&colorfile, &probability_dir)? {
        ColorSource::Copy(path) => match ColorFile::load_from_file(&path) {
            Ok(existing) => reports::print_color_file(&path.display().to_string(), &existing),
            // Copying never validates rows; only the preview needs them parsed.
            Err(e) => warn!("Color file {:?} will be copied as-is: {}", path, e),
        },
        ColorSource::Synthesize(template) => {
            println!("\nProbability file pattern: {}", template);
            let table = config.paths.region_colors(&code_dir)?;
            if let Some(first) = thresholds.first() {
                let preview = synth::synthesize(&template, &table, &probability_dir, *first)?;
                reports::print_color_file(&format!("synthesized at {}", first), &preview);
            }
        }
    }
    Ok(())
}
