use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use probmap::colorfile::ColorFile;
use probmap::config::ThresholdParams;
use probmap::sweep::{SweepReport, ThresholdOutcome};
use probmap::thresholds::Threshold;

pub fn print_threshold_plan(thresholds: &[Threshold], params: &ThresholdParams, skip_map_maker: bool) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Threshold").add_attribute(Attribute::Bold),
        Cell::new("Directory"),
        Cell::new("Maps"),
        Cell::new("Labels"),
    ]);
    if let Some(col) = table.column_mut(0) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for t in thresholds {
        let maps = if skip_map_maker { "skip" } else { "yes" };
        let labels = if params.labels(*t) {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no")
        };
        table.add_row(vec![
            Cell::new(t.to_string()).fg(Color::Cyan),
            Cell::new(t.dir_name()),
            Cell::new(maps),
            labels,
        ]);
    }

    println!("\n🔎 === THRESHOLD PLAN ({}) === 🔎", thresholds.len());
    println!("{}", table);
}

pub fn print_color_file(title: &str, color_file: &ColorFile) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Region", "File", "RGBA"]);

    for rec in &color_file.records {
        table.add_row(vec![
            Cell::new(rec.region.to_string()).add_attribute(Attribute::Bold),
            Cell::new(&rec.filename),
            Cell::new(rec.color.to_string()),
        ]);
    }

    println!("\nColor file ({}):", title);
    println!("{}", table);
}

pub fn print_sweep_report(report: &SweepReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Threshold").add_attribute(Attribute::Bold),
        Cell::new("Outcome"),
        Cell::new("Detail"),
    ]);

    for (threshold, outcome) in &report.entries {
        let color = match outcome {
            ThresholdOutcome::Labeled { .. } => Color::Green,
            ThresholdOutcome::Skipped { .. } => Color::Yellow,
            ThresholdOutcome::Failed { .. } => Color::Red,
        };
        table.add_row(vec![
            Cell::new(threshold.to_string()).set_alignment(CellAlignment::Right),
            Cell::new(outcome.kind()).fg(color),
            Cell::new(outcome.detail()),
        ]);
    }

    println!("\n=== SWEEP REPORT ===");
    println!("{}", table);
}
