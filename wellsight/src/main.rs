//! WellSight - Reservoir simulation summary viewer.
//!
//! Opens summary sources, applies the item table filters, puts items on the
//! chart axes and prints what a frame would show.

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use wellsight::args::ViewerArgs;
use wellsight::demo::{DemoEngine, demo_sources};
use wellsight::view::formatting::{format_days, format_report_time, format_value};
use wellsight::{ChartFrame, ItemRow, Message, Readout, WellSight, YAxis};
use wellsight_common::{ViewerConfig, init_tracing, load_config};

/// Everything printed with `--json`.
#[derive(Serialize)]
struct Report<'a> {
    title: String,
    rows: &'a [ItemRow],
    frame: &'a ChartFrame,
    readout: &'a [Readout],
}

fn main() -> anyhow::Result<()> {
    let args = ViewerArgs::parse();

    let mut config: ViewerConfig = match args.config_path() {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;
    init_tracing(&config.logging)?;

    tracing::info!("Starting WellSight");

    let mut app = WellSight::new(Box::new(DemoEngine::new(args.seed)), &config);
    app.open_sources(&config.sources);

    for path in &args.fixtures {
        app.update(Message::AddFromPath(path.clone()));
        report_error(&app);
    }
    for (host, port) in &args.connect {
        app.update(Message::AddFromNetwork {
            host: host.clone(),
            port: *port,
        });
        report_error(&app);
    }
    for source in demo_sources(args.demo, args.seed) {
        app.add_source(Box::new(source));
    }
    for _ in 0..args.refresh {
        app.update(Message::Refresh);
    }

    if let Some(pattern) = &args.name {
        app.update(Message::SetNameFilter(pattern.clone()));
    }
    if let Some(pattern) = &args.secondary {
        app.update(Message::SetSecondaryFilter(pattern.clone()));
    }
    if let Some(pattern) = &args.index {
        app.update(Message::SetIndexFilter(pattern.clone()));
    }

    for (axis, positions) in [(YAxis::Left, &args.left), (YAxis::Right, &args.right)] {
        for (i, &position) in positions.iter().enumerate() {
            let handle = app.data().handle(position)?;
            app.update(Message::DropItem {
                handle,
                axis,
                append: i > 0,
            });
            report_error(&app);
        }
    }

    let rows = app.rows()?;
    let frame = app.frame()?;
    let readout = match args.cursor {
        Some(cursor) => app.readout(cursor)?,
        None => Vec::new(),
    };

    if args.json {
        let report = Report {
            title: app.title(),
            rows: &rows,
            frame: &frame,
            readout: &readout,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&app, &rows, &frame, &readout, args.cursor);
    }

    Ok(())
}

fn report_error(app: &WellSight) {
    if let Some(error) = app.last_error() {
        eprintln!("error: {}", error);
    }
}

fn print_text(
    app: &WellSight,
    rows: &[ItemRow],
    frame: &ChartFrame,
    readout: &[Readout],
    cursor: Option<i64>,
) {
    println!("{}", app.title());
    for (position, name) in app.data().source_names().enumerate() {
        println!("  [{}] {}", position, name);
    }

    println!();
    println!("{:>5}  {:<10} {:<12} {:>8}", "POS", "NAME", "WELL/GROUP", "INDEX");
    for row in rows {
        let index = row.index.map(|i| i.to_string()).unwrap_or_default();
        println!(
            "{:>5}  {:<10} {:<12} {:>8}",
            row.position, row.name, row.secondary_name, index
        );
    }

    for &axis in YAxis::all() {
        let axis_frame = &frame.axes[axis.index()];
        println!();
        match &axis_frame.label {
            Some(label) => println!("{} axis: {}", axis, label),
            None => println!("{} axis: (empty)", axis),
        }
        for series in frame.series.iter().filter(|s| s.axis == axis) {
            match (series.data.timestamps.first(), series.data.timestamps.last()) {
                (Some(first), Some(last)) => println!(
                    "  {} ({} samples over {})",
                    series.name,
                    series.data.len(),
                    format_days(last - first)
                ),
                _ => println!("  {} (no data)", series.name),
            }
        }
    }

    if let Some(cursor) = cursor {
        println!();
        println!("at {}:", format_report_time(cursor));
        for value in readout {
            println!(
                "  {} = {} ({})",
                value.name,
                format_value(value.value),
                format_report_time(value.timestamp)
            );
        }
    }
}
