//! lazygrid - drive a paginated grid over a JSON record file
//!
//! Usage examples:
//!   lazygrid page --records todos.json --page 3 --size 20
//!   lazygrid page --records todos.json --sort title:desc --filter completed=true
//!   lazygrid export --records todos.json --format xlsx --select 3 --select 7 --selection-only

mod args;
mod logging;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use lazygrid_core::{
    CollectingSink, MemorySource, NotificationSeverity, NotificationSink, RecordSource,
};
use lazygrid_interchange::{ExportKind, Exporter};
use lazygrid_settings::GridSettings;
use lazygrid_table::{FetchTicket, GridController, GridIntent, LoadStatus, SelectionMode};

#[derive(Parser)]
#[command(name = "lazygrid", about = "Paginated data grid over a JSON record file", version)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "LAZYGRID_SETTINGS")]
    settings: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write JSON logs to the log directory
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of the grid
    Page(GridArgs),
    /// Export the loaded rows
    Export {
        #[command(flatten)]
        grid: GridArgs,

        /// csv, xlsx or pdf (defaults to the configured format)
        #[arg(long)]
        format: Option<String>,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Export only the selected rows
        #[arg(long)]
        selection_only: bool,
    },
    /// Show the effective settings
    Settings {
        /// Write the effective settings back to the settings file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct GridArgs {
    /// JSON array of records ({ id, title, completed, userId })
    #[arg(long)]
    records: PathBuf,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page
    #[arg(long)]
    size: Option<usize>,

    /// Sort criterion FIELD[:asc|desc], repeatable
    #[arg(long)]
    sort: Vec<String>,

    /// Filter FIELD=VALUE, FIELD!=VALUE, FIELD~TEXT, FIELD^TEXT or FIELD$TEXT, repeatable
    #[arg(long)]
    filter: Vec<String>,

    /// Comma separated visible columns
    #[arg(long)]
    columns: Option<String>,

    /// Record id to pin above the page, repeatable
    #[arg(long)]
    pin: Vec<i64>,

    /// Record id to select, repeatable
    #[arg(long)]
    select: Vec<i64>,
}

fn load_settings(path: Option<&PathBuf>) -> Result<GridSettings> {
    match path {
        Some(path) => GridSettings::load_from(path),
        None => GridSettings::load(),
    }
}

/// Build a controller and apply the grid arguments to it
async fn open_grid(
    settings: &GridSettings,
    grid: &GridArgs,
    sink: Arc<CollectingSink>,
) -> Result<GridController> {
    let mut config = settings.to_grid_config()?;
    if let Some(columns) = &grid.columns {
        config.visible_columns = Some(args::parse_columns(columns)?);
    }
    let size = grid.size.unwrap_or(config.page_size);
    if grid.select.len() > 1 {
        config.selection_mode = SelectionMode::Checkbox;
    }

    let source: Arc<dyn RecordSource> = Arc::new(
        MemorySource::from_json_file("file", &grid.records)
            .with_context(|| format!("Failed to read records from {:?}", grid.records))?,
    );
    let exporter = Exporter::new(settings.export.dataset_name.clone());
    let mut controller =
        GridController::new(source, sink as Arc<dyn NotificationSink>, exporter, &config)?;

    let sort = grid
        .sort
        .iter()
        .map(|raw| args::parse_sort(raw))
        .collect::<Result<Vec<_>>>()?;
    let mut tickets = Vec::new();
    if !sort.is_empty() {
        tickets.extend(controller.dispatch(GridIntent::SortChanged(sort)));
    }
    for raw in &grid.filter {
        let (field, predicate) = args::parse_filter(raw)?;
        tickets.extend(controller.dispatch(GridIntent::FilterChanged {
            field,
            predicate: Some(predicate),
        }));
    }
    tickets.extend(controller.dispatch(GridIntent::Load));
    settle(&mut controller, tickets).await;

    if grid.page > 1 {
        controller
            .handle(GridIntent::PageChanged {
                offset: page_offset(grid.page, size),
                size,
            })
            .await;
    } else if size != controller.state().window().size() {
        controller
            .handle(GridIntent::PageChanged { offset: 0, size })
            .await;
    }

    if let LoadStatus::Failed { message } = controller.state().status() {
        bail!("Failed to load records: {}", message);
    }

    for id in &grid.pin {
        let position = controller
            .state()
            .rows()
            .iter()
            .position(|r| r.id == *id)
            .unwrap_or_default();
        controller
            .handle(GridIntent::TogglePin {
                record_id: *id,
                pinned: false,
                position,
            })
            .await;
    }
    if !grid.select.is_empty() {
        controller
            .handle(GridIntent::SelectionChanged(grid.select.clone()))
            .await;
    }

    Ok(controller)
}

/// Offset of the 1-based `page`; the window clamps it to the last page
fn page_offset(page: usize, size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(size)
}

/// Run only the latest ticket; earlier ones are superseded
async fn settle(controller: &mut GridController, mut tickets: Vec<FetchTicket>) {
    while let Some(ticket) = tickets.pop() {
        let result = controller.fetch(&ticket).await;
        tickets = controller.complete(ticket.seq, result);
    }
}

fn print_notifications(sink: &CollectingSink) {
    for note in sink.take() {
        let level = match note.severity {
            NotificationSeverity::Info => "info",
            NotificationSeverity::Warn => "warn",
        };
        eprintln!("[{}] {}: {}", level, note.summary, note.detail);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.settings.as_ref())?;
    let sink = Arc::new(CollectingSink::new());

    match cli.command {
        Command::Page(grid) => {
            let controller = open_grid(&settings, &grid, sink.clone()).await?;
            print_notifications(&sink);
            println!("{}", render::render_page(controller.state()));
        }
        Command::Export {
            grid,
            format,
            out,
            selection_only,
        } => {
            let kind = match format {
                Some(format) => format.parse::<ExportKind>()?,
                None => settings.export.default_format,
            };
            let mut controller = open_grid(&settings, &grid, sink.clone()).await?;
            controller
                .handle(GridIntent::ExportRequested {
                    kind,
                    selection_only,
                })
                .await;
            print_notifications(&sink);

            let Some(artifact) = controller.take_artifacts().pop() else {
                bail!("Export to {} failed", kind);
            };
            let dir = match out {
                Some(dir) => dir,
                None => settings.export.resolved_output_dir()?,
            };
            let path = artifact.write_to(&dir)?;
            println!("{}", path.display());
        }
        Command::Settings { init } => {
            if init {
                match &cli.settings {
                    Some(path) => settings.save_to(path)?,
                    None => settings.save()?,
                }
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(logging::LoggingConfig::for_cli(cli.verbose, cli.json_logs))?;
    run(cli).await
}
