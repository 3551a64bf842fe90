use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use roster_report::{
    load_roster, load_roster_async, write_report, FieldColumn, HeaderRule, Report, Roster,
    RosterLayout,
};

#[derive(Parser)]
#[command(name = "roster-report")]
#[command(about = "Count students per field of study in a roster CSV")]
struct Args {
    /// Roster file
    path: PathBuf,

    /// Read the file through the async loader
    #[arg(long = "async")]
    use_async: bool,

    /// Header detection: firstname-prefix or first-line
    #[arg(long)]
    header: Option<HeaderRule>,

    /// Field of study column: `last` or a zero-based index
    #[arg(long)]
    field_column: Option<FieldColumn>,

    /// JSON file with a roster layout; flags above take precedence
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn roster_layout(&self) -> Result<RosterLayout> {
        let mut layout = match &self.layout {
            Some(path) => read_layout(path)?,
            None => RosterLayout::default(),
        };
        if let Some(header) = self.header {
            layout.header = header;
        }
        if let Some(field_column) = self.field_column {
            layout.field_column = field_column;
        }
        Ok(layout)
    }
}

fn read_layout(path: &Path) -> Result<RosterLayout> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading layout {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing layout {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let layout = args.roster_layout()?;
    info!("layout: header={} field_column={}", layout.header, layout.field_column);

    let roster = if args.use_async {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("starting tokio runtime")?;
        runtime.block_on(load_roster_async(&args.path, &layout))?
    } else {
        load_roster(&args.path, &layout)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_roster(&mut out, &roster, args.json).context("writing report")
}

fn render_roster<W: Write>(out: &mut W, roster: &Roster, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, &Report::from(roster))?;
        writeln!(out)?;
    } else {
        write_report(&mut *out, roster)?;
    }
    out.flush()?;
    Ok(())
}
