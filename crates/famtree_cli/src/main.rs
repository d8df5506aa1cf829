//! Command-line front end.
//!
//! # Responsibility
//! - Load a family from a database, a JSON export or the built-in sample.
//! - Print the flowchart description, or a standalone HTML page, to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{ArgGroup, Parser};
use log::info;

use famtree_core::db::open_db;
use famtree_core::{
    core_version, init_logging_from_config, people_from_json, AppConfig, DiagramRenderer,
    Direction, FamilyTreeService, HtmlPageRenderer, InMemoryPersonStore, PersonStore,
    SqlitePersonRepository,
};

#[derive(Debug, Parser)]
#[command(
    name = "famtree",
    version = core_version(),
    about = "Print a family tree as a flowchart description or an HTML page"
)]
#[command(group(ArgGroup::new("source").args(["sample", "json", "db"])))]
struct Cli {
    /// Use the built-in sample family (default when no source is configured)
    #[arg(long)]
    sample: bool,

    /// Read people from a JSON array export
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Read people from a family database
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit a standalone HTML page instead of the description
    #[arg(long)]
    html: bool,

    /// Layout direction: TD, LR, BT or RL
    #[arg(long, value_name = "DIR", value_parser = Direction::from_str)]
    direction: Option<Direction>,
}

enum Source {
    Sample,
    Json(PathBuf),
    Db(PathBuf),
}

impl Cli {
    fn source(&self) -> Option<Source> {
        if let Some(path) = &self.json {
            return Some(Source::Json(path.clone()));
        }
        if let Some(path) = &self.db {
            return Some(Source::Db(path.clone()));
        }
        self.sample.then_some(Source::Sample)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("famtree: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, String> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path).map_err(|err| err.to_string())?,
        None => AppConfig::default(),
    };
    if let Some(direction) = cli.direction {
        config.chart.direction = direction;
    }
    init_logging_from_config(&config)?;

    let source = cli.source().unwrap_or_else(|| match config.db_path.clone() {
        Some(path) => Source::Db(path),
        None => Source::Sample,
    });

    let description = match source {
        Source::Sample => describe(InMemoryPersonStore::with_sample(), &config)?,
        Source::Json(path) => describe(load_json_store(&path)?, &config)?,
        Source::Db(path) => {
            let conn = open_db(&path).map_err(|err| err.to_string())?;
            let repo = SqlitePersonRepository::try_new(&conn).map_err(|err| err.to_string())?;
            describe(repo, &config)?
        }
    };

    if !cli.html {
        return Ok(description);
    }

    let mut renderer = HtmlPageRenderer::default();
    if let Some(viewport) = config.restore_viewport() {
        renderer = renderer.with_canvas_transform(viewport.transform());
    }
    renderer
        .render(&description)
        .map(|page| page.html)
        .map_err(|err| err.to_string())
}

fn describe<S: PersonStore>(store: S, config: &AppConfig) -> Result<String, String> {
    let mut service = FamilyTreeService::new(store, config.chart.clone());
    service.refresh().map_err(|err| err.to_string())?;
    let synthesis = service.synthesis();
    info!(
        "event=cli_describe module=cli status=ok people={} marriages={} skipped_references={}",
        synthesis.report.people, synthesis.report.marriages, synthesis.report.skipped_references
    );
    Ok(synthesis.description)
}

fn load_json_store(path: &Path) -> Result<InMemoryPersonStore, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read `{}`: {err}", path.display()))?;
    let rows = people_from_json(&text)
        .map_err(|err| format!("`{}` is not a JSON array of people: {err}", path.display()))?;
    Ok(InMemoryPersonStore::with_rows(rows))
}
