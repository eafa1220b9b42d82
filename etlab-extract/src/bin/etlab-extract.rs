//! Command-line extraction of saved portal pages.
//!
//! **Usage:**
//! ```bash
//! etlab-extract results saved/results.html --semester 3
//! etlab-extract end-semester saved/results.html --json-logs
//! etlab-extract results saved/results.html --directives custom.json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use etlab_extract::document::Document;
use etlab_extract::engine::DirectiveSet;
use etlab_extract::observability::{init_tracing, LogFormat};
use etlab_extract::portal::{extract_page, is_login_page, PortalPage, ResultsReport};
use etlab_extract::semester::Semester;

/// Extract structured records from a saved portal page
#[derive(Parser, Debug)]
#[command(name = "etlab-extract", version)]
#[command(about = "Extract structured records from a saved portal page")]
struct Args {
    /// Page type: results, end-semester, academic-analysis, profile, attendance
    page: PortalPage,

    /// Saved HTML file
    file: PathBuf,

    /// Keep only records for this semester (1-8)
    #[arg(long, short)]
    semester: Option<i64>,

    /// Run a directive set from a JSON file instead of the built-in preset
    #[arg(long, value_name = "FILE")]
    directives: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, env = "ETLAB_JSON_LOGS")]
    json_logs: bool,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    let requested = args.semester.map(Semester::new).transpose()?;

    let html = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let doc = Document::parse(&html);
    if is_login_page(&doc) {
        bail!("{} is the portal login page; the session had expired when it was saved", args.file.display());
    }

    let body = match &args.directives {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let directives = DirectiveSet::from_json_str(&json)
                .with_context(|| format!("Invalid directive set in {}", path.display()))?;
            let outcomes = directives.compile()?.extract_all(&doc, requested);
            ResultsReport::new(directives.name, requested, outcomes).to_json()
        }
        None => extract_page(args.page, &doc, requested)?,
    };

    info!(page = %args.page, file = %args.file.display(), "Extraction finished");

    let rendered = if args.compact {
        serde_json::to_string(&body)?
    } else {
        serde_json::to_string_pretty(&body)?
    };
    println!("{rendered}");
    Ok(())
}
