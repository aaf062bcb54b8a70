// ABOUTME: CLI binary for weber.
// ABOUTME: Loads a page and an anchor file, then writes the inferred schema as JSON or scraping code.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use weber::{ChildArity, CodeTarget, LocateStrategy, Weber, WeberError};

#[derive(Parser, Debug)]
#[command(name = "weber")]
#[command(about = "Infer a reusable HTML structure from example text snippets")]
struct Args {
    /// The source that will be retrieved (URL or file path)
    #[arg(short = 's', long = "source")]
    source: String,

    /// File with one anchor text per line
    #[arg(short = 'd', long = "data")]
    data: PathBuf,

    /// Output file (JSON output always gets a .json extension)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Output format: json (default), scraper (Rust), bs4 (Python)
    #[arg(short = 'f', long = "format", default_value = "json")]
    format: String,

    /// Fail when aligned nodes have different numbers of children
    #[arg(long = "strict")]
    strict: bool,

    /// Locate anchors by scanning the raw markup for their wrapping tag
    #[arg(long = "tag-scan")]
    tag_scan: bool,

    /// Attribute to intersect across matches (repeatable, default: class)
    #[arg(long = "attr")]
    attrs: Vec<String>,

    /// Fetch timeout in seconds for remote sources
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Log inference progress to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

enum OutputFormat {
    Json,
    Code(CodeTarget),
}

fn parse_format(format: &str) -> Option<OutputFormat> {
    match format.to_lowercase().as_str() {
        "json" => Some(OutputFormat::Json),
        "scraper" | "rust" | "rs" => Some(OutputFormat::Code(CodeTarget::Scraper)),
        "bs4" | "beautifulsoup" | "python" | "py" => {
            Some(OutputFormat::Code(CodeTarget::BeautifulSoup))
        }
        _ => None,
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "weber=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: &Args, format: OutputFormat) -> Result<PathBuf, WeberError> {
    let mut builder = Weber::builder()
        .timeout(Duration::from_secs(args.timeout))
        .child_arity(if args.strict {
            ChildArity::Strict
        } else {
            ChildArity::Truncate
        })
        .locate_strategy(if args.tag_scan {
            LocateStrategy::TagScan
        } else {
            LocateStrategy::TreeQuery
        });
    if !args.attrs.is_empty() {
        builder = builder.retrieve_attrs(args.attrs.iter().cloned());
    }

    let mut weber = builder.build();
    weber.load_html(&args.source)?;
    weber.load_anchors_from_file(&args.data)?;
    weber.anchors_mut().retain_non_empty();

    match format {
        OutputFormat::Json => weber.write_structure_to_json(&args.output),
        OutputFormat::Code(target) => {
            weber.generate_scraping_code(&args.output, target)?;
            Ok(args.output.clone())
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(format) = parse_format(&args.format) else {
        eprintln!("error: unknown format {:?} (expected json, scraper or bs4)", args.format);
        return ExitCode::from(1);
    };

    match run(&args, format) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
