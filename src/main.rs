use anyhow::Result;
use clap::Parser;
use colored::*;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stackscrap::config::{self, Config};
use stackscrap::detect::{ErrorDetector, Language, SourceFile};
use stackscrap::render::Renderer;
use stackscrap::{ErrorContext, Searcher};

#[derive(Debug, Parser)]
#[command(name = "stackscrap", version, about = "Search Stack Overflow for a programming error")]
struct Cli {
    /// Error message to search for. Read from stdin when omitted.
    message: Option<String>,

    /// Source file the error was reported in
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// One-based line of the error inside --file
    #[arg(short, long, default_value_t = 1, requires = "file")]
    line: usize,

    /// Language tag, overriding the one inferred from --file
    #[arg(long)]
    language: Option<String>,

    /// Print the synthesized query and exit without searching
    #[arg(long)]
    query_only: bool,

    /// Print the full result as JSON
    #[arg(long, conflicts_with = "query_only")]
    json: bool,

    /// Number of questions to fetch
    #[arg(long)]
    max_results: Option<u32>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::get_config_path()?,
    };

    if cli.init_config {
        Config::create_default(&config_path)?;
        println!("Created default config file at {:?}", config_path);
        return Ok(());
    }

    let mut config = Config::load_or_default(&config_path)?.with_env_overrides();
    if let Some(max_results) = cli.max_results {
        config.search.max_results = max_results;
    }
    if !config.display.color_output {
        colored::control::set_override(false);
    }

    let Some(context) = build_context(&cli)? else {
        eprintln!(
            "{}: {}",
            "Warning".yellow().bold(),
            "No error detected. Pass an error message or pipe one in."
        );
        return Ok(());
    };

    let searcher = Searcher::from_config(&config)?;
    if cli.query_only {
        println!("{}", searcher.query_builder().build(&context));
        return Ok(());
    }

    match searcher.search(&context).await {
        Ok(result) if cli.json => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(result) => print!("{}", Renderer::new(config.display.max_answers_shown).render(&result)),
        Err(e) => {
            eprintln!("{}: {}", "Search failed".red().bold(), e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn build_context(cli: &Cli) -> Result<Option<ErrorContext>> {
    let source = cli.file.as_deref().map(SourceFile::read).transpose()?;
    let line = cli.line.saturating_sub(1);

    let context = match &cli.message {
        Some(message) if message.trim().is_empty() => None,
        Some(message) => match &source {
            Some(file) => Some(ErrorDetector::from_source(message, file, line)?),
            None => Some(ErrorContext::from_message(message.trim())?),
        },
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            ErrorDetector::from_selection(&input, source.as_ref(), line)
        }
    };

    let Some(context) = context else {
        return Ok(None);
    };
    match &cli.language {
        Some(language) => Ok(Some(relabel(context, language)?)),
        None => Ok(Some(context)),
    }
}

fn relabel(context: ErrorContext, language: &str) -> Result<ErrorContext> {
    let language = match Language::from_extension(language) {
        Language::Unknown => language.to_string(),
        known => known.id().to_string(),
    };
    Ok(ErrorContext::new(
        context.error_message(),
        context.code_snippet(),
        language,
        context.file_path(),
        context.line_number(),
    )?)
}
