//! precis CLI
//!
//! Condense a text document: chunk it, cluster the chunks, and summarize
//! only the representatives.
//!
//! ```bash
//! # Defaults: Ollama embeddings on localhost, Groq chat completions
//! GROQ_API_KEY=... precis speech.txt
//!
//! # From stdin, with a config file and a JSON report
//! cat page.txt | precis - --config precis.toml --report report.json
//!
//! # Override clustering for one run
//! precis speech.txt --clusters 8 --target-words 150
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=precis=debug`).

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use precis::provider::{ChatCompletions, HfTokenizer, OllamaEmbedder};
use precis::{Config, Report, Summarizer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "precis", version, about = "Cluster-based document condensation")]
struct Cli {
    /// Text file to summarize, or `-` for stdin
    input: String,

    /// TOML config file (defaults are used for missing keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Override `n_clusters`
    #[arg(long)]
    clusters: Option<usize>,

    /// Override `target_words`
    #[arg(long)]
    target_words: Option<usize>,

    /// Override `n_closest_representatives`
    #[arg(long)]
    representatives: Option<usize>,

    /// API key for the chat completions endpoint
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("precis=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let text = read_input(&cli.input)?;

    let embedder = OllamaEmbedder::new(&config.ollama_url, &config.embedding_model)
        .context("failed to set up embedding provider")?;
    let llm = ChatCompletions::new(&config.llm_base_url, &cli.api_key, &config.llm_model)
        .context("failed to set up language model provider")?;

    let tokenizer = config
        .tokenizer_path
        .as_deref()
        .map(HfTokenizer::from_file)
        .transpose()
        .context("failed to load tokenizer")?;

    let mut summarizer =
        Summarizer::new(config, embedder, llm).context("invalid configuration")?;
    if let Some(tokenizer) = tokenizer {
        summarizer = summarizer.with_token_counter(tokenizer);
    }
    let summary = summarizer
        .run(&text)
        .with_context(|| format!("failed to summarize {}", cli.input))?;

    println!("Visualizing the document by topic clusters");
    println!("{}", precis::label_grid(summary.labels()));
    println!();
    for (label, theme) in &summary.themes {
        println!("Cluster {label}: {theme}");
    }
    println!();
    println!("{}", summary.summary);
    println!();

    let analysis = &summary.analysis;
    println!("Chunk words: {:?}", analysis.word_count_per_chunk);
    println!(
        "Total chunks: {}, total words: {}, words sent: {} ({:.1}%)",
        analysis.total_chunks,
        analysis.total_words,
        analysis.words_sent,
        analysis.reduction_ratio * 100.0
    );
    if let (Some(total), Some(sent)) = (analysis.total_tokens, analysis.tokens_sent) {
        println!("Total tokens: {total}, tokens sent: {sent}");
    }

    if let Some(path) = &cli.report {
        Report::new(&cli.input, &summary)
            .write_json(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote report");
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(n) = cli.clusters {
        config.n_clusters = n;
    }
    if let Some(n) = cli.target_words {
        config.target_words = n;
    }
    if let Some(n) = cli.representatives {
        config.n_closest_representatives = n;
    }
    Ok(config)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}
