use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use policyqa::{PolicyAssistant, PolicyQaConfig, SemanticConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "policyqa",
    version,
    about = "Answer questions about a policy document using retrieval and an LLM"
)]
struct Cli {
    /// Plain-text policy document (already extracted from PDF/DOCX)
    #[arg(long, short = 'd')]
    document: PathBuf,

    /// Question to answer; repeat for several
    #[arg(long = "question", short = 'q', required = true)]
    questions: Vec<String>,

    /// YAML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Clauses retrieved per question (overrides the config file)
    #[arg(long)]
    top_k: Option<usize>,

    /// Sentences per chunk (overrides the config file)
    #[arg(long)]
    group_size: Option<usize>,

    /// Embed locally with a sentence-transformer export (`onnx/model.onnx`
    /// and `tokenizer.json` under this directory)
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Print answers as a JSON array of {question, answer}
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let mut config = match &cli.config {
        Some(path) => PolicyQaConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PolicyQaConfig::default(),
    };
    if let Some(top_k) = cli.top_k {
        config.retrieval.top_k = top_k;
    }
    if let Some(group_size) = cli.group_size {
        config.chunking.group_size = group_size;
    }
    if let Some(dir) = &cli.model_dir {
        config.semantic = SemanticConfig::onnx(dir);
    }
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log_level, cli.log_json);

    let document = tokio::fs::read_to_string(&cli.document)
        .await
        .with_context(|| format!("failed to read document {}", cli.document.display()))?;

    let assistant = PolicyAssistant::from_config(&config)?;
    let answers = assistant.answer_questions(&document, &cli.questions).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&answers)?);
    } else {
        for (i, answer) in answers.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("Q: {}", answer.question);
            println!("A: {}", answer.answer);
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
