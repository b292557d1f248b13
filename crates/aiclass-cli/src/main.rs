use std::net::SocketAddr;
use std::path::PathBuf;

use aiclass_ai::{EngineConfig, HybridEngine};
use aiclass_client::ClassifierClient;
use aiclass_core::PredictResponse;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod batch;
mod display;
mod evaluate;

#[derive(Parser)]
#[command(name = "aiclass", version, about = "Classify text into AI topic categories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP inference server.
    Serve {
        #[arg(long, env = "AICLASS_ADDR", default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Classify texts with a local engine, one result per line.
    Classify {
        #[arg(required = true)]
        texts: Vec<String>,
        /// Emit JSON lines instead of plain text.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Classify a file with one text per line.
    Batch {
        file: PathBuf,
        #[arg(long)]
        json: bool,
        /// Spread work across all cores.
        #[arg(long)]
        parallel: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Measure accuracy on a labelled file of `text<TAB>category id` lines.
    Evaluate {
        file: PathBuf,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Classify texts through a running server.
    Remote {
        #[arg(long, env = "AICLASS_URL", default_value = aiclass_client::DEFAULT_BASE_URL)]
        url: String,
        #[arg(required = true)]
        texts: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the category table.
    Categories,
    /// Print the engine configuration and model state as JSON.
    Info {
        #[command(flatten)]
        engine: EngineArgs,
    },
}

/// Engine settings. Flags override the config file, which overrides defaults.
#[derive(Args)]
struct EngineArgs {
    /// TOML engine configuration.
    #[arg(long, env = "AICLASS_CONFIG")]
    config: Option<PathBuf>,
    /// Directory with `model.onnx` and `tokenizer.json`.
    #[arg(long, env = "AICLASS_MODEL_DIR")]
    model_dir: Option<PathBuf>,
    /// Keyword table in TOML.
    #[arg(long, env = "AICLASS_KEYWORDS")]
    keywords: Option<PathBuf>,
    /// Statistical confidence accepted without consulting keywords.
    #[arg(long, env = "AICLASS_THRESHOLD")]
    threshold: Option<f32>,
}

impl EngineArgs {
    fn resolve(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(dir) = &self.model_dir {
            config.model_dir = Some(dir.clone());
        }
        if let Some(path) = &self.keywords {
            config.keywords_path = Some(path.clone());
        }
        if let Some(t) = self.threshold {
            config.use_ai_threshold = t;
        }
        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }

    fn build(&self) -> anyhow::Result<HybridEngine> {
        let config = self.resolve()?;
        HybridEngine::from_config(&config).context("building engine")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("aiclass v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve { addr, engine } => {
            let engine = engine.build()?;
            aiclass_server::serve(addr, engine)
                .await
                .context("running server")?;
        }
        Command::Classify {
            texts,
            json,
            engine,
        } => {
            let engine = engine.build()?;
            for text in &texts {
                match engine.classify(text) {
                    Ok(result) if json => {
                        println!("{}", serde_json::to_string(&PredictResponse::from(result))?)
                    }
                    Ok(result) => display::print_result(text, &result),
                    Err(e) => eprintln!("  skipped {:?}: {e}", text),
                }
            }
        }
        Command::Batch {
            file,
            json,
            parallel,
            engine,
        } => {
            let engine = engine.build()?;
            let (items, stats) = batch::run_batch(&engine, &file, parallel)?;
            if json {
                for item in &items {
                    println!("{}", serde_json::to_string(item)?);
                }
            } else {
                for item in &items {
                    display::print_item(item);
                }
            }
            display::print_stats(&stats);
        }
        Command::Evaluate { file, engine } => {
            let engine = engine.build()?;
            let stats = evaluate::run_evaluate(&engine, &file)?;
            display::print_evaluation(&stats);
        }
        Command::Remote { url, texts, json } => {
            let client = ClassifierClient::new(&url);
            if !client.is_healthy().await {
                eprintln!("  server at {url} has no statistical model, results are keyword-only");
            }
            let items = client
                .predict_batch(&texts)
                .await
                .with_context(|| format!("classifying through {url}"))?;
            for item in &items {
                if json {
                    println!("{}", serde_json::to_string(item)?);
                } else {
                    display::print_item(item);
                }
            }
        }
        Command::Categories => display::print_categories(),
        Command::Info { engine } => {
            let engine = engine.build()?;
            println!("{}", serde_json::to_string_pretty(&engine.model_info())?);
        }
    }

    Ok(())
}
