use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gapma::config::AppConfig;
use gapma::data::DescriptionStore;
use gapma::engines::generation::{build_workers, run_concurrently, Checkpoint, RunRequest, Strategy};
use gapma::engines::manipulation::{best_description, best_name, paraphrase, ParaphraseParams};
use gapma::oracle::{OpenAiOracle, RetryPolicy, RetryingOracle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gapma", version, about = "Evolve persuasive tool descriptions")]
struct Cli {
    /// TOML config file layered over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Description store (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Model identifier (overrides config)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the genetic search for one tool and store the results
    Generate {
        #[arg(long)]
        server: String,
        #[arg(long)]
        tool: String,
        #[arg(long)]
        description: String,
        /// Strategy tags (Au, Em, Ex, Su); all four when omitted
        #[arg(long = "strategy")]
        strategies: Vec<String>,
    },
    /// Generate honest paraphrase competitors for one tool
    Competitors {
        #[arg(long)]
        server: String,
        #[arg(long)]
        tool: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Print the static rule-based variants
    Dpma {
        #[arg(long)]
        description: String,
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(store) = cli.store {
        config.store.path = store;
    }
    if let Some(model) = cli.model {
        config.oracle.model = model;
    }
    config.validate()?;

    match cli.command {
        Command::Dpma { description, name } => {
            println!("{}", best_description(&description));
            if let Some(name) = name {
                println!("{}", best_name(&name));
            }
            Ok(())
        }
        Command::Generate {
            server,
            tool,
            description,
            strategies,
        } => generate(&config, &server, &tool, &description, &strategies),
        Command::Competitors {
            server,
            tool,
            description,
            count,
        } => competitors(&config, &server, &tool, &description, count),
    }
}

fn connect(config: &AppConfig) -> anyhow::Result<RetryingOracle<OpenAiOracle>> {
    let client = OpenAiOracle::from_config(&config.oracle)?;
    Ok(RetryingOracle::new(client, RetryPolicy::from_config(&config.oracle)))
}

fn generate(
    config: &AppConfig,
    server: &str,
    tool: &str,
    description: &str,
    tags: &[String],
) -> anyhow::Result<()> {
    // Parse every tag before touching the network.
    let strategies: Vec<Strategy> = if tags.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        tags.iter()
            .map(|tag| tag.parse::<Strategy>())
            .collect::<gapma::Result<Vec<_>>>()?
    };

    let requests: Vec<RunRequest> = strategies
        .iter()
        .map(|&strategy| {
            let request = RunRequest::new(description, strategy, &config.oracle.model, &config.evolution);
            match &config.evolution.checkpoint_dir {
                Some(dir) => request.with_checkpoint(dir.join(Checkpoint::file_name(server, tool, strategy))),
                None => request,
            }
        })
        .collect();

    let oracle = connect(config)?;
    let workers = build_workers(config.oracle.max_concurrency)?;
    let store = DescriptionStore::new(&config.store.path);

    let mut failures = 0;
    for (strategy, outcome) in run_concurrently(&oracle, &config.evolution, workers, &requests) {
        match outcome {
            Ok(report) => {
                store.set_description(server, tool, strategy, &report.description)?;
                println!("{}: {}", strategy, report.description);
            }
            Err(e) => {
                log::error!("[{}] Run failed: {}", strategy, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} runs failed", failures, requests.len());
    }
    Ok(())
}

fn competitors(
    config: &AppConfig,
    server: &str,
    tool: &str,
    description: &str,
    count: usize,
) -> anyhow::Result<()> {
    let oracle = connect(config)?;
    let mut rng = match config.evolution.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let params = ParaphraseParams {
        model: &config.oracle.model,
        tokens_per_variant: config.evolution.seed_tokens_per_candidate,
        max_description_chars: config.evolution.max_description_chars,
    };

    let variants = paraphrase(&oracle, description, count, &params, &mut rng)?;
    if variants.len() < count {
        log::warn!("Only {} of {} competitor variants were recovered", variants.len(), count);
    }

    DescriptionStore::new(&config.store.path).set_competitors(server, tool, &variants)?;
    for variant in &variants {
        println!("{}", variant);
    }
    Ok(())
}
