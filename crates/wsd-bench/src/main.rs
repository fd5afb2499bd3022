use std::net::SocketAddr;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use wsd_bench::config::{Cli, Commands, RunArgs, ScoreArgs, ServeArgs};
use wsd_bench::evaluate::{GoldKey, read_predictions, score};
use wsd_bench::strategy::StrategyKind;
use wsd_bench::{AppState, router, run_dataset};

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Score(args) => score_predictions(args),
        Commands::Serve(args) => serve(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configure worker pool")?;
    }

    let start = Instant::now();
    let strategies = args.model.build(&args.strategies)?;
    info!("models built in {} ms", start.elapsed().as_millis());

    let mut summaries = Vec::new();
    for strategy in &strategies.all {
        for dataset in args.datasets() {
            let summary = run_dataset(strategy.as_ref(), &dataset, &args.output_dir)
                .with_context(|| format!("{} on {}", strategy.name(), dataset.name))?;
            summaries.push(summary);
        }
    }
    info!(
        "{} prediction files written in {} ms",
        summaries.len(),
        start.elapsed().as_millis()
    );
    Ok(())
}

fn score_predictions(args: ScoreArgs) -> Result<()> {
    let gold = GoldKey::load(&args.gold)?;
    let predictions = read_predictions(&args.predictions)?;
    let result = score(&gold, &predictions);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}: {result}", args.predictions.display());
    }
    Ok(())
}

fn serve(args: ServeArgs) -> Result<()> {
    let strategies = args.model.build(&StrategyKind::ALL)?;
    let state = AppState {
        naive_bayes: strategies
            .naive_bayes
            .context("naive bayes model was not built")?,
        strategies: strategies.all,
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            let app = router(state).layer(TraceLayer::new_for_http());
            let listener = TcpListener::bind(addr).await?;
            info!("listening on {addr}");
            axum::serve(listener, app).await?;
            Ok::<_, anyhow::Error>(())
        })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(Level::INFO)
        .init();
}
