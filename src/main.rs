use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use matchkit::{GraphLoader, MatchingWorkflow, RunConfig};

const USAGE: &str = "usage: matchkit <graph.json> [--algorithm suitor|path-growing] [--sorted] [--parallel] [--randomize-weights SEED]";

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

fn parse_args() -> Result<(PathBuf, RunConfig)> {
    let mut args = env::args().skip(1);
    let mut path = None;
    let mut config = RunConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--algorithm" => {
                let value = args.next().context("--algorithm expects a value")?;
                config.algorithm = value.parse()?;
            }
            "--sorted" => config.sort_edges = true,
            "--parallel" => config.parallel = true,
            "--randomize-weights" => {
                let value = args.next().context("--randomize-weights expects a seed")?;
                let seed = value
                    .parse::<u64>()
                    .with_context(|| format!("invalid seed {value:?}"))?;
                config.randomize_seed = Some(seed);
            }
            "-h" | "--help" => anyhow::bail!("{USAGE}"),
            other if other.starts_with("--") => anyhow::bail!("Unknown option: {other}\n{USAGE}"),
            other => {
                if path.is_some() {
                    anyhow::bail!("Unexpected extra argument: {other}");
                }
                path = Some(PathBuf::from(other));
            }
        }
    }

    let path = path.context(USAGE)?;
    Ok((path, config))
}

fn main() -> Result<()> {
    init_logging();
    let (path, config) = parse_args()?;

    let mut instance = GraphLoader::from_path(&path)?;
    info!(
        "Graph {:?}: nodes {}, edges {}",
        path,
        instance.node_count(),
        instance.edge_count()
    );

    let workflow = MatchingWorkflow::new(config);
    info!("Running {} matcher", workflow.config().algorithm);
    let summary = workflow
        .execute(&mut instance.graph)
        .with_context(|| format!("match graph at {:?}", path))?;

    let report = serde_json::to_string_pretty(&summary.report).context("serialize report")?;
    println!("{report}");
    Ok(())
}
