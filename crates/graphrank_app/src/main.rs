//! CLI harness: wires the state machine to the JSON loader, the iterative
//! scorer, and an in-memory store, then drives one load-and-score pass.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use graphrank_core::{AppState, LoadingStatus, MemoryStore, StateMachine, StateStore, Substate};
use graphrank_engine::{
    Assets, EdgeEvaluator, GraphDomain, IterativeScorer, JsonDatasetLoader, RepoId,
};
use rank_logging::{rank_info, LogDestination};

#[derive(Parser)]
#[command(name = "graphrank", about = "Load a repository graph and rank its entities")]
struct Cli {
    /// Repository owner.
    owner: String,
    /// Repository name.
    name: String,
    /// Directory holding dataset files at <assets>/<owner>/<name>.json.
    #[arg(long, default_value = ".")]
    assets: PathBuf,
    /// Only rank entities whose encoded address starts with this prefix.
    #[arg(long, default_value = "")]
    prefix: String,
    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    log: LogArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(value: LogArg) -> Self {
        match value {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    rank_logging::initialize(cli.log.into());

    let store = Arc::new(MemoryStore::new(StateMachine::initial_state()));
    let machine = StateMachine::<GraphDomain>::new(
        store.clone(),
        Arc::new(JsonDatasetLoader),
        Arc::new(IterativeScorer::default()),
    );
    machine.set_edge_evaluator(EdgeEvaluator::uniform());
    machine.set_repo(RepoId::new(cli.owner, cli.name));

    let runtime = tokio::runtime::Runtime::new()?;
    let completed = runtime.block_on(
        machine.load_dataset_and_run_scoring(Assets::new(cli.assets), &cli.prefix),
    );

    let AppState::Initialized { repo, substate, .. } = store.get() else {
        unreachable!("repo and evaluator were both set");
    };
    if !completed {
        match substate.loading_status() {
            LoadingStatus::Failed => bail!("loading or scoring {repo} failed; see log"),
            _ => bail!("operation did not complete"),
        }
    }

    let Substate::Scored { ranking, .. } = substate else {
        unreachable!("completed operations end in the scored substate");
    };
    rank_info!("ranking {} entities for {repo}", ranking.entries.len());
    for entry in &ranking.entries {
        println!("{:>12.8}  {}", entry.score, entry.address);
    }
    Ok(())
}
