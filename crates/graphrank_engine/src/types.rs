use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use graphrank_core::{EntityAddress, ScoringDomain};
use serde::{Deserialize, Serialize};

/// Marker type binding the concrete engine types into the core machine.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphDomain;

impl ScoringDomain for GraphDomain {
    type Repo = RepoId;
    type EdgeEvaluator = EdgeEvaluator;
    type Assets = Assets;
    type Dataset = Dataset;
    type Ranking = RankedDecomposition;
}

/// Repository identifier: selects which dataset file the loader reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Root directory holding dataset files, one per repository at
/// `<root>/<owner>/<name>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dataset_path(&self, repo: &RepoId) -> PathBuf {
        self.root.join(&repo.owner).join(format!("{}.json", repo.name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Serialized graph shape: nodes are encoded entity addresses, edges connect
/// two declared nodes with a raw weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub src: String,
    pub dst: String,
    pub weight: f64,
}

/// Loaded-graph bundle handed to the scorer. The entity map is keyed by
/// encoded address, decoded once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub graph: Graph,
    pub entities: BTreeMap<String, EntityAddress>,
}

/// Directional multipliers an evaluator assigns to one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWeights {
    /// Weight of the src → dst direction.
    pub to_weight: f64,
    /// Weight of the dst → src direction.
    pub from_weight: f64,
}

/// Cloneable edge-weighting function.
///
/// Equality is pointer identity: two evaluators compare equal only when they
/// are clones of the same underlying function, which is what the state
/// machine's structural snapshot comparison needs.
#[derive(Clone)]
pub struct EdgeEvaluator(Arc<dyn Fn(&EdgeRecord) -> EdgeWeights + Send + Sync>);

impl EdgeEvaluator {
    pub fn new(f: impl Fn(&EdgeRecord) -> EdgeWeights + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Weighs every edge symmetrically at its raw weight.
    pub fn uniform() -> Self {
        Self::new(|_edge| EdgeWeights {
            to_weight: 1.0,
            from_weight: 1.0,
        })
    }

    pub fn evaluate(&self, edge: &EdgeRecord) -> EdgeWeights {
        (self.0)(edge)
    }
}

impl PartialEq for EdgeEvaluator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EdgeEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EdgeEvaluator(..)")
    }
}

/// Scoring output: entities under the requested prefix, highest score first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDecomposition {
    pub entries: Vec<ScoredEntity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntity {
    pub address: String,
    pub score: f64,
}
