use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use graphrank_core::{decode, AddressError, DatasetLoader};
use rank_logging::rank_info;
use thiserror::Error;

use crate::{Assets, Dataset, Graph, GraphDomain, RepoId};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse dataset file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid entity address in dataset")]
    Address(#[from] AddressError),
    #[error("edge endpoint `{address}` is not a declared node")]
    UnknownEndpoint { address: String },
}

/// Loads a repository's graph from `<assets>/<owner>/<name>.json` and
/// validates every address against the core codec.
#[derive(Debug, Default, Clone)]
pub struct JsonDatasetLoader;

impl JsonDatasetLoader {
    fn build_dataset(graph: Graph) -> Result<Dataset, LoadError> {
        let mut entities = BTreeMap::new();
        for node in &graph.nodes {
            let address = decode(node)?;
            entities.insert(node.clone(), address);
        }
        for edge in &graph.edges {
            for endpoint in [&edge.src, &edge.dst] {
                if !entities.contains_key(endpoint) {
                    return Err(LoadError::UnknownEndpoint {
                        address: endpoint.clone(),
                    });
                }
            }
        }
        Ok(Dataset { graph, entities })
    }
}

#[async_trait]
impl DatasetLoader<GraphDomain> for JsonDatasetLoader {
    async fn load(&self, assets: &Assets, repo: &RepoId) -> anyhow::Result<Dataset> {
        let path = assets.dataset_path(repo);
        let bytes = tokio::fs::read(&path).await.map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let graph: Graph =
            serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
                path: path.clone(),
                source,
            })?;
        let dataset = Self::build_dataset(graph)?;
        rank_info!(
            "loaded dataset for {repo}: {} nodes, {} edges",
            dataset.graph.nodes.len(),
            dataset.graph.edges.len()
        );
        Ok(dataset)
    }
}
