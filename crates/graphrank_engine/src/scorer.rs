use std::collections::HashMap;

use anyhow::{anyhow, ensure};
use async_trait::async_trait;
use graphrank_core::{Scorer, ScoringOptions};
use rank_logging::{rank_debug, rank_info};

use crate::{Dataset, EdgeEvaluator, GraphDomain, RankedDecomposition, ScoredEntity};

/// Damped weight-propagation scorer. Deterministic for a given dataset,
/// evaluator, and configuration.
#[derive(Debug, Clone)]
pub struct IterativeScorer {
    pub iterations: usize,
    pub damping: f64,
}

impl Default for IterativeScorer {
    fn default() -> Self {
        Self {
            iterations: 20,
            damping: 0.85,
        }
    }
}

#[async_trait]
impl Scorer<GraphDomain> for IterativeScorer {
    async fn score(
        &self,
        dataset: &Dataset,
        evaluator: &EdgeEvaluator,
        options: ScoringOptions,
    ) -> anyhow::Result<RankedDecomposition> {
        let nodes = &dataset.graph.nodes;
        let n = nodes.len();
        if n == 0 {
            return Ok(RankedDecomposition {
                entries: Vec::new(),
            });
        }

        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.as_str(), i))
            .collect();

        // Each edge contributes up to two directed connections.
        let mut connections: Vec<(usize, usize, f64)> = Vec::new();
        for edge in &dataset.graph.edges {
            let weights = evaluator.evaluate(edge);
            let resolve = |address: &str| {
                index
                    .get(address)
                    .copied()
                    .ok_or_else(|| anyhow!("edge endpoint `{address}` is not a declared node"))
            };
            let src = resolve(&edge.src)?;
            let dst = resolve(&edge.dst)?;
            for (from, to, weight) in [
                (src, dst, edge.weight * weights.to_weight),
                (dst, src, edge.weight * weights.from_weight),
            ] {
                ensure!(
                    weight.is_finite() && weight >= 0.0,
                    "evaluator produced invalid weight {weight} for edge {} -> {}",
                    edge.src,
                    edge.dst
                );
                if weight > 0.0 {
                    connections.push((from, to, weight));
                }
            }
        }

        let mut out_total = vec![0.0_f64; n];
        for &(from, _, weight) in &connections {
            out_total[from] += weight;
        }

        let uniform = 1.0 / n as f64;
        let mut scores = vec![uniform; n];
        for iteration in 0..self.iterations {
            let mut next = vec![(1.0 - self.damping) * uniform; n];
            let dangling: f64 = (0..n)
                .filter(|&i| out_total[i] == 0.0)
                .map(|i| scores[i])
                .sum();
            for value in next.iter_mut() {
                *value += self.damping * dangling * uniform;
            }
            for &(from, to, weight) in &connections {
                next[to] += self.damping * scores[from] * weight / out_total[from];
            }
            if options.verbose {
                let delta: f64 = scores
                    .iter()
                    .zip(&next)
                    .map(|(old, new)| (old - new).abs())
                    .sum();
                rank_debug!("scoring iteration {iteration}: delta={delta:.6}");
            }
            scores = next;
        }

        let mut entries: Vec<ScoredEntity> = nodes
            .iter()
            .zip(&scores)
            .filter(|(node, _)| node.starts_with(&options.score_root_prefix))
            .map(|(node, &score)| ScoredEntity {
                address: node.clone(),
                score,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.address.cmp(&b.address))
        });
        if options.verbose {
            rank_info!(
                "scored {} of {} entities under prefix {:?}",
                entries.len(),
                n,
                options.score_root_prefix
            );
        }
        Ok(RankedDecomposition { entries })
    }
}
