use log::info;

use crate::channels::{ChannelSnapshot, fetch_channels};
use crate::classify::classify;
use crate::client::NodeSource;
use crate::decode::PaymentDecoder;
use crate::error::SearchError;
use crate::models::{DecodedPayment, NodeInfo, NodeResult};
use crate::rank::rank_with_totals;
use crate::resolver::{resolve_by_keys, resolve_by_term};

/// Where a query currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Classifying,
    DirectResolving,
    Decoding,
    MultiResolving,
    Aggregating,
    Ranked,
    Failed,
}

/// Observes a running query. Every hook defaults to a no-op.
pub trait Progress {
    /// Once this returns false the pipeline stops at the next stage boundary.
    fn is_current(&self) -> bool {
        true
    }

    fn stage(&self, _stage: Stage) {}

    /// Called as soon as decoding finishes, before any node is resolved.
    fn decoded(&self, _payment: &DecodedPayment) {}

    fn resolved(&self, _nodes: &[NodeInfo]) {}

    fn channels(&self, _snapshot: &ChannelSnapshot) {}
}

impl Progress for () {}

/// Final result of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    pub decoded: Option<DecodedPayment>,
    /// Largest aggregate capacity first.
    pub nodes: Vec<NodeResult>,
}

impl SearchOutcome {
    pub fn result_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Runs queries against a node source, decoding payment strings on the way.
pub struct Searcher<S, D> {
    source: S,
    decoder: D,
}

impl<S: NodeSource, D: PaymentDecoder> Searcher<S, D> {
    pub fn new(source: S, decoder: D) -> Self {
        Self { source, decoder }
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        self.search_with(query, &()).await
    }

    /// Same as `search`, reporting every step to `progress`.
    pub async fn search_with<P: Progress>(
        &self,
        query: &str,
        progress: &P,
    ) -> Result<SearchOutcome, SearchError> {
        progress.stage(Stage::Classifying);
        let (decoded, nodes) = match classify(query) {
            None => {
                progress.stage(Stage::DirectResolving);
                let nodes = resolve_by_term(&self.source, query).await?;
                (None, nodes)
            }
            Some(variant) => {
                progress.stage(Stage::Decoding);
                let decoded = self.decoder.decode(variant, query).await?;
                ensure_current(progress)?;
                progress.decoded(&decoded);

                progress.stage(Stage::MultiResolving);
                let nodes = resolve_by_keys(&self.source, &decoded.pubkeys).await?;
                (Some(decoded), nodes)
            }
        };
        ensure_current(progress)?;
        progress.resolved(&nodes);

        progress.stage(Stage::Aggregating);
        let snapshot = if nodes.is_empty() {
            None
        } else {
            let snapshot = fetch_channels(&self.source, &nodes).await;
            ensure_current(progress)?;
            progress.channels(&snapshot);
            Some(snapshot)
        };

        let ranked = rank_with_totals(&nodes, snapshot.as_ref().map(|s| &s.channels));
        info!(
            "[Search] {} result(s) for {:?}{}",
            ranked.len(),
            query,
            decoded
                .as_ref()
                .map(|d| format!(" ({})", d.invoice_type.name()))
                .unwrap_or_default()
        );
        progress.stage(Stage::Ranked);

        Ok(SearchOutcome {
            query: query.to_string(),
            decoded,
            nodes: ranked,
        })
    }
}

fn ensure_current<P: Progress>(progress: &P) -> Result<(), SearchError> {
    if progress.is_current() {
        Ok(())
    } else {
        Err(SearchError::Superseded)
    }
}
