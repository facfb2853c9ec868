use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use tokio::sync::watch;

use crate::channels::ChannelSnapshot;
use crate::client::NodeSource;
use crate::decode::PaymentDecoder;
use crate::error::SearchError;
use crate::models::{DecodedPayment, NodeInfo, NodeResult};
use crate::rank::rank_with_totals;
use crate::search::{Progress, SearchOutcome, Searcher, Stage};

/// What a session currently shows for its latest query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    /// Token of the query this view belongs to. 0 before the first query.
    pub generation: u64,
    pub query: String,
    pub stage: Stage,
    pub decoded: Option<DecodedPayment>,
    pub nodes: Option<Vec<NodeInfo>>,
    /// Only ever holds a snapshot taken for `nodes`.
    pub channels: Option<ChannelSnapshot>,
    pub error: Option<String>,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            generation: 0,
            query: String::new(),
            stage: Stage::Idle,
            decoded: None,
            nodes: None,
            channels: None,
            error: None,
        }
    }
}

impl SearchView {
    fn starting(generation: u64, query: &str) -> Self {
        Self {
            generation,
            query: query.to_string(),
            ..Self::default()
        }
    }

    /// Applies `snapshot` unless it was fetched for another node set.
    pub fn apply_channels(&mut self, snapshot: &ChannelSnapshot) -> bool {
        match &self.nodes {
            Some(nodes) if snapshot.is_for(nodes) => {
                self.channels = Some(snapshot.clone());
                true
            }
            _ => false,
        }
    }

    /// Resolved nodes in rank order. While channels are still loading this is
    /// the resolution order.
    pub fn ranked(&self) -> Vec<NodeResult> {
        let Some(nodes) = &self.nodes else {
            return Vec::new();
        };
        rank_with_totals(nodes, self.channels.as_ref().map(|s| &s.channels))
    }

    pub fn result_count(&self) -> usize {
        self.nodes.as_ref().map_or(0, Vec::len)
    }
}

/// One consumer's sequence of queries. Starting a query supersedes the one
/// before it; late results of a superseded query are dropped.
pub struct SearchSession<S, D> {
    searcher: Searcher<S, D>,
    generation: AtomicU64,
    view: watch::Sender<SearchView>,
}

impl<S: NodeSource, D: PaymentDecoder> SearchSession<S, D> {
    pub fn new(searcher: Searcher<S, D>) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            searcher,
            generation: AtomicU64::new(0),
            view,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Runs `query` as the session's newest query.
    ///
    /// Returns `SearchError::Superseded` if another query was started before
    /// this one finished.
    pub async fn run(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.send_replace(SearchView::starting(generation, query));

        let tracker = Tracker {
            session: self,
            generation,
        };
        let result = self.searcher.search_with(query, &tracker).await;

        match &result {
            Err(SearchError::Superseded) => {
                debug!("[Session] Dropped results of superseded query #{}", generation);
            }
            Err(e) => tracker.update(|view| {
                view.stage = Stage::Failed;
                view.error = Some(e.to_string());
            }),
            Ok(_) => {}
        }
        result
    }
}

/// Publishes progress of one query, as long as it is still the newest.
struct Tracker<'a, S, D> {
    session: &'a SearchSession<S, D>,
    generation: u64,
}

impl<S, D> Tracker<'_, S, D> {
    fn update(&self, apply: impl FnOnce(&mut SearchView)) {
        self.session.view.send_if_modified(|view| {
            if view.generation != self.generation {
                return false;
            }
            apply(view);
            true
        });
    }
}

impl<S, D> Progress for Tracker<'_, S, D> {
    fn is_current(&self) -> bool {
        self.session.generation.load(Ordering::SeqCst) == self.generation
    }

    fn stage(&self, stage: Stage) {
        self.update(|view| view.stage = stage);
    }

    fn decoded(&self, payment: &DecodedPayment) {
        self.update(|view| view.decoded = Some(payment.clone()));
    }

    fn resolved(&self, nodes: &[NodeInfo]) {
        self.update(|view| view.nodes = Some(nodes.to_vec()));
    }

    fn channels(&self, snapshot: &ChannelSnapshot) {
        self.update(|view| {
            if !view.apply_channels(snapshot) {
                debug!("[Session] Ignored channels fetched for another node set");
            }
        });
    }
}
