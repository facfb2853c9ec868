//! In-memory stand-ins for the explorer API and the payment decoder.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::client::NodeSource;
use crate::decode::PaymentDecoder;
use crate::error::{DecodeError, FetchError};
use crate::models::{Channel, DecodedPayment, InvoiceVariant, NodeInfo};

/// In-memory explorer. Unknown keys fail with "<key> not found".
#[derive(Default)]
pub struct FakeSource {
    pub nodes: HashMap<String, NodeInfo>,
    pub channels: HashMap<String, Vec<Channel>>,
    pub search_results: HashMap<String, Vec<NodeInfo>>,
    /// Per-key artificial latency, in milliseconds.
    pub delays: HashMap<String, u64>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn with_node(mut self, id: &str, capacities: &[u64]) -> Self {
        self.nodes.insert(id.to_string(), node(id));
        self.channels.insert(
            id.to_string(),
            capacities.iter().map(|&capacity| Channel { capacity }).collect(),
        );
        self
    }

    /// The node resolves, but fetching its channels fails.
    pub fn with_broken_channels(mut self, id: &str) -> Self {
        self.nodes.insert(id.to_string(), node(id));
        self.channels.remove(id);
        self
    }

    pub fn with_search(mut self, term: &str, ids: &[&str]) -> Self {
        self.search_results
            .insert(term.to_string(), ids.iter().map(|id| node(id)).collect());
        self
    }

    pub fn with_delay(mut self, key: &str, ms: u64) -> Self {
        self.delays.insert(key.to_string(), ms);
        self
    }

    async fn wait(&self, key: &str) {
        self.calls.borrow_mut().push(key.to_string());
        if let Some(&ms) = self.delays.get(key) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

pub fn node(id: &str) -> NodeInfo {
    NodeInfo {
        id: id.to_string(),
        alias: format!("alias-{id}"),
    }
}

fn not_found(key: &str) -> FetchError {
    FetchError::Status {
        status: 404,
        message: format!("{key} not found"),
    }
}

impl NodeSource for FakeSource {
    async fn search(&self, term: &str) -> Result<Vec<NodeInfo>, FetchError> {
        self.wait(term).await;
        self.search_results
            .get(term)
            .cloned()
            .ok_or_else(|| not_found(term))
    }

    async fn node(&self, pubkey: &str) -> Result<NodeInfo, FetchError> {
        self.wait(pubkey).await;
        self.nodes.get(pubkey).cloned().ok_or_else(|| not_found(pubkey))
    }

    async fn channels(&self, node_id: &str) -> Result<Vec<Channel>, FetchError> {
        self.wait(node_id).await;
        self.channels
            .get(node_id)
            .cloned()
            .ok_or_else(|| not_found(node_id))
    }
}

/// Decodes every query into the same payment, or always fails.
pub struct FakeDecoder {
    pub result: Result<DecodedPayment, String>,
    pub calls: RefCell<usize>,
}

impl FakeDecoder {
    pub fn paying(pubkeys: &[&str], amount_sat: Option<u64>) -> Self {
        Self {
            result: Ok(DecodedPayment {
                invoice_type: InvoiceVariant::Bolt11,
                invoice_amount_sat: amount_sat,
                pubkeys: pubkeys.iter().map(|key| key.to_string()).collect(),
            }),
            calls: RefCell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: RefCell::new(0),
        }
    }
}

impl PaymentDecoder for FakeDecoder {
    async fn decode(
        &self,
        variant: InvoiceVariant,
        _query: &str,
    ) -> Result<DecodedPayment, DecodeError> {
        *self.calls.borrow_mut() += 1;
        match &self.result {
            Ok(decoded) => Ok(DecodedPayment {
                invoice_type: variant,
                ..decoded.clone()
            }),
            Err(reason) => Err(DecodeError::new(variant.name(), reason.clone())),
        }
    }
}

/// A string the classifier takes for a BOLT11 invoice.
pub fn bolt11_lookalike() -> String {
    format!("lnbc50u1{}", "q".repeat(120))
}
