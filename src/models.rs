use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::formatters;
use crate::search::SearchOutcome;

// Home for the data structures shared by the pipeline and the API.

/// A node as returned by the explorer API (`/node/<pubkey>` and `/search`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub id: String,
    #[serde(default)]
    pub alias: String,
}

/// One of a node's channels. Only the capacity matters to us.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub capacity: u64,
}

/// Node id -> that node's channels.
pub type ChannelMap = HashMap<String, Vec<Channel>>;

/// Payment formats the classifier knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceVariant {
    /// A BOLT11 lightning invoice.
    Bolt11,
    /// A `bitcoin:` URI carrying an amount and, optionally, a lightning invoice.
    Bip21,
}

impl InvoiceVariant {
    pub fn name(self) -> &'static str {
        match self {
            InvoiceVariant::Bolt11 => "bolt11",
            InvoiceVariant::Bip21 => "bip21",
        }
    }
}

/// What a payment string told us. `pubkeys` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayment {
    pub invoice_type: InvoiceVariant,
    pub invoice_amount_sat: Option<u64>,
    pub pubkeys: Vec<String>,
}

/// A ranked node with its aggregate channel figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeResult {
    pub node: NodeInfo,
    /// `None` when the node's channels were not fetched (yet).
    pub channel_count: Option<usize>,
    pub capacity_sat: u64,
}

/// How a decoded payment is shown in the `/search` response.
#[derive(Serialize, Debug, Clone)]
pub struct InvoiceResponse {
    pub invoice_type: &'static str,
    pub amount_sat: Option<u64>,
    pub amount: Option<String>,
}

/// How a node is shown in the `/search` response.
#[derive(Serialize, Debug, Clone)]
pub struct NodeResponse {
    pub id: String,
    pub id_display: String,
    pub alias: String,
    pub channel_count: Option<usize>,
    pub capacity_sat: u64,
    pub capacity: String,
}

/// Body of `GET /search/{query}`.
#[derive(Serialize, Debug, Clone)]
pub struct SearchResponse {
    pub query: String,
    pub query_display: String,
    pub invoice: Option<InvoiceResponse>,
    pub result_count: usize,
    pub nodes: Vec<NodeResponse>,
}

impl From<&DecodedPayment> for InvoiceResponse {
    fn from(decoded: &DecodedPayment) -> Self {
        Self {
            invoice_type: decoded.invoice_type.name(),
            amount_sat: decoded.invoice_amount_sat,
            amount: decoded
                .invoice_amount_sat
                .map(formatters::satoshis_to_satcomma),
        }
    }
}

impl From<&NodeResult> for NodeResponse {
    fn from(result: &NodeResult) -> Self {
        Self {
            id: result.node.id.clone(),
            id_display: formatters::trim_long_string(&result.node.id),
            alias: result.node.alias.clone(),
            channel_count: result.channel_count,
            capacity_sat: result.capacity_sat,
            capacity: formatters::satoshis_to_satcomma(result.capacity_sat),
        }
    }
}

impl From<&SearchOutcome> for SearchResponse {
    fn from(outcome: &SearchOutcome) -> Self {
        Self {
            query: outcome.query.clone(),
            query_display: formatters::trim_long_string(&outcome.query),
            invoice: outcome.decoded.as_ref().map(InvoiceResponse::from),
            result_count: outcome.result_count(),
            nodes: outcome.nodes.iter().map(NodeResponse::from).collect(),
        }
    }
}
