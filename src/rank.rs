use std::cmp::Reverse;

use crate::models::{ChannelMap, NodeInfo, NodeResult};

/// Sum of the capacities of `node_id`'s channels, 0 when unknown.
///
/// Saturates at `u64::MAX` instead of wrapping.
pub fn aggregate_capacity(channel_map: Option<&ChannelMap>, node_id: &str) -> u64 {
    channel_map
        .and_then(|map| map.get(node_id))
        .map(|channels| {
            channels
                .iter()
                .map(|channel| channel.capacity)
                .fold(0u64, u64::saturating_add)
        })
        .unwrap_or(0)
}

/// Orders nodes by aggregate capacity, largest first.
///
/// The sort is stable, so ties (and everything, when `channel_map` is `None`)
/// keep their input order.
pub fn rank(nodes: &[NodeInfo], channel_map: Option<&ChannelMap>) -> Vec<NodeInfo> {
    let mut ranked = nodes.to_vec();
    ranked.sort_by_cached_key(|node| Reverse(aggregate_capacity(channel_map, &node.id)));
    ranked
}

/// `rank`, with each node's channel count and capacity attached.
pub fn rank_with_totals(nodes: &[NodeInfo], channel_map: Option<&ChannelMap>) -> Vec<NodeResult> {
    rank(nodes, channel_map)
        .into_iter()
        .map(|node| NodeResult {
            channel_count: channel_map
                .and_then(|map| map.get(&node.id))
                .map(Vec::len),
            capacity_sat: aggregate_capacity(channel_map, &node.id),
            node,
        })
        .collect()
}
