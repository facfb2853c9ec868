use log::{debug, warn};

use crate::client::NodeSource;
use crate::fanout::{fan_out, recover_each};
use crate::models::{Channel, ChannelMap, NodeInfo};

/// Channels fetched for one exact node set.
///
/// `node_ids` is the key the fetch was issued under. A consumer holding a
/// different node set must ignore the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub node_ids: Vec<String>,
    pub channels: ChannelMap,
}

impl ChannelSnapshot {
    /// Whether this snapshot was fetched for exactly `nodes`, in that order.
    pub fn is_for(&self, nodes: &[NodeInfo]) -> bool {
        self.node_ids.len() == nodes.len()
            && self.node_ids.iter().zip(nodes).all(|(id, node)| *id == node.id)
    }
}

/// Fetches every node's channels at once. Never fails: a node whose fetch
/// failed maps to an empty channel list.
pub async fn fetch_channels<S: NodeSource>(source: &S, nodes: &[NodeInfo]) -> ChannelSnapshot {
    let fetches = nodes.iter().map(|node| async move {
        source
            .channels(&node.id)
            .await
            .map(|channels| (node.id.clone(), channels))
            .map_err(|e| (node.id.clone(), e))
    });

    let entries = fan_out(fetches, |outcomes| {
        recover_each(outcomes, |(node_id, e)| {
            warn!("[Channels] Could not fetch channels of {}: {}", node_id, e);
            (node_id, Vec::<Channel>::new())
        })
    })
    .await;

    debug!("[Channels] Fetched channels for {} node(s).", entries.len());
    ChannelSnapshot {
        node_ids: nodes.iter().map(|node| node.id.clone()).collect(),
        channels: entries.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeSource, node};

    #[tokio::test]
    async fn failed_fetch_becomes_empty_list() {
        let source = FakeSource::default()
            .with_node("X", &[100, 200])
            .with_broken_channels("Y");
        let snapshot = fetch_channels(&source, &[node("X"), node("Y")]).await;

        assert_eq!(snapshot.channels.len(), 2);
        assert_eq!(
            snapshot.channels["X"],
            vec![Channel { capacity: 100 }, Channel { capacity: 200 }]
        );
        assert!(snapshot.channels["Y"].is_empty());
    }

    #[tokio::test]
    async fn snapshot_is_keyed_by_the_node_set() {
        let source = FakeSource::default().with_node("X", &[1]).with_node("Y", &[2]);
        let snapshot = fetch_channels(&source, &[node("X"), node("Y")]).await;

        assert!(snapshot.is_for(&[node("X"), node("Y")]));
        assert!(!snapshot.is_for(&[node("Y"), node("X")]));
        assert!(!snapshot.is_for(&[node("X")]));
        assert!(!snapshot.is_for(&[node("X"), node("Y"), node("Z")]));
    }

    #[tokio::test]
    async fn empty_node_set_fetches_nothing() {
        let source = FakeSource::default();
        let snapshot = fetch_channels(&source, &[]).await;
        assert!(snapshot.channels.is_empty());
        assert!(source.calls.borrow().is_empty());
    }
}
