use log::{debug, info, warn};

use crate::client::NodeSource;
use crate::error::ResolutionError;
use crate::fanout::{fan_out, successes_or_all_failed};
use crate::models::NodeInfo;

/// Direct mode: one search call, which either works or fails the query.
pub async fn resolve_by_term<S: NodeSource>(
    source: &S,
    term: &str,
) -> Result<Vec<NodeInfo>, ResolutionError> {
    let nodes = source.search(term).await?;
    info!("[Resolver] Search for {:?} matched {} node(s).", term, nodes.len());
    Ok(nodes)
}

/// Multi-key mode: looks every key up at once.
///
/// Returns the nodes that resolved, in key order. Fails only when every single
/// lookup failed, with all the reasons joined in key order.
pub async fn resolve_by_keys<S: NodeSource>(
    source: &S,
    keys: &[String],
) -> Result<Vec<NodeInfo>, ResolutionError> {
    let lookups = keys.iter().map(|key| async move {
        source.node(key).await.map_err(|e| {
            warn!("[Resolver] Lookup of {} failed: {}", key, e);
            e.to_string()
        })
    });

    let nodes = fan_out(lookups, successes_or_all_failed)
        .await
        .map_err(ResolutionError::AllKeysFailed)?;

    debug!("[Resolver] Resolved {}/{} key(s).", nodes.len(), keys.len());
    Ok(nodes)
}
