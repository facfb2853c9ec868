use crate::models::InvoiceVariant;

const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Network tags that may follow `ln` in a BOLT11 human-readable part.
const BOLT11_NETWORKS: [&str; 5] = ["bcrt", "tbs", "bc", "tb", "sb"];

/// 7 characters of timestamp plus the 104-character signature.
const BOLT11_MIN_DATA_LEN: usize = 111;

/// Lowercases the query and drops a `lightning:` URI scheme, if any.
pub(crate) fn normalize(query: &str) -> String {
    let lowered = query.trim().to_lowercase();
    match lowered.strip_prefix("lightning:") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// Tells which payment format `query` looks like, if any.
///
/// Only the surface syntax is checked; whether the string really decodes is up
/// to the decoder.
pub fn classify(query: &str) -> Option<InvoiceVariant> {
    let query = normalize(query);

    if query.starts_with("bitcoin:") {
        return Some(InvoiceVariant::Bip21);
    }
    if looks_like_bolt11(&query) {
        return Some(InvoiceVariant::Bolt11);
    }
    None
}

pub(crate) fn looks_like_bolt11(query: &str) -> bool {
    let Some(hrp_rest) = query.strip_prefix("ln") else {
        return false;
    };
    let Some(separator) = query.rfind('1') else {
        return false;
    };

    let known_network = BOLT11_NETWORKS
        .iter()
        .any(|network| hrp_rest.starts_with(network));
    let data = &query[separator + 1..];

    known_network
        && data.len() >= BOLT11_MIN_DATA_LEN
        && data.chars().all(|c| BECH32_CHARSET.contains(c))
}
