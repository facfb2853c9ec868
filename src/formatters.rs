// A couple of helper functions to format data for the API response.

const SATS_PER_BTC: u64 = 100_000_000;

/// How many characters `trim_long_string` keeps on each side.
const TRIM_KEEP: usize = 10;

/// Formats sats as BTC with the fractional digits grouped for readability,
/// e.g. 5_000 -> "0.00 005 000".
pub fn satoshis_to_satcomma(sats: u64) -> String {
    let fraction = format!("{:08}", sats % SATS_PER_BTC);
    format!(
        "{}.{} {} {}",
        sats / SATS_PER_BTC,
        &fraction[..2],
        &fraction[2..5],
        &fraction[5..]
    )
}

/// Shortens pubkeys and invoices to `head...tail`.
pub fn trim_long_string(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= TRIM_KEEP * 2 + 3 {
        return value.to_string();
    }

    let head: String = chars[..TRIM_KEEP].iter().collect();
    let tail: String = chars[chars.len() - TRIM_KEEP..].iter().collect();
    format!("{head}...{tail}")
}
