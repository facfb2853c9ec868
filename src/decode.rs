use std::str::FromStr;

use lightning_invoice::Bolt11Invoice;
use log::debug;
use reqwest::Url;

use crate::classify;
use crate::error::DecodeError;
use crate::models::{DecodedPayment, InvoiceVariant};

const SATS_PER_BTC: u64 = 100_000_000;
const BTC_DECIMALS: usize = 8;

/// Turns a classified payment string into the nodes it points at.
#[allow(async_fn_in_trait)]
pub trait PaymentDecoder {
    /// Must return at least one pubkey, or fail.
    async fn decode(
        &self,
        variant: InvoiceVariant,
        query: &str,
    ) -> Result<DecodedPayment, DecodeError>;
}

/// Decodes BOLT11 invoices and BIP21 URIs locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceDecoder;

impl PaymentDecoder for InvoiceDecoder {
    async fn decode(
        &self,
        variant: InvoiceVariant,
        query: &str,
    ) -> Result<DecodedPayment, DecodeError> {
        let normalized = classify::normalize(query);
        let decoded = match variant {
            InvoiceVariant::Bolt11 => decode_bolt11(&normalized)?,
            InvoiceVariant::Bip21 => decode_bip21(&normalized)?,
        };
        debug!(
            "[Decoder] {} decoded: {} pubkey(s), amount {:?}",
            variant.name(),
            decoded.pubkeys.len(),
            decoded.invoice_amount_sat
        );
        Ok(decoded)
    }
}

fn decode_bolt11(invoice: &str) -> Result<DecodedPayment, DecodeError> {
    let variant = InvoiceVariant::Bolt11;
    let invoice = Bolt11Invoice::from_str(invoice)
        .map_err(|e| DecodeError::new(variant.name(), e.to_string()))?;

    let mut pubkeys = vec![invoice.get_payee_pub_key().to_string()];
    for hint in invoice.route_hints() {
        for hop in &hint.0 {
            let key = hop.src_node_id.to_string();
            if !pubkeys.contains(&key) {
                pubkeys.push(key);
            }
        }
    }

    Ok(DecodedPayment {
        invoice_type: variant,
        invoice_amount_sat: invoice.amount_milli_satoshis().map(|msat| msat / 1000),
        pubkeys,
    })
}

fn decode_bip21(uri: &str) -> Result<DecodedPayment, DecodeError> {
    let variant = InvoiceVariant::Bip21;
    let uri = Url::parse(uri).map_err(|e| DecodeError::new(variant.name(), e.to_string()))?;

    let mut amount = None;
    let mut lightning = None;
    for (key, value) in uri.query_pairs() {
        match key.to_lowercase().as_str() {
            "amount" => {
                let sats = parse_btc_amount(&value).ok_or_else(|| {
                    DecodeError::new(variant.name(), format!("invalid amount {value:?}"))
                })?;
                amount = Some(sats);
            }
            "lightning" => lightning = Some(value.to_lowercase()),
            _ => {}
        }
    }

    let Some(invoice) = lightning else {
        return Err(DecodeError::new(variant.name(), "no lightning invoice in URI"));
    };
    if !classify::looks_like_bolt11(&invoice) {
        return Err(DecodeError::new(
            variant.name(),
            "lightning parameter is not a bolt11 invoice",
        ));
    }

    let embedded =
        decode_bolt11(&invoice).map_err(|e| DecodeError::new(variant.name(), e.reason))?;
    Ok(DecodedPayment {
        invoice_type: variant,
        invoice_amount_sat: amount.or(embedded.invoice_amount_sat),
        pubkeys: embedded.pubkeys,
    })
}

/// Parses a BTC decimal such as `0.0005` into sats without going through floats.
fn parse_btc_amount(value: &str) -> Option<u64> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > BTC_DECIMALS
        || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: u64 = format!("{fraction:0<width$}", width = BTC_DECIMALS).parse().ok()?;
    whole.checked_mul(SATS_PER_BTC)?.checked_add(fraction)
}
