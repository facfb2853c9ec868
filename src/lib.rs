//! Resolves a search query (alias, node pubkey or payment string) into
//! Lightning nodes ranked by the total capacity of their channels.

pub mod channels;
pub mod classify;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod fanout;
pub mod formatters;
pub mod models;
pub mod rank;
pub mod resolver;
pub mod search;
pub mod session;

#[cfg(test)]
mod test_support;
