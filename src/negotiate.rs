//! Negotiation engine
//!
//! Computes the pairs common to the server catalog and the client's parsed
//! `Accept` entries, then applies the fallback policy. Selection keys on
//! exact `(content type, format)` equality and returns results in catalog
//! declaration order, so among all mutually acceptable pairs the server's
//! highest-declared-priority one wins. Client quality factors only reorder
//! the accepted side and never override catalog order in the final choice.

use crate::accept::{self, AcceptEntry};
use crate::catalog::{MediaCatalog, MediaPair};
use crate::config::NegotiationConfig;
use std::collections::HashMap;
use tracing::{debug, trace};

/// The outcome of one negotiation.
///
/// A tagged outcome rather than a bare optional: a fallback is an ordinary
/// result under the default policy, and a rejection is a policy decision the
/// caller must act on, not an absence of data.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationResult {
    /// A pair present in both the catalog and the accepted set
    Matched(MediaPair),
    /// No common pair; strict mode off, the server default was chosen
    FellBack(MediaPair),
    /// No common pair; strict mode on, the exchange must end with 406
    Rejected,
}

impl NegotiationResult {
    /// The chosen pair, for both matched and fallback outcomes.
    pub fn pair(&self) -> Option<&MediaPair> {
        match self {
            Self::Matched(pair) | Self::FellBack(pair) => Some(pair),
            Self::Rejected => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Pairs common to both lists, in catalog key order.
///
/// Each side collapses into a key map first, later entries overwriting
/// earlier ones per key. Catalog keys keep the position of their first
/// occurrence, so the output order is the server's declaration order even
/// when duplicates overwrite a value.
pub fn intersect(catalog: &[MediaPair], accepted: &[MediaPair]) -> Vec<MediaPair> {
    let accepted_keys: HashMap<String, &MediaPair> =
        accepted.iter().map(|pair| (pair.key(), pair)).collect();

    let mut key_order: Vec<String> = Vec::with_capacity(catalog.len());
    let mut by_key: HashMap<String, &MediaPair> = HashMap::with_capacity(catalog.len());
    for pair in catalog {
        let key = pair.key();
        if !by_key.contains_key(&key) {
            key_order.push(key.clone());
        }
        by_key.insert(key, pair);
    }

    key_order
        .into_iter()
        .filter(|key| accepted_keys.contains_key(key))
        .filter_map(|key| by_key.get(&key).map(|pair| (*pair).clone()))
        .collect()
}

/// Negotiate the media pair to respond with.
///
/// An absent or empty header means the client takes anything, so the
/// server's preferred pair matches outright. Otherwise the header is
/// parsed, ranked, and intersected with the catalog; an empty intersection
/// resolves through the strict-mode policy.
pub fn negotiate(
    catalog: &MediaCatalog,
    accept_header: Option<&str>,
    config: &NegotiationConfig,
) -> NegotiationResult {
    let header = accept_header.unwrap_or("").trim();
    if header.is_empty() {
        let preferred = catalog.preferred().clone();
        debug!(chosen = %preferred, "no Accept header, using preferred media type");
        return NegotiationResult::Matched(preferred);
    }

    let entries = accept::rank(accept::parse(header));
    trace!(ranges = entries.len(), catalog = catalog.len(), "parsed Accept header");

    let accepted: Vec<MediaPair> = entries.iter().map(AcceptEntry::to_media_pair).collect();
    let common = intersect(catalog.pairs(), &accepted);

    match common.into_iter().next() {
        Some(pair) => {
            debug!(chosen = %pair, "negotiated media type");
            NegotiationResult::Matched(pair)
        }
        None if config.strict_mode => {
            debug!("no acceptable media type, rejecting");
            NegotiationResult::Rejected
        }
        None => {
            let fallback = catalog.preferred().clone();
            debug!(fallback = %fallback, "no acceptable media type, falling back");
            NegotiationResult::FellBack(fallback)
        }
    }
}
