// ABOUTME: Ancestor aligner finding the shallowest shape shared by every anchor's ancestor chain.
// ABOUTME: Buckets chain entries by shape signature, depth by depth, until one bucket covers all anchors.

//! Ancestor alignment.
//!
//! Chains are walked depth by depth in lockstep. At each depth every anchor
//! that still has an ancestor drops it into the bucket for that ancestor's
//! shape signature. Buckets persist across depths, so anchors nested at
//! different depths can meet on the same shape. The first bucket holding one
//! node per anchor is the converged shape.
//!
//! Signatures of an element strictly contain the signatures of its
//! descendants, so one anchor can never land twice in the same bucket.

use std::collections::HashMap;

use scraper::ElementRef;
use tracing::debug;

use crate::dom::{ancestor_chain, shape_signature};
use crate::error::{Result, WeberError};
use crate::locate::AnchorMatch;

/// The converged ancestors, one per anchor in input order.
#[derive(Debug, Clone)]
pub struct Alignment<'a> {
    /// Chain depth at which the last anchor joined the winning bucket.
    pub depth: usize,
    pub signature: String,
    pub nodes: Vec<ElementRef<'a>>,
}

/// Find the shallowest common ancestor shape across all matches.
pub fn align<'a>(matches: &[AnchorMatch<'a>]) -> Result<Alignment<'a>> {
    if matches.is_empty() {
        return Err(WeberError::no_convergence(
            "",
            "Align",
            Some(anyhow::anyhow!("no anchors to align")),
        ));
    }

    let chains: Vec<Vec<ElementRef<'a>>> = matches
        .iter()
        .map(|m| ancestor_chain(m.element))
        .collect();

    // A lone top-level element has nothing above it; it is its own shape.
    if let [only] = matches {
        if chains[0].is_empty() {
            let signature = shape_signature(only.element);
            debug!(%signature, "single anchor without ancestors converged on itself");
            return Ok(Alignment {
                depth: 0,
                signature,
                nodes: vec![only.element],
            });
        }
    }

    // Past the longest chain nothing new can enter a bucket.
    let ceiling = chains.iter().map(Vec::len).max().unwrap_or(0);

    let mut buckets: HashMap<String, Vec<Option<ElementRef<'a>>>> = HashMap::new();

    for depth in 0..ceiling {
        for (slot, chain) in chains.iter().enumerate() {
            let Some(&node) = chain.get(depth) else {
                continue;
            };
            let signature = shape_signature(node);
            let bucket = buckets
                .entry(signature.clone())
                .or_insert_with(|| vec![None; chains.len()]);
            if bucket[slot].is_none() {
                bucket[slot] = Some(node);
            }

            if bucket.iter().all(Option::is_some) {
                let nodes: Vec<ElementRef<'a>> = bucket.iter().flatten().copied().collect();
                debug!(depth, %signature, anchors = nodes.len(), "ancestor chains converged");
                return Ok(Alignment {
                    depth,
                    signature,
                    nodes,
                });
            }
        }
        debug!(depth, buckets = buckets.len(), "no shared shape yet");
    }

    let anchors: Vec<&str> = matches.iter().map(|m| m.anchor.as_str()).collect();
    Err(WeberError::no_convergence(
        anchors.join(", "),
        "Align",
        Some(anyhow::anyhow!(
            "ancestor chains exhausted after {} levels without a shared shape",
            ceiling
        )),
    ))
}
