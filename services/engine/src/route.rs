//! Validated multi-hop paths

use kswap_types::{AssetId, Direction, PairId, Result, SwapError};
use serde::Serialize;
use std::collections::HashSet;

/// One pool traversal within a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hop {
    pub pair: PairId,
    pub direction: Direction,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
}

/// Starting asset plus an ordered list of pairs.
///
/// Construction guarantees the route is non-empty, that each pair contains
/// the asset held at that point, and that no pair or asset repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    start: AssetId,
    hops: Vec<Hop>,
}

impl Route {
    pub fn new(start: AssetId, pairs: Vec<PairId>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(SwapError::invalid_path("route has no hops"));
        }

        let mut visited: HashSet<AssetId> = HashSet::from([start.clone()]);
        let mut seen_pairs: HashSet<&PairId> = HashSet::new();
        let mut current = start.clone();
        let mut hops = Vec::with_capacity(pairs.len());

        for (index, pair) in pairs.iter().enumerate() {
            if !seen_pairs.insert(pair) {
                return Err(SwapError::invalid_path(format!("pair {pair} repeated at hop {index}")));
            }
            let direction = pair.direction_for(&current).map_err(|_| {
                SwapError::invalid_path(format!("hop {index} pair {pair} does not contain {current}"))
            })?;
            let next = pair.other(&current)?.clone();
            if !visited.insert(next.clone()) {
                return Err(SwapError::invalid_path(format!("asset {next} revisited at hop {index}")));
            }

            hops.push(Hop {
                pair: pair.clone(),
                direction,
                asset_in: current,
                asset_out: next.clone(),
            });
            current = next;
        }

        Ok(Self { start, hops })
    }

    /// Route through consecutive assets, e.g. `[A, B, C]` trades A→B→C
    pub fn through(assets: &[AssetId]) -> Result<Self> {
        let (start, _) = assets
            .split_first()
            .ok_or_else(|| SwapError::invalid_path("route has no assets"))?;
        let pairs = assets
            .windows(2)
            .map(|w| PairId::new(w[0].clone(), w[1].clone()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(start.clone(), pairs)
    }

    pub fn start(&self) -> &AssetId {
        &self.start
    }

    /// Asset received at the end of the route
    pub fn end(&self) -> &AssetId {
        // Non-empty by construction
        &self.hops[self.hops.len() - 1].asset_out
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn pairs(&self) -> Vec<PairId> {
        self.hops.iter().map(|hop| hop.pair.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}
