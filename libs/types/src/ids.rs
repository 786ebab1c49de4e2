//! Asset, pair and trader identifiers
//!
//! A [`PairId`] is always stored in canonical order (`asset0 < asset1`) so
//! that both orientations of a pair resolve to the same pool.

use crate::errors::{Result, SwapError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque asset identity (ticker or address string)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity of the account that submitted a trade
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraderId(String);

impl TraderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TraderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Trade direction relative to the canonical pair order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// asset0 in, asset1 out
    ZeroForOne,
    /// asset1 in, asset0 out
    OneForZero,
}

impl Direction {
    /// Orient canonical `(value0, value1)` as `(input side, output side)`
    pub fn orient<T>(self, canonical: (T, T)) -> (T, T) {
        match self {
            Direction::ZeroForOne => canonical,
            Direction::OneForZero => (canonical.1, canonical.0),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::ZeroForOne => Direction::OneForZero,
            Direction::OneForZero => Direction::ZeroForOne,
        }
    }
}

/// Canonical trading pair identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PairParts")]
pub struct PairId {
    asset0: AssetId,
    asset1: AssetId,
}

#[derive(Deserialize)]
struct PairParts {
    asset0: AssetId,
    asset1: AssetId,
}

impl TryFrom<PairParts> for PairId {
    type Error = SwapError;

    fn try_from(parts: PairParts) -> Result<Self> {
        PairId::new(parts.asset0, parts.asset1)
    }
}

impl PairId {
    /// Build the canonical pair for two distinct assets, in either order
    pub fn new(a: AssetId, b: AssetId) -> Result<Self> {
        if a == b {
            return Err(SwapError::invalid_path(format!(
                "pair of identical assets {a}"
            )));
        }
        let (asset0, asset1) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { asset0, asset1 })
    }

    pub fn asset0(&self) -> &AssetId {
        &self.asset0
    }

    pub fn asset1(&self) -> &AssetId {
        &self.asset1
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        &self.asset0 == asset || &self.asset1 == asset
    }

    /// Direction of a trade selling `asset_in` into this pair
    pub fn direction_for(&self, asset_in: &AssetId) -> Result<Direction> {
        if asset_in == &self.asset0 {
            Ok(Direction::ZeroForOne)
        } else if asset_in == &self.asset1 {
            Ok(Direction::OneForZero)
        } else {
            Err(SwapError::invalid_path(format!(
                "asset {asset_in} is not part of pair {self}"
            )))
        }
    }

    /// The counterpart of `asset` in this pair
    pub fn other(&self, asset: &AssetId) -> Result<&AssetId> {
        match self.direction_for(asset)? {
            Direction::ZeroForOne => Ok(&self.asset1),
            Direction::OneForZero => Ok(&self.asset0),
        }
    }

    /// `(asset_in, asset_out)` for a direction
    pub fn assets(&self, direction: Direction) -> (&AssetId, &AssetId) {
        direction.orient((&self.asset0, &self.asset1))
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asset0, self.asset1)
    }
}
