//! Swap event record consumed by off-chain indexers

use crate::ids::{AssetId, TraderId};
use serde::{Deserialize, Serialize};

/// One settled trade (one record per hop for multi-hop swaps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub trader: TraderId,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub reserve_in_after: u64,
    pub reserve_out_after: u64,
    pub timestamp_ns: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let record = SwapRecord {
            trader: TraderId::new("alice"),
            asset_in: AssetId::new("A"),
            asset_out: AssetId::new("B"),
            amount_in: 100,
            amount_out: 180,
            fee_amount: 1,
            reserve_in_after: 1100,
            reserve_out_after: 1820,
            timestamp_ns: 42,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["trader"], "alice");
        assert_eq!(json["asset_in"], "A");
        assert_eq!(json["amount_out"], 180);
        assert_eq!(json["reserve_out_after"], 1820);

        let back: SwapRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
