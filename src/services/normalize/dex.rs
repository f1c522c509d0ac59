use serde_json::Value;
use super::{Fields, NormalizationError};
use crate::services::derive::trend_direction;
use crate::types::models::{DeltaMetric, DexModel, LargeTransaction, LiquidityPool};

pub fn normalize(raw: &Value) -> Result<DexModel, NormalizationError> {
    let fields = Fields::from_payload(raw)?;
    let d = DexModel::default();
    let traders_change = fields.number("traders_change").unwrap_or(d.traders_change_percent);

    Ok(DexModel {
        volume: delta(&fields, "total_dex_volume", "dex_volume_change"),
        liquidity: delta(&fields, "total_liquidity", "liquidity_change"),
        unique_traders: fields.count("unique_traders").unwrap_or(d.unique_traders),
        traders_change_percent: traders_change,
        traders_trend: trend_direction(traders_change),
        pools: fields.rows("liquidity_pool").iter().map(pool).collect(),
        large_transactions: fields.rows("whale_transactions").iter().map(transaction).collect(),
    })
}

fn delta(fields: &Fields, value_key: &str, change_key: &str) -> DeltaMetric {
    let d = DeltaMetric::default();
    let change_percent = fields.number(change_key).unwrap_or(d.change_percent);
    DeltaMetric {
        value: fields.number(value_key).unwrap_or(d.value),
        change_percent,
        trend: trend_direction(change_percent),
    }
}

fn pool(row: &Fields) -> LiquidityPool {
    let d = LiquidityPool::default();
    let change_percent = row.number("change").unwrap_or(d.change_percent);
    LiquidityPool {
        platform: row.text("platform").unwrap_or(d.platform),
        pair: row.text("pair").unwrap_or(d.pair),
        liquidity_value: row.number("liquidity").unwrap_or(d.liquidity_value),
        change_percent,
        trend: trend_direction(change_percent),
    }
}

fn transaction(row: &Fields) -> LargeTransaction {
    let d = LargeTransaction::default();
    let signed_amount = row.number("amount").unwrap_or(d.signed_amount);
    LargeTransaction {
        address: row.text("address").unwrap_or(d.address),
        signed_amount,
        asset: row.text("asset").unwrap_or(d.asset),
        recency_label: row.text("time_ago").unwrap_or(d.recency_label),
        flow: trend_direction(signed_amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::models::Trend;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "total_dex_volume": 1234567890,
            "dex_volume_change": 15.2,
            "total_liquidity": 234567890,
            "liquidity_change": -3.5,
            "unique_traders": 890123,
            "traders_change": 0,
            "liquidity_pool": [
                {"platform": "Uniswap", "pair": "ETH/USDT", "liquidity": 50, "change": 12.5},
                {"platform": "SushiSwap", "pair": "BTC/USDT", "liquidity": 30, "change": -5.2}
            ],
            "whale_transactions": [
                {"address": "0x12345...", "amount": 500, "asset": "ETH", "time_ago": "5 minutes ago"},
                {"address": "0x67890...", "amount": -250, "asset": "BTC", "time_ago": "1 hour ago"}
            ],
            "extra_field": {"ignored": true}
        })
    }

    #[test]
    fn test_deltas_are_classified() {
        let model = normalize(&sample()).unwrap();
        assert_eq!(model.volume.value, 1234567890.0);
        assert_eq!(model.volume.trend, Trend::Up);
        assert_eq!(model.liquidity.trend, Trend::Down);
        assert_eq!(model.traders_trend, Trend::Flat);
        assert_eq!(model.unique_traders, 890123);
    }

    #[test]
    fn test_pools_and_whale_flows() {
        let model = normalize(&sample()).unwrap();
        assert_eq!(model.pools[0].platform, "Uniswap");
        assert_eq!(model.pools[0].trend, Trend::Up);
        assert_eq!(model.pools[1].trend, Trend::Down);
        assert_eq!(model.large_transactions[0].flow, Trend::Up);
        assert_eq!(model.large_transactions[1].flow, Trend::Down);
        assert_eq!(model.large_transactions[1].recency_label, "1 hour ago");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let model = normalize(&json!({"total_liquidity": "5000"})).unwrap();
        assert_eq!(model.liquidity.value, 5000.0);
        assert_eq!(model.volume, DeltaMetric::default());
        assert_eq!(model.liquidity.change_percent, DeltaMetric::default().change_percent);
        assert_eq!(model.liquidity.trend, DeltaMetric::default().trend);
        assert!(model.pools.is_empty());
        assert!(model.large_transactions.is_empty());
    }

    #[test]
    fn test_malformed_pool_list_is_empty() {
        let model = normalize(&json!({"liquidity_pool": "none"})).unwrap();
        assert!(model.pools.is_empty());
    }
}
