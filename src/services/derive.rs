//! Threshold rules mapping raw model fields to presentation classes.
//!
//! Every risk tier, color bucket and trend arrow in the crate comes from the
//! functions here. Nothing else holds threshold numbers.

use serde::Serialize;
use crate::services::store::Snapshot;
use crate::types::models::{AlertsModel, DexModel, RiskModel, SignalModel, Trend};

pub const LOW_RISK_CEILING: f64 = 3.5;
pub const HIGH_RISK_FLOOR: f64 = 7.0;
pub const COLOR_LOW_BOUND: f64 = 30.0;
pub const COLOR_HIGH_BOUND: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorBucket {
    Green,
    Yellow,
    Red,
}

/// Which end of a percentage scale is good news.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    HigherIsBetter,
    HigherIsWorse,
}

/// Score on the 0..10 scale. An unreadable (NaN) score is treated as high risk.
pub fn risk_tier(score: f64) -> RiskTier {
    if score < LOW_RISK_CEILING {
        RiskTier::Low
    } else if score < HIGH_RISK_FLOOR {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

pub fn color_bucket(percentage: f64, polarity: Polarity) -> ColorBucket {
    // NaN falls through both comparisons into the middle band
    let (low, high) = match polarity {
        Polarity::HigherIsBetter => (ColorBucket::Red, ColorBucket::Green),
        Polarity::HigherIsWorse => (ColorBucket::Green, ColorBucket::Red),
    };
    if percentage < COLOR_LOW_BOUND {
        low
    } else if percentage > COLOR_HIGH_BOUND {
        high
    } else {
        ColorBucket::Yellow
    }
}

pub fn trend_direction(signed_delta: f64) -> Trend {
    if signed_delta > 0.0 {
        Trend::Up
    } else if signed_delta < 0.0 {
        Trend::Down
    } else {
        Trend::Flat
    }
}

pub fn mint_risk_flag(status: &str) -> RiskTier {
    if status.trim().eq_ignore_ascii_case("present") {
        RiskTier::High
    } else {
        RiskTier::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalClasses {
    pub confidence: ColorBucket,
    pub features: Vec<ColorBucket>,
    pub behavior_flags: Vec<ColorBucket>,
}

impl SignalClasses {
    pub fn from_model(model: &SignalModel) -> Self {
        Self {
            confidence: color_bucket(model.confidence, Polarity::HigherIsBetter),
            features: model
                .features
                .iter()
                .map(|f| color_bucket(f.value, Polarity::HigherIsBetter))
                .collect(),
            behavior_flags: model
                .behavior_flags
                .iter()
                .map(|f| color_bucket(f.risk_percentage, Polarity::HigherIsWorse))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DexClasses {
    pub volume: Trend,
    pub liquidity: Trend,
    pub traders: Trend,
    pub pools: Vec<Trend>,
    pub large_transactions: Vec<Trend>,
}

impl DexClasses {
    pub fn from_model(model: &DexModel) -> Self {
        Self {
            volume: trend_direction(model.volume.change_percent),
            liquidity: trend_direction(model.liquidity.change_percent),
            traders: trend_direction(model.traders_change_percent),
            pools: model.pools.iter().map(|p| trend_direction(p.change_percent)).collect(),
            large_transactions: model
                .large_transactions
                .iter()
                .map(|t| trend_direction(t.signed_amount))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskClasses {
    pub tier: RiskTier,
    pub contract_safety: ColorBucket,
    pub mint_risk: RiskTier,
    pub liquidity_risk: ColorBucket,
    pub concentration_risk: ColorBucket,
    pub contract_risk: ColorBucket,
}

impl RiskClasses {
    pub fn from_model(model: &RiskModel) -> Self {
        Self {
            tier: risk_tier(model.risk_score),
            contract_safety: color_bucket(model.contract_safety_percentage, Polarity::HigherIsBetter),
            mint_risk: mint_risk_flag(&model.mint_function.status),
            liquidity_risk: color_bucket(model.liquidity_risk.percentage, Polarity::HigherIsWorse),
            concentration_risk: color_bucket(model.concentration_risk.percentage, Polarity::HigherIsWorse),
            contract_risk: color_bucket(model.contract_risk.percentage, Polarity::HigherIsWorse),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertClasses {
    pub success_rate: ColorBucket,
    pub triggered: Trend,
}

impl AlertClasses {
    pub fn from_model(model: &AlertsModel) -> Self {
        Self {
            success_rate: color_bucket(model.success_rate, Polarity::HigherIsBetter),
            triggered: trend_direction(model.triggered_change),
        }
    }
}

/// Classifications for everything currently displayed by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    pub signals: SignalClasses,
    pub dex: DexClasses,
    pub risk: RiskClasses,
    pub alerts: AlertClasses,
}

impl DerivedView {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            signals: SignalClasses::from_model(&snapshot.signals.view()),
            dex: DexClasses::from_model(&snapshot.dex.view()),
            risk: RiskClasses::from_model(&snapshot.risk.view()),
            alerts: AlertClasses::from_model(&snapshot.alerts.view()),
        }
    }
}
