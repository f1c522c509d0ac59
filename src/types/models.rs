use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used for any text field a provider left out.
pub const UNKNOWN_LABEL: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN_LABEL.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignalStrength {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    #[default]
    Neutral,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl SignalStrength {
    /// Lenient parse: case, spaces, underscores and hyphens are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "strongbuy" => Some(Self::StrongBuy),
            "buy" => Some(Self::Buy),
            "neutral" | "hold" => Some(Self::Neutral),
            "sell" => Some(Self::Sell),
            "strongsell" => Some(Self::StrongSell),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Neutral => "Neutral",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
        }
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlertStatus {
    Triggered,
    Warning,
    #[default]
    Normal,
}

impl AlertStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "triggered" => Some(Self::Triggered),
            "warning" => Some(Self::Warning),
            "normal" => Some(Self::Normal),
            _ => None,
        }
    }
}

/// Lowercases a provider label and drops spaces, underscores and hyphens.
fn fold_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ---- signals ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFeature {
    pub name: String,
    pub weight: f64,
    pub value: f64,
}

impl Default for WeightedFeature {
    fn default() -> Self {
        Self { name: unknown(), weight: 0.0, value: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorFlag {
    pub name: String,
    pub time_frame_label: String,
    pub risk_level: String,
    pub risk_percentage: f64,
}

impl Default for BehaviorFlag {
    fn default() -> Self {
        Self {
            name: unknown(),
            time_frame_label: unknown(),
            risk_level: unknown(),
            risk_percentage: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    pub name: String,
    pub status: AlertStatus,
}

impl Default for AlertThreshold {
    fn default() -> Self {
        Self { name: unknown(), status: AlertStatus::Normal }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalModel {
    pub strength: SignalStrength,
    pub confidence: f64,
    pub pattern: String,
    pub pattern_phase: String,
    pub prediction: String,
    pub forecast: String,
    pub features: Vec<WeightedFeature>,
    pub behavior_flags: Vec<BehaviorFlag>,
    pub alert_thresholds: Vec<AlertThreshold>,
}

impl Default for SignalModel {
    fn default() -> Self {
        Self {
            strength: SignalStrength::Neutral,
            confidence: 0.0,
            pattern: unknown(),
            pattern_phase: unknown(),
            prediction: unknown(),
            forecast: unknown(),
            features: Vec::new(),
            behavior_flags: Vec::new(),
            alert_thresholds: Vec::new(),
        }
    }
}

// ---- dex ----

/// An aggregate figure with its period-over-period change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaMetric {
    pub value: f64,
    pub change_percent: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityPool {
    pub platform: String,
    pub pair: String,
    pub liquidity_value: f64,
    pub change_percent: f64,
    pub trend: Trend,
}

impl Default for LiquidityPool {
    fn default() -> Self {
        Self {
            platform: unknown(),
            pair: unknown(),
            liquidity_value: 0.0,
            change_percent: 0.0,
            trend: Trend::Flat,
        }
    }
}

/// A whale transaction. `flow` is `Up` for inflow, `Down` for outflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargeTransaction {
    pub address: String,
    pub signed_amount: f64,
    pub asset: String,
    pub recency_label: String,
    pub flow: Trend,
}

impl Default for LargeTransaction {
    fn default() -> Self {
        Self {
            address: unknown(),
            signed_amount: 0.0,
            asset: unknown(),
            recency_label: unknown(),
            flow: Trend::Flat,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexModel {
    pub volume: DeltaMetric,
    pub liquidity: DeltaMetric,
    pub unique_traders: u64,
    pub traders_change_percent: f64,
    pub traders_trend: Trend,
    pub pools: Vec<LiquidityPool>,
    pub large_transactions: Vec<LargeTransaction>,
}

// ---- risk ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAxis {
    pub label: String,
    pub percentage: f64,
}

impl Default for RiskAxis {
    fn default() -> Self {
        Self { label: unknown(), percentage: 0.0 }
    }
}

/// A status line with its free-text rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusNote {
    pub status: String,
    pub rationale: String,
}

impl Default for StatusNote {
    fn default() -> Self {
        Self { status: unknown(), rationale: String::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskModel {
    pub risk_label: String,
    /// 0..=10
    pub risk_score: f64,
    pub contract_safety_percentage: f64,
    pub audit_status: String,
    pub liquidity_lock_status: String,
    pub liquidity_lock_remaining_days: u64,
    pub ownership: StatusNote,
    pub mint_function: StatusNote,
    pub transfer_restrictions: StatusNote,
    pub liquidity_risk: RiskAxis,
    pub concentration_risk: RiskAxis,
    pub contract_risk: RiskAxis,
}

impl Default for RiskModel {
    fn default() -> Self {
        Self {
            risk_label: unknown(),
            risk_score: 0.0,
            contract_safety_percentage: 0.0,
            audit_status: unknown(),
            liquidity_lock_status: unknown(),
            liquidity_lock_remaining_days: 0,
            ownership: StatusNote::default(),
            mint_function: StatusNote::default(),
            transfer_restrictions: StatusNote::default(),
            liquidity_risk: RiskAxis::default(),
            concentration_risk: RiskAxis::default(),
            contract_risk: RiskAxis::default(),
        }
    }
}

// ---- history / alerts ----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryModel {
    pub roi_percentage: f64,
    pub pump_pattern_count: u64,
    pub average_pump_return_percentage: f64,
    pub average_recovery_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsModel {
    pub active_alerts: u64,
    pub high_priority: u64,
    pub triggered_today: u64,
    pub triggered_change: f64,
    pub triggered_trend: Trend,
    pub success_rate: f64,
    pub average_response_secs: f64,
}
