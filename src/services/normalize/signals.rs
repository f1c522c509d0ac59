use serde_json::Value;
use super::{Fields, NormalizationError};
use crate::types::models::{
    AlertStatus, AlertThreshold, BehaviorFlag, SignalModel, SignalStrength, WeightedFeature,
};

pub fn normalize(raw: &Value) -> Result<SignalModel, NormalizationError> {
    let fields = Fields::from_payload(raw)?;
    let d = SignalModel::default();

    Ok(SignalModel {
        strength: fields
            .text("strength")
            .and_then(|s| SignalStrength::parse(&s))
            .unwrap_or(d.strength),
        confidence: fields.percent("confidence").unwrap_or(d.confidence),
        pattern: fields.text("pattern").unwrap_or(d.pattern),
        pattern_phase: fields.text("patternPhase").unwrap_or(d.pattern_phase),
        prediction: fields.text("prediction").unwrap_or(d.prediction),
        forecast: fields.text("forecast").unwrap_or(d.forecast),
        features: fields.rows("featureEngineering").iter().map(feature).collect(),
        behavior_flags: fields.rows("blockchainRecognition").iter().map(behavior_flag).collect(),
        alert_thresholds: fields.rows("alertThresholds").iter().map(alert_threshold).collect(),
    })
}

fn feature(row: &Fields) -> WeightedFeature {
    let d = WeightedFeature::default();
    WeightedFeature {
        name: row.text("name").unwrap_or(d.name),
        weight: row.percent("weight").unwrap_or(d.weight),
        value: row.percent("value").unwrap_or(d.value),
    }
}

fn behavior_flag(row: &Fields) -> BehaviorFlag {
    let d = BehaviorFlag::default();
    BehaviorFlag {
        name: row.text("name").unwrap_or(d.name),
        time_frame_label: row.text("timeFrame").unwrap_or(d.time_frame_label),
        risk_level: row.text("riskLevel").unwrap_or(d.risk_level),
        risk_percentage: row.percent("riskPercentage").unwrap_or(d.risk_percentage),
    }
}

fn alert_threshold(row: &Fields) -> AlertThreshold {
    let d = AlertThreshold::default();
    AlertThreshold {
        name: row.text("name").unwrap_or(d.name),
        status: row
            .text("status")
            .and_then(|s| AlertStatus::parse(&s))
            .unwrap_or(d.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::models::UNKNOWN_LABEL;
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let raw = json!({
            "strength": "Strong Buy",
            "confidence": 85,
            "pattern": "Accumulation",
            "patternPhase": "Phase 2/4",
            "prediction": "+42% Expected",
            "forecast": "24h Forecast",
            "featureEngineering": [
                {"name": "Social Volume Velocity", "weight": 30, "color": "green", "value": 85},
                {"name": "Influencer Impact", "weight": 20, "color": "blue", "value": 65}
            ],
            "blockchainRecognition": [
                {"name": "Wash Trading Detection", "timeFrame": "Last 24 Hours",
                 "riskColor": "green", "riskLevel": "Low Risk", "riskPercentage": 5}
            ],
            "alertThresholds": [
                {"name": "Social Mention Spike", "status": "Triggered", "color": "green", "bgColor": "green"},
                {"name": "Liquidity Change", "status": "Warning"}
            ]
        });
        let model = normalize(&raw).unwrap();
        assert_eq!(model.strength, SignalStrength::StrongBuy);
        assert_eq!(model.confidence, 85.0);
        assert_eq!(model.pattern_phase, "Phase 2/4");
        assert_eq!(model.forecast, "24h Forecast");
        assert_eq!(model.features.len(), 2);
        assert_eq!(model.features[1].weight, 20.0);
        assert_eq!(model.behavior_flags[0].time_frame_label, "Last 24 Hours");
        assert_eq!(model.alert_thresholds[0].status, AlertStatus::Triggered);
        assert_eq!(model.alert_thresholds[1].status, AlertStatus::Warning);
    }

    #[test]
    fn test_partial_payload_degrades_per_field() {
        let raw = json!({"strength": "Strong Buy", "confidence": 85});
        let model = normalize(&raw).unwrap();
        assert_eq!(model.strength, SignalStrength::StrongBuy);
        assert_eq!(model.pattern, UNKNOWN_LABEL);
        assert!(model.features.is_empty());
    }

    #[test]
    fn test_percentages_are_clamped() {
        let raw = json!({
            "confidence": 140,
            "featureEngineering": [{"name": "x", "weight": -5, "value": 300}],
            "blockchainRecognition": [{"name": "y", "riskPercentage": "250"}]
        });
        let model = normalize(&raw).unwrap();
        assert_eq!(model.confidence, 100.0);
        assert_eq!(model.features[0].weight, 0.0);
        assert_eq!(model.features[0].value, 100.0);
        assert_eq!(model.behavior_flags[0].risk_percentage, 100.0);
    }

    #[test]
    fn test_unknown_enums_fall_back() {
        let raw = json!({"strength": "to the moon", "alertThresholds": [{"name": "z", "status": "???"}]});
        let model = normalize(&raw).unwrap();
        assert_eq!(model.strength, SignalStrength::Neutral);
        assert_eq!(model.alert_thresholds[0].status, AlertStatus::Normal);
    }

    #[test]
    fn test_rejects_array_payload() {
        assert!(normalize(&json!([{"strength": "Buy"}])).is_err());
    }
}
