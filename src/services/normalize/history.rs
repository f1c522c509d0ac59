use serde_json::Value;
use super::{Fields, NormalizationError};
use crate::services::derive::trend_direction;
use crate::types::models::{AlertsModel, HistoryModel};

/// The history endpoint serves historical analysis and alert statistics in
/// one object; both models are cut from the same payload.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPayload {
    pub history: HistoryModel,
    pub alerts: AlertsModel,
}

pub fn normalize(raw: &Value) -> Result<HistoryPayload, NormalizationError> {
    let fields = Fields::from_payload(raw)?;
    Ok(HistoryPayload {
        history: history(&fields),
        alerts: alerts(&fields),
    })
}

fn history(fields: &Fields) -> HistoryModel {
    let d = HistoryModel::default();
    HistoryModel {
        // returns are unbounded; only shares of a whole are clamped
        roi_percentage: fields.number("roi").unwrap_or(d.roi_percentage),
        pump_pattern_count: fields.count("pumpPatterns").unwrap_or(d.pump_pattern_count),
        average_pump_return_percentage: fields
            .number("averagePumpReturn")
            .unwrap_or(d.average_pump_return_percentage),
        average_recovery_hours: fields
            .number("recoveryTime")
            .map(|h| h.max(0.0))
            .unwrap_or(d.average_recovery_hours),
    }
}

fn alerts(fields: &Fields) -> AlertsModel {
    let d = AlertsModel::default();
    let triggered_change = fields.number("triggeredChange").unwrap_or(d.triggered_change);
    AlertsModel {
        active_alerts: fields.count("activeAlerts").unwrap_or(d.active_alerts),
        high_priority: fields.count("highPriority").unwrap_or(d.high_priority),
        triggered_today: fields.count("triggeredToday").unwrap_or(d.triggered_today),
        triggered_change,
        triggered_trend: trend_direction(triggered_change),
        success_rate: fields.percent("successRate").unwrap_or(d.success_rate),
        average_response_secs: fields
            .number("responseTime")
            .map(|s| s.max(0.0))
            .unwrap_or(d.average_response_secs),
    }
}
