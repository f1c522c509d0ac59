use serde_json::Value;
use super::{Fields, NormalizationError};
use crate::types::models::{RiskAxis, RiskModel, StatusNote};

const MAX_RISK_SCORE: f64 = 10.0;

pub fn normalize(raw: &Value) -> Result<RiskModel, NormalizationError> {
    let fields = Fields::from_payload(raw)?;
    let d = RiskModel::default();

    Ok(RiskModel {
        risk_label: fields.text("overallRiskScore").unwrap_or(d.risk_label),
        // served as "6.5/10" or a bare number
        risk_score: fields
            .number("riskLevel")
            .map(|s| s.clamp(0.0, MAX_RISK_SCORE))
            .unwrap_or(d.risk_score),
        contract_safety_percentage: fields
            .percent("smartContractSafetyPercentage")
            .unwrap_or(d.contract_safety_percentage),
        audit_status: fields.text("smartContractStatus").unwrap_or(d.audit_status),
        liquidity_lock_status: fields.text("liquidityLockStatus").unwrap_or(d.liquidity_lock_status),
        liquidity_lock_remaining_days: fields
            .count("liquidityLockRemainingDays")
            .unwrap_or(d.liquidity_lock_remaining_days),
        ownership: note(&fields, "ownershipStatus", "ownershipStatusDescription"),
        mint_function: note(&fields, "mintFunctionStatus", "mintFunctionDescription"),
        transfer_restrictions: note(&fields, "transferRestrictions", "transferRestrictionsDescription"),
        liquidity_risk: axis(&fields, "liquidityRisk"),
        concentration_risk: axis(&fields, "concentrationRisk"),
        contract_risk: axis(&fields, "smartContractRisk"),
    })
}

fn note(fields: &Fields, status_key: &str, rationale_key: &str) -> StatusNote {
    let d = StatusNote::default();
    StatusNote {
        status: fields.text(status_key).unwrap_or(d.status),
        rationale: fields.text(rationale_key).unwrap_or(d.rationale),
    }
}

/// Axes are served as a `<name>` label plus a `<name>Percentage` value.
fn axis(fields: &Fields, key: &str) -> RiskAxis {
    let d = RiskAxis::default();
    RiskAxis {
        label: fields.text(key).unwrap_or(d.label),
        percentage: fields.percent(&format!("{key}Percentage")).unwrap_or(d.percentage),
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
            "sectionId": "5a8714c4",
            "overallRiskScore": "Medium Risk",
            "riskLevel": "6.5/10",
            "smartContractSafetyPercentage": 85,
            "smartContractStatus": "Audited & Verified",
            "liquidityLockStatus": "Locked",
            "liquidityLockRemainingDays": 180,
            "ownershipStatus": "Renounced",
            "ownershipStatusDescription": "Contract ownership has been renounced",
            "mintFunctionStatus": "Present",
            "mintFunctionDescription": "Contract contains mint function",
            "transferRestrictions": "Limited",
            "transferRestrictionsDescription": "Max transaction limit: 1% of total supply",
            "liquidityRisk": "Medium",
            "liquidityRiskPercentage": 45,
            "concentrationRisk": "High",
            "concentrationRiskPercentage": 75,
            "smartContractRisk": "Low",
            "smartContractRiskPercentage": 15
        });
        let model = normalize(&raw).unwrap();
        assert_eq!(model.risk_label, "Medium Risk");
        assert_eq!(model.risk_score, 6.5);
        assert_eq!(model.liquidity_lock_remaining_days, 180);
        assert_eq!(model.mint_function.status, "Present");
        assert_eq!(model.concentration_risk.label, "High");
        assert_eq!(model.concentration_risk.percentage, 75.0);
        assert_eq!(model.contract_risk.percentage, 15.0);
    }

    #[test]
    fn test_safety_percentage_is_clamped() {
        let high = normalize(&json!({"smartContractSafetyPercentage": 140})).unwrap();
        assert_eq!(high.contract_safety_percentage, 100.0);
        let low = normalize(&json!({"smartContractSafetyPercentage": -10})).unwrap();
        assert_eq!(low.contract_safety_percentage, 0.0);
    }

    #[test]
    fn test_score_is_clamped_to_scale() {
        assert_eq!(normalize(&json!({"riskLevel": 14})).unwrap().risk_score, 10.0);
        assert_eq!(normalize(&json!({"riskLevel": "-2/10"})).unwrap().risk_score, 0.0);
    }

    #[test]
    fn test_missing_rationale_keeps_status() {
        let model = normalize(&json!({"ownershipStatus": "Renounced"})).unwrap();
        assert_eq!(model.ownership.status, "Renounced");
        assert_eq!(model.ownership.rationale, "");
        assert_eq!(model.liquidity_risk.label, UNKNOWN_LABEL);
    }

    #[test]
    fn test_rejects_string_payload() {
        assert!(normalize(&json!("Medium Risk")).is_err());
    }
}
