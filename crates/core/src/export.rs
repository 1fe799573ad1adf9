//! Report bundle consumed by the spreadsheet/JSON export collaborators
//!
//! The bundle is a plain serializable record: raw parameters, both scenario
//! snapshots and the appraisal, exactly as the export layer forwards them.

use crate::core_types::FlowParameters;
use crate::scenario::economics::{analyze_project, EconomicAnalysis, EconomicConfig};
use crate::scenario::emissions::{
    current_scenario, proposed_scenario, EmissionConfig, ScenarioResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Report serialization failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    SerializeFailed(String),
    SaveFailed(String),
    LoadFailed(String),
    ParseFailed(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::SerializeFailed(e) => write!(f, "failed to serialize report: {e}"),
            ExportError::SaveFailed(e) => write!(f, "failed to save report: {e}"),
            ExportError::LoadFailed(e) => write!(f, "failed to load report: {e}"),
            ExportError::ParseFailed(e) => write!(f, "failed to parse report: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// Scenario comparison report as handed to the export layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub parameters: FlowParameters,
    pub current: ScenarioResult,
    pub proposed: ScenarioResult,
    pub economics: EconomicAnalysis,
}

impl ReportBundle {
    /// Run both scenarios and the appraisal for one parameter set
    pub fn assemble(
        parameters: &FlowParameters,
        recovery_efficiency: f64,
        investment_usd: f64,
        emission_config: &EmissionConfig,
        economic_config: &EconomicConfig,
    ) -> Self {
        let current = current_scenario(parameters, emission_config);
        let proposed = proposed_scenario(parameters, recovery_efficiency, emission_config);
        let economics = analyze_project(&current, &proposed, investment_usd, economic_config);

        Self {
            parameters: *parameters,
            current,
            proposed,
            economics,
        }
    }

    /// Pretty-printed JSON form of the report
    ///
    /// # Errors
    /// Returns [`ExportError::SerializeFailed`] when serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::SerializeFailed(e.to_string()))
    }

    /// Save the report as JSON
    ///
    /// # Errors
    /// Returns an [`ExportError`] when the report cannot be serialized or
    /// written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let contents = self.to_json()?;
        fs::write(path, contents).map_err(|e| ExportError::SaveFailed(e.to_string()))
    }

    /// Load a previously saved report
    ///
    /// # Errors
    /// Returns an [`ExportError`] when the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ExportError::LoadFailed(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| ExportError::ParseFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::economics::DEFAULT_INVESTMENT_USD;

    fn sample_bundle() -> ReportBundle {
        ReportBundle::assemble(
            &FlowParameters::default(),
            0.85,
            DEFAULT_INVESTMENT_USD,
            &EmissionConfig::default(),
            &EconomicConfig::default(),
        )
    }

    #[test]
    fn test_bundle_is_internally_consistent() {
        let bundle = sample_bundle();
        assert!(bundle.proposed.emissions_total < bundle.current.emissions_total);
        assert_eq!(
            bundle.economics.gas_revenue_usd,
            bundle.proposed.recovery.unwrap().gas_revenue_usd
        );
    }

    #[test]
    fn test_json_round_trip() {
        let bundle = sample_bundle();
        let json = bundle.to_json().unwrap();
        let back: ReportBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(bundle, back);
    }

    #[test]
    fn test_save_load_round_trip() {
        let bundle = sample_bundle();
        let path = std::env::temp_dir().join("flare-recovery-report-test.json");
        bundle.save(&path).unwrap();
        let loaded = ReportBundle::load(&path).unwrap();
        assert_eq!(bundle, loaded);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = ReportBundle::load("/nonexistent/report.json").unwrap_err();
        assert!(matches!(err, ExportError::LoadFailed(_)));
    }
}
