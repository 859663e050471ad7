use super::{Report, Stats};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Output formats accepted by `save_with_format`
pub const OUTPUT_FORMATS: &[&str] = &["report", "summary"];

/// Stats and phrase partition only, without match details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub stats: Stats,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

impl Report {
    pub fn to_summary(&self) -> ReportSummary {
        ReportSummary {
            stats: self.stats.clone(),
            found: self.found.clone(),
            missing: self.missing.clone(),
        }
    }

    pub fn to_json_with_format(&self, format: &str) -> Result<String> {
        let json = match format {
            "report" => serde_json::to_string_pretty(self)?,
            "summary" => serde_json::to_string_pretty(&self.to_summary())?,
            other => bail!(
                "unknown output format '{other}' (expected one of: {})",
                OUTPUT_FORMATS.join(", ")
            ),
        };
        Ok(json)
    }

    pub fn save_with_format(&self, path: &str, format: &str) -> Result<()> {
        let json = self.to_json_with_format(format)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
