//! Human-readable KPI descriptions shown under the chart

use crate::error::Result;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::Path;

pub const FALLBACK_DESCRIPTION: &str = "no description available for this KPI";

lazy_static! {
    static ref BUILTIN_DESCRIPTIONS: Vec<(&'static str, &'static str)> = vec![
        ("Total fuel (if any) [tons or kW]", "total fuel in tons used per year"),
        ("Total CO2 emissions [tons]", "total CO2 emission in kilograms per year"),
        ("Available seats [-]", "Available seats per year"),
        ("Available cargo [tons]", "Available cargo in tons per year"),
        ("CO2 emissions per ASK [kg]", "CO2 emissions per ASK in kilograms"),
        ("CO2 emissions per RSK [kg]", "CO2 emissions per RSK in kilograms"),
        (
            "Technical",
            "Feasibility score for technical feasibility. This score must be a minimum of 6 to be sufficient",
        ),
        (
            "Regulatory",
            "Feasibility score for regulatory feasibility. This score must be a minimum of 6 to be sufficient",
        ),
        (
            "Safety",
            "Feasibility score for safety feasibility. This score must be a minimum of 6 to be sufficient",
        ),
        ("Total cost [€]", "Total costs in euros per year"),
        ("Revenue [€]", "total revenue in euros per year"),
        (
            "Profit [% w.r.t. total cost]",
            "The total profit that is made in a percentage of the total costs",
        ),
    ];
}

/// KPI name to description. Keys are stored trimmed.
#[derive(Debug, Clone)]
pub struct DescriptionTable {
    entries: HashMap<String, String>,
}

impl Default for DescriptionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DescriptionTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (name, text) in BUILTIN_DESCRIPTIONS.iter() {
            table.insert(*name, *text);
        }
        table
    }

    pub fn insert(&mut self, kpi_name: impl AsRef<str>, description: impl Into<String>) {
        self.entries
            .insert(kpi_name.as_ref().trim().to_string(), description.into());
    }

    /// Merge a JSON object of `{"KPI name": "description"}` over the current entries.
    /// Returns the number of entries read.
    pub fn merge_json(&mut self, json: &str) -> Result<usize> {
        let overrides: HashMap<String, String> = serde_json::from_str(json)?;
        let count = overrides.len();
        for (name, text) in overrides {
            self.insert(name, text);
        }
        Ok(count)
    }

    pub fn merge_json_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        self.merge_json(&content)
    }

    pub fn get(&self, kpi_name: &str) -> Option<&str> {
        self.entries.get(kpi_name.trim()).map(|s| s.as_str())
    }

    /// Exact match on the trimmed name, fallback text otherwise
    pub fn describe(&self, kpi_name: &str) -> &str {
        self.get(kpi_name).unwrap_or(FALLBACK_DESCRIPTION)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
