//! Grouping Index - KPI group name to the KPIs it contains

use crate::loader::KpiTable;
use itertools::Itertools;
use std::collections::HashMap;

/// Read-only mapping from group label to KPI names.
/// Groups keep first-seen order, KPIs keep table order.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    order: Vec<String>,
    members: HashMap<String, Vec<String>>,
}

impl GroupIndex {
    pub fn build(table: &KpiTable) -> Self {
        let order: Vec<String> = table
            .records()
            .iter()
            .map(|r| r.group.clone())
            .unique()
            .collect();

        let mut members: HashMap<String, Vec<String>> = HashMap::new();
        for record in table.records() {
            members
                .entry(record.group.clone())
                .or_default()
                .push(record.kpi_name.clone());
        }

        Self { order, members }
    }

    pub fn groups(&self) -> &[String] {
        &self.order
    }

    /// KPIs of `group`; empty for an unknown group
    pub fn kpis_in(&self, group: &str) -> &[String] {
        self.members.get(group).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, group: &str) -> bool {
        self.members.contains_key(group)
    }

    pub fn first_group(&self) -> Option<&str> {
        self.order.first().map(|g| g.as_str())
    }
}
