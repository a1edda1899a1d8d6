//! Dashboard - the loaded data plus the event reducer driving the page
//!
//! `Dashboard` owns the KPI table, its group index and the description table.
//! It is built once at startup and shared read-only; every UI event is a pure
//! function of the session's current `SelectionState`.

use crate::chart::{ChartBuilder, ChartView};
use crate::config::DashboardConfig;
use crate::descriptions::DescriptionTable;
use crate::error::Result;
use crate::grouping::GroupIndex;
use crate::loader::{KpiTable, KpiTableLoader};
use crate::state::{SelectionState, ThemeClass, Transition, UiEvent, ViewUpdate};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Dashboard {
    table: KpiTable,
    index: GroupIndex,
    descriptions: DescriptionTable,
    default_group: Option<String>,
}

impl Dashboard {
    pub fn new(table: KpiTable, descriptions: DescriptionTable) -> Self {
        let index = GroupIndex::build(&table);
        Self {
            table,
            index,
            descriptions,
            default_group: None,
        }
    }

    /// Preferred initial group; ignored when the index does not know it
    pub fn with_default_group(mut self, group: Option<String>) -> Self {
        self.default_group = group;
        self
    }

    /// Load the KPI source and descriptions named by `config`
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let table = KpiTableLoader::new(config.sheet.clone()).load(&config.data_path)?;

        let mut descriptions = DescriptionTable::builtin();
        if let Some(path) = &config.descriptions_path {
            let merged = descriptions.merge_json_file(path)?;
            info!("Merged {} KPI descriptions from {}", merged, path.display());
        }

        let dashboard = Self::new(table, descriptions).with_default_group(config.default_group.clone());
        info!(
            "Dashboard ready: {} KPIs in {} groups",
            dashboard.table.len(),
            dashboard.index.groups().len()
        );
        Ok(dashboard)
    }

    pub fn table(&self) -> &KpiTable {
        &self.table
    }

    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    pub fn groups(&self) -> &[String] {
        self.index.groups()
    }

    pub fn kpi_options(&self, group: Option<&str>) -> &[String] {
        group.map(|g| self.index.kpis_in(g)).unwrap_or(&[])
    }

    pub fn chart(&self, kpi: Option<&str>) -> ChartView {
        ChartBuilder::new(&self.table, &self.descriptions).build(kpi)
    }

    /// First group (or the configured one), its first KPI, light mode
    pub fn initial_state(&self) -> SelectionState {
        let group = self
            .default_group
            .as_deref()
            .filter(|g| self.index.contains(g))
            .or_else(|| self.index.first_group())
            .map(|g| g.to_string());
        let kpi = self.kpi_options(group.as_deref()).first().cloned();

        SelectionState {
            group,
            kpi,
            dark_mode: false,
        }
    }

    pub fn apply(&self, state: &SelectionState, event: UiEvent) -> Transition {
        debug!("Applying {} event", event.kind());

        match event {
            UiEvent::SelectGroup { group } => {
                let options = self.kpi_options(group.as_deref()).to_vec();
                let value = options.first().cloned();
                let chart = self.chart(value.as_deref());
                Transition {
                    state: SelectionState {
                        group,
                        kpi: value.clone(),
                        dark_mode: state.dark_mode,
                    },
                    view: ViewUpdate::KpiOptions {
                        options,
                        value,
                        chart,
                    },
                }
            }
            UiEvent::SelectKpi { kpi } => {
                let ChartView {
                    figure,
                    description,
                } = self.chart(kpi.as_deref());
                Transition {
                    state: SelectionState {
                        kpi,
                        ..state.clone()
                    },
                    view: ViewUpdate::Chart {
                        figure,
                        description,
                    },
                }
            }
            UiEvent::ToggleDarkMode => {
                let dark_mode = !state.dark_mode;
                Transition {
                    state: SelectionState {
                        dark_mode,
                        ..state.clone()
                    },
                    view: ViewUpdate::Theme {
                        class_name: ThemeClass::from_flag(dark_mode),
                        dark_mode,
                    },
                }
            }
        }
    }
}
