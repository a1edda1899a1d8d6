//! Per-session UI selection state and the events that change it

use crate::chart::{ChartSpec, ChartView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub group: Option<String>,
    pub kpi: Option<String>,
    #[serde(default)]
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    SelectGroup {
        #[serde(default)]
        group: Option<String>,
    },
    SelectKpi {
        #[serde(default)]
        kpi: Option<String>,
    },
    ToggleDarkMode,
}

impl UiEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            UiEvent::SelectGroup { .. } => "select_group",
            UiEvent::SelectKpi { .. } => "select_kpi",
            UiEvent::ToggleDarkMode => "toggle_dark_mode",
        }
    }
}

/// CSS class applied to the page container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThemeClass {
    #[serde(rename = "light-mode")]
    Light,
    #[serde(rename = "dark-mode")]
    Dark,
}

impl ThemeClass {
    pub fn from_flag(dark_mode: bool) -> Self {
        if dark_mode {
            ThemeClass::Dark
        } else {
            ThemeClass::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeClass::Light => "light-mode",
            ThemeClass::Dark => "dark-mode",
        }
    }
}

/// What the page has to re-render after an event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewUpdate {
    /// New KPI options for the selected group, the default KPI and its chart
    KpiOptions {
        options: Vec<String>,
        value: Option<String>,
        chart: ChartView,
    },
    Chart {
        figure: ChartSpec,
        description: String,
    },
    Theme {
        class_name: ThemeClass,
        dark_mode: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub state: SelectionState,
    pub view: ViewUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event: UiEvent =
            serde_json::from_str(r#"{"type":"select_group","group":"Feasibility"}"#).unwrap();
        assert_eq!(
            event,
            UiEvent::SelectGroup {
                group: Some("Feasibility".to_string())
            }
        );

        let event: UiEvent = serde_json::from_str(r#"{"type":"select_kpi"}"#).unwrap();
        assert_eq!(event, UiEvent::SelectKpi { kpi: None });

        let event: UiEvent = serde_json::from_str(r#"{"type":"toggle_dark_mode"}"#).unwrap();
        assert_eq!(event.kind(), "toggle_dark_mode");
    }

    #[test]
    fn test_theme_class_names() {
        assert_eq!(ThemeClass::from_flag(true).as_str(), "dark-mode");
        assert_eq!(ThemeClass::from_flag(false).as_str(), "light-mode");
        assert_eq!(
            serde_json::to_string(&ThemeClass::Dark).unwrap(),
            r#""dark-mode""#
        );
    }

    #[test]
    fn test_state_defaults_to_light_mode() {
        let state: SelectionState = serde_json::from_str(r#"{"group":null,"kpi":null}"#).unwrap();
        assert!(!state.dark_mode);
    }
}
