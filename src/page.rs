//! Dashboard page
//!
//! One self-contained HTML document: inline CSS for the light/dark themes, the
//! logo as an inline data URI, and a small script that posts UI events to
//! `/api/event` and hands the returned chart to Plotly.js.

use crate::error::{DashboardError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

pub const PAGE_TITLE: &str = "KPI Dashboard";
pub const HEADING: &str = "KPI Visualisation Dashboard";

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Logo image, base64 encoded once at startup
#[derive(Debug, Clone)]
pub struct Logo {
    mime: &'static str,
    encoded: String,
}

impl Logo {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DashboardError::MissingAsset(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes, mime_for(path)))
    }

    pub fn from_bytes(bytes: &[u8], mime: &'static str) -> Self {
        Self {
            mime,
            encoded: STANDARD.encode(bytes),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.encoded)
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Render the full dashboard document
pub fn render_page(logo: &Logo) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
    <script src="{plotly}"></script>
</head>
<body>
    <div id="main-container" class="light-mode">
        <button id="dark-mode-button" type="button">&#127769; Toggle Dark Mode</button>
        <div class="logo-bar">
            <img src="{logo}" alt="logo">
        </div>
        <h1 id="main-title">{heading}</h1>

        <label class="dropdown-label" for="group-dropdown">Choose a KPI-group:</label>
        <select id="group-dropdown" class="dropdown"></select>

        <label class="dropdown-label" for="kpi-dropdown">Choose a KPI:</label>
        <select id="kpi-dropdown" class="dropdown"></select>

        <div id="chart-output"></div>
        <div id="chart-description"></div>
    </div>
    <script>{js}</script>
</body>
</html>"#,
        title = PAGE_TITLE,
        heading = HEADING,
        css = inline_css(),
        js = inline_javascript(),
        plotly = PLOTLY_CDN,
        logo = logo.data_uri(),
    )
}

fn inline_css() -> &'static str {
    r#"
body { margin: 0; font-family: "Segoe UI", Arial, sans-serif; }
#main-container { min-height: 100vh; padding: 20px 40px; box-sizing: border-box; position: relative; }
#dark-mode-button {
    position: absolute; top: 20px; left: 20px; padding: 10px 20px; font-size: 16px;
    border-radius: 8px; border: none; cursor: pointer; background-color: #ddd; z-index: 999;
}
.logo-bar { display: flex; justify-content: flex-end; align-items: center; }
.logo-bar img { height: 80px; }
.dropdown-label { display: block; margin-top: 16px; font-weight: 600; }
.dropdown { width: 100%; max-width: 480px; padding: 6px; margin-top: 4px; font-size: 15px; }
#chart-output { margin-top: 20px; min-height: 450px; }
#chart-description {
    margin-top: 20px; font-size: 16px; padding: 10px; background-color: #f2f2f2;
    border-radius: 8px; color: #000;
}
.light-mode { background-color: #ffffff; color: #222; }
.dark-mode { background-color: #1e1e1e; color: #eee; }
.dark-mode .dropdown { background-color: #2d2d2d; color: #eee; border: 1px solid #555; }
.dark-mode #dark-mode-button { background-color: #444; color: #eee; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
(function () {
    let state = { group: null, kpi: null, dark_mode: false };
    const groupSelect = document.getElementById('group-dropdown');
    const kpiSelect = document.getElementById('kpi-dropdown');
    const container = document.getElementById('main-container');

    function fillOptions(select, options, value) {
        select.innerHTML = '';
        for (const name of options) {
            const option = document.createElement('option');
            option.value = name;
            option.textContent = name;
            select.appendChild(option);
        }
        select.value = value === null ? '' : value;
    }

    function toPlotly(figure) {
        if (!figure.bars) {
            return { data: [], layout: {} };
        }
        const l = figure.layout;
        const refs = figure.reference_lines;
        return {
            data: [{
                type: 'bar',
                x: figure.bars.categories,
                y: figure.bars.values,
                marker: { color: figure.bars.colors }
            }],
            layout: {
                title: { text: l.title.text, font: { size: l.title.font_size, color: l.title.color } },
                xaxis: { title: { text: l.x_axis.title }, showgrid: l.x_axis.show_grid },
                yaxis: {
                    title: { text: l.y_axis.title },
                    showgrid: l.y_axis.show_grid,
                    gridcolor: l.y_axis.grid_color,
                    zeroline: l.y_axis.zero_line,
                    tickformat: l.y_axis.tick_format
                },
                plot_bgcolor: l.plot_background,
                paper_bgcolor: l.paper_background,
                margin: l.margin,
                transition: { duration: l.transition_ms },
                shapes: refs.map(r => ({
                    type: 'line', x0: r.x0, x1: r.x1, y0: r.y, y1: r.y,
                    line: { color: r.color, width: r.width, dash: r.dash }
                })),
                annotations: refs.map(r => ({
                    x: r.label_x, y: r.y, text: r.label, showarrow: false,
                    yshift: r.label_y_shift, font: { color: r.color, size: r.label_font_size }
                }))
            }
        };
    }

    function renderChart(chart) {
        const fig = toPlotly(chart.figure);
        Plotly.react('chart-output', fig.data, fig.layout);
        document.getElementById('chart-description').textContent = chart.description;
    }

    function applyView(view) {
        switch (view.type) {
            case 'kpi_options':
                fillOptions(kpiSelect, view.options, view.value);
                renderChart(view.chart);
                break;
            case 'chart':
                renderChart(view);
                break;
            case 'theme':
                container.className = view.class_name;
                break;
        }
    }

    async function send(event) {
        const response = await fetch('/api/event', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ state: state, event: event })
        });
        const transition = await response.json();
        state = transition.state;
        applyView(transition.view);
    }

    groupSelect.addEventListener('change', () =>
        send({ type: 'select_group', group: groupSelect.value || null }));
    kpiSelect.addEventListener('change', () =>
        send({ type: 'select_kpi', kpi: kpiSelect.value || null }));
    document.getElementById('dark-mode-button').addEventListener('click', () =>
        send({ type: 'toggle_dark_mode' }));

    fetch('/api/init')
        .then(r => r.json())
        .then(init => {
            state = init.state;
            fillOptions(groupSelect, init.groups, state.group);
            fillOptions(kpiSelect, init.kpi_options, state.kpi);
            container.className = init.theme;
            renderChart(init.chart);
        });
})();
"#
}
