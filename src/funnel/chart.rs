//! Plotly rendering of a [`FunnelReport`] as an embeddable HTML fragment.
//!
//! Each level gets two stacked horizontal bars: a transparent spacer as wide as
//! the row's offset, then the visible headcount bar. With the spacer the bars
//! look centered in a fixed-width row.

use serde::Serialize;
use uuid::Uuid;

use crate::funnel::{
    report::FunnelReport,
    repo_types::JobLevel,
};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TOP_COLOR: &str = "#4caf50";
const LEVEL_COLOR: &str = "#607d8b";
const TRANSPARENT: &str = "rgba(0,0,0,0)";
const FONT_FAMILY: &str = "'Inter','Montserrat',sans-serif";
const HEIGHT: u32 = 450;

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Color {
    Single(&'static str),
    PerBar(Vec<&'static str>),
}

#[derive(Debug, Serialize)]
struct Marker {
    color: Color,
}

#[derive(Debug, Serialize)]
struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    family: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    size: u32,
}

#[derive(Debug, Serialize)]
struct BarTrace {
    #[serde(rename = "type")]
    kind: &'static str,
    orientation: &'static str,
    y: Vec<&'static str>,
    x: Vec<f64>,
    marker: Marker,
    showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    textposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    textfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hoverinfo: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hovertemplate: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Title {
    text: String,
}

#[derive(Debug, Serialize)]
struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    autorange: Option<&'static str>,
    showgrid: bool,
}

#[derive(Debug, Serialize)]
struct Margin {
    l: u32,
    r: u32,
    t: u32,
    b: u32,
}

#[derive(Debug, Serialize)]
struct Layout {
    title: Title,
    barmode: &'static str,
    xaxis: Axis,
    yaxis: Axis,
    height: u32,
    margin: Margin,
    font: Font,
    plot_bgcolor: &'static str,
    paper_bgcolor: &'static str,
    showlegend: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlotConfig {
    display_mode_bar: bool,
    responsive: bool,
}

fn traces(report: &FunnelReport) -> [BarTrace; 2] {
    let levels: Vec<&'static str> = report.rows.iter().map(|r| r.level.label()).collect();

    let spacer = BarTrace {
        kind: "bar",
        orientation: "h",
        y: levels.clone(),
        x: report.rows.iter().map(|r| r.offset).collect(),
        marker: Marker {
            color: Color::Single(TRANSPARENT),
        },
        showlegend: false,
        text: None,
        textposition: None,
        textfont: None,
        hoverinfo: Some("skip"),
        hovertemplate: None,
    };

    let headcount = BarTrace {
        kind: "bar",
        orientation: "h",
        y: levels,
        x: report.rows.iter().map(|r| r.count as f64).collect(),
        marker: Marker {
            color: Color::PerBar(
                report
                    .rows
                    .iter()
                    .map(|r| bar_color(r.level))
                    .collect(),
            ),
        },
        showlegend: false,
        text: Some(report.rows.iter().map(|r| r.label()).collect()),
        textposition: Some("inside"),
        textfont: Some(Font {
            family: None,
            color: Some("white"),
            size: 12,
        }),
        hoverinfo: None,
        hovertemplate: Some("<b>%{y}</b><br>Headcount: %{x}<extra></extra>"),
    };

    [spacer, headcount]
}

fn bar_color(level: JobLevel) -> &'static str {
    match level {
        JobLevel::CSuite => TOP_COLOR,
        _ => LEVEL_COLOR,
    }
}

fn layout(report: &FunnelReport) -> Layout {
    Layout {
        title: Title {
            text: format!("Organizational Levels - {}", report.company),
        },
        barmode: "stack",
        xaxis: Axis {
            showticklabels: Some(false),
            autorange: None,
            showgrid: false,
        },
        // First row (C-Suite) at the top.
        yaxis: Axis {
            showticklabels: None,
            autorange: Some("reversed"),
            showgrid: false,
        },
        height: HEIGHT,
        margin: Margin {
            l: 120,
            r: 50,
            t: 80,
            b: 50,
        },
        font: Font {
            family: Some(FONT_FAMILY),
            color: None,
            size: 13,
        },
        plot_bgcolor: TRANSPARENT,
        paper_bgcolor: TRANSPARENT,
        showlegend: false,
    }
}

/// Serializes for a `<script>` body: `<`, `>` and `&` only occur inside JSON
/// strings, where their `\u` escapes mean the same thing to the browser.
fn script_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

pub fn render_chart(report: &FunnelReport) -> Result<String, serde_json::Error> {
    let div_id = Uuid::new_v4();
    let data = script_json(&traces(report))?;
    let layout = script_json(&layout(report))?;
    let config = script_json(&PlotConfig {
        display_mode_bar: false,
        responsive: true,
    })?;

    Ok(format!(
        r#"<div>
    <script charset="utf-8" src="{PLOTLY_CDN}"></script>
    <div id="{div_id}" class="plotly-graph-div" style="height:{HEIGHT}px; width:100%;"></div>
    <script type="text/javascript">
        if (document.getElementById("{div_id}")) {{
            Plotly.newPlot("{div_id}", {data}, {layout}, {config});
        }}
    </script>
</div>"#
    ))
}

pub fn render_placeholder(message: &str) -> String {
    format!(
        "<div style='padding:20px;text-align:center;font-family:Inter,sans-serif'><h3>{}</h3></div>",
        escape_html(message)
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
