//! Server-rendered HTML for the three demo pages.

use crate::params::{MultipleParams, SimpleParams, TimeSeriesParams};
use crate::render::MetricRow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Demo {
    Simple,
    Multiple,
    TimeSeries,
}

impl Demo {
    pub const ALL: [Demo; 3] = [Demo::Simple, Demo::Multiple, Demo::TimeSeries];

    pub fn path(self) -> &'static str {
        match self {
            Demo::Simple => "/simple",
            Demo::Multiple => "/multiple",
            Demo::TimeSeries => "/timeseries",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Demo::Simple => "Simple Linear Regression with CRISP-DM",
            Demo::Multiple => "Multiple Linear Regression with Feature Selection",
            Demo::TimeSeries => "Autoregressive Time Series with CRISP-DM",
        }
    }

    fn crisp_dm_steps(self) -> [(&'static str, &'static str); 6] {
        match self {
            Demo::Simple => [
                ("Business Understanding", "See how slope, noise and sample size change what a simple linear regression can recover."),
                ("Data Understanding", "Points are synthetic; the underlying true model is y = a·x + 5."),
                ("Data Preparation", "x is drawn uniformly from [0, 10) and Gaussian noise is added to each y."),
                ("Modeling", "Ordinary least squares is fitted to the (x, y) points."),
                ("Evaluation", "The chart compares the data, the true line and the fitted line; the table lists the learned coefficients, R², MSE and MAE."),
                ("Deployment", "This page is the deployed model: change a parameter and everything is recomputed."),
            ],
            Demo::Multiple => [
                ("Business Understanding", "Explore how many features a linear model really needs."),
                ("Data Understanding", "Each feature is uniform on [0, 10); the target is 2·x1 + 4·x2 + 6·x3 + … + 5 plus noise."),
                ("Data Preparation", "A feature matrix and noisy target are generated from the chosen parameters."),
                ("Modeling", "Ordinary least squares on all features, or on the subset kept by recursive feature elimination."),
                ("Evaluation", "Predicted vs actual targets, R², MSE, MAE and the learned coefficients next to the true ones."),
                ("Deployment", "This page is the deployed model: change a parameter and everything is recomputed."),
            ],
            Demo::TimeSeries => [
                ("Business Understanding", "Forecast a series whose values depend on their own recent past."),
                ("Data Understanding", "The series follows v(t) = 0.6·v(t−1) − 0.3·v(t−2) + noise, started from zero."),
                ("Data Preparation", "The series is generated and checked for stationarity with the Augmented Dickey-Fuller test."),
                ("Modeling", "An AR(p) model is fitted by least squares on the lagged values."),
                ("Evaluation", "The chart shows the observed series, the in-sample fit and the forecast; the tables list coefficients, fit metrics, the ADF result and the autocorrelations."),
                ("Deployment", "This page is the deployed model: change a parameter and everything is recomputed."),
            ],
        }
    }
}

pub enum FieldKind {
    Number { step: &'static str },
    Checkbox,
}

pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

fn number(name: &'static str, label: &'static str, step: &'static str, value: impl ToString) -> Field {
    Field {
        name,
        label,
        kind: FieldKind::Number { step },
        value: value.to_string(),
    }
}

fn seed_field(seed: Option<u64>) -> Field {
    number("seed", "Seed", "1", seed.map(|s| s.to_string()).unwrap_or_default())
}

pub fn simple_fields(p: &SimpleParams) -> Vec<Field> {
    vec![
        number("true_slope", "Slope (a)", "0.1", p.true_slope),
        number("noise_scale", "Noise", "0.1", p.noise_scale),
        number("sample_count", "Number of Points", "10", p.sample_count),
        seed_field(p.seed),
    ]
}

pub fn multiple_fields(p: &MultipleParams) -> Vec<Field> {
    vec![
        number("noise_scale", "Noise", "0.1", p.noise_scale),
        number("sample_count", "Number of Points", "10", p.sample_count),
        number("feature_count", "Number of Features", "1", p.feature_count),
        Field {
            name: "use_feature_selection",
            label: "Use Feature Selection (RFE)",
            kind: FieldKind::Checkbox,
            value: p.use_feature_selection.to_string(),
        },
        number("features_to_keep", "Features to Keep", "1", p.features_to_keep),
        seed_field(p.seed),
    ]
}

pub fn timeseries_fields(p: &TimeSeriesParams) -> Vec<Field> {
    vec![
        number("noise_scale", "Noise", "0.1", p.noise_scale),
        number("sample_count", "Number of Points", "10", p.sample_count),
        number("ar_lag_count", "AR Lags (p)", "1", p.ar_lag_count),
        number("forecast_horizon", "Forecast Steps", "1", p.forecast_horizon),
        seed_field(p.seed),
    ]
}

/// What the results column shows: a chart with tables, or a warning.
pub enum Outcome {
    Rendered {
        svg: String,
        tables: Vec<(&'static str, Vec<MetricRow>)>,
    },
    Failed {
        message: String,
    },
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;margin:0;color:#222}\
header{background:#1f4e79;color:#fff;padding:12px 24px}header a{color:#fff;margin-right:16px}\
main{display:flex;gap:24px;padding:24px}\
.sidebar{min-width:220px}.sidebar label{display:block;margin-top:10px}\
.sidebar input[type=number]{width:100%}\
.col{flex:1}\
table{border-collapse:collapse;margin-top:12px}td{border:1px solid #ccc;padding:4px 10px}\
td.v{text-align:right;font-family:monospace}\
.warning{background:#fff3cd;border:1px solid #e0b84c;padding:12px;border-radius:4px}";

fn nav() -> String {
    let links = Demo::ALL
        .iter()
        .map(|d| format!("<a href=\"{}\">{}</a>", d.path(), escape(d.title())))
        .collect::<String>();
    format!("<header><a href=\"/\"><b>crispml</b></a>{}</header>", links)
}

fn form(demo: Demo, fields: &[Field]) -> String {
    let inputs = fields
        .iter()
        .map(|f| match f.kind {
            FieldKind::Number { step } => format!(
                "<label>{label}<input type=\"number\" name=\"{name}\" step=\"{step}\" value=\"{value}\"></label>",
                label = escape(f.label),
                name = f.name,
                step = step,
                value = escape(&f.value),
            ),
            FieldKind::Checkbox => format!(
                "<label><input type=\"checkbox\" name=\"{name}\"{checked}> {label}</label>",
                label = escape(f.label),
                name = f.name,
                checked = if f.value == "true" { " checked" } else { "" },
            ),
        })
        .collect::<String>();

    format!(
        "<form method=\"get\" action=\"{}\"><h2>Controls</h2>{}<p><button type=\"submit\">Run</button></p></form>",
        demo.path(),
        inputs
    )
}

fn table(title: &str, rows: &[MetricRow]) -> String {
    let body = rows
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><td>{}</td><td class=\"v\">{}</td></tr>",
                escape(label),
                escape(value)
            )
        })
        .collect::<String>();
    format!("<h3>{}</h3><table>{}</table>", escape(title), body)
}

pub fn demo_page(demo: Demo, fields: &[Field], outcome: &Outcome) -> String {
    let steps = demo
        .crisp_dm_steps()
        .iter()
        .map(|(name, text)| format!("<li><b>{}:</b> {}</li>", name, escape(text)))
        .collect::<String>();

    let results = match outcome {
        Outcome::Rendered { svg, tables } => {
            let tables = tables
                .iter()
                .map(|(title, rows)| table(title, rows))
                .collect::<String>();
            format!("{}{}", svg, tables)
        }
        Outcome::Failed { message } => {
            format!("<div class=\"warning\">{}</div>", escape(message))
        }
    };

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title><style>{style}</style></head>\
<body>{nav}<main><aside class=\"sidebar\">{form}</aside>\
<section class=\"col\"><h1>{title}</h1><h2>CRISP-DM Steps</h2><ol>{steps}</ol></section>\
<section class=\"col\"><h2>Results</h2>{results}</section></main></body></html>",
        title = escape(demo.title()),
        style = STYLE,
        nav = nav(),
        form = form(demo, fields),
        steps = steps,
        results = results,
    )
}

pub fn index_page() -> String {
    let items = Demo::ALL
        .iter()
        .map(|d| format!("<li><a href=\"{}\">{}</a></li>", d.path(), escape(d.title())))
        .collect::<String>();
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>crispml</title><style>{}</style></head>\
<body>{}<main><section class=\"col\"><h1>CRISP-DM regression demos</h1><ul>{}</ul></section></main></body></html>",
        STYLE,
        nav(),
        items
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_warning_page_has_no_chart() {
        let html = demo_page(
            Demo::Simple,
            &simple_fields(&SimpleParams::default()),
            &Outcome::Failed {
                message: "Invalid parameter 'sample_count': must be between 1 and 100000, got 0".to_string(),
            },
        );
        assert!(html.contains("class=\"warning\""));
        assert!(!html.contains("<svg"));
        assert!(html.contains("name=\"true_slope\""));
    }

    #[test]
    fn test_checkbox_state() {
        let params = MultipleParams {
            use_feature_selection: true,
            ..MultipleParams::default()
        };
        let html = form(Demo::Multiple, &multiple_fields(&params));
        assert!(html.contains("name=\"use_feature_selection\" checked"));
    }
}
