//! HTML rendering
//!
//! Turns a dashboard session into the single page served to the browser,
//! using a minijinja template compiled once at startup.

use minijinja::{context, Environment};
use serde::Serialize;

use super::{Background, Dashboard};
use crate::config::DashboardConfig;
use crate::inference::{Chip, PredictionOutcome};
use crate::model::{Label, ModelHandle};
use crate::sensor::SensorControl;
use crate::utils::error::Result;

const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE: &str = include_str!("../../templates/dashboard.html");

/// Results section of the page
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub summary: String,
    pub on_count: usize,
    pub off_count: usize,
    pub total: usize,
    pub progress_pct: String,
    pub chip_columns: Vec<Vec<Chip>>,
    pub raw: String,
}

impl ResultView {
    fn new(outcome: &PredictionOutcome, columns: usize) -> Self {
        Self {
            summary: outcome.summary(),
            on_count: outcome.on_count,
            off_count: outcome.off_count,
            total: outcome.total(),
            progress_pct: format!("{:.1}", outcome.progress() * 100.0),
            chip_columns: outcome.chip_columns(columns),
            raw: format_labels(outcome.raw_labels()),
        }
    }
}

/// Everything the template needs for one page
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: String,
    pub model_file: String,
    pub repository_url: String,
    pub author: String,
    pub background_css: String,
    pub columns: usize,
    pub slider_columns: Vec<Vec<SensorControl>>,
    pub model_error: Option<String>,
    pub notice: Option<String>,
    pub result: Option<ResultView>,
}

impl PageView {
    pub fn new(
        config: &DashboardConfig,
        background: &Background,
        dashboard: &Dashboard,
        model: &ModelHandle,
    ) -> Self {
        let columns = config.columns.max(1);

        let mut slider_columns = vec![Vec::new(); columns];
        for control in dashboard.panel().controls() {
            slider_columns[control.index % columns].push(control.clone());
        }

        Self {
            title: config.page_title.clone(),
            model_file: config.model_file_name(),
            repository_url: config.repository_url.clone(),
            author: config.author.clone(),
            background_css: background.css(),
            columns,
            slider_columns,
            model_error: model.load_error().map(|e| e.to_string()),
            notice: None,
            result: dashboard
                .state()
                .outcome()
                .map(|o| ResultView::new(o, columns)),
        }
    }

    /// Attach a request-level message (e.g. an aborted prediction)
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Compiled page template
pub struct PageRenderer {
    env: Environment<'static>,
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer")
            .field("template", &TEMPLATE_NAME)
            .finish_non_exhaustive()
    }
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &PageView) -> Result<String> {
        let tmpl = self.env.get_template(TEMPLATE_NAME)?;
        let html = tmpl.render(context!(
            title => &view.title,
            model_file => &view.model_file,
            repository_url => &view.repository_url,
            author => &view.author,
            background_css => &view.background_css,
            columns => view.columns,
            slider_columns => &view.slider_columns,
            model_error => &view.model_error,
            notice => &view.notice,
            result => &view.result
        ))?;
        Ok(html)
    }
}

/// `[1, 0, 1]` for whole labels, `[0.5, 2]` keeps fractions
fn format_labels(labels: &[Label]) -> String {
    let parts: Vec<String> = labels
        .iter()
        .map(|&l| {
            if l.fract() == 0.0 && l.is_finite() {
                format!("{}", l as i64)
            } else {
                format!("{}", l)
            }
        })
        .collect();
    format!("[{}]", parts.join(", "))
}
