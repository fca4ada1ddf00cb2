//! Index page and the deliberate failure endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use crate::http::server::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html.tmpl");
const REGION_SLOT: &str = "{{region}}";

/// The embedded index template.
#[derive(Debug, Clone)]
pub struct IndexPage {
    template: &'static str,
    default_region: Option<String>,
}

impl IndexPage {
    pub fn new(default_region: Option<String>) -> Self {
        Self {
            template: INDEX_TEMPLATE,
            default_region,
        }
    }

    /// Render with `region`, falling back to the configured default.
    pub fn render(&self, region: Option<&str>) -> String {
        let region = region
            .filter(|r| !r.is_empty())
            .or(self.default_region.as_deref())
            .unwrap_or_default();
        self.template.replace(REGION_SLOT, &escape_html(region))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub region: Option<String>,
}

/// `GET /` and every path nothing else claims.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    Html(state.index.render(params.region.as_deref()))
}

/// `GET /broken`: always fails, for exercising the front end's error path.
pub async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "something terrible has happened")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
