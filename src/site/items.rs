//! Item display ID lookup.
//!
//! Resolves an item ID to the display ID the viewer needs by reading the
//! item's XML tooltip document:
//!
//! ```text
//! <wowhead><item id="19019"><icon displayId="30606">inv_sword_39</icon>...</item></wowhead>
//! ```
//!
//! One request per lookup; no caching, no retry.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ItemLookupConfig;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("item request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("item endpoint returned {0}")]
    Status(StatusCode),

    #[error("malformed item document: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

#[derive(Debug, Deserialize)]
struct ItemDocument {
    item: Option<ItemElement>,
}

#[derive(Debug, Deserialize)]
struct ItemElement {
    icon: Option<IconElement>,
}

#[derive(Debug, Deserialize)]
struct IconElement {
    #[serde(rename = "@displayId")]
    display_id: Option<String>,
}

/// Client for the XML item endpoint.
#[derive(Debug, Clone)]
pub struct ItemLookup {
    client: reqwest::Client,
    base_url: String,
}

impl ItemLookup {
    pub fn new(config: &ItemLookupConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.lookup_url.clone(),
        })
    }

    /// Fetch the display ID for `item_id`.
    pub async fn display_id(&self, item_id: i64) -> Result<String, LookupError> {
        let url = format!("{}?item={}&xml", self.base_url, item_id);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }
        let body = response.text().await?;
        let display_id = parse_display_id(&body)?;
        if display_id.is_empty() {
            tracing::debug!(item_id, "Item document has no display ID");
        }
        Ok(display_id)
    }
}

/// Empty when the document has no `item/icon@displayId`, e.g. an error page.
fn parse_display_id(xml: &str) -> Result<String, LookupError> {
    let document: ItemDocument = quick_xml::de::from_str(xml)?;
    Ok(document
        .item
        .and_then(|item| item.icon)
        .and_then(|icon| icon.display_id)
        .unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemParams {
    pub item: Option<String>,
}

/// `GET /item-lookup?item=<id>`
pub async fn item_lookup(
    State(state): State<AppState>,
    method: Method,
    Query(params): Query<ItemParams>,
) -> Response {
    if method != Method::GET {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let raw = match params.item.as_deref() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return (StatusCode::BAD_REQUEST, "item is required").into_response(),
    };
    let item_id: i64 = match raw.parse() {
        Ok(id) => id,
        Err(_) => return (StatusCode::BAD_REQUEST, "item must be a number").into_response(),
    };

    match state.items.display_id(item_id).await {
        Ok(display_id) => {
            metrics::record_item_lookup("ok");
            let body = serde_json::json!({ "displayId": display_id }).to_string();
            ([(CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(e) => {
            metrics::record_item_lookup("error");
            tracing::error!(item_id, error = %e, "Item lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching display ID").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wowhead>
  <item id="19019">
    <name><![CDATA[Thunderfury, Blessed Blade of the Windseeker]]></name>
    <level>80</level>
    <quality id="5">Legendary</quality>
    <class id="2"><![CDATA[Weapons]]></class>
    <subclass id="7"><![CDATA[One-Handed Swords]]></subclass>
    <icon displayId="30606">inv_sword_39</icon>
    <inventorySlot id="13">One-Hand</inventorySlot>
    <link>https://www.wowhead.com/item=19019</link>
  </item>
</wowhead>"#;

    #[test]
    fn reads_display_id_attribute() {
        assert_eq!(parse_display_id(SWORD).unwrap(), "30606");
    }

    #[test]
    fn error_document_yields_empty_display_id() {
        let xml = "<wowhead><error>Item not found!</error></wowhead>";
        assert_eq!(parse_display_id(xml).unwrap(), "");

        let no_icon = r#"<wowhead><item id="1"><name>Rock</name></item></wowhead>"#;
        assert_eq!(parse_display_id(no_icon).unwrap(), "");
    }

    #[test]
    fn html_is_rejected() {
        assert!(parse_display_id("<html><body>oops").is_err());
    }
}
