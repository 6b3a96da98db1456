//! Contact and location extraction from rendered listing pages.
//!
//! Contact links come from the DOM in document order, with later anchors
//! overwriting earlier ones. Address and map link come from the embedded
//! schema.org graph (`<script id="schema-org-graph" type="application/ld+json">`).

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::DetailRecord;

const MAILTO_PREFIX: &str = "mailto:";
const WHATSAPP_PREFIX: &str = "https://wa.me/";
const INSTAGRAM_PREFIX: &str = "https://www.instagram.com/";
const LODGING_TYPE: &str = "Hotel";

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

static GRAPH_SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script#schema-org-graph[type="application/ld+json"]"#)
        .expect("valid selector")
});

/// Address fields taken from the first lodging node of a schema.org graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLocation {
    pub street_address: Option<String>,
    pub has_map: Option<String>,
}

/// Build a [`DetailRecord`] from a rendered page.
///
/// When the page carries no graph script, `address` and `map_url` stay empty
/// and no HTML-only address inference is attempted.
///
/// # Errors
///
/// Returns [`ScraperError::Deserialize`] if the graph script is present but is
/// not valid JSON.
pub fn extract_detail(
    title: Option<String>,
    url: &str,
    html: &str,
) -> Result<DetailRecord, ScraperError> {
    let document = Html::parse_document(html);

    let mut record = DetailRecord {
        title,
        url: url.to_owned(),
        ..DetailRecord::default()
    };

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(email) = href.strip_prefix(MAILTO_PREFIX) {
            record.email = Some(email.to_owned());
        } else if let Some(number) = href.strip_prefix(WHATSAPP_PREFIX) {
            record.whatsapp = Some(number.to_owned());
        } else if href.starts_with(INSTAGRAM_PREFIX) {
            record.instagram = Some(href.to_owned());
        }
    }

    let Some(script) = document.select(&GRAPH_SCRIPT_SELECTOR).next() else {
        return Ok(record);
    };

    let raw = script.text().collect::<String>();
    let document = parse_graph_document(&raw, url)?;
    let location = extract_json_graph(&document);
    record.address = location.street_address;
    record.map_url = location.has_map;

    Ok(record)
}

/// Parse the graph script body, decoding a second time when the payload is a
/// JSON string that itself holds the document.
fn parse_graph_document(raw: &str, url: &str) -> Result<Value, ScraperError> {
    let parse = |text: &str| {
        serde_json::from_str::<Value>(text).map_err(|source| ScraperError::Deserialize {
            context: format!("schema-org graph on {url}"),
            source,
        })
    };

    match parse(raw)? {
        Value::String(inner) => parse(&inner),
        value => Ok(value),
    }
}

/// Find the first `@graph` node typed `Hotel` that carries an `address`.
///
/// `@type` may be a string or an array. The street address is read only from
/// a `PostalAddress` object's `streetAddress`; a plain-string `address` still
/// selects the node but leaves the field empty. `hasMap` may be a URL string
/// or an object with a `url` field.
#[must_use]
pub fn extract_json_graph(document: &Value) -> GraphLocation {
    let Some(nodes) = document.get("@graph").and_then(Value::as_array) else {
        return GraphLocation::default();
    };

    let Some(node) = nodes
        .iter()
        .find(|node| is_lodging(node) && node.get("address").is_some())
    else {
        return GraphLocation::default();
    };

    let street_address = node
        .get("address")
        .filter(|address| address.is_object())
        .and_then(|address| address.get("streetAddress"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let has_map = node.get("hasMap").and_then(|map| match map {
        Value::String(s) => Some(s.clone()),
        other => other.get("url").and_then(Value::as_str).map(str::to_string),
    });

    GraphLocation {
        street_address,
        has_map,
    }
}

fn is_lodging(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(s)) => s == LODGING_TYPE,
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t == LODGING_TYPE),
        _ => false,
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
