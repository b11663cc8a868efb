//! Renders the capability snapshot into the DOM.
//!
//! Every group and every field is rendered unconditionally; unavailable
//! values arrive already carrying the sentinel text, so the panel never has
//! to special-case absence.

use app_core::CapabilitySnapshot;
use serde_json::Value;
use web_sys as web;

const PANEL_ID: &str = "capability-panel";

pub fn render(document: &web::Document, snapshot: &CapabilitySnapshot) {
    let Some(root) = document.get_element_by_id(PANEL_ID) else {
        log::warn!("missing #{PANEL_ID}; capability panel not rendered");
        return;
    };
    let value = match serde_json::to_value(snapshot) {
        Ok(v) => v,
        Err(err) => {
            log::error!("snapshot serialization failed: {err}");
            return;
        }
    };
    root.set_inner_html("");
    for group in CapabilitySnapshot::GROUPS {
        let Some(section) = build_section(document, group, &value[*group]) else {
            continue;
        };
        let _ = root.append_child(&section);
    }
}

fn build_section(document: &web::Document, name: &str, value: &Value) -> Option<web::Element> {
    let section = document.create_element("section").ok()?;
    section.set_class_name("capability-group");

    let heading = document.create_element("h3").ok()?;
    heading.set_text_content(Some(&prettify(name)));
    let _ = section.append_child(&heading);

    let list = document.create_element("dl").ok()?;
    match value {
        Value::Object(map) => {
            for (key, field) in map {
                append_row(document, &list, &prettify(key), &scalar_text(field));
            }
        }
        other => {
            append_row(document, &list, &prettify(name), &scalar_text(other));
        }
    }
    let _ = section.append_child(&list);
    Some(section)
}

fn append_row(document: &web::Document, list: &web::Element, label: &str, text: &str) {
    let Ok(dt) = document.create_element("dt") else {
        return;
    };
    dt.set_text_content(Some(label));
    let Ok(dd) = document.create_element("dd") else {
        return;
    };
    dd.set_text_content(Some(text));
    let _ = list.append_child(&dt);
    let _ = list.append_child(&dd);
}

/// Flatten a field for display. Nested objects become `key: value` pairs,
/// arrays a comma-joined list capped for readability.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "Not available".to_string(),
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            if items.is_empty() {
                return "None".to_string();
            }
            let mut parts: Vec<String> = items.iter().take(32).map(scalar_text).collect();
            if items.len() > 32 {
                parts.push(format!("… {} more", items.len() - 32));
            }
            parts.join(", ")
        }
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", prettify(k), scalar_text(v)))
            .collect::<Vec<_>>()
            .join(" · "),
    }
}

fn prettify(key: &str) -> String {
    key.replace('_', " ")
}
