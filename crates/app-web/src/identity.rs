//! Human-readable visitor identity, persisted under one localStorage key.
//!
//! Pure affordance: if storage is unavailable the identity simply lives for
//! the session. The stored value is rewritten opportunistically on tab
//! visibility change, window blur, and pagehide so a storage clear during
//! the session gets repaired.

use crate::dom;
use rand::prelude::*;
use web_sys as web;

const STORAGE_KEY: &str = "glasshouse-identity";

const ADJECTIVES: &[&str] = &[
    "amber", "brisk", "calm", "dapper", "eager", "fuzzy", "gentle", "hazy", "keen", "lucid",
    "mellow", "nimble", "quiet", "rustic", "sly", "tidy", "vivid", "wry",
];

const ANIMALS: &[&str] = &[
    "badger", "crane", "dormouse", "egret", "ferret", "gecko", "heron", "ibex", "jackdaw",
    "kestrel", "lynx", "marten", "newt", "otter", "plover", "stoat", "vole", "wren",
];

fn generate() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).unwrap_or(&"quiet");
    let animal = ANIMALS.choose(&mut rng).unwrap_or(&"otter");
    format!("{adjective}-{animal}-{:02}", rng.gen_range(0..100))
}

fn local_storage() -> Option<web::Storage> {
    web::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Read the stored identity or mint and store a new one.
pub fn ensure() -> String {
    let Some(storage) = local_storage() else {
        log::warn!("localStorage unavailable; identity is session-only");
        return generate();
    };
    if let Ok(Some(existing)) = storage.get_item(STORAGE_KEY) {
        if !existing.is_empty() {
            return existing;
        }
    }
    let fresh = generate();
    if storage.set_item(STORAGE_KEY, &fresh).is_err() {
        log::warn!("failed to persist identity");
    }
    fresh
}

/// Re-write the identity if the key went missing (storage cleared mid-session).
fn rewrite_if_cleared(identity: &str) {
    let Some(storage) = local_storage() else {
        return;
    };
    match storage.get_item(STORAGE_KEY) {
        Ok(Some(existing)) if !existing.is_empty() => {}
        _ => {
            if storage.set_item(STORAGE_KEY, identity).is_err() {
                log::warn!("failed to re-persist identity");
            }
        }
    }
}

/// Display the identity and keep it persisted across the usual lifecycle
/// edges of a tab.
pub fn install(document: &web::Document) {
    let identity = ensure();
    dom::set_text(document, "visitor-identity", &identity);

    for event in ["visibilitychange", "blur", "pagehide"] {
        let id = identity.clone();
        if event == "visibilitychange" {
            dom::add_document_listener(event, move || rewrite_if_cleared(&id));
        } else {
            dom::add_window_listener(event, move || rewrite_if_cleared(&id));
        }
    }
}
