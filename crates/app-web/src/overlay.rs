//! Status messaging around the globe: the staged "looking for you" copy and
//! the lookup details grid. All writes target fixed element ids provided by
//! the hosting page.

use crate::dom;
use app_core::GeoFix;
use web_sys as web;

pub const LOADING: &str = "🔍 Looking for you...";
pub const LOADING_SUB: &str = "Scanning the globe for your location";
pub const FOUND: &str = "🌍 More or less found you!";
pub const FOUND_SUB: &str = "Looks like we found your digital footprints...";
pub const PRECISE_LOCATION: &str = "🎯 More Precision!";
pub const PRECISE_LOCATION_LOADING: &str = "🕵️ Detective mode activated...";
pub const PRECISE_FOUND: &str = "👋 Knock knock! Found you!";
pub const PRECISE_FOUND_SUB: &str = "Wow, you're really there! No hiding now 😄";

pub const PRECISE_BUTTON_ID: &str = "precise-location";

pub fn show_searching(document: &web::Document) {
    dom::set_text(document, "status-title", LOADING);
    dom::set_text(document, "status-subtitle", LOADING_SUB);
}

pub fn show_approximate(document: &web::Document, fix: &GeoFix) {
    dom::set_text(document, "status-title", FOUND);
    dom::set_text(document, "status-subtitle", FOUND_SUB);
    show_coordinates(document, fix);
    if let Some(info) = &fix.lookup {
        dom::set_text(document, "location-country", &info.country);
        dom::set_text(document, "location-network", &info.organization);
        dom::set_text(
            document,
            "location-network-asn",
            &info
                .asn
                .map(|asn| format!("ASN: {asn}"))
                .unwrap_or_else(|| "ASN: Not available".to_string()),
        );
        dom::set_text(document, "location-timezone", &info.timezone);
        dom::set_text(document, "location-ip", &format!("IP: {}", info.ip));
    }
    set_button_state(document, PRECISE_LOCATION, false);
    if let Some(button) = document.get_element_by_id(PRECISE_BUTTON_ID) {
        let _ = button.remove_attribute("hidden");
    }
}

pub fn show_precise(document: &web::Document, fix: &GeoFix) {
    dom::set_text(document, "status-title", PRECISE_FOUND);
    dom::set_text(document, "status-subtitle", PRECISE_FOUND_SUB);
    show_coordinates(document, fix);
    // Wholesale replacement: the lookup grid no longer applies.
    dom::set_text(document, "location-country", "");
    dom::set_text(document, "location-network", "");
    dom::set_text(document, "location-network-asn", "");
    dom::set_text(document, "location-timezone", "");
    dom::set_text(document, "location-ip", "");
    if let Some(link) = document.get_element_by_id("maps-link") {
        let _ = link.set_attribute(
            "href",
            &format!("https://www.google.com/maps?q={},{}", fix.lat, fix.long),
        );
        let _ = link.remove_attribute("hidden");
    }
    if let Some(button) = document.get_element_by_id(PRECISE_BUTTON_ID) {
        let _ = button.set_attribute("hidden", "");
    }
}

pub fn show_precise_loading(document: &web::Document) {
    set_button_state(document, PRECISE_LOCATION_LOADING, true);
}

pub fn clear_precise_loading(document: &web::Document) {
    set_button_state(document, PRECISE_LOCATION, false);
}

fn show_coordinates(document: &web::Document, fix: &GeoFix) {
    dom::set_text(
        document,
        "location-coords",
        &format!("{:.3}°, {:.3}°", fix.lat, fix.long),
    );
}

fn set_button_state(document: &web::Document, label: &str, disabled: bool) {
    if let Some(button) = document.get_element_by_id(PRECISE_BUTTON_ID) {
        button.set_text_content(Some(label));
        if disabled {
            let _ = button.set_attribute("disabled", "");
        } else {
            let _ = button.remove_attribute("disabled");
        }
    }
}
