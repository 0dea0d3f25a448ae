//! DOM side of the agent: the owned `<style>` element and the legacy link.

use livestyle_core::{LegacyLink, StyleSink};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlStyleElement};

use crate::MountError;

/// Attribute marking the style element this agent owns.
pub const STYLE_MARKER: &str = "data-livestyle";

/// Selector for the page's original stylesheet.
pub const LEGACY_LINK_SELECTOR: &str = r#"link[rel="stylesheet"]"#;

/// The `<style>` element payloads are written into.
pub struct WebStyleSink {
    element: HtmlStyleElement,
}

impl WebStyleSink {
    /// Reuse the `<style>` a previous mount left in `document.head`, or
    /// create an empty one and append it.
    pub fn install(document: &Document) -> Result<Self, MountError> {
        let head = document.head().ok_or(MountError::NoHead)?;

        let existing = document
            .query_selector(&format!("head > style[{STYLE_MARKER}]"))
            .map_err(MountError::dom)?;
        if let Some(existing) = existing {
            let element = existing
                .dyn_into::<HtmlStyleElement>()
                .map_err(|_| MountError::Dom("marked element is not a <style>".to_string()))?;
            return Ok(Self { element });
        }

        let element = document
            .create_element("style")
            .map_err(MountError::dom)?
            .dyn_into::<HtmlStyleElement>()
            .map_err(|_| MountError::Dom("created element is not a <style>".to_string()))?;
        element
            .set_attribute(STYLE_MARKER, "")
            .map_err(MountError::dom)?;

        head.append_child(&element).map_err(MountError::dom)?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &HtmlStyleElement {
        &self.element
    }
}

impl StyleSink for WebStyleSink {
    fn replace(&self, css: &str) {
        self.element.set_text_content(Some(css));
    }
}

/// The first `<link rel="stylesheet">` found at mount time.
pub struct WebLegacyLink {
    element: Element,
}

impl WebLegacyLink {
    /// `Ok(None)` when the page has no stylesheet link.
    pub fn find(document: &Document) -> Result<Option<Self>, MountError> {
        let element = document
            .query_selector(LEGACY_LINK_SELECTOR)
            .map_err(MountError::dom)?;
        Ok(element.map(|element| Self { element }))
    }
}

impl LegacyLink for WebLegacyLink {
    fn detach(self) {
        self.element.remove();
    }
}
