//! Livestyle client - the agent injected into pages during development
//!
//! Connects to the development server over a WebSocket and writes every
//! stylesheet it pushes into a `<style>` element it owns. The page's own
//! `<link rel="stylesheet">` is removed once the first push lands.
//!
//! This crate is WASM-only.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use livestyle_core::{AgentConfig, LiveStyleAgent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub mod dom;
mod error;
pub mod socket;

pub use dom::{WebLegacyLink, WebStyleSink};
pub use error::MountError;
pub use socket::{WebConnection, WebSocketTransport};

/// The agent as assembled for a browser page.
pub type WebAgent = LiveStyleAgent<WebSocketTransport, WebStyleSink, WebLegacyLink>;

struct Mounted {
    agent: Rc<RefCell<WebAgent>>,
    interval: i32,
    _tick: Closure<dyn FnMut()>,
}

// WASM is single-threaded; the mounted agent lives here for the page's lifetime.
thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

static TRACING: Once = Once::new();

/// Mount the agent against the default endpoint (`ws://127.0.0.1:8080`).
#[wasm_bindgen]
pub fn mount_live_style() -> Result<(), JsValue> {
    mount(AgentConfig::default()).map_err(Into::into)
}

/// Mount the agent against `endpoint`, checking the connection every
/// `tick_interval_ms` milliseconds.
#[wasm_bindgen]
pub fn mount_live_style_with(endpoint: String, tick_interval_ms: u32) -> Result<(), JsValue> {
    let config = AgentConfig::new(endpoint, Duration::from_millis(tick_interval_ms.into()))
        .map_err(MountError::from)?;
    mount(config).map_err(Into::into)
}

/// Stop ticking and drop the agent along with its connections.
#[wasm_bindgen]
pub fn stop_live_style() {
    let Some(mounted) = MOUNTED.with(|cell| cell.borrow_mut().take()) else {
        return;
    };
    if let Some(window) = web_sys::window() {
        window.clear_interval_with_handle(mounted.interval);
    }
    tracing::info!("[livestyle] stopped");
}

/// Mount with an explicit configuration, replacing any agent already
/// mounted on this page.
pub fn mount(config: AgentConfig) -> Result<(), MountError> {
    TRACING.call_once(|| {
        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(tracing::Level::DEBUG)
                .build(),
        );
    });

    stop_live_style();

    let window = web_sys::window().ok_or(MountError::NoWindow)?;
    let document = window.document().ok_or(MountError::NoDocument)?;

    // Capture the link before our own <style> lands in <head>.
    let legacy_link = WebLegacyLink::find(&document)?;
    if legacy_link.is_none() {
        tracing::debug!("[livestyle] no stylesheet link on the page");
    }
    let sink = WebStyleSink::install(&document)?;

    let agent = Rc::new(RefCell::new(LiveStyleAgent::new(
        &config,
        WebSocketTransport,
        sink,
        legacy_link,
    )));

    // First tick right away; the interval takes over from there.
    agent.borrow_mut().tick();

    let tick = {
        let agent = Rc::clone(&agent);
        Closure::<dyn FnMut()>::new(move || match agent.try_borrow_mut() {
            Ok(mut agent) => {
                agent.tick();
            }
            Err(_) => tracing::warn!("[livestyle] tick overlapped, skipping"),
        })
    };

    let millis = i32::try_from(config.tick_interval().as_millis()).unwrap_or(i32::MAX);
    let interval = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            millis,
        )
        .map_err(MountError::dom)?;

    tracing::info!(
        "[livestyle] watching {} every {}ms",
        config.endpoint(),
        millis
    );

    MOUNTED.with(|cell| {
        *cell.borrow_mut() = Some(Mounted {
            agent,
            interval,
            _tick: tick,
        });
    });

    Ok(())
}

/// Run `f` against the mounted agent, if any.
pub fn with_agent<R>(f: impl FnOnce(&WebAgent) -> R) -> Option<R> {
    MOUNTED.with(|cell| {
        let mounted = cell.borrow();
        let mounted = mounted.as_ref()?;
        let agent = mounted.agent.try_borrow().ok()?;
        Some(f(&agent))
    })
}
