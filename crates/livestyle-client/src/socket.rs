//! WebSocket transport for the supervisor.

use js_sys::{ArrayBuffer, Uint8Array};
use livestyle_core::{Connection, ConnectionState, MessageHandler, Transport, TransportError};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{BinaryType, MessageEvent, WebSocket};

/// Opens browser WebSockets.
#[derive(Debug, Default)]
pub struct WebSocketTransport;

impl Transport for WebSocketTransport {
    type Connection = WebConnection;

    fn open(
        &mut self,
        endpoint: &str,
        on_message: MessageHandler,
    ) -> Result<WebConnection, TransportError> {
        let socket = WebSocket::new(endpoint).map_err(|e| {
            let name = e
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.name()));
            open_error(endpoint, name.as_deref(), format!("{e:?}"))
        })?;
        socket.set_binary_type(BinaryType::Arraybuffer);

        let hook = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match decode_payload(&event.data()) {
                Some(css) => on_message(&css),
                None => tracing::debug!("[livestyle] ignoring non-text message"),
            }
        });
        socket.set_onmessage(Some(hook.as_ref().unchecked_ref()));

        Ok(WebConnection {
            socket,
            _on_message: hook,
        })
    }
}

/// Classify a `WebSocket` constructor exception by its DOM error name.
///
/// The constructor throws `SyntaxError` for a malformed URL or a disallowed
/// scheme; anything else (a `SecurityError` for a blocked port, say) is a
/// refusal to open that a later tick may get past.
pub fn open_error(endpoint: &str, name: Option<&str>, reason: String) -> TransportError {
    match name {
        Some("SyntaxError") => TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        },
        _ => TransportError::Open(reason),
    }
}

/// One browser WebSocket and the message hook it calls into.
///
/// The hook lives exactly as long as this handle. The supervisor closes
/// superseded handles and keeps them until they report closed, so a socket
/// can never call a dropped closure during normal operation.
pub struct WebConnection {
    socket: WebSocket,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
}

impl WebConnection {
    pub fn socket(&self) -> &WebSocket {
        &self.socket
    }
}

impl Connection for WebConnection {
    fn state(&self) -> ConnectionState {
        ConnectionState::from_ready_state(self.socket.ready_state())
    }

    fn close(&self) {
        // Closing a CONNECTING socket fails the handshake; it never opens.
        match self.socket.ready_state() {
            WebSocket::CONNECTING | WebSocket::OPEN => {
                if let Err(e) = self.socket.close() {
                    tracing::debug!("[livestyle] close failed: {e:?}");
                }
            }
            _ => {}
        }
    }
}

impl Drop for WebConnection {
    fn drop(&mut self) {
        // Only reached for a live socket when the agent itself is stopped.
        if self.socket.ready_state() != WebSocket::CLOSED {
            let _ = self.socket.close();
        }
        self.socket.set_onmessage(None);
    }
}

/// Payload text of a message event: text frames verbatim, binary frames
/// as lossy UTF-8. Anything else (a `Blob`, say) yields `None`.
pub fn decode_payload(data: &JsValue) -> Option<String> {
    if let Some(text) = data.as_string() {
        return Some(text);
    }

    let buffer = data.dyn_ref::<ArrayBuffer>()?;
    let bytes = Uint8Array::new(buffer).to_vec();
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
