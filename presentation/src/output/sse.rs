//! Server-sent-event style printing of council events
//!
//! Each event becomes one `data: {json}` line followed by a blank line,
//! the same framing a streaming HTTP client would receive.

use council_application::{CouncilEvent, CouncilEventSink};
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

/// One event framed as an SSE `data:` record.
pub fn format_sse_line(event: &CouncilEvent) -> String {
    let json = serde_json::to_string(event).unwrap_or_else(|e| {
        serde_json::json!({"type": "error", "message": format!("Failed to encode event: {}", e)})
            .to_string()
    });
    format!("data: {}\n\n", json)
}

/// [`CouncilEventSink`] writing every event to a writer as it arrives
pub struct SseEventPrinter<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl SseEventPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> SseEventPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> CouncilEventSink for SseEventPrinter<W> {
    fn emit(&self, event: CouncilEvent) {
        let line = format_sse_line(&event);
        let Ok(mut out) = self.out.lock() else {
            warn!("Event printer lock poisoned; dropping {}", event.kind());
            return;
        };
        if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
            warn!("Failed to write {} event: {}", event.kind(), e);
        }
    }
}
