//! Emission pipeline.
//!
//! Coordinates the document → outputs fan-out: markup serialization,
//! background compilation to HTML, and the persistence snapshot. Mutations
//! schedule an emission; rapid bursts are coalesced with a trailing-edge
//! debounce so only the final state of a burst is compiled.
//!
//! ```text
//! mutation ─▶ schedule ─▶ [debounce 300ms] ─▶ emit pass:
//!     serialize ─▶ MjmlChanged
//!     compile (spawn_blocking) ─▶ HtmlChanged (on success)
//!     snapshot ─▶ DesignJsonChanged
//!     Changed
//! ```

use std::sync::Arc;
use std::time::Duration;

use ebb_document::{document_to_mjml, EmailDesignJson, EmailDocument};
use tokio::sync::{mpsc, RwLock};
use tokio::time::timeout;

use crate::compiler::{CompileError, MjmlCompiler};
use crate::errors::{EditorError, EditorResult};
use crate::events::{EditorEvent, EventBus};

/// Default trailing-edge debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Handle to the background emission task.
///
/// Dropping the last `Emitter` clone closes the channel; the task drains
/// any pending document, runs one final pass, and exits.
#[derive(Clone)]
pub struct Emitter {
    tx: mpsc::UnboundedSender<EmailDocument>,
    compiler: Arc<dyn MjmlCompiler>,
    bus: EventBus,
    html: Arc<RwLock<String>>,
}

impl Emitter {
    /// Spawn the debounce loop on the current runtime.
    pub fn spawn(compiler: Arc<dyn MjmlCompiler>, bus: EventBus, debounce: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EmailDocument>();
        let html = Arc::new(RwLock::new(String::new()));

        let task_compiler = Arc::clone(&compiler);
        let task_bus = bus.clone();
        let task_html = Arc::clone(&html);
        tokio::spawn(async move {
            while let Some(mut doc) = rx.recv().await {
                // Trailing-edge coalescing: keep replacing the pending
                // document until the channel stays quiet for the window.
                loop {
                    match timeout(debounce, rx.recv()).await {
                        Ok(Some(newer)) => doc = newer,
                        Ok(None) | Err(_) => break,
                    }
                }
                if let Err(err) = emit_pass(&task_compiler, &task_bus, &task_html, doc).await {
                    tracing::warn!(error = %err, "compile failed, keeping previous html");
                }
            }
        });

        Self {
            tx,
            compiler,
            bus,
            html,
        }
    }

    /// Queue an emission for this document state. Best-effort; if the
    /// background task is gone the call is a no-op.
    pub fn schedule(&self, doc: EmailDocument) {
        let _ = self.tx.send(doc);
    }

    /// Run an emission pass immediately, bypassing the debounce window.
    /// Compile failures are reported to the caller; the pass still emits
    /// the snapshot events either way.
    pub async fn flush(&self, doc: EmailDocument) -> EditorResult<()> {
        emit_pass(&self.compiler, &self.bus, &self.html, doc)
            .await
            .map_err(EditorError::from)
    }

    /// Latest successfully compiled HTML. Empty until the first successful
    /// compile; retains the previous output across failed compiles.
    pub async fn compiled_html(&self) -> String {
        self.html.read().await.clone()
    }
}

async fn emit_pass(
    compiler: &Arc<dyn MjmlCompiler>,
    bus: &EventBus,
    html: &Arc<RwLock<String>>,
    doc: EmailDocument,
) -> Result<(), CompileError> {
    let mjml = document_to_mjml(&doc);
    bus.emit(EditorEvent::MjmlChanged { mjml: mjml.clone() });

    let compiler = Arc::clone(compiler);
    let compiled = match tokio::task::spawn_blocking(move || compiler.compile(&mjml)).await {
        Ok(result) => result,
        Err(join_err) => Err(CompileError::Unavailable(join_err.to_string())),
    };

    let outcome = match compiled {
        Ok(output) => {
            *html.write().await = output.html.clone();
            bus.emit(EditorEvent::HtmlChanged { html: output.html });
            Ok(())
        }
        Err(err) => Err(err),
    };

    bus.emit(EditorEvent::DesignJsonChanged {
        design: EmailDesignJson::wrap(doc),
    });
    bus.emit(EditorEvent::Changed);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompiledEmail;
    use ebb_document::factory::create_default_document;

    struct UppercaseCompiler;

    impl MjmlCompiler for UppercaseCompiler {
        fn compile(&self, mjml: &str) -> Result<CompiledEmail, CompileError> {
            Ok(CompiledEmail {
                html: format!("<html>{}</html>", mjml.len()),
            })
        }
    }

    struct FailingCompiler;

    impl MjmlCompiler for FailingCompiler {
        fn compile(&self, _mjml: &str) -> Result<CompiledEmail, CompileError> {
            Err(CompileError::Failed("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn flush_emits_full_event_sequence() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let emitter = Emitter::spawn(Arc::new(UppercaseCompiler), bus, DEFAULT_DEBOUNCE);

        emitter.flush(create_default_document()).await.unwrap();

        assert!(matches!(rx.recv().await, Ok(EditorEvent::MjmlChanged { .. })));
        assert!(matches!(rx.recv().await, Ok(EditorEvent::HtmlChanged { .. })));
        assert!(matches!(
            rx.recv().await,
            Ok(EditorEvent::DesignJsonChanged { .. })
        ));
        assert!(matches!(rx.recv().await, Ok(EditorEvent::Changed)));
        assert!(!emitter.compiled_html().await.is_empty());
    }

    #[tokio::test]
    async fn failed_compile_keeps_previous_html_and_still_snapshots() {
        let bus = EventBus::new();
        let ok = Emitter::spawn(Arc::new(UppercaseCompiler), bus.clone(), DEFAULT_DEBOUNCE);
        ok.flush(create_default_document()).await.unwrap();
        let good_html = ok.compiled_html().await;

        let mut rx = bus.subscribe();
        let failing = Emitter {
            compiler: Arc::new(FailingCompiler),
            ..ok.clone()
        };
        let err = failing.flush(create_default_document()).await;
        assert!(matches!(err, Err(EditorError::Compile(_))));

        // Markup still went out, HTML did not, snapshot and Changed did.
        assert!(matches!(rx.recv().await, Ok(EditorEvent::MjmlChanged { .. })));
        assert!(matches!(
            rx.recv().await,
            Ok(EditorEvent::DesignJsonChanged { .. })
        ));
        assert!(matches!(rx.recv().await, Ok(EditorEvent::Changed)));
        assert_eq!(failing.compiled_html().await, good_html);
    }
}
