//! Per-render conversion state
//!
//! Bridges a synchronous rendering context to the asynchronous dispatcher.
//! Each request resets the state to loading and spawns the conversion;
//! completions from superseded requests are discarded by comparing the
//! generation token issued with the request.

use crate::dispatcher::RamlParser;
use raml_api_docs_common::{ConversionError, HookResponse, ParserConfig};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Tracks the conversion of the most recently requested RAML definition
pub struct RamlToOpenApi {
    parser: Arc<RamlParser>,
    generation: Arc<AtomicU64>,
    current: Mutex<Option<String>>,
    state: Arc<watch::Sender<HookResponse<String>>>,
}

impl RamlToOpenApi {
    pub fn new(parser: Arc<RamlParser>) -> Self {
        let (state, _) = watch::channel(HookResponse::loading());
        Self {
            parser,
            generation: Arc::new(AtomicU64::new(0)),
            current: Mutex::new(None),
            state: Arc::new(state),
        }
    }

    /// Adapter backed by the process-wide parser
    pub fn shared() -> Self {
        Self::new(RamlParser::shared())
    }

    /// Start converting `definition` unless it is already the current input
    ///
    /// Returns the handle of the spawned conversion, or `None` when the
    /// definition is unchanged or no async runtime is available (the state
    /// is then Failed and the next request retries).
    pub fn request(&self, definition: &str) -> Option<JoinHandle<()>> {
        // input, token and the Loading reset change together under the lock
        let (token, handle) = {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            if current.as_deref() == Some(definition) {
                return None;
            }

            let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    *current = Some(definition.to_string());
                    self.state.send_replace(HookResponse::loading());
                    (token, handle)
                }
                Err(e) => {
                    *current = None;
                    self.state
                        .send_replace(HookResponse::failed(ConversionError::Runtime(e.to_string())));
                    return None;
                }
            }
        };

        let parser = Arc::clone(&self.parser);
        let generation = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);
        let definition = definition.to_string();
        let config = ParserConfig::for_definition(&definition);

        let conversion = handle.spawn(async move { parser.parse(&definition, &config).await });

        Some(handle.spawn(async move {
            let outcome = match conversion.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ConversionError::Runtime(format!(
                    "conversion task failed: {}",
                    e
                ))),
            };

            if let Err(e) = &outcome {
                tracing::warn!("RAML {} conversion failed: {}", config.version, e);
            }

            // token check and write happen under the channel lock, so a newer
            // request cannot interleave between them
            let applied = state.send_if_modified(|current| {
                if generation.load(Ordering::SeqCst) != token {
                    return false;
                }
                *current = match outcome {
                    Ok(data) => HookResponse::success(data),
                    Err(e) => HookResponse::failed(e),
                };
                true
            });

            if !applied {
                tracing::debug!("Discarding stale conversion result (generation {})", token);
            }
        }))
    }

    /// Definition of the most recent request, if any is in effect
    pub fn current_definition(&self) -> Option<String> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Current observable state
    pub fn state(&self) -> HookResponse<String> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<HookResponse<String>> {
        self.state.subscribe()
    }

    /// Wait until the latest request reaches Success or Failed
    pub async fn settled(&self) -> HookResponse<String> {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|s| s.is_settled()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }
}
