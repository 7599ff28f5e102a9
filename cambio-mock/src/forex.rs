use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use cambio_core::{CambioError, ForexUpstream, QueryParams};

use crate::MockBehavior;

#[derive(Default)]
struct InternalState {
    fallback: Option<MockBehavior<Value>>,
    path_rules: HashMap<String, MockBehavior<Value>>,
    requests: Vec<(String, QueryParams)>,
}

/// Controller handle used by tests to drive the dynamic forex upstream.
pub struct ForexController {
    state: Arc<Mutex<InternalState>>,
}

impl ForexController {
    /// Behavior for paths without a specific rule.
    pub async fn set_default(&self, behavior: MockBehavior<Value>) {
        self.state.lock().await.fallback = Some(behavior);
    }

    /// Behavior for one path.
    pub async fn set_path(&self, path: &str, behavior: MockBehavior<Value>) {
        let mut guard = self.state.lock().await;
        guard.path_rules.insert(path.to_string(), behavior);
    }

    /// Every `(path, query)` requested so far, in order.
    pub async fn requests(&self) -> Vec<(String, QueryParams)> {
        self.state.lock().await.requests.clone()
    }

    /// Number of requests made so far.
    pub async fn request_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }
}

/// Forex upstream that defers all behavior to a [`ForexController`].
pub struct DynamicForex {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicForex {
    /// Create an upstream and its controller.
    #[must_use]
    pub fn new_with_controller() -> (Arc<dyn ForexUpstream>, ForexController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = ForexController {
            state: Arc::clone(&state),
        };
        (Arc::new(Self { state }) as Arc<dyn ForexUpstream>, controller)
    }
}

#[async_trait]
impl ForexUpstream for DynamicForex {
    fn name(&self) -> &'static str {
        "forex-mock"
    }

    async fn fetch(&self, path: &str, query: &QueryParams) -> Result<Value, CambioError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push((path.to_string(), query.clone()));
            guard
                .path_rules
                .get(path)
                .or(guard.fallback.as_ref())
                .cloned()
        };
        match behavior {
            Some(b) => b.run().await,
            None => Err(CambioError::upstream_status(
                self.name(),
                404,
                Some(Value::String(format!("no behavior for {path}"))),
            )),
        }
    }
}
