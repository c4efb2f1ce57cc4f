use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;

use crate::config::Config;

/// Process-wide counters. The engine itself is stateless; these only feed
/// `/api/health`.
#[derive(Clone, Debug)]
pub struct AppState {
    started_at: Instant,
    quotations_generated: Arc<AtomicU64>,
    quotations_rejected: Arc<AtomicU64>,
    chat_messages: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            quotations_generated: Arc::new(AtomicU64::new(0)),
            quotations_rejected: Arc::new(AtomicU64::new(0)),
            chat_messages: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn record_quotation(&self) {
        self.quotations_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.quotations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chat(&self) {
        self.chat_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn quotations_generated(&self) -> u64 {
        self.quotations_generated.load(Ordering::Relaxed)
    }

    pub fn quotations_rejected(&self) -> u64 {
        self.quotations_rejected.load(Ordering::Relaxed)
    }

    pub fn chat_messages(&self) -> u64 {
        self.chat_messages.load(Ordering::Relaxed)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Router state. Handlers extract `State<AppState>` and/or `State<Config>`
/// through `FromRef`, so a single `.with_state(shared)` covers both.
#[derive(Clone, Debug)]
pub struct SharedState {
    pub app: AppState,
    pub config: Config,
}

impl SharedState {
    pub fn new(config: Config) -> Self {
        Self {
            app: AppState::new(),
            config,
        }
    }
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> Self {
        shared.app.clone()
    }
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Self {
        shared.config.clone()
    }
}
