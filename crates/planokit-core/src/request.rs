//! Stale-response guard for asynchronous loads.
//!
//! Fetches (products, saved furniture, persisted plans) are fire-and-forget.
//! Each one takes a [`RequestToken`] from the [`RequestTracker`]; when its
//! response arrives the token is checked, and a response for a request that
//! has since been superseded or invalidated is dropped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifies one in-flight request for a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestToken {
    key: String,
    generation: u64,
}

impl RequestToken {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Observable state of a keyed load
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last attempt failed; the message is user-visible.
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of completing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response belongs to the current request and was applied
    Applied,
    /// The response was stale and ignored
    Stale,
}

/// Issues generation-numbered tokens per key and tracks load state.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generations: HashMap<String, u64>,
    states: HashMap<String, LoadState>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for `key`, superseding any request still in flight.
    pub fn begin(&mut self, key: impl Into<String>) -> RequestToken {
        let key = key.into();
        let generation = self.generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        let token = RequestToken {
            key: key.clone(),
            generation: *generation,
        };
        self.states.insert(key, LoadState::Loading);
        token
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.generations.get(&token.key) == Some(&token.generation)
    }

    /// Invalidates every outstanding request for `key`.
    ///
    /// Called when the context a request was made for goes away, e.g. the
    /// active plan changes.
    pub fn invalidate(&mut self, key: &str) {
        if let Some(generation) = self.generations.get_mut(key) {
            *generation += 1;
        }
        if self.state(key).is_loading() {
            self.states.insert(key.to_string(), LoadState::Idle);
        }
    }

    /// Records the outcome of a request.
    ///
    /// A stale token leaves the state untouched.
    pub fn complete(&mut self, token: &RequestToken, outcome: Result<(), String>) -> Completion {
        if !self.is_current(token) {
            tracing::debug!(key = token.key(), "Discarding stale response");
            return Completion::Stale;
        }
        let state = match outcome {
            Ok(()) => LoadState::Ready,
            Err(message) => {
                tracing::warn!(key = token.key(), "Load failed: {}", message);
                LoadState::Failed(message)
            }
        };
        self.states.insert(token.key.clone(), state);
        Completion::Applied
    }

    pub fn state(&self, key: &str) -> LoadState {
        self.states.get(key).cloned().unwrap_or_default()
    }
}
