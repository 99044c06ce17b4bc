//! Guards the single render target against out-of-order fetch responses.
//!
//! Each fetch is started with [`RequestTracker::begin`], which hands back a
//! ticket. Only the newest ticket's response is accepted; older ones are
//! reported as [`StaleResponse`]. Switching to a different key also trips the
//! previous ticket's [`AbortHandle`] so the fetch collaborator can stop early.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Identity of what is being fetched: an address, optionally narrowed to one
/// route, on one network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub address: String,
    pub route: Option<String>,
    pub network: String,
}

impl RequestKey {
    pub fn new(address: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            route: None,
            network: network.into(),
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.route {
            Some(route) => write!(f, "{}@{}#{}", self.address, self.network, route),
            None => write!(f, "{}@{}", self.address, self.network),
        }
    }
}

/// Shared cancellation flag. Cloned into the fetch task; the tracker sets it.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub key: RequestKey,
    pub generation: u64,
    pub abort: AbortHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stale response for {key} (generation {generation}, current {current})")]
pub struct StaleResponse {
    pub key: RequestKey,
    pub generation: u64,
    pub current: u64,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
    in_flight: Option<RequestTicket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_key(&self) -> Option<&RequestKey> {
        self.in_flight.as_ref().map(|ticket| &ticket.key)
    }

    pub fn begin(&mut self, key: RequestKey) -> RequestTicket {
        if let Some(previous) = self.in_flight.take()
            && previous.key != key
        {
            tracing::debug!(previous = %previous.key, next = %key, "aborting superseded fetch");
            previous.abort.abort();
        }
        self.generation += 1;
        let ticket = RequestTicket {
            key,
            generation: self.generation,
            abort: AbortHandle::default(),
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation && !ticket.abort.is_aborted()
    }

    /// Passes `payload` through when `ticket` is still the newest request.
    pub fn accept<T>(&mut self, ticket: &RequestTicket, payload: T) -> Result<T, StaleResponse> {
        if !self.is_current(ticket) {
            tracing::debug!(key = %ticket.key, generation = ticket.generation, "dropping stale response");
            return Err(StaleResponse {
                key: ticket.key.clone(),
                generation: ticket.generation,
                current: self.generation,
            });
        }
        self.in_flight = None;
        Ok(payload)
    }
}
