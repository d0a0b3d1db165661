//! Navigation side effect invoked when a session ends.

use std::sync::{Mutex, PoisonError};

/// The unauthenticated entry point.
pub const LOGIN_ROUTE: &str = "/login";

/// Receives redirect requests from the client.
///
/// The client calls this on hard session termination and on explicit logout.
/// Implementations decide what "navigating" means for their front end.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}

/// A navigator that only records the routes it was asked to visit.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route requested so far, oldest first.
    pub fn routes(&self) -> Vec<String> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent route, if any.
    pub fn last(&self) -> Option<String> {
        self.routes().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }
}
