//! Response envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

/// `{ success, message, data }`, the wrapper most views answer with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

fn default_success() -> bool {
    true
}

/// A page of a paginated list.
///
/// The backend's list views wrap the page body in two ways: plain
/// `results: [..]` and `results: { success, data: [..] }`. Both decode here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: PageResults<T>,
}

/// The two shapes of `results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageResults<T> {
    Plain(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Page<T> {
    /// The items on this page, whichever shape they arrived in.
    pub fn items(&self) -> &[T] {
        match &self.results {
            PageResults::Plain(items) => items,
            PageResults::Wrapped { data } => data,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self.results {
            PageResults::Plain(items) => items,
            PageResults::Wrapped { data } => data,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|n| !n.is_empty())
    }
}
