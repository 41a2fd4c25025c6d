use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Emails collected by all workers of one crawl
///
/// Union-only: addresses are added, never removed.
#[derive(Debug, Default)]
pub struct EmailSet {
    inner: Mutex<HashSet<String>>,
}

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds addresses, returning how many were new
    pub fn merge<I>(&self, emails: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        emails
            .into_iter()
            .filter(|email| inner.insert(email.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current contents out
    pub fn snapshot(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}
