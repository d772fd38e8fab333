use anyhow::Result;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// A group of spawned tasks that are awaited together.
///
/// Results are returned in the order the tasks were spawned, regardless of the order in which
/// they complete.
pub struct JoinSet<T> {
    joins: Vec<JoinHandle<Result<T>>>,
}
impl<T: Send + 'static> JoinSet<T> {
    pub fn new() -> Self {
        JoinSet { joins: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn spawn(&mut self, fut: impl Future<Output = Result<T>> + Send + 'static) {
        self.joins.push(tokio::spawn(fut.in_current_span()));
    }

    /// Waits for every task to finish.
    ///
    /// If any task fails or panics, the first such error in spawn order is returned, but only
    /// after all other tasks have run to completion.
    pub async fn join(self) -> Result<Vec<T>> {
        let mut result = Vec::with_capacity(self.joins.len());
        let mut error = None;
        for join in self.joins {
            match join.await {
                Ok(Ok(value)) => result.push(value),
                Ok(Err(e)) => {
                    error.get_or_insert(e);
                }
                Err(e) => {
                    error.get_or_insert(e.into());
                }
            }
        }
        match error {
            Some(e) => Err(e),
            None => Ok(result),
        }
    }
}
impl<T: Send + 'static> Default for JoinSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
