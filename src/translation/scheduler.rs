/*!
 * Scheduling of per-unit work within one file.
 *
 * The scheduler is built once per run and handed to every file pipeline. It
 * turns a list of work items into a stream of results; the pipeline drains the
 * stream, so every unit reaches a terminal state before the file is finished.
 */

use futures::future::Future;
use futures::stream::{self, LocalBoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How units of one file are dispatched to the translation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    /// One unit at a time in document order, with an optional pause between units
    #[default]
    Sequential,
    /// Up to `max_concurrent_requests` units in flight
    Bounded,
    /// Every unit of the file in flight at once
    Unbounded,
}

impl ConcurrencyMode {
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Sequential => "sequential".to_string(),
            Self::Bounded => "bounded".to_string(),
            Self::Unbounded => "unbounded".to_string(),
        }
    }
}

impl std::fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ConcurrencyMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "sequential" | "queue" => Ok(Self::Sequential),
            "bounded" => Ok(Self::Bounded),
            "unbounded" | "parallel" => Ok(Self::Unbounded),
            _ => Err(anyhow::anyhow!("Invalid concurrency mode: {}", s)),
        }
    }
}

/// Per-run unit scheduler
#[derive(Debug, Clone)]
pub struct UnitScheduler {
    mode: ConcurrencyMode,
    max_concurrent_requests: usize,
    delay: Duration,
}

impl UnitScheduler {
    pub fn new(mode: ConcurrencyMode, max_concurrent_requests: usize, delay: Duration) -> Self {
        Self {
            mode,
            max_concurrent_requests: max_concurrent_requests.max(1),
            delay,
        }
    }

    /// Single worker queue without pauses
    pub fn sequential() -> Self {
        Self::new(ConcurrencyMode::Sequential, 1, Duration::ZERO)
    }

    pub fn mode(&self) -> ConcurrencyMode {
        self.mode
    }

    /// Run `work` over `items`, yielding results as units finish
    ///
    /// Sequential mode yields in submission order; the concurrent modes yield in
    /// completion order.
    pub fn run<'a, I, O, F, Fut>(&self, items: Vec<I>, mut work: F) -> LocalBoxStream<'a, O>
    where
        I: 'a,
        O: 'a,
        F: FnMut(I) -> Fut + 'a,
        Fut: Future<Output = O> + 'a,
    {
        match self.mode {
            ConcurrencyMode::Sequential => {
                let delay = self.delay;
                stream::iter(items.into_iter().enumerate())
                    .then(move |(idx, item)| {
                        let job = work(item);
                        async move {
                            if idx > 0 && !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                            job.await
                        }
                    })
                    .boxed_local()
            }
            ConcurrencyMode::Bounded => stream::iter(items)
                .map(work)
                .buffer_unordered(self.max_concurrent_requests)
                .boxed_local(),
            ConcurrencyMode::Unbounded => {
                let limit = items.len().max(1);
                stream::iter(items).map(work).buffer_unordered(limit).boxed_local()
            }
        }
    }
}

impl Default for UnitScheduler {
    fn default() -> Self {
        Self::sequential()
    }
}
