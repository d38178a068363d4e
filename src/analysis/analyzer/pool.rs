//! Checkout pool for analyzers.
//!
//! Analyzers carry large resources and cursor state, so a tokenizer takes
//! exclusive ownership of one for the duration of its work and gives it back
//! afterwards. Idle analyzers are kept per resource id.

use std::fmt;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::analysis::analyzer::MorphAnalyzer;
use crate::error::Result;

/// Builds a fresh analyzer for a resource id.
///
/// Analyzer constructors live outside this crate and may fail with any
/// error; it surfaces from [`AnalyzerPool::checkout`] as
/// [`BunkatsuError::Anyhow`](crate::error::BunkatsuError::Anyhow).
pub type AnalyzerFactory =
    Box<dyn Fn(u32) -> anyhow::Result<Box<dyn MorphAnalyzer>> + Send + Sync>;

/// Lock-guarded set of idle analyzers.
pub struct AnalyzerPool {
    factory: AnalyzerFactory,
    idle: Mutex<AHashMap<u32, Vec<Box<dyn MorphAnalyzer>>>>,
}

impl fmt::Debug for AnalyzerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerPool")
            .field("idle", &self.idle_count())
            .finish()
    }
}

impl AnalyzerPool {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(u32) -> anyhow::Result<Box<dyn MorphAnalyzer>> + Send + Sync + 'static,
    {
        AnalyzerPool {
            factory: Box::new(factory),
            idle: Mutex::new(AHashMap::new()),
        }
    }

    /// Take an idle analyzer for `resource_id`, building one if none is idle.
    pub fn checkout(&self, resource_id: u32) -> Result<Box<dyn MorphAnalyzer>> {
        if let Some(analyzer) = self
            .idle
            .lock()
            .get_mut(&resource_id)
            .and_then(|idle| idle.pop())
        {
            return Ok(analyzer);
        }
        log::debug!("creating analyzer for resource {resource_id}");
        Ok((self.factory)(resource_id)?)
    }

    /// Return an analyzer to the pool.
    pub fn checkin(&self, resource_id: u32, analyzer: Box<dyn MorphAnalyzer>) {
        self.idle
            .lock()
            .entry(resource_id)
            .or_default()
            .push(analyzer);
    }

    /// Number of idle analyzers across all resources.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().values().map(Vec::len).sum()
    }
}
