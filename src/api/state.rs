//! API server state

use std::sync::Arc;

use crate::aggregator::StorageAggregator;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// File storage aggregator
    pub aggregator: Arc<StorageAggregator>,
}

impl AppState {
    pub fn new(aggregator: Arc<StorageAggregator>) -> Self {
        Self { aggregator }
    }
}
