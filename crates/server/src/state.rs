use std::sync::Arc;

use service::{BusinessService, DocumentStore, ReviewService};

/// Shared handler state. Both services hold the same injected store.
#[derive(Clone)]
pub struct AppState {
    pub businesses: BusinessService,
    pub reviews: ReviewService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            businesses: BusinessService::new(Arc::clone(&store)),
            reviews: ReviewService::new(store),
        }
    }
}
