//! Free-text and advanced file search feeding the results surface.

use caseorg_client::{ApiError, Backend};
use caseorg_types::{SearchQuery, SearchResultRecord};
use tracing::{debug, warn};

use crate::generation::{Applied, GenerationCounter, RequestToken};
use crate::results::ResultsRenderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    token: RequestToken,
    pub query: SearchQuery,
}

/// Only the newest search may render
#[derive(Debug, Default)]
pub struct SearchSession {
    generation: GenerationCounter,
    last_query: Option<SearchQuery>,
    pending: bool,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn begin(&mut self, query: SearchQuery) -> SearchRequest {
        self.pending = true;
        self.last_query = Some(query.clone());
        SearchRequest {
            token: self.generation.next(),
            query,
        }
    }

    /// Render the results of the newest search. A failure shows one inline
    /// error row, unless the directory overlay holds the surface, and leaves
    /// the previous results snapshot in place.
    pub fn complete(
        &mut self,
        renderer: &mut ResultsRenderer,
        request: SearchRequest,
        result: std::result::Result<Vec<SearchResultRecord>, ApiError>,
    ) -> Applied {
        if !self.generation.is_current(request.token) {
            debug!("discarding superseded search results");
            return Applied::Discarded;
        }
        self.pending = false;
        match result {
            Ok(records) => renderer.render(Some(&records)),
            Err(err) => {
                warn!(error = %err, "search failed");
                if !renderer.is_held() {
                    renderer.show_error(err.user_message());
                }
            }
        }
        Applied::Applied
    }

    /// Results arriving after this call are ignored
    pub fn abandon(&mut self) {
        self.generation.invalidate();
        self.pending = false;
    }

    pub async fn run(
        &mut self,
        backend: &dyn Backend,
        renderer: &mut ResultsRenderer,
        query: SearchQuery,
    ) -> Applied {
        let request = self.begin(query);
        let result = backend.search(&request.query).await;
        self.complete(renderer, request, result)
    }
}
