//! Session analysis and dashboard retrieval.
//!
//! `TrendAnalyzer` owns the two collaborators (store and chat client) and
//! runs each analysis as one sequential chain:
//! create session -> generate trends -> store trends -> generate insights.

use crate::analysis::aggregator;
use crate::error::{AnalysisError, DashboardError};
use crate::llm::{generate_insights, generate_trends, ChatClient, GenerationSettings};
use crate::models::{AnalysisOutcome, AnalyzeRequest, DashboardData};
use crate::store::TrendStore;
use std::sync::Arc;
use tracing::info;

/// Runs trend analyses and builds dashboards.
pub struct TrendAnalyzer {
    store: TrendStore,
    client: Arc<dyn ChatClient>,
    settings: GenerationSettings,
}

impl TrendAnalyzer {
    pub fn new(store: TrendStore, client: Arc<dyn ChatClient>, settings: GenerationSettings) -> Self {
        Self {
            store,
            client,
            settings,
        }
    }

    /// Run one analysis end to end.
    ///
    /// The session row is committed before generation starts. If generation
    /// fails, the session stays with no trends. If insight generation fails,
    /// the stored trends stay but are not returned.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisOutcome, AnalysisError> {
        if request.start_date > request.end_date {
            return Err(AnalysisError::InvalidRequest(format!(
                "start date {} is after end date {}",
                request.start_date, request.end_date
            )));
        }

        // Step 1: Create the session
        let session = self.store.create_session(request).await?;
        info!("Created analysis session {} ({})", session.id, session.session_name);

        // Step 2: Generate trends
        let trends =
            generate_trends(self.client.as_ref(), &self.settings, &request.trend_query()).await?;

        // Step 3: Persist trends
        self.store.insert_trends(session.id, &trends).await?;
        info!("Stored {} trends for session {}", trends.len(), session.id);

        // Step 4: Generate insights
        let insights = generate_insights(self.client.as_ref(), &self.settings, &trends).await?;

        Ok(AnalysisOutcome {
            success: true,
            session_id: session.id,
            trends,
            insights,
        })
    }

    /// Load a session's trends and aggregate them.
    pub async fn dashboard(&self, session_id: i64) -> Result<DashboardData, DashboardError> {
        let trends = self.store.load_trends(session_id).await?;
        info!("Loaded {} trends for session {}", trends.len(), session_id);
        Ok(aggregator::build_dashboard(trends))
    }
}
