//! Query intelligence stage: classification + expansion with fallback.

use std::time::Duration;

use query_intel::IntelClient;
use tracing::{debug, warn};

use crate::models::{ExpandedQuery, Intent};

/// Classify and expand `query`, degrading to `{general, raw query}` on any
/// classifier trouble. One call, one deadline, no retries.
pub async fn classify(intel: &IntelClient, query: &str, deadline: Duration) -> ExpandedQuery {
    let outcome = tokio::time::timeout(deadline, intel.analyze(query)).await;

    let verdict = match outcome {
        Ok(Ok(verdict)) => verdict,
        Ok(Err(e)) => {
            warn!(error = %e, "classifier degraded; using general intent");
            return fallback(query);
        }
        Err(_) => {
            warn!(deadline_ms = deadline.as_millis(), "classifier deadline exceeded; using general intent");
            return fallback(query);
        }
    };

    let intent = Intent::parse_lenient(&verdict.intent);
    let text = if verdict.expanded_query.trim().is_empty() {
        query.to_string()
    } else {
        verdict.expanded_query.trim().to_string()
    };

    debug!(intent = intent.as_str(), expanded = %text, "query classified");
    ExpandedQuery { intent, text }
}

fn fallback(query: &str) -> ExpandedQuery {
    ExpandedQuery {
        intent: Intent::General,
        text: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_keeps_the_raw_query() {
        let eq = fallback("rust borrow checker");
        assert_eq!(eq.intent, Intent::General);
        assert_eq!(eq.text, "rust borrow checker");
    }
}
