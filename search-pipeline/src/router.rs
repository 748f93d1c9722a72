//! Intent → engine plan routing.

use crate::models::{Category, Engine, EnginePlan, Intent};

/// Return the engine and category set for `intent`. Total over the closed
/// intent enum; the registry changes only at compile time.
pub fn route(intent: Intent) -> EnginePlan {
    use Category as C;
    use Engine as E;

    match intent {
        Intent::Research => EnginePlan {
            engines: vec![E::Arxiv, E::SemanticScholar, E::Duckduckgo],
            categories: vec![C::Science],
        },
        Intent::Biomedical => EnginePlan {
            engines: vec![E::Pubmed, E::Arxiv, E::Duckduckgo],
            categories: vec![C::Science],
        },
        Intent::Code => EnginePlan {
            engines: vec![E::Github, E::Stackoverflow, E::Duckduckgo],
            categories: vec![C::It],
        },
        Intent::News => EnginePlan {
            engines: vec![E::BingNews, E::DuckduckgoNews, E::Duckduckgo],
            categories: vec![C::News],
        },
        Intent::General => EnginePlan {
            engines: vec![E::Duckduckgo, E::Bing, E::Brave],
            categories: vec![C::General],
        },
    }
}
