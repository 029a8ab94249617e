//! Prompt builders for the three query kinds
//!
//! The prompts carry the only semi-structured contract with the model: the
//! per-item field names and the fenced-JSON output format the extractor and
//! normalizer expect.

use crate::models::Catalog;

/// How many items each prompt asks for
pub const ITEMS_PER_REQUEST: usize = 30;

/// Fixed system instruction sent with every generation call
pub const SYSTEM_INSTRUCTION: &str = "\
You are a specialized streaming content assistant. \
Your goal is to find content on a specific streaming service using the provided tools. \
You must prioritize accurate availability on the requested service and valid Rotten Tomatoes scores.";

/// Prompt for the top trending/highly-rated items on one catalog
pub fn trending_prompt(catalog: Catalog) -> String {
    format!(
        "Find {count} currently trending or highly-rated TV shows or movies available on {catalog}.\n\
         \n\
         Step 1: Use the search tool to verify availability and get current Rotten Tomatoes scores.\n\
         Step 2: Write a brief summary of what you found.\n\
         Step 3: Output the data in a strict JSON array format inside a markdown code block.\n\
         \n\
         For each item, include:\n\
         - title\n\
         - criticScore (number 0-100)\n\
         - audienceScore (number 0-100)\n\
         - year\n\
         - summary (one sentence)\n\
         - serviceLink (URL to watch on {catalog})\n\
         - rtLink (URL to Rotten Tomatoes)\n\
         - genre\n\
         \n\
         Example format:\n\
         Here are the shows I found... [Summary text]...\n\
         ```json\n\
         [\n\
           {{ \"title\": \"Show Name\", \"criticScore\": 95, ... }}\n\
         ]\n\
         ```",
        count = ITEMS_PER_REQUEST,
        catalog = catalog.name(),
    )
}

/// Prompt for a title search scoped to one catalog
pub fn search_prompt(catalog: Catalog, query: &str) -> String {
    format!(
        "Search for \"{query}\" on {catalog}. Find up to {count} matches.\n\
         If exact matches aren't found, list best available alternatives on {catalog}.\n\
         \n\
         Step 1: Search for the titles and their scores.\n\
         Step 2: Briefly summarize your findings.\n\
         Step 3: Output the data in a strict JSON array format inside a markdown code block.\n\
         \n\
         Required fields per item: title, criticScore, audienceScore, year, summary, serviceLink, rtLink, genre.\n\
         \n\
         Example format:\n\
         Found these results...\n\
         ```json\n\
         [\n\
           {{ \"title\": \"Matrix\", ... }}\n\
         ]\n\
         ```",
        query = query,
        catalog = catalog.name(),
        count = ITEMS_PER_REQUEST,
    )
}

/// Prompt for a single search spanning every known catalog
pub fn search_all_prompt(query: &str) -> String {
    let catalogs = Catalog::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Search for \"{query}\" across ALL major streaming services ({catalogs}).\n\
         Find up to {count} matches total, distributed across all services where available.\n\
         Include which service each title is available on.\n\
         \n\
         Step 1: Use the search tool to find titles matching \"{query}\" on multiple streaming platforms.\n\
         Step 2: Briefly summarize your findings.\n\
         Step 3: Output the data in a strict JSON array format inside a markdown code block.\n\
         \n\
         For each item, include:\n\
         - title\n\
         - criticScore (number 0-100)\n\
         - audienceScore (number 0-100)\n\
         - year\n\
         - summary (one sentence)\n\
         - serviceLink (URL to watch - use the actual streaming service URL)\n\
         - rtLink (URL to Rotten Tomatoes)\n\
         - genre\n\
         - service (which streaming service: {catalogs})\n\
         \n\
         Example format:\n\
         Here are the matches I found across services...\n\
         ```json\n\
         [\n\
           {{ \"title\": \"Show Name\", \"service\": \"Netflix\", \"criticScore\": 95, ... }}\n\
         ]\n\
         ```",
        query = query,
        catalogs = catalogs,
        count = ITEMS_PER_REQUEST,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_prompt_names_catalog_and_fields() {
        let prompt = trending_prompt(Catalog::Netflix);
        assert!(prompt.contains("available on Netflix"));
        assert!(prompt.contains("criticScore"));
        assert!(prompt.contains("serviceLink"));
        assert!(prompt.contains("```json"));
    }

    #[test]
    fn test_search_prompt_embeds_query() {
        let prompt = search_prompt(Catalog::Hulu, "The Bear");
        assert!(prompt.contains("\"The Bear\" on Hulu"));
        assert!(prompt.contains("rtLink"));
    }

    #[test]
    fn test_search_all_prompt_lists_every_catalog() {
        let prompt = search_all_prompt("Severance");
        for catalog in Catalog::ALL {
            assert!(prompt.contains(catalog.name()), "missing {}", catalog);
        }
        assert!(prompt.contains("- service"));
    }
}
