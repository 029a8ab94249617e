use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A streaming catalog the model can be asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    Netflix,
    Max,
    AppleTvPlus,
    DisneyPlus,
    Hulu,
    PrimeVideo,
}

impl Catalog {
    /// Every known catalog, in the order the aggregate fetch queries them
    pub const ALL: [Catalog; 6] = [
        Catalog::Netflix,
        Catalog::Max,
        Catalog::AppleTvPlus,
        Catalog::DisneyPlus,
        Catalog::Hulu,
        Catalog::PrimeVideo,
    ];

    /// Display name used in prompts, cache fingerprints, and record tags
    pub fn name(&self) -> &'static str {
        match self {
            Catalog::Netflix => "Netflix",
            Catalog::Max => "Max",
            Catalog::AppleTvPlus => "Apple TV+",
            Catalog::DisneyPlus => "Disney+",
            Catalog::Hulu => "Hulu",
            Catalog::PrimeVideo => "Prime Video",
        }
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single normalized show returned to the client
///
/// Scores are either a value in [0, 100] or absent; the normalizer clamps
/// anything numeric into range and drops anything that is not a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShowRecord {
    /// Synthesized list-rendering key, unique within one result set
    pub id: String,
    pub title: String,
    /// Release year as reported by the model, "N/A" when unknown
    pub year: String,
    #[serde(default)]
    pub critic_score: Option<u8>,
    #[serde(default)]
    pub audience_score: Option<u8>,
    pub summary: String,
    /// URL to watch the title on its catalog
    #[serde(default)]
    pub watch_link: Option<String>,
    /// URL to the title's review aggregator page
    #[serde(default)]
    pub review_link: Option<String>,
    pub genre: String,
    /// Which catalog the record came from, set by cross-catalog operations
    #[serde(default)]
    pub source_catalog: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names() {
        assert_eq!(Catalog::Netflix.name(), "Netflix");
        assert_eq!(Catalog::AppleTvPlus.name(), "Apple TV+");
        assert_eq!(format!("{}", Catalog::PrimeVideo), "Prime Video");
    }

    #[test]
    fn test_catalog_all_has_no_duplicates() {
        let names: std::collections::HashSet<_> =
            Catalog::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), Catalog::ALL.len());
    }

    #[test]
    fn test_show_record_serde_round_trip() {
        let record = ShowRecord {
            id: "netflix-0-1700000000000-abc123def".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            critic_score: Some(83),
            audience_score: Some(85),
            summary: "A hacker discovers reality is a simulation.".to_string(),
            watch_link: Some("https://www.netflix.com/title/20557937".to_string()),
            review_link: None,
            genre: "Sci-Fi".to_string(),
            source_catalog: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: ShowRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_show_record_camel_case_fields() {
        let record = ShowRecord {
            id: "x".to_string(),
            title: "X".to_string(),
            year: "N/A".to_string(),
            critic_score: Some(80),
            audience_score: None,
            summary: "No summary available.".to_string(),
            watch_link: None,
            review_link: None,
            genre: "N/A".to_string(),
            source_catalog: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["criticScore"], 80);
        assert!(json["audienceScore"].is_null());
        assert!(json.get("critic_score").is_none());
    }
}
