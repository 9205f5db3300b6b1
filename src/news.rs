use std::fmt::Display;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TOP_HEADLINES_URL: &str = "https://newsapi.org/v2/top-headlines";

/// Categories offered by the dashboard selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Business,
    Entertainment,
    General,
    Politics,
    Technology,
    World,
    Other,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 7] = [
        NewsCategory::Business,
        NewsCategory::Entertainment,
        NewsCategory::General,
        NewsCategory::Politics,
        NewsCategory::Technology,
        NewsCategory::World,
        NewsCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Business => "business",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::General => "general",
            NewsCategory::Politics => "politics",
            NewsCategory::Technology => "technology",
            NewsCategory::World => "world",
            NewsCategory::Other => "other",
        }
    }
}

impl Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Topics offered by the dashboard selector. [NewsTopic::None] is the empty
/// selection and adds no keyword filter to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NewsTopic {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "gas prices")]
    GasPrices,
    #[serde(rename = "egg prices")]
    EggPrices,
    #[serde(rename = "consumer spending")]
    ConsumerSpending,
    #[serde(rename = "cpi")]
    Cpi,
    #[serde(rename = "gdp")]
    Gdp,
    #[serde(rename = "unemployment")]
    Unemployment,
    #[serde(rename = "inflation")]
    Inflation,
    #[serde(rename = "job market")]
    JobMarket,
}

impl NewsTopic {
    pub const ALL: [NewsTopic; 9] = [
        NewsTopic::None,
        NewsTopic::GasPrices,
        NewsTopic::EggPrices,
        NewsTopic::ConsumerSpending,
        NewsTopic::Cpi,
        NewsTopic::Gdp,
        NewsTopic::Unemployment,
        NewsTopic::Inflation,
        NewsTopic::JobMarket,
    ];

    /// Keyword sent verbatim as `q`, or [None] for the empty selection.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            NewsTopic::None => None,
            NewsTopic::GasPrices => Some("gas prices"),
            NewsTopic::EggPrices => Some("egg prices"),
            NewsTopic::ConsumerSpending => Some("consumer spending"),
            NewsTopic::Cpi => Some("cpi"),
            NewsTopic::Gdp => Some("gdp"),
            NewsTopic::Unemployment => Some("unemployment"),
            NewsTopic::Inflation => Some("inflation"),
            NewsTopic::JobMarket => Some("job market"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.keyword().unwrap_or("")
    }
}

impl Display for NewsTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

/// A failed news fetch is reported inline on the dashboard, it never aborts
/// the run.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Error: {0}. Unable to fetch articles.")]
    Status(u16),
    #[error("Unable to fetch articles: {0}.")]
    Transport(#[from] reqwest::Error),
}

pub struct NewsClient {
    pub api_key: String,
    pub base_url: String,
}

impl NewsClient {
    pub fn new(api_key: String) -> NewsClient {
        NewsClient {
            api_key,
            base_url: TOP_HEADLINES_URL.to_string(),
        }
    }

    /// Query parameters for a selection. `q` is omitted entirely when no
    /// topic is chosen.
    pub fn query_params(
        &self,
        category: NewsCategory,
        topic: NewsTopic,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("country", "us".to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("category", category.to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        if let Some(keyword) = topic.keyword() {
            params.push(("q", keyword.to_string()));
        }
        params
    }

    /// One GET against the top-headlines endpoint. A non-200 status comes
    /// back as [NewsError::Status].
    pub fn top_headlines(
        &self,
        category: NewsCategory,
        topic: NewsTopic,
    ) -> Result<Vec<Article>, NewsError> {
        let client = Client::new();
        let response = client
            .get(&self.base_url)
            .query(&self.query_params(category, topic))
            .send()?;
        if response.status() != StatusCode::OK {
            return Err(NewsError::Status(response.status().as_u16()));
        }
        let body: HeadlinesResponse = response.json()?;
        Ok(body.articles)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, error::Error, path::Path};

    use super::*;

    #[test]
    fn query_params_without_topic() {
        let client = NewsClient::new("abc".to_string());
        let params = client.query_params(NewsCategory::Business, NewsTopic::None);
        assert!(params.iter().all(|(k, _)| *k != "q"));
        assert!(params.contains(&("country", "us".to_string())));
        assert!(params.contains(&("sortBy", "publishedAt".to_string())));
        assert!(params.contains(&("category", "business".to_string())));
        assert!(params.contains(&("apiKey", "abc".to_string())));
    }

    #[test]
    fn query_params_with_topic() {
        let client = NewsClient::new("abc".to_string());
        let params = client.query_params(NewsCategory::General, NewsTopic::GasPrices);
        assert!(params.contains(&("q", "gas prices".to_string())));
    }

    #[test]
    fn parse_articles() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": {"id": null, "name": "Example"}, "title": "Egg prices climb again",
                 "description": "Wholesale costs rose for a third month.", "url": "https://example.com/eggs"},
                {"title": "Fed holds rates", "description": null, "url": "https://example.com/fed"}
            ]
        }"#;
        let response: HeadlinesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.articles.len(), 2);
        assert_eq!(response.articles[0].title, "Egg prices climb again");
        assert!(response.articles[1].description.is_none());
    }

    #[test]
    fn parse_empty_articles() {
        let response: HeadlinesResponse =
            serde_json::from_str(r#"{"status": "ok", "totalResults": 0}"#).unwrap();
        assert!(response.articles.is_empty());
    }

    #[test]
    fn selector_values() {
        assert_eq!(NewsCategory::ALL.len(), 7);
        assert_eq!(NewsTopic::ALL.len(), 9);
        assert_eq!(NewsTopic::None.as_str(), "");
        assert_eq!(NewsTopic::JobMarket.to_string(), "job market");
        assert_eq!(NewsCategory::World.to_string(), "world");
    }

    #[ignore]
    #[test]
    fn download_headlines() -> Result<(), Box<dyn Error>> {
        dotenvy::from_path(Path::new(".env/test.env")).unwrap();
        let client = NewsClient::new(env::var("NEWS_API_KEY").unwrap());
        let articles = client.top_headlines(NewsCategory::Business, NewsTopic::Inflation)?;
        println!("{:?}", articles.first());
        Ok(())
    }
}
