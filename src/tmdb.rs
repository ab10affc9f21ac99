use serde::Deserialize;
use tracing::debug;

use crate::store::NewMovie;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("catalog entry {id} has no usable {field}")]
    Incomplete { id: String, field: &'static str },
}

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        image_base_url: String,
        language: String,
    ) -> Self {
        Self { client, api_key, base_url, image_base_url, language }
    }

    /// Single best-effort call, results returned in catalog order.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));

        let resp: SearchResponse = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(query, results = resp.results.len(), "catalog search");
        Ok(resp.results)
    }

    pub async fn fetch_details(&self, api_id: &str) -> Result<MovieDetails, CatalogError> {
        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), api_id);

        let details: MovieDetails = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(api_id, title = %details.title, "catalog details");
        Ok(details)
    }

    pub fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }

    /// Turns catalog details into the record stored for a newly added movie.
    pub fn new_movie(&self, api_id: &str, details: MovieDetails) -> Result<NewMovie, CatalogError> {
        let year = details.release_year().ok_or_else(|| CatalogError::Incomplete {
            id: api_id.to_string(),
            field: "release_date",
        })?;

        let poster_path = details
            .poster_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CatalogError::Incomplete {
                id: api_id.to_string(),
                field: "poster_path",
            })?;

        Ok(NewMovie {
            img_url: self.poster_url(poster_path),
            title: details.title,
            year,
            description: details.overview.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
}

impl MovieDetails {
    /// The part of `release_date` before the first `-`.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        date.split('-').next()?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(
            reqwest::Client::new(),
            "key".into(),
            "http://catalog.invalid/3".into(),
            "https://image.tmdb.org/t/p/w500/".into(),
            "en-US".into(),
        )
    }

    fn details(release_date: Option<&str>, poster_path: Option<&str>) -> MovieDetails {
        MovieDetails {
            title: "X".into(),
            release_date: release_date.map(Into::into),
            overview: Some("A film.".into()),
            poster_path: poster_path.map(Into::into),
        }
    }

    #[test]
    fn year_is_taken_before_first_dash() {
        assert_eq!(details(Some("1999-03-04"), None).release_year(), Some(1999));
        assert_eq!(details(Some("2024"), None).release_year(), Some(2024));
        assert_eq!(details(Some(""), None).release_year(), None);
        assert_eq!(details(Some("soon-ish"), None).release_year(), None);
        assert_eq!(details(None, None).release_year(), None);
    }

    #[test]
    fn poster_url_joins_with_a_single_slash() {
        let c = client();
        assert_eq!(c.poster_url("/p.jpg"), "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(c.poster_url("p.jpg"), "https://image.tmdb.org/t/p/w500/p.jpg");
    }

    #[test]
    fn new_movie_is_built_from_details() {
        let movie = client().new_movie("603", details(Some("1999-03-04"), Some("/p.jpg"))).unwrap();
        assert_eq!(movie.title, "X");
        assert_eq!(movie.year, 1999);
        assert_eq!(movie.description, "A film.");
        assert!(movie.img_url.contains("/p.jpg"));
    }

    #[test]
    fn incomplete_details_are_rejected() {
        let err = client().new_movie("1", details(None, Some("/p.jpg"))).unwrap_err();
        assert!(matches!(err, CatalogError::Incomplete { field: "release_date", .. }));

        let err = client().new_movie("1", details(Some("2001-01-01"), Some(" "))).unwrap_err();
        assert!(matches!(err, CatalogError::Incomplete { field: "poster_path", .. }));
    }

    #[test]
    fn search_results_tolerate_null_fields() {
        let raw = r#"{"page":1,"results":[{"id":11,"title":"Star Wars","release_date":null,"poster_path":null,"adult":false}]}"#;
        let resp: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.results[0].id, 11);
        assert_eq!(resp.results[0].release_date, None);
    }
}
