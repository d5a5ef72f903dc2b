//! Movie list and movie detail types.

use crate::config::ImageSize;
use serde::{Deserialize, Serialize};

/// One page of a paginated movie listing (trending or search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl MoviePage {
    /// Whether another page exists after this one.
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// A movie as it appears in list results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
}

impl Movie {
    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        self.poster_path.as_deref().map(|p| size.url_for(p))
    }
}

/// Full detail for a single movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub genres: Option<Vec<Genre>>,
    pub production_companies: Option<Vec<ProductionCompany>>,
    /// Release status, e.g. "Released" or "In Production".
    pub status: Option<String>,
}

impl MovieDetail {
    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        self.poster_path.as_deref().map(|p| size.url_for(p))
    }

    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        self.backdrop_path.as_deref().map(|p| size.url_for(p))
    }

    /// Runtime as `"1h 40m"`, or `"45m"` under an hour.
    pub fn formatted_runtime(&self) -> Option<String> {
        let runtime = self.runtime?;
        let hours = runtime / 60;
        let minutes = runtime % 60;
        if hours > 0 {
            Some(format!("{}h {}m", hours, minutes))
        } else {
            Some(format!("{}m", minutes))
        }
    }

    /// Vote average with one decimal, or `"N/A"`.
    pub fn formatted_vote_average(&self) -> String {
        match self.vote_average {
            Some(average) => format!("{:.1}", average),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 123,
        "title": "Mock Detail Movie",
        "overview": "Detailed overview.",
        "poster_path": "/dp.jpg",
        "backdrop_path": "/db.jpg",
        "release_date": "2023-05-15",
        "runtime": 100,
        "tagline": "A tagline",
        "vote_average": 8.5,
        "vote_count": 500,
        "genres": [{"id": 1, "name": "Action"}],
        "production_companies": [
            {"id": 7, "name": "Studio", "logo_path": null, "origin_country": "US"}
        ],
        "status": "Released"
    }"#;

    #[test]
    fn test_movie_page_decodes_wire_schema() {
        let json = r#"{"page":1,"results":[{"id":1,"title":"A","overview":"o","poster_path":null,"release_date":null,"vote_average":null,"vote_count":null}],"total_pages":3,"total_results":50}"#;
        let page: MoviePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_results, 50);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title, "A");
        assert!(page.results[0].poster_path.is_none());
        assert!(page.has_more());
    }

    #[test]
    fn test_movie_optional_fields_may_be_absent() {
        let movie: Movie = serde_json::from_str(r#"{"id":5,"title":"T","overview":""}"#).unwrap();
        assert_eq!(movie.id, 5);
        assert!(movie.vote_average.is_none());
        assert!(movie.poster_url(ImageSize::Small).is_none());
    }

    #[test]
    fn test_movie_requires_title() {
        let result = serde_json::from_str::<Movie>(r#"{"id":5,"overview":""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_movie_detail_decodes() {
        let detail: MovieDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.id, 123);
        assert_eq!(detail.runtime, Some(100));
        assert_eq!(detail.genres.as_ref().unwrap()[0].name, "Action");
        let company = &detail.production_companies.as_ref().unwrap()[0];
        assert_eq!(company.origin_country.as_deref(), Some("US"));
        assert_eq!(
            detail.backdrop_url(ImageSize::Original).as_deref(),
            Some("https://image.tmdb.org/t/p/original/db.jpg")
        );
    }

    #[test]
    fn test_formatted_runtime_and_votes() {
        let mut detail: MovieDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.formatted_runtime().as_deref(), Some("1h 40m"));
        assert_eq!(detail.formatted_vote_average(), "8.5");

        detail.runtime = Some(45);
        detail.vote_average = None;
        assert_eq!(detail.formatted_runtime().as_deref(), Some("45m"));
        assert_eq!(detail.formatted_vote_average(), "N/A");

        detail.runtime = None;
        assert!(detail.formatted_runtime().is_none());
    }

    #[test]
    fn test_last_page_has_no_more() {
        let page = MoviePage {
            page: 3,
            results: vec![],
            total_pages: 3,
            total_results: 50,
        };
        assert!(!page.has_more());
    }
}
