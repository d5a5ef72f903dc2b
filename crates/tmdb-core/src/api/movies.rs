//! Typed movie operations on TmdbApi.

use crate::error::NetworkResult;
use crate::models::{MovieDetail, MoviePage};
use crate::network::EndpointRequest;
use crate::TmdbApi;

impl TmdbApi {
    /// One page of today's trending movies. Pages start at 1.
    pub async fn fetch_trending_page(&self, page: u32) -> NetworkResult<MoviePage> {
        self.pipeline
            .execute(&EndpointRequest::trending_movies(page))
            .await
    }

    /// Full detail for one movie.
    pub async fn fetch_movie_detail(&self, id: u64) -> NetworkResult<MovieDetail> {
        self.pipeline
            .execute(&EndpointRequest::movie_details(id))
            .await
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> NetworkResult<MoviePage> {
        self.pipeline
            .execute(&EndpointRequest::search_movies(query, page))
            .await
    }
}
