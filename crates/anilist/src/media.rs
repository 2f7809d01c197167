//! Media queries.

use serde::Serialize;
use tracing::debug;

use crate::client::AnilistClient;
use crate::engine::FetchPolicy;
use crate::models::{Media, MediaSummary};
use crate::operations::{MediaById, MediaByIdVariables, PageQueryData, SearchMedia, SearchMediaSmall};
use crate::response::Response;
use crate::types::{MediaFormat, MediaSeason, MediaSort, MediaSource, MediaStatus, MediaType};

/// Media search filters. Unset filters are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<MediaSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<MediaSeason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<MediaFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_in: Option<Vec<MediaFormat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_in: Option<Vec<MediaStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_in: Option<Vec<MediaSource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_in: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_not_in: Option<Vec<i32>>,
    /// Restrict to media on (or off) the viewer's list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_list: Option<bool>,
}

impl MediaFilters {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn ids(ids: impl IntoIterator<Item = i32>) -> Self {
        Self {
            id_in: Some(ids.into_iter().collect()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaParams {
    #[serde(flatten)]
    pub filters: MediaFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i32>,
    #[serde(skip)]
    pub fetch_policy: Option<FetchPolicy>,
}

impl From<MediaFilters> for SearchMediaParams {
    fn from(filters: MediaFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchMediaSmallParams {
    #[serde(flatten)]
    pub filters: MediaFilters,
    #[serde(skip)]
    pub fetch_policy: Option<FetchPolicy>,
}

impl From<MediaFilters> for SearchMediaSmallParams {
    fn from(filters: MediaFilters) -> Self {
        Self {
            filters,
            fetch_policy: None,
        }
    }
}

impl AnilistClient {
    /// Search media with full details, one page at a time.
    pub async fn search_media(&self, params: &SearchMediaParams) -> Response<Vec<Media>> {
        debug!(
            search = ?params.filters.search,
            media_type = %params.filters.media_type,
            page = ?params.page,
            "Searching media"
        );
        let response = self
            .engine()
            .execute::<SearchMedia>(params, Some(params.fetch_policy.unwrap_or(FetchPolicy::CacheFirst)))
            .await;
        Response::from_engine(
            response,
            |data| data.map(|data| data.take_items(Media::from_wire)).unwrap_or_default(),
            |data| data.and_then(PageQueryData::take_page_info),
        )
    }

    /// Search media returning only summary fields and no pagination.
    pub async fn search_media_small(
        &self,
        params: &SearchMediaSmallParams,
    ) -> Response<Vec<MediaSummary>> {
        let response = self
            .engine()
            .execute::<SearchMediaSmall>(
                params,
                Some(params.fetch_policy.unwrap_or(FetchPolicy::CacheFirst)),
            )
            .await;
        Response::from_engine(
            response,
            |data| {
                data.map(|data| data.take_items(MediaSummary::from_wire))
                    .unwrap_or_default()
            },
            |_| None,
        )
    }

    /// Fetch one media item. A nonexistent id yields `data: None`.
    pub async fn fetch_media_by_id(
        &self,
        id: i32,
        media_type: MediaType,
        fetch_policy: Option<FetchPolicy>,
    ) -> Response<Option<Media>> {
        let variables = MediaByIdVariables { id, media_type };
        let response = self
            .engine()
            .execute::<MediaById>(&variables, Some(fetch_policy.unwrap_or(FetchPolicy::CacheFirst)))
            .await;
        Response::from_engine(
            response,
            |data| data.and_then(|data| data.media.take()).and_then(Media::from_wire),
            |_| None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_filters_are_not_serialized() {
        let params = SearchMediaParams::from(MediaFilters::search("frieren"));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"search": "frieren", "type": "ANIME"})
        );
    }

    #[test]
    fn test_list_filters_use_variable_names() {
        let params = SearchMediaParams {
            filters: MediaFilters {
                media_type: MediaType::Manga,
                format_in: Some(vec![MediaFormat::Manga, MediaFormat::OneShot]),
                id_not_in: Some(vec![1]),
                season_year: Some(2023),
                on_list: Some(false),
                ..MediaFilters::default()
            },
            page: Some(2),
            per_page: Some(25),
            fetch_policy: Some(FetchPolicy::NetworkOnly),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "type": "MANGA",
                "seasonYear": 2023,
                "formatIn": ["MANGA", "ONE_SHOT"],
                "idNotIn": [1],
                "onList": false,
                "page": 2,
                "perPage": 25
            })
        );
    }

    #[test]
    fn test_small_params_carry_no_pagination() {
        let params = SearchMediaSmallParams::from(MediaFilters::ids([5, 6]));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"type": "ANIME", "idIn": [5, 6]})
        );
    }
}
