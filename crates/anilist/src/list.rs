//! Media list queries and mutations.

use serde::Serialize;
use tracing::{info, warn};

use crate::client::AnilistClient;
use crate::engine::FetchPolicy;
use crate::models::{ListEntry, MediaListEntry};
use crate::operations::{
    DeleteMediaListEntry, IdVariables, PageQueryData, SaveMediaListEntry, UserMediaList,
};
use crate::response::Response;
use crate::types::{MediaListSort, MediaListStatus, MediaType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMediaListParams {
    pub user_id: i32,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Server default is status, then most recently updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<MediaListSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaListStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_id_in: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i32>,
    #[serde(skip)]
    pub fetch_policy: Option<FetchPolicy>,
}

impl UserMediaListParams {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}

/// Fields of a list entry to create or update.
///
/// Set `id` to update an existing entry in place, or `media_id` to create
/// one. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMediaListEntryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaListStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_volumes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_from_status_lists: Option<bool>,
}

impl SaveMediaListEntryParams {
    pub fn update(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn create(media_id: i32) -> Self {
        Self {
            media_id: Some(media_id),
            ..Self::default()
        }
    }
}

impl AnilistClient {
    /// A user's list entries with the media they track.
    ///
    /// Uses the client's default fetch policy unless overridden.
    pub async fn fetch_user_media_list(
        &self,
        params: &UserMediaListParams,
    ) -> Response<Vec<MediaListEntry>> {
        let response = self
            .engine()
            .execute::<UserMediaList>(params, params.fetch_policy)
            .await;
        Response::from_engine(
            response,
            |data| {
                data.map(|data| data.take_items(MediaListEntry::from_wire))
                    .unwrap_or_default()
            },
            |data| data.and_then(PageQueryData::take_page_info),
        )
    }

    /// Create or update a list entry. Requires a token.
    pub async fn save_media_list_entry(
        &self,
        params: &SaveMediaListEntryParams,
    ) -> Response<Option<ListEntry>> {
        if params.id.is_none() && params.media_id.is_none() {
            warn!("Saving a list entry without id or media id; the server will reject it");
        }
        let response = self
            .engine()
            .execute::<SaveMediaListEntry>(params, None)
            .await;
        let response = Response::from_engine(
            response,
            |data| data.and_then(|data| data.entry.take()).and_then(ListEntry::from_wire),
            |_| None,
        );
        if let Some(entry) = &response.data {
            info!(entry_id = entry.id, media_id = entry.media_id, "List entry saved");
        }
        response
    }

    /// Delete a list entry. `data` is the server's `deleted` flag.
    pub async fn delete_media_list_entry(&self, id: i32) -> Response<Option<bool>> {
        let response = self
            .engine()
            .execute::<DeleteMediaListEntry>(&IdVariables { id }, None)
            .await;
        let response = Response::from_engine(
            response,
            |data| data.and_then(|data| data.result.take()).and_then(|result| result.deleted),
            |_| None,
        );
        if response.data == Some(true) {
            info!(entry_id = id, "List entry deleted");
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_sends_only_given_fields() {
        let params = SaveMediaListEntryParams {
            score: Some(8.5),
            ..SaveMediaListEntryParams::update(1)
        };
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"id": 1, "score": 8.5}));
    }

    #[test]
    fn test_save_create_with_status_and_notes() {
        let params = SaveMediaListEntryParams {
            status: Some(MediaListStatus::Planning),
            notes: Some("later".to_string()),
            hidden_from_status_lists: Some(false),
            ..SaveMediaListEntryParams::create(21)
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "mediaId": 21,
                "status": "PLANNING",
                "notes": "later",
                "hiddenFromStatusLists": false
            })
        );
    }

    #[test]
    fn test_user_media_list_params() {
        let params = UserMediaListParams {
            media_id_in: Some(vec![21]),
            status: Some(MediaListStatus::Current),
            ..UserMediaListParams::new(42)
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"userId": 42, "type": "ANIME", "status": "CURRENT", "mediaIdIn": [21]})
        );
    }
}
