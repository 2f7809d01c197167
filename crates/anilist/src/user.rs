//! User queries.

use serde::Serialize;

use crate::client::AnilistClient;
use crate::engine::FetchPolicy;
use crate::models::User;
use crate::operations::{IdVariables, NoVariables, PageQueryData, SearchUsers, UserById, Viewer};
use crate::response::Response;
use crate::types::UserSort;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchUsersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<UserSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_moderator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i32>,
    #[serde(skip)]
    pub fetch_policy: Option<FetchPolicy>,
}

impl AnilistClient {
    pub async fn search_users(&self, params: &SearchUsersParams) -> Response<Vec<User>> {
        let response = self
            .engine()
            .execute::<SearchUsers>(params, Some(params.fetch_policy.unwrap_or(FetchPolicy::CacheFirst)))
            .await;
        Response::from_engine(
            response,
            |data| data.map(|data| data.take_items(User::from_wire)).unwrap_or_default(),
            |data| data.and_then(PageQueryData::take_page_info),
        )
    }

    pub async fn fetch_user_by_id(
        &self,
        id: i32,
        fetch_policy: Option<FetchPolicy>,
    ) -> Response<Option<User>> {
        let response = self
            .engine()
            .execute::<UserById>(
                &IdVariables { id },
                Some(fetch_policy.unwrap_or(FetchPolicy::CacheFirst)),
            )
            .await;
        Response::from_engine(
            response,
            |data| data.and_then(|data| data.user.take()).and_then(User::from_wire),
            |_| None,
        )
    }

    /// The user owning the configured token.
    ///
    /// Without a token AniList answers with an error, so `data` is `None`
    /// and `errors` explains why.
    pub async fn fetch_viewer(&self, fetch_policy: Option<FetchPolicy>) -> Response<Option<User>> {
        let response = self
            .engine()
            .execute::<Viewer>(&NoVariables {}, Some(fetch_policy.unwrap_or(FetchPolicy::CacheFirst)))
            .await;
        Response::from_engine(
            response,
            |data| data.and_then(|data| data.viewer.take()).and_then(User::from_wire),
            |_| None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_users_params_serialization() {
        let params = SearchUsersParams {
            search: Some("josh".to_string()),
            is_moderator: Some(true),
            sort: Some(vec![UserSort::SearchMatch]),
            ..SearchUsersParams::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({"search": "josh", "sort": ["SEARCH_MATCH"], "isModerator": true})
        );
        assert_eq!(
            serde_json::to_value(SearchUsersParams::default()).unwrap(),
            serde_json::json!({})
        );
    }
}
