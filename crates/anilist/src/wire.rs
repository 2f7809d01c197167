//! Raw response shapes as AniList returns them.
//!
//! Every field is optional because the schema allows nulls almost
//! everywhere and fields may be absent when a selection differs. These types
//! are only deserialized; [`crate::models`] turns them into flat records.

use serde::Deserialize;

use crate::types::{
    MediaFormat, MediaListStatus, MediaSeason, MediaSource, MediaStatus, MediaType, ScoreFormat,
    UserTitleLanguage,
};

/// Nullable list of nullable items, as GraphQL lists usually are.
pub type WireList<T> = Option<Vec<Option<T>>>;

/// `Page { pageInfo, <items> }` where the item field is `media`, `users`,
/// or `mediaList` depending on the query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePage<T> {
    pub page_info: Option<WirePageInfo>,
    #[serde(alias = "media", alias = "users", alias = "mediaList")]
    pub items: WireList<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePageInfo {
    pub total: Option<i32>,
    pub per_page: Option<i32>,
    pub current_page: Option<i32>,
    pub last_page: Option<i32>,
    pub has_next_page: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
    pub user_preferred: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireFuzzyDate {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

/// `fragment MediaSmall on Media`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMediaSmall {
    pub id: Option<i32>,
    pub id_mal: Option<i32>,
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub format: Option<MediaFormat>,
    pub status: Option<MediaStatus>,
    pub title: Option<WireMediaTitle>,
    pub cover_image: Option<WireCoverImage>,
    pub episodes: Option<i32>,
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub season: Option<MediaSeason>,
    pub season_year: Option<i32>,
    pub average_score: Option<i32>,
    pub is_adult: Option<bool>,
    pub site_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMediaTag {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub rank: Option<i32>,
    pub is_media_spoiler: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireStudio {
    pub id: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireStudioConnection {
    pub nodes: WireList<WireStudio>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAiringSchedule {
    pub airing_at: Option<i64>,
    pub time_until_airing: Option<i64>,
    pub episode: Option<i32>,
}

/// `fragment MediaBig on Media { ...MediaSmall ... }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMediaBig {
    #[serde(flatten)]
    pub small: WireMediaSmall,
    pub description: Option<String>,
    pub start_date: Option<WireFuzzyDate>,
    pub end_date: Option<WireFuzzyDate>,
    pub duration: Option<i32>,
    pub source: Option<MediaSource>,
    pub genres: WireList<String>,
    pub synonyms: WireList<String>,
    pub tags: WireList<WireMediaTag>,
    pub studios: Option<WireStudioConnection>,
    pub banner_image: Option<String>,
    pub mean_score: Option<i32>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub next_airing_episode: Option<WireAiringSchedule>,
    pub media_list_entry: Option<WireListEntry>,
}

/// `fragment BasicMediaListEntry on MediaList`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireListEntry {
    pub id: Option<i32>,
    pub user_id: Option<i32>,
    pub media_id: Option<i32>,
    pub status: Option<MediaListStatus>,
    pub score: Option<f64>,
    pub progress: Option<i32>,
    pub progress_volumes: Option<i32>,
    pub repeat: Option<i32>,
    pub private: Option<bool>,
    pub notes: Option<String>,
    pub hidden_from_status_lists: Option<bool>,
    pub started_at: Option<WireFuzzyDate>,
    pub completed_at: Option<WireFuzzyDate>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// `fragment CommonMediaListEntry on MediaList { ...BasicMediaListEntry media { ...MediaSmall } }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCommonListEntry {
    #[serde(flatten)]
    pub entry: WireListEntry,
    pub media: Option<WireMediaSmall>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUserAvatar {
    pub large: Option<String>,
    pub medium: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUserOptions {
    pub title_language: Option<UserTitleLanguage>,
    pub display_adult_content: Option<bool>,
    pub profile_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMediaListOptions {
    pub score_format: Option<ScoreFormat>,
}

/// `fragment User on User`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<WireUserAvatar>,
    pub banner_image: Option<String>,
    pub site_url: Option<String>,
    pub donator_tier: Option<i32>,
    pub moderator_roles: WireList<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub options: Option<WireUserOptions>,
    pub media_list_options: Option<WireMediaListOptions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDeleted {
    pub deleted: Option<bool>,
}
