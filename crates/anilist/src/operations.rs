//! AniList GraphQL documents and their typed operation definitions.
//!
//! Fragments are spliced into each document at compile time so every
//! document carries exactly the fragments it uses.

use serde::{Deserialize, Serialize};

use crate::engine::{GraphqlOperation, OperationKind};
use crate::list::{SaveMediaListEntryParams, UserMediaListParams};
use crate::media::{SearchMediaParams, SearchMediaSmallParams};
use crate::response::PageData;
use crate::types::MediaType;
use crate::user::SearchUsersParams;
use crate::wire::{
    WireCommonListEntry, WireDeleted, WireListEntry, WireMediaBig, WireMediaSmall, WirePage,
    WireUser,
};

macro_rules! page_info_selection {
    () => {
        "pageInfo { total perPage currentPage lastPage hasNextPage }"
    };
}

macro_rules! media_small_fragment {
    () => {
        r#"
fragment MediaSmall on Media {
  id
  idMal
  type
  format
  status
  title { romaji english native userPreferred }
  coverImage { extraLarge large medium color }
  episodes
  chapters
  volumes
  season
  seasonYear
  averageScore
  isAdult
  siteUrl
}
"#
    };
}

macro_rules! basic_list_entry_fragment {
    () => {
        r#"
fragment BasicMediaListEntry on MediaList {
  id
  userId
  mediaId
  status
  score
  progress
  progressVolumes
  repeat
  private
  notes
  hiddenFromStatusLists
  startedAt { year month day }
  completedAt { year month day }
  createdAt
  updatedAt
}
"#
    };
}

macro_rules! media_big_fragment {
    () => {
        r#"
fragment MediaBig on Media {
  ...MediaSmall
  description(asHtml: false)
  startDate { year month day }
  endDate { year month day }
  duration
  source
  genres
  synonyms
  tags { id name rank isMediaSpoiler }
  studios(isMain: true) { nodes { id name } }
  bannerImage
  meanScore
  popularity
  favourites
  nextAiringEpisode { airingAt timeUntilAiring episode }
  mediaListEntry { ...BasicMediaListEntry }
}
"#
    };
}

macro_rules! user_fragment {
    () => {
        r#"
fragment User on User {
  id
  name
  about(asHtml: false)
  avatar { large medium }
  bannerImage
  siteUrl
  donatorTier
  moderatorRoles
  createdAt
  updatedAt
  options { titleLanguage displayAdultContent profileColor }
  mediaListOptions { scoreFormat }
}
"#
    };
}

macro_rules! common_list_entry_fragment {
    () => {
        r#"
fragment CommonMediaListEntry on MediaList {
  ...BasicMediaListEntry
  media { ...MediaSmall }
}
"#
    };
}

/// `{ Page { pageInfo, <items> } }`
#[derive(Debug, Clone, Deserialize)]
pub struct PageQueryData<T> {
    #[serde(rename = "Page")]
    pub page: Option<WirePage<T>>,
}

impl<T> PageQueryData<T> {
    /// Take the page's items, dropping nulls and rows that fail to map.
    pub(crate) fn take_items<R>(&mut self, map: impl Fn(T) -> Option<R>) -> Vec<R> {
        self.page
            .as_mut()
            .and_then(|page| page.items.take())
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(map)
            .collect()
    }

    pub(crate) fn take_page_info(&mut self) -> Option<PageData> {
        self.page
            .as_mut()
            .and_then(|page| page.page_info.take())
            .map(PageData::from_wire)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaData {
    #[serde(rename = "Media")]
    pub media: Option<WireMediaBig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    #[serde(rename = "User")]
    pub user: Option<WireUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerData {
    #[serde(rename = "Viewer")]
    pub viewer: Option<WireUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveMediaListEntryData {
    #[serde(rename = "SaveMediaListEntry")]
    pub entry: Option<WireListEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteMediaListEntryData {
    #[serde(rename = "DeleteMediaListEntry")]
    pub result: Option<WireDeleted>,
}

/// Variables for operations addressed by a single id.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IdVariables {
    pub id: i32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MediaByIdVariables {
    pub id: i32,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// Serializes to `{}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoVariables {}

pub struct SearchMedia;

impl GraphqlOperation for SearchMedia {
    type Variables = SearchMediaParams;
    type Data = PageQueryData<WireMediaBig>;

    const QUERY: &'static str = concat!(
        r#"
query SearchMedia($page: Int, $perPage: Int, $search: String, $type: MediaType, $sort: [MediaSort], $season: MediaSeason, $seasonYear: Int, $format: MediaFormat, $status: MediaStatus, $formatIn: [MediaFormat], $statusIn: [MediaStatus], $sourceIn: [MediaSource], $idIn: [Int], $idNotIn: [Int], $onList: Boolean) {
  Page(page: $page, perPage: $perPage) {
    "#,
        page_info_selection!(),
        r#"
    media(search: $search, type: $type, sort: $sort, season: $season, seasonYear: $seasonYear, format: $format, status: $status, format_in: $formatIn, status_in: $statusIn, source_in: $sourceIn, id_in: $idIn, id_not_in: $idNotIn, onList: $onList) {
      ...MediaBig
    }
  }
}
"#,
        media_big_fragment!(),
        media_small_fragment!(),
        basic_list_entry_fragment!(),
    );
    const OPERATION_NAME: &'static str = "SearchMedia";
}

pub struct SearchMediaSmall;

impl GraphqlOperation for SearchMediaSmall {
    type Variables = SearchMediaSmallParams;
    type Data = PageQueryData<WireMediaSmall>;

    const QUERY: &'static str = concat!(
        r#"
query SearchMediaSmall($search: String, $type: MediaType, $sort: [MediaSort], $season: MediaSeason, $seasonYear: Int, $format: MediaFormat, $status: MediaStatus, $formatIn: [MediaFormat], $statusIn: [MediaStatus], $sourceIn: [MediaSource], $idIn: [Int], $idNotIn: [Int], $onList: Boolean) {
  Page {
    media(search: $search, type: $type, sort: $sort, season: $season, seasonYear: $seasonYear, format: $format, status: $status, format_in: $formatIn, status_in: $statusIn, source_in: $sourceIn, id_in: $idIn, id_not_in: $idNotIn, onList: $onList) {
      ...MediaSmall
    }
  }
}
"#,
        media_small_fragment!(),
    );
    const OPERATION_NAME: &'static str = "SearchMediaSmall";
}

pub struct MediaById;

impl GraphqlOperation for MediaById {
    type Variables = MediaByIdVariables;
    type Data = MediaData;

    const QUERY: &'static str = concat!(
        r#"
query MediaById($id: Int, $type: MediaType) {
  Media(id: $id, type: $type) {
    ...MediaBig
  }
}
"#,
        media_big_fragment!(),
        media_small_fragment!(),
        basic_list_entry_fragment!(),
    );
    const OPERATION_NAME: &'static str = "MediaById";
}

pub struct SearchUsers;

impl GraphqlOperation for SearchUsers {
    type Variables = SearchUsersParams;
    type Data = PageQueryData<WireUser>;

    const QUERY: &'static str = concat!(
        r#"
query SearchUsers($page: Int, $perPage: Int, $search: String, $sort: [UserSort], $isModerator: Boolean) {
  Page(page: $page, perPage: $perPage) {
    "#,
        page_info_selection!(),
        r#"
    users(search: $search, sort: $sort, isModerator: $isModerator) {
      ...User
    }
  }
}
"#,
        user_fragment!(),
    );
    const OPERATION_NAME: &'static str = "SearchUsers";
}

pub struct UserById;

impl GraphqlOperation for UserById {
    type Variables = IdVariables;
    type Data = UserData;

    const QUERY: &'static str = concat!(
        r#"
query UserById($id: Int) {
  User(id: $id) {
    ...User
  }
}
"#,
        user_fragment!(),
    );
    const OPERATION_NAME: &'static str = "UserById";
}

pub struct Viewer;

impl GraphqlOperation for Viewer {
    type Variables = NoVariables;
    type Data = ViewerData;

    const QUERY: &'static str = concat!(
        r#"
query Viewer {
  Viewer {
    ...User
  }
}
"#,
        user_fragment!(),
    );
    const OPERATION_NAME: &'static str = "Viewer";
}

pub struct UserMediaList;

impl GraphqlOperation for UserMediaList {
    type Variables = UserMediaListParams;
    type Data = PageQueryData<WireCommonListEntry>;

    const QUERY: &'static str = concat!(
        r#"
query UserMediaList($userId: Int, $type: MediaType, $sort: [MediaListSort] = [STATUS, UPDATED_TIME_DESC], $status: MediaListStatus, $mediaIdIn: [Int], $page: Int, $perPage: Int) {
  Page(page: $page, perPage: $perPage) {
    "#,
        page_info_selection!(),
        r#"
    mediaList(userId: $userId, type: $type, sort: $sort, status: $status, mediaId_in: $mediaIdIn) {
      ...CommonMediaListEntry
    }
  }
}
"#,
        common_list_entry_fragment!(),
        basic_list_entry_fragment!(),
        media_small_fragment!(),
    );
    const OPERATION_NAME: &'static str = "UserMediaList";
}

pub struct SaveMediaListEntry;

impl GraphqlOperation for SaveMediaListEntry {
    type Variables = SaveMediaListEntryParams;
    type Data = SaveMediaListEntryData;

    const QUERY: &'static str = concat!(
        r#"
mutation SaveMediaListEntry($id: Int, $mediaId: Int, $status: MediaListStatus, $score: Float, $progress: Int, $progressVolumes: Int, $repeat: Int, $private: Boolean, $notes: String, $hiddenFromStatusLists: Boolean) {
  SaveMediaListEntry(id: $id, mediaId: $mediaId, status: $status, score: $score, progress: $progress, progressVolumes: $progressVolumes, repeat: $repeat, private: $private, notes: $notes, hiddenFromStatusLists: $hiddenFromStatusLists) {
    ...BasicMediaListEntry
  }
}
"#,
        basic_list_entry_fragment!(),
    );
    const OPERATION_NAME: &'static str = "SaveMediaListEntry";
    const KIND: OperationKind = OperationKind::Mutation;
}

pub struct DeleteMediaListEntry;

impl GraphqlOperation for DeleteMediaListEntry {
    type Variables = IdVariables;
    type Data = DeleteMediaListEntryData;

    const QUERY: &'static str = r#"
mutation DeleteMediaListEntry($id: Int) {
  DeleteMediaListEntry(id: $id) {
    deleted
  }
}
"#;
    const OPERATION_NAME: &'static str = "DeleteMediaListEntry";
    const KIND: OperationKind = OperationKind::Mutation;
}
