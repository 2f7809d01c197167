//! Flat domain records mapped from raw AniList responses.
//!
//! Optional scalars are coalesced where the schema has an obvious neutral
//! value (flags default to `false`, counters to `0`, lists to empty). A
//! record whose identifying fields are missing maps to `None` as a whole
//! instead of being partially constructed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    MediaFormat, MediaListStatus, MediaSeason, MediaSource, MediaStatus, MediaType, ScoreFormat,
    UserTitleLanguage,
};
use crate::wire::{
    WireAiringSchedule, WireCommonListEntry, WireCoverImage, WireFuzzyDate, WireList,
    WireListEntry, WireMediaBig, WireMediaSmall, WireMediaTag, WireMediaTitle, WireStudio,
    WireUser,
};

/// Drop null items from a nullable GraphQL list.
fn flatten_list<T>(list: WireList<T>) -> Vec<T> {
    list.unwrap_or_default().into_iter().flatten().collect()
}

/// Drop null items and items that fail to map.
fn map_list<W, T>(list: WireList<W>, map: impl Fn(W) -> Option<T>) -> Vec<T> {
    list.unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(map)
        .collect()
}

fn timestamp(seconds: Option<i64>) -> Option<DateTime<Utc>> {
    seconds.and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// A date where any component may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

impl FuzzyDate {
    fn from_wire(wire: Option<WireFuzzyDate>) -> Option<Self> {
        let wire = wire?;
        if wire.year.is_none() && wire.month.is_none() && wire.day.is_none() {
            return None;
        }
        Some(Self {
            year: wire.year,
            month: wire.month,
            day: wire.day,
        })
    }

    /// Calendar date, when all components are known and valid.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let month = u32::try_from(self.month?).ok()?;
        let day = u32::try_from(self.day?).ok()?;
        NaiveDate::from_ymd_opt(self.year?, month, day)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
    pub user_preferred: Option<String>,
}

impl MediaTitle {
    fn from_wire(wire: Option<WireMediaTitle>) -> Self {
        let wire = wire.unwrap_or_default();
        Self {
            romaji: wire.romaji,
            english: wire.english,
            native: wire.native,
            user_preferred: wire.user_preferred,
        }
    }

    /// Best available title: user preference, then English, romaji, native.
    pub fn preferred(&self) -> Option<&str> {
        self.user_preferred
            .as_deref()
            .or(self.english.as_deref())
            .or(self.romaji.as_deref())
            .or(self.native.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
    pub color: Option<String>,
}

impl From<Option<WireCoverImage>> for CoverImage {
    fn from(wire: Option<WireCoverImage>) -> Self {
        let wire = wire.unwrap_or_default();
        Self {
            extra_large: wire.extra_large,
            large: wire.large,
            medium: wire.medium,
            color: wire.color,
        }
    }
}

/// Compact media record used in lists and lightweight searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: i32,
    pub id_mal: Option<i32>,
    pub media_type: Option<MediaType>,
    pub format: Option<MediaFormat>,
    pub status: Option<MediaStatus>,
    pub title: MediaTitle,
    pub cover_image: CoverImage,
    pub episodes: Option<i32>,
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub season: Option<MediaSeason>,
    pub season_year: Option<i32>,
    pub average_score: Option<i32>,
    pub is_adult: bool,
    pub site_url: Option<String>,
}

impl MediaSummary {
    pub(crate) fn from_wire(wire: WireMediaSmall) -> Option<Self> {
        Some(Self {
            id: wire.id?,
            id_mal: wire.id_mal,
            media_type: wire.media_type,
            format: wire.format,
            status: wire.status,
            title: MediaTitle::from_wire(wire.title),
            cover_image: wire.cover_image.into(),
            episodes: wire.episodes,
            chapters: wire.chapters,
            volumes: wire.volumes,
            season: wire.season,
            season_year: wire.season_year,
            average_score: wire.average_score,
            is_adult: wire.is_adult.unwrap_or(false),
            site_url: wire.site_url,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTag {
    pub id: Option<i32>,
    pub name: String,
    pub rank: Option<i32>,
    pub is_media_spoiler: bool,
}

impl MediaTag {
    fn from_wire(wire: WireMediaTag) -> Option<Self> {
        Some(Self {
            id: wire.id,
            name: wire.name?,
            rank: wire.rank,
            is_media_spoiler: wire.is_media_spoiler.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    pub id: i32,
    pub name: String,
}

impl Studio {
    fn from_wire(wire: WireStudio) -> Option<Self> {
        Some(Self {
            id: wire.id?,
            name: wire.name?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiringEpisode {
    pub episode: i32,
    pub airing_at: DateTime<Utc>,
    /// Seconds until the episode airs, as of the response.
    pub time_until_airing: i64,
}

impl AiringEpisode {
    fn from_wire(wire: WireAiringSchedule) -> Option<Self> {
        Some(Self {
            episode: wire.episode?,
            airing_at: timestamp(wire.airing_at)?,
            time_until_airing: wire.time_until_airing?,
        })
    }
}

/// Full media record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(flatten)]
    pub summary: MediaSummary,
    pub description: Option<String>,
    pub start_date: Option<FuzzyDate>,
    pub end_date: Option<FuzzyDate>,
    /// Episode length in minutes.
    pub duration: Option<i32>,
    pub source: Option<MediaSource>,
    pub genres: Vec<String>,
    pub synonyms: Vec<String>,
    pub tags: Vec<MediaTag>,
    /// Main studios only.
    pub studios: Vec<Studio>,
    pub banner_image: Option<String>,
    pub mean_score: Option<i32>,
    pub popularity: i32,
    pub favourites: i32,
    pub next_airing_episode: Option<AiringEpisode>,
    /// The authenticated user's entry for this media, if any.
    pub list_entry: Option<ListEntry>,
}

impl Media {
    pub(crate) fn from_wire(wire: WireMediaBig) -> Option<Self> {
        Some(Self {
            summary: MediaSummary::from_wire(wire.small)?,
            description: wire.description,
            start_date: FuzzyDate::from_wire(wire.start_date),
            end_date: FuzzyDate::from_wire(wire.end_date),
            duration: wire.duration,
            source: wire.source,
            genres: flatten_list(wire.genres),
            synonyms: flatten_list(wire.synonyms),
            tags: map_list(wire.tags, MediaTag::from_wire),
            studios: wire
                .studios
                .map(|connection| map_list(connection.nodes, Studio::from_wire))
                .unwrap_or_default(),
            banner_image: wire.banner_image,
            mean_score: wire.mean_score,
            popularity: wire.popularity.unwrap_or(0),
            favourites: wire.favourites.unwrap_or(0),
            next_airing_episode: wire.next_airing_episode.and_then(AiringEpisode::from_wire),
            list_entry: wire.media_list_entry.and_then(ListEntry::from_wire),
        })
    }

    pub fn id(&self) -> i32 {
        self.summary.id
    }

    pub fn title(&self) -> &MediaTitle {
        &self.summary.title
    }
}

/// A user's tracking record for one media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: i32,
    pub user_id: Option<i32>,
    pub media_id: i32,
    pub status: Option<MediaListStatus>,
    /// Score in the owner's score format; `0` means unscored.
    pub score: f64,
    pub progress: i32,
    pub progress_volumes: Option<i32>,
    pub repeat: i32,
    pub private: bool,
    pub notes: Option<String>,
    pub hidden_from_status_lists: bool,
    pub started_at: Option<FuzzyDate>,
    pub completed_at: Option<FuzzyDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListEntry {
    pub(crate) fn from_wire(wire: WireListEntry) -> Option<Self> {
        Some(Self {
            id: wire.id?,
            user_id: wire.user_id,
            media_id: wire.media_id?,
            status: wire.status,
            score: wire.score.unwrap_or(0.0),
            progress: wire.progress.unwrap_or(0),
            progress_volumes: wire.progress_volumes,
            repeat: wire.repeat.unwrap_or(0),
            private: wire.private.unwrap_or(false),
            notes: wire.notes,
            hidden_from_status_lists: wire.hidden_from_status_lists.unwrap_or(false),
            started_at: FuzzyDate::from_wire(wire.started_at),
            completed_at: FuzzyDate::from_wire(wire.completed_at),
            created_at: timestamp(wire.created_at),
            updated_at: timestamp(wire.updated_at),
        })
    }
}

/// A list entry together with the media it tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaListEntry {
    pub list_entry: ListEntry,
    pub media: MediaSummary,
}

impl MediaListEntry {
    /// Rows without media, or whose entry or media lacks an id, are absent.
    pub(crate) fn from_wire(wire: WireCommonListEntry) -> Option<Self> {
        let media = MediaSummary::from_wire(wire.media?)?;
        Some(Self {
            list_entry: ListEntry::from_wire(wire.entry)?,
            media,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAvatar {
    pub large: Option<String>,
    pub medium: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub about: Option<String>,
    pub avatar: UserAvatar,
    pub banner_image: Option<String>,
    pub site_url: Option<String>,
    pub donator_tier: i32,
    pub moderator_roles: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub title_language: Option<UserTitleLanguage>,
    pub display_adult_content: bool,
    pub profile_color: Option<String>,
    pub score_format: Option<ScoreFormat>,
}

impl User {
    pub(crate) fn from_wire(wire: WireUser) -> Option<Self> {
        let avatar = wire.avatar.unwrap_or_default();
        let options = wire.options.unwrap_or_default();
        Some(Self {
            id: wire.id?,
            name: wire.name?,
            about: wire.about,
            avatar: UserAvatar {
                large: avatar.large,
                medium: avatar.medium,
            },
            banner_image: wire.banner_image,
            site_url: wire.site_url,
            donator_tier: wire.donator_tier.unwrap_or(0),
            moderator_roles: flatten_list(wire.moderator_roles),
            created_at: timestamp(wire.created_at),
            updated_at: timestamp(wire.updated_at),
            title_language: options.title_language,
            display_adult_content: options.display_adult_content.unwrap_or(false),
            profile_color: options.profile_color,
            score_format: wire.media_list_options.and_then(|o| o.score_format),
        })
    }

    /// Whether the user holds any moderator role.
    pub fn is_moderator(&self) -> bool {
        !self.moderator_roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_media_small(id: Option<i32>) -> WireMediaSmall {
        WireMediaSmall {
            id,
            title: Some(WireMediaTitle {
                romaji: Some("Kaubooi Bibappu".to_string()),
                english: Some("Cowboy Bebop".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_media_summary_requires_id() {
        assert!(MediaSummary::from_wire(wire_media_small(None)).is_none());

        let summary = MediaSummary::from_wire(wire_media_small(Some(1))).unwrap();
        assert_eq!(summary.id, 1);
        assert!(!summary.is_adult);
        assert_eq!(summary.title.preferred(), Some("Cowboy Bebop"));
        assert_eq!(summary.cover_image, CoverImage::default());
    }

    #[test]
    fn test_media_coalesces_collections_and_counters() {
        let wire = WireMediaBig {
            small: wire_media_small(Some(1)),
            genres: Some(vec![Some("Action".to_string()), None]),
            tags: Some(vec![
                Some(WireMediaTag {
                    id: Some(1),
                    name: Some("Space".to_string()),
                    rank: Some(90),
                    is_media_spoiler: None,
                }),
                Some(WireMediaTag {
                    id: Some(2),
                    name: None,
                    rank: None,
                    is_media_spoiler: None,
                }),
            ]),
            start_date: Some(WireFuzzyDate {
                year: Some(1998),
                month: Some(4),
                day: Some(3),
            }),
            end_date: Some(WireFuzzyDate::default()),
            ..Default::default()
        };

        let media = Media::from_wire(wire).unwrap();
        assert_eq!(media.id(), 1);
        assert_eq!(media.genres, vec!["Action".to_string()]);
        assert_eq!(media.tags.len(), 1);
        assert!(!media.tags[0].is_media_spoiler);
        assert!(media.synonyms.is_empty());
        assert!(media.studios.is_empty());
        assert_eq!(media.popularity, 0);
        assert_eq!(
            media.start_date.unwrap().to_naive_date(),
            NaiveDate::from_ymd_opt(1998, 4, 3)
        );
        assert_eq!(media.end_date, None);
    }

    #[test]
    fn test_media_without_id_is_absent() {
        let wire = WireMediaBig {
            small: wire_media_small(None),
            ..Default::default()
        };
        assert!(Media::from_wire(wire).is_none());
    }

    #[test]
    fn test_partial_fuzzy_date_has_no_calendar_date() {
        let date = FuzzyDate {
            year: Some(2024),
            month: None,
            day: None,
        };
        assert_eq!(date.to_naive_date(), None);

        let invalid = FuzzyDate {
            year: Some(2024),
            month: Some(2),
            day: Some(31),
        };
        assert_eq!(invalid.to_naive_date(), None);
    }

    #[test]
    fn test_list_entry_defaults() {
        let entry = ListEntry::from_wire(WireListEntry {
            id: Some(5),
            media_id: Some(21),
            updated_at: Some(1_700_000_000),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(entry.score, 0.0);
        assert_eq!(entry.progress, 0);
        assert!(!entry.private);
        assert_eq!(entry.updated_at.unwrap().timestamp(), 1_700_000_000);
        assert!(entry.created_at.is_none());
    }

    #[test]
    fn test_media_list_entry_requires_media() {
        let without_media = WireCommonListEntry {
            entry: WireListEntry {
                id: Some(5),
                media_id: Some(21),
                ..Default::default()
            },
            media: None,
        };
        assert!(MediaListEntry::from_wire(without_media).is_none());

        let with_media = WireCommonListEntry {
            entry: WireListEntry {
                id: Some(5),
                media_id: Some(21),
                ..Default::default()
            },
            media: Some(wire_media_small(Some(21))),
        };
        let row = MediaListEntry::from_wire(with_media).unwrap();
        assert_eq!(row.list_entry.media_id, row.media.id);
    }

    #[test]
    fn test_user_requires_id_and_name() {
        let nameless = WireUser {
            id: Some(1),
            ..Default::default()
        };
        assert!(User::from_wire(nameless).is_none());

        let user = User::from_wire(WireUser {
            id: Some(1),
            name: Some("Vodes".to_string()),
            moderator_roles: Some(vec![Some("ANIME_DATA".to_string())]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(user.name, "Vodes");
        assert!(user.is_moderator());
        assert_eq!(user.donator_tier, 0);
        assert_eq!(user.avatar, UserAvatar::default());
    }
}
