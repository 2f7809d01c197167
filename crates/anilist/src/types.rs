//! AniList schema enums.
//!
//! Each enum serializes to its GraphQL wire name and parses leniently from
//! user input (case-insensitive, `-` and `_` interchangeable). Decoding a
//! server value never fails: unrecognized names become `Unknown`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Error returned when a string names no variant of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {type_name} value: '{value}'")]
pub struct ParseEnumError {
    pub type_name: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(type_name: &'static str, value: &str) -> Self {
        Self {
            type_name,
            value: value.to_string(),
        }
    }
}

macro_rules! graphql_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        ///
        /// Values the server sends that this client does not know decode
        /// as `Unknown` instead of failing the whole response.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
            #[serde(rename = "UNKNOWN")]
            Unknown,
        }

        impl $name {
            /// Every known variant, in schema order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// GraphQL wire name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown => "UNKNOWN",
                }
            }

            fn from_wire(value: &str) -> Self {
                match value {
                    $($wire => $name::$variant,)+
                    other => {
                        debug!(
                            value = other,
                            enum_type = stringify!($name),
                            "Unrecognized enum value"
                        );
                        $name::Unknown
                    }
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok($name::from_wire(&value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        /// Strict: only known wire names parse.
        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().replace('-', "_");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(&wanted))
                    .ok_or_else(|| ParseEnumError::new(stringify!($name), s))
            }
        }
    };
}

graphql_enum! {
    /// Anime or manga.
    MediaType {
        Anime => "ANIME",
        Manga => "MANGA",
    }
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Anime
    }
}

graphql_enum! {
    /// Release format.
    MediaFormat {
        Tv => "TV",
        TvShort => "TV_SHORT",
        Movie => "MOVIE",
        Special => "SPECIAL",
        Ova => "OVA",
        Ona => "ONA",
        Music => "MUSIC",
        Manga => "MANGA",
        Novel => "NOVEL",
        OneShot => "ONE_SHOT",
    }
}

graphql_enum! {
    /// Release status.
    MediaStatus {
        Finished => "FINISHED",
        Releasing => "RELEASING",
        NotYetReleased => "NOT_YET_RELEASED",
        Cancelled => "CANCELLED",
        Hiatus => "HIATUS",
    }
}

graphql_enum! {
    /// Airing season.
    MediaSeason {
        Winter => "WINTER",
        Spring => "SPRING",
        Summer => "SUMMER",
        Fall => "FALL",
    }
}

graphql_enum! {
    /// Source material.
    MediaSource {
        Original => "ORIGINAL",
        Manga => "MANGA",
        LightNovel => "LIGHT_NOVEL",
        VisualNovel => "VISUAL_NOVEL",
        VideoGame => "VIDEO_GAME",
        Other => "OTHER",
        Novel => "NOVEL",
        Doujinshi => "DOUJINSHI",
        Anime => "ANIME",
        WebNovel => "WEB_NOVEL",
        LiveAction => "LIVE_ACTION",
        Game => "GAME",
        Comic => "COMIC",
        MultimediaProject => "MULTIMEDIA_PROJECT",
        PictureBook => "PICTURE_BOOK",
    }
}

graphql_enum! {
    /// Media sort keys.
    MediaSort {
        Id => "ID",
        IdDesc => "ID_DESC",
        TitleRomaji => "TITLE_ROMAJI",
        TitleRomajiDesc => "TITLE_ROMAJI_DESC",
        TitleEnglish => "TITLE_ENGLISH",
        TitleEnglishDesc => "TITLE_ENGLISH_DESC",
        TitleNative => "TITLE_NATIVE",
        TitleNativeDesc => "TITLE_NATIVE_DESC",
        Type => "TYPE",
        TypeDesc => "TYPE_DESC",
        Format => "FORMAT",
        FormatDesc => "FORMAT_DESC",
        StartDate => "START_DATE",
        StartDateDesc => "START_DATE_DESC",
        EndDate => "END_DATE",
        EndDateDesc => "END_DATE_DESC",
        Score => "SCORE",
        ScoreDesc => "SCORE_DESC",
        Popularity => "POPULARITY",
        PopularityDesc => "POPULARITY_DESC",
        Trending => "TRENDING",
        TrendingDesc => "TRENDING_DESC",
        Episodes => "EPISODES",
        EpisodesDesc => "EPISODES_DESC",
        Duration => "DURATION",
        DurationDesc => "DURATION_DESC",
        Status => "STATUS",
        StatusDesc => "STATUS_DESC",
        Chapters => "CHAPTERS",
        ChaptersDesc => "CHAPTERS_DESC",
        Volumes => "VOLUMES",
        VolumesDesc => "VOLUMES_DESC",
        UpdatedAt => "UPDATED_AT",
        UpdatedAtDesc => "UPDATED_AT_DESC",
        SearchMatch => "SEARCH_MATCH",
        Favourites => "FAVOURITES",
        FavouritesDesc => "FAVOURITES_DESC",
    }
}

graphql_enum! {
    /// User sort keys.
    UserSort {
        Id => "ID",
        IdDesc => "ID_DESC",
        Username => "USERNAME",
        UsernameDesc => "USERNAME_DESC",
        WatchedTime => "WATCHED_TIME",
        WatchedTimeDesc => "WATCHED_TIME_DESC",
        ChaptersRead => "CHAPTERS_READ",
        ChaptersReadDesc => "CHAPTERS_READ_DESC",
        SearchMatch => "SEARCH_MATCH",
    }
}

graphql_enum! {
    /// Status of a list entry.
    MediaListStatus {
        Current => "CURRENT",
        Planning => "PLANNING",
        Completed => "COMPLETED",
        Dropped => "DROPPED",
        Paused => "PAUSED",
        Repeating => "REPEATING",
    }
}

graphql_enum! {
    /// List entry sort keys.
    MediaListSort {
        MediaId => "MEDIA_ID",
        MediaIdDesc => "MEDIA_ID_DESC",
        Score => "SCORE",
        ScoreDesc => "SCORE_DESC",
        Status => "STATUS",
        StatusDesc => "STATUS_DESC",
        Progress => "PROGRESS",
        ProgressDesc => "PROGRESS_DESC",
        ProgressVolumes => "PROGRESS_VOLUMES",
        ProgressVolumesDesc => "PROGRESS_VOLUMES_DESC",
        Repeat => "REPEAT",
        RepeatDesc => "REPEAT_DESC",
        Priority => "PRIORITY",
        PriorityDesc => "PRIORITY_DESC",
        StartedOn => "STARTED_ON",
        StartedOnDesc => "STARTED_ON_DESC",
        FinishedOn => "FINISHED_ON",
        FinishedOnDesc => "FINISHED_ON_DESC",
        AddedTime => "ADDED_TIME",
        AddedTimeDesc => "ADDED_TIME_DESC",
        UpdatedTime => "UPDATED_TIME",
        UpdatedTimeDesc => "UPDATED_TIME_DESC",
        MediaTitleRomaji => "MEDIA_TITLE_ROMAJI",
        MediaTitleRomajiDesc => "MEDIA_TITLE_ROMAJI_DESC",
        MediaTitleEnglish => "MEDIA_TITLE_ENGLISH",
        MediaTitleEnglishDesc => "MEDIA_TITLE_ENGLISH_DESC",
        MediaTitleNative => "MEDIA_TITLE_NATIVE",
        MediaTitleNativeDesc => "MEDIA_TITLE_NATIVE_DESC",
        MediaPopularity => "MEDIA_POPULARITY",
        MediaPopularityDesc => "MEDIA_POPULARITY_DESC",
    }
}

graphql_enum! {
    /// Score format a user rates in.
    ScoreFormat {
        Point100 => "POINT_100",
        Point10Decimal => "POINT_10_DECIMAL",
        Point10 => "POINT_10",
        Point5 => "POINT_5",
        Point3 => "POINT_3",
    }
}

graphql_enum! {
    /// Preferred title language.
    UserTitleLanguage {
        Romaji => "ROMAJI",
        English => "ENGLISH",
        Native => "NATIVE",
        RomajiStylised => "ROMAJI_STYLISED",
        EnglishStylised => "ENGLISH_STYLISED",
        NativeStylised => "NATIVE_STYLISED",
    }
}
