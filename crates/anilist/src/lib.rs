//! Typed client for the AniList GraphQL API.
//!
//! ```no_run
//! use anilist::{AnilistClient, ClientConfig, MediaFilters, SearchMediaParams};
//!
//! # async fn run() -> Result<(), anilist::ClientError> {
//! let client = AnilistClient::new(ClientConfig::default())?;
//! let response = client
//!     .search_media(&SearchMediaParams::from(MediaFilters::search("Frieren")))
//!     .await;
//! for media in &response.data {
//!     println!("{} {:?}", media.id(), media.title().preferred());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Operations never return `Err`. Each [`Response`] carries the mapped data
//! together with pagination, transport failures (`exception`) and errors
//! reported by the server (`errors`).

pub mod client;
pub mod engine;
pub mod error;
pub mod list;
pub mod media;
pub mod models;
pub mod operations;
pub mod response;
pub mod types;
pub mod user;
pub mod wire;

pub use client::{AnilistClient, AnilistClientBuilder, ClientConfig};
pub use engine::{CacheStats, FetchPolicy, GraphqlEngine, GraphqlEngineBuilder, GraphqlOperation};
pub use error::{ClientError, EngineError, GraphqlError};
pub use list::{SaveMediaListEntryParams, UserMediaListParams};
pub use media::{MediaFilters, SearchMediaParams, SearchMediaSmallParams};
pub use models::{
    AiringEpisode, CoverImage, FuzzyDate, ListEntry, Media, MediaListEntry, MediaSummary,
    MediaTag, MediaTitle, Studio, User, UserAvatar,
};
pub use response::{PageData, Response};
pub use types::*;
pub use user::SearchUsersParams;
