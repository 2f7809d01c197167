//! AniList command-line client.
//!
//! Every subcommand prints the response envelope as pretty JSON on stdout;
//! logs go to stderr.

use anilist::{
    AnilistClient, ClientConfig, FetchPolicy, MediaFilters, MediaFormat, MediaListSort,
    MediaListStatus, MediaSeason, MediaSort, MediaSource, MediaStatus, MediaType, Response,
    SaveMediaListEntryParams, SearchMediaParams, SearchMediaSmallParams, SearchUsersParams,
    UserMediaListParams, UserSort,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use shared::Config;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// AniList access token (overrides the config file)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable the in-memory cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search media with full details
    SearchMedia {
        #[command(flatten)]
        filters: MediaFilterArgs,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        policy: PolicyArg,
    },
    /// Search media, summary fields only
    SearchMediaSmall {
        #[command(flatten)]
        filters: MediaFilterArgs,
        #[command(flatten)]
        policy: PolicyArg,
    },
    /// Fetch a media item by id
    Media {
        id: i32,
        #[arg(long = "type", default_value = "anime")]
        media_type: MediaType,
        #[command(flatten)]
        policy: PolicyArg,
    },
    /// Search users
    SearchUsers {
        search: Option<String>,
        #[arg(long, value_delimiter = ',')]
        sort: Vec<UserSort>,
        #[arg(long)]
        moderator: Option<bool>,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        policy: PolicyArg,
    },
    /// Fetch a user by id
    User {
        id: i32,
        #[command(flatten)]
        policy: PolicyArg,
    },
    /// Fetch the user owning the token
    Viewer {
        #[command(flatten)]
        policy: PolicyArg,
    },
    /// Fetch a user's media list
    List {
        user_id: i32,
        #[arg(long = "type", default_value = "anime")]
        media_type: MediaType,
        #[arg(long)]
        status: Option<MediaListStatus>,
        #[arg(long, value_delimiter = ',')]
        sort: Vec<MediaListSort>,
        #[arg(long, value_delimiter = ',')]
        media_id_in: Vec<i32>,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        policy: PolicyArg,
    },
    /// Create or update a list entry
    SaveEntry {
        /// Entry id to update
        #[arg(long, required_unless_present = "media_id")]
        id: Option<i32>,
        /// Media id to create an entry for
        #[arg(long)]
        media_id: Option<i32>,
        #[arg(long)]
        status: Option<MediaListStatus>,
        #[arg(long)]
        score: Option<f64>,
        #[arg(long)]
        progress: Option<i32>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        hidden: Option<bool>,
    },
    /// Delete a list entry
    DeleteEntry { id: i32 },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct MediaFilterArgs {
    /// Free-text search
    search: Option<String>,
    #[arg(long = "type", default_value = "anime")]
    media_type: MediaType,
    #[arg(long, value_delimiter = ',')]
    sort: Vec<MediaSort>,
    #[arg(long)]
    season: Option<MediaSeason>,
    #[arg(long)]
    season_year: Option<i32>,
    #[arg(long)]
    format: Option<MediaFormat>,
    #[arg(long)]
    status: Option<MediaStatus>,
    #[arg(long, value_delimiter = ',')]
    format_in: Vec<MediaFormat>,
    #[arg(long, value_delimiter = ',')]
    status_in: Vec<MediaStatus>,
    #[arg(long, value_delimiter = ',')]
    source_in: Vec<MediaSource>,
    #[arg(long, value_delimiter = ',')]
    id_in: Vec<i32>,
    #[arg(long, value_delimiter = ',')]
    id_not_in: Vec<i32>,
    #[arg(long)]
    on_list: Option<bool>,
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long)]
    page: Option<i32>,
    #[arg(long)]
    per_page: Option<i32>,
}

#[derive(Args, Debug)]
struct PolicyArg {
    /// Fetch policy: cache-first, cache-only, network-first, network-only
    #[arg(long)]
    policy: Option<FetchPolicy>,
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

impl From<MediaFilterArgs> for MediaFilters {
    fn from(args: MediaFilterArgs) -> Self {
        Self {
            search: args.search,
            media_type: args.media_type,
            sort: non_empty(args.sort),
            season: args.season,
            season_year: args.season_year,
            format: args.format,
            status: args.status,
            format_in: non_empty(args.format_in),
            status_in: non_empty(args.status_in),
            source_in: non_empty(args.source_in),
            id_in: non_empty(args.id_in),
            id_not_in: non_empty(args.id_not_in),
            on_list: args.on_list,
        }
    }
}

/// Print the envelope, failing the process on transport errors.
fn print_response<T: Serialize>(response: &Response<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(response).context("Failed to serialize response")?;
    println!("{json}");

    for message in response.error_messages() {
        warn!(error = message, "Server reported an error");
    }
    if let Some(exception) = &response.exception {
        bail!("Request failed: {exception}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_exists = cli.config.exists();
    let mut config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let mut log_config = shared::LogConfig::from_settings("anilist", &config.logging);
    if cli.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    if config_exists {
        debug!(config_file = %cli.config.display(), "Loaded configuration");
    } else {
        warn!(config_file = %cli.config.display(), "Config file not found, using defaults");
    }

    if let Command::InitConfig { force } = cli.command {
        if config_exists && !force {
            bail!(
                "{} already exists, pass --force to overwrite",
                cli.config.display()
            );
        }
        if let Some(token) = cli.token {
            config.anilist.token = Some(token);
        }
        return config
            .save(&cli.config)
            .with_context(|| format!("Failed to write config to {}", cli.config.display()));
    }

    let mut client_config = ClientConfig::from(&config.anilist);
    if let Some(token) = cli.token {
        client_config.token = Some(token);
    }
    if cli.no_cache {
        client_config.memory_cache_size_mb = Some(0);
    }
    let client = AnilistClient::new(client_config).context("Failed to create AniList client")?;

    match cli.command {
        Command::SearchMedia {
            filters,
            page,
            policy,
        } => {
            let params = SearchMediaParams {
                filters: filters.into(),
                page: page.page,
                per_page: page.per_page,
                fetch_policy: policy.policy,
            };
            print_response(&client.search_media(&params).await)
        }
        Command::SearchMediaSmall { filters, policy } => {
            let params = SearchMediaSmallParams {
                filters: filters.into(),
                fetch_policy: policy.policy,
            };
            print_response(&client.search_media_small(&params).await)
        }
        Command::Media {
            id,
            media_type,
            policy,
        } => print_response(&client.fetch_media_by_id(id, media_type, policy.policy).await),
        Command::SearchUsers {
            search,
            sort,
            moderator,
            page,
            policy,
        } => {
            let params = SearchUsersParams {
                search,
                sort: non_empty(sort),
                is_moderator: moderator,
                page: page.page,
                per_page: page.per_page,
                fetch_policy: policy.policy,
            };
            print_response(&client.search_users(&params).await)
        }
        Command::User { id, policy } => {
            print_response(&client.fetch_user_by_id(id, policy.policy).await)
        }
        Command::Viewer { policy } => {
            if !client.is_authenticated() {
                warn!("No token configured, the viewer query will be rejected");
            }
            print_response(&client.fetch_viewer(policy.policy).await)
        }
        Command::List {
            user_id,
            media_type,
            status,
            sort,
            media_id_in,
            page,
            policy,
        } => {
            let params = UserMediaListParams {
                user_id,
                media_type,
                sort: non_empty(sort),
                status,
                media_id_in: non_empty(media_id_in),
                page: page.page,
                per_page: page.per_page,
                fetch_policy: policy.policy,
            };
            print_response(&client.fetch_user_media_list(&params).await)
        }
        Command::SaveEntry {
            id,
            media_id,
            status,
            score,
            progress,
            notes,
            hidden,
        } => {
            let params = SaveMediaListEntryParams {
                id,
                media_id,
                status,
                score,
                progress,
                notes,
                hidden_from_status_lists: hidden,
                ..SaveMediaListEntryParams::default()
            };
            info!(id = ?id, media_id = ?media_id, "Saving list entry");
            print_response(&client.save_media_list_entry(&params).await)
        }
        Command::DeleteEntry { id } => {
            info!(id, "Deleting list entry");
            print_response(&client.delete_media_list_entry(id).await)
        }
        Command::InitConfig { .. } => Ok(()),
    }
}
