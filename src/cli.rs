use std::path::PathBuf;

use clap::Parser;
use log::info;
use spoty2tube::{
    clients::{
        SpotifyClient,
        errors::Result,
        spotify::SpotifySettings,
        youtube::YtDlpOptions,
    },
    syncer::{self, MAX_RECENT_LIMIT},
};

#[derive(Parser, Debug)]
#[command(name = "spoty2tube")]
#[command(version, about = "Download your Spotify library as tagged MP3 files", long_about = None)]
struct Cli {
    /// Spotify application client id
    #[arg(long, env = "RSPOTIFY_CLIENT_ID", hide_env_values = true)]
    client_id: String,

    /// Spotify application client secret
    #[arg(long, env = "RSPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Redirect URI registered for the Spotify application
    #[arg(long, env = "RSPOTIFY_REDIRECT_URI", default_value = "http://localhost:8080")]
    redirect_uri: String,

    /// Directory the library is downloaded into
    #[arg(long, env = "SPOTY2TUBE_BASE_PATH", default_value = "./spotify_downloads")]
    base_path: PathBuf,

    /// Number of recently played tracks to fetch
    #[arg(long, default_value_t = MAX_RECENT_LIMIT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RECENT_LIMIT)))]
    recent_limit: u32,

    /// Audio quality passed to yt-dlp (VBR 0-10 or a bitrate such as 192K)
    #[arg(long, default_value = "192K")]
    audio_quality: String,

    /// Path to the yt-dlp executable, looked up in PATH when omitted
    #[arg(long = "yt-dlp", env = "SPOTY2TUBE_YT_DLP")]
    yt_dlp: Option<PathBuf>,

    /// Do not download recently played tracks
    #[arg(long)]
    no_recent: bool,

    /// Do not download liked songs
    #[arg(long)]
    no_liked: bool,

    /// Do not download playlists
    #[arg(long)]
    no_playlists: bool,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    info!("Authorizing Spotify client ...");
    let spotify = SpotifyClient::from_settings(&SpotifySettings {
        client_id: cli.client_id,
        client_secret: cli.client_secret,
        redirect_uri: cli.redirect_uri,
    });
    // CLI prompt may be shown here on first run
    spotify.authorize_client().await?;

    info!("Building config ...");
    let config = syncer::ConfigBuilder::new(cli.base_path)
        .library(spotify)
        .yt_dlp_binary(cli.yt_dlp)
        .downloader_options(YtDlpOptions {
            audio_quality: cli.audio_quality,
            ..YtDlpOptions::default()
        })
        .recent_limit(cli.recent_limit)
        .include_recent(!cli.no_recent)
        .include_liked(!cli.no_liked)
        .include_playlists(!cli.no_playlists)
        .build()?;

    let report = syncer::Syncer::new(config).sync().await?;
    println!("\n{report}");
    Ok(())
}
