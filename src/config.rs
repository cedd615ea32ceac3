use anyhow::{Context, Result};

/// Spotify application credentials loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    let client_id = std::env::var("SPOTIFY_CLIENT_ID").context("SPOTIFY_CLIENT_ID is not set")?;
    let client_secret =
        std::env::var("SPOTIFY_CLIENT_SECRET").context("SPOTIFY_CLIENT_SECRET is not set")?;
    let redirect_uri =
        std::env::var("SPOTIFY_REDIRECT_URI").context("SPOTIFY_REDIRECT_URI is not set")?;
    Ok(Config {
        client_id,
        client_secret,
        redirect_uri,
    })
}
