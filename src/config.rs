//! Runtime configuration
//!
//! All settings are supplied on the command line; there are no configuration
//! files and no persisted state.

/// Default TVMaze API location.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// How the episode panel treats content from earlier renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpisodePanelMode {
    /// Clear the panel before writing a new episode listing
    #[default]
    Replace,
    /// Append every listing to whatever the panel already shows
    Accumulate,
}

/// Settings shared by the services and renderers of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the TVMaze API, without trailing path
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Episode panel behavior across repeated renders
    pub episode_panel_mode: EpisodePanelMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            episode_panel_mode: EpisodePanelMode::default(),
        }
    }
}
