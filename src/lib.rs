//! showfinder - Search TV shows and expand them into their episode listings
//!
//! This library provides the fetch, normalize and render pipelines behind the
//! `showfinder` terminal session: searching the TVMaze catalog by keyword,
//! displaying the matches, and listing the episodes of any displayed match.
//!
//! # Examples
//!
//! ```no_run
//! use showfinder::{open_terminal_session, Config};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), showfinder::ShowFinderError> {
//!     let local = tokio::task::LocalSet::new();
//!     local
//!         .run_until(async {
//!             let session = open_terminal_session(&Config::default())?;
//!             session.bus.emit(&showfinder::UiEvent::SearchSubmitted {
//!                 term: "batman".to_string(),
//!             });
//!             Ok::<(), showfinder::ShowFinderError>(())
//!         })
//!         .await
//! }
//! ```

pub mod config;
pub mod controller;
pub mod metadata_retrieval;
pub mod render;
pub mod session;

pub use config::{Config, EpisodePanelMode};
pub use controller::{
    ControllerState, EventBus, InteractionController, Subscription, Surfaces, UiEvent,
};
pub use metadata_retrieval::{
    Episode, EpisodeLookupService, MISSING_IMAGE_URL, MetadataRetrievalError, Show, ShowId,
    ShowSearchService, TvMazeProvider,
};
pub use render::{EpisodeListRenderer, ShowEntry, ShowListRenderer};
pub use session::{Command, CommandError, parse_command, run_session};

use render::terminal::{TerminalEpisodePanel, TerminalNotices, TerminalShowList};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use thiserror::Error;

/// Top-level error type for showfinder operations
#[derive(Debug, Error)]
pub enum ShowFinderError {
    /// Error during metadata retrieval
    #[error("Metadata retrieval error: {0}")]
    MetadataRetrieval(#[from] MetadataRetrievalError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A wired-up terminal session: controller attached to its event bus.
pub struct TerminalSession {
    pub bus: Rc<EventBus>,
    pub controller: Rc<InteractionController<TvMazeProvider>>,
    /// Keeps the controller attached; dropping it detaches the controller
    pub subscription: Subscription,
}

/// Builds the TVMaze provider, the terminal surfaces and the controller, and
/// attaches the controller to a fresh event bus.
///
/// Show list and episode panel print to stdout, notices to stderr.
pub fn open_terminal_session(config: &Config) -> Result<TerminalSession, ShowFinderError> {
    let provider = TvMazeProvider::new(config)?;

    let surfaces = Surfaces {
        show_list: Rc::new(RefCell::new(TerminalShowList::new(io::stdout()))),
        episode_panel: Rc::new(RefCell::new(TerminalEpisodePanel::new(io::stdout()))),
        notices: Rc::new(RefCell::new(TerminalNotices::new(io::stderr()))),
    };

    let controller = InteractionController::new(provider, surfaces, config.episode_panel_mode);
    let bus = EventBus::new();
    let subscription = controller.attach(&bus);

    Ok(TerminalSession {
        bus,
        controller,
        subscription,
    })
}
