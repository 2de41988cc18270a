//! Rendering of shows and episodes onto UI surfaces
//!
//! Surfaces are the handles the renderers and the interaction controller draw
//! on. They are injected at construction time, which lets the terminal
//! implementations in [`terminal`] be swapped for in-memory doubles.

pub mod terminal;

use crate::config::EpisodePanelMode;
use crate::metadata_retrieval::{Episode, Show, ShowId};
use std::cell::RefCell;
use std::rc::Rc;

/// Label of the per-entry action that expands a show into its episodes.
pub const EPISODES_ACTION_LABEL: &str = "Episodes";

/// One displayed show in the show list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowEntry {
    /// Identifier of the show, kept as entry metadata and never displayed
    pub show_id: ShowId,
    /// Poster URL
    pub image: String,
    /// Show name
    pub name: String,
    /// Summary text as delivered by the catalog
    pub summary: String,
    /// Label of the action that requests this show's episodes
    pub action_label: &'static str,
}

impl From<&Show> for ShowEntry {
    fn from(show: &Show) -> Self {
        Self {
            show_id: show.id,
            image: show.image.clone(),
            name: show.name.clone(),
            summary: show.summary.clone(),
            action_label: EPISODES_ACTION_LABEL,
        }
    }
}

/// Container displaying the current list of show entries.
pub trait ShowListSurface {
    /// Discards every displayed entry and displays `entries` in order.
    fn replace_entries(&mut self, entries: Vec<ShowEntry>);

    /// Returns the show id attached to the entry at `index`, if it exists.
    fn entry_show_id(&self, index: usize) -> Option<ShowId>;

    /// Number of displayed entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Panel listing episode lines, hidden until episodes are rendered.
pub trait EpisodePanelSurface {
    /// Removes every line from the panel.
    fn clear(&mut self);

    /// Appends one line to the end of the panel.
    fn append_line(&mut self, line: String);

    /// Shows or hides the panel without touching its lines.
    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;
}

/// Place where pipeline failures are reported to the user.
pub trait NoticeSurface {
    fn report(&mut self, message: &str);
}

pub type ShowListHandle = Rc<RefCell<dyn ShowListSurface>>;
pub type EpisodePanelHandle = Rc<RefCell<dyn EpisodePanelSurface>>;
pub type NoticeHandle = Rc<RefCell<dyn NoticeSurface>>;

/// Renders search results onto the show list surface.
pub struct ShowListRenderer {
    surface: ShowListHandle,
}

impl ShowListRenderer {
    pub fn new(surface: ShowListHandle) -> Self {
        Self { surface }
    }

    /// Replaces the displayed show list with one entry per show, in order.
    ///
    /// This is a full replace; rendering an empty slice empties the list.
    pub fn render_shows(&self, shows: &[Show]) {
        let entries = shows.iter().map(ShowEntry::from).collect();
        self.surface.borrow_mut().replace_entries(entries);
    }
}

/// Renders episode listings onto the episode panel.
pub struct EpisodeListRenderer {
    surface: EpisodePanelHandle,
    mode: EpisodePanelMode,
}

impl EpisodeListRenderer {
    pub fn new(surface: EpisodePanelHandle, mode: EpisodePanelMode) -> Self {
        Self { surface, mode }
    }

    /// Writes one line per episode, in order, then reveals the panel.
    ///
    /// In [`EpisodePanelMode::Replace`] the panel is cleared first; in
    /// [`EpisodePanelMode::Accumulate`] lines are appended to prior content.
    pub fn render_episodes(&self, episodes: &[Episode]) {
        let mut panel = self.surface.borrow_mut();

        if self.mode == EpisodePanelMode::Replace {
            panel.clear();
        }
        for episode in episodes {
            panel.append_line(format_episode_line(episode));
        }
        panel.set_visible(true);
    }

    /// Hides the panel, keeping its lines.
    pub fn hide(&self) {
        self.surface.borrow_mut().set_visible(false);
    }
}

/// Formats the display line of a single episode.
pub fn format_episode_line(episode: &Episode) -> String {
    format!(
        "{} (season {}, number {})",
        episode.name, episode.season, episode.number
    )
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory surfaces standing in for the terminal in unit tests.

    use super::*;

    #[derive(Debug, Default)]
    pub struct MemoryShowList {
        pub entries: Vec<ShowEntry>,
        pub replace_count: usize,
    }

    impl ShowListSurface for MemoryShowList {
        fn replace_entries(&mut self, entries: Vec<ShowEntry>) {
            self.entries = entries;
            self.replace_count += 1;
        }

        fn entry_show_id(&self, index: usize) -> Option<ShowId> {
            self.entries.get(index).map(|entry| entry.show_id)
        }

        fn len(&self) -> usize {
            self.entries.len()
        }
    }

    #[derive(Debug, Default)]
    pub struct MemoryEpisodePanel {
        pub lines: Vec<String>,
        pub visible: bool,
    }

    impl EpisodePanelSurface for MemoryEpisodePanel {
        fn clear(&mut self) {
            self.lines.clear();
        }

        fn append_line(&mut self, line: String) {
            self.lines.push(line);
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn is_visible(&self) -> bool {
            self.visible
        }
    }

    #[derive(Debug, Default)]
    pub struct MemoryNotices {
        pub messages: Vec<String>,
    }

    impl NoticeSurface for MemoryNotices {
        fn report(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }
}
