//! Interactive terminal session
//!
//! Reads commands line by line and turns them into UI events. Input is read
//! asynchronously, so pipelines keep running while the user types.

use crate::controller::{EventBus, InteractionController, UiEvent};
use crate::metadata_retrieval::{EpisodeLookupService, ShowSearchService};
use std::io::{self, Write};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Usage text printed by `help` and after unknown commands.
pub const USAGE: &str = "\
Commands:
  search <term>   (or: s <term>, /<term>)  search shows by keyword
  episodes <n>    (or: e <n>)              list episodes of show entry n
  help                                     show this help
  quit            (or: exit, q)            leave";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the search form with the given term
    Search(String),
    /// Trigger the episodes action of the entry at this zero-based index
    Episodes(usize),
    Help,
    Quit,
}

/// Errors that can occur while parsing a command line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The episodes command was given something other than an entry number
    #[error("Expected a show entry number starting at 1, got '{0}'")]
    InvalidEntry(String),

    /// The command word is not known
    #[error("Unknown command '{0}'")]
    Unknown(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(term) = line.strip_prefix('/') {
        return Ok(Some(Command::Search(term.trim().to_string())));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "episodes" | "e" => {
            let entry = rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| CommandError::InvalidEntry(rest.to_string()))?;
            Command::Episodes(entry)
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

/// Runs the session until `quit` or end of input.
///
/// Each search or episodes command is emitted on `bus`; whatever is attached
/// to the bus runs the pipelines. Usage hints and parse errors go to `console`.
/// On end of input the session waits for pipelines still in flight, so their
/// results are not lost.
pub async fn run_session<R, W, S>(
    input: R,
    mut console: W,
    bus: &EventBus,
    controller: &InteractionController<S>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: ShowSearchService + EpisodeLookupService + 'static,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Search(term))) => bus.emit(&UiEvent::SearchSubmitted { term }),
            Ok(Some(Command::Episodes(entry))) => bus.emit(&UiEvent::EpisodesRequested { entry }),
            Ok(Some(Command::Help)) => writeln!(console, "{}", USAGE)?,
            Ok(Some(Command::Quit)) => {
                tracing::debug!("Session ended by user");
                return Ok(());
            }
            Err(e) => {
                writeln!(console, "{}", e)?;
                writeln!(console, "{}", USAGE)?;
            }
        }
    }

    tracing::debug!("End of input, waiting for pipelines in flight");
    controller.settled().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EpisodePanelMode;
    use crate::controller::{ControllerState, Surfaces};
    use crate::metadata_retrieval::{Episode, MetadataRetrievalError, Show, ShowId};
    use crate::render::testing::{MemoryEpisodePanel, MemoryNotices, MemoryShowList};
    use crate::render::{EpisodePanelSurface, ShowListSurface};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[test]
    fn test_parse_search() {
        assert_eq!(
            parse_command("search the wire").unwrap(),
            Some(Command::Search("the wire".to_string()))
        );
        assert_eq!(
            parse_command("  s   batman  ").unwrap(),
            Some(Command::Search("batman".to_string()))
        );
        assert_eq!(
            parse_command("/law & order").unwrap(),
            Some(Command::Search("law & order".to_string()))
        );
        assert_eq!(parse_command("search").unwrap(), Some(Command::Search(String::new())));
    }

    #[test]
    fn test_parse_episodes() {
        assert_eq!(parse_command("episodes 1").unwrap(), Some(Command::Episodes(0)));
        assert_eq!(parse_command("E 12").unwrap(), Some(Command::Episodes(11)));
        assert_eq!(
            parse_command("e 0"),
            Err(CommandError::InvalidEntry("0".to_string()))
        );
        assert_eq!(
            parse_command("e two"),
            Err(CommandError::InvalidEntry("two".to_string()))
        );
        assert_eq!(parse_command("e"), Err(CommandError::InvalidEntry(String::new())));
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("help").unwrap(), Some(Command::Help));
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
        assert_eq!(
            parse_command("play 1"),
            Err(CommandError::Unknown("play".to_string()))
        );
    }

    /// Service double answering every request immediately.
    struct StaticCatalog;

    impl ShowSearchService for StaticCatalog {
        async fn search_shows(&self, term: &str) -> Result<Vec<Show>, MetadataRetrievalError> {
            Ok(vec![
                Show {
                    id: ShowId(1),
                    name: format!("{} one", term),
                    summary: String::new(),
                    image: "http://img/1.jpg".to_string(),
                },
                Show {
                    id: ShowId(42),
                    name: format!("{} two", term),
                    summary: String::new(),
                    image: "http://img/42.jpg".to_string(),
                },
            ])
        }
    }

    impl EpisodeLookupService for StaticCatalog {
        async fn lookup_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, MetadataRetrievalError> {
            Ok(vec![Episode {
                id: show_id.0 * 100,
                name: format!("Pilot of {}", show_id),
                season: 1,
                number: 1,
            }])
        }
    }

    #[tokio::test]
    async fn test_session_drives_pipelines() {
        LocalSet::new()
            .run_until(async {
                let show_list = Rc::new(RefCell::new(MemoryShowList::default()));
                let panel = Rc::new(RefCell::new(MemoryEpisodePanel::default()));
                let notices = Rc::new(RefCell::new(MemoryNotices::default()));
                let controller = InteractionController::new(
                    StaticCatalog,
                    Surfaces {
                        show_list: show_list.clone(),
                        episode_panel: panel.clone(),
                        notices: notices.clone(),
                    },
                    EpisodePanelMode::Replace,
                );
                let bus = EventBus::new();
                let _subscription = controller.attach(&bus);

                let mut console = Vec::new();
                run_session(&b"s batman\n"[..], &mut console, &bus, &controller)
                    .await
                    .unwrap();
                assert_eq!(show_list.borrow().len(), 2);

                run_session(&b"bogus\ne 2\n"[..], &mut console, &bus, &controller)
                    .await
                    .unwrap();

                assert_eq!(panel.borrow().lines, vec!["Pilot of 42 (season 1, number 1)".to_string()]);
                assert!(panel.borrow().is_visible());
                assert!(notices.borrow().messages.is_empty());

                let console = String::from_utf8(console).unwrap();
                assert!(console.contains("Unknown command 'bogus'"));
                assert!(console.contains("Commands:"));
            })
            .await;
    }

    #[tokio::test]
    async fn test_session_quit_stops_reading() {
        LocalSet::new()
            .run_until(async {
                let show_list = Rc::new(RefCell::new(MemoryShowList::default()));
                let controller = InteractionController::new(
                    StaticCatalog,
                    Surfaces {
                        show_list: show_list.clone(),
                        episode_panel: Rc::new(RefCell::new(MemoryEpisodePanel::default())),
                        notices: Rc::new(RefCell::new(MemoryNotices::default())),
                    },
                    EpisodePanelMode::Replace,
                );
                let bus = EventBus::new();
                let _subscription = controller.attach(&bus);

                run_session(&b"quit\ns batman\n"[..], Vec::new(), &bus, &controller)
                    .await
                    .unwrap();

                tokio::task::yield_now().await;
                assert_eq!(show_list.borrow().replace_count, 0);
                assert_eq!(controller.state(), ControllerState::Idle);
            })
            .await;
    }
}
