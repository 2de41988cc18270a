//! Interaction controller
//!
//! Binds the two user events, submitting a search and asking for a show's
//! episodes, to their fetch and render pipelines. Each pipeline runs as its own
//! local task, so the controller must be driven from within a
//! [`tokio::task::LocalSet`].

use crate::config::EpisodePanelMode;
use crate::metadata_retrieval::{EpisodeLookupService, ShowId, ShowSearchService};
use crate::render::{
    EpisodeListRenderer, EpisodePanelHandle, NoticeHandle, ShowListHandle, ShowListRenderer,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Events raised by the user interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The search form was submitted with the given free-text term
    SearchSubmitted { term: String },
    /// The "Episodes" action of the show entry at `entry` was triggered
    EpisodesRequested { entry: usize },
}

type Handler = Rc<dyn Fn(&UiEvent)>;

/// Delivers UI events to registered handlers.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<(u64, Handler)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Registers a handler for all subsequent events.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// disposed or dropped.
    pub fn register(self: &Rc<Self>, handler: impl Fn(&UiEvent) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));

        Subscription {
            bus: Rc::downgrade(self),
            id,
        }
    }

    /// Delivers `event` to every registered handler, in registration order.
    pub fn emit(&self, event: &UiEvent) {
        // Handlers may register or dispose while being called
        let handlers: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    fn unregister(&self, id: u64) {
        self.handlers.borrow_mut().retain(|(handler_id, _)| *handler_id != id);
    }
}

/// Registration of a handler on an [`EventBus`]; detaches it when dropped.
#[must_use = "dropping a subscription detaches its handler immediately"]
pub struct Subscription {
    bus: Weak<EventBus>,
    id: u64,
}

impl Subscription {
    /// Detaches the handler from the bus.
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unregister(self.id);
        }
    }
}

/// Observable state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing has been displayed yet
    Idle,
    /// A show search is in flight
    Searching,
    /// A show list is displayed and no fetch is in flight
    ShowingResults,
    /// At least one episode lookup is in flight
    FetchingEpisodes,
}

/// The UI handles a controller draws on.
#[derive(Clone)]
pub struct Surfaces {
    pub show_list: ShowListHandle,
    pub episode_panel: EpisodePanelHandle,
    pub notices: NoticeHandle,
}

/// Sequence numbers of the most recently dispatched fetch of each kind.
#[derive(Debug, Default)]
struct Generations {
    search: Cell<u64>,
    episodes: Cell<u64>,
}

impl Generations {
    fn advance(counter: &Cell<u64>) -> u64 {
        let next = counter.get() + 1;
        counter.set(next);
        next
    }
}

/// Drives the search and episode pipelines in response to UI events.
pub struct InteractionController<S> {
    service: S,
    show_list: ShowListHandle,
    notices: NoticeHandle,
    show_renderer: ShowListRenderer,
    episode_renderer: EpisodeListRenderer,
    panel_mode: EpisodePanelMode,
    generations: Generations,
    searches_in_flight: Cell<usize>,
    lookups_in_flight: Cell<usize>,
    has_results: Cell<bool>,
    state: Cell<ControllerState>,
    settled: Notify,
}

impl<S> InteractionController<S>
where
    S: ShowSearchService + EpisodeLookupService + 'static,
{
    pub fn new(service: S, surfaces: Surfaces, panel_mode: EpisodePanelMode) -> Rc<Self> {
        Rc::new(Self {
            service,
            show_renderer: ShowListRenderer::new(surfaces.show_list.clone()),
            episode_renderer: EpisodeListRenderer::new(surfaces.episode_panel, panel_mode),
            panel_mode,
            show_list: surfaces.show_list,
            notices: surfaces.notices,
            generations: Generations::default(),
            searches_in_flight: Cell::new(0),
            lookups_in_flight: Cell::new(0),
            has_results: Cell::new(false),
            state: Cell::new(ControllerState::Idle),
            settled: Notify::new(),
        })
    }

    pub fn state(&self) -> ControllerState {
        self.state.get()
    }

    /// Completes once no search or episode lookup is in flight.
    pub async fn settled(&self) {
        loop {
            // Registered before the check so a completion in between is not missed
            let notified = self.settled.notified();
            if !self.is_busy() {
                return;
            }
            notified.await;
        }
    }

    fn is_busy(&self) -> bool {
        self.searches_in_flight.get() > 0 || self.lookups_in_flight.get() > 0
    }

    /// Subscribes the controller to `bus`; dispose the subscription to detach.
    pub fn attach(self: &Rc<Self>, bus: &Rc<EventBus>) -> Subscription {
        let controller = Rc::clone(self);
        bus.register(move |event| {
            // Pipelines run detached; their outcome lands on the surfaces
            let _ = controller.handle_event(event);
        })
    }

    /// Dispatches a single UI event, returning the spawned pipeline if any.
    pub fn handle_event(self: &Rc<Self>, event: &UiEvent) -> Option<JoinHandle<()>> {
        match event {
            UiEvent::SearchSubmitted { term } => Some(self.submit_search(term.clone())),
            UiEvent::EpisodesRequested { entry } => self.request_episodes(*entry),
        }
    }

    /// Starts a show search for `term`.
    ///
    /// The episode panel is hidden before this returns, independent of the
    /// outcome of the search. Episode lookups still in flight are superseded
    /// and will not render.
    pub fn submit_search(self: &Rc<Self>, term: impl Into<String>) -> JoinHandle<()> {
        let term = term.into();

        self.episode_renderer.hide();
        let generation = Generations::advance(&self.generations.search);
        Generations::advance(&self.generations.episodes);

        self.searches_in_flight.set(self.searches_in_flight.get() + 1);
        self.settle_state();

        tracing::debug!(term = %term, generation, "Search submitted");
        tokio::task::spawn_local(Rc::clone(self).run_search(term, generation))
    }

    /// Starts an episode lookup for the show displayed at `entry`.
    ///
    /// In [`EpisodePanelMode::Replace`] only the most recent lookup renders;
    /// in [`EpisodePanelMode::Accumulate`] every lookup issued since the last
    /// search renders. Returns `None` and reports a notice if no such entry is
    /// displayed.
    pub fn request_episodes(self: &Rc<Self>, entry: usize) -> Option<JoinHandle<()>> {
        let show_id = self.show_list.borrow().entry_show_id(entry);
        let Some(show_id) = show_id else {
            tracing::warn!(entry, "Episodes requested for an entry that is not displayed");
            self.notices
                .borrow_mut()
                .report(&format!("There is no show entry #{}", entry + 1));
            return None;
        };

        let generation = match self.panel_mode {
            EpisodePanelMode::Replace => Generations::advance(&self.generations.episodes),
            EpisodePanelMode::Accumulate => self.generations.episodes.get(),
        };
        self.lookups_in_flight.set(self.lookups_in_flight.get() + 1);
        self.settle_state();

        tracing::debug!(%show_id, generation, "Episodes requested");
        Some(tokio::task::spawn_local(
            Rc::clone(self).run_episode_lookup(show_id, generation),
        ))
    }

    async fn run_search(self: Rc<Self>, term: String, generation: u64) {
        let result = self.service.search_shows(&term).await;
        self.searches_in_flight.set(self.searches_in_flight.get() - 1);

        if generation != self.generations.search.get() {
            match &result {
                Ok(shows) => tracing::debug!(
                    term = %term,
                    generation,
                    count = shows.len(),
                    "Discarding results of a superseded search"
                ),
                Err(e) => tracing::warn!(term = %term, generation, error = %e, "Superseded search failed"),
            }
        } else {
            match result {
                Ok(shows) => {
                    self.show_renderer.render_shows(&shows);
                    self.has_results.set(true);
                }
                Err(e) => {
                    tracing::warn!(term = %term, error = %e, "Show search failed");
                    self.notices
                        .borrow_mut()
                        .report(&format!("Searching for '{}' failed: {}", term, e));
                }
            }
        }

        self.settle_state();
    }

    async fn run_episode_lookup(self: Rc<Self>, show_id: ShowId, generation: u64) {
        let result = self.service.lookup_episodes(show_id).await;
        self.lookups_in_flight.set(self.lookups_in_flight.get() - 1);

        if generation != self.generations.episodes.get() {
            match &result {
                Ok(episodes) => tracing::debug!(
                    %show_id,
                    generation,
                    count = episodes.len(),
                    "Discarding episodes of a superseded lookup"
                ),
                Err(e) => {
                    tracing::warn!(%show_id, generation, error = %e, "Superseded episode lookup failed")
                }
            }
        } else {
            match result {
                Ok(episodes) => self.episode_renderer.render_episodes(&episodes),
                Err(e) => {
                    tracing::warn!(%show_id, error = %e, "Episode lookup failed");
                    self.notices
                        .borrow_mut()
                        .report(&format!("Loading episodes failed: {}", e));
                }
            }
        }

        self.settle_state();
    }

    fn settle_state(&self) {
        let state = if self.searches_in_flight.get() > 0 {
            ControllerState::Searching
        } else if self.lookups_in_flight.get() > 0 {
            ControllerState::FetchingEpisodes
        } else if self.has_results.get() {
            ControllerState::ShowingResults
        } else {
            ControllerState::Idle
        };
        self.state.set(state);

        if !self.is_busy() {
            self.settled.notify_waiters();
        }
    }
}
