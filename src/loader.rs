// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

//! Incremental loading of a channel listing.
//!
//! [`ChannelLoader`] is the synchronous state machine: it hands out a
//! [`LoadTicket`] for every request it wants made and accepts the result
//! back through [`ChannelLoader::complete`]. A ticket that is no longer the
//! active one is ignored, so a slow answer for an old filter can never touch
//! the list of the current one. [`LoadController`] drives the machine
//! against any [`ChannelSource`].

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::channel::{ChannelFilter, ListedChannel};
use crate::directory::{ChannelQuery, ChannelSource};
use crate::error::FetchError;
use crate::pagination::{Page, PageRequest};

/// Scrolling within this many items of the end triggers the next page.
pub const LOAD_MORE_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    More,
}

/// A request the loader wants made.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    serial: u64,
    pub kind: LoadKind,
    pub query: ChannelQuery,
    token: CancellationToken,
}

impl LoadTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: LoadKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing to do: same filter, guard tripped, or nothing left to load.
    Skipped,
    Loaded { added: usize },
    Failed(String),
    /// A newer filter took over before the response arrived.
    Superseded,
}

#[derive(Debug)]
pub struct ChannelLoader {
    filter: ChannelFilter,
    page_size: usize,
    channels: Vec<ListedChannel>,
    current_page: usize,
    has_more: bool,
    total: usize,
    phase: LoadPhase,
    last_error: Option<LoadFailure>,
    serial: u64,
    active: Option<(u64, CancellationToken)>,
}

impl ChannelLoader {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: ChannelFilter::default(),
            page_size: PageRequest::new(0, page_size).page_size,
            channels: Vec::new(),
            current_page: 0,
            has_more: false,
            total: 0,
            phase: LoadPhase::Idle,
            last_error: None,
            serial: 0,
            active: None,
        }
    }

    pub fn filter(&self) -> &ChannelFilter {
        &self.filter
    }

    pub fn channels(&self) -> &[ListedChannel] {
        &self.channels
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn last_error(&self) -> Option<&LoadFailure> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.active.is_some()
    }

    /// Starts over for `filter`. The previous request is cancelled and the
    /// list cleared right away. Returns `None` when the filter is unchanged
    /// (unless `force`) or selects nothing.
    pub fn begin_initial(&mut self, filter: ChannelFilter, force: bool) -> Option<LoadTicket> {
        let filter = filter.normalized();
        if !force && filter == self.filter && self.phase != LoadPhase::Idle {
            return None;
        }

        self.cancel();
        self.filter = filter;
        self.channels.clear();
        self.current_page = 0;
        self.has_more = false;
        self.total = 0;
        self.last_error = None;

        if !self.filter.is_browsable() {
            debug!("Filter {:?} selects nothing, staying idle", self.filter);
            self.phase = LoadPhase::Idle;
            return None;
        }

        self.phase = LoadPhase::LoadingInitial;
        Some(self.issue(LoadKind::Initial, 0))
    }

    /// Next page, if there is one and nothing else is in flight. Redundant
    /// calls are dropped rather than queued.
    pub fn begin_more(&mut self) -> Option<LoadTicket> {
        if self.phase != LoadPhase::Ready || !self.has_more || self.active.is_some() {
            return None;
        }

        self.phase = LoadPhase::LoadingMore;
        Some(self.issue(LoadKind::More, self.current_page))
    }

    /// Whether the user has scrolled close enough to the end for another page.
    pub fn wants_more(&self, last_visible: usize) -> bool {
        self.phase == LoadPhase::Ready
            && self.has_more
            && self.active.is_none()
            && last_visible.saturating_add(LOAD_MORE_THRESHOLD) >= self.channels.len()
    }

    fn issue(&mut self, kind: LoadKind, page: usize) -> LoadTicket {
        self.serial += 1;
        let token = CancellationToken::new();
        self.active = Some((self.serial, token.clone()));

        debug!(
            "Loader issuing {:?} request #{} for {:?} page {}",
            kind, self.serial, self.filter, page
        );

        LoadTicket {
            serial: self.serial,
            kind,
            query: ChannelQuery::new(self.filter.clone(), PageRequest::new(page, self.page_size)),
            token,
        }
    }

    /// Applies a response. Stale tickets leave every field untouched.
    pub fn complete(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Page<ListedChannel>, FetchError>,
    ) -> LoadOutcome {
        let current = matches!(&self.active, Some((serial, _)) if *serial == ticket.serial);
        if !current || ticket.is_cancelled() {
            debug!("Dropping stale response for request #{}", ticket.serial);
            return LoadOutcome::Superseded;
        }
        self.active = None;
        self.phase = LoadPhase::Ready;

        match result {
            Ok(page) => {
                let added = page.channels.len();
                match ticket.kind {
                    LoadKind::Initial => {
                        self.channels = page.channels;
                        self.current_page = 1;
                    }
                    LoadKind::More => {
                        self.channels.extend(page.channels);
                        self.current_page += 1;
                    }
                }
                self.has_more = page.has_more;
                self.total = page.total;
                self.last_error = None;

                debug!(
                    "Loaded {} channels ({} of {}), has_more={}",
                    added,
                    self.channels.len(),
                    self.total,
                    self.has_more
                );
                LoadOutcome::Loaded { added }
            }
            Err(e) => {
                let message = e.to_string();
                // A failed first page leaves nothing to continue from.
                if ticket.kind == LoadKind::Initial {
                    self.has_more = false;
                }
                self.last_error = Some(LoadFailure {
                    kind: ticket.kind,
                    message: message.clone(),
                });
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Abandons whatever is in flight.
    pub fn cancel(&mut self) {
        if let Some((_, token)) = self.active.take() {
            token.cancel();
        }
        self.phase = match self.phase {
            LoadPhase::LoadingInitial => LoadPhase::Idle,
            LoadPhase::LoadingMore => LoadPhase::Ready,
            phase => phase,
        };
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        LoaderSnapshot {
            filter: self.filter.clone(),
            channels: self.channels.clone(),
            current_page: self.current_page,
            has_more: self.has_more,
            total: self.total,
            phase: self.phase,
            error: self.last_error.as_ref().map(|e| e.message.clone()),
        }
    }
}

/// Point-in-time copy of the loader for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderSnapshot {
    pub filter: ChannelFilter,
    pub channels: Vec<ListedChannel>,
    pub current_page: usize,
    pub has_more: bool,
    pub total: usize,
    pub phase: LoadPhase,
    pub error: Option<String>,
}

impl LoaderSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::LoadingInitial | LoadPhase::LoadingMore)
    }

    /// Accumulated channels whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&ListedChannel> {
        let query = query.trim().to_lowercase();
        self.channels
            .iter()
            .filter(|c| query.is_empty() || c.channel.name.to_lowercase().contains(&query))
            .collect()
    }
}

/// Drives a [`ChannelLoader`] against a source, one request at a time.
pub struct LoadController<S: ?Sized> {
    source: Arc<S>,
    state: Mutex<ChannelLoader>,
}

impl<S: ChannelSource + ?Sized> LoadController<S> {
    pub fn new(source: Arc<S>, page_size: usize) -> Self {
        Self {
            source,
            state: Mutex::new(ChannelLoader::new(page_size)),
        }
    }

    pub async fn set_filter(&self, filter: ChannelFilter) -> LoadOutcome {
        let ticket = self.state.lock().await.begin_initial(filter, false);
        self.run(ticket).await
    }

    /// Reloads the first page of the current filter.
    pub async fn refresh(&self) -> LoadOutcome {
        let ticket = {
            let mut state = self.state.lock().await;
            let filter = state.filter().clone();
            state.begin_initial(filter, true)
        };
        self.run(ticket).await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        let ticket = self.state.lock().await.begin_more();
        self.run(ticket).await
    }

    pub async fn on_scroll(&self, last_visible: usize) -> LoadOutcome {
        let ticket = {
            let mut state = self.state.lock().await;
            if state.wants_more(last_visible) {
                state.begin_more()
            } else {
                None
            }
        };
        self.run(ticket).await
    }

    pub async fn snapshot(&self) -> LoaderSnapshot {
        self.state.lock().await.snapshot()
    }

    async fn run(&self, ticket: Option<LoadTicket>) -> LoadOutcome {
        let Some(ticket) = ticket else {
            return LoadOutcome::Skipped;
        };

        let result = tokio::select! {
            biased;
            _ = ticket.token().cancelled() => return LoadOutcome::Superseded,
            result = self.source.fetch_page(&ticket.query) => result,
        };

        self.state.lock().await.complete(&ticket, result)
    }
}

impl<S: ?Sized> Drop for LoadController<S> {
    fn drop(&mut self) {
        self.state.get_mut().cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use pretty_assertions::assert_eq;

    fn listed(name: &str) -> ListedChannel {
        ListedChannel::new(Channel::new(name, format!("http://{}", name)), None)
    }

    fn page(names: &[&str], has_more: bool, total: usize) -> Page<ListedChannel> {
        Page {
            channels: names.iter().map(|n| listed(n)).collect(),
            has_more,
            total,
        }
    }

    fn names(loader: &ChannelLoader) -> Vec<&str> {
        loader
            .channels()
            .iter()
            .map(|c| c.channel.name.as_str())
            .collect()
    }

    #[test]
    fn initial_then_more_appends() {
        let mut loader = ChannelLoader::new(2);
        let ticket = loader
            .begin_initial(ChannelFilter::country("France"), false)
            .unwrap();
        assert_eq!(loader.phase(), LoadPhase::LoadingInitial);
        assert_eq!(ticket.query.paging, PageRequest::new(0, 2));

        let outcome = loader.complete(&ticket, Ok(page(&["a", "b"], true, 3)));
        assert_eq!(outcome, LoadOutcome::Loaded { added: 2 });
        assert_eq!(loader.phase(), LoadPhase::Ready);
        assert_eq!(loader.current_page(), 1);

        let more = loader.begin_more().unwrap();
        assert_eq!(more.query.paging, PageRequest::new(1, 2));
        assert_eq!(loader.phase(), LoadPhase::LoadingMore);
        loader.complete(&more, Ok(page(&["c"], false, 3)));

        assert_eq!(names(&loader), vec!["a", "b", "c"]);
        assert_eq!(loader.current_page(), 2);
        assert!(!loader.has_more());
        assert!(loader.begin_more().is_none());
    }

    #[test]
    fn duplicate_more_requests_are_dropped() {
        let mut loader = ChannelLoader::new(1);
        let ticket = loader
            .begin_initial(ChannelFilter::category("news"), false)
            .unwrap();
        loader.complete(&ticket, Ok(page(&["a"], true, 5)));

        assert!(loader.begin_more().is_some());
        assert!(loader.begin_more().is_none());
        assert!(loader.begin_more().is_none());
    }

    #[test]
    fn stale_response_never_mutates_new_filter() {
        let mut loader = ChannelLoader::new(50);
        let france = loader
            .begin_initial(ChannelFilter::country("France"), false)
            .unwrap();
        let spain = loader
            .begin_initial(ChannelFilter::country("Spain"), false)
            .unwrap();
        assert!(france.is_cancelled());

        loader.complete(&spain, Ok(page(&["TVE"], false, 1)));
        let outcome = loader.complete(&france, Ok(page(&["TF1", "France 2"], false, 2)));

        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(names(&loader), vec!["TVE"]);
        assert_eq!(loader.filter(), &ChannelFilter::country("Spain"));
        assert_eq!(loader.total(), 1);
    }

    #[test]
    fn stale_response_while_new_one_pending() {
        let mut loader = ChannelLoader::new(50);
        let france = loader
            .begin_initial(ChannelFilter::country("France"), false)
            .unwrap();
        let _spain = loader
            .begin_initial(ChannelFilter::country("Spain"), false)
            .unwrap();

        let outcome = loader.complete(&france, Err(FetchError::Unavailable("boom".into())));
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(loader.phase(), LoadPhase::LoadingInitial);
        assert!(loader.last_error().is_none());
        assert!(loader.is_loading());
    }

    #[test]
    fn failed_more_keeps_data_and_is_retryable() {
        let mut loader = ChannelLoader::new(2);
        let ticket = loader
            .begin_initial(ChannelFilter::country("Egypt"), false)
            .unwrap();
        loader.complete(&ticket, Ok(page(&["a", "b"], true, 4)));

        let more = loader.begin_more().unwrap();
        let outcome = loader.complete(
            &more,
            Err(FetchError::Status {
                status: 500,
                message: "An internal server error occurred".into(),
            }),
        );

        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(names(&loader), vec!["a", "b"]);
        assert_eq!(loader.phase(), LoadPhase::Ready);
        assert_eq!(loader.current_page(), 1);
        assert_eq!(loader.last_error().unwrap().kind, LoadKind::More);

        let retry = loader.begin_more().unwrap();
        assert_eq!(retry.query.paging.page, 1);
    }

    #[test]
    fn failed_initial_load_can_be_refreshed() {
        let mut loader = ChannelLoader::new(50);
        let filter = ChannelFilter::country("Egypt");
        let ticket = loader.begin_initial(filter.clone(), false).unwrap();
        loader.complete(&ticket, Err(FetchError::Unavailable("down".into())));

        assert_eq!(loader.phase(), LoadPhase::Ready);
        assert!(!loader.has_more());
        assert!(loader.begin_initial(filter.clone(), false).is_none());
        assert!(loader.begin_initial(filter, true).is_some());
        assert!(loader.last_error().is_none());
    }

    #[test]
    fn unbrowsable_filter_goes_idle() {
        let mut loader = ChannelLoader::new(50);
        let ticket = loader
            .begin_initial(ChannelFilter::country("France"), false)
            .unwrap();
        assert!(
            loader
                .begin_initial(ChannelFilter::category("all-channels"), false)
                .is_none()
        );

        assert!(ticket.is_cancelled());
        assert_eq!(loader.phase(), LoadPhase::Idle);
        assert!(loader.channels().is_empty());
        assert!(!loader.is_loading());
    }

    #[test]
    fn scroll_threshold() {
        let mut loader = ChannelLoader::new(10);
        let ticket = loader
            .begin_initial(ChannelFilter::country("France"), false)
            .unwrap();
        let ten: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = ten.iter().map(String::as_str).collect();
        loader.complete(&ticket, Ok(page(&refs, true, 30)));

        assert!(!loader.wants_more(3));
        assert!(loader.wants_more(5));
        assert!(loader.wants_more(9));
    }

    #[test]
    fn snapshot_search_ignores_case() {
        let mut loader = ChannelLoader::new(50);
        let ticket = loader
            .begin_initial(ChannelFilter::category("news"), false)
            .unwrap();
        loader.complete(&ticket, Ok(page(&["BBC News", "CNN", "bbc two"], false, 3)));

        let snapshot = loader.snapshot();
        let hits: Vec<&str> = snapshot
            .search("BBC")
            .iter()
            .map(|c| c.channel.name.as_str())
            .collect();
        assert_eq!(hits, vec!["BBC News", "bbc two"]);
        assert_eq!(snapshot.search("  ").len(), 3);
    }

    #[tokio::test]
    async fn dropping_controller_cancels_pending_request() {
        use crate::catalog::{Catalog, CatalogStore};
        use crate::directory::ChannelDirectory;
        use crate::query::QueryEngine;

        let directory = ChannelDirectory::new(
            Arc::new(CatalogStore::preloaded(Catalog::default())),
            QueryEngine::default(),
        );
        let controller = LoadController::new(Arc::new(directory), 50);

        let ticket = controller
            .state
            .lock()
            .await
            .begin_initial(ChannelFilter::country("France"), false)
            .unwrap();
        assert!(!ticket.token().is_cancelled());

        drop(controller);
        assert!(ticket.token().is_cancelled());
    }
}
