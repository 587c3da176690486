//! The search-merge engine.
//!
//! One query box feeds two result sources: a synchronous substring filter
//! over the bundled catalog and a debounced remote AI lookup. Local matches
//! always lead the merged list; the remote result is appended only when its
//! id is not already present locally.
//!
//! ## Lookup lifecycle
//!
//! ```text
//! keystroke ──▶ cancel scheduled timer ──▶ filter catalog (sync)
//!                                              │
//!                     sparse and long enough?  ▼
//!                 ┌── yes ── schedule debounce timer
//!                 ▼
//!           timer elapses ──▶ invoke remote lookup ──▶ response
//!                                                         │
//!                            discarded when the query ◀───┤
//!                            has moved on since then      ▼
//!                                              remote match appended
//! ```
//!
//! Keystrokes cancel scheduled timers; an in-flight network call is never
//! cancelled. Every schedule carries the generation counter current at that
//! moment, and a response whose generation no longer matches is dropped
//! instead of rendered.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::catalog::Catalog;
use crate::history::push_recent;
use crate::models::{PlaceInfo, PlaceRecord};
use crate::store::{HistoryStore, LookupResponse, RemoteLookup, StashStore};

/// Tunables for the search-merge engine. Defaults match the production UI.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Quiet period between the last keystroke and the remote lookup.
    pub debounce: Duration,
    /// Maximum number of local matches kept per query.
    pub local_cap: usize,
    /// Number of records shown while the query is empty.
    pub default_slice: usize,
    /// A remote lookup fires only when fewer local matches than this exist.
    pub sparse_threshold: usize,
    /// Minimum query length, in characters, for a remote lookup.
    pub min_remote_len: usize,
    /// Maximum number of history entries retained on selection.
    pub history_cap: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            debounce: Duration::from_millis(800),
            local_cap: 20,
            default_slice: 24,
            sparse_threshold: 5,
            min_remote_len: 3,
            history_cap: 10,
        }
    }
}

/// One row of the merged suggestion list.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    pub country: String,
    pub region: String,
    pub continent: String,
    /// True when the row came from the remote lookup rather than the catalog.
    pub remote: bool,
}

impl Suggestion {
    pub fn from_catalog(record: &PlaceRecord) -> Self {
        Suggestion::from_record(record, false)
    }

    pub fn from_lookup(info: &PlaceInfo) -> Self {
        Suggestion::from_record(info, true)
    }

    fn from_record(record: &PlaceRecord, remote: bool) -> Self {
        Suggestion {
            id: record.id.clone(),
            name: record.name.clone(),
            country: record.country.clone(),
            region: record.region.clone(),
            continent: record.continent.clone(),
            remote,
        }
    }
}

/// A remote lookup hit held while the search surface stays open. Keeps the
/// full payload so a selection can hand it to the stash.
#[derive(Debug, Clone)]
pub struct RemoteResult {
    pub info: PlaceInfo,
}

impl RemoteResult {
    /// Display row for this hit.
    pub fn suggestion(&self) -> Suggestion {
        Suggestion::from_lookup(&self.info)
    }
}

/// Live state of the search surface for the current query text.
#[derive(Debug, Default)]
pub struct QueryState {
    pub text: String,
    pub local_matches: Vec<Suggestion>,
    pub remote_matches: Vec<RemoteResult>,
    /// True while a remote lookup call is in flight.
    pub pending: bool,
}

enum LookupEvent {
    /// The debounce timer scheduled under `generation` elapsed.
    Elapsed { generation: u64, query: String },
    /// The lookup invoked under `generation` resolved.
    Resolved {
        generation: u64,
        response: Result<LookupResponse>,
    },
}

/// Merge policy for the suggestion list: local matches lead, in catalog
/// order and exactly as filtered, and the remote result is appended only
/// when its id does not collide with a local row.
pub fn merge_suggestions(local: &[Suggestion], remote: Option<&RemoteResult>) -> Vec<Suggestion> {
    let mut merged: Vec<Suggestion> = local.to_vec();
    if let Some(hit) = remote {
        if !merged.iter().any(|s| s.id == hit.info.id) {
            merged.push(hit.suggestion());
        }
    }
    merged
}

/// Merges catalog filtering with a debounced remote lookup behind a single
/// query box, and hands selections off to the history and stash stores.
///
/// The engine spawns short-lived tasks for debounce timers and lookup calls
/// and channels their outcomes back through [`tick`](SearchMerge::tick) /
/// [`settle`](SearchMerge::settle), so all state changes happen on the
/// caller's task. Methods must be called from within a tokio runtime.
pub struct SearchMerge {
    catalog: Arc<Catalog>,
    lookup: Arc<dyn RemoteLookup>,
    history: Arc<dyn HistoryStore>,
    stash: Arc<dyn StashStore>,
    options: SearchOptions,
    state: QueryState,
    open: bool,
    /// Bumped on every text change and open/close. Schedules and responses
    /// carry the value they were created under and are discarded once it no
    /// longer matches.
    generation: u64,
    /// Handle of the scheduled, not-yet-fired debounce timer.
    timer: Option<JoinHandle<()>>,
    /// Generation of the lookup call currently in flight, if any.
    inflight: Option<u64>,
    events_tx: UnboundedSender<LookupEvent>,
    events_rx: UnboundedReceiver<LookupEvent>,
}

impl SearchMerge {
    pub fn new(
        catalog: Arc<Catalog>,
        lookup: Arc<dyn RemoteLookup>,
        history: Arc<dyn HistoryStore>,
        stash: Arc<dyn StashStore>,
        options: SearchOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        SearchMerge {
            catalog,
            lookup,
            history,
            stash,
            options,
            state: QueryState::default(),
            open: false,
            generation: 0,
            timer: None,
            inflight: None,
            events_tx,
            events_rx,
        }
    }

    /// Open the search surface with an empty query. The default catalog
    /// slice becomes the local match list.
    pub fn open(&mut self) {
        self.open = true;
        self.generation = self.generation.wrapping_add(1);
        self.state = QueryState::default();
        self.state.local_matches = self.default_matches();
    }

    /// Close the surface: cancel any scheduled lookup, forget the in-flight
    /// one, and reset the query state. Responses arriving later are ignored.
    pub fn close(&mut self) {
        self.open = false;
        self.generation = self.generation.wrapping_add(1);
        self.cancel_timer();
        self.inflight = None;
        self.state = QueryState::default();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// True while a debounce timer is scheduled but has not fired.
    pub fn lookup_scheduled(&self) -> bool {
        self.timer.is_some()
    }

    /// The merged suggestion list for the current state.
    pub fn results(&self) -> Vec<Suggestion> {
        merge_suggestions(&self.state.local_matches, self.state.remote_matches.first())
    }

    /// Apply a new query text. Filters the catalog synchronously, cancels
    /// any scheduled lookup, and schedules a fresh one when the text is long
    /// enough and the local matches are sparse.
    pub fn on_query_changed(&mut self, text: &str) {
        if !self.open {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.cancel_timer();
        self.state.text = text.to_string();
        self.state.remote_matches.clear();
        if text.is_empty() {
            self.state.local_matches = self.default_matches();
            return;
        }
        self.state.local_matches = self
            .catalog
            .filter(text, self.options.local_cap)
            .into_iter()
            .map(Suggestion::from_catalog)
            .collect();

        let sparse = self.state.local_matches.len() < self.options.sparse_threshold;
        let long_enough = text.chars().count() >= self.options.min_remote_len;
        if !(sparse && long_enough) {
            return;
        }
        let generation = self.generation;
        let query = text.to_string();
        let debounce = self.options.debounce;
        let tx = self.events_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let _ = tx.send(LookupEvent::Elapsed { generation, query });
        }));
    }

    /// Record a selection from the merged list: push the name onto the
    /// recency history, stash the payload when the row came from the remote
    /// lookup, then close the surface. Returns the destination id.
    pub fn select(&mut self, suggestion: &Suggestion) -> Result<String> {
        let current = self.history.get()?;
        let updated = push_recent(&current, &suggestion.name, self.options.history_cap);
        self.history.set(&updated)?;

        if suggestion.remote {
            if let Some(hit) = self
                .state
                .remote_matches
                .iter()
                .find(|r| r.info.id == suggestion.id)
            {
                self.stash.stash(&suggestion.id, &hit.info)?;
            }
        }
        let id = suggestion.id.clone();
        self.close();
        Ok(id)
    }

    /// Drop every entry from the persisted history.
    pub fn clear_history(&self) -> Result<()> {
        self.history.clear()
    }

    /// Wait for the next timer or lookup event and apply it. Returns false
    /// once nothing is scheduled or in flight.
    pub async fn tick(&mut self) -> bool {
        if self.timer.is_none() && self.inflight.is_none() {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply every event already queued, without waiting for more.
    pub fn try_tick(&mut self) -> bool {
        let mut applied = false;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied = true;
        }
        applied
    }

    /// Run the engine until the current query has fully settled: no timer
    /// scheduled and no lookup in flight.
    pub async fn settle(&mut self) {
        while self.tick().await {}
    }

    fn apply(&mut self, event: LookupEvent) {
        match event {
            LookupEvent::Elapsed { generation, query } => {
                if generation != self.generation {
                    return;
                }
                self.timer = None;
                self.state.pending = true;
                self.inflight = Some(generation);
                let lookup = Arc::clone(&self.lookup);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let response = lookup.invoke(&query).await;
                    let _ = tx.send(LookupEvent::Resolved {
                        generation,
                        response,
                    });
                });
            }
            LookupEvent::Resolved {
                generation,
                response,
            } => {
                if self.inflight == Some(generation) {
                    self.inflight = None;
                    self.state.pending = false;
                }
                if generation != self.generation {
                    return;
                }
                let info = match response {
                    Ok(resp) if resp.success => resp.data,
                    _ => None,
                };
                let info = match info {
                    Some(info) => info,
                    None => return,
                };
                // The catalog copy is already in the local list; local wins.
                if self.catalog.contains(&info.id) {
                    return;
                }
                self.state.remote_matches = vec![RemoteResult { info }];
            }
        }
    }

    fn default_matches(&self) -> Vec<Suggestion> {
        self.catalog
            .default_slice(self.options.default_slice)
            .into_iter()
            .map(Suggestion::from_catalog)
            .collect()
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
