//! Grid engine: routes every state change to local paging or to the host
//!
//! The engine keeps the current `GridState` and replaces it through
//! `GridState::apply`. What happens next depends only on the mode:
//!
//! - `Mode::Local` runs the filter/sort/paginate pipeline over the rows the
//!   engine holds and stores the visible page.
//! - `Mode::Remote` emits `EngineEvent::StateChanged`; the host fetches the
//!   page (see `query_string`) and hands it back with `load_remote_page`.
//!
//! Filter requests are debounced: a short delay for in-memory rows, a longer
//! one when every change costs a request.

use std::sync::Arc;

use gridstate_core::{ColumnSet, FilterClause, GridAction, GridState};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::debounce::DebounceTimer;
use crate::error::EngineResult;
use crate::events::{EngineEvent, RemotePage};
use crate::odata;
use crate::pagination::{PageWindow, WindowShift};
use crate::pipeline;
use crate::settings::EngineSettings;

/// Who computes the visible page
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// The engine owns these rows and pages them itself
    Local { rows: Vec<Value> },
    /// A remote source owns the rows; the engine only emits state
    Remote,
}

impl Mode {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Remote => "remote",
        }
    }
}

#[derive(Debug)]
struct EngineInner {
    state: GridState,
    mode: Mode,
    columns: ColumnSet,
    page_rows: Vec<Value>,
    total: usize,
    page_number_count: usize,
    /// Local rows kept aside while in remote mode
    stashed_rows: Vec<Value>,
    subscribers: Vec<UnboundedSender<EngineEvent>>,
}

impl EngineInner {
    fn transition(&mut self, action: GridAction) {
        let next = self.state.apply(action.clone());
        tracing::debug!(
            ?action,
            mode = self.mode.name(),
            page = next.page_number(),
            skip = next.skip(),
            filters = next.filters().len(),
            "Grid state transition"
        );
        self.state = next;
        self.dispatch();
    }

    fn dispatch(&mut self) {
        match &self.mode {
            Mode::Local { rows } => {
                let output = pipeline::run(rows, &self.state, &self.columns);
                self.page_rows = output.rows;
                self.total = output.total;
                self.emit(EngineEvent::PageComputed { total: self.total });
            }
            Mode::Remote => {
                self.emit(EngineEvent::StateChanged(self.state.clone()));
            }
        }
    }

    /// Dispatch, then pull the page number back in range if the total shrank
    fn dispatch_clamped(&mut self) {
        self.dispatch();
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let last_page = self.state.total_pages(self.total).max(1);
        if self.state.page_number() > last_page {
            tracing::debug!(
                page = self.state.page_number(),
                last_page,
                "Page out of range after data change"
            );
            self.transition(GridAction::ChangePage {
                page: last_page,
                total: self.total,
            });
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    fn window(&self) -> PageWindow {
        PageWindow::for_state(&self.state, self.total, self.page_number_count)
    }
}

/// State engine behind one data grid
#[derive(Debug)]
pub struct GridEngine {
    inner: Arc<Mutex<EngineInner>>,
    settings: EngineSettings,
    filter_timer: DebounceTimer,
}

impl GridEngine {
    /// Create an engine in the mode `settings.data_binding` selects.
    ///
    /// A local engine starts with no rows; add them with `with_rows`.
    pub fn new(settings: EngineSettings) -> EngineResult<Self> {
        settings.validate()?;

        let mode = if settings.data_binding {
            Mode::Remote
        } else {
            Mode::Local { rows: Vec::new() }
        };

        let inner = EngineInner {
            state: settings.initial_state()?,
            mode,
            columns: ColumnSet::default(),
            page_rows: Vec::new(),
            total: 0,
            page_number_count: settings.page_number_count,
            stashed_rows: Vec::new(),
            subscribers: Vec::new(),
        };

        tracing::info!(
            mode = inner.mode.name(),
            page_size = settings.page_size,
            "Grid engine created"
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
            settings,
            filter_timer: DebounceTimer::new(),
        })
    }

    /// Local engine over `rows` with default settings
    pub fn local(rows: Vec<Value>) -> EngineResult<Self> {
        Ok(Self::new(EngineSettings::default())?.with_rows(rows))
    }

    /// Remote engine with default settings
    pub fn remote() -> EngineResult<Self> {
        Self::new(EngineSettings::remote())
    }

    pub fn with_rows(self, rows: Vec<Value>) -> Self {
        self.set_rows(rows);
        self
    }

    pub fn with_columns(self, columns: ColumnSet) -> Self {
        self.set_columns(columns);
        self
    }

    pub fn with_state(self, state: GridState) -> Self {
        self.set_state(state);
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Receive state-change and page events
    pub fn subscribe(&self) -> UnboundedReceiver<EngineEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push(sender);
        receiver
    }

    // ---- reads ----

    pub fn state(&self) -> GridState {
        self.inner.lock().state.clone()
    }

    /// Rows of the visible page
    pub fn rows(&self) -> Vec<Value> {
        self.inner.lock().page_rows.clone()
    }

    /// Row count after filtering, before paging
    pub fn total(&self) -> usize {
        self.inner.lock().total
    }

    pub fn total_pages(&self) -> usize {
        let inner = self.inner.lock();
        inner.state.total_pages(inner.total)
    }

    pub fn page_window(&self) -> PageWindow {
        self.inner.lock().window()
    }

    pub fn columns(&self) -> ColumnSet {
        self.inner.lock().columns.clone()
    }

    pub fn is_remote(&self) -> bool {
        self.inner.lock().mode.is_remote()
    }

    pub fn mode(&self) -> Mode {
        self.inner.lock().mode.clone()
    }

    /// OData fragment for the current state
    pub fn query_string(&self) -> String {
        let inner = self.inner.lock();
        odata::build_query_with_columns(&inner.state, &inner.columns)
    }

    /// Whether a debounced filter has not been applied yet
    pub fn is_filter_pending(&self) -> bool {
        self.filter_timer.is_pending()
    }

    // ---- state-changing operations ----

    /// Go to page `page`, clamped into range
    pub fn change_page(&self, page: usize) {
        let mut inner = self.inner.lock();
        let previous = inner.window();
        let total = inner.total;
        inner.transition(GridAction::ChangePage { page, total });

        let current = inner.window();
        match WindowShift::between(
            previous.current_page,
            current.current_page,
            inner.page_number_count,
        ) {
            WindowShift::InPlace => {}
            shift => tracing::trace!(
                ?shift,
                from_group = previous.current_group(),
                to_group = current.current_group(),
                "Page window moved"
            ),
        }
    }

    pub fn first_page(&self) {
        self.change_page(1);
    }

    pub fn last_page(&self) {
        let last = self.total_pages().max(1);
        self.change_page(last);
    }

    /// Jump to the first page of the next window
    pub fn next_page_group(&self) {
        let mut inner = self.inner.lock();
        let action = GridAction::NextPageGroup {
            total: inner.total,
            page_number_count: inner.page_number_count,
        };
        inner.transition(action);
    }

    /// Jump to the first page of the previous window
    pub fn previous_page_group(&self) {
        let mut inner = self.inner.lock();
        let action = GridAction::PreviousPageGroup {
            page_number_count: inner.page_number_count,
        };
        inner.transition(action);
    }

    pub fn change_page_size(&self, page_size: usize) {
        self.inner.lock().transition(GridAction::ChangePageSize(page_size));
    }

    /// Advance `field` through unsorted -> asc -> desc -> unsorted
    pub fn sort(&self, field: &str) {
        self.inner.lock().transition(GridAction::Sort(field.to_string()));
    }

    /// Apply `clause` after the mode's debounce delay.
    ///
    /// A newer filter request replaces one still waiting. An empty value
    /// removes the field's clause.
    pub fn filter(&self, clause: FilterClause) {
        let remote = self.is_remote();
        let delay = self.settings.debounce_for(remote);
        tracing::debug!(field = %clause.field, ?delay, "Filter scheduled");

        let inner = Arc::clone(&self.inner);
        self.filter_timer.schedule(delay, move || {
            inner.lock().transition(GridAction::Filter(clause));
        });
    }

    /// Apply `clause` right away, dropping any pending filter request
    pub fn filter_now(&self, clause: FilterClause) {
        self.filter_timer.cancel();
        self.inner.lock().transition(GridAction::Filter(clause));
    }

    /// Remove the clause for `field`, dropping any pending filter request
    pub fn clear_filter(&self, field: &str) {
        if self.filter_timer.cancel() {
            tracing::debug!(field, "Pending filter dropped by clear");
        }
        self.inner.lock().transition(GridAction::ClearFilter(field.to_string()));
    }

    pub fn clear_all_filters(&self) {
        self.filter_timer.cancel();
        self.inner.lock().transition(GridAction::ClearAllFilters);
    }

    /// Back to page one without sort or filters
    pub fn reset(&self) {
        self.filter_timer.cancel();
        self.inner.lock().transition(GridAction::Reset);
    }

    /// Re-run the current state: page locally, or ask the host to refetch
    pub fn refresh(&self) {
        let mut inner = self.inner.lock();
        tracing::debug!(mode = inner.mode.name(), "Refresh");
        inner.dispatch_clamped();
    }

    // ---- runtime swaps ----

    /// Replace the in-memory rows; in remote mode they are kept for when the
    /// engine switches back to local.
    pub fn set_rows(&self, rows: Vec<Value>) {
        let mut inner = self.inner.lock();
        tracing::debug!(rows = rows.len(), mode = inner.mode.name(), "Rows replaced");

        if inner.mode.is_remote() {
            inner.stashed_rows = rows;
            return;
        }
        inner.mode = Mode::Local { rows };
        inner.dispatch_clamped();
    }

    /// Replace column metadata. Untyped clauses may now resolve to another
    /// type, so the current state is dispatched again in either mode.
    pub fn set_columns(&self, columns: ColumnSet) {
        let mut inner = self.inner.lock();
        inner.columns = columns;
        tracing::debug!(columns = inner.columns.len(), "Columns replaced");
        inner.dispatch_clamped();
    }

    /// Adopt a host-supplied state, normalized
    pub fn set_state(&self, state: GridState) {
        self.filter_timer.cancel();
        let mut inner = self.inner.lock();
        inner.state = state.normalized();
        inner.dispatch_clamped();
    }

    /// Switch modes and re-dispatch the current state in the new one.
    ///
    /// A pending filter request still fires, against the new mode.
    pub fn set_mode(&self, mode: Mode) {
        let mut inner = self.inner.lock();
        let previous = std::mem::replace(&mut inner.mode, mode);

        if let Mode::Local { rows } = previous {
            if inner.mode.is_remote() {
                inner.stashed_rows = rows;
            }
        }
        if inner.mode.is_remote() {
            inner.page_rows.clear();
        }

        tracing::info!(mode = inner.mode.name(), "Grid engine mode changed");
        inner.dispatch_clamped();
    }

    /// Toggle remote mode, keeping local rows across the round trip
    pub fn set_data_binding(&self, data_binding: bool) {
        if data_binding == self.is_remote() {
            return;
        }

        if data_binding {
            self.set_mode(Mode::Remote);
        } else {
            let rows = std::mem::take(&mut self.inner.lock().stashed_rows);
            self.set_mode(Mode::Local { rows });
        }
    }

    /// Hand over the page a remote source returned. Ignored in local mode.
    pub fn load_remote_page(&self, page: RemotePage) -> bool {
        let mut inner = self.inner.lock();
        if !inner.mode.is_remote() {
            tracing::warn!("Remote page delivered to a local grid, ignoring");
            return false;
        }

        tracing::debug!(rows = page.data.len(), total = page.total, "Remote page loaded");
        inner.page_rows = page.data;
        inner.total = page.total;
        let total = inner.total;
        inner.emit(EngineEvent::PageComputed { total });
        inner.clamp_page();
        true
    }

    /// Like `load_remote_page`, but drop the page if the state it was fetched
    /// for is no longer current.
    pub fn load_remote_page_for(&self, requested: &GridState, page: RemotePage) -> bool {
        {
            let inner = self.inner.lock();
            if inner.state != *requested {
                tracing::warn!(
                    requested_page = requested.page_number(),
                    current_page = inner.state.page_number(),
                    "Dropping stale remote page"
                );
                return false;
            }
        }
        self.load_remote_page(page)
    }
}
