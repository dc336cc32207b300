//! Paginated list state shared by every list screen.
//!
//! A `ListMachine` never performs I/O. Callers take the [`Ticket`] returned by
//! [`ListMachine::reset`] or [`ListMachine::request_load_more`], run the fetch it
//! describes, and hand the outcome back through [`ListMachine::on_page_arrived`] or
//! [`ListMachine::on_fetch_failed`]. Those two are the only paths that change
//! `items`, so a completion that is no longer expected can be dropped in one place.

use crate::error::ListError;

/// Primary state of the list region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InitialLoading,
    Loaded,
    Error(ListError),
}

/// State of the trailing "load more" control. Only meaningful while `Phase::Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMore {
    #[default]
    Idle,
    Loading,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    LoadMore,
}

/// One issued fetch: which page to request and how to apply the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket<C> {
    pub load_id: u64,
    pub kind: FetchKind,
    pub cursor: C,
}

/// Derives the cursor for the next page from the current cursor and the items seen so far.
pub type NextCursor<T, C> = fn(C, &[T]) -> Option<C>;

#[derive(Clone)]
pub struct ListMachine<T, C> {
    items: Vec<T>,
    phase: Phase,
    load_more: LoadMore,
    cursor: C,
    initial_cursor: C,
    next_cursor: NextCursor<T, C>,
    // id of the latest issued ticket; anything else is stale
    load_id: u64,
    // cursor to restore if the in-flight load-more fails
    rollback: Option<C>,
}

impl<T, C: std::fmt::Debug> std::fmt::Debug for ListMachine<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListMachine")
            .field("items", &self.items.len())
            .field("phase", &self.phase)
            .field("load_more", &self.load_more)
            .field("cursor", &self.cursor)
            .field("load_id", &self.load_id)
            .finish()
    }
}

impl<T, C: Copy + PartialEq + std::fmt::Debug> ListMachine<T, C> {
    pub fn new(initial_cursor: C, next_cursor: NextCursor<T, C>) -> Self {
        Self {
            items: Vec::new(),
            phase: Phase::InitialLoading,
            load_more: LoadMore::Idle,
            cursor: initial_cursor,
            initial_cursor,
            next_cursor,
            load_id: 0,
            rollback: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn load_more_state(&self) -> LoadMore {
        self.load_more
    }

    pub fn cursor(&self) -> C {
        self.cursor
    }

    /// Start over from the first page. Supersedes every fetch issued before.
    pub fn reset(&mut self) -> Ticket<C> {
        self.phase = Phase::InitialLoading;
        self.load_more = LoadMore::Idle;
        self.cursor = self.initial_cursor;
        self.items.clear();
        self.rollback = None;
        self.issue(FetchKind::Initial)
    }

    /// Ask for the next page.
    ///
    /// Returns `Ok(None)` when a load-more is not allowed right now (list not loaded,
    /// a page already in flight, or the end was reached). An empty list has no cursor
    /// to continue from: that is reported as `NoCursorAvailable` and also moves the
    /// machine into the error phase.
    pub fn request_load_more(&mut self) -> Result<Option<Ticket<C>>, ListError> {
        if self.phase != Phase::Loaded || self.load_more != LoadMore::Idle {
            tracing::debug!(phase = ?self.phase, load_more = ?self.load_more, "load more ignored");
            return Ok(None);
        }

        let next = if self.items.is_empty() {
            None
        } else {
            (self.next_cursor)(self.cursor, &self.items)
        };

        let Some(next) = next else {
            self.phase = Phase::Error(ListError::NoCursorAvailable);
            return Err(ListError::NoCursorAvailable);
        };

        self.rollback = Some(self.cursor);
        self.cursor = next;
        self.load_more = LoadMore::Loading;
        Ok(Some(self.issue(FetchKind::LoadMore)))
    }

    /// Apply a fetched page. Returns `false` when the ticket was stale and nothing changed.
    pub fn on_page_arrived(&mut self, ticket: Ticket<C>, page: Vec<T>) -> bool {
        if !self.is_expected(&ticket) {
            return false;
        }

        match ticket.kind {
            FetchKind::Initial => {
                if page.is_empty() {
                    self.phase = Phase::Error(ListError::EmptyResult);
                } else {
                    self.items = page;
                    self.phase = Phase::Loaded;
                }
            }
            FetchKind::LoadMore => {
                self.rollback = None;
                if page.is_empty() {
                    self.load_more = LoadMore::Hidden;
                } else {
                    self.items.extend(page);
                    self.load_more = LoadMore::Idle;
                }
            }
        }
        true
    }

    /// Record a failed fetch. Returns `false` when the ticket was stale and nothing changed.
    pub fn on_fetch_failed(&mut self, ticket: Ticket<C>) -> bool {
        if !self.is_expected(&ticket) {
            return false;
        }

        match ticket.kind {
            FetchKind::Initial => {
                self.phase = Phase::Error(ListError::TransportFailure);
            }
            FetchKind::LoadMore => {
                if let Some(previous) = self.rollback.take() {
                    self.cursor = previous;
                }
                self.load_more = LoadMore::Idle;
            }
        }
        true
    }

    fn issue(&mut self, kind: FetchKind) -> Ticket<C> {
        self.load_id = self.load_id.wrapping_add(1);
        Ticket {
            load_id: self.load_id,
            kind,
            cursor: self.cursor,
        }
    }

    fn is_expected(&self, ticket: &Ticket<C>) -> bool {
        let in_origin_state = match ticket.kind {
            FetchKind::Initial => self.phase == Phase::InitialLoading,
            FetchKind::LoadMore => {
                self.phase == Phase::Loaded && self.load_more == LoadMore::Loading
            }
        };
        let expected = ticket.load_id == self.load_id && in_origin_state;
        if !expected {
            tracing::debug!(
                ticket = ticket.load_id,
                latest = self.load_id,
                kind = ?ticket.kind,
                "discarding stale completion"
            );
        }
        expected
    }
}
