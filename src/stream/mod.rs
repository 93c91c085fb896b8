//! Adapter from a blocking, pull-based result cursor to a lazily-produced,
//! cancellable [`Stream`].
//!
//! Database drivers expose lazy fetching as a blocking call that opens a
//! server-side cursor, plus blocking per-row pulls. Neither call can be
//! interrupted directly; the only lever is asking the driver to abort
//! out-of-band via [`LazyQuery::cancel`]. [`CursorStream`] bridges that model
//! into async code: one blocking task owns the cursor lifecycle end to end,
//! one monitor task turns a cooperative stop request into repeated driver
//! cancels until the blocked call provably unblocks, and rows are handed to
//! the consumer one at a time.

mod error;
mod session;

use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use flume::r#async::RecvStream;
use futures_core::Stream;
use pin_project_lite::pin_project;
use tokio_util::sync::{CancellationToken, DropGuard};

pub use error::{DriverError, StreamError};
use session::{run_monitor, run_session, SessionState, SettleGuard};

/// Default interval at which the cancellation monitor polls, and at which
/// driver cancels are reissued once a stop has been requested. Cancellation
/// is observed eventually, bounded by this interval, not instantaneously.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A query that can lazily open a server-side cursor.
///
/// Both calls on this trait come from the blocking driver world:
/// [`fetch_lazy`](Self::fetch_lazy) may block on network I/O for an unbounded
/// time and is not interruptible by the runtime. [`cancel`](Self::cancel) is
/// the out-of-band abort request and must be safe to invoke from another
/// thread while `fetch_lazy` or a cursor pull is in flight; the adapter
/// relies on that contract and cannot enforce it.
pub trait LazyQuery: Send + Sync + 'static {
    /// Row type produced by the cursor.
    type Row: Send + 'static;
    /// Cursor type returned by [`fetch_lazy`](Self::fetch_lazy). Never leaves
    /// the adapter's blocking task, so it need not be `Send`.
    type Cursor: RowCursor<Row = Self::Row>;

    /// Opens a cursor against the query. Blocking.
    fn fetch_lazy(&self) -> Result<Self::Cursor, DriverError>;

    /// Asks the driver to abort the in-flight fetch or pull. May be invoked
    /// repeatedly; a single call is not assumed sufficient.
    fn cancel(&self);
}

/// A server-side cursor pulled one row at a time.
pub trait RowCursor {
    /// Row type produced by this cursor.
    type Row: Send + 'static;

    /// Pulls the next row; `Ok(None)` on exhaustion. Blocking.
    fn next_row(&mut self) -> Result<Option<Self::Row>, DriverError>;

    /// Releases the cursor. Called exactly once by the adapter.
    fn close(&mut self) -> Result<(), DriverError>;
}

pin_project! {
    /// Lazily-produced, cancellable sequence of rows from one query
    /// execution.
    ///
    /// Exactly one cursor is opened per stream and closed exactly once
    /// before the stream's backing session terminates, on every exit path.
    /// Rows arrive in strict cursor order with at most one row in flight
    /// between the driver and the consumer. After a terminal item (normal
    /// exhaustion, a [`StreamError::Driver`] failure, or
    /// [`StreamError::Cancelled`]) the stream ends and is not resumable;
    /// re-running the query takes a new [`CursorStream`].
    ///
    /// Dropping the stream requests cancellation. The backing session keeps
    /// running detached until the driver call unblocks, then releases the
    /// cursor; no cleanup is skipped by an early drop.
    pub struct CursorStream<T: 'static> {
        #[pin]
        rows: RecvStream<'static, Result<T, StreamError>>,
        cancel: CancellationToken,
        _cancel_guard: DropGuard,
    }
}

impl<T> CursorStream<T>
where
    T: Send + 'static,
{
    /// Opens the query's cursor and begins streaming its rows, with the
    /// default cancellation poll interval.
    ///
    /// Must be called within a Tokio runtime: the adapter spawns one
    /// blocking task for the cursor lifecycle and one async monitor task.
    pub fn open<Q>(query: Q) -> Self
    where
        Q: LazyQuery<Row = T>,
    {
        Self::open_with_interval(query, DEFAULT_POLL_INTERVAL)
    }

    /// Like [`open`](Self::open) with an explicit monitor poll interval,
    /// which bounds how quickly a stop request reaches the driver.
    pub fn open_with_interval<Q>(query: Q, poll_interval: Duration) -> Self
    where
        Q: LazyQuery<Row = T>,
    {
        let query = Arc::new(query);
        let cancel = CancellationToken::new();
        let state = Arc::new(SessionState::default());
        let (tx, rx) = flume::bounded(1);

        {
            let query = Arc::clone(&query);
            let cancel = cancel.clone();
            let settle = SettleGuard::new(Arc::clone(&state));
            tokio::task::spawn_blocking(move || {
                run_session(query.as_ref(), &tx, &cancel);
                // Settled must become visible before the channel closes:
                // once the consumer observes end-of-stream, the monitor may
                // no longer treat the session as live.
                drop(settle);
                drop(tx);
            });
        }
        tokio::spawn(run_monitor(query, cancel.clone(), state, poll_interval));

        Self {
            rows: rx.into_stream(),
            cancel: cancel.clone(),
            _cancel_guard: cancel.drop_guard(),
        }
    }

    /// Requests a cooperative stop. The driver is asked to abort until the
    /// blocking call unblocks; a consumer that keeps polling observes
    /// [`StreamError::Cancelled`] as the terminal item. Safe to call at any
    /// point, including before the cursor has been obtained.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token backing this stream's cancellation; cancel it to stop the
    /// stream from another task.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl<T: 'static> Stream for CursorStream<T> {
    type Item = Result<T, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().rows.poll_next(cx)
    }
}
