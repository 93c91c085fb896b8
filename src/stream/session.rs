use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::{DriverError, LazyQuery, RowCursor, StreamError};

/// Shared view of whether the blocking session task has terminated. The
/// monitor uses it to decide when reissuing driver cancels can stop.
#[derive(Debug, Default)]
pub(super) struct SessionState {
    settled: AtomicBool,
}

impl SessionState {
    pub(super) fn settle(&self) {
        self.settled.store(true, Ordering::Release);
    }

    pub(super) fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }
}

/// Marks the session settled when the blocking task exits, panics included.
pub(super) struct SettleGuard {
    state: Arc<SessionState>,
}

impl SettleGuard {
    pub(super) fn new(state: Arc<SessionState>) -> Self {
        Self { state }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.state.settle();
    }
}

/// Wraps an opened cursor so that `close` runs exactly once on every exit
/// path. Entered only after the cursor is confirmed obtained; `Drop` is the
/// backstop for unwinds.
struct CursorGuard<C: RowCursor> {
    cursor: C,
    closed: bool,
}

impl<C: RowCursor> CursorGuard<C> {
    fn new(cursor: C) -> Self {
        Self {
            cursor,
            closed: false,
        }
    }

    fn next_row(&mut self) -> Result<Option<C::Row>, DriverError> {
        self.cursor.next_row()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        debug!("closing cursor");
        if let Err(err) = self.cursor.close() {
            debug!(error = %err, "cursor close reported a driver failure");
        }
    }
}

impl<C: RowCursor> Drop for CursorGuard<C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Cancellation monitor. First phase waits for either session termination
/// (no cancel ever issued) or an external stop request. Once a stop is
/// requested, the driver's `cancel` is reissued every poll interval until
/// the blocking session provably unblocks; a single cancel is not guaranteed
/// sufficient because the driver may retry or reconnect underneath.
pub(super) async fn run_monitor<Q>(
    query: Arc<Q>,
    cancel: CancellationToken,
    state: Arc<SessionState>,
    poll_interval: Duration,
) where
    Q: LazyQuery,
{
    trace!("monitor awaiting session completion or stop request");
    loop {
        if state.is_settled() {
            trace!("session settled without a stop request, monitor exiting");
            return;
        }
        if cancel.is_cancelled() {
            break;
        }
        tokio::time::sleep(poll_interval).await;
    }
    trace!("stop requested, cancelling driver until the session unblocks");
    while !state.is_settled() {
        query.cancel();
        tokio::time::sleep(poll_interval).await;
    }
    trace!("session unblocked after cancellation");
}

/// Blocking session: exclusively owns the cursor for its whole lifetime.
/// Opens it, pulls rows one at a time into the bounded handoff channel, and
/// closes it exactly once on every exit path. Runs on the blocking pool.
pub(super) fn run_session<Q>(
    query: &Q,
    tx: &flume::Sender<Result<Q::Row, StreamError>>,
    cancel: &CancellationToken,
) where
    Q: LazyQuery,
{
    trace!("opening lazy cursor");
    let cursor = match query.fetch_lazy() {
        Ok(cursor) => cursor,
        Err(err) => {
            let _ = tx.send(Err(classify(err, cancel)));
            return;
        }
    };
    let mut cursor = CursorGuard::new(cursor);

    // The open call can race a stop request: the driver may hand back a
    // cursor even though cancel was already asked for. Release it before
    // reporting the stop.
    if cancel.is_cancelled() {
        cursor.close();
        let _ = tx.send(Err(StreamError::Cancelled));
        return;
    }

    loop {
        if cancel.is_cancelled() {
            let _ = tx.send(Err(StreamError::Cancelled));
            break;
        }
        match cursor.next_row() {
            Ok(Some(row)) => {
                // Bounded at one: blocks here until the consumer takes the
                // row, or bails when the consumer is gone.
                if tx.send(Ok(row)).is_err() {
                    trace!("consumer went away, ending session");
                    break;
                }
            }
            Ok(None) => {
                trace!("cursor exhausted");
                break;
            }
            Err(err) => {
                let _ = tx.send(Err(classify(err, cancel)));
                break;
            }
        }
    }
    cursor.close();
}

/// A driver failure observed while a stop was requested is assumed to be the
/// side effect of the monitor's own cancel call and is delivered as a
/// cancellation, not as a spurious driver error.
fn classify(err: DriverError, cancel: &CancellationToken) -> StreamError {
    if cancel.is_cancelled() {
        debug!(error = %err, "reclassifying driver failure as cancellation");
        StreamError::Cancelled
    } else {
        StreamError::Driver(err)
    }
}
