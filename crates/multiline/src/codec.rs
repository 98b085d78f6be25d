use std::sync::{Arc, Mutex, MutexGuard};

use tokio::{sync::Notify, time::Instant};
use tracing::{debug, warn};

use crate::config::{MultilineConfig, What};
use crate::deadline::DeadlineTimer;
use crate::event::{CodecEvent, EventSink, LineInput};
use crate::snapshot::Snapshot;

const SNAPSHOT_LABEL: &str = "Multiline Codec";

/// State shared between the ingesting caller and the deadline timer.
pub(crate) struct Shared {
    state: Mutex<State>,
    /// Wakes an idle timer once a line lands in an empty buffer.
    pub(crate) wake: Notify,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("multiline codec state lock poisoned by a panicking sink; recovering");
            poisoned.into_inner()
        })
    }
}

pub(crate) struct State {
    buffer: Vec<String>,
    buffer_lines: u64,
    start_offset: i64,
    end_offset: i64,
    line: u64,
    last_offset: i64,
    /// When the buffered event is considered idle. `None` while nothing is pending.
    pub(crate) deadline: Option<Instant>,
    sink: Box<dyn EventSink>,
}

impl State {
    fn append(&mut self, input: LineInput<'_>) {
        if self.buffer.is_empty() {
            self.line = input.line;
            self.start_offset = input.start_offset;
        }
        self.end_offset = input.end_offset;
        self.buffer.push(input.text.to_string());
        self.buffer_lines += 1;
    }

    pub(crate) fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let text = self.buffer.join("\n");
        let lines = self.buffer_lines;

        // Teardown returns this, so a restart mid-event replays the whole event.
        self.last_offset = self.end_offset;
        self.buffer.clear();
        self.buffer_lines = 0;
        self.deadline = None;

        debug!(
            start_offset = self.start_offset,
            end_offset = self.end_offset,
            line = self.line,
            lines,
            "flushing multiline event"
        );
        self.sink.on_event(CodecEvent {
            start_offset: self.start_offset,
            end_offset: self.end_offset,
            line: self.line,
            text,
        });
    }
}

/// Merges consecutive raw lines of one stream into multi-line events.
///
/// Lines are tested against the configured pattern; depending on [`What`] a
/// line without the continuation marker either starts the next event or
/// closes the current one. With a non-zero previous timeout, a background
/// task flushes the buffer once no line has arrived for that long.
///
/// Constructing a codec with a previous timeout spawns a Tokio task and so
/// must happen inside a Tokio runtime.
pub struct MultilineCodec {
    config: Arc<MultilineConfig>,
    shared: Arc<Shared>,
    timer: Option<DeadlineTimer>,
}

impl MultilineCodec {
    /// Creates a codec resuming from the checkpoint `offset`.
    ///
    /// # Panics
    ///
    /// Panics when a previous timeout is configured and no Tokio runtime is
    /// available to run the deadline timer.
    pub fn new(config: Arc<MultilineConfig>, sink: impl EventSink, offset: i64) -> Self {
        let timeout_enabled = config.timeout_enabled();
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                buffer: Vec::new(),
                buffer_lines: 0,
                start_offset: offset,
                end_offset: offset,
                line: 0,
                last_offset: offset,
                deadline: timeout_enabled.then(|| Instant::now() + config.previous_timeout()),
                sink: Box::new(sink),
            }),
            wake: Notify::new(),
        });
        let timer = timeout_enabled.then(|| DeadlineTimer::spawn(Arc::clone(&shared)));

        debug!(
            offset,
            what = %config.what(),
            negate = config.negate(),
            previous_timeout = ?config.previous_timeout(),
            "created multiline codec"
        );

        Self {
            config,
            shared,
            timer,
        }
    }

    pub fn config(&self) -> &Arc<MultilineConfig> {
        &self.config
    }

    /// Feeds one raw line.
    ///
    /// Offsets must be non-decreasing across calls and each line must be
    /// delivered exactly once.
    pub fn event(&mut self, input: LineInput<'_>) {
        let continuation = self.config.is_continuation(input.text);
        let what = self.config.what();

        let mut state = self.shared.lock();
        if what == What::Previous && !continuation {
            state.flush();
        }

        state.append(input);

        let mut was_idle = false;
        if self.config.timeout_enabled() {
            was_idle = state.deadline.is_none();
            state.deadline = Some(Instant::now() + self.config.previous_timeout());
        }

        if what == What::Next && !continuation {
            state.flush();
        }

        let wake = was_idle && state.deadline.is_some();
        drop(state);

        if wake {
            self.shared.wake.notify_one();
        }
    }

    /// Checkpoint offset: everything before it has been flushed downstream.
    pub fn last_offset(&self) -> i64 {
        self.shared.lock().last_offset
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.shared.lock();
        Snapshot {
            label: SNAPSHOT_LABEL.to_string(),
            pending_lines: state.buffer_lines,
            pending_bytes: state.end_offset - state.last_offset,
        }
    }

    /// Stops the deadline timer and returns the checkpoint to persist.
    ///
    /// A partially accumulated event is deliberately not flushed: resuming
    /// from the returned offset replays its lines and rebuilds the same event.
    pub async fn teardown(self) -> i64 {
        let Self { shared, timer, .. } = self;

        if let Some(timer) = timer {
            timer.stop().await;
        }

        let state = shared.lock();
        debug!(
            last_offset = state.last_offset,
            pending_lines = state.buffer_lines,
            "multiline codec torn down"
        );
        state.last_offset
    }
}
