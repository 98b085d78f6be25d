/// One raw line as delivered by the tailer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LineInput<'a> {
    /// Byte offset where the line starts.
    pub start_offset: i64,
    /// Byte offset just past the line (including its terminator).
    pub end_offset: i64,
    /// 1-based line number in the underlying stream.
    pub line: u64,
    pub text: &'a str,
}

/// A merged multi-line event handed downstream at flush time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CodecEvent {
    pub start_offset: i64,
    pub end_offset: i64,
    /// Line number of the first line in the event.
    pub line: u64,
    /// Buffered lines joined with `\n`.
    pub text: String,
}

/// Receives flushed events.
///
/// Called synchronously from either the ingesting caller or the deadline
/// timer while the codec's state lock is held, so implementations must be
/// fast and must never call back into the codec that owns them.
pub trait EventSink: Send + 'static {
    fn on_event(&mut self, event: CodecEvent);
}

impl<F> EventSink for F
where
    F: FnMut(CodecEvent) + Send + 'static,
{
    fn on_event(&mut self, event: CodecEvent) {
        self(event)
    }
}
