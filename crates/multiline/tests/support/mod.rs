#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use multiline::{CodecEvent, EventSink, LineInput, MultilineCodec, MultilineConfig, What};

pub type Collected = Arc<Mutex<Vec<CodecEvent>>>;

pub fn config(pattern: &str, what: What, negate: bool, timeout_ms: u64) -> Arc<MultilineConfig> {
    Arc::new(
        MultilineConfig::new(pattern, what, negate, Duration::from_millis(timeout_ms))
            .expect("valid multiline config"),
    )
}

pub fn collector() -> (Collected, impl EventSink) {
    let events: Collected = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let sink = move |event: CodecEvent| sink_events.lock().unwrap().push(event);
    (events, sink)
}

pub fn texts(events: &Collected) -> Vec<String> {
    events
        .lock()
        .unwrap()
        .iter()
        .map(|event| event.text.clone())
        .collect()
}

/// Hands out offsets and line numbers the way a tailer would for `\n`-terminated lines.
pub struct Feeder {
    pub offset: i64,
    pub line: u64,
}

impl Feeder {
    pub fn new() -> Self {
        Self::resuming(0, 0)
    }

    pub fn resuming(offset: i64, last_line: u64) -> Self {
        Self {
            offset,
            line: last_line,
        }
    }

    pub fn feed(&mut self, codec: &mut MultilineCodec, text: &str) {
        let start_offset = self.offset;
        let end_offset = start_offset + text.len() as i64 + 1;
        self.line += 1;
        codec.event(LineInput {
            start_offset,
            end_offset,
            line: self.line,
            text,
        });
        self.offset = end_offset;
    }

    pub fn feed_all(&mut self, codec: &mut MultilineCodec, lines: &[&str]) {
        for text in lines {
            self.feed(codec, text);
        }
    }
}
