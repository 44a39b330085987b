//! Hierarchical progress reporting
//!
//! A pipeline reports into a [`Progress`] handle. Each handle owns a slice
//! `[start, end]` of the overall range and can hand out child handles that
//! cover part of what remains. Sinks receive absolute fractions, so they
//! never need to know the step tree.

use chrono::{DateTime, Local};
use std::sync::Mutex;

/// One thing a pipeline reported
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A named child step started
    Step { depth: usize, name: String },
    /// Informational message
    Message { depth: usize, text: String },
    /// Error message
    Error { depth: usize, text: String },
    /// Overall completion in `[0, 1]`
    Fraction(f32),
}

/// Receiver of progress events. Calls must not block the pipeline.
pub trait ProgressSink: Send + Sync {
    fn record(&self, event: ProgressEvent);
}

/// Handle a pipeline step reports through
pub struct Progress<'a> {
    sink: &'a dyn ProgressSink,
    start: f32,
    end: f32,
    depth: usize,
    current: f32,
}

impl<'a> Progress<'a> {
    /// Root handle spanning the whole `[0, 1]` range
    pub fn new(sink: &'a dyn ProgressSink) -> Self {
        Self {
            sink,
            start: 0.0,
            end: 1.0,
            depth: 0,
            current: 0.0,
        }
    }

    /// Start a named child step.
    ///
    /// The child covers this handle's range from its current position up to
    /// `end_fraction` (local to this handle), and this handle's own position
    /// moves to `end_fraction`.
    pub fn child(&mut self, name: &str, end_fraction: f32) -> Progress<'a> {
        let end_fraction = end_fraction.clamp(self.current, 1.0);
        let child = Progress {
            sink: self.sink,
            start: self.absolute(self.current),
            end: self.absolute(end_fraction),
            depth: self.depth + 1,
            current: 0.0,
        };
        self.current = end_fraction;

        self.sink.record(ProgressEvent::Step {
            depth: child.depth,
            name: name.to_string(),
        });
        self.sink.record(ProgressEvent::Fraction(child.start));
        child
    }

    pub fn add_message(&self, text: impl Into<String>) {
        self.sink.record(ProgressEvent::Message {
            depth: self.depth,
            text: text.into(),
        });
    }

    pub fn add_error(&self, text: impl Into<String>) {
        self.sink.record(ProgressEvent::Error {
            depth: self.depth,
            text: text.into(),
        });
    }

    /// Set completion of this step, local to its own range
    pub fn set_progress(&mut self, fraction: f32) {
        self.current = fraction.clamp(0.0, 1.0);
        self.sink
            .record(ProgressEvent::Fraction(self.absolute(self.current)));
    }

    /// Local completion of this step
    pub fn progress(&self) -> f32 {
        self.current
    }

    fn absolute(&self, local: f32) -> f32 {
        self.start + (self.end - self.start) * local
    }
}

/// A recorded event with the time it arrived
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub event: ProgressEvent,
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct ProgressLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.entries().into_iter().map(|e| e.event).collect()
    }

    /// Names of started steps, in order
    pub fn steps(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Step { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Error { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Most recent overall fraction, 0 if none was reported
    pub fn fraction(&self) -> f32 {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                ProgressEvent::Fraction(f) => Some(f),
                _ => None,
            })
            .unwrap_or(0.0)
    }
}

impl ProgressSink for ProgressLog {
    fn record(&self, event: ProgressEvent) {
        let entry = LogEntry {
            at: Local::now(),
            event,
        };
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
