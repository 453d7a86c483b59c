//! Event sinks.

use std::io::{self, BufRead, Write};

use crate::replay::Event;

/// Error type for sink operations.
#[derive(Debug)]
pub enum SinkError {
    /// Underlying writer or reader failed.
    Io(io::Error),
    /// An event could not be encoded or decoded.
    Json {
        /// 1-based line number, 0 when writing.
        line: usize,
        /// Error details.
        error: serde_json::Error,
    },
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json { line: 0, error } => write!(f, "encoding failed: {error}"),
            Self::Json { line, error } => write!(f, "line {line}: {error}"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json { error, .. } => Some(error),
        }
    }
}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Consumer of the replay stream.
pub trait EventSink {
    /// Accept one event.
    ///
    /// # Errors
    ///
    /// A failure is fatal to the match emitting the event.
    fn emit(&mut self, event: Event) -> Result<(), SinkError>;

    /// Flush buffered output. Called after the footer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) -> Result<(), SinkError> {
        (**self).emit(event)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: Event) -> Result<(), SinkError> {
        (**self).emit(event)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    /// Events in emission order.
    pub events: Vec<Event>,
}

impl VecSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: Event) -> Result<(), SinkError> {
        self.events.push(event);
        Ok(())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer. Callers should pass a buffered writer for files.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: Event) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &event)
            .map_err(|error| SinkError::Json { line: 0, error })?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read back a stream written by [`JsonLinesSink`]. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error on I/O failure or a malformed line.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<Event>, SinkError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|error| SinkError::Json {
            line: idx + 1,
            error,
        })?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Team, WinReason};
    use crate::replay::{MatchFooter, TeamProfile};

    fn footer() -> Event {
        Event::MatchFooter(MatchFooter {
            winner: Team::A,
            reason: WinReason::Resignation,
            rounds: 12,
            profiles: [TeamProfile::default(); 2],
        })
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink = VecSink::new();
        sink.emit(footer()).unwrap();
        sink.emit(footer()).unwrap();
        assert_eq!(sink.into_events().len(), 2);
    }

    #[test]
    fn test_json_lines_read_back() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(footer()).unwrap();
        sink.flush().unwrap();
        let bytes = sink.into_inner();
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
        let events = read_json_lines(bytes.as_slice()).unwrap();
        assert_eq!(events, vec![footer()]);
    }

    #[test]
    fn test_read_reports_line() {
        let input = b"\n{\"kind\":\"Nope\"}\n";
        let err = read_json_lines(&input[..]).unwrap_err();
        assert!(matches!(err, SinkError::Json { line: 2, .. }));
    }
}
