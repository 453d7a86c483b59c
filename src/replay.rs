//! Replay stream.
//!
//! A match emits exactly one [`Event::MatchHeader`], one [`Event::Round`]
//! per completed round and one [`Event::MatchFooter`]. Matches are
//! deterministic, so two runs with the same map and decision providers
//! produce byte-identical JSON-lines output.

mod event;
mod sink;

pub use event::{
    ActionEvent, Event, MatchFooter, MatchHeader, RoundRecord, SpawnRecord, TeamProfile,
    TurnRecord,
};
pub use sink::{read_json_lines, EventSink, JsonLinesSink, NullSink, SinkError, VecSink};
