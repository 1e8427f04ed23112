//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use batchget_schema::PackageId;

use crate::pipeline::BatchSummary;
use crate::reporter::Reporter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Skipped(String),
    Started(String, String),
    Output(String, String),
    Done(String),
    Failed(String, String),
    Summary(BatchSummary),
}

/// Records every reporter call in arrival order.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn skipped(&self, id: &PackageId) {
        self.push(Event::Skipped(id.to_string()));
    }
    fn started(&self, name: &str, command: &str) {
        self.push(Event::Started(name.to_string(), command.to_string()));
    }
    fn output(&self, name: &str, line: &str) {
        self.push(Event::Output(name.to_string(), line.to_string()));
    }
    fn done(&self, name: &str) {
        self.push(Event::Done(name.to_string()));
    }
    fn failed(&self, name: &str, reason: &str) {
        self.push(Event::Failed(name.to_string(), reason.to_string()));
    }
    fn summary(&self, summary: &BatchSummary) {
        self.push(Event::Summary(*summary));
    }
}
