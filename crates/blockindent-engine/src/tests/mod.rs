//! Shared helpers for unit tests.

use std::collections::HashMap;
use std::time::Duration;

use crate::buffer::Buffer;
use crate::context::{LineContext, LineContextClassifier, Presenter};
use crate::reindent::AffectedRange;

/// Classifier with fixed answers: blank lines are `Blank`, every other line is
/// `StatementStart` unless overridden.
#[derive(Debug, Default, Clone)]
pub struct StaticClassifier {
    overrides: HashMap<usize, LineContext>,
}

impl StaticClassifier {
    pub fn statements() -> Self {
        Self::default()
    }

    pub fn with(mut self, line: usize, context: LineContext) -> Self {
        self.overrides.insert(line, context);
        self
    }
}

impl LineContextClassifier for StaticClassifier {
    fn classify(&self, buffer: &Buffer, line: usize) -> LineContext {
        if let Some(context) = self.overrides.get(&line) {
            return *context;
        }
        match buffer.is_blank(line) {
            Ok(true) => LineContext::Blank,
            Ok(false) => LineContext::StatementStart,
            Err(_) => LineContext::NoContext,
        }
    }
}

/// Presenter remembering every range it was shown
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub shown: Vec<(AffectedRange, Duration)>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, range: &AffectedRange, duration: Duration) {
        self.shown.push((*range, duration));
    }
}
