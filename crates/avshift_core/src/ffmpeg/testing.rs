//! Fake runner for tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::command::ToolCommand;
use super::runner::{RunOutput, StdioMode, ToolRunner};
use super::ToolResult;

/// Records every command and replays scripted outputs in order.
///
/// Once the script runs out, every further call succeeds with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<(ToolCommand, StdioMode)>>,
    script: RefCell<VecDeque<RunOutput>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an output for the next unscripted call.
    pub fn then(self, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.script.borrow_mut().push_back(RunOutput {
            exit_code: Some(exit_code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn commands(&self) -> Vec<ToolCommand> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn modes(&self) -> Vec<StdioMode> {
        self.calls.borrow().iter().map(|(_, m)| *m).collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, command: &ToolCommand, mode: StdioMode) -> ToolResult<RunOutput> {
        self.calls.borrow_mut().push((command.clone(), mode));
        Ok(self.script.borrow_mut().pop_front().unwrap_or(RunOutput {
            exit_code: Some(0),
            ..RunOutput::default()
        }))
    }
}
