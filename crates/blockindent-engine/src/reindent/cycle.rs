use std::fmt;

use crate::reindent::Argument;

/// Identity of the command that triggered an invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandId(String);

impl CommandId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleMode {
    #[default]
    Idle,
    Cycling,
}

/// Per-session memory used to recognise repeated invocations.
///
/// Only the orchestrator writes the affected line count, and it overwrites
/// it at the end of every invocation. Hosts report other commands through
/// [`CycleState::record_command`] so a repeat is only seen when nothing ran
/// in between.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleState {
    last_affected_line_count: usize,
    last_command: Option<CommandId>,
    /// Buffer version right after the last invocation finished
    last_version: Option<u64>,
    mode: CycleMode,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_affected_line_count(&self) -> usize {
        self.last_affected_line_count
    }

    pub fn last_command(&self) -> Option<&CommandId> {
        self.last_command.as_ref()
    }

    /// Mode of the most recent invocation
    pub fn mode(&self) -> CycleMode {
        self.mode
    }

    /// Note that the host ran some other command
    pub fn record_command(&mut self, command: &CommandId) {
        self.last_command = Some(command.clone());
        self.last_version = None;
    }

    /// True when `command` directly repeats the previous invocation without
    /// an explicit argument and nothing touched the buffer since.
    pub fn is_repeat(&self, command: &CommandId, argument: &Argument, buffer_version: u64) -> bool {
        matches!(argument, Argument::Absent)
            && self.last_command.as_ref() == Some(command)
            && self.last_version == Some(buffer_version)
    }

    /// Close an invocation: remember its command, the resulting buffer
    /// version and how many lines it affected.
    pub fn finish(
        &mut self,
        command: &CommandId,
        repeat: bool,
        affected_line_count: usize,
        buffer_version: u64,
    ) {
        self.last_affected_line_count = affected_line_count;
        self.last_command = Some(command.clone());
        self.last_version = Some(buffer_version);
        self.mode = if repeat {
            CycleMode::Cycling
        } else {
            CycleMode::Idle
        };
    }
}
