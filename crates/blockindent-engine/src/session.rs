use crate::buffer::Buffer;
use crate::error::ReindentError;
use crate::reindent::{
    AffectedRange, Argument, CommandId, CycleState, Host, Invocation, ReindentConfig,
    indent_and_extend,
};

/// Command name the session reports for its own invocations
pub const COMMAND: &str = "indent-and-extend";

/// One open document: its buffer plus the state that lives across presses.
///
/// Cycle state belongs to the session, never to the process, so two open
/// documents cycle independently.
#[derive(Debug, Clone)]
pub struct Session {
    buffer: Buffer,
    cycle: CycleState,
    config: ReindentConfig,
    command: CommandId,
}

impl Session {
    pub fn new(buffer: Buffer, config: ReindentConfig) -> Self {
        Self {
            buffer,
            cycle: CycleState::new(),
            config,
            command: CommandId::new(COMMAND),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Mutable access for edits made outside the reindent command.
    /// Any effective edit ends a running cycle.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn config(&self) -> &ReindentConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ReindentConfig) {
        self.config = config;
    }

    pub fn cycle_state(&self) -> &CycleState {
        &self.cycle
    }

    /// Report that the host ran `command` between two reindents
    pub fn record_command(&mut self, command: &CommandId) {
        self.cycle.record_command(command);
    }

    /// Press the reindent command once with the cursor on `cursor_line`
    pub fn indent_and_extend(
        &mut self,
        cursor_line: usize,
        argument: Argument,
        host: &mut Host<'_>,
    ) -> Result<AffectedRange, ReindentError> {
        let invocation = Invocation {
            command: self.command.clone(),
            cursor_line,
            argument,
        };
        indent_and_extend(
            &mut self.buffer,
            &invocation,
            &self.config,
            &mut self.cycle,
            host,
        )
    }

    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }
}
