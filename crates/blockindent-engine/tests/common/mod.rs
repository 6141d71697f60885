#![allow(dead_code)]

use std::fmt::Write;

use blockindent_engine::{
    AffectedRange, Argument, Buffer, CommandId, CycleState, FixedIndenter, Host, Invocation,
    LineContext, LineContextClassifier, NoopPresenter, ReindentConfig, indent_and_extend,
};

/// Blank lines are `Blank`, `else`-style clauses are dedenters, everything
/// else starts a statement.
pub struct KeywordClassifier;

impl LineContextClassifier for KeywordClassifier {
    fn classify(&self, buffer: &Buffer, line: usize) -> LineContext {
        let Ok(text) = buffer.line(line) else {
            return LineContext::Blank;
        };
        let code = text.trim_start();
        if code.is_empty() {
            LineContext::Blank
        } else if ["else", "elif", "except", "finally"]
            .iter()
            .any(|keyword| code.starts_with(keyword))
        {
            LineContext::DedenterStart
        } else {
            LineContext::StatementStart
        }
    }
}

pub fn buffer(lines: &[&str]) -> Buffer {
    let mut text = lines.join("\n");
    text.push('\n');
    Buffer::from(text.as_str())
}

pub fn lines(buffer: &Buffer) -> Vec<String> {
    buffer.lines().map(|line| line.text).collect()
}

/// Run one invocation that sets the cursor line to `indentation`
pub fn reindent(
    buffer: &mut Buffer,
    cursor_line: usize,
    indentation: &str,
    argument: Argument,
    config: &ReindentConfig,
    cycle: &mut CycleState,
) -> AffectedRange {
    let classifier = KeywordClassifier;
    let mut indenter = FixedIndenter::new(indentation);
    let mut presenter = NoopPresenter;
    let mut host = Host {
        classifier: &classifier,
        indenter: &mut indenter,
        presenter: &mut presenter,
    };
    let invocation = Invocation {
        command: CommandId::new("indent-and-extend"),
        cursor_line,
        argument,
    };
    indent_and_extend(buffer, &invocation, config, cycle, &mut host).unwrap()
}

/// One line per buffer line, `*` marking lines inside `range`
pub fn render(buffer: &Buffer, range: &AffectedRange) -> String {
    let mut out = String::new();
    for (index, line) in buffer.lines().enumerate() {
        let mark = if range.contains(index) { '*' } else { ' ' };
        writeln!(out, "{:02}{mark}|{:?}", index + 1, line.text).unwrap();
    }
    out
}
