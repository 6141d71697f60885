mod common;

use blockindent_engine::{
    AffectedRange, Argument, Buffer, CycleMode, CycleState, Host, NoopPresenter, PythonIndenter,
    PythonLineClassifier, ReindentConfig, Session,
};
use common::{buffer, lines, reindent, render};
use pretty_assertions::assert_eq;

#[test]
fn nested_function_body_moves_as_one_block() {
    let mut buf = buffer(&[
        "def f():",
        "    x = 1",
        "    if x:",
        "        y = 2",
        "",
        "        z = 3",
        "    w = 4",
    ]);

    let range = reindent(
        &mut buf,
        1,
        "  ",
        Argument::Absent,
        &ReindentConfig::default(),
        &mut CycleState::new(),
    );

    assert_eq!(range, AffectedRange { start: 1, end: 7 });
    insta::assert_snapshot!("nested_function_body", render(&buf, &range));
}

#[test]
fn sibling_after_blank_line_stops_the_block() {
    let mut buf = buffer(&["s1()", "s2()", "", "s3()"]);

    let range = reindent(
        &mut buf,
        0,
        "    ",
        Argument::Absent,
        &ReindentConfig::default(),
        &mut CycleState::new(),
    );

    assert_eq!(range, AffectedRange { start: 0, end: 2 });
    assert_eq!(lines(&buf), vec!["    s1()", "    s2()", "", "s3()"]);
}

fn press(session: &mut Session, line: usize, argument: Argument) -> AffectedRange {
    let classifier = PythonLineClassifier::new();
    let mut indenter = PythonIndenter::new();
    let mut presenter = NoopPresenter;
    let mut host = Host {
        classifier: &classifier,
        indenter: &mut indenter,
        presenter: &mut presenter,
    };
    session.indent_and_extend(line, argument, &mut host).unwrap()
}

const LOOP: &str = "\
def f(items):
    for item in items:
        if item:
        print(item)
        log(
            item)
        total = 1
    return total
";

#[test]
fn repeated_presses_cycle_the_whole_block() {
    let mut session = Session::new(Buffer::from(LOOP), ReindentConfig::default());

    // First press: `print` belongs under `if item:`, and its siblings follow
    let first = press(&mut session, 3, Argument::Absent);
    assert_eq!(first, AffectedRange { start: 3, end: 7 });
    insta::assert_snapshot!("cycle_first_press", render(session.buffer(), &first));

    // Pressing again moves the line one level out over the same lines
    let second = press(&mut session, 3, Argument::Absent);
    assert_eq!(session.cycle_state().mode(), CycleMode::Cycling);
    assert_eq!(second, AffectedRange { start: 3, end: 7 });
    assert_eq!(session.buffer().text(), LOOP);
    insta::assert_snapshot!("cycle_second_press", render(session.buffer(), &second));
}

#[test]
fn dedenting_a_block_start_carries_its_body() {
    let source = "\
class A:
    def f(self):
        return 1
        def g(self):
            x = (1,
                 2)

            return x
";
    let mut session = Session::new(Buffer::from(source), ReindentConfig::default());

    let range = press(&mut session, 3, Argument::Absent);

    assert_eq!(range, AffectedRange { start: 3, end: 8 });
    insta::assert_snapshot!("dedent_block_start", render(session.buffer(), &range));
}
