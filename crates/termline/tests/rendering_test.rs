// Exact-output tests for the prompt redraw engine.

mod common;

use common::ScriptedInput;
use termline::Prompt;

fn prompt_over(bytes: &[u8], prompt: &str) -> Prompt<ScriptedInput, Vec<u8>> {
    Prompt::new(ScriptedInput::bytes(bytes), Vec::new(), prompt)
}

fn output_string(prompt: &Prompt<ScriptedInput, Vec<u8>>) -> String {
    String::from_utf8(prompt.output().clone()).expect("prompt output was not UTF-8")
}

#[test]
fn test_echoes_typed_line() {
    let mut prompt = prompt_over(b"abc\r", "> ");
    let outcome = prompt.read_line().unwrap();
    assert_eq!(outcome.line, "abc");
    assert_eq!(output_string(&prompt), "> abc\r\n");
}

#[test]
fn test_backspace_blanks_last_cell() {
    let mut prompt = prompt_over(b"ab\x7f\r", "> ");
    assert_eq!(prompt.read_line().unwrap().line, "a");
    // Step back, overwrite with a space, step back again
    assert_eq!(output_string(&prompt), "> ab\x1b[D \x1b[D\r\n");
}

#[test]
fn test_cursor_motion_emits_single_move() {
    let mut prompt = prompt_over(b"ab\x1b[D\r", "> ");
    prompt.read_line().unwrap();
    assert_eq!(output_string(&prompt), "> ab\x1b[D\r\n");
}

#[test]
fn test_mid_line_insertion_rewrites_tail() {
    let mut prompt = prompt_over(b"ac\x1b[Db\r", "> ");
    assert_eq!(prompt.read_line().unwrap().line, "abc");
    // After the insert only "bc" is rewritten, then the cursor steps back
    assert_eq!(output_string(&prompt), "> ac\x1b[Dbc\x1b[D\r\n");
}

#[test]
fn test_prompt_reprinted_each_read() {
    let mut prompt = prompt_over(b"a\rb\r", "> ");
    assert_eq!(prompt.read_line().unwrap().line, "a");
    assert_eq!(prompt.read_line().unwrap().line, "b");
    assert_eq!(output_string(&prompt), "> a\r\n> b\r\n");
}

#[test]
fn test_set_prompt_takes_effect_next_read() {
    let mut prompt = prompt_over(b"a\rb\r", "> ");
    prompt.read_line().unwrap();
    prompt.set_prompt("$ ");
    prompt.read_line().unwrap();
    assert_eq!(output_string(&prompt), "> a\r\n$ b\r\n");
}

#[test]
fn test_password_read_is_not_echoed() {
    let mut prompt = prompt_over(b"secret\r", "> ");
    assert_eq!(prompt.read_password().unwrap().line, "secret");
    assert_eq!(output_string(&prompt), "> \r\n");
}

#[test]
fn test_scrolling_viewport_rewrites_with_overflow_glyph() {
    let mut prompt = Prompt::<ScriptedInput, Vec<u8>>::builder()
        .with_prompt("> ")
        .with_input_width(10)
        .with_max_line_length(100)
        .with_scroll_by(5)
        .build(ScriptedInput::bytes(b"abcdefghijkl\r"), Vec::new());

    let outcome = prompt.read_line().unwrap();
    assert_eq!(outcome.line, "abcdefghijkl");

    // The first eight runes echo plainly. The ninth reaches the scroll
    // threshold: the viewport shifts by five, the whole input area is
    // rewritten behind a left-overflow glyph and padded clean, and the
    // remaining runes append normally.
    assert_eq!(
        output_string(&prompt),
        "> abcdefgh\x1b[8D…ghi    \x1b[4Djkl\r\n"
    );
}

#[test]
fn test_unconfigured_prompt_never_scrolls() {
    let text = "x".repeat(40);
    let script = format!("{text}\r");
    let mut prompt = prompt_over(script.as_bytes(), "> ");
    prompt.read_line().unwrap();
    assert_eq!(output_string(&prompt), format!("> {text}\r\n"));
}

#[test]
fn test_multibyte_runes_echo_once() {
    let mut prompt = prompt_over("héllo\r".as_bytes(), "> ");
    assert_eq!(prompt.read_line().unwrap().line, "héllo");
    assert_eq!(output_string(&prompt), "> héllo\r\n");
}

#[test]
fn test_backspace_on_empty_line_draws_nothing() {
    let mut prompt = prompt_over(b"\x7f\r", "> ");
    assert_eq!(prompt.read_line().unwrap().line, "");
    assert_eq!(output_string(&prompt), "> \r\n");
}

#[test]
fn test_history_recall_redraws_line() {
    let mut prompt = prompt_over(b"one\r\x1b[A\r", "> ");
    assert_eq!(prompt.read_line().unwrap().line, "one");
    assert_eq!(prompt.read_line().unwrap().line, "one");
    // The recalled entry is drawn in full on the fresh line
    assert_eq!(output_string(&prompt), "> one\r\n> one\r\n");
}
