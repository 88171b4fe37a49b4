use super::*;

#[test]
fn buffer_handler_captures_lines() {
    let handler = buffer_handler();
    handler.println("hello");
    handler.println("world");
    assert_eq!(handler.output(), "hello\nworld\n");
}

#[test]
fn buffer_handler_clear_empties_buffer() {
    let handler = buffer_handler();
    handler.println("hello");
    handler.clear();
    assert!(handler.output().is_empty());
}

#[test]
fn silent_handler_discards() {
    let handler = silent_handler();
    handler.println("nobody hears this");
    assert_eq!(handler.output(), "");
}

#[test]
fn stdout_handler_captures_nothing() {
    let handler = stdout_handler();
    assert_eq!(handler.output(), "");
    handler.clear();
}
