//! Human-readable command preview
//!
//! The preview is for reading and copying only. Quoting is applied for
//! display and the result is never parsed back into settings.

use crate::constants::tool;

/// Characters that make an argument need quoting
const SHELL_SPECIAL: &[char] = &[
    '"', '\'', '$', '`', '\\', '|', '&', ';', '<', '>', '(', ')', '*', '?', '!', '#', '~', '{', '}', '[', ']',
];

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || SHELL_SPECIAL.contains(&c))
}

/// Double-quote `arg` if it is empty or holds whitespace or shell syntax
pub fn quote(arg: &str) -> String {
    if !needs_quoting(arg) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Render an argument vector as `scrcpy arg1 arg2 ...`
pub fn format<S: AsRef<str>>(args: &[S]) -> String {
    let mut line = String::from(tool::PROGRAM);
    for arg in args {
        line.push(' ');
        line.push_str(&quote(arg.as_ref()));
    }
    line
}
