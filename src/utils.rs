use std::fmt::Display;

use console::{StyledObject, style};

/// # `MessageType`
/// Trait for message types.
trait MessageType {
    /// The emoji prefix for each message type (e.g., "🚨 ERROR")
    const PREFIX: &'static str;

    /// Whether to output to stderr (true) or stdout (false)
    const TO_STDERR: bool = false;

    /// Colors the prefix.
    fn paint(prefix: &'static str) -> StyledObject<&'static str>;
}

// Define the message types
struct Error;
struct Warning;
struct Success;
struct Info;

impl MessageType for Error {
    const PREFIX: &'static str = "🚨 ERROR";
    const TO_STDERR: bool = true;

    fn paint(prefix: &'static str) -> StyledObject<&'static str> {
        style(prefix).for_stderr().red().bold()
    }
}

impl MessageType for Warning {
    const PREFIX: &'static str = "⚠️ WARNING";
    const TO_STDERR: bool = true;

    fn paint(prefix: &'static str) -> StyledObject<&'static str> {
        style(prefix).for_stderr().yellow().bold()
    }
}

impl MessageType for Success {
    const PREFIX: &'static str = "✅ SUCCESS";

    fn paint(prefix: &'static str) -> StyledObject<&'static str> {
        style(prefix).green().bold()
    }
}

impl MessageType for Info {
    const PREFIX: &'static str = "ℹ️ INFO";

    fn paint(prefix: &'static str) -> StyledObject<&'static str> {
        style(prefix).cyan().bold()
    }
}

/// # `format_message`
/// Formats a message, with an optional suggestion after a blank line.
fn format_message<T: MessageType>(title: &str, details: &str, suggestion: Option<&str>) -> String {
    let message = format!("{}: {title}\n\n{details}", T::paint(T::PREFIX));

    match suggestion {
        Some(suggestion) => format!("{message}\n\n{suggestion}"),
        None => message,
    }
}

fn print_message<T: MessageType>(title: &str, details: &str, suggestion: Option<&str>) {
    let message = format_message::<T>(title, details, suggestion);

    if T::TO_STDERR {
        eprintln!("{message}");
    } else {
        println!("{message}");
    }
}

/// # `print_error`
/// Prints an error message with a consistent format for user-friendly display.
///
/// ## Arguments
/// - `title`: The title of the error message.
/// - `details`: The details of the error message.
/// - `suggestion`: The suggestion for resolving the error.
pub fn print_error(title: &str, details: &str, suggestion: &str) {
    print_message::<Error>(title, details, Some(suggestion));
}

/// # `print_warning`
/// Prints a warning message with a consistent format for user-friendly display.
pub fn print_warning(title: &str, details: &str) {
    print_message::<Warning>(title, details, None);
}

/// # `print_success`
/// Prints a success message with a consistent format for user-friendly display.
pub fn print_success(title: &str, details: &str) {
    print_message::<Success>(title, details, None);
}

/// # `print_info`
/// Prints an informational message with a consistent format for user-friendly display.
pub fn print_info(title: &str, details: &str) {
    print_message::<Info>(title, details, None);
}

/// # `print_commit_message`
/// Prints a commit message (or git's answer to it) on its own, highlighted.
pub fn print_commit_message(message: &str) {
    println!("{}", style(message).color256(122));
}

/// # `format_list`
/// Formats a list of items with a consistent format for user-friendly display.
///
/// ## Returns
/// * String - A formatted string representation of the list.
pub fn format_list<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
