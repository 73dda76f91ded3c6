use crate::models::Category;

/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";


/// Color used for a day category in listings.
pub fn color_for_category(c: Category) -> &'static str {
    match c {
        Category::Company => GREEN,
        Category::School => CYAN,
        Category::Vacation | Category::Holiday => YELLOW,
        Category::Sick => RED,
    }
}

/// Returns GREY for empty or placeholder values.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "-" || value.trim() == "0:00" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
