//! Styled terminal output helpers.

use console::style;

pub fn info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

pub fn success(message: &str) {
    println!("{} {}", style("✔").green(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow(), message);
}

pub fn error(message: &str) {
    // Errors are always shown, even in quiet mode
    eprintln!("{} {}", style("✖").red(), message);
}
