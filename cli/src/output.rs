use colored::*;

/// Print the gateway's answer to stdout
pub fn print_answer(answer: &str) {
    println!("{}: {}", "AI response".blue().bold(), answer);
}

/// Print a terminal error to stderr
pub fn print_error(context: &str, error: &dyn std::fmt::Display) {
    eprintln!("{} {}: {}", "[ERROR]".red().bold(), context, error);
}
