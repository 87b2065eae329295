use colored::Colorize;

pub fn header(title: &str) {
    println!("{}", title.bold().underline());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<12} {}", format!("{label}:"), value);
}

pub fn info(msg: &str) {
    eprintln!("{} {}", "info:".blue().bold(), msg);
}

pub fn anomaly(msg: &str) {
    println!("{} {}", "anomaly:".red().bold(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}
