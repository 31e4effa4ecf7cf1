//! Console presentation: banner, closing messages and the lookup progress bar.

use crate::domain::ports::ProgressSink;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{spinner:.magenta} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

pub fn apply_color_preference() {
    if is_color_disabled() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

pub fn banner() -> String {
    format!(
        "\n  {}\n  {}\n\n  {}\n  {}\n  {}\n",
        style("cpf phone extractor").cyan().bold(),
        style("you are responsible for how you use this tool").magenta(),
        style("Looks up the phone number of every CPF in a text file").yellow(),
        style("and saves the results to an Excel workbook.").yellow(),
        style("example: input => combolist_23.txt, output => combolist_23.xlsx").green(),
    )
}

pub fn print_banner() {
    println!("{}", banner());
}

pub fn print_done(output_path: &str, rows: usize, found: usize) {
    println!("{} {}", style("[@]").green(), style("Done!").yellow());
    println!(
        "{} {} of {} phone numbers found, saved to {}",
        style("[@]").green(),
        found,
        rows,
        style(output_path).white().bold()
    );
}

pub fn print_goodbye() {
    println!("{} {}", style("[!]").red(), style("Goodbye...").yellow());
}

pub fn print_error(message: &str, suggestion: &str) {
    eprintln!("{} {}", style("[!]").red().bold(), message);
    eprintln!("{} {}", style("[?]").yellow(), suggestion);
}

/// A progress bar for `total` lookups, drawn on stderr.
pub fn lookup_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(progress_style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        bar.set_style(progress_style.progress_chars("#>-"));
    }
    bar
}

impl ProgressSink for ProgressBar {
    fn start(&self, total: u64) {
        self.set_length(total);
        self.set_position(0);
    }

    fn advance(&self) {
        self.inc(1);
    }

    fn finish(&self) {
        self.finish_and_clear();
    }
}
