use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use crate::errors::ErrorKind;
use crate::wire::{ComposedPrompt, GenerationResult, Preferences, ProgressEvent};

/// Progress bar driven by checkpoint events. Hidden when disabled so the
/// sink below can be used unconditionally.
pub fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg} ({elapsed})") {
        pb.set_style(style.progress_chars("=>-"));
    }
    // Checkpoints are coarse; keep the spinner moving during the round trip.
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn progress_sink(pb: &ProgressBar) -> impl Fn(&ProgressEvent) + Send + Sync {
    let pb = pb.clone();
    move |e: &ProgressEvent| {
        pb.set_position(e.progress as u64);
        pb.set_message(e.message.clone());
    }
}

pub fn show_preferences(prefs: &Preferences) {
    println!("\n=== DESIGN PREFERENCES ===");
    let colors = prefs.colors.as_deref().map(|c| c.bold().to_string()).unwrap_or_else(|| "default palette".dimmed().to_string());
    let fonts = prefs.fonts.as_deref().map(|f| f.bold().to_string()).unwrap_or_else(|| "default fonts".dimmed().to_string());
    println!("  {}  {}", "Colors:".cyan().bold(), colors);
    println!("  {}   {}", "Fonts:".cyan().bold(), fonts);
    println!();
}

pub fn show_composed(composed: &ComposedPrompt) {
    println!("{}", "=== COMPOSED PROMPT ===".bold());
    println!("{}", composed.payload());
    println!(
        "\n{} instruction {}, request {}",
        "size:".dimmed(),
        format_size(composed.system_instruction.len(), DECIMAL),
        format_size(composed.user_prompt.len(), DECIMAL)
    );
}

pub fn print_success(out: &Path, html: &str, elapsed: Duration) {
    println!(
        "\n{}  {} ({}, {} lines) in {:.1}s",
        "[DONE]".green().bold(),
        out.display(),
        format_size(html.len(), DECIMAL),
        html.lines().count(),
        elapsed.as_secs_f32()
    );
}

pub fn print_failure(result: &GenerationResult) {
    let msg = result.error().unwrap_or("generation failed");
    println!("\n{}  {}", "[FAILED]".red().bold(), msg);
    let hint = match result.error_kind() {
        Some(ErrorKind::InvalidInput) => "provide a design request with --prompt or on stdin",
        Some(ErrorKind::Configuration) => "the model provider credential is missing; fix the endpoint configuration",
        Some(ErrorKind::Transport) => "the endpoint could not be reached or failed; try again",
        Some(ErrorKind::Incomplete) => "the page came back truncated; resubmitting the same request usually helps",
        None => return,
    };
    println!("{}", hint.dimmed());
}

/// Read the whole request from stdin.
pub fn read_prompt() -> io::Result<String> {
    let mut s = String::new();
    io::stdin().read_to_string(&mut s)?;
    Ok(s.trim().to_string())
}
