//! Styled terminal output.

use std::fmt::Display;

use console::{Term, style};
use sender_grid_business::{Notification, NotificationLevel};

pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    pub fn notification(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => self.success(&notification.message),
            NotificationLevel::Error => self.error(&notification.message),
        }
    }

    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a total summary line, e.g. `Total: 3 of 5 sender(s)`.
    pub fn total(&self, label: impl Display, shown: usize, loaded: usize) {
        let summary = if shown == loaded {
            format!("{loaded} sender(s)")
        } else {
            format!("{shown} of {loaded} sender(s)")
        };
        drop(self.term.write_line(&format!(
            "\n{}: {}",
            style(label).bold(),
            style(summary).cyan()
        )));
    }
}
