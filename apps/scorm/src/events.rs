//! Event handling and status display

use crate::logging::log_event_with_tracing;
use console::{Style, Term};
use scorm_events::{AppEvent, EventMessage, GeneralEvent, GradingEvent, PackageEvent};

/// Renders events as one-line status messages on stderr
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    debug_enabled: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug_enabled: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            debug_enabled,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        if self.debug_enabled {
            log_event_with_tracing(&message);
        }

        match message.event {
            AppEvent::General(event) => self.handle_general_event(event),
            AppEvent::Package(event) => self.handle_package_event(event),
            AppEvent::Grade(event) => self.handle_grade_event(event),
        }
    }

    fn handle_general_event(&self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => self.show_warning(&format!("{message} ({context})")),
                None => self.show_warning(&message),
            },
            GeneralEvent::Error { message, details } => match details {
                Some(details) => self.show_error(&format!("{message}: {details}")),
                None => self.show_error(&message),
            },
            GeneralEvent::OperationFailed { operation, error } => {
                self.show_error(&format!("{operation} failed: {error}"));
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug_enabled {
                    self.show_status(&message);
                }
            }
            GeneralEvent::OperationStarted { .. } | GeneralEvent::OperationCompleted { .. } => {}
        }
    }

    fn handle_package_event(&self, event: PackageEvent) {
        match event {
            PackageEvent::IngestStarted {
                original_name,
                size_bytes,
                ..
            } => {
                self.show_status(&format!(
                    "Ingesting {original_name} ({})",
                    format_size(size_bytes)
                ));
            }
            PackageEvent::EntriesExtracted { count, .. } => {
                self.show_status(&format!("Extracted {count} entries"));
            }
            PackageEvent::IngestCompleted {
                scorm_version,
                entry_page,
                ..
            } => {
                self.show_success(&format!(
                    "Ingested {scorm_version} package, entry page {entry_page}"
                ));
            }
            PackageEvent::IngestRejected { failure, .. } => {
                self.show_warning(&format!("Package rejected: {}", failure.message));
            }
            PackageEvent::IngestFailed { failure, .. } => {
                self.show_error(&format!("Package ingestion failed: {}", failure.message));
            }
            PackageEvent::Fingerprinted { content_hash, .. } => {
                if self.debug_enabled {
                    self.show_status(&format!("Content hash {content_hash}"));
                }
            }
            PackageEvent::ArchiveStored { .. } => {}
        }
    }

    fn handle_grade_event(&self, event: GradingEvent) {
        match event {
            GradingEvent::Published {
                learner_id,
                value,
                max_value,
                ..
            } => {
                self.show_success(&format!(
                    "Grade {value:.2} of {max_value} published for {learner_id}"
                ));
            }
            GradingEvent::WriteIgnoredPastDue { name, .. } => {
                self.show_warning(&format!("Due date has passed, {name} was not saved"));
            }
        }
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colors_enabled)
    }

    fn show_status(&self, message: &str) {
        let _ = self.term.write_line(message);
    }

    fn show_success(&self, message: &str) {
        let style = self.style(Style::new().green());
        let _ = self.term.write_line(&style.apply_to(message).to_string());
    }

    fn show_warning(&self, message: &str) {
        let style = self.style(Style::new().yellow());
        let _ = self.term.write_line(&format!("{} {message}", style.apply_to("warning:")));
    }

    fn show_error(&self, message: &str) {
        let style = self.style(Style::new().red().bold());
        let _ = self.term.write_line(&format!("{} {message}", style.apply_to("error:")));
    }
}

/// Format a byte count for humans
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    #[allow(clippy::cast_precision_loss)]
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
