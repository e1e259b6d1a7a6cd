//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use scorm_ops::{OperationResult, ProxyResponse};
use scorm_types::{
    AuthorMessage, BlockSettings, ColorChoice, GetResponse, LearnerState, SetResponse,
    StudentViewContext, SubmitReport,
};
use std::io;

use crate::events::format_size;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            Self::render_json(result)
        } else {
            self.render_table(result)
        }
    }

    fn render_json(result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Submit(report) => self.render_submit_report(report),
            OperationResult::Value(response) => Self::render_value(response),
            OperationResult::SetResult(response) => self.render_set_result(response),
            OperationResult::Proxied(response) => Self::render_proxied(response),
            OperationResult::StudentView(view) => self.render_student_view(view),
            OperationResult::AuthorMessage(message) => self.render_author_message(message),
            OperationResult::Block(settings) => self.render_block(settings),
            OperationResult::LearnerState(state) => self.render_learner_state(state),
            OperationResult::Success(message) => self.render_success_message(message),
        }
    }

    fn render_submit_report(&self, report: &SubmitReport) -> io::Result<()> {
        if report.errors.is_empty() {
            return self.render_success_message("Settings saved");
        }
        let style = self.style(Style::new().yellow());
        println!("Settings saved, but the package was not accepted:");
        for error in &report.errors {
            println!("  {} {error}", style.apply_to("•"));
        }
        Ok(())
    }

    fn render_value(response: &GetResponse) -> io::Result<()> {
        match &response.value {
            serde_json::Value::String(text) => println!("{text}"),
            other => println!("{other}"),
        }
        Ok(())
    }

    fn render_set_result(&self, response: &SetResponse) -> io::Result<()> {
        let mut table = self.new_table();
        table.set_header(vec![
            Self::header("Result"),
            Self::header("Completion"),
            Self::header("Score"),
        ]);
        table.add_row(vec![
            Cell::new(&response.result).fg(Color::Green),
            Cell::new(&response.completion_status),
            Cell::new(
                response
                    .lesson_score
                    .map_or_else(|| "-".to_string(), |score| format!("{score:.2}")),
            ),
        ]);
        println!("{table}");
        Ok(())
    }

    fn render_proxied(response: &ProxyResponse) -> io::Result<()> {
        println!(
            "{} ({})",
            response.content_type,
            format_size(response.size as u64)
        );
        Ok(())
    }

    fn render_student_view(&self, view: &StudentViewContext) -> io::Result<()> {
        println!("{}", self.style(Style::new().bold()).apply_to(&view.display_name));
        println!();
        if view.index_page_url.is_empty() {
            println!("Entry page:  (no package)");
        } else {
            println!("Entry page:  {}", view.index_page_url);
        }
        println!("Version:     {}", view.version_scorm);
        println!("Status:      {}", view.completion_status);
        println!("Grade:       {:.2}", view.grade);
        match view.width {
            Some(width) => println!("Frame:       {width}x{}", view.height),
            None => println!("Frame:       auto x {}", view.height),
        }
        Ok(())
    }

    fn render_author_message(&self, message: &AuthorMessage) -> io::Result<()> {
        let style = if message.has_package {
            Style::new().green()
        } else {
            Style::new().yellow()
        };
        println!("{}", self.style(style).apply_to(&message.message));
        Ok(())
    }

    fn render_block(&self, settings: &BlockSettings) -> io::Result<()> {
        let mut table = self.new_table();
        table.set_header(vec![Self::header("Setting"), Self::header("Value")]);
        let due = settings
            .due
            .map_or_else(|| "-".to_string(), |due| due.to_rfc3339());
        let grace = settings
            .grace_period_secs
            .map_or_else(|| "-".to_string(), |secs| format!("{secs}s"));
        let rows = [
            ("Block", settings.block_id().to_string()),
            ("Display name", settings.display_name.clone()),
            ("Scored", settings.has_score.to_string()),
            ("Weight", settings.weight.to_string()),
            ("Version", settings.version_scorm.to_string()),
            ("Entry page", settings.path_index_page.clone()),
            ("Due", due),
            ("Grace period", grace),
        ];
        for (name, value) in rows {
            table.add_row(vec![Cell::new(name), Cell::new(value)]);
        }
        println!("{table}");
        Ok(())
    }

    fn render_learner_state(&self, state: &LearnerState) -> io::Result<()> {
        let mut table = self.new_table();
        table.set_header(vec![
            Self::header("Lesson status"),
            Self::header("Success status"),
            Self::header("Score"),
        ]);
        table.add_row(vec![
            Cell::new(&state.lesson_status),
            Cell::new(state.success_status.to_string()),
            Cell::new(format!("{:.2}", state.lesson_score)),
        ]);
        println!("{table}");
        Ok(())
    }

    fn render_success_message(&self, message: &str) -> io::Result<()> {
        let style = self.style(Style::new().green());
        println!("{}", style.apply_to(message));
        Ok(())
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.colors_enabled() {
            table.force_no_tty();
        }
        table
    }

    fn header(name: &str) -> Cell {
        Cell::new(name).add_attribute(Attribute::Bold)
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colors_enabled())
    }

    fn colors_enabled(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}
