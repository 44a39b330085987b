//! Progress indicators with CI fallback

use super::context::UiContext;
use crate::progress::{ProgressEvent, ProgressSink};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

/// Bar resolution; pipeline fractions are mapped onto `0..=BAR_LENGTH`
const BAR_LENGTH: u64 = 1000;

/// Renders pipeline progress to the terminal.
///
/// Shows an indicatif bar in interactive mode and plain step lines in CI.
/// Every event is mirrored to tracing as well.
pub struct PipelineProgress {
    bar: Option<ProgressBar>,
}

impl PipelineProgress {
    pub fn new(ctx: &UiContext, label: &str) -> Self {
        let bar = if ctx.decorated() {
            let bar = ProgressBar::new(BAR_LENGTH);
            let style = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} {prefix}  {bar:20.cyan/dim} {percent:>3}% {msg:.dim}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .progress_chars("━╸─");
            bar.set_style(style);
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            Some(bar)
        } else {
            println!("{}...", label);
            None
        };
        Self { bar }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

impl ProgressSink for PipelineProgress {
    fn record(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Step { name, .. } => info!("{}", name),
            ProgressEvent::Message { text, .. } => info!("{}", text),
            ProgressEvent::Error { text, .. } => warn!("{}", text),
            ProgressEvent::Fraction(_) => {}
        }

        match (&self.bar, event) {
            (Some(bar), ProgressEvent::Fraction(f)) => {
                bar.set_position((f.clamp(0.0, 1.0) * BAR_LENGTH as f32).round() as u64);
            }
            (Some(bar), ProgressEvent::Message { text, .. }) => bar.set_message(text),
            (Some(bar), event) => {
                if let Some(line) = render(&event) {
                    bar.println(line);
                }
            }
            (None, event @ ProgressEvent::Error { .. }) => {
                if let Some(line) = render(&event) {
                    eprintln!("{}", line);
                }
            }
            (None, event) => {
                if let Some(line) = render(&event) {
                    println!("{}", line);
                }
            }
        }
    }
}

/// Plain text line for an event; fractions have none
fn render(event: &ProgressEvent) -> Option<String> {
    match event {
        ProgressEvent::Step { depth, name } => {
            Some(format!("{}{} {}", indent(*depth), style("●").cyan(), name))
        }
        ProgressEvent::Message { depth, text } => {
            Some(format!("{}  {}", indent(*depth), style(text).dim()))
        }
        ProgressEvent::Error { depth, text } => {
            Some(format!("{}  {} {}", indent(*depth), style("[FAIL]").red(), text))
        }
        ProgressEvent::Fraction(_) => None,
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Progress;

    #[test]
    fn plain_sink_draws_no_bar() {
        let ctx = UiContext::non_interactive();
        let sink = PipelineProgress::new(&ctx, "Updating cache");
        assert!(sink.bar.is_none());

        let mut root = Progress::new(&sink);
        let step = root.child("Cloning template modules", 0.5);
        step.add_message("Cloning: git@example.com:fw/fw_core.git");
        assert!((root.progress() - 0.5).abs() < f32::EPSILON);
        sink.finish();
    }

    #[test]
    fn events_render_with_indent_and_tag() {
        let step = render(&ProgressEvent::Step {
            depth: 2,
            name: "Fetching submodules".to_string(),
        })
        .unwrap();
        assert!(step.starts_with("  "));
        assert!(step.contains("Fetching submodules"));

        let error = render(&ProgressEvent::Error {
            depth: 1,
            text: "Return code: 128".to_string(),
        })
        .unwrap();
        assert!(error.contains("[FAIL]"));
        assert!(error.contains("Return code: 128"));

        assert!(render(&ProgressEvent::Fraction(0.3)).is_none());
    }

    #[test]
    fn indent_by_depth() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "");
        assert_eq!(indent(3), "    ");
    }
}
