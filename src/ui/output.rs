//! Console output: cliclack frames on a terminal, tagged lines otherwise

use super::context::UiContext;
use console::{style, StyledObject};

/// Outcome tag of a single output line
#[derive(Debug, Clone, Copy)]
enum Mark {
    Ok,
    Warn,
    Info,
}

impl Mark {
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Mark::Ok => style("[OK]").green(),
            Mark::Warn => style("[WARN]").yellow(),
            Mark::Info => style("[INFO]").cyan(),
        }
    }

    fn log(self, text: String) {
        let _ = match self {
            Mark::Ok => cliclack::log::success(text),
            Mark::Warn => cliclack::log::warning(text),
            Mark::Info => cliclack::log::info(text),
        };
    }
}

fn step(ctx: &UiContext, mark: Mark, message: &str, detail: Option<String>) {
    let text = match detail {
        Some(detail) => format!("{} {}", message, detail),
        None => message.to_string(),
    };
    if ctx.decorated() {
        mark.log(text);
    } else {
        println!("  {} {}", mark.tag(), text);
    }
}

/// Title line of a command
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.decorated() {
        let _ = cliclack::intro(style(title).cyan().bold());
    } else {
        println!("{}\n", style(title).cyan().bold());
    }
}

pub fn outro_success(ctx: &UiContext, message: &str) {
    if ctx.decorated() {
        let _ = cliclack::outro(style(message).green().bold());
    } else {
        println!("\n{} {}", style("[OK]").green(), message);
    }
}

pub fn outro_error(ctx: &UiContext, message: &str) {
    if ctx.decorated() {
        let _ = cliclack::outro(style(message).red().bold());
    } else {
        println!("\n{} {}", style("[ERROR]").red(), message);
    }
}

/// Multi-line block such as a generated manifest fragment.
///
/// Plain output puts the title on its own line and indents the body.
pub fn note(ctx: &UiContext, title: &str, body: &str) {
    if ctx.decorated() {
        let _ = cliclack::note(title, body);
        return;
    }
    println!("{}", style(title).bold());
    for line in body.lines() {
        println!("    {}", line);
    }
}

pub fn section(ctx: &UiContext, title: &str) {
    println!();
    if ctx.decorated() {
        let _ = cliclack::log::info(style(title).bold());
    } else {
        println!("{}", style(title).bold());
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    step(ctx, Mark::Ok, message, None);
}

/// Success line with a dimmed detail, usually a path
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(ctx, Mark::Ok, message, Some(format!("({})", style(detail).dim())));
}

pub fn step_warn(ctx: &UiContext, message: &str) {
    step(ctx, Mark::Warn, message, None);
}

/// Warning followed by what to do about it
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    step(ctx, Mark::Warn, message, Some(format!("- {}", style(hint).dim())));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    step(ctx, Mark::Info, message, None);
}

/// Dimmed follow-up line, e.g. the command to run next
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.decorated() {
        let _ = cliclack::log::remark(message);
    } else {
        println!("  {}", style(message).dim());
    }
}

pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    let key = if ctx.decorated() { style(key).dim() } else { style(key) };
    println!("  {}: {}", key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_does_not_panic() {
        let ctx = UiContext::non_interactive();
        intro(&ctx, "Generate module");
        note(&ctx, "submodules.pri", "SUBDIRS += fw_core\n\nSUBDIRS += myco_tool");
        step_ok_detail(&ctx, "Sorted 3 entries", "/work/submodules.pri");
        step_warn_hint(&ctx, "Config already exists", "Use --force to overwrite");
        key_value(&ctx, "Module", "myco_tool");
        outro_success(&ctx, "Done");
    }
}
