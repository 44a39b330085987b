//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{ForgeError, ForgeResult};

fn task_failed(e: tokio::task::JoinError) -> ForgeError {
    ForgeError::User(format!("Prompt task failed: {}", e))
}

fn prompt_failed(e: std::io::Error) -> ForgeError {
    ForgeError::User(format!("Prompt failed: {}", e))
}

/// Prompt for confirmation, returns default if non-interactive or auto-yes
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> ForgeResult<bool> {
    // Auto-yes mode bypasses prompts
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack prompts block, keep them off the runtime threads
    let message = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(task_failed)?
    .map_err(prompt_failed)
}

/// Prompt for selection from a list of options
/// Returns the selected value or the first option if non-interactive
pub async fn select<T: Clone + Send + Eq + 'static>(
    ctx: &UiContext,
    message: &str,
    options: &[(T, &str, &str)], // (value, label, hint)
) -> ForgeResult<T> {
    let Some(first) = options.first() else {
        return Err(ForgeError::User(format!("{}: nothing to choose from", message)));
    };

    if !ctx.is_interactive() || ctx.auto_yes() {
        return Ok(first.0.clone());
    }

    let message = message.to_string();
    let items: Vec<(T, String, String)> = options
        .iter()
        .map(|(v, l, h)| (v.clone(), l.to_string(), h.to_string()))
        .collect();

    tokio::task::spawn_blocking(move || {
        let mut select = cliclack::select(&message);
        for (value, label, hint) in items {
            select = select.item(value, label, hint);
        }
        select.interact()
    })
    .await
    .map_err(task_failed)?
    .map_err(prompt_failed)
}

/// Prompt for any number of options, starting from `initial`.
/// Returns `initial` unchanged if non-interactive.
pub async fn multiselect<T: Clone + Send + Eq + 'static>(
    ctx: &UiContext,
    message: &str,
    options: &[(T, &str, &str)],
    initial: Vec<T>,
) -> ForgeResult<Vec<T>> {
    if !ctx.is_interactive() || ctx.auto_yes() || options.is_empty() {
        return Ok(initial);
    }

    let message = message.to_string();
    let items: Vec<(T, String, String)> = options
        .iter()
        .map(|(v, l, h)| (v.clone(), l.to_string(), h.to_string()))
        .collect();

    tokio::task::spawn_blocking(move || {
        let mut select = cliclack::multiselect(&message)
            .initial_values(initial)
            .required(false);
        for (value, label, hint) in items {
            select = select.item(value, label, hint);
        }
        select.interact()
    })
    .await
    .map_err(task_failed)?
    .map_err(prompt_failed)
}

/// Prompt for a line of text. Non-interactive mode cannot answer, so the
/// caller must pass the value on the command line.
pub async fn input(ctx: &UiContext, message: &str, flag: &str) -> ForgeResult<String> {
    if !ctx.is_interactive() {
        return Err(ForgeError::User(format!(
            "{} is required in non-interactive mode (pass {})",
            message, flag
        )));
    }

    let message = message.to_string();
    tokio::task::spawn_blocking(move || cliclack::input(&message).interact::<String>())
        .await
        .map_err(task_failed)?
        .map_err(prompt_failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_auto_yes() {
        let ctx = UiContext::non_interactive().with_auto_yes(true);
        let result = confirm(&ctx, "Test?", false).await.unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn confirm_non_interactive_default() {
        let ctx = UiContext::non_interactive();
        let result = confirm(&ctx, "Test?", true).await.unwrap();
        assert!(result);

        let result = confirm(&ctx, "Test?", false).await.unwrap();
        assert!(!result);
    }

    #[tokio::test]
    async fn select_non_interactive_first() {
        let ctx = UiContext::non_interactive();
        let options = vec![
            ("a".to_string(), "Option A", "First"),
            ("b".to_string(), "Option B", "Second"),
        ];
        let result = select(&ctx, "Choose:", &options).await.unwrap();
        assert_eq!(result, "a");
    }

    #[tokio::test]
    async fn select_empty_is_an_error() {
        let ctx = UiContext::non_interactive();
        let options: Vec<(String, &str, &str)> = Vec::new();
        assert!(select(&ctx, "Template", &options).await.is_err());
    }

    #[tokio::test]
    async fn multiselect_non_interactive_keeps_initial() {
        let ctx = UiContext::non_interactive();
        let options = vec![(1, "one", ""), (2, "two", "")];
        let result = multiselect(&ctx, "Pick", &options, vec![2]).await.unwrap();
        assert_eq!(result, vec![2]);
    }

    #[tokio::test]
    async fn input_non_interactive_names_flag() {
        let ctx = UiContext::non_interactive();
        let err = input(&ctx, "Module prefix", "--prefix").await.unwrap_err();
        assert!(err.to_string().contains("--prefix"));
    }
}
