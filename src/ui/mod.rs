//! Terminal presentation
//!
//! Uses `cliclack` for interactive prompts with automatic fallback to plain
//! output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use modforge::ui::{self, PipelineProgress, UiContext};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! ui::intro(&ctx, "Generate module");
//!
//! let sink = PipelineProgress::new(&ctx, "Generating");
//! let result = generate(&cache, &runner, &config, &request, &mut Progress::new(&sink)).await;
//! sink.finish();
//!
//! ui::outro_success(&ctx, "Module generated");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, note, outro_error, outro_success, remark, section, step_info, step_ok,
    step_ok_detail, step_warn, step_warn_hint,
};
pub use progress::PipelineProgress;
pub use prompts::{confirm, input, multiselect, select};
pub use theme::init_theme;
