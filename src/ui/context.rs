//! Terminal detection for prompts and decorated output

use std::io::IsTerminal;

/// Environment variables set by common CI services
const CI_MARKERS: [&str; 9] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// How a command may talk to the user
///
/// Interactive means both stdin and stdout are terminals and no CI marker is
/// set. Everything else gets plain line output and prompts fall back to their
/// defaults (or fail, naming the flag that supplies the answer).
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    interactive: bool,
    auto_yes: bool,
}

impl UiContext {
    pub fn detect() -> Self {
        Self {
            interactive: terminal_attached() && !in_ci(),
            auto_yes: false,
        }
    }

    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    /// `--yes`: accept confirmations and default selections without asking
    pub fn with_auto_yes(self, auto_yes: bool) -> Self {
        Self { auto_yes, ..self }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Draw cliclack frames and progress bars instead of plain lines
    pub fn decorated(&self) -> bool {
        self.interactive
    }
}

fn terminal_attached() -> bool {
    std::io::stdout().is_terminal() && std::io::stdin().is_terminal()
}

fn in_ci() -> bool {
    CI_MARKERS.iter().any(|var| std::env::var_os(var).is_some())
}
