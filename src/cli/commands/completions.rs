use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io;

impl Shell {
    fn to_clap(&self) -> ClapShell {
        match self {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::PowerShell => ClapShell::PowerShell,
            Shell::Elvish => ClapShell::Elvish,
        }
    }

    fn install_hint(&self) -> &'static str {
        match self {
            Shell::Bash => "eval \"$(devup completions bash)\"   # add to ~/.bashrc",
            Shell::Zsh => "eval \"$(devup completions zsh)\"   # add to ~/.zshrc",
            Shell::Fish => "devup completions fish > ~/.config/fish/completions/devup.fish",
            Shell::PowerShell => "devup completions powershell | Out-String | Invoke-Expression",
            Shell::Elvish => "eval (devup completions elvish | slurp)",
        }
    }
}

pub fn execute(shell: Shell) {
    generate(shell.to_clap(), &mut Cli::command(), "devup", &mut io::stdout());

    // Hint goes to stderr so redirecting the script to a file stays clean
    eprintln!("# To install: {}", shell.install_hint());
}
