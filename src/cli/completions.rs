use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    bundleup completions bash > ~/.bash_completion.d/bundleup\n\n\
                  Generate zsh completions:\n    bundleup completions zsh > ~/.zfunc/_bundleup\n\n\
                  Generate fish completions:\n    bundleup completions fish > ~/.config/fish/completions/bundleup.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
