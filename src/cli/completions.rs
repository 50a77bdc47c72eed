use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Load into the current bash session:\n    source <(channelsync completions bash)\n\n\
                  Install for zsh (directory must be on $fpath):\n    channelsync completions zsh > ~/.zfunc/_channelsync\n\n\
                  Install for PowerShell:\n    channelsync completions powershell >> $PROFILE")]
pub struct CompletionsArgs {
    /// Target shell; matched case-insensitively
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
