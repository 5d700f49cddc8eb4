// Shell command grammar, one clap parse per input line
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(no_binary_name = true, name = "dashboard", disable_version_flag = true)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List panels in display order with their features
    #[command(alias = "ls")]
    List,
    /// Print a panel's current output
    Show { panel: String },
    /// Run a feature; quote arguments containing spaces
    Run {
        feature: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Save the current dog, cat or joke result
    Save { list: String },
    /// Show a saved list
    Saved { list: String },
    /// Clear a saved list
    Reset { list: String },
    /// Close the saved-list window
    Close,
    /// Start dragging a panel
    Drag { panel: String },
    /// Hover the dragged panel over another
    Over { panel: String },
    /// Leave a hovered panel
    Leave { panel: String },
    /// Drop the dragged panel before another
    #[command(name = "drop")]
    DropOn { panel: String },
    /// Abandon the current drag
    Cancel,
    /// Show the theme, or flip it
    Theme {
        #[arg(long)]
        toggle: bool,
    },
    /// Next page of popular movies
    NextMovies,
    /// Previous page of popular movies
    PrevMovies,
    /// Breed choices for the dog or cat panel
    Options { panel: String },
    #[command(alias = "exit")]
    Quit,
}

/// Words are split the way a POSIX shell would, so quoted runs stay
/// together. An unterminated quote rejects the whole line.
pub fn parse_line(line: &str) -> Result<Command, clap::Error> {
    let Some(words) = shlex::split(line) else {
        return Err(CommandLine::command().error(ErrorKind::InvalidValue, "unbalanced quotes in command"));
    };
    CommandLine::try_parse_from(words).map(|parsed| parsed.command)
}
