//! Subcommands of the `stingray` binary, one group per kind of input file.

pub mod archive;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Inspect, compare, extract and patch TOC audio archives
    ///
    /// Every command takes the path of the TOC file or of its `.stream` file.
    #[command(visible_alias = "a")]
    Archive {
        #[command(subcommand)]
        command: archive::ArchiveCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Archive { command } => command.handle(),
        }
    }
}
