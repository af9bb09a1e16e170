use miette::{Context, IntoDiagnostic, Result};
use std::path::Path;
use stingray_toc::language::language_lookup;
use stingray_toc::{Archive, LoadOptions};

pub mod apply;
pub mod diff;
pub mod extract;
pub mod import;
pub mod info;
pub mod strings;

#[derive(clap::Subcommand)]
pub enum ArchiveCommands {
    /// Combine patches made against one archive into a single patch
    Apply(apply::ApplyArgs),
    /// Compare the banks, audio and strings of two archives
    Diff(diff::DiffArgs),
    /// Write the audio of every bank to a directory as `.wem` files
    Extract(extract::ExtractArgs),
    /// Replace audio with `.wem` files named by their id and write a patch
    Import(import::ImportArgs),
    /// Summarize the banks, streams and text banks of an archive
    Info(info::InfoArgs),
    /// Export the strings of one language as JSON
    Strings(strings::StringsArgs),
}

impl ArchiveCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            ArchiveCommands::Apply(apply) => apply.handle(),
            ArchiveCommands::Diff(diff) => diff.handle(),
            ArchiveCommands::Extract(extract) => extract.handle(),
            ArchiveCommands::Import(import) => import.handle(),
            ArchiveCommands::Info(info) => info.handle(),
            ArchiveCommands::Strings(strings) => strings.handle(),
        }
    }
}

/// Parses a language name or id given on the command line
fn language(name: &str) -> Result<u32> {
    Ok(language_lookup(name)?)
}

fn open(path: &Path, language: u32) -> Result<Archive> {
    let options = LoadOptions::builder().language(language).build();
    Archive::from_file(path, options).context(format!("path: {}", path.display()))
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .into_diagnostic()
        .context(format!("creating {}", path.display()))
}
