use clap::Args;
use miette::{Context, Result};
use std::path::PathBuf;
use stingray_toc::{Mod, ModOptions};
use tracing::info;

#[derive(Args)]
pub struct ApplyArgs {
    /// The archive, as its TOC file or its `.stream` file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Patches to apply, in order
    #[arg(short, long, value_name = "FILE", required = true)]
    patch: Vec<PathBuf>,

    /// Where the combined patch is written
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Language whose strings are taken from the patches
    #[arg(short, long, default_value = "English (US)")]
    language: String,

    /// Index of the written patch
    #[arg(long, default_value_t = 0)]
    patch_index: u32,
}

impl ApplyArgs {
    pub fn handle(&self) -> Result<()> {
        let language = super::language(&self.language)?;
        let archive = super::open(&self.file, language)?;

        let mut modding = Mod::new(
            ModOptions::builder()
                .language(language)
                .patch_index(self.patch_index)
                .build(),
        );
        modding.add_archive(archive)?;

        for patch in &self.patch {
            info!("applying {}", patch.display());
            modding
                .import_patch(patch)
                .context(format!("path: {}", patch.display()))?;
        }

        super::create_dir(&self.output)?;
        let path = modding
            .write_patch(&self.output)
            .context(format!("writing patch to {}", self.output.display()))?;
        info!("wrote {}", path.display());

        Ok(())
    }
}
