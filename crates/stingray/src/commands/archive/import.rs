use clap::Args;
use miette::{miette, Context, Result};
use std::path::PathBuf;
use stingray_toc::{Mod, ModOptions};
use tracing::info;
use walkdir::WalkDir;

#[derive(Args)]
pub struct ImportArgs {
    /// The archive, as its TOC file or its `.stream` file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A directory of audio files named after their ids
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Where the patch is written
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Index of the written patch
    #[arg(long, default_value_t = 0)]
    patch_index: u32,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        let files = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "wem"))
            .map(|e| e.into_path())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory holds no .wem files"));
        }

        let archive = super::open(&self.file, stingray_toc::language::EN_US)?;
        let mut modding = Mod::new(ModOptions::builder().patch_index(self.patch_index).build());
        modding.add_archive(archive)?;

        let imported = modding
            .import_audio_files(&files)
            .context("importing audio")?;
        info!("imported {imported} of {} files", files.len());

        super::create_dir(&self.output)?;
        let path = modding
            .write_patch(&self.output)
            .context(format!("writing patch to {}", self.output.display()))?;
        info!("wrote {}", path.display());

        Ok(())
    }
}
