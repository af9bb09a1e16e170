use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::{info, warn};

#[derive(Args)]
pub struct ExtractArgs {
    /// The archive, as its TOC file or its `.stream` file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let archive = super::open(&self.file, stingray_toc::language::EN_US)?;

        for bank in archive.banks.values() {
            let dir = self.directory.join(bank.name());
            super::create_dir(&dir)?;

            for id in &bank.content {
                let Some(audio) = archive.audio.get(id) else {
                    warn!(audio = %id, "no payload");
                    continue;
                };

                let p = dir.join(format!("{}.wem", audio.short_id));
                info!("writing {}", p.display());

                let mut out = if !self.overwrite {
                    File::create_new(&p)
                        .into_diagnostic()
                        .context(format!("creating {}", &p.display()))?
                } else {
                    File::create(&p)
                        .into_diagnostic()
                        .context(format!("creating {}", &p.display()))?
                };

                out.write_all(audio.bytes())
                    .into_diagnostic()
                    .context(format!("writing {}", &p.display()))?;
            }
        }
        Ok(())
    }
}
