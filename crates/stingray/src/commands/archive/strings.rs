use clap::Args;
use indexmap::IndexMap;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use stingray_text::TextTable;
use tracing::info;

#[derive(Args)]
pub struct StringsArgs {
    /// The archive, as its TOC file or its `.stream` file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Language to export, a name like "English (US)" or an id
    #[arg(short, long, default_value = "English (US)")]
    language: String,

    /// A target JSON file, stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl StringsArgs {
    pub fn handle(&self) -> Result<()> {
        let language = super::language(&self.language)?;
        let archive = super::open(&self.file, language)?;

        let entries = archive
            .strings(language)
            .map(|(id, text)| (id, text.to_string()))
            .collect::<IndexMap<_, _>>();
        let table = TextTable::new(language, entries);
        let json = serde_json::to_string_pretty(&table).into_diagnostic()?;

        let Some(p) = &self.output else {
            println!("{json}");
            return Ok(());
        };

        info!("writing {} strings to {}", table.count(), p.display());
        let mut out = if !self.overwrite {
            File::create_new(p)
                .into_diagnostic()
                .context(format!("creating {}", &p.display()))?
        } else {
            File::create(p)
                .into_diagnostic()
                .context(format!("creating {}", &p.display()))?
        };
        out.write_all(json.as_bytes()).into_diagnostic()?;

        Ok(())
    }
}
