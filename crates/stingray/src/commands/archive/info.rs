use clap::Args;
use miette::Result;
use std::path::PathBuf;
use stingray_toc::AudioId;

#[derive(Args)]
pub struct InfoArgs {
    /// The archive, as its TOC file or its `.stream` file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Language of the strings to count, a name like "English (US)" or an id
    #[arg(short, long, default_value = "English (US)")]
    language: String,

    /// List the audio of every bank
    #[arg(long, default_value_t = false)]
    audio: bool,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let language = super::language(&self.language)?;
        let archive = super::open(&self.file, language)?;

        println!("archive {}", archive.name());
        println!(
            "  {} banks, {} streams, {} text banks, {} audio",
            archive.banks.len(),
            archive.streams.len(),
            archive.text_banks.len(),
            archive.audio.len()
        );

        for bank in archive.banks.values() {
            println!(
                "* bank {} ({:#018x}): {} records, {} audio",
                bank.name(),
                bank.id,
                bank.hierarchy.len(),
                bank.content.len()
            );
            if !self.audio {
                continue;
            }
            for id in &bank.content {
                let Some(audio) = archive.audio.get(id) else {
                    continue;
                };
                let location = match id {
                    AudioId::Short(_) => "bank",
                    AudioId::Resource(_) => "stream",
                };
                println!(
                    "    {} ({location}, {} bytes)",
                    audio.short_id,
                    audio.size()
                );
            }
        }

        for text_bank in archive.text_banks.values() {
            println!(
                "* text bank {:#018x}: {} strings in language {:#010x}",
                text_bank.id,
                text_bank.string_ids.len(),
                text_bank.language
            );
        }
        println!(
            "  {} strings in language {:#010x}",
            archive.strings(language).count(),
            language
        );

        Ok(())
    }
}
