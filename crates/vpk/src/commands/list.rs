use clap::Args;
use itertools::Itertools;
use miette::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use std::path::PathBuf;
use vpk_archive::{EntryStorage, VpkArchive, VpkEntry};

#[derive(Args)]
pub struct ListArgs {
    /// An input VPK directory file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only list files whose path starts with this prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// Show the metadata of every file
    #[arg(short, long, default_value_t = false)]
    long: bool,

    /// Sort by path instead of archive order
    #[arg(short, long, default_value_t = false)]
    sort: bool,
}

fn describe(entry: &VpkEntry<'_>) -> String {
    let meta = entry.metadata();
    let storage = entry.storage();
    let label = match storage {
        EntryStorage::Preload => "preload".to_owned(),
        EntryStorage::Shard => format!("{:03}@{}", meta.shard_index(), meta.payload_offset()),
        EntryStorage::Unsupported => "unsupported".to_owned(),
    };

    // pad before coloring, escape codes would count towards the width
    let label = format!("{:>14}", label);
    let label = match storage {
        EntryStorage::Preload => label
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        EntryStorage::Shard => label
            .if_supports_color(Stream::Stdout, |t| t.blue())
            .to_string(),
        EntryStorage::Unsupported => label
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string(),
    };

    format!(
        "{:08x} {:>10} {} {}",
        meta.crc32(),
        entry.len(),
        label,
        entry.full_path()
    )
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let vpk = VpkArchive::open(&self.file).context(format!("path: {}", self.file.display()))?;
        for line in self.lines(&vpk) {
            println!("{}", line);
        }

        Ok(())
    }

    fn lines(&self, vpk: &VpkArchive) -> Vec<String> {
        let entries = vpk.files().filter(|f| {
            self.prefix
                .as_deref()
                .map_or(true, |prefix| f.full_path().starts_with(prefix))
        });

        let entries: Vec<VpkEntry<'_>> = if self.sort {
            entries.sorted_by_key(|f| f.full_path()).collect()
        } else {
            entries.collect()
        };

        entries
            .iter()
            .map(|entry| {
                if self.long {
                    describe(entry)
                } else {
                    entry.full_path()
                }
            })
            .collect()
    }
}
