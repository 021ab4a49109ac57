use clap::Args;
use itertools::Itertools;
use miette::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use std::path::PathBuf;
use vpk_archive::{error, EntryStorage, VpkArchive};

#[derive(Args)]
pub struct InfoArgs {
    /// An input VPK directory file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

/// Counts shown below the header fields
#[derive(Debug, PartialEq)]
struct Summary {
    directories: usize,
    preload: usize,
    shard: usize,
    unsupported: usize,
    shards: Vec<PathBuf>,
}

impl Summary {
    fn of(vpk: &VpkArchive) -> error::Result<Self> {
        let tree = vpk.tree();
        let directories = tree
            .extensions()
            .iter()
            .map(|e| tree.paths_of(e).len())
            .sum();
        let counts = vpk.files().counts_by(|f| f.storage());
        let count = |storage: EntryStorage| counts.get(&storage).copied().unwrap_or_default();

        let shards = vpk
            .files()
            .filter(|f| f.storage() == EntryStorage::Shard)
            .map(|f| f.metadata().shard_index())
            .unique()
            .sorted()
            .map(|i| vpk.shard_path(i))
            .collect::<error::Result<Vec<_>>>()?;

        Ok(Summary {
            directories,
            preload: count(EntryStorage::Preload),
            shard: count(EntryStorage::Shard),
            unsupported: count(EntryStorage::Unsupported),
            shards,
        })
    }
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let vpk = VpkArchive::open(&self.file).context(format!("path: {}", self.file.display()))?;
        let summary = Summary::of(&vpk)?;

        let path = vpk.path().display();
        println!("{}", path.if_supports_color(Stream::Stdout, |t| t.bold()));
        println!("  version:     {}", vpk.version());
        println!("  tree length: {}", vpk.tree_length());
        println!("  data offset: {}", vpk.data_offset());
        println!("  extensions:  {}", vpk.tree().extensions().len());
        println!("  directories: {}", summary.directories);
        println!("  files:       {}", vpk.len());
        println!("    preload:     {}", summary.preload);
        println!("    shard:       {}", summary.shard);
        println!(
            "    unsupported: {}",
            summary
                .unsupported
                .if_supports_color(Stream::Stdout, |t| t.red())
        );
        println!(
            "  shards:      {}",
            summary.shards.iter().map(|p| p.display()).join(", ")
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::Summary;
    use crate::commands::fixture;

    #[test]
    fn summary_counts_storage() -> miette::Result<()> {
        let dir = TempDir::new().unwrap();
        let vpk = fixture::archive(dir.path())?;

        assert_eq!(
            Summary::of(&vpk)?,
            Summary {
                directories: 3,
                preload: 2,
                shard: 1,
                unsupported: 1,
                shards: vec![dir.path().join("pak01_002.vpk")],
            }
        );

        Ok(())
    }

    #[test]
    fn summary_of_empty_archive() -> miette::Result<()> {
        #[rustfmt::skip]
        let data = vec![
            0x34, 0x12, 0xAA, 0x55,
            0x02, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00,
        ];
        let vpk = vpk_archive::VpkArchive::from_reader("pak01_dir.vpk", std::io::Cursor::new(data))?;

        let summary = Summary::of(&vpk)?;
        assert_eq!(summary.directories, 0);
        assert_eq!(summary.shard, 0);
        assert!(summary.shards.is_empty());

        Ok(())
    }
}
