pub mod cat;
pub mod extract;
pub mod info;
pub mod list;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Show the header and a summary of a VPK directory file
    Info(info::InfoArgs),
    /// List the files in a VPK archive
    List(list::ListArgs),
    /// Extract a VPK archive into a directory
    Extract(extract::ExtractArgs),
    /// Write a single file from a VPK archive to stdout
    Cat(cat::CatArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Info(info) => info.handle(),
            Commands::List(list) => list.handle(),
            Commands::Extract(extract) => extract.handle(),
            Commands::Cat(cat) => cat.handle(),
        }
    }
}

/// A small archive shared by the command tests.
///
/// - `icons/b.png`: preloaded `bb`
/// - ` /a.png`: shard 2, offset 4, 3 bytes
/// - `docs/readme.txt`: preloaded `hi\n`
/// - `docs/split.txt`: 1 preload byte and an 8 byte payload
#[cfg(test)]
pub(crate) mod fixture {
    use std::{io::Cursor, path::Path};
    use vpk_archive::{
        error::Result,
        types::{ENTRY_TERMINATOR, VPK_SIGNATURE},
        VpkArchive,
    };

    fn push_name(out: &mut Vec<u8>, name: &str) {
        out.extend_from_slice(name.as_bytes());
        out.push(0);
    }

    fn push_entry(
        out: &mut Vec<u8>,
        name: &str,
        crc32: u32,
        preload: &[u8],
        shard: (i16, u32, u32),
    ) {
        let (shard_index, payload_offset, payload_length) = shard;
        push_name(out, name);
        out.extend_from_slice(&crc32.to_le_bytes());
        out.extend_from_slice(&(preload.len() as i16).to_le_bytes());
        out.extend_from_slice(&shard_index.to_le_bytes());
        out.extend_from_slice(&payload_offset.to_le_bytes());
        out.extend_from_slice(&payload_length.to_le_bytes());
        out.extend_from_slice(&ENTRY_TERMINATOR.to_le_bytes());
        out.extend_from_slice(preload);
    }

    pub fn directory() -> Vec<u8> {
        let mut tree = Vec::new();
        push_name(&mut tree, "png");
        push_name(&mut tree, "icons");
        push_entry(&mut tree, "b", 0xB, b"bb", (0x7FFF, 0, 0));
        tree.push(0);
        push_name(&mut tree, " ");
        push_entry(&mut tree, "a", 0xA, b"", (2, 4, 3));
        tree.push(0);
        tree.push(0);
        push_name(&mut tree, "txt");
        push_name(&mut tree, "docs");
        push_entry(&mut tree, "readme", 0xC, b"hi\n", (0x7FFF, 0, 0));
        push_entry(&mut tree, "split", 0xD, b"x", (0, 0, 8));
        tree.push(0);
        tree.push(0);
        tree.push(0);

        let mut out = Vec::new();
        out.extend_from_slice(&VPK_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&(tree.len() as u32).to_le_bytes());
        out.extend(tree);
        out
    }

    /// The fixture directory as if it was stored in `dir`
    pub fn archive(dir: &Path) -> Result<VpkArchive> {
        VpkArchive::from_reader(dir.join("pak01_dir.vpk"), Cursor::new(directory()))
    }

    /// Shard 2 next to the directory, holding `abc` at offset 4
    pub fn write_shard(dir: &Path) -> std::io::Result<()> {
        std::fs::write(dir.join("pak01_002.vpk"), b"....abc...")
    }
}
