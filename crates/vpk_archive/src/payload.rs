//! Readers for entry content, either preloaded or stored in an archive shard.

use std::{
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek},
    path::{Path, PathBuf},
};
use tracing::instrument;

use crate::error::{Error, Result};

/// Marker in the directory file name that is swapped for a shard index
pub const DIRECTORY_MARKER: &str = "_dir";

/// Build the file name of the shard with the given index.
///
/// The last `_dir` in the directory file's name becomes `_` followed by the
/// index padded to three digits, so `pak01_dir.vpk` and shard 7 give
/// `pak01_007.vpk`. A name without the marker is returned unchanged, and a
/// name that is not valid unicode is an [`Error::NonUnicodePath`].
pub fn shard_path(directory: &Path, shard_index: i16) -> Result<PathBuf> {
    let Some(file_name) = directory.file_name() else {
        return Ok(directory.to_path_buf());
    };

    let file_name = file_name
        .to_str()
        .ok_or_else(|| Error::NonUnicodePath(directory.to_path_buf()))?;
    let shard = match file_name.rfind(DIRECTORY_MARKER) {
        Some(pos) => {
            let shard_name = format!(
                "{}_{:03}{}",
                &file_name[..pos],
                shard_index,
                &file_name[pos + DIRECTORY_MARKER.len()..]
            );
            directory.with_file_name(shard_name)
        }
        None => directory.to_path_buf(),
    };
    Ok(shard)
}

/// A byte source for the content of one entry
///
/// Shard readers are positioned at the entry's payload offset but are not
/// limited to the entry's length. Read at most
/// [`crate::tree::FileEntry::payload_length`] bytes, or use
/// [`crate::read::VpkEntry::read_to_vec`].
#[derive(Debug)]
pub enum EntryReader<'a> {
    /// Content held in the preload buffer
    Preload(Cursor<&'a [u8]>),
    /// Content held in a freshly opened shard file
    Shard(BufReader<File>),
}

impl EntryReader<'_> {
    /// Open `path` and seek to `offset`
    #[instrument(err)]
    pub(crate) fn open_shard(path: &Path, offset: u64) -> io::Result<Self> {
        let mut file = BufReader::new(File::open(path)?);
        file.seek(io::SeekFrom::Start(offset))?;
        Ok(EntryReader::Shard(file))
    }

    /// Whether reading this entry touches the filesystem
    pub fn is_shard(&self) -> bool {
        matches!(self, EntryReader::Shard(_))
    }
}

impl Seek for EntryReader<'_> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        match self {
            EntryReader::Preload(r) => r.seek(pos),
            EntryReader::Shard(r) => r.seek(pos),
        }
    }
}

impl Read for EntryReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            EntryReader::Preload(r) => r.read(buf),
            EntryReader::Shard(r) => r.read(buf),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        match self {
            EntryReader::Preload(r) => r.read_exact(buf),
            EntryReader::Shard(r) => r.read_exact(buf),
        }
    }

    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        match self {
            EntryReader::Preload(r) => r.read_to_end(buf),
            EntryReader::Shard(r) => r.read_to_end(buf),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, Read};
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::payload::{shard_path, EntryReader};

    #[test]
    fn shard_index_is_zero_padded() -> Result<()> {
        let dir = Path::new("game/pak01_dir.vpk");
        assert_eq!(shard_path(dir, 7)?, PathBuf::from("game/pak01_007.vpk"));
        assert_eq!(shard_path(dir, 0)?, PathBuf::from("game/pak01_000.vpk"));
        assert_eq!(shard_path(dir, 123)?, PathBuf::from("game/pak01_123.vpk"));
        assert_eq!(shard_path(dir, 1234)?, PathBuf::from("game/pak01_1234.vpk"));
        Ok(())
    }

    #[test]
    fn only_the_last_marker_is_replaced() -> Result<()> {
        let dir = Path::new("my_dir/my_dir_dir.vpk");
        assert_eq!(shard_path(dir, 2)?, PathBuf::from("my_dir/my_dir_002.vpk"));
        Ok(())
    }

    #[test]
    fn name_without_marker_is_kept() -> Result<()> {
        let dir = Path::new("single.vpk");
        assert_eq!(shard_path(dir, 3)?, PathBuf::from("single.vpk"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_name_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = Path::new("game").join(OsStr::from_bytes(b"pak\xFF_dir.vpk"));
        let err = shard_path(&dir, 1).unwrap_err();
        assert!(matches!(err, Error::NonUnicodePath(p) if p == dir));
    }

    #[test]
    fn preload_reader_reads_buffer() -> std::io::Result<()> {
        let data = b"hello";
        let mut reader = EntryReader::Preload(Cursor::new(&data[..]));
        assert!(!reader.is_shard());

        let mut out = Vec::new();
        reader.read_to_end(&mut out)?;
        assert_eq!(out, b"hello");
        Ok(())
    }
}
