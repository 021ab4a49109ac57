//! Types for reading VPK archives
//!

use binrw::BinRead;
use std::{
    fmt::{self, Debug},
    fs::File,
    io::{BufReader, Cursor, Read, Seek},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use crate::{
    error::{Error, FormatError, Result},
    payload::{shard_path, EntryReader},
    tree::{EntryStorage, ExtensionGroup, FileEntry, FileId, PathGroup, Tree},
    types::VpkHeader,
};

/// VPK archive reader
///
/// The whole directory tree is read when the archive is opened. The directory
/// file is closed again before [`VpkArchive::open`] returns, and every lookup
/// afterwards only touches the in-memory tree.
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn dump_icon() -> vpk_archive::error::Result<()> {
///     let vpk = vpk_archive::VpkArchive::open("dota/pak01_dir.vpk")?;
///
///     if let Some(entry) = vpk.get_file("resource/flash3/images/spellicons/icon.png") {
///         println!("{} ({} bytes)", entry.full_path(), entry.len());
///         std::io::stdout().write_all(&entry.read_to_vec()?)?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct VpkArchive {
    path: PathBuf,
    header: VpkHeader,
    tree: Tree,
}

impl Debug for VpkArchive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VpkArchive")
            .field("path", &self.path)
            .field("version", &self.header.version)
            .field("tree_length", &self.header.tree_length)
            .field("files", &self.len())
            .finish()
    }
}

impl VpkArchive {
    /// Open a directory file and read its tree.
    ///
    /// Shard files are looked up next to `path` when entries are read.
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open(path: impl AsRef<Path>) -> Result<VpkArchive> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(path, BufReader::new(file))
    }

    /// Read a directory tree from `reader`, which must be positioned at the start
    /// of the directory file.
    ///
    /// `path` is only used to derive the names of shard files.
    pub fn from_reader<R: Read + Seek>(path: impl Into<PathBuf>, mut reader: R) -> Result<VpkArchive> {
        let path = path.into();
        let (header, tree) =
            Self::read_directory(&mut reader).map_err(Error::truncated_on_eof)?;

        debug!(
            path = %path.display(),
            version = header.version,
            tree_length = header.tree_length,
            files = tree.files().len(),
            "opened vpk"
        );

        Ok(VpkArchive { path, header, tree })
    }

    fn read_directory<R: Read + Seek>(reader: &mut R) -> Result<(VpkHeader, Tree)> {
        let header = VpkHeader::read(reader)?;
        if header.data_offset().is_none() {
            return Err(FormatError::UnsupportedVersion(header.version).into());
        }

        let tree = Tree::parse(reader)?;
        Ok((header, tree))
    }

    /// Path of the directory file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format version, either 1 or 2
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Size of the directory tree as recorded in the header
    pub fn tree_length(&self) -> u32 {
        self.header.tree_length
    }

    /// Offset where embedded payload data begins within the directory file
    pub fn data_offset(&self) -> u32 {
        // the version was checked when the archive was read
        self.header.data_offset().unwrap_or_default()
    }

    /// The parsed directory tree
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of files contained in this archive
    pub fn len(&self) -> usize {
        self.tree.files().len()
    }

    /// Whether this archive contains no files
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every extension group, in the order they were parsed
    pub fn extensions(&self) -> impl Iterator<Item = &ExtensionGroup> {
        self.tree.extensions().iter()
    }

    /// Every file in the archive, in the order they were parsed
    pub fn files(&self) -> impl Iterator<Item = VpkEntry<'_>> {
        self.tree.files().iter().map(move |entry| VpkEntry {
            archive: self,
            entry,
        })
    }

    /// Returns an iterator over the full logical path of every file
    pub fn file_names(&self) -> impl Iterator<Item = String> + '_ {
        self.tree.files().iter().map(|f| self.tree.full_path(f))
    }

    /// Find a file by its logical path, such as `materials/models/hero.vmt`.
    ///
    /// Returns [`None`] when the name has no `.` or no `/`, or when nothing in
    /// the archive matches.
    pub fn get_file(&self, name: &str) -> Option<VpkEntry<'_>> {
        let (extension, path, file_name) = split_name(name)?;
        let id = self.tree.find(extension, path, file_name)?;
        Some(self.entry(id))
    }

    /// Wrap a file handle into an entry view
    pub fn entry(&self, id: FileId) -> VpkEntry<'_> {
        VpkEntry {
            archive: self,
            entry: self.tree.file(id),
        }
    }

    /// Path of the shard with the given index
    pub fn shard_path(&self, shard_index: i16) -> Result<PathBuf> {
        shard_path(&self.path, shard_index)
    }

    /// Get a reader over the content of `entry`.
    ///
    /// Preloaded entries are served from memory. Otherwise a new handle to the
    /// entry's shard is opened on every call and returned positioned at the
    /// entry's payload offset. That reader is not limited to the entry's length.
    #[instrument(skip_all, fields(entry = %self.tree.full_path(entry)), err)]
    pub fn open_entry<'a>(&self, entry: &'a FileEntry) -> Result<EntryReader<'a>> {
        match entry.storage() {
            EntryStorage::Preload => Ok(EntryReader::Preload(Cursor::new(
                entry.preload_data().unwrap_or_default(),
            ))),
            EntryStorage::Unsupported => Err(Error::UnsupportedEntry {
                name: self.tree.full_path(entry),
                preload_bytes: entry.preload_bytes(),
                payload_length: entry.payload_length(),
            }),
            EntryStorage::Shard => Ok(EntryReader::open_shard(
                &self.shard_path(entry.shard_index())?,
                entry.payload_offset() as u64,
            )?),
        }
    }
}

/// Split a logical name into its extension, directory and file name.
///
/// Uses the last `.` and the last `/`. A dot inside the directory part leaves
/// no room for a file name and yields [`None`].
fn split_name(name: &str) -> Option<(&str, &str, &str)> {
    let dot = name.rfind('.')?;
    let slash = name.rfind('/')?;
    if dot < slash {
        return None;
    }

    Some((&name[dot + 1..], &name[..slash], &name[slash + 1..dot]))
}

/// A file in a [`VpkArchive`]
#[derive(Clone, Copy)]
pub struct VpkEntry<'a> {
    archive: &'a VpkArchive,
    entry: &'a FileEntry,
}

impl Debug for VpkEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VpkEntry({:#?})", self.entry)
    }
}

/// Methods for retrieving information on VPK entries
impl<'a> VpkEntry<'a> {
    /// Base name of the file, without directory or extension
    pub fn name(&self) -> &'a str {
        self.entry.name()
    }

    /// Directory of the file. Empty for files at the root.
    pub fn directory(&self) -> &'a str {
        self.path_group().name()
    }

    /// Extension of the file, without the leading dot
    pub fn extension(&self) -> &'a str {
        self.archive
            .tree
            .extension(self.path_group().extension())
            .name()
    }

    /// Rebuild the logical path this file would be looked up by
    pub fn full_path(&self) -> String {
        self.archive.tree.full_path(self.entry)
    }

    /// The directory group this file belongs to
    pub fn path_group(&self) -> &'a PathGroup {
        self.archive.tree.path(self.entry.path())
    }

    /// The raw entry as stored in the tree
    pub fn metadata(&self) -> &'a FileEntry {
        self.entry
    }

    /// CRC32 recorded for the file's content
    pub fn crc32(&self) -> u32 {
        self.entry.crc32()
    }

    /// Where the content of this file lives
    pub fn storage(&self) -> EntryStorage {
        self.entry.storage()
    }

    /// Size of the file's content in bytes
    pub fn len(&self) -> u64 {
        match self.storage() {
            EntryStorage::Preload => self.entry.preload_bytes() as u64,
            _ => self.entry.payload_length() as u64,
        }
    }

    /// Whether the file has no content
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a reader over the file's content. See [`VpkArchive::open_entry`].
    pub fn open(&self) -> Result<EntryReader<'a>> {
        self.archive.open_entry(self.entry)
    }

    /// Read exactly the file's content.
    ///
    /// Unlike [`VpkEntry::open`], this never reads past the entry's payload length.
    pub fn read_to_vec(&self) -> Result<Vec<u8>> {
        match self.open()? {
            EntryReader::Preload(cursor) => Ok(cursor.into_inner().to_vec()),
            reader => {
                let length = self.entry.payload_length() as u64;
                let mut buffer = Vec::new();
                reader.take(length).read_to_end(&mut buffer)?;
                if (buffer.len() as u64) < length {
                    return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
                }
                Ok(buffer)
            }
        }
    }
}
