//! The directory tree and the entry model it is parsed into.
//!
//! The tree is stored as three flat arenas, one per level. Because the directory
//! stream is depth first, the children of any group occupy a contiguous range of
//! the next arena, so groups only record that range. Links back to a parent are
//! plain indices into the parent arena and never own anything.

use binrw::BinRead;
use byteorder::ReadBytesExt;
use std::{
    io::{Read, Seek},
    ops::Range,
};
use tracing::{debug, instrument, trace};

use crate::{
    error::{FormatError, Result},
    types::{EntryRecord, ENTRY_TERMINATOR},
};

/// Handle to an [`ExtensionGroup`] inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionId(usize);

/// Handle to a [`PathGroup`] inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathId(usize);

/// Handle to a [`FileEntry`] inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(usize);

/// All the entries sharing one file extension
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionGroup {
    name: Box<str>,
    paths: Range<usize>,
}

impl ExtensionGroup {
    /// The extension, without the leading dot
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// All the entries of one extension sharing a directory
#[derive(Debug, Clone, PartialEq)]
pub struct PathGroup {
    name: Box<str>,
    extension: ExtensionId,
    files: Range<usize>,
}

impl PathGroup {
    /// The directory, without a trailing slash.
    ///
    /// Never empty once parsed, since an empty name closes the path list. Archives
    /// place files at their root under a single space (`" "`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The extension group this directory belongs to
    pub fn extension(&self) -> ExtensionId {
        self.extension
    }
}

/// Where the content of a [`FileEntry`] lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStorage {
    /// Entirely in the preload buffer read from the directory file
    Preload,
    /// In an archive shard at the entry's payload offset
    Shard,
    /// Split between preload bytes and a shard, which is not supported
    Unsupported,
}

/// A single file in the archive
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    name: Box<str>,
    path: PathId,
    crc32: u32,
    preload_bytes: i16,
    shard_index: i16,
    payload_offset: u32,
    payload_length: u32,
    preload: Option<Box<[u8]>>,
}

impl FileEntry {
    /// Base name of the file, without directory or extension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directory group this file belongs to
    pub fn path(&self) -> PathId {
        self.path
    }

    /// CRC32 of the file's content as recorded in the directory
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Number of bytes stored inline in the directory file
    pub fn preload_bytes(&self) -> i16 {
        self.preload_bytes
    }

    /// Index of the shard holding the content
    pub fn shard_index(&self) -> i16 {
        self.shard_index
    }

    /// Offset of the content inside the shard
    pub fn payload_offset(&self) -> u32 {
        self.payload_offset
    }

    /// Length of the content inside the shard
    pub fn payload_length(&self) -> u32 {
        self.payload_length
    }

    /// Bytes stored inline in the directory file, if any
    pub fn preload_data(&self) -> Option<&[u8]> {
        self.preload.as_deref()
    }

    /// Classify where this entry's content has to be read from
    pub fn storage(&self) -> EntryStorage {
        if self.payload_length == 0 && self.preload_bytes > 0 {
            EntryStorage::Preload
        } else if self.preload_bytes != 0 {
            EntryStorage::Unsupported
        } else {
            EntryStorage::Shard
        }
    }

    fn read<R: Read + Seek>(reader: &mut R, name: Box<str>, path: PathId) -> Result<Self> {
        let record = EntryRecord::read(reader)?;
        if record.terminator != ENTRY_TERMINATOR {
            return Err(FormatError::MissingTerminator {
                name: name.into(),
                found: record.terminator,
            }
            .into());
        }

        let preload = if record.preload_bytes > 0 {
            let mut buffer = vec![0; record.preload_bytes as usize];
            reader.read_exact(&mut buffer)?;
            Some(buffer.into_boxed_slice())
        } else {
            None
        };

        trace!(
            name = %name,
            crc32 = record.crc32,
            preload_bytes = record.preload_bytes,
            shard_index = record.shard_index,
            payload_offset = record.payload_offset,
            payload_length = record.payload_length,
            "read entry"
        );

        Ok(FileEntry {
            name,
            path,
            crc32: record.crc32,
            preload_bytes: record.preload_bytes,
            shard_index: record.shard_index,
            payload_offset: record.payload_offset,
            payload_length: record.payload_length,
            preload,
        })
    }
}

/// The parsed directory tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    extensions: Vec<ExtensionGroup>,
    paths: Vec<PathGroup>,
    files: Vec<FileEntry>,
}

impl Tree {
    /// Parse a directory tree, starting right after the header.
    ///
    /// Stops after the empty name closing the extension list. Nothing past that
    /// point is read.
    #[instrument(skip(reader), err)]
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Tree> {
        let mut tree = Tree::default();

        read_name_list(reader, |reader, name| {
            let extension = ExtensionId(tree.extensions.len());
            let first_path = tree.paths.len();
            tree.extensions.push(ExtensionGroup {
                name,
                paths: first_path..first_path,
            });

            read_name_list(reader, |reader, name| {
                let path = PathId(tree.paths.len());
                let first_file = tree.files.len();
                tree.paths.push(PathGroup {
                    name,
                    extension,
                    files: first_file..first_file,
                });

                read_name_list(reader, |reader, name| {
                    tree.files.push(FileEntry::read(reader, name, path)?);
                    Ok(())
                })?;

                tree.paths[path.0].files.end = tree.files.len();
                Ok(())
            })?;

            tree.extensions[extension.0].paths.end = tree.paths.len();
            Ok(())
        })?;

        debug!(
            extensions = tree.extensions.len(),
            paths = tree.paths.len(),
            files = tree.files.len(),
            "parsed directory tree"
        );

        Ok(tree)
    }

    /// Every extension group, in the order they were parsed
    pub fn extensions(&self) -> &[ExtensionGroup] {
        &self.extensions
    }

    /// Every file in the archive, in the order they were parsed
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// The directory groups belonging to an extension group
    pub fn paths_of(&self, extension: &ExtensionGroup) -> &[PathGroup] {
        &self.paths[extension.paths.clone()]
    }

    /// The files belonging to a directory group
    pub fn files_of(&self, path: &PathGroup) -> &[FileEntry] {
        &self.files[path.files.clone()]
    }

    /// Look up an extension group by handle
    pub fn extension(&self, id: ExtensionId) -> &ExtensionGroup {
        &self.extensions[id.0]
    }

    /// Look up a directory group by handle
    pub fn path(&self, id: PathId) -> &PathGroup {
        &self.paths[id.0]
    }

    /// Look up a file by handle
    pub fn file(&self, id: FileId) -> &FileEntry {
        &self.files[id.0]
    }

    /// Find a file by its three name components.
    ///
    /// Each level is scanned linearly and the first equal name wins.
    pub fn find(&self, extension: &str, path: &str, name: &str) -> Option<FileId> {
        let extension = self.extensions.iter().find(|e| &*e.name == extension)?;
        let path = self
            .paths_of(extension)
            .iter()
            .find(|p| &*p.name == path)?;
        self.files_of(path)
            .iter()
            .position(|f| &*f.name == name)
            .map(|i| FileId(path.files.start + i))
    }

    /// Rebuild the logical path of a file from its parent groups.
    ///
    /// The result resolves back to `file` through [`Tree::find`] after splitting,
    /// including for root files (`" /name.ext"`).
    pub fn full_path(&self, file: &FileEntry) -> String {
        let path = self.path(file.path);
        let extension = self.extension(path.extension);
        format!("{}/{}.{}", path.name, file.name, extension.name)
    }
}

/// Read names until an empty one, handing each non-empty name to `on_name`.
///
/// The closing empty name is consumed but not reported.
fn read_name_list<R, F>(reader: &mut R, mut on_name: F) -> Result<()>
where
    R: Read + Seek,
    F: FnMut(&mut R, Box<str>) -> Result<()>,
{
    loop {
        let name = read_name(reader)?;
        if name.is_empty() {
            return Ok(());
        }
        on_name(reader, name)?;
    }
}

/// Read a null terminated name, decoding every byte as its own character.
fn read_name<R: Read>(reader: &mut R) -> Result<Box<str>> {
    let mut name = String::new();
    loop {
        let byte = reader.read_u8()?;
        if byte == b'\0' {
            break;
        }
        name.push(char::from(byte));
    }
    Ok(name.into_boxed_str())
}
