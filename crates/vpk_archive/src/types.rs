//! Base types for the fixed-layout parts of a VPK directory file.

use binrw::BinRead;

/// Signature every directory file starts with
pub const VPK_SIGNATURE: u32 = 0x55AA_1234;

/// Value every file entry record must end with
pub const ENTRY_TERMINATOR: u16 = 0xFFFF;

/// VPK directory header
///
/// Only the signature, version and tree length are read, regardless of the version.
/// The three extra fields a version 2 header carries are not consumed, so the tree
/// always starts 12 bytes into the stream. All data is stored in little endian format.
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
#[br(magic = 0x55AA_1234u32, little)]
pub struct VpkHeader {
    /// Format version, either 1 or 2
    pub version: u32,

    /// Size in bytes of the directory tree that follows the header
    pub tree_length: u32,
}

impl VpkHeader {
    /// Offset where embedded payload data begins within the directory stream
    ///
    /// Returns [`None`] for versions this library does not understand.
    pub fn data_offset(&self) -> Option<u32> {
        match self.version {
            1 => Some(4 * 3),
            2 => Some(4 * 4 + 4 * 3),
            _ => None,
        }
    }
}

/// Fixed-layout metadata following every file name in the tree
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct EntryRecord {
    /// CRC32 of the entry's content
    pub crc32: u32,

    /// Number of content bytes stored inline right after this record
    pub preload_bytes: i16,

    /// Index of the archive shard holding the rest of the content
    pub shard_index: i16,

    /// Offset of the content within the shard
    pub payload_offset: u32,

    /// Length of the content within the shard
    pub payload_length: u32,

    /// Must equal [`ENTRY_TERMINATOR`]
    pub terminator: u16,
}
