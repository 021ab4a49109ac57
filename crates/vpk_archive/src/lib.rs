//! This library handles reading the **VPK** archives used by Valve's Source engine games.
//!
//! # VPK Directory Format Documentation
//!
//! A VPK archive is split into a directory file, usually named `pak01_dir.vpk`, and any
//! number of shard files next to it (`pak01_000.vpk`, `pak01_001.vpk`, ...). The directory
//! file describes every entry in the archive. Small entries may be stored inline in the
//! directory file, everything else lives at an offset inside one of the shards.
//!
//! ## File Structure
//!
//! A directory file consists of a header followed by the directory tree.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Signature              | 4 bytes: 0x55AA1234                                        |
//! | 0x0004         | Version                | 4 bytes: 1 or 2                                            |
//! | 0x0008         | Tree Length            | 4 bytes: Size of the directory tree in bytes               |
//!
//! Version 2 headers carry three more 4-byte fields. They are neither validated nor
//! skipped: the tree is always read starting at offset 0x000C.
//!
//! ### Directory Tree
//!
//! The tree has three nested levels, each a list of null-terminated names closed by an
//! empty name (a single null byte):
//!
//! - **Extensions**: every name starts an extension group (`png`, `vmt`, ...) and is
//!   followed by that group's list of paths.
//! - **Paths**: every name starts a directory group (`materials/models`) and is
//!   followed by that group's list of files.
//! - **Files**: every name is the base name of a file, followed by its record.
//!
//! Names carry no encoding and are decoded one byte per character.
//!
//! ### Entry Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | CRC32                  | 4 bytes: Checksum of the entry's content                |
//! | 0x0004         | Preload Bytes          | 2 bytes: Signed count of inline bytes after the record  |
//! | 0x0006         | Shard Index            | 2 bytes: Signed index of the shard holding the payload  |
//! | 0x0008         | Payload Offset         | 4 bytes: Offset of the payload inside the shard         |
//! | 0x000C         | Payload Length         | 4 bytes: Length of the payload inside the shard         |
//! | 0x0010         | Terminator             | 2 bytes: Always 0xFFFF                                  |
//!
//! When **Preload Bytes** is positive, that many content bytes follow the record. An entry
//! either keeps its content entirely inline (preload bytes and no payload), or entirely
//! in a shard (no preload bytes). Entries declaring both can be listed but not read.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.vpk`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Shard Names**: the `_dir` in the directory file's name replaced with `_` and the
//!   shard index padded to three digits
//!

pub mod error;
pub mod payload;
pub mod read;
pub mod tree;
pub mod types;

pub use payload::EntryReader;
pub use read::{VpkArchive, VpkEntry};
pub use tree::EntryStorage;
