//! Open-flag set
//!
//! A bitmask describing the semantics requested for one open call. Four
//! invariants hold for every well-formed set:
//!
//! (a) exactly one of READ_ONLY and READ_WRITE is set
//! (b) CREATE requires READ_WRITE
//! (c) EXCLUSIVE requires CREATE
//! (d) DELETE_ON_CLOSE requires CREATE
//!
//! Violations are reported as `VfsError::Misuse` before any underlying
//! I/O is issued. The capability hints are accepted without error and
//! ignored: this adapter implements none of them.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use super::errors::{VfsError, VfsResult};

/// Bitmask of requested open semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags(u32);

impl OpenFlags {
    /// Open for reading only.
    pub const READ_ONLY: OpenFlags = OpenFlags(0x0001);
    /// Open for reading and writing.
    pub const READ_WRITE: OpenFlags = OpenFlags(0x0002);
    /// Create the file if it does not exist.
    pub const CREATE: OpenFlags = OpenFlags(0x0004);
    /// Fail if the file already exists.
    pub const EXCLUSIVE: OpenFlags = OpenFlags(0x0008);
    /// The file is temporary and may be removed when closed.
    pub const DELETE_ON_CLOSE: OpenFlags = OpenFlags(0x0010);

    /// Hint: the engine may map the whole file. Not implemented.
    pub const MEMORY_MAP: OpenFlags = OpenFlags(0x0020);
    /// Hint: the engine wants an in-memory database. Not implemented.
    pub const IN_MEMORY: OpenFlags = OpenFlags(0x0040);
    /// Hint: the engine will skip journaling this file. Not implemented.
    pub const OMIT_JOURNAL: OpenFlags = OpenFlags(0x0080);
    /// Hint: the engine holds no mutex around calls. Not implemented.
    pub const NO_MUTEX: OpenFlags = OpenFlags(0x0100);

    /// The empty flag set.
    pub const fn empty() -> Self {
        OpenFlags(0)
    }

    /// Raw bit value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: OpenFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check the open-flag invariants.
    pub fn validate(self) -> VfsResult<()> {
        let read_only = self.contains(Self::READ_ONLY);
        let read_write = self.contains(Self::READ_WRITE);
        if read_only == read_write {
            return Err(VfsError::misuse(
                "exactly one of READ_ONLY and READ_WRITE must be set",
            ));
        }
        if self.contains(Self::CREATE) && !read_write {
            return Err(VfsError::misuse("CREATE requires READ_WRITE"));
        }
        if self.contains(Self::EXCLUSIVE) && !self.contains(Self::CREATE) {
            return Err(VfsError::misuse("EXCLUSIVE requires CREATE"));
        }
        if self.contains(Self::DELETE_ON_CLOSE) && !self.contains(Self::CREATE) {
            return Err(VfsError::misuse("DELETE_ON_CLOSE requires CREATE"));
        }
        Ok(())
    }
}

impl BitOr for OpenFlags {
    type Output = OpenFlags;

    fn bitor(self, rhs: OpenFlags) -> OpenFlags {
        OpenFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpenFlags {
    fn bitor_assign(&mut self, rhs: OpenFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::LowerHex for OpenFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
