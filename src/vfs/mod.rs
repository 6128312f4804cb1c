//! Virtual-filesystem contract and flash adapter
//!
//! The document-store engine performs all file I/O through the `Vfs` and
//! `VfsFile` traits. `FlashVfs`/`FlashFile` implement them over a
//! `media::Volume`, reconciling two I/O models: the engine expects
//! POSIX-like random-access files with implicit zero-extension and exact
//! byte-offset semantics, while the medium's seek primitive silently grows
//! a file when positioned past end-of-file.
//!
//! The adapter deliberately implements no locking, no journaling and no
//! multi-process coordination: the engine runs in a single task, and the
//! locking operations are granted trivially under that discipline.

mod adapter;
mod errors;
mod file;
mod flags;
mod traits;

pub use adapter::{FlashVfs, LockDiscipline, ROOT_SEPARATOR, VFS_VERSION};
pub use errors::{VfsError, VfsResult};
pub use file::FlashFile;
pub use flags::OpenFlags;
pub use traits::{LockLevel, Vfs, VfsDescriptor, VfsFile};
