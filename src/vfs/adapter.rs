//! Flash-backed adapter implementation
//!
//! `FlashVfs` implements the `Vfs` contract over a `media::Volume`, a
//! real-time clock, and a blocking delay source. The adapter itself keeps
//! no per-file state: everything an open file needs lives in its
//! `FlashFile` record plus a shared back-reference to the adapter.

use std::fmt;
use std::mem;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::clock::{Clock, DelaySource, HostDelay, SystemClock};
use crate::config::Config;
use crate::media::{OpenMode, Volume, VolumeFile};
use crate::observability::Trace;

use super::errors::{VfsError, VfsResult};
use super::file::FlashFile;
use super::flags::OpenFlags;
use super::traits::{Vfs, VfsDescriptor};

/// Contract version the adapter reports in its descriptor.
pub const VFS_VERSION: u32 = 1;

/// Separator prefixed by path normalization; the volume has a single root.
pub const ROOT_SEPARATOR: char = '/';

const TEMP_NAME_LEN: usize = 12;
const TEMP_NAME_ATTEMPTS: usize = 10;

/// Concurrency discipline the adapter is configured for.
///
/// `SingleTask` grants every lock trivially: one task issues one operation
/// at a time and waits for its result. `Mutual` exists so a concurrent
/// port fails loudly instead of silently running unlocked: no lock
/// implementation is supplied here, and every locking call reports misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockDiscipline {
    #[default]
    SingleTask,
    Mutual,
}

/// State shared between the adapter and every file it has opened.
pub(crate) struct Shared<V: Volume> {
    pub(crate) volume: V,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) delay: Box<dyn DelaySource>,
    pub(crate) trace: Trace,
    pub(crate) descriptor: VfsDescriptor,
    pub(crate) sector_size: u32,
    pub(crate) lock_discipline: LockDiscipline,
}

/// Virtual-filesystem adapter over a flash-backed volume.
pub struct FlashVfs<V: Volume> {
    shared: Rc<Shared<V>>,
}

impl<V: Volume> Clone for FlashVfs<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<V: Volume> FlashVfs<V> {
    /// Create an adapter over `volume` with the default configuration,
    /// the system clock, and a thread-sleep delay source.
    pub fn new(volume: V) -> Self {
        Self::with_config(volume, &Config::default())
    }

    /// Create an adapter over `volume` configured by `config`.
    pub fn with_config(volume: V, config: &Config) -> Self {
        Self::with_sources(volume, config, Box::new(SystemClock), Box::new(HostDelay))
    }

    /// Create an adapter with explicit clock and delay sources.
    pub fn with_sources(
        volume: V,
        config: &Config,
        clock: Box<dyn Clock>,
        delay: Box<dyn DelaySource>,
    ) -> Self {
        let descriptor = VfsDescriptor {
            name: config.name.clone(),
            version: VFS_VERSION,
            file_record_size: mem::size_of::<FlashFile<V>>(),
            max_pathname: config.max_pathname,
        };
        Self {
            shared: Rc::new(Shared {
                volume,
                clock,
                delay,
                trace: Trace::new(config.trace),
                descriptor,
                sector_size: config.sector_size,
                lock_discipline: config.lock_discipline(),
            }),
        }
    }

    /// The adapter's operation tracer.
    pub fn trace(&self) -> &Trace {
        &self.shared.trace
    }

    /// The volume this adapter is mounted on.
    pub fn volume(&self) -> &V {
        &self.shared.volume
    }

    fn trace_op(&self, name: &str, detail: fmt::Arguments<'_>) {
        self.shared.trace.op(&*self.shared.clock, name, detail);
    }

    /// Synthesize a pathname for a private temporary file. The host
    /// filesystem is not consulted for naming, only for collisions.
    fn temp_name(&self) -> VfsResult<String> {
        let mut rng = rand::thread_rng();
        for _ in 0..TEMP_NAME_ATTEMPTS {
            let suffix: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(TEMP_NAME_LEN)
                .map(char::from)
                .collect();
            let name = format!("{}tmp-{}", ROOT_SEPARATOR, suffix);
            if name.len() > self.shared.descriptor.max_pathname {
                return Err(VfsError::io("temporary name exceeds the pathname limit"));
            }
            if self.shared.volume.stat(&name).is_err() {
                return Ok(name);
            }
        }
        Err(VfsError::io(
            "could not generate a unique temporary file name",
        ))
    }

    /// Create (or ensure) the file in `mode`, then reopen it for
    /// random-access update. The append handle from the create step is
    /// useless to the engine, which positions by absolute offset, so a
    /// reopen failure is a hard cannot-open rather than a fallback.
    fn create_then_reopen(&self, path: &str, mode: OpenMode) -> VfsResult<V::File> {
        let mut created = self
            .shared
            .volume
            .open(path, mode)
            .map_err(|e| VfsError::cannot_open(format!("{}: {}", path, e)))?;
        created
            .close()
            .map_err(|e| VfsError::cannot_open(format!("{}: {}", path, e)))?;
        self.shared
            .volume
            .open(path, OpenMode::Update)
            .map_err(|e| VfsError::cannot_open(format!("reopen {}: {}", path, e)))
    }
}

impl<V: Volume> Vfs for FlashVfs<V> {
    type File = FlashFile<V>;

    fn descriptor(&self) -> &VfsDescriptor {
        &self.shared.descriptor
    }

    fn open(&self, path: Option<&str>, flags: OpenFlags) -> VfsResult<FlashFile<V>> {
        flags.validate()?;
        let read_only = flags.contains(OpenFlags::READ_ONLY);
        let create = flags.contains(OpenFlags::CREATE);
        let exclusive = flags.contains(OpenFlags::EXCLUSIVE);

        let path = match path {
            Some(p) => p.to_string(),
            None => self.temp_name()?,
        };

        let opened = if exclusive {
            self.create_then_reopen(&path, OpenMode::CreateNew)
        } else if create {
            self.create_then_reopen(&path, OpenMode::AppendCreate)
        } else {
            let mode = if read_only {
                OpenMode::Read
            } else {
                OpenMode::Update
            };
            self.shared
                .volume
                .open(&path, mode)
                .map_err(|e| VfsError::cannot_open(format!("{}: {}", path, e)))
        };

        let handle = match opened {
            Ok(handle) => handle,
            Err(e) => {
                self.trace_op(
                    "OPEN",
                    format_args!("name={} flags=0x{:04x} rc={}", path, flags, e.code()),
                );
                return Err(e);
            }
        };

        self.trace_op(
            "OPEN",
            format_args!("name={} flags=0x{:04x} rc=OK", path, flags),
        );
        Ok(FlashFile::bind(
            Rc::clone(&self.shared),
            handle,
            path,
            read_only,
        ))
    }

    fn delete(&self, path: &str) -> VfsResult<()> {
        match self.shared.volume.remove(path) {
            Ok(()) => {
                self.trace_op("DELETE", format_args!("name={} rc=OK", path));
                Ok(())
            }
            Err(e) => {
                self.trace_op("DELETE", format_args!("name={} rc=VFS_IOERR", path));
                Err(VfsError::io(format!("delete {}: {}", path, e)))
            }
        }
    }

    fn access(&self, path: &str) -> bool {
        let exists = self.shared.volume.stat(path).is_ok();
        self.trace_op("ACCESS", format_args!("name={} exists={}", path, exists));
        exists
    }

    fn full_pathname(&self, path: &str) -> String {
        let max = self.shared.descriptor.max_pathname;
        let mut out = String::with_capacity(path.len() + 1);
        out.push(ROOT_SEPARATOR);
        out.push_str(path);
        if out.len() > max {
            let mut end = max;
            while end > 0 && !out.is_char_boundary(end) {
                end -= 1;
            }
            out.truncate(end);
        }
        out
    }

    fn sleep(&self, micros: u64) -> u64 {
        let ms = (micros + 999) / 1000;
        self.shared.delay.delay_ms(ms);
        ms * 1000
    }

    fn current_time(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.shared.clock.now_unix(), 0)
            .single()
            .unwrap_or_default()
    }
}
