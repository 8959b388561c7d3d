use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Filesystem operations used by a benchmark worker
///
/// Workers only touch the disk through this trait so tests can inject
/// failures without a real faulty device.
pub trait DiskIO: Send + Sync {
    /// Create `path` and all missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate `path` and write all of `data` to it
    fn write_file(&self, path: &Path, data: &[u8], sync: bool) -> io::Result<()>;

    /// List the entries of `dir`, sorted by file name
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Open `path`, stat it and read it fully into `buf`
    fn read_file(&self, path: &Path, buf: &mut Vec<u8>) -> ReadOutcome;
}

/// A directory entry as seen by the read phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// What stat said about a listed entry, following symlinks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    /// Directory, socket or anything else that is not read back
    Other,
    /// Stat failed: dangling symlink, permission denied, removed since listing
    Unknown(String),
}

/// Which step of reading a file failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStep {
    Open,
    Stat,
    Read,
}

/// Result of reading one file back
///
/// Bytes transferred before a failure are still reported so the read
/// phase can account for them.
#[derive(Debug)]
pub struct ReadOutcome {
    /// Length reported by stat, zero if stat never happened
    pub expected: u64,
    /// Bytes actually copied into the buffer
    pub transferred: u64,
    /// First failure, if any
    pub error: Option<(ReadStep, io::Error)>,
}

impl ReadOutcome {
    fn failed(step: ReadStep, expected: u64, transferred: u64, err: io::Error) -> Self {
        Self {
            expected,
            transferred,
            error: Some((step, err)),
        }
    }

    /// True when the file was read without error but ended early
    pub fn is_short(&self) -> bool {
        self.error.is_none() && self.transferred < self.expected
    }
}

/// Disk I/O backed by `std::fs`
#[derive(Debug, Clone, Default)]
pub struct PlatformDiskIO;

impl PlatformDiskIO {
    pub fn new() -> Self {
        Self
    }

    #[cfg(unix)]
    fn open_for_write(path: &Path) -> io::Result<File> {
        use std::os::unix::fs::OpenOptionsExt;

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(path)
    }

    #[cfg(not(unix))]
    fn open_for_write(path: &Path) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }
}

/// Fill `buf` from `reader`, stopping early only at EOF
///
/// Returns the number of bytes read. Unlike `read_exact`, a short file is
/// not an error and the partial count is kept on failure.
pub fn read_until_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> (usize, io::Result<()>) {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return (filled, Err(e)),
        }
    }
    (filled, Ok(()))
}

impl DiskIO for PlatformDiskIO {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, data: &[u8], sync: bool) -> io::Result<()> {
        let mut file = Self::open_for_write(path)?;
        file.write_all(data)?;
        if sync {
            file.sync_all()?;
        }
        Ok(())
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            // file_type() does not follow symlinks; metadata() does
            let kind = match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(_) => EntryKind::Other,
                Err(e) => EntryKind::Unknown(e.to_string()),
            };
            entries.push(DirEntryInfo { path, kind });
        }
        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(entries)
    }

    fn read_file(&self, path: &Path, buf: &mut Vec<u8>) -> ReadOutcome {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return ReadOutcome::failed(ReadStep::Open, 0, 0, e),
        };

        let expected = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => return ReadOutcome::failed(ReadStep::Stat, 0, 0, e),
        };

        let len = match usize::try_from(expected) {
            Ok(len) => len,
            Err(_) => {
                let err = io::Error::new(ErrorKind::OutOfMemory, "file larger than address space");
                return ReadOutcome::failed(ReadStep::Read, expected, 0, err);
            }
        };
        buf.clear();
        buf.resize(len, 0);

        let (filled, result) = read_until_full(&mut file, buf);
        buf.truncate(filled);
        match result {
            Ok(()) => ReadOutcome {
                expected,
                transferred: filled as u64,
                error: None,
            },
            Err(e) => ReadOutcome::failed(ReadStep::Read, expected, filled as u64, e),
        }
    }
}
