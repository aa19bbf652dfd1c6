// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The hosts file document: an ordered sequence of entries plus the
//! filesystem plumbing to load and store it.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::entry::HostsEntry;
use crate::error::{HostsFileErrorKind, HostsFileResult};

/// An in-memory hosts file.
///
/// The document is nothing more than its entries, one per line and in file
/// order. Loading never rejects content: lines that match no grammar are
/// carried as [`Unparsable`](crate::EntryType::Unparsable) entries and are
/// written back exactly as they were read, so a load followed by a store
/// reproduces the input byte for byte. The two exceptions are byte-level
/// encodings an entry cannot carry: CRLF terminators come back out as `\n`,
/// and bytes that are not valid UTF-8 come back out as U+FFFD.
///
/// A document opened from a path remembers it and can [`write`](Self::write)
/// itself back; documents built from lines or readers have no backing path.
#[derive(Clone, Debug, Default)]
pub struct HostsFile {
    path: Option<PathBuf>,
    entries: Vec<HostsEntry>,
}

impl HostsFile {
    /// Creates an empty document with no backing path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from raw lines, one entry per line, in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hosts_file::{EntryType, HostsFile};
    ///
    /// let hosts = HostsFile::from_lines(["127.0.0.1 localhost", "", "# the end"]);
    /// assert_eq!(hosts.len(), 3);
    /// assert_eq!(hosts.entries()[2].entry_type(), EntryType::Comment);
    /// ```
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: None,
            entries: lines.into_iter().map(HostsEntry::from_raw).collect(),
        }
    }

    /// Reads a document from any byte source.
    ///
    /// Lines are split on `\n`, with a trailing `\r` stripped, so CRLF files
    /// load cleanly. Bytes that are not valid UTF-8 are replaced with
    /// U+FFFD, degrading only the line that carries them. Fails only on I/O
    /// errors; unrecognized content is preserved as unparsable entries and
    /// noted at `debug` level.
    pub fn from_reader(reader: impl io::Read) -> HostsFileResult<Self> {
        let mut reader = BufReader::new(reader);
        let mut entries = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }

            // decoded lossily so content can never make the load fail
            let entry = HostsEntry::from_raw(String::from_utf8_lossy(&buf));
            if !entry.is_valid() {
                debug!(line = entries.len() + 1, raw = %entry.raw(), "preserving unparsable hosts line");
            }
            entries.push(entry);
        }

        Ok(Self {
            path: None,
            entries,
        })
    }

    /// Opens the hosts file at `path` and remembers the path for
    /// [`write`](Self::write).
    pub fn open(path: impl AsRef<Path>) -> HostsFileResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading hosts file");

        let mut hosts = Self::from_reader(File::open(path)?)?;
        hosts.path = Some(path.to_path_buf());
        Ok(hosts)
    }

    /// Opens the operating system's hosts file, e.g. `/etc/hosts`.
    #[cfg(any(unix, windows))]
    pub fn system() -> HostsFileResult<Self> {
        Self::open(system_hosts_path())
    }

    /// Returns the backing path, if the document was opened from one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the entries in file order.
    pub fn entries(&self) -> &[HostsEntry] {
        &self.entries
    }

    /// Returns the entries in file order, mutably.
    ///
    /// Entries edited in place keep their position; the sequence itself only
    /// grows through [`append_blank_entry`](Self::append_blank_entry).
    pub fn entries_mut(&mut self) -> &mut [HostsEntry] {
        &mut self.entries
    }

    /// Returns the number of entries (lines).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a blank entry and returns it for in-place editing.
    ///
    /// New content is always added this way: append a blank line, then turn
    /// it into whatever is needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hosts_file::HostsFile;
    ///
    /// let mut hosts = HostsFile::new();
    /// hosts
    ///     .append_blank_entry()
    ///     .set_host_str("10.0.1.102", "example.com", &["example"])?;
    ///
    /// assert_eq!(hosts.to_string(), "10.0.1.102 example.com example\n");
    /// # Ok::<(), hosts_file::HostsFileError>(())
    /// ```
    pub fn append_blank_entry(&mut self) -> &mut HostsEntry {
        self.entries.push(HostsEntry::new());
        self.entries
            .last_mut()
            .expect("vec is non-empty after push")
    }

    /// Returns the raw lines in file order, without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(HostsEntry::raw)
    }

    /// Streams the document to `writer`, one `\n`-terminated line per entry.
    pub fn write_to(&self, mut writer: impl io::Write) -> HostsFileResult<()> {
        for entry in &self.entries {
            writer.write_all(entry.raw().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Writes the document back to the path it was opened from.
    ///
    /// Fails with [`NoPath`](HostsFileErrorKind::NoPath) if the document was
    /// not opened from a path.
    pub fn write(&self) -> HostsFileResult<()> {
        let path = self.path.as_ref().ok_or(HostsFileErrorKind::NoPath)?;
        self.write_path(path)
    }

    /// Writes the document to `path`, replacing whatever is there.
    ///
    /// Hosts files are commonly left read-only. If the target exists with
    /// its read-only permission set, the permission is cleared for the
    /// duration of the write and restored afterward, whether or not the
    /// write succeeded. A restore failure after a successful write is
    /// reported as the error; after a failed write the write error wins and
    /// the restore failure is only logged.
    pub fn write_path(&self, path: impl AsRef<Path>) -> HostsFileResult<()> {
        let path = path.as_ref();

        let saved = match fs::metadata(path) {
            Ok(metadata) if metadata.permissions().readonly() => {
                let permissions = metadata.permissions();
                debug!(path = %path.display(), "clearing read-only permission before write");
                fs::set_permissions(path, writable(&permissions))?;
                Some(permissions)
            }
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let written = self.write_file(path);

        if let Some(permissions) = saved {
            match fs::set_permissions(path, permissions) {
                Ok(()) => debug!(path = %path.display(), "restored prior permissions"),
                Err(e) => {
                    if written.is_ok() {
                        return Err(e.into());
                    }
                    warn!(path = %path.display(), error = %e, "failed to restore permissions");
                }
            }
        }

        written
    }

    fn write_file(&self, path: &Path) -> HostsFileResult<()> {
        debug!(path = %path.display(), lines = self.entries.len(), "writing hosts file");
        self.write_to(BufWriter::new(File::create(path)?))
    }
}

impl fmt::Display for HostsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Returns a copy of `permissions` with the read-only state cleared.
///
/// On Unix only the owner write bit is added; `set_readonly(false)` would
/// grant write to group and others as well.
fn writable(permissions: &fs::Permissions) -> fs::Permissions {
    let mut writable = permissions.clone();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        writable.set_mode(writable.mode() | 0o200);
    }
    #[cfg(not(unix))]
    writable.set_readonly(false);

    writable
}

/// Returns the platform's default hosts file path.
///
/// `/etc/hosts` on Unix. On Windows the path lives under `%SystemRoot%`,
/// with the conventional `C:\Windows` standing in when the variable is
/// unset.
#[cfg(unix)]
pub fn system_hosts_path() -> PathBuf {
    PathBuf::from("/etc/hosts")
}

/// Returns the platform's default hosts file path.
///
/// `/etc/hosts` on Unix. On Windows the path lives under `%SystemRoot%`,
/// with the conventional `C:\Windows` standing in when the variable is
/// unset.
#[cfg(windows)]
pub fn system_hosts_path() -> PathBuf {
    let root = std::env::var_os("SystemRoot")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("C:/Windows"));

    root.join(r"System32\drivers\etc\hosts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::EntryType;

    const SAMPLE: &str = "\
127.0.0.1 localhost
::1\tlocalhost ip6-localhost

# static mappings
10.0.1.102 example.com example
stray line that parses as nothing
";

    #[test]
    fn test_from_lines_preserves_order() {
        let hosts = HostsFile::from_lines(SAMPLE.lines());

        assert_eq!(hosts.len(), 6);
        assert_eq!(
            hosts.lines().collect::<Vec<_>>(),
            SAMPLE.lines().collect::<Vec<_>>()
        );
        assert_eq!(
            hosts
                .entries()
                .iter()
                .map(HostsEntry::entry_type)
                .collect::<Vec<_>>(),
            vec![
                EntryType::Host,
                EntryType::Host,
                EntryType::Blank,
                EntryType::Comment,
                EntryType::Host,
                EntryType::Unparsable,
            ]
        );
    }

    #[test]
    fn test_display_round_trips() {
        let hosts = HostsFile::from_lines(SAMPLE.lines());
        assert_eq!(hosts.to_string(), SAMPLE);
    }

    #[test]
    fn test_write_to_round_trips() {
        let hosts = HostsFile::from_reader(SAMPLE.as_bytes()).unwrap();

        let mut out = Vec::new();
        hosts.write_to(&mut out).unwrap();
        assert_eq!(out, SAMPLE.as_bytes());
    }

    #[test]
    fn test_from_reader_replaces_invalid_utf8() {
        // Latin-1 "café" in a comment; the line degrades, the load does not
        let hosts = HostsFile::from_reader(&b"127.0.0.1 localhost\n# caf\xE9\n"[..]).unwrap();

        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts.entries()[0].raw(), "127.0.0.1 localhost");
        assert_eq!(hosts.entries()[1].raw(), "# caf\u{FFFD}");
        assert_eq!(hosts.entries()[1].entry_type(), EntryType::Comment);
        assert_eq!(hosts.entries()[1].comment(), Some("caf\u{FFFD}"));
    }

    #[test]
    fn test_from_reader_strips_crlf() {
        let crlf = "127.0.0.1 localhost\r\n# note\r\n";
        let hosts = HostsFile::from_reader(crlf.as_bytes()).unwrap();

        assert_eq!(hosts.lines().collect::<Vec<_>>(), vec![
            "127.0.0.1 localhost",
            "# note",
        ]);
        // terminators are normalized on the way back out
        assert_eq!(hosts.to_string(), "127.0.0.1 localhost\n# note\n");
    }

    #[test]
    fn test_empty_document() {
        let hosts = HostsFile::new();
        assert!(hosts.is_empty());
        assert_eq!(hosts.len(), 0);
        assert_eq!(hosts.path(), None);
        assert_eq!(hosts.to_string(), "");
    }

    #[test]
    fn test_append_blank_entry() {
        let mut hosts = HostsFile::new();

        let entry = hosts.append_blank_entry();
        assert_eq!(entry.entry_type(), EntryType::Blank);

        entry.set_comment("added");
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts.entries()[0].comment(), Some("added"));
    }

    #[test]
    fn test_entries_mut_edits_in_place() {
        let mut hosts = HostsFile::from_lines(["# placeholder", "10.0.0.1 old.example"]);

        hosts.entries_mut()[1]
            .set_host_str("10.0.0.2", "new.example", &[])
            .unwrap();

        assert_eq!(
            hosts.to_string(),
            "# placeholder\n10.0.0.2 new.example\n"
        );
    }

    #[test]
    fn test_write_without_path() {
        let hosts = HostsFile::from_lines(["127.0.0.1 localhost"]);

        let err = hosts.write().unwrap_err();
        assert!(matches!(err.kind(), HostsFileErrorKind::NoPath));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_hosts_path() {
        assert_eq!(system_hosts_path(), PathBuf::from("/etc/hosts"));
    }
}
