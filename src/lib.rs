// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A library for reading, interpreting, editing, and writing hosts files.
//!
//! Hosts files (`/etc/hosts` and the Windows equivalent) are line oriented:
//! each line is a comment, a blank, a mapping from an address to one or more
//! host names, or something else entirely that the resolver ignores. This
//! crate models a hosts file as an ordered list of [`HostsEntry`] values,
//! one per line, where each entry is classified from its raw text on demand
//! and exposes typed views over it. Lines that match no grammar are kept
//! verbatim and survive a load/store cycle unchanged, so editing one entry
//! never disturbs the rest of the file.
//!
//! # Reading entries
//!
//! ```rust
//! use hosts_file::{EntryType, HostsFile};
//!
//! let hosts = HostsFile::from_lines([
//!     "# development overrides",
//!     "127.0.0.1\tlocalhost",
//!     "10.0.1.102 example.com example",
//! ]);
//!
//! let entry = &hosts.entries()[2];
//! assert_eq!(entry.entry_type(), EntryType::Host);
//! assert_eq!(entry.address(), "10.0.1.102".parse().ok());
//! assert_eq!(entry.canonical_hostname(), Some("example.com"));
//! assert_eq!(entry.hostname_aliases(), Some(vec!["example"]));
//! ```
//!
//! # Editing
//!
//! Mutation is validate-first: a rejected name or address leaves the entry
//! exactly as it was.
//!
//! ```rust
//! use hosts_file::HostsFile;
//!
//! let mut hosts = HostsFile::from_lines(["127.0.0.1 localhost"]);
//! hosts.append_blank_entry().set_comment("pinned for the demo");
//! hosts
//!     .append_blank_entry()
//!     .set_host_str("203.0.113.10", "demo.example.com", &["demo"])?;
//!
//! assert_eq!(
//!     hosts.to_string(),
//!     "127.0.0.1 localhost\n\
//!      ## pinned for the demo\n\
//!      203.0.113.10 demo.example.com demo\n",
//! );
//! # Ok::<(), hosts_file::HostsFileError>(())
//! ```
//!
//! # The system hosts file
//!
//! ```rust,no_run
//! use hosts_file::HostsFile;
//!
//! let mut hosts = HostsFile::system()?;
//! hosts
//!     .append_blank_entry()
//!     .set_host_str("10.0.1.102", "example.com", &[])?;
//! hosts.write()?;
//! # Ok::<(), hosts_file::HostsFileError>(())
//! ```
//!
//! [`HostsFile::write`] and [`HostsFile::write_path`] know the common trick
//! of a read-only hosts file: the read-only permission is lifted for the
//! write and put back afterward.

#![warn(
    clippy::default_trait_access,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::unimplemented,
    clippy::use_self,
    missing_copy_implementations,
    missing_docs,
    non_snake_case,
    non_upper_case_globals,
    rust_2018_idioms,
    unreachable_pub
)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod entry;
mod error;
mod file;
pub mod grammar;

pub use entry::HostsEntry;
pub use error::{HostsFileError, HostsFileErrorKind, HostsFileResult};
#[cfg(any(unix, windows))]
pub use file::system_hosts_path;
pub use file::HostsFile;
pub use grammar::EntryType;

/// returns a version as specified in Cargo.toml
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::version;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
