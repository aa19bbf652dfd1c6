// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A single line of a hosts file and its typed views.

use std::fmt;
use std::net::IpAddr;

use crate::error::{HostsFileErrorKind, HostsFileResult};
use crate::grammar::{self, EntryType, TRIM_CHARS};

/// One line of a hosts file.
///
/// The raw text of the line is the only state; the classification and every
/// structured field are computed from it on demand and never stored, so the
/// views can never drift out of sync with the text. Lines that do not parse
/// are carried verbatim and written back unchanged.
///
/// Reading a field of the wrong type returns `None` rather than failing: an
/// entry may legitimately hold a comment, a blank line, or malformed legacy
/// content, and inspecting it must never be an error. Only the mutators
/// validate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostsEntry {
    raw: String,
}

impl HostsEntry {
    /// Creates a new, blank entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entry from the raw text of a line, without its terminator.
    ///
    /// This never fails; text that matches no grammar is simply
    /// [`EntryType::Unparsable`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the raw text of the line.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the type of this entry.
    ///
    /// The type is re-derived from the current raw text on every call; it is
    /// deterministic and free of side effects.
    pub fn entry_type(&self) -> EntryType {
        grammar::classify(&self.raw)
    }

    /// Returns true if the entry matched one of the known line grammars.
    pub fn is_valid(&self) -> bool {
        self.entry_type() != EntryType::Unparsable
    }

    /// Returns the comment text without the leading `#` marker, trimmed of
    /// surrounding whitespace.
    ///
    /// `None` unless the entry is a comment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hosts_file::HostsEntry;
    ///
    /// let entry = HostsEntry::from_raw("#  ferrous metals only ");
    /// assert_eq!(entry.comment(), Some("ferrous metals only"));
    ///
    /// let entry = HostsEntry::from_raw("127.0.0.1 localhost");
    /// assert_eq!(entry.comment(), None);
    /// ```
    pub fn comment(&self) -> Option<&str> {
        if !grammar::is_comment(&self.raw) {
            return None;
        }

        Some(self.raw[1..].trim_matches(TRIM_CHARS))
    }

    /// Returns the IP address of a host entry.
    ///
    /// `None` unless the entry is a host line.
    pub fn address(&self) -> Option<IpAddr> {
        if !grammar::is_host(&self.raw) {
            return None;
        }

        grammar::tokenize(&self.raw).next()?.parse().ok()
    }

    /// Returns the canonical (primary) hostname of a host entry.
    ///
    /// `None` unless the entry is a host line.
    pub fn canonical_hostname(&self) -> Option<&str> {
        if !grammar::is_host(&self.raw) {
            return None;
        }

        grammar::tokenize(&self.raw).nth(1)
    }

    /// Returns the aliases of a host entry, in file order.
    ///
    /// `None` unless the entry is a host line; a host line with no aliases
    /// yields an empty `Vec`.
    pub fn hostname_aliases(&self) -> Option<Vec<&str>> {
        if !grammar::is_host(&self.raw) {
            return None;
        }

        Some(grammar::tokenize(&self.raw).skip(2).collect())
    }

    /// Rewrites this entry as a host line.
    ///
    /// The canonical name and every alias are validated against the hostname
    /// grammar before anything is written; if any name is rejected the entry
    /// is left exactly as it was and
    /// [`InvalidHostname`](HostsFileErrorKind::InvalidHostname) is returned.
    /// On success the raw text becomes the address in its canonical textual
    /// form followed by the names, separated by single spaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::net::{IpAddr, Ipv4Addr};
    /// use hosts_file::HostsEntry;
    ///
    /// let mut entry = HostsEntry::new();
    /// entry
    ///     .set_host(IpAddr::V4(Ipv4Addr::LOCALHOST), "localhost", &["home.arpa"])
    ///     .unwrap();
    /// assert_eq!(entry.raw(), "127.0.0.1 localhost home.arpa");
    ///
    /// // rejected names leave the entry untouched
    /// let err = entry
    ///     .set_host(IpAddr::V4(Ipv4Addr::LOCALHOST), "-nope", &[])
    ///     .unwrap_err();
    /// assert!(err.is_invalid_hostname());
    /// assert_eq!(entry.raw(), "127.0.0.1 localhost home.arpa");
    /// ```
    pub fn set_host(
        &mut self,
        address: IpAddr,
        canonical: &str,
        aliases: &[&str],
    ) -> HostsFileResult<()> {
        if !grammar::is_valid_hostname(canonical) {
            return Err(HostsFileErrorKind::InvalidHostname(canonical.to_string()).into());
        }
        for alias in aliases {
            if !grammar::is_valid_hostname(alias) {
                return Err(HostsFileErrorKind::InvalidHostname(alias.to_string()).into());
            }
        }

        let mut raw = format!("{address} {canonical}");
        for alias in aliases {
            raw.push(' ');
            raw.push_str(alias);
        }
        self.raw = raw;

        Ok(())
    }

    /// Rewrites this entry as a host line, parsing the address from text.
    ///
    /// Same contract as [`set_host`](Self::set_host); an address that does
    /// not parse as IPv4 or IPv6 returns
    /// [`AddrParse`](HostsFileErrorKind::AddrParse) with the entry unchanged.
    /// Note that the raw text always carries the parsed address's canonical
    /// form, e.g. `"0:0:0:0:0:0:0:1"` is written back as `"::1"`.
    pub fn set_host_str(
        &mut self,
        address: &str,
        canonical: &str,
        aliases: &[&str],
    ) -> HostsFileResult<()> {
        let address: IpAddr = address
            .trim_matches(TRIM_CHARS)
            .parse()
            .map_err(HostsFileErrorKind::AddrParse)?;

        self.set_host(address, canonical, aliases)
    }

    /// Rewrites this entry as a comment.
    ///
    /// Cannot fail; the text is trimmed of surrounding whitespace and the
    /// raw line becomes `# ` followed by the text, switching the entry to
    /// [`EntryType::Comment`] no matter what it held before.
    pub fn set_comment(&mut self, comment: &str) {
        self.raw = format!("# {}", comment.trim_matches(TRIM_CHARS));
    }

    /// Rewrites this entry as a blank line.
    pub fn set_blank(&mut self) {
        self.raw.clear();
    }
}

impl fmt::Display for HostsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_entry_is_blank() {
        assert_eq!(HostsEntry::new().entry_type(), EntryType::Blank);
        assert_eq!(HostsEntry::default().entry_type(), EntryType::Blank);
        assert_eq!(HostsEntry::new().raw(), "");
    }

    #[test]
    fn test_entry_type_follows_raw() {
        let entry = HostsEntry::from_raw("10.0.1.102 example.com");
        assert_eq!(entry.entry_type(), EntryType::Host);
        assert!(entry.is_valid());

        let entry = HostsEntry::from_raw("!! broken !!");
        assert_eq!(entry.entry_type(), EntryType::Unparsable);
        assert!(!entry.is_valid());
    }

    #[test]
    fn test_comment_view() {
        assert_eq!(HostsEntry::from_raw("#note").comment(), Some("note"));
        assert_eq!(HostsEntry::from_raw("#   note  ").comment(), Some("note"));
        assert_eq!(HostsEntry::from_raw("#").comment(), Some(""));
        // marker only strips once; inner markers are comment text
        assert_eq!(HostsEntry::from_raw("## note").comment(), Some("# note"));

        assert_eq!(HostsEntry::from_raw("127.0.0.1 localhost").comment(), None);
        assert_eq!(HostsEntry::from_raw("").comment(), None);
    }

    #[test]
    fn test_host_views() {
        let entry = HostsEntry::from_raw("192.168.10.1\tfoo  foo.bar \t foo.local");
        assert_eq!(entry.entry_type(), EntryType::Host);
        assert_eq!(entry.address(), Some(ip("192.168.10.1")));
        assert_eq!(entry.canonical_hostname(), Some("foo"));
        assert_eq!(
            entry.hostname_aliases(),
            Some(vec!["foo.bar", "foo.local"])
        );
    }

    #[test]
    fn test_host_views_without_aliases() {
        let entry = HostsEntry::from_raw("::1 ip6-localhost");
        assert_eq!(entry.address(), Some(ip("::1")));
        assert_eq!(entry.canonical_hostname(), Some("ip6-localhost"));
        assert_eq!(entry.hostname_aliases(), Some(vec![]));
    }

    #[test]
    fn test_host_views_on_other_types() {
        for raw in ["# 127.0.0.1 localhost", "", "   ", "no address here"] {
            let entry = HostsEntry::from_raw(raw);
            assert_eq!(entry.address(), None, "raw: {raw:?}");
            assert_eq!(entry.canonical_hostname(), None, "raw: {raw:?}");
            assert_eq!(entry.hostname_aliases(), None, "raw: {raw:?}");
        }
    }

    #[test]
    fn test_set_host_roundtrip() {
        let mut entry = HostsEntry::new();
        entry
            .set_host(ip("127.0.0.1"), "localhost", &["alias1", "alias2"])
            .unwrap();

        assert_eq!(entry.raw(), "127.0.0.1 localhost alias1 alias2");
        assert_eq!(entry.entry_type(), EntryType::Host);
        assert_eq!(entry.address(), Some(ip("127.0.0.1")));
        assert_eq!(entry.canonical_hostname(), Some("localhost"));
        assert_eq!(entry.hostname_aliases(), Some(vec!["alias1", "alias2"]));
    }

    #[test]
    fn test_set_host_canonical_address_form() {
        let mut entry = HostsEntry::new();
        entry
            .set_host(ip("0:0:0:0:0:0:0:1"), "ip6-localhost", &[])
            .unwrap();
        assert_eq!(entry.raw(), "::1 ip6-localhost");

        entry
            .set_host(IpAddr::V6(Ipv6Addr::new(0xfe00, 0, 0, 0, 0, 0, 0, 0)), "net", &[])
            .unwrap();
        assert_eq!(entry.raw(), "fe00:: net");
    }

    #[test]
    fn test_set_host_rejects_bad_canonical() {
        let mut entry = HostsEntry::from_raw("# untouched");
        let before = entry.clone();

        let err = entry
            .set_host(IpAddr::V4(Ipv4Addr::LOCALHOST), "-badname", &[])
            .unwrap_err();
        assert!(err.is_invalid_hostname());
        assert_eq!(entry, before);
        assert_eq!(entry.entry_type(), EntryType::Comment);
    }

    #[test]
    fn test_set_host_rejects_bad_alias() {
        let mut entry = HostsEntry::from_raw("10.1.1.1 keep.me");
        let before = entry.clone();

        let err = entry
            .set_host(ip("10.1.1.1"), "fine", &["ok", "trailing-"])
            .unwrap_err();
        assert!(
            matches!(err.kind(), HostsFileErrorKind::InvalidHostname(name) if name == "trailing-")
        );
        assert_eq!(entry, before);
    }

    #[test]
    fn test_set_host_str() {
        let mut entry = HostsEntry::new();
        entry.set_host_str("10.0.1.111", "a.example.com", &[]).unwrap();
        assert_eq!(entry.raw(), "10.0.1.111 a.example.com");
    }

    #[test]
    fn test_set_host_str_rejects_bad_address() {
        let mut entry = HostsEntry::from_raw("::1 keep");
        let before = entry.clone();

        let err = entry.set_host_str("not-an-ip", "localhost", &[]).unwrap_err();
        assert!(matches!(err.kind(), HostsFileErrorKind::AddrParse(_)));
        assert_eq!(entry, before);
    }

    #[test]
    fn test_set_comment() {
        let mut entry = HostsEntry::from_raw("127.0.0.1 localhost");
        entry.set_comment("  managed block  ");

        assert_eq!(entry.raw(), "# managed block");
        assert_eq!(entry.entry_type(), EntryType::Comment);
        assert_eq!(entry.comment(), Some("managed block"));
    }

    #[test]
    fn test_set_blank() {
        let mut entry = HostsEntry::from_raw("127.0.0.1 localhost");
        entry.set_blank();

        assert_eq!(entry.raw(), "");
        assert_eq!(entry.entry_type(), EntryType::Blank);
    }

    #[test]
    fn test_display_is_raw() {
        let entry = HostsEntry::from_raw("255.255.255.255\tbroadcasthost");
        assert_eq!(entry.to_string(), "255.255.255.255\tbroadcasthost");
    }
}
