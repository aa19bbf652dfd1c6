// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Line classification and the hostname grammar.
//!
//! Everything in this module is a pure function of the raw text of a single
//! line, with no state and no I/O. Classification is total: every string maps
//! to exactly one [`EntryType`], so re-parsing is idempotent and a document
//! can always be round-tripped byte-for-byte regardless of how exotic a line
//! is.

use std::fmt;
use std::net::IpAddr;

/// Characters stripped from comment text and hostname candidates.
pub(crate) const TRIM_CHARS: &[char] = &['\r', '\n', ' ', '\t'];

/// The category of a single hosts file line.
///
/// Exactly one type applies to any given string. The variants are tried in
/// the fixed order Comment, Host, Blank; anything that matches none of the
/// three is [`EntryType::Unparsable`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntryType {
    /// The line starts with the `#` marker
    Comment,
    /// An address followed by one or more valid host names
    Host,
    /// The empty line
    Blank,
    /// Anything else; preserved verbatim, never rewritten automatically
    Unparsable,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Comment => "comment",
            Self::Host => "host",
            Self::Blank => "blank",
            Self::Unparsable => "unparsable",
        };

        f.write_str(s)
    }
}

/// Classifies a raw line of hosts file text.
///
/// The precedence is fixed: a line starting with `#` is always a comment,
/// even if the text after the marker would tokenize as a valid host line.
///
/// # Examples
///
/// ```rust
/// use hosts_file::{grammar, EntryType};
///
/// assert_eq!(grammar::classify("# static entries"), EntryType::Comment);
/// assert_eq!(grammar::classify("127.0.0.1\tlocalhost"), EntryType::Host);
/// assert_eq!(grammar::classify(""), EntryType::Blank);
/// assert_eq!(grammar::classify("not a host line"), EntryType::Unparsable);
///
/// // the marker wins over everything after it
/// assert_eq!(grammar::classify("# 1.2.3.4 host"), EntryType::Comment);
/// ```
pub fn classify(raw: &str) -> EntryType {
    if is_comment(raw) {
        EntryType::Comment
    } else if is_host(raw) {
        EntryType::Host
    } else if is_blank(raw) {
        EntryType::Blank
    } else {
        EntryType::Unparsable
    }
}

/// Returns true if the line is non-empty and starts with the `#` marker.
pub fn is_comment(raw: &str) -> bool {
    raw.starts_with('#')
}

/// Returns true if the line has zero length.
///
/// A line containing only whitespace is *not* blank by this rule. It also
/// tokenizes to zero tokens and so can never be a host line, which leaves it
/// [`EntryType::Unparsable`]. The narrow definition is deliberate: widening
/// it would change what survives a round trip of real-world files.
pub fn is_blank(raw: &str) -> bool {
    raw.is_empty()
}

/// Returns true if the line tokenizes as an address followed by one or more
/// valid host names.
pub fn is_host(raw: &str) -> bool {
    let mut tokens = tokenize(raw);

    let Some(address) = tokens.next() else {
        return false;
    };
    if address.parse::<IpAddr>().is_err() {
        return false;
    }

    let mut names = 0;
    for token in tokens {
        if !is_valid_hostname(token) {
            return false;
        }
        names += 1;
    }

    names > 0
}

/// Splits a line into its non-empty tokens.
///
/// Tokens are separated by runs of spaces and/or tabs; leading and trailing
/// separators produce no tokens.
pub fn tokenize(raw: &str) -> impl Iterator<Item = &str> + '_ {
    raw.split(|c| c == ' ' || c == '\t')
        .filter(|token| !token.is_empty())
}

/// Validates a host name against the simplified hosts(5) grammar.
///
/// Per man7, host names may contain only alphanumeric characters, minus
/// signs (`-`), and periods (`.`), and must end with an alphanumeric
/// character. The leading character must be alphanumeric as well: the man
/// page asks for a letter, but names with leading digits occur in real
/// files and are accepted by libc resolvers.
///
/// Surrounding whitespace and line terminators are trimmed before
/// validation; only ASCII is accepted.
///
/// # Examples
///
/// ```rust
/// use hosts_file::grammar::is_valid_hostname;
///
/// assert!(is_valid_hostname("a"));
/// assert!(is_valid_hostname("a-b.c"));
/// assert!(is_valid_hostname("3com.example"));
///
/// assert!(!is_valid_hostname("-abc"));
/// assert!(!is_valid_hostname("abc-"));
/// assert!(!is_valid_hostname(""));
/// assert!(!is_valid_hostname("bücher.example"));
/// ```
pub fn is_valid_hostname(token: &str) -> bool {
    let name = token.trim_matches(TRIM_CHARS);

    if name.is_empty() {
        return false;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return false;
    }

    name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric())
}
