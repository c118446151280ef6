use super::local::LocalParts;
use super::reason::InvalidReason;
use super::scanner::Scan;

/// The outcome of parsing one raw address under one configuration pair.
///
/// Created by [`parse`](crate::parser::parse) /
/// [`parse_with`](crate::parser::parse_with) and immutable afterwards. The
/// structural flags are populated even for invalid results, as far as the
/// scan got before failing; the remaining accessors return `Some` only for
/// valid results.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    raw: String,
    invalid_reason: Option<InvalidReason>,
    domain: Option<String>,
    canonical_local_part: Option<String>,
    full_local_part: Option<String>,
    full_local_part_with_comments: Option<String>,
    sub_address: Option<String>,
    has_dots: bool,
    has_quotes: bool,
    has_comments: bool,
}

impl ParsedAddress {
    pub(crate) fn invalid(raw: &str, reason: InvalidReason, scan: &Scan) -> Self {
        Self {
            raw: raw.to_string(),
            invalid_reason: Some(reason),
            domain: None,
            canonical_local_part: None,
            full_local_part: None,
            full_local_part_with_comments: None,
            sub_address: None,
            has_dots: scan.has_dots,
            has_quotes: scan.has_quotes,
            has_comments: scan.has_comments,
        }
    }

    pub(crate) fn valid(raw: &str, local: LocalParts, domain: String, scan: &Scan) -> Self {
        Self {
            raw: raw.to_string(),
            invalid_reason: None,
            domain: Some(domain),
            canonical_local_part: Some(local.canonical),
            full_local_part: Some(local.full),
            full_local_part_with_comments: local.full_with_comments,
            sub_address: Some(local.sub_address),
            has_dots: scan.has_dots,
            has_quotes: scan.has_quotes,
            has_comments: scan.has_comments,
        }
    }

    /// The unparsed input.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_reason.is_none()
    }

    /// The first violated rule, or `None` for a valid address.
    pub fn invalid_reason(&self) -> Option<InvalidReason> {
        self.invalid_reason
    }

    /// Lower-cased domain, comments stripped unless the config keeps them.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Local part shaped by the parser config (case, comments, sub-address).
    pub fn canonical_local_part(&self) -> Option<&str> {
        self.canonical_local_part.as_deref()
    }

    /// `canonical_local_part@domain`, the deduplication key.
    pub fn canonical_address(&self) -> Option<String> {
        let local = self.canonical_local_part.as_deref()?;
        let domain = self.domain.as_deref()?;
        Some(format!("{local}@{domain}"))
    }

    /// Original case and sub-address, comments stripped.
    pub fn full_local_part(&self) -> Option<&str> {
        self.full_local_part.as_deref()
    }

    /// The untouched local part; `Some` only when the address contains
    /// comments.
    pub fn full_local_part_with_comments(&self) -> Option<&str> {
        self.full_local_part_with_comments.as_deref()
    }

    /// Sub-address including its delimiter. `Some("")` for a valid address
    /// without one, `None` when the address is invalid.
    pub fn sub_address(&self) -> Option<&str> {
        self.sub_address.as_deref()
    }

    pub fn has_sub_address(&self) -> bool {
        self.sub_address.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Dots seen in the local part, outside quotes and comments.
    pub fn has_dots(&self) -> bool {
        self.has_dots
    }

    pub fn has_quotes(&self) -> bool {
        self.has_quotes
    }

    pub fn has_comments(&self) -> bool {
        self.has_comments
    }
}
