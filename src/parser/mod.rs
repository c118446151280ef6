//! Address parsing and validation.
//!
//! One raw string goes through a single tokenizing scan, then local-part and
//! domain analysis under a [`ValidationConfig`] (what the grammar allows) and
//! a [`ParserConfig`] (what the canonical output keeps). Rejections are
//! values, never errors: every failure mode is an [`InvalidReason`].

mod config;
mod domain;
mod local;
mod parsed;
mod reason;
pub(crate) mod scanner;


pub use config::{
    ListOrder, PRINTABLE_SUPERSET, ParserConfig, ParserConfigBuilder, SPECIAL_SUPERSET,
    ValidationConfig, ValidationConfigBuilder,
};
pub use parsed::ParsedAddress;
pub use reason::InvalidReason;

use scanner::Scan;

/// Parses one address under the default `generic`/`standard` configs.
pub fn parse(address: &str) -> ParsedAddress {
    parse_with(address, &ValidationConfig::generic(), &ParserConfig::standard())
}

/// Parses one address.
///
/// Rule evaluation short-circuits in a fixed order, and the order is part of
/// the contract: scan failures (stray `)` first, then unterminated
/// delimiters), then at-count, then quote/comment policy, then local-part
/// analysis, then domain analysis.
pub fn parse_with(
    address: &str,
    validation: &ValidationConfig,
    parser: &ParserConfig,
) -> ParsedAddress {
    if address.is_empty() {
        return ParsedAddress::invalid(address, InvalidReason::Blank, &Scan::default());
    }

    let scan = scanner::scan(address, &parser.sub_address_delimiters);
    if let Some(reason) = scan.error {
        return ParsedAddress::invalid(address, reason, &scan);
    }
    if scan.at_count == 0 {
        return ParsedAddress::invalid(address, InvalidReason::NoAtSymbol, &scan);
    }
    if scan.at_count > 1 {
        return ParsedAddress::invalid(address, InvalidReason::MultipleAtSymbols, &scan);
    }
    if scan.has_quotes && !validation.allow_quotes {
        return ParsedAddress::invalid(address, InvalidReason::HasQuotes, &scan);
    }
    if scan.has_comments && !validation.allow_comments {
        return ParsedAddress::invalid(address, InvalidReason::HasComments, &scan);
    }

    let local = match local::analyze_local(&scan.local, scan.has_comments, validation, parser) {
        Ok(parts) => parts,
        Err(reason) => return ParsedAddress::invalid(address, reason, &scan),
    };
    let domain = match domain::analyze_domain(&scan.domain, validation, parser) {
        Ok(domain) => domain,
        Err(reason) => return ParsedAddress::invalid(address, reason, &scan),
    };
    ParsedAddress::valid(address, local, domain, &scan)
}

/// True when the address is valid under `generic` rules.
pub fn is_valid(address: &str) -> bool {
    parse(address).is_valid()
}

pub fn is_valid_with(address: &str, validation: &ValidationConfig) -> bool {
    parse_with(address, validation, &ParserConfig::standard()).is_valid()
}

/// The first violated rule under `generic` rules, or `None`.
pub fn invalid_reason(address: &str) -> Option<InvalidReason> {
    parse(address).invalid_reason()
}

pub fn invalid_reason_with(
    address: &str,
    validation: &ValidationConfig,
) -> Option<InvalidReason> {
    parse_with(address, validation, &ParserConfig::standard()).invalid_reason()
}

/// True when the address carries a sub-address (checked under `strict`
/// rules, so quoted and commented addresses still parse).
pub fn has_sub_address(address: &str) -> bool {
    parse_with(address, &ValidationConfig::strict(), &ParserConfig::standard()).has_sub_address()
}

pub fn has_quotes(address: &str) -> bool {
    parse_with(address, &ValidationConfig::strict(), &ParserConfig::standard()).has_quotes()
}

pub fn has_comments(address: &str) -> bool {
    parse_with(address, &ValidationConfig::strict(), &ParserConfig::standard()).has_comments()
}

pub fn has_dots(address: &str) -> bool {
    parse_with(address, &ValidationConfig::strict(), &ParserConfig::standard()).has_dots()
}

/// Strips comments and the sub-address and lower-cases the local part,
/// producing the usual lookup key. Returns the input unchanged when it does
/// not parse.
pub fn canonicalize(address: &str) -> String {
    let parser = ParserConfig::builder()
        .include_sub_addresses(false)
        .case_sensitive(false)
        .build();
    parse_with(address, &ValidationConfig::strict(), &parser)
        .canonical_address()
        .unwrap_or_else(|| address.to_string())
}

/// Strips the sub-address and comments but preserves the local-part case.
/// Returns the input unchanged when it does not parse.
pub fn strip_sub_address(address: &str) -> String {
    let parser = ParserConfig::builder().include_sub_addresses(false).build();
    parse_with(address, &ValidationConfig::strict(), &parser)
        .canonical_address()
        .unwrap_or_else(|| address.to_string())
}

/// Strips comments only; sub-address and case are preserved. Returns the
/// input unchanged when it does not parse.
pub fn strip_comments(address: &str) -> String {
    parse_with(address, &ValidationConfig::strict(), &ParserConfig::standard())
        .canonical_address()
        .unwrap_or_else(|| address.to_string())
}
