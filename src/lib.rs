#![forbid(unsafe_code)]
//! mailsift_lib — email address parsing, validation, and list analytics.
//!
//! A configurable RFC5322-subset grammar drives three layers: single-address
//! parsing and canonicalization ([`parser`]), per-key accumulators
//! ([`analysis`]), and list operations (deduplication and occurrence
//! ranking, [`aggregate`]). [`quickcount`] is the regex shortcut for rough
//! domain surveys.

pub mod aggregate;
pub mod analysis;
pub mod parser;
pub mod quickcount;

pub use aggregate::{
    ListAggregator,
    analyze_addresses,
    analyze_domains,
    count_unique_domains,
    deduplicate_addresses,
    deduplicate_addresses_with,
    list_domains,
    list_domains_by_count,
    validate_addresses,
    validate_addresses_with,
};
pub use analysis::{AddressAnalysis, DomainAnalysis};
pub use parser::{
    InvalidReason,
    ListOrder,
    ParsedAddress,
    ParserConfig,
    ParserConfigBuilder,
    ValidationConfig,
    ValidationConfigBuilder,
    canonicalize,
    has_comments,
    has_dots,
    has_quotes,
    has_sub_address,
    invalid_reason,
    invalid_reason_with,
    is_valid,
    is_valid_with,
    parse,
    parse_with,
    strip_comments,
    strip_sub_address,
};
pub use quickcount::count_email_domains;
