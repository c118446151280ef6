use thiserror::Error;

/// Every cause for rejecting an address.
///
/// Exactly one reason is attached to an invalid parse result. Evaluation is
/// short-circuiting: the first violated rule wins, and that order is part of
/// the contract (see [`parse_with`](crate::parser::parse_with)).
///
/// The first group is invalid under every configuration; the reasons from
/// [`NoTopLevelDomain`](InvalidReason::NoTopLevelDomain) onwards only fire
/// when the corresponding rule is disabled in the
/// [`ValidationConfig`](crate::parser::ValidationConfig).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvalidReason {
    #[error("address is blank")]
    Blank,
    #[error("no '@' symbol outside quotes and comments")]
    NoAtSymbol,
    #[error("more than one '@' symbol outside quotes and comments")]
    MultipleAtSymbols,
    #[error("local part is longer than 64 characters")]
    LocalPartTooLong,
    #[error("unmatched parenthesis")]
    UnclosedParenthesis,
    #[error("unmatched quote")]
    UnclosedQuote,
    #[error("invalid characters")]
    InvalidCharacters,
    #[error("quoted text in the domain")]
    DomainQuotes,
    /// Reserved. Underscored domain labels currently surface as
    /// [`InvalidCharacters`](InvalidReason::InvalidCharacters) through the
    /// label shape check.
    #[error("underscores in the domain")]
    Underscores,
    #[error("consecutive dots in the domain")]
    ConsecutiveDots,
    #[error("domain starts or ends with a dot")]
    EdgeDot,
    #[error("domain label starts or ends with a hyphen")]
    DomainEdgeHyphen,
    #[error("domain has no top-level part")]
    NoTopLevelDomain,
    #[error("IPv4 address domains are disallowed by this configuration")]
    V4IpDomain,
    #[error("IPv6 address domains are disallowed by this configuration")]
    V6IpDomain,
    #[error("quotes are disallowed by this configuration")]
    HasQuotes,
    #[error("comments are disallowed by this configuration")]
    HasComments,
    #[error("sub-addresses are disallowed by this configuration")]
    HasSubAddress,
    #[error("dots in the local part are disallowed by this configuration")]
    HasDots,
}
