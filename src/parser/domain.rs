use std::sync::LazyLock;

use regex::Regex;

use super::config::{ParserConfig, ValidationConfig};
use super::reason::InvalidReason;
use super::scanner::{Token, TokenKind};

/// Label shape for multi-character domain labels; one-character labels are
/// exempt.
static LABEL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$").expect("label pattern")
});

static V4_IP_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[([01]?\d\d?|2[0-4]\d|25[0-5])\.([01]?\d\d?|2[0-4]\d|25[0-5])\.([01]?\d\d?|2[0-4]\d|25[0-5])\.([01]?\d\d?|2[0-4]\d|25[0-5])\]$",
    )
    .expect("ipv4 literal pattern")
});

static V6_IP_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ipv6:([a-f\d:]+:+)+[a-f\d]+\]").expect("ipv6 literal pattern"));

/// Walks the domain tokens and returns the assembled, lower-cased domain.
pub(crate) fn analyze_domain(
    tokens: &[Token],
    validation: &ValidationConfig,
    parser: &ParserConfig,
) -> Result<String, InvalidReason> {
    let mut assembled = String::new();
    let mut bad_label = false;

    for token in tokens {
        let is_comment = token.kind == TokenKind::Comment;
        let is_dot = token.kind == TokenKind::Dot;

        // Checked against the assembled string, so comment-only gaps between
        // dots still count as consecutive.
        if is_dot && assembled.ends_with('.') {
            return Err(InvalidReason::ConsecutiveDots);
        }
        if !is_comment || parser.include_comments {
            if token.kind == TokenKind::Quote {
                return Err(InvalidReason::DomainQuotes);
            }
            assembled.push_str(&token.text);
        }
        if !is_comment && !is_dot {
            let label = token.text.as_str();
            if label.starts_with('-') || label.ends_with('-') {
                return Err(InvalidReason::DomainEdgeHyphen);
            }
            bad_label |= !label.chars().any(|c| c.is_ascii_alphabetic());
            bad_label |= label.len() > 1 && !LABEL_SHAPE.is_match(label);
        }
    }

    // The original indexes into the assembled string here and dies on an
    // empty domain; report the absent domain instead.
    if assembled.is_empty() {
        return Err(InvalidReason::NoTopLevelDomain);
    }
    if assembled.starts_with('.') || assembled.ends_with('.') {
        return Err(InvalidReason::EdgeDot);
    }
    if assembled.starts_with('-') || assembled.ends_with('-') {
        return Err(InvalidReason::DomainEdgeHyphen);
    }

    let domain = assembled.to_ascii_lowercase();

    let is_ip_domain = if V4_IP_DOMAIN.is_match(&domain) {
        if !validation.allow_v4_ip_domains {
            return Err(InvalidReason::V4IpDomain);
        }
        true
    } else if V6_IP_DOMAIN.is_match(&domain) {
        if !validation.allow_v6_ip_domains {
            return Err(InvalidReason::V6IpDomain);
        }
        true
    } else {
        false
    };

    if !is_ip_domain && bad_label {
        return Err(InvalidReason::InvalidCharacters);
    }
    if !validation.allow_single_name_domains && !domain.contains('.') {
        return Err(InvalidReason::NoTopLevelDomain);
    }
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scanner::scan;

    fn domain_tokens(raw: &str) -> Vec<Token> {
        let delimiters = ['+'].into_iter().collect();
        let scanned = scan(raw, &delimiters);
        assert!(scanned.error.is_none(), "scan failed for {raw}");
        scanned.domain
    }

    fn analyze(raw: &str, validation: &ValidationConfig) -> Result<String, InvalidReason> {
        analyze_domain(&domain_tokens(raw), validation, &ParserConfig::standard())
    }

    #[test]
    fn domain_is_lower_cased() {
        let domain = analyze("a@EXAMPLE.Com", &ValidationConfig::generic()).expect("valid");
        assert_eq!(domain, "example.com");
    }

    #[test]
    fn comments_are_stripped_unless_kept() {
        let domain = analyze("a@(note)example.com", &ValidationConfig::strict()).expect("valid");
        assert_eq!(domain, "example.com");

        let parser = ParserConfig::builder().include_comments(true).build();
        let domain = analyze_domain(
            &domain_tokens("a@(Note)example.com"),
            &ValidationConfig::strict(),
            &parser,
        )
        .expect("valid");
        assert_eq!(domain, "(note)example.com");
    }

    #[test]
    fn consecutive_dots_are_rejected_even_across_comments() {
        assert_eq!(
            analyze("a@b..com", &ValidationConfig::generic()),
            Err(InvalidReason::ConsecutiveDots)
        );
        assert_eq!(
            analyze("a@b.(gap).com", &ValidationConfig::strict()),
            Err(InvalidReason::ConsecutiveDots)
        );
    }

    #[test]
    fn edge_dots_and_hyphens_are_rejected() {
        assert_eq!(
            analyze("a@.example.com", &ValidationConfig::generic()),
            Err(InvalidReason::EdgeDot)
        );
        assert_eq!(
            analyze("a@example.com.", &ValidationConfig::generic()),
            Err(InvalidReason::EdgeDot)
        );
        assert_eq!(
            analyze("a@-example.com", &ValidationConfig::generic()),
            Err(InvalidReason::DomainEdgeHyphen)
        );
        assert_eq!(
            analyze("a@example-.com", &ValidationConfig::generic()),
            Err(InvalidReason::DomainEdgeHyphen)
        );
    }

    #[test]
    fn quoted_text_in_the_domain_is_always_fatal() {
        assert_eq!(
            analyze("a@\"quoted\".com", &ValidationConfig::strict()),
            Err(InvalidReason::DomainQuotes)
        );
    }

    #[test]
    fn labels_need_a_letter_and_a_clean_shape() {
        assert_eq!(
            analyze("a@123.com", &ValidationConfig::generic()),
            Err(InvalidReason::InvalidCharacters)
        );
        assert_eq!(
            analyze("a@under_score.com", &ValidationConfig::generic()),
            Err(InvalidReason::InvalidCharacters)
        );
        assert_eq!(
            analyze("a@s.example", &ValidationConfig::generic()).as_deref(),
            Ok("s.example")
        );
    }

    #[test]
    fn ip_literals_gate_on_the_config() {
        assert_eq!(
            analyze("a@[123.123.123.123]", &ValidationConfig::generic()),
            Err(InvalidReason::V4IpDomain)
        );
        assert_eq!(
            analyze("a@[123.123.123.123]", &ValidationConfig::strict()).as_deref(),
            Ok("[123.123.123.123]")
        );
        assert_eq!(
            analyze(
                "a@[IPv6:2001:0db8:85a3:0000:0000:8a2e:0370:7334]",
                &ValidationConfig::generic()
            ),
            Err(InvalidReason::V6IpDomain)
        );
        assert!(
            analyze(
                "a@[IPv6:2001:0db8:85a3:0000:0000:8a2e:0370:7334]",
                &ValidationConfig::strict()
            )
            .is_ok()
        );
    }

    #[test]
    fn dotless_domains_gate_on_the_config() {
        assert_eq!(
            analyze("a@mailserver1", &ValidationConfig::generic()),
            Err(InvalidReason::NoTopLevelDomain)
        );
        assert_eq!(
            analyze("a@mailserver1", &ValidationConfig::strict()).as_deref(),
            Ok("mailserver1")
        );
    }

    #[test]
    fn empty_domain_is_reported_not_a_panic() {
        assert_eq!(
            analyze("a@", &ValidationConfig::strict()),
            Err(InvalidReason::NoTopLevelDomain)
        );
    }
}
