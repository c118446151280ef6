use super::config::{ParserConfig, ValidationConfig};
use super::reason::InvalidReason;
use super::scanner::{Token, TokenKind};

const MAX_LOCAL_PART_LEN: usize = 64;

/// Local-part strings assembled from one token walk.
#[derive(Debug, Default)]
pub(crate) struct LocalParts {
    /// Shaped by the parser config: comments/sub-address dropped unless kept,
    /// lower-cased unless case-sensitive.
    pub canonical: String,
    /// Original case, sub-address kept, comments stripped.
    pub full: String,
    /// Nothing stripped; only present when the address contains comments.
    pub full_with_comments: Option<String>,
    /// Delimiter included; empty when the address has no sub-address.
    pub sub_address: String,
}

pub(crate) fn analyze_local(
    tokens: &[Token],
    has_comments: bool,
    validation: &ValidationConfig,
    parser: &ParserConfig,
) -> Result<LocalParts, InvalidReason> {
    if !validation.allow_dots && tokens.iter().any(|t| t.kind == TokenKind::Dot) {
        return Err(InvalidReason::HasDots);
    }

    let mut with_comments = has_comments.then(String::new);
    let mut full = String::new();
    let mut canonical = String::new();
    let mut sub_address = String::new();
    let mut in_sub_address = false;

    for token in tokens {
        if let Some(buf) = with_comments.as_mut() {
            buf.push_str(&token.text);
        }
        let is_comment = token.kind == TokenKind::Comment;
        in_sub_address |= token.kind == TokenKind::SubDelim;

        match token.kind {
            TokenKind::Comment | TokenKind::Quote => {
                if !validation.special_matcher().is_match(token.inner()) {
                    return Err(InvalidReason::InvalidCharacters);
                }
            }
            TokenKind::Dot => {}
            TokenKind::Plain | TokenKind::SubDelim => {
                if !validation.printable_matcher().is_match(&token.text) {
                    return Err(InvalidReason::InvalidCharacters);
                }
            }
        }

        if !is_comment {
            full.push_str(&token.text);
        }
        if in_sub_address {
            sub_address.push_str(&token.text);
        }
        if (!is_comment || parser.include_comments)
            && (!in_sub_address || parser.include_sub_addresses)
        {
            canonical.push_str(&token.text);
        }
    }

    if parser.lower_case {
        canonical.make_ascii_lowercase();
        sub_address.make_ascii_lowercase();
    }

    if !validation.allow_sub_addresses && !sub_address.is_empty() {
        return Err(InvalidReason::HasSubAddress);
    }
    if with_comments.as_ref().is_some_and(|s| s.len() > MAX_LOCAL_PART_LEN)
        || full.len() > MAX_LOCAL_PART_LEN
    {
        return Err(InvalidReason::LocalPartTooLong);
    }

    Ok(LocalParts {
        canonical,
        full,
        full_with_comments: with_comments,
        sub_address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scanner::scan;

    fn local_tokens(raw: &str) -> (Vec<Token>, bool) {
        let delimiters = ['+'].into_iter().collect();
        let scanned = scan(raw, &delimiters);
        assert!(scanned.error.is_none(), "scan failed for {raw}");
        (scanned.local, scanned.has_comments)
    }

    #[test]
    fn canonical_drops_comments_and_keeps_sub_address() {
        let (tokens, has_comments) = local_tokens("(note)user+tag@x.com");
        let parts = analyze_local(
            &tokens,
            has_comments,
            &ValidationConfig::strict(),
            &ParserConfig::standard(),
        )
        .expect("valid local part");
        assert_eq!(parts.canonical, "user+tag");
        assert_eq!(parts.full, "user+tag");
        assert_eq!(parts.full_with_comments.as_deref(), Some("(note)user+tag"));
        assert_eq!(parts.sub_address, "+tag");
    }

    #[test]
    fn sub_address_can_be_stripped_and_case_folded() {
        let (tokens, has_comments) = local_tokens("User+Tag@x.com");
        let parser = ParserConfig::builder()
            .include_sub_addresses(false)
            .case_sensitive(false)
            .build();
        let parts =
            analyze_local(&tokens, has_comments, &ValidationConfig::strict(), &parser)
                .expect("valid local part");
        assert_eq!(parts.canonical, "user");
        assert_eq!(parts.full, "User+Tag");
        assert_eq!(parts.sub_address, "+tag");
    }

    #[test]
    fn everything_after_the_delimiter_belongs_to_the_sub_address() {
        let (tokens, has_comments) = local_tokens("a+b.c(d)@x.com");
        let parts = analyze_local(
            &tokens,
            has_comments,
            &ValidationConfig::strict(),
            &ParserConfig::standard(),
        )
        .expect("valid local part");
        assert_eq!(parts.sub_address, "+b.c(d)");
        assert_eq!(parts.full, "a+b.c");
    }

    #[test]
    fn disallowed_printable_character_is_rejected() {
        let (tokens, has_comments) = local_tokens("mailhost!user@x.com");
        let err = analyze_local(
            &tokens,
            has_comments,
            &ValidationConfig::generic(),
            &ParserConfig::standard(),
        )
        .unwrap_err();
        assert_eq!(err, InvalidReason::InvalidCharacters);
    }

    #[test]
    fn sub_address_policy_beats_the_length_check() {
        let over_limit = format!("{}+x@x.com", "1".repeat(64));
        let (tokens, has_comments) = local_tokens(&over_limit);
        let validation = ValidationConfig::builder()
            .generic()
            .allow_sub_addresses(false)
            .build();
        let err = analyze_local(&tokens, has_comments, &validation, &ParserConfig::standard())
            .unwrap_err();
        assert_eq!(err, InvalidReason::HasSubAddress);
    }

    #[test]
    fn local_part_over_64_characters_is_rejected() {
        let over_limit = format!("{}+x@x.com", "1".repeat(64));
        let (tokens, has_comments) = local_tokens(&over_limit);
        let err = analyze_local(
            &tokens,
            has_comments,
            &ValidationConfig::generic(),
            &ParserConfig::standard(),
        )
        .unwrap_err();
        assert_eq!(err, InvalidReason::LocalPartTooLong);
    }
}
