//! Single-pass tokenizer for one raw address.
//!
//! The scan runs left to right with two pieces of state: which side of the
//! first unguarded `@` we are on, and which delimiter (quote or comment) is
//! currently open. Output is two streams of tagged tokens, one per side,
//! plus the flags and failures only the scan can observe.

use std::collections::BTreeSet;

use super::reason::InvalidReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Plain,
    Dot,
    Quote,
    Comment,
    SubDelim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    /// Content between the delimiters of a quote or comment token.
    pub fn inner(&self) -> &str {
        &self.text[1..self.text.len() - 1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Local,
    Domain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    None,
    Quote,
    Comment,
}

/// Everything one pass over the characters produces.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    pub local: Vec<Token>,
    pub domain: Vec<Token>,
    pub at_count: usize,
    pub has_dots: bool,
    pub has_quotes: bool,
    pub has_comments: bool,
    /// Failure the scan itself detected (stray or unmatched delimiter).
    pub error: Option<InvalidReason>,
}

impl Scan {
    fn push(&mut self, side: Side, token: Token) {
        match side {
            Side::Local => self.local.push(token),
            Side::Domain => self.domain.push(token),
        }
    }

    fn flush(&mut self, buf: &mut String, side: Side) {
        if buf.is_empty() {
            return;
        }
        let text = std::mem::take(buf);
        // Tokens are classified by their leading character: a quote opened
        // mid-token does not start a new one.
        let kind = match text.as_bytes()[0] {
            b'(' => TokenKind::Comment,
            b'"' => TokenKind::Quote,
            _ => TokenKind::Plain,
        };
        self.push(side, Token { kind, text });
    }
}

pub(crate) fn scan(raw: &str, sub_delimiters: &BTreeSet<char>) -> Scan {
    let mut out = Scan::default();
    let mut side = Side::Local;
    let mut open = Open::None;
    let mut sub_found = false;
    let mut buf = String::new();

    for ch in raw.chars() {
        match ch {
            '@' if open == Open::None => {
                out.flush(&mut buf, side);
                side = Side::Domain;
                out.at_count += 1;
            }
            '.' if open == Open::None => {
                out.has_dots |= side == Side::Local;
                out.flush(&mut buf, side);
                out.push(
                    side,
                    Token {
                        kind: TokenKind::Dot,
                        text: ".".to_string(),
                    },
                );
            }
            ')' => {
                buf.push(ch);
                match open {
                    Open::None => {
                        out.error = Some(InvalidReason::UnclosedParenthesis);
                        return out;
                    }
                    Open::Comment => {
                        out.flush(&mut buf, side);
                        open = Open::None;
                    }
                    Open::Quote => {}
                }
            }
            '"' => match open {
                Open::Quote => {
                    let escaped = buf.ends_with('\\');
                    buf.push(ch);
                    if !escaped {
                        out.flush(&mut buf, side);
                        open = Open::None;
                    }
                }
                Open::Comment => buf.push(ch),
                Open::None => {
                    buf.push(ch);
                    out.has_quotes = true;
                    open = Open::Quote;
                }
            },
            '(' => {
                if open == Open::None {
                    out.flush(&mut buf, side);
                    out.has_comments = true;
                    open = Open::Comment;
                }
                buf.push(ch);
            }
            _ => {
                // The first delimiter hit on the local side splits off the
                // sub-address; everything after it stays sub-address text.
                if open == Open::None
                    && side == Side::Local
                    && !sub_found
                    && sub_delimiters.contains(&ch)
                {
                    sub_found = true;
                    out.flush(&mut buf, side);
                    out.push(
                        side,
                        Token {
                            kind: TokenKind::SubDelim,
                            text: ch.to_string(),
                        },
                    );
                } else {
                    buf.push(ch);
                }
            }
        }
    }
    out.flush(&mut buf, side);

    if out.error.is_none() {
        out.error = match open {
            Open::Comment => Some(InvalidReason::UnclosedParenthesis),
            Open::Quote => Some(InvalidReason::UnclosedQuote),
            Open::None => None,
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delimiters() -> BTreeSet<char> {
        ['+'].into_iter().collect()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_sides_at_the_first_free_at() {
        let scan = scan("a.b+c@d.com", &delimiters());
        assert_eq!(scan.at_count, 1);
        assert_eq!(texts(&scan.local), vec!["a", ".", "b", "+", "c"]);
        assert_eq!(
            kinds(&scan.local),
            vec![
                TokenKind::Plain,
                TokenKind::Dot,
                TokenKind::Plain,
                TokenKind::SubDelim,
                TokenKind::Plain,
            ]
        );
        assert_eq!(texts(&scan.domain), vec!["d", ".", "com"]);
        assert!(scan.has_dots);
        assert!(scan.error.is_none());
    }

    #[test]
    fn only_the_first_delimiter_splits_a_sub_address() {
        let scan = scan("user+tag+sorting@example.com", &delimiters());
        assert_eq!(texts(&scan.local), vec!["user", "+", "tag+sorting"]);
    }

    #[test]
    fn at_and_dot_inside_quotes_are_content() {
        let scan = scan("\"a@b.c\"@x.com", &delimiters());
        assert_eq!(scan.at_count, 1);
        assert_eq!(texts(&scan.local), vec!["\"a@b.c\""]);
        assert_eq!(kinds(&scan.local), vec![TokenKind::Quote]);
        assert!(!scan.has_dots);
    }

    #[test]
    fn escaped_quote_stays_inside_the_token() {
        let scan = scan("\"a\\\"b\"@x.com", &delimiters());
        assert_eq!(texts(&scan.local), vec!["\"a\\\"b\""]);
        assert!(scan.error.is_none());
    }

    #[test]
    fn quote_opened_mid_token_keeps_the_leading_text() {
        let scan = scan("just\"not\"right@x.com", &delimiters());
        assert_eq!(texts(&scan.local), vec!["just\"not\"", "right"]);
        assert_eq!(scan.local[0].kind, TokenKind::Plain);
    }

    #[test]
    fn quote_inside_a_comment_is_ordinary_content() {
        let scan = scan("(say \"hi\")a@x.com", &delimiters());
        assert_eq!(texts(&scan.local), vec!["(say \"hi\")", "a"]);
        assert_eq!(scan.local[0].kind, TokenKind::Comment);
        assert!(scan.error.is_none());
    }

    #[test]
    fn stray_close_parenthesis_aborts() {
        let scan = scan("a)b@x.com", &delimiters());
        assert_eq!(scan.error, Some(InvalidReason::UnclosedParenthesis));
    }

    #[test]
    fn unterminated_delimiters_fail_at_end_of_scan() {
        let scan_paren = scan("(oops@x.com", &delimiters());
        assert_eq!(scan_paren.error, Some(InvalidReason::UnclosedParenthesis));

        let scan_quote = scan("\"oops@x.com", &delimiters());
        assert_eq!(scan_quote.error, Some(InvalidReason::UnclosedQuote));
    }

    #[test]
    fn comment_flag_is_kept_even_when_the_scan_fails() {
        let scan = scan("(a)(b@x.com", &delimiters());
        assert!(scan.has_comments);
        assert_eq!(scan.error, Some(InvalidReason::UnclosedParenthesis));
    }
}
