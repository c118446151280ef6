use std::collections::BTreeSet;

use regex::Regex;

/// Symbols that may appear unquoted in a local part, when enabled.
pub const PRINTABLE_SUPERSET: [char; 19] = [
    '!', '#', '$', '%', '&', '\'', '*', '+', '-', '/', '=', '?', '^', '_', '`', '{', '}', '|', '~',
];

/// Symbols that may only ever appear inside quotes or comments, when enabled.
pub const SPECIAL_SUPERSET: [char; 13] = [
    ' ', '"', '(', ')', ',', ':', ';', '<', '>', '@', '[', '\\', ']',
];

/// Ordering applied to list-level results.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    /// Ascending canonical address (ascending domain for domain analyses).
    #[default]
    Alphabetical,
    /// Ascending domain, then ascending canonical address.
    DomainAlphabetical,
    /// Descending occurrence count, then the alphabetical tie-break.
    Occurrences,
}

/// Which grammar extensions an address may use.
///
/// Built once through [`ValidationConfig::builder`] (or the
/// [`generic`](ValidationConfig::generic) / [`strict`](ValidationConfig::strict)
/// presets) and immutable afterwards: the two character-class matchers are
/// compiled from the symbol sets during `build()`, so they can never drift
/// out of sync with the rules.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub allow_single_name_domains: bool,
    pub allow_v4_ip_domains: bool,
    pub allow_v6_ip_domains: bool,
    pub allow_quotes: bool,
    pub allow_comments: bool,
    pub allow_dots: bool,
    pub allow_sub_addresses: bool,
    printable: BTreeSet<char>,
    special: BTreeSet<char>,
    printable_matcher: Regex,
    special_matcher: Regex,
}

impl ValidationConfig {
    /// Conservative rules: addresses that "look right". Quotes, comments,
    /// dotless domains and IP-literal domains are rejected; dots, pluses and
    /// hyphens are allowed.
    pub fn generic() -> Self {
        Self::builder().generic().build()
    }

    /// Full RFC5322 permissiveness: everything the grammar knows about is
    /// allowed, including IP-literal domains and quoted special characters.
    pub fn strict() -> Self {
        Self::builder().strict().build()
    }

    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// Whole-token matcher for plain local-part tokens.
    pub(crate) fn printable_matcher(&self) -> &Regex {
        &self.printable_matcher
    }

    /// Whole-token matcher for the inside of quotes and comments.
    pub(crate) fn special_matcher(&self) -> &Regex {
        &self.special_matcher
    }

    /// Enabled printable characters.
    pub fn printable_characters(&self) -> impl Iterator<Item = char> + '_ {
        self.printable.iter().copied()
    }

    /// Enabled special characters.
    pub fn special_characters(&self) -> impl Iterator<Item = char> + '_ {
        self.special.iter().copied()
    }
}

/// Builder for [`ValidationConfig`]. Starts with every rule disabled and
/// empty symbol sets; chain [`generic`](ValidationConfigBuilder::generic) or
/// [`strict`](ValidationConfigBuilder::strict) first to start from a preset.
#[derive(Debug, Clone, Default)]
pub struct ValidationConfigBuilder {
    allow_single_name_domains: bool,
    allow_v4_ip_domains: bool,
    allow_v6_ip_domains: bool,
    allow_quotes: bool,
    allow_comments: bool,
    allow_dots: bool,
    allow_sub_addresses: bool,
    printable: BTreeSet<char>,
    special: BTreeSet<char>,
}

impl ValidationConfigBuilder {
    pub fn generic(mut self) -> Self {
        self.allow_single_name_domains = false;
        self.allow_v4_ip_domains = false;
        self.allow_v6_ip_domains = false;
        self.allow_quotes = false;
        self.allow_comments = false;
        self.allow_dots = true;
        self.allow_sub_addresses = true;
        self.printable = ['+', '-'].into_iter().collect();
        self.special = SPECIAL_SUPERSET.into_iter().collect();
        self
    }

    pub fn strict(mut self) -> Self {
        self.allow_single_name_domains = true;
        self.allow_v4_ip_domains = true;
        self.allow_v6_ip_domains = true;
        self.allow_quotes = true;
        self.allow_comments = true;
        self.allow_dots = true;
        self.allow_sub_addresses = true;
        self.printable = PRINTABLE_SUPERSET.into_iter().collect();
        self.special = SPECIAL_SUPERSET.into_iter().collect();
        self
    }

    pub fn allow_single_name_domains(mut self, allow: bool) -> Self {
        self.allow_single_name_domains = allow;
        self
    }

    pub fn allow_v4_ip_domains(mut self, allow: bool) -> Self {
        self.allow_v4_ip_domains = allow;
        self
    }

    pub fn allow_v6_ip_domains(mut self, allow: bool) -> Self {
        self.allow_v6_ip_domains = allow;
        self
    }

    pub fn allow_quotes(mut self, allow: bool) -> Self {
        self.allow_quotes = allow;
        self
    }

    pub fn allow_comments(mut self, allow: bool) -> Self {
        self.allow_comments = allow;
        self
    }

    pub fn allow_dots(mut self, allow: bool) -> Self {
        self.allow_dots = allow;
        self
    }

    pub fn allow_sub_addresses(mut self, allow: bool) -> Self {
        self.allow_sub_addresses = allow;
        self
    }

    pub fn allow_hyphens(mut self, allow: bool) -> Self {
        if allow {
            self.printable.insert('-');
        } else {
            self.printable.remove(&'-');
        }
        self
    }

    pub fn allow_pluses(mut self, allow: bool) -> Self {
        if allow {
            self.printable.insert('+');
        } else {
            self.printable.remove(&'+');
        }
        self
    }

    /// Enables printable characters in plain local-part tokens. Characters
    /// outside [`PRINTABLE_SUPERSET`] are ignored.
    pub fn allow_printable_characters(mut self, characters: &[char]) -> Self {
        for &ch in characters {
            if PRINTABLE_SUPERSET.contains(&ch) {
                self.printable.insert(ch);
            }
        }
        self
    }

    pub fn disallow_printable_characters(mut self, characters: &[char]) -> Self {
        for ch in characters {
            self.printable.remove(ch);
        }
        self
    }

    /// Enables special characters inside quotes and comments. Characters
    /// outside [`SPECIAL_SUPERSET`] are ignored. Special characters are only
    /// reachable through quotes/comments, so they are de facto inert while
    /// those are disallowed.
    pub fn allow_special_characters(mut self, characters: &[char]) -> Self {
        for &ch in characters {
            if SPECIAL_SUPERSET.contains(&ch) {
                self.special.insert(ch);
            }
        }
        self
    }

    pub fn disallow_special_characters(mut self, characters: &[char]) -> Self {
        for ch in characters {
            self.special.remove(ch);
        }
        self
    }

    pub fn build(self) -> ValidationConfig {
        let printable_matcher = compile_printable_matcher(&self.printable);
        let special_matcher = compile_special_matcher(&self.special);
        ValidationConfig {
            allow_single_name_domains: self.allow_single_name_domains,
            allow_v4_ip_domains: self.allow_v4_ip_domains,
            allow_v6_ip_domains: self.allow_v6_ip_domains,
            allow_quotes: self.allow_quotes,
            allow_comments: self.allow_comments,
            allow_dots: self.allow_dots,
            allow_sub_addresses: self.allow_sub_addresses,
            printable: self.printable,
            special: self.special,
            printable_matcher,
            special_matcher,
        }
    }
}

fn class_fragment(characters: impl IntoIterator<Item = char>) -> String {
    let mut fragment = String::new();
    for ch in characters {
        fragment.push_str(&regex::escape(&ch.to_string()));
    }
    fragment
}

fn compile_printable_matcher(enabled: &BTreeSet<char>) -> Regex {
    let pattern = format!("^[a-zA-Z\\d{}]+$", class_fragment(enabled.iter().copied()));
    Regex::new(&pattern).expect("escaped character class")
}

// Quoted/comment text always accepts the whole printable superset, even for
// printable characters disabled in plain context. Inherited rule; do not
// narrow it to the enabled set.
fn compile_special_matcher(enabled: &BTreeSet<char>) -> Regex {
    let mut class = class_fragment(PRINTABLE_SUPERSET);
    class.push_str(&class_fragment(enabled.iter().copied()));
    if enabled.contains(&' ') {
        class.push_str("\\s");
    }
    let pattern = format!("^[a-zA-Z\\d{class}]*$");
    Regex::new(&pattern).expect("escaped character class")
}

/// Output-shaping rules: what the canonical form keeps, how lists are
/// ordered, and which characters introduce a sub-address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Lower-case the canonical local part. Domains are always lower-cased.
    pub lower_case: bool,
    /// Keep comment text in the canonical output.
    pub include_comments: bool,
    /// Keep the sub-address in the canonical output.
    pub include_sub_addresses: bool,
    pub order: ListOrder,
    /// Cap on ranked results; only applied under [`ListOrder::Occurrences`].
    pub max_results: Option<usize>,
    pub sub_address_delimiters: BTreeSet<char>,
}

impl ParserConfig {
    /// Sub-addresses kept, comments stripped, case preserved, alphabetical
    /// list order.
    pub fn standard() -> Self {
        Self {
            lower_case: false,
            include_comments: false,
            include_sub_addresses: true,
            order: ListOrder::Alphabetical,
            max_results: None,
            sub_address_delimiters: ['+'].into_iter().collect(),
        }
    }

    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder {
            config: Self::standard(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for [`ParserConfig`], starting from [`ParserConfig::standard`].
#[derive(Debug, Clone)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// Disabling case sensitivity lower-cases canonical local parts. Domains
    /// are case-insensitive regardless.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.lower_case = !case_sensitive;
        self
    }

    pub fn include_comments(mut self, include: bool) -> Self {
        self.config.include_comments = include;
        self
    }

    pub fn include_sub_addresses(mut self, include: bool) -> Self {
        self.config.include_sub_addresses = include;
        self
    }

    /// Replaces the default `+` sub-address delimiter set; providers differ
    /// on which character introduces the tag.
    pub fn sub_address_delimiters(mut self, delimiters: &[char]) -> Self {
        self.config.sub_address_delimiters = delimiters.iter().copied().collect();
        self
    }

    pub fn list_order(mut self, order: ListOrder) -> Self {
        self.config.order = order;
        self
    }

    /// Only applies when ranking by occurrences; all results are returned
    /// otherwise.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = Some(max_results);
        self
    }

    pub fn build(self) -> ParserConfig {
        self.config
    }
}
