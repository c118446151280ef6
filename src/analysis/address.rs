use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::parser::{ListOrder, ParsedAddress};

/// Statistics for every raw input that mapped to one canonical address.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAnalysis {
    canonical_address: String,
    local_part: String,
    domain: String,
    raw_addresses: Vec<String>,
    distinct_raw_addresses: BTreeSet<String>,
    distinct_sub_addresses: BTreeSet<String>,
}

impl AddressAnalysis {
    /// Starts an analysis keyed on the canonical form of `parsed`; `None`
    /// when the parse is invalid.
    pub fn new(parsed: &ParsedAddress) -> Option<Self> {
        let mut analysis = Self {
            canonical_address: parsed.canonical_address()?,
            local_part: parsed.canonical_local_part()?.to_string(),
            domain: parsed.domain()?.to_string(),
            raw_addresses: Vec::new(),
            distinct_raw_addresses: BTreeSet::new(),
            distinct_sub_addresses: BTreeSet::new(),
        };
        analysis.fold(parsed);
        Some(analysis)
    }

    /// Folds one parse result in. A no-op unless `parsed` is valid and its
    /// canonical local part matches this key.
    pub fn fold(&mut self, parsed: &ParsedAddress) {
        if parsed.canonical_local_part() != Some(self.local_part.as_str()) {
            return;
        }
        self.raw_addresses.push(parsed.raw().to_string());
        self.distinct_raw_addresses.insert(parsed.raw().to_string());
        if let Some(sub_address) = parsed.sub_address() {
            // The empty string marks inputs without a sub-address and counts
            // as one distinct observation.
            self.distinct_sub_addresses.insert(sub_address.to_string());
        }
    }

    /// Combines a partial aggregation built for the same key. A no-op for a
    /// mismatched key.
    pub fn merge(&mut self, other: AddressAnalysis) {
        if other.canonical_address != self.canonical_address {
            return;
        }
        self.raw_addresses.extend(other.raw_addresses);
        self.distinct_raw_addresses.extend(other.distinct_raw_addresses);
        self.distinct_sub_addresses.extend(other.distinct_sub_addresses);
    }

    pub fn canonical_address(&self) -> &str {
        &self.canonical_address
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Every raw string folded in, duplicates preserved, in fold order.
    pub fn raw_addresses(&self) -> &[String] {
        &self.raw_addresses
    }

    /// Total raw inputs folded in, duplicates counted.
    pub fn total_count(&self) -> usize {
        self.raw_addresses.len()
    }

    /// Distinct raw spellings observed for this canonical address.
    pub fn unique_variation_count(&self) -> usize {
        self.distinct_raw_addresses.len()
    }

    pub fn unique_sub_address_count(&self) -> usize {
        self.distinct_sub_addresses.len()
    }

    pub(crate) fn compare(&self, other: &Self, order: ListOrder) -> Ordering {
        if order == ListOrder::Occurrences {
            match other.total_count().cmp(&self.total_count()) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        if order == ListOrder::DomainAlphabetical {
            match self.domain.cmp(&other.domain) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.canonical_address.cmp(&other.canonical_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParserConfig, ValidationConfig, parse, parse_with};

    #[test]
    fn fold_accumulates_matching_results() {
        let first = parse("user+a@example.com");
        let mut analysis = AddressAnalysis::new(&first).expect("valid");
        analysis.fold(&parse("user+b@example.com"));
        analysis.fold(&parse("user+a@example.com"));

        assert_eq!(analysis.canonical_address(), "user+a@example.com");
        // Only the exact same canonical local part folds in.
        assert_eq!(analysis.total_count(), 2);
        assert_eq!(analysis.unique_variation_count(), 1);
    }

    #[test]
    fn fold_ignores_invalid_and_mismatched_results() {
        let mut analysis = AddressAnalysis::new(&parse("user@example.com")).expect("valid");
        analysis.fold(&parse("someone-else@example.com"));
        analysis.fold(&parse("not an address"));
        assert_eq!(analysis.total_count(), 1);
    }

    #[test]
    fn new_returns_none_for_invalid_input() {
        assert!(AddressAnalysis::new(&parse("nope")).is_none());
    }

    #[test]
    fn sub_address_counting_includes_the_bare_form() {
        // Sub-addresses only group under one key when the canonical form
        // drops them.
        let validation = ValidationConfig::generic();
        let parser = ParserConfig::builder().include_sub_addresses(false).build();
        let mut analysis =
            AddressAnalysis::new(&parse_with("user@example.com", &validation, &parser))
                .expect("valid");
        analysis.fold(&parse_with("user+a@example.com", &validation, &parser));
        analysis.fold(&parse_with("user+b@example.com", &validation, &parser));
        analysis.fold(&parse_with("user+b@example.com", &validation, &parser));

        assert_eq!(analysis.total_count(), 4);
        // "", "+a" and "+b".
        assert_eq!(analysis.unique_sub_address_count(), 3);
    }

    #[test]
    fn merge_is_order_independent() {
        let plain = parse("user@example.com");
        let upper = parse("user@EXAMPLE.com");

        let mut left = AddressAnalysis::new(&plain).expect("valid");
        left.fold(&plain);
        let mut right = AddressAnalysis::new(&upper).expect("valid");
        right.fold(&upper);

        let mut left_first = left.clone();
        left_first.merge(right.clone());
        let mut right_first = right;
        right_first.merge(left);

        assert_eq!(left_first.total_count(), 4);
        assert_eq!(left_first.total_count(), right_first.total_count());
        assert_eq!(
            left_first.unique_variation_count(),
            right_first.unique_variation_count()
        );
    }
}
