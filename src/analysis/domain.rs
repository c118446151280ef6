use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::parser::{ListOrder, ParsedAddress};

/// Statistics for every valid address that mapped to one domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAnalysis {
    domain: String,
    local_parts: Vec<String>,
    distinct_local_parts: BTreeSet<String>,
    sub_addresses: Vec<String>,
    distinct_sub_addresses: BTreeSet<String>,
}

impl DomainAnalysis {
    /// Starts an analysis keyed on the domain of `parsed`; `None` when the
    /// parse is invalid.
    pub fn new(parsed: &ParsedAddress) -> Option<Self> {
        let mut analysis = Self {
            domain: parsed.domain()?.to_string(),
            local_parts: Vec::new(),
            distinct_local_parts: BTreeSet::new(),
            sub_addresses: Vec::new(),
            distinct_sub_addresses: BTreeSet::new(),
        };
        analysis.fold(parsed);
        Some(analysis)
    }

    /// Folds one parse result in. A no-op unless `parsed` is valid and its
    /// domain matches this key.
    pub fn fold(&mut self, parsed: &ParsedAddress) {
        if parsed.domain() != Some(self.domain.as_str()) {
            return;
        }
        let Some(local_part) = parsed.canonical_local_part() else {
            return;
        };
        self.local_parts.push(local_part.to_string());
        self.distinct_local_parts.insert(local_part.to_string());
        if parsed.has_sub_address() {
            if let Some(sub_address) = parsed.sub_address() {
                self.sub_addresses.push(sub_address.to_string());
                self.distinct_sub_addresses.insert(sub_address.to_string());
            }
        }
    }

    /// Combines a partial aggregation built for the same domain. A no-op for
    /// a mismatched key.
    pub fn merge(&mut self, other: DomainAnalysis) {
        if other.domain != self.domain {
            return;
        }
        self.local_parts.extend(other.local_parts);
        self.distinct_local_parts.extend(other.distinct_local_parts);
        self.sub_addresses.extend(other.sub_addresses);
        self.distinct_sub_addresses.extend(other.distinct_sub_addresses);
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Every local part seen for this domain, duplicates preserved, in fold
    /// order.
    pub fn local_parts(&self) -> &[String] {
        &self.local_parts
    }

    /// Total addresses folded in, duplicates counted.
    pub fn total_address_count(&self) -> usize {
        self.local_parts.len()
    }

    /// Distinct canonical local parts; what counts as distinct follows the
    /// parser config (case, comments, sub-addresses).
    pub fn unique_address_count(&self) -> usize {
        self.distinct_local_parts.len()
    }

    pub fn total_sub_address_count(&self) -> usize {
        self.sub_addresses.len()
    }

    pub fn unique_sub_address_count(&self) -> usize {
        self.distinct_sub_addresses.len()
    }

    pub(crate) fn compare(&self, other: &Self, order: ListOrder) -> Ordering {
        if order == ListOrder::Occurrences {
            match other.total_address_count().cmp(&self.total_address_count()) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.domain.cmp(&other.domain)
    }
}
