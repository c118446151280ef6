//! List-level operations built on the single-address parser.
//!
//! Every operation parses each input under one shared config pair, drops the
//! invalid entries, and orders the survivors. Nothing here fails: an
//! unparseable address is silently excluded and an empty input collection
//! yields an empty result.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::analysis::{AddressAnalysis, DomainAnalysis};
use crate::parser::{ListOrder, ParserConfig, ValidationConfig, parse_with};

/// Runs the parser over collections of raw addresses and shapes the results
/// according to its config pair.
#[derive(Debug, Clone)]
pub struct ListAggregator {
    validation: ValidationConfig,
    parser: ParserConfig,
}

impl Default for ListAggregator {
    fn default() -> Self {
        Self::new(ValidationConfig::generic(), ParserConfig::standard())
    }
}

impl ListAggregator {
    pub fn new(validation: ValidationConfig, parser: ParserConfig) -> Self {
        Self { validation, parser }
    }

    /// Canonical forms of the valid addresses, duplicates preserved, sorted
    /// by the configured order.
    pub fn validate<I>(&self, addresses: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut rows: Vec<(String, String)> = addresses
            .into_iter()
            .filter_map(|address| {
                let parsed = parse_with(address.as_ref(), &self.validation, &self.parser);
                let domain = parsed.domain()?.to_string();
                let canonical = parsed.canonical_address()?;
                Some((domain, canonical))
            })
            .collect();
        // Each entry counts once here, so occurrence ordering reduces to its
        // alphabetical tie-break.
        rows.sort_by(|a, b| match self.parser.order {
            ListOrder::DomainAlphabetical => a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)),
            ListOrder::Alphabetical | ListOrder::Occurrences => a.1.cmp(&b.1),
        });
        rows.into_iter().map(|(_, canonical)| canonical).collect()
    }

    /// One canonical address per key, sorted by the configured order.
    pub fn deduplicate<I>(&self, addresses: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut rows: Vec<AddressAnalysis> =
            self.group_by_canonical_address(addresses).into_values().collect();
        rows.sort_by(|a, b| a.compare(b, self.parser.order));
        rows.into_iter()
            .map(|analysis| analysis.canonical_address().to_string())
            .collect()
    }

    /// Per-domain statistics, sorted by the configured order and capped by
    /// `max_results` when ranking by occurrences.
    pub fn analyze_domains<I>(&self, addresses: I) -> Vec<DomainAnalysis>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut grouped: HashMap<String, DomainAnalysis> = HashMap::new();
        for address in addresses {
            let parsed = parse_with(address.as_ref(), &self.validation, &self.parser);
            let Some(domain) = parsed.domain() else {
                continue;
            };
            match grouped.entry(domain.to_string()) {
                Entry::Occupied(mut entry) => entry.get_mut().fold(&parsed),
                Entry::Vacant(entry) => {
                    if let Some(analysis) = DomainAnalysis::new(&parsed) {
                        entry.insert(analysis);
                    }
                }
            }
        }
        #[cfg(feature = "with-tracing")]
        tracing::debug!(domains = grouped.len(), "grouped addresses by domain");

        let mut rows: Vec<DomainAnalysis> = grouped.into_values().collect();
        rows.sort_by(|a, b| a.compare(b, self.parser.order));
        self.truncate_ranked(rows)
    }

    /// Per-canonical-address statistics, sorted by the configured order and
    /// capped by `max_results` when ranking by occurrences.
    pub fn analyze_addresses<I>(&self, addresses: I) -> Vec<AddressAnalysis>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut rows: Vec<AddressAnalysis> =
            self.group_by_canonical_address(addresses).into_values().collect();
        rows.sort_by(|a, b| a.compare(b, self.parser.order));
        self.truncate_ranked(rows)
    }

    fn group_by_canonical_address<I>(&self, addresses: I) -> HashMap<String, AddressAnalysis>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut grouped: HashMap<String, AddressAnalysis> = HashMap::new();
        for address in addresses {
            let parsed = parse_with(address.as_ref(), &self.validation, &self.parser);
            let Some(canonical) = parsed.canonical_address() else {
                continue;
            };
            match grouped.entry(canonical) {
                Entry::Occupied(mut entry) => entry.get_mut().fold(&parsed),
                Entry::Vacant(entry) => {
                    if let Some(analysis) = AddressAnalysis::new(&parsed) {
                        entry.insert(analysis);
                    }
                }
            }
        }
        #[cfg(feature = "with-tracing")]
        tracing::debug!(keys = grouped.len(), "grouped addresses by canonical form");
        grouped
    }

    /// The cap only makes sense for a ranking; any other order returns
    /// everything.
    fn truncate_ranked<T>(&self, mut rows: Vec<T>) -> Vec<T> {
        if self.parser.order == ListOrder::Occurrences {
            if let Some(max_results) = self.parser.max_results {
                rows.truncate(max_results);
            }
        }
        rows
    }
}

/// Valid addresses in canonical form under `generic`/`standard` configs,
/// duplicates preserved.
pub fn validate_addresses<I>(addresses: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ListAggregator::default().validate(addresses)
}

pub fn validate_addresses_with<I>(
    addresses: I,
    validation: &ValidationConfig,
    parser: &ParserConfig,
) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ListAggregator::new(validation.clone(), parser.clone()).validate(addresses)
}

/// Unique canonical addresses under `generic`/`standard` configs.
pub fn deduplicate_addresses<I>(addresses: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ListAggregator::default().deduplicate(addresses)
}

pub fn deduplicate_addresses_with<I>(
    addresses: I,
    validation: &ValidationConfig,
    parser: &ParserConfig,
) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ListAggregator::new(validation.clone(), parser.clone()).deduplicate(addresses)
}

/// Number of distinct domains across the valid addresses.
pub fn count_unique_domains<I>(addresses: I) -> usize
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ListAggregator::default().analyze_domains(addresses).len()
}

/// Distinct domains across the valid addresses, alphabetical.
pub fn list_domains<I>(addresses: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let parser = ParserConfig::builder()
        .list_order(ListOrder::DomainAlphabetical)
        .build();
    ListAggregator::new(ValidationConfig::generic(), parser)
        .analyze_domains(addresses)
        .into_iter()
        .map(|analysis| analysis.domain().to_string())
        .collect()
}

/// Domains ranked by occurrence, formatted `"domain count"`, optionally
/// capped.
pub fn list_domains_by_count<I>(addresses: I, max_results: Option<usize>) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut builder = ParserConfig::builder().list_order(ListOrder::Occurrences);
    if let Some(max_results) = max_results {
        builder = builder.max_results(max_results);
    }
    ListAggregator::new(ValidationConfig::generic(), builder.build())
        .analyze_domains(addresses)
        .into_iter()
        .map(|analysis| format!("{} {}", analysis.domain(), analysis.total_address_count()))
        .collect()
}

/// Per-domain statistics under the supplied configs.
pub fn analyze_domains<I>(
    addresses: I,
    validation: &ValidationConfig,
    parser: &ParserConfig,
) -> Vec<DomainAnalysis>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ListAggregator::new(validation.clone(), parser.clone()).analyze_domains(addresses)
}

/// Per-canonical-address statistics under the supplied configs.
pub fn analyze_addresses<I>(
    addresses: I,
    validation: &ValidationConfig,
    parser: &ParserConfig,
) -> Vec<AddressAnalysis>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ListAggregator::new(validation.clone(), parser.clone()).analyze_addresses(addresses)
}
