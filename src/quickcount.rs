//! Cruder, parser-free domain ranking.
//!
//! Pulls a domain out of each input with a single capture and ranks the top
//! ten. Deliberately independent of the grammar parser: anything with an `@`
//! followed by something dotted counts, which is enough for a rough survey.
//! Use [`crate::aggregate::list_domains_by_count`] when validation matters.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static DOMAIN_CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:.*)@(.*\..*)").expect("domain capture pattern"));

const MAX_RESULTS: usize = 10;

/// Ranks the domains in `addresses` by occurrence, formatted `"domain count"`,
/// capped at ten rows. Inputs without a capturable domain are skipped.
pub fn count_email_domains<I>(addresses: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for address in addresses {
        if let Some(captures) = DOMAIN_CAPTURE.captures(address.as_ref()) {
            let domain = captures[1].to_lowercase();
            *counts.entry(domain).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
        .into_iter()
        .take(MAX_RESULTS)
        .map(|(domain, count)| format!("{domain} {count}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_descending_with_counts() {
        let mut input = Vec::new();
        input.extend(std::iter::repeat_n("testemail@aol.com", 5));
        input.extend(std::iter::repeat_n("another@yahoo.com", 4));
        input.extend(std::iter::repeat_n("third@gmail.com", 3));
        input.extend(std::iter::repeat_n("fourth@domain.cc", 2));
        input.push("final@test.net");

        assert_eq!(
            count_email_domains(&input),
            vec![
                "aol.com 5",
                "yahoo.com 4",
                "gmail.com 3",
                "domain.cc 2",
                "test.net 1"
            ]
        );
    }

    #[test]
    fn counting_is_case_insensitive() {
        let input = [
            "testemail@aol.com",
            "TESTEMAIL@AOL.com",
            "TESTemail@aol.COM",
            "testemail@yahoo.com",
        ];
        assert_eq!(count_email_domains(input)[0], "aol.com 3");
    }

    #[test]
    fn entries_without_a_dotted_domain_are_skipped() {
        let input = [
            "testemail@aol.com",
            "testemail@aol.com",
            "testemail@aolcom",
            "testemail.aol.com",
            "testemail@yahoo.com",
            "testemail3",
        ];
        assert_eq!(count_email_domains(input), vec!["aol.com 2", "yahoo.com 1"]);
    }

    #[test]
    fn empty_input_yields_an_empty_ranking() {
        let empty: [&str; 0] = [];
        assert!(count_email_domains(empty).is_empty());
    }

    #[test]
    fn output_is_capped_at_ten_rows() {
        let input: Vec<String> = (0..=50)
            .map(|i| format!("testaddress@testdomain{i}.com"))
            .collect();
        assert_eq!(count_email_domains(&input).len(), 10);
    }

    #[test]
    fn equal_counts_sort_by_domain() {
        let mut input = Vec::new();
        for i in 0..30 {
            input.push(format!("testemail_1@aol{i:02}.com"));
            input.push(format!("testemail_2@aol{i:02}.com"));
        }
        let result = count_email_domains(&input);
        assert_eq!(result.len(), 10);
        assert_eq!(result[0], "aol00.com 2");
        assert_eq!(result[9], "aol09.com 2");
    }
}
