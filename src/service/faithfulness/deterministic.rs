//! Deterministic lexical faithfulness check
//!
//! Pure keyword-polarity matching between a coverage decision and the
//! clauses it was grounded on. Matching is plain substring containment
//! over lowercased text: a clause reading "not covered" also contains
//! "covered", so polarity can misfire on negated phrases. The LLM judge
//! is the semantic tier; this tier is the reproducible floor that runs
//! without any network call.

use crate::model::{CoverageDecision, CoverageLabel, DeterministicVerdict, RetrievedClause};

/// Keywords indicating coverage
const POSITIVE_KEYWORDS: &[&str] = &["covered", "eligible", "payable"];

/// Keywords indicating exclusion
const NEGATIVE_KEYWORDS: &[&str] = &["excluded", "not covered", "not payable", "exclusion"];

/// Keywords indicating conditional coverage
const CONDITIONAL_KEYWORDS: &[&str] = &["waiting", "subject to", "limit", "sub-limit", "after"];

fn normalize_text(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// Join all retrieved clause text into one normalized haystack
fn concatenate_clause_text(clauses: &[RetrievedClause]) -> String {
    clauses
        .iter()
        .map(|retrieved| normalize_text(&retrieved.clause.text))
        .collect::<Vec<_>>()
        .join(" ")
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// A decision fabricates evidence when it cites any source file that is
/// not among the retrieved clauses. Source names compare exactly.
fn has_fabricated_evidence(decision: &CoverageDecision, clauses: &[RetrievedClause]) -> bool {
    decision.evidence_sources.iter().any(|cited| {
        !clauses
            .iter()
            .any(|retrieved| retrieved.clause.source_file == *cited)
    })
}

/// Polarity check: does the clause text carry the kind of signal the
/// decision claims it does?
fn check_decision_support(
    decision: &CoverageDecision,
    clauses: &[RetrievedClause],
) -> DeterministicVerdict {
    let all_text = concatenate_clause_text(clauses);

    match &decision.coverage_decision {
        CoverageLabel::Covered => {
            if contains_any(&all_text, POSITIVE_KEYWORDS) {
                DeterministicVerdict::Supported
            } else {
                DeterministicVerdict::Unsupported
            }
        }
        CoverageLabel::NotCovered => {
            if contains_any(&all_text, NEGATIVE_KEYWORDS) {
                DeterministicVerdict::Supported
            } else {
                DeterministicVerdict::Unsupported
            }
        }
        CoverageLabel::CoveredWithConditions => {
            if contains_any(&all_text, CONDITIONAL_KEYWORDS) {
                DeterministicVerdict::Supported
            } else {
                DeterministicVerdict::PartiallySupported
            }
        }
        CoverageLabel::InsufficientEvidence => {
            // "Insufficient evidence" is only faithful when this claim's
            // clauses carry no coverage signal in either direction
            let has_positive = contains_any(&all_text, POSITIVE_KEYWORDS);
            let has_negative = contains_any(&all_text, NEGATIVE_KEYWORDS);
            if has_positive || has_negative {
                DeterministicVerdict::Unsupported
            } else {
                DeterministicVerdict::Supported
            }
        }
        CoverageLabel::Error | CoverageLabel::Other(_) => DeterministicVerdict::Unsupported,
    }
}

/// Deterministic faithfulness verdict for one adjudicated claim.
///
/// Two checks run in order: evidence integrity first (every cited source
/// must be among the retrieved clauses; any miss is `FABRICATED_EVIDENCE`
/// regardless of polarity), then decision polarity against the clause
/// text. A missing decision is `UNSUPPORTED` outright.
pub fn deterministic_faithfulness_check(
    decision: Option<&CoverageDecision>,
    clauses: &[RetrievedClause],
) -> DeterministicVerdict {
    let Some(decision) = decision else {
        return DeterministicVerdict::Unsupported;
    };

    if has_fabricated_evidence(decision, clauses) {
        return DeterministicVerdict::FabricatedEvidence;
    }

    check_decision_support(decision, clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PolicyClause;

    fn decision(label: CoverageLabel) -> CoverageDecision {
        CoverageDecision {
            coverage_decision: label,
            conditions_or_exclusions: vec![],
            evidence_sources: vec![],
            confidence: None,
        }
    }

    fn clause(source: &str, text: &str) -> RetrievedClause {
        RetrievedClause {
            clause: PolicyClause {
                source_file: source.to_string(),
                chunk_id: 0,
                text: text.to_string(),
            },
            distance: 0.1,
        }
    }

    #[test]
    fn test_fabricated_evidence_takes_precedence_over_polarity() {
        let mut d = decision(CoverageLabel::Covered);
        d.evidence_sources = vec!["invented_policy.txt".to_string()];
        let clauses = vec![clause("policy_a.txt", "Hospitalization is covered.")];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::FabricatedEvidence
        );
    }

    #[test]
    fn test_cited_sources_among_retrieved_are_not_fabricated() {
        let mut d = decision(CoverageLabel::Covered);
        d.evidence_sources = vec!["policy_a.txt".to_string()];
        let clauses = vec![
            clause("policy_a.txt", "Hospitalization is covered."),
            clause("policy_b.txt", "Day care procedures are payable."),
        ];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Supported
        );
    }

    #[test]
    fn test_covered_is_supported_by_any_positive_keyword() {
        let d = decision(CoverageLabel::Covered);
        let clauses = vec![clause("policy_a.txt", "Room rent charges are PAYABLE up to 1%.")];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Supported
        );
    }

    #[test]
    fn test_covered_without_positive_signal_is_unsupported() {
        let d = decision(CoverageLabel::Covered);
        let clauses = vec![clause(
            "policy_a.txt",
            "The insured must submit all hospital bills within 30 days.",
        )];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Unsupported
        );
    }

    #[test]
    fn test_positive_match_is_substring_based() {
        // Polarity does not parse negation: "not covered" still contains
        // "covered", so a Covered decision passes the lexical tier here
        let d = decision(CoverageLabel::Covered);
        let clauses = vec![clause("policy_a.txt", "Dental treatment is not covered.")];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Supported
        );
    }

    #[test]
    fn test_not_covered_is_supported_by_exclusion_language() {
        let d = decision(CoverageLabel::NotCovered);
        let clauses = vec![clause(
            "policy_b.txt",
            "Cosmetic surgery falls under permanent exclusion in this policy.",
        )];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Supported
        );
    }

    #[test]
    fn test_not_covered_citing_the_matching_exclusion_source_is_supported() {
        let mut d = decision(CoverageLabel::NotCovered);
        d.evidence_sources = vec!["policyA.pdf".to_string()];
        let clauses = vec![clause(
            "policyA.pdf",
            "Cosmetic procedures are excluded from coverage.",
        )];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Supported
        );
    }

    #[test]
    fn test_not_covered_without_negative_signal_is_unsupported() {
        let d = decision(CoverageLabel::NotCovered);
        let clauses = vec![clause("policy_b.txt", "Cataract surgery is covered after 24 months.")];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Unsupported
        );
    }

    #[test]
    fn test_conditional_decision_needs_a_condition_keyword() {
        let d = decision(CoverageLabel::CoveredWithConditions);

        let with_condition = vec![clause(
            "policy_a.txt",
            "Cataract surgery is covered after a waiting period of 24 months.",
        )];
        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &with_condition),
            DeterministicVerdict::Supported
        );

        let without_condition = vec![clause("policy_a.txt", "Cataract surgery is covered.")];
        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &without_condition),
            DeterministicVerdict::PartiallySupported
        );
    }

    #[test]
    fn test_insufficient_evidence_contradicted_by_polarity_signals() {
        let d = decision(CoverageLabel::InsufficientEvidence);

        let negative = vec![clause("policy_b.txt", "Hair transplant is excluded.")];
        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &negative),
            DeterministicVerdict::Unsupported
        );

        let positive = vec![clause("policy_a.txt", "Ambulance charges are payable.")];
        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &positive),
            DeterministicVerdict::Unsupported
        );
    }

    #[test]
    fn test_insufficient_evidence_with_neutral_clauses_is_supported() {
        let d = decision(CoverageLabel::InsufficientEvidence);
        let clauses = vec![clause(
            "policy_c.txt",
            "The policyholder must notify the insurer of any change of address.",
        )];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Supported
        );

        // An empty retrieval set carries no signal either
        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &[]),
            DeterministicVerdict::Supported
        );
    }

    #[test]
    fn test_unknown_and_error_labels_are_unsupported() {
        let clauses = vec![clause("policy_a.txt", "Hospitalization is covered.")];

        let unknown = decision(CoverageLabel::Other("Pending review".to_string()));
        assert_eq!(
            deterministic_faithfulness_check(Some(&unknown), &clauses),
            DeterministicVerdict::Unsupported
        );

        let error = decision(CoverageLabel::Error);
        assert_eq!(
            deterministic_faithfulness_check(Some(&error), &clauses),
            DeterministicVerdict::Unsupported
        );
    }

    #[test]
    fn test_missing_decision_is_unsupported() {
        assert_eq!(
            deterministic_faithfulness_check(None, &[]),
            DeterministicVerdict::Unsupported
        );
    }

    #[test]
    fn test_empty_evidence_list_is_never_fabricated() {
        let d = decision(CoverageLabel::Covered);

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &[]),
            DeterministicVerdict::Unsupported
        );
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let d = decision(CoverageLabel::NotCovered);
        let clauses = vec![clause("policy_b.txt", "DENTAL TREATMENT IS EXCLUDED.")];

        assert_eq!(
            deterministic_faithfulness_check(Some(&d), &clauses),
            DeterministicVerdict::Supported
        );
    }

    #[test]
    fn test_repeated_checks_on_identical_inputs_agree() {
        let mut d = decision(CoverageLabel::NotCovered);
        d.evidence_sources = vec!["policyA.pdf".to_string()];
        let clauses = vec![clause(
            "policyA.pdf",
            "Cosmetic procedures are excluded from coverage.",
        )];

        let first = deterministic_faithfulness_check(Some(&d), &clauses);
        let second = deterministic_faithfulness_check(Some(&d), &clauses);

        assert_eq!(first, DeterministicVerdict::Supported);
        assert_eq!(second, first);
    }
}
