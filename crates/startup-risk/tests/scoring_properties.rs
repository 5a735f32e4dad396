//! Property-based tests for the scoring invariants.
//!
//! Answers are generated with arbitrary shapes so every heuristic also sees
//! values of the wrong type.

use std::collections::BTreeMap;

use proptest::prelude::*;
use startup_risk::scoring::{
    labels, standard_questionnaire, AnswerSet, AnswerValue, RiskBand, ScoringEngine,
};

fn question_labels() -> Vec<String> {
    standard_questionnaire()
        .into_iter()
        .map(|question| question.label)
        .collect()
}

fn answer_value() -> impl Strategy<Value = AnswerValue> {
    let leaf = prop_oneof![
        Just(AnswerValue::Null),
        any::<bool>().prop_map(AnswerValue::Bool),
        (-1.0e6..1.0e6f64).prop_map(AnswerValue::Number),
        "[a-zA-Z0-9 .%e-]{0,40}".prop_map(AnswerValue::Text),
        prop::sample::select(vec![
            "Idea",
            "MVP",
            "Scale-up",
            "Pre-revenue",
            "Not Started",
            "Fully Compliant",
            "Granted",
            "Both",
            "No",
            "Undecided",
            "10+ years",
            "Analyst Report",
            "GDPR",
            "None",
        ])
        .prop_map(AnswerValue::from),
    ];

    leaf.prop_recursive(2, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(AnswerValue::List),
            prop::collection::btree_map(
                prop::sample::select(vec![
                    "rate",
                    "duration",
                    "tech",
                    "marketing",
                    "sales",
                    "management",
                ])
                .prop_map(str::to_string),
                inner,
                0..5,
            )
            .prop_map(|fields: BTreeMap<String, AnswerValue>| AnswerValue::Record(fields)),
        ]
    })
}

fn answer_set() -> impl Strategy<Value = AnswerSet> {
    prop::collection::vec(
        (prop::sample::select(question_labels()), answer_value()),
        0..40,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    /// Property: identical inputs give identical breakdowns
    #[test]
    fn scoring_is_deterministic(answers in answer_set()) {
        let engine = ScoringEngine::default();
        let questions = standard_questionnaire();

        let first = engine.score(&answers, &questions);
        let second = engine.score(&answers, &questions);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.total_risk_score, (first.total_risk_score * 100.0).round() / 100.0);
    }

    /// Property: every section, KPI and total stays within 0..=100
    #[test]
    fn scores_stay_in_range(answers in answer_set()) {
        let breakdown = ScoringEngine::default().score(&answers, &standard_questionnaire());

        prop_assert!((0.0..=100.0).contains(&breakdown.total_risk_score));
        for (section, score) in &breakdown.section_scores {
            prop_assert!((0.0..=100.0).contains(score), "section {} scored {}", section, score);
        }
        for (kpi, score) in breakdown.kpi_scores.entries() {
            prop_assert!((0.0..=100.0).contains(&score), "{} scored {}", kpi, score);
        }
    }

    /// Property: the band never decreases as the score increases
    #[test]
    fn bands_are_monotonic(a in 0.0..=100.0f64, b in 0.0..=100.0f64) {
        let engine = ScoringEngine::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        prop_assert!(engine.band(low) <= engine.band(high));
    }

    /// Property: the reported band agrees with the reported total
    #[test]
    fn band_matches_total(answers in answer_set()) {
        let engine = ScoringEngine::default();
        let breakdown = engine.score(&answers, &standard_questionnaire());

        let expected = if breakdown.total_risk_score <= 30.0 {
            RiskBand::Low
        } else if breakdown.total_risk_score <= 60.0 {
            RiskBand::Medium
        } else {
            RiskBand::High
        };
        prop_assert_eq!(breakdown.risk_band, expected);
        prop_assert_eq!(breakdown.decision.as_str(), engine.decision(expected));
    }

    /// Property: a non-numeric CAC scores exactly like an omitted CAC
    #[test]
    fn non_numeric_cac_is_isolated(
        answers in answer_set(),
        garbage in "[a-z][a-z ]{0,20}",
    ) {
        let engine = ScoringEngine::default();
        let questions = standard_questionnaire();

        let mut omitted = answers.clone();
        omitted.remove(labels::CAC);
        let mut malformed = answers;
        malformed.insert(labels::CAC, garbage);

        prop_assert_eq!(
            engine.score(&malformed, &questions),
            engine.score(&omitted, &questions)
        );
    }
}
