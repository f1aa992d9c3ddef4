//! Registry ordering and status properties

use mlregistry::registry::{IdentifierRegistry, NewRecommendation, RecommendationRegistry, Status};
use tempfile::TempDir;

fn new_rec(text: &str, author: &str, year: i32) -> NewRecommendation {
    NewRecommendation {
        topic: "optimization".to_string(),
        recommendation: text.to_string(),
        first_author: author.to_string(),
        source_paper: format!("{} et al.", author),
        year,
        ..Default::default()
    }
}

#[test]
fn test_topic_results_sorted_for_any_insertion_order() {
    let years = [2019, 2023, 2020, 2023, 2018, 2021];
    // Rotate the insertion order through every starting point
    for shift in 0..years.len() {
        let dir = TempDir::new().unwrap();
        let mut registry =
            RecommendationRegistry::new(IdentifierRegistry::open(dir.path().join("ids.json")));
        for i in 0..years.len() {
            let year = years[(i + shift) % years.len()];
            registry
                .add_recommendation(new_rec(&format!("rec {}", i), "Smith", year))
                .unwrap();
        }

        let got: Vec<i32> = registry
            .get_recommendations_by_topic("optimization", None)
            .iter()
            .map(|r| r.source.year)
            .collect();
        let mut expected = got.clone();
        expected.sort();
        assert_eq!(got, expected);
        assert_eq!(got.len(), years.len());
    }
}

#[test]
fn test_superseded_always_deprecated() {
    let dir = TempDir::new().unwrap();
    let mut registry =
        RecommendationRegistry::new(IdentifierRegistry::open(dir.path().join("ids.json")));

    for experimental in [false, true] {
        let id = registry
            .add_recommendation(NewRecommendation {
                experimental,
                superseded_by: Some("2109.00001".to_string()),
                ..new_rec("Old method", "Brown", 2019)
            })
            .unwrap();
        assert_eq!(
            registry.get_recommendation(&id).unwrap().status,
            Status::Deprecated
        );
    }
    assert_eq!(registry.get_recommendations_by_status(Status::Deprecated).len(), 2);
    assert!(registry.get_recommendations_by_status(Status::Experimental).is_empty());
}

#[test]
fn test_unknown_topic_is_empty_not_error() {
    let dir = TempDir::new().unwrap();
    let registry =
        RecommendationRegistry::new(IdentifierRegistry::open(dir.path().join("ids.json")));
    assert!(registry.is_empty());
    assert!(registry.get_topics().is_empty());
    assert!(registry
        .get_recommendations_by_topic("optimization", Some(Status::Standard))
        .is_empty());
    assert_eq!(registry.get_topic_stats("optimization").total_count, 0);
}
