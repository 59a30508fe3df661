use chrono::{TimeZone, Utc};
use smm_featurizer::{
    features::{
        profile::{season, temporal_features, user_features},
        row::FeatureValue,
    },
    store::{labels::ClassLabels, records::AuthorProfile},
};

#[test]
fn ratio_undefined_without_followers() {
    let profile = AuthorProfile {
        friends: 10,
        followers: 0,
        statuses: 50,
    };
    let row = user_features(Some(&profile), &ClassLabels::default(), "a1");
    assert_eq!(row.number("user_number_friends"), Some(10.0));
    assert_eq!(row.number("user_number_followers"), Some(0.0));
    assert!(!row.contains("user_ratio_friends_followers"));
    assert!(!row.contains("user_log(number_followers)"));
}

#[test]
fn log_features_present_above_zero() {
    let profile = AuthorProfile {
        friends: 100,
        followers: 20,
        statuses: 1,
    };
    let row = user_features(Some(&profile), &ClassLabels::default(), "a1");
    assert!((row.number("user_log(number_friends)").unwrap() - 100f64.ln()).abs() < 1e-12);
    assert_eq!(row.number("user_ratio_friends_followers"), Some(5.0));
    assert_eq!(row.number("user_log(number_tweets)"), Some(0.0));
}

#[test]
fn positive_ratio_counts_remaining_posts_as_negative() {
    let labels = ClassLabels::from_rows([("p1", "a1", 1), ("p2", "a2", 0)]);
    let profile = AuthorProfile {
        friends: 0,
        followers: 0,
        statuses: 50,
    };
    let row = user_features(Some(&profile), &labels, "a1");
    assert_eq!(row.number("user_number_positive_cases"), Some(1.0));
    assert!((row.number("user_ratio_positive_negative_cases").unwrap() - 1.0 / 49.0).abs() < 1e-12);

    let all_positive = AuthorProfile {
        friends: 0,
        followers: 0,
        statuses: 1,
    };
    let row = user_features(Some(&all_positive), &labels, "a1");
    assert!(!row.contains("user_ratio_positive_negative_cases"));

    let unlabeled = user_features(Some(&profile), &labels, "a2");
    assert!(!unlabeled.contains("user_number_positive_cases"));
    assert!(!unlabeled.contains("user_ratio_positive_negative_cases"));
}

#[test]
fn missing_profile_leaves_counters_absent() {
    let labels = ClassLabels::from_rows([("p1", "a1", 1)]);
    let row = user_features(None, &labels, "a1");
    assert_eq!(row.number("user_number_positive_cases"), Some(1.0));
    assert!(!row.contains("user_number_friends"));
    assert!(!row.contains("user_number_tweets"));
}

#[test]
fn temporal_buckets_from_timestamp() {
    let timestamp = Utc.with_ymd_and_hms(2021, 1, 15, 9, 30, 0).unwrap();
    let row = temporal_features(Some(timestamp));
    assert_eq!(row.number("temp_hour_of_day"), Some(9.0));
    assert_eq!(
        row.get("temp_day_of_week").and_then(FeatureValue::as_text),
        Some("friday")
    );
    assert_eq!(
        row.get("temp_season").and_then(FeatureValue::as_text),
        Some("winter")
    );
}

#[test]
fn missing_timestamp_yields_empty_row() {
    assert!(temporal_features(None).is_empty());
}

#[test]
fn seasons_follow_month_boundaries() {
    assert_eq!(season(12), "winter");
    assert_eq!(season(2), "winter");
    assert_eq!(season(3), "spring");
    assert_eq!(season(5), "spring");
    assert_eq!(season(6), "summer");
    assert_eq!(season(8), "summer");
    assert_eq!(season(9), "autumn");
    assert_eq!(season(11), "autumn");
}
