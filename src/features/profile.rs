//! User-profile and temporal features for one record.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::{
    features::row::FeatureRow,
    store::{labels::ClassLabels, records::AuthorProfile},
};

/// Natural log of a count, undefined at zero.
fn log_count(count: u64) -> Option<f64> {
    (count > 0).then(|| (count as f64).ln())
}

/// Profile counters, labeled-case counts, and the derived ratios.
///
/// Undefined values (zero denominators, unobserved operands) are absent keys,
/// never NaN or infinity.
pub fn user_features(
    profile: Option<&AuthorProfile>,
    labels: &ClassLabels,
    author_id: &str,
) -> FeatureRow {
    let mut row = FeatureRow::new();
    let positives = labels.positive_cases(author_id);
    row.insert_opt("user_number_positive_cases", positives.map(|n| n as f64));

    let Some(profile) = profile else {
        return row;
    };
    row.insert_number("user_number_friends", profile.friends as f64);
    row.insert_opt("user_log(number_friends)", log_count(profile.friends));
    row.insert_number("user_number_followers", profile.followers as f64);
    row.insert_opt("user_log(number_followers)", log_count(profile.followers));
    row.insert_opt(
        "user_ratio_friends_followers",
        (profile.followers > 0).then(|| profile.friends as f64 / profile.followers as f64),
    );
    row.insert_number("user_number_tweets", profile.statuses as f64);
    row.insert_opt("user_log(number_tweets)", log_count(profile.statuses));
    row.insert_opt(
        "user_ratio_positive_negative_cases",
        ratio_positive_negative(positives, profile.statuses),
    );
    row
}

/// Positive-to-negative case ratio.
///
/// Treats every authored post as a case, so negatives = statuses - positives;
/// undefined when positives are unobserved or the denominator is not positive.
fn ratio_positive_negative(positives: Option<u64>, statuses: u64) -> Option<f64> {
    let positives = positives?;
    let negatives = statuses.checked_sub(positives).filter(|n| *n > 0)?;
    Some(positives as f64 / negatives as f64)
}

/// Hour-of-day, day-of-week, and season buckets; empty without a timestamp.
pub fn temporal_features(timestamp: Option<DateTime<Utc>>) -> FeatureRow {
    let mut row = FeatureRow::new();
    let Some(timestamp) = timestamp else {
        return row;
    };
    row.insert_number("temp_hour_of_day", f64::from(timestamp.hour()));
    row.insert_text(
        "temp_day_of_week",
        timestamp.format("%A").to_string().to_lowercase(),
    );
    row.insert_text("temp_season", season(timestamp.month()));
    row
}

/// Northern-hemisphere meteorological season for a month number.
pub fn season(month: u32) -> &'static str {
    match month {
        12 | 1 | 2 => "winter",
        3..=5 => "spring",
        6..=8 => "summer",
        _ => "autumn",
    }
}
