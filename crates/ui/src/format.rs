//! Pure formatting helpers: category labels, relative timestamps, and
//! summary truncation. No clock or DOM access; callers pass `now` in.

use chrono::{DateTime, Utc};

use domains::{AuthorRef, Category, ANONYMOUS_AUTHOR};

/// Summary cards show at most this many characters of content.
pub const SUMMARY_LIMIT: usize = 150;

const ELLIPSIS: &str = "...";

/// Label for a category code. The four known codes get fixed labels;
/// anything else displays its raw code unchanged.
pub fn category_label(category: &Category) -> &str {
    match category {
        Category::General => "General Discussion",
        Category::Tech => "Tech Talk",
        Category::Help => "Help & Questions",
        Category::Feedback => "Feedback",
        Category::Other(code) => code,
    }
}

/// The author name a card displays. A profile author whose join came
/// back empty falls back to the anonymous label.
pub fn author_display(author: &AuthorRef) -> &str {
    match author {
        AuthorRef::Profile {
            username: Some(name),
            ..
        } if !name.is_empty() => name,
        AuthorRef::Profile { .. } => ANONYMOUS_AUTHOR,
        AuthorRef::Name(name) => name,
    }
}

/// Truncates to `limit` characters, appending an ellipsis marker only
/// when something was cut.
pub fn excerpt(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        content.to_string()
    } else {
        let mut cut: String = content.chars().take(limit).collect();
        cut.push_str(ELLIPSIS);
        cut
    }
}

/// Buckets the age of a timestamp, truncating (never rounding) at each
/// boundary: under an hour in minutes, under a day in hours, under a
/// week in days, then a calendar date.
pub fn relative_time(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let minutes = delta.num_minutes().max(0);
    let hours = delta.num_hours().max(0);
    let days = delta.num_days().max(0);

    if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn known_categories_get_fixed_labels() {
        assert_eq!(category_label(&Category::General), "General Discussion");
        assert_eq!(category_label(&Category::Tech), "Tech Talk");
        assert_eq!(category_label(&Category::Help), "Help & Questions");
        assert_eq!(category_label(&Category::Feedback), "Feedback");
    }

    #[test]
    fn unknown_category_passes_through_unlabeled() {
        let category = Category::Other("offtopic".to_string());
        assert_eq!(category_label(&category), "offtopic");
    }

    #[test]
    fn excerpt_keeps_short_content_intact() {
        let content = "a".repeat(150);
        assert_eq!(excerpt(&content, SUMMARY_LIMIT), content);
    }

    #[test]
    fn excerpt_truncates_and_marks_long_content() {
        let content = "b".repeat(151);
        let shown = excerpt(&content, SUMMARY_LIMIT);
        assert_eq!(shown, format!("{}...", "b".repeat(150)));
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let content = "é".repeat(151);
        let shown = excerpt(&content, SUMMARY_LIMIT);
        assert_eq!(shown.chars().count(), 153);
    }

    #[test]
    fn relative_time_bucket_boundaries() {
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();

        assert_eq!(
            relative_time(now, now - Duration::minutes(59)),
            "59 minutes ago"
        );
        assert_eq!(relative_time(now, now - Duration::minutes(60)), "1 hour ago");
        assert_eq!(relative_time(now, now - Duration::hours(23)), "23 hours ago");
        assert_eq!(relative_time(now, now - Duration::hours(24)), "1 day ago");
        assert_eq!(relative_time(now, now - Duration::days(6)), "6 days ago");
        assert_eq!(relative_time(now, now - Duration::days(7)), "Aug 19, 2026");
    }

    #[test]
    fn relative_time_clamps_future_timestamps() {
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        assert_eq!(
            relative_time(now, now + Duration::minutes(5)),
            "0 minutes ago"
        );
    }

    #[test]
    fn author_display_falls_back_when_join_is_empty() {
        let author = AuthorRef::Profile {
            user_id: uuid::Uuid::new_v4(),
            username: None,
        };
        assert_eq!(author_display(&author), ANONYMOUS_AUTHOR);
    }
}
