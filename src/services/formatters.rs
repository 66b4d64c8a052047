use chrono::{Datelike, NaiveDate};

use crate::models::Title;

/// Year of the release (movies) or first air date (series)
pub fn year_of(title: &Title) -> Option<i32> {
    title
        .release_date
        .as_deref()
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(|date| date.year())
}

/// Formats a runtime in minutes as `"2h 16min"`; missing or zero is `"N/A"`
pub fn format_duration(minutes: Option<u32>) -> String {
    match minutes {
        Some(minutes) if minutes > 0 => format!("{}h {}min", minutes / 60, minutes % 60),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;

    fn title_released(date: Option<&str>) -> Title {
        Title {
            id: 1,
            display_title: "Arrival".to_string(),
            media_type: MediaKind::Movie,
            poster_path: None,
            backdrop_path: None,
            vote_average: 7.6,
            release_date: date.map(str::to_string),
            overview: String::new(),
            runtime: Some(116),
            episode_run_time: vec![],
            genres: vec![],
            created_by: vec![],
        }
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(&title_released(Some("2016-11-10"))), Some(2016));
        assert_eq!(year_of(&title_released(None)), None);
        assert_eq!(year_of(&title_released(Some("sometime"))), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(136)), "2h 16min");
        assert_eq!(format_duration(Some(45)), "0h 45min");
        assert_eq!(format_duration(Some(0)), "N/A");
        assert_eq!(format_duration(None), "N/A");
    }
}
