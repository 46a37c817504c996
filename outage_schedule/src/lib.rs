pub mod day_schedule;
pub mod document;
pub mod evaluator;
pub mod extractor;
pub mod feed;
pub mod group;
pub mod intervals;
pub mod micro_format;
pub mod report;
pub mod source;

pub use day_schedule::{Day, DaySchedule, ExtractionOutcome, ScheduleReader};
pub use evaluator::{evaluate, PowerStatus};
pub use group::{GroupCode, GroupToken};
pub use intervals::{GroupOutages, IntervalParser, OutageInterval};
pub use micro_format::MicroFormat;
pub use report::{PowerReport, UnknownReason};

#[cfg(test)]
mod tests {
    use crate::extractor::MarkupScheduleExtractor;
    use crate::feed::parse_feed;
    use crate::{Day, GroupCode, IntervalParser, PowerReport, ScheduleReader};
    use chrono::NaiveDate;
    use serde_json::json;
    use shared_kernel::date_time::time_frame::TimeFrame;
    use std::sync::Arc;

    /// Escapes markup the way the provider embeds it in its JSON feed.
    fn transport_escape(markup: &str) -> String {
        markup
            .replace('<', r"\u003C")
            .replace('>', r"\u003E")
            .replace('/', r"\/")
            .replace('\n', r"\n")
    }

    #[test]
    fn test_power_is_off_during_a_published_outage() {
        let markup = "<div>\n<p><b>Графік погодинних відключень на 05.03.2025</b></p>\n\
            <p>Інформація станом на 21:40 04.03.2025</p>\n\
            <p>Група 3.1. з 09:00 до 12:00 та з 18:00 до 20:30</p>\n\
            <p>Група 3.2. Електроенергія є.</p>\n</div>";
        let body = json!({
            "hydra:member": [{
                "menuItems": [
                    { "name": "Today", "orders": 0, "rawHtml": transport_escape(markup), "imageUrl": null }
                ]
            }]
        })
        .to_string();
        let documents = parse_feed(&body).unwrap();
        let reader = ScheduleReader::new(
            Arc::new(MarkupScheduleExtractor::default()),
            IntervalParser::default(),
        );
        let group = GroupCode::from("31");
        let today = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2025, 3, 6).unwrap();

        let today_outcome = reader.extract_day_schedule(&documents, &group, today, Day::Today);
        let tomorrow_outcome =
            reader.extract_day_schedule(&documents, &group, tomorrow, Day::Tomorrow);
        let report = PowerReport::compose(&group, &today_outcome, &tomorrow_outcome, 10 * 3600);

        let status = report.status().unwrap();
        assert!(!status.has_power);
        assert_eq!(
            status.active_or_next,
            Some(TimeFrame::new(
                "09:00".parse().unwrap(),
                "12:00".parse().unwrap()
            ))
        );
        assert_eq!(status.seconds_until_change, Some(7200));
    }

    #[test]
    fn test_intervals_wrapped_onto_a_new_line_are_kept() {
        let markup = "<p><b>Графік погодинних відключень на 05.03.2025</b></p>\
            <p>Група 3.1. з 09:00 до 12:00 та\nз 18:00 до 20:30</p>";
        let body = json!({
            "hydra:member": [{
                "menuItems": [
                    { "name": "Today", "orders": 0, "rawHtml": transport_escape(markup), "imageUrl": null }
                ]
            }]
        })
        .to_string();
        let documents = parse_feed(&body).unwrap();
        let reader = ScheduleReader::new(
            Arc::new(MarkupScheduleExtractor::default()),
            IntervalParser::default(),
        );
        let today = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();

        let outcome =
            reader.extract_day_schedule(&documents, &GroupCode::from("31"), today, Day::Today);

        let intervals = outcome.intervals();
        assert_eq!(intervals.len(), 2);
        assert_eq!(
            intervals[1],
            TimeFrame::new("18:00".parse().unwrap(), "20:30".parse().unwrap())
        );
    }
}
