use anyhow::Context;
use chrono::{Duration, NaiveDate};
use outage_schedule::feed::parse_feed;
use outage_schedule::source::ScheduleDocumentSource;
use outage_schedule::{Day, ExtractionOutcome, GroupCode, ScheduleReader};
use std::sync::Arc;
use url::Url;

/// Today's and tomorrow's outcome for one group, read from one feed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    pub group: GroupCode,
    pub today: ExtractionOutcome,
    pub tomorrow: ExtractionOutcome,
}

/// Fetch, decode, extract and parse for a group.
pub struct SchedulePipeline {
    source: Arc<dyn ScheduleDocumentSource>,
    reader: ScheduleReader,
    feed_url: Url,
}

impl SchedulePipeline {
    pub fn new(source: Arc<dyn ScheduleDocumentSource>, reader: ScheduleReader, feed_url: Url) -> Self {
        SchedulePipeline {
            source,
            reader,
            feed_url,
        }
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn load(&self, group: &GroupCode, today: NaiveDate) -> anyhow::Result<ScheduleSnapshot> {
        let body = self
            .source
            .fetch(&self.feed_url)
            .await
            .context("Failed to fetch the schedule feed")?;
        let documents = parse_feed(&body)?;
        let tomorrow = today + Duration::days(1);

        Ok(ScheduleSnapshot {
            group: group.clone(),
            today: self
                .reader
                .extract_day_schedule(&documents, group, today, Day::Today),
            tomorrow: self
                .reader
                .extract_day_schedule(&documents, group, tomorrow, Day::Tomorrow),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::SchedulePipeline;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use outage_schedule::extractor::MarkupScheduleExtractor;
    use outage_schedule::source::ScheduleDocumentSource;
    use outage_schedule::{ExtractionOutcome, GroupCode, IntervalParser, ScheduleReader};
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;

    mockall::mock! {
        pub Source {}

        #[async_trait]
        impl ScheduleDocumentSource for Source {
            async fn fetch(&self, url: &Url) -> anyhow::Result<String>;
        }
    }

    pub(crate) fn feed_body(today: &str, tomorrow: &str) -> String {
        json!({
            "hydra:member": [{
                "menuItems": [
                    { "name": "Today", "orders": 0, "rawHtml": today, "imageUrl": "/media/today.png" },
                    { "name": "Tomorrow", "orders": 1, "rawHtml": tomorrow, "imageUrl": null }
                ]
            }]
        })
        .to_string()
    }

    pub(crate) fn pipeline(source: MockSource) -> SchedulePipeline {
        SchedulePipeline::new(
            Arc::new(source),
            ScheduleReader::new(
                Arc::new(MarkupScheduleExtractor::default()),
                IntervalParser::default(),
            ),
            Url::parse("https://api.loe.lviv.ua/api/menus?page=1&type=photo-grafic").unwrap(),
        )
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[tokio::test]
    async fn test_load_reads_today_and_tomorrow_from_one_fetch() {
        let mut source = MockSource::new();
        source.expect_fetch().times(1).returning(|_| {
            Ok(feed_body(
                "<p><b>Графік погодинних відключень на 05.03.2025</b></p><p>Група 3.1. з 22:00 до 24:00</p>",
                "<p><b>Графік погодинних відключень на 06.03.2025</b></p><p>Група 3.1. з 00:00 до 03:30</p>",
            ))
        });

        let snapshot = pipeline(source)
            .load(&GroupCode::from("31"), date(5))
            .await
            .unwrap();

        assert_eq!(snapshot.today.date(), date(5));
        assert_eq!(snapshot.today.intervals().len(), 1);
        assert_eq!(snapshot.tomorrow.date(), date(6));
        assert_eq!(snapshot.tomorrow.intervals().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_tomorrow_is_not_an_error() {
        let mut source = MockSource::new();
        source.expect_fetch().returning(|_| {
            Ok(feed_body(
                "<p><b>Графік погодинних відключень на 05.03.2025</b></p><p>Група 3.1. Електроенергія є.</p>",
                "<p>Графік на завтра ще не затверджено</p>",
            ))
        });

        let snapshot = pipeline(source)
            .load(&GroupCode::from("31"), date(5))
            .await
            .unwrap();

        assert_eq!(
            snapshot.tomorrow,
            ExtractionOutcome::NoScheduleForDate { date: date(6) }
        );
    }

    #[tokio::test]
    async fn test_unreadable_feed_fails_the_refresh() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok("<html>Bad gateway</html>".to_owned()));

        let result = pipeline(source).load(&GroupCode::from("31"), date(5)).await;

        assert!(result.is_err());
    }
}
