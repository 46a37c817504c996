use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::document::ScheduleDocument;
use crate::extractor::{ScheduleExtractor, ScheduleMetadata};
use crate::group::{GroupCode, GroupToken};
use crate::intervals::{GroupOutages, IntervalParser, OutageInterval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Today,
    Tomorrow,
}

/// One group's schedule for one date, replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub updated_at: Option<String>,
    pub header_date: Option<NaiveDate>,
    pub group: GroupToken,
    pub outages: GroupOutages,
    pub image_path: Option<String>,
}

impl DaySchedule {
    pub fn intervals(&self) -> &[OutageInterval] {
        self.outages.intervals()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Found(DaySchedule),
    NoScheduleForDate {
        date: NaiveDate,
    },
    GroupNotListed {
        date: NaiveDate,
        metadata: ScheduleMetadata,
    },
}

impl ExtractionOutcome {
    pub fn schedule(&self) -> Option<&DaySchedule> {
        match self {
            ExtractionOutcome::Found(schedule) => Some(schedule),
            _ => None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            ExtractionOutcome::Found(schedule) => schedule.date,
            ExtractionOutcome::NoScheduleForDate { date }
            | ExtractionOutcome::GroupNotListed { date, .. } => *date,
        }
    }

    /// Outages to evaluate; a missing schedule contributes none.
    pub fn intervals(&self) -> &[OutageInterval] {
        self.schedule()
            .map(DaySchedule::intervals)
            .unwrap_or_default()
    }
}

/// Picks the document describing `date`. When no document carries the date marker,
/// the provider's current entry stands in for today unless its own header names
/// another date.
pub fn select_document<'a>(
    extractor: &dyn ScheduleExtractor,
    documents: &'a [ScheduleDocument],
    date: NaiveDate,
    day: Day,
) -> Option<&'a ScheduleDocument> {
    let by_marker = documents
        .iter()
        .find(|document| extractor.covers_date(&document.decoded, date));
    if by_marker.is_some() || day != Day::Today {
        return by_marker;
    }

    documents
        .iter()
        .find(|document| document.is_current())
        .filter(|document| {
            let header_date = extractor.metadata(&document.decoded).header_date;
            header_date.map_or(true, |header_date| header_date == date)
        })
}

pub struct ScheduleReader {
    extractor: Arc<dyn ScheduleExtractor>,
    parser: IntervalParser,
}

impl ScheduleReader {
    pub fn new(extractor: Arc<dyn ScheduleExtractor>, parser: IntervalParser) -> Self {
        ScheduleReader { extractor, parser }
    }

    pub fn extract_day_schedule(
        &self,
        documents: &[ScheduleDocument],
        group: &GroupCode,
        date: NaiveDate,
        day: Day,
    ) -> ExtractionOutcome {
        let Some(document) = select_document(self.extractor.as_ref(), documents, date, day) else {
            tracing::info!("No schedule published for {date}");
            return ExtractionOutcome::NoScheduleForDate { date };
        };

        let metadata = self.extractor.metadata(&document.decoded);
        let token = group.display_token();

        let outages = if group.is_applicable() {
            let Some(block) = self.extractor.group_block(&document.decoded, &token) else {
                tracing::info!("Group {token} is not listed in the schedule for {date}");
                return ExtractionOutcome::GroupNotListed { date, metadata };
            };
            let outages = self.parser.classify(&block);
            if let Some(raw_text) = outages.unparsed_text() {
                tracing::warn!("Could not read outages for group {token} on {date}: {raw_text}");
            }
            outages
        } else {
            GroupOutages::PowerAvailable
        };

        ExtractionOutcome::Found(DaySchedule {
            date,
            updated_at: metadata.updated_at,
            header_date: metadata.header_date,
            group: token,
            outages,
            image_path: document.image_path.clone(),
        })
    }
}
