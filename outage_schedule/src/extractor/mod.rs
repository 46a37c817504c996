use anyhow::Context;
use chrono::NaiveDate;
use regex::Regex;

use crate::document::DecodedDocument;
use crate::group::GroupToken;
use crate::micro_format::MicroFormat;

pub mod blocks;
pub mod scanner;

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Optional display metadata found in a schedule document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleMetadata {
    pub header_date: Option<NaiveDate>,
    pub updated_at: Option<String>,
}

/// The matching rules used to read a decoded schedule document.
pub trait ScheduleExtractor: Send + Sync {
    fn covers_date(&self, document: &DecodedDocument, date: NaiveDate) -> bool;

    /// Text of the first block describing `group`, starting at the group's marker.
    fn group_block(&self, document: &DecodedDocument, group: &GroupToken) -> Option<String>;

    fn metadata(&self, document: &DecodedDocument) -> ScheduleMetadata;
}

pub struct MarkupScheduleExtractor {
    format: MicroFormat,
    header_date: Regex,
    updated_at: Regex,
}

impl MarkupScheduleExtractor {
    pub fn new(format: MicroFormat) -> anyhow::Result<Self> {
        let header_date = Regex::new(&format!(
            r"(?:^|\s){}\s+(\d{{2}}\.\d{{2}}\.\d{{4}})",
            regex::escape(&format.date_header_connective)
        ))
        .context("Failed to build the date header pattern")?;
        let updated_at = Regex::new(&format!(
            r"{}\s+(\d{{1,2}}:\d{{2}}\s+\d{{2}}\.\d{{2}}\.\d{{4}})",
            regex::escape(&format.updated_at_marker)
        ))
        .context("Failed to build the updated-at pattern")?;

        Ok(MarkupScheduleExtractor {
            format,
            header_date,
            updated_at,
        })
    }

    fn group_marker(&self, group: &GroupToken) -> String {
        format!("{} {}.", self.format.group_prefix, group)
    }

    /// Bold runs first, then every block as a fallback.
    fn find_in_document<T>(
        document: &DecodedDocument,
        find: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let blocks = document.blocks();
        blocks
            .iter()
            .flat_map(|block| block.emphasised.iter())
            .find_map(|run| find(run.as_str()))
            .or_else(|| blocks.iter().find_map(|block| find(block.text.as_str())))
    }
}

impl Default for MarkupScheduleExtractor {
    fn default() -> Self {
        MarkupScheduleExtractor::new(MicroFormat::default())
            .expect("Expected the default micro-format patterns to compile")
    }
}

impl ScheduleExtractor for MarkupScheduleExtractor {
    fn covers_date(&self, document: &DecodedDocument, date: NaiveDate) -> bool {
        let expected = date.format(DATE_FORMAT).to_string();
        let marker = self.format.date_marker.as_str();
        document.blocks().iter().any(|block| {
            block
                .text
                .match_indices(marker)
                .any(|(index, _)| {
                    block.text[index + marker.len()..]
                        .trim_start()
                        .starts_with(&expected)
                })
        })
    }

    fn group_block(&self, document: &DecodedDocument, group: &GroupToken) -> Option<String> {
        let marker = self.group_marker(group);
        let next_group = format!("{} ", self.format.group_prefix);
        document.blocks().iter().find_map(|block| {
            // `Група 3.` must not match inside `Група 3.1.`.
            let (start, _) = block.text.match_indices(&marker).find(|(index, _)| {
                !block.text[index + marker.len()..].starts_with(|c: char| c.is_ascii_digit())
            })?;
            let tail = &block.text[start..];
            let end = tail[marker.len()..]
                .find(&next_group)
                .map(|offset| offset + marker.len())
                .unwrap_or(tail.len());
            Some(tail[..end].trim().to_owned())
        })
    }

    fn metadata(&self, document: &DecodedDocument) -> ScheduleMetadata {
        let header_date = Self::find_in_document(document, |text| {
            self.header_date
                .captures_iter(text)
                .find_map(|captures| NaiveDate::parse_from_str(&captures[1], DATE_FORMAT).ok())
        });
        let updated_at = Self::find_in_document(document, |text| {
            self.updated_at
                .captures(text)
                .map(|captures| captures[1].split_whitespace().collect::<Vec<_>>().join(" "))
        });

        ScheduleMetadata {
            header_date,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkupScheduleExtractor, ScheduleExtractor};
    use crate::document::DecodedDocument;
    use crate::group::GroupToken;
    use chrono::NaiveDate;

    const DOCUMENT: &str = "<div>\
        <p><b>Графік погодинних відключень на 05.03.2025</b></p>\
        <p>Інформація <b>станом на 08:15 05.03.2025</b></p>\
        <p>Група 1.1. Електроенергія є.</p>\
        <p>Група 3.1. з 09:00 до 12:00 та з 18:00 до 20:30</p>\
        <p>Група 3.2. з 12:00 до 15:00</p>\
        </div>";

    fn date(day: u32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_document_covers_its_marked_date_only() {
        let extractor = MarkupScheduleExtractor::default();
        let document = DecodedDocument::decode(DOCUMENT);

        assert!(extractor.covers_date(&document, date(5, 3)));
        assert!(!extractor.covers_date(&document, date(6, 3)));
    }

    #[test]
    fn test_date_marker_must_precede_the_date() {
        let extractor = MarkupScheduleExtractor::default();
        let document = DecodedDocument::decode("<p>Оновлено 05.03.2025</p>");

        assert!(!extractor.covers_date(&document, date(5, 3)));
    }

    #[test]
    fn test_group_block_is_isolated() {
        let extractor = MarkupScheduleExtractor::default();
        let document = DecodedDocument::decode(DOCUMENT);

        let block = extractor.group_block(&document, &GroupToken::from("3.1"));

        assert_eq!(
            block.as_deref(),
            Some("Група 3.1. з 09:00 до 12:00 та з 18:00 до 20:30")
        );
    }

    #[test]
    fn test_group_block_stops_at_the_next_group_in_the_same_block() {
        let extractor = MarkupScheduleExtractor::default();
        let document =
            DecodedDocument::decode("<p>Група 1.1. з 01:00 до 02:00 Група 1.2. з 03:00 до 04:00</p>");

        let block = extractor.group_block(&document, &GroupToken::from("1.2"));

        assert_eq!(block.as_deref(), Some("Група 1.2. з 03:00 до 04:00"));
    }

    #[test]
    fn test_missing_group_has_no_block() {
        let extractor = MarkupScheduleExtractor::default();
        let document = DecodedDocument::decode(DOCUMENT);

        assert_eq!(extractor.group_block(&document, &GroupToken::from("6.2")), None);
        // `3` is not `3.1`.
        assert_eq!(extractor.group_block(&document, &GroupToken::from("3")), None);
    }

    #[test]
    fn test_metadata_prefers_bold_runs() {
        let extractor = MarkupScheduleExtractor::default();
        let document = DecodedDocument::decode(DOCUMENT);

        let metadata = extractor.metadata(&document);

        assert_eq!(metadata.header_date, Some(date(5, 3)));
        assert_eq!(metadata.updated_at.as_deref(), Some("08:15 05.03.2025"));
    }

    #[test]
    fn test_metadata_is_optional() {
        let extractor = MarkupScheduleExtractor::default();
        let document = DecodedDocument::decode("<p>Група 1.1. з 01:00 до 02:00</p>");

        let metadata = extractor.metadata(&document);

        assert_eq!(metadata.header_date, None);
        assert_eq!(metadata.updated_at, None);
    }
}
