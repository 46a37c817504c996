use serde::Deserialize;

/// The textual conventions the provider's schedule documents follow.
/// Every phrase can be overridden from configuration if the provider rewords them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MicroFormat {
    /// Precedes the `DD.MM.YYYY` date a document covers.
    pub date_marker: String,
    /// Connective before the date in the bold date header.
    pub date_header_connective: String,
    /// Precedes the `HH:MM DD.MM.YYYY` "information as of" timestamp.
    pub updated_at_marker: String,
    /// Opens a group's block, as in `Група 3.1.`.
    pub group_prefix: String,
    pub interval_from: String,
    pub interval_to: String,
    /// Marks a group with no outages.
    pub power_available: String,
}

impl Default for MicroFormat {
    fn default() -> Self {
        MicroFormat {
            date_marker: "Графік погодинних відключень на".to_owned(),
            date_header_connective: "на".to_owned(),
            updated_at_marker: "станом на".to_owned(),
            group_prefix: "Група".to_owned(),
            interval_from: "з".to_owned(),
            interval_to: "до".to_owned(),
            power_available: "Електроенергія є".to_owned(),
        }
    }
}
