use serde::Deserialize;
use thiserror::Error as ThisError;

use crate::document::{DecodedDocument, ScheduleDocument};

#[derive(ThisError, Debug)]
pub enum FeedError {
    #[error("Schedule feed is not a readable menu page")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug)]
struct MenuPage {
    #[serde(rename = "hydra:member", default)]
    members: Vec<Menu>,
}

#[derive(Deserialize, Debug)]
struct Menu {
    #[serde(rename = "menuItems", default)]
    menu_items: Vec<MenuItem>,
}

#[derive(Deserialize, Debug)]
struct MenuItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    orders: Option<i64>,
    #[serde(rename = "rawHtml", default)]
    raw_html: Option<String>,
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
}

impl From<MenuItem> for ScheduleDocument {
    fn from(item: MenuItem) -> Self {
        ScheduleDocument {
            ordinal: item.orders,
            name: item.name.unwrap_or_default(),
            image_path: item.image_url.filter(|path| !path.trim().is_empty()),
            decoded: DecodedDocument::decode(item.raw_html.as_deref().unwrap_or_default()),
        }
    }
}

/// Reads every menu item of the provider's feed page as a candidate schedule document,
/// in feed order. A page without items is not an error.
pub fn parse_feed(body: &str) -> Result<Vec<ScheduleDocument>, FeedError> {
    let page: MenuPage = serde_json::from_str(body)?;
    Ok(page
        .members
        .into_iter()
        .flat_map(|menu| menu.menu_items)
        .map(ScheduleDocument::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{parse_feed, FeedError};
    use serde_json::json;

    #[test]
    fn test_menu_items_become_documents() {
        let body = json!({
            "hydra:member": [{
                "menuItems": [
                    {
                        "name": "Today",
                        "orders": 0,
                        "rawHtml": "<p>Група 1.1. з 01:00 до 02:00</p>",
                        "imageUrl": "/media/today.png"
                    },
                    { "name": "Tomorrow", "orders": 1, "rawHtml": null, "imageUrl": "" }
                ]
            }]
        })
        .to_string();

        let documents = parse_feed(&body).unwrap();

        assert_eq!(documents.len(), 2);
        assert!(documents[0].is_current());
        assert_eq!(documents[0].image_path.as_deref(), Some("/media/today.png"));
        assert_eq!(documents[0].decoded.blocks().len(), 1);
        assert!(!documents[1].is_current());
        assert_eq!(documents[1].image_path, None);
        assert!(documents[1].decoded.blocks().is_empty());
    }

    #[test]
    fn test_empty_page_has_no_documents() {
        let documents = parse_feed(r#"{"hydra:member": []}"#).unwrap();

        assert!(documents.is_empty());
    }

    #[test]
    fn test_non_json_body_is_malformed() {
        let result = parse_feed("<html>502 Bad Gateway</html>");

        assert!(matches!(result, Err(FeedError::Malformed(_))));
    }
}
