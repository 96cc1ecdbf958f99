use serde::Deserialize;
use serde_json::{Map, Value};
use tactics_leaderboard_utils::regex;

use crate::schema::PageProps;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("the __NEXT_DATA__ script was not found in the page")]
    MarkerNotFound,
    #[error("the __NEXT_DATA__ script is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("props.pageProps is missing or empty")]
    MissingPageProps,
    #[error("props.pageProps.initialData is not a match list: {0}")]
    UnexpectedShape(#[source] serde_json::Error),
}

#[derive(Deserialize)]
struct NextData {
    #[serde(default)]
    props: Option<Props>,
}

#[derive(Deserialize)]
struct Props {
    #[serde(default, rename = "pageProps")]
    page_props: Option<Value>,
}

/// Finds the Next.js hydration payload in `html` and returns its `props.pageProps`.
pub fn extract_page_props(html: &str) -> Result<PageProps, ExtractError> {
    let payload = regex!(r#"(?s)<script id="__NEXT_DATA__"[^>]*>(.+?)</script>"#)
        .captures(html)
        .ok_or(ExtractError::MarkerNotFound)?
        .get(1)
        .ok_or(ExtractError::MarkerNotFound)?
        .as_str();
    let data: Value = serde_json::from_str(payload).map_err(ExtractError::InvalidJson)?;
    let page_props = match NextData::deserialize(data) {
        Ok(NextData {
            props:
                Some(Props {
                    page_props: Some(Value::Object(page_props)),
                }),
        }) if !page_props.is_empty() => page_props,
        _ => return Err(ExtractError::MissingPageProps),
    };
    parse_page_props(page_props)
}

fn parse_page_props(page_props: Map<String, Value>) -> Result<PageProps, ExtractError> {
    serde_json::from_value(Value::Object(page_props)).map_err(ExtractError::UnexpectedShape)
}
