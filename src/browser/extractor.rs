use chromiumoxide::Page;
use tracing::debug;

use super::errors::ScrapeError;
use crate::shared::MatchId;

/// All DOM assumptions about the match list live here: the anchor selector
/// and the fact that the match id is the link's trailing path segment.
const MATCH_LINKS_JS: &str = r#"
    Array.from(document.querySelectorAll("app-matches-list-item a"))
        .map((element) => element.getAttribute("href") || "")
"#;

/// Reads the rendered match list into ids, most-recent-first as the site
/// renders them. An empty list is a valid result, not an error.
pub async fn extract(page: &Page) -> Result<Vec<MatchId>, ScrapeError> {
    let hrefs: Vec<String> = page
        .evaluate(MATCH_LINKS_JS)
        .await
        .map_err(ScrapeError::evaluation)?
        .into_value()
        .map_err(ScrapeError::evaluation)?;

    let ids = ids_from_hrefs(&hrefs);
    debug!(count = ids.len(), "extracted match ids");
    Ok(ids)
}

pub fn ids_from_hrefs(hrefs: &[String]) -> Vec<MatchId> {
    hrefs.iter().filter_map(|href| id_from_href(href)).collect()
}

fn id_from_href(href: &str) -> Option<MatchId> {
    let segment = href.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(MatchId::from(segment))
    }
}
