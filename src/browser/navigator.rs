use std::time::Duration;

use chromiumoxide::Page;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

use super::errors::ScrapeError;
use crate::config::{Credentials, ScrapeTarget};

/// Hard ceiling on the match-list readiness poll. The rest of the login
/// protocol is bounded only by Chrome's own navigation timeout.
pub const MATCH_LIST_READY_TIMEOUT: Duration = Duration::from_millis(30_000);

const DOM_POLL_INTERVAL: Duration = Duration::from_millis(250);

const EMAIL_INPUT: &str = r#"input[type="email"]"#;
const PASSWORD_INPUT: &str = r#"input[type="password"]"#;
const SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;
const MATCH_LIST_ITEM: &str = "app-matches-list-item";

/// Drives `page` through the login form and leaves it positioned at the
/// match-list URL with at least one match-list item rendered.
///
/// Strictly ordered, no retries: any step failure abandons the whole
/// navigation. There is no partial-success state.
pub async fn login(
    page: &Page,
    credentials: &Credentials,
    target: &ScrapeTarget,
) -> Result<(), ScrapeError> {
    debug!(url = %target.login_url, "opening login page");
    page.goto(target.login_url.as_str())
        .await
        .map_err(ScrapeError::navigation)?;

    wait_for_element(page, EMAIL_INPUT).await?;

    type_into(page, EMAIL_INPUT, &credentials.email).await?;
    type_into(page, PASSWORD_INPUT, &credentials.password).await?;

    page.find_element(SUBMIT_BUTTON)
        .await
        .map_err(|_| ScrapeError::ElementNotFound(SUBMIT_BUTTON))?
        .click()
        .await
        .map_err(ScrapeError::navigation)?;
    page.wait_for_navigation()
        .await
        .map_err(ScrapeError::navigation)?;

    debug!(url = %target.match_list_url, "opening match list");
    page.goto(target.match_list_url.as_str())
        .await
        .map_err(ScrapeError::navigation)?;

    wait_for_match_list(page).await?;
    info!("login complete, match list ready");
    Ok(())
}

async fn type_into(page: &Page, selector: &'static str, text: &str) -> Result<(), ScrapeError> {
    let element = page
        .find_element(selector)
        .await
        .map_err(|_| ScrapeError::ElementNotFound(selector))?;
    element.click().await.map_err(ScrapeError::navigation)?;
    element.type_str(text).await.map_err(ScrapeError::navigation)?;
    Ok(())
}

// Unbounded on purpose: appearance of the element is gated on the page's
// own navigation, which Chrome already times out.
async fn wait_for_element(page: &Page, selector: &'static str) -> Result<(), ScrapeError> {
    loop {
        if element_exists(page, selector).await? {
            return Ok(());
        }
        sleep(DOM_POLL_INTERVAL).await;
    }
}

/// Polls the DOM until at least one match-list item is rendered, failing
/// with [`ScrapeError::MatchListTimeout`] after 30 seconds.
pub async fn wait_for_match_list(page: &Page) -> Result<(), ScrapeError> {
    let ready = async {
        loop {
            if element_exists(page, MATCH_LIST_ITEM).await? {
                return Ok(());
            }
            sleep(DOM_POLL_INTERVAL).await;
        }
    };

    timeout(MATCH_LIST_READY_TIMEOUT, ready)
        .await
        .map_err(|_| ScrapeError::MatchListTimeout(MATCH_LIST_READY_TIMEOUT.as_millis() as u64))?
}

async fn element_exists(page: &Page, selector: &str) -> Result<bool, ScrapeError> {
    let expression = format!("document.querySelectorAll('{selector}').length > 0");
    page.evaluate(expression)
        .await
        .map_err(ScrapeError::evaluation)?
        .into_value::<bool>()
        .map_err(ScrapeError::evaluation)
}
