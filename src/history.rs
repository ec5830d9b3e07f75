use crate::error::RiotError;
use crate::riot_api::{MAX_PAGE_SIZE, RiotClient};
use log::debug;

/// Collects up to `total_wanted` match ids for `puuid`, most recent first.
///
/// Pages are requested at most [`MAX_PAGE_SIZE`] at a time and never for
/// more than is still wanted. An empty page means the history is exhausted;
/// whatever was collected so far is returned.
pub fn fetch_history(
    client: &RiotClient,
    puuid: &str,
    total_wanted: usize,
) -> Result<Vec<String>, RiotError> {
    let mut match_ids: Vec<String> = Vec::new();
    let mut start = 0usize;

    while match_ids.len() < total_wanted {
        let count = MAX_PAGE_SIZE.min(total_wanted - match_ids.len());
        let page = client.get_match_ids_page(puuid, start, count)?;

        debug!(
            "History page start={} count={} returned {} ids",
            start,
            count,
            page.len()
        );

        if page.is_empty() {
            break;
        }

        match_ids.extend(page);
        start += count;
    }

    Ok(match_ids)
}
