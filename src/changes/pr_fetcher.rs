use futures_util::stream::{self, StreamExt};

use crate::github::{PlatformClient, PrDetails};

/// Fetch details for each PR number, at most `max_in_flight` queries at once.
///
/// Results come back in input order. A PR whose lookup fails is logged and
/// left out; duplicates in `numbers` are fetched and returned twice.
pub async fn fetch_pr_details(
    platform: &dyn PlatformClient,
    numbers: &[u64],
    max_in_flight: usize,
) -> Vec<PrDetails> {
    if numbers.is_empty() {
        return Vec::new();
    }
    tracing::info!("Fetching details for {} PRs", numbers.len());

    let results: Vec<Option<PrDetails>> = stream::iter(numbers.iter().copied())
        .map(|number| async move {
            match platform.pr_details(number).await {
                Ok(details) => Some(details),
                Err(e) => {
                    tracing::warn!("Could not fetch PR #{}: {}", number, e);
                    None
                }
            }
        })
        .buffered(max_in_flight.max(1))
        .collect()
        .await;

    results.into_iter().flatten().collect()
}
