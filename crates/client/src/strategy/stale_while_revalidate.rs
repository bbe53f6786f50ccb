//! Stale-while-revalidate: answer from the general store, refresh in the background.
//!
//! The refresh runs as a detached task. Its outcome is reported through
//! [`Revalidation`] and never changes a response that was already served
//! from cache; a refreshed entry is only visible to later requests.

use swcache_core::{Error, RequestDescriptor, ResponseDescriptor};
use tokio::task::JoinHandle;

use super::{Served, StrategyContext};

/// Outcome of a background refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevalidateOutcome {
    /// Fetched successfully and written to the general store.
    Refreshed(ResponseDescriptor),
    /// Fetched, but not written (non-success status or store write failure).
    NotStored(ResponseDescriptor),
    /// The network could not produce a response.
    Failed(String),
}

/// Handle to a detached refresh task. Dropping it does not cancel the task.
#[derive(Debug)]
pub struct Revalidation {
    handle: JoinHandle<RevalidateOutcome>,
}

impl Revalidation {
    fn spawn(ctx: StrategyContext, request: RequestDescriptor) -> Self {
        let handle = tokio::spawn(async move {
            match ctx.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    if ctx.store_copy(&ctx.stores.general_store, &request, &response).await {
                        RevalidateOutcome::Refreshed(response)
                    } else {
                        RevalidateOutcome::NotStored(response)
                    }
                }
                Ok(response) => RevalidateOutcome::NotStored(response),
                Err(e) => {
                    tracing::debug!("revalidation failed for {}: {}", request.url, e);
                    RevalidateOutcome::Failed(e.to_string())
                }
            }
        });
        Self { handle }
    }

    /// Wait for the refresh to finish.
    pub async fn outcome(self) -> RevalidateOutcome {
        self.handle
            .await
            .unwrap_or_else(|e| RevalidateOutcome::Failed(format!("revalidation task aborted: {e}")))
    }
}

pub async fn stale_while_revalidate(ctx: &StrategyContext, request: &RequestDescriptor) -> Result<Served, Error> {
    let cached = ctx.storage.match_in(&ctx.stores.general_store, request).await?;
    let revalidation = Revalidation::spawn(ctx.clone(), request.clone());

    if let Some(cached) = cached {
        tracing::debug!("serving stale copy of {} while revalidating", request.url);
        return Ok(Served { revalidation: Some(revalidation), ..Served::cached(cached) });
    }

    match revalidation.outcome().await {
        RevalidateOutcome::Refreshed(response) | RevalidateOutcome::NotStored(response) => Ok(Served::network(response)),
        RevalidateOutcome::Failed(_) => Ok(Served::offline()),
    }
}
