// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flattens the accounts -> locations hierarchy into one list.
//!
//! A failing account contributes no locations and is reported as a warning;
//! it never fails the whole listing.

use futures_util::{stream, StreamExt};

use crate::error::AppError;
use crate::models::{Account, BusinessLocation};
use crate::services::google::GoogleClient;

/// Location listings in flight at once.
const MAX_CONCURRENT_ACCOUNTS: usize = 8;

/// An account whose location listing failed.
#[derive(Debug)]
pub struct AccountFailure {
    pub account_id: String,
    pub error: AppError,
}

/// Result of one aggregation pass.
#[derive(Debug, Default)]
pub struct Directory {
    pub locations: Vec<BusinessLocation>,
    pub failures: Vec<AccountFailure>,
}

/// Merge per-account results, in order, tagging each location with its account.
pub fn merge_account_results<I>(results: I) -> Directory
where
    I: IntoIterator<Item = (String, Result<Vec<BusinessLocation>, AppError>)>,
{
    let mut directory = Directory::default();

    for (account_id, result) in results {
        match result {
            Ok(locations) => {
                directory
                    .locations
                    .extend(locations.into_iter().map(|mut location| {
                        location.account_id = account_id.clone();
                        location
                    }));
            }
            Err(error) => directory.failures.push(AccountFailure { account_id, error }),
        }
    }

    directory
}

/// List every location of every account visible to `access_token`.
///
/// Fails only if the account listing itself fails.
pub async fn aggregate_locations(
    client: &GoogleClient,
    access_token: &str,
) -> Result<Directory, AppError> {
    let accounts: Vec<Account> = client.list_accounts(access_token).await?;
    tracing::debug!(count = accounts.len(), "Google Business accounts listed");

    let results: Vec<(String, Result<Vec<BusinessLocation>, AppError>)> = stream::iter(accounts)
        .map(|account| async move {
            let account_id = account.account_id().to_string();
            let result = client.list_locations(access_token, &account_id).await;
            (account_id, result)
        })
        .buffered(MAX_CONCURRENT_ACCOUNTS)
        .collect()
        .await;

    let directory = merge_account_results(results);

    for failure in &directory.failures {
        tracing::warn!(
            account_id = %failure.account_id,
            status = ?failure.error.upstream_status(),
            detail = %failure.error.detail(),
            "Failed to fetch locations for account, skipping"
        );
    }

    tracing::info!(
        locations = directory.locations.len(),
        failed_accounts = directory.failures.len(),
        "Business directory aggregated"
    );

    Ok(directory)
}
