//! Remote data source

mod http;

pub use http::HttpRemoteSource;

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::models::Quote;

/// Trait for the remote side of a sync cycle
pub trait RemoteSource {
    /// Records changed since `since` (Unix ms); `Error::Network` on failure
    fn fetch_since(&self, since: i64) -> impl Future<Output = Result<Vec<Quote>>> + Send;

    /// Upload the merged set; failures never roll back the local commit
    fn push(&self, quotes: &[Quote]) -> impl Future<Output = Result<()>> + Send;
}

impl<R: RemoteSource + Send + Sync> RemoteSource for Arc<R> {
    fn fetch_since(&self, since: i64) -> impl Future<Output = Result<Vec<Quote>>> + Send {
        (**self).fetch_since(since)
    }

    fn push(&self, quotes: &[Quote]) -> impl Future<Output = Result<()>> + Send {
        (**self).push(quotes)
    }
}
