//! In-memory collaborators for tests in this and downstream crates.

use crate::model::{ActivityEntry, ConnectionRecord};
use crate::traits::ProviderGateway;
use async_trait::async_trait;
use std::sync::Mutex;
use tweetalytics_common::{ConnectionKind, Handle, Result, TweetalyticsError};

/// Gateway serving fixed connection lists and timeline pages.
///
/// Pages past the last configured one come back empty. Every requested page
/// number is recorded.
#[derive(Debug, Default)]
pub struct StaticGateway {
    followers: Vec<ConnectionRecord>,
    friends: Vec<ConnectionRecord>,
    pages: Vec<Vec<ActivityEntry>>,
    fail_with_status: Option<u16>,
    requested_pages: Mutex<Vec<u32>>,
}

impl StaticGateway {
    /// Creates a gateway with nothing to serve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the follower list.
    #[must_use]
    pub fn with_followers(mut self, records: Vec<ConnectionRecord>) -> Self {
        self.followers = records;
        self
    }

    /// Sets the friend list.
    #[must_use]
    pub fn with_friends(mut self, records: Vec<ConnectionRecord>) -> Self {
        self.friends = records;
        self
    }

    /// Appends a timeline page.
    #[must_use]
    pub fn with_page(mut self, entries: Vec<ActivityEntry>) -> Self {
        self.pages.push(entries);
        self
    }

    /// Makes every call fail with a transport error carrying `status`.
    #[must_use]
    pub fn failing(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    /// Page numbers requested so far, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested_pages
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }

    fn check_failure(&self) -> Result<()> {
        match self.fail_with_status {
            Some(status) => Err(TweetalyticsError::transport_with_status(
                "Static gateway failure",
                status,
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProviderGateway for StaticGateway {
    async fn fetch_connections(
        &self,
        _handle: &Handle,
        kind: ConnectionKind,
    ) -> Result<Vec<ConnectionRecord>> {
        self.check_failure()?;
        Ok(match kind {
            ConnectionKind::Followers => self.followers.clone(),
            ConnectionKind::Friends => self.friends.clone(),
        })
    }

    async fn fetch_timeline_page(&self, _handle: &Handle, page: u32) -> Result<Vec<ActivityEntry>> {
        if let Ok(mut requested) = self.requested_pages.lock() {
            requested.push(page);
        }
        self.check_failure()?;

        let index = (page as usize).checked_sub(1);
        Ok(index
            .and_then(|i| self.pages.get(i))
            .cloned()
            .unwrap_or_default())
    }
}
