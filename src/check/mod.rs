//! The version check: list candidates once, filter, resolve.

pub mod log;

#[cfg(test)]
mod tests;

use crate::error::CheckError;
use crate::filter::FilterChain;
use crate::github::PullRequestGateway;
use crate::model::Version;
use crate::resolve::resolve;
use crate::source::ValidatedRequest;

pub use log::CheckLog;

/// Runs version checks against a gateway.
///
/// # Example
///
/// ```no_run
/// use pullwatch::check::VersionCheck;
/// use pullwatch::github::OctocrabGateway;
/// use pullwatch::source::CheckRequest;
///
/// # async fn demo(payload: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let request = CheckRequest::from_json(payload)?.validate()?;
/// let gateway = OctocrabGateway::for_source(&request.source)?;
/// let versions = VersionCheck::new(&gateway).run(&request).await?;
/// println!("{}", serde_json::to_string(&versions)?);
/// # Ok(())
/// # }
/// ```
pub struct VersionCheck<'client, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    gateway: &'client Gateway,
}

impl<'client, Gateway> VersionCheck<'client, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    /// Creates a check backed by `gateway`.
    #[must_use]
    pub const fn new(gateway: &'client Gateway) -> Self {
        Self { gateway }
    }

    /// Produces the versions the pipeline should react to, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ListPullRequests`] or
    /// [`CheckError::ListModifiedFiles`] when the gateway fails.
    pub async fn run(&self, request: &ValidatedRequest) -> Result<Vec<Version>, CheckError> {
        let source = &request.source;
        let previous = request.previous.as_ref();
        let log = CheckLog::new(source.filter.verbosity);

        let candidates = self
            .gateway
            .list_pull_requests(&source.states, &source.page)
            .await
            .map_err(|error| CheckError::ListPullRequests { source: error })?;
        log.previous(previous);

        let survivors = FilterChain::new(&source.filter, previous)
            .select(&candidates, self.gateway)
            .await?;
        log.response_length("before", survivors.len());

        let versions = resolve(survivors, previous);
        log.response_length("after", versions.len());
        Ok(versions)
    }
}
