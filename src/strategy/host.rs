//! Host-rewrite strategy for mirror and alias hosts.

use async_trait::async_trait;

use super::Strategy;
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

/// Replaces the network location, keeping path, query and fragment.
///
/// The replacement is a whole network location, so credentials and an
/// explicit port on the alias host are dropped as well.
#[derive(Debug, Clone)]
pub struct ReplaceHost {
    host: String,
}

impl ReplaceHost {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub(crate) fn rewrite(&self, state: &UrlState) -> Result<UrlState, StrategyError> {
        let mut parsed = state.parsed().clone();
        parsed
            .set_host(Some(&self.host))
            .map_err(|e| StrategyError::InvalidTarget(format!("{}: {e}", self.host)))?;
        // Only cannot-be-a-base URLs reject these, and set_host already did.
        let _ = parsed.set_username("");
        let _ = parsed.set_password(None);
        let _ = parsed.set_port(None);
        Ok(UrlState::from_parsed(parsed))
    }
}

#[async_trait]
impl Strategy for ReplaceHost {
    fn name(&self) -> &'static str {
        "host-rewrite"
    }

    async fn apply(
        &self,
        state: &UrlState,
        _fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        self.rewrite(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::FakeFetcher;

    #[tokio::test]
    async fn test_rewrites_host_only() {
        let state = UrlState::parse("https://dlaf.jp/maniax/dlaf/=/link/work/aid/x?a=1#f").unwrap();
        let next = ReplaceHost::new("www.dlsite.com")
            .apply(&state, &FakeFetcher::new())
            .await
            .unwrap();
        assert_eq!(
            next.as_str(),
            "https://www.dlsite.com/maniax/dlaf/=/link/work/aid/x?a=1#f"
        );
    }

    #[test]
    fn test_rewrite_drops_port_and_credentials() {
        let state = UrlState::parse("http://user:pw@dmm.co.jp:8080/digital/").unwrap();
        let next = ReplaceHost::new("www.dmm.co.jp").rewrite(&state).unwrap();
        assert_eq!(next.as_str(), "http://www.dmm.co.jp/digital/");
    }

    #[test]
    fn test_rewrite_rejects_invalid_host() {
        let state = UrlState::parse("https://dlaf.jp/").unwrap();
        let err = ReplaceHost::new("bad host").rewrite(&state).unwrap_err();
        assert!(matches!(err, StrategyError::InvalidTarget(_)));
    }
}
