//! Path-shape dispatch between strategies on a single host.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::Strategy;
use crate::error_handling::StrategyError;
use crate::fetch::Fetcher;
use crate::state::UrlState;

/// Pure test on a URL state, used to pick a composite case.
pub type Predicate = fn(&UrlState) -> bool;

/// Tries its cases in declaration order and applies the first whose predicate
/// holds; otherwise applies the fallback. Exactly one child runs per step.
#[derive(Clone)]
pub struct Conditional {
    name: &'static str,
    cases: Vec<(Predicate, Arc<dyn Strategy>)>,
    fallback: Arc<dyn Strategy>,
}

impl Conditional {
    pub fn new(name: &'static str, fallback: impl Strategy + 'static) -> Self {
        Self {
            name,
            cases: Vec::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Appends a case; earlier cases win over later ones.
    pub fn case(mut self, predicate: Predicate, strategy: impl Strategy + 'static) -> Self {
        self.cases.push((predicate, Arc::new(strategy)));
        self
    }

    fn select(&self, state: &UrlState) -> &dyn Strategy {
        self.cases
            .iter()
            .find(|(predicate, _)| predicate(state))
            .map(|(_, strategy)| strategy.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

impl fmt::Debug for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditional")
            .field("name", &self.name)
            .field(
                "cases",
                &self.cases.iter().map(|(_, s)| s.name()).collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

#[async_trait]
impl Strategy for Conditional {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn apply(
        &self,
        state: &UrlState,
        fetcher: &dyn Fetcher,
    ) -> Result<UrlState, StrategyError> {
        let chosen = self.select(state);
        debug!("{} -> {} for {}", self.name, chosen.name(), state);
        chosen.apply(state, fetcher).await
    }
}
