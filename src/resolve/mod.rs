//! The resolution loop.
//!
//! Starting from the input, the loop repeatedly looks up the current host in
//! the registry and applies its strategy until one of these happens:
//! - the input is not a URL, or the URL has no hostname
//! - the host has no registered strategy (the usual outcome)
//! - the strategy fails or exceeds its deadline
//! - the strategy returns its own input (fixed point) or a URL already seen
//! - the hop ceiling is reached
//!
//! Every outcome yields a URL. Failures are logged and reported through
//! [`StopReason`], never returned to the caller as errors.

mod types;

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use log::{debug, error, warn};

use crate::config::{Config, MAX_RESOLUTION_HOPS, STRATEGY_TIMEOUT};
use crate::error_handling::{InitializationError, StrategyError};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::registry::{self, Registry};
use crate::state::UrlState;
use crate::strategy::Strategy;

pub use types::{Resolution, StopKind, StopReason};

/// Resolver over the built-in registry and default HTTP settings, created on
/// first use. `None` if the HTTP client could not be built.
static DEFAULT_RESOLVER: LazyLock<Option<Resolver>> =
    LazyLock::new(|| match Resolver::from_config(&Config::default()) {
        Ok(resolver) => Some(resolver),
        Err(e) => {
            error!("Failed to initialize default resolver: {e}");
            None
        }
    });

/// Resolves `input` with the built-in registry and default settings.
///
/// Never fails: non-URL text and URLs on unknown hosts come back unchanged.
pub async fn resolve(input: &str) -> String {
    match DEFAULT_RESOLVER.as_ref() {
        Some(resolver) => resolver.resolve(input).await,
        None => input.to_string(),
    }
}

/// Drives strategies from a [`Registry`] over a shared [`Fetcher`].
///
/// Holds no per-resolution state, so one instance can serve any number of
/// concurrent `resolve` calls.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<Registry>,
    fetcher: Arc<dyn Fetcher>,
    max_hops: usize,
    strategy_timeout: Duration,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            registry,
            fetcher,
            max_hops: MAX_RESOLUTION_HOPS,
            strategy_timeout: STRATEGY_TIMEOUT,
        }
    }

    /// Caps the number of strategy invocations per resolution.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Sets the deadline for a single strategy invocation.
    pub fn with_strategy_timeout(mut self, timeout: Duration) -> Self {
        self.strategy_timeout = timeout;
        self
    }

    /// Builds a resolver over the built-in registry and an HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the built-in
    /// table is inconsistent.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let fetcher = HttpFetcher::from_config(config)?;
        let registry = registry::builtin()?;
        Ok(Self::new(Arc::new(registry), Arc::new(fetcher))
            .with_max_hops(config.max_hops)
            .with_strategy_timeout(config.strategy_timeout()))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the best-known URL for `input`.
    pub async fn resolve(&self, input: &str) -> String {
        self.resolve_detailed(input).await.url
    }

    /// Like [`Resolver::resolve`], but also reports every visited URL and
    /// why the loop stopped.
    pub async fn resolve_detailed(&self, input: &str) -> Resolution {
        let Ok(mut current) = UrlState::parse(input) else {
            debug!("(not a URL) {input}");
            return Resolution {
                url: input.to_string(),
                hops: Vec::new(),
                stop: StopReason::NotAUrl,
            };
        };

        let mut hops = vec![current.as_str().to_string()];
        // Termination compares canonical forms; the returned URL stays verbatim.
        let mut visited: HashSet<String> = HashSet::from([current.parsed().to_string()]);
        let mut steps = 0usize;

        let stop = loop {
            debug!("(resolving) {current}");

            let Some(host) = current.host() else {
                break StopReason::NoHostname;
            };
            let Some(strategy) = self.registry.lookup(host) else {
                break StopReason::NoResolver;
            };
            if steps >= self.max_hops {
                warn!(
                    "Hop limit ({}) reached at {current}, stopping",
                    self.max_hops
                );
                break StopReason::HopLimit;
            }
            steps += 1;

            let next = match self.apply_with_deadline(strategy, &current).await {
                Ok(next) => next,
                Err(error) => {
                    warn!(
                        "Strategy {} failed for {host} at {current}: {error}",
                        strategy.name()
                    );
                    break StopReason::StrategyFailed {
                        host: host.to_string(),
                        strategy: strategy.name(),
                        error,
                    };
                }
            };

            if next.parsed() == current.parsed() {
                break StopReason::FixedPoint;
            }
            if !visited.insert(next.parsed().to_string()) {
                warn!("Cycle detected: {current} leads back to {next}, stopping");
                break StopReason::Cycle;
            }
            hops.push(next.as_str().to_string());
            current = next;
        };

        debug!("(resolved) {current} [{stop}]");
        Resolution {
            url: current.into_string(),
            hops,
            stop,
        }
    }

    async fn apply_with_deadline(
        &self,
        strategy: &dyn Strategy,
        state: &UrlState,
    ) -> Result<UrlState, StrategyError> {
        tokio::time::timeout(
            self.strategy_timeout,
            strategy.apply(state, self.fetcher.as_ref()),
        )
        .await
        .unwrap_or(Err(StrategyError::Timeout(self.strategy_timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error_handling::FetchError;
    use crate::fetch::fake::FakeFetcher;
    use crate::strategy::{FollowRedirect, QueryParam, Strategy, StripQuery};

    /// Returns its input unchanged and counts invocations.
    #[derive(Debug, Default)]
    struct Identity {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Strategy for Identity {
        fn name(&self) -> &'static str {
            "identity"
        }

        async fn apply(
            &self,
            state: &UrlState,
            _fetcher: &dyn Fetcher,
        ) -> Result<UrlState, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(state.clone())
        }
    }

    /// `/<n>` to `/<n + 1>` on the same host, forever.
    #[derive(Debug)]
    struct Counter;

    #[async_trait]
    impl Strategy for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn apply(
            &self,
            state: &UrlState,
            _fetcher: &dyn Fetcher,
        ) -> Result<UrlState, StrategyError> {
            let n: usize = state
                .path_segments()
                .first()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            let mut next = state.parsed().clone();
            next.set_path(&(n + 1).to_string());
            Ok(UrlState::from_parsed(next))
        }
    }

    #[derive(Debug)]
    struct Slow;

    #[async_trait]
    impl Strategy for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn apply(
            &self,
            state: &UrlState,
            _fetcher: &dyn Fetcher,
        ) -> Result<UrlState, StrategyError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(state.clone())
        }
    }

    fn resolver(registry: Registry, fetcher: FakeFetcher) -> Resolver {
        Resolver::new(Arc::new(registry), Arc::new(fetcher))
    }

    #[tokio::test]
    async fn test_non_url_passthrough() {
        let resolver = resolver(Registry::new(), FakeFetcher::new());
        for input in ["not a url at all", "", "   ", "example.com/path", "/relative"] {
            let resolution = resolver.resolve_detailed(input).await;
            assert_eq!(resolution.url, input);
            assert_eq!(resolution.stop, StopReason::NotAUrl);
            assert!(resolution.hops.is_empty());
        }
    }

    #[tokio::test]
    async fn test_terminal_host_returns_input_unchanged() {
        let mut registry = Registry::new();
        registry.register("t.co", FollowRedirect).unwrap();
        let fetcher = Arc::new(FakeFetcher::new());
        let resolver = Resolver::new(Arc::new(registry), fetcher.clone());

        for input in [
            "https://video.example.com/clip.mp4",
            "HTTPS://Video.Example.com/clip.mp4?b=2&a=1#t=3",
            "http://example.com",
        ] {
            let resolution = resolver.resolve_detailed(input).await;
            assert_eq!(resolution.url, input);
            assert_eq!(resolution.stop, StopReason::NoResolver);
            assert_eq!(resolution.hop_count(), 0);
        }
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_hostname() {
        let resolver = resolver(Registry::new(), FakeFetcher::new());
        let resolution = resolver.resolve_detailed("mailto:someone@example.com").await;
        assert_eq!(resolution.url, "mailto:someone@example.com");
        assert_eq!(resolution.stop, StopReason::NoHostname);
    }

    #[tokio::test]
    async fn test_query_extract_then_terminal() {
        let mut registry = Registry::new();
        registry.register("short.example", QueryParam::new("u")).unwrap();
        let resolver = resolver(registry, FakeFetcher::new());

        let resolution = resolver
            .resolve_detailed("https://short.example/go?u=https%3A%2F%2Ftarget.example%2Fpage")
            .await;
        assert_eq!(resolution.url, "https://target.example/page");
        assert_eq!(resolution.stop, StopReason::NoResolver);
        assert_eq!(resolution.hop_count(), 1);
    }

    #[tokio::test]
    async fn test_self_redirect_is_fixed_point() {
        let mut registry = Registry::new();
        registry.register("t.example", FollowRedirect).unwrap();
        let fetcher = Arc::new(
            FakeFetcher::new()
                .with_location("https://t.example/t.example", "https://t.example/t.example"),
        );
        let resolver = Resolver::new(Arc::new(registry), fetcher.clone());

        let resolution = resolver.resolve_detailed("https://t.example/t.example").await;
        assert_eq!(resolution.url, "https://t.example/t.example");
        assert_eq!(resolution.stop, StopReason::FixedPoint);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_fixed_point_compares_canonical_form() {
        let mut registry = Registry::new();
        registry.register("t.example", FollowRedirect).unwrap();
        let fetcher = Arc::new(
            FakeFetcher::new()
                .with_location("https://t.example/x", "HTTPS://T.EXAMPLE/x"),
        );
        let resolver = Resolver::new(Arc::new(registry), fetcher.clone());

        let resolution = resolver.resolve_detailed("https://t.example/x").await;
        assert_eq!(resolution.url, "https://t.example/x");
        assert_eq!(resolution.stop, StopReason::FixedPoint);
        assert_eq!(resolution.hop_count(), 0);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_cycle_detection_ignores_case_of_scheme_and_host() {
        let mut registry = Registry::new();
        registry.register("a.example", FollowRedirect).unwrap();
        registry.register("b.example", FollowRedirect).unwrap();
        let fetcher = Arc::new(
            FakeFetcher::new()
                .with_location("https://a.example/", "https://b.example/")
                .with_location("https://b.example/", "HTTPS://A.EXAMPLE/"),
        );
        let resolver = Resolver::new(Arc::new(registry), fetcher.clone());

        let resolution = resolver.resolve_detailed("https://a.example/").await;
        assert_eq!(resolution.url, "https://b.example/");
        assert_eq!(resolution.stop, StopReason::Cycle);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_fixed_point_after_exactly_one_invocation() {
        let identity = Identity::default();
        let calls = Arc::clone(&identity.calls);
        let mut registry = Registry::new();
        registry.register("h.example", identity).unwrap();
        let resolver = resolver(registry, FakeFetcher::new());

        for input in ["https://h.example/a?x=1", "https://h.example/"] {
            calls.store(0, Ordering::SeqCst);
            let resolution = resolver.resolve_detailed(input).await;
            assert_eq!(resolution.url, input);
            assert_eq!(resolution.stop, StopReason::FixedPoint);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_strip_all_on_registered_host() {
        let mut registry = Registry::new();
        registry.register("site.example", StripQuery::all()).unwrap();
        let resolver = resolver(registry, FakeFetcher::new());

        let resolution = resolver
            .resolve_detailed("https://site.example/page?utm_source=x&id=5")
            .await;
        assert_eq!(resolution.url, "https://site.example/page");
        assert_eq!(resolution.stop, StopReason::FixedPoint);
        assert_eq!(
            resolution.hops,
            vec![
                "https://site.example/page?utm_source=x&id=5",
                "https://site.example/page"
            ]
        );
    }

    #[tokio::test]
    async fn test_two_hop_chain() {
        let mut registry = Registry::new();
        registry.register("short1.example", QueryParam::new("u")).unwrap();
        registry.register("short2.example", FollowRedirect).unwrap();
        let fetcher = FakeFetcher::new()
            .with_location("https://short2.example/abc", "https://final.example/article?id=9");
        let resolver = resolver(registry, fetcher);

        let resolution = resolver
            .resolve_detailed("https://short1.example/?u=https%3A%2F%2Fshort2.example%2Fabc")
            .await;
        assert_eq!(resolution.url, "https://final.example/article?id=9");
        assert_eq!(resolution.stop, StopReason::NoResolver);
        assert_eq!(
            resolution.hops,
            vec![
                "https://short1.example/?u=https%3A%2F%2Fshort2.example%2Fabc",
                "https://short2.example/abc",
                "https://final.example/article?id=9",
            ]
        );
    }

    #[tokio::test]
    async fn test_strategy_failure_returns_last_good_url() {
        let mut registry = Registry::new();
        registry.register("short1.example", QueryParam::new("u")).unwrap();
        registry.register("short2.example", FollowRedirect).unwrap();
        let resolver = resolver(registry, FakeFetcher::new());

        let resolution = resolver
            .resolve_detailed("https://short1.example/?u=https%3A%2F%2Fshort2.example%2Fabc")
            .await;
        assert_eq!(resolution.url, "https://short2.example/abc");
        assert_eq!(
            resolution.stop,
            StopReason::StrategyFailed {
                host: "short2.example".to_string(),
                strategy: "redirect-follow",
                error: StrategyError::Fetch(FetchError::MissingLocation(
                    "https://short2.example/abc".to_string()
                )),
            }
        );
    }

    #[tokio::test]
    async fn test_failure_on_first_step_returns_input() {
        let mut registry = Registry::new();
        registry.register("short.example", QueryParam::new("u")).unwrap();
        let resolver = resolver(registry, FakeFetcher::new());

        let input = "https://short.example/go?x=1";
        let resolution = resolver.resolve_detailed(input).await;
        assert_eq!(resolution.url, input);
        assert_eq!(resolution.stop.kind(), StopKind::StrategyFailed);
    }

    #[tokio::test]
    async fn test_cycle_stops_at_url_that_produced_repeat() {
        let mut registry = Registry::new();
        registry.register("a.example", FollowRedirect).unwrap();
        registry.register("b.example", FollowRedirect).unwrap();
        let fetcher = Arc::new(
            FakeFetcher::new()
                .with_location("https://a.example/", "https://b.example/")
                .with_location("https://b.example/", "https://a.example/"),
        );
        let resolver = Resolver::new(Arc::new(registry), fetcher.clone());

        let resolution = resolver.resolve_detailed("https://a.example/").await;
        assert_eq!(resolution.url, "https://b.example/");
        assert_eq!(resolution.stop, StopReason::Cycle);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_hop_limit() {
        let mut registry = Registry::new();
        registry.register("loop.example", Counter).unwrap();
        let resolver = resolver(registry, FakeFetcher::new()).with_max_hops(3);

        let resolution = resolver.resolve_detailed("https://loop.example/0").await;
        assert_eq!(resolution.url, "https://loop.example/3");
        assert_eq!(resolution.stop, StopReason::HopLimit);
        assert_eq!(resolution.hop_count(), 3);
    }

    #[tokio::test]
    async fn test_zero_hop_limit_never_invokes_strategy() {
        let identity = Identity::default();
        let calls = Arc::clone(&identity.calls);
        let mut registry = Registry::new();
        registry.register("h.example", identity).unwrap();
        let resolver = resolver(registry, FakeFetcher::new()).with_max_hops(0);

        let resolution = resolver.resolve_detailed("https://h.example/").await;
        assert_eq!(resolution.stop, StopReason::HopLimit);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_step_timeout_is_a_strategy_failure() {
        let mut registry = Registry::new();
        registry.register("slow.example", Slow).unwrap();
        let timeout = Duration::from_millis(50);
        let resolver = resolver(registry, FakeFetcher::new()).with_strategy_timeout(timeout);

        let resolution = resolver.resolve_detailed("https://slow.example/x").await;
        assert_eq!(resolution.url, "https://slow.example/x");
        assert_eq!(
            resolution.stop,
            StopReason::StrategyFailed {
                host: "slow.example".to_string(),
                strategy: "slow",
                error: StrategyError::Timeout(timeout),
            }
        );
    }

    #[tokio::test]
    async fn test_builtin_registry_chain() {
        // al.dmm.co.jp lurl -> dmm.co.jp host rewrite -> www.dmm.co.jp strip
        let fetcher = FakeFetcher::new();
        let resolver = resolver(registry::builtin().unwrap(), fetcher);

        let resolution = resolver
            .resolve_detailed(
                "https://al.dmm.co.jp/?lurl=https%3A%2F%2Fdmm.co.jp%2Fdigital%2Fvideoa%2F%3Fi3_ref%3Dx&af_id=abc",
            )
            .await;
        assert_eq!(resolution.url, "https://www.dmm.co.jp/digital/videoa/");
        assert_eq!(resolution.stop, StopReason::FixedPoint);
        assert_eq!(resolution.hop_count(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_share_resolver() {
        let mut registry = Registry::new();
        registry.register("short.example", QueryParam::new("u")).unwrap();
        let resolver = resolver(registry, FakeFetcher::new());

        let inputs: Vec<String> = (0..16)
            .map(|i| format!("https://short.example/?u=https%3A%2F%2Ft{i}.example%2F"))
            .collect();
        let results =
            futures::future::join_all(inputs.iter().map(|input| resolver.resolve(input))).await;
        for (i, url) in results.iter().enumerate() {
            assert_eq!(url, &format!("https://t{i}.example/"));
        }
    }
}
