//! Hostname to strategy dispatch table.
//!
//! The registry is built once and then only read, so a single instance can be
//! shared across concurrent resolutions behind an `Arc` without locking.
//! Lookups are exact matches on the lowercase hostname of the parsed URL;
//! a miss is the normal "final destination" outcome.

mod builtin;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error_handling::RegistryError;
use crate::strategy::Strategy;

pub use builtin::builtin;

/// Maps each supported hostname to exactly one strategy.
#[derive(Default, Clone)]
pub struct Registry {
    entries: HashMap<String, Arc<dyn Strategy>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `strategy` for `host`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateHost` if `host` already has an entry
    /// and `RegistryError::EmptyHost` for an empty hostname.
    /// `RegistryError::UppercaseHost` rejects hostnames that are not lowercase.
    pub fn register(
        &mut self,
        host: &str,
        strategy: impl Strategy + 'static,
    ) -> Result<(), RegistryError> {
        self.register_shared(host, Arc::new(strategy))
    }

    /// Registers one strategy instance that may also serve other hosts.
    pub fn register_shared(
        &mut self,
        host: &str,
        strategy: Arc<dyn Strategy>,
    ) -> Result<(), RegistryError> {
        if host.is_empty() {
            return Err(RegistryError::EmptyHost);
        }
        if host.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(RegistryError::UppercaseHost(host.to_string()));
        }
        if self.entries.contains_key(host) {
            return Err(RegistryError::DuplicateHost(host.to_string()));
        }
        self.entries.insert(host.to_string(), strategy);
        Ok(())
    }

    /// Registers a shared strategy for every host in `hosts`.
    pub fn register_all(
        &mut self,
        hosts: &[&str],
        strategy: Arc<dyn Strategy>,
    ) -> Result<(), RegistryError> {
        for host in hosts {
            self.register_shared(host, Arc::clone(&strategy))?;
        }
        Ok(())
    }

    pub fn lookup(&self, host: &str) -> Option<&dyn Strategy> {
        self.entries.get(host).map(|strategy| strategy.as_ref())
    }

    pub fn contains(&self, host: &str) -> bool {
        self.entries.contains_key(host)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered hostnames, sorted.
    pub fn hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.hosts()
                    .into_iter()
                    .filter_map(|host| self.lookup(host).map(|s| (host, s.name()))),
            )
            .finish()
    }
}
