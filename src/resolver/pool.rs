//! Resolver pool management.
//!
//! # Responsibilities
//! - Build the endpoint set from the raw configuration string
//! - Drop invalid tokens and duplicates, keeping first occurrences
//! - Produce a fresh random visiting order per dispatch

use rand::seq::SliceRandom;

use crate::error::ConfigurationError;
use crate::resolver::endpoint::{HostPolicy, ResolverEndpoint};

/// Immutable, non-empty set of resolver endpoints.
///
/// Shared read-only across all dispatches; ordering carries no meaning.
#[derive(Debug, Clone)]
pub struct ResolverPool {
    endpoints: Vec<ResolverEndpoint>,
}

impl ResolverPool {
    /// Build a pool, accepting loopback and local hosts.
    pub fn build(raw: &str, separator: &str) -> Result<Self, ConfigurationError> {
        Self::build_with_policy(raw, separator, HostPolicy::AllowLocal)
    }

    /// Build a pool under an explicit host policy.
    pub fn build_with_policy(
        raw: &str,
        separator: &str,
        policy: HostPolicy,
    ) -> Result<Self, ConfigurationError> {
        if separator.is_empty() {
            return Err(ConfigurationError::EmptySeparator);
        }

        let mut endpoints: Vec<ResolverEndpoint> = Vec::new();
        for token in raw.split(separator).map(str::trim).filter(|t| !t.is_empty()) {
            match ResolverEndpoint::parse(token, policy) {
                Ok(endpoint) => {
                    if !endpoints.contains(&endpoint) {
                        endpoints.push(endpoint);
                    }
                }
                Err(reason) => {
                    tracing::warn!(token = %token, reason = %reason, "Ignoring invalid resolver endpoint");
                }
            }
        }

        if endpoints.is_empty() {
            return Err(ConfigurationError::EmptyResolverPool(raw.to_string()));
        }

        tracing::debug!(count = endpoints.len(), "Resolver pool built");
        Ok(Self { endpoints })
    }

    /// All pool members in a uniformly random order, each exactly once.
    pub fn pick_order(&self) -> Vec<&ResolverEndpoint> {
        let mut order: Vec<&ResolverEndpoint> = self.endpoints.iter().collect();
        order.shuffle(&mut rand::thread_rng());
        order
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always false for a successfully built pool.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Members in configuration order.
    pub fn endpoints(&self) -> &[ResolverEndpoint] {
        &self.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn duplicates_and_invalid_tokens_collapse() {
        let pool = ResolverPool::build("https://p1/x,https://p1/x,not-a-url", ",").unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.endpoints()[0].as_str(), "https://p1/x");
    }

    #[test]
    fn first_occurrence_order_is_kept() {
        let pool = ResolverPool::build(
            "http://b.example.com/r, http://a.example.com/r ,http://b.example.com/r,,",
            ",",
        )
        .unwrap();
        let members: Vec<&str> = pool.endpoints().iter().map(|e| e.as_str()).collect();
        assert_eq!(members, vec!["http://b.example.com/r", "http://a.example.com/r"]);
    }

    #[test]
    fn case_is_not_folded() {
        let pool = ResolverPool::build("https://p1/X,https://p1/x", ",").unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn custom_separator() {
        let pool = ResolverPool::build("https://p1/x|https://p2/x", "|").unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn empty_or_invalid_config_is_rejected() {
        for raw in ["", "   ", ",,", "not-a-url", "ftp://p1/x,also bad"] {
            assert!(
                matches!(ResolverPool::build(raw, ","), Err(ConfigurationError::EmptyResolverPool(_))),
                "{:?}",
                raw
            );
        }
        assert_eq!(
            ResolverPool::build("https://p1/x", "").unwrap_err(),
            ConfigurationError::EmptySeparator
        );
    }

    #[test]
    fn public_only_policy_drops_local_endpoints() {
        let result = ResolverPool::build_with_policy("http://localhost/r", ",", HostPolicy::PublicOnly);
        assert!(result.is_err());

        let pool = ResolverPool::build_with_policy(
            "http://localhost/r,https://resolver.example.com/r",
            ",",
            HostPolicy::PublicOnly,
        )
        .unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn pick_order_is_a_permutation() {
        for n in 1..=8 {
            let raw: Vec<String> = (0..n).map(|i| format!("https://p{}.example.com/r", i)).collect();
            let pool = ResolverPool::build(&raw.join(","), ",").unwrap();

            for _ in 0..20 {
                let order = pool.pick_order();
                assert_eq!(order.len(), n);
                let unique: HashSet<&str> = order.iter().map(|e| e.as_str()).collect();
                assert_eq!(unique.len(), n);
                assert!(raw.iter().all(|r| unique.contains(r.as_str())));
            }
        }
    }

    #[test]
    fn pick_order_varies_between_calls() {
        let raw: Vec<String> = (0..6).map(|i| format!("https://p{}.example.com/r", i)).collect();
        let pool = ResolverPool::build(&raw.join(","), ",").unwrap();

        let first: Vec<String> = pool.pick_order().iter().map(|e| e.to_string()).collect();
        let varied = (0..50).any(|_| {
            let next: Vec<String> = pool.pick_order().iter().map(|e| e.to_string()).collect();
            next != first
        });
        assert!(varied, "50 shuffles of 6 endpoints never changed order");
    }
}
