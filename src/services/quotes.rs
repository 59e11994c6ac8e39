use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::warn;

use crate::external::price_provider::{PriceProvider, PriceProviderError, Quote};
use crate::services::symbols;

/// TTL cache for quotes. Injectable and owned by the quote service, so the
/// portfolio engine stays free of hidden price state.
pub struct QuoteCache {
    entries: DashMap<String, CachedQuote>,
    ttl: Duration,
}

#[derive(Clone)]
struct CachedQuote {
    quote: Quote,
    fetched_at: DateTime<Utc>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, symbol: &str) -> Option<Quote> {
        if let Some(entry) = self.entries.get(symbol) {
            let cached = entry.value().clone();
            if Utc::now() < cached.fetched_at + self.ttl {
                return Some(cached.quote);
            }
            drop(entry);
            self.entries.remove(symbol);
        }
        None
    }

    pub fn insert(&self, symbol: String, quote: Quote) {
        self.entries.insert(
            symbol,
            CachedQuote {
                quote,
                fetched_at: Utc::now(),
            },
        );
    }
}

/// Read-path price collaborator: provider behind a TTL cache. Used by quote
/// lookups and to resolve trade prices before the engine is invoked, never
/// from inside an engine operation.
pub struct QuoteService {
    provider: Arc<dyn PriceProvider>,
    cache: QuoteCache,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn PriceProvider>, cache: QuoteCache) -> Self {
        Self { provider, cache }
    }

    pub async fn latest(&self, symbol: &str) -> Result<Quote, PriceProviderError> {
        let key = symbols::normalize(symbol);
        if let Some(quote) = self.cache.get(&key) {
            return Ok(quote);
        }
        let quote = self.provider.latest_quote(&key).await?;
        self.cache.insert(key, quote.clone());
        Ok(quote)
    }

    /// Best-effort price map for a set of symbols. Feed failures degrade to
    /// an absent entry, which valuation treats as "market value unknown".
    pub async fn prices_for<'a, I>(&self, symbols: I) -> HashMap<String, BigDecimal>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut prices = HashMap::new();
        for symbol in symbols {
            match self.latest(symbol).await {
                Ok(quote) => {
                    prices.insert(symbols::normalize(symbol), quote.price);
                }
                Err(e) => {
                    warn!(symbol, error = %e, "quote unavailable, skipping");
                }
            }
        }
        prices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceProvider for CountingProvider {
        async fn latest_quote(&self, symbol: &str) -> Result<Quote, PriceProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Quote {
                symbol: symbol.to_string(),
                price: "42.5".parse().unwrap(),
                as_of: Utc::now(),
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl PriceProvider for FailingProvider {
        async fn latest_quote(&self, _symbol: &str) -> Result<Quote, PriceProviderError> {
            Err(PriceProviderError::Network("down".into()))
        }
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_hits_cache() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = QuoteService::new(provider.clone(), QuoteCache::new(Duration::seconds(60)));

        service.latest("AAPL").await.unwrap();
        service.latest("AAPL").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_refetches() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = QuoteService::new(provider.clone(), QuoteCache::new(Duration::seconds(-1)));

        service.latest("AAPL").await.unwrap();
        service.latest("AAPL").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn suffixed_symbol_shares_cache_entry_with_bare_form() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = QuoteService::new(provider.clone(), QuoteCache::new(Duration::seconds(60)));

        service.latest("INFY.NS").await.unwrap();
        service.latest("infy").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_symbols_are_skipped_in_price_map() {
        let service = QuoteService::new(Arc::new(FailingProvider), QuoteCache::new(Duration::seconds(60)));
        let prices = service.prices_for(["AAPL"]).await;
        assert!(prices.is_empty());
    }
}
