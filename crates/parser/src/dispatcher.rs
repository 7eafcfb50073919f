//! Version dispatcher with result caching

use crate::strategy::{ConversionStrategy, ModelingStrategy};
use raml_api_docs_common::{
    ConversionError, ConversionSettings, ParserConfig, RamlVersion, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Snapshot of cache activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Converts RAML definitions to OpenAPI 2.0, dispatching on the declared version
///
/// Results are memoized per (version, definition) for the lifetime of the
/// parser. Concurrent identical requests are not coalesced; each miss
/// invokes the strategy.
pub struct RamlParser {
    strategies: HashMap<RamlVersion, Arc<dyn ConversionStrategy>>,
    cache: papaya::HashMap<String, String>,
    cache_enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Builder for [`RamlParser`] with explicit strategy registration
pub struct RamlParserBuilder {
    strategies: HashMap<RamlVersion, Arc<dyn ConversionStrategy>>,
    cache_enabled: bool,
}

impl RamlParserBuilder {
    /// Register the strategy used for `version`, replacing any previous one
    pub fn strategy(mut self, version: RamlVersion, strategy: Arc<dyn ConversionStrategy>) -> Self {
        self.strategies.insert(version, strategy);
        self
    }

    /// Register the built-in 0.8 and 1.0 strategies
    pub fn builtin_strategies(self) -> Self {
        self.strategy(RamlVersion::V08, Arc::new(ModelingStrategy::raml08()))
            .strategy(RamlVersion::V10, Arc::new(ModelingStrategy::raml10()))
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn build(self) -> RamlParser {
        RamlParser {
            strategies: self.strategies,
            cache: papaya::HashMap::new(),
            cache_enabled: self.cache_enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl RamlParser {
    /// Parser with the built-in strategies and caching enabled
    pub fn new() -> Self {
        Self::builder().builtin_strategies().build()
    }

    /// Builder with no strategies registered
    pub fn builder() -> RamlParserBuilder {
        RamlParserBuilder {
            strategies: HashMap::new(),
            cache_enabled: true,
        }
    }

    /// Parser with the built-in strategies configured from settings
    pub fn from_settings(settings: &ConversionSettings) -> Self {
        Self::builder()
            .builtin_strategies()
            .cache_enabled(settings.cache_enabled)
            .build()
    }

    /// Process-wide parser shared by every adapter that does not bring its own
    pub fn shared() -> Arc<RamlParser> {
        static SHARED: OnceLock<Arc<RamlParser>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(RamlParser::new())))
    }

    /// Convert a definition to OpenAPI 2.0 using the strategy for `config.version`
    pub async fn parse(&self, definition: &str, config: &ParserConfig) -> Result<String> {
        let key = cache_key(config.version, definition);

        if self.cache_enabled {
            if let Some(cached) = self.cache.pin().get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Conversion cache hit for RAML {}", config.version);
                return Ok(cached.clone());
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
        }

        let strategy = self
            .strategies
            .get(&config.version)
            .ok_or_else(|| ConversionError::UnsupportedVersion(config.version.to_string()))?;

        tracing::debug!(
            "Converting RAML {} definition to {}",
            config.version,
            config.output_format
        );
        let result = strategy.parse(definition).await?;

        if self.cache_enabled {
            self.cache.pin().insert(key, result.clone());
        }
        Ok(result)
    }

    /// Convert a definition declared with a raw version string (e.g., "0.8")
    ///
    /// Unknown versions fail before any strategy is invoked.
    pub async fn parse_version(&self, definition: &str, version: &str) -> Result<String> {
        let version: RamlVersion = version.parse()?;
        self.parse(definition, &ParserConfig::new(version)).await
    }

    /// Drop every cached conversion
    pub fn clear_cache(&self) {
        self.cache.pin().clear();
        tracing::debug!("Conversion cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
        }
    }

    /// Versions with a registered strategy
    pub fn supports(&self, version: RamlVersion) -> bool {
        self.strategies.contains_key(&version)
    }
}

impl Default for RamlParser {
    fn default() -> Self {
        Self::new()
    }
}

fn cache_key(version: RamlVersion, definition: &str) -> String {
    format!("{}-{}", version, definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::MockConversionStrategy;
    use raml_api_docs_common::ModelingError;

    const MOCK_OUTPUT: &str = r#"{"openapi": "3.0.0"}"#;

    fn counting_strategy(times: usize) -> MockConversionStrategy {
        let mut strategy = MockConversionStrategy::new();
        strategy
            .expect_parse()
            .times(times)
            .returning(|_| Ok(MOCK_OUTPUT.to_string()));
        strategy
    }

    #[tokio::test]
    async fn test_dispatches_raml08() {
        let definition = "#%RAML 0.8\ntitle: Test API";

        let mut v08 = MockConversionStrategy::new();
        v08.expect_parse()
            .withf(move |d: &str| d == definition)
            .times(1)
            .returning(|_| Ok(MOCK_OUTPUT.to_string()));
        let mut v10 = MockConversionStrategy::new();
        v10.expect_parse().never();

        let parser = RamlParser::builder()
            .strategy(RamlVersion::V08, Arc::new(v08))
            .strategy(RamlVersion::V10, Arc::new(v10))
            .build();

        let result = parser
            .parse(definition, &ParserConfig::new(RamlVersion::V08))
            .await
            .unwrap();
        assert_eq!(result, MOCK_OUTPUT);
    }

    #[tokio::test]
    async fn test_caches_results() {
        let definition = "#%RAML 1.0\ntitle: Test API";
        let config = ParserConfig::new(RamlVersion::V10);
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V10, Arc::new(counting_strategy(1)))
            .build();

        let first = parser.parse(definition, &config).await.unwrap();
        let second = parser.parse(definition, &config).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            parser.cache_stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[tokio::test]
    async fn test_version_is_part_of_cache_key() {
        let definition = "title: Test API";
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V08, Arc::new(counting_strategy(1)))
            .strategy(RamlVersion::V10, Arc::new(counting_strategy(1)))
            .build();

        parser
            .parse(definition, &ParserConfig::new(RamlVersion::V08))
            .await
            .unwrap();
        parser
            .parse(definition, &ParserConfig::new(RamlVersion::V10))
            .await
            .unwrap();

        assert_eq!(parser.cache_stats().entries, 2);
    }

    #[tokio::test]
    async fn test_clear_cache_reinvokes_strategy() {
        let definition = "#%RAML 1.0\ntitle: Test API";
        let config = ParserConfig::new(RamlVersion::V10);
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V10, Arc::new(counting_strategy(2)))
            .build();

        parser.parse(definition, &config).await.unwrap();
        parser.clear_cache();
        assert_eq!(parser.cache_stats().entries, 0);
        parser.parse(definition, &config).await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let definition = "#%RAML 1.0\ntitle: [";
        let config = ParserConfig::new(RamlVersion::V10);

        let mut strategy = MockConversionStrategy::new();
        strategy
            .expect_parse()
            .times(2)
            .returning(|_| Err(ModelingError::External("Parse error".to_string()).into()));
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V10, Arc::new(strategy))
            .build();

        for _ in 0..2 {
            let err = parser.parse(definition, &config).await.unwrap_err();
            assert_eq!(err.to_string(), "Parse error");
        }
        assert_eq!(parser.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_unsupported_version_string() {
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V10, Arc::new(counting_strategy(0)))
            .build();

        let err = parser
            .parse_version("title: Test API", "2.0")
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::UnsupportedVersion(ref v) if v == "2.0"));
        assert_eq!(err.to_string(), "Unsupported RAML version: 2.0");
    }

    #[tokio::test]
    async fn test_unregistered_version() {
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V10, Arc::new(counting_strategy(0)))
            .build();

        assert!(!parser.supports(RamlVersion::V08));
        let err = parser
            .parse("#%RAML 0.8\ntitle: T", &ParserConfig::new(RamlVersion::V08))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported RAML version: 0.8");
    }

    #[tokio::test]
    async fn test_disabled_cache_always_dispatches() {
        let definition = "#%RAML 1.0\ntitle: Test API";
        let config = ParserConfig::new(RamlVersion::V10);
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V10, Arc::new(counting_strategy(2)))
            .cache_enabled(false)
            .build();

        parser.parse(definition, &config).await.unwrap();
        parser.parse(definition, &config).await.unwrap();
        assert_eq!(parser.cache_stats(), CacheStats::default());
    }

    /// Strategy that suspends once before answering
    struct YieldingStrategy {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ConversionStrategy for YieldingStrategy {
        async fn parse(&self, _definition: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(MOCK_OUTPUT.to_string())
        }
    }

    #[tokio::test]
    async fn test_concurrent_misses_are_not_coalesced() {
        let definition = "#%RAML 1.0\ntitle: Test API";
        let config = ParserConfig::new(RamlVersion::V10);
        let strategy = Arc::new(YieldingStrategy {
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let parser = RamlParser::builder()
            .strategy(RamlVersion::V10, strategy.clone())
            .build();

        let (a, b) = futures::join!(
            parser.parse(definition, &config),
            parser.parse(definition, &config)
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 2);
        assert_eq!(parser.cache_stats().entries, 1);
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key(RamlVersion::V08, "title: x"), "0.8-title: x");
    }
}
