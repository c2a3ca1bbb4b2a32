use http::StatusCode;
use offcache::{CacheStatus, CapturedResponse, FetchRequest, Upstream, UpstreamResult};
use offcache_configuration::{
    Activation, Backend, CacheVersion, ConfigError, Moka, ProxyConfig, ServerConfig,
    ValueSerialization,
};
use pretty_assertions::assert_eq;

const FULL: &str = r#"
cache:
  product: portfolio
  version: v1
scope: https://example.com
trusted_origin: https://cdn.example.net/
manifest: [/, /index.html, /styles.css]
activation:
  purge_stale: false
backend:
  type: Moka
  max_entries: 500
  format: Bincode
  label: assets
server:
  listen: 0.0.0.0:9090
"#;

#[test]
fn test_full_config_deserialize() {
    let config = ProxyConfig::from_yaml(FULL).expect("failed to parse");

    let expected = ProxyConfig {
        cache: CacheVersion {
            product: "portfolio".to_string(),
            version: "v1".to_string(),
        },
        scope: "https://example.com".to_string(),
        trusted_origin: Some("https://cdn.example.net/".to_string()),
        manifest: vec![
            "/".to_string(),
            "/index.html".to_string(),
            "/styles.css".to_string(),
        ],
        activation: Activation { purge_stale: false },
        backend: Backend::Moka(Moka {
            max_entries: 500,
            format: ValueSerialization::Bincode,
            label: Some("assets".to_string()),
        }),
        server: ServerConfig {
            listen: "0.0.0.0:9090".to_string(),
        },
    };
    assert_eq!(config, expected);
    assert_eq!(config.cache_name().as_str(), "portfolio-v1");
    assert_eq!(config.server.listen_addr().unwrap().port(), 9090);
}

#[test]
fn test_defaults() {
    let yaml = r#"
cache:
  product: site
  version: "2"
scope: https://example.com/
"#;
    let config = ProxyConfig::from_yaml(yaml).expect("failed to parse");

    assert_eq!(config.trusted_origin, None);
    assert!(config.manifest.is_empty());
    assert_eq!(config.activation, Activation { purge_stale: true });
    assert_eq!(config.backend, Backend::Moka(Moka::default()));
    assert_eq!(config.server.listen, "127.0.0.1:8080");
    assert_eq!(config.cache_name().as_str(), "site-2");
}

#[test]
fn test_serialize_roundtrip() {
    let config = ProxyConfig::from_yaml(FULL).unwrap();

    let yaml = serde_saphyr::to_string(&config).expect("failed to serialize");
    let deserialized = ProxyConfig::from_yaml(&yaml).expect("failed to deserialize");

    assert_eq!(config, deserialized);
}

#[test]
fn test_invalid_scope_is_rejected() {
    let yaml = r#"
cache:
  product: site
  version: v1
scope: not a url
"#;
    match ProxyConfig::from_yaml(yaml) {
        Err(ConfigError::InvalidUrl { field, .. }) => assert_eq!(field, "scope"),
        other => panic!("expected invalid scope, got {other:?}"),
    }
}

#[test]
fn test_invalid_trusted_origin_is_rejected() {
    let yaml = r#"
cache:
  product: site
  version: v1
scope: https://example.com
trusted_origin: cdn.example.net
"#;
    match ProxyConfig::from_yaml(yaml) {
        Err(ConfigError::InvalidUrl { field, .. }) => assert_eq!(field, "trusted_origin"),
        other => panic!("expected invalid trusted origin, got {other:?}"),
    }
}

#[test]
fn test_invalid_listen_is_rejected() {
    let yaml = r#"
cache:
  product: site
  version: v1
scope: https://example.com
server:
  listen: localhost
"#;
    assert!(matches!(
        ProxyConfig::from_yaml(yaml),
        Err(ConfigError::InvalidListen(addr)) if addr == "localhost"
    ));
}

#[test]
fn test_missing_cache_section_is_parse_error() {
    let yaml = "scope: https://example.com\n";
    assert!(matches!(
        ProxyConfig::from_yaml(yaml),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        ProxyConfig::from_file("/nonexistent/offcache.yaml"),
        Err(ConfigError::Io { .. })
    ));
}

#[derive(Clone)]
struct StaticUpstream;

impl Upstream<FetchRequest> for StaticUpstream {
    type Response = UpstreamResult<CapturedResponse>;
    type Future = std::future::Ready<Self::Response>;

    fn call(&self, req: FetchRequest) -> Self::Future {
        let body = req.url().path().to_string();
        std::future::ready(Ok(CapturedResponse::new(
            StatusCode::OK,
            http::HeaderMap::new(),
            body,
        )))
    }
}

#[tokio::test]
async fn test_config_builds_working_proxy() {
    let config = ProxyConfig::from_yaml(FULL).unwrap();
    let installer = config.into_installer(StaticUpstream).unwrap();
    assert_eq!(installer.cache_name().as_str(), "portfolio-v1");

    let proxy = installer.install().await.unwrap().activate().await;
    let url = url::Url::parse("https://example.com/styles.css").unwrap();
    let outcome = proxy.fetch(FetchRequest::get(url)).await.unwrap();

    assert_eq!(outcome.status(), CacheStatus::Hit);
    assert_eq!(outcome.response().body().as_ref(), b"/styles.css");
}
