//! Installation and activation.

use std::fmt;

use futures::future::try_join_all;
use offcache_backend::{Backend, CacheStorage};
use offcache_core::{CacheName, CapturedResponse, FetchRequest, RequestKey, Upstream, UpstreamResult};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::{CacheProxy, InstallError, SeedManifest, TrustedOrigin};

/// The two long-lived states of a proxy version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Populating the seed cache.
    Installing,
    /// Intercepting fetches.
    Active,
}

impl LifecycleState {
    /// Returns the state as a string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Installing => "installing",
            LifecycleState::Active => "active",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proxy version that has not taken control yet.
///
/// [`Installer::install`] consumes the installer. Only a successful
/// installation yields a [`CacheProxy`].
pub struct Installer<B, U> {
    storage: CacheStorage<B>,
    upstream: U,
    cache_name: CacheName,
    scope: Url,
    manifest: SeedManifest,
    trusted_origin: Option<TrustedOrigin>,
    purge_stale: bool,
}

/// Marker type for unset builder fields.
///
/// When you see `NotSet` in a compiler error, it means you haven't called
/// the corresponding builder method yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotSet;

/// Builder for [`Installer`].
pub struct InstallerBuilder<B, U> {
    backend: B,
    upstream: U,
    cache_name: CacheName,
    scope: Url,
    manifest: SeedManifest,
    trusted_origin: Option<TrustedOrigin>,
    purge_stale: bool,
}

impl Installer<NotSet, NotSet> {
    /// Starts building an installer for the store `cache_name`.
    ///
    /// `scope` is the client's own origin; root-relative seed paths are
    /// resolved against it.
    pub fn builder(cache_name: CacheName, scope: Url) -> InstallerBuilder<NotSet, NotSet> {
        InstallerBuilder {
            backend: NotSet,
            upstream: NotSet,
            cache_name,
            scope,
            manifest: SeedManifest::default(),
            trusted_origin: None,
            purge_stale: true,
        }
    }
}

impl<B, U> InstallerBuilder<B, U> {
    /// Sets the store backend.
    pub fn backend<NewB>(self, backend: NewB) -> InstallerBuilder<NewB, U> {
        InstallerBuilder {
            backend,
            upstream: self.upstream,
            cache_name: self.cache_name,
            scope: self.scope,
            manifest: self.manifest,
            trusted_origin: self.trusted_origin,
            purge_stale: self.purge_stale,
        }
    }

    /// Sets the network upstream.
    pub fn upstream<NewU>(self, upstream: NewU) -> InstallerBuilder<B, NewU> {
        InstallerBuilder {
            backend: self.backend,
            upstream,
            cache_name: self.cache_name,
            scope: self.scope,
            manifest: self.manifest,
            trusted_origin: self.trusted_origin,
            purge_stale: self.purge_stale,
        }
    }

    /// Sets the seed manifest.
    pub fn manifest(mut self, manifest: SeedManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Sets the external origin that always gets cors mode without credentials.
    pub fn trusted_origin(mut self, origin: TrustedOrigin) -> Self {
        self.trusted_origin = Some(origin);
        self
    }

    /// Whether activation deletes stores of other versions. Defaults to `true`.
    pub fn purge_stale(mut self, purge: bool) -> Self {
        self.purge_stale = purge;
        self
    }
}

impl<B, U> InstallerBuilder<B, U>
where
    B: Backend,
    U: Upstream<FetchRequest, Response = UpstreamResult<CapturedResponse>>,
{
    /// Builds the installer.
    pub fn build(self) -> Installer<B, U> {
        Installer {
            storage: CacheStorage::new(self.backend),
            upstream: self.upstream,
            cache_name: self.cache_name,
            scope: self.scope,
            manifest: self.manifest,
            trusted_origin: self.trusted_origin,
            purge_stale: self.purge_stale,
        }
    }
}

impl<B, U> Installer<B, U>
where
    B: Backend,
    U: Upstream<FetchRequest, Response = UpstreamResult<CapturedResponse>>,
{
    /// Always [`LifecycleState::Installing`].
    pub fn state(&self) -> LifecycleState {
        LifecycleState::Installing
    }

    /// Name of the store this version installs into.
    pub fn cache_name(&self) -> &CacheName {
        &self.cache_name
    }

    /// Fetches every seed and stores it in the version's store.
    ///
    /// Seeds are fetched concurrently and written only once all of them
    /// succeeded, so a failed fetch leaves no seeded entries behind. Seeds
    /// are pinned: capacity-based eviction never drops them. If writing a
    /// seed fails and the store did not exist before, the store is deleted
    /// again; an existing store of the same version may keep the seeds
    /// written before the failure. Running it again with the same manifest
    /// and version rewrites the same entries.
    ///
    /// The returned [`Installed`] version does not intercept anything until
    /// it is [activated](Installed::activate).
    #[instrument(skip(self), fields(cache = %self.cache_name))]
    pub async fn install(self) -> Result<Installed<B, U>, InstallError> {
        info!(seeds = self.manifest.len(), state = %self.state(), "installing");

        let urls = self.manifest.resolve(&self.scope)?;
        let seeds = try_join_all(urls.into_iter().map(|url| self.fetch_seed(url))).await?;

        let existed = self.storage.has(&self.cache_name).await?;
        if let Err(error) = self.write_seeds(&seeds).await {
            if !existed {
                self.discard_store().await;
            }
            return Err(error);
        }

        info!(seeded = seeds.len(), "installed");
        Ok(Installed {
            storage: self.storage,
            upstream: self.upstream,
            cache_name: self.cache_name,
            trusted_origin: self.trusted_origin,
            purge_stale: self.purge_stale,
        })
    }

    async fn write_seeds(
        &self,
        seeds: &[(RequestKey, CapturedResponse)],
    ) -> Result<(), InstallError> {
        let store = self.storage.open(&self.cache_name).await?;
        for (key, response) in seeds {
            store.pin(key, response).await?;
            debug!(%key, "seeded");
        }
        Ok(())
    }

    async fn discard_store(&self) {
        match self.storage.delete(&self.cache_name).await {
            Ok(_) => debug!("partially seeded store deleted"),
            Err(error) => warn!(%error, "failed to delete partially seeded store"),
        }
    }

    async fn fetch_seed(&self, url: Url) -> Result<(RequestKey, CapturedResponse), InstallError> {
        let mut request = FetchRequest::get(url);
        if let Some(origin) = &self.trusted_origin {
            request = origin.apply(request);
        }
        let key = request.key();

        let response = self
            .upstream
            .call(request)
            .await
            .map_err(|source| InstallError::Seed {
                url: key.url().to_owned(),
                source,
            })?;

        if !response.is_success() {
            return Err(InstallError::Status {
                url: key.url().to_owned(),
                status: response.status(),
            });
        }
        Ok((key, response))
    }
}

/// A version whose seeds are all stored, waiting to take control.
pub struct Installed<B, U> {
    storage: CacheStorage<B>,
    upstream: U,
    cache_name: CacheName,
    trusted_origin: Option<TrustedOrigin>,
    purge_stale: bool,
}

impl<B, U> Installed<B, U>
where
    B: Backend,
    U: Upstream<FetchRequest, Response = UpstreamResult<CapturedResponse>>,
{
    /// Still [`LifecycleState::Installing`] until activated.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::Installing
    }

    /// Name of the store this version installed into.
    pub fn cache_name(&self) -> &CacheName {
        &self.cache_name
    }

    /// Takes control: stores of other versions are purged unless disabled,
    /// and the returned proxy starts intercepting fetches.
    ///
    /// A failed purge is logged and does not prevent activation.
    #[instrument(skip(self), fields(cache = %self.cache_name))]
    pub async fn activate(self) -> CacheProxy<B, U> {
        let purge_stale = self.purge_stale;
        let proxy = CacheProxy::new(
            self.storage,
            self.upstream,
            self.cache_name,
            self.trusted_origin,
        );

        if purge_stale {
            match proxy.purge_stale().await {
                Ok(purged) if !purged.is_empty() => {
                    info!(purged = purged.len(), "stale stores deleted");
                }
                Ok(_) => {}
                Err(error) => warn!(%error, "failed to purge stale stores"),
            }
        }

        info!(state = %proxy.state(), "activated");
        proxy
    }
}
