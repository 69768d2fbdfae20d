use crate::{
    cache::LinkCache,
    codegen::{CodeGenerator, RandomCode},
    db::UrlStore,
    error::{ShortenError, StoreError},
};

/// How many fresh codes `shorten` tries before giving up on a collision.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// The shortening engine: maps originals to codes and back, reading through
/// the [`LinkCache`] and falling back to the [`UrlStore`].
///
/// Owns its cache. Build it once at startup with [`Shortener::start`], which
/// loads every stored mapping before returning, then share it with handlers.
pub struct Shortener<S, G = RandomCode> {
    store: S,
    cache: LinkCache,
    codes: G,
}

impl<S: UrlStore> Shortener<S> {
    /// Build an engine with the default random code generator and warm its
    /// cache from `store`.
    pub async fn start(store: S) -> Result<Self, StoreError> {
        Self::start_with(store, RandomCode).await
    }
}

impl<S: UrlStore, G: CodeGenerator> Shortener<S, G> {
    /// Build an engine with a custom code generator and warm its cache.
    pub async fn start_with(store: S, codes: G) -> Result<Self, StoreError> {
        let shortener = Self {
            store,
            cache: LinkCache::new(),
            codes,
        };
        shortener.warm_cache().await?;
        Ok(shortener)
    }

    pub fn cache(&self) -> &LinkCache {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load every stored mapping into the cache. Returns how many were loaded.
    pub async fn warm_cache(&self) -> Result<usize, StoreError> {
        let mappings = self.store.load_all().await?;

        let count = mappings.len();
        for mapping in mappings {
            self.cache.put(mapping.code, mapping.original);
        }

        tracing::info!("Cache warmed with {} mapping(s)", count);
        Ok(count)
    }

    /// Throw the cache away and rebuild it from the store.
    pub async fn rebuild_cache(&self) -> Result<usize, StoreError> {
        self.cache.clear();
        self.warm_cache().await
    }

    /// Return the code for `original`, creating one if it has never been seen.
    ///
    /// 1. Reverse lookup in the cache.
    /// 2. On a miss, look the original up in the store and backfill the cache.
    /// 3. Otherwise generate a code and insert it. A `DuplicateKey` from the
    ///    store means either another caller inserted the same original first
    ///    (re-read and return their code) or the generated code collided
    ///    (try a fresh one, up to [`MAX_CODE_ATTEMPTS`]).
    pub async fn shorten(&self, original: &str) -> Result<String, ShortenError> {
        if original.is_empty() {
            return Err(ShortenError::EmptyUrl);
        }

        if let Some(code) = self.cache.code_for(original) {
            return Ok(code);
        }

        if let Some(existing) = self.store.find_by_original(original).await? {
            self.cache.put(&existing.code, &existing.original);
            return Ok(existing.code);
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.codes.generate();

            match self.store.insert(&code, original).await {
                Ok(()) => {
                    self.cache.put(&code, original);
                    tracing::info!(code = %code, "Created short code");
                    return Ok(code);
                }
                Err(StoreError::DuplicateKey) => {
                    if let Some(winner) = self.store.find_by_original(original).await? {
                        tracing::debug!(
                            code = %winner.code,
                            "Concurrent shorten won the insert; reusing its code"
                        );
                        self.cache.put(&winner.code, &winner.original);
                        return Ok(winner.code);
                    }
                    tracing::warn!(code = %code, attempt, "Generated short code collided");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::DuplicateKey.into())
    }

    /// Return the original stored for `code`.
    ///
    /// Served from the cache when possible; a store hit is backfilled so the
    /// next resolution of the same code skips the store.
    pub async fn resolve(&self, code: &str) -> Result<String, ShortenError> {
        if let Some(original) = self.cache.get(code) {
            return Ok(original);
        }

        match self.store.find_by_code(code).await? {
            Some(mapping) => {
                self.cache.put(&mapping.code, &mapping.original);
                Ok(mapping.original)
            }
            None => Err(ShortenError::NotFound(code.to_owned())),
        }
    }
}
