use url::Url;

use crate::InstallError;

/// Fixed, ordered list of root-relative paths pre-cached at install time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedManifest {
    paths: Vec<String>,
}

impl SeedManifest {
    /// Creates a manifest from paths such as `"/"` or `"/styles.css"`.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        SeedManifest {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Paths in manifest order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Number of seeds.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the manifest has no seeds.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Resolves every path against `scope`, keeping manifest order.
    pub fn resolve(&self, scope: &Url) -> Result<Vec<Url>, InstallError> {
        self.paths
            .iter()
            .map(|path| {
                scope.join(path).map_err(|source| InstallError::InvalidSeed {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }
}
