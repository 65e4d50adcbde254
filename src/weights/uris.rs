//! Derives manifest and shard locations from a user supplied model uri.

use crate::core::constants::WEIGHTS_MANIFEST_SUFFIX;

/// Where a model's manifest lives and what its shard paths are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUris {
    /// The uri of the weights manifest.
    pub manifest_uri: String,
    /// The prefix prepended to every shard path listed in the manifest.
    pub model_base_uri: String,
}

impl ModelUris {
    /// Resolves the manifest and base uris of a model.
    ///
    /// * No uri: the default manifest `<name>-weights_manifest.json`,
    ///   relative to the current location.
    /// * A uri ending in `.json` names the manifest file itself.
    /// * Any other uri is the directory holding the default manifest.
    ///
    /// An `http://` or `https://` scheme and a leading `/` are kept; empty
    /// path segments are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use netinput::weights::ModelUris;
    ///
    /// let uris = ModelUris::resolve(Some("https://host/models/"), "face_detector");
    /// assert_eq!(uris.model_base_uri, "https://host/models");
    /// assert_eq!(
    ///     uris.manifest_uri,
    ///     "https://host/models/face_detector-weights_manifest.json"
    /// );
    /// ```
    pub fn resolve(uri: Option<&str>, default_model_name: &str) -> Self {
        let default_manifest = format!("{default_model_name}{WEIGHTS_MANIFEST_SUFFIX}");

        let uri = match uri {
            None | Some("") => {
                return Self {
                    manifest_uri: default_manifest,
                    model_base_uri: String::new(),
                };
            }
            Some("/") => {
                return Self {
                    manifest_uri: format!("/{default_manifest}"),
                    model_base_uri: "/".to_string(),
                };
            }
            Some(uri) => uri,
        };

        let protocol = ["http://", "https://"]
            .into_iter()
            .find(|p| uri.starts_with(*p))
            .unwrap_or("");
        let path = &uri[protocol.len()..];

        let mut parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let manifest_file = if path.ends_with(".json") {
            parts.pop().unwrap_or_default().to_string()
        } else {
            default_manifest
        };

        let mut model_base_uri = format!("{protocol}{}", parts.join("/"));
        if path.starts_with('/') {
            model_base_uri.insert(0, '/');
        }

        let manifest_uri = if model_base_uri == "/" {
            format!("/{manifest_file}")
        } else if model_base_uri.is_empty() {
            manifest_file
        } else {
            format!("{model_base_uri}/{manifest_file}")
        };

        Self {
            manifest_uri,
            model_base_uri,
        }
    }

    /// Joins a shard path from the manifest onto the base uri.
    pub fn shard_uri(&self, path: &str) -> String {
        join_uri(&self.model_base_uri, path)
    }
}

/// Joins `path` onto `base` with exactly one separating slash.
pub(crate) fn join_uri(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_uri() {
        let uris = ModelUris::resolve(None, "mtcnn");
        assert_eq!(uris.manifest_uri, "mtcnn-weights_manifest.json");
        assert_eq!(uris.model_base_uri, "");
    }

    #[test]
    fn test_root_uri() {
        let uris = ModelUris::resolve(Some("/"), "mtcnn");
        assert_eq!(uris.manifest_uri, "/mtcnn-weights_manifest.json");
        assert_eq!(uris.model_base_uri, "/");
    }

    #[test]
    fn test_absolute_directory() {
        let uris = ModelUris::resolve(Some("/models//mtcnn/"), "mtcnn");
        assert_eq!(uris.model_base_uri, "/models/mtcnn");
        assert_eq!(uris.manifest_uri, "/models/mtcnn/mtcnn-weights_manifest.json");
    }

    #[test]
    fn test_relative_directory() {
        let uris = ModelUris::resolve(Some("models"), "mtcnn");
        assert_eq!(uris.model_base_uri, "models");
        assert_eq!(uris.manifest_uri, "models/mtcnn-weights_manifest.json");
    }

    #[test]
    fn test_explicit_manifest() {
        let uris = ModelUris::resolve(Some("http://host/weights/custom.json"), "mtcnn");
        assert_eq!(uris.model_base_uri, "http://host/weights");
        assert_eq!(uris.manifest_uri, "http://host/weights/custom.json");
    }

    #[test]
    fn test_manifest_at_root() {
        let uris = ModelUris::resolve(Some("/custom.json"), "mtcnn");
        assert_eq!(uris.model_base_uri, "/");
        assert_eq!(uris.manifest_uri, "/custom.json");

        let uris = ModelUris::resolve(Some("custom.json"), "mtcnn");
        assert_eq!(uris.model_base_uri, "");
        assert_eq!(uris.manifest_uri, "custom.json");
    }

    #[test]
    fn test_shard_uri() {
        let uris = ModelUris::resolve(Some("/models/"), "mtcnn");
        assert_eq!(uris.shard_uri("mtcnn-shard1"), "/models/mtcnn-shard1");
        assert_eq!(join_uri("", "shard"), "shard");
        assert_eq!(join_uri("/", "shard"), "/shard");
    }
}
