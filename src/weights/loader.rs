//! Loading named weight tensors from a manifest and its shards.

use super::manifest::{QuantizationDtype, WeightDtype, WeightEntry, WeightsGroup, WeightsManifest};
use super::uris::{ModelUris, join_uri};
use crate::core::{NetInputError, TensorD};
use async_trait::async_trait;
use futures::future::try_join_all;
use ndarray::{ArrayD, IxDyn};
use std::collections::HashMap;
use std::path::PathBuf;

/// A decoded weight tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightTensor {
    /// Float weights, including dequantized ones.
    Float32(TensorD),
    /// Integer weights.
    Int32(ArrayD<i32>),
    /// Boolean weights.
    Bool(ArrayD<bool>),
}

impl WeightTensor {
    /// Returns the float tensor, if this is one.
    pub fn as_f32(&self) -> Option<&TensorD> {
        match self {
            WeightTensor::Float32(t) => Some(t),
            _ => None,
        }
    }

    /// The tensor shape.
    pub fn shape(&self) -> &[usize] {
        match self {
            WeightTensor::Float32(t) => t.shape(),
            WeightTensor::Int32(t) => t.shape(),
            WeightTensor::Bool(t) => t.shape(),
        }
    }
}

/// Parameter name to tensor.
pub type NamedTensorMap = HashMap<String, WeightTensor>;

/// Fetches raw bytes by uri.
#[async_trait]
pub trait WeightFetcher: Send + Sync {
    /// Returns the full contents behind `uri`.
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, NetInputError>;
}

/// Fetches from the local file system.
///
/// A `file://` scheme is stripped. Relative uris are resolved against the
/// root directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    /// Creates a fetcher resolving relative uris against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher resolving relative uris against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn path_for(&self, uri: &str) -> PathBuf {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        match &self.root {
            Some(root) => root.join(path.trim_start_matches('/')),
            None => PathBuf::from(path),
        }
    }
}

#[async_trait]
impl WeightFetcher for FileFetcher {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, NetInputError> {
        let path = self.path_for(uri);
        tracing::trace!("reading {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|source| NetInputError::Fetch {
                uri: uri.to_string(),
                source,
            })
    }
}

/// Fetches and parses the manifest at `uri`.
pub async fn fetch_manifest(
    uri: &str,
    fetcher: &dyn WeightFetcher,
) -> Result<WeightsManifest, NetInputError> {
    let bytes = fetcher.fetch(uri).await?;
    serde_json::from_slice(&bytes).map_err(|source| NetInputError::Manifest {
        uri: uri.to_string(),
        source,
    })
}

/// Loads every weight described by `manifest`, fetching shards relative to
/// `base_uri`.
///
/// Groups and their shards are fetched concurrently.
pub async fn load_weights(
    manifest: &WeightsManifest,
    base_uri: &str,
    fetcher: &dyn WeightFetcher,
) -> Result<NamedTensorMap, NetInputError> {
    let groups = try_join_all(
        manifest
            .iter()
            .map(|group| load_group(group, base_uri, fetcher)),
    )
    .await?;

    let mut weights = NamedTensorMap::new();
    for (name, tensor) in groups.into_iter().flatten() {
        if weights.insert(name.clone(), tensor).is_some() {
            return Err(NetInputError::weight_data(name, "declared more than once"));
        }
    }
    Ok(weights)
}

/// Resolves the model uris, then fetches the manifest and all weights.
///
/// # Examples
///
/// ```no_run
/// use netinput::weights::{FileFetcher, load_weight_map};
///
/// # async fn run() -> Result<(), netinput::core::NetInputError> {
/// let weights = load_weight_map(Some("models/mtcnn"), "mtcnn", &FileFetcher::new()).await?;
/// println!("loaded {} tensors", weights.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_weight_map(
    uri: Option<&str>,
    default_model_name: &str,
    fetcher: &dyn WeightFetcher,
) -> Result<NamedTensorMap, NetInputError> {
    let uris = ModelUris::resolve(uri, default_model_name);
    tracing::debug!("loading weights manifest {}", uris.manifest_uri);

    let manifest = fetch_manifest(&uris.manifest_uri, fetcher).await?;
    let weights = load_weights(&manifest, &uris.model_base_uri, fetcher).await?;

    tracing::debug!(
        "loaded {} weight tensors from {} group(s)",
        weights.len(),
        manifest.len()
    );
    Ok(weights)
}

async fn load_group(
    group: &WeightsGroup,
    base_uri: &str,
    fetcher: &dyn WeightFetcher,
) -> Result<Vec<(String, WeightTensor)>, NetInputError> {
    let shards = try_join_all(group.paths.iter().map(|path| {
        let uri = join_uri(base_uri, path);
        async move { fetcher.fetch(&uri).await }
    }))
    .await?;
    tracing::trace!("fetched {} shard(s)", shards.len());

    let data = shards.concat();
    let mut offset: usize = 0;
    let mut tensors = Vec::with_capacity(group.weights.len());

    for entry in &group.weights {
        let end = entry
            .byte_len()
            .and_then(|len| offset.checked_add(len))
            .ok_or_else(|| {
                NetInputError::weight_data(
                    &entry.name,
                    format!("shape {:?} overflows", entry.shape),
                )
            })?;
        let bytes = data.get(offset..end).ok_or_else(|| {
            NetInputError::weight_data(
                &entry.name,
                format!(
                    "needs bytes {}..{} but the shards hold {}",
                    offset,
                    end,
                    data.len()
                ),
            )
        })?;
        tensors.push((entry.name.clone(), decode_weight(entry, bytes)?));
        offset = end;
    }

    if offset != data.len() {
        tracing::warn!(
            "weight group {:?} has {} trailing byte(s)",
            group.paths,
            data.len() - offset
        );
    }

    Ok(tensors)
}

fn decode_weight(entry: &WeightEntry, bytes: &[u8]) -> Result<WeightTensor, NetInputError> {
    let shape = IxDyn(&entry.shape);

    if let Some(quantization) = entry.quantization {
        let stored: Vec<f32> = match quantization.dtype {
            QuantizationDtype::Uint8 => bytes.iter().map(|&b| b as f32).collect(),
            QuantizationDtype::Uint16 => bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as f32)
                .collect(),
        };
        let values: Vec<f32> = stored
            .into_iter()
            .map(|q| q * quantization.scale + quantization.min)
            .collect();
        return Ok(match entry.dtype {
            WeightDtype::Int32 => {
                let rounded = values.into_iter().map(|v| v.round() as i32).collect();
                WeightTensor::Int32(ArrayD::from_shape_vec(shape, rounded)?)
            }
            _ => WeightTensor::Float32(ArrayD::from_shape_vec(shape, values)?),
        });
    }

    Ok(match entry.dtype {
        WeightDtype::Float32 => {
            let values = bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            WeightTensor::Float32(ArrayD::from_shape_vec(shape, values)?)
        }
        WeightDtype::Int32 => {
            let values = bytes
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            WeightTensor::Int32(ArrayD::from_shape_vec(shape, values)?)
        }
        WeightDtype::Bool => {
            let values = bytes.iter().map(|&b| b != 0).collect();
            WeightTensor::Bool(ArrayD::from_shape_vec(shape, values)?)
        }
    })
}
