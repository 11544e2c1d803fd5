//! Model weight loading for safetensors format.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use tracing::debug;

use crate::error::LoadError;

/// Loads a safetensors file and creates a `VarBuilder` for the model.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The safetensors data is invalid
/// - A tensor has an unsupported dtype
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>, LoadError> {
    let path = path.as_ref();
    debug!("Loading safetensors from {}", path.display());

    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    var_builder_from_bytes(path, &data, device)
}

/// Parses safetensors bytes already in memory.
///
/// `path` is only used for error messages.
///
/// # Errors
///
/// Returns an error if the data is not valid safetensors or holds an
/// unsupported dtype.
pub fn var_builder_from_bytes(
    path: &Path,
    data: &[u8],
    device: &Device,
) -> Result<VarBuilder<'static>, LoadError> {
    let tensors = SafeTensors::deserialize(data).map_err(|source| LoadError::Safetensors {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tensor_map: HashMap<String, Tensor> = HashMap::new();

    for name in tensors.names() {
        let tensor_view = tensors
            .tensor(name)
            .map_err(|source| LoadError::Safetensors {
                path: path.to_path_buf(),
                source,
            })?;

        let dtype = safetensors_dtype_to_candle(name, tensor_view.dtype())?;
        let shape: Vec<usize> = tensor_view.shape().to_vec();

        let tensor = Tensor::from_raw_buffer(tensor_view.data(), dtype, &shape, device)?;

        tensor_map.insert(name.clone(), tensor);
    }

    debug!("Loaded {} tensors from {}", tensor_map.len(), path.display());

    // VarBuilder::from_tensors takes ownership
    Ok(VarBuilder::from_tensors(tensor_map, DType::F32, device))
}

/// Converts safetensors dtype to candle dtype.
fn safetensors_dtype_to_candle(name: &str, dtype: safetensors::Dtype) -> Result<DType, LoadError> {
    use safetensors::Dtype as S;
    match dtype {
        S::F32 => Ok(DType::F32),
        S::F64 => Ok(DType::F64),
        S::F16 => Ok(DType::F16),
        S::BF16 => Ok(DType::BF16),
        S::I64 => Ok(DType::I64),
        S::U8 => Ok(DType::U8),
        S::U32 => Ok(DType::U32),
        other => Err(LoadError::UnsupportedDtype {
            name: name.to_string(),
            dtype: format!("{other:?}"),
        }),
    }
}
