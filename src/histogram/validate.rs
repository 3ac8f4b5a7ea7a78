//! Argument validation, run before any kernel is built

use crate::dtype::DType;
use crate::error::{Error, Result};

/// Shape, dtype and device of an array taking part in a histogram call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMeta {
    /// Array shape
    pub shape: Vec<usize>,
    /// Element type
    pub dtype: DType,
    /// Id of the device the array lives on
    pub device: usize,
}

impl ArrayMeta {
    /// Describe an array
    pub fn new(shape: &[usize], dtype: DType, device: usize) -> Self {
        Self {
            shape: shape.to_vec(),
            dtype,
            device,
        }
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

fn hist_dtype_supported(dtype: DType) -> bool {
    matches!(
        dtype,
        DType::F64 | DType::F32 | DType::I64 | DType::I32 | DType::U64 | DType::U32
    )
}

/// Check that `sample`, `bins`, `weights` and `histogram` can be used together.
///
/// - every array lives on the sample's device
/// - sample is `(n)` or `(n, dims)` with `dims >= 1`
/// - bins is 1-D, holds at least 2 edges and has the sample's dtype
/// - weights is `(n)` and has the histogram's dtype
/// - histogram is 1-D, non-empty, of a supported cell type
pub fn validate(
    sample: &ArrayMeta,
    bins: Option<&ArrayMeta>,
    weights: Option<&ArrayMeta>,
    histogram: &ArrayMeta,
) -> Result<()> {
    let others = [bins, weights, Some(histogram)];
    if others.iter().flatten().any(|a| a.device != sample.device) {
        return Err(Error::DeviceMismatch);
    }

    let n = match sample.shape.as_slice() {
        [n] => *n,
        [n, dims] if *dims >= 1 => *n,
        _ => {
            return Err(Error::invalid_argument(
                "sample",
                format!("expected shape (n) or (n, dims), got {:?}", sample.shape),
            ));
        }
    };

    if let Some(bins) = bins {
        if bins.ndim() != 1 {
            return Err(Error::invalid_argument(
                "bins",
                format!("expected a 1-D array, got shape {:?}", bins.shape),
            ));
        }
        if bins.shape[0] < 2 {
            return Err(Error::invalid_argument(
                "bins",
                format!("at least 2 edges are required, got {}", bins.shape[0]),
            ));
        }
        if bins.dtype != sample.dtype {
            return Err(Error::DTypeMismatch {
                lhs: sample.dtype,
                rhs: bins.dtype,
            });
        }
    }

    if histogram.ndim() != 1 || histogram.shape[0] == 0 {
        return Err(Error::invalid_argument(
            "histogram",
            format!("expected a non-empty 1-D array, got shape {:?}", histogram.shape),
        ));
    }
    if !hist_dtype_supported(histogram.dtype) {
        return Err(Error::unsupported_dtype(histogram.dtype, "histogram"));
    }

    if let Some(weights) = weights {
        if weights.shape != [n] {
            return Err(Error::shape_mismatch(&[n], &weights.shape));
        }
        if weights.dtype != histogram.dtype {
            return Err(Error::DTypeMismatch {
                lhs: histogram.dtype,
                rhs: weights.dtype,
            });
        }
    }

    Ok(())
}
