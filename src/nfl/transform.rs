use super::error::{NflError, Result};
use byteorder::{NativeEndian, ReadBytesExt};
use std::io::Read;
use std::path::Path;

/// One dense affine layer `y = W x + b`, row-major `W` (`rows` x `cols`).
struct Layer {
    rows: usize,
    cols: usize,
    weights: Vec<f32>,
    bias: Vec<f32>,
}

impl Layer {
    fn read_from(r: &mut impl Read, path: &str) -> Result<Self> {
        let fail = |reason: &str| NflError::WeightsLoad {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        let rows = r
            .read_u32::<NativeEndian>()
            .map_err(|_| fail("truncated layer header (rows)"))? as usize;
        let cols = r
            .read_u32::<NativeEndian>()
            .map_err(|_| fail("truncated layer header (cols)"))? as usize;
        let mut weights = vec![0f32; rows * cols];
        for w in weights.iter_mut() {
            *w = r
                .read_f32::<NativeEndian>()
                .map_err(|_| fail("truncated weight matrix"))?;
        }
        let mut bias = vec![0f32; rows];
        for b in bias.iter_mut() {
            *b = r
                .read_f32::<NativeEndian>()
                .map_err(|_| fail("truncated bias vector"))?;
        }
        Ok(Self {
            rows,
            cols,
            weights,
            bias,
        })
    }

    /// `y = W x + b`. Panics if `input.len() != self.cols`, which would mean
    /// a weights blob whose layer shapes don't chain — a load-time defect,
    /// not a runtime one, so it is checked once in `TransformModel::load`.
    fn apply(&self, input: &[f32]) -> Vec<f32> {
        debug_assert_eq!(input.len(), self.cols);
        (0..self.rows)
            .map(|i| {
                let row = &self.weights[i * self.cols..(i + 1) * self.cols];
                let dot: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                dot + self.bias[i]
            })
            .collect()
    }
}

/// A small feedforward numerical mapping: a fixed sequence of dense layers
/// with a fixed elementwise non-linearity (ReLU) between them (§4.4). The
/// topology is whatever the weights blob encodes; only the weight values
/// are trained offline.
pub struct TransformModel {
    layers: Vec<Layer>,
}

impl TransformModel {
    /// Reads the weights blob format from §6:
    /// `[layer_count: u32] ([rows:u32][cols:u32][W: f32 x rows*cols][b: f32 x rows])×`.
    pub fn load(path: &Path) -> Result<Self> {
        let path_str = path.display().to_string();
        let mut file = std::fs::File::open(path).map_err(|e| NflError::WeightsLoad {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;
        Self::read_from(&mut file, &path_str)
    }

    pub(crate) fn read_from(r: &mut impl Read, path: &str) -> Result<Self> {
        let layer_count = r
            .read_u32::<NativeEndian>()
            .map_err(|_| NflError::WeightsLoad {
                path: path.to_string(),
                reason: "missing layer count".to_string(),
            })? as usize;
        let mut layers = Vec::with_capacity(layer_count);
        for _ in 0..layer_count {
            layers.push(Layer::read_from(r, path)?);
        }
        for pair in layers.windows(2) {
            if pair[0].rows != pair[1].cols {
                return Err(NflError::WeightsLoad {
                    path: path.to_string(),
                    reason: format!(
                        "layer shape mismatch: {} rows feeding a {}-col layer",
                        pair[0].rows, pair[1].cols
                    ),
                });
            }
        }
        Ok(Self { layers })
    }

    /// Evaluates the transform on a single scalar key.
    pub fn evaluate(&self, key: f64) -> f64 {
        let mut v = vec![key as f32];
        let last = self.layers.len().saturating_sub(1);
        for (i, layer) in self.layers.iter().enumerate() {
            v = layer.apply(&v);
            if i != last {
                v.iter_mut().for_each(|x| *x = x.max(0.0));
            }
        }
        v.first().copied().unwrap_or(key as f32) as f64
    }

    /// Evaluates the transform on a batch, writing results into `out[..keys.len()]`.
    pub fn evaluate_batch(&self, keys: &[f64], out: &mut [f64]) {
        for (k, o) in keys.iter().zip(out.iter_mut()) {
            *o = self.evaluate(*k);
        }
    }
}
