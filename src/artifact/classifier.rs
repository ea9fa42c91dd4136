//! Classifier seam and its ONNX Runtime implementation

use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Opaque scoring function mapping a preprocessed feature vector to the
/// positive-class probability. Implementations must be usable from
/// concurrent request handlers.
pub trait Classifier: Send + Sync {
    fn predict_probability(&self, features: &[f32]) -> Result<f64>;
}

/// Classifier backed by an ONNX Runtime session.
///
/// The session requires exclusive access to run, so it sits behind a mutex;
/// the model weights themselves are frozen.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load an ONNX classifier from file.
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        ort::init().commit()?;
        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX classifier");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load classifier from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        info!(
            input = %input_name,
            output = %output_name,
            "Classifier loaded successfully"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_probability(&self, features: &[f32]) -> Result<f64> {
        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        extract_probability(&outputs, &self.output_name)
    }
}

/// Extract the positive-class probability from session outputs.
///
/// Handles both tensor outputs and the seq(map(int64, float)) shape that
/// sklearn ZipMap exports produce.
fn extract_probability(outputs: &ort::session::SessionOutputs, output_name: &str) -> Result<f64> {
    if let Some(output) = outputs.get(output_name) {
        let dtype = output.dtype();

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let prob = positive_prob_from_tensor(&shape, data)?;
            debug!(prob = prob, "Extracted from tensor");
            return Ok(prob);
        }

        if DynSequenceValueType::can_downcast(&dtype) {
            if let Ok(prob) = extract_from_sequence_map(output) {
                return Ok(prob);
            }
        }
    }

    // Fallback: scan all outputs except the class label
    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }

        let dtype = output.dtype();

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let prob = positive_prob_from_tensor(&shape, data)?;
            debug!(output = %name, prob = prob, "Extracted from tensor (fallback)");
            return Ok(prob);
        }

        if DynSequenceValueType::can_downcast(&dtype) {
            if let Ok(prob) = extract_from_sequence_map(&output) {
                return Ok(prob);
            }
        }
    }

    Err(anyhow::anyhow!(
        "No probability output found (expected '{}')",
        output_name
    ))
}

/// Extract the positive-class probability from a seq(map(int64, float))
/// output, one class-to-probability map per batch row.
fn extract_from_sequence_map(output: &ort::value::DynValue) -> Result<f64> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("Output is not a sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    // One map per row; the service always scores a single row
    let row = maps
        .first()
        .ok_or_else(|| anyhow::anyhow!("Sequence output carries no rows"))?;

    let class_probs = row.try_extract_key_values::<i64, f32>()?;

    for (class_id, prob) in &class_probs {
        if *class_id == 1 {
            debug!(prob = *prob, "Extracted from seq(map)");
            return Ok(*prob as f64);
        }
    }

    // Degenerate single-class map: derive the positive side
    for (class_id, prob) in &class_probs {
        if *class_id == 0 {
            return Ok(1.0 - *prob as f64);
        }
    }

    Err(anyhow::anyhow!("Sequence output names neither class"))
}

/// Extract the positive-class probability from tensor data.
fn positive_prob_from_tensor(shape: &ort::tensor::Shape, data: &[f32]) -> Result<f64> {
    let dims: Vec<i64> = shape.iter().copied().collect();

    let num_classes = match dims.len() {
        2 => dims[1] as usize,
        1 => dims[0] as usize,
        _ => 0,
    };

    if num_classes >= 2 {
        // [batch, num_classes] with the positive class at index 1
        return Ok(data[1] as f64);
    }
    if num_classes == 1 {
        return Ok(data[0] as f64);
    }

    Err(anyhow::anyhow!(
        "Unexpected probability tensor shape {:?}",
        dims
    ))
}
