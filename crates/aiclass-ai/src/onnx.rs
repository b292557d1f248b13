//! ONNX Runtime backend for a fine-tuned sequence-classification model.
//!
//! Expects a transformer exported with a classification head over the eight
//! categories (e.g. a fine-tuned distilbert-base-multilingual-cased). The model
//! directory must contain `model.onnx` and `tokenizer.json`.

use std::path::Path;
use std::sync::Mutex;

use aiclass_core::Category;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::statistical::{InferenceError, ModelUnavailable, Prediction, StatisticalClassifier};

/// Token limit applied at tokenisation.
const MAX_LENGTH: usize = 512;

/// Sequence classifier backed by an ONNX Runtime session.
///
/// A session run needs exclusive access, so the session sits behind a mutex.
pub struct OnnxClassifier {
    session: Option<Mutex<Session>>,
    tokenizer: Tokenizer,
    uses_token_types: bool,
    name: String,
}

impl OnnxClassifier {
    /// Load a model from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> Result<Self, ModelUnavailable> {
        Self::try_load(model_dir).map_err(|e| ModelUnavailable(format!("{e:#}")))
    }

    fn try_load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;

        // DistilBERT exports have no token_type_ids input; BERT exports do.
        let uses_token_types = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let labels = infer_labels(session.outputs()[0].dtype());
        anyhow::ensure!(
            labels.is_none_or(|n| n == Category::COUNT),
            "model has {} output labels, expected {}",
            labels.unwrap_or_default(),
            Category::COUNT
        );

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        info!(model = %model_path.display(), uses_token_types, "loaded classification model");
        Ok(Self {
            session: Some(Mutex::new(session)),
            tokenizer,
            uses_token_types,
            name,
        })
    }

    fn logits(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("model released"))?;

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let seq_len = encoding.get_ids().len();
        let shape = [1i64, seq_len as i64];
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&v| v as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&v| v as i64)
            .collect();

        let ids_tensor = Tensor::from_array((shape, ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, mask.into_boxed_slice()))?;

        let mut session = session
            .lock()
            .map_err(|_| anyhow::Error::new(InferenceError::Poisoned))?;

        let outputs = if self.uses_token_types {
            let types: Vec<i64> = encoding.get_type_ids().iter().map(|&v| v as i64).collect();
            let type_tensor = Tensor::from_array((shape, types.into_boxed_slice()))?;
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor,
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ])?
        };

        // Logits: [1, num_labels].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] == 1,
            "unexpected output shape: {dims:?}, expected [1, {}]",
            Category::COUNT
        );
        Ok(output_data.to_vec())
    }
}

impl StatisticalClassifier for OnnxClassifier {
    fn predict(&self, text: &str) -> Result<Prediction, InferenceError> {
        let logits = self.logits(text).map_err(|e| match e.downcast::<InferenceError>() {
            Ok(inner) => inner,
            Err(e) => InferenceError::Backend(format!("{e:#}")),
        })?;
        let probs = softmax(&logits);
        let (idx, confidence) = argmax(&probs)
            .ok_or_else(|| InferenceError::InvalidOutput("empty logits".to_string()))?;
        Ok(Prediction::new(idx as i64, confidence))
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn release(&mut self) {
        self.session = None;
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|e| e / sum).collect()
    } else {
        exps
    }
}

/// Index and value of the largest element; the first one on ties.
fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}

/// Number of labels from the model's output type, when static.
fn infer_labels(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
