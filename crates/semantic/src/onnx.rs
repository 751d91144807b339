//! Local sentence-transformer inference through ONNX Runtime.
//!
//! Sessions are not `Send`, so each worker thread loads its own copy of a
//! model on first use and keeps it in a thread-local cache keyed by the
//! model and tokenizer paths. The embedder itself only carries paths and
//! settings, which keeps it shareable behind an `Arc<dyn Embedder>`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use onnxruntime::environment::Environment;
use onnxruntime::ndarray::{Array, Array2};
use onnxruntime::session::Session;
use tokenizers::Tokenizer;

use crate::config::SemanticConfig;
use crate::embedder::{check_batch_shape, Embedder, Embedding};
use crate::error::SemanticError;
use crate::normalize::l2_normalize_in_place;

static ORT_ENV: OnceCell<Environment> = OnceCell::new();

thread_local! {
    static MODEL_CACHE: RefCell<HashMap<ModelKey, Rc<LoadedModel>>> =
        RefCell::new(HashMap::new());
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct ModelKey {
    model_path: PathBuf,
    tokenizer_path: PathBuf,
}

struct LoadedModel {
    tokenizer: Tokenizer,
    session: RefCell<Session<'static>>,
}

impl LoadedModel {
    fn load(key: &ModelKey) -> Result<Self, SemanticError> {
        let tokenizer = Tokenizer::from_file(&key.tokenizer_path)
            .map_err(|e| SemanticError::Inference(e.to_string()))?;

        let session = ort_environment()?
            .new_session_builder()
            .map_err(|e| SemanticError::Inference(e.to_string()))?
            .with_model_from_file(key.model_path.clone())
            .map_err(|e| SemanticError::Inference(e.to_string()))?;

        tracing::info!(model = %key.model_path.display(), "loaded onnx model");
        Ok(Self {
            tokenizer,
            session: RefCell::new(session),
        })
    }
}

fn ort_environment() -> Result<&'static Environment, SemanticError> {
    ORT_ENV.get_or_try_init(|| {
        Environment::builder()
            .with_name("policyqa")
            .build()
            .map_err(|e| SemanticError::Inference(e.to_string()))
    })
}

fn cached_model(key: &ModelKey) -> Result<Rc<LoadedModel>, SemanticError> {
    MODEL_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(model) = cache.get(key) {
            return Ok(Rc::clone(model));
        }
        let model = Rc::new(LoadedModel::load(key)?);
        cache.insert(key.clone(), Rc::clone(&model));
        Ok(model)
    })
}

/// Embedder for `"onnx"` mode: runs an exported sentence-transformer
/// (all-MiniLM-L6-v2 by default) on the local CPU.
///
/// Models that emit token-level hidden states (`[batch, seq, hidden]`) are
/// mean-pooled over the attention mask. Models that already emit one vector
/// per text (`[batch, hidden]`) are used as-is.
#[derive(Debug, Clone)]
pub struct OnnxEmbedder {
    model_name: String,
    model_path: PathBuf,
    tokenizer_path: PathBuf,
    max_sequence_length: usize,
    normalize: bool,
}

impl OnnxEmbedder {
    /// Checks that both assets exist. The model itself is loaded lazily, once
    /// per worker thread, on the first call to [`Embedder::embed`].
    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let model_path = required_file(cfg.model_path.as_deref(), "model_path")?;
        let tokenizer_path = required_file(cfg.tokenizer_path.as_deref(), "tokenizer_path")?;
        if cfg.max_sequence_length == 0 {
            return Err(SemanticError::InvalidConfig(
                "max_sequence_length must be greater than zero".into(),
            ));
        }
        Ok(Self {
            model_name: cfg.model_name.clone(),
            model_path,
            tokenizer_path,
            max_sequence_length: cfg.max_sequence_length,
            normalize: cfg.normalize,
        })
    }

    fn key(&self) -> ModelKey {
        ModelKey {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
        }
    }

    fn run(&self, texts: &[String]) -> Result<Vec<Embedding>, SemanticError> {
        let model = cached_model(&self.key())?;
        let encoded = encode_documents(&model.tokenizer, texts, self.max_sequence_length)?;
        let (input_ids, attn_mask) = build_padded_arrays(encoded)?;
        let (flat, shape) = execute_session(&model.session, input_ids, attn_mask.clone())?;
        pool_outputs(&flat, &shape, &attn_mask)
    }
}

fn required_file(path: Option<&Path>, field: &str) -> Result<PathBuf, SemanticError> {
    let path = path.ok_or_else(|| {
        SemanticError::InvalidConfig(format!("{field} is required for onnx mode"))
    })?;
    if !path.is_file() {
        return Err(SemanticError::InvalidConfig(format!(
            "{field} does not point to a file: {}",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

#[async_trait]
impl Embedder for OnnxEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut vectors = self.run(texts)?;
        check_batch_shape(&vectors, texts.len())?;
        if self.normalize {
            vectors.iter_mut().for_each(|v| l2_normalize_in_place(v));
        }
        tracing::debug!(model = %self.model_name, batch = texts.len(), "onnx batch embedded");
        Ok(vectors)
    }
}

struct EncodedDoc {
    ids: Vec<i64>,
    mask: Vec<i64>,
}

fn encode_documents(
    tokenizer: &Tokenizer,
    texts: &[String],
    max_sequence_length: usize,
) -> Result<Vec<EncodedDoc>, SemanticError> {
    texts
        .iter()
        .map(|text| {
            let encoding = tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| SemanticError::Inference(e.to_string()))?;
            let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
            let mut mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&x| x as i64)
                .collect();
            ids.truncate(max_sequence_length);
            mask.truncate(max_sequence_length);
            Ok(EncodedDoc { ids, mask })
        })
        .collect()
}

fn build_padded_arrays(
    encoded: Vec<EncodedDoc>,
) -> Result<(Array2<i64>, Array2<i64>), SemanticError> {
    let seq_len = encoded.iter().map(|doc| doc.ids.len()).max().unwrap_or(0).max(1);
    let batch = encoded.len();
    let mut id_storage = Vec::with_capacity(batch * seq_len);
    let mut mask_storage = Vec::with_capacity(batch * seq_len);

    for EncodedDoc { ids, mask } in encoded {
        if ids.len() != mask.len() {
            return Err(SemanticError::Inference(
                "tokenizer produced mismatched id/mask lengths".into(),
            ));
        }
        let pad = seq_len - ids.len();
        id_storage.extend(ids);
        mask_storage.extend(mask);
        id_storage.extend(std::iter::repeat_n(0, pad));
        mask_storage.extend(std::iter::repeat_n(0, pad));
    }

    let input_ids = Array::from_shape_vec((batch, seq_len), id_storage)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    let attn_mask = Array::from_shape_vec((batch, seq_len), mask_storage)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    Ok((input_ids, attn_mask))
}

/// Runs one batch and returns the first output, flattened, with its shape.
fn execute_session(
    session: &RefCell<Session<'static>>,
    input_ids: Array2<i64>,
    attn_mask: Array2<i64>,
) -> Result<(Vec<f32>, Vec<usize>), SemanticError> {
    let (batch, seq_len) = input_ids.dim();
    let mut guard = session.borrow_mut();
    let session_ref = &mut *guard;
    let mut runtime_inputs = Vec::with_capacity(session_ref.inputs.len());
    let mut input_ids = Some(input_ids);
    let mut attn_mask = Some(attn_mask);

    for input in &session_ref.inputs {
        let tensor = match input.name.as_str() {
            "input_ids" => input_ids.take(),
            "attention_mask" => attn_mask.take(),
            "token_type_ids" => Some(Array::from_elem((batch, seq_len), 0_i64)),
            other => {
                return Err(SemanticError::Inference(format!(
                    "unsupported model input '{other}'"
                )))
            }
        };
        let tensor = tensor.ok_or_else(|| {
            SemanticError::Inference(format!("model requested '{}' twice", input.name))
        })?;
        runtime_inputs.push(tensor.into_dyn());
    }

    if runtime_inputs.is_empty() {
        return Err(SemanticError::Inference(
            "model did not declare any inputs".into(),
        ));
    }

    let outputs = session_ref
        .run::<i64, f32, _>(runtime_inputs)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    let output = outputs
        .into_iter()
        .next()
        .ok_or_else(|| SemanticError::Inference("model returned no outputs".into()))?;

    Ok((output.iter().copied().collect(), output.shape().to_vec()))
}

/// Turns a raw model output into one vector per text.
fn pool_outputs(
    flat: &[f32],
    shape: &[usize],
    attn_mask: &Array2<i64>,
) -> Result<Vec<Embedding>, SemanticError> {
    let (batch, seq_len) = attn_mask.dim();
    match *shape {
        [rows, hidden] if rows == batch => {
            Ok(flat.chunks(hidden.max(1)).map(<[f32]>::to_vec).collect())
        }
        [rows, tokens, hidden] if rows == batch && tokens == seq_len => {
            let mut vectors = Vec::with_capacity(batch);
            for row in 0..batch {
                let mut pooled = vec![0f32; hidden];
                let mut count = 0f32;
                for token in 0..seq_len {
                    if attn_mask[[row, token]] == 0 {
                        continue;
                    }
                    let start = (row * seq_len + token) * hidden;
                    for (acc, x) in pooled.iter_mut().zip(&flat[start..start + hidden]) {
                        *acc += x;
                    }
                    count += 1.0;
                }
                if count > 0.0 {
                    pooled.iter_mut().for_each(|x| *x /= count);
                }
                vectors.push(pooled);
            }
            Ok(vectors)
        }
        _ => Err(SemanticError::Inference(format!(
            "unexpected model output shape {shape:?} for a batch of {batch}x{seq_len}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(rows: Vec<Vec<i64>>) -> Array2<i64> {
        let (batch, seq_len) = (rows.len(), rows[0].len());
        Array::from_shape_vec((batch, seq_len), rows.concat()).unwrap()
    }

    #[test]
    fn sentence_level_output_is_split_per_row() {
        let attn = mask(vec![vec![1, 1], vec![1, 0]]);
        let vectors = pool_outputs(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3], &attn).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn token_level_output_is_mean_pooled_over_mask() {
        // Row 0 has two real tokens, row 1 one real token and one pad.
        let attn = mask(vec![vec![1, 1], vec![1, 0]]);
        let flat = [
            1.0, 3.0, // row 0 token 0
            3.0, 5.0, // row 0 token 1
            2.0, 2.0, // row 1 token 0
            9.0, 9.0, // row 1 padding
        ];
        let vectors = pool_outputs(&flat, &[2, 2, 2], &attn).unwrap();
        assert_eq!(vectors, vec![vec![2.0, 4.0], vec![2.0, 2.0]]);
    }

    #[test]
    fn mismatched_output_shape_is_inference_error() {
        let attn = mask(vec![vec![1, 1]]);
        let err = pool_outputs(&[0.0; 8], &[2, 4], &attn).unwrap_err();
        assert!(matches!(err, SemanticError::Inference(msg) if msg.contains("shape")));
    }

    #[test]
    fn padded_arrays_use_longest_sequence() {
        let encoded = vec![
            EncodedDoc {
                ids: vec![101, 7, 102],
                mask: vec![1, 1, 1],
            },
            EncodedDoc {
                ids: vec![101, 102],
                mask: vec![1, 1],
            },
        ];
        let (ids, attn) = build_padded_arrays(encoded).unwrap();
        assert_eq!(ids.dim(), (2, 3));
        assert_eq!(ids.row(1).to_vec(), vec![101, 102, 0]);
        assert_eq!(attn.row(1).to_vec(), vec![1, 1, 0]);
    }

    #[test]
    fn ragged_tokenizer_output_rejected() {
        let encoded = vec![EncodedDoc {
            ids: vec![101, 102],
            mask: vec![1],
        }];
        assert!(matches!(
            build_padded_arrays(encoded),
            Err(SemanticError::Inference(_))
        ));
    }

    #[test]
    fn missing_model_file_is_invalid_config() {
        let cfg = SemanticConfig::onnx("./no-such-model-dir");
        let err = OnnxEmbedder::from_config(&cfg).unwrap_err();
        assert!(matches!(err, SemanticError::InvalidConfig(msg) if msg.contains("model_path")));
    }

    #[test]
    fn missing_paths_are_invalid_config() {
        let cfg = SemanticConfig {
            mode: "onnx".into(),
            ..Default::default()
        };
        assert!(matches!(
            OnnxEmbedder::from_config(&cfg),
            Err(SemanticError::InvalidConfig(msg)) if msg.contains("required")
        ));
    }

    #[tokio::test]
    #[ignore = "requires local ONNX + tokenizer assets under models/"]
    async fn minilm_ranks_related_clause_higher() {
        let embedder =
            OnnxEmbedder::from_config(&SemanticConfig::onnx("../../models/all-MiniLM-L6-v2"))
                .unwrap();
        let texts = vec![
            "Is knee surgery covered?".to_string(),
            "Knee surgery is covered after a 2 year waiting period.".to_string(),
            "Maternity is excluded.".to_string(),
        ];
        let vectors = embedder.embed(&texts).await.unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0].len(), 384);
        let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
        assert!(dot(&vectors[0], &vectors[1]) > dot(&vectors[0], &vectors[2]));
    }
}
