// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Regression model loading and inference.
//!
//! A model directory holds one or more exported graph variants. The serving
//! tag picks `<tag>.onnx`; a directory with a single `.onnx` file is accepted
//! whatever the tag. [`RegressionModel`] wraps the ONNX Runtime session and
//! implements [`Regressor`], the one-row contract the scoring loop relies on.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;

use crate::error::{InferenceError, Result};
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, Features};
use crate::inference::InferenceConfig;

/// Something that turns the twelve named inputs of a row into one value.
pub trait Regressor {
    /// Predict the target for one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the prediction could not be computed. The caller
    /// skips the row and carries on.
    fn predict(&mut self, features: &Features) -> Result<f32>;
}

impl<F> Regressor for F
where
    F: FnMut(&Features) -> Result<f32>,
{
    fn predict(&mut self, features: &Features) -> Result<f32> {
        self(features)
    }
}

/// Exported regressor running on ONNX Runtime.
///
/// # Example
///
/// ```no_run
/// use regression_inference::{Features, RegressionModel, Regressor};
///
/// let mut model = RegressionModel::load("saved_models/1513701267")?;
/// let features = Features::new([1.0, 7.0, 0.3, 0.2, 5.0, 0.05, 15.0, 50.0, 0.99, 3.2, 0.6, 9.5]);
/// println!("quality {:.2}", model.predict(&features)?);
/// # Ok::<(), regression_inference::InferenceError>(())
/// ```
pub struct RegressionModel {
    /// ONNX Runtime session.
    session: Session,
    /// Graph file the session was created from.
    path: PathBuf,
    /// Graph input name for each feature, in feature order.
    feeds: Vec<String>,
    /// Graph output name holding the prediction.
    fetch: String,
}

impl RegressionModel {
    /// Load the default serving graph from a model directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or graph can't be read, or if the
    /// graph lacks one of the expected inputs or the output node.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::load_with_config(dir, &InferenceConfig::default())
    }

    /// Load a model with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `dir` - Model directory.
    /// * `config` - Tag, output node and thread settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or graph can't be read, or if the
    /// graph lacks one of the expected inputs or the output node.
    pub fn load_with_config<P: AsRef<Path>>(dir: P, config: &InferenceConfig) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            return Err(InferenceError::ModelLoadError(format!(
                "Model directory not found: {}",
                dir.display()
            )));
        }

        let path = resolve_graph(dir, &config.tag)?;

        #[allow(unused_mut)]
        let mut builder = Session::builder().map_err(|e| {
            InferenceError::ModelLoadError(format!("Failed to create session builder: {e}"))
        })?;

        #[cfg(feature = "cuda")]
        {
            builder = builder
                .with_execution_providers([CUDAExecutionProvider::default().build()])
                .map_err(|e| {
                    InferenceError::ModelLoadError(format!("Failed to register CUDA EP: {e}"))
                })?;
        }

        #[cfg(feature = "coreml")]
        {
            builder = builder
                .with_execution_providers([CoreMLExecutionProvider::default().build()])
                .map_err(|e| {
                    InferenceError::ModelLoadError(format!("Failed to register CoreML EP: {e}"))
                })?;
        }

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| {
                InferenceError::ModelLoadError(format!("Failed to set optimization level: {e}"))
            })?
            .with_intra_threads(config.num_threads)
            .map_err(|e| {
                InferenceError::ModelLoadError(format!("Failed to set intra-thread count: {e}"))
            })?
            .commit_from_file(&path)
            .map_err(|e| {
                InferenceError::ModelLoadError(format!(
                    "Failed to load model {}: {e}",
                    path.display()
                ))
            })?;

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        let feeds = resolve_feeds(&input_names)?;
        let fetch = resolve_fetch(&output_names, &config.fetch)?;

        Ok(Self {
            session,
            path,
            feeds,
            fetch,
        })
    }

    /// Graph file the model was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Graph input names, in feature order.
    #[must_use]
    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }

    /// Graph output name read for each prediction.
    #[must_use]
    pub fn fetch(&self) -> &str {
        &self.fetch
    }
}

impl Regressor for RegressionModel {
    fn predict(&mut self, features: &Features) -> Result<f32> {
        // Input tensors and outputs live only for this call.
        let mut inputs: Vec<(&str, Tensor<f32>)> = Vec::with_capacity(FEATURE_COUNT);
        for (feed, value) in self.feeds.iter().zip(features.values()) {
            let tensor = Tensor::from_array(ndarray::arr1(&[*value])).map_err(|e| {
                InferenceError::InferenceError(format!("Failed to create input tensor '{feed}': {e}"))
            })?;
            inputs.push((feed.as_str(), tensor));
        }

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| InferenceError::InferenceError(format!("Inference failed: {e}")))?;

        let output = outputs.get(self.fetch.as_str()).ok_or_else(|| {
            InferenceError::InferenceError(format!("Output '{}' not found", self.fetch))
        })?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::InferenceError(format!("Failed to extract output: {e}")))?;

        data.first().copied().ok_or_else(|| {
            InferenceError::InferenceError(format!("Output '{}' is empty", self.fetch))
        })
    }
}

impl std::fmt::Debug for RegressionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegressionModel")
            .field("path", &self.path)
            .field("feeds", &self.feeds)
            .field("fetch", &self.fetch)
            .finish()
    }
}

/// Pick the graph file for a serving tag inside a model directory.
///
/// # Errors
///
/// Returns an error if the tag is not a plain name, if the directory can't
/// be listed, or if neither `<tag>.onnx` nor a single `.onnx` file exists.
pub fn resolve_graph(dir: &Path, tag: &str) -> Result<PathBuf> {
    if tag.is_empty() || tag.contains(['/', '\\']) || tag == "." || tag == ".." {
        return Err(InferenceError::ConfigError(format!("Invalid serving tag: '{tag}'")));
    }

    let tagged = dir.join(format!("{tag}.onnx"));
    if tagged.is_file() {
        return Ok(tagged);
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        InferenceError::ModelLoadError(format!("Cannot list {}: {e}", dir.display()))
    })?;

    let mut graphs: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"))
        })
        .collect();

    match graphs.len() {
        1 => Ok(graphs.remove(0)),
        0 => Err(InferenceError::ModelLoadError(format!(
            "No .onnx graph found in {}",
            dir.display()
        ))),
        n => Err(InferenceError::ModelLoadError(format!(
            "No graph for tag '{tag}' in {} and {n} candidates to choose from",
            dir.display()
        ))),
    }
}

/// Match each feature to a graph input.
///
/// Inputs exported from a serving signature may carry a `:0` output-index
/// suffix; both `alcohol` and `alcohol:0` are accepted.
fn resolve_feeds(input_names: &[String]) -> Result<Vec<String>> {
    let mut feeds = Vec::with_capacity(FEATURE_COUNT);
    let mut missing = Vec::new();

    for name in FEATURE_NAMES {
        let suffixed = format!("{name}:0");
        match input_names
            .iter()
            .find(|input| input.as_str() == name || **input == suffixed)
        {
            Some(input) => feeds.push(input.clone()),
            None => missing.push(name),
        }
    }

    if missing.is_empty() {
        Ok(feeds)
    } else {
        Err(InferenceError::ModelLoadError(format!(
            "Model is missing inputs: {} (graph inputs: {})",
            missing.join(", "),
            input_names.join(", ")
        )))
    }
}

/// Check that the requested output node exists.
///
/// A fetch name given with a `:0` suffix also matches the bare node name.
fn resolve_fetch(output_names: &[String], fetch: &str) -> Result<String> {
    let bare = fetch.strip_suffix(":0").unwrap_or(fetch);
    output_names
        .iter()
        .find(|output| output.as_str() == fetch || output.as_str() == bare)
        .cloned()
        .ok_or_else(|| {
            InferenceError::ModelLoadError(format!(
                "Model has no output '{fetch}' (graph outputs: {})",
                output_names.join(", ")
            ))
        })
}
