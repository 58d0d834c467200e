use crate::container::{EncodedVariant, IconContainer};
use crate::encode::{encode, ImageCodec, PngCodec};
use crate::error::ConvertError;
use crate::policy::{Mode, SizePolicy};
use crate::resample::{resample, Compositor, SmoothCompositor};
use crate::source::{ImageDecoder, PngDecoder, RawSource, SourceImage};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

//===========================================================================//

// Number of source images converted at once unless configured otherwise.
const DEFAULT_MAX_PARALLEL: usize = 4;

//===========================================================================//

/// Returns the ICO file name for a source: the final extension is replaced
/// with `.ico` (`logo.png` becomes `logo.ico`).  A leading dot does not
/// count as an extension separator.
pub fn output_name(source_name: &str) -> String {
    let base = match source_name.rfind('.') {
        Some(index) if index > 0 => &source_name[..index],
        _ => source_name,
    };
    format!("{}.ico", base)
}

//===========================================================================//

/// A finished ICO file and the name it should be stored under.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConversionResult {
    output_name: String,
    bytes: Vec<u8>,
}

impl ConversionResult {
    /// Returns the output file name, e.g. `logo.ico`.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns the ICO file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the result, returning the name and contents.
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.output_name, self.bytes)
    }
}

//===========================================================================//

/// What the caller intends to do with the results of a batch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BatchIntent {
    /// Each result is used on its own; failures are reported per source.
    Individual,
    /// All results go into one archive; any failure fails the batch.
    Archive,
}

/// The outcome of converting one source image within a batch.
#[derive(Debug)]
pub struct SourceOutcome {
    /// The name the source was submitted under.
    pub name: String,
    /// The converted file, or why conversion failed.
    pub result: Result<ConversionResult, ConvertError>,
}

/// Per-source outcomes of a batch, in the same order as the input.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    outcomes: Vec<SourceOutcome>,
}

impl BatchOutcome {
    /// Returns the number of sources in the batch.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if the batch had no sources.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns every outcome, indexed like the input sources.
    pub fn outcomes(&self) -> &[SourceOutcome] {
        &self.outcomes
    }

    /// Returns the successful results, in input order.
    pub fn results(&self) -> impl Iterator<Item = &ConversionResult> {
        self.outcomes.iter().filter_map(|outcome| outcome.result.as_ref().ok())
    }

    /// Returns the outcomes that failed, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    /// Returns the number of sources that failed.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Returns the names of the sources that failed.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failures().map(|outcome| outcome.name.as_str()).collect()
    }

    /// Consumes the outcome, returning the successful results in input
    /// order.
    pub fn into_results(self) -> Vec<ConversionResult> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| outcome.result.ok())
            .collect()
    }
}

/// A batch that did not produce a usable set of results.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// At least one source failed while building a combined archive.  The
    /// outcome still holds every successful result.
    #[error(
        "{} of {} source image(s) failed: {}",
        .0.failure_count(),
        .0.len(),
        .0.failed_names().join(", ")
    )]
    Partial(BatchOutcome),
    /// The batch was cancelled; no results are kept.
    #[error("batch conversion cancelled")]
    Cancelled,
    /// The worker pool could not be started.
    #[error("cannot start conversion workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

//===========================================================================//

/// A shared flag for abandoning an in-flight batch.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Requests cancellation of every pipeline holding this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ConvertError> {
        if self.is_cancelled() {
            Err(ConvertError::Cancelled)
        } else {
            Ok(())
        }
    }
}

//===========================================================================//

/// Converts source images into ICO files.
///
/// The collaborators (decoder, compositor, codec) and the size policy are
/// fixed when the converter is built; a converter can be shared across
/// threads and reused for any number of conversions.
pub struct Converter {
    policy: SizePolicy,
    decoder: Box<dyn ImageDecoder>,
    compositor: Box<dyn Compositor>,
    codec: Box<dyn ImageCodec>,
    max_parallel: usize,
}

impl Converter {
    /// Creates a converter with the standard size policy, PNG input and
    /// output, and bilinear resampling.
    pub fn new() -> Converter {
        Converter {
            policy: SizePolicy::standard(),
            decoder: Box::new(PngDecoder),
            compositor: Box::new(SmoothCompositor),
            codec: Box::new(PngCodec),
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    /// Replaces the size policy.
    pub fn with_policy(mut self, policy: SizePolicy) -> Converter {
        self.policy = policy;
        self
    }

    /// Replaces the image decoder.
    pub fn with_decoder<D>(mut self, decoder: D) -> Converter
    where
        D: ImageDecoder + 'static,
    {
        self.decoder = Box::new(decoder);
        self
    }

    /// Replaces the compositor used for resampling.
    pub fn with_compositor<C>(mut self, compositor: C) -> Converter
    where
        C: Compositor + 'static,
    {
        self.compositor = Box::new(compositor);
        self
    }

    /// Replaces the codec used for compressed-tier variants.
    pub fn with_codec<C>(mut self, codec: C) -> Converter
    where
        C: ImageCodec + 'static,
    {
        self.codec = Box::new(codec);
        self
    }

    /// Sets how many source images a batch converts at once (at least 1).
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Converter {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Returns the size policy.
    pub fn policy(&self) -> &SizePolicy {
        &self.policy
    }

    /// Converts one decoded image into a complete ICO file.
    pub fn convert_one(
        &self,
        source: &SourceImage,
        mode: Mode,
    ) -> Result<Vec<u8>, ConvertError> {
        let container =
            self.convert_container(source, mode, &CancelToken::new())?;
        Ok(container.into_bytes())
    }

    /// Decodes and converts one source for immediate use.  Errors are
    /// reported for this source only.
    pub fn convert_raw(
        &self,
        raw: &RawSource,
        mode: Mode,
    ) -> Result<ConversionResult, ConvertError> {
        self.convert_pipeline(raw, mode, &CancelToken::new())
    }

    /// Resamples and encodes every variant `mode` calls for, and assembles
    /// them into a container in policy order.
    pub fn convert_container(
        &self,
        source: &SourceImage,
        mode: Mode,
        cancel: &CancelToken,
    ) -> Result<IconContainer, ConvertError> {
        let specs = self.policy.specs(mode);
        let mut variants = Vec::with_capacity(specs.len());
        for &spec in specs.iter() {
            cancel.check()?;
            let pixels = resample(
                self.compositor.as_ref(),
                source,
                spec.width,
                spec.height,
            )?;
            let payload = encode(&pixels, spec.tier, self.codec.as_ref())?;
            variants.push(EncodedVariant { spec, payload });
        }
        cancel.check()?;
        IconContainer::assemble(variants)
    }

    fn convert_pipeline(
        &self,
        raw: &RawSource,
        mode: Mode,
        cancel: &CancelToken,
    ) -> Result<ConversionResult, ConvertError> {
        cancel.check()?;
        let source = SourceImage::decode(raw, self.decoder.as_ref())?;
        let container = self.convert_container(&source, mode, cancel)?;
        Ok(ConversionResult {
            output_name: output_name(source.name()),
            bytes: container.into_bytes(),
        })
    }

    /// Converts every source, keeping results in input order.
    ///
    /// A failing source never stops the others.  With
    /// `BatchIntent::Individual` the outcome is returned as-is, failures
    /// included; with `BatchIntent::Archive` any failure turns the batch
    /// into `BatchError::Partial`, which still carries the outcome.
    pub fn convert_batch(
        &self,
        sources: &[RawSource],
        mode: Mode,
        intent: BatchIntent,
    ) -> Result<BatchOutcome, BatchError> {
        let cancel = CancelToken::new();
        self.convert_batch_with_cancel(sources, mode, intent, &cancel)
    }

    /// Like `convert_batch`, but abandons the batch once `cancel` fires.
    pub fn convert_batch_with_cancel(
        &self,
        sources: &[RawSource],
        mode: Mode,
        intent: BatchIntent,
        cancel: &CancelToken,
    ) -> Result<BatchOutcome, BatchError> {
        if sources.is_empty() {
            return Ok(BatchOutcome::default());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_parallel.min(sources.len()))
            .build()?;
        let outcomes: Vec<SourceOutcome> = pool.install(|| {
            sources
                .par_iter()
                .map(|raw| SourceOutcome {
                    name: raw.name().to_string(),
                    result: self.convert_pipeline(raw, mode, cancel),
                })
                .collect()
        });
        if cancel.is_cancelled() {
            log::info!("Batch of {} source(s) cancelled", sources.len());
            return Err(BatchError::Cancelled);
        }
        let outcome = BatchOutcome { outcomes };
        for failure in outcome.failures() {
            if let Err(ref error) = failure.result {
                log::warn!("Failed to convert {}: {}", failure.name, error);
            }
        }
        log::info!(
            "Converted {} of {} source(s) ({:?})",
            outcome.len() - outcome.failure_count(),
            outcome.len(),
            mode
        );
        if intent == BatchIntent::Archive && outcome.failure_count() > 0 {
            return Err(BatchError::Partial(outcome));
        }
        Ok(outcome)
    }
}

impl Default for Converter {
    fn default() -> Converter {
        Converter::new()
    }
}

//===========================================================================//


//===========================================================================//
