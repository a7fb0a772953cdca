//! End-to-end post-processing: letterbox, decode, suppress.
//!
//! `Pipeline` holds only immutable configuration and the label table, so one
//! instance can serve concurrent calls on independent tensors.

use crate::candidate::detection::Detection;
use crate::candidate::nms::suppress;
use crate::decode::observer::DecodeObserver;
use crate::decode::{decode_with_observer, CoordSpace, DecodeConfig};
use crate::geometry::letterbox::{compute_params, LetterboxParams};
use crate::labels::LabelTable;
use crate::tensor::TensorView;
use crate::trace::trace_span;
use crate::util::{DetPostError, DetPostResult};

/// Configuration fixed per pipeline instance.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Side length of the square network input.
    pub input_size: u32,
    /// Minimum best-class score for a candidate to be decoded.
    pub confidence_threshold: f32,
    /// Same-class overlap above which the weaker box is suppressed.
    pub iou_threshold: f32,
    /// Maximum number of detections returned.
    pub max_detections: usize,
    /// Letterbox (preserve aspect ratio) instead of stretching.
    pub aspect_ratio_correction: bool,
    /// Units of the tensor's box columns.
    pub coord_space: CoordSpace,
    /// Decode rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_size: 640,
            confidence_threshold: 0.5,
            iou_threshold: 0.45,
            max_detections: 100,
            aspect_ratio_correction: false,
            coord_space: CoordSpace::InputPixels,
            parallel: false,
        }
    }
}

impl PipelineConfig {
    /// Checks that every parameter is in range.
    pub fn validate(&self) -> DetPostResult<()> {
        if self.input_size == 0 {
            return Err(DetPostError::InvalidArgument("input_size must be positive"));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DetPostError::InvalidArgument(
                "confidence_threshold must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(DetPostError::InvalidArgument(
                "iou_threshold must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Returns the decode options derived from this configuration.
    pub fn decode_config(&self) -> DecodeConfig {
        DecodeConfig {
            confidence_threshold: self.confidence_threshold,
            coord_space: self.coord_space,
        }
    }
}

/// Configured detector post-processor.
#[derive(Clone, Debug)]
pub struct Pipeline {
    labels: LabelTable,
    cfg: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with the default configuration.
    pub fn new(labels: LabelTable) -> Self {
        Self {
            labels,
            cfg: PipelineConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: PipelineConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Returns the label table.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Computes the letterbox mapping for an original image size.
    pub fn letterbox(
        &self,
        original_width: u32,
        original_height: u32,
    ) -> DetPostResult<LetterboxParams> {
        compute_params(
            original_width,
            original_height,
            self.cfg.input_size,
            self.cfg.aspect_ratio_correction,
        )
    }

    /// Turns one raw tensor into the final detections for an image.
    pub fn run(
        &self,
        tensor: TensorView<'_>,
        original_width: u32,
        original_height: u32,
    ) -> DetPostResult<Vec<Detection>> {
        self.cfg.validate()?;
        let _span = trace_span!("pipeline", width = original_width, height = original_height)
            .entered();

        let params = self.letterbox(original_width, original_height)?;
        let decoded = self.decode(tensor, &params)?;
        Ok(suppress(
            decoded,
            self.cfg.iou_threshold,
            self.cfg.max_detections,
        ))
    }

    /// Like [`run`](Self::run), reporting per-candidate outcomes to `observer`.
    ///
    /// Always decodes sequentially.
    pub fn run_with_observer(
        &self,
        tensor: TensorView<'_>,
        original_width: u32,
        original_height: u32,
        observer: &mut dyn DecodeObserver,
    ) -> DetPostResult<Vec<Detection>> {
        self.cfg.validate()?;
        let _span = trace_span!("pipeline", width = original_width, height = original_height)
            .entered();

        let params = self.letterbox(original_width, original_height)?;
        let decoded = decode_with_observer(
            tensor,
            &params,
            &self.labels,
            &self.cfg.decode_config(),
            observer,
        )?;
        Ok(suppress(
            decoded,
            self.cfg.iou_threshold,
            self.cfg.max_detections,
        ))
    }

    #[cfg(feature = "rayon")]
    fn decode(
        &self,
        tensor: TensorView<'_>,
        params: &LetterboxParams,
    ) -> DetPostResult<Vec<Detection>> {
        let decode_cfg = self.cfg.decode_config();
        if self.cfg.parallel {
            crate::decode::par::decode_par(tensor, params, &self.labels, &decode_cfg)
        } else {
            crate::decode::decode(tensor, params, &self.labels, &decode_cfg)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn decode(
        &self,
        tensor: TensorView<'_>,
        params: &LetterboxParams,
    ) -> DetPostResult<Vec<Detection>> {
        crate::decode::decode(tensor, params, &self.labels, &self.cfg.decode_config())
    }
}
