use clap::Parser;
use detpost::{
    load_rgb_image, CoordSpace, DecodeStats, Detection, LabelTable, OwnedTensor, Pipeline,
    PipelineConfig, TensorLayout,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "detpost CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Include per-candidate decode statistics in the output.
    #[arg(long)]
    stats: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LayoutConfig {
    CandidateMajor,
    AttributeMajor,
}

impl From<LayoutConfig> for TensorLayout {
    fn from(value: LayoutConfig) -> Self {
        match value {
            LayoutConfig::CandidateMajor => TensorLayout::CandidateMajor,
            LayoutConfig::AttributeMajor => TensorLayout::AttributeMajor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CoordSpaceConfig {
    InputPixels,
    Normalized,
}

impl From<CoordSpaceConfig> for CoordSpace {
    fn from(value: CoordSpaceConfig) -> Self {
        match value {
            CoordSpaceConfig::InputPixels => CoordSpace::InputPixels,
            CoordSpaceConfig::Normalized => CoordSpace::Normalized,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PipelineConfigJson {
    input_size: u32,
    confidence_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
    aspect_ratio_correction: bool,
    coord_space: CoordSpaceConfig,
    parallel: bool,
}

impl Default for PipelineConfigJson {
    fn default() -> Self {
        let cfg = PipelineConfig::default();
        Self {
            input_size: cfg.input_size,
            confidence_threshold: cfg.confidence_threshold,
            iou_threshold: cfg.iou_threshold,
            max_detections: cfg.max_detections,
            aspect_ratio_correction: cfg.aspect_ratio_correction,
            coord_space: CoordSpaceConfig::InputPixels,
            parallel: cfg.parallel,
        }
    }
}

impl From<PipelineConfigJson> for PipelineConfig {
    fn from(value: PipelineConfigJson) -> Self {
        Self {
            input_size: value.input_size,
            confidence_threshold: value.confidence_threshold,
            iou_threshold: value.iou_threshold,
            max_detections: value.max_detections,
            aspect_ratio_correction: value.aspect_ratio_correction,
            coord_space: value.coord_space.into(),
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    layout: LayoutConfig,
    labels_path: Option<String>,
    image_path: Option<String>,
    original_width: Option<u32>,
    original_height: Option<u32>,
    output_path: Option<String>,
    pipeline: PipelineConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tensor_path: String::new(),
            layout: LayoutConfig::CandidateMajor,
            labels_path: None,
            image_path: None,
            original_width: None,
            original_height: None,
            output_path: None,
            pipeline: PipelineConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    label: String,
    confidence: f32,
    class_id: i32,
}

impl From<Detection> for DetectionRecord {
    fn from(value: Detection) -> Self {
        let bbox = *value.bounding_box();
        Self {
            left: bbox.left,
            top: bbox.top,
            right: bbox.right,
            bottom: bbox.bottom,
            label: value.label().to_owned(),
            confidence: value.confidence(),
            class_id: value.class_id(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StatsRecord {
    accepted: usize,
    low_confidence: usize,
    degenerate: usize,
    outside_content: usize,
    degenerate_after_clamp: usize,
}

impl From<DecodeStats> for StatsRecord {
    fn from(value: DecodeStats) -> Self {
        Self {
            accepted: value.accepted,
            low_confidence: value.low_confidence,
            degenerate: value.degenerate,
            outside_content: value.outside_content,
            degenerate_after_clamp: value.degenerate_after_clamp,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    detections: Vec<DetectionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<StatsRecord>,
}

/// Reads a nested JSON array; the outer axis follows `layout`.
fn load_tensor(path: &str, layout: TensorLayout) -> Result<OwnedTensor, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let nested: Vec<Vec<f32>> = serde_json::from_str(&text)?;
    match layout {
        TensorLayout::CandidateMajor => Ok(OwnedTensor::from_row_vecs(&nested)?),
        TensorLayout::AttributeMajor => {
            let planes = OwnedTensor::from_row_vecs(&nested)?;
            let num_attributes = nested.len();
            let num_candidates = nested.first().map_or(0, Vec::len);
            Ok(OwnedTensor::new(
                planes.into_vec(),
                num_candidates,
                num_attributes,
                TensorLayout::AttributeMajor,
            )?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("detpost=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }

    let (width, height) = match (&config.image_path, config.original_width, config.original_height)
    {
        (_, Some(w), Some(h)) => (w, h),
        (Some(path), _, _) => load_rgb_image(path)?.dimensions(),
        _ => return Err("set original_width/original_height or image_path".into()),
    };

    let layout: TensorLayout = config.layout.into();
    let tensor = load_tensor(&config.tensor_path, layout)?;
    let num_classes = tensor.view().num_classes();
    let labels = match &config.labels_path {
        Some(path) => LabelTable::load_or_synthetic(path, num_classes),
        None => LabelTable::synthetic(num_classes),
    };

    let pipeline = Pipeline::new(labels).with_config(config.pipeline.into());
    let (detections, stats) = if cli.stats {
        let mut stats = DecodeStats::default();
        let dets = pipeline.run_with_observer(tensor.view(), width, height, &mut stats)?;
        (dets, Some(stats))
    } else {
        (pipeline.run(tensor.view(), width, height)?, None)
    };
    tracing::info!(count = detections.len(), width, height, "post-processing done");

    let output = Output {
        detections: detections.into_iter().map(DetectionRecord::from).collect(),
        stats: stats.map(StatsRecord::from),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
