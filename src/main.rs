//! biopredict - Main Entry Point
//!
//! Loads the model once, then answers submissions given either as flags or
//! as comma-separated lines on stdin (`pregnancies,glucose,blood_pressure,skin_thickness`).

use anyhow::Result;
use biopredict::{
    config::AppConfig,
    controller::{PredictionController, Submission},
    models::{AssetDirSource, ModelLoader, ModelPredictor},
    types::FeatureInputs,
};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "biopredict", version, about = "Predict a health target from four measurements")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = biopredict::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory holding the model asset (overrides config)
    #[arg(long)]
    assets_dir: Option<String>,

    /// Model asset name (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Number of pregnancies
    #[arg(long, allow_hyphen_values = true)]
    pregnancies: Option<String>,

    /// Plasma glucose concentration
    #[arg(long, allow_hyphen_values = true)]
    glucose: Option<String>,

    /// Diastolic blood pressure
    #[arg(long, allow_hyphen_values = true)]
    blood_pressure: Option<String>,

    /// Triceps skin fold thickness
    #[arg(long, allow_hyphen_values = true)]
    skin_thickness: Option<String>,

    /// Print one JSON object per submission
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Inputs given as flags, if any flag was used
    fn flag_inputs(&self) -> Option<FeatureInputs> {
        let fields = [
            &self.pregnancies,
            &self.glucose,
            &self.blood_pressure,
            &self.skin_thickness,
        ];
        if fields.iter().all(|f| f.is_none()) {
            return None;
        }
        let [p, g, bp, st] = fields.map(|f| f.clone().unwrap_or_default());
        Some(FeatureInputs::new(p, g, bp, st))
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("biopredict={}", config.logging.level).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn emit(submission: &Submission, json: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        let value = serde_json::json!({
            "display": submission.message.to_string(),
            "prediction": submission.prediction,
        });
        writeln!(stdout, "{}", value)?;
    } else {
        writeln!(stdout, "{}", submission.message)?;
    }
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(dir) = &cli.assets_dir {
        config.model.assets_dir = dir.clone();
    }
    if let Some(name) = &cli.model {
        config.model.asset_name = name.clone();
    }

    init_logging(&config)?;
    info!(
        config = %cli.config.display(),
        asset = %config.model.asset_path().display(),
        "Starting biopredict"
    );

    // The model must load before any submission is accepted
    let source =
        AssetDirSource::new(&config.model.assets_dir).with_memory_map(config.model.memory_map);
    let loader = ModelLoader::with_threads(config.model.onnx_threads);
    let model = loader
        .load(&source, &config.model.asset_name)
        .map_err(|e| {
            error!(error = %e, "Model could not be loaded");
            e
        })?;

    let predictor = ModelPredictor::new(model);
    info!(model = predictor.model_name(), "Ready for submissions");
    let mut controller = PredictionController::with_display(predictor, &config.display);

    if let Some(inputs) = cli.flag_inputs() {
        let submission = controller.submit(&inputs);
        emit(&submission, cli.json)?;
    } else {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        if interactive {
            eprintln!("Enter pregnancies,glucose,blood_pressure,skin_thickness (empty line or 'quit' to exit)");
        }

        for line in stdin.lock().lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed == "quit" || trimmed == "exit" || (interactive && trimmed.is_empty()) {
                break;
            }
            let submission = controller.submit(&FeatureInputs::from_line(&line));
            emit(&submission, cli.json)?;
        }
    }

    controller.metrics().print_summary();
    Ok(())
}
