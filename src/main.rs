use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use uiocr::{Alphabet, ModelRegistry, Ocr};

/// Recognize a fixed-geometry UI label from an image.
#[derive(Parser, Debug)]
#[command(name = "uiocr")]
struct Args {
    /// Image file to recognize
    image: PathBuf,

    /// Model type to run
    #[arg(short, long, default_value = "melon")]
    model: String,

    /// Directory holding the .onnx model artifacts
    #[arg(long, default_value = ".")]
    model_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(model = %args.model, image = %args.image.display(), "recognizing");

    let ocr = Ocr::new(
        ModelRegistry::builtin(),
        Alphabet::latin_upper(),
        args.model_dir,
    );
    let text = ocr.recognize(&args.image, &args.model)?;
    println!("{text}");
    Ok(())
}
