//! Export a persisted element list to SVG.

use clap::Parser;
use kurbo::Size;
use sketchcanvas_core::store::{ElementStore, StoreError};
use sketchcanvas_render::{Renderer, RendererError, SceneContext, SvgRenderer};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
enum ExportError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON element list to read.
    input: PathBuf,
    /// SVG file to write.
    output: PathBuf,
    /// Output width in pixels.
    #[arg(long, default_value_t = 1000.0)]
    width: f64,
    /// Output height in pixels.
    #[arg(long, default_value_t = 750.0)]
    height: f64,
    /// Render text in bold.
    #[arg(long)]
    bold: bool,
}

impl Args {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn run(args: &Args) -> Result<(), ExportError> {
    let json = std::fs::read_to_string(&args.input).map_err(|source| ExportError::Io {
        path: args.input.clone(),
        source,
    })?;
    let store = ElementStore::from_json(&json)?;
    log::info!(
        "Loaded {} elements ({} images skipped) from {}",
        store.len(),
        store.image_elements().len(),
        args.input.display()
    );

    let mut renderer = SvgRenderer::new();
    renderer.build_scene(&SceneContext::new(&store, args.size()).with_text_bold(args.bold))?;
    std::fs::write(&args.output, renderer.document()).map_err(|source| ExportError::Io {
        path: args.output.clone(),
        source,
    })?;
    log::info!("Wrote {}", args.output.display());
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["sketchcanvas-export", "in.json", "out.svg"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.json"));
        assert_eq!(args.output, PathBuf::from("out.svg"));
        assert_eq!(args.size(), Size::new(1000.0, 750.0));
        assert!(!args.bold);
    }

    #[test]
    fn test_parse_size_and_flag() {
        let args = Args::try_parse_from([
            "sketchcanvas-export",
            "in.json",
            "--bold",
            "out.svg",
            "--width",
            "640",
            "--height",
            "480",
        ])
        .unwrap();
        assert_eq!(args.size(), Size::new(640.0, 480.0));
        assert!(args.bold);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Args::try_parse_from(["sketchcanvas-export", "in.json"]).is_err());
        assert!(
            Args::try_parse_from(["sketchcanvas-export", "in.json", "out.svg", "--width", "wide"])
                .is_err()
        );
        assert!(
            Args::try_parse_from(["sketchcanvas-export", "in.json", "out.svg", "--shiny"]).is_err()
        );
    }

    #[test]
    fn test_run_round_trip() {
        let dir = std::env::temp_dir().join(format!("sketchcanvas-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.json");
        let output = dir.join("out.svg");
        std::fs::write(
            &input,
            r##"[{"type": "line", "id": "6f1c9a52-7d0e-4b8e-9a57-3f2f6b1d2c11", "zIndex": 1,
                 "color": "#112233", "strokeWidth": 0.5, "opacity": 100,
                 "startX": 10, "startY": 10, "endX": 90, "endY": 90}]"##,
        )
        .unwrap();
        let args = Args {
            input,
            output: output.clone(),
            width: 100.0,
            height: 100.0,
            bold: false,
        };
        run(&args).unwrap();
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains(r##"stroke="#112233""##));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
