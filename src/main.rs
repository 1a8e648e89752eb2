//! # Podium CLI
//!
//! Usage:
//!   podium design.json --data results.json -o scene.json
//!   echo '{ ... }' | podium --data results.json
//!   podium design.json --data results.json --load
//!   podium --example > design.json
//!
//! Set `RUST_LOG=debug` to see layout decisions.

use std::cell::Cell;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::rc::Rc;

use podium::{
    load_pending, parse_data, parse_design, Composer, DesignData, FileLoader, PodiumError,
    SceneOptions,
};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_design_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn run(args: &[String]) -> Result<(), PodiumError> {
    let design_path = args.get(1).filter(|a| !a.starts_with('-'));

    // Read input
    let input = match design_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let design = parse_design(&input)?;
    let data = match flag_value(args, "--data") {
        Some(path) => parse_data(&fs::read_to_string(path)?)?,
        None => DesignData::default(),
    };

    let composer = Composer::for_design(&design)?;
    let ready = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ready);
    let options = SceneOptions::new()
        .on_all_ready(move || flag.set(true))
        .on_error(|e| eprintln!("✗ {}", e));
    let mut nodes = composer.compose(&design, &data, options);

    if args.iter().any(|a| a == "--load") {
        let base = design_path
            .and_then(|p| Path::new(p).parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let report = load_pending(&mut nodes, &FileLoader::with_base_dir(base), composer.svg_cache());
        eprintln!(
            "✓ Loaded {} resources, {} failed",
            report.loaded,
            report.failed.len()
        );
    }
    composer.run_microtasks();
    if ready.get() {
        eprintln!("✓ Scene ready");
    }

    let json = serde_json::to_string_pretty(&nodes)?;
    match flag_value(args, "-o") {
        Some(output_path) => {
            fs::write(output_path, &json)?;
            eprintln!("✓ Written {} nodes to {}", nodes.len(), output_path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn example_design_json() -> &'static str {
    r##"{
  "canvasSize": { "width": 1280, "height": 720 },
  "colorPalette": {
    "primary": { "color": "#1b1f3b", "name": "Primary" },
    "accent": { "color": "#f5b700", "name": "Accent" }
  },
  "textPalette": {
    "footer": { "text": "<tournament-location> · <tournament-entrants> entrants", "name": "Footer" }
  },
  "background": {
    "elements": [
      { "type": "rect", "position": { "x": 0, "y": 0 }, "size": { "width": 1280, "height": 720 }, "fill": "primary" },
      { "type": "backgroundImage", "position": { "x": 0, "y": 0 } }
    ]
  },
  "tournament": {
    "elements": [
      {
        "type": "smartText",
        "position": { "x": 640, "y": 60 },
        "size": { "width": 900 },
        "anchor": "center",
        "text": "<tournament-name> - <tournament-event>",
        "fontSize": 56,
        "fontStyle": "bold",
        "fill": "accent"
      },
      { "type": "text", "position": { "x": 40, "y": 680 }, "text": "", "textId": "footer", "fontSize": 18, "fill": "#ffffff" },
      { "type": "tournamentIcon", "position": { "x": 1180, "y": 20 }, "size": { "width": 80, "height": 80 } }
    ]
  },
  "basePlayer": {
    "position": { "x": 80, "y": 140 },
    "size": { "width": 1120, "height": 120 },
    "elements": [
      {
        "type": "flexGroup",
        "position": { "x": 0, "y": 0 },
        "direction": "row",
        "gap": 16,
        "align": "center",
        "elements": [
          { "type": "text", "position": { "x": 0, "y": 0 }, "text": "<player-placement>", "fontSize": 48, "fill": "accent" },
          { "type": "userFlag", "position": { "x": 0, "y": 0 }, "size": { "width": 48, "height": 32 } },
          {
            "type": "text",
            "position": { "x": 0, "y": 0 },
            "text": "<player-prefix> | ",
            "fontSize": 28,
            "fill": "#cccccc",
            "conditions": ["<player-prefix>"]
          },
          {
            "type": "smartText",
            "position": { "x": 0, "y": 0 },
            "size": { "width": 420 },
            "text": "<player-name>",
            "fontSize": 40,
            "fill": "#ffffff",
            "flex": { "grow": true }
          },
          { "type": "characterImage", "position": { "x": 0, "y": 0 }, "size": { "width": 120, "height": 120 } },
          { "type": "altCharacterImage", "position": { "x": 0, "y": 0 }, "itemSize": 32, "gap": 4 }
        ]
      }
    ]
  },
  "players": [
    {},
    { "position": { "x": 80, "y": 280 } },
    { "position": { "x": 80, "y": 420 }, "scale": { "x": 0.8, "y": 0.8 } },
    { "position": { "x": 80, "y": 540 }, "scale": { "x": 0.8, "y": 0.8 } }
  ]
}
"##
}
