//! # Podium
//!
//! A declarative canvas composition engine for tournament result graphics.
//!
//! A design is a tree of elements (text, images, character art, flags, SVGs,
//! shapes and layout containers) authored once and populated with different
//! tournament data. Podium resolves that tree for one set of data and lays it
//! out with its own flex and grid solvers: no browser, no layout engine
//! underneath. The result is a render tree of absolutely positioned draw
//! commands that any 2D backend can paint.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]      Design tree: elements, palettes, player slots
//!       ↓
//!   [condition]  Which elements render for this data
//!   [placeholder] Token substitution in text
//!       ↓
//!   [layout]     Scene builder, flex and grid solvers, text fitting
//!       ↓
//!   [ready]      One completion callback once every image has loaded
//!       ↓
//!   [resources]  Optional loading of images and recolored SVGs
//! ```

pub mod compose;
pub mod condition;
pub mod data;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod placeholder;
pub mod ready;
pub mod resources;
pub mod svg;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use compose::{compose_design, Composer};
pub use data::{DataContext, DesignData, PlayerData, TournamentData};
pub use error::{PodiumError, ResourceError};
pub use layout::{build_scene, DrawCommand, RenderNode, SceneContext, SceneOptions};
pub use model::{Design, ElementConfig, ElementKind};
pub use ready::{MicrotaskQueue, ReadinessTracker, ReadySignal};
pub use resources::{load_pending, FileLoader, ResourceLoader};
pub use text::{FixedAdvanceMeasurer, TextMeasurer};

/// Compose a design with its data.
///
/// This is the primary entry point. Registers the design's fonts, builds
/// every layer and returns the render tree. Resources are not loaded.
pub fn render(design: &Design, data: &DesignData) -> Result<Vec<RenderNode>, PodiumError> {
    let composer = Composer::for_design(design)?;
    let nodes = composer.compose(design, data, SceneOptions::new());
    composer.run_microtasks();
    Ok(nodes)
}

/// Compose a design and its data described as JSON, returning the render
/// tree as JSON.
pub fn render_json(design_json: &str, data_json: &str) -> Result<String, PodiumError> {
    let design = parse_design(design_json)?;
    let data = parse_data(data_json)?;
    let nodes = render(&design, &data)?;
    Ok(serde_json::to_string_pretty(&nodes)?)
}

pub fn parse_design(json: &str) -> Result<Design, PodiumError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_data(json: &str) -> Result<DesignData, PodiumError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a bare element list, as stored in a layer.
pub fn parse_elements(json: &str) -> Result<Vec<ElementConfig>, PodiumError> {
    Ok(serde_json::from_str(json)?)
}
