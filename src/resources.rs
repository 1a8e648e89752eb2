//! # Resource Loading
//!
//! The builder leaves images and SVGs unloaded. [`load_pending`] walks a built
//! render tree, fetches every pending leaf through a [`ResourceLoader`],
//! attaches the result and settles the leaf's ready signal. The host may
//! also load leaves itself and settle the signals directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::ResourceError;
use crate::image_loader::{self, fit_image, LoadedImage};
use crate::layout::{DrawCommand, ImageDraw, RenderNode, SvgDraw};
use crate::model::{Point, Size};
use crate::svg::{self, SvgCache};

/// Fetches the resources behind image and SVG leaves.
pub trait ResourceLoader {
    fn load_image(&self, src: &str) -> Result<LoadedImage, ResourceError>;

    /// Raw SVG markup.
    fn load_svg(&self, src: &str) -> Result<String, ResourceError>;
}

/// Loads data URIs, raw base64 and files on disk. Relative paths resolve
/// against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    base_dir: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    fn resolve(&self, src: &str) -> String {
        match &self.base_dir {
            Some(dir) if src.starts_with("./") || src.starts_with("../") => {
                dir.join(src).to_string_lossy().into_owned()
            }
            _ => src.to_string(),
        }
    }

    fn read(&self, src: &str) -> Result<Vec<u8>, ResourceError> {
        let path = self.resolve(src);
        if image_loader::is_file_path(&path) && !Path::new(&path).exists() {
            return Err(ResourceError::NotFound(src.to_string()));
        }
        image_loader::read_source_bytes(&path).map_err(|reason| {
            if image_loader::is_file_path(&path) {
                ResourceError::Io {
                    url: src.to_string(),
                    reason,
                }
            } else {
                ResourceError::decode(src, reason)
            }
        })
    }
}

impl ResourceLoader for FileLoader {
    fn load_image(&self, src: &str) -> Result<LoadedImage, ResourceError> {
        let bytes = self.read(src)?;
        image_loader::decode_image_bytes(&bytes).map_err(|reason| ResourceError::decode(src, reason))
    }

    fn load_svg(&self, src: &str) -> Result<String, ResourceError> {
        let bytes = self.read(src)?;
        String::from_utf8(bytes).map_err(|e| ResourceError::decode(src, e))
    }
}

/// Outcome of a [`load_pending`] run.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failed: Vec<(String, ResourceError)>,
}

impl LoadReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load every image and SVG leaf of `nodes` that has not been loaded yet.
pub fn load_pending(
    nodes: &mut [RenderNode],
    loader: &dyn ResourceLoader,
    svg_cache: &SvgCache,
) -> LoadReport {
    let mut report = LoadReport::default();
    let mut images: HashMap<String, Rc<LoadedImage>> = HashMap::new();

    for node in nodes.iter_mut() {
        node.walk_mut(&mut |node| {
            let bounds = node.size();
            let result = match &mut node.draw {
                DrawCommand::Image(draw) if draw.image.is_none() => {
                    load_image_leaf(draw, bounds, loader, &mut images)
                }
                DrawCommand::Svg(draw) if draw.markup.is_none() => {
                    match load_svg_leaf(draw, loader, svg_cache) {
                        Ok(natural) => {
                            if node.width == 0.0 && node.height == 0.0 {
                                if let Some(size) = natural {
                                    node.width = size.width;
                                    node.height = size.height;
                                }
                            }
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                }
                _ => return,
            };
            let (src, signal) = match &node.draw {
                DrawCommand::Image(ImageDraw { src, signal, .. })
                | DrawCommand::Svg(SvgDraw { src, signal, .. }) => (src.clone(), signal.clone()),
                _ => return,
            };
            match result {
                Ok(()) => {
                    report.loaded += 1;
                    if let Some(signal) = signal {
                        signal.ready();
                    }
                }
                Err(e) => {
                    if let Some(signal) = signal {
                        signal.error(e.clone());
                    }
                    report.failed.push((src, e));
                }
            }
        });
    }

    log::debug!(
        "loaded {} resources, {} failed",
        report.loaded,
        report.failed.len()
    );
    report
}

fn load_image_leaf(
    draw: &mut ImageDraw,
    bounds: Size,
    loader: &dyn ResourceLoader,
    images: &mut HashMap<String, Rc<LoadedImage>>,
) -> Result<(), ResourceError> {
    let image = match images.get(&draw.src) {
        Some(image) => Rc::clone(image),
        None => {
            let image = Rc::new(loader.load_image(&draw.src)?);
            images.insert(draw.src.clone(), Rc::clone(&image));
            image
        }
    };
    draw.placement = Some(fit_image(
        image.size(),
        bounds,
        draw.fit.unwrap_or_default(),
        draw.align.unwrap_or(Point::new(0.5, 0.5)),
    ));
    draw.image = Some(image);
    Ok(())
}

/// Recolors the markup into `draw` and returns the SVG's declared size.
fn load_svg_leaf(
    draw: &mut SvgDraw,
    loader: &dyn ResourceLoader,
    svg_cache: &SvgCache,
) -> Result<Option<Size>, ResourceError> {
    let markup = match svg_cache.get(&draw.src) {
        Some(markup) => markup,
        None => svg_cache.insert(&draw.src, &loader.load_svg(&draw.src)?),
    };
    let recolored =
        svg::recolor(&markup, &draw.color_map).map_err(|e| ResourceError::decode(&draw.src, e))?;
    let natural = svg::intrinsic_size(&recolored);
    draw.markup = Some(recolored);
    Ok(natural)
}
