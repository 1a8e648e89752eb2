//! # Scene Builder
//!
//! Turns a design's element trees into a render tree the host can draw.
//!
//! The builder walks elements top-down. Hidden elements and elements whose
//! conditions fail are dropped before anything else looks at them. Leaves
//! resolve their content (palette colors, text palette entries, placeholder
//! tokens) and are measured. Containers hand their children to a solver:
//! `group` keeps authored positions, `flexGroup` goes through [`flex`],
//! `flexGrid` through [`grid`]. Solvers never build nodes themselves; they
//! return re-positioned copies of the children and call back into the builder
//! through [`ChildBuilder`].
//!
//! Every node's `x`/`y` is relative to its parent's origin. Scale, rotation
//! and the local origin shift live in the node's [`Transform`]. Three
//! wrappers sit between an element and its parent when requested:
//!
//! - `clip` clips the element to its own bounds
//! - non-empty `filterEffects` wrap it in a cacheable [`DrawCommand::Filtered`]
//! - `selectable` wraps it in a [`DrawCommand::Selectable`] that owns the
//!   transform and reports selection by element id
//!
//! Images and SVGs load after the pass. Each of those leaves carries a
//! [`ReadySignal`] reporting to one [`ReadinessTracker`] per pass.

pub mod flex;
pub mod grid;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::condition;
use crate::data::DataContext;
use crate::image_loader::{ImagePlacement, LoadedImage};
use crate::model::*;
use crate::placeholder::resolve_placeholders;
use crate::ready::{
    character_source, count_async_leaves, non_empty, AllReadyCallback, ErrorCallback,
    MicrotaskQueue, ReadinessTracker, ReadySignal,
};
use crate::svg::{resolve_color_map, SvgCache};
use crate::text::fit::{anchor_offset, fit_text, scale_shadow, FitOptions};
use crate::text::{break_into_lines, FontSpec, TextMeasurer, TextMetrics};

static EMPTY_COLORS: ColorPalette = BTreeMap::new();
static EMPTY_TEXTS: TextPalette = BTreeMap::new();

/// Read-only inputs of one build pass.
#[derive(Clone, Copy)]
pub struct SceneContext<'a> {
    pub data: DataContext<'a>,
    pub color_palette: &'a ColorPalette,
    pub text_palette: &'a TextPalette,
    /// Size children fall back to when their container doesn't set one.
    pub container: Size,
    pub measurer: &'a dyn TextMeasurer,
    pub svg_cache: &'a SvgCache,
    pub microtasks: &'a MicrotaskQueue,
}

impl<'a> SceneContext<'a> {
    pub fn new(
        container: Size,
        measurer: &'a dyn TextMeasurer,
        svg_cache: &'a SvgCache,
        microtasks: &'a MicrotaskQueue,
    ) -> Self {
        Self {
            data: DataContext::default(),
            color_palette: &EMPTY_COLORS,
            text_palette: &EMPTY_TEXTS,
            container,
            measurer,
            svg_cache,
            microtasks,
        }
    }

    pub fn with_data(self, data: DataContext<'a>) -> Self {
        Self { data, ..self }
    }

    pub fn with_palettes(self, colors: &'a ColorPalette, texts: &'a TextPalette) -> Self {
        Self {
            color_palette: colors,
            text_palette: texts,
            ..self
        }
    }

    pub fn with_container(self, container: Size) -> Self {
        Self { container, ..self }
    }

    fn color(&self, value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(|v| resolve_color(self.color_palette, v))
    }
}

/// Callbacks of one build pass.
#[derive(Default)]
pub struct SceneOptions {
    pub on_all_ready: Option<AllReadyCallback>,
    pub on_error: Option<ErrorCallback>,
    pub on_select: Option<Rc<dyn Fn(&str)>>,
}

impl SceneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_all_ready(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_all_ready = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(crate::error::ResourceError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn on_select(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_select = Some(Rc::new(callback));
        self
    }
}

// ── Render tree ────────────────────────────────────────────────────

/// Scale, rotation and local origin shift of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub scale: Scale,
    /// Degrees, clockwise.
    pub rotation: f64,
    /// Subtracted from child coordinates before scale and rotation.
    pub offset: Point,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            rotation: 0.0,
            offset: Point::default(),
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Transform::default()
    }
}

/// One node of the render tree.
#[derive(Debug, Clone, Serialize)]
pub struct RenderNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Position relative to the parent node's origin.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Transform::is_identity")]
    pub transform: Transform,
    /// Clip rectangle in the node's local coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<Rect>,
    pub draw: DrawCommand,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    fn leaf(size: Size, draw: DrawCommand) -> Self {
        Self {
            id: None,
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
            transform: Transform::default(),
            clip: None,
            draw,
            children: Vec::new(),
        }
    }

    pub(crate) fn group(size: Size, children: Vec<RenderNode>) -> Self {
        Self {
            children,
            ..Self::leaf(size, DrawCommand::Group)
        }
    }

    /// Move this node's placement onto a new parent node drawing `draw`;
    /// the node itself is reset to the wrapper's origin.
    fn wrap(mut self, draw: DrawCommand) -> Self {
        let outer = RenderNode {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            transform: self.transform,
            clip: None,
            draw,
            children: Vec::new(),
        };
        self.x = 0.0;
        self.y = 0.0;
        self.transform = Transform::default();
        RenderNode {
            children: vec![self],
            ..outer
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Depth-first visit of this node and its descendants.
    pub fn walk<'n>(&'n self, visit: &mut impl FnMut(&'n RenderNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut RenderNode)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Find a node by element id.
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// What to draw for a node.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Only positions its children.
    Group,
    Rect(RectDraw),
    Text(TextDraw),
    Image(ImageDraw),
    Svg(SvgDraw),
    /// Children are composited offscreen and filtered as one bitmap.
    Filtered(FilterEffects),
    Selectable(SelectTarget),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectDraw {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDraw {
    /// Fully resolved content.
    pub content: String,
    /// Content broken into the lines it occupies.
    pub lines: Vec<String>,
    pub font_family: String,
    pub font_size: f64,
    pub font_style: FontStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    pub align: TextAlign,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub padding: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDraw {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<ImageFit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Point>,
    /// Set once the image has loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<ImagePlacement>,
    #[serde(skip)]
    pub image: Option<Rc<LoadedImage>>,
    #[serde(skip)]
    pub signal: Option<ReadySignal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgDraw {
    pub src: String,
    /// Source color to resolved target color.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub color_map: BTreeMap<String, String>,
    /// Recolored markup, set once loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(skip)]
    pub signal: Option<ReadySignal>,
}

/// Selection hook installed on a `selectable` element.
#[derive(Clone, Serialize)]
pub struct SelectTarget {
    pub target: String,
    #[serde(skip)]
    handler: Option<Rc<dyn Fn(&str)>>,
}

impl SelectTarget {
    /// Report the element as selected.
    pub fn select(&self) {
        if let Some(handler) = &self.handler {
            handler(&self.target);
        }
    }
}

impl fmt::Debug for SelectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectTarget")
            .field("target", &self.target)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

// ── Builder ────────────────────────────────────────────────────────

/// Builds one child element. Solvers receive the builder through this trait.
pub trait ChildBuilder {
    fn build_child(&self, element: &ElementConfig, ctx: &SceneContext) -> Option<RenderNode>;
}

/// Whether an element takes part in the pass at all.
pub fn is_rendered(element: &ElementConfig, data: &DataContext) -> bool {
    !element.is_hidden() && condition::evaluate(element.conditions.as_deref(), data)
}

/// Content of a text element after text palette lookup, placeholder
/// substitution and case transform.
pub fn resolve_text(text: &TextConfig, ctx: &SceneContext) -> String {
    let raw = match text.text_id.as_deref() {
        Some(id) => match ctx.text_palette.get(id) {
            Some(entry) => entry.text.as_str(),
            None => {
                log::warn!("text palette has no entry {:?}", id);
                text.text.as_str()
            }
        },
        None => text.text.as_str(),
    };
    let resolved = resolve_placeholders(raw, &ctx.data);
    text.transform.unwrap_or_default().apply(&resolved)
}

/// Size and font size a text-like element will render at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredText {
    pub metrics: TextMetrics,
    pub font_size: f64,
}

/// Measure a `text` or `smartText` element as the builder would render it.
/// Text wraps to an explicit width; smart text is fitted to it.
pub fn measure_text_element(element: &ElementConfig, ctx: &SceneContext) -> Option<MeasuredText> {
    match &element.kind {
        ElementKind::Text(t) => {
            let content = resolve_text(t, ctx);
            let font = FontSpec::from_text(t);
            Some(MeasuredText {
                metrics: ctx.measurer.measure(&content, &font, element.explicit_width()),
                font_size: font.size,
            })
        }
        ElementKind::SmartText(s) => {
            let content = resolve_text(&s.text, ctx);
            Some(fit_smart_text(element, s, &content, ctx))
        }
        _ => None,
    }
}

fn fit_smart_text(
    element: &ElementConfig,
    smart: &SmartTextConfig,
    content: &str,
    ctx: &SceneContext,
) -> MeasuredText {
    let font = FontSpec::from_text(&smart.text);
    match element.explicit_width() {
        Some(target) => {
            let fit = fit_text(
                ctx.measurer,
                content,
                &font,
                target,
                &FitOptions::for_smart_text(smart),
            );
            MeasuredText {
                metrics: fit.metrics,
                font_size: fit.font_size,
            }
        }
        None => MeasuredText {
            metrics: ctx.measurer.measure(content, &font, None),
            font_size: font.size,
        },
    }
}

/// Copy of a solver-placed smart text element with its fitted font size
/// written back, so building it at the assigned width doesn't shrink again.
pub(crate) fn settle_fitted_text(mut placed: ElementConfig, measured: &MeasuredText) -> ElementConfig {
    if let ElementKind::SmartText(s) = &mut placed.kind {
        let requested = s.text.font_size();
        if measured.font_size < requested {
            let ratio = measured.font_size / requested;
            s.text.font_size = Some(measured.font_size);
            s.text.shadow = s.text.shadow.as_ref().map(|sh| scale_shadow(sh, ratio));
        }
    }
    placed
}

/// Builds render nodes and hands out ready signals for one pass.
pub struct SceneBuilder {
    tracker: ReadinessTracker,
    on_select: Option<Rc<dyn Fn(&str)>>,
}

impl SceneBuilder {
    pub fn new(tracker: ReadinessTracker, on_select: Option<Rc<dyn Fn(&str)>>) -> Self {
        Self { tracker, on_select }
    }

    pub fn tracker(&self) -> &ReadinessTracker {
        &self.tracker
    }

    /// Build every rendered element of a list, in order.
    pub fn build_elements(&self, elements: &[ElementConfig], ctx: &SceneContext) -> Vec<RenderNode> {
        elements
            .iter()
            .filter_map(|el| self.build_child(el, ctx))
            .collect()
    }

    /// Close the pass. See [`ReadinessTracker::finish_build`].
    pub fn finish(&self, microtasks: &MicrotaskQueue) {
        self.tracker.finish_build(microtasks);
    }

    fn build_element(&self, el: &ElementConfig, ctx: &SceneContext) -> Option<RenderNode> {
        if !is_rendered(el, &ctx.data) {
            log::debug!(
                "skipping {} {}",
                el.kind.type_name(),
                el.id.as_deref().unwrap_or("")
            );
            return None;
        }

        let mut node = self.create(el, ctx)?;
        node.id = el.id.clone();
        node.x = el.position.x;
        node.y = el.position.y;
        node.transform.scale = el.scale.unwrap_or_default();
        node.transform.rotation = el.rotation.unwrap_or(0.0);
        if let Some(offset) = el.offset {
            node.transform.offset.x += offset.x;
            node.transform.offset.y += offset.y;
        }

        if el.clip.unwrap_or(false) {
            node.clip = Some(Rect::from_size(node.size()));
        }
        if let Some(effects) = el.filter_effects.filter(|f| !f.is_empty()) {
            node = node.wrap(DrawCommand::Filtered(effects));
        }
        if el.selectable.unwrap_or(false) {
            let target = el
                .id
                .clone()
                .unwrap_or_else(|| el.kind.type_name().to_string());
            node = node.wrap(DrawCommand::Selectable(SelectTarget {
                target,
                handler: self.on_select.clone(),
            }));
        }
        Some(node)
    }

    fn create(&self, el: &ElementConfig, ctx: &SceneContext) -> Option<RenderNode> {
        let data = &ctx.data;
        match &el.kind {
            ElementKind::Text(t) => Some(self.text_node(el, t, ctx)),
            ElementKind::SmartText(s) => Some(self.smart_text_node(el, s, ctx)),
            ElementKind::Image(c) => {
                non_empty(Some(c.src.as_str())).map(|src| self.image_node(el, src, None))
            }
            ElementKind::CustomImage(c) => non_empty(Some(c.src.as_str()))
                .map(|src| self.image_node(el, src, Some((c.fit, c.align)))),
            ElementKind::CharacterImage(c) => {
                character_source(data, c.index, c.art).map(|src| self.image_node(el, src, None))
            }
            ElementKind::AltCharacterImage(c) => self.alt_characters_node(c, ctx),
            ElementKind::UserFlag => non_empty(data.player.and_then(|p| p.country_flag.as_deref()))
                .map(|src| self.image_node(el, src, None)),
            ElementKind::PlayerFlag => non_empty(data.player.and_then(|p| p.custom_flag.as_deref()))
                .map(|src| self.image_node(el, src, None)),
            ElementKind::TournamentIcon => {
                non_empty(data.tournament.and_then(|t| t.icon.as_deref()))
                    .map(|src| self.image_node(el, src, None))
            }
            ElementKind::BackgroundImage => non_empty(data.background_image).map(|src| {
                let mut node = self.image_node(el, src, Some((ImageFit::Cover, Point::new(0.5, 0.5))));
                if el.size.is_none() {
                    node.width = ctx.container.width;
                    node.height = ctx.container.height;
                }
                node
            }),
            ElementKind::Svg(c) => non_empty(Some(c.src.as_str())).map(|src| {
                RenderNode::leaf(
                    explicit_size(el),
                    DrawCommand::Svg(SvgDraw {
                        src: src.to_string(),
                        color_map: resolve_color_map(&c.color_map, ctx.color_palette),
                        markup: None,
                        signal: Some(self.tracker.signal(src)),
                    }),
                )
            }),
            ElementKind::Rect(r) => Some(RenderNode::leaf(
                explicit_size(el),
                DrawCommand::Rect(RectDraw {
                    fill: ctx.color(&r.fill),
                    stroke: ctx.color(&r.stroke),
                    stroke_width: r.stroke_width,
                    corner_radius: r.corner_radius,
                }),
            )),
            ElementKind::Group(g) => {
                let size = own_size(el, ctx);
                let children = self.build_elements(&g.elements, &ctx.with_container(size));
                Some(RenderNode::group(size, children))
            }
            ElementKind::FlexGroup(g) => {
                let size = own_size(el, ctx);
                let children = flex::layout(g, size, &ctx.with_container(size), self);
                Some(RenderNode::group(size, children))
            }
            ElementKind::FlexGrid(g) => {
                let size = own_size(el, ctx);
                let children = grid::layout(g, size, &ctx.with_container(size), self);
                Some(RenderNode::group(size, children))
            }
        }
    }

    fn text_node(&self, el: &ElementConfig, t: &TextConfig, ctx: &SceneContext) -> RenderNode {
        let content = resolve_text(t, ctx);
        let font = FontSpec::from_text(t);
        let max_width = el.explicit_width();
        let metrics = ctx.measurer.measure(&content, &font, max_width);
        let inner = max_width.map(|w| (w - 2.0 * font.padding).max(0.0));
        let lines = break_into_lines(ctx.measurer, &content, &font, inner)
            .into_iter()
            .map(|l| l.text)
            .collect();

        let size = Size::new(
            max_width.unwrap_or(metrics.width),
            el.explicit_height().unwrap_or(metrics.height),
        );
        let draw = text_draw(t, content, lines, &font, t.shadow.clone(), ctx);
        RenderNode::leaf(size, DrawCommand::Text(draw))
    }

    fn smart_text_node(
        &self,
        el: &ElementConfig,
        s: &SmartTextConfig,
        ctx: &SceneContext,
    ) -> RenderNode {
        let content = resolve_text(&s.text, ctx);
        let measured = fit_smart_text(el, s, &content, ctx);
        let requested = FontSpec::from_text(&s.text);
        let font = requested.with_size(measured.font_size);
        let ratio = if requested.size > 0.0 {
            measured.font_size / requested.size
        } else {
            1.0
        };

        let lines = break_into_lines(ctx.measurer, &content, &font, None)
            .into_iter()
            .map(|l| l.text)
            .collect();
        let shadow = s.text.shadow.as_ref().map(|sh| scale_shadow(sh, ratio));
        let size = Size::new(measured.metrics.width, measured.metrics.height);

        let mut node = RenderNode::leaf(
            size,
            DrawCommand::Text(text_draw(&s.text, content, lines, &font, shadow, ctx)),
        );
        node.transform.offset =
            anchor_offset(s.anchor.unwrap_or_default(), size.width, size.height);
        node
    }

    fn image_node(
        &self,
        el: &ElementConfig,
        src: &str,
        fit: Option<(ImageFit, Point)>,
    ) -> RenderNode {
        RenderNode::leaf(
            explicit_size(el),
            DrawCommand::Image(ImageDraw {
                src: src.to_string(),
                fit: fit.map(|(f, _)| f),
                align: fit.map(|(_, a)| a),
                placement: None,
                image: None,
                signal: Some(self.tracker.signal(src)),
            }),
        )
    }

    /// Every character after the first, as a row or column of square slots.
    fn alt_characters_node(
        &self,
        c: &AltCharacterImageConfig,
        ctx: &SceneContext,
    ) -> Option<RenderNode> {
        let alts = ctx.data.characters().get(1..).unwrap_or(&[]);
        if alts.is_empty() {
            return None;
        }

        let step = c.item_size + c.gap;
        let children: Vec<RenderNode> = alts
            .iter()
            .enumerate()
            .map(|(i, character)| {
                let src = match c.art {
                    CharacterArt::Image => character.image.as_str(),
                    CharacterArt::Icon => character.icon.as_deref().unwrap_or(&character.image),
                };
                let mut node = RenderNode::leaf(
                    Size::new(c.item_size, c.item_size),
                    DrawCommand::Image(ImageDraw {
                        src: src.to_string(),
                        fit: Some(ImageFit::Contain),
                        align: None,
                        placement: None,
                        image: None,
                        signal: Some(self.tracker.signal(src)),
                    }),
                );
                match c.direction {
                    FlexDirection::Row => node.x = i as f64 * step,
                    FlexDirection::Column => node.y = i as f64 * step,
                }
                node
            })
            .collect();

        let n = alts.len() as f64;
        let length = n * c.item_size + (n - 1.0) * c.gap;
        let size = match c.direction {
            FlexDirection::Row => Size::new(length, c.item_size),
            FlexDirection::Column => Size::new(c.item_size, length),
        };
        Some(RenderNode::group(size, children))
    }
}

impl ChildBuilder for SceneBuilder {
    fn build_child(&self, element: &ElementConfig, ctx: &SceneContext) -> Option<RenderNode> {
        self.build_element(element, ctx)
    }
}

fn text_draw(
    t: &TextConfig,
    content: String,
    lines: Vec<String>,
    font: &FontSpec,
    shadow: Option<Shadow>,
    ctx: &SceneContext,
) -> TextDraw {
    TextDraw {
        content,
        lines,
        font_family: font.family.clone(),
        font_size: font.size,
        font_style: font.style,
        fill: ctx.color(&t.fill),
        stroke: ctx.color(&t.stroke),
        stroke_width: t.stroke_width,
        align: t.align.unwrap_or_default(),
        letter_spacing: font.letter_spacing,
        line_height: font.line_height,
        padding: font.padding,
        shadow,
    }
}

fn explicit_size(el: &ElementConfig) -> Size {
    Size::new(
        el.explicit_width().unwrap_or(0.0),
        el.explicit_height().unwrap_or(0.0),
    )
}

/// A container's own size, falling back to the enclosing container per axis.
fn own_size(el: &ElementConfig, ctx: &SceneContext) -> Size {
    Size::new(
        el.explicit_width().unwrap_or(ctx.container.width),
        el.explicit_height().unwrap_or(ctx.container.height),
    )
}

/// Build a scene from a list of elements.
///
/// Asynchronous leaves are counted first; `options.on_all_ready` fires once
/// they all report ready (or on the context's microtask queue when there are
/// none), `options.on_error` on the first failure.
pub fn build_scene(
    elements: &[ElementConfig],
    ctx: &SceneContext,
    options: SceneOptions,
) -> Vec<RenderNode> {
    let expected = count_async_leaves(elements, ctx);
    let tracker = ReadinessTracker::new(expected, options.on_all_ready, options.on_error);
    let builder = SceneBuilder::new(tracker, options.on_select);
    let nodes = builder.build_elements(elements, ctx);
    builder.finish(ctx.microtasks);
    nodes
}
