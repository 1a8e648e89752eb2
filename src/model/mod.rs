//! # Design Model
//!
//! The input representation for the composition engine. A design is a set of
//! element trees laid out on a fixed canvas: a background layer, a template
//! subtree repeated once per player slot, and a tournament layer.
//!
//! Every element is an [`ElementConfig`]: a set of common geometry and
//! visibility fields plus an [`ElementKind`] discriminated by the JSON `type`
//! field. The JSON shape is the persisted export format of the surrounding
//! editor, so field names and enum strings here are compatibility-sensitive.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::condition::ConditionAtom;

/// Font size used when a text element doesn't set one.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Font family used when a text element doesn't set one.
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

/// A point or offset in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A concrete size in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of `size` at the origin.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

/// A size where either axis may be left for the engine to derive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl SizeHint {
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Per-axis scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Flex item participation of a child inside a `flexGroup`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlexItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink: Option<bool>,
    /// Initial main-axis size, overriding any measured or explicit size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<f64>,
}

/// Raster filters applied to an element after compositing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sepia: Option<bool>,
    /// Blur radius in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    /// Channel shift applied on top of the source colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb_shift: Option<RgbShift>,
}

impl FilterEffects {
    /// True when no filter would change a pixel.
    pub fn is_empty(&self) -> bool {
        !self.grayscale.unwrap_or(false)
            && !self.sepia.unwrap_or(false)
            && self.blur.map_or(true, |b| b <= 0.0)
            && self.rgb_shift.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RgbShift {
    #[serde(default)]
    pub red: i16,
    #[serde(default)]
    pub green: i16,
    #[serde(default)]
    pub blue: i16,
}

/// One node of a design tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementConfig {
    /// What kind of element this is, flattened so `type` sits beside the
    /// common fields.
    #[serde(flatten)]
    pub kind: ElementKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Position relative to the parent container's origin.
    pub position: Point,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeHint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,

    /// Rotation in degrees, clockwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,

    /// Local origin shift, subtracted before scale and rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Point>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ConditionAtom>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_effects: Option<FilterEffects>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<FlexItem>,
}

/// The element variants, discriminated by the JSON `type` field.
///
/// Unknown tags fail deserialization with serde's "unknown variant" error
/// rather than being skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Text(TextConfig),
    SmartText(SmartTextConfig),
    Image(ImageConfig),
    CustomImage(CustomImageConfig),
    CharacterImage(CharacterImageConfig),
    AltCharacterImage(AltCharacterImageConfig),
    UserFlag,
    PlayerFlag,
    TournamentIcon,
    BackgroundImage,
    Svg(SvgConfig),
    Rect(RectConfig),
    Group(GroupConfig),
    FlexGroup(FlexGroupConfig),
    FlexGrid(FlexGridConfig),
}

impl ElementKind {
    /// The JSON tag of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::SmartText(_) => "smartText",
            ElementKind::Image(_) => "image",
            ElementKind::CustomImage(_) => "customImage",
            ElementKind::CharacterImage(_) => "characterImage",
            ElementKind::AltCharacterImage(_) => "altCharacterImage",
            ElementKind::UserFlag => "userFlag",
            ElementKind::PlayerFlag => "playerFlag",
            ElementKind::TournamentIcon => "tournamentIcon",
            ElementKind::BackgroundImage => "backgroundImage",
            ElementKind::Svg(_) => "svg",
            ElementKind::Rect(_) => "rect",
            ElementKind::Group(_) => "group",
            ElementKind::FlexGroup(_) => "flexGroup",
            ElementKind::FlexGrid(_) => "flexGrid",
        }
    }

    /// Typography of text-like variants.
    pub fn text(&self) -> Option<&TextConfig> {
        match self {
            ElementKind::Text(t) => Some(t),
            ElementKind::SmartText(s) => Some(&s.text),
            _ => None,
        }
    }

    /// Children of container variants.
    pub fn children(&self) -> Option<&[ElementConfig]> {
        match self {
            ElementKind::Group(g) => Some(&g.elements),
            ElementKind::FlexGroup(g) => Some(&g.elements),
            ElementKind::FlexGrid(g) => Some(&g.elements),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "italic bold")]
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }

    pub fn weight(self) -> u32 {
        if self.is_bold() {
            700
        } else {
            400
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
}

impl TextTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
        }
    }
}

/// Drop shadow behind text glyphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Content and typography shared by `text` and `smartText`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextConfig {
    /// Raw content, may contain placeholder tokens.
    #[serde(default)]
    pub text: String,
    /// Text palette entry that replaces `text` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// Palette id or literal CSS color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    /// Line height as a multiplier of the font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TextTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl TextConfig {
    pub fn font_size(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    pub fn font_style(&self) -> FontStyle {
        self.font_style.unwrap_or_default()
    }
}

/// Anchor point of a `smartText` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopMiddle,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartTextConfig {
    #[serde(flatten)]
    pub text: TextConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub src: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomImageConfig {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub fit: ImageFit,
    /// Alignment of the fitted image inside its box, 0..=1 per axis.
    #[serde(default = "centered")]
    pub align: Point,
}

fn centered() -> Point {
    Point::new(0.5, 0.5)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterArt {
    #[default]
    Image,
    Icon,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterImageConfig {
    #[serde(default)]
    pub art: CharacterArt,
    /// Which of the player's characters to draw.
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltCharacterImageConfig {
    #[serde(default = "icon_art")]
    pub art: CharacterArt,
    #[serde(default)]
    pub direction: FlexDirection,
    #[serde(default)]
    pub gap: f64,
    /// Edge length of each square character slot.
    #[serde(default = "default_item_size")]
    pub item_size: f64,
}

fn icon_art() -> CharacterArt {
    CharacterArt::Icon
}

fn default_item_size() -> f64 {
    32.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgConfig {
    #[serde(default)]
    pub src: String,
    /// Source color (as written in the SVG) to palette id or literal color.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub color_map: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Cross-axis alignment, also used for grid block alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexAlign {
    #[default]
    Start,
    Center,
    End,
}

impl FlexAlign {
    /// Offset of an item of `size` inside `space` along one axis.
    pub fn offset(self, space: f64, size: f64) -> f64 {
        match self {
            FlexAlign::Start => 0.0,
            FlexAlign::Center => (space - size) / 2.0,
            FlexAlign::End => space - size,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Which end of the cross axis the first wrap line starts at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapDirection {
    #[default]
    Start,
    End,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexGroupConfig {
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    #[serde(default)]
    pub direction: FlexDirection,
    #[serde(default)]
    pub gap: f64,
    #[serde(default)]
    pub align: FlexAlign,
    #[serde(default)]
    pub justify: Justify,
    #[serde(default)]
    pub wrap: bool,
    #[serde(default)]
    pub wrap_direction: WrapDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexGridConfig {
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    #[serde(default)]
    pub row_gap: f64,
    #[serde(default)]
    pub column_gap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Target cell width / height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub align: FlexAlign,
    #[serde(default)]
    pub justify: FlexAlign,
    #[serde(default)]
    pub align_last_row: FlexAlign,
}

impl ElementConfig {
    /// Create an element of the given kind at a position.
    pub fn new(kind: ElementKind, position: Point) -> Self {
        Self {
            kind,
            id: None,
            position,
            size: None,
            scale: None,
            rotation: None,
            offset: None,
            clip: None,
            hidden: None,
            conditions: None,
            selectable: None,
            filter_effects: None,
            flex: None,
        }
    }

    /// Create a `text` element.
    pub fn text(content: &str, font_size: f64) -> Self {
        Self::new(
            ElementKind::Text(TextConfig {
                text: content.to_string(),
                font_size: Some(font_size),
                ..Default::default()
            }),
            Point::default(),
        )
    }

    /// Create a `rect` element with a fixed size.
    pub fn rect(width: f64, height: f64) -> Self {
        let mut el = Self::new(ElementKind::Rect(RectConfig::default()), Point::default());
        el.size = Some(SizeHint::fixed(width, height));
        el
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(SizeHint::fixed(width, height));
        self
    }

    pub fn with_flex(mut self, flex: FlexItem) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<ConditionAtom>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    pub fn explicit_width(&self) -> Option<f64> {
        self.size.and_then(|s| s.width)
    }

    pub fn explicit_height(&self) -> Option<f64> {
        self.size.and_then(|s| s.height)
    }

    /// A copy of this element with solver-assigned geometry. The original is
    /// left untouched.
    pub fn placed(&self, position: Point, size: Size) -> ElementConfig {
        let mut placed = self.clone();
        placed.position = position;
        placed.size = Some(SizeHint::fixed(size.width, size.height));
        placed
    }
}

// ── Design aggregate ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub color: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteText {
    pub text: String,
    #[serde(default)]
    pub name: String,
}

pub type ColorPalette = BTreeMap<String, PaletteColor>;
pub type TextPalette = BTreeMap<String, PaletteText>;

/// Resolve a fill/stroke value: a palette id maps to its color, anything else
/// is taken as a literal color.
pub fn resolve_color(palette: &ColorPalette, value: &str) -> String {
    match palette.get(value) {
        Some(entry) => entry.color.clone(),
        None => value.to_string(),
    }
}

/// A flat list of elements drawn in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
}

/// The player template: geometry of one slot plus its element subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDesign {
    pub position: Point,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
}

/// Per-slot overrides merged onto the base player design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementConfig>>,
}

/// A custom font to register before layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontEntry {
    /// Font family name (e.g. "Inter", "Roboto").
    pub family: String,
    /// Base64-encoded font data, or a data URI (e.g. "data:font/ttf;base64,...").
    pub src: String,
    #[serde(default)]
    pub font_style: FontStyle,
}

/// A complete graphic template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub canvas_size: Size,
    #[serde(default)]
    pub color_palette: ColorPalette,
    #[serde(default)]
    pub text_palette: TextPalette,
    #[serde(default)]
    pub background: Layer,
    #[serde(default)]
    pub tournament: Layer,
    pub base_player: PlayerDesign,
    #[serde(default)]
    pub players: Vec<PlayerOverride>,
    /// Canvas background image; also drives the `backgroundImage` render
    /// condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts: Vec<FontEntry>,
}

impl Design {
    /// Number of player slots the design lays out.
    pub fn player_slots(&self) -> usize {
        self.players.len()
    }

    /// The base player design with slot `slot`'s overrides merged on top.
    /// Slots past the end of `players` get the base design unchanged.
    pub fn player_design(&self, slot: usize) -> PlayerDesign {
        let base = &self.base_player;
        match self.players.get(slot) {
            None => base.clone(),
            Some(o) => PlayerDesign {
                position: o.position.unwrap_or(base.position),
                size: o.size.unwrap_or(base.size),
                scale: o.scale.or(base.scale),
                elements: o.elements.clone().unwrap_or_else(|| base.elements.clone()),
            },
        }
    }
}
