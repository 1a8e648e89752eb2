//! # SVG Recoloring
//!
//! SVG elements are drawn by the host, but their colors follow the design's
//! palette. A `colorMap` maps colors as written in the source file to palette
//! ids (or literal colors). [`recolor`] rewrites `fill`, `stroke`,
//! `stop-color` and `color`, both as presentation attributes and inside
//! `style` declarations. Everything else is copied through untouched.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::model::{resolve_color, ColorPalette, Size};

const COLOR_PROPERTIES: [&str; 4] = ["fill", "stroke", "stop-color", "color"];

/// A parsed SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Parse a viewBox string like "0 0 100 100" (commas allowed).
pub fn parse_view_box(s: &str) -> Option<ViewBox> {
    let parts: Vec<f64> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .filter_map(|p| p.parse::<f64>().ok())
        .collect();
    if parts.len() == 4 {
        Some(ViewBox {
            min_x: parts[0],
            min_y: parts[1],
            width: parts[2],
            height: parts[3],
        })
    } else {
        None
    }
}

/// Resolve the values of a color map against the palette.
pub fn resolve_color_map(
    color_map: &BTreeMap<String, String>,
    palette: &ColorPalette,
) -> BTreeMap<String, String> {
    color_map
        .iter()
        .map(|(from, to)| (from.clone(), resolve_color(palette, to)))
        .collect()
}

/// Canonical form used to compare colors: trimmed, lowercase, short hex
/// expanded.
pub fn normalize_color(s: &str) -> String {
    let s = s.trim().to_ascii_lowercase();
    match s.strip_prefix('#') {
        Some(hex) if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            let mut out = String::with_capacity(7);
            out.push('#');
            for c in hex.chars() {
                out.push(c);
                out.push(c);
            }
            out
        }
        _ => s,
    }
}

/// Rewrite colors of an SVG document. `replacements` maps source colors to
/// literal target colors; matching is case-insensitive.
pub fn recolor(svg: &str, replacements: &BTreeMap<String, String>) -> Result<String, String> {
    if replacements.is_empty() {
        return Ok(svg.to_string());
    }
    let lookup: HashMap<String, &str> = replacements
        .iter()
        .map(|(from, to)| (normalize_color(from), to.as_str()))
        .collect();

    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("SVG parse error at {}: {}", reader.buffer_position(), e))?;
        let rewritten = match event {
            Event::Eof => break,
            Event::Start(e) => Event::Start(recolor_element(&e, &lookup)?),
            Event::Empty(e) => Event::Empty(recolor_element(&e, &lookup)?),
            other => other,
        };
        writer
            .write_event(rewritten)
            .map_err(|e| format!("SVG write error: {}", e))?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| format!("SVG is not UTF-8: {}", e))
}

fn recolor_element(
    e: &BytesStart<'_>,
    lookup: &HashMap<String, &str>,
) -> Result<BytesStart<'static>, String> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| format!("bad SVG attribute: {}", e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("bad SVG attribute value: {}", e))?
            .into_owned();

        let value = if key == "style" {
            recolor_style(&value, lookup)
        } else if COLOR_PROPERTIES.contains(&key.as_str()) {
            replace_color(&value, lookup)
        } else {
            value
        };
        out.push_attribute((key.as_str(), value.as_str()));
    }
    Ok(out)
}

fn replace_color(value: &str, lookup: &HashMap<String, &str>) -> String {
    match lookup.get(&normalize_color(value)) {
        Some(to) => to.to_string(),
        None => value.to_string(),
    }
}

fn recolor_style(style: &str, lookup: &HashMap<String, &str>) -> String {
    style
        .split(';')
        .map(|decl| match decl.split_once(':') {
            Some((prop, value)) if COLOR_PROPERTIES.contains(&prop.trim()) => {
                format!("{}:{}", prop, replace_color(value, lookup))
            }
            _ => decl.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Size declared by the root `<svg>` element: `width`/`height` when both are
/// plain numbers (optionally `px`), otherwise the viewBox size.
pub fn intrinsic_size(svg: &str) -> Option<Size> {
    let mut reader = Reader::from_str(svg);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"svg" => {
                let width = get_attr(&e, "width").and_then(|w| parse_length(&w));
                let height = get_attr(&e, "height").and_then(|h| parse_length(&h));
                if let (Some(width), Some(height)) = (width, height) {
                    return Some(Size::new(width, height));
                }
                let vb = get_attr(&e, "viewBox").and_then(|v| parse_view_box(&v))?;
                return Some(Size::new(vb.width, vb.height));
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn parse_length(s: &str) -> Option<f64> {
    s.trim().trim_end_matches("px").trim().parse::<f64>().ok()
}

fn get_attr(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

/// Raw SVG markup by URL, shared across build passes.
#[derive(Debug, Default)]
pub struct SvgCache {
    entries: RefCell<HashMap<String, Rc<str>>>,
}

impl SvgCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Rc<str>> {
        self.entries.borrow().get(url).cloned()
    }

    pub fn insert(&self, url: &str, markup: &str) -> Rc<str> {
        let markup: Rc<str> = Rc::from(markup);
        self.entries
            .borrow_mut()
            .insert(url.to_string(), Rc::clone(&markup));
        markup
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
