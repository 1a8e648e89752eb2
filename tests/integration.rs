//! Integration tests for the podium composition pipeline.
//!
//! These tests exercise the full path from JSON input to a render tree.
//! They verify:
//! - Every element variant deserializes from its JSON tag
//! - Conditions and placeholders resolve against player/tournament data
//! - Flex and grid solvers keep their geometric guarantees
//! - The readiness tracker fires exactly once per pass
//! - Resource loading settles the tracker

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use podium::data::DataContext;
use podium::image_loader::{ImageFormat, LoadedImage};
use podium::layout::{flex, grid};
use podium::model::*;
use podium::svg::SvgCache;
use podium::{
    build_scene, load_pending, parse_elements, render_json, DrawCommand, FixedAdvanceMeasurer,
    MicrotaskQueue, PlayerData, PodiumError, ReadySignal, RenderNode, ResourceError,
    ResourceLoader, SceneContext, SceneOptions, TournamentData,
};
use serde_json::json;

// ─── Helpers ────────────────────────────────────────────────────

struct Env {
    measurer: FixedAdvanceMeasurer,
    cache: SvgCache,
    queue: MicrotaskQueue,
}

impl Env {
    fn new() -> Self {
        Self {
            measurer: FixedAdvanceMeasurer::default(),
            cache: SvgCache::new(),
            queue: MicrotaskQueue::new(),
        }
    }

    fn ctx(&self, width: f64, height: f64) -> SceneContext<'_> {
        SceneContext::new(
            Size::new(width, height),
            &self.measurer,
            &self.cache,
            &self.queue,
        )
    }
}

fn elements(value: serde_json::Value) -> Vec<ElementConfig> {
    serde_json::from_value(value).unwrap()
}

fn player(value: serde_json::Value) -> PlayerData {
    serde_json::from_value(value).unwrap()
}

fn tournament() -> TournamentData {
    serde_json::from_value(json!({
        "name": "Summit 18",
        "eventName": "Singles",
        "entrants": 512,
        "icon": "summit.png"
    }))
    .unwrap()
}

fn text_of(node: &RenderNode) -> &str {
    match &node.draw {
        DrawCommand::Text(t) => &t.content,
        other => panic!("expected text, got {:?}", other),
    }
}

fn signals(nodes: &[RenderNode]) -> Vec<ReadySignal> {
    let mut out = Vec::new();
    for node in nodes {
        node.walk(&mut |n| match &n.draw {
            DrawCommand::Image(img) => out.extend(img.signal.clone()),
            DrawCommand::Svg(svg) => out.extend(svg.signal.clone()),
            _ => {}
        });
    }
    out
}

/// Loader that hands back a 4x2 image for anything not named `broken*`.
struct StubLoader;

impl ResourceLoader for StubLoader {
    fn load_image(&self, src: &str) -> Result<LoadedImage, ResourceError> {
        if src.starts_with("broken") {
            return Err(ResourceError::decode(src, "truncated"));
        }
        Ok(LoadedImage {
            format: ImageFormat::Png,
            rgba: vec![255; 4 * 4 * 2],
            width_px: 4,
            height_px: 2,
        })
    }

    fn load_svg(&self, _src: &str) -> Result<String, ResourceError> {
        Ok(r##"<svg viewBox="0 0 10 10"><rect fill="#fff"/></svg>"##.to_string())
    }
}

// ─── Schema ─────────────────────────────────────────────────────

#[test]
fn test_every_variant_parses() {
    let els = elements(json!([
        {"type": "text", "position": {"x": 0, "y": 0}, "text": "a"},
        {"type": "smartText", "position": {"x": 0, "y": 0}, "text": "b", "anchor": "bottomRight"},
        {"type": "image", "position": {"x": 0, "y": 0}, "src": "a.png"},
        {"type": "customImage", "position": {"x": 0, "y": 0}, "src": "b.png", "fit": "cover"},
        {"type": "characterImage", "position": {"x": 0, "y": 0}, "art": "icon"},
        {"type": "altCharacterImage", "position": {"x": 0, "y": 0}, "direction": "column"},
        {"type": "userFlag", "position": {"x": 0, "y": 0}},
        {"type": "playerFlag", "position": {"x": 0, "y": 0}},
        {"type": "tournamentIcon", "position": {"x": 0, "y": 0}},
        {"type": "backgroundImage", "position": {"x": 0, "y": 0}},
        {"type": "svg", "position": {"x": 0, "y": 0}, "src": "c.svg"},
        {"type": "rect", "position": {"x": 0, "y": 0}, "fill": "red"},
        {"type": "group", "position": {"x": 0, "y": 0}, "elements": []},
        {"type": "flexGroup", "position": {"x": 0, "y": 0}, "justify": "space-between"},
        {"type": "flexGrid", "position": {"x": 0, "y": 0}, "alignLastRow": "center"}
    ]));
    let names: Vec<&str> = els.iter().map(|e| e.kind.type_name()).collect();
    assert_eq!(
        names,
        vec![
            "text",
            "smartText",
            "image",
            "customImage",
            "characterImage",
            "altCharacterImage",
            "userFlag",
            "playerFlag",
            "tournamentIcon",
            "backgroundImage",
            "svg",
            "rect",
            "group",
            "flexGroup",
            "flexGrid"
        ]
    );

    match &els[3].kind {
        ElementKind::CustomImage(c) => {
            assert_eq!(c.fit, ImageFit::Cover);
            assert_eq!(c.align, Point::new(0.5, 0.5));
        }
        other => panic!("unexpected {}", other.type_name()),
    }
    match &els[5].kind {
        ElementKind::AltCharacterImage(c) => {
            assert_eq!(c.art, CharacterArt::Icon);
            assert_eq!(c.direction, FlexDirection::Column);
        }
        other => panic!("unexpected {}", other.type_name()),
    }
}

#[test]
fn test_common_fields_and_serialization() {
    let els = elements(json!([{
        "type": "smartText",
        "id": "title",
        "position": {"x": 5, "y": 6},
        "size": {"width": 300},
        "rotation": 15,
        "conditions": ["NOT", "<player-prefix>"],
        "filterEffects": {"grayscale": true},
        "flex": {"grow": true},
        "text": "<player-name>",
        "fontSize": 32,
        "anchor": "center"
    }]));
    let el = &els[0];
    assert_eq!(el.id.as_deref(), Some("title"));
    assert_eq!(el.explicit_width(), Some(300.0));
    assert_eq!(el.explicit_height(), None);
    assert_eq!(el.conditions.as_ref().map(Vec::len), Some(2));

    let value = serde_json::to_value(el).unwrap();
    assert_eq!(value["type"], "smartText");
    assert_eq!(value["anchor"], "center");
    assert_eq!(value["fontSize"], 32.0);
    assert_eq!(value["conditions"], json!(["NOT", "<player-prefix>"]));
    assert!(value.get("clip").is_none());
}

#[test]
fn test_design_round_trips_every_variant() {
    let leaf = |extra: serde_json::Value| {
        let mut el = json!({"position": {"x": 1.5, "y": 2}});
        if let (Some(obj), Some(more)) = (el.as_object_mut(), extra.as_object()) {
            obj.extend(more.clone());
        }
        el
    };
    let design: Design = serde_json::from_value(json!({
        "canvasSize": {"width": 1280, "height": 720},
        "colorPalette": {"accent": {"color": "#f5b700", "name": "Accent"}},
        "textPalette": {"footer": {"text": "<tournament-location>", "name": "Footer"}},
        "backgroundImage": "bg.png",
        "fonts": [{"family": "Brand", "src": "QUJD", "fontStyle": "italic bold"}],
        "background": {"elements": [
            leaf(json!({"type": "backgroundImage", "hidden": false})),
            leaf(json!({"type": "rect", "fill": "accent", "stroke": "#000",
                        "strokeWidth": 2, "cornerRadius": 4, "clip": true})),
            leaf(json!({"type": "svg", "src": "logo.svg",
                        "colorMap": {"#fff": "accent"},
                        "filterEffects": {"rgbShift": {"red": 20, "green": -4, "blue": 0},
                                          "blur": 1.5}}))
        ]},
        "tournament": {"elements": [
            leaf(json!({"type": "smartText", "id": "title", "text": "<tournament-name>",
                        "fontSize": 56, "fontStyle": "bold", "anchor": "center",
                        "minFontSize": 12, "maxIterations": 6,
                        "shadow": {"color": "#000", "blur": 4, "offset": {"x": 2, "y": 2},
                                   "opacity": 0.5},
                        "size": {"width": 900}})),
            leaf(json!({"type": "text", "text": "", "textId": "footer", "transform": "uppercase",
                        "align": "center", "letterSpacing": 0.5, "lineHeight": 1.25,
                        "padding": 2, "scale": {"x": 0.5, "y": 0.5}, "rotation": 15,
                        "offset": {"x": 1, "y": 1}})),
            leaf(json!({"type": "tournamentIcon", "selectable": true,
                        "conditions": ["<tournament-icon>"]})),
            leaf(json!({"type": "image", "src": "sponsor.png"})),
            leaf(json!({"type": "customImage", "src": "art.png", "fit": "fill",
                        "align": {"x": 0, "y": 1}}))
        ]},
        "basePlayer": {
            "position": {"x": 80, "y": 140},
            "size": {"width": 1120, "height": 120},
            "scale": {"x": 1, "y": 1},
            "elements": [
                leaf(json!({"type": "group", "elements": [
                    leaf(json!({"type": "userFlag", "conditions": ["NOT", "backgroundImage"]})),
                    leaf(json!({"type": "playerFlag", "conditions": ["mystery"]}))
                ]})),
                leaf(json!({"type": "flexGroup", "direction": "column", "gap": 8,
                            "align": "center", "justify": "space-between", "wrap": true,
                            "wrapDirection": "end", "elements": [
                    leaf(json!({"type": "text", "text": "<player-name>",
                                "flex": {"grow": true, "shrink": false, "basis": 40}})),
                    leaf(json!({"type": "characterImage", "art": "icon", "index": 1}))
                ]})),
                leaf(json!({"type": "flexGrid", "rows": 2, "columns": 3, "rowGap": 4,
                            "columnGap": 6, "aspectRatio": 1.5, "align": "end",
                            "justify": "center", "alignLastRow": "center", "elements": [
                    leaf(json!({"type": "altCharacterImage", "direction": "column",
                                "gap": 4, "itemSize": 24, "art": "image"}))
                ]}))
            ]
        },
        "players": [{}, {"position": {"x": 80, "y": 280}, "size": {"width": 600, "height": 90},
                         "scale": {"x": 0.75, "y": 0.75}, "elements": []}]
    }))
    .unwrap();

    let mut kinds = Vec::new();
    fn collect<'a>(els: &'a [ElementConfig], out: &mut Vec<&'a str>) {
        for el in els {
            out.push(el.kind.type_name());
            if let Some(children) = el.kind.children() {
                collect(children, out);
            }
        }
    }
    collect(&design.background.elements, &mut kinds);
    collect(&design.tournament.elements, &mut kinds);
    collect(&design.base_player.elements, &mut kinds);
    kinds.sort_unstable();
    kinds.dedup();
    assert_eq!(kinds.len(), 15);

    let json = serde_json::to_string(&design).unwrap();
    let back: Design = serde_json::from_str(&json).unwrap();
    assert_eq!(back, design);

    let value = serde_json::to_value(&back).unwrap();
    let svg = &value["background"]["elements"][2];
    assert_eq!(svg["filterEffects"]["rgbShift"]["green"], -4);
    assert_eq!(svg["colorMap"]["#fff"], "accent");
    let grid = &value["basePlayer"]["elements"][2];
    assert_eq!(grid["alignLastRow"], "center");
    assert_eq!(value["basePlayer"]["elements"][0]["elements"][1]["conditions"], json!(["mystery"]));
}

#[test]
fn test_unknown_type_is_rejected() {
    let err = parse_elements(r#"[{"type": "circle", "position": {"x": 0, "y": 0}}]"#).unwrap_err();
    assert!(matches!(err, PodiumError::Parse { .. }));
    assert!(err.to_string().contains("Hint:"));
}

// ─── Conditions & Placeholders ──────────────────────────────────

#[test]
fn test_last_condition_atom_decides() {
    let env = Env::new();
    let alpha = player(json!({"name": "Alpha", "prefix": "TSM"}));
    let t = tournament();
    let ctx = env
        .ctx(500.0, 500.0)
        .with_data(DataContext::new(Some(&alpha), Some(&t)));

    let els = elements(json!([
        // prefix present, twitter absent: the later atom wins
        {"type": "rect", "id": "a", "position": {"x": 0, "y": 0},
         "conditions": ["<player-prefix>", "<player-twitter>"]},
        {"type": "rect", "id": "b", "position": {"x": 0, "y": 0},
         "conditions": ["<player-twitter>", "<player-prefix>"]},
        {"type": "rect", "id": "c", "position": {"x": 0, "y": 0},
         "conditions": ["NOT", "<player-twitter>"]},
        {"type": "rect", "id": "d", "position": {"x": 0, "y": 0},
         "conditions": ["NOT", "<tournament-icon>"]},
        {"type": "rect", "id": "e", "position": {"x": 0, "y": 0}, "conditions": []},
        {"type": "rect", "id": "f", "position": {"x": 0, "y": 0}, "hidden": true}
    ]));
    let nodes = build_scene(&els, &ctx, SceneOptions::new());
    let ids: Vec<&str> = nodes.iter().filter_map(|n| n.id.as_deref()).collect();
    assert_eq!(ids, vec!["b", "c", "e"]);
}

#[test]
fn test_placeholders_resolve_in_one_pass() {
    let env = Env::new();
    let sneaky = player(json!({"name": "<player-name>", "placement": 3}));
    let t = tournament();
    let ctx = env
        .ctx(500.0, 500.0)
        .with_data(DataContext::new(Some(&sneaky), Some(&t)));
    let els = elements(json!([
        {"type": "text", "position": {"x": 0, "y": 0},
         "text": "<player-placement>: <player-name> @ <tournament-name> <nope> <player-prefix>"}
    ]));
    let nodes = build_scene(&els, &ctx, SceneOptions::new());
    assert_eq!(
        text_of(&nodes[0]),
        "3rd: <player-name> @ Summit 18 <nope> <player-prefix>"
    );
}

#[test]
fn test_text_palette_entries_are_resolved() {
    let env = Env::new();
    let t = tournament();
    let colors = ColorPalette::new();
    let mut texts = TextPalette::new();
    texts.insert(
        "footer".into(),
        PaletteText {
            text: "<tournament-entrants> entrants".into(),
            name: "Footer".into(),
        },
    );
    let ctx = env
        .ctx(500.0, 500.0)
        .with_palettes(&colors, &texts)
        .with_data(DataContext::new(None, Some(&t)));
    let els = elements(json!([
        {"type": "text", "position": {"x": 0, "y": 0}, "text": "fallback", "textId": "footer"},
        {"type": "text", "position": {"x": 0, "y": 0}, "text": "fallback", "textId": "missing"}
    ]));
    let nodes = build_scene(&els, &ctx, SceneOptions::new());
    assert_eq!(text_of(&nodes[0]), "512 entrants");
    assert_eq!(text_of(&nodes[1]), "fallback");
}

// ─── Flex ───────────────────────────────────────────────────────

#[test]
fn test_flex_group_children_fill_the_row() {
    let env = Env::new();
    let ctx = env.ctx(1000.0, 1000.0);
    let els = elements(json!([{
        "type": "flexGroup",
        "position": {"x": 20, "y": 30},
        "size": {"width": 400, "height": 50},
        "gap": 10,
        "align": "center",
        "elements": [
            {"type": "text", "position": {"x": 0, "y": 0}, "text": "1st", "fontSize": 20},
            {"type": "rect", "position": {"x": 0, "y": 0}, "size": {"width": 40, "height": 40},
             "flex": {"grow": true}},
            {"type": "rect", "position": {"x": 0, "y": 0}, "size": {"width": 60, "height": 20},
             "hidden": true},
            {"type": "rect", "position": {"x": 0, "y": 0}, "size": {"width": 40, "height": 10}}
        ]
    }]));
    let nodes = build_scene(&els, &ctx, SceneOptions::new());
    let group = &nodes[0];
    assert_eq!((group.x, group.y), (20.0, 30.0));
    assert_eq!(group.children.len(), 3);

    let widths: Vec<f64> = group.children.iter().map(|c| c.width).collect();
    // "1st" at 20px is 30 wide; the grower takes what's left
    assert_eq!(widths, vec![30.0, 310.0, 40.0]);
    assert_eq!(widths.iter().sum::<f64>() + 2.0 * 10.0, 400.0);

    let xs: Vec<f64> = group.children.iter().map(|c| c.x).collect();
    assert_eq!(xs, vec![0.0, 40.0, 360.0]);
    let ys: Vec<f64> = group.children.iter().map(|c| c.y).collect();
    assert_eq!(ys, vec![15.0, 5.0, 20.0]);
}

#[test]
fn test_flex_shrink_never_goes_negative() {
    let env = Env::new();
    let ctx = env.ctx(100.0, 100.0);
    let config = FlexGroupConfig {
        elements: vec![
            ElementConfig::rect(10.0, 10.0).with_flex(FlexItem {
                shrink: Some(true),
                ..Default::default()
            }),
            ElementConfig::rect(500.0, 10.0),
        ],
        ..Default::default()
    };
    let placed = flex::solve(&config, Size::new(100.0, 100.0), &ctx);
    let widths: Vec<f64> = placed.iter().map(|p| p.explicit_width().unwrap()).collect();
    assert_eq!(widths, vec![0.0, 500.0]);
}

#[test]
fn test_flex_group_is_not_mutated() {
    let env = Env::new();
    let ctx = env.ctx(400.0, 100.0);
    let els = elements(json!([{
        "type": "flexGroup",
        "position": {"x": 0, "y": 0},
        "elements": [
            {"type": "rect", "position": {"x": 7, "y": 7}, "size": {"width": 40, "height": 10}},
            {"type": "rect", "position": {"x": 7, "y": 7}, "size": {"width": 40, "height": 10}}
        ]
    }]));
    let before = els.clone();
    let first = build_scene(&els, &ctx, SceneOptions::new());
    let second = build_scene(&els, &ctx, SceneOptions::new());
    assert_eq!(els, before);
    assert_eq!(first[0].children[1].x, second[0].children[1].x);
    assert_eq!(first[0].children[1].x, 40.0);
}

// ─── Grid ───────────────────────────────────────────────────────

#[test]
fn test_grid_auto_dimensions() {
    let config = FlexGridConfig {
        column_gap: 8.0,
        row_gap: 8.0,
        ..Default::default()
    };
    for n in 1..=30 {
        let dims = grid::choose_dimensions(&config, n, Size::new(1280.0, 720.0));
        assert!(dims.rows * dims.columns >= n);
        assert!(dims.rows * dims.columns - n < dims.columns);
    }
}

#[test]
fn test_grid_in_scene() {
    let env = Env::new();
    let ctx = env.ctx(1000.0, 1000.0);
    let els = elements(json!([{
        "type": "flexGrid",
        "position": {"x": 0, "y": 0},
        "size": {"width": 300, "height": 200},
        "columns": 3,
        "alignLastRow": "center",
        "elements": [
            {"type": "rect", "position": {"x": 0, "y": 0}},
            {"type": "rect", "position": {"x": 0, "y": 0}},
            {"type": "rect", "position": {"x": 0, "y": 0}},
            {"type": "rect", "position": {"x": 0, "y": 0}}
        ]
    }]));
    let nodes = build_scene(&els, &ctx, SceneOptions::new());
    let cells: Vec<(f64, f64, f64, f64)> = nodes[0]
        .children
        .iter()
        .map(|c| (c.x, c.y, c.width, c.height))
        .collect();
    assert_eq!(
        cells,
        vec![
            (0.0, 0.0, 100.0, 100.0),
            (100.0, 0.0, 100.0, 100.0),
            (200.0, 0.0, 100.0, 100.0),
            (100.0, 100.0, 100.0, 100.0),
        ]
    );
}

// ─── Readiness ──────────────────────────────────────────────────

#[test]
fn test_tracker_counts_only_rendered_leaves() {
    let env = Env::new();
    let alpha = player(json!({
        "name": "Alpha",
        "countryFlag": "flags/se.png",
        "characters": [
            {"name": "Fox", "image": "fox.png", "icon": "fox-icon.png"},
            {"name": "Falco", "image": "falco.png"},
            {"name": "Sheik", "image": "sheik.png", "icon": "sheik-icon.png"}
        ]
    }));
    let t = tournament();
    let ctx = env
        .ctx(800.0, 600.0)
        .with_data(DataContext::new(Some(&alpha), Some(&t)));
    let els = elements(json!([
        {"type": "characterImage", "position": {"x": 0, "y": 0}},
        {"type": "characterImage", "position": {"x": 0, "y": 0}, "index": 9},
        {"type": "altCharacterImage", "position": {"x": 0, "y": 0}, "gap": 4},
        {"type": "userFlag", "position": {"x": 0, "y": 0}},
        {"type": "playerFlag", "position": {"x": 0, "y": 0}},
        {"type": "tournamentIcon", "position": {"x": 0, "y": 0}, "hidden": true},
        {"type": "image", "position": {"x": 0, "y": 0}, "src": "x.png",
         "conditions": ["<player-twitter>"]},
        {"type": "flexGroup", "position": {"x": 0, "y": 0}, "elements": [
            {"type": "svg", "position": {"x": 0, "y": 0}, "src": "logo.svg"}
        ]}
    ]));

    let fired = Rc::new(Cell::new(0));
    let count = Rc::clone(&fired);
    let nodes = build_scene(
        &els,
        &ctx,
        SceneOptions::new().on_all_ready(move || count.set(count.get() + 1)),
    );
    let signals = signals(&nodes);
    let sources: Vec<&str> = signals.iter().map(|s| s.source()).collect();
    assert_eq!(
        sources,
        vec!["fox.png", "falco.png", "sheik-icon.png", "flags/se.png", "logo.svg"]
    );

    let alts = &nodes[1];
    assert_eq!(alts.children.len(), 2);
    assert_eq!(alts.size(), Size::new(68.0, 32.0));

    for signal in &signals {
        assert_eq!(fired.get(), 0);
        signal.ready();
    }
    assert_eq!(fired.get(), 1);
    signals[0].ready();
    env.queue.run_until_idle();
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_zero_leaves_complete_after_the_call_returns() {
    let env = Env::new();
    let ctx = env.ctx(100.0, 100.0);
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let els = elements(json!([
        {"type": "text", "position": {"x": 0, "y": 0}, "text": "no images"},
        {"type": "userFlag", "position": {"x": 0, "y": 0}}
    ]));
    build_scene(&els, &ctx, SceneOptions::new().on_all_ready(move || flag.set(true)));
    assert!(!fired.get());
    assert_eq!(env.queue.run_until_idle(), 1);
    assert!(fired.get());
}

#[test]
fn test_first_error_wins_and_blocks_completion() {
    let env = Env::new();
    let ctx = env.ctx(100.0, 100.0);
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let els = elements(json!([
        {"type": "image", "position": {"x": 0, "y": 0}, "src": "a.png"},
        {"type": "image", "position": {"x": 0, "y": 0}, "src": "b.png"},
        {"type": "image", "position": {"x": 0, "y": 0}, "src": "c.png"}
    ]));
    let nodes = build_scene(
        &els,
        &ctx,
        SceneOptions::new()
            .on_all_ready(move || flag.set(true))
            .on_error(move |e| sink.borrow_mut().push(e)),
    );
    let signals = signals(&nodes);
    signals[0].ready();
    signals[1].error(ResourceError::NotFound("b.png".into()));
    signals[2].error(ResourceError::NotFound("c.png".into()));
    assert_eq!(*errors.borrow(), vec![ResourceError::NotFound("b.png".into())]);
    assert!(!fired.get());
}

// ─── Resources ──────────────────────────────────────────────────

#[test]
fn test_load_pending_settles_the_pass() {
    let env = Env::new();
    let t = tournament();
    let ctx = env
        .ctx(400.0, 400.0)
        .with_data(DataContext::new(None, Some(&t)));
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let els = elements(json!([
        {"type": "tournamentIcon", "position": {"x": 0, "y": 0},
         "size": {"width": 40, "height": 40}},
        {"type": "svg", "position": {"x": 0, "y": 0}, "src": "logo.svg",
         "colorMap": {"#ffffff": "#222222"}}
    ]));
    let mut nodes = build_scene(&els, &ctx, SceneOptions::new().on_all_ready(move || flag.set(true)));
    let report = load_pending(&mut nodes, &StubLoader, &env.cache);
    assert!(report.is_ok());
    assert_eq!(report.loaded, 2);
    assert!(fired.get());

    let DrawCommand::Image(icon) = &nodes[0].draw else {
        panic!("expected image");
    };
    // 4x2 contained in 40x40
    let placement = icon.placement.unwrap();
    assert_eq!(placement.dest, Rect::new(0.0, 10.0, 40.0, 20.0));

    let DrawCommand::Svg(svg) = &nodes[1].draw else {
        panic!("expected svg");
    };
    assert!(svg.markup.as_deref().unwrap().contains("#222222"));
    assert_eq!(nodes[1].size(), Size::new(10.0, 10.0));
}

#[test]
fn test_load_failure_reaches_on_error() {
    let env = Env::new();
    let ctx = env.ctx(400.0, 400.0);
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let els = elements(json!([
        {"type": "image", "position": {"x": 0, "y": 0}, "src": "broken.png"}
    ]));
    let mut nodes = build_scene(
        &els,
        &ctx,
        SceneOptions::new().on_error(move |e| sink.borrow_mut().push(e)),
    );
    let report = load_pending(&mut nodes, &StubLoader, &env.cache);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(errors.borrow().len(), 1);
    assert!(errors.borrow()[0].to_string().contains("broken.png"));
}

// ─── Wrappers ───────────────────────────────────────────────────

#[test]
fn test_selectable_overlay_reports_selection() {
    let env = Env::new();
    let ctx = env.ctx(400.0, 400.0);
    let selected = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&selected);
    let els = elements(json!([
        {"type": "rect", "id": "score", "position": {"x": 12, "y": 8},
         "size": {"width": 10, "height": 10}, "selectable": true, "scale": {"x": 2, "y": 2},
         "filterEffects": {"sepia": true}, "clip": true},
        {"type": "rect", "position": {"x": 0, "y": 0}, "selectable": true}
    ]));
    let nodes = build_scene(
        &els,
        &ctx,
        SceneOptions::new().on_select(move |id| sink.borrow_mut().push(id.to_string())),
    );

    let overlay = &nodes[0];
    assert_eq!((overlay.x, overlay.y), (12.0, 8.0));
    assert_eq!(overlay.transform.scale.x, 2.0);
    let filtered = &overlay.children[0];
    assert!(matches!(filtered.draw, DrawCommand::Filtered(_)));
    assert_eq!((filtered.x, filtered.y), (0.0, 0.0));
    assert!(filtered.transform.is_identity());
    let rect = &filtered.children[0];
    assert_eq!(rect.clip, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

    for node in &nodes {
        if let DrawCommand::Selectable(target) = &node.draw {
            target.select();
        }
    }
    assert_eq!(*selected.borrow(), vec!["score".to_string(), "rect".to_string()]);
}

// ─── End to end ─────────────────────────────────────────────────

#[test]
fn test_render_json_end_to_end() {
    let design = json!({
        "canvasSize": {"width": 1920, "height": 1080},
        "colorPalette": {"gold": {"color": "#d4af37", "name": "Gold"}},
        "tournament": {"elements": [
            {"type": "text", "position": {"x": 40, "y": 40}, "text": "<tournament-name>",
             "fill": "gold"}
        ]},
        "basePlayer": {
            "position": {"x": 40, "y": 200},
            "size": {"width": 600, "height": 100},
            "elements": [
                {"type": "smartText", "position": {"x": 0, "y": 0}, "size": {"width": 200},
                 "text": "<player-name>", "fontSize": 48}
            ]
        },
        "players": [{}, {"position": {"x": 40, "y": 320}}]
    });
    let data = json!({
        "tournament": {"name": "Summit 18"},
        "players": [{"name": "Alpha"}, {"name": "A much longer gamer tag"}]
    });

    let out = render_json(&design.to_string(), &data.to_string()).unwrap();
    let tree: serde_json::Value = serde_json::from_str(&out).unwrap();
    let nodes = tree.as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["id"], "player-1");
    assert_eq!(nodes[1]["y"], 320.0);
    assert_eq!(nodes[2]["draw"]["kind"], "text");
    assert_eq!(nodes[2]["draw"]["fill"], "#d4af37");

    let short = nodes[0]["children"][0]["draw"]["fontSize"].as_f64().unwrap();
    let long = nodes[1]["children"][0]["draw"]["fontSize"].as_f64().unwrap();
    assert_eq!(short, 48.0);
    assert!(long < short);
    assert!(long >= 8.0);
}

#[test]
fn test_render_json_reports_bad_data() {
    let design = json!({
        "canvasSize": {"width": 100, "height": 100},
        "basePlayer": {"position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}}
    });
    let err = render_json(&design.to_string(), "{\"tournament\": 5}").unwrap_err();
    assert!(matches!(err, PodiumError::Parse { .. }));
}
