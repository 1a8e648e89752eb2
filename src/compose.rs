//! # Design Composition
//!
//! Builds a whole canvas from a [`Design`] and the tournament data it is
//! populated with: the background layer, one group per player slot, then the
//! tournament layer on top. All three share one readiness tracker, so the
//! completion callback fires once for the entire canvas.

use crate::data::{DataContext, DesignData};
use crate::error::PodiumError;
use crate::font::FontContext;
use crate::layout::{
    DrawCommand, RenderNode, SceneBuilder, SceneContext, SceneOptions, Transform,
};
use crate::model::{Design, PlayerDesign};
use crate::ready::{count_async_leaves, MicrotaskQueue, ReadinessTracker};
use crate::svg::SvgCache;
use crate::text::TextMeasurer;

/// Compose `design` with `data`.
///
/// `env` supplies the measurer, the SVG cache and the microtask queue; its
/// container, palettes and data are replaced per layer. Player slots beyond
/// the players present in `data` are left out.
pub fn compose_design(
    design: &Design,
    data: &DesignData,
    env: &SceneContext,
    options: SceneOptions,
) -> Vec<RenderNode> {
    let shared = DataContext {
        player: None,
        tournament: Some(&data.tournament),
        background_image: design.background_image.as_deref(),
    };
    let canvas = env
        .with_palettes(&design.color_palette, &design.text_palette)
        .with_container(design.canvas_size)
        .with_data(shared);

    let slots = design.player_slots().min(data.players.len());
    let players: Vec<(PlayerDesign, SceneContext)> = (0..slots)
        .map(|slot| {
            let player = design.player_design(slot);
            let ctx = canvas
                .with_container(player.size)
                .with_data(DataContext {
                    player: data.players.get(slot),
                    ..shared
                });
            (player, ctx)
        })
        .collect();

    let expected = count_async_leaves(&design.background.elements, &canvas)
        + players
            .iter()
            .map(|(player, ctx)| count_async_leaves(&player.elements, ctx))
            .sum::<usize>()
        + count_async_leaves(&design.tournament.elements, &canvas);
    log::debug!(
        "composing {} player slots, {} async leaves",
        players.len(),
        expected
    );

    let tracker = ReadinessTracker::new(expected, options.on_all_ready, options.on_error);
    let builder = SceneBuilder::new(tracker, options.on_select);

    let mut nodes = builder.build_elements(&design.background.elements, &canvas);
    for (slot, (player, ctx)) in players.iter().enumerate() {
        let children = builder.build_elements(&player.elements, ctx);
        nodes.push(player_node(slot, player, children));
    }
    nodes.extend(builder.build_elements(&design.tournament.elements, &canvas));

    builder.finish(env.microtasks);
    nodes
}

fn player_node(slot: usize, player: &PlayerDesign, children: Vec<RenderNode>) -> RenderNode {
    RenderNode {
        id: Some(format!("player-{}", slot + 1)),
        x: player.position.x,
        y: player.position.y,
        transform: Transform {
            scale: player.scale.unwrap_or_default(),
            ..Transform::default()
        },
        ..RenderNode::group(player.size, children)
    }
}

/// Owns everything a composition pass borrows: registered fonts, the SVG
/// cache and the microtask queue.
#[derive(Debug, Default)]
pub struct Composer {
    fonts: FontContext,
    svg_cache: SvgCache,
    microtasks: MicrotaskQueue,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A composer with the design's custom fonts registered.
    pub fn for_design(design: &Design) -> Result<Self, PodiumError> {
        let mut composer = Self::new();
        for font in &design.fonts {
            composer
                .fonts
                .register_encoded(&font.family, font.font_style, &font.src)?;
        }
        Ok(composer)
    }

    pub fn fonts(&self) -> &FontContext {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontContext {
        &mut self.fonts
    }

    pub fn svg_cache(&self) -> &SvgCache {
        &self.svg_cache
    }

    pub fn microtasks(&self) -> &MicrotaskQueue {
        &self.microtasks
    }

    /// Compose with the registered fonts as the text measurer.
    pub fn compose(
        &self,
        design: &Design,
        data: &DesignData,
        options: SceneOptions,
    ) -> Vec<RenderNode> {
        self.compose_with(&self.fonts, design, data, options)
    }

    pub fn compose_with(
        &self,
        measurer: &dyn TextMeasurer,
        design: &Design,
        data: &DesignData,
        options: SceneOptions,
    ) -> Vec<RenderNode> {
        let env = SceneContext::new(
            design.canvas_size,
            measurer,
            &self.svg_cache,
            &self.microtasks,
        );
        compose_design(design, data, &env, options)
    }

    /// Run deferred completion callbacks.
    pub fn run_microtasks(&self) -> usize {
        self.microtasks.run_until_idle()
    }
}

/// True when `node` is a player slot group.
pub fn is_player_node(node: &RenderNode) -> bool {
    matches!(node.draw, DrawCommand::Group)
        && node
            .id
            .as_deref()
            .is_some_and(|id| id.starts_with("player-"))
}
