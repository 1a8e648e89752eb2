//! # Flex Layout
//!
//! One-dimensional arrangement of a `flexGroup`'s children along a row or a
//! column, with optional wrapping. Each visible child gets a main-axis size
//! (flex basis, measured text width, or explicit size), lines are filled
//! greedily, leftover space goes to `grow` children and overflow is taken
//! from `shrink` children in proportion to their size. The solver returns
//! re-positioned copies of the children; building them is the caller's job.

use super::{
    is_rendered, measure_text_element, settle_fitted_text, ChildBuilder, MeasuredText,
    RenderNode, SceneContext,
};
use crate::model::{
    ElementConfig, FlexDirection, FlexGroupConfig, Justify, Point, Size, WrapDirection,
};

/// Distribute remaining space among items based on flex-grow factors.
pub fn distribute_grow(items: &mut [(f64, f64)], remaining: f64) {
    // items: [(current_size, grow)]
    let total_grow: f64 = items.iter().map(|(_, g)| g).sum();
    if total_grow <= 0.0 || remaining <= 0.0 {
        return;
    }
    for (size, grow) in items.iter_mut() {
        *size += remaining * (*grow / total_grow);
    }
}

/// Shrink items to fit within available space based on flex-shrink factors,
/// weighted by each item's size. Sizes never go below zero.
pub fn distribute_shrink(items: &mut [(f64, f64)], overflow: f64) {
    // items: [(current_size, shrink)]
    let total_shrink_weighted: f64 = items.iter().map(|(w, s)| w * s).sum();
    if total_shrink_weighted <= 0.0 || overflow >= 0.0 {
        return;
    }
    let overflow = overflow.abs();
    for (size, shrink) in items.iter_mut() {
        let factor = (*size * *shrink) / total_shrink_weighted;
        *size -= overflow * factor;
        *size = size.max(0.0);
    }
}

/// A single line of items in a wrapping flex container.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapLine {
    /// Index of the first item in this line.
    pub start: usize,
    /// One past the last item (exclusive end).
    pub end: usize,
}

/// Partition items into wrap lines based on available main-axis space.
/// Always adds at least one item per line.
pub fn partition_into_lines(sizes: &[f64], gap: f64, available: f64) -> Vec<WrapLine> {
    if sizes.is_empty() {
        return vec![];
    }

    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_size = 0.0;

    for (i, &s) in sizes.iter().enumerate() {
        let needed = if i == line_start { s } else { gap + s };
        if i > line_start && line_size + needed > available {
            lines.push(WrapLine {
                start: line_start,
                end: i,
            });
            line_start = i;
            line_size = s;
        } else {
            line_size += needed;
        }
    }

    lines.push(WrapLine {
        start: line_start,
        end: sizes.len(),
    });
    lines
}

/// A visible child with its flex-base sizes.
struct Item<'e> {
    element: &'e ElementConfig,
    main: f64,
    cross: f64,
    grow: bool,
    shrink: bool,
    text: Option<MeasuredText>,
}

impl<'e> Item<'e> {
    fn measure(element: &'e ElementConfig, direction: FlexDirection, ctx: &SceneContext) -> Self {
        let text = measure_text_element(element, ctx);
        let flex = element.flex.unwrap_or_default();
        let text_width = text.map(|t| t.metrics.width);
        let font_size = text.map(|t| t.font_size);

        let (main, cross) = match direction {
            FlexDirection::Row => (
                text_width.or(element.explicit_width()),
                element.explicit_height().or(font_size),
            ),
            FlexDirection::Column => (
                element.explicit_height().or(font_size),
                text_width.or(element.explicit_width()),
            ),
        };

        Self {
            element,
            main: flex.basis.or(main).unwrap_or(0.0),
            cross: cross.unwrap_or(0.0),
            grow: flex.grow.unwrap_or(false),
            shrink: flex.shrink.unwrap_or(false),
            text,
        }
    }
}

fn weights(items: &[Item], sizes: &[f64], pick: impl Fn(&Item) -> bool) -> Vec<(f64, f64)> {
    items
        .iter()
        .zip(sizes)
        .map(|(item, &size)| (size, if pick(item) { 1.0 } else { 0.0 }))
        .collect()
}

/// Position the visible children of a flex group inside `container`.
pub fn solve(config: &FlexGroupConfig, container: Size, ctx: &SceneContext) -> Vec<ElementConfig> {
    let direction = config.direction;
    let items: Vec<Item> = config
        .elements
        .iter()
        .filter(|el| is_rendered(el, &ctx.data))
        .map(|el| Item::measure(el, direction, ctx))
        .collect();
    if items.is_empty() {
        return vec![];
    }

    let (container_main, container_cross) = match direction {
        FlexDirection::Row => (container.width, container.height),
        FlexDirection::Column => (container.height, container.width),
    };
    let gap = config.gap;

    let mut lines = if config.wrap {
        let mains: Vec<f64> = items.iter().map(|i| i.main).collect();
        partition_into_lines(&mains, gap, container_main)
    } else {
        vec![WrapLine {
            start: 0,
            end: items.len(),
        }]
    };
    if config.wrap_direction == WrapDirection::End {
        lines.reverse();
    }
    log::debug!(
        "flex {:?}: {} children in {} lines",
        direction,
        items.len(),
        lines.len()
    );

    let mut placed = Vec::with_capacity(items.len());
    let mut cross_cursor = 0.0;

    for line in &lines {
        let line_items = &items[line.start..line.end];
        let count = line_items.len();
        let gaps = gap * (count - 1) as f64;

        let mut sizes: Vec<f64> = line_items.iter().map(|i| i.main).collect();
        let remaining = container_main - sizes.iter().sum::<f64>() - gaps;
        if remaining > 0.0 {
            let mut grown = weights(line_items, &sizes, |i| i.grow);
            distribute_grow(&mut grown, remaining);
            sizes = grown.into_iter().map(|(s, _)| s).collect();
        } else if remaining < 0.0 {
            let mut shrunk = weights(line_items, &sizes, |i| i.shrink);
            distribute_shrink(&mut shrunk, remaining);
            sizes = shrunk.into_iter().map(|(s, _)| s).collect();
        }

        let leftover = container_main - sizes.iter().sum::<f64>() - gaps;
        let (mut main_cursor, extra_gap) = match config.justify {
            Justify::Start => (0.0, 0.0),
            Justify::Center => (leftover / 2.0, 0.0),
            Justify::End => (leftover, 0.0),
            Justify::SpaceBetween if count > 1 => (0.0, leftover.max(0.0) / (count - 1) as f64),
            Justify::SpaceBetween => (0.0, 0.0),
        };

        let line_cross = if config.wrap {
            line_items.iter().map(|i| i.cross).fold(0.0_f64, f64::max)
        } else {
            container_cross
        };

        for (item, &main_size) in line_items.iter().zip(&sizes) {
            let cross_pos = cross_cursor + config.align.offset(line_cross, item.cross);
            let (position, size) = match direction {
                FlexDirection::Row => (
                    Point::new(main_cursor, cross_pos),
                    Size::new(main_size, item.cross),
                ),
                FlexDirection::Column => (
                    Point::new(cross_pos, main_cursor),
                    Size::new(item.cross, main_size),
                ),
            };
            let child = item.element.placed(position, size);
            placed.push(match &item.text {
                Some(measured) => settle_fitted_text(child, measured),
                None => child,
            });
            main_cursor += main_size + gap + extra_gap;
        }

        cross_cursor += line_cross + gap;
    }

    placed
}

/// Solve a flex group and build its children.
pub fn layout(
    config: &FlexGroupConfig,
    container: Size,
    ctx: &SceneContext,
    builder: &dyn ChildBuilder,
) -> Vec<RenderNode> {
    solve(config, container, ctx)
        .iter()
        .filter_map(|child| builder.build_child(child, ctx))
        .collect()
}
