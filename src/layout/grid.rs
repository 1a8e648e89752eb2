//! # Grid Layout
//!
//! Places the visible children of a `flexGrid` in equally sized cells,
//! row-major. When the author leaves `rows` and `columns` open, the solver
//! tries every row count and keeps the arrangement that best fills the
//! container while staying close to the target cell aspect ratio.

use super::{is_rendered, ChildBuilder, RenderNode, SceneContext};
use crate::model::{ElementConfig, FlexGridConfig, Point, Size};

const FILL_WEIGHT: f64 = 0.7;
const ASPECT_WEIGHT: f64 = 0.3;

/// Rows and columns of a solved grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub rows: usize,
    pub columns: usize,
}

impl GridDimensions {
    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }
}

/// How many of `count` visible children a grid places. Only a grid with
/// both dimensions fixed can run out of cells.
pub fn capacity(config: &FlexGridConfig, count: usize) -> usize {
    match (config.rows, config.columns) {
        (Some(rows), Some(columns)) => count.min(rows * columns),
        _ => count,
    }
}

fn target_aspect(config: &FlexGridConfig) -> Option<f64> {
    config.aspect_ratio.filter(|a| a.is_finite() && *a > 0.0)
}

/// Size of one cell for a `rows` x `columns` grid inside `container`.
///
/// Without a target aspect the cell takes all the space it has. With one,
/// the cell is sized from the available width first and from the available
/// height when that would overflow vertically.
pub fn cell_size(config: &FlexGridConfig, dims: GridDimensions, container: Size) -> Size {
    let columns = dims.columns.max(1) as f64;
    let rows = dims.rows.max(1) as f64;
    let avail_w = ((container.width - config.column_gap * (columns - 1.0)) / columns).max(0.0);
    let avail_h = ((container.height - config.row_gap * (rows - 1.0)) / rows).max(0.0);

    match target_aspect(config) {
        None => Size::new(avail_w, avail_h),
        Some(aspect) => {
            let from_width = Size::new(avail_w, avail_w / aspect);
            if from_width.height <= avail_h {
                from_width
            } else {
                Size::new(avail_h * aspect, avail_h)
            }
        }
    }
}

fn score(config: &FlexGridConfig, count: usize, cell: Size, container: Size) -> f64 {
    let area = container.width * container.height;
    let fill = if area > 0.0 {
        count as f64 * cell.width * cell.height / area
    } else {
        0.0
    };
    let aspect = match target_aspect(config) {
        None => 1.0,
        Some(target) => {
            let actual = cell.width / cell.height;
            if actual.is_finite() && actual > 0.0 {
                1.0 - (actual / target).ln().abs()
            } else {
                0.0
            }
        }
    };
    FILL_WEIGHT * fill + ASPECT_WEIGHT * aspect
}

/// Pick the grid dimensions for `count` children.
pub fn choose_dimensions(config: &FlexGridConfig, count: usize, container: Size) -> GridDimensions {
    let count = count.max(1);
    match (config.rows, config.columns) {
        (Some(rows), Some(columns)) => GridDimensions {
            rows: rows.max(1),
            columns: columns.max(1),
        },
        (Some(rows), None) => {
            let rows = rows.max(1);
            GridDimensions {
                rows,
                columns: count.div_ceil(rows),
            }
        }
        (None, Some(columns)) => {
            let columns = columns.max(1);
            GridDimensions {
                rows: count.div_ceil(columns),
                columns,
            }
        }
        (None, None) => search(config, count, container),
    }
}

fn search(config: &FlexGridConfig, count: usize, container: Size) -> GridDimensions {
    let mut best = GridDimensions {
        rows: 1,
        columns: count,
    };
    let mut best_score = f64::NEG_INFINITY;

    for rows in 1..=count {
        let columns = count.div_ceil(rows);
        let dims = GridDimensions { rows, columns };
        // last row would be empty
        if dims.cells() - count >= columns {
            continue;
        }
        let s = score(config, count, cell_size(config, dims, container), container);
        if s > best_score {
            best = dims;
            best_score = s;
        }
    }

    log::debug!(
        "grid: {} children in {}x{} (score {:.3})",
        count,
        best.rows,
        best.columns,
        best_score
    );
    best
}

/// Position the visible children of a grid inside `container`.
pub fn solve(config: &FlexGridConfig, container: Size, ctx: &SceneContext) -> Vec<ElementConfig> {
    let mut visible: Vec<&ElementConfig> = config
        .elements
        .iter()
        .filter(|el| is_rendered(el, &ctx.data))
        .collect();
    let placed_count = capacity(config, visible.len());
    if placed_count < visible.len() {
        log::debug!(
            "grid: dropping {} children past {} cells",
            visible.len() - placed_count,
            placed_count
        );
    }
    visible.truncate(placed_count);
    if visible.is_empty() {
        return vec![];
    }

    let count = visible.len();
    let dims = choose_dimensions(config, count, container);
    let cell = cell_size(config, dims, container);
    let columns = dims.columns;
    let used_rows = count.div_ceil(columns);

    let row_width = |items: usize| {
        items as f64 * cell.width + items.saturating_sub(1) as f64 * config.column_gap
    };
    let content_w = row_width(columns.min(count));
    let content_h =
        used_rows as f64 * cell.height + used_rows.saturating_sub(1) as f64 * config.row_gap;
    let origin_x = config.justify.offset(container.width, content_w);
    let origin_y = config.align.offset(container.height, content_h);

    let last_row_items = count - (used_rows - 1) * columns;
    let last_row_offset = config
        .align_last_row
        .offset(content_w, row_width(last_row_items));

    visible
        .into_iter()
        .enumerate()
        .map(|(i, child)| {
            let row = i / columns;
            let column = i % columns;
            let shift = if row == used_rows - 1 {
                last_row_offset
            } else {
                0.0
            };
            let position = Point::new(
                origin_x + shift + column as f64 * (cell.width + config.column_gap),
                origin_y + row as f64 * (cell.height + config.row_gap),
            );
            child.placed(position, cell)
        })
        .collect()
}

/// Solve a grid and build its children.
pub fn layout(
    config: &FlexGridConfig,
    container: Size,
    ctx: &SceneContext,
    builder: &dyn ChildBuilder,
) -> Vec<RenderNode> {
    solve(config, container, ctx)
        .iter()
        .filter_map(|child| builder.build_child(child, ctx))
        .collect()
}
