//! Palette geometry: viewport clamping and saved-position validation.
//!
//! All coordinates are CSS pixels with the origin at the viewport's
//! top-left. Until the rendered palette has been measured, a conservative
//! estimated footprint stands in so clamping never waits on layout.

use serde::{Deserialize, Serialize};

/// Margin kept between the palette and every viewport edge.
pub const VIEWPORT_MARGIN: f64 = 20.0;

/// Conservative footprint used until the rendered size is measured.
pub const ESTIMATED_FOOTPRINT: Size = Size {
    width: 600.0,
    height: 400.0,
};

/// A top-left position in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A rendered footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// The visible viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Clamp a proposed top-left so footprint plus margin stays inside the
/// viewport. On a viewport too small to honor the margin, the margin wins.
pub fn clamp_position(proposed: Point, footprint: Size, viewport: Viewport) -> Point {
    let max_x = (viewport.width - footprint.width - VIEWPORT_MARGIN).max(VIEWPORT_MARGIN);
    let max_y = (viewport.height - footprint.height - VIEWPORT_MARGIN).max(VIEWPORT_MARGIN);
    Point {
        x: proposed.x.clamp(VIEWPORT_MARGIN, max_x),
        y: proposed.y.clamp(VIEWPORT_MARGIN, max_y),
    }
}

/// True when a position keeps the footprint plus margin fully inside the
/// viewport.
pub fn position_is_valid(position: Point, footprint: Size, viewport: Viewport) -> bool {
    position.x >= VIEWPORT_MARGIN
        && position.y >= VIEWPORT_MARGIN
        && position.x + footprint.width + VIEWPORT_MARGIN <= viewport.width
        && position.y + footprint.height + VIEWPORT_MARGIN <= viewport.height
}

/// Centered position, pushed at least a margin away from the edges.
pub fn centered_position(footprint: Size, viewport: Viewport) -> Point {
    Point {
        x: ((viewport.width - footprint.width) / 2.0).max(VIEWPORT_MARGIN),
        y: ((viewport.height - footprint.height) / 2.0).max(VIEWPORT_MARGIN),
    }
}

/// The saved position if it is still valid for this viewport, otherwise
/// the centered fallback.
pub fn resolve_open_position(
    saved: Option<Point>,
    footprint: Size,
    viewport: Viewport,
) -> Point {
    match saved {
        Some(position) if position_is_valid(position, footprint, viewport) => position,
        _ => centered_position(footprint, viewport),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    #[test]
    fn test_clamp_right_edge_is_exact() {
        let proposed = Point { x: 5000.0, y: 100.0 };
        let clamped = clamp_position(proposed, ESTIMATED_FOOTPRINT, VIEWPORT);

        // 1280 - 600 - 20
        assert_eq!(clamped.x, 660.0);
        assert_eq!(clamped.y, 100.0);
    }

    #[test]
    fn test_clamp_top_left_margin() {
        let clamped = clamp_position(
            Point { x: -50.0, y: 3.0 },
            ESTIMATED_FOOTPRINT,
            VIEWPORT,
        );
        assert_eq!(clamped, Point { x: 20.0, y: 20.0 });
    }

    #[test]
    fn test_clamp_tiny_viewport_keeps_margin() {
        let tiny = Viewport {
            width: 300.0,
            height: 200.0,
        };
        let clamped = clamp_position(Point { x: 150.0, y: 150.0 }, ESTIMATED_FOOTPRINT, tiny);
        assert_eq!(clamped, Point { x: 20.0, y: 20.0 });
    }

    #[test]
    fn test_resolve_prefers_valid_saved_position() {
        let saved = Point { x: 100.0, y: 60.0 };
        let resolved = resolve_open_position(Some(saved), ESTIMATED_FOOTPRINT, VIEWPORT);
        assert_eq!(resolved, saved);
    }

    #[test]
    fn test_resolve_falls_back_to_center() {
        // Off-viewport saved position, e.g. saved on a larger monitor.
        let saved = Point { x: 2000.0, y: 60.0 };
        let resolved = resolve_open_position(Some(saved), ESTIMATED_FOOTPRINT, VIEWPORT);
        assert_eq!(resolved, Point { x: 340.0, y: 200.0 });

        let missing = resolve_open_position(None, ESTIMATED_FOOTPRINT, VIEWPORT);
        assert_eq!(missing, Point { x: 340.0, y: 200.0 });
    }

    #[test]
    fn test_centered_position_honors_margin_minimum() {
        let narrow = Viewport {
            width: 500.0,
            height: 300.0,
        };
        let centered = centered_position(ESTIMATED_FOOTPRINT, narrow);
        assert_eq!(centered, Point { x: 20.0, y: 20.0 });
    }
}
