use serde::{Deserialize, Serialize};

use crate::color::{Rgba, format_number};

/// One anchor of a multi-color gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the track, `[0, 1]`.
    pub position: f32,
    pub value: Rgba,
}

impl ColorStop {
    pub const fn new(position: f32, value: Rgba) -> Self {
        Self { position, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Angular,
}

/// The stop pair a fresh gradient starts with: opaque red fading out.
pub fn default_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.0, Rgba::RED),
        ColorStop::new(1.0, Rgba::RED.with_alpha(0.0)),
    ]
}

/// Stops ordered ascending by position. The sort is stable, so stops
/// sharing a position keep their list order.
pub fn sorted_by_position(stops: &[ColorStop]) -> Vec<ColorStop> {
    let mut sorted = stops.to_vec();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));
    sorted
}

/// The pair of stops bounding `target`, by ascending position.
///
/// Returns `None` when `target` falls outside every `[left, right)` span
/// (in particular beyond the last stop).
pub fn find_range(stops: &[ColorStop], target: f32) -> Option<(ColorStop, ColorStop)> {
    let sorted = sorted_by_position(stops);
    sorted
        .windows(2)
        .find(|pair| pair[0].position <= target && target < pair[1].position)
        .map(|pair| (pair[0], pair[1]))
}

/// Color of the gradient at `position`: the bounding stops mixed at the
/// proportional fraction, or the nearest end color outside their span.
pub fn color_at(stops: &[ColorStop], position: f32) -> Rgba {
    if stops.is_empty() {
        return Rgba::WHITE;
    }

    if let Some((before, after)) = find_range(stops, position) {
        let span = after.position - before.position;
        if span <= 0.0 {
            return before.value;
        }
        let fraction = (position - before.position) / span;
        return before.value.mix(after.value, fraction * 100.0);
    }

    let sorted = sorted_by_position(stops);
    if position < sorted[0].position {
        sorted[0].value
    } else {
        sorted[sorted.len() - 1].value
    }
}

/// CSS-style gradient string for the given kind, stops sorted by position.
pub fn css_string(stops: &[ColorStop], kind: GradientKind) -> String {
    let body = sorted_by_position(stops)
        .iter()
        .map(|stop| format!("{} {}%", stop.value, format_number(stop.position * 100.0)))
        .collect::<Vec<_>>()
        .join(", ");

    match kind {
        GradientKind::Linear => format!("linear-gradient(180deg, {body})"),
        GradientKind::Radial => format!("radial-gradient(50% 50% at 50% 50%, {body})"),
        GradientKind::Angular => format!("conic-gradient(from 180deg at 50% 50%, {body})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_to_blue() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.0, Rgba::RED),
            ColorStop::new(1.0, Rgba::rgb(0, 0, 255)),
        ]
    }

    #[test]
    fn find_range_brackets_target() {
        let stops = red_to_blue();
        let (before, after) = find_range(&stops, 0.5).unwrap();
        assert_eq!(before, stops[0]);
        assert_eq!(after, stops[1]);
    }

    #[test]
    fn find_range_misses_outside_span() {
        let stops = red_to_blue();
        assert!(find_range(&stops, 1.5).is_none());
        assert!(find_range(&stops, -0.1).is_none());
        assert!(find_range(&stops, 1.0).is_none());
    }

    #[test]
    fn find_range_sorts_before_searching() {
        let stops = vec![
            ColorStop::new(1.0, Rgba::rgb(0, 0, 255)),
            ColorStop::new(0.0, Rgba::RED),
        ];
        let (before, after) = find_range(&stops, 0.25).unwrap();
        assert_eq!(before.position, 0.0);
        assert_eq!(after.position, 1.0);
    }

    #[test]
    fn color_at_interpolates_alpha_keeping_rgb() {
        let stops = vec![
            ColorStop::new(0.0, Rgba::new(255, 0, 0, 1.0)),
            ColorStop::new(1.0, Rgba::new(255, 0, 0, 0.0)),
        ];
        let mid = color_at(&stops, 0.5);
        assert_eq!((mid.r, mid.g, mid.b), (255, 0, 0));
        assert!((mid.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn color_at_clamps_to_end_colors() {
        let stops = vec![
            ColorStop::new(0.25, Rgba::RED),
            ColorStop::new(0.75, Rgba::rgb(0, 0, 255)),
        ];
        assert_eq!(color_at(&stops, 0.0), Rgba::RED);
        assert_eq!(color_at(&stops, 1.0), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn duplicate_positions_resolve_by_list_order() {
        let stops = vec![
            ColorStop::new(0.5, Rgba::RED),
            ColorStop::new(0.5, Rgba::rgb(0, 255, 0)),
            ColorStop::new(1.0, Rgba::rgb(0, 0, 255)),
        ];
        let (before, _) = find_range(&stops, 0.5).unwrap();
        // Stable sort keeps the second 0.5 stop adjacent to the 1.0 stop.
        assert_eq!(before.value, Rgba::rgb(0, 255, 0));
    }

    #[test]
    fn css_strings_per_kind() {
        let stops = vec![
            ColorStop::new(1.0, Rgba::RED.with_alpha(0.0)),
            ColorStop::new(0.0, Rgba::RED),
        ];
        assert_eq!(
            css_string(&stops, GradientKind::Linear),
            "linear-gradient(180deg, rgba(255, 0, 0, 1) 0%, rgba(255, 0, 0, 0) 100%)"
        );
        assert_eq!(
            css_string(&stops, GradientKind::Radial),
            "radial-gradient(50% 50% at 50% 50%, rgba(255, 0, 0, 1) 0%, rgba(255, 0, 0, 0) 100%)"
        );
        assert_eq!(
            css_string(&stops, GradientKind::Angular),
            "conic-gradient(from 180deg at 50% 50%, rgba(255, 0, 0, 1) 0%, rgba(255, 0, 0, 0) 100%)"
        );
    }

    #[test]
    fn fractional_positions_render_trimmed() {
        let stops = vec![ColorStop::new(0.125, Rgba::RED)];
        assert_eq!(
            css_string(&stops, GradientKind::Linear),
            "linear-gradient(180deg, rgba(255, 0, 0, 1) 12.5%)"
        );
    }

    #[test]
    fn default_stops_fade_red_out() {
        let stops = default_stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].value, Rgba::RED);
        assert_eq!(stops[1].value.a, 0.0);
    }
}
