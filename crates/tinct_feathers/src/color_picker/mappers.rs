//! Pointer-to-value mappers.
//!
//! Pure functions translating a cursor position normalized within a track
//! (components in `[-0.5, 0.5]`, as produced by
//! `ComputedNode::normalize_point`) into axis values, and back into handle
//! offsets for rendering. They never touch picker state.

use bevy::prelude::*;

use tinct_color::clamp01;

/// 2D surface mapper: saturation grows left to right, value top to bottom
/// (inverted), both in `[0, 100]`.
pub fn saturation_value_at(normalized: Vec2) -> (f32, f32) {
    let s = clamp01(normalized.x + 0.5) * 100.0;
    let v = 100.0 - clamp01(normalized.y + 0.5) * 100.0;
    (s, v)
}

/// 1D hue mapper, rounded to whole degrees. The track's right edge maps to
/// 360, which renders identically to 0.
pub fn hue_at(normalized_x: f32) -> f32 {
    (clamp01(normalized_x + 0.5) * 360.0).round()
}

/// 1D alpha mapper, rounded to two decimals.
pub fn alpha_at(normalized_x: f32) -> f32 {
    (clamp01(normalized_x + 0.5) * 100.0).round() / 100.0
}

/// 1D gradient-stop position mapper.
pub fn position_at(normalized_x: f32) -> f32 {
    clamp01(normalized_x + 0.5)
}

/// Inverse direction: the pixel offset that puts the *center* of a handle
/// of `handle_size` on `value` along a track of `track_len`, clamped so the
/// handle never overflows the track.
pub fn handle_offset(value: f32, track_len: f32, handle_size: f32) -> f32 {
    let offset = clamp01(value) * track_len - handle_size / 2.0;
    offset.clamp(0.0, (track_len - handle_size).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_corners_map_to_sv_extremes() {
        assert_eq!(saturation_value_at(Vec2::new(-0.5, -0.5)), (0.0, 100.0));
        assert_eq!(saturation_value_at(Vec2::new(0.5, -0.5)), (100.0, 100.0));
        assert_eq!(saturation_value_at(Vec2::new(-0.5, 0.5)), (0.0, 0.0));
        assert_eq!(saturation_value_at(Vec2::new(0.0, 0.0)), (50.0, 50.0));
    }

    #[test]
    fn overshoot_is_clamped() {
        // A drag far past the track edge pins the value to the boundary.
        assert_eq!(saturation_value_at(Vec2::new(4.0, -7.0)), (100.0, 100.0));
        assert_eq!(hue_at(2.5), 360.0);
        assert_eq!(alpha_at(-3.0), 0.0);
        assert_eq!(position_at(1.5), 1.0);
    }

    #[test]
    fn mapping_is_idempotent_at_the_edges() {
        // Clamping twice is the same as clamping once.
        let once = hue_at(0.75);
        let twice = hue_at((once / 360.0) - 0.5);
        assert_eq!(once, twice);
    }

    #[test]
    fn hue_right_edge_is_360() {
        assert_eq!(hue_at(0.5), 360.0);
        assert_eq!(hue_at(-0.5), 0.0);
    }

    #[test]
    fn hue_rounds_to_whole_degrees() {
        // 0.1004 of a 360 track is 36.144 degrees.
        assert_eq!(hue_at(-0.5 + 0.1004), 36.0);
    }

    #[test]
    fn alpha_rounds_to_two_decimals() {
        assert_eq!(alpha_at(-0.5 + 0.3333), 0.33);
        assert_eq!(alpha_at(0.5), 1.0);
    }

    #[test]
    fn handle_center_lands_on_value() {
        assert_eq!(handle_offset(0.5, 100.0, 14.0), 43.0);
    }

    #[test]
    fn handle_never_overflows_track() {
        assert_eq!(handle_offset(0.0, 360.0, 14.0), 0.0);
        assert_eq!(handle_offset(1.0, 360.0, 14.0), 346.0);
        // Degenerate track smaller than the handle.
        assert_eq!(handle_offset(1.0, 8.0, 14.0), 0.0);
    }
}
