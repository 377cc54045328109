//! End-to-end coverage of the public color pipeline: string in, state math,
//! stop interpolation, gradient string out.

use tinct_color::{
    ColorStop, GradientKind, Hsva, Rgba, color_at, css_string, default_stops, find_range, parse,
};

#[test]
fn picker_seed_from_rgba_string() {
    // A picker constructed with `rgba(255, 0, 0, 1)` starts at pure red.
    let color = parse("rgba(255, 0, 0, 1)").unwrap();
    let hsva = color.to_hsva();
    assert_eq!(hsva.h, 0.0);
    assert_eq!(hsva.s, 100.0);
    assert_eq!(hsva.v, 100.0);
    assert_eq!(hsva.a, 1.0);
}

#[test]
fn hue_track_right_edge_wraps() {
    // The rightmost pixel of a hue track maps to 360 pre-clamp; the clamped
    // value must render the same color as hue 0.
    let at_edge = Hsva::new(360.0, 100.0, 100.0, 1.0).clamped();
    assert_eq!(at_edge.h, 360.0);
    assert_eq!(at_edge.to_rgba(), Hsva::new(0.0, 100.0, 100.0, 1.0).to_rgba());
}

#[test]
fn new_stop_interpolates_between_neighbors() {
    // Clicking the gradient track at 0.5 between opaque red and transparent
    // red produces a half-transparent red stop.
    let stops = default_stops();
    let (before, after) = find_range(&stops, 0.5).expect("stops bound the click");
    let fraction = (0.5 - before.position) / (after.position - before.position);
    let value = before.value.mix(after.value, fraction * 100.0);

    assert_eq!((value.r, value.g, value.b), (255, 0, 0));
    assert!((value.a - 0.5).abs() < 1e-6);
}

#[test]
fn solid_snapshot_uses_lowest_position_stop() {
    // Switching gradient -> solid adopts the lowest-position stop's color,
    // regardless of list order or selection.
    let stops = vec![
        ColorStop::new(0.8, Rgba::rgb(0, 0, 255)),
        ColorStop::new(0.1, Rgba::rgb(0, 255, 0)),
        ColorStop::new(0.5, Rgba::RED),
    ];
    let sorted = tinct_color::sorted_by_position(&stops);
    assert_eq!(sorted[0].value, Rgba::rgb(0, 255, 0));
}

#[test]
fn gradient_string_matches_stop_edits() {
    let mut stops = default_stops();

    // Drag the end stop inward and recolor it through a parsed string.
    stops[1].position = 0.75;
    stops[1].value = parse("#0000ff").unwrap().with_alpha(0.5);

    assert_eq!(
        css_string(&stops, GradientKind::Linear),
        "linear-gradient(180deg, rgba(255, 0, 0, 1) 0%, rgba(0, 0, 255, 0.5) 75%)"
    );

    // Sampling past the last stop clamps to its color.
    assert_eq!(color_at(&stops, 1.0), stops[1].value);
}

#[test]
fn parse_failure_is_inert() {
    // A failed parse yields an error value and nothing else; state built
    // from the previous color is untouched by the attempt.
    let previous = parse("#469be9").unwrap();
    let attempt = parse("rgba(nope)");
    assert!(attempt.is_err());
    assert_eq!(previous, parse("#469be9").unwrap());
}

#[test]
fn set_from_rgb_and_hsv_agree() {
    // The two state entry points agree on overlapping inputs.
    for (rgba, hsva) in [
        (Rgba::RED, Hsva::new(0.0, 100.0, 100.0, 1.0)),
        (Rgba::rgb(0, 255, 0), Hsva::new(120.0, 100.0, 100.0, 1.0)),
        (Rgba::new(0, 0, 255, 0.5), Hsva::new(240.0, 100.0, 100.0, 0.5)),
    ] {
        assert_eq!(hsva.to_rgba(), rgba);
        let back = rgba.to_hsva();
        assert!((back.h - hsva.h).abs() < 0.5);
        assert!((back.s - hsva.s).abs() < 0.5);
        assert!((back.v - hsva.v).abs() < 0.5);
    }
}
