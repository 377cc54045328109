//! CPU pixel-buffer renderers for the picker canvases.
//!
//! Each baker returns a tightly packed RGBA8 buffer; systems upload the
//! buffers into `Image` assets shown through `ImageNode`. Buffers are
//! re-baked whenever the backing value or the node's on-screen size changes.

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};

use tinct_color::{ColorStop, Hsva, Rgba, color_at};

/// Checkerboard shades, the classic transparency backdrop.
const CHECKER_LIGHT: [u8; 3] = [255, 255, 255];
const CHECKER_DARK: [u8; 3] = [238, 238, 238];

/// The fixed rainbow painted on the hue track.
const HUE_STOPS: [(f32, [u8; 3]); 7] = [
    (0.0, [255, 0, 0]),
    (0.15, [255, 255, 0]),
    (0.33, [0, 255, 0]),
    (0.49, [0, 255, 255]),
    (0.67, [0, 0, 255]),
    (0.84, [255, 0, 255]),
    (1.0, [255, 0, 0]),
];

/// Source-over blend of an RGB color at `alpha` onto `dst`.
fn over(dst: [u8; 3], src: [u8; 3], alpha: f32) -> [u8; 3] {
    let a = alpha.clamp(0.0, 1.0);
    let blend = |d: u8, s: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
    [
        blend(dst[0], src[0]),
        blend(dst[1], src[1]),
        blend(dst[2], src[2]),
    ]
}

fn axis(i: u32, len: u32) -> f32 {
    if len > 1 {
        i as f32 / (len - 1) as f32
    } else {
        0.0
    }
}

fn push(buffer: &mut Vec<u8>, rgb: [u8; 3]) {
    buffer.extend_from_slice(&rgb);
    buffer.push(255);
}

/// The saturation/value picking field for a hue: the pure hue fill under a
/// left-to-right white fade and a top-to-bottom black fade.
pub fn sv_surface_pixels(hue: f32, width: u32, height: u32) -> Vec<u8> {
    let base = Hsva::new(hue, 100.0, 100.0, 1.0).to_rgba();
    let base = [base.r, base.g, base.b];

    let mut buffer = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let black_alpha = axis(y, height);
        for x in 0..width {
            let white_alpha = 1.0 - axis(x, width);
            let mut rgb = over(base, [255, 255, 255], white_alpha);
            rgb = over(rgb, [0, 0, 0], black_alpha);
            push(&mut buffer, rgb);
        }
    }
    buffer
}

/// The fixed 7-stop hue rainbow, horizontal.
pub fn hue_strip_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut row = Vec::with_capacity((width * 4) as usize);
    for x in 0..width {
        let t = axis(x, width);
        push(&mut row, hue_rainbow_at(t));
    }

    let mut buffer = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        buffer.extend_from_slice(&row);
    }
    buffer
}

fn hue_rainbow_at(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    for pair in HUE_STOPS.windows(2) {
        let (left_t, left) = pair[0];
        let (right_t, right) = pair[1];
        if t <= right_t {
            let span = right_t - left_t;
            let local = if span > 0.0 { (t - left_t) / span } else { 0.0 };
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * local).round() as u8;
            return [
                lerp(left[0], right[0]),
                lerp(left[1], right[1]),
                lerp(left[2], right[2]),
            ];
        }
    }
    HUE_STOPS[HUE_STOPS.len() - 1].1
}

/// Plain checkerboard of the two backdrop shades.
pub fn checkerboard_pixels(width: u32, height: u32, tile: u32) -> Vec<u8> {
    let tile = tile.max(1);
    let mut buffer = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let rgb = if (x / tile + y / tile) % 2 == 0 {
                CHECKER_LIGHT
            } else {
                CHECKER_DARK
            };
            push(&mut buffer, rgb);
        }
    }
    buffer
}

/// Tile size used for a strip's checkerboard: a third of its height.
pub fn checker_tile_for_height(height: u32) -> u32 {
    ((height as f32 / 3.0).round() as u32).max(1)
}

/// The alpha track: checkerboard under a transparent-to-opaque ramp of the
/// color's RGB. The ramp always spans the full 0..=1 range.
pub fn alpha_strip_pixels(color: Rgba, width: u32, height: u32) -> Vec<u8> {
    let tile = checker_tile_for_height(height);
    let rgb = [color.r, color.g, color.b];

    let mut buffer = checkerboard_pixels(width, height, tile);
    for y in 0..height {
        for x in 0..width {
            let alpha = axis(x, width);
            let index = ((y * width + x) * 4) as usize;
            let dst = [buffer[index], buffer[index + 1], buffer[index + 2]];
            let blended = over(dst, rgb, alpha);
            buffer[index..index + 3].copy_from_slice(&blended);
        }
    }
    buffer
}

/// The gradient editor's bar: checkerboard under the stop gradient.
pub fn gradient_bar_pixels(stops: &[ColorStop], width: u32, height: u32) -> Vec<u8> {
    let tile = ((height as f32 / 4.0).round() as u32).max(1);

    let mut buffer = checkerboard_pixels(width, height, tile);
    for x in 0..width {
        let sample = color_at(stops, axis(x, width));
        let rgb = [sample.r, sample.g, sample.b];
        for y in 0..height {
            let index = ((y * width + x) * 4) as usize;
            let dst = [buffer[index], buffer[index + 1], buffer[index + 2]];
            let blended = over(dst, rgb, sample.a);
            buffer[index..index + 3].copy_from_slice(&blended);
        }
    }
    buffer
}

/// A square swatch: the color composited over a checkerboard.
pub fn swatch_pixels(color: Rgba, size: u32, tile: u32) -> Vec<u8> {
    let rgb = [color.r, color.g, color.b];
    let mut buffer = checkerboard_pixels(size, size, tile);
    for index in (0..buffer.len()).step_by(4) {
        let dst = [buffer[index], buffer[index + 1], buffer[index + 2]];
        let blended = over(dst, rgb, color.a);
        buffer[index..index + 3].copy_from_slice(&blended);
    }
    buffer
}

/// A gradient stop's swatch: left half forced opaque, right half at the
/// stop's real alpha over a checkerboard, so transparency reads at a glance.
pub fn stop_swatch_pixels(color: Rgba, size: u32, tile: u32) -> Vec<u8> {
    let rgb = [color.r, color.g, color.b];
    let mut buffer = checkerboard_pixels(size, size, tile);
    for y in 0..size {
        for x in 0..size {
            let alpha = if x < size / 2 { 1.0 } else { color.a };
            let index = ((y * size + x) * 4) as usize;
            let dst = [buffer[index], buffer[index + 1], buffer[index + 2]];
            let blended = over(dst, rgb, alpha);
            buffer[index..index + 3].copy_from_slice(&blended);
        }
    }
    buffer
}

/// Wrap a baked buffer in an `Image` ready for `ImageNode`.
pub fn make_ui_image(width: u32, height: u32, data: Vec<u8>) -> Image {
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        default(),
    );
    image.texture_descriptor.usage = TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST;
    image
}

/// Stand-in until the node has been laid out and the real bake can run.
pub fn placeholder_image() -> Image {
    make_ui_image(1, 1, vec![255, 255, 255, 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 3] {
        let index = ((y * width + x) * 4) as usize;
        [buffer[index], buffer[index + 1], buffer[index + 2]]
    }

    #[test]
    fn surface_corners() {
        let (w, h) = (64, 48);
        let buffer = sv_surface_pixels(0.0, w, h);
        assert_eq!(buffer.len(), (w * h * 4) as usize);

        // Top-left is white, top-right the pure hue, the bottom row black.
        assert_eq!(pixel(&buffer, w, 0, 0), [255, 255, 255]);
        assert_eq!(pixel(&buffer, w, w - 1, 0), [255, 0, 0]);
        assert_eq!(pixel(&buffer, w, 0, h - 1), [0, 0, 0]);
        assert_eq!(pixel(&buffer, w, w - 1, h - 1), [0, 0, 0]);
    }

    #[test]
    fn surface_tracks_hue() {
        let buffer = sv_surface_pixels(120.0, 8, 8);
        assert_eq!(pixel(&buffer, 8, 7, 0), [0, 255, 0]);
    }

    #[test]
    fn hue_strip_ends_are_red() {
        let w = 360;
        let buffer = hue_strip_pixels(w, 2);
        assert_eq!(pixel(&buffer, w, 0, 0), [255, 0, 0]);
        assert_eq!(pixel(&buffer, w, w - 1, 0), [255, 0, 0]);
        assert_eq!(pixel(&buffer, w, 0, 1), pixel(&buffer, w, 0, 0));
    }

    #[test]
    fn hue_strip_hits_named_stops() {
        assert_eq!(hue_rainbow_at(0.15), [255, 255, 0]);
        assert_eq!(hue_rainbow_at(0.33), [0, 255, 0]);
        assert_eq!(hue_rainbow_at(0.67), [0, 0, 255]);
    }

    #[test]
    fn checkerboard_alternates_by_tile() {
        let buffer = checkerboard_pixels(8, 8, 2);
        assert_eq!(pixel(&buffer, 8, 0, 0), CHECKER_LIGHT);
        assert_eq!(pixel(&buffer, 8, 2, 0), CHECKER_DARK);
        assert_eq!(pixel(&buffer, 8, 2, 2), CHECKER_LIGHT);
        assert_eq!(pixel(&buffer, 8, 1, 1), CHECKER_LIGHT);
    }

    #[test]
    fn checker_tile_is_a_third_of_height() {
        assert_eq!(checker_tile_for_height(12), 4);
        assert_eq!(checker_tile_for_height(16), 5);
        assert_eq!(checker_tile_for_height(1), 1);
    }

    #[test]
    fn alpha_strip_ramps_left_to_right() {
        let (w, h) = (32, 6);
        let buffer = alpha_strip_pixels(Rgba::RED, w, h);
        // Leftmost column is bare checkerboard, rightmost the full color.
        assert_eq!(pixel(&buffer, w, 0, 0), CHECKER_LIGHT);
        assert_eq!(pixel(&buffer, w, w - 1, 0), [255, 0, 0]);
    }

    #[test]
    fn gradient_bar_fades_with_stop_alpha() {
        let stops = tinct_color::default_stops();
        let (w, h) = (32, 8);
        let buffer = gradient_bar_pixels(&stops, w, h);
        // Opaque red on the left; transparent on the right leaves backdrop.
        assert_eq!(pixel(&buffer, w, 0, 0), [255, 0, 0]);
        let right = pixel(&buffer, w, w - 1, 0);
        assert!(right == CHECKER_LIGHT || right == CHECKER_DARK);
    }

    #[test]
    fn stop_swatch_splits_halves() {
        let buffer = stop_swatch_pixels(Rgba::RED.with_alpha(0.0), 8, 2);
        // Left half is forced opaque; the transparent right half shows the
        // checkerboard.
        assert_eq!(pixel(&buffer, 8, 0, 0), [255, 0, 0]);
        assert_eq!(pixel(&buffer, 8, 4, 0), CHECKER_LIGHT);
    }

    #[test]
    fn swatch_composites_alpha() {
        let opaque = swatch_pixels(Rgba::RED, 4, 2);
        assert_eq!(pixel(&opaque, 4, 0, 0), [255, 0, 0]);

        let transparent = swatch_pixels(Rgba::RED.with_alpha(0.0), 4, 2);
        assert_eq!(pixel(&transparent, 4, 0, 0), CHECKER_LIGHT);
    }
}
