use bevy::prelude::*;

use super::mappers::handle_offset;
use super::{
    AlphaHandle, AlphaHandleImage, AlphaSlider, AlphaStripImage, ColorPickerState, HueHandle,
    HueSlider, HueStripImage, PreviewSwatchImage, SvHandle, SvSurface, SvSurfaceImage,
    TriggerLabel, TriggerSwatchImage,
};
use crate::render;
use crate::tokens::{HANDLE_BORDER, HANDLE_SIZE, PREVIEW_SWATCH_SIZE, SWATCH_SIZE};

/// Re-bake canvas buffers whose inputs (hue, color, on-screen size) moved.
///
/// Buffers bake at the node's physical pixel size, re-synchronized before
/// every bake, so the canvases stay crisp across scale factors and layout
/// changes.
pub(super) fn update_canvas_images(
    mut images: ResMut<Assets<Image>>,
    pickers: Query<&ColorPickerState>,
    mut sv_images: Query<(&mut SvSurfaceImage, &ImageNode, &ComputedNode)>,
    mut hue_images: Query<
        (&mut HueStripImage, &ImageNode, &ComputedNode),
        Without<SvSurfaceImage>,
    >,
    mut alpha_images: Query<
        (&mut AlphaStripImage, &ImageNode, &ComputedNode),
        (Without<SvSurfaceImage>, Without<HueStripImage>),
    >,
) {
    for (mut marker, image_node, computed) in &mut sv_images {
        let Ok(state) = pickers.get(marker.picker) else {
            continue;
        };
        let size = physical_size(computed);
        if size.x == 0 || size.y == 0 {
            continue;
        }

        let hue = state.hsva().h;
        if marker.baked_hue == Some(hue) && marker.baked_size == size {
            continue;
        }

        if let Some(image) = images.get_mut(&image_node.image) {
            *image =
                render::make_ui_image(size.x, size.y, render::sv_surface_pixels(hue, size.x, size.y));
            marker.baked_hue = Some(hue);
            marker.baked_size = size;
        }
    }

    for (mut marker, image_node, computed) in &mut hue_images {
        let size = physical_size(computed);
        if size.x == 0 || size.y == 0 || marker.baked_size == size {
            continue;
        }

        if let Some(image) = images.get_mut(&image_node.image) {
            *image =
                render::make_ui_image(size.x, size.y, render::hue_strip_pixels(size.x, size.y));
            marker.baked_size = size;
        }
    }

    for (mut marker, image_node, computed) in &mut alpha_images {
        let Ok(state) = pickers.get(marker.picker) else {
            continue;
        };
        let size = physical_size(computed);
        if size.x == 0 || size.y == 0 {
            continue;
        }

        let color = state.rgba();
        let rgb = [color.r, color.g, color.b];
        if marker.baked_rgb == Some(rgb) && marker.baked_size == size {
            continue;
        }

        if let Some(image) = images.get_mut(&image_node.image) {
            *image = render::make_ui_image(
                size.x,
                size.y,
                render::alpha_strip_pixels(color.opaque(), size.x, size.y),
            );
            marker.baked_rgb = Some(rgb);
            marker.baked_size = size;
        }
    }
}

fn physical_size(computed: &ComputedNode) -> UVec2 {
    computed.size().as_uvec2()
}

/// Reposition and recolor the three handles from the shared state. Handle
/// positions are projections of the color, never stored themselves.
pub(super) fn update_handles(
    changed_pickers: Query<Entity, Changed<ColorPickerState>>,
    all_pickers: Query<&ColorPickerState>,
    mut sv_handles: Query<
        (&SvHandle, &mut Node, &mut BackgroundColor),
        (Without<HueHandle>, Without<AlphaHandle>),
    >,
    mut hue_handles: Query<
        (&HueHandle, &mut Node, &mut BackgroundColor),
        (Without<SvHandle>, Without<AlphaHandle>),
    >,
    mut alpha_handles: Query<(&AlphaHandle, &mut Node), (Without<SvHandle>, Without<HueHandle>)>,
    resized_surfaces: Query<(&SvSurface, &ComputedNode), Changed<ComputedNode>>,
    all_surfaces: Query<(&SvSurface, &ComputedNode)>,
    hue_tracks: Query<(&HueSlider, &ComputedNode)>,
    alpha_tracks: Query<(&AlphaSlider, &ComputedNode)>,
) {
    let mut needs_update = Vec::new();
    for entity in &changed_pickers {
        if let Ok(state) = all_pickers.get(entity) {
            needs_update.push((entity, state));
        }
    }
    for (surface, _) in &resized_surfaces {
        if !needs_update.iter().any(|(e, _)| *e == surface.0) {
            if let Ok(state) = all_pickers.get(surface.0) {
                needs_update.push((surface.0, state));
            }
        }
    }

    for (picker_entity, state) in needs_update {
        let hsva = state.hsva();
        let color = state.to_srgba();

        let surface_size = all_surfaces
            .iter()
            .find(|(s, _)| s.0 == picker_entity)
            .map(|(_, c)| c.size() * c.inverse_scale_factor());
        let hue_size = hue_tracks
            .iter()
            .find(|(s, _)| s.0 == picker_entity)
            .map(|(_, c)| c.size() * c.inverse_scale_factor());
        let alpha_size = alpha_tracks
            .iter()
            .find(|(s, _)| s.0 == picker_entity)
            .map(|(_, c)| c.size() * c.inverse_scale_factor());

        for (handle, mut node, mut bg) in &mut sv_handles {
            if handle.0 != picker_entity {
                continue;
            }
            if let Some(size) = surface_size {
                if size.x > 0.0 && size.y > 0.0 {
                    node.left = px(handle_offset(hsva.s / 100.0, size.x, HANDLE_SIZE));
                    node.top = px(handle_offset(1.0 - hsva.v / 100.0, size.y, HANDLE_SIZE));
                }
            }
            bg.0 = color.with_alpha(1.0).into();
        }

        for (handle, mut node, mut bg) in &mut hue_handles {
            if handle.0 != picker_entity {
                continue;
            }
            if let Some(size) = hue_size {
                if size.x > 0.0 {
                    node.left = px(handle_offset(hsva.h / 360.0, size.x, HANDLE_SIZE));
                }
            }
            let hue_color = tinct_color::Hsva::new(hsva.h, 100.0, 100.0, 1.0).to_rgba();
            bg.0 = Srgba::new(
                hue_color.r as f32 / 255.0,
                hue_color.g as f32 / 255.0,
                hue_color.b as f32 / 255.0,
                1.0,
            )
            .into();
        }

        for (handle, mut node) in &mut alpha_handles {
            if handle.0 != picker_entity {
                continue;
            }
            if let Some(size) = alpha_size {
                if size.x > 0.0 {
                    node.left = px(handle_offset(hsva.a, size.x, HANDLE_SIZE));
                }
            }
        }
    }
}

/// Keep the fixed-size swatches (preview, trigger, alpha handle) and the
/// trigger's hex label in step with the color.
pub(super) fn update_swatches(
    mut images: ResMut<Assets<Image>>,
    pickers: Query<&ColorPickerState>,
    mut previews: Query<(&mut PreviewSwatchImage, &ImageNode)>,
    mut trigger_swatches: Query<(&mut TriggerSwatchImage, &ImageNode), Without<PreviewSwatchImage>>,
    mut alpha_handle_images: Query<
        (&mut AlphaHandleImage, &ImageNode),
        (Without<PreviewSwatchImage>, Without<TriggerSwatchImage>),
    >,
    mut labels: Query<(&TriggerLabel, &mut Text)>,
) {
    for (mut marker, image_node) in &mut previews {
        let Ok(state) = pickers.get(marker.picker) else {
            continue;
        };
        let color = state.rgba();
        if marker.baked == Some(color) {
            continue;
        }
        let size = PREVIEW_SWATCH_SIZE as u32;
        if let Some(image) = images.get_mut(&image_node.image) {
            *image = render::make_ui_image(size, size, render::swatch_pixels(color, size, size / 3));
            marker.baked = Some(color);
        }
    }

    for (mut marker, image_node) in &mut trigger_swatches {
        let Ok(state) = pickers.get(marker.picker) else {
            continue;
        };
        let color = state.rgba();
        if marker.baked == Some(color) {
            continue;
        }
        let size = SWATCH_SIZE as u32;
        if let Some(image) = images.get_mut(&image_node.image) {
            *image = render::make_ui_image(size, size, render::swatch_pixels(color, size, size / 2));
            marker.baked = Some(color);
        }
    }

    let inner = (HANDLE_SIZE - HANDLE_BORDER * 2.0) as u32;
    for (mut marker, image_node) in &mut alpha_handle_images {
        let Ok(state) = pickers.get(marker.picker) else {
            continue;
        };
        let color = state.rgba();
        if marker.baked == Some(color) {
            continue;
        }
        if let Some(image) = images.get_mut(&image_node.image) {
            *image =
                render::make_ui_image(inner, inner, render::swatch_pixels(color, inner, inner / 3));
            marker.baked = Some(color);
        }
    }

    for (label, mut text) in &mut labels {
        let Ok(state) = pickers.get(label.0) else {
            continue;
        };
        let hex = state.to_hex().to_uppercase();
        if **text != hex {
            **text = hex;
        }
    }
}
