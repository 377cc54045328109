use bevy::color::palettes::tailwind;
use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Corner radius
// ---------------------------------------------------------------------------

pub const CORNER_RADIUS: Val = Val::Px(2.0);
pub const CORNER_RADIUS_LG: Val = Val::Px(4.0);

// ---------------------------------------------------------------------------
// Primary / accent colors
// ---------------------------------------------------------------------------

pub const PRIMARY_COLOR: Srgba = tailwind::BLUE_500;

// ---------------------------------------------------------------------------
// Backgrounds & borders (Tailwind Zinc dark palette)
// ---------------------------------------------------------------------------

/// General widget background
pub const BACKGROUND_COLOR: Srgba = tailwind::ZINC_800;
/// Text input background
pub const INPUT_BG: Color = Color::Srgba(tailwind::ZINC_900);
/// Standard border color
pub const BORDER_COLOR: Srgba = tailwind::ZINC_700;

// ---------------------------------------------------------------------------
// Text colors
// ---------------------------------------------------------------------------

/// Body text color (widget standard)
pub const TEXT_BODY_COLOR: Srgba = tailwind::ZINC_200;
/// Display text color (bright)
pub const TEXT_DISPLAY_COLOR: Srgba = tailwind::ZINC_50;
/// Muted text color
pub const TEXT_MUTED_COLOR: Srgba = tailwind::ZINC_400;

// ---------------------------------------------------------------------------
// Text sizes
// ---------------------------------------------------------------------------

pub const TEXT_SIZE_SM: f32 = 10.0;
pub const TEXT_SIZE: f32 = 12.0;

// ---------------------------------------------------------------------------
// Picker geometry
// ---------------------------------------------------------------------------

/// Width of the picker popover and of inline picker content.
pub const PICKER_WIDTH: f32 = 256.0;
/// Height of the saturation/value surface.
pub const SURFACE_HEIGHT: f32 = 192.0;
/// Height of the hue/alpha slider tracks.
pub const SLIDER_HEIGHT: f32 = 12.0;
/// Diameter of the round drag handles.
pub const HANDLE_SIZE: f32 = 14.0;
pub const HANDLE_BORDER: f32 = 1.0;
/// Side of the square preview swatch beside the sliders.
pub const PREVIEW_SWATCH_SIZE: f32 = 36.0;
/// Side of the small swatch inside the trigger button.
pub const SWATCH_SIZE: f32 = 16.0;
/// Height of the gradient-stop track.
pub const GRADIENT_BAR_HEIGHT: f32 = 16.0;
/// Side of a gradient stop handle.
pub const STOP_HANDLE_SIZE: f32 = 16.0;
