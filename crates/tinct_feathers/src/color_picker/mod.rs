mod controls;
mod input_fields;
pub mod mappers;
mod setup;
mod visuals;

use bevy::prelude::*;

use tinct_color::{
    ColorStop, GradientKind, Hsva, ParseColorError, Rgba, css_string, default_stops, parse,
    sorted_by_position,
};

use crate::popover::PopoverTracker;

pub fn plugin(app: &mut App) {
    app.add_observer(setup::handle_trigger_click)
        .add_observer(setup::handle_mode_click)
        .add_observer(setup::handle_gradient_kind_change)
        .add_observer(setup::handle_stop_edit_change)
        .add_observer(setup::handle_stop_edit_select)
        .add_observer(input_fields::handle_field_commit)
        .add_observer(input_fields::handle_format_change)
        .add_systems(
            Update,
            (
                setup::setup_color_picker,
                setup::setup_trigger_swatch,
                setup::setup_color_picker_content,
                sync_external_color,
                setup::sync_gradient_edit_from_picker,
                visuals::update_canvas_images,
                visuals::update_handles,
                visuals::update_swatches,
                input_fields::sync_text_inputs_to_state,
            ),
        );
}

/// Root marker for one picker instance.
#[derive(Component)]
pub struct TinctColorPicker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerMode {
    #[default]
    Solid,
    Gradient,
}

#[derive(Clone, Copy, Default, PartialEq)]
pub enum ColorInputFormat {
    #[default]
    Hex,
    Rgb,
    Hsv,
}

impl ColorInputFormat {
    pub(super) fn index(&self) -> usize {
        match self {
            Self::Hex => 0,
            Self::Rgb => 1,
            Self::Hsv => 2,
        }
    }

    pub(super) fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Rgb,
            2 => Self::Hsv,
            _ => Self::Hex,
        }
    }
}

/// The single source of truth every sibling widget of a picker reads from
/// and writes through. Mutation goes through `set_from_hsva`/`set_from_rgba`
/// only; the RGB view is always the exact conversion of the stored HSV.
#[derive(Component, Clone)]
pub struct ColorPickerState {
    hsva: Hsva,
    pub mode: PickerMode,
    pub gradient_kind: GradientKind,
    pub stops: Vec<ColorStop>,
    pub active_stop: usize,
    pub input_format: ColorInputFormat,
    last_external: Option<String>,
}

impl Default for ColorPickerState {
    fn default() -> Self {
        Self {
            hsva: Hsva::default(),
            mode: PickerMode::default(),
            gradient_kind: GradientKind::default(),
            stops: default_stops(),
            active_stop: 0,
            input_format: ColorInputFormat::default(),
            last_external: None,
        }
    }
}

impl ColorPickerState {
    pub fn from_rgba(rgba: Rgba) -> Self {
        Self {
            hsva: rgba.to_hsva().clamped(),
            ..default()
        }
    }

    pub fn hsva(&self) -> Hsva {
        self.hsva
    }

    pub fn rgba(&self) -> Rgba {
        self.hsva.to_rgba()
    }

    pub fn set_from_hsva(&mut self, hsva: Hsva) {
        self.hsva = hsva.clamped();
    }

    pub fn set_from_rgba(&mut self, rgba: Rgba) {
        self.hsva = rgba.to_hsva().clamped();
    }

    pub fn to_hex(&self) -> String {
        self.rgba().to_hex()
    }

    pub fn to_srgba(&self) -> Srgba {
        let [r, g, b, a] = self.rgba().to_f32_array();
        Srgba::new(r, g, b, a)
    }

    /// The stop with the lowest position, by sorted order (ties resolve to
    /// the earlier list entry). This is what solid mode snapshots.
    pub fn lowest_stop(&self) -> Option<ColorStop> {
        sorted_by_position(&self.stops).first().copied()
    }

    /// The CSS-style gradient string for the current stops and kind.
    pub fn gradient_css(&self) -> String {
        css_string(&self.stops, self.gradient_kind)
    }

    /// Adopt a host-supplied color string, once per distinct value.
    ///
    /// `Ok(true)` means the color was applied, `Ok(false)` that this exact
    /// string was already adopted (no-op), `Err` that it failed to parse
    /// (also a no-op; the previous color is retained either way).
    pub fn adopt_external(&mut self, color: &str) -> Result<bool, ParseColorError> {
        if self.last_external.as_deref() == Some(color) {
            return Ok(false);
        }
        self.last_external = Some(color.to_string());
        let rgba = parse(color)?;
        self.set_from_rgba(rgba);
        Ok(true)
    }
}

/// Host-supplied color string. Insert or mutate it to drive the picker
/// externally; each distinct value is applied exactly once and never
/// re-emitted through `ColorPickerChangeEvent`.
#[derive(Component, Clone, PartialEq)]
pub struct ExternalColor(pub String);

fn sync_external_color(
    mut pickers: Query<(&ExternalColor, &mut ColorPickerState), Changed<ExternalColor>>,
) {
    for (external, mut state) in &mut pickers {
        if state.last_external.as_deref() == Some(external.0.as_str()) {
            continue;
        }
        if let Err(err) = state.adopt_external(&external.0) {
            warn!("ignoring invalid external color {:?}: {err}", external.0);
        }
    }
}

// --- Host-facing events ---

/// Fired on every live color change (drags included).
#[derive(EntityEvent)]
pub struct ColorPickerChangeEvent {
    pub entity: Entity,
    pub color: Rgba,
}

/// Fired once when a gesture finishes (drag release, field commit), with
/// the final color. Consumers that must not run on every mouse-move listen
/// here instead of on the change event.
#[derive(EntityEvent)]
pub struct ColorPickerCommitEvent {
    pub entity: Entity,
    pub color: Rgba,
}

#[derive(EntityEvent)]
pub struct PickerModeChangeEvent {
    pub entity: Entity,
    pub mode: PickerMode,
}

#[derive(EntityEvent)]
pub struct GradientKindChangeEvent {
    pub entity: Entity,
    pub kind: GradientKind,
}

/// The full stop list after any stop add/move/remove/recolor.
#[derive(EntityEvent)]
pub struct GradientStopsChangeEvent {
    pub entity: Entity,
    pub stops: Vec<ColorStop>,
}

/// Apply a live color update: write through to the active gradient stop
/// when editing a gradient, then notify.
pub(super) fn emit_live_change(
    commands: &mut Commands,
    picker: Entity,
    state: &mut ColorPickerState,
) {
    let color = state.rgba();
    if state.mode == PickerMode::Gradient {
        let active = state.active_stop;
        if let Some(stop) = state.stops.get_mut(active) {
            stop.value = color;
        }
        commands.trigger(GradientStopsChangeEvent {
            entity: picker,
            stops: state.stops.clone(),
        });
    }
    commands.trigger(ColorPickerChangeEvent {
        entity: picker,
        color,
    });
}

pub(super) fn emit_commit(commands: &mut Commands, picker: Entity, state: &ColorPickerState) {
    commands.trigger(ColorPickerCommitEvent {
        entity: picker,
        color: state.rgba(),
    });
}

// --- Props ---

pub struct ColorPickerProps {
    /// Initial color in any supported string form. Defaults to opaque red;
    /// invalid strings are dropped with a warning.
    pub color: Option<String>,
    pub mode: PickerMode,
    pub gradient_kind: GradientKind,
    pub stops: Option<Vec<ColorStop>>,
    /// Spawn the content directly instead of behind a swatch trigger.
    pub inline: bool,
}

impl Default for ColorPickerProps {
    fn default() -> Self {
        Self {
            color: None,
            mode: PickerMode::Solid,
            gradient_kind: GradientKind::Linear,
            stops: None,
            inline: false,
        }
    }
}

impl ColorPickerProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_mode(mut self, mode: PickerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_gradient_kind(mut self, kind: GradientKind) -> Self {
        self.gradient_kind = kind;
        self
    }

    pub fn with_stops(mut self, stops: Vec<ColorStop>) -> Self {
        self.stops = Some(stops);
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }
}

pub fn color_picker(props: ColorPickerProps) -> impl Bundle {
    let ColorPickerProps {
        color,
        mode,
        gradient_kind,
        stops,
        inline,
    } = props;

    let mut state = ColorPickerState {
        mode,
        gradient_kind,
        ..default()
    };
    if let Some(stops) = stops {
        if !stops.is_empty() {
            state.stops = stops;
        }
    }
    if let Some(color) = color {
        if let Err(err) = state.adopt_external(&color) {
            warn!("ignoring invalid color prop {color:?}: {err}");
        }
    }

    (
        TinctColorPicker,
        state,
        ColorPickerConfig { inline },
        PopoverTracker::default(),
        Node {
            flex_direction: FlexDirection::Column,
            ..default()
        },
    )
}

// --- Internal marker components ---
//
// Every widget in the tree stores the picker entity it belongs to, set at
// construction: no global lookup, no structural sibling discovery, so
// several picker instances can coexist.

#[derive(Component)]
pub(super) struct ColorPickerConfig {
    pub(super) inline: bool,
}

#[derive(Component)]
pub(super) struct ColorPickerTrigger(pub(super) Entity);

#[derive(Component)]
pub(super) struct ColorPickerPopover(pub(super) Entity);

#[derive(Component)]
pub(super) struct ColorPickerContent(pub(super) Entity);

/// Rebuild request for a content entity whose children went stale
/// (mode switched).
#[derive(Component)]
pub(super) struct RebuildContent;

/// The saturation/value track.
#[derive(Component)]
pub(super) struct SvSurface(pub(super) Entity);

#[derive(Component)]
pub(super) struct SvHandle(pub(super) Entity);

#[derive(Component)]
pub(super) struct HueSlider(pub(super) Entity);

#[derive(Component)]
pub(super) struct HueHandle(pub(super) Entity);

#[derive(Component)]
pub(super) struct AlphaSlider(pub(super) Entity);

#[derive(Component)]
pub(super) struct AlphaHandle(pub(super) Entity);

/// Image nodes carry the picker entity plus what their buffer was last
/// baked from, so drags only re-bake when the inputs actually changed.
#[derive(Component)]
pub(super) struct SvSurfaceImage {
    pub(super) picker: Entity,
    pub(super) baked_hue: Option<f32>,
    pub(super) baked_size: UVec2,
}

#[derive(Component)]
pub(super) struct HueStripImage {
    pub(super) picker: Entity,
    pub(super) baked_size: UVec2,
}

#[derive(Component)]
pub(super) struct AlphaStripImage {
    pub(super) picker: Entity,
    pub(super) baked_rgb: Option<[u8; 3]>,
    pub(super) baked_size: UVec2,
}

#[derive(Component)]
pub(super) struct AlphaHandleImage {
    pub(super) picker: Entity,
    pub(super) baked: Option<Rgba>,
}

#[derive(Component)]
pub(super) struct PreviewSwatchImage {
    pub(super) picker: Entity,
    pub(super) baked: Option<Rgba>,
}

#[derive(Component)]
pub(super) struct TriggerSwatchImage {
    pub(super) picker: Entity,
    pub(super) baked: Option<Rgba>,
}

#[derive(Component)]
pub(super) struct TriggerSwatchConfig {
    pub(super) picker: Entity,
}

#[derive(Component)]
pub(super) struct TriggerLabel(pub(super) Entity);

#[derive(Component)]
pub(super) struct ColorInputRow(pub(super) Entity);

/// Wrapper around the input-format combobox.
#[derive(Component)]
pub(super) struct FormatSelect(pub(super) Entity);

/// Wrapper around the gradient-kind combobox.
#[derive(Component)]
pub(super) struct GradientKindSelect(pub(super) Entity);

/// Placed on the embedded gradient editor; links it to its picker.
#[derive(Component)]
pub(super) struct PickerGradientEdit(pub(super) Entity);

#[derive(Component)]
pub(super) struct ModeButton {
    pub(super) picker: Entity,
    pub(super) mode: PickerMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_keeps_views_consistent() {
        let mut state = ColorPickerState::default();
        assert_eq!(state.rgba(), Rgba::RED);

        state.set_from_hsva(Hsva::new(120.0, 100.0, 100.0, 0.5));
        assert_eq!(state.rgba(), Rgba::new(0, 255, 0, 0.5));

        state.set_from_rgba(Rgba::rgb(0, 0, 255));
        assert_eq!(state.hsva().h, 240.0);
        assert_eq!(state.rgba(), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn entry_points_clamp_and_are_idempotent() {
        let mut state = ColorPickerState::default();
        state.set_from_hsva(Hsva::new(999.0, 150.0, -10.0, 3.0));
        let first = state.hsva();
        assert_eq!(first, Hsva::new(360.0, 100.0, 0.0, 1.0));

        state.set_from_hsva(first);
        assert_eq!(state.hsva(), first);
    }

    #[test]
    fn lowest_stop_ignores_selection_and_order() {
        let mut state = ColorPickerState::default();
        state.stops = vec![
            ColorStop::new(0.9, Rgba::rgb(0, 0, 255)),
            ColorStop::new(0.2, Rgba::rgb(0, 255, 0)),
        ];
        state.active_stop = 0;
        assert_eq!(state.lowest_stop().unwrap().value, Rgba::rgb(0, 255, 0));
    }

    #[test]
    fn gradient_css_follows_kind() {
        let mut state = ColorPickerState::default();
        state.gradient_kind = GradientKind::Radial;
        assert!(state.gradient_css().starts_with("radial-gradient(50% 50% at 50% 50%,"));
    }

    #[test]
    fn external_color_applies_once_per_distinct_value() {
        let mut state = ColorPickerState::default();

        assert_eq!(state.adopt_external("rgba(0, 0, 255, 1)"), Ok(true));
        assert_eq!(state.rgba(), Rgba::rgb(0, 0, 255));

        // Same string again: no re-apply, local edits survive.
        state.set_from_hsva(Hsva::new(120.0, 100.0, 100.0, 1.0));
        assert_eq!(state.adopt_external("rgba(0, 0, 255, 1)"), Ok(false));
        assert_eq!(state.rgba(), Rgba::rgb(0, 255, 0));

        // A distinct value applies again.
        assert_eq!(state.adopt_external("#ff0000"), Ok(true));
        assert_eq!(state.rgba(), Rgba::RED);
    }

    #[test]
    fn invalid_external_color_is_dropped() {
        let mut state = ColorPickerState::default();
        assert!(state.adopt_external("definitely not a color").is_err());
        assert_eq!(state.rgba(), Rgba::RED);
        // The bad string is still cached: it is not retried every frame.
        assert!(state.last_external.is_some());
    }
}
