use bevy::input_focus::InputFocus;
use bevy::prelude::*;
use bevy_ui_text_input::TextInputQueue;

use tinct_color::parse;

use super::{
    ColorInputFormat, ColorInputRow, ColorPickerState, FormatSelect, emit_commit, emit_live_change,
};
use crate::combobox::{ComboBoxChangeEvent, combobox_with_selected};
use crate::text_edit::{
    TextEditCommitEvent, TextEditPrefix, TextEditProps, TinctTextEdit, set_text_input_value,
    text_edit,
};
use crate::tokens::{TEXT_MUTED_COLOR, TEXT_SIZE, TEXT_SIZE_SM};
use crate::utils::{find_ancestor, is_descendant_of};

#[derive(Clone, Copy)]
pub(super) enum InputFieldKind {
    Hex,
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Value,
    Alpha,
}

impl InputFieldKind {
    /// Apply a typed value onto the shared state. Returns false, leaving
    /// the state untouched, when the text does not parse.
    pub(super) fn parse_and_apply(&self, text: &str, state: &mut ColorPickerState) -> bool {
        match self {
            Self::Hex => {
                let Ok(rgba) = parse(text) else {
                    return false;
                };
                state.set_from_rgba(rgba);
                true
            }
            Self::Red | Self::Green | Self::Blue => {
                let Ok(typed) = text.parse::<i32>() else {
                    return false;
                };
                let channel = typed.clamp(0, 255) as u8;
                let mut rgba = state.rgba();
                match self {
                    Self::Red => rgba.r = channel,
                    Self::Green => rgba.g = channel,
                    Self::Blue => rgba.b = channel,
                    _ => unreachable!(),
                }
                state.set_from_rgba(rgba);
                true
            }
            Self::Hue => {
                let Ok(typed) = text.parse::<i32>() else {
                    return false;
                };
                let mut hsva = state.hsva();
                hsva.h = typed.clamp(0, 360) as f32;
                state.set_from_hsva(hsva);
                true
            }
            Self::Saturation | Self::Value | Self::Alpha => {
                let Ok(typed) = text.parse::<i32>() else {
                    return false;
                };
                let clamped = typed.clamp(0, 100) as f32;
                let mut hsva = state.hsva();
                match self {
                    Self::Saturation => hsva.s = clamped,
                    Self::Value => hsva.v = clamped,
                    Self::Alpha => hsva.a = clamped / 100.0,
                    _ => unreachable!(),
                }
                state.set_from_hsva(hsva);
                true
            }
        }
    }

    pub(super) fn format_value(&self, state: &ColorPickerState) -> String {
        let hsva = state.hsva();
        match self {
            Self::Hex => state.to_hex().to_uppercase(),
            Self::Red => state.rgba().r.to_string(),
            Self::Green => state.rgba().g.to_string(),
            Self::Blue => state.rgba().b.to_string(),
            Self::Hue => (hsva.h.round() as i32).to_string(),
            Self::Saturation => (hsva.s.round() as i32).to_string(),
            Self::Value => (hsva.v.round() as i32).to_string(),
            Self::Alpha => ((hsva.a * 100.0).round() as i32).to_string(),
        }
    }
}

#[derive(Component)]
pub(super) struct ColorInputField {
    pub(super) picker: Entity,
    pub(super) kind: InputFieldKind,
}

struct InputFieldConfig {
    kind: InputFieldKind,
    label: &'static str,
    max: f64,
}

pub(super) fn spawn_input_fields(
    parent: &mut ChildSpawnerCommands,
    picker_entity: Entity,
    format: ColorInputFormat,
    state: &ColorPickerState,
) {
    let fields: &[InputFieldConfig] = match format {
        ColorInputFormat::Hex => &[InputFieldConfig {
            kind: InputFieldKind::Hex,
            label: "Hex",
            max: 0.0,
        }],
        ColorInputFormat::Rgb => &[
            InputFieldConfig {
                kind: InputFieldKind::Red,
                label: "R",
                max: 255.0,
            },
            InputFieldConfig {
                kind: InputFieldKind::Green,
                label: "G",
                max: 255.0,
            },
            InputFieldConfig {
                kind: InputFieldKind::Blue,
                label: "B",
                max: 255.0,
            },
        ],
        ColorInputFormat::Hsv => &[
            InputFieldConfig {
                kind: InputFieldKind::Hue,
                label: "H",
                max: 360.0,
            },
            InputFieldConfig {
                kind: InputFieldKind::Saturation,
                label: "S",
                max: 100.0,
            },
            InputFieldConfig {
                kind: InputFieldKind::Value,
                label: "V",
                max: 100.0,
            },
        ],
    };

    for config in fields {
        spawn_single_input_field(parent, picker_entity, config, state, false);
    }

    // Alpha is always present, whatever the format.
    spawn_single_input_field(
        parent,
        picker_entity,
        &InputFieldConfig {
            kind: InputFieldKind::Alpha,
            label: "A",
            max: 100.0,
        },
        state,
        true,
    );

    // Format selector.
    parent
        .spawn((
            FormatSelect(picker_entity),
            Node {
                width: px(64.0),
                flex_shrink: 0.0,
                ..default()
            },
        ))
        .with_child(combobox_with_selected(
            vec!["Hex", "RGB", "HSB"],
            format.index(),
        ));
}

fn spawn_single_input_field(
    parent: &mut ChildSpawnerCommands,
    picker_entity: Entity,
    config: &InputFieldConfig,
    state: &ColorPickerState,
    fixed_width: bool,
) {
    let value = config.kind.format_value(state);
    let is_hex = matches!(config.kind, InputFieldKind::Hex);
    let is_alpha = matches!(config.kind, InputFieldKind::Alpha);

    let mut props = TextEditProps::default().with_default_value(value);

    if is_hex {
        props = props.with_prefix(TextEditPrefix::Label {
            label: "#".to_string(),
            size: TEXT_SIZE,
        });
    } else {
        props = props.numeric_i32().with_min(0.0).with_max(config.max);
    }
    if is_alpha {
        props = props.with_suffix("%");
    }

    let mut column_node = Node {
        flex_direction: FlexDirection::Column,
        row_gap: px(6.0),
        flex_grow: if fixed_width { 0.0 } else { 1.0 },
        flex_shrink: 1.0,
        flex_basis: px(0),
        ..default()
    };

    if fixed_width {
        column_node.width = px(48.0);
        column_node.flex_basis = Val::Auto;
    }

    parent
        .spawn((
            ColorInputField {
                picker: picker_entity,
                kind: config.kind,
            },
            column_node,
        ))
        .with_children(|col| {
            col.spawn(text_edit(props));
            col.spawn((
                Text::new(config.label),
                TextFont {
                    font_size: TEXT_SIZE_SM,
                    ..default()
                },
                TextColor(TEXT_MUTED_COLOR.into()),
                Node {
                    align_self: AlignSelf::Center,
                    ..default()
                },
            ));
        });
}

/// A field losing focus commits its text: parse, apply, notify. Text that
/// does not parse leaves the state untouched; the resync system then snaps
/// the field back to the last valid value.
pub(super) fn handle_field_commit(
    trigger: On<TextEditCommitEvent>,
    mut commands: Commands,
    input_fields: Query<&ColorInputField>,
    mut pickers: Query<&mut ColorPickerState>,
    parents: Query<&ChildOf>,
) {
    let Some((_, field)) = find_ancestor(trigger.entity, &input_fields, &parents) else {
        return;
    };

    let Ok(mut state) = pickers.get_mut(field.picker) else {
        return;
    };

    if trigger.text.is_empty() {
        return;
    }

    if field.kind.parse_and_apply(&trigger.text, &mut state) {
        emit_live_change(&mut commands, field.picker, &mut state);
        emit_commit(&mut commands, field.picker, &state);
    }
}

/// Unfocused fields follow the state so canvas drags keep the numbers
/// live; the focused field is left alone so typing is never clobbered.
pub(super) fn sync_text_inputs_to_state(
    input_focus: Res<InputFocus>,
    pickers: Query<(Entity, &ColorPickerState), Changed<ColorPickerState>>,
    input_fields: Query<(Entity, &ColorInputField)>,
    mut text_inputs: Query<(Entity, &mut TextInputQueue), With<TinctTextEdit>>,
    parents: Query<&ChildOf>,
) {
    for (picker_entity, state) in &pickers {
        for (field_entity, field) in &input_fields {
            if field.picker != picker_entity {
                continue;
            }

            let text = field.kind.format_value(state);

            for (text_input_entity, mut queue) in &mut text_inputs {
                if input_focus.0 == Some(text_input_entity) {
                    continue;
                }

                if is_descendant_of(text_input_entity, field_entity, &parents) {
                    set_text_input_value(&mut queue, text.clone());
                }
            }
        }
    }
}

/// Switching the format rebuilds the field row in place.
pub(super) fn handle_format_change(
    trigger: On<ComboBoxChangeEvent>,
    mut commands: Commands,
    format_selects: Query<&FormatSelect>,
    mut pickers: Query<&mut ColorPickerState>,
    input_rows: Query<(Entity, &ColorInputRow, &Children)>,
    parents: Query<&ChildOf>,
) {
    let Some((_, select)) = find_ancestor(trigger.entity, &format_selects, &parents) else {
        return;
    };

    let new_format = ColorInputFormat::from_index(trigger.selected);
    let picker_entity = select.0;

    let Ok(mut state) = pickers.get_mut(picker_entity) else {
        return;
    };

    if state.input_format == new_format {
        return;
    }

    state.input_format = new_format;

    for (row_entity, row, children) in &input_rows {
        if row.0 != picker_entity {
            continue;
        }

        for child in children.iter() {
            commands.entity(child).try_despawn();
        }

        let state = state.clone();
        commands.entity(row_entity).with_children(|parent| {
            spawn_input_fields(parent, picker_entity, new_format, &state);
        });

        break;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinct_color::Rgba;

    #[test]
    fn hex_field_round_trips() {
        let mut state = ColorPickerState::default();
        assert!(InputFieldKind::Hex.parse_and_apply("469be9", &mut state));
        assert_eq!(state.rgba(), Rgba::rgb(70, 155, 233));
        assert_eq!(InputFieldKind::Hex.format_value(&state), "469BE9");
    }

    #[test]
    fn invalid_text_is_a_no_op() {
        let mut state = ColorPickerState::default();
        let before = state.rgba();

        assert!(!InputFieldKind::Hex.parse_and_apply("zzz", &mut state));
        assert!(!InputFieldKind::Red.parse_and_apply("12.7", &mut state));
        assert!(!InputFieldKind::Alpha.parse_and_apply("", &mut state));
        assert_eq!(state.rgba(), before);
    }

    #[test]
    fn channel_fields_clamp_typed_values() {
        let mut state = ColorPickerState::default();

        assert!(InputFieldKind::Green.parse_and_apply("999", &mut state));
        assert_eq!(state.rgba().g, 255);

        assert!(InputFieldKind::Hue.parse_and_apply("-20", &mut state));
        assert_eq!(state.hsva().h, 0.0);

        assert!(InputFieldKind::Alpha.parse_and_apply("150", &mut state));
        assert_eq!(state.hsva().a, 1.0);
    }

    #[test]
    fn alpha_field_shows_percent() {
        let mut state = ColorPickerState::default();
        let mut hsva = state.hsva();
        hsva.a = 0.25;
        state.set_from_hsva(hsva);
        assert_eq!(InputFieldKind::Alpha.format_value(&state), "25");
    }
}
