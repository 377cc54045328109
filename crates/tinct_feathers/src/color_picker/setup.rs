use bevy::picking::prelude::Pickable;
use bevy::prelude::*;
use lucide_icons::Icon;

use tinct_color::GradientKind;

use super::controls::{
    on_control_drag, on_control_drag_end, on_control_drag_start, on_control_press,
    on_control_release,
};
use super::input_fields::spawn_input_fields;
use super::{
    AlphaHandle, AlphaHandleImage, AlphaSlider, AlphaStripImage, ColorInputRow,
    ColorPickerChangeEvent, ColorPickerConfig, ColorPickerContent, ColorPickerPopover,
    ColorPickerState, ColorPickerTrigger, GradientKindChangeEvent, GradientKindSelect,
    GradientStopsChangeEvent, HueHandle, HueSlider, HueStripImage, ModeButton, PickerGradientEdit,
    PickerMode, PickerModeChangeEvent, PreviewSwatchImage, RebuildContent, SvHandle, SvSurface,
    SvSurfaceImage, TinctColorPicker, TriggerLabel, TriggerSwatchConfig, TriggerSwatchImage,
};

use crate::button::{ButtonClickEvent, ButtonProps, ButtonSize, ButtonVariant, IconButtonProps, button, icon_button};
use crate::combobox::{ComboBoxChangeEvent, combobox_with_selected};
use crate::gradient_edit::{
    GradientEditChangeEvent, GradientEditProps, GradientEditSelectEvent, GradientEditState,
    gradient_edit,
};
use crate::icons::{BodyFont, IconFont};
use crate::popover::{
    PopoverHeaderProps, PopoverPlacement, PopoverProps, PopoverTracker, activate_trigger,
    deactivate_trigger, popover, popover_content, popover_header,
};
use crate::render;
use crate::tokens::{
    CORNER_RADIUS, HANDLE_BORDER, HANDLE_SIZE, PICKER_WIDTH, PREVIEW_SWATCH_SIZE, SLIDER_HEIGHT,
    SURFACE_HEIGHT, SWATCH_SIZE,
};
use crate::utils::find_ancestor;

pub(super) fn handle_style(left: f32, top: f32, color: Option<Srgba>, size: f32) -> impl Bundle {
    (
        Pickable::IGNORE,
        Node {
            position_type: PositionType::Absolute,
            width: px(size),
            height: px(size),
            left: px(left),
            top: px(top),
            border: UiRect::all(px(HANDLE_BORDER)),
            border_radius: BorderRadius::all(px(size / 2.0)),
            ..default()
        },
        BackgroundColor(color.unwrap_or(Srgba::NONE).into()),
        BorderColor::all(Srgba::WHITE),
        Outline {
            width: px(1.0),
            color: Srgba::BLACK.into(),
            ..default()
        },
    )
}

fn slider_node() -> Node {
    Node {
        width: percent(100.0),
        height: px(SLIDER_HEIGHT),
        ..default()
    }
}

fn fullsize_absolute_node() -> Node {
    Node {
        position_type: PositionType::Absolute,
        width: percent(100.0),
        height: percent(100.0),
        border_radius: BorderRadius::all(CORNER_RADIUS),
        overflow: Overflow::clip(),
        ..default()
    }
}

pub(super) fn setup_color_picker(
    mut commands: Commands,
    pickers: Query<(Entity, &ColorPickerConfig, &ColorPickerState), Added<TinctColorPicker>>,
) {
    for (entity, config, state) in &pickers {
        if config.inline {
            commands.entity(entity).with_child((
                ColorPickerContent(entity),
                Node {
                    flex_direction: FlexDirection::Column,
                    row_gap: px(12.0),
                    width: percent(100),
                    ..default()
                },
            ));
        } else {
            let hex = state.to_hex().to_uppercase();

            let trigger_entity = commands
                .spawn((
                    ColorPickerTrigger(entity),
                    button(ButtonProps::new(hex).align_left()),
                ))
                .id();

            commands.entity(entity).add_child(trigger_entity);

            commands
                .entity(trigger_entity)
                .insert(TriggerSwatchConfig { picker: entity });
        }
    }
}

pub(super) fn setup_trigger_swatch(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    triggers: Query<(Entity, &TriggerSwatchConfig, &Children)>,
    texts: Query<Entity, With<Text>>,
) {
    for (trigger_entity, config, children) in &triggers {
        commands
            .entity(trigger_entity)
            .remove::<TriggerSwatchConfig>();

        let swatch_image = images.add(render::placeholder_image());
        let picker = config.picker;

        let swatch_entity = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: px(6.0),
                    width: px(SWATCH_SIZE),
                    height: px(SWATCH_SIZE),
                    border_radius: BorderRadius::all(CORNER_RADIUS),
                    overflow: Overflow::clip(),
                    ..default()
                },
                children![(
                    TriggerSwatchImage {
                        picker,
                        baked: None,
                    },
                    Pickable::IGNORE,
                    ImageNode::new(swatch_image),
                    Node {
                        position_type: PositionType::Absolute,
                        width: percent(100),
                        height: percent(100),
                        ..default()
                    },
                )],
            ))
            .id();

        commands.entity(trigger_entity).add_child(swatch_entity);

        for child in children.iter() {
            if texts.get(child).is_ok() {
                commands.entity(child).insert((
                    TriggerLabel(picker),
                    Node {
                        margin: UiRect::left(px(SWATCH_SIZE + 6.0)),
                        ..default()
                    },
                ));
                break;
            }
        }
    }
}

pub(super) fn handle_trigger_click(
    trigger: On<ButtonClickEvent>,
    mut commands: Commands,
    body_font: Res<BodyFont>,
    icon_font: Res<IconFont>,
    triggers: Query<&ColorPickerTrigger>,
    mut trackers: Query<&mut PopoverTracker>,
    existing_popovers: Query<(Entity, &ColorPickerPopover)>,
    mut button_styles: Query<(&mut BackgroundColor, &mut BorderColor, &mut ButtonVariant)>,
) {
    let Ok(picker_trigger) = triggers.get(trigger.entity) else {
        return;
    };

    let picker_entity = picker_trigger.0;
    let Ok(mut tracker) = trackers.get_mut(picker_entity) else {
        return;
    };

    for (popover_entity, popover_ref) in &existing_popovers {
        if popover_ref.0 == picker_entity {
            commands.entity(popover_entity).try_despawn();
            tracker.popover = None;
            deactivate_trigger(trigger.entity, &mut button_styles);
            return;
        }
    }

    activate_trigger(trigger.entity, &mut button_styles);

    let popover_entity = commands
        .spawn((
            ColorPickerPopover(picker_entity),
            popover(
                PopoverProps::new(trigger.entity)
                    .with_placement(PopoverPlacement::RightStart)
                    .with_padding(0.0)
                    .with_z_index(150)
                    .with_node(Node {
                        width: px(PICKER_WIDTH),
                        ..default()
                    }),
            ),
        ))
        .id();

    tracker.open(popover_entity, trigger.entity);

    commands.entity(popover_entity).with_children(|parent| {
        parent.spawn(popover_header(
            PopoverHeaderProps::new("Color", popover_entity),
            &body_font.0,
            &icon_font.0,
        ));

        parent.spawn((ColorPickerContent(picker_entity), popover_content()));
    });
}

pub(super) fn setup_color_picker_content(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    icon_font: Res<IconFont>,
    states: Query<&ColorPickerState>,
    contents: Query<
        (Entity, &ColorPickerContent),
        Or<(Added<ColorPickerContent>, With<RebuildContent>)>,
    >,
) {
    for (content_entity, content) in &contents {
        let picker_entity = content.0;
        let Ok(state) = states.get(picker_entity) else {
            continue;
        };

        commands.entity(content_entity).remove::<RebuildContent>();

        let current_color = state.to_srgba();
        let hue_color = tinct_color::Hsva::new(state.hsva().h, 100.0, 100.0, 1.0).to_rgba();
        let hue_srgba = Srgba::new(
            hue_color.r as f32 / 255.0,
            hue_color.g as f32 / 255.0,
            hue_color.b as f32 / 255.0,
            1.0,
        );

        let surface_image = images.add(render::placeholder_image());
        let hue_image = images.add(render::placeholder_image());
        let alpha_image = images.add(render::placeholder_image());
        let alpha_handle_image = images.add(render::placeholder_image());
        let preview_image = images.add(render::placeholder_image());

        commands.entity(content_entity).with_children(|parent| {
            // Solid / gradient mode toggle
            parent
                .spawn(Node {
                    column_gap: px(4.0),
                    ..default()
                })
                .with_children(|row| {
                    for (mode, glyph) in [
                        (PickerMode::Solid, Icon::Square),
                        (PickerMode::Gradient, Icon::Blend),
                    ] {
                        let variant = if state.mode == mode {
                            ButtonVariant::Active
                        } else {
                            ButtonVariant::Ghost
                        };
                        row.spawn((
                            ModeButton {
                                picker: picker_entity,
                                mode,
                            },
                            icon_button(
                                IconButtonProps::new(glyph)
                                    .variant(variant)
                                    .with_size(ButtonSize::IconSM),
                                &icon_font.0,
                            ),
                        ));
                    }
                });

            // Gradient section, only while editing a gradient
            if state.mode == PickerMode::Gradient {
                parent
                    .spawn((
                        GradientKindSelect(picker_entity),
                        Node {
                            width: percent(100),
                            ..default()
                        },
                    ))
                    .with_child(combobox_with_selected(
                        vec!["Linear", "Radial", "Angular"],
                        gradient_kind_index(state.gradient_kind),
                    ));

                parent.spawn((
                    PickerGradientEdit(picker_entity),
                    gradient_edit(
                        GradientEditProps::new()
                            .with_stops(state.stops.clone())
                            .with_active(state.active_stop),
                    ),
                ));
            }

            // Saturation/value surface
            parent
                .spawn((
                    SvSurface(picker_entity),
                    Node {
                        width: percent(100.0),
                        height: px(SURFACE_HEIGHT),
                        ..default()
                    },
                ))
                .with_children(|surface| {
                    surface.spawn((
                        SvSurfaceImage {
                            picker: picker_entity,
                            baked_hue: None,
                            baked_size: UVec2::ZERO,
                        },
                        Pickable::IGNORE,
                        ImageNode::new(surface_image),
                        fullsize_absolute_node(),
                    ));

                    surface.spawn((
                        SvHandle(picker_entity),
                        handle_style(0.0, 0.0, Some(current_color.with_alpha(1.0)), HANDLE_SIZE),
                    ));
                })
                .observe(on_control_press::<SvSurface>)
                .observe(on_control_release::<SvSurface>)
                .observe(on_control_drag_start::<SvSurface>)
                .observe(on_control_drag::<SvSurface>)
                .observe(on_control_drag_end::<SvSurface>);

            // Hue + alpha sliders beside the preview swatch
            parent
                .spawn(Node {
                    column_gap: px(12.0),
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|slider_row| {
                    slider_row
                        .spawn(Node {
                            flex_direction: FlexDirection::Column,
                            row_gap: px(6.0),
                            flex_grow: 1.0,
                            ..default()
                        })
                        .with_children(|slider_col| {
                            slider_col
                                .spawn((HueSlider(picker_entity), slider_node()))
                                .with_children(|hue_parent| {
                                    hue_parent.spawn((
                                        HueStripImage {
                                            picker: picker_entity,
                                            baked_size: UVec2::ZERO,
                                        },
                                        Pickable::IGNORE,
                                        ImageNode::new(hue_image),
                                        fullsize_absolute_node(),
                                    ));

                                    hue_parent.spawn((
                                        HueHandle(picker_entity),
                                        handle_style(
                                            0.0,
                                            (SLIDER_HEIGHT - HANDLE_SIZE) / 2.0,
                                            Some(hue_srgba),
                                            HANDLE_SIZE,
                                        ),
                                    ));
                                })
                                .observe(on_control_press::<HueSlider>)
                                .observe(on_control_release::<HueSlider>)
                                .observe(on_control_drag_start::<HueSlider>)
                                .observe(on_control_drag::<HueSlider>)
                                .observe(on_control_drag_end::<HueSlider>);

                            slider_col
                                .spawn((AlphaSlider(picker_entity), slider_node()))
                                .with_children(|alpha_parent| {
                                    alpha_parent.spawn((
                                        AlphaStripImage {
                                            picker: picker_entity,
                                            baked_rgb: None,
                                            baked_size: UVec2::ZERO,
                                        },
                                        Pickable::IGNORE,
                                        ImageNode::new(alpha_image),
                                        fullsize_absolute_node(),
                                    ));

                                    let inner_size = HANDLE_SIZE - HANDLE_BORDER * 2.0;
                                    alpha_parent
                                        .spawn((
                                            AlphaHandle(picker_entity),
                                            handle_style(
                                                0.0,
                                                (SLIDER_HEIGHT - HANDLE_SIZE) / 2.0,
                                                None,
                                                HANDLE_SIZE,
                                            ),
                                        ))
                                        .with_children(|handle| {
                                            handle
                                                .spawn((
                                                    Pickable::IGNORE,
                                                    Node {
                                                        width: px(inner_size),
                                                        height: px(inner_size),
                                                        border_radius: BorderRadius::all(px(
                                                            inner_size / 2.0,
                                                        )),
                                                        overflow: Overflow::clip(),
                                                        ..default()
                                                    },
                                                ))
                                                .with_children(|swatch| {
                                                    swatch.spawn((
                                                        AlphaHandleImage {
                                                            picker: picker_entity,
                                                            baked: None,
                                                        },
                                                        Pickable::IGNORE,
                                                        ImageNode::new(alpha_handle_image.clone()),
                                                        Node {
                                                            position_type: PositionType::Absolute,
                                                            width: percent(100.0),
                                                            height: percent(100.0),
                                                            ..default()
                                                        },
                                                    ));
                                                });
                                        });
                                })
                                .observe(on_control_press::<AlphaSlider>)
                                .observe(on_control_release::<AlphaSlider>)
                                .observe(on_control_drag_start::<AlphaSlider>)
                                .observe(on_control_drag::<AlphaSlider>)
                                .observe(on_control_drag_end::<AlphaSlider>);
                        });

                    // Preview swatch
                    slider_row
                        .spawn((
                            Pickable::IGNORE,
                            Node {
                                width: px(PREVIEW_SWATCH_SIZE),
                                height: px(PREVIEW_SWATCH_SIZE),
                                border_radius: BorderRadius::all(CORNER_RADIUS),
                                overflow: Overflow::clip(),
                                ..default()
                            },
                        ))
                        .with_children(|swatch| {
                            swatch.spawn((
                                PreviewSwatchImage {
                                    picker: picker_entity,
                                    baked: None,
                                },
                                Pickable::IGNORE,
                                ImageNode::new(preview_image.clone()),
                                Node {
                                    position_type: PositionType::Absolute,
                                    width: percent(100.0),
                                    height: percent(100.0),
                                    ..default()
                                },
                            ));
                        });
                });

            // Input fields row
            parent
                .spawn((
                    ColorInputRow(picker_entity),
                    Node {
                        width: percent(100),
                        column_gap: px(6.0),
                        ..default()
                    },
                ))
                .with_children(|row| {
                    spawn_input_fields(row, picker_entity, state.input_format, state);
                });
        });
    }
}

fn gradient_kind_index(kind: GradientKind) -> usize {
    match kind {
        GradientKind::Linear => 0,
        GradientKind::Radial => 1,
        GradientKind::Angular => 2,
    }
}

/// Toggling the mode snapshots the lowest-position stop's color (both
/// directions seed the picker from it) and rebuilds the content so the
/// gradient section appears or goes away.
pub(super) fn handle_mode_click(
    trigger: On<ButtonClickEvent>,
    mut commands: Commands,
    mode_buttons: Query<&ModeButton>,
    mut pickers: Query<&mut ColorPickerState>,
    contents: Query<(Entity, &ColorPickerContent, Option<&Children>)>,
) {
    let Ok(mode_button) = mode_buttons.get(trigger.entity) else {
        return;
    };
    let picker_entity = mode_button.picker;
    let Ok(mut state) = pickers.get_mut(picker_entity) else {
        return;
    };
    if state.mode == mode_button.mode {
        return;
    }

    state.mode = mode_button.mode;
    if state.mode == PickerMode::Gradient {
        state.active_stop = 0;
    }
    if let Some(stop) = state.lowest_stop() {
        state.set_from_rgba(stop.value);
    }

    commands.trigger(PickerModeChangeEvent {
        entity: picker_entity,
        mode: state.mode,
    });
    commands.trigger(ColorPickerChangeEvent {
        entity: picker_entity,
        color: state.rgba(),
    });

    for (content_entity, content, children) in &contents {
        if content.0 != picker_entity {
            continue;
        }
        if let Some(children) = children {
            for child in children.iter() {
                commands.entity(child).try_despawn();
            }
        }
        commands.entity(content_entity).insert(RebuildContent);
    }
}

pub(super) fn handle_gradient_kind_change(
    trigger: On<ComboBoxChangeEvent>,
    mut commands: Commands,
    selects: Query<&GradientKindSelect>,
    mut pickers: Query<&mut ColorPickerState>,
    parents: Query<&ChildOf>,
) {
    let Some((_, select)) = find_ancestor(trigger.entity, &selects, &parents) else {
        return;
    };

    let kind = match trigger.selected {
        1 => GradientKind::Radial,
        2 => GradientKind::Angular,
        _ => GradientKind::Linear,
    };

    let Ok(mut state) = pickers.get_mut(select.0) else {
        return;
    };
    if state.gradient_kind == kind {
        return;
    }
    state.gradient_kind = kind;

    commands.trigger(GradientKindChangeEvent {
        entity: select.0,
        kind,
    });
}

/// Stop edits made in the embedded gradient editor flow into the picker
/// state and out to the host.
pub(super) fn handle_stop_edit_change(
    trigger: On<GradientEditChangeEvent>,
    mut commands: Commands,
    links: Query<&PickerGradientEdit>,
    mut pickers: Query<&mut ColorPickerState>,
) {
    let Ok(link) = links.get(trigger.entity) else {
        return;
    };
    let Ok(mut state) = pickers.get_mut(link.0) else {
        return;
    };

    state.stops = trigger.stops.clone();
    if state.active_stop >= state.stops.len() {
        state.active_stop = 0;
    }

    commands.trigger(GradientStopsChangeEvent {
        entity: link.0,
        stops: state.stops.clone(),
    });
}

/// Selecting a stop loads its color into the picker, so the canvases and
/// fields edit that stop from here on.
pub(super) fn handle_stop_edit_select(
    trigger: On<GradientEditSelectEvent>,
    mut commands: Commands,
    links: Query<&PickerGradientEdit>,
    mut pickers: Query<&mut ColorPickerState>,
) {
    let Ok(link) = links.get(trigger.entity) else {
        return;
    };
    let Ok(mut state) = pickers.get_mut(link.0) else {
        return;
    };

    state.active_stop = trigger.index;
    state.set_from_rgba(trigger.stop.value);

    commands.trigger(ColorPickerChangeEvent {
        entity: link.0,
        color: state.rgba(),
    });
}

/// Picker-side stop mutations (live write-through to the active stop,
/// host-driven lists) are mirrored back into the embedded editor. Writes
/// only happen on real differences, so the two states cannot ping-pong.
pub(super) fn sync_gradient_edit_from_picker(
    pickers: Query<&ColorPickerState, Changed<ColorPickerState>>,
    mut editors: Query<(&PickerGradientEdit, &mut GradientEditState)>,
) {
    for (link, mut edit) in &mut editors {
        let Ok(state) = pickers.get(link.0) else {
            continue;
        };
        if edit.stops != state.stops {
            edit.stops = state.stops.clone();
        }
        let active = state.active_stop.min(edit.stops.len().saturating_sub(1));
        if edit.active != active {
            edit.active = active;
        }
    }
}
