use bevy::prelude::*;
use lucide_icons::Icon;

use crate::button::{
    ButtonClickEvent, ButtonProps, ButtonSize, ButtonVariant, button, set_button_variant,
};
use crate::popover::{PopoverPlacement, PopoverProps, TinctPopover, popover};
use crate::utils::is_descendant_of;

pub fn plugin(app: &mut App) {
    app.add_observer(handle_trigger_click)
        .add_observer(handle_option_click)
        .add_systems(Update, (setup_combobox, handle_combobox_popover_closed));
}

#[derive(Component)]
pub struct TinctComboBox;

#[derive(Component)]
pub struct ComboBoxTrigger(pub Entity);

#[derive(Component)]
pub struct ComboBoxPopover(pub Entity);

#[derive(Component, Default)]
struct ComboBoxState {
    popover: Option<Entity>,
}

#[derive(Component, Clone)]
struct ComboBoxOption {
    combobox: Entity,
    index: usize,
    label: String,
}

#[derive(Component)]
struct ComboBoxConfig {
    options: Vec<String>,
    selected: usize,
    initialized: bool,
}

#[derive(EntityEvent)]
pub struct ComboBoxChangeEvent {
    pub entity: Entity,
    pub selected: usize,
    pub label: String,
}

pub fn combobox(options: Vec<impl Into<String>>) -> impl Bundle {
    combobox_with_selected(options, 0)
}

pub fn combobox_with_selected(options: Vec<impl Into<String>>, selected: usize) -> impl Bundle {
    (
        TinctComboBox,
        ComboBoxConfig {
            options: options.into_iter().map(Into::into).collect(),
            selected,
            initialized: false,
        },
        ComboBoxState::default(),
        Node {
            width: percent(100),
            ..default()
        },
    )
}

fn setup_combobox(mut commands: Commands, mut configs: Query<(Entity, &mut ComboBoxConfig)>) {
    for (entity, mut config) in &mut configs {
        if config.initialized {
            continue;
        }
        config.initialized = true;

        let label = config
            .options
            .get(config.selected)
            .cloned()
            .unwrap_or_default();

        let trigger_entity = commands
            .spawn((
                ComboBoxTrigger(entity),
                button(
                    ButtonProps::new(label)
                        .with_size(ButtonSize::MD)
                        .align_left()
                        .with_right_icon(Icon::ChevronDown),
                ),
            ))
            .id();

        commands.entity(entity).add_child(trigger_entity);
    }
}

fn handle_trigger_click(
    trigger: On<ButtonClickEvent>,
    mut commands: Commands,
    triggers: Query<&ComboBoxTrigger>,
    configs: Query<&ComboBoxConfig>,
    mut states: Query<&mut ComboBoxState>,
    existing_popovers: Query<(Entity, &ComboBoxPopover)>,
    all_popovers: Query<Entity, With<TinctPopover>>,
    mut button_styles: Query<(&mut BackgroundColor, &mut BorderColor, &mut ButtonVariant)>,
    parents: Query<&ChildOf>,
) {
    let Ok(combo_trigger) = triggers.get(trigger.entity) else {
        return;
    };
    let Ok(config) = configs.get(combo_trigger.0) else {
        return;
    };
    let Ok(mut state) = states.get_mut(combo_trigger.0) else {
        return;
    };

    // Second click on the trigger closes the open dropdown.
    for (popover_entity, popover_ref) in &existing_popovers {
        if popover_ref.0 == combo_trigger.0 {
            commands.entity(popover_entity).try_despawn();
            state.popover = None;
            if let Ok((mut bg, mut border, mut variant)) = button_styles.get_mut(trigger.entity) {
                *variant = ButtonVariant::Default;
                set_button_variant(ButtonVariant::Default, &mut bg, &mut border);
            }
            return;
        }
    }

    // Don't open over an unrelated popover; opening inside one (the picker
    // popover) is fine.
    if !all_popovers.is_empty() {
        let is_nested = all_popovers
            .iter()
            .any(|pop| is_descendant_of(combo_trigger.0, pop, &parents));
        if !is_nested {
            return;
        }
    }

    let combobox_entity = combo_trigger.0;

    if let Ok((mut bg, mut border, mut variant)) = button_styles.get_mut(trigger.entity) {
        *variant = ButtonVariant::ActiveAlt;
        set_button_variant(ButtonVariant::ActiveAlt, &mut bg, &mut border);
    }

    let popover_entity = commands
        .spawn((
            ComboBoxPopover(combobox_entity),
            popover(
                PopoverProps::new(trigger.entity)
                    .with_placement(PopoverPlacement::BottomStart)
                    .with_padding(4.0)
                    .with_z_index(200)
                    .with_node(Node {
                        min_width: px(120.0),
                        ..default()
                    }),
            ),
        ))
        .id();

    state.popover = Some(popover_entity);

    for (index, option) in config.options.iter().enumerate() {
        let variant = if index == config.selected {
            ButtonVariant::Active
        } else {
            ButtonVariant::Ghost
        };

        commands.entity(popover_entity).with_child((
            ComboBoxOption {
                combobox: combobox_entity,
                index,
                label: option.clone(),
            },
            button(ButtonProps::new(option).with_variant(variant).align_left()),
        ));
    }
}

fn handle_combobox_popover_closed(
    mut states: Query<(&mut ComboBoxState, &Children), With<TinctComboBox>>,
    popovers: Query<Entity, With<TinctPopover>>,
    triggers: Query<Entity, With<ComboBoxTrigger>>,
    mut button_styles: Query<(&mut BackgroundColor, &mut BorderColor, &mut ButtonVariant)>,
) {
    for (mut state, combobox_children) in &mut states {
        let Some(popover_entity) = state.popover else {
            continue;
        };

        if popovers.get(popover_entity).is_ok() {
            continue;
        }

        state.popover = None;

        for child in combobox_children.iter() {
            if triggers.get(child).is_ok() {
                if let Ok((mut bg, mut border, mut variant)) = button_styles.get_mut(child) {
                    *variant = ButtonVariant::Default;
                    set_button_variant(ButtonVariant::Default, &mut bg, &mut border);
                }
                break;
            }
        }
    }
}

fn handle_option_click(
    trigger: On<ButtonClickEvent>,
    mut commands: Commands,
    options: Query<&ComboBoxOption>,
    mut configs: Query<&mut ComboBoxConfig>,
    popovers: Query<(Entity, &ComboBoxPopover)>,
    triggers: Query<(&ComboBoxTrigger, &Children)>,
    mut texts: Query<&mut Text>,
) {
    let Ok(option) = options.get(trigger.entity) else {
        return;
    };

    let Ok(mut config) = configs.get_mut(option.combobox) else {
        return;
    };
    config.selected = option.index;

    commands.trigger(ComboBoxChangeEvent {
        entity: option.combobox,
        selected: option.index,
        label: option.label.clone(),
    });

    // Reflect the pick on the trigger button.
    for (combo_trigger, children) in &triggers {
        if combo_trigger.0 != option.combobox {
            continue;
        }
        for child in children.iter() {
            if let Ok(mut text) = texts.get_mut(child) {
                **text = option.label.clone();
                break;
            }
        }
    }

    for (popover_entity, popover_ref) in &popovers {
        if popover_ref.0 == option.combobox {
            commands.entity(popover_entity).try_despawn();
        }
    }
}
