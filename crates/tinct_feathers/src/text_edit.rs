use bevy::input_focus::InputFocus;
use bevy::picking::hover::Hovered;
use bevy::prelude::*;
use bevy::text::{FontFeatureTag, FontFeatures};
use bevy_ui_text_input::actions::{TextInputAction, TextInputEdit};
use bevy_ui_text_input::*;

use crate::cursor::HoverCursor;
use crate::icons::BodyFont;
use crate::tokens::{BORDER_COLOR, PRIMARY_COLOR, TEXT_BODY_COLOR, TEXT_MUTED_COLOR, TEXT_SIZE};

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<TextInputPlugin>() {
        app.add_plugins(TextInputPlugin);
    }
    app.add_systems(
        Update,
        (
            setup_text_edit_input,
            handle_focus_style,
            handle_unfocus,
            handle_click_to_focus,
            handle_commit_on_unfocus,
        ),
    )
    .add_systems(PostUpdate, (apply_default_value, handle_suffix).chain());
}

pub fn set_text_input_value(queue: &mut TextInputQueue, text: String) {
    queue.add(TextInputAction::Edit(TextInputEdit::SelectAll));
    queue.add(TextInputAction::Edit(TextInputEdit::Paste(text)));
}

/// Fired when a field loses focus (click away, Enter, Escape) with the
/// text it held at that moment, suffix stripped.
#[derive(EntityEvent)]
pub struct TextEditCommitEvent {
    pub entity: Entity,
    pub text: String,
}

const INPUT_HEIGHT: f32 = 28.0;
const AFFIX_SIZE: f32 = 16.0;

#[derive(Component)]
pub struct TinctTextEdit;

#[derive(Component)]
struct TextEditWrapper(Entity);

#[derive(Component, Default, Clone, Copy, PartialEq)]
pub enum TextEditVariant {
    #[default]
    Default,
    NumericF32,
    NumericI32,
}

impl TextEditVariant {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::NumericF32 | Self::NumericI32)
    }
}

#[derive(Clone)]
pub enum TextEditPrefix {
    Label { label: String, size: f32 },
}

#[derive(Component)]
struct TextEditSuffix(String);

#[derive(Component)]
struct TextEditSuffixNode(Entity);

#[derive(Component)]
struct TextEditDefaultValue(String);

#[derive(Component, Clone, Copy)]
struct NumericRange {
    min: f64,
    max: f64,
}

#[derive(Clone)]
pub enum FilterType {
    Decimal,
    Integer,
}

#[derive(Component)]
struct TextEditConfig {
    variant: TextEditVariant,
    filter: Option<FilterType>,
    prefix: Option<TextEditPrefix>,
    suffix: Option<String>,
    placeholder: String,
    default_value: Option<String>,
    min: f64,
    max: f64,
    initialized: bool,
}

pub struct TextEditProps {
    pub placeholder: String,
    pub default_value: Option<String>,
    pub variant: TextEditVariant,
    pub filter: Option<FilterType>,
    pub prefix: Option<TextEditPrefix>,
    pub suffix: Option<String>,
    pub min: f64,
    pub max: f64,
}

impl Default for TextEditProps {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            default_value: None,
            variant: TextEditVariant::Default,
            filter: None,
            prefix: None,
            suffix: None,
            min: f64::MIN,
            max: f64::MAX,
        }
    }
}

impl TextEditProps {
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_prefix(mut self, prefix: TextEditPrefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    pub fn numeric_f32(mut self) -> Self {
        self.variant = TextEditVariant::NumericF32;
        self.filter = Some(FilterType::Decimal);
        self.min = f32::MIN as f64;
        self.max = f32::MAX as f64;
        self
    }

    pub fn numeric_i32(mut self) -> Self {
        self.variant = TextEditVariant::NumericI32;
        self.filter = Some(FilterType::Integer);
        self.min = i32::MIN as f64;
        self.max = i32::MAX as f64;
        self
    }
}

pub fn text_edit(props: TextEditProps) -> impl Bundle {
    let TextEditProps {
        placeholder,
        default_value,
        variant,
        filter,
        prefix,
        suffix,
        min,
        max,
    } = props;

    (
        Node {
            flex_direction: FlexDirection::Column,
            row_gap: px(3),
            flex_grow: 1.0,
            flex_shrink: 1.0,
            flex_basis: px(0),
            ..default()
        },
        TextEditConfig {
            variant,
            filter,
            prefix,
            suffix,
            placeholder,
            default_value,
            min,
            max,
            initialized: false,
        },
    )
}

fn setup_text_edit_input(
    mut commands: Commands,
    body_font: Res<BodyFont>,
    mut configs: Query<(Entity, &mut TextEditConfig)>,
) {
    let font = body_font.0.clone();
    let tabular_figures: FontFeatures = [FontFeatureTag::TABULAR_FIGURES].into();

    for (entity, mut config) in &mut configs {
        if config.initialized {
            continue;
        }
        config.initialized = true;

        let filter = config.filter.as_ref().map(|f| match f {
            FilterType::Decimal => TextInputFilter::Decimal,
            FilterType::Integer => TextInputFilter::Integer,
        });

        let wrapper_entity = commands
            .spawn((
                Node {
                    width: percent(100),
                    height: px(INPUT_HEIGHT),
                    padding: UiRect::all(px(6)),
                    border: UiRect::all(px(1)),
                    border_radius: BorderRadius::all(px(2)),
                    align_items: AlignItems::Center,
                    column_gap: px(6),
                    ..default()
                },
                BackgroundColor(Color::NONE),
                BorderColor::all(BORDER_COLOR),
                Interaction::None,
                Hovered::default(),
                HoverCursor(bevy::window::SystemCursorIcon::Text),
            ))
            .id();

        commands.entity(entity).add_child(wrapper_entity);

        if let Some(ref prefix) = config.prefix {
            let prefix_entity = match prefix {
                TextEditPrefix::Label { label, size } => commands
                    .spawn((
                        Text::new(label),
                        TextFont {
                            font: font.clone(),
                            font_size: *size,
                            ..default()
                        },
                        TextColor(TEXT_BODY_COLOR.with_alpha(0.5).into()),
                        TextLayout::new_with_justify(Justify::Center),
                        Node {
                            width: px(AFFIX_SIZE),
                            ..default()
                        },
                    ))
                    .id(),
            };
            commands.entity(wrapper_entity).add_child(prefix_entity);
        }

        let placeholder = config
            .suffix
            .as_ref()
            .map(|s| format!("{}{}", config.placeholder, s))
            .unwrap_or_else(|| config.placeholder.clone());

        let mut text_input = commands.spawn((
            TinctTextEdit,
            config.variant,
            TextInputNode {
                mode: TextInputMode::SingleLine,
                clear_on_submit: false,
                unfocus_on_submit: true,
                ..default()
            },
            TextFont {
                font: font.clone(),
                font_size: TEXT_SIZE,
                font_features: tabular_figures.clone(),
                ..default()
            },
            TextColor(TEXT_BODY_COLOR.into()),
            TextInputStyle {
                cursor_color: TEXT_BODY_COLOR.into(),
                cursor_width: 1.0,
                selection_color: PRIMARY_COLOR.with_alpha(0.3).into(),
                ..default()
            },
            TextInputPrompt {
                text: placeholder,
                color: Some(TEXT_BODY_COLOR.with_alpha(0.2).into()),
                ..default()
            },
            Node {
                flex_grow: 1.0,
                height: percent(100),
                justify_content: JustifyContent::Center,
                overflow: Overflow::clip(),
                ..default()
            },
        ));

        if let Some(filter) = filter {
            text_input.insert(filter);
        }

        if let Some(ref suffix) = config.suffix {
            text_input.insert(TextEditSuffix(suffix.clone()));
        }

        if let Some(ref default_value) = config.default_value {
            text_input.insert(TextEditDefaultValue(default_value.clone()));
        }

        if config.variant.is_numeric() {
            text_input.insert(NumericRange {
                min: config.min,
                max: config.max,
            });
        }

        let text_input_entity = text_input.id();

        commands.entity(wrapper_entity).add_child(text_input_entity);

        if let Some(ref suffix) = config.suffix {
            let suffix_entity = commands
                .spawn((
                    TextEditSuffixNode(text_input_entity),
                    Text::new(suffix.clone()),
                    TextFont {
                        font: font.clone(),
                        font_size: TEXT_SIZE,
                        font_features: tabular_figures.clone(),
                        ..default()
                    },
                    TextColor(TEXT_MUTED_COLOR.into()),
                    Node {
                        position_type: PositionType::Absolute,
                        top: px(5.5),
                        display: Display::None,
                        ..default()
                    },
                ))
                .id();
            commands.entity(wrapper_entity).add_child(suffix_entity);
        }
        commands
            .entity(wrapper_entity)
            .insert(TextEditWrapper(text_input_entity));
    }
}

fn handle_focus_style(
    focus: Res<InputFocus>,
    mut wrappers: Query<(&TextEditWrapper, &mut BorderColor, &Hovered)>,
) {
    for (wrapper, mut border_color, hovered) in &mut wrappers {
        let color = match (focus.0 == Some(wrapper.0), hovered.get()) {
            (true, _) => PRIMARY_COLOR,
            (_, true) => BORDER_COLOR.lighter(0.05),
            _ => BORDER_COLOR,
        };
        *border_color = BorderColor::all(color);
    }
}

fn apply_default_value(
    mut commands: Commands,
    mut text_edits: Query<(
        Entity,
        &TextEditDefaultValue,
        &TextEditVariant,
        &TextInputBuffer,
        &mut TextInputQueue,
        Option<&NumericRange>,
    )>,
) {
    for (entity, default_value, variant, buffer, mut queue, range) in &mut text_edits {
        if buffer.get_text().is_empty() {
            let text = if variant.is_numeric() {
                let value = clamp_value(default_value.0.parse().unwrap_or(0.0), range);
                format_numeric_value(value, *variant)
            } else {
                default_value.0.clone()
            };
            queue.add(TextInputAction::Edit(TextInputEdit::Paste(text)));
        }
        commands.entity(entity).remove::<TextEditDefaultValue>();
    }
}

fn handle_suffix(
    focus: Res<InputFocus>,
    text_edits: Query<(Entity, &TextInputBuffer, &TextInputLayoutInfo), With<TextEditSuffix>>,
    mut suffix_nodes: Query<(&TextEditSuffixNode, &mut Node), Without<TextEditWrapper>>,
) {
    const WRAPPER_PADDING: f32 = 8.0;

    for (entity, buffer, layout_info) in &text_edits {
        let Some((_, mut node)) = suffix_nodes.iter_mut().find(|(link, _)| link.0 == entity)
        else {
            continue;
        };

        let show = focus.0 != Some(entity) && !buffer.get_text().is_empty();
        node.left = px(layout_info.size.x + WRAPPER_PADDING);
        node.display = if show { Display::Flex } else { Display::None };
    }
}

fn handle_click_to_focus(
    mut focus: ResMut<InputFocus>,
    mouse: Res<ButtonInput<MouseButton>>,
    wrappers: Query<(&TextEditWrapper, &Interaction)>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    for (wrapper, interaction) in &wrappers {
        if *interaction == Interaction::Pressed {
            focus.0 = Some(wrapper.0);
        }
    }
}

fn handle_unfocus(
    mut focus: ResMut<InputFocus>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    text_edits: Query<&ChildOf, With<TinctTextEdit>>,
    wrappers: Query<&Interaction, With<TextEditWrapper>>,
) {
    let Some(focused_entity) = focus.0 else {
        return;
    };
    let Ok(child_of) = text_edits.get(focused_entity) else {
        return;
    };
    let Ok(interaction) = wrappers.get(child_of.parent()) else {
        return;
    };

    let clicked_outside =
        mouse.get_just_pressed().next().is_some() && *interaction == Interaction::None;
    let key_dismiss = keyboard.just_pressed(KeyCode::Escape)
        || keyboard.just_pressed(KeyCode::Enter)
        || keyboard.just_pressed(KeyCode::NumpadEnter);

    if clicked_outside || key_dismiss {
        focus.0 = None;
    }
}

/// On focus loss: emit the commit event and, for numeric fields, snap the
/// displayed text back into range.
fn handle_commit_on_unfocus(
    mut commands: Commands,
    focus: Res<InputFocus>,
    mut prev_focus: Local<Option<Entity>>,
    mut text_edits: Query<
        (
            &TextEditVariant,
            &TextInputBuffer,
            &mut TextInputQueue,
            Option<&TextEditSuffix>,
            Option<&NumericRange>,
        ),
        With<TinctTextEdit>,
    >,
) {
    let prev = *prev_focus;
    *prev_focus = focus.0;

    let Some(was_focused) = prev else { return };
    if focus.0 == Some(was_focused) {
        return;
    }

    let Ok((variant, buffer, mut queue, suffix, range)) = text_edits.get_mut(was_focused) else {
        return;
    };

    let text = strip_suffix(&buffer.get_text(), suffix);

    commands.trigger(TextEditCommitEvent {
        entity: was_focused,
        text: text.clone(),
    });

    if !variant.is_numeric() {
        return;
    }

    let value = text.parse().unwrap_or(0.0);
    let clamped = clamp_value(value, range);
    set_text_input_value(&mut queue, format_numeric_value(clamped, *variant));
}

fn strip_suffix(text: &str, suffix: Option<&TextEditSuffix>) -> String {
    suffix
        .and_then(|s| text.strip_suffix(&format!(" {}", s.0)))
        .unwrap_or(text)
        .to_string()
}

fn format_numeric_value(value: f64, variant: TextEditVariant) -> String {
    match variant {
        TextEditVariant::NumericI32 => (value.round() as i32).to_string(),
        TextEditVariant::NumericF32 => {
            let mut text = value.to_string();
            if !text.contains('.') {
                text.push_str(".0");
            }
            text
        }
        TextEditVariant::Default => value.to_string(),
    }
}

fn clamp_value(value: f64, range: Option<&NumericRange>) -> f64 {
    match range {
        Some(r) => value.clamp(r.min, r.max),
        None => value,
    }
}
