use bevy::picking::hover::Hovered;
use bevy::prelude::*;
use lucide_icons::Icon;

use crate::cursor::HoverCursor;
use crate::icons::{BodyFont, IconFont};
use crate::tokens::{CORNER_RADIUS_LG, PRIMARY_COLOR, TEXT_BODY_COLOR, TEXT_MUTED_COLOR, TEXT_SIZE};

pub fn plugin(app: &mut App) {
    app.add_systems(Update, (setup_button, handle_hover, handle_button_click));
}

#[derive(EntityEvent)]
pub struct ButtonClickEvent {
    pub entity: Entity,
}

#[derive(Component)]
pub struct TinctButton;

#[derive(Component, Default, Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Default,
    Ghost,
    Active,
    ActiveAlt,
    Disabled,
}

#[derive(Component, Default, Clone, Copy)]
pub enum ButtonSize {
    #[default]
    MD,
    Icon,
    IconSM,
}

impl ButtonVariant {
    pub fn bg_color(&self) -> Srgba {
        use bevy::color::palettes::tailwind;
        match self {
            Self::Default => tailwind::ZINC_700,
            Self::Ghost | Self::ActiveAlt | Self::Disabled => TEXT_BODY_COLOR,
            Self::Active => PRIMARY_COLOR,
        }
    }

    pub fn bg_opacity(&self, hovered: bool) -> f32 {
        match (self, hovered) {
            (Self::Ghost, false) | (Self::Disabled, _) => 0.0,
            (Self::Ghost, true) | (Self::ActiveAlt, _) => 0.05,
            (Self::Active, false) => 0.1,
            (Self::Active, true) => 0.15,
            (Self::Default, false) => 0.5,
            (Self::Default, true) => 0.8,
        }
    }

    pub fn text_color(&self) -> Srgba {
        match self {
            Self::Default | Self::Ghost | Self::ActiveAlt => TEXT_BODY_COLOR,
            Self::Active => PRIMARY_COLOR.lighter(0.05),
            Self::Disabled => TEXT_MUTED_COLOR,
        }
    }

    pub fn border_color(&self) -> Srgba {
        use bevy::color::palettes::tailwind;
        match self {
            Self::Default | Self::Ghost | Self::Disabled => tailwind::ZINC_700,
            Self::Active => PRIMARY_COLOR,
            Self::ActiveAlt => TEXT_BODY_COLOR,
        }
    }

    pub fn border(&self) -> Val {
        match self {
            Self::Default | Self::ActiveAlt => Val::Px(1.0),
            _ => Val::Px(0.0),
        }
    }

    pub fn border_opacity(&self, hovered: bool) -> f32 {
        match (self, hovered) {
            (Self::Ghost, false) | (Self::Disabled, _) => 0.0,
            (Self::ActiveAlt, _) => 0.2,
            _ => 1.0,
        }
    }
}

impl ButtonSize {
    fn width(&self) -> Val {
        match self {
            Self::Icon => Val::Px(28.0),
            Self::IconSM => Val::Px(24.0),
            Self::MD => Val::Auto,
        }
    }

    fn height(&self) -> Val {
        match self {
            Self::IconSM => Val::Px(24.0),
            _ => Val::Px(28.0),
        }
    }

    fn padding(&self) -> Val {
        match self {
            Self::MD => px(12.0),
            Self::Icon | Self::IconSM => px(0.0),
        }
    }

    fn icon_size(&self) -> f32 {
        match self {
            Self::IconSM => 14.0,
            _ => 16.0,
        }
    }
}

#[derive(Component)]
struct ButtonConfig {
    content: String,
    left_icon: Option<Icon>,
    right_icon: Option<Icon>,
    initialized: bool,
}

#[derive(Default)]
pub struct ButtonProps {
    pub content: String,
    pub variant: ButtonVariant,
    pub size: ButtonSize,
    pub align_left: bool,
    pub left_icon: Option<Icon>,
    pub right_icon: Option<Icon>,
}

impl ButtonProps {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..default()
        }
    }

    pub fn with_variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    pub fn align_left(mut self) -> Self {
        self.align_left = true;
        self
    }

    pub fn with_left_icon(mut self, icon: Icon) -> Self {
        self.left_icon = Some(icon);
        self
    }

    pub fn with_right_icon(mut self, icon: Icon) -> Self {
        self.right_icon = Some(icon);
        self
    }
}

pub struct IconButtonProps {
    pub icon: Icon,
    pub color: Option<Srgba>,
    pub variant: ButtonVariant,
    pub size: ButtonSize,
}

impl IconButtonProps {
    pub fn new(icon: Icon) -> Self {
        Self {
            icon,
            color: None,
            variant: ButtonVariant::Default,
            size: ButtonSize::Icon,
        }
    }

    pub fn color(mut self, color: Srgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }
}

pub(crate) fn button_base(variant: ButtonVariant, size: ButtonSize, align_left: bool) -> impl Bundle {
    (
        Button,
        TinctButton,
        variant,
        size,
        Hovered::default(),
        HoverCursor(bevy::window::SystemCursorIcon::Pointer),
        Node {
            width: if align_left {
                percent(100)
            } else {
                size.width()
            },
            height: size.height(),
            padding: UiRect::axes(size.padding(), px(0.0)),
            border: UiRect::all(variant.border()),
            border_radius: BorderRadius::all(CORNER_RADIUS_LG),
            column_gap: px(6.0),
            justify_content: if align_left {
                JustifyContent::Start
            } else {
                JustifyContent::Center
            },
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(
            variant
                .bg_color()
                .with_alpha(variant.bg_opacity(false))
                .into(),
        ),
        BorderColor::all(
            variant
                .border_color()
                .with_alpha(variant.border_opacity(false)),
        ),
    )
}

pub fn button(props: ButtonProps) -> impl Bundle {
    let ButtonProps {
        content,
        variant,
        size,
        align_left,
        left_icon,
        right_icon,
    } = props;

    (
        button_base(variant, size, align_left),
        ButtonConfig {
            content,
            left_icon,
            right_icon,
            initialized: false,
        },
    )
}

/// Icon-only button using the Lucide icon font.
pub fn icon_button(props: IconButtonProps, icon_font: &Handle<Font>) -> impl Bundle {
    let IconButtonProps {
        icon,
        color,
        variant,
        size,
    } = props;
    let icon_color = color.unwrap_or(variant.text_color());

    (
        button_base(variant, size, false),
        children![(
            Text::new(icon.unicode()),
            TextFont {
                font: icon_font.clone(),
                font_size: size.icon_size(),
                ..default()
            },
            TextColor(Color::Srgba(icon_color)),
        )],
    )
}

fn setup_button(
    mut commands: Commands,
    body_font: Res<BodyFont>,
    icon_font: Res<IconFont>,
    mut buttons: Query<
        (
            Entity,
            &mut ButtonConfig,
            &ButtonVariant,
            &ButtonSize,
            &mut Node,
        ),
        Added<ButtonConfig>,
    >,
) {
    let font = body_font.0.clone();

    for (entity, mut config, variant, size, mut node) in &mut buttons {
        if config.initialized {
            continue;
        }
        config.initialized = true;

        if config.left_icon.is_some() {
            node.padding.left = px(6.0);
        }
        if config.right_icon.is_some() {
            node.padding.right = px(6.0);
        }

        commands.entity(entity).with_children(|parent| {
            if let Some(icon) = config.left_icon {
                parent.spawn((
                    Text::new(icon.unicode()),
                    TextFont {
                        font: icon_font.0.clone(),
                        font_size: size.icon_size(),
                        ..default()
                    },
                    TextColor(variant.text_color().into()),
                ));
            }

            if !config.content.is_empty() {
                parent.spawn((
                    Text::new(&config.content),
                    TextFont {
                        font: font.clone(),
                        font_size: TEXT_SIZE,
                        weight: FontWeight::MEDIUM,
                        ..default()
                    },
                    TextColor(variant.text_color().into()),
                    Node {
                        flex_grow: 1.0,
                        ..default()
                    },
                ));
            }

            if let Some(icon) = config.right_icon {
                parent.spawn((
                    Text::new(icon.unicode()),
                    TextFont {
                        font: icon_font.0.clone(),
                        font_size: size.icon_size(),
                        ..default()
                    },
                    TextColor(variant.text_color().into()),
                ));
            }
        });
    }
}

fn handle_hover(
    mut buttons: Query<
        (
            &ButtonVariant,
            &Hovered,
            &mut BackgroundColor,
            &mut BorderColor,
        ),
        (Changed<Hovered>, With<TinctButton>),
    >,
) {
    for (variant, hovered, mut bg, mut border) in &mut buttons {
        let is_hovered = hovered.get();
        bg.0 = variant
            .bg_color()
            .with_alpha(variant.bg_opacity(is_hovered))
            .into();
        *border = BorderColor::all(
            variant
                .border_color()
                .with_alpha(variant.border_opacity(is_hovered)),
        );
    }
}

fn handle_button_click(
    interactions: Query<
        (Entity, &Interaction, &ButtonVariant),
        (Changed<Interaction>, With<TinctButton>),
    >,
    mut commands: Commands,
) {
    for (entity, interaction, variant) in &interactions {
        if *interaction == Interaction::Pressed && *variant != ButtonVariant::Disabled {
            commands.trigger(ButtonClickEvent { entity });
        }
    }
}

pub fn set_button_variant(
    variant: ButtonVariant,
    bg: &mut BackgroundColor,
    border: &mut BorderColor,
) {
    bg.0 = variant
        .bg_color()
        .with_alpha(variant.bg_opacity(false))
        .into();
    *border = BorderColor::all(
        variant
            .border_color()
            .with_alpha(variant.border_opacity(false)),
    );
}
