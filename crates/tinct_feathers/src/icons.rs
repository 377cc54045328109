use bevy::prelude::*;
pub use lucide_icons::Icon;

/// Resource holding the loaded Lucide icon font handle.
#[derive(Resource)]
pub struct IconFont(pub Handle<Font>);

/// Resource holding the loaded body font (InterVariable).
#[derive(Resource)]
pub struct BodyFont(pub Handle<Font>);

pub struct IconFontPlugin;

impl Plugin for IconFontPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_fonts);
    }
}

fn load_fonts(
    mut commands: Commands,
    mut fonts: ResMut<Assets<Font>>,
    asset_server: Res<AssetServer>,
) {
    // Icon font ships embedded; the body font comes from the host's assets.
    let icon_font = Font::try_from_bytes(lucide_icons::LUCIDE_FONT_BYTES.to_vec())
        .expect("Failed to load Lucide icon font");
    commands.insert_resource(IconFont(fonts.add(icon_font)));

    let body_font = asset_server.load("fonts/InterVariable.ttf");
    commands.insert_resource(BodyFont(body_font));
}

/// Text bundle rendering a single Lucide glyph.
pub fn icon(icon: Icon, size: f32, font: Handle<Font>) -> impl Bundle {
    (
        Text::new(String::from(icon.unicode())),
        TextFont {
            font,
            font_size: size,
            ..Default::default()
        },
    )
}
