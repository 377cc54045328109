//! Composable color-picking widgets for Bevy UI, feathers style: props
//! builders in, entity events out. `color_picker` is the composite widget;
//! `gradient_edit` the standalone stop editor it embeds.

pub mod button;
pub mod color_picker;
pub mod combobox;
pub mod cursor;
pub mod gradient_edit;
pub mod icons;
pub mod popover;
pub mod render;
pub mod text_edit;
pub mod tokens;
pub mod utils;

use bevy::app::Plugin;

pub struct TinctFeathersPlugin;

impl Plugin for TinctFeathersPlugin {
    fn build(&self, app: &mut bevy::app::App) {
        // text_edit::plugin brings TextInputPlugin (and with it input
        // dispatch), so it has to come before the widgets that focus text.
        app.add_plugins((
            icons::IconFontPlugin,
            cursor::plugin,
            button::plugin,
            popover::plugin,
            combobox::plugin,
            text_edit::plugin,
            color_picker::plugin,
            gradient_edit::plugin,
        ));
    }
}
