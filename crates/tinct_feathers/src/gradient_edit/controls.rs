use bevy::input_focus::InputFocus;
use bevy::picking::events::{DragEnd, DragStart, Press};
use bevy::prelude::*;
use bevy::ui::UiGlobalTransform;
use bevy::window::SystemCursorIcon;

use super::{
    GradientEditChangeEvent, GradientEditSelectEvent, GradientEditState, StopHandle,
    TinctGradientEdit, interpolated_stop, remove_active_stop,
};
use crate::color_picker::mappers;
use crate::cursor::ActiveCursor;

#[derive(Component, Default)]
pub(super) struct DraggingStop;

/// Click on the bar itself: add a stop at the cursor, colored by its
/// neighbors, and select it. Presses on stop handles keep their own target
/// and fall through the track lookup here.
pub(super) fn on_track_press(
    event: On<Pointer<Press>>,
    mut commands: Commands,
    tracks: Query<(&ComputedNode, &UiGlobalTransform), With<TinctGradientEdit>>,
    mut editors: Query<&mut GradientEditState>,
) {
    let target = event.event_target();
    let Ok((computed, ui_transform)) = tracks.get(target) else {
        return;
    };
    let Ok(mut state) = editors.get_mut(target) else {
        return;
    };

    let cursor_pos = event.pointer_location.position / computed.inverse_scale_factor;
    let Some(normalized) = computed.normalize_point(*ui_transform, cursor_pos) else {
        return;
    };

    let position = mappers::position_at(normalized.x);
    let stop = interpolated_stop(&state.stops, position);
    state.stops.push(stop);
    state.active = state.stops.len() - 1;

    commands.trigger(GradientEditChangeEvent {
        entity: target,
        stops: state.stops.clone(),
    });
    commands.trigger(GradientEditSelectEvent {
        entity: target,
        stop,
        index: state.active,
    });
}

pub(super) fn on_stop_press(
    event: On<Pointer<Press>>,
    mut commands: Commands,
    handles: Query<&StopHandle>,
    mut editors: Query<&mut GradientEditState>,
) {
    let Ok(handle) = handles.get(event.event_target()) else {
        return;
    };
    let Ok(mut state) = editors.get_mut(handle.editor) else {
        return;
    };
    let Some(stop) = state.stops.get(handle.index).copied() else {
        return;
    };

    state.active = handle.index;

    commands.trigger(GradientEditSelectEvent {
        entity: handle.editor,
        stop,
        index: handle.index,
    });
}

pub(super) fn on_stop_drag_start(
    event: On<Pointer<DragStart>>,
    mut commands: Commands,
    handles: Query<&StopHandle>,
) {
    if handles.get(event.event_target()).is_err() {
        return;
    }
    commands.entity(event.event_target()).insert((
        DraggingStop,
        ActiveCursor(SystemCursorIcon::Grabbing),
    ));
}

/// Drag moves only the grabbed stop's position, clamped to the track.
/// Stops may cross each other freely; ordering is re-derived from
/// positions wherever it matters.
pub(super) fn on_stop_drag(
    event: On<Pointer<Drag>>,
    mut commands: Commands,
    handles: Query<&StopHandle, With<DraggingStop>>,
    tracks: Query<(&ComputedNode, &UiGlobalTransform), With<TinctGradientEdit>>,
    mut editors: Query<&mut GradientEditState>,
) {
    let Ok(handle) = handles.get(event.event_target()) else {
        return;
    };
    let Ok((computed, ui_transform)) = tracks.get(handle.editor) else {
        return;
    };
    let Ok(mut state) = editors.get_mut(handle.editor) else {
        return;
    };

    let cursor_pos = event.pointer_location.position / computed.inverse_scale_factor;
    let Some(normalized) = computed.normalize_point(*ui_transform, cursor_pos) else {
        return;
    };

    let index = handle.index;
    let Some(stop) = state.stops.get_mut(index) else {
        return;
    };
    stop.position = mappers::position_at(normalized.x);

    commands.trigger(GradientEditChangeEvent {
        entity: handle.editor,
        stops: state.stops.clone(),
    });
}

pub(super) fn on_stop_drag_end(
    event: On<Pointer<DragEnd>>,
    mut commands: Commands,
    handles: Query<&StopHandle>,
) {
    if handles.get(event.event_target()).is_err() {
        return;
    }
    commands
        .entity(event.event_target())
        .remove::<(DraggingStop, ActiveCursor)>();
}

/// Delete/Backspace removes the active stop of every editor that can spare
/// one. Suppressed while a text input owns the keyboard. The list never
/// becomes empty; the selection resets to the first stop.
pub(super) fn handle_stop_removal(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    focus: Res<InputFocus>,
    mut editors: Query<(Entity, &mut GradientEditState)>,
) {
    let delete_pressed =
        keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace);
    if !delete_pressed || focus.0.is_some() {
        return;
    }

    for (entity, mut state) in &mut editors {
        let GradientEditState { stops, active } = &mut *state;
        if !remove_active_stop(stops, active) {
            continue;
        }

        let first = state.stops[0];
        commands.trigger(GradientEditChangeEvent {
            entity,
            stops: state.stops.clone(),
        });
        commands.trigger(GradientEditSelectEvent {
            entity,
            stop: first,
            index: 0,
        });
    }
}
