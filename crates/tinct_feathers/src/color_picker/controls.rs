use bevy::picking::events::{DragEnd, DragStart, Press, Release};
use bevy::prelude::*;
use bevy::ui::UiGlobalTransform;

use super::mappers;
use super::{AlphaSlider, ColorPickerState, HueSlider, SvSurface, emit_commit, emit_live_change};

/// Marks a control whose gesture is in flight. Inserted on drag start,
/// removed on every drag exit path. While present, plain release events
/// must not double-commit.
#[derive(Component, Default)]
pub(super) struct Dragging;

/// A track the pointer can write through: it knows which picker it belongs
/// to and which axes of the shared state it maps onto.
pub(super) trait PickerControl: Component {
    fn picker_entity(&self) -> Entity;
    fn update_state(&self, state: &mut ColorPickerState, normalized: Vec2);
}

impl PickerControl for SvSurface {
    fn picker_entity(&self) -> Entity {
        self.0
    }

    fn update_state(&self, state: &mut ColorPickerState, normalized: Vec2) {
        let (s, v) = mappers::saturation_value_at(normalized);
        let mut hsva = state.hsva();
        hsva.s = s;
        hsva.v = v;
        state.set_from_hsva(hsva);
    }
}

impl PickerControl for HueSlider {
    fn picker_entity(&self) -> Entity {
        self.0
    }

    fn update_state(&self, state: &mut ColorPickerState, normalized: Vec2) {
        let mut hsva = state.hsva();
        hsva.h = mappers::hue_at(normalized.x);
        state.set_from_hsva(hsva);
    }
}

impl PickerControl for AlphaSlider {
    fn picker_entity(&self) -> Entity {
        self.0
    }

    fn update_state(&self, state: &mut ColorPickerState, normalized: Vec2) {
        let mut hsva = state.hsva();
        hsva.a = mappers::alpha_at(normalized.x);
        state.set_from_hsva(hsva);
    }
}

/// Click-to-jump: a press anywhere on the track applies the value at the
/// cursor immediately.
pub(super) fn on_control_press<C: PickerControl>(
    event: On<Pointer<Press>>,
    mut commands: Commands,
    controls: Query<(&C, &ComputedNode, &UiGlobalTransform)>,
    mut pickers: Query<&mut ColorPickerState>,
) {
    let Ok((control, computed, ui_transform)) = controls.get(event.event_target()) else {
        return;
    };
    let picker_entity = control.picker_entity();

    let cursor_pos = event.pointer_location.position / computed.inverse_scale_factor;
    let Some(normalized) = computed.normalize_point(*ui_transform, cursor_pos) else {
        return;
    };

    let Ok(mut state) = pickers.get_mut(picker_entity) else {
        return;
    };

    control.update_state(&mut state, normalized);
    emit_live_change(&mut commands, picker_entity, &mut state);
}

/// A press-release without a drag in between finishes the gesture here.
pub(super) fn on_control_release<C: PickerControl>(
    event: On<Pointer<Release>>,
    mut commands: Commands,
    controls: Query<&C, Without<Dragging>>,
    pickers: Query<&ColorPickerState>,
) {
    let Ok(control) = controls.get(event.event_target()) else {
        return;
    };
    let picker_entity = control.picker_entity();

    if let Ok(state) = pickers.get(picker_entity) {
        emit_commit(&mut commands, picker_entity, state);
    }
}

pub(super) fn on_control_drag_start<C: PickerControl>(
    event: On<Pointer<DragStart>>,
    mut commands: Commands,
    controls: Query<(&C, &ComputedNode, &UiGlobalTransform)>,
    mut pickers: Query<&mut ColorPickerState>,
) {
    let Ok((control, computed, ui_transform)) = controls.get(event.event_target()) else {
        return;
    };
    let picker_entity = control.picker_entity();

    commands.entity(event.event_target()).insert(Dragging);

    let cursor_pos = event.pointer_location.position / computed.inverse_scale_factor;
    let Some(normalized) = computed.normalize_point(*ui_transform, cursor_pos) else {
        return;
    };

    let Ok(mut state) = pickers.get_mut(picker_entity) else {
        return;
    };

    control.update_state(&mut state, normalized);
    emit_live_change(&mut commands, picker_entity, &mut state);
}

/// Live updates keep flowing while the button is held, even once the
/// cursor leaves the track: pointer capture keeps delivering drag events,
/// and the mappers clamp the overshoot.
pub(super) fn on_control_drag<C: PickerControl>(
    event: On<Pointer<Drag>>,
    mut commands: Commands,
    controls: Query<(&C, &ComputedNode, &UiGlobalTransform), With<Dragging>>,
    mut pickers: Query<&mut ColorPickerState>,
) {
    let Ok((control, computed, ui_transform)) = controls.get(event.event_target()) else {
        return;
    };
    let picker_entity = control.picker_entity();

    let cursor_pos = event.pointer_location.position / computed.inverse_scale_factor;
    let Some(normalized) = computed.normalize_point(*ui_transform, cursor_pos) else {
        return;
    };

    let Ok(mut state) = pickers.get_mut(picker_entity) else {
        return;
    };

    control.update_state(&mut state, normalized);
    emit_live_change(&mut commands, picker_entity, &mut state);
}

/// Releasing the pointer ends the drag unconditionally and commits exactly
/// once, after the last live update.
pub(super) fn on_control_drag_end<C: PickerControl>(
    event: On<Pointer<DragEnd>>,
    mut commands: Commands,
    controls: Query<&C>,
    pickers: Query<&ColorPickerState>,
) {
    let Ok(control) = controls.get(event.event_target()) else {
        return;
    };
    let picker_entity = control.picker_entity();

    commands.entity(event.event_target()).remove::<Dragging>();

    if let Ok(state) = pickers.get(picker_entity) {
        emit_commit(&mut commands, picker_entity, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinct_color::Rgba;

    #[test]
    fn surface_writes_saturation_and_value_only() {
        let mut state = ColorPickerState::default();
        let surface = SvSurface(Entity::PLACEHOLDER);

        surface.update_state(&mut state, Vec2::new(0.0, 0.0));
        let hsva = state.hsva();
        assert_eq!((hsva.s, hsva.v), (50.0, 50.0));
        assert_eq!(hsva.h, 0.0);
        assert_eq!(hsva.a, 1.0);
    }

    #[test]
    fn hue_track_right_edge_renders_like_zero() {
        let mut state = ColorPickerState::default();
        let slider = HueSlider(Entity::PLACEHOLDER);

        // Rightmost pixel of the track.
        slider.update_state(&mut state, Vec2::new(0.5, 0.0));
        assert_eq!(state.hsva().h, 360.0);
        assert_eq!(state.rgba(), Rgba::RED);
    }

    #[test]
    fn alpha_slider_touches_alpha_only() {
        let mut state = ColorPickerState::default();
        let slider = AlphaSlider(Entity::PLACEHOLDER);

        slider.update_state(&mut state, Vec2::new(-0.25, 0.0));
        let hsva = state.hsva();
        assert_eq!(hsva.a, 0.25);
        assert_eq!((hsva.h, hsva.s, hsva.v), (0.0, 100.0, 100.0));
    }
}
