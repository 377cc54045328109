mod controls;

use bevy::picking::prelude::Pickable;
use bevy::prelude::*;

use tinct_color::{ColorStop, Rgba, color_at, default_stops, find_range};

use crate::render;
use crate::tokens::{CORNER_RADIUS, GRADIENT_BAR_HEIGHT, PRIMARY_COLOR, STOP_HANDLE_SIZE};

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            setup_gradient_edit,
            update_gradient_edit,
            controls::handle_stop_removal,
        ),
    );
}

/// The gradient-stop editor: a baked gradient bar with draggable stop
/// handles floating above it. Click the bar to add a stop, drag a handle to
/// move it, Delete/Backspace to remove the selected one.
#[derive(Component)]
pub struct TinctGradientEdit;

#[derive(Component, Clone)]
pub struct GradientEditState {
    /// List order is creation order; rendering and derivation sort by
    /// position. Never empty.
    pub stops: Vec<ColorStop>,
    /// Index into `stops` (list order, not sorted order).
    pub active: usize,
}

impl Default for GradientEditState {
    fn default() -> Self {
        Self {
            stops: default_stops(),
            active: 0,
        }
    }
}

pub struct GradientEditProps {
    pub stops: Vec<ColorStop>,
    pub active: usize,
}

impl Default for GradientEditProps {
    fn default() -> Self {
        Self {
            stops: default_stops(),
            active: 0,
        }
    }
}

impl GradientEditProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stops(mut self, stops: Vec<ColorStop>) -> Self {
        if !stops.is_empty() {
            self.stops = stops;
        }
        self
    }

    pub fn with_active(mut self, active: usize) -> Self {
        self.active = active;
        self
    }
}

pub fn gradient_edit(props: GradientEditProps) -> impl Bundle {
    let GradientEditProps { stops, active } = props;
    let active = active.min(stops.len().saturating_sub(1));

    (
        TinctGradientEdit,
        GradientEditState { stops, active },
        Node {
            width: percent(100),
            height: px(GRADIENT_BAR_HEIGHT),
            // Room for the stop handles hanging above the bar.
            margin: UiRect::top(px(STOP_HANDLE_SIZE + 12.0)),
            ..default()
        },
    )
}

/// The full stop list after an add, move or removal.
#[derive(EntityEvent)]
pub struct GradientEditChangeEvent {
    pub entity: Entity,
    pub stops: Vec<ColorStop>,
}

/// A stop became the active selection.
#[derive(EntityEvent)]
pub struct GradientEditSelectEvent {
    pub entity: Entity,
    pub stop: ColorStop,
    pub index: usize,
}

#[derive(Component)]
pub(crate) struct GradientBarImage {
    pub(crate) editor: Entity,
    pub(crate) baked: Option<Vec<ColorStop>>,
    pub(crate) baked_size: UVec2,
}

#[derive(Component)]
pub(crate) struct StopHandle {
    pub(crate) editor: Entity,
    pub(crate) index: usize,
}

#[derive(Component)]
pub(crate) struct StopSwatchImage {
    pub(crate) index: usize,
    pub(crate) baked: Option<Rgba>,
}

/// The color a stop added at `position` starts with: its neighbors mixed
/// at the proportional fraction, or the nearest end color when the click
/// lands outside every pair.
pub(crate) fn interpolated_stop(stops: &[ColorStop], position: f32) -> ColorStop {
    let value = match find_range(stops, position) {
        Some((before, after)) => {
            let span = after.position - before.position;
            let fraction = if span > 0.0 {
                (position - before.position) / span
            } else {
                0.0
            };
            before.value.mix(after.value, fraction * 100.0)
        }
        None => color_at(stops, position),
    };
    ColorStop::new(position, value)
}

/// Remove the active stop, keeping the list non-empty and resetting the
/// selection to the first stop. Returns false when removal is not allowed.
pub(crate) fn remove_active_stop(stops: &mut Vec<ColorStop>, active: &mut usize) -> bool {
    if stops.len() <= 1 {
        return false;
    }
    let index = (*active).min(stops.len() - 1);
    stops.remove(index);
    *active = 0;
    true
}

fn setup_gradient_edit(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    editors: Query<Entity, Added<TinctGradientEdit>>,
) {
    for editor in &editors {
        let bar_handle = images.add(render::placeholder_image());

        commands
            .entity(editor)
            .observe(controls::on_track_press)
            .with_children(|parent| {
                parent.spawn((
                    GradientBarImage {
                        editor,
                        baked: None,
                        baked_size: UVec2::ZERO,
                    },
                    Pickable::IGNORE,
                    ImageNode::new(bar_handle),
                    Node {
                        position_type: PositionType::Absolute,
                        width: percent(100.0),
                        height: percent(100.0),
                        border_radius: BorderRadius::all(CORNER_RADIUS),
                        overflow: Overflow::clip(),
                        ..default()
                    },
                ));
            });
    }
}

/// Keep the bar texture and the stop handles in step with the state:
/// re-bake the bar when stops or size change, rebuild handles when the
/// count changes, and refresh positions/selection styling in place.
fn update_gradient_edit(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    editors: Query<(Entity, &GradientEditState, &ComputedNode)>,
    mut bar_images: Query<(&mut GradientBarImage, &ImageNode, &ComputedNode)>,
    mut handles: Query<(Entity, &StopHandle, &mut Node, &mut Outline, &mut ZIndex)>,
    mut swatches: Query<(&ChildOf, &mut StopSwatchImage, &ImageNode)>,
) {
    use bevy::color::palettes::css;

    for (mut marker, image_node, computed) in &mut bar_images {
        let Ok((_, state, _)) = editors.get(marker.editor) else {
            continue;
        };
        let size = computed.size().as_uvec2();
        if size.x == 0 || size.y == 0 {
            continue;
        }
        if marker.baked.as_deref() == Some(state.stops.as_slice()) && marker.baked_size == size {
            continue;
        }
        if let Some(image) = images.get_mut(&image_node.image) {
            *image = render::make_ui_image(
                size.x,
                size.y,
                render::gradient_bar_pixels(&state.stops, size.x, size.y),
            );
            marker.baked = Some(state.stops.clone());
            marker.baked_size = size;
        }
    }

    for (editor, state, computed) in &editors {
        let existing = handles
            .iter()
            .filter(|(_, handle, ..)| handle.editor == editor)
            .count();

        if existing != state.stops.len() {
            for (entity, handle, ..) in &handles {
                if handle.editor == editor {
                    commands.entity(entity).try_despawn();
                }
            }
            spawn_stop_handles(&mut commands, &mut images, editor, state);
            continue;
        }

        let track_width = computed.size().x * computed.inverse_scale_factor();
        if track_width <= 0.0 {
            continue;
        }

        for (entity, handle, mut node, mut outline, mut z_index) in &mut handles {
            if handle.editor != editor {
                continue;
            }
            let Some(stop) = state.stops.get(handle.index) else {
                continue;
            };

            let left = px(stop.position * track_width - STOP_HANDLE_SIZE / 2.0);
            if node.left != left {
                node.left = left;
            }

            let is_active = handle.index == state.active;
            outline.width = px(if is_active { 2.0 } else { 1.0 });
            outline.color = if is_active {
                PRIMARY_COLOR.into()
            } else {
                css::SILVER.into()
            };
            let z = ZIndex(if is_active { 10 } else { 1 });
            if z_index.0 != z.0 {
                *z_index = z;
            }

            for (child_of, mut swatch, image_node) in &mut swatches {
                if child_of.parent() != entity || swatch.index != handle.index {
                    continue;
                }
                if swatch.baked == Some(stop.value) {
                    continue;
                }
                let inner = (STOP_HANDLE_SIZE - 6.0) as u32;
                if let Some(image) = images.get_mut(&image_node.image) {
                    *image = render::make_ui_image(
                        inner,
                        inner,
                        render::stop_swatch_pixels(stop.value, inner, 2),
                    );
                    swatch.baked = Some(stop.value);
                }
            }
        }
    }
}

fn spawn_stop_handles(
    commands: &mut Commands,
    images: &mut Assets<Image>,
    editor: Entity,
    state: &GradientEditState,
) {
    for (index, _stop) in state.stops.iter().enumerate() {
        let swatch_handle = images.add(render::placeholder_image());

        commands
            .entity(editor)
            .with_children(|parent| {
                parent
                    .spawn((
                        StopHandle { editor, index },
                        Node {
                            position_type: PositionType::Absolute,
                            top: px(-(STOP_HANDLE_SIZE + 8.0)),
                            width: px(STOP_HANDLE_SIZE),
                            height: px(STOP_HANDLE_SIZE),
                            padding: UiRect::all(px(3.0)),
                            border_radius: BorderRadius::all(CORNER_RADIUS),
                            ..default()
                        },
                        BackgroundColor(Color::WHITE),
                        Outline {
                            width: px(1.0),
                            color: bevy::color::palettes::css::SILVER.into(),
                            ..default()
                        },
                        ZIndex(1),
                        children![(
                            StopSwatchImage { index, baked: None },
                            Pickable::IGNORE,
                            ImageNode::new(swatch_handle),
                            Node {
                                width: percent(100.0),
                                height: percent(100.0),
                                ..default()
                            },
                        )],
                    ))
                    .observe(controls::on_stop_press)
                    .observe(controls::on_stop_drag_start)
                    .observe(controls::on_stop_drag)
                    .observe(controls::on_stop_drag_end);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_stop_mixes_its_neighbors() {
        let stops = vec![
            ColorStop::new(0.0, Rgba::new(255, 0, 0, 1.0)),
            ColorStop::new(1.0, Rgba::new(255, 0, 0, 0.0)),
        ];
        let stop = interpolated_stop(&stops, 0.5);
        assert_eq!(stop.position, 0.5);
        assert_eq!((stop.value.r, stop.value.g, stop.value.b), (255, 0, 0));
        assert!((stop.value.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn added_stop_outside_span_takes_end_color() {
        let stops = vec![
            ColorStop::new(0.2, Rgba::RED),
            ColorStop::new(0.6, Rgba::rgb(0, 0, 255)),
        ];
        assert_eq!(interpolated_stop(&stops, 0.9).value, Rgba::rgb(0, 0, 255));
        assert_eq!(interpolated_stop(&stops, 0.1).value, Rgba::RED);
    }

    #[test]
    fn removal_keeps_at_least_one_stop() {
        let mut stops = vec![ColorStop::new(0.5, Rgba::RED)];
        let mut active = 0;
        assert!(!remove_active_stop(&mut stops, &mut active));
        assert_eq!(stops.len(), 1);
    }

    #[test]
    fn removal_resets_selection_to_first() {
        let mut stops = default_stops();
        stops.push(ColorStop::new(0.5, Rgba::rgb(0, 255, 0)));
        let mut active = 2;

        assert!(remove_active_stop(&mut stops, &mut active));
        assert_eq!(stops.len(), 2);
        assert_eq!(active, 0);
    }

    #[test]
    fn removal_revalidates_stale_active_index() {
        let mut stops = default_stops();
        let mut active = 9;
        assert!(remove_active_stop(&mut stops, &mut active));
        assert_eq!(stops.len(), 1);
        assert_eq!(active, 0);
    }
}
