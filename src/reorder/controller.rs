//! Drag-to-reorder state machine
//!
//! ```text
//! Idle --down on placeholder--> Pressed --long press--> Dragging --up--> Idle
//!              ^                   |                       |
//!              +---- slop/up/cancel+-------- cancel -------+
//! ```
//!
//! Placeholder screen rects are queried from the scene on every event.
//! Nothing is cached between moves because a parameter change can move
//! placeholders while a drag is in progress.

use log::{debug, trace};

use super::gesture::{GestureEvent, GestureId, GestureKind};
use crate::geometry::{Point, Rect};
use crate::scene::{self, NodeId, SceneError, SceneGraph};

/// Cues a shell turns into haptic or visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderEvent {
    /// Long press recognized on a placeholder
    DragStarted { source: NodeId },
    /// The hovered placeholder changed identity
    TargetChanged { target: NodeId },
    /// Two placeholders exchanged their slots
    Swapped { a: NodeId, b: NodeId },
    /// The gesture was cancelled, nothing changed
    DragCancelled { source: NodeId },
    /// Released outside every other placeholder, nothing changed
    NoTarget { source: NodeId },
}

/// Transient state of a drag in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub gesture: GestureId,
    pub source: NodeId,
    /// Last pointer position, screen units
    pub pointer: Point,
    /// Proxy rectangle following the pointer
    pub ghost: Rect,
    pub hovered: Option<NodeId>,
    pub hovered_rect: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Pressed {
        gesture: GestureId,
        source: NodeId,
        down: Point,
    },
    Dragging(DragState),
}

/// Result of feeding one gesture event to the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureOutcome {
    pub events: Vec<ReorderEvent>,
    /// A released drag that should swap these two placeholders
    pub commit: Option<(NodeId, NodeId)>,
}

impl GestureOutcome {
    fn event(event: ReorderEvent) -> Self {
        Self {
            events: vec![event],
            commit: None,
        }
    }
}

/// First placeholder whose rect contains `point`, bounds inclusive
pub fn hit_test(rects: &[(NodeId, Rect)], point: Point) -> Option<(NodeId, Rect)> {
    rects.iter().copied().find(|(_, rect)| rect.contains(point))
}

#[derive(Debug, Clone)]
pub struct ReorderController {
    state: State,
    touch_slop: f64,
}

impl ReorderController {
    pub fn new(touch_slop: f64) -> Self {
        Self {
            state: State::Idle,
            touch_slop,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    pub fn drag(&self) -> Option<&DragState> {
        match &self.state {
            State::Dragging(drag) => Some(drag),
            _ => None,
        }
    }

    pub fn ghost(&self) -> Option<Rect> {
        self.drag().map(|drag| drag.ghost)
    }

    pub fn target_rect(&self) -> Option<Rect> {
        self.drag().and_then(|drag| drag.hovered_rect)
    }

    /// Drop any press or drag without emitting events
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    /// Feed one gesture event. Events of a gesture other than the one being
    /// tracked are ignored.
    pub fn handle<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        event: GestureEvent,
    ) -> Result<GestureOutcome, SceneError> {
        match self.state {
            State::Idle => self.on_idle(scene, event),
            State::Pressed {
                gesture,
                source,
                down,
            } => {
                if event.id != gesture {
                    debug!(gesture = event.id.0; "Ignored event of another gesture");
                    return Ok(GestureOutcome::default());
                }
                self.on_pressed(scene, event, source, down)
            }
            State::Dragging(drag) => {
                if event.id != drag.gesture {
                    debug!(gesture = event.id.0; "Ignored event of another gesture");
                    return Ok(GestureOutcome::default());
                }
                self.on_dragging(scene, event, drag)
            }
        }
    }

    fn on_idle<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        event: GestureEvent,
    ) -> Result<GestureOutcome, SceneError> {
        if event.kind != GestureKind::PointerDown {
            return Ok(GestureOutcome::default());
        }
        let rects = scene::placeholder_screen_rects(scene)?;
        if let Some((source, _)) = hit_test(&rects, event.position) {
            trace!(source:%, x = event.position.x, y = event.position.y; "Pressed placeholder");
            self.state = State::Pressed {
                gesture: event.id,
                source,
                down: event.position,
            };
        }
        Ok(GestureOutcome::default())
    }

    fn on_pressed<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        event: GestureEvent,
        source: NodeId,
        down: Point,
    ) -> Result<GestureOutcome, SceneError> {
        match event.kind {
            GestureKind::PointerMove => {
                if down.distance(event.position) > self.touch_slop {
                    debug!(source:%; "Press moved beyond touch slop");
                    self.state = State::Idle;
                }
                Ok(GestureOutcome::default())
            }
            GestureKind::LongPress => {
                let (dx, dy) = event.position.delta(down);
                let ghost = scene.screen_rect(source)?.translate(dx, dy);
                let rects = scene::placeholder_screen_rects(scene)?;
                let hovered = hit_test(&rects, event.position);
                self.state = State::Dragging(DragState {
                    gesture: event.id,
                    source,
                    pointer: event.position,
                    ghost,
                    hovered: hovered.map(|(node, _)| node),
                    hovered_rect: hovered.map(|(_, rect)| rect),
                });
                debug!(source:%; "Drag started");
                Ok(GestureOutcome::event(ReorderEvent::DragStarted { source }))
            }
            GestureKind::PointerUp | GestureKind::Cancel => {
                self.state = State::Idle;
                Ok(GestureOutcome::default())
            }
            GestureKind::PointerDown => Ok(GestureOutcome::default()),
        }
    }

    fn on_dragging<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        event: GestureEvent,
        mut drag: DragState,
    ) -> Result<GestureOutcome, SceneError> {
        let source = drag.source;
        match event.kind {
            GestureKind::PointerMove => {
                let (dx, dy) = event.position.delta(drag.pointer);
                drag.ghost = drag.ghost.translate(dx, dy);
                drag.pointer = event.position;

                let rects = scene::placeholder_screen_rects(scene)?;
                let hovered = hit_test(&rects, event.position);
                let previous = drag.hovered;
                drag.hovered = hovered.map(|(node, _)| node);
                drag.hovered_rect = hovered.map(|(_, rect)| rect);
                self.state = State::Dragging(drag);

                trace!(x = event.position.x, y = event.position.y, hovered:? = drag.hovered; "Drag moved");
                match drag.hovered {
                    Some(target) if previous != Some(target) => Ok(GestureOutcome::event(
                        ReorderEvent::TargetChanged { target },
                    )),
                    _ => Ok(GestureOutcome::default()),
                }
            }
            GestureKind::PointerUp => {
                self.state = State::Idle;
                // The last move may not have reached us; resolve again at the release point
                let rects = scene::placeholder_screen_rects(scene)?;
                match hit_test(&rects, event.position) {
                    Some((target, _)) if target != source => {
                        debug!(source:%, target:%; "Drag released on target");
                        Ok(GestureOutcome {
                            events: Vec::new(),
                            commit: Some((source, target)),
                        })
                    }
                    _ => {
                        debug!(source:%; "Drag released without target");
                        Ok(GestureOutcome::event(ReorderEvent::NoTarget { source }))
                    }
                }
            }
            GestureKind::Cancel => {
                self.state = State::Idle;
                debug!(source:%; "Drag cancelled");
                Ok(GestureOutcome::event(ReorderEvent::DragCancelled { source }))
            }
            GestureKind::PointerDown | GestureKind::LongPress => Ok(GestureOutcome::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::scene::MemoryScene;

    fn scene() -> (MemoryScene, Vec<NodeId>) {
        let mut scene = MemoryScene::with_bundled_templates(Size::new(200.0, 200.0));
        scene.load_document("bundled://full_half_half.toml").unwrap();
        let page = scene.current_page().unwrap();
        scene.zoom_to_fit(page).unwrap();
        let placeholders = scene::image_placeholders(&scene).unwrap();
        (scene, placeholders)
    }

    fn center(scene: &MemoryScene, node: NodeId) -> Point {
        scene.screen_rect(node).unwrap().center()
    }

    const G: GestureId = GestureId(1);

    fn start_drag(
        controller: &mut ReorderController,
        scene: &MemoryScene,
        source: NodeId,
    ) -> GestureOutcome {
        let at = center(scene, source);
        controller.handle(scene, GestureEvent::down(G, at)).unwrap();
        controller
            .handle(scene, GestureEvent::long_press(G, at))
            .unwrap()
    }

    #[test]
    fn test_hit_test_is_inclusive() {
        let rects = vec![(NodeId(1), Rect::new(0.0, 0.0, 10.0, 10.0))];
        assert!(hit_test(&rects, Point::new(10.0, 10.0)).is_some());
        assert!(hit_test(&rects, Point::new(10.1, 5.0)).is_none());
    }

    #[test]
    fn test_long_press_starts_drag() {
        let (scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        let outcome = start_drag(&mut controller, &scene, nodes[0]);
        assert_eq!(
            outcome.events,
            vec![ReorderEvent::DragStarted { source: nodes[0] }]
        );
        let drag = controller.drag().unwrap();
        assert_eq!(drag.ghost, scene.screen_rect(nodes[0]).unwrap());
        assert_eq!(drag.hovered, Some(nodes[0]));
    }

    #[test]
    fn test_down_outside_placeholders_stays_idle() {
        let (scene, _) = scene();
        let mut controller = ReorderController::new(8.0);
        controller
            .handle(&scene, GestureEvent::down(G, Point::new(-50.0, -50.0)))
            .unwrap();
        assert!(controller.is_idle());
    }

    #[test]
    fn test_slop_cancels_pending_press() {
        let (scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        let at = center(&scene, nodes[0]);
        controller.handle(&scene, GestureEvent::down(G, at)).unwrap();
        controller
            .handle(&scene, GestureEvent::moved(G, Point::new(at.x + 3.0, at.y)))
            .unwrap();
        assert!(!controller.is_idle());
        controller
            .handle(&scene, GestureEvent::moved(G, Point::new(at.x + 20.0, at.y)))
            .unwrap();
        assert!(controller.is_idle());
        let outcome = controller
            .handle(&scene, GestureEvent::long_press(G, at))
            .unwrap();
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_move_tracks_ghost_and_target() {
        let (scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        start_drag(&mut controller, &scene, nodes[0]);
        let start_ghost = controller.ghost().unwrap();
        let from = center(&scene, nodes[0]);
        let to = center(&scene, nodes[2]);

        let outcome = controller
            .handle(&scene, GestureEvent::moved(G, to))
            .unwrap();
        assert_eq!(
            outcome.events,
            vec![ReorderEvent::TargetChanged { target: nodes[2] }]
        );
        let ghost = controller.ghost().unwrap();
        assert!(ghost.approx_eq(&start_ghost.translate(to.x - from.x, to.y - from.y), 1e-9));
        assert_eq!(
            controller.target_rect(),
            Some(scene.screen_rect(nodes[2]).unwrap())
        );

        // Same target again is not a new cue
        let nudge = Point::new(to.x + 1.0, to.y);
        let outcome = controller
            .handle(&scene, GestureEvent::moved(G, nudge))
            .unwrap();
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_release_on_other_placeholder_commits() {
        let (scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        start_drag(&mut controller, &scene, nodes[0]);
        let outcome = controller
            .handle(&scene, GestureEvent::up(G, center(&scene, nodes[2])))
            .unwrap();
        // No move arrived before the release; the target is resolved at the up position
        assert_eq!(outcome.commit, Some((nodes[0], nodes[2])));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_release_on_self_or_outside_is_no_target() {
        let (scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        start_drag(&mut controller, &scene, nodes[1]);
        let outcome = controller
            .handle(&scene, GestureEvent::up(G, center(&scene, nodes[1])))
            .unwrap();
        assert_eq!(outcome.commit, None);
        assert_eq!(
            outcome.events,
            vec![ReorderEvent::NoTarget { source: nodes[1] }]
        );

        start_drag(&mut controller, &scene, nodes[1]);
        let outcome = controller
            .handle(&scene, GestureEvent::up(G, Point::new(-10.0, -10.0)))
            .unwrap();
        assert_eq!(outcome.commit, None);
    }

    #[test]
    fn test_cancel_discards_drag() {
        let (scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        start_drag(&mut controller, &scene, nodes[0]);
        let outcome = controller
            .handle(&scene, GestureEvent::cancel(G, Point::new(0.0, 0.0)))
            .unwrap();
        assert_eq!(
            outcome.events,
            vec![ReorderEvent::DragCancelled { source: nodes[0] }]
        );
        assert!(controller.is_idle());
        assert_eq!(controller.ghost(), None);
    }

    #[test]
    fn test_other_gesture_is_ignored() {
        let (scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        start_drag(&mut controller, &scene, nodes[0]);
        let outcome = controller
            .handle(
                &scene,
                GestureEvent::up(GestureId(99), center(&scene, nodes[2])),
            )
            .unwrap();
        assert_eq!(outcome, GestureOutcome::default());
        assert!(controller.is_dragging());
    }

    #[test]
    fn test_rects_are_requeried_each_move() {
        let (mut scene, nodes) = scene();
        let mut controller = ReorderController::new(8.0);
        start_drag(&mut controller, &scene, nodes[0]);
        let probe = center(&scene, nodes[2]);

        // Move the target away mid-drag
        scene
            .set_rect(nodes[2], Rect::new(200.0, 200.0, 10.0, 10.0))
            .unwrap();
        let outcome = controller
            .handle(&scene, GestureEvent::moved(G, probe))
            .unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(controller.drag().unwrap().hovered, None);
    }
}
