//! The editing session exposed to a UI shell
//!
//! [`Editor`] owns the scene, the interactive parameters, the live layout
//! session and the reorder machinery, and serializes every mutation through
//! `&mut self`. The host drives it cooperatively: it forwards gestures, calls
//! [`Editor::tick`] once per frame and reads placeholder rects for its
//! overlay from [`Editor::overlay`].
//!
//! Only one component writes placeholder geometry at a time. Parameter
//! reactors are paused while a swap animation is in flight and catch up with
//! the latest values once it has finished.
//!
//! # Example
//!
//! ```rust
//! use collage_editor::{Editor, EditorConfig, MemoryScene};
//!
//! let config = EditorConfig::default();
//! let scene = MemoryScene::with_bundled_templates(config.viewport);
//! let mut editor = Editor::new(scene, config);
//!
//! let images: Vec<String> = ["a.jpg", "b.jpg", "c.jpg"].map(String::from).to_vec();
//! editor.assign_template("full-half-half", &images).unwrap();
//! editor.set_margin(4.0).unwrap();
//! editor.pump().unwrap();
//!
//! let overlay = editor.overlay();
//! assert_eq!(overlay.borrow().placeholders.len(), 3);
//! ```

use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::animation::SwapMotion;
use crate::color::Rgba;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::geometry::Rect;
use crate::layout::{self, LayoutSession, SessionId};
use crate::params::Parameters;
use crate::reactor::{self, ParameterReactor};
use crate::reorder::{swap_now, GestureEvent, ReorderController, ReorderEvent, SwapTransition};
use crate::scene::{self, NodeId, SceneError, SceneGraph};
use crate::template::TemplateRegistry;

/// Upper bound on frames [`Editor::settle`] steps before jumping to the end
const MAX_SETTLE_FRAMES: usize = 10_000;

/// What a shell draws on top of the scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFrame {
    /// Current screen rect of every placeholder
    pub placeholders: Vec<(NodeId, Rect)>,
    /// Drag proxy following the finger
    pub ghost: Option<Rect>,
    /// Highlighted swap target
    pub target: Option<Rect>,
}

/// How reorder mode is left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderExit {
    /// Keep the swaps made while in reorder mode
    Apply,
    /// Put every placeholder back into the slot it had on entry
    Cancel,
}

#[derive(Debug, Clone)]
struct ReorderSnapshot {
    session: SessionId,
    slots: Vec<usize>,
}

/// Placeholder layout and reorder engine over a scene graph
pub struct Editor<S: SceneGraph> {
    scene: S,
    config: EditorConfig,
    parameters: Parameters,
    session: Option<LayoutSession>,
    next_session: SessionId,
    reactor: Option<ParameterReactor>,
    controller: ReorderController,
    transition: Option<SwapTransition>,
    reorder: Option<ReorderSnapshot>,
    overlay: watch::Sender<OverlayFrame>,
}

impl<S: SceneGraph> Editor<S> {
    pub fn new(scene: S, config: EditorConfig) -> Self {
        Self {
            scene,
            parameters: Parameters::new(config.defaults),
            controller: ReorderController::new(config.touch_slop),
            config,
            session: None,
            next_session: SessionId(1),
            reactor: None,
            transition: None,
            reorder: None,
            overlay: watch::Sender::new(OverlayFrame::default()),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn session(&self) -> Option<&LayoutSession> {
        self.session.as_ref()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// `true` while an animated swap has not reached its final geometry
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn in_reorder_mode(&self) -> bool {
        self.reorder.is_some()
    }

    /// Latest-value stream of overlay frames
    pub fn overlay(&self) -> watch::Receiver<OverlayFrame> {
        self.overlay.subscribe()
    }

    /// Switch to the template called `name` and bind `images` to it.
    ///
    /// A failed switch leaves the scene, the current session and its
    /// reactors exactly as they were. On success the previous session's
    /// reactors, drag and swap are cancelled, and the current parameter
    /// values are applied to the new placeholders.
    pub fn assign_template(
        &mut self,
        name: &str,
        images: &[String],
    ) -> Result<SessionId, EditorError> {
        let template = TemplateRegistry::find(name)?;
        if images.len() != template.placeholder_count {
            return Err(EditorError::asset_count(
                template.name,
                template.placeholder_count,
                images.len(),
            ));
        }

        let id = self.next_session;
        let saved = self.scene.snapshot();
        let session = match layout::assign(&mut self.scene, template, images, id) {
            Ok(session) => session,
            Err(err) => {
                self.scene.restore(saved);
                warn!(template = template.name, error:% = err; "Template switch failed");
                return Err(err);
            }
        };
        self.next_session = id.next();

        if let Some(mut previous) = self.reactor.take() {
            previous.cancel_all();
        }
        self.transition = None;
        self.controller.reset();
        self.reorder = None;
        self.reactor = Some(ParameterReactor::new(id, &self.parameters));
        self.session = Some(session);
        info!(session:% = id, template = template.name; "Started layout session");

        self.pump()?;
        self.publish_overlay()?;
        Ok(id)
    }

    /// Publish a new margin. Applied by the next [`Editor::pump`].
    pub fn set_margin(&mut self, margin: f64) -> Result<f64, EditorError> {
        self.require_session()?;
        self.parameters.set_margin(margin)
    }

    /// Publish a new corner radius. Applied by the next [`Editor::pump`].
    pub fn set_corner_radius(&mut self, radius: f64) -> Result<f64, EditorError> {
        self.require_session()?;
        self.parameters.set_corner_radius(radius)
    }

    pub fn set_background_color(&mut self, color: Rgba) -> Result<(), EditorError> {
        self.require_session()?;
        self.parameters.set_background(color);
        Ok(())
    }

    /// Apply pending parameter values and record them as one undo step,
    /// as when a slider drag ends
    pub fn commit_parameters(&mut self) -> Result<(), EditorError> {
        self.require_session()?;
        self.pump()?;
        self.scene.add_undo_checkpoint();
        debug!(
            margin = self.parameters.margin(),
            radius = self.parameters.corner_radius();
            "Committed parameters"
        );
        Ok(())
    }

    /// Apply the latest value of every parameter that changed.
    ///
    /// Does nothing while a swap is animating or before a template is
    /// assigned. Returns the number of reactors that wrote to the scene.
    pub fn pump(&mut self) -> Result<usize, EditorError> {
        if self.transition.is_some() {
            return Ok(0);
        }
        let (Some(reactor), Some(session)) = (self.reactor.as_mut(), self.session.as_ref())
        else {
            return Ok(0);
        };
        let applied = reactor.pump(&mut self.scene, session)?;
        if applied > 0 {
            self.publish_overlay()?;
        }
        Ok(applied)
    }

    /// Feed one gesture event to the reorder controller.
    ///
    /// A release on another placeholder swaps the two. Gestures that arrive
    /// while a swap is animating are ignored.
    pub fn handle_gesture(
        &mut self,
        event: GestureEvent,
    ) -> Result<Vec<ReorderEvent>, EditorError> {
        self.require_session()?;
        if self.transition.is_some() {
            debug!(gesture = event.id.0; "Ignored gesture during swap animation");
            return Ok(Vec::new());
        }
        let outcome = self.controller.handle(&self.scene, event)?;
        let mut events = outcome.events;
        if let Some((source, target)) = outcome.commit {
            events.extend(self.begin_swap(source, target)?);
        }
        self.publish_overlay()?;
        Ok(events)
    }

    /// Swap two placeholders the same way a released drag does.
    ///
    /// A swap still animating is finished first. Swapping a placeholder
    /// with itself does nothing.
    pub fn swap_placeholders(
        &mut self,
        a: NodeId,
        b: NodeId,
    ) -> Result<Vec<ReorderEvent>, EditorError> {
        self.require_session()?;
        self.finish_transition()?;
        let events = self.begin_swap(a, b)?;
        self.publish_overlay()?;
        Ok(events)
    }

    /// Advance the animated swap by `dt`, or pump the reactors when no swap
    /// is in flight. Returns `true` while a swap is still animating.
    pub fn tick(&mut self, dt: Duration) -> Result<bool, EditorError> {
        let Some(transition) = self.transition.as_mut() else {
            self.pump()?;
            return Ok(false);
        };
        let done = transition.step(&mut self.scene, dt)?;
        if done {
            self.transition = None;
            self.scene.add_undo_checkpoint();
        }
        self.publish_overlay()?;
        Ok(!done)
    }

    /// Run the animated swap to completion in frame-sized steps, then apply
    /// the parameter values that were held back meanwhile
    pub fn settle(&mut self) -> Result<(), EditorError> {
        let frame = self.config.frame_interval();
        let mut frames = 0;
        while self.transition.is_some() {
            if frames == MAX_SETTLE_FRAMES {
                warn!(frames; "Swap animation did not settle, jumping to the end");
                self.finish_transition()?;
                break;
            }
            self.tick(frame)?;
            frames += 1;
        }
        self.pump()?;
        Ok(())
    }

    /// Start a reorder session. Swaps made until [`Editor::exit_reorder`]
    /// can be applied or cancelled as a whole.
    pub fn enter_reorder(&mut self) -> Result<(), EditorError> {
        let session = self.require_session()?;
        if self.reorder.is_some() {
            return Ok(());
        }
        let snapshot = ReorderSnapshot {
            session: session.id(),
            slots: session.slot_assignment(),
        };
        info!(session:% = snapshot.session; "Entered reorder mode");
        self.reorder = Some(snapshot);
        Ok(())
    }

    pub fn exit_reorder(&mut self, exit: ReorderExit) -> Result<(), EditorError> {
        self.require_session()?;
        let Some(snapshot) = self.reorder.take() else {
            debug!("Not in reorder mode");
            return Ok(());
        };
        self.finish_transition()?;
        self.controller.reset();

        if exit == ReorderExit::Cancel {
            let session = self.session.as_mut().ok_or(EditorError::NoActiveSession)?;
            if snapshot.session == session.id()
                && session.restore_slot_assignment(&snapshot.slots)
            {
                reactor::apply_margin(
                    &mut self.scene,
                    session,
                    self.parameters.margin(),
                    self.parameters.corner_radius(),
                )?;
                for placeholder in session.placeholders() {
                    self.scene.set_content_fill_mode(
                        placeholder.id,
                        scene::ContentFillMode::Cover,
                    )?;
                }
            }
        }
        self.scene.add_undo_checkpoint();
        info!(exit:?; "Left reorder mode");
        self.publish_overlay()?;
        Ok(())
    }

    fn require_session(&self) -> Result<&LayoutSession, EditorError> {
        self.session.as_ref().ok_or(EditorError::NoActiveSession)
    }

    fn begin_swap(&mut self, a: NodeId, b: NodeId) -> Result<Vec<ReorderEvent>, EditorError> {
        let session = self.session.as_mut().ok_or(EditorError::NoActiveSession)?;
        if a == b {
            return Ok(Vec::new());
        }
        for node in [a, b] {
            if !session.contains(node) {
                return Err(SceneError::InvalidHandle(node).into());
            }
        }

        if self.config.swap == SwapMotion::Instant {
            swap_now(&mut self.scene, a, b)?;
            session.swap_slots(a, b);
            self.scene.add_undo_checkpoint();
        } else {
            let Some(mut transition) =
                SwapTransition::begin(&self.scene, a, b, self.config.swap)?
            else {
                return Ok(Vec::new());
            };
            session.swap_slots(a, b);
            if transition.step(&mut self.scene, Duration::ZERO)? {
                self.scene.add_undo_checkpoint();
            } else {
                self.transition = Some(transition);
            }
        }
        debug!(a:%, b:%, animated = self.transition.is_some(); "Committed swap");
        Ok(vec![ReorderEvent::Swapped { a, b }])
    }

    fn finish_transition(&mut self) -> Result<(), EditorError> {
        if let Some(transition) = self.transition.take() {
            transition.complete(&mut self.scene)?;
            self.scene.add_undo_checkpoint();
        }
        Ok(())
    }

    fn publish_overlay(&self) -> Result<(), SceneError> {
        let placeholders = if self.session.is_some() {
            scene::placeholder_screen_rects(&self.scene)?
        } else {
            Vec::new()
        };
        self.overlay.send_replace(OverlayFrame {
            placeholders,
            ghost: self.controller.ghost(),
            target: self.controller.target_rect(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SwapMotion;
    use crate::scene::MemoryScene;

    fn editor(swap: SwapMotion) -> Editor<MemoryScene> {
        let config = EditorConfig::default().with_swap(swap);
        let scene = MemoryScene::with_bundled_templates(config.viewport);
        Editor::new(scene, config)
    }

    fn images() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn test_setters_need_a_session() {
        let mut editor = editor(SwapMotion::Instant);
        assert_eq!(editor.set_margin(3.0), Err(EditorError::NoActiveSession));
        assert_eq!(
            editor.set_background_color(Rgba::WHITE),
            Err(EditorError::NoActiveSession)
        );
        assert_eq!(editor.enter_reorder(), Err(EditorError::NoActiveSession));
        assert_eq!(editor.parameters().margin(), 1.0);
        assert_eq!(editor.pump(), Ok(0));
    }

    #[test]
    fn test_session_ids_increase_per_switch() {
        let mut editor = editor(SwapMotion::Instant);
        let first = editor.assign_template("full-half-half", &images()).unwrap();
        let second = editor.assign_template("Bonjour", &images()).unwrap();
        assert!(second > first);
        assert_eq!(editor.session().unwrap().id(), second);
    }

    #[test]
    fn test_unknown_template() {
        let mut editor = editor(SwapMotion::Instant);
        let result = editor.assign_template("Birthday", &images());
        assert!(matches!(result, Err(EditorError::Template(_))));
    }

    #[test]
    fn test_animated_swap_pauses_reactors() {
        let mut editor = editor(SwapMotion::default());
        editor.assign_template("full-half-half", &images()).unwrap();
        let ids: Vec<NodeId> = editor
            .session()
            .unwrap()
            .placeholders()
            .iter()
            .map(|p| p.id)
            .collect();

        let events = editor.swap_placeholders(ids[0], ids[1]).unwrap();
        assert_eq!(events, vec![ReorderEvent::Swapped { a: ids[0], b: ids[1] }]);
        assert!(editor.is_animating());

        editor.set_margin(6.0).unwrap();
        assert_eq!(editor.pump().unwrap(), 0);
        editor.settle().unwrap();
        assert!(!editor.is_animating());

        // Margin applied after the swap, from the swapped slots
        let session = editor.session().unwrap();
        let moved = session.placeholder(ids[0]).unwrap();
        assert_eq!(moved.slot(), 1);
        let expected = reactor::inset_slot(session.origin_of(moved), 6.0);
        let factor = reactor::group_scale_factor(session.group_base_size(), 6.0);
        let actual = editor.scene().rect(ids[0]).unwrap();
        assert!((actual.width - expected.width * factor).abs() < 1e-9);
    }

    #[test]
    fn test_swap_rejects_foreign_nodes() {
        let mut editor = editor(SwapMotion::Instant);
        editor.assign_template("full-half-half", &images()).unwrap();
        let a = editor.session().unwrap().placeholders()[0].id;
        let result = editor.swap_placeholders(a, NodeId(999));
        assert_eq!(
            result,
            Err(EditorError::Scene(SceneError::InvalidHandle(NodeId(999))))
        );
        assert_eq!(editor.swap_placeholders(a, a), Ok(Vec::new()));
    }

    #[test]
    fn test_exit_without_enter_is_noop() {
        let mut editor = editor(SwapMotion::Instant);
        editor.assign_template("full-half-half", &images()).unwrap();
        let checkpoints = editor.scene().checkpoint_count();
        editor.exit_reorder(ReorderExit::Apply).unwrap();
        assert_eq!(editor.scene().checkpoint_count(), checkpoints);
    }
}
