//! Parameter reactors
//!
//! A [`ParameterReactor`] keeps the placeholders of one [`LayoutSession`] in
//! step with the interactive [`Parameters`]. Geometry is always derived from
//! the slot origins captured at assignment time, never from the geometry left
//! behind by the previous value, so repeated slider motion cannot drift.
//!
//! The reactor remembers the session it was created for and drops every
//! update once a different session is live. Template switches reuse node
//! handles, so a late write would otherwise land on unrelated placeholders.

use log::debug;
use tokio::sync::watch;

use crate::color::Rgba;
use crate::error::EditorError;
use crate::geometry::{Anchor, Point, Rect, Size};
use crate::layout::{LayoutSession, SessionId};
use crate::params::Parameters;
use crate::scene::{FillKind, SceneError, SceneGraph};

/// The three independently cancelable reactors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorKind {
    Margin,
    CornerRadius,
    Background,
}

/// Subscriptions of one layout session to the interactive parameters
#[derive(Debug)]
pub struct ParameterReactor {
    session: SessionId,
    margin: Option<watch::Receiver<f64>>,
    corner_radius: Option<watch::Receiver<f64>>,
    background: Option<watch::Receiver<Rgba>>,
    /// Read-only view of the radius used when margin changes rebuild shapes
    radius_reader: watch::Receiver<f64>,
}

impl ParameterReactor {
    /// Subscribe to `parameters` on behalf of `session`.
    ///
    /// The current values count as pending, so the first [`pump`] applies
    /// them to the freshly assigned placeholders.
    ///
    /// [`pump`]: ParameterReactor::pump
    pub fn new(session: SessionId, parameters: &Parameters) -> Self {
        let receivers = parameters.subscribe();
        Self {
            session,
            radius_reader: receivers.corner_radius.clone(),
            margin: Some(receivers.margin),
            corner_radius: Some(receivers.corner_radius),
            background: Some(receivers.background),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Cancel one reactor, leaving the others subscribed
    pub fn cancel(&mut self, kind: ReactorKind) {
        match kind {
            ReactorKind::Margin => self.margin = None,
            ReactorKind::CornerRadius => self.corner_radius = None,
            ReactorKind::Background => self.background = None,
        }
        debug!(session:% = self.session, reactor:? = kind; "Cancelled reactor");
    }

    pub fn cancel_all(&mut self) {
        self.margin = None;
        self.corner_radius = None;
        self.background = None;
        debug!(session:% = self.session; "Cancelled all reactors");
    }

    pub fn is_active(&self, kind: ReactorKind) -> bool {
        match kind {
            ReactorKind::Margin => self.margin.is_some(),
            ReactorKind::CornerRadius => self.corner_radius.is_some(),
            ReactorKind::Background => self.background.is_some(),
        }
    }

    /// Apply every parameter that changed since the last pump.
    ///
    /// Only the latest value of each parameter is applied. Returns the number
    /// of reactors that wrote to the scene. Nothing is written, and nothing is
    /// consumed, when `session` is not the session this reactor belongs to.
    pub fn pump<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        session: &LayoutSession,
    ) -> Result<usize, EditorError> {
        if session.id() != self.session {
            debug!(
                reactor:% = self.session,
                live:% = session.id();
                "Dropped stale parameter update"
            );
            return Ok(0);
        }

        let mut applied = 0;
        if let Some(margin) = poll(&mut self.margin) {
            let radius = *self.radius_reader.borrow();
            apply_margin(scene, session, margin, radius)?;
            debug!(session:% = self.session, margin, radius; "Applied margin");
            applied += 1;
        }
        if let Some(radius) = poll(&mut self.corner_radius) {
            apply_corner_radius(scene, session, radius)?;
            debug!(session:% = self.session, radius; "Applied corner radius");
            applied += 1;
        }
        if let Some(color) = poll(&mut self.background) {
            apply_background(scene, color)?;
            debug!(session:% = self.session, color:%; "Applied background");
            applied += 1;
        }
        Ok(applied)
    }
}

/// Latest unseen value of a subscription. A closed channel ends the subscription.
fn poll<T: Copy>(slot: &mut Option<watch::Receiver<T>>) -> Option<T> {
    let receiver = slot.as_mut()?;
    match receiver.has_changed() {
        Ok(true) => Some(*receiver.borrow_and_update()),
        Ok(false) => None,
        Err(_) => {
            *slot = None;
            None
        }
    }
}

/// Scale factor applied to the placeholder group for a margin
pub fn group_scale_factor(base: Size, margin: f64) -> f64 {
    if base.width <= 0.0 {
        1.0
    } else {
        (base.width - margin) / base.width
    }
}

/// Rect of a slot inset by `margin`, keeping its center
pub fn inset_slot(origin: Rect, margin: f64) -> Rect {
    Rect::from_origin_size(
        Point::new(origin.x + margin / 2.0, origin.y + margin / 2.0),
        Size::new(
            (origin.width - margin).max(0.0),
            (origin.height - margin).max(0.0),
        ),
    )
}

/// Rebuild every placeholder from its slot origin for `margin`, reapply the
/// corner radius, then contract the whole group about its center.
pub fn apply_margin<S: SceneGraph + ?Sized>(
    scene: &mut S,
    session: &LayoutSession,
    margin: f64,
    corner_radius: f64,
) -> Result<(), SceneError> {
    for placeholder in session.placeholders() {
        let rect = inset_slot(session.origin_of(placeholder), margin);
        scene.set_rect(placeholder.id, rect)?;
        scene.set_uniform_corner_radius(placeholder.id, corner_radius)?;
    }
    scene.scale_group(
        session.group(),
        group_scale_factor(session.group_base_size(), margin),
        Anchor::CENTER,
    )
}

pub fn apply_corner_radius<S: SceneGraph + ?Sized>(
    scene: &mut S,
    session: &LayoutSession,
    radius: f64,
) -> Result<(), SceneError> {
    for placeholder in session.placeholders() {
        scene.set_uniform_corner_radius(placeholder.id, radius)?;
    }
    Ok(())
}

/// Replace the page background with a new solid fill
pub fn apply_background<S: SceneGraph + ?Sized>(
    scene: &mut S,
    color: Rgba,
) -> Result<(), SceneError> {
    let page = scene.current_page()?;
    let fill = scene.create_fill(FillKind::Color(color));
    scene.set_fill(page, fill)
}
