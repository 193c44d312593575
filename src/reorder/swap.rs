//! Exchanging the geometry of two placeholders
//!
//! A swap either happens at once ([`swap_now`]) or is driven frame by frame
//! through a [`SwapTransition`]. Both end with the two rects exactly exchanged
//! and cover fill mode reapplied, since interpolating sizes invalidates the
//! fill's derived crop.

use std::time::Duration;

use log::debug;

use crate::animation::{Animation, SwapMotion};
use crate::geometry::Rect;
use crate::scene::{ContentFillMode, NodeId, SceneError, SceneGraph};

/// Exchange the rects of `a` and `b` immediately. Swapping a node with
/// itself does nothing.
pub fn swap_now<S: SceneGraph + ?Sized>(
    scene: &mut S,
    a: NodeId,
    b: NodeId,
) -> Result<(), SceneError> {
    if a == b {
        return Ok(());
    }
    let rect_a = scene.rect(a)?;
    let rect_b = scene.rect(b)?;
    finish(scene, a, b, rect_b, rect_a)
}

fn finish<S: SceneGraph + ?Sized>(
    scene: &mut S,
    a: NodeId,
    b: NodeId,
    target_a: Rect,
    target_b: Rect,
) -> Result<(), SceneError> {
    scene.set_rect(a, target_a)?;
    scene.set_rect(b, target_b)?;
    scene.set_content_fill_mode(a, ContentFillMode::Cover)?;
    scene.set_content_fill_mode(b, ContentFillMode::Cover)?;
    debug!(a:%, b:%; "Swapped placeholders");
    Ok(())
}

/// Interpolated frame between two rects; sizes never go negative
fn frame(from: &Rect, to: &Rect, t: f64) -> Rect {
    let mut rect = from.lerp(to, t);
    rect.width = rect.width.max(0.0);
    rect.height = rect.height.max(0.0);
    rect
}

/// An animated swap in flight
#[derive(Debug, Clone)]
pub struct SwapTransition {
    a: NodeId,
    b: NodeId,
    from_a: Rect,
    from_b: Rect,
    animation: Animation,
}

impl SwapTransition {
    /// Capture the pre-swap rects. Returns `None` for a swap of a node with itself.
    pub fn begin<S: SceneGraph + ?Sized>(
        scene: &S,
        a: NodeId,
        b: NodeId,
        motion: SwapMotion,
    ) -> Result<Option<Self>, SceneError> {
        if a == b {
            return Ok(None);
        }
        Ok(Some(Self {
            a,
            b,
            from_a: scene.rect(a)?,
            from_b: scene.rect(b)?,
            animation: Animation::new(motion),
        }))
    }

    pub fn pair(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    pub fn progress(&self) -> f64 {
        self.animation.progress()
    }

    /// Advance by `dt` and write the interpolated rects of both nodes in
    /// lockstep. Returns `true` once the swap has reached its final geometry.
    pub fn step<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        dt: Duration,
    ) -> Result<bool, SceneError> {
        let t = self.animation.advance(dt);
        if self.animation.is_finished() {
            finish(scene, self.a, self.b, self.from_b, self.from_a)?;
            return Ok(true);
        }
        scene.set_rect(self.a, frame(&self.from_a, &self.from_b, t))?;
        scene.set_rect(self.b, frame(&self.from_b, &self.from_a, t))?;
        Ok(false)
    }

    /// Skip the rest of the animation and write the final geometry
    pub fn complete<S: SceneGraph + ?Sized>(self, scene: &mut S) -> Result<(), SceneError> {
        finish(scene, self.a, self.b, self.from_b, self.from_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Easing, TweenSpec};
    use crate::geometry::Size;
    use crate::scene::{self, MemoryScene};

    fn scene() -> (MemoryScene, Vec<NodeId>) {
        let mut scene = MemoryScene::with_bundled_templates(Size::new(100.0, 100.0));
        scene.load_document("bundled://full_half_half.toml").unwrap();
        let nodes = scene::image_placeholders(&scene).unwrap();
        (scene, nodes)
    }

    #[test]
    fn test_swap_now_exchanges_rects() {
        let (mut scene, n) = scene();
        let (ra, rb, rc) = (
            scene.rect(n[0]).unwrap(),
            scene.rect(n[1]).unwrap(),
            scene.rect(n[2]).unwrap(),
        );
        swap_now(&mut scene, n[0], n[2]).unwrap();
        assert_eq!(scene.rect(n[0]).unwrap(), rc);
        assert_eq!(scene.rect(n[2]).unwrap(), ra);
        assert_eq!(scene.rect(n[1]).unwrap(), rb);
        assert_eq!(
            scene.content_fill_mode(n[0]).unwrap(),
            ContentFillMode::Cover
        );

        swap_now(&mut scene, n[0], n[2]).unwrap();
        assert_eq!(scene.rect(n[0]).unwrap(), ra);
        assert_eq!(scene.rect(n[2]).unwrap(), rc);
    }

    #[test]
    fn test_swap_with_self_is_noop() {
        let (mut scene, n) = scene();
        let before = scene.rect(n[1]).unwrap();
        swap_now(&mut scene, n[1], n[1]).unwrap();
        assert_eq!(scene.rect(n[1]).unwrap(), before);
        assert_eq!(
            scene.content_fill_mode(n[1]).unwrap(),
            ContentFillMode::default()
        );
        assert!(SwapTransition::begin(&scene, n[1], n[1], SwapMotion::Instant)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_tween_moves_in_lockstep() {
        let (mut scene, n) = scene();
        let ra = scene.rect(n[0]).unwrap();
        let rc = scene.rect(n[2]).unwrap();
        let motion = SwapMotion::Tween(TweenSpec {
            duration_ms: 100,
            easing: Easing::Linear,
        });
        let mut transition = SwapTransition::begin(&scene, n[0], n[2], motion)
            .unwrap()
            .unwrap();

        assert!(!transition
            .step(&mut scene, Duration::from_millis(50))
            .unwrap());
        let mid_a = scene.rect(n[0]).unwrap();
        let mid_c = scene.rect(n[2]).unwrap();
        assert!(mid_a.approx_eq(&ra.lerp(&rc, 0.5), 1e-9));
        assert!(mid_c.approx_eq(&rc.lerp(&ra, 0.5), 1e-9));

        assert!(transition
            .step(&mut scene, Duration::from_millis(50))
            .unwrap());
        assert_eq!(scene.rect(n[0]).unwrap(), rc);
        assert_eq!(scene.rect(n[2]).unwrap(), ra);
        assert_eq!(
            scene.content_fill_mode(n[2]).unwrap(),
            ContentFillMode::Cover
        );
    }

    #[test]
    fn test_spring_lands_exactly() {
        let (mut scene, n) = scene();
        let ra = scene.rect(n[0]).unwrap();
        let rb = scene.rect(n[1]).unwrap();
        let mut transition =
            SwapTransition::begin(&scene, n[0], n[1], SwapMotion::default())
                .unwrap()
                .unwrap();
        let mut frames = 0;
        while !transition
            .step(&mut scene, Duration::from_millis(16))
            .unwrap()
        {
            frames += 1;
            assert!(frames < 1000, "spring never settled");
        }
        assert_eq!(scene.rect(n[0]).unwrap(), rb);
        assert_eq!(scene.rect(n[1]).unwrap(), ra);
    }

    #[test]
    fn test_instant_finishes_on_first_step() {
        let (mut scene, n) = scene();
        let rb = scene.rect(n[1]).unwrap();
        let mut transition =
            SwapTransition::begin(&scene, n[0], n[1], SwapMotion::Instant)
                .unwrap()
                .unwrap();
        assert!(transition.step(&mut scene, Duration::ZERO).unwrap());
        assert_eq!(scene.rect(n[0]).unwrap(), rb);
    }
}
