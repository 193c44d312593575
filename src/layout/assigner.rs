//! Binding images to template placeholders
//!
//! Assignment loads the template document, orders its image placeholders by
//! a visual key, binds the i-th placeholder to the i-th image with a cover
//! fill, and locks the placeholders into one group.

use std::cmp::Ordering;

use log::{debug, info};

use super::session::{LayoutSession, SessionId};
use crate::error::EditorError;
use crate::geometry::{Point, Rect};
use crate::scene::{self, ContentFillMode, FillKind, NodeId, SceneError, SceneGraph, Scope};
use crate::template::Template;

/// Reading-order key of a placeholder's authored position.
///
/// `2x + y` favours left-to-right over top-to-bottom. It is an approximation
/// of raster order, not a guarantee: diagonal or overlapping layouts can sort
/// unexpectedly, and templates are authored against this exact key.
pub fn visual_order_key(position: Point) -> f64 {
    2.0 * position.x + position.y
}

/// Sort placeholders by [`visual_order_key`]; ties keep document order
pub fn sort_by_visual_order<S: SceneGraph + ?Sized>(
    scene: &S,
    placeholders: &[NodeId],
) -> Result<Vec<(NodeId, Rect)>, SceneError> {
    let mut keyed = placeholders
        .iter()
        .map(|node| Ok((*node, scene.rect(*node)?)))
        .collect::<Result<Vec<_>, SceneError>>()?;
    keyed.sort_by(|(_, a), (_, b)| {
        visual_order_key(a.origin())
            .partial_cmp(&visual_order_key(b.origin()))
            .unwrap_or(Ordering::Equal)
    });
    Ok(keyed)
}

/// Assign `images` to the placeholders of `template`.
///
/// Fails with [`EditorError::AssetCountMismatch`] before touching the scene
/// when the image count differs from the template's declared count. Later
/// failures leave the new document half set up; callers that must keep the
/// previous state take a [`SceneGraph::snapshot`] first.
pub fn assign<S: SceneGraph + ?Sized>(
    scene: &mut S,
    template: &'static Template,
    images: &[String],
    id: SessionId,
) -> Result<LayoutSession, EditorError> {
    check_count(template, images.len())?;

    scene.load_document(template.document)?;

    let found = scene::image_placeholders(scene)?;
    // The loaded document disagrees with the catalogue
    if found.len() != images.len() {
        return Err(EditorError::asset_count(
            template.name,
            found.len(),
            images.len(),
        ));
    }

    let ordered = sort_by_visual_order(scene, &found)?;
    let mut bound = Vec::with_capacity(ordered.len());
    for ((node, origin), image) in ordered.into_iter().zip(images) {
        let fill = scene.create_fill(FillKind::Image { uri: image.clone() });
        scene.set_fill(node, fill)?;
        scene.set_content_fill_mode(node, ContentFillMode::Cover)?;
        debug!(node:%, image = image.as_str(); "Bound image to placeholder");
        bound.push((node, image.clone(), origin));
    }

    let members: Vec<NodeId> = bound.iter().map(|(node, _, _)| *node).collect();
    let group = scene.group(&members)?;
    scene.set_scope_enabled(group, Scope::EditorSelect, false)?;
    scene.set_scope_enabled(group, Scope::LayerMove, false)?;
    let group_base_size = scene.size(group)?;

    let page = scene.current_page()?;
    scene.zoom_to_fit(page)?;
    scene.add_undo_checkpoint();

    info!(session:% = id, template = template.name; "Assigned template");
    Ok(LayoutSession::new(id, template, bound, group, group_base_size))
}

fn check_count(template: &Template, found: usize) -> Result<(), EditorError> {
    if template.placeholder_count == found {
        Ok(())
    } else {
        Err(EditorError::asset_count(
            template.name,
            template.placeholder_count,
            found,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::scene::MemoryScene;
    use crate::template::TemplateRegistry;

    fn images(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("img://{}", i)).collect()
    }

    fn scene() -> MemoryScene {
        MemoryScene::with_bundled_templates(Size::new(360.0, 640.0))
    }

    #[test]
    fn test_visual_order_key() {
        assert_eq!(visual_order_key(Point::new(0.0, 50.0)), 50.0);
        assert_eq!(visual_order_key(Point::new(50.0, 0.0)), 100.0);
    }

    #[test]
    fn test_assign_full_half_half_orders_by_key() {
        let mut scene = scene();
        let template = TemplateRegistry::find("full-half-half").unwrap();
        let session = assign(&mut scene, template, &images(3), SessionId(1)).unwrap();

        let origins: Vec<Rect> = session
            .placeholders()
            .iter()
            .map(|p| session.origin_of(p))
            .collect();
        assert_eq!(
            origins,
            vec![
                Rect::new(0.0, 0.0, 100.0, 50.0),
                Rect::new(0.0, 50.0, 50.0, 50.0),
                Rect::new(50.0, 50.0, 50.0, 50.0),
            ]
        );
        for (i, p) in session.placeholders().iter().enumerate() {
            assert_eq!(scene.image_uri(p.id), Some(images(3)[i].as_str()));
            assert_eq!(
                scene.content_fill_mode(p.id).unwrap(),
                ContentFillMode::Cover
            );
        }
    }

    #[test]
    fn test_assign_half_half_full_uses_key_not_rows() {
        let mut scene = scene();
        let template = TemplateRegistry::find("half-half-full").unwrap();
        let session = assign(&mut scene, template, &images(3), SessionId(1)).unwrap();
        let origins: Vec<Point> = session
            .placeholders()
            .iter()
            .map(|p| session.origin_of(p).origin())
            .collect();
        // (0,50) has key 50 and sorts before (50,0) with key 100
        assert_eq!(
            origins,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 50.0),
                Point::new(50.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_assign_skips_text_and_decorations() {
        let mut scene = scene();
        let template = TemplateRegistry::find("Christmas").unwrap();
        let session = assign(&mut scene, template, &images(3), SessionId(1)).unwrap();
        assert_eq!(session.placeholders().len(), 3);
        assert_eq!(scene.group_members(session.group()).unwrap().len(), 3);
    }

    #[test]
    fn test_assign_locks_group() {
        let mut scene = scene();
        let template = TemplateRegistry::find("Bonjour").unwrap();
        let session = assign(&mut scene, template, &images(3), SessionId(1)).unwrap();
        let group = session.group();
        assert!(!scene.is_scope_enabled(group, Scope::EditorSelect).unwrap());
        assert!(!scene.is_scope_enabled(group, Scope::LayerMove).unwrap());
        assert_eq!(session.group_base_size(), Size::new(90.0, 125.0));
        assert_eq!(scene.checkpoint_count(), 1);
    }

    #[test]
    fn test_count_mismatch_leaves_scene_untouched() {
        let mut scene = scene();
        let template = TemplateRegistry::find("full-half-half").unwrap();
        let first = assign(&mut scene, template, &images(3), SessionId(1)).unwrap();
        let before = scene.rect(first.placeholders()[0].id).unwrap();

        let other = TemplateRegistry::find("Missing You").unwrap();
        let result = assign(&mut scene, other, &images(2), SessionId(2));
        assert_eq!(
            result.unwrap_err(),
            EditorError::asset_count("Missing You", 3, 2)
        );
        assert_eq!(scene.rect(first.placeholders()[0].id).unwrap(), before);
        assert_eq!(
            scene.image_uri(first.placeholders()[0].id),
            Some("img://1")
        );
    }
}
