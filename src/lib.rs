//! Collage Editor - placeholder layout and reorder engine for photo collages
//!
//! This library binds a list of photos to the placeholders of a template,
//! keeps their geometry in step with the margin, corner radius and background
//! parameters, and implements long-press drag-to-swap reordering on top of a
//! scene graph service.
//!
//! # Example
//!
//! ```rust
//! use collage_editor::{compose, Composition, EditorConfig};
//!
//! let composition = Composition::new("full-half-half", ["a.jpg", "b.jpg", "c.jpg"])
//!     .with_margin(2.0)
//!     .with_swap(0, 2);
//! let editor = compose(&composition, EditorConfig::default()).unwrap();
//! assert_eq!(editor.session().unwrap().placeholders().len(), 3);
//! ```

pub mod animation;
pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod params;
pub mod reactor;
pub mod reorder;
pub mod scene;
pub mod template;

pub use animation::{Easing, SpringSpec, SwapMotion, TweenSpec};
pub use color::Rgba;
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, OverlayFrame, ReorderExit};
pub use error::EditorError;
pub use geometry::{Anchor, Point, Rect, Size};
pub use layout::{LayoutSession, Placeholder, SessionId};
pub use params::{ParameterDefaults, Parameters};
pub use reorder::{GestureEvent, GestureId, GestureKind, ReorderEvent};
pub use scene::{MemoryScene, NodeId, SceneError, SceneGraph};
pub use template::{Template, TemplateError, TemplateRegistry};

/// A scripted editing session: template, photos, parameter values and swaps
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub template: String,
    pub images: Vec<String>,
    pub margin: Option<f64>,
    pub corner_radius: Option<f64>,
    pub background: Option<Rgba>,
    /// Swaps by placeholder index in assignment order, applied in sequence
    pub swaps: Vec<(usize, usize)>,
}

impl Composition {
    pub fn new<I, T>(template: impl Into<String>, images: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            template: template.into(),
            images: images.into_iter().map(Into::into).collect(),
            margin: None,
            corner_radius: None,
            background: None,
            swaps: Vec::new(),
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = Some(color);
        self
    }

    /// Queue a swap of the placeholders at indices `a` and `b`
    pub fn with_swap(mut self, a: usize, b: usize) -> Self {
        self.swaps.push((a, b));
        self
    }
}

/// Run a whole composition against an in-memory scene
///
/// Parameters are applied and committed first, then every swap runs to
/// completion before the next one starts.
pub fn compose(
    composition: &Composition,
    config: EditorConfig,
) -> Result<Editor<MemoryScene>, EditorError> {
    let scene = MemoryScene::with_bundled_templates(config.viewport);
    let mut editor = Editor::new(scene, config);
    editor.assign_template(&composition.template, &composition.images)?;

    if let Some(margin) = composition.margin {
        editor.set_margin(margin)?;
    }
    if let Some(radius) = composition.corner_radius {
        editor.set_corner_radius(radius)?;
    }
    if let Some(color) = composition.background {
        editor.set_background_color(color)?;
    }
    editor.commit_parameters()?;

    for (a, b) in &composition.swaps {
        let a = placeholder_at(&editor, *a)?;
        let b = placeholder_at(&editor, *b)?;
        editor.swap_placeholders(a, b)?;
        editor.settle()?;
    }
    Ok(editor)
}

fn placeholder_at<S: SceneGraph>(editor: &Editor<S>, index: usize) -> Result<NodeId, EditorError> {
    let session = editor.session().ok_or(EditorError::NoActiveSession)?;
    session
        .placeholders()
        .get(index)
        .map(|p| p.id)
        .ok_or(EditorError::PlaceholderIndex {
            index,
            count: session.placeholders().len(),
        })
}

/// Plain-text listing of the live session: every placeholder's image, world
/// rect and corner radius, plus the page background
pub fn layout_report(editor: &Editor<MemoryScene>) -> Result<String, EditorError> {
    let session = editor.session().ok_or(EditorError::NoActiveSession)?;
    let scene = editor.scene();
    let background = scene
        .background()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());
    let mut lines = vec![
        format!("template: {} ({})", session.template().name, session.id()),
        format!("background: {}", background),
    ];
    for (index, placeholder) in session.placeholders().iter().enumerate() {
        let rect = scene.rect(placeholder.id)?;
        let radius = scene.corner_radius(placeholder.id, scene::Corner::TopLeft)?;
        lines.push(format!(
            "{} {} slot={} x={:.2} y={:.2} w={:.2} h={:.2} r={:.1}",
            index,
            placeholder.image,
            placeholder.slot(),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            radius
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
