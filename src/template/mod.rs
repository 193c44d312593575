//! Template catalogue
//!
//! Templates are pre-authored arrangements of placeholders. The catalogue is
//! static: it is compiled into the crate together with the documents the
//! in-memory scene loads.
//!
//! # Example
//!
//! ```rust
//! use collage_editor::template::TemplateRegistry;
//!
//! let names: Vec<&str> = TemplateRegistry::all().iter().map(|t| t.name).collect();
//! assert_eq!(names[0], "full-half-half");
//! ```

mod registry;

pub use registry::{Template, TemplateError, TemplateRegistry};
