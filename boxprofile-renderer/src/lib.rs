//! # boxprofile-renderer
//!
//! Tera-based engine that renders terminal profile files from [`Artifact`]s,
//! plus the settings-file reader used to resolve a profile's parent.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use boxprofile_core::Artifact;
//! use boxprofile_renderer::{ProfileContext, ProfileFormat, Renderer};
//!
//! fn render_one(artifact: &Artifact) {
//!     if let Ok(renderer) = Renderer::new() {
//!         let ctx = ProfileContext::from_artifact(artifact, "FALLBACK/");
//!         if let Ok(text) = renderer.render(ProfileFormat::Konsole, &ctx) {
//!             println!("{text}");
//!         }
//!     }
//! }
//! ```
//!
//! [`Artifact`]: boxprofile_core::Artifact

pub mod context;
pub mod engine;
pub mod error;
pub mod settings;

pub use context::ProfileContext;
pub use engine::{ProfileFormat, Renderer, TemplateEngine};
pub use error::RenderError;
