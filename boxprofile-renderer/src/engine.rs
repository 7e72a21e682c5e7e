//! Tera rendering engine: [`ProfileFormat`] enum and [`Renderer`].
//!
//! # Formats
//!
//! | Format  | Template                | File suffix |
//! |---------|-------------------------|-------------|
//! | Konsole | `konsole/profile.tera`  | `profile`   |

use std::path::Path;

use tera::Tera;

use crate::context::ProfileContext;
use crate::error::RenderError;

const KONSOLE_PROFILE: &str = include_str!("templates/konsole.profile.tera");

/// Template source for each format: `<dir>/<template_name>` when that file
/// exists, the embedded default otherwise.
fn template_sources(override_dir: Option<&Path>) -> Result<Vec<(&'static str, String)>, RenderError> {
    let mut sources = Vec::with_capacity(ProfileFormat::all().len());
    for format in ProfileFormat::all() {
        let name = format.template_name();
        let custom = override_dir.map(|dir| dir.join(name)).filter(|p| p.is_file());
        let content = match custom {
            Some(path) => std::fs::read_to_string(&path).map_err(|source| RenderError::Io { path, source })?,
            None => format.embedded_template().to_string(),
        };
        sources.push((name, content));
    }
    Ok(sources)
}

// ---------------------------------------------------------------------------
// ProfileFormat
// ---------------------------------------------------------------------------

/// Supported profile file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileFormat {
    Konsole,
}

impl ProfileFormat {
    /// All formats in a stable order.
    pub fn all() -> &'static [ProfileFormat] {
        &[ProfileFormat::Konsole]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            ProfileFormat::Konsole => "konsole/profile.tera",
        }
    }

    fn embedded_template(&self) -> &'static str {
        match self {
            ProfileFormat::Konsole => KONSOLE_PROFILE,
        }
    }

    /// File suffix (without the dot) of rendered files.
    pub fn suffix(&self) -> &'static str {
        match self {
            ProfileFormat::Konsole => "profile",
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering templates with optional user overrides.
///
/// `user_template_dir` may hold a file at a format's template name
/// (e.g. `konsole/profile.tera`) that replaces the embedded default.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(template_sources(user_template_dir)?)?;
        Ok(TemplateEngine { tera })
    }

    /// Render one profile. Line endings are normalised to LF and the result
    /// always ends with exactly one newline.
    pub fn render(&self, ctx: &ProfileContext, format: ProfileFormat) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let rendered = self.tera.render(format.template_name(), &tera_ctx)?;
        let mut content = rendered.replace("\r\n", "\n").trim_end().to_string();
        content.push('\n');
        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Profile renderer. Create once and reuse for a whole pass.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(None)? })
    }

    /// Construct a [`Renderer`] whose templates may be overridden from `dir`.
    /// A missing `dir` is the same as [`Renderer::new`].
    pub fn with_overrides(dir: &Path) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(Some(dir))? })
    }

    pub fn render(&self, format: ProfileFormat, ctx: &ProfileContext) -> Result<String, RenderError> {
        self.engine.render(ctx, format)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use boxprofile_core::Artifact;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn ctx(icon: Option<&str>) -> ProfileContext {
        let a = Artifact::new(
            "ubuntu-box",
            "distrobox",
            icon.map(PathBuf::from),
            "distrobox enter ubuntu-box",
        );
        ProfileContext::from_artifact(&a, "/home/u/.local/share/konsole/Dark.profile")
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn konsole_profile_without_icon() {
        let out = Renderer::new().unwrap().render(ProfileFormat::Konsole, &ctx(None)).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[General]",
                "Command=distrobox enter ubuntu-box",
                "Name=distrobox – ubuntu-box",
                "Parent=/home/u/.local/share/konsole/Dark.profile",
            ]
        );
        assert!(!out.contains("Icon="));
    }

    #[test]
    fn konsole_profile_with_icon() {
        let out = Renderer::new()
            .unwrap()
            .render(ProfileFormat::Konsole, &ctx(Some("/icons/ubuntu.svg")))
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "Command=distrobox enter ubuntu-box");
        assert_eq!(lines[2], "Icon=/icons/ubuntu.svg");
        assert_eq!(lines[3], "Name=distrobox – ubuntu-box");
    }

    #[test]
    fn output_ends_with_single_newline() {
        let out = Renderer::new().unwrap().render(ProfileFormat::Konsole, &ctx(None)).unwrap();
        assert!(out.ends_with("Dark.profile\n"));
        assert!(!out.contains('\r'));
    }

    #[test]
    fn user_override_replaces_embedded_template() {
        let dir = TempDir::new().unwrap();
        let konsole = dir.path().join("konsole");
        std::fs::create_dir_all(&konsole).unwrap();
        std::fs::write(
            konsole.join("profile.tera"),
            "[General]\nCommand={{ command }}\nName={{ name }}\nParent={{ parent }}\nTerminalColumns=120\n",
        )
        .unwrap();

        let out = Renderer::with_overrides(dir.path())
            .unwrap()
            .render(ProfileFormat::Konsole, &ctx(None))
            .unwrap();
        assert!(out.contains("TerminalColumns=120"));
    }

    #[test]
    fn missing_override_dir_uses_embedded() {
        let dir = TempDir::new().unwrap();
        let out = Renderer::with_overrides(&dir.path().join("nope"))
            .unwrap()
            .render(ProfileFormat::Konsole, &ctx(None))
            .unwrap();
        assert!(out.starts_with("[General]\n"));
    }

    #[test]
    fn only_the_exact_template_path_is_loaded() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("konsole")).unwrap();
        std::fs::write(dir.path().join("konsole/other.tera"), "{{ broken").unwrap();
        std::fs::write(dir.path().join("Konsole.tera"), "{{ broken").unwrap();

        let out = Renderer::with_overrides(dir.path())
            .unwrap()
            .render(ProfileFormat::Konsole, &ctx(None))
            .unwrap();
        assert!(out.starts_with("[General]\nCommand=distrobox enter ubuntu-box\n"));
    }

    #[test]
    fn every_format_has_a_template() {
        let renderer = Renderer::new().unwrap();
        for format in ProfileFormat::all() {
            renderer
                .render(*format, &ctx(None))
                .unwrap_or_else(|e| panic!("render failed for {format:?}: {e}"));
        }
    }
}
