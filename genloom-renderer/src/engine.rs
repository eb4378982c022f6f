//! Tera rendering engine behind the [`Renderer`] seam.
//!
//! The pipeline treats template expansion as an opaque collaborator; this
//! module supplies the seam plus a Tera-backed implementation whose template
//! cache is built once (from raw templates and/or a template directory) and
//! read-only afterwards, so renders are safe to fan out across workers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tera::Tera;

use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

/// Template expansion capability consumed by the pipeline.
///
/// Implementations must be callable concurrently from multiple workers
/// against a shared, read-only template cache.
pub trait Renderer: Send + Sync {
    /// Expand `template` with `model`, returning the rendered text.
    fn render(&self, template: &str, model: &Value) -> Result<String, RenderError>;
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_templates_from_dir(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

// ---------------------------------------------------------------------------
// TeraRenderer
// ---------------------------------------------------------------------------

/// Tera-based [`Renderer`] over an immutable in-memory template cache.
///
/// Create once with [`TeraRenderer::from_templates`] or
/// [`TeraRenderer::from_dir`] and share by reference across the run.
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Build a renderer from named raw templates.
    ///
    /// Names are normalised to lowercase forward-slash form, matching the
    /// normalisation applied by [`TeraRenderer::from_dir`].
    pub fn from_templates<I, N, C>(templates: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut named: HashMap<String, String> = HashMap::new();
        for (name, content) in templates {
            let name = normalize_template_name(Path::new(&name.into()));
            named.insert(name, content.into());
        }
        let mut tera = Tera::default();
        tera.add_raw_templates(named.into_iter().collect::<Vec<_>>())?;
        Ok(TeraRenderer { tera })
    }

    /// Build a renderer from every `.tera` file under `dir`, recursively.
    ///
    /// Template names are the lowercase relative paths; other files are
    /// ignored. A missing directory yields an empty cache.
    pub fn from_dir(dir: &Path) -> Result<Self, RenderError> {
        let templates = if dir.exists() {
            load_templates_from_dir(dir)?
        } else {
            vec![]
        };
        Self::from_templates(templates)
    }

    /// Whether `template` resolves in this renderer's cache.
    pub fn has_template(&self, template: &str) -> bool {
        self.tera.get_template_names().any(|n| n == template)
    }
}

impl Renderer for TeraRenderer {
    fn render(&self, template: &str, model: &Value) -> Result<String, RenderError> {
        if !self.has_template(template) {
            return Err(RenderError::UnknownTemplate { name: template.to_string() });
        }
        let ctx = tera::Context::from_serialize(model).map_err(|source| {
            RenderError::Context { template: template.to_string(), source }
        })?;
        Ok(self.tera.render(template, &ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn greeting_renderer() -> TeraRenderer {
        TeraRenderer::from_templates([("greeting.tera", "hello {{ name }}")])
            .expect("renderer")
    }

    #[test]
    fn renders_template_with_model() {
        let renderer = greeting_renderer();
        let text = renderer
            .render("greeting.tera", &json!({"name": "A"}))
            .expect("render");
        assert_eq!(text, "hello A");
    }

    #[test]
    fn unknown_template_is_an_explicit_error() {
        let renderer = greeting_renderer();
        let err = renderer
            .render("missing", &json!({}))
            .expect_err("must fail");
        assert!(matches!(err, RenderError::UnknownTemplate { .. }), "got: {err}");
        assert_eq!(err.to_string(), "unknown template: missing");
    }

    #[test]
    fn non_object_model_is_a_context_error() {
        let renderer = greeting_renderer();
        let err = renderer
            .render("greeting.tera", &json!("just a string"))
            .expect_err("must fail");
        assert!(matches!(err, RenderError::Context { .. }), "got: {err}");
    }

    #[test]
    fn from_dir_loads_nested_tera_files_under_normalised_names() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("Pkg").join("Inner");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("File.tera"), "v={{ v }}").expect("write");
        fs::write(dir.path().join("notes.txt"), "not a template").expect("write");

        let renderer = TeraRenderer::from_dir(dir.path()).expect("renderer");
        assert!(renderer.has_template("pkg/inner/file.tera"));
        assert!(!renderer.has_template("notes.txt"));

        let text = renderer
            .render("pkg/inner/file.tera", &json!({"v": 3}))
            .expect("render");
        assert_eq!(text, "v=3");
    }

    #[test]
    fn from_dir_missing_directory_yields_empty_cache() {
        let dir = TempDir::new().expect("tempdir");
        let renderer =
            TeraRenderer::from_dir(&dir.path().join("nope")).expect("renderer");
        assert!(!renderer.has_template("anything"));
    }

    #[test]
    fn renderer_is_shareable_across_threads() {
        let renderer = greeting_renderer();
        std::thread::scope(|s| {
            for name in ["x", "y"] {
                let r = &renderer;
                s.spawn(move || {
                    let text = r.render("greeting.tera", &json!({"name": name})).unwrap();
                    assert_eq!(text, format!("hello {name}"));
                });
            }
        });
    }
}
