//! Template Store: construct kind → template body.

use rustc_hash::FxHashMap;

use crate::error::RenderError;
use crate::fragment::{Separators, Template};
use crate::loader::{self, FrameSource};

/// Immutable table of frame templates for one backend.
///
/// Alongside the frames it owns the separator table (which placeholders are
/// sequences) and the global bindings every render call can see (`nl`,
/// `tab`, and backend settings such as `word_type`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateStore {
    frames: FxHashMap<String, Template>,
    separators: Separators,
    globals: FxHashMap<String, String>,
}

impl TemplateStore {
    pub fn builder() -> TemplateStoreBuilder {
        TemplateStoreBuilder::default()
    }

    pub fn frame(&self, name: &str) -> Option<&Template> {
        self.frames.get(name)
    }

    pub fn global(&self, name: &str) -> Option<&str> {
        self.globals.get(name).map(String::as_str)
    }

    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    /// Separator for a sequence placeholder, `None` for scalars.
    pub fn separator(&self, name: &str) -> Option<&str> {
        self.separators.get(name).map(String::as_str)
    }

    /// Frame names, sorted.
    pub fn frame_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.frames.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Collects separators, globals and frame sources; parses everything in
/// [`build`](Self::build) so any malformed body fails before rendering.
#[derive(Clone, Debug)]
pub struct TemplateStoreBuilder {
    separators: Separators,
    globals: FxHashMap<String, String>,
    files: Vec<(String, String)>,
    frames: Vec<FrameSource>,
    comment: String,
}

impl Default for TemplateStoreBuilder {
    fn default() -> Self {
        let mut globals = FxHashMap::default();
        globals.insert("nl".to_string(), "\n".to_string());
        globals.insert("tab".to_string(), "\t".to_string());
        TemplateStoreBuilder {
            separators: Separators::default(),
            globals,
            files: Vec::new(),
            frames: Vec::new(),
            comment: "//".to_string(),
        }
    }
}

impl TemplateStoreBuilder {
    /// Declare `name` a sequence placeholder joined with `separator`.
    #[must_use]
    pub fn sequence(mut self, name: impl Into<String>, separator: impl Into<String>) -> Self {
        self.separators.insert(name.into(), separator.into());
        self
    }

    #[must_use]
    pub fn global(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    /// One-line comment marker recognised outside blocks in frame files.
    #[must_use]
    pub fn comment(mut self, marker: impl Into<String>) -> Self {
        self.comment = marker.into();
        self
    }

    /// Queue a frame file (`name` / `${` / body / `$}` blocks).
    #[must_use]
    pub fn frame_file(mut self, file: impl Into<String>, source: impl Into<String>) -> Self {
        self.files.push((file.into(), source.into()));
        self
    }

    /// Queue a single frame body.
    #[must_use]
    pub fn frame(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.frames.push(FrameSource {
            name: name.into(),
            body: body.into(),
            offset: 0,
        });
        self
    }

    pub fn build(self) -> Result<TemplateStore, RenderError> {
        let mut sources = Vec::new();
        for (file, source) in &self.files {
            sources.extend(
                loader::read_frames(file, source, &self.comment)?
                    .into_iter()
                    .map(|frame| (file.as_str(), frame)),
            );
        }
        sources.extend(self.frames.iter().cloned().map(|frame| ("<inline>", frame)));

        let mut frames = FxHashMap::default();
        for (file, frame) in sources {
            let template = Template::parse(&frame.name, &frame.body, &self.separators)?;
            if frames.insert(frame.name.clone(), template).is_some() {
                return Err(RenderError::malformed(
                    file,
                    frame.offset,
                    format!("duplicate template `{}`", frame.name),
                ));
            }
        }

        Ok(TemplateStore {
            frames,
            separators: self.separators,
            globals: self.globals,
        })
    }
}
