//! The mutable panel document: config, content, cached image handles and
//! derived layout memory, plus the dirty-marking edit view handed to handlers.

use std::collections::HashMap;

use canvasui_assets::ImageHandle;

use crate::error::ConfigError;
use crate::layout::LayoutCache;
use crate::model::{Content, ContentMap, ElementConfig, PanelConfig};
use crate::resolve::ResolvedStyle;
use crate::state::DirtyFlag;

/// Load state of an image element's asset.
#[derive(Debug, Clone)]
pub enum ImageSlot {
    /// Requested; completion arrives on a later tick.
    Pending,
    /// Decoded and cached.
    Ready(ImageHandle),
    /// Decode or read failed; not retried until the content is set again.
    Failed,
}

/// Config, content and everything cached against them.
#[derive(Debug, Default)]
pub struct Document {
    pub(crate) config: PanelConfig,
    pub(crate) content: ContentMap,
    pub(crate) images: HashMap<String, ImageSlot>,
    pub(crate) layout: LayoutCache,
}

impl Document {
    pub(crate) fn new(config: PanelConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn content(&self) -> &ContentMap {
        &self.content
    }

    pub fn layout_cache(&self) -> &LayoutCache {
        &self.layout
    }

    pub fn image(&self, name: &str) -> Option<&ImageSlot> {
        self.images.get(name)
    }

    /// Validate `element` against the body and insert it, forgetting any
    /// height frozen for `name`. An invalid element leaves the document as is.
    pub(crate) fn set_element(
        &mut self,
        name: &str,
        element: ElementConfig,
    ) -> Result<(), ConfigError> {
        let surface = self.config.surface_size();
        ResolvedStyle::resolve(name, &element, &self.config.body, surface, None)?;
        self.layout.forget(name);
        self.config.elements.insert(name.to_string(), element);
        Ok(())
    }

    pub(crate) fn remove_element(&mut self, name: &str) -> Option<ElementConfig> {
        self.layout.forget(name);
        self.config.elements.shift_remove(name)
    }

    pub(crate) fn set_content(&mut self, name: &str, content: Content) {
        self.images.remove(name);
        self.content.insert(name.to_string(), content);
    }

    pub(crate) fn remove_content(&mut self, name: &str) -> Option<Content> {
        self.images.remove(name);
        self.content.shift_remove(name)
    }
}

/// Mutable view of the document for event handlers.
///
/// Every mutable access marks the panel dirty; the re-render happens on the
/// next frame, never inside the current one.
pub struct PanelEdit<'a> {
    doc: &'a mut Document,
    dirty: &'a mut DirtyFlag,
}

impl<'a> PanelEdit<'a> {
    pub(crate) fn new(doc: &'a mut Document, dirty: &'a mut DirtyFlag) -> Self {
        Self { doc, dirty }
    }

    pub fn element(&self, name: &str) -> Option<&ElementConfig> {
        self.doc.config.elements.get(name)
    }

    pub fn element_mut(&mut self, name: &str) -> Option<&mut ElementConfig> {
        let element = self.doc.config.elements.get_mut(name)?;
        self.dirty.mark();
        Some(element)
    }

    pub fn body_mut(&mut self) -> &mut ElementConfig {
        self.dirty.mark();
        &mut self.doc.config.body
    }

    pub fn content(&self, name: &str) -> Option<&Content> {
        self.doc.content.get(name)
    }

    pub fn set_content(&mut self, name: &str, content: impl Into<Content>) {
        self.doc.set_content(name, content.into());
        self.dirty.mark();
    }

    /// Insert or replace an element. Rejected elements change nothing.
    pub fn set_element(&mut self, name: &str, element: ElementConfig) -> Result<(), ConfigError> {
        self.doc.set_element(name, element)?;
        self.dirty.mark();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;

    #[test]
    fn edits_mark_dirty() {
        let mut doc = Document::new(
            PanelConfig::default().with_element("btn", ElementConfig::new(ElementKind::Button, 0.0, 0.0)),
        );
        let mut dirty = DirtyFlag::default();
        dirty.clear();

        let mut edit = PanelEdit::new(&mut doc, &mut dirty);
        assert!(edit.element("btn").is_some());
        assert!(edit.element_mut("missing").is_none());
        drop(edit);
        assert!(!dirty.is_dirty());

        let mut edit = PanelEdit::new(&mut doc, &mut dirty);
        edit.element_mut("btn").expect("btn").background_color = Some("#123".into());
        assert!(dirty.is_dirty());
        assert_eq!(doc.config.elements["btn"].background_color.as_deref(), Some("#123"));
    }

    #[test]
    fn handler_side_set_element_validates() {
        let mut doc = Document::new(PanelConfig::default());
        let mut dirty = DirtyFlag::default();
        dirty.clear();

        let mut bad = ElementConfig::new(ElementKind::Text, 0.0, 0.0);
        bad.padding = Some(f32::NAN);
        let mut edit = PanelEdit::new(&mut doc, &mut dirty);
        let err = edit.set_element("bad", bad).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAttribute { .. }));
        drop(edit);
        assert!(!dirty.is_dirty());
        assert!(doc.config.elements.is_empty());

        let mut edit = PanelEdit::new(&mut doc, &mut dirty);
        edit.set_element("ok", ElementConfig::new(ElementKind::Text, 0.0, 0.0))
            .expect("valid element");
        assert!(dirty.is_dirty());
        assert!(doc.config.elements.contains_key("ok"));
    }

    #[test]
    fn new_content_discards_cached_image_state() {
        let mut doc = Document::default();
        doc.images.insert("pic".into(), ImageSlot::Failed);
        doc.set_content("pic", Content::from("retry.png"));
        assert!(doc.image("pic").is_none());
    }
}
