//! Document access abstraction.
//!
//! [`PdfSource`] is everything the outline analysis needs from a parsed
//! document. It keeps lopdf types out of the analysis, so the heuristics can
//! run on [`SourceDocument`]s assembled in memory as well as on real files.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{pdf_version_from_bytes, pdf_version_from_path};
use crate::error::{Error, Result};
use crate::model::{Bookmark, Metadata, PageContent, SourceDocument};

use super::content::{decode_text_simple, extract_page_spans, get_number, PageFrame};

/// Abstract interface for reading a document's text layer.
pub trait PdfSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Dimensions and spans of a page (1-indexed).
    fn page(&self, page_num: u32) -> Result<Cow<'_, PageContent>>;

    /// Document information dictionary.
    fn metadata(&self) -> Metadata;

    /// Native outline, flattened depth-first. Empty if the document has none.
    fn bookmarks(&self) -> Vec<Bookmark>;
}

impl PdfSource for SourceDocument {
    fn page_count(&self) -> u32 {
        SourceDocument::page_count(self)
    }

    fn page(&self, page_num: u32) -> Result<Cow<'_, PageContent>> {
        self.get_page(page_num)
            .map(Cow::Borrowed)
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))
    }

    fn metadata(&self) -> Metadata {
        Metadata {
            page_count: self.page_count(),
            ..self.metadata.clone()
        }
    }

    fn bookmarks(&self) -> Vec<Bookmark> {
        self.bookmarks.clone()
    }
}

/// Concrete [`PdfSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    version: String,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = pdf_version_from_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc, version))
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let version = pdf_version_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc, version))
    }

    /// Load from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument, version: String) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; extracted text may be unreadable");
        }
        Self { doc, version }
    }

    /// PDF version from the file header (e.g., "1.7").
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    fn page_id(&self, page_num: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))
    }

    /// MediaBox as (llx, lly, urx, ury), inherited from the page tree.
    /// Defaults to US Letter.
    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let mut current = self.doc.get_dictionary(page_id).ok();
        let mut depth = 0;

        while let Some(dict) = current {
            if let Some(media_box) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| self.resolve_array(obj))
                .and_then(|arr| self.numbers(arr))
            {
                return media_box;
            }

            depth += 1;
            if depth > 32 {
                break;
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| p.as_reference().ok())
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }

        [0.0, 0.0, 612.0, 792.0]
    }

    fn resolve_array<'a>(&'a self, obj: &'a Object) -> Option<&'a Vec<Object>> {
        match obj {
            Object::Array(arr) => Some(arr),
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok(),
            _ => None,
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Dictionary(dict) => Some(dict),
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            _ => None,
        }
    }

    fn numbers(&self, arr: &[Object]) -> Option<[f32; 4]> {
        let mut values = [0.0; 4];
        if arr.len() < 4 {
            return None;
        }
        for (slot, obj) in values.iter_mut().zip(arr) {
            *slot = match obj {
                Object::Reference(id) => get_number(self.doc.get_object(*id).ok()?)?,
                other => get_number(other)?,
            };
        }
        Some(values)
    }

    /// Walk the outline items starting at `first`, siblings then children.
    fn collect_bookmarks(
        &self,
        first: ObjectId,
        level: u8,
        out: &mut Vec<Bookmark>,
        seen: &mut HashSet<ObjectId>,
    ) {
        let mut next = Some(first);

        while let Some(item_id) = next.take() {
            if !seen.insert(item_id) {
                log::warn!("Outline item {:?} visited twice; stopping walk", item_id);
                return;
            }
            let Ok(item) = self.doc.get_dictionary(item_id) else {
                return;
            };

            let title = get_string_from_dict(item, b"Title").unwrap_or_default();
            out.push(Bookmark::new(level, title, self.outline_destination(item)));

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.collect_bookmarks(child, level.saturating_add(1), out, seen);
            }

            next = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// Get destination page from outline item.
    fn outline_destination(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest);
        }

        let action = item.get(b"A").ok().and_then(|a| self.resolve_dict(a))?;
        action.get(b"D").ok().and_then(|d| self.resolve_destination(d))
    }

    /// Resolve a destination to a page number.
    ///
    /// Named destinations (a string or a name) are looked up in the
    /// catalog's `/Names /Dests` tree, then in the older `/Dests` dictionary.
    fn resolve_destination(&self, dest: &Object) -> Option<u32> {
        let explicit = match dest {
            Object::String(name, _) | Object::Name(name) => {
                let target = self.named_destination(name);
                if target.is_none() {
                    log::debug!(
                        "Named destination {:?} not found",
                        String::from_utf8_lossy(name)
                    );
                }
                self.explicit_destination(target?)?
            }
            other => self.explicit_destination(other)?,
        };

        match explicit.first()? {
            Object::Reference(page_ref) => self
                .doc
                .get_pages()
                .into_iter()
                .find(|(_, id)| id == page_ref)
                .map(|(num, _)| num),
            // Remote-style destinations carry a 0-based page index
            Object::Integer(index) => u32::try_from(*index).ok().map(|i| i + 1),
            _ => None,
        }
    }

    /// The destination array of `obj`, which is either the array itself or
    /// a dictionary holding it under `/D`.
    fn explicit_destination<'a>(&'a self, obj: &'a Object) -> Option<&'a Vec<Object>> {
        if let Some(arr) = self.resolve_array(obj) {
            return Some(arr);
        }
        let dest = self.resolve_dict(obj)?.get(b"D").ok()?;
        self.resolve_array(dest)
    }

    fn named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;

        let tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|names| self.resolve_dict(names))
            .and_then(|names| names.get(b"Dests").ok())
            .and_then(|dests| self.resolve_dict(dests));
        if let Some(found) = tree.and_then(|tree| self.lookup_name_tree(tree, name, 0)) {
            return Some(found);
        }

        catalog
            .get(b"Dests")
            .ok()
            .and_then(|dests| self.resolve_dict(dests))
            .and_then(|dests| dests.get(name).ok())
    }

    /// Find `name` in a name tree node and its `/Kids`.
    fn lookup_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        name: &[u8],
        depth: usize,
    ) -> Option<&'a Object> {
        if depth > 32 {
            return None;
        }

        if let Some(names) = node.get(b"Names").ok().and_then(|n| self.resolve_array(n)) {
            let found = names.chunks_exact(2).find_map(|pair| match &pair[0] {
                Object::String(key, _) if key.as_slice() == name => Some(&pair[1]),
                _ => None,
            });
            if found.is_some() {
                return found;
            }
        }

        let kids = node.get(b"Kids").ok().and_then(|k| self.resolve_array(k))?;
        kids.iter()
            .filter_map(|kid| self.resolve_dict(kid))
            .find_map(|kid| self.lookup_name_tree(kid, name, depth + 1))
    }
}

impl PdfSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page(&self, page_num: u32) -> Result<Cow<'_, PageContent>> {
        let page_id = self.page_id(page_num)?;
        let [llx, lly, urx, ury] = self.media_box(page_id);
        let mut page = PageContent::new(page_num, urx - llx, ury - lly);

        let frame = PageFrame {
            number: page_num,
            origin_y: lly,
            height: page.height,
        };
        page.spans = extract_page_spans(&self.doc, page_id, frame)?;

        Ok(Cow::Owned(page))
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata {
            page_count: self.page_count(),
            ..Default::default()
        };

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| self.resolve_dict(obj));
        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
        }

        metadata
    }

    fn bookmarks(&self) -> Vec<Bookmark> {
        let mut bookmarks = Vec::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| self.resolve_dict(outlines))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok());

        if let Some(first) = first {
            self.collect_bookmarks(first, 1, &mut bookmarks, &mut HashSet::new());
        }

        bookmarks
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}
