//! Output document assembly.
//!
//! Each recognized page arrives as its own single-page PDF. Only the objects
//! reachable from that page are imported, renumbered into the output
//! document, and the page is re-parented under the output page tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::Path;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

use super::recognize::PageFragment;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `Parent` chains in malformed fragments.
const MAX_TREE_DEPTH: usize = 64;

/// A PDF built one page at a time.
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append the first page of `fragment` as the next page.
    pub fn append(&mut self, fragment: &PageFragment) -> Result<()> {
        let page = fragment.ordinal;
        let fragment_err = |message: String| Error::Fragment { page, message };

        if !fragment.pdf.starts_with(PDF_MAGIC) {
            return Err(fragment_err("not a PDF document".into()));
        }

        let source = Document::load_mem(&fragment.pdf).map_err(|e| fragment_err(e.to_string()))?;
        let pages = source.get_pages();
        let source_page_id = *pages
            .values()
            .next()
            .ok_or_else(|| fragment_err("document has no pages".into()))?;
        if pages.len() > 1 {
            log::warn!(
                "Recognized page {} has {} pages; keeping the first",
                page,
                pages.len()
            );
        }

        let mut page_dict = source
            .get_dictionary(source_page_id)
            .map_err(|e| fragment_err(e.to_string()))?
            .clone();
        inherit_attributes(&source, &mut page_dict);
        page_dict.remove(b"Parent");

        let mut reachable = BTreeSet::new();
        for (_, value) in page_dict.iter() {
            collect_references(&source, value, &mut reachable);
        }

        let mut id_map = BTreeMap::new();
        for old_id in &reachable {
            id_map.insert(*old_id, self.doc.new_object_id());
        }
        let page_id = match id_map.get(&source_page_id) {
            Some(id) => *id,
            None => self.doc.new_object_id(),
        };

        for (old_id, new_id) in &id_map {
            if *old_id == source_page_id {
                continue;
            }
            let object = source
                .get_object(*old_id)
                .map_err(|e| fragment_err(e.to_string()))?
                .clone();
            self.doc.objects.insert(*new_id, remap_references(object, &id_map));
        }

        let mut page_dict = remap_dict(page_dict, &id_map);
        page_dict.set("Parent", Object::Reference(self.pages_id));
        self.doc.objects.insert(page_id, Object::Dictionary(page_dict));
        self.kids.push(page_id);

        log::trace!("Appended page {} as object {:?}", page, page_id);
        Ok(())
    }

    /// Serialize the document.
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        if self.kids.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let kids: Vec<Object> = self.kids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.kids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| Error::PdfWrite(e.to_string()))?;
        Ok(buffer)
    }

    /// Serialize the document to `path` in one atomic step.
    ///
    /// The bytes go to a temporary file next to `path` that is renamed over
    /// it, so `path` is untouched unless the whole write succeeds.
    pub fn save(self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = staging_file(dir, path)?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Temporary file in `dir` carrying the permissions `path` should end up with.
///
/// An existing destination keeps its mode. A new one gets the same mode a
/// plain `File::create` would, i.e. `0o666` minus the process umask.
fn staging_file(dir: &Path, path: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let staged = builder.tempfile_in(dir)?;

    if let Some(permissions) = existing {
        staged.as_file().set_permissions(permissions)?;
    }
    Ok(staged)
}

/// Copy inheritable attributes from the page's ancestors onto the page.
fn inherit_attributes(source: &Document, page_dict: &mut Dictionary) {
    let mut parent = parent_of(page_dict);
    let mut depth = 0;

    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = source.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page_dict.has(key) {
                if let Ok(value) = node.get(key) {
                    page_dict.set(*key, value.clone());
                }
            }
        }
        parent = parent_of(node);
    }
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent").and_then(Object::as_reference).ok()
}

/// Collect every existing object id reachable from `object`, not following `Parent`.
fn collect_references(source: &Document, object: &Object, seen: &mut BTreeSet<ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Ok(target) = source.get_object(*id) {
                if seen.insert(*id) {
                    collect_references(source, target, seen);
                }
            }
        }
        Object::Array(items) => {
            for item in items {
                collect_references(source, item, seen);
            }
        }
        Object::Dictionary(dict) => collect_dict_references(source, dict, seen),
        Object::Stream(stream) => collect_dict_references(source, &stream.dict, seen),
        _ => {}
    }
}

fn collect_dict_references(source: &Document, dict: &Dictionary, seen: &mut BTreeSet<ObjectId>) {
    for (key, value) in dict.iter() {
        if key.as_slice() != b"Parent" {
            collect_references(source, value, seen);
        }
    }
}

/// Rewrite references through `id_map`; unmapped references become null.
fn remap_references(object: Object, id_map: &BTreeMap<ObjectId, ObjectId>) -> Object {
    match object {
        Object::Reference(id) => match id_map.get(&id) {
            Some(new_id) => Object::Reference(*new_id),
            None => Object::Null,
        },
        Object::Array(items) => Object::Array(
            items
                .into_iter()
                .map(|item| remap_references(item, id_map))
                .collect(),
        ),
        Object::Dictionary(dict) => Object::Dictionary(remap_dict(dict, id_map)),
        Object::Stream(mut stream) => {
            stream.dict = remap_dict(stream.dict, id_map);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dict(dict: Dictionary, id_map: &BTreeMap<ObjectId, ObjectId>) -> Dictionary {
    let mut out = Dictionary::new();
    for (key, value) in dict.into_iter() {
        out.set(key, remap_references(value, id_map));
    }
    out
}
