use crate::error::ProductibleError;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITED: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Deepest page tree walked when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// A PDF to concatenate, with the name used in errors and logs.
#[derive(Debug, Clone)]
pub struct NamedPdf {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedPdf {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        NamedPdf {
            name: name.into(),
            bytes,
        }
    }
}

/// Append the optional annexes to the generated report, in order:
/// technical summary (TRS) first, then the wiring diagram.
///
/// A missing annex is not an error; the report is produced without it.
pub fn assemble_report(
    report: Vec<u8>,
    technical_summary: Option<NamedPdf>,
    wiring_diagram: Option<NamedPdf>,
) -> Result<Vec<u8>, ProductibleError> {
    if technical_summary.is_none() {
        log::warn!("report generated without the technical summary (TRS) annex");
    }
    if wiring_diagram.is_none() {
        log::warn!("report generated without the wiring diagram annex");
    }
    if technical_summary.is_none() && wiring_diagram.is_none() {
        return Ok(report);
    }

    let mut parts = vec![NamedPdf::new("report", report)];
    parts.extend(technical_summary);
    parts.extend(wiring_diagram);
    merge_documents(&parts)
}

/// Concatenate the pages of every part into one document.
pub fn merge_documents(parts: &[NamedPdf]) -> Result<Vec<u8>, ProductibleError> {
    if parts.is_empty() {
        return Err(ProductibleError::InvalidInput("no documents to merge".into()));
    }

    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut next_id = 1;

    for part in parts {
        let fail = |reason: String| ProductibleError::Merge {
            document: part.name.clone(),
            reason,
        };

        let mut doc = Document::load_mem(&part.bytes).map_err(|e| fail(e.to_string()))?;
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(fail("document has no pages".into()));
        }
        for &page_id in &page_ids {
            let page = page_with_inherited(&doc, page_id).map_err(|e| fail(e.to_string()))?;
            pages.push((page_id, page));
        }
        log::debug!("appending {} page(s) from {}", page_ids.len(), part.name);

        objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !is_tree_node(object)),
        );
    }

    let mut merged = Document::with_version("1.5");
    merged.objects = objects;
    let pages_id = (next_id, 0);
    merged.max_id = next_id;

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (page_id, mut page) in pages {
        page.set("Parent", pages_id);
        merged.objects.insert(page_id, Object::Dictionary(page));
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    merged.compress();

    let mut out = Vec::new();
    merged
        .save_to(&mut out)
        .map_err(|e| ProductibleError::Render(e.to_string()))?;
    log::info!("merged {} document(s) into {} page(s)", parts.len(), count);
    Ok(out)
}

/// The page dictionary with attributes inherited from its ancestors copied in.
fn page_with_inherited(doc: &Document, page_id: ObjectId) -> Result<Dictionary, lopdf::Error> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    let mut parent = parent_of(&page);

    for _ in 0..MAX_TREE_DEPTH {
        let Some(id) = parent else { break };
        let node = doc.get_dictionary(id)?;
        for key in INHERITED {
            if page.has(key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                page.set(key.to_vec(), value.clone());
            }
        }
        parent = parent_of(node);
    }
    Ok(page)
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent").and_then(|p| p.as_reference()).ok()
}

fn is_tree_node(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    match dict.get(b"Type").and_then(|t| t.as_name()) {
        Ok(name) => name == b"Catalog" || name == b"Pages",
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    /// A document of `count` blank-ish pages. With `box_on_tree` the
    /// MediaBox lives on the Pages node instead of each page.
    fn sample_pdf(count: usize, box_on_tree: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 595.into(), 842.into()];

        let mut kids: Vec<Object> = Vec::new();
        for i in 0..count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Td", vec![50.into(), (700 - i as i64).into()]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if !box_on_tree {
                page.set("MediaBox", media_box.clone());
            }
            kids.push(doc.add_object(page).into());
        }

        let mut tree = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => dictionary! {},
        };
        if box_on_tree {
            tree.set("MediaBox", media_box);
        }
        doc.objects.insert(pages_id, Object::Dictionary(tree));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_merge_keeps_page_order_and_count() {
        let merged = merge_documents(&[
            NamedPdf::new("report", sample_pdf(3, false)),
            NamedPdf::new("trs.pdf", sample_pdf(2, false)),
            NamedPdf::new("wiring.pdf", sample_pdf(1, false)),
        ])
        .unwrap();
        assert_eq!(page_count(&merged), 6);
    }

    #[test]
    fn test_inherited_media_box_is_copied_onto_pages() {
        let merged = merge_documents(&[
            NamedPdf::new("report", sample_pdf(1, false)),
            NamedPdf::new("trs.pdf", sample_pdf(2, true)),
        ])
        .unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        for page_id in doc.get_pages().into_values() {
            let page = doc.get_dictionary(page_id).unwrap();
            assert!(page.has(b"MediaBox"));
        }
    }

    #[test]
    fn test_unreadable_annex_names_the_document() {
        let err = merge_documents(&[
            NamedPdf::new("report", sample_pdf(1, false)),
            NamedPdf::new("wiring.pdf", b"not a pdf".to_vec()),
        ])
        .unwrap_err();
        match err {
            ProductibleError::Merge { document, .. } => assert_eq!(document, "wiring.pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nothing_to_merge() {
        assert!(matches!(
            merge_documents(&[]),
            Err(ProductibleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_assemble_without_annexes_returns_report() {
        let report = sample_pdf(3, false);
        let out = assemble_report(report.clone(), None, None).unwrap();
        assert_eq!(out, report);
    }

    #[test]
    fn test_assemble_with_one_annex() {
        let out = assemble_report(
            sample_pdf(3, false),
            None,
            Some(NamedPdf::new("wiring.pdf", sample_pdf(2, true))),
        )
        .unwrap();
        assert_eq!(page_count(&out), 5);
    }
}
