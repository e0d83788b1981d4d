use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use tracing::debug;

use crate::record::BookmarkRecord;

/// Work items for the document walk. `CloseContext` is pushed when a
/// `<DL>` block is entered and reached again once all of the block's
/// children have been processed, closing that block's folder context.
enum WalkItem<'a> {
    Element(ElementRef<'a>),
    CloseContext,
}

pub fn parse_bookmarks_file(path: &Path) -> Result<Vec<BookmarkRecord>> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bookmark export {}", path.display()))?;
    let records = parse_bookmarks_html(&html);
    debug!("parsed {} bookmarks from {}", records.len(), path.display());
    Ok(records)
}

/// Parses a Netscape bookmark export into canonical records in document
/// order.
///
/// Folder scoping follows the format's nesting rules: every `<DL>` block
/// opens one context on an explicit stack, the `<DT><H3>` heading
/// immediately preceding the block supplies that context's name (the
/// outermost list and stray lists stay anonymous), and the block's end
/// pops the context again. A bookmark's folder path is the list of named
/// contexts on the stack at the time its `<DT><A>` is seen.
///
/// Malformed markup never fails here. Export files are sometimes
/// hand-edited, so the html5ever tree builder absorbs broken tags and a
/// link without an HREF is still emitted; the merge stage filters it.
pub fn parse_bookmarks_html(html: &str) -> Vec<BookmarkRecord> {
    let document = Html::parse_document(html);
    let h3_selector = Selector::parse("h3").unwrap();
    let a_selector = Selector::parse("a").unwrap();

    let mut records = Vec::new();
    // One entry per open <DL>; None for blocks no heading labeled.
    let mut contexts: Vec<Option<String>> = Vec::new();
    let mut pending_name: Option<String> = None;
    let mut walk: Vec<WalkItem> = Vec::new();

    for child in document.root_element().children().rev() {
        if let Some(element) = ElementRef::wrap(child) {
            walk.push(WalkItem::Element(element));
        }
    }

    while let Some(item) = walk.pop() {
        match item {
            WalkItem::Element(element) => {
                match element.value().name() {
                    "dt" => {
                        if let Some(heading) = element.select(&h3_selector).next() {
                            // Names the <DL> block that follows.
                            pending_name = Some(element_text(heading));
                        } else if let Some(link) = element.select(&a_selector).next() {
                            records.push(link_record(link, &contexts));
                        }
                    }
                    "dl" => {
                        contexts.push(pending_name.take());
                        walk.push(WalkItem::CloseContext);
                    }
                    _ => {}
                }
                for child in element.children().rev() {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        walk.push(WalkItem::Element(child_element));
                    }
                }
            }
            WalkItem::CloseContext => {
                // Vec::pop on the empty stack is a no-op, so stray list
                // ends can never pop past the root.
                contexts.pop();
                // A heading at the end of a block labels nothing.
                pending_name = None;
            }
        }
    }

    records
}

fn link_record(link: ElementRef, contexts: &[Option<String>]) -> BookmarkRecord {
    let url = link.value().attr("href").map(str::to_string);
    let add_date = link.value().attr("add_date").unwrap_or("");
    let folder = contexts
        .iter()
        .flatten()
        .filter(|name| !name.is_empty())
        .cloned()
        .collect();
    BookmarkRecord::new(element_text(link), url, folder, add_date)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
