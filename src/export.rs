use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::record::BookmarkRecord;
use crate::tree::{build_tree, FolderNode};

const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>\n\
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n\
<TITLE>Bookmarks</TITLE>\n\
<H1>Bookmarks</H1>\n\n";

/// Renders the merged records as a Netscape bookmark document. The
/// whole document is built in memory; the output file is only touched
/// once rendering has succeeded, so no partial output is ever written.
pub fn write_bookmarks_file(path: &Path, records: Vec<BookmarkRecord>) -> Result<usize> {
    let count = records.len();
    let html = render_bookmarks(records);
    std::fs::write(path, html)
        .with_context(|| format!("failed to write bookmark file {}", path.display()))?;
    debug!("wrote {} bookmarks to {}", count, path.display());
    Ok(count)
}

pub fn render_bookmarks(records: Vec<BookmarkRecord>) -> String {
    let tree = build_tree(records);
    let mut out = String::from(HEADER);
    out.push_str("<DL><p>\n");
    render_node(&tree, 1, &mut out);
    out.push_str("</DL><p>\n");
    out
}

/// Direct bookmarks render first, then child folders, each as a heading
/// line followed by its own nested list. Indentation is four spaces per
/// depth. URLs and titles go in verbatim; the legacy dialect predates
/// attribute escaping and importers expect raw text.
fn render_node(node: &FolderNode, depth: usize, out: &mut String) {
    let indent = "    ".repeat(depth);
    for bookmark in &node.bookmarks {
        let url = bookmark.url.as_deref().unwrap_or_default();
        out.push_str(&format!(
            "{indent}<DT><A HREF=\"{url}\" ADD_DATE=\"{}\">{}</A>\n",
            bookmark.add_date, bookmark.title
        ));
    }
    for (name, child) in &node.children {
        out.push_str(&format!("{indent}<DT><H3>{name}</H3>\n"));
        out.push_str(&format!("{indent}<DL><p>\n"));
        render_node(child, depth + 1, out);
        out.push_str(&format!("{indent}</DL><p>\n"));
    }
}
