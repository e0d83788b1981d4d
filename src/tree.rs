use crate::record::BookmarkRecord;

/// One folder in the output hierarchy. Children are kept as a vec of
/// (name, node) pairs so child order is first-insertion order, an
/// explicit property rather than incidental map iteration.
#[derive(Debug, Default, PartialEq)]
pub struct FolderNode {
    pub children: Vec<(String, FolderNode)>,
    pub bookmarks: Vec<BookmarkRecord>,
}

impl FolderNode {
    fn child_mut(&mut self, name: &str) -> &mut FolderNode {
        let index = match self.children.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.children.push((name.to_string(), FolderNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

/// Builds the folder tree for a flat record list. Each record lands in
/// the bucket of its path's terminal node only; intermediate folders it
/// passes through stay empty unless another record ends there.
pub fn build_tree(records: Vec<BookmarkRecord>) -> FolderNode {
    let mut root = FolderNode::default();
    for record in records {
        let mut node = &mut root;
        for name in &record.folder {
            node = node.child_mut(name);
        }
        node.bookmarks.push(record);
    }
    root
}
