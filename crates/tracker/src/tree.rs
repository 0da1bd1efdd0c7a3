use std::path::PathBuf;

use file::{FileType, Fingerprint, FsId};
use utils::tree_stringify;

use crate::{Error, IdentifierIndex, IndexHandle, Result};

/// Index of a node inside its [`TrackedTree`]. Never reused after removal.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct TrackedNode {
    name: String,
    file_type: FileType,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    fingerprint: Option<Fingerprint>,
    pub(crate) fsid: Option<FsId>,
    pub(crate) index_handle: Option<IndexHandle>,
}

impl TrackedNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Fingerprint computed when the entry was last scanned, `None` if it
    /// could not be computed.
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    pub fn fsid(&self) -> Option<FsId> {
        self.fsid
    }

    pub fn index_handle(&self) -> Option<IndexHandle> {
        self.index_handle
    }
}

/// Arena of tracked nodes. The root is a directory standing for the sync
/// root itself and has no name.
#[derive(Debug, Clone)]
pub struct TrackedTree {
    nodes: Vec<Option<TrackedNode>>,
    root: NodeId,
}

impl Default for TrackedTree {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TrackedTree {
    pub fn new(root_fingerprint: Option<Fingerprint>) -> Self {
        Self {
            nodes: vec![Some(TrackedNode {
                name: String::new(),
                file_type: FileType::Directory,
                parent: None,
                children: vec![],
                fingerprint: root_fingerprint,
                fsid: None,
                index_handle: None,
            })],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&TrackedNode> {
        self.nodes.get(id.0).and_then(|n| n.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut TrackedNode> {
        self.nodes.get_mut(id.0).and_then(|n| n.as_mut())
    }

    pub fn node(&self, id: NodeId) -> Result<&TrackedNode> {
        self.get(id).ok_or(Error::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut TrackedNode> {
        self.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        file_type: FileType,
        fingerprint: Option<Fingerprint>,
    ) -> Result<NodeId> {
        let name = name.into();
        let parent_node = self.node(parent)?;
        if !parent_node.file_type.is_dir() {
            return Err(Error::NotADirectory(parent));
        }
        if self.child_by_name(parent, &name)?.is_some() {
            return Err(Error::DuplicateName { parent, name });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(TrackedNode {
            name,
            file_type,
            parent: Some(parent),
            children: vec![],
            fingerprint,
            fsid: None,
            index_handle: None,
        }));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Result<Option<NodeId>> {
        Ok(self
            .node(parent)?
            .children
            .iter()
            .copied()
            .find(|c| self.get(*c).map(|n| n.name == name).unwrap_or(false)))
    }

    pub fn set_fingerprint(&mut self, id: NodeId, fingerprint: Option<Fingerprint>) -> Result<()> {
        self.node_mut(id)?.fingerprint = fingerprint;
        Ok(())
    }

    /// Path of `id` relative to the sync root; empty for the root.
    pub fn relative_path(&self, id: NodeId) -> Result<PathBuf> {
        let mut names = vec![];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.node(parent)?;
        }
        Ok(names.into_iter().rev().collect())
    }

    /// Visits `from` and its descendants, parents before children, children
    /// in insertion order.
    pub fn iter_preorder_from(&self, from: NodeId) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: if self.get(from).is_some() {
                vec![from]
            } else {
                vec![]
            },
        }
    }

    pub fn iter_preorder(&self) -> PreOrder<'_> {
        self.iter_preorder_from(self.root)
    }

    /// Removes `id` and its descendants, dropping their identifiers from
    /// `index`. Returns the number of removed nodes.
    pub fn remove_subtree(&mut self, id: NodeId, index: &mut IdentifierIndex) -> Result<usize> {
        if id == self.root {
            return Err(Error::RemoveRoot);
        }
        let parent = self.node(id)?.parent;
        let removed = self.iter_preorder_from(id).collect::<Vec<_>>();
        for node in removed.iter() {
            index.unassign(self, *node)?;
        }
        for node in removed.iter() {
            self.nodes[node.0] = None;
        }
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|c| c != &id);
        }
        Ok(removed.len())
    }

    /// One line per non-root node with its identifier, for diagnostics.
    pub fn stringify(&self) -> String {
        let entries = self
            .iter_preorder()
            .filter(|id| *id != self.root)
            .filter_map(|id| {
                let node = self.get(id)?;
                let path = self
                    .relative_path(id)
                    .ok()?
                    .iter()
                    .map(|c| c.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                let fsid = node
                    .fsid
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "-".to_owned());
                Some((path, fsid))
            })
            .collect::<Vec<_>>();

        tree_stringify(entries.iter().map(|(p, c)| (p.as_str(), c)), "/")
    }
}

pub struct PreOrder<'a> {
    tree: &'a TrackedTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.get(id) {
            self.stack.extend(node.children.iter().rev());
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use file::{FileType, Fingerprint, FsId};
    use indoc::indoc;

    use crate::{Error, IdentifierIndex};

    use super::TrackedTree;

    #[test]
    fn build_and_walk() {
        let mut tree = TrackedTree::default();
        let root = tree.root();
        let d_0 = tree.add_child(root, "d_0", FileType::Directory, None).unwrap();
        let f_1 = tree.add_child(root, "f_1", FileType::File, None).unwrap();
        let f_0_0 = tree.add_child(d_0, "f_0_0", FileType::File, None).unwrap();

        assert_eq!(
            tree.iter_preorder().collect::<Vec<_>>(),
            vec![root, d_0, f_0_0, f_1]
        );
        assert_eq!(tree.relative_path(f_0_0).unwrap(), PathBuf::from("d_0/f_0_0"));
        assert_eq!(tree.relative_path(root).unwrap(), PathBuf::new());
        assert_eq!(tree.child_by_name(d_0, "f_0_0").unwrap(), Some(f_0_0));
        assert_eq!(tree.node(f_0_0).unwrap().parent(), Some(d_0));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn add_child_errors() {
        let mut tree = TrackedTree::default();
        let root = tree.root();
        let f = tree.add_child(root, "f", FileType::File, None).unwrap();

        assert_eq!(
            tree.add_child(root, "f", FileType::File, None),
            Err(Error::DuplicateName {
                parent: root,
                name: "f".to_owned()
            })
        );
        assert_eq!(
            tree.add_child(f, "g", FileType::File, None),
            Err(Error::NotADirectory(f))
        );
    }

    #[test]
    fn remove_subtree_unassigns() {
        let mut tree = TrackedTree::default();
        let mut index = IdentifierIndex::default();
        let root = tree.root();
        let d = tree.add_child(root, "d", FileType::Directory, None).unwrap();
        let f = tree.add_child(d, "f", FileType::File, None).unwrap();
        let g = tree.add_child(root, "g", FileType::File, None).unwrap();
        index.assign(&mut tree, d, FsId(1)).unwrap();
        index.assign(&mut tree, f, FsId(2)).unwrap();
        index.assign(&mut tree, g, FsId(3)).unwrap();

        assert_eq!(tree.remove_subtree(d, &mut index).unwrap(), 2);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(FsId(3)), Some(g));
        assert!(tree.get(f).is_none());
        assert_eq!(tree.node(root).unwrap().children(), &[g]);
        assert_eq!(tree.remove_subtree(root, &mut index), Err(Error::RemoveRoot));
        assert!(index.verify(&tree).is_ok());
    }

    #[test]
    fn stringify() {
        let mut tree = TrackedTree::default();
        let mut index = IdentifierIndex::default();
        let root = tree.root();
        let fingerprint = Some(Fingerprint::of_content(b"x", 1));
        let d_0 = tree.add_child(root, "d_0", FileType::Directory, None).unwrap();
        let f_0_0 = tree.add_child(d_0, "f_0_0", FileType::File, fingerprint).unwrap();
        tree.add_child(d_0, "f_0_1", FileType::File, fingerprint).unwrap();
        tree.add_child(root, "f_1", FileType::File, fingerprint).unwrap();
        index.assign(&mut tree, f_0_0, FsId(7)).unwrap();

        assert_eq!(
            tree.stringify(),
            indoc! {"
                ├ d_0 [-]
                │ ├ f_0_0 [#7]
                │ └ f_0_1 [-]
                └ f_1 [-]
            "}
        );
    }
}
