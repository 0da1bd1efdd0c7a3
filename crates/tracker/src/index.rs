use std::collections::HashMap;

use file::FsId;

use crate::{Error, NodeId, Result, TrackedTree};

/// Back-reference from a node to its entry in the [`IdentifierIndex`].
///
/// The handle is the entry's key, so it stays valid however the map grows
/// and can be checked for staleness with a single lookup.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct IndexHandle(FsId);

impl IndexHandle {
    pub fn key(&self) -> FsId {
        self.0
    }
}

/// Global map from filesystem identifier to the node owning it.
///
/// A node is in the index exactly when its identifier is defined, every
/// identifier maps to at most one node, and a node's handle always names the
/// entry whose value is that node. Both sides are only changed through
/// [`IdentifierIndex::assign`] and [`IdentifierIndex::unassign`].
#[derive(Debug, Default, Clone)]
pub struct IdentifierIndex {
    nodes: HashMap<FsId, NodeId>,
}

impl IdentifierIndex {
    /// Gives `fsid` to `node`.
    ///
    /// A different identifier previously held by `node` is dropped first. If
    /// another node owned `fsid`, it loses its identifier and is returned.
    pub fn assign(
        &mut self,
        tree: &mut TrackedTree,
        node: NodeId,
        fsid: FsId,
    ) -> Result<Option<NodeId>> {
        let slot = tree.node_mut(node)?;
        if slot.fsid == Some(fsid) && slot.index_handle == Some(IndexHandle(fsid)) {
            return Ok(None);
        }

        if let Some(handle) = slot.index_handle.take() {
            if self.nodes.get(&handle.0) == Some(&node) {
                self.nodes.remove(&handle.0);
            }
        }
        slot.fsid = Some(fsid);
        slot.index_handle = Some(IndexHandle(fsid));

        let evicted = self.nodes.insert(fsid, node).filter(|other| other != &node);
        if let Some(other) = evicted {
            if let Some(other) = tree.get_mut(other) {
                other.fsid = None;
                other.index_handle = None;
            }
        }
        Ok(evicted)
    }

    /// Clears the identifier of `node`. Returns the identifier it held, a
    /// node without one is left as is.
    pub fn unassign(&mut self, tree: &mut TrackedTree, node: NodeId) -> Result<Option<FsId>> {
        let slot = tree.node_mut(node)?;
        if let Some(handle) = slot.index_handle.take() {
            if self.nodes.get(&handle.0) == Some(&node) {
                self.nodes.remove(&handle.0);
            }
        }
        Ok(slot.fsid.take())
    }

    pub fn lookup(&self, fsid: FsId) -> Option<NodeId> {
        self.nodes.get(&fsid).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FsId, NodeId)> + '_ {
        self.nodes.iter().map(|(fsid, node)| (*fsid, *node))
    }

    /// True if `node` holds an identifier and its handle points at the entry
    /// owned by `node`.
    pub fn is_consistent(&self, tree: &TrackedTree, node: NodeId) -> bool {
        let Some(slot) = tree.get(node) else {
            return false;
        };
        match (slot.fsid, slot.index_handle) {
            (Some(fsid), Some(handle)) => {
                handle.0 == fsid && self.nodes.get(&handle.0) == Some(&node)
            }
            _ => false,
        }
    }

    /// Checks the index invariants against every node of `tree`.
    pub fn verify(&self, tree: &TrackedTree) -> Result<()> {
        for (fsid, node) in self.iter() {
            let slot = tree
                .get(node)
                .ok_or_else(|| Error::Inconsistent(format!("{fsid} maps to removed {node:?}")))?;
            if slot.fsid != Some(fsid) {
                return Err(Error::Inconsistent(format!(
                    "{fsid} maps to {node:?} which holds {:?}",
                    slot.fsid
                )));
            }
        }
        for node in tree.iter_preorder() {
            let slot = tree.node(node)?;
            if slot.fsid.is_some() != self.is_consistent(tree, node) {
                return Err(Error::Inconsistent(format!(
                    "{node:?} holds {:?} with handle {:?}",
                    slot.fsid, slot.index_handle
                )));
            }
            if slot.fsid.is_none() && slot.index_handle.is_some() {
                return Err(Error::Inconsistent(format!(
                    "{node:?} has a handle but no identifier"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use file::{FileType, FsId};

    use crate::TrackedTree;

    use super::IdentifierIndex;

    fn tree_with_files(count: usize) -> (TrackedTree, Vec<crate::NodeId>) {
        let mut tree = TrackedTree::default();
        let root = tree.root();
        let nodes = (0..count)
            .map(|i| {
                tree.add_child(root, format!("f_{i}"), FileType::File, None)
                    .unwrap()
            })
            .collect();
        (tree, nodes)
    }

    #[test]
    fn assign_and_lookup() {
        let (mut tree, nodes) = tree_with_files(2);
        let mut index = IdentifierIndex::default();

        assert_eq!(index.assign(&mut tree, nodes[0], FsId(10)).unwrap(), None);
        assert_eq!(index.assign(&mut tree, nodes[1], FsId(11)).unwrap(), None);

        assert_eq!(index.lookup(FsId(10)), Some(nodes[0]));
        assert_eq!(index.lookup(FsId(11)), Some(nodes[1]));
        assert_eq!(index.lookup(FsId(12)), None);
        assert!(index.is_consistent(&tree, nodes[0]));
        assert!(!index.is_consistent(&tree, tree.root()));
        assert_eq!(index.len(), 2);
        index.verify(&tree).unwrap();
    }

    #[test]
    fn reassign_drops_stale_mapping() {
        let (mut tree, nodes) = tree_with_files(1);
        let mut index = IdentifierIndex::default();

        index.assign(&mut tree, nodes[0], FsId(10)).unwrap();
        index.assign(&mut tree, nodes[0], FsId(20)).unwrap();

        assert_eq!(index.lookup(FsId(10)), None);
        assert_eq!(index.lookup(FsId(20)), Some(nodes[0]));
        assert_eq!(tree.node(nodes[0]).unwrap().fsid(), Some(FsId(20)));
        assert_eq!(index.len(), 1);
        index.verify(&tree).unwrap();
    }

    #[test]
    fn assign_evicts_previous_owner() {
        let (mut tree, nodes) = tree_with_files(2);
        let mut index = IdentifierIndex::default();

        index.assign(&mut tree, nodes[0], FsId(10)).unwrap();
        assert_eq!(
            index.assign(&mut tree, nodes[1], FsId(10)).unwrap(),
            Some(nodes[0])
        );

        assert_eq!(tree.node(nodes[0]).unwrap().fsid(), None);
        assert!(tree.node(nodes[0]).unwrap().index_handle().is_none());
        assert_eq!(index.lookup(FsId(10)), Some(nodes[1]));
        assert_eq!(index.len(), 1);
        index.verify(&tree).unwrap();
    }

    #[test]
    fn assign_same_is_noop() {
        let (mut tree, nodes) = tree_with_files(1);
        let mut index = IdentifierIndex::default();

        index.assign(&mut tree, nodes[0], FsId(10)).unwrap();
        assert_eq!(index.assign(&mut tree, nodes[0], FsId(10)).unwrap(), None);
        assert_eq!(index.len(), 1);
        assert!(index.is_consistent(&tree, nodes[0]));
    }

    #[test]
    fn unassign_is_idempotent() {
        let (mut tree, nodes) = tree_with_files(1);
        let mut index = IdentifierIndex::default();

        index.assign(&mut tree, nodes[0], FsId(10)).unwrap();
        assert_eq!(index.unassign(&mut tree, nodes[0]).unwrap(), Some(FsId(10)));
        assert_eq!(index.unassign(&mut tree, nodes[0]).unwrap(), None);
        assert!(index.is_empty());
        assert!(!index.is_consistent(&tree, nodes[0]));
        index.verify(&tree).unwrap();
    }

    #[test]
    fn unknown_node() {
        let (mut tree, nodes) = tree_with_files(1);
        let mut index = IdentifierIndex::default();
        let removed = nodes[0];
        tree.remove_subtree(removed, &mut index).unwrap();

        assert!(index.assign(&mut tree, removed, FsId(1)).is_err());
        assert!(index.unassign(&mut tree, removed).is_err());
    }
}
