//! Session tree: one rooted tree of chat sessions built from a flat record list.
//!
//! Every traversal here is iterative so arbitrarily deep delegation chains
//! never grow the call stack.

use std::collections::HashMap;

use tracing::debug;

use crate::error::TreeError;
use crate::model::{SessionId, SessionRecord, SessionStatus, SessionTime};

/// Children closer together than this are treated as spawned in parallel.
pub const PARALLEL_GAP_MS: i64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: SessionId,
    pub title: Option<String>,
    pub time: SessionTime,
    pub status: SessionStatus,
    /// Always sorted ascending by `time.created`
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            time: record.time,
            status: record.status.clone().unwrap_or_default(),
            children: Vec::new(),
        }
    }

    /// Title, or the id when there is none
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => self.id.as_str(),
        }
    }

    fn sort_children(&mut self) {
        self.children.sort_by_key(|child| child.time.created);
    }
}

/// One visible line of the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
    pub is_last: bool,
    /// For each ancestor column below the root: does that ancestor have a later sibling?
    pub ancestor_continues: Vec<bool>,
}

// ============================================================================
// FUNCTIONAL CORE: construction and queries
// ============================================================================

/// Build the tree rooted at the single parent-less record.
///
/// Records whose parent is not in `sessions` are dropped, as are later
/// duplicates of an id already seen. Siblings keep input order when their
/// creation times tie.
///
/// # Returns
/// * `Some(root)` - the assembled tree
/// * `None` - no record without a parent was found
pub fn build(sessions: &[SessionRecord]) -> Option<TreeNode> {
    let mut index: HashMap<&SessionId, usize> = HashMap::with_capacity(sessions.len());
    let mut records: Vec<&SessionRecord> = Vec::with_capacity(sessions.len());
    for record in sessions {
        if index.contains_key(&record.id) {
            debug!(session_id = %record.id, "duplicate session record ignored");
            continue;
        }
        index.insert(&record.id, records.len());
        records.push(record);
    }

    let mut root = None;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (i, record) in records.iter().enumerate() {
        match record.effective_parent_id() {
            None => {
                if root.is_none() {
                    root = Some(i);
                } else {
                    debug!(session_id = %record.id, "extra root session ignored");
                }
            }
            Some(parent_id) => match index.get(parent_id) {
                Some(&parent) if parent != i => children[parent].push(i),
                _ => debug!(
                    session_id = %record.id,
                    parent_id = %parent_id,
                    "session parent not loaded, dropped from tree"
                ),
            },
        }
    }
    let root = root?;

    // Pre-order over the reachable nodes, then assemble bottom-up in reverse.
    let mut order = Vec::with_capacity(records.len());
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().copied());
    }

    let mut slots: Vec<Option<TreeNode>> = vec![None; records.len()];
    for &i in order.iter().rev() {
        let mut node = TreeNode::from_record(records[i]);
        node.children = children[i]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        node.sort_children();
        slots[i] = Some(node);
    }

    slots[root].take()
}

/// Depth-first lookup. Absent ids return `None`.
pub fn find_by_id<'a>(tree: &'a TreeNode, id: &SessionId) -> Option<&'a TreeNode> {
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        if node.id == *id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

pub fn find_by_id_mut<'a>(tree: &'a mut TreeNode, id: &SessionId) -> Option<&'a mut TreeNode> {
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        if node.id == *id {
            return Some(node);
        }
        stack.extend(node.children.iter_mut().rev());
    }
    None
}

pub fn contains(tree: &TreeNode, id: &SessionId) -> bool {
    find_by_id(tree, id).is_some()
}

/// Partition children (sorted by creation time) into groups separated by
/// gaps of at least [`PARALLEL_GAP_MS`].
pub fn detect_parallel_groups(children: &[TreeNode]) -> Vec<Vec<SessionId>> {
    let mut sorted: Vec<&TreeNode> = children.iter().collect();
    sorted.sort_by_key(|child| child.time.created);

    let mut groups = Vec::new();
    let mut current: Vec<SessionId> = Vec::new();
    let mut last_created = None;
    for child in sorted {
        if let Some(last) = last_created {
            if child.time.created - last >= PARALLEL_GAP_MS && !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(child.id.clone());
        last_created = Some(child.time.created);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Flatten the tree into display rows in pre-order.
pub fn rows(tree: &TreeNode) -> Vec<TreeRow<'_>> {
    let mut rows = Vec::new();
    let mut stack = vec![TreeRow {
        node: tree,
        depth: 0,
        is_last: true,
        ancestor_continues: Vec::new(),
    }];
    while let Some(row) = stack.pop() {
        let count = row.node.children.len();
        for (i, child) in row.node.children.iter().enumerate().rev() {
            let mut ancestor_continues = row.ancestor_continues.clone();
            if row.depth > 0 {
                ancestor_continues.push(!row.is_last);
            }
            stack.push(TreeRow {
                node: child,
                depth: row.depth + 1,
                is_last: i + 1 == count,
                ancestor_continues,
            });
        }
        rows.push(row);
    }
    rows
}

// ============================================================================
// MUTATIONS: live updates from the event stream
// ============================================================================

/// Attach `record` as a new leaf under its parent and re-sort the siblings.
///
/// # Errors
/// * `NoParent` - the record is itself a root
/// * `DuplicateNode` - the id is already in the tree
/// * `ParentNotFound` - the parent is not part of this tree
pub fn insert(tree: &mut TreeNode, record: &SessionRecord) -> Result<(), TreeError> {
    let parent_id = record
        .effective_parent_id()
        .ok_or_else(|| TreeError::NoParent(record.id.clone()))?;
    if contains(tree, &record.id) {
        return Err(TreeError::DuplicateNode(record.id.clone()));
    }
    let parent = find_by_id_mut(tree, parent_id).ok_or_else(|| TreeError::ParentNotFound {
        session_id: record.id.clone(),
        parent_id: parent_id.clone(),
    })?;
    parent.children.push(TreeNode::from_record(record));
    parent.sort_children();
    Ok(())
}

pub fn update_title(
    tree: &mut TreeNode,
    id: &SessionId,
    title: Option<String>,
) -> Result<(), TreeError> {
    let node = find_by_id_mut(tree, id).ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
    node.title = title;
    Ok(())
}

pub fn update_status(
    tree: &mut TreeNode,
    id: &SessionId,
    status: SessionStatus,
) -> Result<(), TreeError> {
    let node = find_by_id_mut(tree, id).ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
    node.status = status;
    Ok(())
}
