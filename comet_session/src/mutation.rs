// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classifying structural mutations from the editor content and the
//! application shell.
//!
//! Hosts forward mutation-observer batches as [`MutationRecord`]s. The
//! content side only cares whether anything other than line-break or
//! table-wrapper churn happened; the shell side only cares about modal
//! dialogs coming and going.

use comet_caret::Markers;
use smallvec::SmallVec;

/// What kind of change a record describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Children were added or removed.
    ChildList,
    /// An attribute changed.
    Attributes,
    /// Text content changed.
    CharacterData,
}

/// Summary of a node added to or removed from the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutatedNode {
    /// Upper-case node name (`"DIV"`, `"BR"`, `"#text"`).
    pub name: String,
    /// Space-separated class list; empty for non-elements.
    pub class_names: String,
}

impl MutatedNode {
    /// An element node.
    pub fn element(name: impl Into<String>, class_names: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_names: class_names.into(),
        }
    }

    /// A text node.
    pub fn text() -> Self {
        Self::element("#text", "")
    }

    /// Whether the node carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class_names.split_ascii_whitespace().any(|c| c == class)
    }
}

/// One observed mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationRecord {
    /// Kind of mutation.
    pub kind: MutationKind,
    /// Nodes added by a child-list mutation.
    pub added: SmallVec<[MutatedNode; 2]>,
    /// Nodes removed by a child-list mutation.
    pub removed: SmallVec<[MutatedNode; 2]>,
}

impl MutationRecord {
    /// A child-list mutation.
    pub fn child_list(
        added: impl IntoIterator<Item = MutatedNode>,
        removed: impl IntoIterator<Item = MutatedNode>,
    ) -> Self {
        Self {
            kind: MutationKind::ChildList,
            added: added.into_iter().collect(),
            removed: removed.into_iter().collect(),
        }
    }

    /// A child-list mutation that only added nodes.
    pub fn added(nodes: impl IntoIterator<Item = MutatedNode>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            added: nodes.into_iter().collect(),
            removed: SmallVec::new(),
        }
    }

    /// A child-list mutation that only removed nodes.
    pub fn removed(nodes: impl IntoIterator<Item = MutatedNode>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            added: SmallVec::new(),
            removed: nodes.into_iter().collect(),
        }
    }
}

/// Modal dialog transitions observed in the application shell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModalChange {
    /// A modal dialog container was inserted.
    Opened,
    /// A modal dialog container was removed.
    Closed,
}

/// Whether a content batch changed structure in a way that can move the caret.
pub fn content_changed(records: &[MutationRecord], markers: &Markers) -> bool {
    let significant = |node: &MutatedNode| {
        node.name != markers.line_break && !node.has_class(&markers.table_cell_wrapper)
    };
    records
        .iter()
        .filter(|r| r.kind == MutationKind::ChildList)
        .any(|r| r.added.iter().any(significant) || r.removed.iter().any(significant))
}

/// The last modal transition in a shell batch, if any.
pub fn modal_change(records: &[MutationRecord], markers: &Markers) -> Option<ModalChange> {
    let is_modal =
        |node: &MutatedNode| node.name == markers.modal_node && node.has_class(&markers.modal_container);
    let mut change = None;
    for record in records.iter().filter(|r| r.kind == MutationKind::ChildList) {
        if record.added.iter().any(is_modal) {
            change = Some(ModalChange::Opened);
        }
        if record.removed.iter().any(is_modal) {
            change = Some(ModalChange::Closed);
        }
    }
    change
}
