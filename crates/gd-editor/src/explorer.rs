//! Explorer panel rows: the tree flattened for display.

use gd_core::{ElementId, ElementKind, SceneTree};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorerRow {
    pub depth: usize,
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: String,
    pub has_children: bool,
    pub expanded: bool,
    pub selected: bool,
}

/// Pre-order rows; children of collapsed elements are left out.
pub fn explorer_rows(
    tree: &SceneTree,
    expanded: &HashSet<ElementId>,
    selection: Option<ElementId>,
) -> Vec<ExplorerRow> {
    let mut rows = Vec::with_capacity(tree.len());
    for &root in tree.roots() {
        push_rows(tree, root, 0, expanded, selection, &mut rows);
    }
    rows
}

fn push_rows(
    tree: &SceneTree,
    id: ElementId,
    depth: usize,
    expanded: &HashSet<ElementId>,
    selection: Option<ElementId>,
    rows: &mut Vec<ExplorerRow>,
) {
    let Some(el) = tree.find_by_id(id) else {
        return;
    };
    let is_expanded = expanded.contains(&id);
    rows.push(ExplorerRow {
        depth,
        id,
        kind: el.kind(),
        name: el.name().to_string(),
        has_children: !el.children.is_empty(),
        expanded: is_expanded,
        selected: selection == Some(id),
    });

    if is_expanded {
        for &child in &el.children {
            push_rows(tree, child, depth + 1, expanded, selection, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collapsed_children_are_hidden() {
        let mut tree = SceneTree::new();
        let frame = tree.add(ElementKind::Frame);
        let label = tree.add(ElementKind::TextLabel);
        let button = tree.add(ElementKind::TextButton);
        tree.reparent(label, frame).unwrap();

        let collapsed = explorer_rows(&tree, &HashSet::new(), Some(button));
        let ids: Vec<ElementId> = collapsed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![frame, button]);
        assert!(collapsed[0].has_children);
        assert!(!collapsed[0].expanded);
        assert!(collapsed[1].selected);

        let open: HashSet<ElementId> = [frame].into_iter().collect();
        let rows = explorer_rows(&tree, &open, None);
        let shape: Vec<(usize, &str)> = rows.iter().map(|r| (r.depth, r.name.as_str())).collect();
        assert_eq!(shape, vec![(0, "Frame1"), (1, "TextLabel2"), (0, "TextButton3")]);
    }
}
