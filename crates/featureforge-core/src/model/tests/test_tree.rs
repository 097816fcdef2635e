use super::*;
use crate::error::FeatureModelError;

fn positions(tree: &FeatureTree) -> std::collections::HashMap<NodeId, usize> {
    tree.preorder()
        .into_iter()
        .enumerate()
        .map(|(i, n)| (n, i))
        .collect()
}

#[test]
fn test_preorder_lists_parents_before_descendants() {
    let mut tree = FeatureTree::new();
    let r1 = tree.add_root(id(1)).unwrap();
    let a = tree.add_below(id(2), r1, 0).unwrap();
    let b = tree.add_below(id(3), r1, 1).unwrap();
    let a1 = tree.add_below(id(4), a, 0).unwrap();
    let a0 = tree.add_below(id(5), a, 0).unwrap();
    let r2 = tree.add_root(id(6)).unwrap();
    let c = tree.add_below(id(7), r2, 0).unwrap();

    assert_eq!(tree.preorder(), vec![r1, a, a0, a1, b, r2, c]);

    let pos = positions(&tree);
    for node in tree.preorder() {
        for descendant in tree.preorder_from(node).into_iter().skip(1) {
            assert!(pos[&node] < pos[&descendant]);
        }
    }
}

#[test]
fn test_remove_only_child_copies_its_group_shape() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let a = tree.add_below(id(2), r, 0).unwrap();
    tree.set_or(a, 0).unwrap();
    let b = tree.add_below(id(3), a, 0).unwrap();
    let c = tree.add_below(id(4), a, 1).unwrap();

    let removed = tree.remove(a).unwrap();
    assert_eq!(removed.feature(), &id(2));
    assert!(removed.children().is_empty());

    let root = tree.node(r).unwrap();
    assert_eq!(root.children(), &[b, c]);
    assert!(root.groups()[0].is_or());
    for child in [b, c] {
        let node = tree.node(child).unwrap();
        assert_eq!(node.parent(), Some(r));
        assert_eq!(node.group_id(), 0);
    }
    assert!(!tree.contains(&id(2)));
    tree.validate().unwrap();
}

#[test]
fn test_remove_only_child_collapses_cardinality_group_to_or() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let a = tree.add_below(id(2), r, 0).unwrap();
    tree.set_group_range(a, 0, Range::new(2, Some(3)).unwrap())
        .unwrap();
    for (i, n) in [3, 4, 5].into_iter().enumerate() {
        tree.add_below(id(n), a, i).unwrap();
    }

    tree.remove(a).unwrap();

    let root = tree.node(r).unwrap();
    assert_eq!(root.children().len(), 3);
    assert_eq!(root.groups(), &[Group::or()]);
    tree.validate().unwrap();
}

#[test]
fn test_remove_only_child_keeps_alternative_group() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let a = tree.add_below(id(2), r, 0).unwrap();
    tree.set_alternative(a, 0).unwrap();
    tree.add_below(id(3), a, 0).unwrap();

    tree.remove(a).unwrap();
    assert_eq!(tree.node(r).unwrap().groups(), &[Group::alternative()]);
}

#[test]
fn test_remove_lifts_children_into_removed_position() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let x = tree.add_below(id(2), r, 0).unwrap();
    let a = tree.add_below(id(3), r, 1).unwrap();
    let y = tree.add_below(id(4), r, 2).unwrap();
    let b = tree.add_below(id(5), a, 0).unwrap();
    let c = tree.add_below(id(6), a, 1).unwrap();

    tree.remove(a).unwrap();

    assert_eq!(tree.node(r).unwrap().children(), &[x, b, c, y]);
    assert!(tree.node(r).unwrap().groups()[0].is_and());
    tree.validate().unwrap();
}

#[test]
fn test_remove_keeps_group_membership_of_lifted_children() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let alt = tree.add_group(r, Group::alternative()).unwrap();
    let x = tree.add_below(id(2), r, 0).unwrap();
    let a = tree.add_below(id(3), r, 1).unwrap();
    tree.set_group_id(a, alt).unwrap();
    let b = tree.add_below(id(4), a, 0).unwrap();

    tree.remove(a).unwrap();

    assert_eq!(tree.node(b).unwrap().group_id(), alt);
    assert_eq!(tree.group_children(r, alt), vec![b]);
    assert_eq!(tree.group_children(r, 0), vec![x]);
}

#[test]
fn test_root_cannot_be_removed_or_given_a_sibling() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    assert_eq!(tree.remove(r), Err(FeatureModelError::RootRemoval(id(1))));
    assert_eq!(
        tree.add_next_to(id(2), r),
        Err(FeatureModelError::RootSibling(id(1)))
    );
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_add_next_to_joins_sibling_group() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let group = tree.add_group(r, Group::or()).unwrap();
    let a = tree.add_below(id(2), r, 0).unwrap();
    let z = tree.add_below(id(3), r, 1).unwrap();
    tree.set_group_id(a, group).unwrap();

    let b = tree.add_next_to(id(4), a).unwrap();

    assert_eq!(tree.node(r).unwrap().children(), &[a, b, z]);
    assert_eq!(tree.node(b).unwrap().group_id(), group);
}

#[test]
fn test_rejects_invalid_positions() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    assert_eq!(
        tree.add_below(id(2), r, 1),
        Err(FeatureModelError::ChildIndexOutOfRange {
            feature: id(1),
            index: 1,
            count: 0,
        })
    );
    let a = tree.add_below(id(2), r, 0).unwrap();
    assert_eq!(
        tree.add_below(id(2), r, 0),
        Err(FeatureModelError::AlreadyInTree(id(2)))
    );
    assert_eq!(
        tree.set_group_id(a, 1),
        Err(FeatureModelError::GroupIndexOutOfRange {
            feature: id(1),
            index: 1,
            count: 1,
        })
    );
    assert!(tree.set_group_range(r, 3, Range::OR).is_err());
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_set_mandatory_promotes_empty_range() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let a = tree.add_below(id(2), r, 0).unwrap();

    assert!(tree.node(a).unwrap().is_optional());
    tree.set_range(a, Range::exactly(0)).unwrap();
    tree.set_mandatory(a).unwrap();
    assert_eq!(tree.node(a).unwrap().range(), Range::MANDATORY);

    tree.set_optional(a).unwrap();
    assert_eq!(tree.node(a).unwrap().range(), Range::OPTIONAL);

    // Only an exact [1..1] counts as mandatory.
    tree.set_range(a, Range::new(1, None).unwrap()).unwrap();
    assert!(!tree.node(a).unwrap().is_mandatory());

    tree.set_range(a, Range::new(0, Some(3)).unwrap()).unwrap();
    tree.set_mandatory(a).unwrap();
    assert_eq!(tree.node(a).unwrap().range(), Range::new(1, Some(3)).unwrap());
}

#[test]
fn test_graft_copies_structure() {
    let mut other = FeatureTree::new();
    let x = other.add_root(id(10)).unwrap();
    other.set_alternative(x, 0).unwrap();
    other.add_below(id(11), x, 0).unwrap();
    let x2 = other.add_below(id(12), x, 1).unwrap();
    other.set_mandatory(x2).unwrap();

    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    tree.add_below(id(2), r, 0).unwrap();

    let grafted = tree.graft(&other, r, 0).unwrap();
    assert_eq!(grafted.len(), 1);

    let root = tree.node(r).unwrap();
    assert_eq!(root.children()[0], grafted[0]);
    let copy = tree.node(grafted[0]).unwrap();
    assert!(copy.groups()[0].is_alternative());
    assert_eq!(copy.children().len(), 2);
    let copied_x2 = tree.node_of(&id(12)).unwrap();
    assert!(tree.node(copied_x2).unwrap().is_mandatory());
    assert_eq!(tree.len(), 5);

    assert!(matches!(
        tree.graft(&other, r, 0),
        Err(FeatureModelError::AlreadyInTree(_))
    ));
    tree.validate().unwrap();
}

#[test]
fn test_removed_slot_is_reused() {
    let mut tree = FeatureTree::new();
    let r = tree.add_root(id(1)).unwrap();
    let a = tree.add_below(id(2), r, 0).unwrap();
    tree.remove(a).unwrap();
    let b = tree.add_below(id(3), r, 0).unwrap();
    assert_eq!(a.index(), b.index());
    assert_eq!(tree.node(b).unwrap().feature(), &id(3));
    assert_eq!(tree.ancestors(b), vec![r]);
}
