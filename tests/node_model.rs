use cycledag::dag::{Mode, NodeKind, SuiteTree, TriggerExpr};
use cycledag::errors::CycledagError;

#[test]
fn test_paths_follow_parent_chain() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    let fam = tree.add_child(root, "2020010100", NodeKind::Family).unwrap();
    let sub = tree.add_child(fam, "Prediction", NodeKind::Family).unwrap();
    let task = tree.add_child(sub, "Forecast", NodeKind::Task).unwrap();

    assert_eq!(tree.path(root), "/exp");
    assert_eq!(tree.path(task), "/exp/2020010100/Prediction/Forecast");
    for (id, node) in tree.iter() {
        if let Some(parent) = node.parent {
            assert_eq!(node.path, format!("{}/{}", tree.path(parent), node.name));
        } else {
            assert_eq!(id, tree.root());
        }
    }
    assert_eq!(tree.find("/exp/2020010100/Prediction"), Some(sub));
}

#[test]
fn test_duplicate_sibling_is_rejected() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    tree.add_child(root, "InitRun", NodeKind::Task).unwrap();

    match tree.add_child(root, "InitRun", NodeKind::Family) {
        Err(CycledagError::DuplicateNode { parent, name }) => {
            assert_eq!(parent, "/exp");
            assert_eq!(name, "InitRun");
        }
        other => panic!("expected DuplicateNode, got {other:?}"),
    }
    assert_eq!(tree.children(root).len(), 1);
}

#[test]
fn test_same_name_under_different_parents_is_fine() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    let a = tree.add_child(root, "A", NodeKind::Family).unwrap();
    let b = tree.add_child(root, "B", NodeKind::Family).unwrap();
    tree.add_child(a, "Forecast", NodeKind::Task).unwrap();
    tree.add_child(b, "Forecast", NodeKind::Task).unwrap();
    assert_eq!(tree.len(), 5);
}

#[test]
fn test_task_cannot_have_children() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    let task = tree.add_child(root, "InitRun", NodeKind::Task).unwrap();
    assert!(tree.add_child(task, "Nested", NodeKind::Task).is_err());
}

#[test]
fn test_append_gate_extends_existing_condition() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    let fam = tree.add_child(root, "CycleInput", NodeKind::Family).unwrap();

    tree.attach_gate(fam, TriggerExpr::all([Some(TriggerExpr::complete("/exp/PrepareCycle"))]));
    tree.append_gate(fam, TriggerExpr::complete("/exp/Earlier/PostProcessing"), Mode::And);

    let rendered = tree.node(fam).gate.as_ref().unwrap().render();
    assert_eq!(
        rendered,
        "((/exp/PrepareCycle == complete) AND /exp/Earlier/PostProcessing == complete)"
    );
}

#[test]
fn test_append_gate_on_ungated_node_sets_it() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    let task = tree.add_child(root, "PrepareLSM", NodeKind::Task).unwrap();

    tree.append_gate(task, TriggerExpr::complete("/exp/FirstGuess4OI"), Mode::And);
    assert_eq!(
        tree.node(task).gate.as_ref().unwrap().render(),
        "/exp/FirstGuess4OI == complete"
    );
}

#[test]
fn test_empty_gates_are_not_stored() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    let task = tree.add_child(root, "InitRun", NodeKind::Task).unwrap();

    tree.attach_gate(task, TriggerExpr::all([None, None]));
    tree.append_gate(task, TriggerExpr::empty(), Mode::And);
    assert!(tree.node(task).gate.is_none());
}

#[test]
fn test_variables_are_kept_sorted() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();
    tree.add_variable(root, "ZED", "1");
    tree.add_variable(root, "ALPHA", "2");
    let keys: Vec<&String> = tree.node(root).variables.keys().collect();
    assert_eq!(keys, vec!["ALPHA", "ZED"]);
}

#[test]
fn test_names_must_be_single_path_components() {
    let mut tree = SuiteTree::new("exp");
    let root = tree.root();

    for bad in ["", "a/b", ".hidden", "two words", "x=y"] {
        match tree.add_child(root, bad, NodeKind::Family) {
            Err(CycledagError::InvalidNodeName { name, .. }) => assert_eq!(name, bad),
            other => panic!("expected InvalidNodeName for {bad:?}, got {other:?}"),
        }
    }
    assert!(tree.children(root).is_empty());

    for good in ["2020010100", "Decade20200111", "_tmp", "TG2", "v1.2"] {
        tree.add_child(root, good, NodeKind::Family).unwrap();
    }
    assert_eq!(tree.children(root).len(), 5);
}
