use std::collections::BTreeSet;

use varslice_core::model::LineSelection;

fn selection(entries: &[(&str, &[u32])]) -> LineSelection {
    let mut sel = LineSelection::new();
    for (file, lines) in entries {
        sel.extend(file, lines.iter().copied());
    }
    sel
}

#[test]
fn entry_keeps_first_seen_order() {
    let sel = selection(&[("b.c", &[1]), ("a.c", &[2]), ("b.c", &[3])]);
    assert_eq!(sel.files().collect::<Vec<_>>(), vec!["b.c", "a.c"]);
    assert_eq!(sel.get("b.c").unwrap().iter().copied().collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn merge_is_per_file_union() {
    let backward = selection(&[("a.c", &[10, 9, 8]), ("util.c", &[4])]);
    let forward = selection(&[("a.c", &[10, 11, 12]), ("io.c", &[7])]);
    let merged = LineSelection::merged(&backward, &forward);

    for file in ["a.c", "util.c", "io.c"] {
        let mut expected: BTreeSet<u32> = BTreeSet::new();
        expected.extend(backward.get(file).into_iter().flatten());
        expected.extend(forward.get(file).into_iter().flatten());
        assert_eq!(merged.get(file), Some(&expected), "file {file}");
    }
    assert_eq!(merged.get("a.c").unwrap().len(), 5);
}

#[test]
fn merge_orders_backward_keys_before_forward_only_keys() {
    let backward = selection(&[("z.c", &[1]), ("a.c", &[2])]);
    let forward = selection(&[("m.c", &[3]), ("a.c", &[4]), ("b.c", &[5])]);
    let merged = LineSelection::merged(&backward, &forward);
    assert_eq!(merged.files().collect::<Vec<_>>(), vec!["z.c", "a.c", "m.c", "b.c"]);
}

#[test]
fn merge_with_itself_is_identity() {
    let sel = selection(&[("a.c", &[3, 1]), ("", &[]), ("b.c", &[2])]).without_unattributed();
    assert_eq!(LineSelection::merged(&sel, &sel), sel);
}

#[test]
fn merge_with_empty_side_keeps_other() {
    let forward = selection(&[("x.c", &[5])]);
    assert_eq!(LineSelection::merged(&LineSelection::new(), &forward), forward);
    assert_eq!(LineSelection::merged(&forward, &LineSelection::new()), forward);
}

#[test]
fn without_unattributed_drops_only_empty_key() {
    let sel = selection(&[("", &[1]), ("a.c", &[2])]).without_unattributed();
    assert_eq!(sel.len(), 1);
    assert!(sel.contains("a.c", 2));
    assert!(!sel.contains("", 1));
    assert_eq!(sel.line_count(), 1);
}
