use std::sync::Arc;

use serde_json::json;
use ui_stream::patch::{apply_patch, apply_patches, decode_all, Patch};
use ui_stream::Tree;

fn el(key: &str, ty: &str) -> serde_json::Value {
    json!({"key": key, "type": ty, "props": {}})
}

#[test]
fn builds_a_tree_parent_first() {
    let patches = vec![
        Patch::set("/root", json!("page")),
        Patch::add("/elements/page", el("page", "Stack")),
        Patch::add("/elements/title", el("title", "Heading")),
        Patch::set("/elements/title/props/text", json!("Hello")),
        Patch::replace("/elements/page/children", json!(["title"])),
        Patch::add("/elements/body", el("body", "Text")),
        Patch::add("/elements/page/children/-", json!("body")),
        Patch::set("/elements/body/parentKey", json!("page")),
    ];
    let tree = apply_patches(&Tree::new(), &patches);

    let page = tree.root_element().unwrap();
    assert_eq!(page.children(), vec!["title", "body"]);
    assert_eq!(tree.get("title").unwrap().prop("text"), Some(&json!("Hello")));
    assert_eq!(tree.get("body").unwrap().parent_key(), Some("page"));
}

#[test]
fn sequential_application_matches_folding() {
    let patches = vec![
        Patch::set("/root", json!("a")),
        Patch::add("/elements/a", el("a", "Card")),
        Patch::set("/elements/a/props/title", json!("t")),
        Patch::remove("/elements/a"),
        Patch::add("/elements/a", el("a", "Text")),
    ];
    let folded = patches.iter().fold(Tree::new(), |tree, p| apply_patch(&tree, p));
    assert_eq!(folded, apply_patches(&Tree::new(), &patches));
    assert_eq!(folded.get("a").unwrap().element_type(), Some("Text"));
    assert_eq!(folded.get("a").unwrap().prop("title"), None);
}

#[test]
fn removal_tombstone() {
    let tree = apply_patches(
        &Tree::new(),
        &[Patch::add("/elements/k", el("k", "Text")), Patch::remove("/elements/k")],
    );
    assert!(tree.get("k").is_none());
    let after = apply_patch(&tree, &Patch::set("/elements/k/props/x", json!(1)));
    assert!(after.get("k").is_none());
    assert_eq!(after, tree);
}

#[test]
fn snapshots_are_never_mutated() {
    let t0 = Tree::new();
    let t1 = apply_patch(&t0, &Patch::set("/root", json!("a")));
    let t2 = apply_patch(&t1, &Patch::add("/elements/a", el("a", "Card")));
    let t3 = apply_patch(&t2, &Patch::add("/elements/b", el("b", "Text")));
    assert!(t0.is_empty());
    assert!(t1.elements.is_empty());
    assert_eq!(t2.elements.len(), 1);
    assert_eq!(t3.elements.len(), 2);
    assert!(Arc::ptr_eq(&t2.elements["a"], &t3.elements["a"]));
}

#[test]
fn dangling_references_are_fine() {
    let stream = br#"{"op":"set","path":"/root","value":"later"}
{"op":"add","path":"/elements/list","value":{"key":"list","type":"List","props":{},"children":["x","y"]}}
"#;
    let tree = apply_patches(&Tree::new(), &decode_all(stream));
    assert_eq!(tree.root, "later");
    assert!(tree.root_element().is_none());
    assert_eq!(tree.get("list").unwrap().children(), vec!["x", "y"]);
}
