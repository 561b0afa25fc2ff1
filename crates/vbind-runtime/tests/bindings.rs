#![forbid(unsafe_code)]

//! Integration tests: end-to-end DOM binding through a mounted `Vm`.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;
use vbind_dom::{EventType, Node};
use vbind_runtime::{Object, Value, Vm, VmOptions, Watcher};

// ============================================================================
// Interpolation
// ============================================================================

#[test]
fn interpolation_follows_writes() {
    let text = Node::text("{{name}}");
    let el = Node::element("div").with_child(text.clone());
    let vm = Vm::new(el, Value::from(json!({ "name": "A" })));

    assert_eq!(text.text_content(), "A");
    vm.set("name", "B");
    assert_eq!(text.text_content(), "B");
}

#[test]
fn interpolation_inside_nested_markup() {
    let title = Node::text("{{ title }}");
    let body = Node::text("{{body}}");
    let el = Node::element("article")
        .with_child(Node::element("h1").with_child(title.clone()))
        .with_child(
            Node::element("section").with_child(Node::element("p").with_child(body.clone())),
        );
    let vm = Vm::new(el.clone(), Value::from(json!({ "title": "T", "body": "B" })));

    assert_eq!(el.outer_html(), "<article><h1>T</h1><section><p>B</p></section></article>");
    vm.set("body", "changed");
    assert_eq!(
        el.outer_html(),
        "<article><h1>T</h1><section><p>changed</p></section></article>"
    );
}

// ============================================================================
// v-model
// ============================================================================

#[test]
fn v_model_round_trip() {
    let input = Node::element("input").with_attr("v-model", "name");
    let el = Node::element("form").with_child(input.clone());
    let vm = Vm::new(el, Value::from(json!({ "name": "A" })));

    assert_eq!(input.value(), "A");

    input.input("Z");
    assert_eq!(vm.get("name"), Value::from("Z"));

    vm.set("name", "Q");
    assert_eq!(input.value(), "Q");
}

#[test]
fn v_model_write_back_fires_each_binding_once() {
    let input = Node::element("input").with_attr("v-model", "name");
    let el = Node::element("form").with_child(input.clone());
    let vm = Vm::new(el, Value::from(json!({ "name": "A" })));

    let hits = Rc::new(Cell::new(0u32));
    let h = Rc::clone(&hits);
    let _counter = Watcher::new(vm.data(), "name", move |_| h.set(h.get() + 1));

    input.input("B");
    assert_eq!(hits.get(), 1);
    // Same text again: no change reaches the data object.
    input.dispatch_event(EventType::Input);
    assert_eq!(hits.get(), 1);
}

#[test]
fn v_model_number_becomes_string_after_input() {
    let input = Node::element("input").with_attr("v-model", "age");
    let el = Node::element("form").with_child(input.clone());
    let vm = Vm::new(el, Value::from(json!({ "age": 30 })));

    assert_eq!(input.value(), "30");
    input.input("31");
    assert_eq!(vm.get("age"), Value::from("31"));
}

// ============================================================================
// Fan-out
// ============================================================================

#[test]
fn two_bindings_to_one_key() {
    let a = Node::text("{{count}}");
    let b = Node::element("span").with_attr("v-text", "count");
    let other = Node::text("{{label}}");
    let el = Node::element("div")
        .with_child(a.clone())
        .with_child(b.clone())
        .with_child(other.clone());
    let vm = Vm::new(el, Value::from(json!({ "count": 1, "label": "x" })));

    vm.set("count", 2);
    assert_eq!(a.text_content(), "2");
    assert_eq!(b.text_content(), "2");
    assert_eq!(other.text_content(), "x");

    let a_hits = Rc::new(Cell::new(0u32));
    let h = Rc::clone(&a_hits);
    let _counter = Watcher::new(vm.data(), "count", move |_| h.set(h.get() + 1));
    vm.set("label", "y");
    assert_eq!(a_hits.get(), 0);
    assert_eq!(other.text_content(), "y");
}

// ============================================================================
// Nested objects
// ============================================================================

#[test]
fn nested_object_is_reactive() {
    let el = Node::element("div");
    let vm = Vm::new(el, Value::from(json!({ "user": { "name": "A" } })));

    let user = vm.get("user");
    let user = user.as_object().expect("user object").clone();
    assert!(user.is_tracked("name"));

    // Bind a sub-tree directly against the container object.
    let text = Node::text("{{name}}");
    let sub = Node::element("span").with_child(text.clone());
    let _inner = Vm::new(sub, user.clone());
    assert_eq!(text.text_content(), "A");

    user.set("name", "B");
    assert_eq!(text.text_content(), "B");
}

#[test]
fn replacing_nested_object_makes_it_reactive() {
    let vm = Vm::new(Node::element("div"), Value::from(json!({ "user": { "name": "A" } })));
    let fresh: Object = [("name", "Z")].into_iter().collect();
    vm.set("user", fresh.clone());
    assert!(fresh.is_tracked("name"));

    let seen = Rc::new(Cell::new(false));
    let s = Rc::clone(&seen);
    let _w = Watcher::new(&fresh, "name", move |_| s.set(true));
    fresh.set("name", "Y");
    assert!(seen.get());
}

// ============================================================================
// Idempotence / no-op cases
// ============================================================================

#[test]
fn no_bindings_leaves_dom_untouched() {
    let el = Node::element("div")
        .with_attr("class", "card")
        .with_child(Node::element("p").with_text("plain {text}"))
        .with_child(Node::element("input").with_attr("type", "text"));
    let before = el.outer_html();
    let vm = Vm::new(el.clone(), Value::from(json!({ "unused": 1 })));
    assert_eq!(el.outer_html(), before);
    assert_eq!(vm.watcher_count(), 0);
}

#[test]
fn late_property_is_not_reactive() {
    let text = Node::text("{{later}}");
    let el = Node::element("div").with_child(text.clone());
    let vm = Vm::new(el, Value::from(json!({})));
    assert_eq!(text.text_content(), "undefined");

    vm.set("later", "now");
    assert_eq!(vm.get("later"), Value::from("now"));
    assert_eq!(text.text_content(), "undefined");
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn mount_from_json_options() {
    let label = Node::element("label").with_attr("v-text", "title");
    let doc = Node::element("body").with_child(
        Node::element("main")
            .with_attr("id", "root")
            .with_child(label.clone()),
    );
    let opts =
        VmOptions::from_json_str(r##"{ "el": "#root", "data": { "title": "Welcome" } }"##)
            .expect("options");
    let vm = Vm::from_options(&opts, &doc).expect("mount");
    assert_eq!(label.text_content(), "Welcome");
    vm.set("title", "Bye");
    assert_eq!(label.text_content(), "Bye");
}

#[test]
fn callback_panic_aborts_remaining_notifications() {
    let data: Object = [("n", 0)].into_iter().collect();
    vbind_runtime::observe_object(&data);

    let later = Rc::new(Cell::new(false));
    let _boom = Watcher::new(&data, "n", |_| panic!("subscriber failed"));
    let l = Rc::clone(&later);
    let _after = Watcher::new(&data, "n", move |_| l.set(true));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| data.set("n", 1)));
    assert!(result.is_err());
    assert!(!later.get());
    // The write itself was stored before the failure.
    assert_eq!(data.get("n"), Value::from(1));
}
