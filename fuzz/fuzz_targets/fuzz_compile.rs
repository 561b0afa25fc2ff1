#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vbind_dom::Node;
use vbind_runtime::{Object, Value, Vm};

const KEYS: [&str; 4] = ["a", "b", "c", "missing"];

#[derive(Arbitrary, Debug)]
enum FuzzNode {
    Text(String),
    Interpolated { prefix: String, key: u8 },
    Element { tag: u8, directive: Option<(bool, u8)>, children: Vec<FuzzNode> },
}

#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Write { key: u8, value: i16 },
    WriteText { key: u8, value: String },
    Input { index: u8, value: String },
}

fn key(k: u8) -> &'static str {
    KEYS[usize::from(k) % KEYS.len()]
}

impl FuzzNode {
    fn build(&self, depth: usize, inputs: &mut Vec<Node>) -> Node {
        match self {
            FuzzNode::Text(text) => Node::text(text.as_str()),
            FuzzNode::Interpolated { prefix, key: k } => {
                Node::text(format!("{prefix}{{{{ {} }}}}", key(*k)))
            }
            FuzzNode::Element {
                tag,
                directive,
                children,
            } => {
                let tag = ["div", "p", "input"][usize::from(*tag) % 3];
                let mut el = Node::element(tag);
                if let Some((model, k)) = directive {
                    let name = if *model { "v-model" } else { "v-text" };
                    el = el.with_attr(name, key(*k));
                }
                if tag == "input" {
                    inputs.push(el.clone());
                }
                if depth < 8 {
                    for child in children.iter().take(8) {
                        el.append_child(child.build(depth + 1, inputs));
                    }
                }
                el
            }
        }
    }
}

fuzz_target!(|input: (Vec<FuzzNode>, Vec<FuzzOp>)| {
    let (nodes, ops) = input;
    let mut inputs = Vec::new();
    let root = Node::element("div");
    for node in nodes.iter().take(16) {
        root.append_child(node.build(0, &mut inputs));
    }

    let data: Object = KEYS[..3].iter().map(|k| (*k, Value::from(0))).collect();
    let vm = Vm::new(root, data);

    for op in ops.iter().take(64) {
        match op {
            FuzzOp::Write { key: k, value } => vm.set(key(*k), i32::from(*value)),
            FuzzOp::WriteText { key: k, value } => vm.set(key(*k), value.as_str()),
            FuzzOp::Input { index, value } => {
                if !inputs.is_empty() {
                    inputs[usize::from(*index) % inputs.len()].input(value.as_str());
                }
            }
        }
    }
    let _ = vm.el().outer_html();
});
