use std::cell::Cell;
use std::collections::BTreeMap;

use serde::Serialize;

pub type SurfaceId = u64;

thread_local! {
    static NEXT_SURFACE: Cell<SurfaceId> = const { Cell::new(1) };
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NodeKind {
    Div,
    Heading(String),
    Paragraph(String),
    Text(String),
    Button(String),
    Input { value: String, placeholder: String },
}

/// Output of one render pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub style: BTreeMap<String, String>,
    /// Name under which hooks can find this node on the applied surface.
    pub ref_name: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            style: BTreeMap::new(),
            ref_name: None,
            children: vec![],
        }
    }
    pub fn div() -> Self {
        Self::new(NodeKind::Div)
    }
    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Heading(text.into()))
    }
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Paragraph(text.into()))
    }
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(text.into()))
    }
    pub fn button(label: impl Into<String>) -> Self {
        Self::new(NodeKind::Button(label.into()))
    }
    pub fn input(value: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::new(NodeKind::Input {
            value: value.into(),
            placeholder: placeholder.into(),
        })
    }

    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }
    pub fn with_ref(mut self, name: impl Into<String>) -> Self {
        self.ref_name = Some(name.into());
        self
    }
    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }
    pub fn with_children(mut self, kids: Vec<Node>) -> Self {
        self.children = kids;
        self
    }

    pub fn style_of(&self, key: &str) -> Option<&str> {
        self.style.get(key).map(String::as_str)
    }

    /// Depth-first search for the node carrying `ref_name == name`.
    pub fn find_ref(&self, name: &str) -> Option<&Node> {
        if self.ref_name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_ref(name))
    }

    /// Visible text of this subtree, one line per text-bearing node.
    pub fn text_content(&self) -> String {
        let mut lines = Vec::new();
        self.collect_text(&mut lines);
        lines.join("\n")
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            NodeKind::Heading(t) | NodeKind::Paragraph(t) | NodeKind::Text(t) | NodeKind::Button(t) => {
                out.push(t)
            }
            NodeKind::Input { value, .. } => out.push(value),
            NodeKind::Div => {}
        }
        for c in &self.children {
            c.collect_text(out);
        }
    }
}

/// The visible surface an instance owns while mounted. Holds the most
/// recently applied render output.
#[derive(Debug)]
pub struct DomHandle {
    id: SurfaceId,
    root: Node,
    applied: u64,
}

impl DomHandle {
    pub(crate) fn attach(root: Node) -> Self {
        let id = NEXT_SURFACE.with(|n| {
            let id = n.get();
            n.set(id + 1);
            id
        });
        DomHandle {
            id,
            root,
            applied: 1,
        }
    }

    pub(crate) fn apply(&mut self, root: Node) {
        self.root = root;
        self.applied += 1;
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }
    pub fn root(&self) -> &Node {
        &self.root
    }
    /// Number of render outputs applied, counting the initial mount.
    pub fn applied(&self) -> u64 {
        self.applied
    }
    pub fn find_ref(&self, name: &str) -> Option<&Node> {
        self.root.find_ref(name)
    }
}
