// Copyright 2018 The Scribe Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Nodes of the document tree.

use serde::{Deserialize, Serialize};

/// A single node of the document tree: an element with a child list, or a
/// one-character text node.
///
/// Text is stored one character per node, so every node occupies exactly
/// one offset in its parent and path arithmetic never needs a size table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text(char),
}

/// A named element holding an ordered child list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub children: Vec<Node>,
}

impl Element {
    pub fn with_children(name: &str, children: Vec<Node>) -> Element {
        Element { name: name.to_string(), children }
    }
}

impl Node {
    /// Builds a run of text nodes, one per character.
    pub fn text(s: &str) -> Vec<Node> {
        s.chars().map(Node::Text).collect()
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Element(el) => Some(&el.children),
            Node::Text(_) => None,
        }
    }
}

/// Collects the text content of a node list, descending into elements.
pub fn text_of(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(ch) => out.push(*ch),
            Node::Element(el) => out.push_str(&text_of(&el.children)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_run() {
        let nodes = Node::text("abc");
        assert_eq!(nodes.len(), 3);
        assert_eq!(text_of(&nodes), "abc");
    }

    #[test]
    fn nested_text() {
        let inner = Element::with_children("span", Node::text("hi"));
        let nodes = vec![Node::Text('a'), Node::Element(inner), Node::Text('b')];
        assert_eq!(text_of(&nodes), "ahib");
    }
}
