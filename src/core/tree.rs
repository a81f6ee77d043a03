// Copyright 2025 Eric Jingryd (tidynest@proton.me)
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

//! Read-only context → category → action tree
//!
//! Nodes live in an arena and refer to each other by `NodeId` index.
//! Action leaves hold an `ActionId`, never the `Action` itself, so the
//! current shortcut is always read from the registry at query time.
//!
//! Every node also carries a stable string key that survives rebuilds:
//! - `context:<context>`
//! - `category:<context>/<category>`
//! - `action:<identity>`

use std::collections::HashMap;

use crate::core::filter::Filter;
use crate::core::registry::ActionRegistry;
use crate::core::types::ActionId;

/// Index of a node inside its projection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Context,
    Category,
    Action(ActionId),
}

#[derive(Clone, Debug)]
pub struct TreeNode {
    key: String,
    kind: NodeKind,
    label: String,
    /// Context this node belongs to (its own name for context nodes)
    context: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn action_id(&self) -> Option<&ActionId> {
        match &self.kind {
            NodeKind::Action(id) => Some(id),
            _ => None,
        }
    }
}

/// Three-level projection of an `ActionRegistry`.
///
/// Rebuild with `refresh` when `is_stale` reports new registrations.
/// Shortcut changes need no rebuild.
#[derive(Debug, Default)]
pub struct TreeProjection {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    by_key: HashMap<String, NodeId>,
    /// Registry revision this projection was built from
    revision: u64,
}

impl TreeProjection {
    pub fn build(registry: &ActionRegistry) -> Self {
        let mut tree = Self {
            revision: registry.revision(),
            ..Self::default()
        };

        for context in registry.all() {
            let context_id = tree.push(
                format!("context:{}", context.name),
                NodeKind::Context,
                context.name,
                context.name,
                None,
            );

            for category in context.categories {
                let category_id = tree.push(
                    format!("category:{}/{}", context.name, category.name),
                    NodeKind::Category,
                    category.name,
                    context.name,
                    Some(context_id),
                );

                for action in category.actions {
                    tree.push(
                        format!("action:{}", action.id()),
                        NodeKind::Action(action.id().clone()),
                        action.name(),
                        context.name,
                        Some(category_id),
                    );
                }
            }
        }

        tracing::debug!(nodes = tree.nodes.len(), revision = tree.revision, "built tree projection");
        tree
    }

    fn push(&mut self, key: String, kind: NodeKind, label: &str, context: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());

        self.by_key.insert(key.clone(), id);
        self.nodes.push(TreeNode {
            key,
            kind,
            label: label.to_string(),
            context: context.to_string(),
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }

        id
    }

    /// True when actions were registered since this projection was built.
    pub fn is_stale(&self, registry: &ActionRegistry) -> bool {
        self.revision != registry.revision()
    }

    /// Rebuilds if stale. Returns whether a rebuild happened.
    pub fn refresh(&mut self, registry: &ActionRegistry) -> bool {
        if !self.is_stale(registry) {
            return false;
        }
        *self = Self::build(registry);
        true
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(TreeNode::children).unwrap_or_default()
    }

    /// Looks a node up by its stable key.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Node of an action leaf
    pub fn find_action(&self, id: &ActionId) -> Option<NodeId> {
        self.find(&format!("action:{}", id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Recursive filter predicate.
    ///
    /// A node matches when it matches directly or any descendant does, so
    /// ancestors of a matching action stay visible. Nodes outside the
    /// filter's enabled contexts never match.
    pub fn matches(&self, id: NodeId, filter: &Filter, registry: &ActionRegistry) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };

        if !filter.context_enabled(&node.context) {
            return false;
        }

        let direct = match &node.kind {
            NodeKind::Action(action) => registry
                .get(action)
                .map(|action| filter.accepts_action(action))
                .unwrap_or(false),
            NodeKind::Context | NodeKind::Category => filter.accepts_group(&node.label),
        };

        direct
            || node
                .children
                .iter()
                .any(|&child| self.matches(child, filter, registry))
    }

    /// Every visible node in pre-order (parents before their children).
    pub fn visible(&self, filter: &Filter, registry: &ActionRegistry) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.collect_visible(root, filter, registry, &mut out);
        }
        out
    }

    fn collect_visible(&self, id: NodeId, filter: &Filter, registry: &ActionRegistry, out: &mut Vec<NodeId>) {
        if !self.matches(id, filter, registry) {
            return;
        }

        out.push(id);
        for &child in self.children(id) {
            self.collect_visible(child, filter, registry, out);
        }
    }
}
