//! Earth Engine serialized expression graphs.
//!
//! The REST API takes a computation as `{"result": "0", "values": {...}}`
//! where every value is a node keyed by an id. Most nodes can be nested
//! inline; function definitions refer to their body by id, so those bodies
//! are lifted into their own entries while encoding.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(Value),
    Invocation {
        function: String,
        arguments: BTreeMap<String, Node>,
    },
    ArgumentReference(String),
    FunctionDefinition {
        argument_names: Vec<String>,
        body: Box<Node>,
    },
    Array(Vec<Node>),
}

impl Node {
    pub fn constant(value: impl Into<Value>) -> Self {
        Node::Constant(value.into())
    }

    pub fn invoke<I, K>(function: &str, arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, Node)>,
        K: Into<String>,
    {
        Node::Invocation {
            function: function.to_string(),
            arguments: arguments
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        }
    }

    pub fn strings<S: AsRef<str>>(items: &[S]) -> Self {
        Node::Array(
            items
                .iter()
                .map(|s| Node::constant(s.as_ref()))
                .collect(),
        )
    }

    pub fn function_name(&self) -> Option<&str> {
        match self {
            Node::Invocation { function, .. } => Some(function),
            _ => None,
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Invocation { arguments, .. } => arguments.get(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub result: String,
    pub values: BTreeMap<String, Value>,
}

impl Expression {
    pub fn encode(root: &Node) -> Self {
        let mut encoder = Encoder::default();
        let result = encoder.lift(root);
        Self {
            result,
            values: encoder.values,
        }
    }
}

#[derive(Default)]
struct Encoder {
    values: BTreeMap<String, Value>,
    next_id: usize,
}

impl Encoder {
    /// 先保留 id 再編碼，讓外層節點的 id 比內層小
    fn lift(&mut self, node: &Node) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        let encoded = self.encode(node);
        self.values.insert(id.clone(), encoded);
        id
    }

    fn encode(&mut self, node: &Node) -> Value {
        match node {
            Node::Constant(value) => json!({ "constantValue": value }),
            Node::Invocation {
                function,
                arguments,
            } => {
                let arguments: serde_json::Map<String, Value> = arguments
                    .iter()
                    .map(|(name, arg)| (name.clone(), self.encode(arg)))
                    .collect();
                json!({
                    "functionInvocationValue": {
                        "functionName": function,
                        "arguments": arguments,
                    }
                })
            }
            Node::ArgumentReference(name) => json!({ "argumentReference": name }),
            Node::FunctionDefinition {
                argument_names,
                body,
            } => {
                let body_id = self.lift(body);
                json!({
                    "functionDefinitionValue": {
                        "argumentNames": argument_names,
                        "body": body_id,
                    }
                })
            }
            Node::Array(items) => {
                let values: Vec<Value> = items.iter().map(|item| self.encode(item)).collect();
                json!({ "arrayValue": { "values": values } })
            }
        }
    }
}
