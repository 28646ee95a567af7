use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, authored drawing: an ordered sequence of points.
///
/// Identity is the `(author, name)` pair; neither field is unique on its
/// own and no surrogate id exists. Points are kept opaque (the clients
/// send coordinate objects, but the server never inspects them) and their
/// order is the drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub author: String,
    pub name: String,
    pub points: Vec<Value>,
}

impl Blueprint {
    pub fn new(author: impl Into<String>, name: impl Into<String>, points: Vec<Value>) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
            points,
        }
    }

    pub fn matches(&self, author: &str, name: &str) -> bool {
        self.author == author && self.name == name
    }
}
