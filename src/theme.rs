use serde::{Deserialize, Serialize};

/// Fallback colors used whenever a node or edge carries no explicit style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub node_fill: String,
    pub edge_stroke: String,
    pub label_color: String,
    pub highlight: String,
    pub background: String,
}

impl Theme {
    /// The reference palette: plain browser color names with a dark
    /// selection highlight.
    pub fn classic() -> Self {
        Self {
            node_fill: "blue".to_string(),
            edge_stroke: "black".to_string(),
            label_color: "black".to_string(),
            highlight: "black".to_string(),
            background: "white".to_string(),
        }
    }

    pub fn slate() -> Self {
        Self {
            node_fill: "#4A6FA5".to_string(),
            edge_stroke: "#45484B".to_string(),
            label_color: "#1C2430".to_string(),
            highlight: "#16181A".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
