use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters handed to the repulsion solver. The editor itself never
/// interprets these beyond forwarding them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub node_distance: f64,
    pub spring_length: f64,
    pub spring_constant: f64,
    pub central_gravity: f64,
    pub damping: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        // Session startup values; the distance slider defaults higher (200).
        Self {
            node_distance: 150.0,
            spring_length: 200.0,
            spring_constant: 0.05,
            central_gravity: 0.2,
            damping: 0.09,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Layout-unit margin around the node bounding box. The output canvas is
    /// `(maxX-minX) + margin*2.5` wide and `(maxY-minY) + margin*1.5` tall.
    pub margin: f64,
    /// Raster resolution in DPI against the 96 DPI reference baseline.
    pub dpi: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            margin: 600.0,
            dpi: 300,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub physics: PhysicsConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
    node_fill: Option<String>,
    edge_stroke: Option<String>,
    label_color: Option<String>,
    highlight: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PhysicsFile {
    node_distance: Option<f64>,
    spring_length: Option<f64>,
    spring_constant: Option<f64>,
    central_gravity: Option<f64>,
    damping: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ExportFile {
    margin: Option<f64>,
    dpi: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeFile>,
    physics: Option<PhysicsFile>,
    export: Option<ExportFile>,
}

/// Load a config file (JSON with comments/trailing commas tolerated) and merge
/// it onto the defaults. `None` returns the defaults untouched.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "slate" {
            config.theme = Theme::slate();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.edge_stroke {
            config.theme.edge_stroke = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.highlight {
            config.theme.highlight = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(physics) = parsed.physics {
        if let Some(v) = physics.node_distance {
            config.physics.node_distance = v;
        }
        if let Some(v) = physics.spring_length {
            config.physics.spring_length = v;
        }
        if let Some(v) = physics.spring_constant {
            config.physics.spring_constant = v;
        }
        if let Some(v) = physics.central_gravity {
            config.physics.central_gravity = v;
        }
        if let Some(v) = physics.damping {
            config.physics.damping = v;
        }
    }

    if let Some(export) = parsed.export {
        if let Some(v) = export.margin {
            config.export.margin = v;
        }
        if let Some(v) = export.dpi {
            config.export.dpi = v;
        }
    }

    Ok(config)
}
