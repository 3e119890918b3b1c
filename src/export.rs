use crate::graph::Graph;
use crate::theme::Theme;
use std::fmt;
use std::path::Path;

/// Vertical pull applied to every edge's curve control point, in layout units.
const EDGE_CURVE_LIFT: f64 = 50.0;

/// Raster scale baseline: the requested DPI is divided by this.
#[cfg(feature = "raster")]
const REFERENCE_DPI: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Jpg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
        }
    }

    /// Fixed artifact name: `graph.svg` for vector output, `image.<ext>`
    /// otherwise.
    pub fn artifact_name(&self) -> String {
        match self {
            ExportFormat::Svg => "graph.svg".to_string(),
            other => format!("image.{}", other.extension()),
        }
    }

    pub fn is_raster(&self) -> bool {
        !matches!(self, ExportFormat::Svg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[cfg(feature = "raster")]
    #[error("failed to decode vector document: {0}")]
    Decode(#[from] usvg::Error),
    #[error("cannot allocate {width}x{height} raster canvas")]
    Canvas { width: u32, height: u32 },
    #[error("failed to encode {format} output: {message}")]
    Encode { format: ExportFormat, message: String },
    #[error("raster export requires the `raster` feature")]
    RasterUnavailable,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Frozen copy of everything export needs, captured in one pass so a layout
/// tick between stages cannot tear the bounding box.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    edges: Vec<SceneEdge>,
}

#[derive(Debug, Clone)]
struct SceneNode {
    x: f64,
    y: f64,
    size: f64,
    color: Option<String>,
    label: String,
    font_size: u32,
    font_color: Option<String>,
}

#[derive(Debug, Clone)]
struct SceneEdge {
    from: (f64, f64),
    to: (f64, f64),
    color: Option<String>,
    width: f64,
}

impl Scene {
    pub fn capture(graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .values()
            .map(|node| SceneNode {
                x: node.position.x,
                y: node.position.y,
                size: node.size,
                color: node.color.clone(),
                label: node.display_label().to_string(),
                font_size: node.font.size,
                font_color: node.font.color.clone(),
            })
            .collect();
        // Dangling edges never make it into the scene.
        let edges = graph
            .resolved_edges()
            .map(|edge| SceneEdge {
                from: {
                    let p = graph.nodes[&edge.from].position;
                    (p.x, p.y)
                },
                to: {
                    let p = graph.nodes[&edge.to].position;
                    (p.x, p.y)
                },
                color: edge.color.clone(),
                width: edge.width,
            })
            .collect();
        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Output canvas derived from the node bounding box: asymmetric margins
/// (2.5x horizontally, 1.5x vertically) and an offset that maps layout
/// coordinates into the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Frame {
    pub fn compute(scene: &Scene, margin: f64) -> Self {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for node in &scene.nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }
        // Zero nodes leave the box at +-infinity; collapse it to a point at
        // the origin so the canvas degrades to the bare margins.
        if !min_x.is_finite() {
            min_x = 0.0;
            max_x = 0.0;
            min_y = 0.0;
            max_y = 0.0;
        }
        Self {
            width: (max_x - min_x) + margin * 2.5,
            height: (max_y - min_y) + margin * 1.5,
            offset_x: margin - min_x,
            offset_y: margin - min_y,
        }
    }
}

/// Assemble the self-contained vector document. This string is the SVG export
/// output verbatim; raster export rasterizes it unchanged.
pub fn render_svg(scene: &Scene, frame: &Frame, theme: &Theme) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
        frame.width, frame.height
    ));

    for edge in &scene.edges {
        let (fx, fy) = (edge.from.0 + frame.offset_x, edge.from.1 + frame.offset_y);
        let (tx, ty) = (edge.to.0 + frame.offset_x, edge.to.1 + frame.offset_y);
        // Both cubic control points sit at the lifted midpoint, which reads
        // as a quadratic arc.
        let cx = (edge.from.0 + edge.to.0) / 2.0 + frame.offset_x;
        let cy = (edge.from.1 + edge.to.1) / 2.0 - EDGE_CURVE_LIFT + frame.offset_y;
        let color = edge.color.as_deref().unwrap_or(&theme.edge_stroke);
        svg.push_str(&format!(
            "<path d=\"M{fx},{fy} C{cx},{cy} {cx},{cy} {tx},{ty}\" stroke=\"{color}\" stroke-width=\"{}\" fill=\"none\"/>",
            edge.width
        ));
    }

    for node in &scene.nodes {
        let x = node.x + frame.offset_x;
        let y = node.y + frame.offset_y;
        let fill = node.color.as_deref().unwrap_or(&theme.node_fill);
        svg.push_str(&format!(
            "<circle cx=\"{x}\" cy=\"{y}\" r=\"{}\" fill=\"{fill}\" />",
            node.size
        ));
        let label_x = x + node.size + 5.0;
        let label_color = node.font_color.as_deref().unwrap_or(&theme.label_color);
        svg.push_str(&format!(
            "<text x=\"{label_x}\" y=\"{y}\" font-size=\"{}\" fill=\"{label_color}\">{}</text>",
            node.font_size,
            escape_xml(&node.label)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Finished export: the bytes plus the fixed download name.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Produce the requested artifact from a frozen scene.
pub fn export_scene(
    scene: &Scene,
    theme: &Theme,
    margin: f64,
    format: ExportFormat,
    dpi: u32,
) -> Result<Artifact, ExportError> {
    let frame = Frame::compute(scene, margin);
    let svg = render_svg(scene, &frame, theme);
    let bytes = match format {
        ExportFormat::Svg => svg.into_bytes(),
        #[cfg(feature = "raster")]
        ExportFormat::Png | ExportFormat::Jpg => rasterize(&svg, &frame, format, dpi)?,
        #[cfg(not(feature = "raster"))]
        ExportFormat::Png | ExportFormat::Jpg => {
            let _ = dpi;
            return Err(ExportError::RasterUnavailable);
        }
    };
    Ok(Artifact {
        filename: format.artifact_name(),
        bytes,
    })
}

pub fn write_artifact(artifact: &Artifact, output: Option<&Path>) -> Result<(), ExportError> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => Path::new(&artifact.filename).to_path_buf(),
    };
    std::fs::write(path, &artifact.bytes)?;
    Ok(())
}

#[cfg(feature = "raster")]
mod raster {
    use super::{ExportError, ExportFormat, Frame, REFERENCE_DPI};
    use once_cell::sync::Lazy;
    use std::sync::Arc;
    use usvg::fontdb;

    static FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Arc::new(db)
    });

    /// Decode the vector document into a render tree. This is the stage that
    /// suspended in the reference implementation; a failure here aborts the
    /// export and must never corrupt session state.
    fn decode_vector(svg: &str) -> Result<usvg::Tree, ExportError> {
        let mut options = usvg::Options::default();
        options.fontdb = FONTS.clone();
        usvg::Tree::from_str(svg, &options).map_err(|err| {
            log::warn!("vector document failed to decode: {err}");
            ExportError::Decode(err)
        })
    }

    pub(super) fn rasterize(
        svg: &str,
        frame: &Frame,
        format: ExportFormat,
        dpi: u32,
    ) -> Result<Vec<u8>, ExportError> {
        let tree = decode_vector(svg)?;

        let scale = dpi as f64 / REFERENCE_DPI;
        let width = (frame.width * scale).round() as u32;
        let height = (frame.height * scale).round() as u32;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or(ExportError::Canvas { width, height })?;

        // JPEG has no alpha channel; everything else keeps transparency.
        if format == ExportFormat::Jpg {
            pixmap.fill(resvg::tiny_skia::Color::WHITE);
        }

        let transform = resvg::tiny_skia::Transform::from_scale(scale as f32, scale as f32);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        match format {
            ExportFormat::Png => pixmap.encode_png().map_err(|err| ExportError::Encode {
                format,
                message: err.to_string(),
            }),
            ExportFormat::Jpg => encode_jpeg(&pixmap, width, height),
            ExportFormat::Svg => unreachable!("vector output never rasterizes"),
        }
    }

    fn encode_jpeg(
        pixmap: &resvg::tiny_skia::Pixmap,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExportError> {
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            rgb.extend_from_slice(&[color.red(), color.green(), color.blue()]);
        }
        let mut bytes = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 90);
        encoder
            .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|err| ExportError::Encode {
                format: ExportFormat::Jpg,
                message: err.to_string(),
            })?;
        Ok(bytes)
    }
}

#[cfg(feature = "raster")]
use raster::rasterize;

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
