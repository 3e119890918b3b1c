use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use graphedit::export::{Frame, Scene, render_svg};
use graphedit::graph::{Edge, Graph, Node, Position};
use graphedit::theme::Theme;
use std::hint::black_box;

fn ring_graph(nodes: usize, chords: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..nodes {
        let angle = i as f64 / nodes as f64 * std::f64::consts::TAU;
        let mut node = Node::new(format!("n{i}").as_str());
        node.label = Some(format!("Node {i}"));
        node.position = Position::new(angle.cos() * 400.0, angle.sin() * 400.0);
        graph.insert_node(node);
    }
    for i in 0..nodes {
        graph
            .edges
            .push(Edge::new(format!("n{i}").as_str(), format!("n{}", (i + 1) % nodes).as_str()));
    }
    for i in 0..chords.min(nodes) {
        graph
            .edges
            .push(Edge::new(format!("n{i}").as_str(), format!("n{}", (i + nodes / 2) % nodes).as_str()));
    }
    graph
}

fn bench_render_svg(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let theme = Theme::classic();
    for (nodes, chords) in [(20usize, 5usize), (200, 50), (1000, 250)] {
        let graph = ring_graph(nodes, chords);
        let scene = Scene::capture(&graph);
        let frame = Frame::compute(&scene, 600.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("ring_{nodes}_{chords}")),
            &scene,
            |b, scene| {
                b.iter(|| {
                    let svg = render_svg(black_box(scene), &frame, &theme);
                    black_box(svg.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_scene_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_capture");
    for (nodes, chords) in [(200usize, 50usize), (1000, 250)] {
        let graph = ring_graph(nodes, chords);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("ring_{nodes}_{chords}")),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let scene = Scene::capture(black_box(graph));
                    black_box(scene.node_count());
                });
            },
        );
    }
    group.finish();
}

#[cfg(feature = "raster")]
fn bench_rasterize(c: &mut Criterion) {
    use graphedit::ExportFormat;
    use graphedit::export::export_scene;
    let mut group = c.benchmark_group("rasterize");
    group.sample_size(10);
    let theme = Theme::classic();
    let graph = ring_graph(60, 15);
    let scene = Scene::capture(&graph);
    for dpi in [96u32, 300] {
        group.bench_with_input(BenchmarkId::from_parameter(dpi), &dpi, |b, dpi| {
            b.iter(|| {
                let artifact =
                    export_scene(&scene, &theme, 600.0, ExportFormat::Png, *dpi).expect("png");
                black_box(artifact.bytes.len());
            });
        });
    }
    group.finish();
}

#[cfg(not(feature = "raster"))]
fn bench_rasterize(_c: &mut Criterion) {}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_render_svg, bench_scene_capture, bench_rasterize
);
criterion_main!(benches);
