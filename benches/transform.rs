//! Benchmarks for projection and frame derivation hot paths
//!
//! Run with: cargo bench transform

use notegrid::config::GridConfig;
use notegrid::geometry::{LogicalPoint, PixelPoint};
use notegrid::model::{GridModel, Size};
use notegrid::store::{MemoryStore, TrackId};
use notegrid::theme::Theme;
use notegrid::transform::CoordTransform;
use notegrid::view::{Frame, FrameInput, LayeredRenderer};

fn main() {
    divan::main();
}

// ============================================================================
// Projection
// ============================================================================

#[divan::bench]
fn project_keys(bencher: divan::Bencher) {
    let t = CoordTransform::keys(0.1, 12.0, 128).unwrap();
    bencher.bench(|| {
        for tick in 0..1000 {
            divan::black_box(t.to_position(LogicalPoint::new(tick as f64 * 120.0, 60.0)));
        }
    });
}

#[divan::bench]
fn unproject_control(bencher: divan::Bencher) {
    let t = CoordTransform::control(0.1, 127.0, 256.0, 1.0).unwrap();
    bencher.bench(|| {
        for x in 0..1000 {
            divan::black_box(t.from_position(PixelPoint::new(x as f64, (x % 256) as f64)));
        }
    });
}

// ============================================================================
// Frame derivation and painting
// ============================================================================

fn populated(notes: usize) -> (GridModel, MemoryStore) {
    let model = GridModel::new(GridConfig::default(), Size::new(1280.0, 720.0)).unwrap();
    let mut store = MemoryStore::new(1, 240.0);
    for i in 0..notes {
        store
            .insert(TrackId(0), i as f64 * 120.0, 240.0, (i % 128) as f64)
            .unwrap();
    }
    (model, store)
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn derive_frame_input(bencher: divan::Bencher, notes: usize) {
    let (model, store) = populated(notes);
    bencher.bench(|| divan::black_box(FrameInput::derive(&model.view, &store, 64.0)));
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn paint_frame(bencher: divan::Bencher, notes: usize) {
    let (model, store) = populated(notes);
    let renderer = LayeredRenderer::new(Theme::default().grid);
    let input = FrameInput::derive(&model.view, &store, 64.0);
    let mut buffer = vec![0u32; 1280 * 720];
    bencher.bench_local(|| {
        let mut frame = Frame::new(&mut buffer, 1280, 720);
        divan::black_box(renderer.paint(&mut frame, &input))
    });
}
