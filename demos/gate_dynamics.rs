//! # Broken gate dynamics, end to end
//!
//! Runs the default twelve-concept engine with a fixed seed, then walks a
//! second, reset-free engine frame by frame the way a renderer would: step,
//! read the states, embed the latent cloud.
//!
//! ```bash
//! cargo run --example gate_dynamics
//! ```

use gate_dynamics::{EngineConfig, RelaxationEngine};

const CONCEPTS: [&str; 12] = [
    "Intelligence", "Entropy", "Manifold", "Curvature",
    "Inference", "Substrate", "Gating", "Symmetry",
    "Topology", "Evolution", "Logic", "Information",
];

fn bar(v: f64, width: usize) -> String {
    let filled = ((v * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Part 1: full run with opportunity windows ────────────────────────────
    let mut engine = RelaxationEngine::from_seed(EngineConfig::broken_gate(), 42)?;
    engine.run();
    let s = engine.summary();

    println!("Broken gate run: {} iterations, seed 42", s.iterations);
    match s.consolidation_ratio {
        Some(r) => println!("  entropy ratio (final/initial) : {:.4}", r),
        None => println!("  entropy ratio (final/initial) : n/a"),
    }
    println!("  mean substrate level          : {:.4}", s.substrate_stability);
    println!("  peak S1 activation            : {:.4}", s.peak_activation);
    println!("  opportunity windows           : {}", s.windows_triggered);

    // ── Part 2: frame-by-frame rendering loop, no resets ────────────────────
    let config = EngineConfig::canonical();
    let frames = config.iterations;
    let mut engine = RelaxationEngine::from_seed(config, 42)?;

    let mut frame = 0;
    while let Some(record) = engine.step() {
        if frame % 25 == 0 || frame + 1 == frames {
            let points = engine.embed_frame(frame, frames);
            let outermost = points.iter().map(|p| p.norm()).fold(0.0, f64::max);
            println!(
                "frame {:>3}  H(S1) {:.4}  max S1 {:.4}  outermost point r={:.4}",
                frame, record.s1_entropy, record.max_activation, outermost
            );
        }
        frame += 1;
    }

    println!("\nFinal frame (size ~ S2, colour ~ S1):");
    let points = engine.embed_frame(frames - 1, frames);
    for ((name, p), (a, b)) in CONCEPTS
        .iter()
        .zip(points.iter())
        .zip(engine.s1().as_slice().iter().zip(engine.s2().as_slice()))
    {
        println!(
            "  {:<12} ({:>7.4}, {:>7.4})  S1 {} {:.3}  S2 {} {:.3}",
            name, p.x, p.y, bar(*a, 10), a, bar(*b, 10), b
        );
    }
    Ok(())
}
