use kstep::{BlobGenerator, ClusteringSession, Point, SessionConfig, SharedSession};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=kstep=debug shows every step.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kstep=info")),
        )
        .init();

    // Three well separated blobs so the steps are easy to follow.
    let blobs = BlobGenerator::new(
        vec![
            Point::new(-60.0, -30.0),
            Point::new(55.0, -40.0),
            Point::new(0.0, 60.0),
        ],
        12.0,
    )?;
    let session = ClusteringSession::new(SessionConfig::default().with_seed(2024))?
        .with_generator(blobs);
    let shared = SharedSession::from_session(session);

    shared.generate(300)?;
    if let Some((lo, hi)) = shared.with_session(|s| s.dataset().bounds()) {
        println!(
            "dataset spans x [{:.1}, {:.1}], y [{:.1}, {:.1}]",
            lo.x, hi.x, lo.y, hi.y
        );
    }
    let init = shared.initialize(3, "random", None)?;
    println!("init ({}): {:?}", init.k.unwrap_or(0), init.centroids);

    for _ in 0..3 {
        let snap = shared.step()?;
        println!(
            "step {:>2}: inertia={:.1} finished={} centroids={:?}",
            snap.iteration,
            snap.inertia.unwrap_or(0.0),
            snap.finished,
            snap.centroids
        );
    }

    let done = shared.run()?;
    println!(
        "run: {} iterations, {:?}, inertia={:.1}",
        done.iteration,
        done.termination,
        done.inertia.unwrap_or(0.0)
    );

    // Manual seeding, one click at a time.
    shared.reset();
    let clicks = [Point::new(-50.0, 0.0), Point::new(50.0, 0.0), Point::new(0.0, 50.0)];
    for click in clicks {
        let snap = shared.initialize(3, "manual", Some(&[click]))?;
        println!("manual: {} of 3 collected, phase {}", snap.centroids.len(), snap.phase);
    }
    let done = shared.run()?;
    println!("manual run: {} iterations", done.iteration);

    Ok(())
}
