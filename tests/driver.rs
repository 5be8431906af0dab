use membrane_diffusion::error::Result;
use membrane_diffusion::{SimParams, Side, Simulation, SimulationDriver, Species};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn populated() -> Result<Simulation> {
    let mut sim = Simulation::new(SimParams { seed: 99, ..SimParams::default() })?;
    for _ in 0..4 {
        sim.add_particle(Species::A, Side::Left)?;
        sim.add_particle(Species::B, Side::Right)?;
    }
    Ok(sim)
}

#[test]
fn driver_runs_both_cadences_until_shutdown() -> Result<()> {
    let slow_passes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&slow_passes);
    let mut driver = SimulationDriver::start_with_hook(
        populated()?,
        Duration::from_millis(1),
        Duration::from_millis(10),
        move |sim, report| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(report.concentration, *sim.concentration());
        },
    )
    .expect("spawn workers");
    assert!(driver.is_running());

    thread::sleep(Duration::from_millis(150));
    driver.shutdown();
    assert!(!driver.is_running());

    let ticks = driver.lock().tick_count();
    assert!(ticks > 0, "no fast ticks ran");
    assert!(slow_passes.load(Ordering::SeqCst) > 0, "no slow ticks ran");

    // Stopped workers leave the state alone; a second shutdown is a no-op.
    thread::sleep(Duration::from_millis(20));
    driver.shutdown();
    assert_eq!(driver.lock().tick_count(), ticks);
    Ok(())
}

#[test]
fn pause_and_reinitialize_through_the_lock() -> Result<()> {
    let mut driver =
        SimulationDriver::start(populated()?, Duration::from_millis(1), Duration::from_millis(5)).expect("spawn workers");

    let paused_at = driver.with(|sim| {
        sim.pause();
        sim.tick_count()
    });
    thread::sleep(Duration::from_millis(30));
    assert_eq!(driver.lock().tick_count(), paused_at);

    driver.with(|sim| sim.initialize_area(300, 600, 4))?;
    {
        let sim = driver.lock();
        assert_eq!(sim.particle_count(), 0);
        assert_eq!(sim.obstacles().len(), 3);
    }

    driver.with(|sim| sim.resume());
    thread::sleep(Duration::from_millis(30));
    driver.shutdown();
    assert!(driver.lock().tick_count() > 0);
    Ok(())
}
