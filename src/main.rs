use anyhow::Result;
use log::{debug, error, info, trace, warn};
use std::fs::File;
use std::io::Write;
use std::time::{Duration, Instant};

use membrane_diffusion::{Simulation, SimulationConfig, SimulationDriver, Snapshot, Species};

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting Membrane Diffusion Simulation...");

    // --- Load Configuration ---
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = SimulationConfig::load(&config_path)?;

    info!("Using {} Rayon threads.", rayon::current_num_threads());

    // --- Initialize Simulation ---
    let sim = Simulation::from_config(&config)?;
    info!(
        "Area {}x{} with {} pores; {} particles placed.",
        sim.area().width,
        sim.area().height,
        sim.area().pore_count,
        sim.particle_count()
    );
    debug!("Simulation Parameters: {:#?}", sim.params());

    let start_time = Instant::now();
    if config.timing.realtime {
        let driver = run_realtime(sim, &config)?;
        info!("Simulation finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());
        // Workers are joined; the lock is uncontended from here on.
        let sim = driver.lock();
        report_and_save(&sim, &config)?;
    } else {
        let sim = run_stepped(sim, &config);
        info!("Simulation finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());
        report_and_save(&sim, &config)?;
    }

    info!("Simulation Complete.");
    Ok(())
}

fn report_and_save(sim: &Simulation, config: &SimulationConfig) -> Result<()> {
    let final_conc = sim.concentration();
    for species in Species::ALL {
        let share = final_conc.share(species);
        info!(
            "Species {}: left {} ({}), right {} ({})",
            species,
            share.left_count,
            share.left_label(),
            share.right_count,
            share.right_label()
        );
    }

    // --- Save Recorded Data ---
    info!("Saving recorded data...");
    if config.output.save_stats {
        let output_format = config.output.format.as_deref().unwrap_or("json");
        save_snapshots(sim.recorded_snapshots(), &config.output.base_filename, output_format);
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if config.output.save_positions {
        let filename = format!("{}_final_positions.csv", config.output.base_filename);
        match csv::Writer::from_path(&filename) {
            Ok(mut writer) => {
                writer.write_record(["species", "x", "y"])?;
                for p in sim.particles() {
                    writer.write_record(&[
                        p.species().to_string(),
                        format!("{:.4}", p.position().x),
                        format!("{:.4}", p.position().y),
                    ])?;
                }
                writer.flush()?;
                info!("Final positions saved to {}", filename);
            }
            Err(e) => error!("Error saving CSV file '{}': {}", filename, e),
        }
    } else {
        info!("Skipping saving final positions as per config.");
    }
    Ok(())
}

/// Deterministic loop: fast ticks back to back, a slow tick (and snapshot)
/// every `slow_tick_interval / tick_interval` ticks.
fn run_stepped(mut sim: Simulation, config: &SimulationConfig) -> Simulation {
    let params = sim.params().clone();
    let total_ticks = (config.timing.total_time_s * 1000.0 / params.tick_interval_ms as f64).ceil() as u64;
    let slow_every = params.ticks_per_slow_tick();
    info!("Starting stepped loop for {} ticks (slow tick every {} ticks)...", total_ticks, slow_every);

    // Initial slow tick, mirroring the driver which runs both cadences immediately.
    sim.slow_tick();
    sim.record_snapshot();

    let mut previous_print_time = Instant::now();
    for step in 1..=total_ticks {
        if let Some(report) = sim.tick() {
            trace!("Tick {} collisions: {:?}", step, report);
        }

        if step % slow_every == 0 {
            let slow = sim.slow_tick();
            if slow.direction_reset {
                debug!("Directions reset at tick {}.", step);
            }
            sim.record_snapshot();

            let print_interval_secs = 5.0;
            if previous_print_time.elapsed().as_secs_f64() >= print_interval_secs || step == total_ticks {
                info!(
                    "Tick [{}/{}] ({:.1} s) | A left {} | B left {} | Reset in {}",
                    step,
                    total_ticks,
                    params.ticks_to_seconds(step),
                    slow.concentration.species_a.left_label(),
                    slow.concentration.species_b.left_label(),
                    slow.countdown
                );
                previous_print_time = Instant::now();
            }
        }
    }
    sim
}

/// Wall-clock run on the threaded driver for `total_time_s` seconds.
fn run_realtime(sim: Simulation, config: &SimulationConfig) -> Result<SimulationDriver> {
    let tick = Duration::from_millis(config.timing.tick_interval_ms);
    let slow = Duration::from_millis(config.timing.slow_tick_interval_ms);
    let mut driver = SimulationDriver::start_with_hook(sim, tick, slow, |sim, report| {
        sim.record_snapshot();
        debug!(
            "Slow tick at tick {} | reset in {} | A left {} | B left {}",
            sim.tick_count(),
            report.countdown,
            report.concentration.species_a.left_label(),
            report.concentration.species_b.left_label()
        );
    })?;

    std::thread::sleep(Duration::from_secs_f64(config.timing.total_time_s));
    driver.shutdown();
    Ok(driver)
}

fn save_snapshots(snapshots: &[Snapshot], base_filename: &str, output_format: &str) {
    match output_format {
        "bincode" => {
            // Binary format (much more compact)
            let filename = format!("{}_snapshots.bin", base_filename);
            match File::create(&filename) {
                Ok(file) => match bincode::serialize_into(file, snapshots) {
                    Ok(_) => info!("All snapshots saved to {} (binary format)", filename),
                    Err(e) => error!("Error serializing snapshots to bincode: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        "messagepack" => {
            // MessagePack format (compact and cross-platform)
            let filename = format!("{}_snapshots.msgpack", base_filename);
            match &mut File::create(&filename) {
                Ok(file) => match rmp_serde::encode::write(file, snapshots) {
                    Ok(_) => info!("All snapshots saved to {} (MessagePack format)", filename),
                    Err(e) => error!("Error serializing snapshots to MessagePack: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        other => {
            if other != "json" {
                warn!("Unknown output format: {}. Using JSON instead.", other);
            }
            let filename = format!("{}_snapshots.json", base_filename);
            match File::create(&filename) {
                Ok(mut file) => match serde_json::to_string(snapshots) {
                    Ok(json_string) => {
                        if let Err(e) = file.write_all(json_string.as_bytes()) {
                            error!("Error writing snapshot JSON to file '{}': {}", filename, e);
                        } else {
                            info!("All snapshots saved to {}", filename);
                        }
                    }
                    Err(e) => error!("Error serializing snapshots to JSON: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
    }
}
