mod blackboard; // brings `blackboard.rs` in as `crate::blackboard`
mod bus; // brings `bus.rs` in as `crate::bus`
mod config; // brings `config.rs` in as `crate::config`
mod sim; // brings `sim.rs` in as `crate::sim`

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use diffbot_kinematics::{
    BodyVelocity, DifferentialDrive, Pose, VelocityFeedback, WheelVelocities,
};
use spin_sleep::SpinSleeper;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{self, EnvFilter};

use blackboard::{Blackboard, raise_fault, record_update, snapshot};
use bus::Topic;
use sim::SimulatedMotor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Diffbot odometry runtime starting...");

    let settings = config::load_config().context("failed to load configuration")?;
    anyhow::ensure!(settings.odometry.dt > 0.0, "odometry.dt must be positive");
    anyhow::ensure!(
        settings.odometry.stale_after > 0.0,
        "odometry.stale_after must be positive"
    );

    let drive = DifferentialDrive::new(settings.robot.track_width, settings.robot.wheel_radius)
        .context("invalid robot geometry")?;
    info!("Configured {}", drive);

    // The command is fixed for the life of the process: resolve it to wheel
    // targets once and hand those to the simulated motors.
    let command = BodyVelocity::new(settings.command.linear, settings.command.angular);
    let wheel_targets = drive.inverse_kinematics(command);
    info!("Command {} -> wheel targets {}", command, wheel_targets);

    let left_motor = SimulatedMotor::new(wheel_targets.left);
    let right_motor = SimulatedMotor::new(wheel_targets.right);

    let bb: Blackboard = Arc::default();
    let pose_topic: Topic<Pose> = Topic::new(16);
    let pose_rx = pose_topic.subscribe();
    info!("Pose topic ready with {} subscriber(s).", pose_topic.subscriber_count());

    info!("Spawning odometry thread...");
    std::thread::Builder::new()
        .name("odometry".into())
        .spawn({
            let bb = Arc::clone(&bb);
            let dt = settings.odometry.dt;
            move || {
                info!("Odometry thread started.");
                let sleeper = SpinSleeper::new(10_000);
                let mut current_pose = Pose::default();
                loop {
                    let wheels =
                        WheelVelocities::new(left_motor.velocity(), right_motor.velocity());
                    if !wheels.left.is_finite() || !wheels.right.is_finite() {
                        raise_fault(&bb, "non-finite wheel feedback");
                    } else {
                        let body_velocity = drive.forward_kinematics(wheels);
                        match drive.update_pose(current_pose, body_velocity, dt) {
                            Ok(new_pose) => {
                                current_pose = new_pose;
                                record_update(&bb, current_pose, body_velocity);
                                pose_topic.publish(current_pose);
                            }
                            Err(e) => {
                                error!("Pose update failed: {}", e);
                                raise_fault(&bb, "pose update failed");
                            }
                        }
                    }
                    sleeper.sleep(Duration::from_secs_f64(dt));
                }
            }
        })
        .context("failed to spawn odometry thread")?;

    tokio::try_join!(
        telemetry(pose_rx),
        watchdog(bb, Duration::from_secs_f64(settings.odometry.stale_after)),
    )?;

    Ok(())
}

/// Reports poses published by the odometry thread.
async fn telemetry(mut pose_rx: broadcast::Receiver<Arc<Pose>>) -> anyhow::Result<()> {
    info!("Telemetry task started.");
    let mut updates: u64 = 0;
    loop {
        match pose_rx.recv().await {
            Ok(pose) => {
                updates += 1;
                debug!("Odometry update {}: {}", updates, pose);
                if updates % 100 == 0 {
                    info!("Pose after {} updates: {}", updates, pose);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Telemetry lagged, skipped {} pose updates", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    Ok(())
}

/// Raises a fault when the odometry thread stops producing updates.
async fn watchdog(bb: Blackboard, stale_after: Duration) -> anyhow::Result<()> {
    info!("Watchdog task started.");
    let mut tick = tokio::time::interval(Duration::from_millis(250));
    loop {
        tick.tick().await;
        let state = snapshot(&bb);
        let age = Instant::now() - state.last_update_ts;
        if age > stale_after {
            warn!(?age, "Odometry stale! No pose update within {:?}.", stale_after);
            raise_fault(&bb, "odometry stale");
        }
        debug!("Last pose {} at body velocity {}", state.pose, state.body_velocity);
    }
}
