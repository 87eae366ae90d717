use diffbot_kinematics::*;

struct BenchMotor {
    velocity: f64,
}

impl VelocityFeedback for BenchMotor {
    fn velocity(&self) -> f64 {
        self.velocity
    }
}

fn main() {
    let track_width = 0.5;
    let wheel_radius = 0.1;
    let drive_result = DifferentialDrive::new(track_width, wheel_radius);

    let mut current_pose = Pose::new(0.0, 0.0, 0.0);
    let left = BenchMotor { velocity: 0.2 }; // m/s
    let right = BenchMotor { velocity: 0.4 }; // m/s, faster => counter-clockwise arc
    let dt = 0.1; // Time step in seconds
    let num_steps = 20;

    match drive_result {
        Ok(drive) => {
            println!("Initializing dead-reckoning run...");
            println!("  Differential Drive Parameters:");
            println!("    Track Width:  {} m", drive.track_width());
            println!("    Wheel Radius: {} m", drive.wheel_radius());
            println!("  Wheel Feedback:");
            println!("    Left:  {} m/s", left.velocity());
            println!("    Right: {} m/s", right.velocity());
            println!("  Settings:");
            println!("    Time Step:    {} s", dt);
            println!("    Num Steps:    {}", num_steps);
            println!("\nIntegrating...");

            for i in 0..num_steps {
                match drive.update_pose_from_feedback(current_pose, &left, &right, dt) {
                    Ok(new_pose) => {
                        current_pose = new_pose;
                        println!("Step {:>2}: Pose: {}", i + 1, current_pose);
                    }
                    Err(e) => {
                        eprintln!("Error during step {}: {:?}", i + 1, e);
                        break; // Stop loop on error
                    }
                }
            }

            println!("\nRun complete.");
            println!("Final Pose: {:?}", current_pose);
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {:?}", e);
            eprintln!(
                "Please ensure track_width ({}) and wheel_radius ({}) are positive.",
                track_width, wheel_radius
            );
        }
    }
}
