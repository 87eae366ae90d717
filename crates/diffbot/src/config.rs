use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct RobotSettings {
    /// Distance between the wheel contact points (m).
    pub track_width: f64,
    /// Wheel radius (m).
    pub wheel_radius: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandSettings {
    /// Commanded linear velocity (m/s).
    pub linear: f64,
    /// Commanded angular velocity (rad/s), counter-clockwise positive.
    pub angular: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OdometrySettings {
    /// Integration step (s).
    pub dt: f64,
    /// Seconds without a pose update before the watchdog raises a fault.
    pub stale_after: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub robot: RobotSettings,
    pub command: CommandSettings,
    pub odometry: OdometrySettings,
}

pub fn load_config() -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [robot]
        track_width = 0.5
        wheel_radius = 0.1

        [command]
        linear = 0.25
        angular = 0.5

        [odometry]
        dt = 0.01
        stale_after = 0.25
    "#;

    #[test]
    fn sample_config_deserializes() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(SAMPLE, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .unwrap();

        assert_eq!(settings.robot.track_width, 0.5);
        assert_eq!(settings.robot.wheel_radius, 0.1);
        assert_eq!(settings.command.linear, 0.25);
        assert_eq!(settings.command.angular, 0.5);
        assert_eq!(settings.odometry.dt, 0.01);
        assert_eq!(settings.odometry.stale_after, 0.25);
    }
}
