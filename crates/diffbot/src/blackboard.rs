use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use diffbot_kinematics::{BodyVelocity, Pose};

/// Shared robot state. One writer (the odometry thread) owns the pose;
/// everyone else reads copies via `snapshot`.
#[derive(Clone)]
pub struct State {
    pub pose: Pose,
    pub body_velocity: BodyVelocity,
    pub last_update_ts: Instant,
    pub faults: Vec<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            pose: Pose::default(),
            body_velocity: BodyVelocity::default(),
            last_update_ts: Instant::now(),
            faults: Vec::new(),
        }
    }
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn record_update(bb: &Blackboard, pose: Pose, body_velocity: BodyVelocity) {
    let mut g = bb.write();
    g.pose = pose;
    g.body_velocity = body_velocity;
    g.last_update_ts = Instant::now();
}

pub fn raise_fault(bb: &Blackboard, msg: &str) {
    let mut g = bb.write();
    if !g.faults.iter().any(|s| s == msg) {
        g.faults.push(msg.to_string());
    }
}
