use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::ShootPlanner;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub planner: Arc<ShootPlanner>,
}

impl AppState {
    pub fn new(config: Arc<Config>, planner: ShootPlanner) -> Self {
        AppState {
            config,
            planner: Arc::new(planner),
        }
    }
}
