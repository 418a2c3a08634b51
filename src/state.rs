use crate::render::FrameBuffer;
use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The tracker behind one lock, so exactly one handler mutates at a time.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<Tracker<FrameBuffer>>>,
}

impl AppState {
    pub fn new(tracker: Tracker<FrameBuffer>) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}
