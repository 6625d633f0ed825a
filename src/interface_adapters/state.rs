use crate::use_cases::MatchHandle;

#[derive(Clone)]
pub struct AppState {
    // Channels of the running match (events in, snapshots and stages out).
    pub game: MatchHandle,
}
