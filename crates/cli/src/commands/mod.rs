pub mod anchors;
pub mod match_cmd;
pub mod onboard;
pub mod pipeline;
pub mod status;
pub mod watch;
