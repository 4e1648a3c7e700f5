pub mod config;
pub mod consts;
pub mod error;
pub mod estimate;
pub mod format;
pub mod intent;
pub mod io;
pub mod reducer;
pub mod session;
pub mod state;
pub mod transcode;
pub mod units;
