pub mod ask;
pub mod history;
pub mod onboard;
pub mod serve;
pub mod status;
