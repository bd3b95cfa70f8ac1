pub mod analyze;
pub mod dispatch;
pub mod emotions;
pub mod suggest;
pub mod task;
