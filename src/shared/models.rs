pub mod app_state;
pub mod completion_policy;
pub mod settings;
pub mod task;
pub mod task_priority;
pub mod task_status;
