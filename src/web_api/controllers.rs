pub mod health_controller;
pub mod webhook_controller;
