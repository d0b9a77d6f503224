// Requests
pub mod webhook_request;
pub mod new_task;

// Responses
pub mod webhook_response;
