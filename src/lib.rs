//---------------------------------------
pub mod web_api {
    pub mod routes;
    pub mod controllers;
}

pub use web_api::routes::map_routes;
pub use web_api::controllers::*;
//---------------------------------------

//---------------------------------------
pub mod shared {
    pub mod models;
    pub mod dto;
}

pub use shared::models::*;
pub use shared::dto::*;
//---------------------------------------

//---------------------------------------
pub mod data_access {
    pub mod task_store;
    pub mod task_query;
    pub mod data_context;
    pub mod postgrest_store;
    pub mod memory_store;
}
//---------------------------------------

//---------------------------------------
pub mod fulfillment {
    pub mod calendar;
    pub mod clock;
    pub mod params;
    pub mod extract;
    pub mod rules;
    pub mod intent;
    pub mod replies;
    pub mod dispatcher;
}
//---------------------------------------

pub mod logging;
