//! Connection registration handlers.

mod register_connection;
mod remove_connection;

pub use register_connection::{
    RegisterConnectionCommand, RegisterConnectionHandler, RegisterConnectionResult,
};
pub use remove_connection::{RemoveConnectionCommand, RemoveConnectionHandler};
