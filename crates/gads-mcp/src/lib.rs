pub mod logging;
pub mod paths;
pub mod server;
pub mod state;
pub mod tools;

pub use paths::GadsPaths;
pub use server::{serve_stdio, GoogleAdsMcpServer};
pub use state::{ToolDispatcher, ToolResponse};
