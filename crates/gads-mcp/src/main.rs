use gads_mcp::logging::init_stderr_tracing;
use gads_mcp::{serve_stdio, ToolDispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_stderr_tracing("info");
    let dispatcher = ToolDispatcher::new();
    serve_stdio(dispatcher).await?;
    Ok(())
}
