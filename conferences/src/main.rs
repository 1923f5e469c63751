use anyhow::Result;
use conferences::cli::Application;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize_logging("conferences=info,database=info");

    Application::start().await
}
