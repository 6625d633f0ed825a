#[tokio::main]
async fn main() -> std::io::Result<()> {
    chalkboom_server::run_with_config().await
}
