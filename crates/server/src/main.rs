#[tokio::main]
async fn main() -> anyhow::Result<()> {
    geomind_server::start().await
}
