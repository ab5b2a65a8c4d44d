#[tokio::main]
async fn main() {
    calendar_backend::run().await;
}
