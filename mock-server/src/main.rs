//! Standalone runner for the Tongji mock API, for poking at the client
//! locally without university credentials.

use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("tongji mock api listening on http://{addr} (token endpoint: /v1/token)");
    mock_server::run(listener).await
}
