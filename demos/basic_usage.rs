use jsonfetch::{Client, ConfigOptions, Error};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Create a new client
    let client = Client::new();
    client.configure(
        ConfigOptions::new()
            .base_url("https://httpbin.org")
            .default_param("client", "jsonfetch"),
    );

    println!("=== GET with query payload ===");

    // GET https://httpbin.org/get?client=jsonfetch&artist=nujabes
    let body = client.get("/get", json!({ "artist": "nujabes" })).await?;
    println!("Args: {}", body["args"]);

    println!("\n=== POST with JSON body ===");

    let body = client
        .post("post", json!({ "name": "nujabes", "language": "rust" }))
        .await?;
    println!("Echoed JSON: {}", body["json"]);

    println!("\n=== Error Handling Example ===");

    match client.get("/status/404", ()).await {
        Ok(body) => println!("Unexpected success: {}", body),
        Err(Error::Http(e)) => println!("{}: status {} message {}", e.name(), e.status, e.message),
        Err(e) => return Err(e.into()),
    }

    println!("\n=== Whole-body error messages ===");

    client.configure(
        ConfigOptions::new()
            .base_url("https://httpbin.org")
            .error_key_whole_body(),
    );
    if let Err(Error::Http(e)) = client.get("/status/500", ()).await {
        println!("Body used as message: {}", e.message);
    }

    Ok(())
}
