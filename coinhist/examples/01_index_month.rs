mod common;
use coinhist::Gateway;
use common::get_connectors;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Register every exchange (mocks in CI when COINHIST_EXAMPLES_USE_MOCK is set).
    let gateway = Gateway::builder().with_connectors(get_connectors()).build()?;

    // 2. One month of daily price-index opens, newest first.
    println!("Fetching index/MONTH...");
    let points = gateway.history("index", "MONTH").await?;

    // 3. Print the most recent few.
    for p in points.iter().take(5) {
        let day = p
            .at()
            .map_or_else(|| p.timestamp.to_string(), |t| t.format("%Y-%m-%d").to_string());
        println!("{day} {}", p.price);
    }
    println!("({} points)", points.len());

    Ok(())
}
