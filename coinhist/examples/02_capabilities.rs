mod common;
use coinhist::Gateway;
use common::get_connectors;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let gateway = Gateway::builder().with_connectors(get_connectors()).build()?;

    for info in gateway.exchanges() {
        let tokens: Vec<&str> = info.intervals.iter().map(|t| t.as_str()).collect();
        println!("{:<10} {:<10} {}", info.name, info.vendor, tokens.join(", "));
    }

    Ok(())
}
