use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    odoo_mcp::cli::run().await
}
