use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = meshi_api::Args::parse();
	meshi_api::run(args).await
}
