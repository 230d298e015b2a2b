use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = homefind_api::Args::parse();

	homefind_api::run(args).await
}
