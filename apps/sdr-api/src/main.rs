use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = sdr_api::Args::parse();
	sdr_api::run(args).await
}
