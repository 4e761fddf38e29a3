use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = voxnote_api::Args::parse();
	voxnote_api::run(args).await
}
