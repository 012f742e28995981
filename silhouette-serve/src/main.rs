mod overlay;

use argh::FromArgs;
use silhouette::overlay::ResourceLimits;

#[derive(FromArgs)]
/// Serve silhouette overlays over HTTP
struct Args {
    /// address to listen on
    #[argh(option, default = "String::from(\"0.0.0.0\")")]
    host: String,

    /// port to listen on
    #[argh(option, default = "3000")]
    port: u16,

    /// maximum number of pixels of an uploaded image
    #[argh(option, default = "40_000_000")]
    max_source_pixels: u64,

    /// maximum number of pixels of the padded mask
    #[argh(option, default = "64_000_000")]
    max_padded_pixels: u64,

    /// maximum of padded pixels times dilation rounds
    #[argh(option, default = "1_280_000_000")]
    max_dilation_work: u64,

    /// maximum size of an upload in bytes
    #[argh(option, default = "32 * 1024 * 1024")]
    max_body_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let state = overlay::AppState {
        limits: ResourceLimits {
            max_source_pixels: args.max_source_pixels,
            max_padded_pixels: args.max_padded_pixels,
            max_dilation_work: args.max_dilation_work,
        },
    };

    let address = format!("{}:{}", args.host, args.port);

    log::info!("🚀 Starting the server");
    log::info!("🔥 Listening on: http://{}", address);
    log::info!("🔧 Press Ctrl+C to stop the server");

    let app = overlay::router(state, args.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
