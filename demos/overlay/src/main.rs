use argh::FromArgs;
use std::path::PathBuf;

use silhouette::io::{functional as F, png};
use silhouette::overlay::{
    figure::{mask_to_gray8, FigureStyle, Panel},
    run_overlay_image, BackgroundColor, OverlayParams, ResourceLimits, DOWNLOAD_FILE_NAME,
};

#[derive(FromArgs)]
/// Turn an image into a silhouette over a background color and save every stage
struct Args {
    /// path to an input png or jpeg image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// directory the results are written to
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// green samples strictly below this value form the mask
    #[argh(option, default = "170")]
    threshold: u8,

    /// pixels added on every side before dilating
    #[argh(option, default = "100")]
    padding: usize,

    /// radius of the disk used to dilate the mask
    #[argh(option, default = "4")]
    disk_size: usize,

    /// number of dilate and blur rounds
    #[argh(option, default = "12")]
    num_dilations: usize,

    /// standard deviation of the gaussian blur
    #[argh(option, default = "4.0")]
    sigma: f32,

    /// background color as #rrggbb
    #[argh(option, default = "BackgroundColor::WHITE")]
    background_color: BackgroundColor,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let params = OverlayParams {
        threshold: args.threshold,
        padding: args.padding,
        disk_size: args.disk_size,
        num_dilations: args.num_dilations,
        sigma: args.sigma,
        background_color: args.background_color,
    };

    // read the image
    let image = F::read_image_any_rgb8(&args.image_path)?;
    log::info!("read {} image from {:?}", image.size(), args.image_path);

    let output = run_overlay_image(image, &params, &ResourceLimits::default())?;

    std::fs::create_dir_all(&args.output_dir)?;

    let composite_path = args.output_dir.join(DOWNLOAD_FILE_NAME);
    std::fs::write(&composite_path, output.png_bytes()?)?;
    log::info!("wrote {:?}", composite_path);

    for (name, mask) in [("binary.png", &output.binary), ("dilated.png", &output.dilated)] {
        let path = args.output_dir.join(name);
        png::write_image_png_gray8(&path, &mask_to_gray8(mask))?;
        log::info!("wrote {:?}", path);
    }

    let figure_path = args.output_dir.join("figure.png");
    png::write_image_png_rgb8(&figure_path, &output.figure(&FigureStyle::default())?)?;
    log::info!(
        "wrote {:?} with panels {:?}",
        figure_path,
        Panel::ALL.map(Panel::title)
    );

    Ok(())
}
