/// GPR scan preparation entry point
mod bounds;
mod converter;
mod error;
mod intensity;
mod ply_io;
mod voxel;

use clap::{Parser, Subcommand};
use constants::processing::{DEFAULT_CONVERT_VOXEL_SIZE, DEFAULT_DOWNSAMPLE_VOXEL_SIZE};
use converter::{PlyDownsampler, PointCloudConverter};
use ply_io::ColourMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gpr-pre-processing")]
#[command(author, version, about = "Prepare GPR scans for the point cloud viewer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an x,y,z,intensity CSV into a normalised, downsampled PLY
    Convert {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, default_value_t = DEFAULT_CONVERT_VOXEL_SIZE)]
        voxel_size: f64,

        /// Grey for the direct scheme, palette for the packed scheme
        #[arg(long, value_enum, default_value_t = ColourMode::Grey)]
        colour_mode: ColourMode,
    },
    /// Voxel-thin an existing PLY into <stem>_downsample.ply
    Downsample {
        input: PathBuf,

        #[arg(long, default_value_t = DEFAULT_DOWNSAMPLE_VOXEL_SIZE)]
        voxel_size: f64,

        /// Per-point intensity file to thin alongside the cloud
        #[arg(long)]
        intensity: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            input,
            output,
            voxel_size,
            colour_mode,
        } => {
            let converter = PointCloudConverter::new(&input, &output, voxel_size, colour_mode)?;
            converter.convert()?;
        }
        Command::Downsample {
            input,
            voxel_size,
            intensity,
        } => {
            PlyDownsampler::new(&input, voxel_size, intensity.as_deref()).downsample()?;
        }
    }

    Ok(())
}
