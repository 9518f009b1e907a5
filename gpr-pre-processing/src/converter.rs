/// CSV scan conversion and PLY downsampling pipelines.
use crate::bounds::PointCloudBounds;
use crate::error::PreprocessError;
use crate::intensity::{LogRange, log_normalise};
use crate::ply_io::{
    ColourMode, build_point_cloud, read_ply, retain_vertices, vertex_positions, write_ply,
};
use crate::voxel::{voxel_centroids, voxel_downsample};
use constants::processing::DOWNSAMPLE_SUFFIX;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Raw scan rows split into positions and amplitudes.
#[derive(Debug, Default, PartialEq)]
pub struct ScanSamples {
    pub positions: Vec<[f64; 3]>,
    pub intensities: Vec<f64>,
    pub skipped_rows: usize,
}

/// Summary written next to every converted cloud.
#[derive(Debug, Serialize)]
struct ConversionMetadata {
    source: String,
    colour_mode: ColourMode,
    voxel_size: f64,
    input_points: usize,
    output_points: usize,
    skipped_rows: usize,
    log_intensity_range: LogRange,
    bounds: PointCloudBounds,
}

/// Converts a `x,y,z,intensity` CSV scan into a normalised, voxel-averaged PLY.
pub struct PointCloudConverter {
    input_path: PathBuf,
    output_path: PathBuf,
    voxel_size: f64,
    colour_mode: ColourMode,
}

impl PointCloudConverter {
    pub fn new(
        input_path: &Path,
        output_path: &Path,
        voxel_size: f64,
        colour_mode: ColourMode,
    ) -> Result<Self, PreprocessError> {
        if !(voxel_size > 0.0 && voxel_size.is_finite()) {
            return Err(PreprocessError::InvalidVoxelSize(voxel_size));
        }

        Ok(Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            voxel_size,
            colour_mode,
        })
    }

    pub fn convert(&self) -> Result<(), PreprocessError> {
        println!(
            "Converting {} to {} ({:?} colours, voxel {})...",
            self.input_path.display(),
            self.output_path.display(),
            self.colour_mode,
            self.voxel_size
        );

        let reader = BufReader::new(File::open(&self.input_path)?);
        let samples = read_scan_rows(reader, &progress_spinner("Reading rows"))?;
        if samples.positions.is_empty() {
            return Err(PreprocessError::NoValidRows(self.input_path.clone()));
        }
        if samples.skipped_rows > 0 {
            println!("Skipped {} unparseable rows", samples.skipped_rows);
        }

        let pb = progress_bar(samples.positions.len(), "points", "Calculating bounds");
        let bounds = PointCloudBounds::from_points(&samples.positions, &pb);
        pb.finish_with_message("Bounds calculated");
        print_bounds(&bounds);

        let (normalised, log_range) = log_normalise(&samples.intensities);
        println!(
            "Log intensity range: {:.4} to {:.4}",
            log_range.min, log_range.max
        );

        let centroids = voxel_centroids(&samples.positions, &normalised, self.voxel_size)?;
        println!(
            "Voxel downsample produced {}/{} points",
            centroids.positions.len(),
            samples.positions.len()
        );

        let mut ply = build_point_cloud(
            &centroids.positions,
            &centroids.intensities,
            self.colour_mode,
        );
        write_ply(&self.output_path, &mut ply)?;

        self.save_metadata(&ConversionMetadata {
            source: self.input_path.display().to_string(),
            colour_mode: self.colour_mode,
            voxel_size: self.voxel_size,
            input_points: samples.positions.len(),
            output_points: centroids.positions.len(),
            skipped_rows: samples.skipped_rows,
            log_intensity_range: log_range,
            bounds,
        })?;

        println!("Conversion complete!");
        Ok(())
    }

    fn save_metadata(&self, metadata: &ConversionMetadata) -> Result<(), PreprocessError> {
        let path = self.output_path.with_extension("json");
        let json = serde_json::to_string_pretty(metadata).map_err(std::io::Error::from)?;
        fs::write(&path, json)?;
        println!("Metadata written to {}", path.display());
        Ok(())
    }
}

/// Parse `x,y,z,intensity` rows; anything else, headers included, is skipped.
pub fn read_scan_rows(
    reader: impl BufRead,
    progress: &ProgressBar,
) -> Result<ScanSamples, PreprocessError> {
    let mut samples = ScanSamples::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_row(&line) {
            Some([x, y, z, intensity]) => {
                samples.positions.push([x, y, z]);
                samples.intensities.push(intensity);
            }
            None => samples.skipped_rows += 1,
        }

        if idx % 50_000 == 0 {
            progress.set_position(idx as u64);
        }
    }

    progress.finish_with_message(format!("{} rows read", samples.positions.len()));
    Ok(samples)
}

fn parse_row(line: &str) -> Option<[f64; 4]> {
    let mut fields = line.split(',').map(|field| field.trim().parse::<f64>());
    let mut row = [0.0; 4];
    for slot in &mut row {
        *slot = fields.next()?.ok()?;
    }
    fields.next().is_none().then_some(row)
}

/// Thins an existing PLY and its optional per-point intensity sidecar.
pub struct PlyDownsampler {
    input_path: PathBuf,
    voxel_size: f64,
    intensity_path: Option<PathBuf>,
}

impl PlyDownsampler {
    pub fn new(input_path: &Path, voxel_size: f64, intensity_path: Option<&Path>) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            voxel_size,
            intensity_path: intensity_path.map(Path::to_path_buf),
        }
    }

    pub fn downsample(&self) -> Result<(), PreprocessError> {
        println!("Downsampling {}...", self.input_path.display());

        let mut ply = read_ply(&self.input_path)?;
        let positions = vertex_positions(&ply)?;

        // Validate the sidecar before writing anything.
        let intensities = match &self.intensity_path {
            Some(path) => Some(read_sidecar(path, positions.len())?),
            None => None,
        };

        let kept = voxel_downsample(&positions, self.voxel_size)?;
        println!(
            "Voxel downsample kept {}/{} points",
            kept.len(),
            positions.len()
        );

        retain_vertices(&mut ply, &kept);
        let output_path = downsampled_path(&self.input_path, "ply");
        write_ply(&output_path, &mut ply)?;
        println!("Wrote {}", output_path.display());

        if let Some(intensities) = intensities {
            let sidecar_path = downsampled_path(&self.input_path, "txt");
            let mut out = BufWriter::new(File::create(&sidecar_path)?);
            for &index in &kept {
                writeln!(out, "{:.6}", intensities[index])?;
            }
            out.flush()?;
            println!("Wrote {}", sidecar_path.display());
        }

        println!("Downsample complete!");
        Ok(())
    }
}

/// `<dir>/<stem>_downsample.<extension>` for `input`.
pub fn downsampled_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    input.with_file_name(format!("{stem}{DOWNSAMPLE_SUFFIX}.{extension}"))
}

fn read_sidecar(path: &Path, expected: usize) -> Result<Vec<f64>, PreprocessError> {
    let values = parse_sidecar(&fs::read_to_string(path)?)?;
    if values.len() != expected {
        return Err(PreprocessError::SidecarLengthMismatch {
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

/// One value per non-blank line.
pub fn parse_sidecar(contents: &str) -> Result<Vec<f64>, PreprocessError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.trim()
                .parse::<f64>()
                .map_err(|_| PreprocessError::InvalidSidecarValue {
                    line: idx + 1,
                    value: line.to_string(),
                })
        })
        .collect()
}

fn progress_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {pos} rows {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb
}

fn progress_bar(len: usize, unit: &str, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "[{{bar:40.green/blue}}] {{pos}}/{{len}} {unit} ({{percent}}%) {{msg}}"
            ))
            .unwrap()
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message(message);
    pb
}

fn print_bounds(bounds: &PointCloudBounds) {
    let (width, depth, height) = bounds.dimensions();
    println!(
        "Bounds: X[{:.3}, {:.3}] Y[{:.3}, {:.3}] Z[{:.3}, {:.3}] ({:.3} x {:.3} x {:.3})",
        bounds.min_x,
        bounds.max_x,
        bounds.min_y,
        bounds.max_y,
        bounds.min_z,
        bounds.max_z,
        width,
        depth,
        height
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_and_malformed_rows_are_skipped() {
        let csv = "x,y,z,intensity\n\
                   0.0,1.0,2.0,15.5\n\
                   1.0,nan-ish,2.0,3.0\n\
                   3.0, 4.0 ,5.0,0\n\
                   1.0,2.0,3.0\n\
                   1.0,2.0,3.0,4.0,5.0\n";

        let samples = read_scan_rows(Cursor::new(csv), &ProgressBar::hidden()).unwrap();

        assert_eq!(samples.positions, vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]);
        assert_eq!(samples.intensities, vec![15.5, 0.0]);
        assert_eq!(samples.skipped_rows, 4);
    }

    #[test]
    fn downsampled_paths_sit_beside_the_input() {
        let input = Path::new("data/02_ground.ply");
        assert_eq!(
            downsampled_path(input, "ply"),
            PathBuf::from("data/02_ground_downsample.ply")
        );
        assert_eq!(
            downsampled_path(input, "txt"),
            PathBuf::from("data/02_ground_downsample.txt")
        );
    }

    #[test]
    fn sidecar_skips_blank_lines_and_reports_bad_ones() {
        assert_eq!(parse_sidecar("0.5\n\n1.25\n").unwrap(), vec![0.5, 1.25]);
        assert!(matches!(
            parse_sidecar("0.5\nabc\n"),
            Err(PreprocessError::InvalidSidecarValue { line: 2, .. })
        ));
    }

    #[test]
    fn convert_writes_voxel_means() {
        let dir = std::env::temp_dir().join(format!("gpr-convert-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("scan.csv");
        let output = dir.join("scan.ply");
        fs::write(
            &input,
            "x,y,z,intensity\n0.0,0.0,0.0,1.0\n0.004,0.004,0.004,1.0\n0.1,0.0,0.0,100.0\n",
        )
        .unwrap();

        PointCloudConverter::new(&input, &output, 0.006, ColourMode::Grey)
            .unwrap()
            .convert()
            .unwrap();

        let positions = vertex_positions(&read_ply(&output).unwrap()).unwrap();
        assert_eq!(positions.len(), 2);
        assert!((positions[0][0] - 0.002).abs() < 1e-6);
        assert!((positions[1][0] - 0.1).abs() < 1e-6);
        assert!(output.with_extension("json").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn converter_rejects_non_positive_voxel_size() {
        let result = PointCloudConverter::new(
            Path::new("in.csv"),
            Path::new("out.ply"),
            0.0,
            ColourMode::Grey,
        );
        assert!(matches!(result, Err(PreprocessError::InvalidVoxelSize(_))));
    }
}
