//! ddsvk CLI - inspect DDS textures as Vulkan images.
//!
//! Runs the loader pipeline up to image creation; no device is needed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ddsvk::format::{legacy_match, PixelFormatSource};
use ddsvk::prelude::*;
use ddsvk::{read_file, DdsFile, SubresourceDescriptor, TextureDesc};

/// ddsvk - DDS texture inspection for Vulkan
#[derive(Parser)]
#[command(name = "ddsvk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log pipeline details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the headers and resolved format of a DDS file
    Info {
        /// Input DDS file
        #[arg(env = "DDSVK_INPUT")]
        file: PathBuf,
    },

    /// Show the image and subresources a DDS file would load into
    Layout {
        /// Input DDS file
        #[arg(env = "DDSVK_INPUT")]
        file: PathBuf,

        /// Drop leading mips larger than this (0 keeps all)
        #[arg(short, long, env = "DDSVK_MAX_SIZE", default_value_t = 0)]
        max_size: u32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check every DDS file matching a glob pattern
    Scan {
        /// Glob pattern, e.g. "assets/**/*.dds"
        pattern: String,

        /// Drop leading mips larger than this (0 keeps all)
        #[arg(short, long, env = "DDSVK_MAX_SIZE", default_value_t = 0)]
        max_size: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { file } => {
            cmd_info(&file)?;
        }
        Commands::Layout { file, max_size, json } => {
            cmd_layout(&file, max_size, json)?;
        }
        Commands::Scan { pattern, max_size } => {
            cmd_scan(&pattern, max_size)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_info(path: &Path) -> Result<()> {
    let data = read_file(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file = DdsFile::parse(&data).context("Failed to parse DDS header")?;
    let header = file.header();

    let (width, height, depth, mips) = (header.width, header.height, header.depth, header.mip_count());
    let (flags, caps2) = (header.flags, header.caps2);

    println!("File:         {}", path.display());
    println!("Size:         {} bytes ({} header, {} payload)", data.len(), file.header_len(), file.payload().len());
    println!("Extent:       {}x{}x{}", width, height, depth);
    println!("Mips:         {}", mips);
    println!("Flags:        {:#010x}", flags);
    println!("Caps2:        {:#010x}", caps2);

    match file.pixel_format_source() {
        PixelFormatSource::Dxgi(code) => {
            let ext = file.dx10();
            let (dimension, array_size, misc) = ext.map_or((0, 0, 0), |e| (e.resource_dimension, e.array_size, e.misc_flag));
            println!("Header:       DX10");
            println!("DXGI format:  {} ({})", code.name(), code.0);
            println!("Dimension:    {}", dimension);
            println!("Array size:   {}", array_size);
            println!("Misc flags:   {:#x}", misc);
            if code.is_typeless() {
                println!("              typeless, created with a mutable format");
            }
            print_mapping(code.to_vk());
        }
        PixelFormatSource::Legacy(pf) => {
            println!("Header:       legacy");
            println!("Bit count:    {}", pf.rgb_bit_count);
            println!(
                "Masks:        {:#010x} {:#010x} {:#010x} {:#010x}",
                pf.masks[0], pf.masks[1], pf.masks[2], pf.masks[3]
            );
            match legacy_match(&pf) {
                Some(entry) => {
                    println!("D3D9 format:  {}", entry.d3d_name);
                    print_mapping(entry.format);
                }
                None => println!("D3D9 format:  unrecognized"),
            }
        }
    }

    match TextureDesc::from_dds(&file) {
        Ok(desc) => {
            println!("Image type:   {:?}", desc.image_type);
            println!("Layers:       {}", desc.array_layers);
            println!("Cube map:     {}", desc.is_cube_map);
            println!("Alpha mode:   {:?}", desc.alpha_mode);
        }
        Err(e) => println!("Unloadable:   {} ({})", e, e.code()),
    }

    Ok(())
}

fn print_mapping(format: ash::vk::Format) {
    if format == ash::vk::Format::UNDEFINED {
        println!("Vulkan:       no equivalent");
    } else {
        println!("Vulkan:       {:?}", format);
    }
}

#[derive(Serialize)]
struct LayoutReport {
    file: String,
    image_type: String,
    format: String,
    extent: [u32; 3],
    mip_levels: u32,
    array_layers: u32,
    flags: String,
    usage: String,
    skipped_mips: u32,
    alpha_mode: String,
    is_cube_map: bool,
    payload_offset: usize,
    subresources: Vec<SubresourceReport>,
}

#[derive(Serialize)]
struct SubresourceReport {
    mip_level: u32,
    source_mip_level: u32,
    array_layer: u32,
    aspect: String,
    offset: usize,
    size: usize,
    row_pitch: usize,
    row_count: usize,
    extent: [u32; 3],
}

impl LayoutReport {
    fn new(path: &Path, layout: &TextureLayout) -> Self {
        let description = &layout.description;
        Self {
            file: path.display().to_string(),
            image_type: format!("{:?}", description.image_type),
            format: format!("{:?}", description.format),
            extent: [description.extent.width, description.extent.height, description.extent.depth],
            mip_levels: description.mip_levels,
            array_layers: description.array_layers,
            flags: format!("{:?}", description.flags),
            usage: format!("{:?}", description.usage),
            skipped_mips: layout.skipped_mips,
            alpha_mode: format!("{:?}", layout.alpha_mode()),
            is_cube_map: layout.is_cube_map(),
            payload_offset: layout.payload_offset,
            subresources: layout.subresources.iter().map(SubresourceReport::new).collect(),
        }
    }
}

impl SubresourceReport {
    fn new(s: &SubresourceDescriptor) -> Self {
        Self {
            mip_level: s.mip_level,
            source_mip_level: s.source_mip_level,
            array_layer: s.array_layer,
            aspect: format!("{:?}", s.aspect),
            offset: s.offset,
            size: s.size,
            row_pitch: s.row_pitch,
            row_count: s.row_count,
            extent: [s.extent.width, s.extent.height, s.extent.depth],
        }
    }
}

fn cmd_layout(path: &Path, max_size: u32, json: bool) -> Result<()> {
    let options = LoadOptions::default().with_max_size(max_size);
    let (_, layout) = TextureLoader::describe_from_file(path, &options)
        .with_context(|| format!("Failed to describe {}", path.display()))?;
    let report = LayoutReport::new(path, &layout);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} {}x{}x{}, {} mips ({} skipped), {} layers",
        report.image_type,
        report.format,
        report.extent[0],
        report.extent[1],
        report.extent[2],
        report.mip_levels,
        report.skipped_mips,
        report.array_layers
    );
    println!("Flags: {}  Usage: {}", report.flags, report.usage);
    println!();
    println!(
        "{:>5} {:>5} {:>20} {:>12} {:>10} {:>10} {:>8} {:>16}",
        "layer", "mip", "aspect", "offset", "size", "pitch", "rows", "extent"
    );
    for s in &report.subresources {
        println!(
            "{:>5} {:>5} {:>20} {:>12} {:>10} {:>10} {:>8} {:>16}",
            s.array_layer,
            s.mip_level,
            s.aspect,
            s.offset,
            s.size,
            s.row_pitch,
            s.row_count,
            format!("{}x{}x{}", s.extent[0], s.extent[1], s.extent[2])
        );
    }

    Ok(())
}

fn cmd_scan(pattern: &str, max_size: u32) -> Result<()> {
    let paths: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Invalid glob pattern {pattern:?}"))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();

    println!("Scanning {} files...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(&PathBuf, ddsvk::Result<TextureLayout>)> = paths
        .par_iter()
        .map(|path| {
            let options = LoadOptions::default().with_max_size(max_size);
            let result = TextureLoader::describe_from_file(path, &options).map(|(_, layout)| layout);
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_with_message("Done");

    let mut summary: BTreeMap<ResultCode, usize> = BTreeMap::new();
    for (path, result) in &results {
        let code = ResultCode::from_result(result);
        *summary.entry(code).or_default() += 1;
        if let Err(e) = result {
            eprintln!("{}: {}", path.display(), e);
        }
    }

    println!("Scanned {} files in {:?}", results.len(), start.elapsed());
    for (code, count) in &summary {
        println!("{:>8}  {:?} - {}", count, code, code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_layout() {
        let cli = Cli::try_parse_from(["ddsvk", "layout", "rock.dds", "--max-size", "512", "--json"]).unwrap();
        match cli.command {
            Commands::Layout { file, max_size, json } => {
                assert_eq!(file, PathBuf::from("rock.dds"));
                assert_eq!(max_size, 512);
                assert!(json);
            }
            _ => panic!("expected layout command"),
        }
    }

    #[test]
    fn test_cli_verbose_is_global() {
        let cli = Cli::try_parse_from(["ddsvk", "scan", "*.dds", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Scan { max_size: 0, .. }));
    }
}
