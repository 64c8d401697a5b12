//! Hyperslab read command

use clap::ArgMatches;
use log::info;
use std::fs;

use crate::api::{GeoTiffFile, OpenMode};
use crate::catalog::{MemoryCatalog, NumericType};
use crate::commands::command_traits::Command;
use crate::config::ReaderConfig;
use crate::tiff::errors::{TiffError, TiffResult};

/// Elements printed when no output file is given
const PREVIEW_ELEMENTS: usize = 64;

/// Reads a window and writes the raw bytes to a file or a preview to stdout
pub struct ReadCommand<'a> {
    input_file: String,
    start: Vec<u64>,
    count: Vec<u64>,
    output_file: Option<String>,
    config: &'a ReaderConfig,
}

impl<'a> ReadCommand<'a> {
    pub fn new(args: &ArgMatches, config: &'a ReaderConfig) -> TiffResult<Self> {
        let input_file = super::input_path(args)?;
        let start = parse_indices(args.get_one::<String>("start"), "--start")?;
        let count = parse_indices(args.get_one::<String>("count"), "--count")?;
        if start.len() != count.len() {
            return Err(TiffError::InvalidArgument(format!(
                "--start has {} values but --count has {}",
                start.len(),
                count.len()
            )));
        }
        let output_file = args.get_one::<String>("output").cloned();

        Ok(ReadCommand { input_file, start, count, output_file, config })
    }
}

impl Command for ReadCommand<'_> {
    fn execute(&self) -> TiffResult<()> {
        let mut catalog = MemoryCatalog::new();
        let mut file = GeoTiffFile::open(&self.input_file, OpenMode::Read, &mut catalog, self.config)?;
        let (var, ty) = (file.variable(), file.numeric_type());

        let bytes = file.read_hyperslab(var, &self.start, &self.count, ty)?;
        info!("Read {} bytes ({} chunk reads)", bytes.len(), file.chunk_reads());

        match &self.output_file {
            Some(path) => {
                fs::write(path, &bytes)?;
                println!("Wrote {} bytes of {} to {}", bytes.len(), ty, path);
            }
            None => println!("{}", preview(&bytes, ty)),
        }
        file.close()
    }
}

/// Parses "a,b[,c]"
pub fn parse_indices(value: Option<&String>, flag: &str) -> TiffResult<Vec<u64>> {
    let value = value.ok_or_else(|| TiffError::InvalidArgument(format!("{} is required with --read", flag)))?;
    let indices = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u64>()
                .map_err(|_| TiffError::InvalidArgument(format!("Invalid {} value '{}'", flag, part)))
        })
        .collect::<TiffResult<Vec<u64>>>()?;
    if !(2..=3).contains(&indices.len()) {
        return Err(TiffError::InvalidArgument(format!("{} needs 2 or 3 values", flag)));
    }
    Ok(indices)
}

/// Formats the leading native-order elements of `bytes`
pub fn preview(bytes: &[u8], ty: NumericType) -> String {
    let size = ty.size();
    let shown: Vec<String> = bytes
        .chunks_exact(size)
        .take(PREVIEW_ELEMENTS)
        .map(|c| format_element(c, ty))
        .collect();
    let total = bytes.len() / size;
    if total > shown.len() {
        format!("[{}, ... ({} elements)]", shown.join(", "), total)
    } else {
        format!("[{}]", shown.join(", "))
    }
}

fn format_element(c: &[u8], ty: NumericType) -> String {
    let mut b8 = [0u8; 8];
    b8[..c.len()].copy_from_slice(c);
    match ty {
        NumericType::Byte => (c[0] as i8).to_string(),
        NumericType::UByte => c[0].to_string(),
        NumericType::Short => i16::from_ne_bytes([c[0], c[1]]).to_string(),
        NumericType::UShort => u16::from_ne_bytes([c[0], c[1]]).to_string(),
        NumericType::Int => i32::from_ne_bytes([c[0], c[1], c[2], c[3]]).to_string(),
        NumericType::UInt => u32::from_ne_bytes([c[0], c[1], c[2], c[3]]).to_string(),
        NumericType::Float => f32::from_ne_bytes([c[0], c[1], c[2], c[3]]).to_string(),
        NumericType::Int64 => i64::from_ne_bytes(b8).to_string(),
        NumericType::UInt64 => u64::from_ne_bytes(b8).to_string(),
        NumericType::Double => f64::from_ne_bytes(b8).to_string(),
    }
}
