use bin2hexlib::{AddressWidth, IntelHexEncoder, SRecordEncoder};
use std::env;
use std::path::{Path, PathBuf};
use std::process;

const PROGRAM_NAME: &str = "bin2hex";

#[derive(PartialEq, Eq, Clone, Copy)]
enum Format {
    IntelHex,
    SRecord,
}

struct Options {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    start_address: u32,
    bytes_per_line: usize,
    extension: Option<String>,
    use_extended_addressing: bool,
    format: Format,
    address_bits: u8,
    header: String,
    verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            start_address: 0,
            bytes_per_line: 32,
            extension: None,
            use_extended_addressing: true,
            format: Format::IntelHex,
            address_bits: 32,
            header: String::new(),
            verbose: false,
        }
    }
}

enum Command {
    Help,
    Version,
    Convert(Options),
}

fn print_usage() {
    println!("Usage: {PROGRAM_NAME} [options] input_file");
    println!("\nConvert binary files to Intel HEX or Motorola S-Record format");
    println!("\nOptions:");
    println!("  -o FILE       Output file (default: input with .hex extension)");
    println!("  -a ADDRESS    Starting address in hex (default: 0x0000)");
    println!("  -l LENGTH     Bytes per line (1-255 for HEX, 1-252 for S-Record, default: 32)");
    println!("  -e EXTENSION  Output file extension (default: hex, s19/s28/s37 for S-Record)");
    println!("  -s            Use segmented addressing (disable extended addressing)");
    println!("  -f FORMAT     Output format: ihex or srec (default: ihex)");
    println!("  -w BITS       S-Record address width: 16, 24 or 32 (default: 32)");
    println!("  -H TEXT       S-Record header text");
    println!("  -v            Verbose output");
    println!("  -V            Show version information");
    println!("  -h, --help    Show this help message");
    println!("\nExamples:");
    println!("  {PROGRAM_NAME} firmware.bin");
    println!("  {PROGRAM_NAME} -a 0x8000 -l 16 bootloader.bin");
    println!("  {PROGRAM_NAME} -f srec -w 24 -H boot -o boot.s28 bootloader.bin");
}

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    println!("{PROGRAM_NAME} v{version}");
    println!("Binary to Intel HEX & Motorola S-Record converter");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    // Dispatch and immediately handle results
    if let Err(e) = run_dispatch(&args[1..]) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_dispatch(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    match parse_args(args)? {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
        Command::Convert(options) => run_convert(&options),
    }
}

fn parse_args(args: &[String]) -> Result<Command, Box<dyn std::error::Error>> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" => return Ok(Command::Version),
            "-v" => options.verbose = true,
            "-s" => options.use_extended_addressing = false,
            "-o" => {
                let value = iter.next().ok_or("Missing value after '-o'")?;
                options.output = Some(PathBuf::from(value));
            }
            "-a" => {
                let value = iter.next().ok_or("Missing value after '-a'")?;
                options.start_address =
                    parse_hex_str(value).map_err(|_e| format!("Invalid address format: {value}"))?;
            }
            "-l" => {
                let value = iter.next().ok_or("Missing value after '-l'")?;
                options.bytes_per_line = value
                    .parse()
                    .map_err(|_e| format!("Invalid line length: {value}"))?;
            }
            "-e" => {
                let value = iter.next().ok_or("Missing value after '-e'")?;
                options.extension = Some(value.clone());
            }
            "-f" => {
                let value = iter.next().ok_or("Missing value after '-f'")?;
                options.format = match value.to_ascii_lowercase().as_str() {
                    "ihex" | "hex" => Format::IntelHex,
                    "srec" | "s-record" => Format::SRecord,
                    _ => return Err(format!("Unknown format: {value}").into()),
                };
            }
            "-w" => {
                let value = iter.next().ok_or("Missing value after '-w'")?;
                options.address_bits = value
                    .parse()
                    .map_err(|_e| format!("Invalid address width: {value}"))?;
            }
            "-H" => {
                let value = iter.next().ok_or("Missing value after '-H'")?;
                options.header.clone_from(value);
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {other}").into());
            }
            other => {
                if options.input.is_some() {
                    return Err("Multiple input files specified".into());
                }
                options.input = Some(PathBuf::from(other));
            }
        }
    }

    // Line length limits depend on the format
    let max_line = match options.format {
        Format::IntelHex => 255,
        Format::SRecord => 252,
    };
    if !(1..=max_line).contains(&options.bytes_per_line) {
        return Err(format!("Invalid line length. Must be 1-{max_line}").into());
    }

    Ok(Command::Convert(options))
}

fn run_convert(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let input = options.input.as_ref().ok_or("No input file specified")?;

    // Derive output path from the input file name
    let output = match &options.output {
        Some(path) => path.clone(),
        None => default_output_path(input, &extension(options)),
    };

    let data = std::fs::read(input)
        .map_err(|e| format!("Cannot open input file {}: {e}", input.display()))?;

    if options.verbose {
        println!("Reading binary file: {}", input.display());
        println!("File size: {} bytes", data.len());
        println!("Start address: 0x{:08X}", options.start_address);
        println!("Bytes per line: {}", options.bytes_per_line);
    }

    let written = match options.format {
        Format::IntelHex => {
            if options.verbose {
                println!(
                    "Extended addressing: {}",
                    if options.use_extended_addressing {
                        "enabled"
                    } else {
                        "disabled"
                    }
                );
                println!("Converting to Intel HEX format...");
            }
            IntelHexEncoder::new(options.bytes_per_line).convert(
                &data,
                options.start_address,
                &output,
                options.use_extended_addressing,
            )?
        }
        Format::SRecord => {
            if options.verbose {
                println!("Address width: {} bits", options.address_bits);
                println!("Converting to Motorola S-Record format...");
            }
            SRecordEncoder::new(options.bytes_per_line).convert(
                &data,
                options.start_address,
                &output,
                options.address_bits,
                &options.header,
            )?
        }
    };

    if options.verbose {
        println!("Successfully wrote: {}", written.display());
        if let Some(last) = (data.len() as u64).checked_sub(1) {
            println!(
                "Address range: 0x{:08X} - 0x{:08X}",
                options.start_address,
                u64::from(options.start_address) + last
            );
        }
    } else {
        println!("Output written to: {}", written.display());
    }
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

/// Parse a string as a hex number (with optional 0x prefix)
fn parse_hex_str(s: &str) -> Result<u32, std::num::ParseIntError> {
    let s = s.trim();

    // Handle explicit 0x prefix
    if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(hex_str, 16);
    }

    // Parse as hex without prefix
    u32::from_str_radix(s, 16)
}

/// Output extension: explicit `-e` value or the conventional one for the format
fn extension(options: &Options) -> String {
    if let Some(ext) = &options.extension {
        return ext.clone();
    }
    match options.format {
        Format::IntelHex => "hex".to_string(),
        Format::SRecord => match AddressWidth::try_from(options.address_bits) {
            Ok(AddressWidth::Bits16) => "s19".to_string(),
            Ok(AddressWidth::Bits24) => "s28".to_string(),
            _ => "s37".to_string(),
        },
    }
}

/// Input file name without directories and extension, plus the new extension
fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    PathBuf::from(format!("{stem}.{extension}"))
}
