//! triarch - disassembler for raw ARM, Thumb-2, x86 and x64 code
//!
//! Usage:
//!   triarch <file> -l x64 -a 0x401000    Disassemble a flat code image
//!   triarch --hex "55 48 89 e5" -l x64   Disassemble bytes from the command line
//!   triarch <file> -l arm --check        Decode everything and report failures

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use triarch_core::MachineLanguage;
use triarch_disasm::{disassemble, DecodeError, DisassembledInstruction};

/// Largest text one instruction can produce: the mnemonic and four operands,
/// each NUL-terminated.
const OUTPUT_BUFFER_SIZE: usize = 5 * (triarch_core::OPERAND_CAPACITY + 1);

#[derive(Parser)]
#[command(name = "triarch")]
#[command(about = "Disassembler for raw ARM, Thumb-2, x86 and x64 code", long_about = None)]
struct Cli {
    /// Flat binary file holding the code
    #[arg(required_unless_present = "hex")]
    input: Option<PathBuf>,

    /// Hex bytes to disassemble instead of a file
    #[arg(long, conflicts_with = "input")]
    hex: Option<String>,

    /// Machine language: x86, x64, arm or thumb2
    #[arg(short, long, default_value = "x64")]
    language: MachineLanguage,

    /// Address of the first byte
    #[arg(short, long, value_parser = parse_hex, default_value = "0")]
    address: u64,

    /// File offset to start at
    #[arg(short, long, value_parser = parse_hex, default_value = "0")]
    offset: u64,

    /// Maximum number of instructions to print
    #[arg(short, long, default_value = "100")]
    count: usize,

    /// Decode the whole input silently and report only failures
    #[arg(long)]
    check: bool,
}

fn parse_hex(s: &str) -> Result<u64, String> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| e.to_string())
}

fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let digits = digits.strip_prefix("0x").unwrap_or(&digits);
    if digits.len() % 2 != 0 {
        bail!("Odd number of hex digits in {text:?}");
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16).with_context(|| format!("Invalid hex byte {:?}", &digits[i..i + 2]))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data = match (&cli.hex, &cli.input) {
        (Some(hex), _) => parse_hex_bytes(hex)?,
        (None, Some(path)) => fs::read(path).with_context(|| format!("Failed to read input: {}", path.display()))?,
        (None, None) => bail!("No input given"),
    };
    let start = usize::try_from(cli.offset).context("Offset does not fit in memory")?;
    let Some(code) = data.get(start..) else {
        bail!("Offset {:#x} is past the end of the input ({} bytes)", cli.offset, data.len());
    };
    info!("disassembling {} bytes of {} at {:#x}", code.len(), cli.language, cli.address);

    if cli.check {
        check(code, cli.address, cli.language)
    } else {
        print_listing(code, cli.address, cli.language, cli.count);
        Ok(())
    }
}

/// Decodes one instruction at `offset`, returning its text line and length.
fn decode_at(code: &[u8], offset: usize, address: u64, language: MachineLanguage) -> Result<(String, usize), DecodeError> {
    let mut buffer = [0u8; OUTPUT_BUFFER_SIZE];
    let mut result = DisassembledInstruction::default();
    disassemble(address, &code[offset..], &mut buffer, &mut result, language)?;

    let mut line = result.to_string();
    if let Some(target) = result.address() {
        let kind = if result.address_is_destination { "->" } else { "=" };
        line.push_str(&format!("  ; {kind} {target:#x}"));
    }
    Ok((line, result.binary_length as usize))
}

/// One listing row: address, byte column, then the text.
fn listing_line(address: u64, bytes: &[u8], text: &str) -> String {
    let bytes: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{address:#010x}:  {:<24} {text}", bytes.join(" "))
}

fn print_listing(code: &[u8], base: u64, language: MachineLanguage, count: usize) {
    let mut offset = 0;
    let mut printed = 0;
    while offset < code.len() && printed < count {
        let address = base.wrapping_add(offset as u64);
        match decode_at(code, offset, address, language) {
            Ok((line, length)) => {
                println!("{}", listing_line(address, &code[offset..offset + length], &line));
                offset += length;
            }
            Err(e) => {
                println!("{}", listing_line(address, &code[offset..offset + 1], &format!("<decode error: {e}>")));
                offset += language.min_instruction_size();
            }
        }
        printed += 1;
    }
}

/// Walks the whole input and reports every instruction that fails to decode.
fn check(code: &[u8], base: u64, language: MachineLanguage) -> Result<()> {
    let mut offset = 0;
    let mut decoded = 0usize;
    let mut failures = 0usize;
    while offset < code.len() {
        let address = base.wrapping_add(offset as u64);
        match decode_at(code, offset, address, language) {
            Ok((line, length)) => {
                debug!("{address:#x}: {line}");
                decoded += 1;
                offset += length;
            }
            Err(e) => {
                println!("{address:#010x}: {e}");
                failures += 1;
                offset += language.min_instruction_size();
            }
        }
    }

    println!("{decoded} instructions decoded, {failures} failures");
    if failures > 0 {
        bail!("{failures} instructions failed to decode");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("55 48 89 e5").unwrap(), vec![0x55, 0x48, 0x89, 0xE5]);
        assert_eq!(parse_hex_bytes("0xc3").unwrap(), vec![0xC3]);
        assert_eq!(parse_hex_bytes("90,90").unwrap(), vec![0x90, 0x90]);
        assert!(parse_hex_bytes("abc").is_err());
        assert!(parse_hex_bytes("zz").is_err());
    }

    #[test]
    fn test_parse_hex_address() {
        assert_eq!(parse_hex("0x401000"), Ok(0x401000));
        assert_eq!(parse_hex("8000"), Ok(0x8000));
        assert!(parse_hex("xyz").is_err());
    }

    #[test]
    fn test_decode_line_annotates_targets() {
        let code = [0xE8, 0x0B, 0x00, 0x00, 0x00];
        let (line, length) = decode_at(&code, 0, 0x1000, MachineLanguage::X86).unwrap();
        assert_eq!(line, "call [0x1010]  ; -> 0x1010");
        assert_eq!(length, 5);
    }

    #[test]
    fn test_listing_line_separates_long_encodings() {
        assert_eq!(listing_line(0x1000, &[0xC3], "ret"), format!("0x00001000:  c3{} ret", " ".repeat(22)));
        let long = [0xC7, 0x05, 0x78, 0x56, 0x34, 0x12, 0x01, 0x00, 0x00, 0x00];
        let line = listing_line(0x1000, &long, "mov [0x12345678], 0x1");
        assert!(line.ends_with("c7 05 78 56 34 12 01 00 00 00 mov [0x12345678], 0x1"));
    }

    #[test]
    fn test_check_counts_failures() {
        assert!(check(&[0x55, 0xC3], 0, MachineLanguage::X64).is_ok());
        assert!(check(&[0x0F, 0x04], 0, MachineLanguage::X86).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
