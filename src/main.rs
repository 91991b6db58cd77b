use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::info;

use uvm::bytecode::to_hex;
use uvm::sample::{SAMPLE_PROGRAM, SAMPLE_RANGE};
use uvm::uvm::DEFAULT_MEMORY_SIZE;
use uvm::{
  assemble, assemble_file, disassemble, run_program, Assembly, DumpRange, MachineConfig, UvmError
};

#[derive(Parser)]
#[command(name = "uvm", version, about = "Assembler and interpreter for the UVM educational virtual machine")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Assemble a source file into a binary program
  Assemble {
    /// Assembly source
    input: PathBuf,
    /// Where to write the binary program
    output: PathBuf,
    /// Print the intermediate representation and the program bytes
    #[arg(long)]
    test: bool,
  },
  /// Run a binary program and dump the non-zero registers and memory
  Run {
    /// Binary program
    program: PathBuf,
    /// First memory address to dump
    #[arg(default_value_t = 0)]
    start: usize,
    /// One past the last memory address to dump
    #[arg(default_value_t = 200)]
    end: usize,
    /// Number of words of memory
    #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE)]
    memory_size: usize,
    /// Where to write the JSON run report
    #[arg(long, default_value = "result.json")]
    result: PathBuf,
  },
  /// Print a binary program as assembly
  Disasm {
    /// Binary program
    program: PathBuf,
  },
  /// Assemble and run the built-in sample program
  Demo {
    /// Where to write the JSON run report
    #[arg(long, default_value = "result.json")]
    result: PathBuf,
    /// Print the intermediate representation and the program bytes
    #[arg(long)]
    test: bool,
  },
}

fn read_file(path: &Path) -> Result<Vec<u8>, UvmError> {
  fs::read(path).map_err(|e| UvmError::io(path.display().to_string(), e))
}

fn print_listing(assembly: &Assembly) {
  println!("\n=== Intermediate representation (fields A, B, C) ===");
  for entry in &assembly.listing {
    println!("{}", entry);
  }
  println!("\n=== Program bytes ===");
  println!("{}", to_hex(&assembly.program));
}

fn assemble_and_print(input: &Path, output: &Path, test: bool) -> Result<(), UvmError> {
  let assembly = assemble_file(input, output)?;

  println!("Assembly succeeded.");
  println!("Input file:  {}", input.display());
  println!("Output file: {}", output.display());
  println!("Size:        {} bytes", assembly.program.len());
  if test {
    print_listing(&assembly);
  }
  Ok(())
}

fn run_and_report(
  program     : &[u8],
  config      : MachineConfig,
  range       : DumpRange,
  result_path : &Path
) -> Result<(), UvmError> {
  let report = run_program(program, config, range);

  println!("Program executed.");
  print!("{}", report);

  report.write_json(result_path)?;
  println!("\nResult saved to {}", result_path.display());
  Ok(())
}

fn execute(command: Command) -> Result<(), UvmError> {
  match command {

    Command::Assemble { input, output, test } => {
      assemble_and_print(&input, &output, test)
    }

    Command::Run { program, start, end, memory_size, result } => {
      let range = DumpRange::new(start, end)?;
      let bytes = read_file(&program)?;
      info!("Running {} ({} bytes)", program.display(), bytes.len());
      run_and_report(&bytes, MachineConfig { memory_size }, range, &result)
    }

    Command::Disasm { program } => {
      for line in disassemble(&read_file(&program)?) {
        println!("{}", line);
      }
      Ok(())
    }

    Command::Demo { result, test } => {
      println!("{}", SAMPLE_PROGRAM);
      let assembly = assemble(SAMPLE_PROGRAM)?;
      if test {
        print_listing(&assembly);
        println!();
      }
      run_and_report(&assembly.program, MachineConfig::default(), SAMPLE_RANGE, &result)
    }

  }
}

fn main() {
  env_logger::init();

  let cli = Cli::parse();
  if let Err(e) = execute(cli.command) {
    eprintln!("{}", e);
    process::exit(1);
  }
}
