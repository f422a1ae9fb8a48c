//! Sample driver: loads a flat binary image into memory and runs `tick`
//! until a fault, then reports the terminating condition and final
//! register state.
//!
//! Usage: cargo run --example run --features cli -- <image-path> [start-addr-hex]

use mos6502::bus::Bus;
use mos6502::{Cpu, FlatMemory};
use std::env;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: run <image-path> [start-addr-hex]");
        return ExitCode::FAILURE;
    };
    let start = args
        .next()
        .map(|s| u16::from_str_radix(s.trim_start_matches("0x"), 16).expect("start address must be hex"))
        .unwrap_or(0x0000);

    let image = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut mem = FlatMemory::new();
    mem.load_at(start, &image);
    mem.write(0xFFFC, start as u8);
    mem.write(0xFFFD, (start >> 8) as u8);

    let mut cpu = Cpu::new();
    cpu.reset(&mut mem);

    let fault = loop {
        match cpu.tick(&mut mem) {
            Ok(_) => continue,
            Err(fault) => break fault,
        }
    };

    eprintln!("halted: {fault}");
    eprintln!(
        "final state: pc={:#06x} a={:#04x} x={:#04x} y={:#04x} sp={:#04x} status={:#04x}",
        cpu.state.pc, cpu.state.a, cpu.state.x, cpu.state.y, cpu.state.sp, cpu.state.status
    );

    ExitCode::SUCCESS
}
