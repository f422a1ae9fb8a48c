#![doc = r#"
mos6502 - A cycle-accurate MOS 6502 CPU core.

This crate models the 6502 at the granularity of a single clock cycle: one
call to `Cpu::tick` drives exactly one bus transaction, including the
dummy reads and writes real hardware performs but software never observes
directly. That granularity is what makes the core usable as a drop-in CPU
for a larger bus-cycle-accurate system (rather than an instruction-stepped
approximation of one).

Modules:
- bus: the `Bus` trait a caller implements to back the CPU with memory,
  plus `FlatMemory`, a reference flat-RAM implementation
- cpu: the CPU core itself (`Cpu`, register/flag state, opcode decode
  metadata)
- fault: typed conditions (`CpuFault`) that halt a `tick` call, and
  `TickOutcome`, auxiliary per-tick reporting

```
use mos6502::{Bus, Cpu, bus::FlatMemory};

let mut mem = FlatMemory::new();
mem.load_at(0x8000, &[0xA9, 0x42]); // LDA #$42
mem.write(0xFFFC, 0x00);
mem.write(0xFFFD, 0x80);

let mut cpu = Cpu::new();
cpu.reset(&mut mem);
for _ in 0..2 {
    cpu.tick(&mut mem).unwrap();
}
assert_eq!(cpu.state.a, 0x42);
```
"#]

pub mod bus;
pub mod cpu;
pub mod fault;

pub use bus::{Bus, FlatMemory};
pub use cpu::Cpu;
pub use fault::{CpuFault, TickOutcome};
