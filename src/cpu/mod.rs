/*!
cpu - The 6502 CPU core, split by concern.

    state.rs      - Architectural register file (A/X/Y/SP/PC/status).
    table.rs      - Static opcode decode metadata (mnemonic, addressing
                    mode, access class) for all 256 opcode bytes.
    addressing.rs - Pure address arithmetic (page crossing, zero-page
                    wraparound, the JMP-indirect hardware bug).
    sequencer.rs  - Per-instruction scratch latches used mid-cycle.
    semantics/    - Pure `CpuState` mutation for each instruction.
    tick.rs       - `Cpu` itself: the per-cycle bus dispatcher that ties
                    all of the above together.

Only `Cpu` and the decode metadata types are public; the rest is internal
wiring callers never need to touch directly.
*/

pub mod state;
pub mod table;

pub(crate) mod addressing;
pub(crate) mod semantics;
pub(crate) mod sequencer;

mod tick;

pub use state::CpuState;
pub use table::{AccessClass, AddressingMode, Mnemonic, OpcodeInfo};
pub use tick::Cpu;
