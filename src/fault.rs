/*!
fault.rs - Typed termination conditions surfaced from `Cpu::tick`.

Overview
========
Three things can stop a run: an opcode the instruction table has no sequencer
for (should never happen against a correctly populated table), a
micro-sequencer reaching a cycle number outside its own domain (defensive —
indicates base-cycle-count corruption or dispatcher misrouting), and a JAM
opcode (a legitimate, documented halt).

None of the three are retryable. `tick` never attempts recovery; it hands
the fault to the caller and leaves the CPU state exactly as it was at the
moment of failure (for `Jam`, with PC rolled back to the JAM opcode's own
address, so the fault identifies where the machine stopped).
*/

use thiserror::Error;

/// A fatal condition raised by `Cpu::tick`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuFault {
    #[error("unimplemented instruction: opcode {opcode:#04x} at cycle {cycle}")]
    UnimplementedInstruction { opcode: u8, cycle: u8 },

    #[error("illegal cycle: opcode {opcode:#04x} reached undefined cycle {cycle}")]
    IllegalCycle { opcode: u8, cycle: u8 },

    #[error("CPU halted: JAM opcode {opcode:#04x} at {pc:#06x}")]
    Jam { opcode: u8, pc: u16 },
}

/// Reports what happened on a completed `tick` call. This is additive
/// instrumentation for drivers (e.g. counting retired instructions); it is
/// not part of the fault contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// True on the cycle that fetched a new opcode (i.e. the previous
    /// instruction, if any, just finished).
    pub instruction_boundary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_messages_name_opcode_and_context() {
        let f = CpuFault::Jam {
            opcode: 0x02,
            pc: 0x8000,
        };
        assert_eq!(f.to_string(), "CPU halted: JAM opcode 0x02 at 0x8000");

        let f = CpuFault::IllegalCycle {
            opcode: 0xEA,
            cycle: 9,
        };
        assert_eq!(
            f.to_string(),
            "illegal cycle: opcode 0xea reached undefined cycle 9"
        );
    }
}
