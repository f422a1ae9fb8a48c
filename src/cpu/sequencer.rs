/*!
sequencer.rs - Per-instruction scratch state for the cycle-by-cycle dispatcher.

Overview
========
`Scratch` holds the latch registers a real 6502 keeps internally while an
instruction is in flight: the address bytes as they're fetched, the
pre-index base address (needed to detect a page cross), the final
effective address, and the data byte being read or about to be written.
None of it is architecturally visible — it's reinitialized at the start of
every instruction and has no meaning between instructions.

`tick.rs` owns the actual per-cycle state machine; this module only owns
the scratch register file it reads and writes.
*/

/// Per-instruction scratch latches, reset at the start of every opcode fetch.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Scratch {
    /// Low byte of a fetched address, or a fetched zero-page pointer.
    pub addr_lo: u8,
    /// High byte of a fetched address.
    pub addr_hi: u8,
    /// Zero-page pointer byte for (zp,X) / (zp),Y.
    pub ptr: u8,
    /// Pre-index absolute/pointer base, kept for page-cross comparison.
    pub base_addr: u16,
    /// Final resolved address for this cycle's bus transaction.
    pub effective_addr: u16,
    /// Latched data byte: an RMW operand, a loaded value, or a store value.
    pub data: u8,
    /// True once an indexed-address computation has been found to cross
    /// a page boundary.
    pub page_crossed: bool,
    /// Relative branch displacement, sign-extended from the fetched byte.
    pub branch_offset: i8,
    /// Scratch return-address-in-flight for JSR/BRK pushes and RTS/RTI pops.
    pub return_addr: u16,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }
}
