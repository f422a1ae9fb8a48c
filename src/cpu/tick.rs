/*!
tick.rs - The per-clock-cycle dispatcher: the heart of cycle accuracy.

Overview
========
`Cpu::tick` advances the machine by exactly one clock cycle and performs at
most one bus transaction, matching real 6502 bus behavior cycle for cycle
— including the "wasted" cycles real silicon spends on dummy reads and
writes that don't change any visible state but do appear on the bus (and
would be observable to a bus-sharing device, which is the entire reason
cycle accuracy matters).

Every opcode fetch is cycle 1. From there, `AccessClass` and
`AddressingMode` together select a fixed cycle sequence (see
`cpu::table`); the only runtime branch within a sequence is whether an
indexed address crossed a page boundary, which for `Read` adds one cycle
and for fixed-cost classes (`Rmw`, `Write`, and the illegal high-byte-AND
family) is already priced in.

Semantics (what an opcode *does* once its operand is in hand) live in
`cpu::semantics`; this module's job is entirely "what cycle are we on, and
what does the bus do this cycle."
*/

use crate::bus::Bus;
use crate::cpu::addressing::{
    indexed_absolute, indexed_absolute_uncorrected, indirect_jmp_bug_high_addr, relative_target,
    word_from_bytes, zp_indexed, zp_pointer_high_addr,
};
use crate::cpu::sequencer::Scratch;
use crate::cpu::semantics::{arithmetic, branch, control_flow, flags, illegal, load_store, logical, shift, stack};
use crate::cpu::state::CpuState;
use crate::cpu::table::{AccessClass, AddressingMode, Mnemonic, OpcodeInfo, decode};
use crate::fault::{CpuFault, TickOutcome};

/// A cycle-accurate 6502 core: architectural state plus the in-flight
/// scratch registers of whatever instruction is currently being decoded.
pub struct Cpu {
    pub state: CpuState,
    opcode: u8,
    info: OpcodeInfo,
    /// 0 means "the next tick should fetch a new opcode". Otherwise the
    /// cycle number (>=1) that was just completed.
    cycle: u8,
    fetch_pc: u16,
    scratch: Scratch,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
            opcode: 0,
            info: decode(0xEA),
            cycle: 0,
            fetch_pc: 0,
            scratch: Scratch::new(),
        }
    }

    /// Load PC from the reset vector at $FFFC/$FFFD. Does not itself
    /// consume a clock cycle; callers model the reset sequence's own
    /// timing externally if they need to.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.state.pc = bus.read_word(0xFFFC);
        self.cycle = 0;
    }

    /// True if the CPU is in the middle of an instruction (i.e. mid-cycle
    /// state that a caller shouldn't interrupt).
    pub fn mid_instruction(&self) -> bool {
        self.cycle != 0
    }

    /// Advance by exactly one clock cycle.
    pub fn tick(&mut self, bus: &mut impl Bus) -> Result<TickOutcome, CpuFault> {
        if self.cycle == 0 {
            return self.fetch_and_decode(bus);
        }

        let next_cycle = self.cycle + 1;
        let finished = self.dispatch(bus, next_cycle)?;
        self.cycle = if finished { 0 } else { next_cycle };
        Ok(TickOutcome {
            instruction_boundary: false,
        })
    }

    fn fetch_and_decode(&mut self, bus: &mut impl Bus) -> Result<TickOutcome, CpuFault> {
        let pc = self.state.pc;
        let opcode = bus.read(pc);
        self.state.pc = pc.wrapping_add(1);
        self.opcode = opcode;
        self.info = decode(opcode);
        self.fetch_pc = pc;
        self.scratch = Scratch::new();
        log::trace!("fetch {opcode:#04x} at {pc:#06x} ({:?})", self.info.mnemonic);

        if self.info.class == AccessClass::Jam {
            log::error!("JAM opcode {opcode:#04x} at {pc:#06x}");
            self.state.pc = pc;
            return Err(CpuFault::Jam { opcode, pc });
        }

        self.cycle = 1;
        Ok(TickOutcome {
            instruction_boundary: true,
        })
    }

    fn illegal_cycle(&self, cycle: u8) -> CpuFault {
        CpuFault::IllegalCycle {
            opcode: self.opcode,
            cycle,
        }
    }

    /// Run the bus transaction for `cycle` (>=2). Returns true if the
    /// instruction is complete after this cycle.
    fn dispatch(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match self.info.class {
            AccessClass::Read => self.dispatch_read(bus, cycle),
            AccessClass::Rmw => self.dispatch_rmw(bus, cycle),
            AccessClass::Write => self.dispatch_write(bus, cycle),
            AccessClass::Branch => self.dispatch_branch(bus, cycle),
            AccessClass::JumpAbsolute => self.dispatch_jmp_absolute(bus, cycle),
            AccessClass::JumpIndirect => self.dispatch_jmp_indirect(bus, cycle),
            AccessClass::Jsr => self.dispatch_jsr(bus, cycle),
            AccessClass::Rts => self.dispatch_rts(bus, cycle),
            AccessClass::Rti => self.dispatch_rti(bus, cycle),
            AccessClass::Brk => self.dispatch_brk(bus, cycle),
            AccessClass::Push => self.dispatch_push(bus, cycle),
            AccessClass::Pull => self.dispatch_pull(bus, cycle),
            AccessClass::Jam => unreachable!("Jam faults at fetch time"),
        }
    }

    // ---------------------------------------------------------------
    // Read class: every addressing mode that only reads an operand.
    // ---------------------------------------------------------------
    fn dispatch_read(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        use AddressingMode::*;
        match self.info.mode {
            Implied | Accumulator => {
                // Single dummy read of the next instruction byte, PC unmoved.
                let _ = bus.read(self.state.pc);
                self.apply_register_semantics();
                Ok(true)
            }
            Immediate => {
                let v = bus.read(self.state.pc);
                self.state.pc = self.state.pc.wrapping_add(1);
                self.apply_value_semantics(v);
                Ok(true)
            }
            ZeroPage => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let v = bus.read(self.scratch.addr_lo as u16);
                    self.apply_value_semantics(v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            ZeroPageX | ZeroPageY => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let _ = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let index = self.index_for(self.info.mode);
                    let addr = zp_indexed(self.scratch.ptr, index) as u16;
                    let v = bus.read(addr);
                    self.apply_value_semantics(v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            Absolute => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_hi = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                4 => {
                    let addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    let v = bus.read(addr);
                    self.apply_value_semantics(v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            AbsoluteX | AbsoluteY => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_hi = self.fetch_operand_byte(bus);
                    let base = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    self.scratch.base_addr = base;
                    let index = self.index_for(self.info.mode);
                    let (addr, crossed) = indexed_absolute(base, index);
                    self.scratch.effective_addr = addr;
                    self.scratch.page_crossed = crossed;
                    Ok(false)
                }
                4 => {
                    let index = self.index_for(self.info.mode);
                    let uncorrected = indexed_absolute_uncorrected(self.scratch.base_addr, index);
                    let v = bus.read(uncorrected);
                    if self.scratch.page_crossed {
                        Ok(false)
                    } else {
                        self.apply_value_semantics(v);
                        Ok(true)
                    }
                }
                5 if self.scratch.page_crossed => {
                    let v = bus.read(self.scratch.effective_addr);
                    self.apply_value_semantics(v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            IndirectX => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let _ = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let p = zp_indexed(self.scratch.ptr, self.state.x);
                    self.scratch.addr_lo = bus.read(p as u16);
                    self.scratch.ptr = p;
                    Ok(false)
                }
                5 => {
                    let hi_addr = zp_pointer_high_addr(self.scratch.ptr);
                    self.scratch.addr_hi = bus.read(hi_addr);
                    Ok(false)
                }
                6 => {
                    let addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    let v = bus.read(addr);
                    self.apply_value_semantics(v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            IndirectY => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_lo = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let hi_addr = zp_pointer_high_addr(self.scratch.ptr);
                    self.scratch.addr_hi = bus.read(hi_addr);
                    let base = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    self.scratch.base_addr = base;
                    let (addr, crossed) = indexed_absolute(base, self.state.y);
                    self.scratch.effective_addr = addr;
                    self.scratch.page_crossed = crossed;
                    Ok(false)
                }
                5 => {
                    let uncorrected = indexed_absolute_uncorrected(self.scratch.base_addr, self.state.y);
                    let v = bus.read(uncorrected);
                    if self.scratch.page_crossed {
                        Ok(false)
                    } else {
                        self.apply_value_semantics(v);
                        Ok(true)
                    }
                }
                6 if self.scratch.page_crossed => {
                    let v = bus.read(self.scratch.effective_addr);
                    self.apply_value_semantics(v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            Indirect | Relative => unreachable!("not a Read-class addressing mode"),
        }
    }

    // ---------------------------------------------------------------
    // Rmw class: memory read-modify-write.
    // ---------------------------------------------------------------
    fn dispatch_rmw(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        use AddressingMode::*;
        match self.info.mode {
            ZeroPage => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.data = bus.read(self.scratch.addr_lo as u16);
                    Ok(false)
                }
                4 => {
                    bus.write(self.scratch.addr_lo as u16, self.scratch.data);
                    Ok(false)
                }
                5 => {
                    let new = self.apply_rmw_semantics(self.scratch.data);
                    bus.write(self.scratch.addr_lo as u16, new);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            ZeroPageX => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let _ = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    self.scratch.addr_lo = zp_indexed(self.scratch.ptr, self.state.x);
                    self.scratch.data = bus.read(self.scratch.addr_lo as u16);
                    Ok(false)
                }
                5 => {
                    bus.write(self.scratch.addr_lo as u16, self.scratch.data);
                    Ok(false)
                }
                6 => {
                    let new = self.apply_rmw_semantics(self.scratch.data);
                    bus.write(self.scratch.addr_lo as u16, new);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            Absolute => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_hi = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                4 => {
                    let addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    self.scratch.effective_addr = addr;
                    self.scratch.data = bus.read(addr);
                    Ok(false)
                }
                5 => {
                    bus.write(self.scratch.effective_addr, self.scratch.data);
                    Ok(false)
                }
                6 => {
                    let new = self.apply_rmw_semantics(self.scratch.data);
                    bus.write(self.scratch.effective_addr, new);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            AbsoluteX | AbsoluteY => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_hi = self.fetch_operand_byte(bus);
                    self.scratch.base_addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    Ok(false)
                }
                4 => {
                    let index = self.index_for(self.info.mode);
                    let uncorrected = indexed_absolute_uncorrected(self.scratch.base_addr, index);
                    let _ = bus.read(uncorrected);
                    let (addr, _) = indexed_absolute(self.scratch.base_addr, index);
                    self.scratch.effective_addr = addr;
                    Ok(false)
                }
                5 => {
                    self.scratch.data = bus.read(self.scratch.effective_addr);
                    Ok(false)
                }
                6 => {
                    bus.write(self.scratch.effective_addr, self.scratch.data);
                    Ok(false)
                }
                7 => {
                    let new = self.apply_rmw_semantics(self.scratch.data);
                    bus.write(self.scratch.effective_addr, new);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            IndirectX => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let _ = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let p = zp_indexed(self.scratch.ptr, self.state.x);
                    self.scratch.addr_lo = bus.read(p as u16);
                    self.scratch.ptr = p;
                    Ok(false)
                }
                5 => {
                    let hi_addr = zp_pointer_high_addr(self.scratch.ptr);
                    self.scratch.addr_hi = bus.read(hi_addr);
                    self.scratch.effective_addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    Ok(false)
                }
                6 => {
                    self.scratch.data = bus.read(self.scratch.effective_addr);
                    Ok(false)
                }
                7 => {
                    bus.write(self.scratch.effective_addr, self.scratch.data);
                    Ok(false)
                }
                8 => {
                    let new = self.apply_rmw_semantics(self.scratch.data);
                    bus.write(self.scratch.effective_addr, new);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            IndirectY => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_lo = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let hi_addr = zp_pointer_high_addr(self.scratch.ptr);
                    self.scratch.addr_hi = bus.read(hi_addr);
                    self.scratch.base_addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    Ok(false)
                }
                5 => {
                    let uncorrected = indexed_absolute_uncorrected(self.scratch.base_addr, self.state.y);
                    let _ = bus.read(uncorrected);
                    let (addr, _) = indexed_absolute(self.scratch.base_addr, self.state.y);
                    self.scratch.effective_addr = addr;
                    Ok(false)
                }
                6 => {
                    self.scratch.data = bus.read(self.scratch.effective_addr);
                    Ok(false)
                }
                7 => {
                    bus.write(self.scratch.effective_addr, self.scratch.data);
                    Ok(false)
                }
                8 => {
                    let new = self.apply_rmw_semantics(self.scratch.data);
                    bus.write(self.scratch.effective_addr, new);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            _ => unreachable!("not an Rmw-class addressing mode"),
        }
    }

    // ---------------------------------------------------------------
    // Write class.
    // ---------------------------------------------------------------
    fn dispatch_write(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        use AddressingMode::*;
        match self.info.mode {
            ZeroPage => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let v = self.store_value(0);
                    bus.write(self.scratch.addr_lo as u16, v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            ZeroPageX | ZeroPageY => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let _ = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let index = self.index_for(self.info.mode);
                    let addr = zp_indexed(self.scratch.ptr, index) as u16;
                    let v = self.store_value(0);
                    bus.write(addr, v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            Absolute => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_hi = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                4 => {
                    let addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    let v = self.store_value(0);
                    bus.write(addr, v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            AbsoluteX | AbsoluteY => match cycle {
                2 => {
                    self.scratch.addr_lo = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_hi = self.fetch_operand_byte(bus);
                    self.scratch.base_addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    Ok(false)
                }
                4 => {
                    let index = self.index_for(self.info.mode);
                    let uncorrected = indexed_absolute_uncorrected(self.scratch.base_addr, index);
                    let _ = bus.read(uncorrected);
                    let (addr, crossed) = indexed_absolute(self.scratch.base_addr, index);
                    self.scratch.effective_addr = addr;
                    self.scratch.page_crossed = crossed;
                    Ok(false)
                }
                5 => {
                    let hi = (self.scratch.effective_addr >> 8) as u8;
                    let v = self.store_value(hi);
                    let addr = self.unstable_write_addr(v);
                    bus.write(addr, v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            IndirectX => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    let _ = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let p = zp_indexed(self.scratch.ptr, self.state.x);
                    self.scratch.addr_lo = bus.read(p as u16);
                    self.scratch.ptr = p;
                    Ok(false)
                }
                5 => {
                    let hi_addr = zp_pointer_high_addr(self.scratch.ptr);
                    self.scratch.addr_hi = bus.read(hi_addr);
                    Ok(false)
                }
                6 => {
                    let addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    let v = self.store_value(0);
                    bus.write(addr, v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            IndirectY => match cycle {
                2 => {
                    self.scratch.ptr = self.fetch_operand_byte(bus);
                    Ok(false)
                }
                3 => {
                    self.scratch.addr_lo = bus.read(self.scratch.ptr as u16);
                    Ok(false)
                }
                4 => {
                    let hi_addr = zp_pointer_high_addr(self.scratch.ptr);
                    self.scratch.addr_hi = bus.read(hi_addr);
                    self.scratch.base_addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                    Ok(false)
                }
                5 => {
                    let uncorrected = indexed_absolute_uncorrected(self.scratch.base_addr, self.state.y);
                    let _ = bus.read(uncorrected);
                    let (addr, crossed) = indexed_absolute(self.scratch.base_addr, self.state.y);
                    self.scratch.effective_addr = addr;
                    self.scratch.page_crossed = crossed;
                    Ok(false)
                }
                6 => {
                    let hi = (self.scratch.effective_addr >> 8) as u8;
                    let v = self.store_value(hi);
                    let addr = self.unstable_write_addr(v);
                    bus.write(addr, v);
                    Ok(true)
                }
                _ => Err(self.illegal_cycle(cycle)),
            },
            _ => unreachable!("not a Write-class addressing mode"),
        }
    }

    /// SHA/SHX/SHY/TAS: on a page-crossing indexed store, the stored byte
    /// clobbers the high byte of the address actually driven on the bus
    /// (the unstable opcodes' address/data bus conflict). Every other
    /// Write-class mnemonic, and any non-crossing access, writes to the
    /// already-resolved effective address unchanged.
    fn unstable_write_addr(&self, stored: u8) -> u16 {
        let is_high_byte_and_family = matches!(
            self.info.mnemonic,
            Mnemonic::Sha | Mnemonic::Shx | Mnemonic::Shy | Mnemonic::Tas
        );
        if is_high_byte_and_family && self.scratch.page_crossed {
            (self.scratch.effective_addr & 0x00FF) | ((stored as u16) << 8)
        } else {
            self.scratch.effective_addr
        }
    }

    // ---------------------------------------------------------------
    // Branch (relative).
    // ---------------------------------------------------------------
    fn dispatch_branch(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                let raw = bus.read(self.state.pc);
                self.state.pc = self.state.pc.wrapping_add(1);
                self.scratch.branch_offset = raw as i8;
                if branch::taken(&self.state, self.info.mnemonic) {
                    let (target, crossed) = relative_target(self.state.pc, self.scratch.branch_offset);
                    self.scratch.effective_addr = target;
                    self.scratch.page_crossed = crossed;
                    Ok(false)
                } else {
                    Ok(true)
                }
            }
            3 => {
                // Dummy read at the not-yet-corrected page; low byte takes effect now.
                let uncorrected = (self.state.pc & 0xFF00) | (self.scratch.effective_addr & 0x00FF);
                let _ = bus.read(uncorrected);
                self.state.pc = uncorrected;
                if self.scratch.page_crossed {
                    Ok(false)
                } else {
                    self.state.pc = self.scratch.effective_addr;
                    Ok(true)
                }
            }
            4 if self.scratch.page_crossed => {
                let _ = bus.read(self.state.pc);
                self.state.pc = self.scratch.effective_addr;
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    // ---------------------------------------------------------------
    // JMP absolute / indirect.
    // ---------------------------------------------------------------
    fn dispatch_jmp_absolute(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                self.scratch.addr_lo = self.fetch_operand_byte(bus);
                Ok(false)
            }
            3 => {
                self.scratch.addr_hi = self.fetch_operand_byte(bus);
                self.state.pc = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    fn dispatch_jmp_indirect(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                self.scratch.addr_lo = self.fetch_operand_byte(bus);
                Ok(false)
            }
            3 => {
                self.scratch.addr_hi = self.fetch_operand_byte(bus);
                self.scratch.base_addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                Ok(false)
            }
            4 => {
                self.scratch.addr_lo = bus.read(self.scratch.base_addr);
                Ok(false)
            }
            5 => {
                let hi_addr = indirect_jmp_bug_high_addr(self.scratch.base_addr);
                self.scratch.addr_hi = bus.read(hi_addr);
                self.state.pc = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    // ---------------------------------------------------------------
    // JSR / RTS / RTI / BRK.
    // ---------------------------------------------------------------
    fn dispatch_jsr(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                self.scratch.addr_lo = self.fetch_operand_byte(bus);
                Ok(false)
            }
            3 => {
                // Internal delay cycle: a dummy read of the current stack slot.
                let _ = bus.read(0x0100 | self.state.sp as u16);
                self.scratch.return_addr = self.state.pc;
                Ok(false)
            }
            4 => {
                let hi = (self.scratch.return_addr >> 8) as u8;
                self.push(bus, hi);
                Ok(false)
            }
            5 => {
                let lo = self.scratch.return_addr as u8;
                self.push(bus, lo);
                Ok(false)
            }
            6 => {
                self.scratch.addr_hi = self.fetch_operand_byte(bus);
                self.state.pc = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    fn dispatch_rts(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                let _ = bus.read(self.state.pc);
                Ok(false)
            }
            3 => {
                let _ = bus.read(0x0100 | self.state.sp as u16);
                Ok(false)
            }
            4 => {
                self.scratch.addr_lo = self.pull(bus);
                Ok(false)
            }
            5 => {
                self.scratch.addr_hi = self.pull(bus);
                Ok(false)
            }
            6 => {
                let return_addr = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                let _ = bus.read(return_addr);
                self.state.pc = return_addr.wrapping_add(1);
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    fn dispatch_rti(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                let _ = bus.read(self.state.pc);
                Ok(false)
            }
            3 => {
                let _ = bus.read(0x0100 | self.state.sp as u16);
                Ok(false)
            }
            4 => {
                let v = self.pull(bus);
                control_flow::rti_restore_status(&mut self.state, v);
                Ok(false)
            }
            5 => {
                self.scratch.addr_lo = self.pull(bus);
                Ok(false)
            }
            6 => {
                self.scratch.addr_hi = self.pull(bus);
                self.state.pc = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    fn dispatch_brk(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                let _ = bus.read(self.state.pc);
                self.state.pc = self.state.pc.wrapping_add(1);
                Ok(false)
            }
            3 => {
                let hi = (self.state.pc >> 8) as u8;
                self.push(bus, hi);
                Ok(false)
            }
            4 => {
                let lo = self.state.pc as u8;
                self.push(bus, lo);
                Ok(false)
            }
            5 => {
                let v = control_flow::brk_push_status(&self.state);
                self.push(bus, v);
                Ok(false)
            }
            6 => {
                self.scratch.addr_lo = bus.read(0xFFFE);
                Ok(false)
            }
            7 => {
                self.scratch.addr_hi = bus.read(0xFFFF);
                self.state.pc = word_from_bytes(self.scratch.addr_lo, self.scratch.addr_hi);
                control_flow::brk_set_irq_disable(&mut self.state);
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    // ---------------------------------------------------------------
    // PHA/PHP/PLA/PLP.
    // ---------------------------------------------------------------
    fn dispatch_push(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                let _ = bus.read(self.state.pc);
                Ok(false)
            }
            3 => {
                let v = match self.info.mnemonic {
                    Mnemonic::Pha => stack::pha(&self.state),
                    Mnemonic::Php => stack::php(&self.state),
                    _ => unreachable!(),
                };
                self.push(bus, v);
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    fn dispatch_pull(&mut self, bus: &mut impl Bus, cycle: u8) -> Result<bool, CpuFault> {
        match cycle {
            2 => {
                let _ = bus.read(self.state.pc);
                Ok(false)
            }
            3 => {
                let _ = bus.read(0x0100 | self.state.sp as u16);
                Ok(false)
            }
            4 => {
                let v = self.pull(bus);
                match self.info.mnemonic {
                    Mnemonic::Pla => stack::pla(&mut self.state, v),
                    Mnemonic::Plp => stack::plp(&mut self.state, v),
                    _ => unreachable!(),
                }
                Ok(true)
            }
            _ => Err(self.illegal_cycle(cycle)),
        }
    }

    // ---------------------------------------------------------------
    // Shared small helpers.
    // ---------------------------------------------------------------
    fn fetch_operand_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let v = bus.read(self.state.pc);
        self.state.pc = self.state.pc.wrapping_add(1);
        v
    }

    fn push(&mut self, bus: &mut impl Bus, v: u8) {
        bus.write(0x0100 | self.state.sp as u16, v);
        self.state.sp = self.state.sp.wrapping_sub(1);
    }

    fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.state.sp = self.state.sp.wrapping_add(1);
        bus.read(0x0100 | self.state.sp as u16)
    }

    fn index_for(&self, mode: AddressingMode) -> u8 {
        match mode {
            AddressingMode::ZeroPageX | AddressingMode::AbsoluteX => self.state.x,
            AddressingMode::ZeroPageY | AddressingMode::AbsoluteY => self.state.y,
            _ => unreachable!("mode has no index register"),
        }
    }

    /// Value to write for a `Write`-class mnemonic. `addr_hi` is the high
    /// byte of the effective address, needed only by the unstable
    /// high-byte-AND family (SHA/SHX/SHY/TAS); other mnemonics ignore it.
    fn store_value(&mut self, addr_hi: u8) -> u8 {
        match self.info.mnemonic {
            Mnemonic::Sta => load_store::sta(&self.state),
            Mnemonic::Stx => load_store::stx(&self.state),
            Mnemonic::Sty => load_store::sty(&self.state),
            Mnemonic::Sax => load_store::sax(&self.state),
            Mnemonic::Sha => illegal::sha(&self.state, addr_hi),
            Mnemonic::Shx => illegal::shx(&self.state, addr_hi),
            Mnemonic::Shy => illegal::shy(&self.state, addr_hi),
            Mnemonic::Tas => illegal::tas(&mut self.state, addr_hi),
            other => unreachable!("not a Write-class mnemonic: {other:?}"),
        }
    }

    /// Apply semantics for a `Read`-class instruction whose operand is an
    /// already-fetched memory or immediate byte.
    fn apply_value_semantics(&mut self, v: u8) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Lda => load_store::lda(&mut self.state, v),
            Ldx => load_store::ldx(&mut self.state, v),
            Ldy => load_store::ldy(&mut self.state, v),
            Lax => load_store::lax(&mut self.state, v),
            And => logical::and(&mut self.state, v),
            Ora => logical::ora(&mut self.state, v),
            Eor => logical::eor(&mut self.state, v),
            Bit => logical::bit(&mut self.state, v),
            Adc => arithmetic::adc(&mut self.state, v),
            Sbc => arithmetic::sbc(&mut self.state, v),
            Cmp => arithmetic::cmp(&mut self.state, v),
            Cpx => arithmetic::cpx(&mut self.state, v),
            Cpy => arithmetic::cpy(&mut self.state, v),
            Anc => illegal::anc(&mut self.state, v),
            Alr => illegal::alr(&mut self.state, v),
            Arr => illegal::arr(&mut self.state, v),
            Sbx => illegal::sbx(&mut self.state, v),
            Ane => illegal::ane(&mut self.state, v),
            Lxa => illegal::lxa(&mut self.state, v),
            Las => illegal::las(&mut self.state, v),
            Nop => {}
            other => unreachable!("not a value-consuming Read mnemonic: {other:?}"),
        }
    }

    /// Apply semantics for the 2-cycle implied/accumulator `Read`
    /// instructions: register transfers, inc/dec, accumulator
    /// shift/rotate, flag ops, and implied NOP.
    fn apply_register_semantics(&mut self) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Tax => load_store::tax(&mut self.state),
            Tay => load_store::tay(&mut self.state),
            Txa => load_store::txa(&mut self.state),
            Tya => load_store::tya(&mut self.state),
            Tsx => load_store::tsx(&mut self.state),
            Txs => load_store::txs(&mut self.state),
            Inx => load_store::inx(&mut self.state),
            Iny => load_store::iny(&mut self.state),
            Dex => load_store::dex(&mut self.state),
            Dey => load_store::dey(&mut self.state),
            Asl => shift::asl_acc(&mut self.state),
            Lsr => shift::lsr_acc(&mut self.state),
            Rol => shift::rol_acc(&mut self.state),
            Ror => shift::ror_acc(&mut self.state),
            Clc | Sec | Cli | Sei | Clv | Cld | Sed => flags::apply(&mut self.state, self.info.mnemonic),
            Nop => {}
            other => unreachable!("not an implied/accumulator Read mnemonic: {other:?}"),
        }
    }

    /// Apply semantics for an `Rmw`-class instruction, returning the new
    /// memory value to write back.
    fn apply_rmw_semantics(&mut self, old: u8) -> u8 {
        use Mnemonic::*;
        match self.info.mnemonic {
            Asl => {
                let (result, carry) = shift::asl(old);
                self.state.assign_flag(crate::cpu::state::CARRY, carry);
                self.state.update_zn(result);
                result
            }
            Lsr => {
                let (result, carry) = shift::lsr(old);
                self.state.assign_flag(crate::cpu::state::CARRY, carry);
                self.state.update_zn(result);
                result
            }
            Rol => {
                let carry_in = self.state.is_flag_set(crate::cpu::state::CARRY);
                let (result, carry) = shift::rol(old, carry_in);
                self.state.assign_flag(crate::cpu::state::CARRY, carry);
                self.state.update_zn(result);
                result
            }
            Ror => {
                let carry_in = self.state.is_flag_set(crate::cpu::state::CARRY);
                let (result, carry) = shift::ror(old, carry_in);
                self.state.assign_flag(crate::cpu::state::CARRY, carry);
                self.state.update_zn(result);
                result
            }
            Inc => {
                let result = old.wrapping_add(1);
                self.state.update_zn(result);
                result
            }
            Dec => {
                let result = old.wrapping_sub(1);
                self.state.update_zn(result);
                result
            }
            Slo => illegal::slo(&mut self.state, old),
            Rla => illegal::rla(&mut self.state, old),
            Sre => illegal::sre(&mut self.state, old),
            Rra => illegal::rra(&mut self.state, old),
            Dcp => illegal::dcp(&mut self.state, old),
            Isc => illegal::isc(&mut self.state, old),
            other => unreachable!("not an Rmw-class mnemonic: {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatMemory;

    fn run_program(prg: &[u8], ticks: usize) -> (Cpu, FlatMemory) {
        let mut mem = FlatMemory::new();
        mem.load_at(0x8000, prg);
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        let mut cpu = Cpu::new();
        cpu.reset(&mut mem);
        for _ in 0..ticks {
            cpu.tick(&mut mem).expect("tick should not fault");
        }
        (cpu, mem)
    }

    #[test]
    fn lda_immediate_takes_two_cycles() {
        let (cpu, _mem) = run_program(&[0xA9, 0x42], 2);
        assert_eq!(cpu.state.a, 0x42);
        assert_eq!(cpu.state.pc, 0x8002);
    }

    #[test]
    fn lda_absolute_x_with_page_cross_takes_five_cycles() {
        let mut mem = FlatMemory::new();
        // LDA $80F5,X
        mem.load_at(0x8000, &[0xBD, 0xF5, 0x80]);
        mem.write(0x8105, 0x99);
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        let mut cpu = Cpu::new();
        cpu.reset(&mut mem);
        cpu.state.x = 0x10;
        for _ in 0..5 {
            cpu.tick(&mut mem).unwrap();
        }
        assert_eq!(cpu.state.a, 0x99);
        assert_eq!(cpu.state.pc, 0x8003);
    }

    #[test]
    fn shx_on_page_cross_corrupts_the_write_address_high_byte() {
        let mut mem = FlatMemory::new();
        // SHX $30FF,Y
        mem.load_at(0x8000, &[0x9E, 0xFF, 0x30]);
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        let mut cpu = Cpu::new();
        cpu.reset(&mut mem);
        cpu.state.x = 0xFF;
        cpu.state.y = 0x01; // 0x30FF + 1 = 0x3100: crosses into the next page
        for _ in 0..5 {
            cpu.tick(&mut mem).unwrap();
        }
        // Stored value is X & (effective high byte + 1) = 0xFF & 0x32 = 0x32;
        // on the page-crossing store, that value clobbers the high byte of
        // the address actually written, landing at 0x3200 rather than 0x3100.
        assert_eq!(mem.read(0x3200), 0x32);
        assert_eq!(mem.read(0x3100), 0x00);
    }

    #[test]
    fn jsr_then_rts_round_trips_pc() {
        let mut mem = FlatMemory::new();
        mem.load_at(0x8000, &[0x20, 0x00, 0x90]); // JSR $9000
        mem.load_at(0x9000, &[0x60]); // RTS
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        let mut cpu = Cpu::new();
        cpu.reset(&mut mem);
        for _ in 0..6 {
            cpu.tick(&mut mem).unwrap();
        }
        assert_eq!(cpu.state.pc, 0x9000);
        for _ in 0..6 {
            cpu.tick(&mut mem).unwrap();
        }
        assert_eq!(cpu.state.pc, 0x8003);
    }

    #[test]
    fn jam_opcode_faults_without_advancing_pc() {
        let (mut cpu, mut mem) = run_program(&[], 0);
        mem.write(0x8000, 0x02);
        let err = cpu.tick(&mut mem).unwrap_err();
        assert_eq!(
            err,
            CpuFault::Jam {
                opcode: 0x02,
                pc: 0x8000
            }
        );
        assert_eq!(cpu.state.pc, 0x8000);
    }

    #[test]
    fn branch_not_taken_is_two_cycles() {
        let mut mem = FlatMemory::new();
        mem.load_at(0x8000, &[0xF0, 0x10]); // BEQ +16, Z clear
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        let mut cpu = Cpu::new();
        cpu.reset(&mut mem);
        cpu.tick(&mut mem).unwrap();
        cpu.tick(&mut mem).unwrap();
        assert_eq!(cpu.state.pc, 0x8002);
    }

    #[test]
    fn pha_then_pla_round_trips_accumulator() {
        let mut mem = FlatMemory::new();
        mem.load_at(0x8000, &[0xA9, 0x55, 0x48, 0xA9, 0x00, 0x68]);
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        let mut cpu = Cpu::new();
        cpu.reset(&mut mem);
        for _ in 0..(2 + 3 + 2 + 4) {
            cpu.tick(&mut mem).unwrap();
        }
        assert_eq!(cpu.state.a, 0x55);
    }
}
