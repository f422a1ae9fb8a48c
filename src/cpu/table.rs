/*!
table.rs - Static opcode metadata: the 256-entry decode table.

Overview
========
`decode(opcode)` is the only entry point. It maps a fetched opcode byte to
its `Mnemonic`, `AddressingMode`, and `AccessClass` — everything the
per-cycle dispatcher needs to pick a cycle sequence, and everything the
semantics layer needs to pick a behavior. Cycle counts are never stored
here: they're a structural function of `(mode, class)` that `tick.rs`
walks directly, one cycle at a time, including the fixed extra cycle on
indexed-RMW and indexed-write forms that never gets a page-cross shortcut.

This table covers the full NMOS 6502 opcode space, not just the documented
subset: every illegal/undocumented opcode decodes to a real `Mnemonic` and
is dispatched by the semantics layer exactly like a documented one. Nothing
here falls through to a fault; only a sequencer reaching a cycle number it
has no state for does that.
*/

/// How an opcode's operand is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

/// Which cycle-sequence shape an opcode follows. `Read`/`Rmw`/`Write` are
/// parameterized by `AddressingMode`; the rest are one fixed shape each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    Read,
    Rmw,
    Write,
    Branch,
    JumpAbsolute,
    JumpIndirect,
    Jsr,
    Rts,
    Rti,
    Brk,
    Push,
    Pull,
    /// Halt-on-fetch (the 12 documented JAM opcodes).
    Jam,
}

/// A decoded mnemonic. Several opcodes map to the same mnemonic under
/// different addressing modes; illegal mnemonics are real targets, not a
/// side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Lda, Ldx, Ldy, Sta, Stx, Sty,
    Tax, Tay, Txa, Tya, Tsx, Txs,
    Pha, Php, Pla, Plp,
    And, Ora, Eor, Adc, Sbc, Cmp, Cpx, Cpy, Bit,
    Inc, Dec, Inx, Iny, Dex, Dey,
    Asl, Lsr, Rol, Ror,
    Jmp, Jsr, Rts, Rti, Brk,
    Bpl, Bmi, Bvc, Bvs, Bcc, Bcs, Bne, Beq,
    Clc, Sec, Cli, Sei, Clv, Cld, Sed,
    Nop,
    // Illegal / undocumented.
    Slo, Rla, Sre, Rra, Sax, Lax, Dcp, Isc,
    Anc, Alr, Arr, Sbx, Ane, Lxa, Sha, Shx, Shy, Tas, Las,
    Jam,
}

/// Decoded shape of an opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub class: AccessClass,
    pub illegal: bool,
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode, class: AccessClass, illegal: bool) -> OpcodeInfo {
    OpcodeInfo { mnemonic, mode, class, illegal }
}

use AccessClass::*;
use AddressingMode::*;
use Mnemonic::*;

/// Decode a fetched opcode byte into its mnemonic/mode/class.
pub fn decode(opcode: u8) -> OpcodeInfo {
    match opcode {
        // ---- BRK / JSR / RTI / RTS -----------------------------------
        0x00 => op(Brk, Implied, Brk, false),
        0x20 => op(Jsr, Absolute, Jsr, false),
        0x40 => op(Rti, Implied, Rti, false),
        0x60 => op(Rts, Implied, Rts, false),

        // ---- JMP --------------------------------------------------------
        0x4C => op(Jmp, Absolute, JumpAbsolute, false),
        0x6C => op(Jmp, Indirect, JumpIndirect, false),

        // ---- Branches (relative) -----------------------------------------
        0x10 => op(Bpl, Relative, Branch, false),
        0x30 => op(Bmi, Relative, Branch, false),
        0x50 => op(Bvc, Relative, Branch, false),
        0x70 => op(Bvs, Relative, Branch, false),
        0x90 => op(Bcc, Relative, Branch, false),
        0xB0 => op(Bcs, Relative, Branch, false),
        0xD0 => op(Bne, Relative, Branch, false),
        0xF0 => op(Beq, Relative, Branch, false),

        // ---- Stack ops -----------------------------------------------
        0x48 => op(Pha, Implied, Push, false),
        0x08 => op(Php, Implied, Push, false),
        0x68 => op(Pla, Implied, Pull, false),
        0x28 => op(Plp, Implied, Pull, false),

        // ---- Register transfers / implied single-cycle ops --------------
        0xAA => op(Tax, Implied, Read, false),
        0xA8 => op(Tay, Implied, Read, false),
        0x8A => op(Txa, Implied, Read, false),
        0x98 => op(Tya, Implied, Read, false),
        0xBA => op(Tsx, Implied, Read, false),
        0x9A => op(Txs, Implied, Read, false),
        0xE8 => op(Inx, Implied, Read, false),
        0xC8 => op(Iny, Implied, Read, false),
        0xCA => op(Dex, Implied, Read, false),
        0x88 => op(Dey, Implied, Read, false),
        0x18 => op(Clc, Implied, Read, false),
        0x38 => op(Sec, Implied, Read, false),
        0x58 => op(Cli, Implied, Read, false),
        0x78 => op(Sei, Implied, Read, false),
        0xB8 => op(Clv, Implied, Read, false),
        0xD8 => op(Cld, Implied, Read, false),
        0xF8 => op(Sed, Implied, Read, false),
        0xEA => op(Nop, Implied, Read, false),

        // ---- LDA ----------------------------------------------------------
        0xA9 => op(Lda, Immediate, Read, false),
        0xA5 => op(Lda, ZeroPage, Read, false),
        0xB5 => op(Lda, ZeroPageX, Read, false),
        0xAD => op(Lda, Absolute, Read, false),
        0xBD => op(Lda, AbsoluteX, Read, false),
        0xB9 => op(Lda, AbsoluteY, Read, false),
        0xA1 => op(Lda, IndirectX, Read, false),
        0xB1 => op(Lda, IndirectY, Read, false),

        // ---- LDX ----------------------------------------------------------
        0xA2 => op(Ldx, Immediate, Read, false),
        0xA6 => op(Ldx, ZeroPage, Read, false),
        0xB6 => op(Ldx, ZeroPageY, Read, false),
        0xAE => op(Ldx, Absolute, Read, false),
        0xBE => op(Ldx, AbsoluteY, Read, false),

        // ---- LDY ----------------------------------------------------------
        0xA0 => op(Ldy, Immediate, Read, false),
        0xA4 => op(Ldy, ZeroPage, Read, false),
        0xB4 => op(Ldy, ZeroPageX, Read, false),
        0xAC => op(Ldy, Absolute, Read, false),
        0xBC => op(Ldy, AbsoluteX, Read, false),

        // ---- STA ----------------------------------------------------------
        0x85 => op(Sta, ZeroPage, Write, false),
        0x95 => op(Sta, ZeroPageX, Write, false),
        0x8D => op(Sta, Absolute, Write, false),
        0x9D => op(Sta, AbsoluteX, Write, false),
        0x99 => op(Sta, AbsoluteY, Write, false),
        0x81 => op(Sta, IndirectX, Write, false),
        0x91 => op(Sta, IndirectY, Write, false),

        // ---- STX / STY ------------------------------------------------
        0x86 => op(Stx, ZeroPage, Write, false),
        0x96 => op(Stx, ZeroPageY, Write, false),
        0x8E => op(Stx, Absolute, Write, false),
        0x84 => op(Sty, ZeroPage, Write, false),
        0x94 => op(Sty, ZeroPageX, Write, false),
        0x8C => op(Sty, Absolute, Write, false),

        // ---- AND ------------------------------------------------------
        0x29 => op(And, Immediate, Read, false),
        0x25 => op(And, ZeroPage, Read, false),
        0x35 => op(And, ZeroPageX, Read, false),
        0x2D => op(And, Absolute, Read, false),
        0x3D => op(And, AbsoluteX, Read, false),
        0x39 => op(And, AbsoluteY, Read, false),
        0x21 => op(And, IndirectX, Read, false),
        0x31 => op(And, IndirectY, Read, false),

        // ---- ORA ------------------------------------------------------
        0x09 => op(Ora, Immediate, Read, false),
        0x05 => op(Ora, ZeroPage, Read, false),
        0x15 => op(Ora, ZeroPageX, Read, false),
        0x0D => op(Ora, Absolute, Read, false),
        0x1D => op(Ora, AbsoluteX, Read, false),
        0x19 => op(Ora, AbsoluteY, Read, false),
        0x01 => op(Ora, IndirectX, Read, false),
        0x11 => op(Ora, IndirectY, Read, false),

        // ---- EOR ------------------------------------------------------
        0x49 => op(Eor, Immediate, Read, false),
        0x45 => op(Eor, ZeroPage, Read, false),
        0x55 => op(Eor, ZeroPageX, Read, false),
        0x4D => op(Eor, Absolute, Read, false),
        0x5D => op(Eor, AbsoluteX, Read, false),
        0x59 => op(Eor, AbsoluteY, Read, false),
        0x41 => op(Eor, IndirectX, Read, false),
        0x51 => op(Eor, IndirectY, Read, false),

        // ---- ADC ------------------------------------------------------
        0x69 => op(Adc, Immediate, Read, false),
        0x65 => op(Adc, ZeroPage, Read, false),
        0x75 => op(Adc, ZeroPageX, Read, false),
        0x6D => op(Adc, Absolute, Read, false),
        0x7D => op(Adc, AbsoluteX, Read, false),
        0x79 => op(Adc, AbsoluteY, Read, false),
        0x61 => op(Adc, IndirectX, Read, false),
        0x71 => op(Adc, IndirectY, Read, false),

        // ---- SBC (+ illegal duplicate 0xEB) ----------------------------
        0xE9 => op(Sbc, Immediate, Read, false),
        0xEB => op(Sbc, Immediate, Read, true),
        0xE5 => op(Sbc, ZeroPage, Read, false),
        0xF5 => op(Sbc, ZeroPageX, Read, false),
        0xED => op(Sbc, Absolute, Read, false),
        0xFD => op(Sbc, AbsoluteX, Read, false),
        0xF9 => op(Sbc, AbsoluteY, Read, false),
        0xE1 => op(Sbc, IndirectX, Read, false),
        0xF1 => op(Sbc, IndirectY, Read, false),

        // ---- CMP --------------------------------------------------------
        0xC9 => op(Cmp, Immediate, Read, false),
        0xC5 => op(Cmp, ZeroPage, Read, false),
        0xD5 => op(Cmp, ZeroPageX, Read, false),
        0xCD => op(Cmp, Absolute, Read, false),
        0xDD => op(Cmp, AbsoluteX, Read, false),
        0xD9 => op(Cmp, AbsoluteY, Read, false),
        0xC1 => op(Cmp, IndirectX, Read, false),
        0xD1 => op(Cmp, IndirectY, Read, false),

        // ---- CPX / CPY --------------------------------------------------
        0xE0 => op(Cpx, Immediate, Read, false),
        0xE4 => op(Cpx, ZeroPage, Read, false),
        0xEC => op(Cpx, Absolute, Read, false),
        0xC0 => op(Cpy, Immediate, Read, false),
        0xC4 => op(Cpy, ZeroPage, Read, false),
        0xCC => op(Cpy, Absolute, Read, false),

        // ---- BIT ----------------------------------------------------------
        0x24 => op(Bit, ZeroPage, Read, false),
        0x2C => op(Bit, Absolute, Read, false),

        // ---- INC / DEC (memory RMW) -------------------------------------
        0xE6 => op(Inc, ZeroPage, Rmw, false),
        0xF6 => op(Inc, ZeroPageX, Rmw, false),
        0xEE => op(Inc, Absolute, Rmw, false),
        0xFE => op(Inc, AbsoluteX, Rmw, false),
        0xC6 => op(Dec, ZeroPage, Rmw, false),
        0xD6 => op(Dec, ZeroPageX, Rmw, false),
        0xCE => op(Dec, Absolute, Rmw, false),
        0xDE => op(Dec, AbsoluteX, Rmw, false),

        // ---- ASL / LSR / ROL / ROR ----------------------------------------
        0x0A => op(Asl, Accumulator, Read, false),
        0x06 => op(Asl, ZeroPage, Rmw, false),
        0x16 => op(Asl, ZeroPageX, Rmw, false),
        0x0E => op(Asl, Absolute, Rmw, false),
        0x1E => op(Asl, AbsoluteX, Rmw, false),
        0x4A => op(Lsr, Accumulator, Read, false),
        0x46 => op(Lsr, ZeroPage, Rmw, false),
        0x56 => op(Lsr, ZeroPageX, Rmw, false),
        0x4E => op(Lsr, Absolute, Rmw, false),
        0x5E => op(Lsr, AbsoluteX, Rmw, false),
        0x2A => op(Rol, Accumulator, Read, false),
        0x26 => op(Rol, ZeroPage, Rmw, false),
        0x36 => op(Rol, ZeroPageX, Rmw, false),
        0x2E => op(Rol, Absolute, Rmw, false),
        0x3E => op(Rol, AbsoluteX, Rmw, false),
        0x6A => op(Ror, Accumulator, Read, false),
        0x66 => op(Ror, ZeroPage, Rmw, false),
        0x76 => op(Ror, ZeroPageX, Rmw, false),
        0x6E => op(Ror, Absolute, Rmw, false),
        0x7E => op(Ror, AbsoluteX, Rmw, false),

        // ---- Illegal RMW combos: SLO/RLA/SRE/RRA/DCP/ISC -----------------
        0x07 => op(Slo, ZeroPage, Rmw, true),
        0x17 => op(Slo, ZeroPageX, Rmw, true),
        0x0F => op(Slo, Absolute, Rmw, true),
        0x1F => op(Slo, AbsoluteX, Rmw, true),
        0x1B => op(Slo, AbsoluteY, Rmw, true),
        0x03 => op(Slo, IndirectX, Rmw, true),
        0x13 => op(Slo, IndirectY, Rmw, true),

        0x27 => op(Rla, ZeroPage, Rmw, true),
        0x37 => op(Rla, ZeroPageX, Rmw, true),
        0x2F => op(Rla, Absolute, Rmw, true),
        0x3F => op(Rla, AbsoluteX, Rmw, true),
        0x3B => op(Rla, AbsoluteY, Rmw, true),
        0x23 => op(Rla, IndirectX, Rmw, true),
        0x33 => op(Rla, IndirectY, Rmw, true),

        0x47 => op(Sre, ZeroPage, Rmw, true),
        0x57 => op(Sre, ZeroPageX, Rmw, true),
        0x4F => op(Sre, Absolute, Rmw, true),
        0x5F => op(Sre, AbsoluteX, Rmw, true),
        0x5B => op(Sre, AbsoluteY, Rmw, true),
        0x43 => op(Sre, IndirectX, Rmw, true),
        0x53 => op(Sre, IndirectY, Rmw, true),

        0x67 => op(Rra, ZeroPage, Rmw, true),
        0x77 => op(Rra, ZeroPageX, Rmw, true),
        0x6F => op(Rra, Absolute, Rmw, true),
        0x7F => op(Rra, AbsoluteX, Rmw, true),
        0x7B => op(Rra, AbsoluteY, Rmw, true),
        0x63 => op(Rra, IndirectX, Rmw, true),
        0x73 => op(Rra, IndirectY, Rmw, true),

        0xC7 => op(Dcp, ZeroPage, Rmw, true),
        0xD7 => op(Dcp, ZeroPageX, Rmw, true),
        0xCF => op(Dcp, Absolute, Rmw, true),
        0xDF => op(Dcp, AbsoluteX, Rmw, true),
        0xDB => op(Dcp, AbsoluteY, Rmw, true),
        0xC3 => op(Dcp, IndirectX, Rmw, true),
        0xD3 => op(Dcp, IndirectY, Rmw, true),

        0xE7 => op(Isc, ZeroPage, Rmw, true),
        0xF7 => op(Isc, ZeroPageX, Rmw, true),
        0xEF => op(Isc, Absolute, Rmw, true),
        0xFF => op(Isc, AbsoluteX, Rmw, true),
        0xFB => op(Isc, AbsoluteY, Rmw, true),
        0xE3 => op(Isc, IndirectX, Rmw, true),
        0xF3 => op(Isc, IndirectY, Rmw, true),

        // ---- SAX / LAX --------------------------------------------------
        0x87 => op(Sax, ZeroPage, Write, true),
        0x97 => op(Sax, ZeroPageY, Write, true),
        0x8F => op(Sax, Absolute, Write, true),
        0x83 => op(Sax, IndirectX, Write, true),

        0xA7 => op(Lax, ZeroPage, Read, true),
        0xB7 => op(Lax, ZeroPageY, Read, true),
        0xAF => op(Lax, Absolute, Read, true),
        0xBF => op(Lax, AbsoluteY, Read, true),
        0xA3 => op(Lax, IndirectX, Read, true),
        0xB3 => op(Lax, IndirectY, Read, true),

        // ---- Immediate illegal combos ------------------------------------
        0x0B => op(Anc, Immediate, Read, true),
        0x2B => op(Anc, Immediate, Read, true),
        0x4B => op(Alr, Immediate, Read, true),
        0x6B => op(Arr, Immediate, Read, true),
        0xCB => op(Sbx, Immediate, Read, true),
        0x8B => op(Ane, Immediate, Read, true),
        0xAB => op(Lxa, Immediate, Read, true),

        // ---- Unstable "high-byte AND" family -----------------------------
        0x93 => op(Sha, IndirectY, Write, true),
        0x9F => op(Sha, AbsoluteY, Write, true),
        0x9E => op(Shx, AbsoluteY, Write, true),
        0x9C => op(Shy, AbsoluteX, Write, true),
        0x9B => op(Tas, AbsoluteY, Write, true),
        0xBB => op(Las, AbsoluteY, Read, true),

        // ---- Illegal NOP family (implied, 2 cycles) ---------------------
        0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => op(Nop, Implied, Read, true),

        // ---- Illegal NOP family (immediate operand, DOP, 2 cycles) ------
        0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => op(Nop, Immediate, Read, true),

        // ---- Illegal NOP family (zero page, DOP, 3 cycles) --------------
        0x04 | 0x44 | 0x64 => op(Nop, ZeroPage, Read, true),

        // ---- Illegal NOP family (zero page,X, DOP, 4 cycles) ------------
        0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => op(Nop, ZeroPageX, Read, true),

        // ---- Illegal NOP family (absolute, TOP, 4 cycles) ---------------
        0x0C => op(Nop, Absolute, Read, true),

        // ---- Illegal NOP family (absolute,X, TOP, 4(+pc) cycles) --------
        0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => op(Nop, AbsoluteX, Read, true),

        // ---- JAM (halt) ---------------------------------------------------
        0x02 | 0x12 | 0x22 | 0x32 | 0x42 | 0x52 | 0x62 | 0x72 | 0x92 | 0xB2 | 0xD2 | 0xF2 => {
            op(Jam, Implied, Jam, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jam_opcodes_decode_to_jam_class() {
        for &opcode in &[
            0x02u8, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
        ] {
            let info = decode(opcode);
            assert_eq!(info.class, AccessClass::Jam, "opcode {opcode:#04x}");
            assert_eq!(info.mnemonic, Mnemonic::Jam);
        }
    }

    #[test]
    fn every_opcode_decodes_without_panicking() {
        for opcode in 0u8..=255 {
            let _ = decode(opcode);
        }
    }

    #[test]
    fn lda_immediate_is_read_class() {
        let info = decode(0xA9);
        assert_eq!(info.mnemonic, Mnemonic::Lda);
        assert_eq!(info.mode, AddressingMode::Immediate);
        assert_eq!(info.class, AccessClass::Read);
        assert!(!info.illegal);
    }

    #[test]
    fn sta_indirect_y_is_six_cycle_write() {
        let info = decode(0x91);
        assert_eq!(info.mnemonic, Mnemonic::Sta);
        assert_eq!(info.mode, AddressingMode::IndirectY);
        assert_eq!(info.class, AccessClass::Write);
    }

    #[test]
    fn illegal_opcodes_are_flagged() {
        assert!(decode(0xA3).illegal); // LAX (ind,X)
        assert!(!decode(0xA5).illegal); // LDA zp
    }
}
