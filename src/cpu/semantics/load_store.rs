//! Loads, stores, and register transfers.
//!
//! Stores (and the illegal `SAX`) return the byte to be written rather than
//! writing it themselves — the sequencer owns the actual bus write so it
//! can account for the write cycle uniformly across all `Write`-class
//! addressing modes.

use crate::cpu::state::CpuState;

pub(crate) fn lda(cpu: &mut CpuState, v: u8) {
    cpu.a = v;
    cpu.update_zn(v);
}

pub(crate) fn ldx(cpu: &mut CpuState, v: u8) {
    cpu.x = v;
    cpu.update_zn(v);
}

pub(crate) fn ldy(cpu: &mut CpuState, v: u8) {
    cpu.y = v;
    cpu.update_zn(v);
}

/// Illegal: load A and X from the same operand in one shot.
pub(crate) fn lax(cpu: &mut CpuState, v: u8) {
    cpu.a = v;
    cpu.x = v;
    cpu.update_zn(v);
}

pub(crate) fn sta(cpu: &CpuState) -> u8 {
    cpu.a
}

pub(crate) fn stx(cpu: &CpuState) -> u8 {
    cpu.x
}

pub(crate) fn sty(cpu: &CpuState) -> u8 {
    cpu.y
}

/// Illegal: store A & X.
pub(crate) fn sax(cpu: &CpuState) -> u8 {
    cpu.a & cpu.x
}

pub(crate) fn tax(cpu: &mut CpuState) {
    cpu.x = cpu.a;
    cpu.update_zn(cpu.x);
}

pub(crate) fn tay(cpu: &mut CpuState) {
    cpu.y = cpu.a;
    cpu.update_zn(cpu.y);
}

pub(crate) fn txa(cpu: &mut CpuState) {
    cpu.a = cpu.x;
    cpu.update_zn(cpu.a);
}

pub(crate) fn tya(cpu: &mut CpuState) {
    cpu.a = cpu.y;
    cpu.update_zn(cpu.a);
}

pub(crate) fn tsx(cpu: &mut CpuState) {
    cpu.x = cpu.sp;
    cpu.update_zn(cpu.x);
}

/// TXS does not touch N/Z — the stack pointer isn't flag-observed.
pub(crate) fn txs(cpu: &mut CpuState) {
    cpu.sp = cpu.x;
}

pub(crate) fn inx(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.update_zn(cpu.x);
}

pub(crate) fn iny(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.update_zn(cpu.y);
}

pub(crate) fn dex(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.update_zn(cpu.x);
}

pub(crate) fn dey(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.update_zn(cpu.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lda_sets_zero_and_negative() {
        let mut s = CpuState::new();
        lda(&mut s, 0x00);
        assert!(s.is_flag_set(crate::cpu::state::ZERO));
        lda(&mut s, 0x80);
        assert!(s.is_flag_set(crate::cpu::state::NEGATIVE));
    }

    #[test]
    fn txs_does_not_touch_flags() {
        let mut s = CpuState::new();
        s.set_flag_bit(crate::cpu::state::ZERO);
        s.x = 0x00;
        txs(&mut s);
        assert_eq!(s.sp, 0x00);
        assert!(s.is_flag_set(crate::cpu::state::ZERO));
    }

    #[test]
    fn lax_loads_both_registers() {
        let mut s = CpuState::new();
        lax(&mut s, 0x42);
        assert_eq!(s.a, 0x42);
        assert_eq!(s.x, 0x42);
    }

    #[test]
    fn sax_is_a_and_x() {
        let mut s = CpuState::new();
        s.a = 0b1100;
        s.x = 0b1010;
        assert_eq!(sax(&s), 0b1000);
    }
}
