//! Single-flag instructions (CLC/SEC/CLI/SEI/CLD/SED/CLV).

use crate::cpu::state::{CARRY, CpuState, DECIMAL, IRQ_DISABLE, OVERFLOW};
use crate::cpu::table::Mnemonic;

/// Apply a flag-clear/set instruction. Flags are always driven
/// unconditionally to their target value; there is no "toggle" form on the
/// 6502.
pub(crate) fn apply(cpu: &mut CpuState, mnemonic: Mnemonic) {
    match mnemonic {
        Mnemonic::Clc => cpu.clear_flag_bit(CARRY),
        Mnemonic::Sec => cpu.set_flag_bit(CARRY),
        Mnemonic::Cli => cpu.clear_flag_bit(IRQ_DISABLE),
        Mnemonic::Sei => cpu.set_flag_bit(IRQ_DISABLE),
        Mnemonic::Cld => cpu.clear_flag_bit(DECIMAL),
        Mnemonic::Sed => cpu.set_flag_bit(DECIMAL),
        Mnemonic::Clv => cpu.clear_flag_bit(OVERFLOW),
        other => unreachable!("not a flag instruction: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clc_clears_unconditionally() {
        let mut s = CpuState::new();
        s.set_flag_bit(CARRY);
        apply(&mut s, Mnemonic::Clc);
        assert!(!s.is_flag_set(CARRY));
    }

    #[test]
    fn sed_sets_decimal() {
        let mut s = CpuState::new();
        apply(&mut s, Mnemonic::Sed);
        assert!(s.is_flag_set(DECIMAL));
    }
}
