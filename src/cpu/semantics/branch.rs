//! Branch condition evaluation (BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ).

use crate::cpu::state::{CARRY, CpuState, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::Mnemonic;

/// Evaluate whether a branch mnemonic's condition holds against the
/// current status flags.
pub(crate) fn taken(cpu: &CpuState, mnemonic: Mnemonic) -> bool {
    match mnemonic {
        Mnemonic::Bpl => !cpu.is_flag_set(NEGATIVE),
        Mnemonic::Bmi => cpu.is_flag_set(NEGATIVE),
        Mnemonic::Bvc => !cpu.is_flag_set(OVERFLOW),
        Mnemonic::Bvs => cpu.is_flag_set(OVERFLOW),
        Mnemonic::Bcc => !cpu.is_flag_set(CARRY),
        Mnemonic::Bcs => cpu.is_flag_set(CARRY),
        Mnemonic::Bne => !cpu.is_flag_set(ZERO),
        Mnemonic::Beq => cpu.is_flag_set(ZERO),
        other => unreachable!("not a branch instruction: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beq_follows_zero_flag() {
        let mut s = CpuState::new();
        assert!(!taken(&s, Mnemonic::Beq));
        s.set_flag_bit(ZERO);
        assert!(taken(&s, Mnemonic::Beq));
    }

    #[test]
    fn bcc_is_inverse_of_carry() {
        let mut s = CpuState::new();
        assert!(taken(&s, Mnemonic::Bcc));
        s.set_flag_bit(CARRY);
        assert!(!taken(&s, Mnemonic::Bcc));
    }
}
