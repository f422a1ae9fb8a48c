//! BRK/RTI status-byte handling. JMP/JSR/RTS have no register-flag side
//! effects beyond the program counter itself, which the sequencer sets
//! directly; there's nothing for this module to do for them.

use crate::cpu::state::CpuState;

/// Status byte BRK pushes: BREAK and UNUSED both forced set.
pub(crate) fn brk_push_status(cpu: &CpuState) -> u8 {
    cpu.status_for_push(true)
}

/// BRK (and a real hardware IRQ/NMI) sets the interrupt-disable flag after
/// pushing status, so a handler isn't itself interrupted by IRQ.
pub(crate) fn brk_set_irq_disable(cpu: &mut CpuState) {
    cpu.set_flag_bit(crate::cpu::state::IRQ_DISABLE);
}

/// RTI restores status exactly like PLP: no N/Z resynthesis, UNUSED/BREAK
/// discarded from the pulled byte.
pub(crate) fn rti_restore_status(cpu: &mut CpuState, pulled: u8) {
    cpu.load_status_from_pull(pulled);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::IRQ_DISABLE;

    #[test]
    fn brk_sets_irq_disable() {
        let mut s = CpuState::new();
        assert!(!s.is_flag_set(IRQ_DISABLE));
        brk_set_irq_disable(&mut s);
        assert!(s.is_flag_set(IRQ_DISABLE));
    }
}
