use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::cycles::INTERRUPT_DISPATCH_CYCLES;

// Interrupt vectors (gbdev.io/pandocs/Interrupts.html)
const INTERRUPT_VBLANK: u16 = 0x40;
const INTERRUPT_STAT: u16 = 0x48;
const INTERRUPT_TIMER: u16 = 0x50;
const INTERRUPT_SERIAL: u16 = 0x58;
const INTERRUPT_JOYPAD: u16 = 0x60;

/// Interrupt lines in priority order (lowest bit wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Bit in IE/IF.
    pub const fn bit(self) -> u8 {
        match self {
            Interrupt::VBlank => 0x01,
            Interrupt::LcdStat => 0x02,
            Interrupt::Timer => 0x04,
            Interrupt::Serial => 0x08,
            Interrupt::Joypad => 0x10,
        }
    }

    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::VBlank => INTERRUPT_VBLANK,
            Interrupt::LcdStat => INTERRUPT_STAT,
            Interrupt::Timer => INTERRUPT_TIMER,
            Interrupt::Serial => INTERRUPT_SERIAL,
            Interrupt::Joypad => INTERRUPT_JOYPAD,
        }
    }

    pub fn highest_priority(pending: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|irq| pending & irq.bit() != 0)
    }
}

/// Coarse execution state of the CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// HALT, or STOP on DMG. Fetch resumes once an enabled interrupt is
    /// requested.
    Halted,
    /// STOP on CGB without an armed speed switch.
    StoppedAwaitingSpeedSwitch,
}

impl Cpu {
    pub fn run_state(&self) -> RunState {
        if !self.halted {
            RunState::Running
        } else if self.stopped {
            RunState::StoppedAwaitingSpeedSwitch
        } else {
            RunState::Halted
        }
    }

    /// Wake from HALT/STOP and dispatch the highest-priority pending
    /// interrupt.
    ///
    /// Meant to be called by the driver between instructions. Any pending
    /// line wakes a halted CPU, even with IME clear; dispatch additionally
    /// requires IME. Returns the clock cycles spent, 0 when nothing was
    /// dispatched.
    pub fn service_interrupts<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let pending = bus.pending_interrupts();
        let Some(irq) = Interrupt::highest_priority(pending) else {
            return 0;
        };

        if self.halted {
            log::debug!("{irq:?} requested, leaving {:?}", self.run_state());
            self.halted = false;
            self.stopped = false;
        }
        if !self.ime {
            return 0;
        }

        self.ime = false;
        self.ime_pending = false;
        bus.acknowledge_interrupt(irq.bit());
        let return_pc = self.regs.pc;
        self.push16(bus, return_pc);
        self.regs.pc = irq.vector();
        log::debug!("dispatch {irq:?} from {return_pc:04X}");

        self.last_instruction_cycles = INTERRUPT_DISPATCH_CYCLES;
        self.cycles += INTERRUPT_DISPATCH_CYCLES as u64;
        INTERRUPT_DISPATCH_CYCLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_bit_has_priority() {
        assert_eq!(Interrupt::highest_priority(0x00), None);
        assert_eq!(Interrupt::highest_priority(0x1F), Some(Interrupt::VBlank));
        assert_eq!(Interrupt::highest_priority(0x14), Some(Interrupt::Timer));
        assert_eq!(Interrupt::highest_priority(0x10), Some(Interrupt::Joypad));
        assert_eq!(Interrupt::highest_priority(0xE0), None);
    }

    #[test]
    fn vectors_are_eight_bytes_apart() {
        for (i, irq) in Interrupt::ALL.into_iter().enumerate() {
            assert_eq!(irq.vector(), 0x40 + 8 * i as u16);
            assert_eq!(irq.bit(), 1 << i);
        }
    }
}
