mod cb;
pub mod decode;
mod ops;
mod stack;

use crate::bus::Bus;
use crate::cycles::{self, IDLE_CYCLES};
use crate::error::CpuError;
use crate::registers::Registers;

// Post-boot CPU state
const BOOT_PC: u16 = 0x0100;
const BOOT_SP: u16 = 0xFFFE;
const DMG_BOOT_AF: u16 = 0x01B0;
const CGB_BOOT_AF: u16 = 0x1180;
const BOOT_BC: u16 = 0x0000;
const BOOT_DE: u16 = 0xFF56;
const BOOT_HL: u16 = 0x000D;

/// Hardware model the CPU is emulating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Model {
    #[default]
    Dmg,
    Cgb,
}

pub struct Cpu {
    pub regs: Registers,
    pub model: Model,
    /// Interrupt master enable.
    pub ime: bool,
    /// Set by EI; IME turns on once the instruction after EI completes.
    pub ime_pending: bool,
    pub halted: bool,
    /// STOP on CGB, waiting for a speed switch or an interrupt.
    pub stopped: bool,
    pub double_speed: bool,
    /// Clock cycles taken by the most recent `step` (or interrupt dispatch).
    pub last_instruction_cycles: u32,
    /// Clock cycles since construction.
    pub cycles: u64,
}

impl Cpu {
    /// Create a CPU initialized to the post-boot register state for `model`.
    pub fn new(model: Model) -> Self {
        let mut regs = Registers::default();
        regs.set_af(match model {
            Model::Dmg => DMG_BOOT_AF,
            Model::Cgb => CGB_BOOT_AF,
        });
        regs.set_bc(BOOT_BC);
        regs.set_de(BOOT_DE);
        regs.set_hl(BOOT_HL);
        regs.sp = BOOT_SP;
        regs.pc = BOOT_PC;

        Self {
            regs,
            model,
            ime: false,
            ime_pending: false,
            halted: false,
            stopped: false,
            double_speed: false,
            last_instruction_cycles: 0,
            cycles: 0,
        }
    }

    /// Return to the post-boot state of the current model.
    pub fn reset(&mut self) {
        *self = Self::new(self.model);
    }

    /// 2 in CGB double-speed mode, 1 otherwise.
    pub fn speed_factor(&self) -> u32 {
        if self.double_speed { 2 } else { 1 }
    }

    #[inline(always)]
    fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let val = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        val
    }

    #[inline(always)]
    fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus) as u16;
        let hi = self.fetch8(bus) as u16;
        (hi << 8) | lo
    }

    /// Execute one instruction and return the clock cycles it took.
    ///
    /// While halted or stopped nothing is fetched and one idle machine cycle
    /// is reported; the driver wakes the CPU through
    /// [`Cpu::service_interrupts`].
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        if self.halted {
            self.last_instruction_cycles = IDLE_CYCLES;
            self.cycles += IDLE_CYCLES as u64;
            return Ok(IDLE_CYCLES);
        }

        // EI's latch only fires at the end of the instruction after EI.
        let enable_after = self.ime_pending;

        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        self.last_instruction_cycles = cycles::base_clocks(opcode);
        cpu_trace!("{pc:04X}: {opcode:02X}  {}", self.debug_state());

        if let Err(err) = self.execute(opcode, pc, bus) {
            log::error!("{err}; {}", self.debug_state());
            return Err(err);
        }

        if enable_after && self.ime_pending {
            self.ime = true;
            self.ime_pending = false;
            log::debug!("IME enabled after {pc:04X}");
        }

        self.cycles += self.last_instruction_cycles as u64;
        Ok(self.last_instruction_cycles)
    }

    /// Formatted CPU state string for debugging.
    pub fn debug_state(&self) -> String {
        format!(
            "AF:{:04X} BC:{:04X} DE:{:04X} HL:{:04X} SP:{:04X} PC:{:04X} IME:{} CY:{}",
            self.regs.af(),
            self.regs.bc(),
            self.regs.de(),
            self.regs.hl(),
            self.regs.sp,
            self.regs.pc,
            self.ime as u8,
            self.cycles
        )
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(Model::default())
    }
}
