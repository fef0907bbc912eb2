use std::fmt;

use log::{trace, warn};
use lr35902_core::{Bus, Cpu, FlatBus, disasm};

use crate::config::RunConfig;
use crate::error::RunError;
use crate::serial::SerialBus;

const TRACE_TARGET: &str = "lr35902::run";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    InstructionLimit,
    CycleLimit,
    /// Halted or stopped with nothing pending that could wake the CPU.
    Halted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub instructions: u64,
    pub cycles: u64,
    pub reason: StopReason,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            StopReason::InstructionLimit => "instruction limit reached",
            StopReason::CycleLimit => "cycle limit reached",
            StopReason::Halted => "halted",
        };
        write!(
            f,
            "{reason} after {} instructions, {} cycles",
            self.instructions, self.cycles
        )
    }
}

/// The outer loop around [`Cpu::step`]: services interrupts between
/// instructions and enforces the configured limits.
pub struct Runner {
    pub cpu: Cpu,
    pub bus: SerialBus,
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig, program: &[u8]) -> Self {
        let mut mem = FlatBus::new();
        let copied = mem.load(config.load_address, program);
        if copied < program.len() {
            warn!(
                "program is {} bytes; only the first {copied} fit in the address space",
                program.len()
            );
        }

        let mut cpu = Cpu::new(config.model);
        cpu.regs.pc = config.entry;
        let bus = SerialBus::new(mem, config.serial_echo);
        Self { cpu, bus, config }
    }

    /// Run until a limit is hit, the CPU halts for good or an instruction
    /// fails to decode.
    pub fn run(&mut self) -> Result<Summary, RunError> {
        let mut instructions = 0u64;
        let reason = loop {
            if instructions >= self.config.max_instructions {
                break StopReason::InstructionLimit;
            }
            if let Some(max) = self.config.max_cycles
                && self.cpu.cycles >= max
            {
                break StopReason::CycleLimit;
            }

            self.cpu.service_interrupts(&mut self.bus);
            if self.config.stop_on_halt
                && self.cpu.halted
                && self.bus.pending_interrupts() == 0
            {
                break StopReason::Halted;
            }

            if !self.cpu.halted && log::log_enabled!(target: TRACE_TARGET, log::Level::Trace) {
                let pc = self.cpu.regs.pc;
                let (text, _) = disasm::decode_at(self.bus.memory(), pc);
                trace!(
                    target: TRACE_TARGET,
                    "{pc:04X}  {text:<16} {}",
                    self.cpu.debug_state()
                );
            }

            self.cpu.step(&mut self.bus)?;
            instructions += 1;
        };

        Ok(Summary {
            instructions,
            cycles: self.cpu.cycles,
            reason,
        })
    }
}
