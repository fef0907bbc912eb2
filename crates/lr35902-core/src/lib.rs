//! Instruction-level LR35902 (Game Boy / Game Boy Color) CPU core.
//!
//! The crate only models the processor: registers, flags, the primary and
//! CB-prefixed opcode tables, the stack and interrupt gating. Memory, video,
//! audio and timers live behind the [`bus::Bus`] trait and are driven by the
//! caller, which invokes [`cpu::Cpu::step`] once per instruction.

#[macro_use]
mod trace;

/// Stateless arithmetic, logic, rotate and shift primitives.
pub mod alu;

/// Memory capability consumed by the CPU and a flat 64 KiB implementation.
pub mod bus;

/// LR35902 CPU core.
pub mod cpu;

/// Static cycle-cost tables and conditional branch bonuses.
pub mod cycles;

/// Mnemonic decoder for tracing and debugging.
pub mod disasm;

/// Fatal execution errors.
pub mod error;

/// Interrupt lines, vectors and the HALT/STOP run state.
pub mod interrupts;

/// Register file and flag register.
pub mod registers;

pub use bus::{Bus, FlatBus};
pub use cpu::{Cpu, Model};
pub use error::CpuError;
pub use interrupts::RunState;
