use thiserror::Error;

/// Errors that end emulation.
///
/// The decoder is total over every defined opcode, so reaching one of these
/// means the program counter ran into data or one of the byte values the
/// hardware leaves undefined. Continuing would desynchronize all later
/// state; the driver must stop.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    #[error("unknown opcode {opcode:#04x} at pc {pc:#06x}")]
    UnknownOpcode { opcode: u8, pc: u16 },
}
